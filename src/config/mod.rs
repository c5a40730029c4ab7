//! # Configuration Module
//!
//! 서비스 설정을 하나의 명시적인 [`AppConfig`] 구조체로 구성합니다.
//! `main`에서 한 번 만들어 `ServiceLocator`에 등록하고, 데이터베이스와
//! 토큰 발급기 생성자에는 필요한 하위 설정을 참조로 넘깁니다.
//! 핵심 로직은 환경 변수를 직접 읽지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 환경, 서버, MongoDB, 트랜잭션, 비밀번호, 요청 제한, CORS
//! - [`auth_config`] - JWT 비밀키와 토큰 유효 시간
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="127.0.0.1"
//! export PORT="8080"
//!
//! # MongoDB (트랜잭션에는 레플리카 셋이 필요합니다)
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="hospital"
//!
//! # JWT
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_EXPIRATION_SECONDS="3600"
//!
//! # 트랜잭션
//! export TX_MAX_RETRIES="3"
//! export TX_TIMEOUT_SECONDS="10"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;

use std::fmt::Display;
use std::str::FromStr;
use log::{info, warn};
use crate::core::AppError;

/// 설정 키 → 값 조회 함수
///
/// 운영에서는 프로세스 환경 변수를, 테스트에서는 고정된 맵을 사용합니다.
pub type ConfigSource<'a> = &'a dyn Fn(&str) -> Option<String>;

/// 값이 없으면 기본값, 파싱에 실패하면 경고 후 기본값을 돌려줍니다.
pub(crate) fn parse_or<T>(source: ConfigSource<'_>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match source(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            warn!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        None => default,
    }
}

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub transaction: TransactionConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(&|key: &str| std::env::var(key).ok())
    }

    /// 임의의 설정 소스에서 설정을 읽습니다.
    pub fn from_source(source: ConfigSource<'_>) -> Result<Self, AppError> {
        let environment = Environment::from_source(source);

        let config = Self {
            server: ServerConfig::from_source(source),
            database: DatabaseConfig::from_source(source),
            transaction: TransactionConfig::from_source(source),
            jwt: JwtConfig::from_source(source, &environment)?,
            password: PasswordConfig::from_source(source, &environment),
            rate_limit: RateLimitConfig::from_source(source),
            cors: CorsConfig::from_source(source),
            environment,
        };

        info!("⚙️ 설정 로드됨: 환경 {:?}, 서버 {}", config.environment, config.server.bind_address());
        Ok(config)
    }
}
