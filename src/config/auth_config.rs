//! 인증 관련 설정 관리 모듈
//!
//! JWT 서명 비밀키와 액세스 토큰 유효 시간을 다룹니다.
//! 비밀키는 시작 시 한 번 읽혀 [`TokenAuthority`](crate::services::auth::TokenAuthority)
//! 생성자에 전달되며, 이후 읽기 전용입니다.

use std::fmt;
use log::warn;
use crate::config::{parse_or, ConfigSource, Environment};
use crate::core::AppError;

/// JWT 토큰 설정
///
/// ## Environment Variables
///
/// - `JWT_SECRET`: HMAC 서명 비밀키 (프로덕션 필수)
/// - `JWT_EXPIRATION_SECONDS`: 액세스 토큰 유효 시간 (기본값 3600초)
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_seconds: i64,
}

impl JwtConfig {
    const DEVELOPMENT_SECRET: &'static str = "hospital-dev-secret-change-me";
    const DEFAULT_EXPIRATION_SECONDS: i64 = 3600;

    /// 프로덕션에서 `JWT_SECRET`이 없으면 시작을 중단합니다.
    /// 그 외 환경에서는 경고 로그와 함께 개발용 비밀키를 사용합니다.
    pub fn from_source(source: ConfigSource<'_>, env: &Environment) -> Result<Self, AppError> {
        let secret = match source("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if env.is_production() => {
                return Err(AppError::InternalError(
                    "JWT_SECRET 환경 변수가 프로덕션에서 설정되지 않았습니다".to_string(),
                ));
            }
            None => {
                warn!("⚠️ JWT_SECRET 미설정: 개발용 비밀키를 사용합니다");
                Self::DEVELOPMENT_SECRET.to_string()
            }
        };

        let expiration_seconds =
            parse_or(source, "JWT_EXPIRATION_SECONDS", Self::DEFAULT_EXPIRATION_SECONDS);

        Ok(Self {
            secret,
            expiration_seconds,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}
