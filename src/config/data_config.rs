//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, MongoDB 연결, 트랜잭션 정책, 비밀번호 해싱,
//! 요청 제한, CORS 설정을 다룹니다. 모든 값은 [`ConfigSource`]에서 읽어
//! 시작 시 한 번 구성됩니다.

use std::time::Duration;
use crate::config::{parse_or, ConfigSource};
use crate::db::transaction::{TransactionPolicy, TransactionSettings};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 또는 `NODE_ENV`를 확인하며, 없으면 `Production`입니다.
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        let name = source("ENVIRONMENT")
            .or_else(|| source("NODE_ENV"))
            .unwrap_or_else(|| "production".to_string());
        Self::from_str(&name)
    }

    /// 문자열에서 Environment를 생성합니다. 알 수 없는 값은 `Production`입니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 패스워드 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// bcrypt cost (4-15)
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// `BCRYPT_COST`가 4-15 범위면 사용하고, 아니면 환경별 기본값을 씁니다.
    pub fn from_source(source: ConfigSource<'_>, env: &Environment) -> Self {
        let bcrypt_cost = source("BCRYPT_COST")
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(env));

        Self { bcrypt_cost }
    }

    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 기본값: "127.0.0.1"
    pub host: String,
    /// 기본값: 8080
    pub port: u16,
    /// 기본값: 4
    pub workers: usize,
}

impl ServerConfig {
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        Self {
            host: source("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(source, "PORT", 8080),
            workers: parse_or(source, "SERVER_WORKERS", 4),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MongoDB 연결 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `MONGODB_URI` (기본값: "mongodb://localhost:27017")
    pub uri: String,
    /// `DATABASE_NAME` (기본값: "hospital_dev")
    pub database_name: String,
    /// 드라이버 모니터링에 표시되는 애플리케이션 이름
    pub app_name: String,
}

impl DatabaseConfig {
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        Self {
            uri: source("MONGODB_URI").unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            database_name: source("DATABASE_NAME").unwrap_or_else(|| "hospital_dev".to_string()),
            app_name: source("APP_NAME").unwrap_or_else(|| "hospital_backend".to_string()),
        }
    }
}

/// 트랜잭션 실행 정책 설정
///
/// ## Environment Variables
///
/// - `TX_MAX_RETRIES`: 커밋/롤백 재시도 횟수 (기본값 3, 1 미만은 1로 보정)
/// - `TX_TIMEOUT_SECONDS`: 트랜잭션 전체 제한 시간 (기본값 10, 0이면 무제한)
/// - `TX_MAX_COMMIT_SECONDS`: 서버 측 커밋 최대 시간 (기본값 5)
#[derive(Debug, Clone)]
pub struct TransactionConfig {
    pub max_retries: i32,
    pub timeout: Option<Duration>,
    pub max_commit_time: Duration,
}

impl TransactionConfig {
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        let timeout_seconds: u64 = parse_or(source, "TX_TIMEOUT_SECONDS", 10);
        let max_commit_seconds: u64 = parse_or(source, "TX_MAX_COMMIT_SECONDS", 5);

        Self {
            max_retries: parse_or(source, "TX_MAX_RETRIES", 3),
            timeout: (timeout_seconds > 0).then(|| Duration::from_secs(timeout_seconds)),
            max_commit_time: Duration::from_secs(max_commit_seconds),
        }
    }

    /// 트랜잭션 실행기에 넘길 정책을 만듭니다.
    pub fn policy(&self) -> TransactionPolicy {
        TransactionPolicy {
            settings: TransactionSettings {
                max_commit_time: self.max_commit_time,
                ..TransactionSettings::default()
            },
            max_retries: self.max_retries,
            deadline: self.timeout,
        }
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// `RATE_LIMIT_PER_SECOND` (기본값 100)
    pub per_second: u64,
    /// `RATE_LIMIT_BURST_SIZE` (기본값 200)
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        Self {
            per_second: parse_or(source, "RATE_LIMIT_PER_SECOND", 100),
            burst_size: parse_or(source, "RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}

/// CORS 허용 Origin 설정
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    const DEFAULT_ORIGINS: [&'static str; 4] = [
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:8080",
        "http://127.0.0.1:8080",
    ];

    /// `CORS_ALLOWED_ORIGINS`는 쉼표로 구분합니다.
    pub fn from_source(source: ConfigSource<'_>) -> Self {
        let allowed_origins = match source("CORS_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => Self::DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from_str("development"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_environment_falls_back_to_node_env() {
        let source = source_of(&[("NODE_ENV", "dev")]);
        assert_eq!(Environment::from_source(&source), Environment::Development);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Development), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Staging), 10);
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Production), 12);
    }

    #[test]
    fn test_bcrypt_cost_out_of_range_uses_environment_default() {
        let source = source_of(&[("BCRYPT_COST", "31")]);
        let config = PasswordConfig::from_source(&source, &Environment::Staging);
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_server_config_defaults() {
        let source = source_of(&[]);
        let config = ServerConfig::from_source(&source);

        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_transaction_config_policy() {
        let source = source_of(&[
            ("TX_MAX_RETRIES", "0"),
            ("TX_TIMEOUT_SECONDS", "0"),
            ("TX_MAX_COMMIT_SECONDS", "2"),
        ]);
        let policy = TransactionConfig::from_source(&source).policy();

        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.deadline, None);
        assert_eq!(policy.settings.max_commit_time, Duration::from_secs(2));
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let source = source_of(&[("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example ")]);
        let config = CorsConfig::from_source(&source);

        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
    }
}
