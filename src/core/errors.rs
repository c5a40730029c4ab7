//! # Application Error Handling System
//!
//! 병원 백오피스 서비스 전역에서 사용하는 에러 타입과 HTTP 응답 매핑입니다.
//! 각 계층(리포지토리, 서비스, 핸들러)은 `AppError`를 반환하고,
//! Actix-Web이 `ResponseError` 구현을 통해 일관된 JSON 응답으로 변환합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 사용 시나리오 |
//! |----------|-------------|---------------|
//! | `ValidationError` | 400 Bad Request | 입력값 검증 실패 |
//! | `AuthenticationError` | 401 Unauthorized | 토큰 누락/위조/만료, 로그인 실패 |
//! | `AuthorizationError` | 403 Forbidden | 관리자 권한 부족 |
//! | `NotFound` | 404 Not Found | 계정/의사/예약 없음 |
//! | `ConflictError` | 409 Conflict | 중복 계정, 정원 초과 예약 |
//! | `OperationFailed` | 500 Internal Server Error | 트랜잭션 세션/커밋/롤백 실패 |
//! | `DatabaseError` | 500 Internal Server Error | MongoDB 오류 |
//! | `InternalError` | 500 Internal Server Error | 예상치 못한 오류 |
//!
//! 인증/인가 실패, 트랜잭션 인프라 실패, 데이터베이스/시스템 오류는 원인을 로그로만 남기고,
//! 클라이언트에는 고정된 메시지만 전달합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! let doctor = doctor_repo.find_by_id(&doctor_id).await?
//!     .ok_or_else(|| AppError::NotFound(format!("의사를 찾을 수 없습니다: {}", doctor_id)))?;
//! ```

use thiserror::Error;
use crate::db::transaction::TransactionError;
use crate::services::auth::AuthError;

/// 인증 실패 시 클라이언트에 노출되는 고정 메시지
pub const UNAUTHORIZED_MESSAGE: &str = "unauthorized";

/// 트랜잭션 인프라 실패 시 클라이언트에 노출되는 고정 메시지
pub const OPERATION_FAILED_MESSAGE: &str = "operation failed";

/// 데이터베이스/시스템 오류 시 클라이언트에 노출되는 고정 메시지
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// 애플리케이션 전역 에러 타입
///
/// `thiserror`로 `Error`를 구현하고 `actix_web::ResponseError`를 통해
/// HTTP 응답으로 자동 변환됩니다.
///
/// ## 에러 카테고리
///
/// - 인프라: `DatabaseError`, `OperationFailed`
/// - 비즈니스: `ValidationError`, `ConflictError`, `NotFound`
/// - 보안: `AuthenticationError`, `AuthorizationError`
/// - 시스템: `InternalError`
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB 연산 중 발생한 오류
    ///
    /// ```rust,ignore
    /// collection.insert_one(&account).await
    ///     .map_err(|e| AppError::DatabaseError(e.to_string()))?;
    /// ```
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 트랜잭션 세션 열기, 시작, 커밋/롤백 재시도 소진 등
    /// 작업 자체가 아닌 트랜잭션 인프라가 실패한 경우
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// 클라이언트 입력이 검증 규칙을 만족하지 않음
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 요청된 리소스가 존재하지 않음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복 생성, 예약 정원 초과 등 비즈니스 규칙 위반
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 신원을 확인할 수 없음 (헤더 누락, 서명 불일치, 만료, 로그인 실패)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 인증은 되었으나 권한이 부족함 (관리자 전용 기능)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 예상하지 못한 시스템 오류
    ///
    /// ```rust,ignore
    /// let hash = bcrypt::hash(&password, cost)
    ///     .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
    /// ```
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 모든 에러 응답은 `{"error": "..."}` 형식을 따릅니다.
    ///
    /// 클라이언트가 고칠 수 있는 에러는 변형에 담긴 메시지만 내보내고,
    /// 인프라 에러는 원인을 로그에 남긴 뒤 고정 메시지로 대신합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let message = match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg) => msg.as_str(),
            AppError::OperationFailed(_) => OPERATION_FAILED_MESSAGE,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                log::error!("❌ 내부 오류 응답: {}", self);
                INTERNAL_ERROR_MESSAGE
            }
        };

        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": message
            }))
    }
}

/// 트랜잭션 실행 결과를 애플리케이션 에러로 변환합니다.
///
/// 작업 단위가 반환한 비즈니스 에러(`WorkFailed`)는 그대로 전달하고,
/// 세션/커밋/롤백 같은 인프라 실패는 원인을 로그에 남긴 뒤
/// `OperationFailed`로 감춥니다.
impl From<TransactionError<AppError>> for AppError {
    fn from(err: TransactionError<AppError>) -> Self {
        match err {
            TransactionError::WorkFailed(work_error) => work_error,
            TransactionError::AbortExhausted { attempts, source, work_error } => {
                log::error!(
                    "❌ 트랜잭션 롤백 {}회 실패: {} (작업 에러: {})",
                    attempts, source, work_error
                );
                AppError::OperationFailed(format!("abort failed after {} attempts", attempts))
            }
            other if other.is_resource_unavailable() => {
                log::error!("❌ 트랜잭션 세션을 준비하지 못했습니다: {}", other);
                AppError::OperationFailed(other.to_string())
            }
            other => {
                log::error!("❌ 트랜잭션 실패: {}", other);
                AppError::OperationFailed(other.to_string())
            }
        }
    }
}

/// 토큰 인증/인가 실패를 애플리케이션 에러로 변환합니다.
///
/// 인증 단계의 모든 실패는 원인과 무관하게 동일한 401 응답이 됩니다.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_authentication_failure() {
            if let Some(stage) = err.stage() {
                log::warn!("🔒 인증 실패 ({}): {}", stage, err);
            }
            return AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string());
        }

        match err {
            AuthError::Forbidden => AppError::AuthorizationError(err.to_string()),
            AuthError::NotFound(ref account_id) => {
                AppError::NotFound(format!("계정을 찾을 수 없습니다: {}", account_id))
            }
            AuthError::Signing(message) => {
                AppError::InternalError(format!("토큰 서명 실패: {}", message))
            }
            AuthError::Lookup(message) => {
                log::error!("❌ 계정 조회 실패: {}", message);
                AppError::DatabaseError(message)
            }
            _ => AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string()),
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `AppError::InternalError`로 변환하는 확장 trait
///
/// ```rust,ignore
/// let cost = bcrypt::hash(&password, cost).context("비밀번호 해싱 실패")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 지연 평가된 컨텍스트를 사용합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use std::time::Duration;

    fn body_json(error: &AppError) -> serde_json::Value {
        let bytes = error
            .error_response()
            .into_body()
            .try_into_bytes()
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::ValidationError("age".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("doctor".into()), StatusCode::NOT_FOUND),
            (AppError::ConflictError("email".into()), StatusCode::CONFLICT),
            (AppError::AuthenticationError("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::AuthorizationError("x".into()), StatusCode::FORBIDDEN),
            (AppError::OperationFailed("commit".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::DatabaseError("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::InternalError("bug".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status(), expected, "{:?}", error);
        }
    }

    #[test]
    fn test_operation_failed_hides_cause() {
        let error = AppError::OperationFailed("commit exhausted: replica set gone".into());
        let body = body_json(&error);

        assert_eq!(body["error"], OPERATION_FAILED_MESSAGE);
    }

    #[test]
    fn test_client_errors_render_only_their_message() {
        let unauthorized = AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string());
        assert_eq!(body_json(&unauthorized)["error"], "unauthorized");

        let conflict = AppError::ConflictError("이미 예약된 진료입니다".into());
        assert_eq!(body_json(&conflict)["error"], "이미 예약된 진료입니다");

        let forbidden = AppError::from(AuthError::Forbidden);
        assert_eq!(body_json(&forbidden)["error"], "administrator role required");
    }

    #[test]
    fn test_infrastructure_errors_hide_driver_text() {
        let duplicate = AppError::DatabaseError(
            "E11000 duplicate key error collection: hospital.accounts".into(),
        );
        let lookup = AppError::from(AuthError::Lookup(
            "Kind: Server selection timeout, host=mongo-0.internal:27017".into(),
        ));
        let internal = AppError::InternalError("비밀번호 해싱 실패: invalid cost".into());

        for error in [duplicate, lookup, internal] {
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_json(&error)["error"], INTERNAL_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_work_failure_passes_through_transaction_error() {
        let err: TransactionError<AppError> =
            TransactionError::WorkFailed(AppError::ConflictError("이미 예약됨".into()));

        match AppError::from(err) {
            AppError::ConflictError(msg) => assert_eq!(msg, "이미 예약됨"),
            other => panic!("Expected ConflictError, got {:?}", other),
        }
    }

    #[test]
    fn test_infrastructure_transaction_errors_become_operation_failed() {
        let commit: TransactionError<AppError> = TransactionError::CommitExhausted {
            attempts: 3,
            source: "network".into(),
        };
        let abort: TransactionError<AppError> = TransactionError::AbortExhausted {
            attempts: 2,
            source: "network".into(),
            work_error: AppError::NotFound("doctor".into()),
        };
        let deadline: TransactionError<AppError> =
            TransactionError::DeadlineElapsed(Duration::from_secs(1));

        for err in [commit, abort, deadline] {
            assert!(matches!(AppError::from(err), AppError::OperationFailed(_)));
        }
    }

    #[test]
    fn test_authentication_failures_collapse_to_unauthorized() {
        for err in [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::InvalidSignature("bad".into()),
            AuthError::Expired,
            AuthError::MalformedClaims("aid".into()),
            AuthError::MissingSubject,
        ] {
            match AppError::from(err) {
                AppError::AuthenticationError(msg) => assert_eq!(msg, UNAUTHORIZED_MESSAGE),
                other => panic!("Expected AuthenticationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_forbidden_maps_to_authorization_error() {
        let error = AppError::from(AuthError::Forbidden);
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
