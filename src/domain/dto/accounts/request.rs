//! # 계정 요청 DTO
//!
//! ## 검증 규칙
//!
//! - `email`: RFC 5322 이메일 형식 (중복 여부는 서비스 계층에서 확인)
//! - `username`: 3-30자, 영문/숫자/언더스코어
//! - `password`: 최소 8자
//! - `first_name`, `last_name`: 1-50자, 공백만으로는 불가
//! - `age`: 1-150

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 로그인 요청
///
/// 비밀번호 형식은 검사하지 않습니다. 틀린 값은 자격 증명 불일치로 처리됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 계정 생성 요청
///
/// 환자 회원가입과 관리자 계정 생성이 같은 구조를 사용합니다.
/// 역할은 요청이 아니라 호출한 경로가 정합니다.
///
/// ```json
/// {
///   "first_name": "Jane",
///   "last_name": "Doe",
///   "age": 34,
///   "email": "jane@example.com",
///   "username": "jane_doe",
///   "password": "correct-horse"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub last_name: String,

    #[validate(range(min = 1, max = 150, message = "나이는 1-150 사이여야 합니다"))]
    pub age: i32,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 영문, 숫자, 언더스코어만 허용합니다.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_username")
            .with_message("사용자명은 알파벳, 숫자, 언더스코어만 사용 가능합니다".into()));
    }
    Ok(())
}

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message("공백만으로 이루어질 수 없습니다".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateAccountRequest {
        CreateAccountRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            age: 34,
            email: "jane@example.com".to_string(),
            username: "jane_doe".to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_username_rules() {
        let mut request = valid_request();
        request.username = "jane-doe".to_string();
        assert!(request.validate().is_err());

        request.username = "jd".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_age_and_password_bounds() {
        let mut request = valid_request();
        request.age = 0;
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.age = 151;
        assert!(request.validate().is_err());

        let mut request = valid_request();
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut request = valid_request();
        request.last_name = "   ".to_string();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("last_name"));
    }

    #[test]
    fn test_login_requires_email_format() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "whatever".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
