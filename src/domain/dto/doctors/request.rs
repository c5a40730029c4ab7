use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::dto::accounts::request::validate_not_blank;

/// 의사 등록 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDoctorRequest {
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub last_name: String,
}

/// 의사 검색 요청
///
/// 키워드는 성 또는 이름에 대소문자 구분 없이 부분 일치합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchDoctorsRequest {
    #[validate(length(min = 1, max = 50, message = "검색어는 1-50자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keyword_is_rejected() {
        let request = SearchDoctorsRequest { keyword: "  ".to_string() };
        assert!(request.validate().is_err());

        let request = SearchDoctorsRequest { keyword: "kim".to_string() };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_doctor_names_required() {
        let request = CreateDoctorRequest {
            first_name: "".to_string(),
            last_name: "House".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
