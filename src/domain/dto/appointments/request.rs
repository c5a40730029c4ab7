//! # 예약 요청 DTO
//!
//! 부분 수정 요청은 값이 있는 필드만 `$set`으로 반영되며,
//! 모든 필드가 비어 있으면 검증 단계에서 거부됩니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::dto::accounts::request::validate_not_blank;
use crate::utils::string_utils::deserialize_optional_string;

/// 예약 슬롯 생성 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, message = "의사 ID를 입력해주세요"))]
    pub doctor_id: String,

    #[validate(length(min = 1, max = 500, message = "설명은 1-500자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(range(min = 1, max = 1000, message = "최대 예약 인원은 1-1000 사이여야 합니다"))]
    pub max_appointment: i32,
}

/// 예약 슬롯 부분 수정 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateAppointmentRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 500, message = "설명은 1-500자 사이여야 합니다"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 1000, message = "최대 예약 인원은 1-1000 사이여야 합니다"))]
    pub max_appointment: Option<i32>,
}

impl UpdateAppointmentRequest {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.max_appointment.is_none()
    }
}

fn validate_has_changes(req: &UpdateAppointmentRequest) -> Result<(), ValidationError> {
    if req.is_empty() {
        return Err(ValidationError::new("empty_update")
            .with_message("수정할 항목이 없습니다".into()));
    }
    Ok(())
}
