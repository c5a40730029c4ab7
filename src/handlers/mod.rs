//! HTTP 요청 핸들러
//!
//! 핸들러는 요청 DTO를 검증하고 서비스 싱글톤(`XService::instance()`)에
//! 위임한 뒤 [`ApiResponse`](crate::domain::dto::ApiResponse)로 감싸 응답합니다.
//! 에러는 `AppError`의 `ResponseError` 구현이 `{"error": "..."}`로 변환합니다.
//!
//! - [`auth`] - 로그인, 회원가입, 토큰 확인 (`/api/v1/auth`)
//! - [`admin`] - 계정/의사/예약 관리 (`/api/v1/admin`, 관리자 게이트)
//! - [`patient`] - 프로필과 예약 (`/api/v1/patient`, 로그인 게이트)

pub mod admin;
pub mod auth;
pub mod patient;

use validator::Validate;
use crate::core::AppError;

/// 요청 DTO 검증 실패를 `ValidationError`로 변환합니다.
pub(crate) fn validate_request<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))
}
