//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 요청/응답 구조체를 정의합니다.
//! 요청 DTO는 `validator` derive 규칙을 가지며, 핸들러가 서비스 호출 전에
//! `validate()`를 실행합니다. 응답 DTO는 엔티티에서 민감한 필드
//! (비밀번호 해시 등)를 제외하고 만들어집니다.
//!
//! ```text
//! dto/
//! ├── accounts/       # 로그인, 회원가입, 계정 조회
//! ├── doctors/        # 의사 등록, 검색
//! ├── appointments/   # 예약 슬롯 생성/수정, 환자 예약
//! └── common.rs       # 공통 응답 래퍼
//! ```

pub mod accounts;
pub mod appointments;
pub mod common;
pub mod doctors;

pub use common::ApiResponse;

use mongodb::bson::DateTime;

/// 응답용 RFC 3339 시각 문자열
pub(crate) fn format_timestamp(value: &DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}
