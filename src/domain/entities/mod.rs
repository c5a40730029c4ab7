//! # Domain Entities
//!
//! MongoDB 컬렉션에 저장되는 문서 구조체들입니다.
//!
//! | 엔티티 | 컬렉션 | 식별자 |
//! |---|---|---|
//! | [`Account`] | `accounts` | `account_id` |
//! | [`Doctor`] | `doctors` | `doctor_id` |
//! | [`Appointment`] | `appointments` | `appointment_id` |
//!
//! 식별자는 모두 UUID v4 문자열이며, MongoDB가 부여하는 `_id`는 사용하지 않습니다.

pub mod account;
pub mod appointment;
pub mod doctor;

pub use account::{Account, AccountRole};
pub use appointment::Appointment;
pub use doctor::Doctor;

/// 새 엔티티 식별자
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
