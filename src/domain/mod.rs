//! # Domain Layer
//!
//! - [`entities`]: MongoDB 문서 (계정, 의사, 예약)
//! - [`models`]: 토큰 클레임, 인증 주체
//! - [`dto`]: HTTP 요청/응답 구조체와 입력 검증 규칙

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
