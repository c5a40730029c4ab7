//! 비즈니스 로직 계층
//!
//! `#[service]` 매크로로 싱글톤 관리되며, `Arc<XRepository>`/`Arc<XService>`
//! 필드와 `main`에서 등록한 `Database`, `TokenAuthority`, `AppConfig`를 주입받습니다.
//! 여러 문서를 함께 바꾸는 작업은 [`Database::transaction`](crate::db::Database::transaction)
//! 안에서 실행됩니다.
//!
//! - [`auth`] - 토큰 발급/검증, 관리자 권한 확인, 로그인/회원가입
//! - [`accounts`] - 계정 생성과 조회
//! - [`admin`] - 관리자용 계정/의사/예약 관리
//! - [`patients`] - 환자 프로필과 진료 예약

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod patients;
