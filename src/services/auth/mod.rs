//! 인증 및 권한 서비스 모듈
//!
//! - [`TokenAuthority`] - HMAC-SHA256 베어러 토큰 발급과 검증
//! - [`authorization`] - 저장된 계정 역할 기반 관리자 권한 확인
//! - [`AuthService`] - 로그인, 환자 회원가입, 토큰 확인
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{AuthService, TokenAuthority};
//!
//! let auth_service = AuthService::instance();
//! let response = auth_service.login(request).await?;
//! ```

pub mod auth_error;
pub mod auth_service;
pub mod authorization;
pub mod token_authority;

pub use auth_error::{AuthError, AuthStage};
pub use auth_service::AuthService;
pub use authorization::{authorize, require_administrator, AccountLookup};
pub use token_authority::TokenAuthority;
