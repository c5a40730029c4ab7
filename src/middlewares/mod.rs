//! 미들웨어 모듈
//!
//! # 인증 미들웨어 (AuthMiddleware)
//!
//! - Bearer 토큰 추출 및 검증
//! - 관리자 게이트는 저장된 계정 역할을 매 요청 확인
//! - 인증된 계정을 request extension에 저장
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/api/v1/patient")
//!             .wrap(AuthMiddleware::required())
//!             .route("/me", web::get().to(get_profile))
//!     )
//!     .service(
//!         web::scope("/api/v1/admin")
//!             .wrap(AuthMiddleware::administrator())
//!             .route("/doctors", web::post().to(create_doctor))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::{AuthGate, AuthMiddleware, GateComponents};
