//! # Domain Models
//!
//! 저장되지 않는 도메인 값 객체들입니다.
//!
//! - [`token`]: 베어러 토큰 클레임과 발급 응답
//! - [`auth`]: 인증 미들웨어가 요청 확장에 넣는 인증 주체

pub mod auth {
    pub mod authenticated_account;
    pub use authenticated_account::AuthenticatedAccount;
}

pub mod token {
    pub mod token;
    pub use token::{AccessToken, Claims};
}
