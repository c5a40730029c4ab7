//! # 인증 서비스 구현
//!
//! 이메일/비밀번호 로그인, 환자 회원가입, 토큰 확인을 담당합니다.
//! 요청마다의 토큰 검증과 관리자 권한 확인은 인증 미들웨어가
//! [`TokenAuthority`]와 [`AccountLookup`](crate::services::auth::AccountLookup)으로 직접 수행합니다.

use std::sync::Arc;
use log::{info, warn};
use singleton_macro::service;
use crate::core::errors::{AppError, ErrorContext, UNAUTHORIZED_MESSAGE};
use crate::domain::dto::accounts::{AccountResponse, AuthResponse, CreateAccountRequest, LoginRequest};
use crate::domain::entities::{Account, AccountRole};
use crate::domain::models::auth::AuthenticatedAccount;
use crate::domain::models::token::AccessToken;
use crate::repositories::accounts::AccountRepository;
use crate::services::accounts::AccountService;
use crate::services::auth::TokenAuthority;
use crate::utils::string_utils::normalize_email;

/// 존재하지 않는 이메일과 틀린 비밀번호에 같은 메시지를 사용합니다.
const INVALID_CREDENTIALS: &str = "잘못된 이메일 또는 비밀번호입니다";

#[service(name = "auth")]
pub struct AuthService {
    token_authority: Arc<TokenAuthority>,
    account_repo: Arc<AccountRepository>,
    account_service: Arc<AccountService>,
}

impl AuthService {
    /// 자격 증명을 확인하고 설정된 유효 시간의 액세스 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 이메일 또는 비밀번호 불일치
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let account = match self.account_repo.find_by_email(&email).await? {
            Some(account) => account,
            None => {
                warn!("🔑 로그인 실패: 등록되지 않은 이메일");
                return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
            }
        };

        let is_valid = bcrypt::verify(&request.password, &account.password_hash)
            .context("비밀번호 검증 실패")?;

        if !is_valid {
            warn!("🔑 로그인 실패: 비밀번호 불일치 ({})", account.account_id);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        info!("🔓 로그인 성공: {}", account.account_id);
        self.issue_for(account)
    }

    /// 환자 계정을 만들고 바로 사용할 수 있는 토큰을 발급합니다.
    pub async fn register(&self, request: CreateAccountRequest) -> Result<AuthResponse, AppError> {
        let account = self
            .account_service
            .create_account(request, AccountRole::Patient)
            .await?;

        self.issue_for(account)
    }

    /// 유효한 토큰의 주체 계정이 아직 존재하는지 확인합니다.
    ///
    /// 토큰 발급 후 계정이 삭제되었다면 인증 실패로 처리합니다.
    pub async fn check(&self, principal: &AuthenticatedAccount) -> Result<AccountResponse, AppError> {
        match self.account_repo.find_by_id(&principal.account_id).await? {
            Some(account) => Ok(AccountResponse::from(account)),
            None => {
                warn!("🔒 토큰 주체 계정 없음: {}", principal.account_id);
                Err(AppError::AuthenticationError(UNAUTHORIZED_MESSAGE.to_string()))
            }
        }
    }

    fn issue_for(&self, account: Account) -> Result<AuthResponse, AppError> {
        let ttl = self.token_authority.default_ttl_seconds();
        let token = self.token_authority.issue_token(&account.account_id, ttl)?;

        Ok(AuthResponse::new(account, AccessToken::bearer(token, ttl)))
    }
}
