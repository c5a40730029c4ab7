//! # 계정 관리 서비스 구현
//!
//! 환자 회원가입과 관리자 계정 생성이 공유하는 계정 생성 흐름입니다.
//!
//! 1. 입력 정리 (이메일 소문자화, 이름 공백 제거)
//! 2. bcrypt 해싱 (트랜잭션 밖에서 수행)
//! 3. 트랜잭션: 이메일/사용자명 중복 확인 → 삽입

use std::sync::Arc;
use bcrypt::hash;
use log::{debug, info};
use singleton_macro::service;
use crate::config::AppConfig;
use crate::core::{AppError, ErrorContext};
use crate::db::Database;
use crate::domain::dto::accounts::CreateAccountRequest;
use crate::domain::entities::{Account, AccountRole};
use crate::repositories::accounts::AccountRepository;
use crate::utils::string_utils::normalize_email;

#[service(name = "account")]
pub struct AccountService {
    account_repo: Arc<AccountRepository>,
    db: Arc<Database>,
    config: Arc<AppConfig>,
}

impl AccountService {
    /// 지정한 역할로 계정을 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일 또는 사용자명 중복
    /// * `AppError::OperationFailed` - 트랜잭션 커밋/롤백 실패
    pub async fn create_account(
        &self,
        request: CreateAccountRequest,
        role: AccountRole,
    ) -> Result<Account, AppError> {
        let password_hash = hash(&request.password, self.config.password.bcrypt_cost)
            .context("비밀번호 해싱 실패")?;
        debug!("🔐 비밀번호 해싱 완료 (cost {})", self.config.password.bcrypt_cost);

        let account = Account::new(
            role,
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            request.age,
            normalize_email(&request.email),
            request.username.trim().to_string(),
            password_hash,
        );

        let repo = Arc::clone(&self.account_repo);
        let created = self
            .db
            .transaction(move |session| {
                Box::pin(async move {
                    let session = session.client_session();

                    if let Some(existing) = repo
                        .find_by_email_or_username(&account.email, &account.username, session)
                        .await?
                    {
                        return Err(duplicate_account_error(&existing, &account));
                    }

                    repo.insert(&account, session).await?;
                    Ok(account)
                })
            })
            .await?;

        info!("👤 계정 생성: {} ({})", created.account_id, created.role);
        Ok(created)
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account, AppError> {
        self.account_repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("계정을 찾을 수 없습니다".to_string()))
    }
}

/// 어떤 필드가 겹쳤는지 알려주는 충돌 에러
fn duplicate_account_error(existing: &Account, candidate: &Account) -> AppError {
    if existing.email == candidate.email {
        AppError::ConflictError("이미 사용 중인 이메일입니다".to_string())
    } else {
        AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email: &str, username: &str) -> Account {
        Account::new(
            AccountRole::Patient,
            "Jane".to_string(),
            "Doe".to_string(),
            34,
            email.to_string(),
            username.to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_duplicate_email_is_reported_first() {
        let existing = account("jane@example.com", "jane_doe");
        let candidate = account("jane@example.com", "jane_doe");

        match duplicate_account_error(&existing, &candidate) {
            AppError::ConflictError(message) => assert!(message.contains("이메일")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_username() {
        let existing = account("other@example.com", "jane_doe");
        let candidate = account("jane@example.com", "jane_doe");

        match duplicate_account_error(&existing, &candidate) {
            AppError::ConflictError(message) => assert!(message.contains("사용자명")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
