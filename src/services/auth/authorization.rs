//! 역할 기반 관리자 권한 확인
//!
//! 토큰에는 역할이 들어 있지 않으므로, 권한은 매 요청마다 저장된 계정
//! 상태를 조회해 판단합니다. 역할이 바뀌거나 계정이 삭제되면 이미 발급된
//! 토큰에도 즉시 반영됩니다.

use async_trait::async_trait;
use crate::core::AppError;
use crate::domain::entities::{Account, AccountRole};
use crate::services::auth::AuthError;

/// 계정 조회 기능
///
/// 운영에서는 `AccountRepository`가, 테스트에서는 메모리 맵이 구현합니다.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError>;
}

/// 계정이 관리자인지 확인합니다.
///
/// # Returns
///
/// * `Ok(true)` - 관리자 계정
/// * `Ok(false)` - 존재하지만 관리자가 아닌 계정
///
/// # Errors
///
/// * `AuthError::NotFound` - 계정이 존재하지 않음
/// * `AuthError::Lookup` - 저장소 조회 실패
pub async fn authorize<L>(lookup: &L, subject_id: &str) -> Result<bool, AuthError>
where
    L: AccountLookup + ?Sized,
{
    let account = lookup
        .find_account(subject_id)
        .await
        .map_err(|e| AuthError::Lookup(e.to_string()))?
        .ok_or_else(|| AuthError::NotFound(subject_id.to_string()))?;

    Ok(account.role == AccountRole::Administrator)
}

/// 관리자가 아니면 `AuthError::Forbidden`을 돌려줍니다.
pub async fn require_administrator<L>(lookup: &L, subject_id: &str) -> Result<(), AuthError>
where
    L: AccountLookup + ?Sized,
{
    if authorize(lookup, subject_id).await? {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// 테스트용 메모리 계정 저장소
    #[derive(Default)]
    pub(crate) struct InMemoryAccounts {
        accounts: HashMap<String, Account>,
    }

    impl InMemoryAccounts {
        pub(crate) fn with(mut self, account_id: &str, role: AccountRole) -> Self {
            let mut account = Account::new(
                role,
                "Test".to_string(),
                "User".to_string(),
                30,
                format!("{}@example.com", account_id),
                account_id.replace('-', "_"),
                "hash".to_string(),
            );
            account.account_id = account_id.to_string();
            self.accounts.insert(account_id.to_string(), account);
            self
        }
    }

    #[async_trait]
    impl AccountLookup for InMemoryAccounts {
        async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError> {
            Ok(self.accounts.get(account_id).cloned())
        }
    }

    /// 항상 조회에 실패하는 저장소
    pub(crate) struct UnavailableStore;

    #[async_trait]
    impl AccountLookup for UnavailableStore {
        async fn find_account(&self, _account_id: &str) -> Result<Option<Account>, AppError> {
            Err(AppError::DatabaseError("connection refused".to_string()))
        }
    }

    #[actix_web::test]
    async fn test_patient_is_not_administrator() {
        let store = InMemoryAccounts::default().with("acc-1", AccountRole::Patient);
        assert!(!authorize(&store, "acc-1").await.unwrap());
    }

    #[actix_web::test]
    async fn test_administrator_is_authorized() {
        let store = InMemoryAccounts::default().with("acc-1", AccountRole::Administrator);
        assert!(authorize(&store, "acc-1").await.unwrap());
    }

    #[actix_web::test]
    async fn test_absent_account_is_not_found() {
        let store = InMemoryAccounts::default();

        let result = authorize(&store, "acc-1").await;
        assert!(matches!(result, Err(AuthError::NotFound(ref id)) if id == "acc-1"));
    }

    #[actix_web::test]
    async fn test_lookup_failure_is_distinct_from_absence() {
        let result = authorize(&UnavailableStore, "acc-1").await;
        assert!(matches!(result, Err(AuthError::Lookup(_))));
    }

    #[actix_web::test]
    async fn test_require_administrator_rejects_patient() {
        let store = InMemoryAccounts::default()
            .with("admin-1", AccountRole::Administrator)
            .with("patient-1", AccountRole::Patient);

        assert!(require_administrator(&store, "admin-1").await.is_ok());
        assert!(matches!(
            require_administrator(&store, "patient-1").await,
            Err(AuthError::Forbidden)
        ));
    }
}
