//! # 계정 리포지토리 구현
//!
//! `accounts` 컬렉션의 조회/생성과 인덱스 관리를 담당합니다.
//! 인증 계층에는 [`AccountLookup`] 구현으로 계정 조회 기능을 제공합니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{bson::{doc, Document}, options::IndexOptions, ClientSession, IndexModel};
use singleton_macro::repository;
use crate::core::AppError;
use crate::db::Database;
use crate::domain::entities::Account;
use crate::repositories::map_write_error;
use crate::services::auth::AccountLookup;

/// 계정 데이터 액세스 리포지토리
///
/// ## 인덱스
///
/// - `account_id` (unique)
/// - `email` (unique)
/// - `username` (unique)
#[repository(name = "account", collection = "accounts")]
pub struct AccountRepository {
    db: Arc<Database>,
}

impl AccountRepository {
    pub async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! { "account_id": account_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 이메일은 정규화(소문자)된 값으로 저장되어 있어야 합니다.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 트랜잭션 안에서 이메일 또는 사용자명이 겹치는 계정을 찾습니다.
    pub async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
        session: &mut ClientSession,
    ) -> Result<Option<Account>, AppError> {
        self.collection::<Account>()
            .find_one(doc! {
                "$or": [
                    { "email": email },
                    { "username": username },
                ]
            })
            .session(session)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn insert(
        &self,
        account: &Account,
        session: &mut ClientSession,
    ) -> Result<(), AppError> {
        self.collection::<Account>()
            .insert_one(account)
            .session(session)
            .await
            .map_err(|e| map_write_error(e, "이미 사용 중인 이메일 또는 사용자명입니다"))?;

        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let unique = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);

            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{}_unique", field))
                        .build(),
                )
                .build()
        };

        self.collection::<Account>()
            .create_indexes([unique("account_id"), unique("email"), unique("username")])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AccountLookup for AccountRepository {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        self.find_by_id(account_id).await
    }
}
