//! Account Entity
//!
//! 환자와 관리자 계정을 하나의 문서 구조로 표현합니다.
//! 역할은 저장된 문서에서만 판단하며, 토큰에는 담지 않습니다.

use std::fmt;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use crate::domain::entities::new_entity_id;

/// 계정 역할
///
/// 저장 형식은 `"PATIENT"` / `"ADMINISTRATOR"`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Patient,
    Administrator,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Patient => "PATIENT",
            AccountRole::Administrator => "ADMINISTRATOR",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 계정 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    /// 로그인 식별자 (unique)
    pub email: String,
    /// unique
    pub username: String,
    /// bcrypt 해시
    pub password_hash: String,
    pub created_at: DateTime,
}

impl Account {
    pub fn new(
        role: AccountRole,
        first_name: String,
        last_name: String,
        age: i32,
        email: String,
        username: String,
        password_hash: String,
    ) -> Self {
        Self {
            account_id: new_entity_id(),
            role,
            first_name,
            last_name,
            age,
            email,
            username,
            password_hash,
            created_at: DateTime::now(),
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.role == AccountRole::Administrator
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
