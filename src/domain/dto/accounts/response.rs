use serde::{Deserialize, Serialize};
use crate::domain::dto::format_timestamp;
use crate::domain::entities::{Account, AccountRole};
use crate::domain::models::token::AccessToken;

/// 계정 응답 DTO (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub account_id: String,
    pub role: AccountRole,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub username: String,
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let created_at = format_timestamp(&account.created_at);
        let Account {
            account_id,
            role,
            first_name,
            last_name,
            age,
            email,
            username,
            ..
        } = account;

        Self {
            account_id,
            role,
            first_name,
            last_name,
            age,
            email,
            username,
            created_at,
        }
    }
}

/// 로그인/회원가입 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    #[serde(flatten)]
    pub token: AccessToken,
}

impl AuthResponse {
    pub fn new(account: Account, token: AccessToken) -> Self {
        Self {
            account: AccountResponse::from(account),
            token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let account = Account::new(
            AccountRole::Patient,
            "Jane".to_string(),
            "Doe".to_string(),
            34,
            "jane@example.com".to_string(),
            "jane_doe".to_string(),
            "$2b$04$secret-hash".to_string(),
        );

        let response = AuthResponse::new(account, AccessToken::bearer("tok".to_string(), 3600));
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"token_type\":\"Bearer\""));
        assert!(json.contains("\"role\":\"PATIENT\""));
    }
}
