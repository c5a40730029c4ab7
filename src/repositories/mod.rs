//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로로 싱글톤 관리되며, `db: Arc<Database>` 필드가
//! 자동 주입됩니다. 트랜잭션 안에서 호출되는 메서드는 마지막 인자로
//! `&mut ClientSession`을 받아 실행기가 관리하는 세션에서 동작합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::accounts::AccountRepository;
//!
//! let account_repo = AccountRepository::instance();
//! let account = account_repo.find_by_email("jane@example.com").await?;
//! ```

pub mod accounts;
pub mod appointments;
pub mod doctors;

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use crate::core::AppError;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// 쓰기 오류 변환
///
/// 유니크 인덱스 위반은 `ConflictError`, 그 외는 `DatabaseError`가 됩니다.
pub(crate) fn map_write_error(error: MongoError, conflict_message: &str) -> AppError {
    match *error.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            AppError::ConflictError(conflict_message.to_string())
        }
        _ => AppError::DatabaseError(error.to_string()),
    }
}
