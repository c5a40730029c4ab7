//! Database Connection Management Module
//!
//! MongoDB 연결과 트랜잭션 실행을 담당합니다.
//!
//! - [`Database`]: 클라이언트와 데이터베이스 이름, 트랜잭션 정책 보관
//! - [`transaction`]: 저장소 독립적인 트랜잭션 실행기
//! - [`session`]: MongoDB `ClientSession` 바인딩
//!
//! 다중 문서 트랜잭션은 레플리카 셋 또는 샤딩 클러스터에서만 동작합니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use hospital_backend::db::Database;
//! use hospital_backend::core::registry::ServiceLocator;
//!
//! let database = Database::connect(&config.database, &config.transaction).await?;
//! ServiceLocator::set(Arc::new(database));
//! ServiceLocator::initialize_all().await?;
//! ```

pub mod session;
pub mod transaction;

pub use session::MongoSession;
pub use transaction::{
    run_in_transaction, run_with_policy, TransactionError, TransactionPolicy, TransactionSettings,
};

use futures_util::future::BoxFuture;
use log::info;
use mongodb::{options::ClientOptions, Client};
use crate::config::{DatabaseConfig, TransactionConfig};
use crate::core::AppError;

/// MongoDB 데이터베이스 연결 래퍼
///
/// 리포지토리 매크로가 `db: Arc<Database>` 필드에 주입하며,
/// 서비스는 [`Database::transaction`]으로 다중 문서 변경을 원자적으로 수행합니다.
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
    transaction_policy: TransactionPolicy,
}

impl Database {
    /// 설정으로 MongoDB 클라이언트를 만들고 `ping`으로 연결을 확인합니다.
    pub async fn connect(
        config: &DatabaseConfig,
        transaction: &TransactionConfig,
    ) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| AppError::DatabaseError(format!("MongoDB URI 파싱 실패: {}", e)))?;

        client_options.app_name = Some(config.app_name.clone());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        client
            .database(&config.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(format!("MongoDB 연결 실패: {}", e)))?;

        info!("✅ MongoDB 연결 성공: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
            transaction_policy: transaction.policy(),
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 세션 생성 등 클라이언트 수준 작업에 사용합니다.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// 설정된 정책으로 작업 단위를 트랜잭션 안에서 실행합니다.
    ///
    /// 작업이 돌려준 `AppError`는 그대로, 세션/커밋/롤백 실패는
    /// `AppError::OperationFailed`로 변환됩니다.
    pub async fn transaction<T, F>(&self, work: F) -> Result<T, AppError>
    where
        F: for<'s> FnOnce(&'s mut MongoSession) -> BoxFuture<'s, Result<T, AppError>>,
    {
        run_with_policy(self, &self.transaction_policy, work)
            .await
            .map_err(AppError::from)
    }
}
