//! MongoDB 세션 바인딩
//!
//! [`Database`]를 트랜잭션 실행기의 [`SessionSource`]로,
//! 드라이버의 `ClientSession`을 [`TransactionSession`]으로 연결합니다.

use async_trait::async_trait;
use log::debug;
use mongodb::options::{Acknowledgment, ReadConcern, TransactionOptions, WriteConcern};
use mongodb::ClientSession;
use crate::db::transaction::{
    ReadIsolation, SessionSource, StoreError, TransactionSession, TransactionSettings,
    WriteAcknowledgment,
};
use crate::db::Database;

/// 트랜잭션 실행기가 소유하는 MongoDB 세션
///
/// 작업 단위는 `client_session()`으로 얻은 참조를 리포지토리 메서드에 넘겨
/// 같은 트랜잭션 안에서 읽고 씁니다.
pub struct MongoSession {
    inner: ClientSession,
}

impl MongoSession {
    pub fn client_session(&mut self) -> &mut ClientSession {
        &mut self.inner
    }
}

impl From<&TransactionSettings> for TransactionOptions {
    fn from(settings: &TransactionSettings) -> Self {
        let acknowledgment = match settings.write {
            WriteAcknowledgment::Majority => Acknowledgment::Majority,
            WriteAcknowledgment::Nodes(n) => Acknowledgment::Nodes(n),
        };
        let read_concern = match settings.read {
            ReadIsolation::Snapshot => ReadConcern::snapshot(),
            ReadIsolation::Majority => ReadConcern::majority(),
            ReadIsolation::Local => ReadConcern::local(),
        };

        TransactionOptions::builder()
            .write_concern(WriteConcern::builder().w(acknowledgment).build())
            .read_concern(read_concern)
            .max_commit_time(settings.max_commit_time)
            .build()
    }
}

#[async_trait]
impl TransactionSession for MongoSession {
    async fn start_transaction(&mut self, settings: &TransactionSettings) -> Result<(), StoreError> {
        self.inner
            .start_transaction()
            .with_options(TransactionOptions::from(settings))
            .await?;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> Result<(), StoreError> {
        self.inner.commit_transaction().await?;
        Ok(())
    }

    async fn abort_transaction(&mut self) -> Result<(), StoreError> {
        self.inner.abort_transaction().await?;
        Ok(())
    }

    /// 드라이버는 `ClientSession`이 drop될 때 서버 세션을 풀로 돌려보냅니다.
    /// 실행기의 가드가 이 호출 직후 세션을 drop 합니다.
    fn end_session(&mut self) {
        debug!("🔚 MongoDB 세션 반환: {}", self.inner.id());
    }
}

#[async_trait]
impl SessionSource for Database {
    type Session = MongoSession;

    async fn open_session(&self) -> Result<MongoSession, StoreError> {
        let inner = self.client().start_session().await?;
        Ok(MongoSession { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_settings_map_to_majority_snapshot() {
        let options = TransactionOptions::from(&TransactionSettings::default());

        assert_eq!(options.read_concern, Some(ReadConcern::snapshot()));
        assert_eq!(
            options.write_concern.and_then(|wc| wc.w),
            Some(Acknowledgment::Majority)
        );
        assert_eq!(options.max_commit_time, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_node_acknowledgment_is_preserved() {
        let settings = TransactionSettings {
            write: WriteAcknowledgment::Nodes(2),
            read: ReadIsolation::Local,
            max_commit_time: Duration::from_secs(1),
        };
        let options = TransactionOptions::from(&settings);

        assert_eq!(options.read_concern, Some(ReadConcern::local()));
        assert_eq!(
            options.write_concern.and_then(|wc| wc.w),
            Some(Acknowledgment::Nodes(2))
        );
    }
}
