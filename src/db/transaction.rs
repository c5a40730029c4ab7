//! # Transaction Executor
//!
//! 작업 단위(unit of work)를 하나의 세션과 트랜잭션 안에서 실행하고,
//! 성공하면 커밋, 실패하면 롤백합니다. 커밋/롤백 단계는 일시적인
//! 네트워크 오류에 대비해 제한된 횟수만큼 재시도합니다.
//!
//! ## 실행 순서
//!
//! ```text
//! open_session ──✗──▶ SessionStart (재시도 없음)
//!      │
//! start_transaction ──✗──▶ TransactionStart (재시도 없음)
//!      │
//! work(&mut session)
//!      ├─ Ok  ──▶ commit × (N+1) ──✗──▶ CommitExhausted
//!      └─ Err ──▶ abort  × (N+1) ──✗──▶ AbortExhausted (작업 에러 포함)
//!                        └─ Ok ──▶ WorkFailed (작업 에러 그대로)
//!      │
//! end_session  (모든 경로에서 정확히 한 번, 취소 시에도)
//! ```
//!
//! 작업 클로저는 실행기가 소유한 세션을 `&mut`로 빌려 받습니다.
//! 세션을 복사하거나 새로 열지 않으므로 작업 안의 모든 읽기/쓰기가
//! 같은 트랜잭션에 묶입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let repo = self.doctor_repo.clone();
//! let policy = self.config.transaction.policy();
//!
//! let doctor_id = run_with_policy(&*self.db, &policy, move |session| {
//!     Box::pin(async move {
//!         if repo.exists_by_name(&first, &last, session.client_session()).await? {
//!             return Err(AppError::ConflictError("이미 등록된 의사입니다".into()));
//!         }
//!         repo.insert(&doctor, session.client_session()).await?;
//!         Ok(doctor.doctor_id)
//!     })
//! })
//! .await?;
//! ```

use std::time::Duration;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use log::{debug, warn};
use thiserror::Error;

/// 저장소 드라이버가 돌려주는 에러
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// 쓰기 확인 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAcknowledgment {
    /// 레플리카 과반수 확인
    Majority,
    /// 지정된 노드 수 확인
    Nodes(u32),
}

/// 트랜잭션 안의 읽기 격리 수준
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadIsolation {
    /// 시작 시점의 일관된 스냅샷
    Snapshot,
    Majority,
    Local,
}

/// 트랜잭션 시작 옵션
///
/// 기본값은 과반수 쓰기 확인, 스냅샷 읽기, 커밋 최대 5초입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionSettings {
    pub write: WriteAcknowledgment,
    pub read: ReadIsolation,
    pub max_commit_time: Duration,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            write: WriteAcknowledgment::Majority,
            read: ReadIsolation::Snapshot,
            max_commit_time: Duration::from_secs(5),
        }
    }
}

/// 한 번의 실행에 적용할 정책 (옵션, 재시도 횟수, 전체 제한 시간)
#[derive(Debug, Clone)]
pub struct TransactionPolicy {
    pub settings: TransactionSettings,
    /// 1 미만이면 1로 보정됩니다.
    pub max_retries: i32,
    /// 세션 열기부터 커밋/롤백까지 전체에 적용되는 제한 시간
    pub deadline: Option<Duration>,
}

impl TransactionPolicy {
    pub fn with_retries(max_retries: i32) -> Self {
        Self {
            settings: TransactionSettings::default(),
            max_retries,
            deadline: None,
        }
    }
}

/// 커밋/롤백 단계의 제한된 재시도 정책
///
/// `max_retries = N`이면 최대 `N + 1`번 시도합니다. N이 1 미만이면 1로 봅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub const MIN_RETRIES: u32 = 1;

    pub fn new(max_retries: i32) -> Self {
        let max_retries = u32::try_from(max_retries)
            .unwrap_or(Self::MIN_RETRIES)
            .max(Self::MIN_RETRIES);
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// 첫 성공에서 즉시 멈추고 사용한 시도 횟수를 돌려줍니다.
    /// 모두 실패하면 시도 횟수와 마지막 에러를 돌려줍니다.
    pub async fn run<S, F>(
        &self,
        operation: &str,
        session: &mut S,
        mut attempt_once: F,
    ) -> Result<u32, (u32, StoreError)>
    where
        S: ?Sized,
        F: for<'s> FnMut(&'s mut S) -> BoxFuture<'s, Result<(), StoreError>>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            match attempt_once(&mut *session).await {
                Ok(()) => {
                    if attempt > 1 {
                        debug!("🔁 {} 성공 ({}/{}번째 시도)", operation, attempt, max_attempts);
                    }
                    return Ok(attempt);
                }
                Err(error) if attempt >= max_attempts => return Err((attempt, error)),
                Err(error) => {
                    warn!("⚠️ {} 실패 ({}/{}): {}", operation, attempt, max_attempts, error);
                    attempt += 1;
                }
            }
        }
    }
}

/// 트랜잭션 실행 실패
///
/// 세션/트랜잭션 시작 실패는 재시도하지 않고, 커밋/롤백만 재시도 후 보고합니다.
#[derive(Debug, Error)]
pub enum TransactionError<E> {
    #[error("session could not be opened: {0}")]
    SessionStart(#[source] StoreError),

    #[error("transaction could not be started: {0}")]
    TransactionStart(#[source] StoreError),

    /// 작업 단위가 실패했고 롤백은 성공함
    #[error("unit of work failed: {0}")]
    WorkFailed(E),

    #[error("commit failed after {attempts} attempts: {source}")]
    CommitExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    /// 작업 단위가 실패했고 롤백도 재시도 끝에 실패함. 두 원인을 모두 보존합니다.
    #[error("abort failed after {attempts} attempts: {source} (unit of work error: {work_error})")]
    AbortExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
        work_error: E,
    },

    #[error("transaction exceeded its deadline of {0:?}")]
    DeadlineElapsed(Duration),
}

impl<E> TransactionError<E> {
    /// 작업 단위가 돌려준 에러 (실패했다면)
    pub fn work_error(&self) -> Option<&E> {
        match self {
            TransactionError::WorkFailed(e) => Some(e),
            TransactionError::AbortExhausted { work_error, .. } => Some(work_error),
            _ => None,
        }
    }

    /// 세션 또는 트랜잭션을 시작하지 못한 경우
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(
            self,
            TransactionError::SessionStart(_) | TransactionError::TransactionStart(_)
        )
    }
}

/// 트랜잭션을 지원하는 세션
#[async_trait]
pub trait TransactionSession: Send {
    async fn start_transaction(&mut self, settings: &TransactionSettings) -> Result<(), StoreError>;

    async fn commit_transaction(&mut self) -> Result<(), StoreError>;

    async fn abort_transaction(&mut self) -> Result<(), StoreError>;

    /// 세션 자원을 반환합니다. 실행기가 실행마다 정확히 한 번 호출합니다.
    fn end_session(&mut self);
}

/// 세션을 만들어 주는 데이터베이스 핸들
#[async_trait]
pub trait SessionSource: Send + Sync {
    type Session: TransactionSession;

    async fn open_session(&self) -> Result<Self::Session, StoreError>;
}

/// 스코프를 벗어날 때 세션을 종료합니다.
///
/// 정상 반환, 에러 반환, 퓨처 취소(drop), 패닉 모두 같은 경로로 정리됩니다.
struct SessionGuard<S: TransactionSession> {
    session: S,
}

impl<S: TransactionSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.end_session();
        debug!("🔒 트랜잭션 세션 종료");
    }
}

/// 기본 옵션과 주어진 재시도 횟수로 작업 단위를 실행합니다.
pub async fn run_in_transaction<P, T, E, F>(
    source: &P,
    max_retries: i32,
    work: F,
) -> Result<T, TransactionError<E>>
where
    P: SessionSource + ?Sized,
    F: for<'s> FnOnce(&'s mut P::Session) -> BoxFuture<'s, Result<T, E>>,
{
    execute(source, &TransactionSettings::default(), RetryPolicy::new(max_retries), work).await
}

/// 정책의 옵션, 재시도 횟수, 제한 시간을 적용해 작업 단위를 실행합니다.
///
/// 제한 시간이 지나면 진행 중인 단계를 버리고 `DeadlineElapsed`를 돌려줍니다.
/// 이때도 세션은 가드에 의해 종료됩니다.
pub async fn run_with_policy<P, T, E, F>(
    source: &P,
    policy: &TransactionPolicy,
    work: F,
) -> Result<T, TransactionError<E>>
where
    P: SessionSource + ?Sized,
    F: for<'s> FnOnce(&'s mut P::Session) -> BoxFuture<'s, Result<T, E>>,
{
    let retry = RetryPolicy::new(policy.max_retries);
    let execution = execute(source, &policy.settings, retry, work);

    match policy.deadline {
        Some(deadline) => actix_web::rt::time::timeout(deadline, execution)
            .await
            .map_err(|_| {
                warn!("⏱️ 트랜잭션 제한 시간 초과: {:?}", deadline);
                TransactionError::DeadlineElapsed(deadline)
            })?,
        None => execution.await,
    }
}

async fn execute<P, T, E, F>(
    source: &P,
    settings: &TransactionSettings,
    retry: RetryPolicy,
    work: F,
) -> Result<T, TransactionError<E>>
where
    P: SessionSource + ?Sized,
    F: for<'s> FnOnce(&'s mut P::Session) -> BoxFuture<'s, Result<T, E>>,
{
    let session = source
        .open_session()
        .await
        .map_err(TransactionError::SessionStart)?;
    let mut guard = SessionGuard { session };

    guard
        .session
        .start_transaction(settings)
        .await
        .map_err(TransactionError::TransactionStart)?;
    debug!("🔓 트랜잭션 시작: {:?}", settings);

    match work(&mut guard.session).await {
        Ok(value) => {
            retry
                .run("commit", &mut guard.session, |s| s.commit_transaction())
                .await
                .map_err(|(attempts, source)| TransactionError::CommitExhausted { attempts, source })?;
            Ok(value)
        }
        Err(work_error) => {
            match retry
                .run("abort", &mut guard.session, |s| s.abort_transaction())
                .await
            {
                Ok(_) => Err(TransactionError::WorkFailed(work_error)),
                Err((attempts, source)) => Err(TransactionError::AbortExhausted {
                    attempts,
                    source,
                    work_error,
                }),
            }
        }
    }
}
