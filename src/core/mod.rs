//! # Core Framework Module
//!
//! 서비스 전반이 공유하는 두 가지 기반 기능을 제공합니다.
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 싱글톤 인스턴스 보관 및 조회
//! - **자동 레지스트리**: `inventory` 기반으로 `#[service]`/`#[repository]` 수집
//! - **수동 등록**: `Database`, `TokenAuthority`, `AppConfig` 같은 인프라 값
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **변환**: 트랜잭션/토큰 에러를 사용자 노출용 에러로 매핑
//!
//! ## 애플리케이션 초기화
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hospital_backend::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(Arc::new(config));
//! ServiceLocator::set(database);
//! ServiceLocator::set(token_authority);
//!
//! // 리포지토리 → 서비스 순서로 싱글톤 생성
//! ServiceLocator::initialize_all().await?;
//! ```

pub mod errors;
pub mod registry;

pub use errors::{AppError, AppResult, ErrorContext};
