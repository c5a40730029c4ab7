//! 병원 백오피스 서비스 백엔드
//!
//! 계정, 의사, 진료 예약을 관리하는 REST API입니다.
//! 여러 문서를 건드리는 변경은 재시도 한도가 있는 트랜잭션 실행기로,
//! 접근 제어는 HS256 JWT 토큰 발급기와 인증 미들웨어로 처리합니다.
//!
//! # Features
//!
//! - **계정**: 환자 회원가입, 관리자 계정 생성, bcrypt 비밀번호
//! - **JWT 인증**: 상태 없는 액세스 토큰, 로그인/관리자 게이트
//! - **의사/예약 관리**: 이름 검색, 정원 제한 예약, 의사 삭제 시 예약 연쇄 삭제
//! - **트랜잭션**: 커밋/롤백 재시도와 전체 제한 시간
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + 인증 게이트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 트랜잭션 경계
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스 (세션 전달)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 레플리카 셋
//! └─────────────────┘
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
