//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 입력 문자열 정리, 이메일 정규화, 정규식 이스케이프

pub mod string_utils;
