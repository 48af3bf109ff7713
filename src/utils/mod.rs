//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 설정 값 파싱을 위한 문자열 유틸리티

pub mod string_utils;
