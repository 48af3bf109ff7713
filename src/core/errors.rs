//! # Authentication Error Handling
//!
//! 인증 미들웨어 전역에서 사용하는 에러 타입입니다.
//! `thiserror`로 `Error` trait을 구현하고 `actix_web::ResponseError`를 구현하여
//! 전송 계층(HTTP)의 응답으로 자동 변환됩니다.
//!
//! ## 에러 분류
//!
//! | AppError | 발생 시점 | HTTP Status |
//! |----------|-----------|-------------|
//! | `ConfigurationError` | 미들웨어/백엔드 생성 시점 | 500 Internal Server Error |
//! | `Unauthorized` | 요청 처리 중 (백엔드 인증 실패) | 401 Unauthorized |
//! | `InternalError` | 예상하지 못한 시스템 오류 | 500 Internal Server Error |
//!
//! ## 전파 정책
//!
//! - 백엔드가 반환할 수 있는 유일한 에러는 `Unauthorized` 입니다.
//! - `MultiAuthBackend`와 디스패처는 `Unauthorized`를 수정 없이 전파합니다.
//! - WebSocket 같은 양방향 연결의 진입점에서는 `Unauthorized`를 삼키고
//!   연결 핸들러가 종료 코드를 결정하도록 위임합니다.
//! - 재시도는 하지 않습니다. 인증은 일시적 실패를 전제로 하는 연산이 아닙니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! fn load_user(token: &str) -> AppResult<Identity> {
//!     lookup(token).ok_or_else(|| {
//!         AppError::unauthorized("Invalid Token", "Bearer realm=\"api\"")
//!     })
//! }
//! ```

use actix_web::http::header;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 인증 계층에서 발생할 수 있는 에러를 포괄하는 열거형입니다.
/// 설정 에러는 생성 시점에 즉시 실패(fail-fast)하며, 요청 단위 에러는
/// `Unauthorized` 하나뿐입니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 설정 에러
    ///
    /// 미들웨어나 백엔드를 생성할 때 계약을 만족하지 못하는 값이 주어진 경우입니다.
    ///
    /// # 발생 시나리오
    /// - 블로킹 모드 미들웨어에 비동기(suspending) 백엔드를 기본값으로 지정
    /// - 비어있는 백엔드 목록으로 `MultiAuthBackend` 생성
    /// - 파싱할 수 없는 JWT 키 (PEM 형식 오류)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    ///
    /// 자격 증명이 없거나, 형식이 잘못되었거나, 검증에 실패한 경우입니다.
    /// `challenges`는 `WWW-Authenticate` 헤더로 전달됩니다.
    ///
    /// # 예제
    /// ```rust,ignore
    /// let claims = decode(token).map_err(|e| AppError::Unauthorized {
    ///     description: format!("Invalid JWT Credentials: {}", e),
    ///     challenges: vec!["JWT realm=\"api\"".to_string()],
    /// })?;
    /// ```
    #[error("Authentication error: {description}")]
    Unauthorized {
        description: String,
        challenges: Vec<String>,
    },

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 단일 challenge를 갖는 `Unauthorized` 에러를 생성합니다.
    pub fn unauthorized(description: impl Into<String>, challenge: impl Into<String>) -> Self {
        AppError::Unauthorized {
            description: description.into(),
            challenges: vec![challenge.into()],
        }
    }

    /// challenge 없는 `Unauthorized` 에러를 생성합니다.
    pub fn unauthorized_without_challenge(description: impl Into<String>) -> Self {
        AppError::Unauthorized {
            description: description.into(),
            challenges: Vec::new(),
        }
    }

    /// 인증 실패 에러인지 확인
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized { .. })
    }

    /// `Unauthorized` 에러의 challenge 목록 (그 외에는 빈 슬라이스)
    pub fn challenges(&self) -> &[String] {
        match self {
            AppError::Unauthorized { challenges, .. } => challenges,
            _ => &[],
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 모든 에러 응답은 다음 JSON 형식을 따릅니다:
    ///
    /// ```json
    /// {
    ///   "error": "Human readable error message"
    /// }
    /// ```
    ///
    /// `Unauthorized`의 경우 challenge 목록을 `, `로 연결하여
    /// `WWW-Authenticate` 헤더에 담습니다. 설정 에러의 상세 내용은
    /// 클라이언트에 노출하지 않습니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let mut builder = actix_web::HttpResponse::build(self.status_code());

        match self {
            AppError::Unauthorized { description, challenges } => {
                if !challenges.is_empty() {
                    builder.insert_header((header::WWW_AUTHENTICATE, challenges.join(", ")));
                }
                builder.json(serde_json::json!({
                    "error": "401 Unauthorized",
                    "description": description,
                }))
            }
            _ => {
                log::error!("요청 처리 중 내부 오류: {}", self);
                builder.json(serde_json::json!({
                    "error": "500 Internal Server Error"
                }))
            }
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
