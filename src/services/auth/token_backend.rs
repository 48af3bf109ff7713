//! 토큰 인증 백엔드
//!
//! `Authorization: {prefix} {token}` 헤더에서 토큰을 추출하고
//! user loader로 Identity를 조회합니다.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AuthBackend;
use crate::services::auth::header::parse_auth_header;

/// 토큰 → Identity 조회 함수
pub type TokenUserLoader = dyn Fn(&str) -> Option<Identity> + Send + Sync;

/// 기본 헤더 prefix
pub const DEFAULT_TOKEN_PREFIX: &str = "Bearer";

/// 정적 토큰 또는 사용자 정의 loader 기반 토큰 인증
///
/// # Examples
///
/// ```rust,ignore
/// // 알려진 토큰 목록으로 검증
/// let backend = TokenAuthBackend::with_tokens(["abc123"]);
///
/// // 사용자 정의 loader
/// let backend = TokenAuthBackend::new(|token| repo.find_by_token(token))
///     .with_prefix("Token");
/// ```
pub struct TokenAuthBackend {
    user_loader: Arc<TokenUserLoader>,
    auth_header_prefix: String,
}

impl TokenAuthBackend {
    pub fn new<F>(user_loader: F) -> Self
    where
        F: Fn(&str) -> Option<Identity> + Send + Sync + 'static,
    {
        Self {
            user_loader: Arc::new(user_loader),
            auth_header_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
        }
    }

    /// 고정된 토큰 집합을 허용하는 백엔드
    ///
    /// 인증에 성공하면 `{"token": <token>}` Identity를 반환합니다.
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known: HashSet<String> = tokens.into_iter().map(Into::into).collect();

        Self::new(move |token| {
            known
                .contains(token)
                .then(|| Identity::new(json!({ "token": token })))
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_header_prefix = prefix.into();
        self
    }

    pub fn auth_header_prefix(&self) -> &str {
        &self.auth_header_prefix
    }
}

impl AuthBackend for TokenAuthBackend {
    fn name(&self) -> &str {
        "token"
    }

    fn authenticate(&self, req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
        let prefix = &self.auth_header_prefix;
        let token = parse_auth_header(req, prefix, prefix)?;

        (self.user_loader)(token).ok_or_else(|| AppError::unauthorized("Invalid Token", prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::DefaultResource;
    use actix_web::http::Method;

    fn request(header: &str) -> AuthRequest {
        AuthRequest::new(Method::GET, "/items")
            .with_uri_template("/items")
            .with_authorization(header)
    }

    #[test]
    fn test_known_token_authenticates() {
        let backend = TokenAuthBackend::with_tokens(["abc123"]);

        let identity = backend
            .authenticate(&request("Bearer abc123"), &DefaultResource)
            .unwrap();

        assert_eq!(identity.get("token"), Some(&json!("abc123")));
    }

    #[test]
    fn test_unknown_token_is_unauthorized() {
        let backend = TokenAuthBackend::with_tokens(["abc123"]);

        let err = backend
            .authenticate(&request("Bearer wrong"), &DefaultResource)
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.challenges(), ["Bearer".to_string()]);
    }

    #[test]
    fn test_custom_prefix() {
        let backend = TokenAuthBackend::with_tokens(["abc123"]).with_prefix("Token");

        assert!(backend.authenticate(&request("Token abc123"), &DefaultResource).is_ok());
        assert!(backend.authenticate(&request("Bearer abc123"), &DefaultResource).is_err());
        assert_eq!(backend.auth_header_prefix(), "Token");
    }

    #[test]
    fn test_custom_loader() {
        let backend = TokenAuthBackend::new(|token| {
            token
                .strip_prefix("user-")
                .map(|id| Identity::new(json!({ "user_id": id })))
        });

        let identity = backend
            .authenticate(&request("Bearer user-42"), &DefaultResource)
            .unwrap();
        assert_eq!(identity.get("user_id"), Some(&json!("42")));
    }
}
