//! HTTP Basic 인증 백엔드 (RFC 7617)
//!
//! `Authorization: Basic base64(username:password)` 헤더를 디코딩하고
//! user loader로 사용자명/비밀번호를 검증합니다.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use serde_json::json;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AuthBackend;
use crate::services::auth::header::parse_auth_header;

/// (username, password) → Identity 조회 함수
pub type BasicUserLoader = dyn Fn(&str, &str) -> Option<Identity> + Send + Sync;

pub const DEFAULT_BASIC_PREFIX: &str = "Basic";

/// HTTP Basic 인증 백엔드
pub struct BasicAuthBackend {
    user_loader: Arc<BasicUserLoader>,
    auth_header_prefix: String,
}

impl BasicAuthBackend {
    pub fn new<F>(user_loader: F) -> Self
    where
        F: Fn(&str, &str) -> Option<Identity> + Send + Sync + 'static,
    {
        Self {
            user_loader: Arc::new(user_loader),
            auth_header_prefix: DEFAULT_BASIC_PREFIX.to_string(),
        }
    }

    /// bcrypt 해시 저장소로 검증하는 백엔드
    pub fn with_bcrypt(credentials: BcryptCredentials) -> Self {
        Self::new(move |username, password| credentials.verify(username, password))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_header_prefix = prefix.into();
        self
    }

    /// base64 자격 증명을 (username, password)로 분리
    fn decode_credentials(&self, encoded: &str) -> AppResult<(String, String)> {
        let prefix = &self.auth_header_prefix;
        let decode_error = || AppError::unauthorized("Unable to decode credentials", prefix);

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| decode_error())?;
        let decoded = String::from_utf8(bytes).map_err(|_| decode_error())?;

        // 비밀번호에는 ':'가 포함될 수 있으므로 첫 번째 ':'에서만 분리
        let (username, password) = decoded.split_once(':').ok_or_else(decode_error)?;

        Ok((username.to_string(), password.to_string()))
    }
}

impl AuthBackend for BasicAuthBackend {
    fn name(&self) -> &str {
        "basic"
    }

    fn authenticate(&self, req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
        let prefix = &self.auth_header_prefix;
        let encoded = parse_auth_header(req, prefix, prefix)?;
        let (username, password) = self.decode_credentials(encoded)?;

        (self.user_loader)(&username, &password)
            .ok_or_else(|| AppError::unauthorized("Invalid Username/Password", prefix))
    }
}

/// 사용자명 → bcrypt 해시 저장소
///
/// 저장소 자체는 생성 이후 읽기 전용입니다.
#[derive(Debug, Clone, Default)]
pub struct BcryptCredentials {
    hashes: HashMap<String, String>,
}

impl BcryptCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, bcrypt_hash: impl Into<String>) -> Self {
        self.hashes.insert(username.into(), bcrypt_hash.into());
        self
    }

    /// `user1:hash1,user2:hash2` 형식에서 생성 (bcrypt 해시는 ':'와 ','를 포함하지 않음)
    pub fn from_pairs(value: &str) -> Self {
        let hashes = value
            .split(',')
            .filter_map(|pair| pair.trim().split_once(':'))
            .filter(|(user, hash)| !user.is_empty() && !hash.is_empty())
            .map(|(user, hash)| (user.to_string(), hash.to_string()))
            .collect();

        Self { hashes }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// 비밀번호 검증 후 `{"username": ...}` Identity 반환
    pub fn verify(&self, username: &str, password: &str) -> Option<Identity> {
        let hash = self.hashes.get(username)?;

        match bcrypt::verify(password, hash) {
            Ok(true) => Some(Identity::new(json!({ "username": username }))),
            Ok(false) => None,
            Err(e) => {
                log::warn!("bcrypt 해시 검증 실패 (사용자: {}): {}", username, e);
                None
            }
        }
    }
}
