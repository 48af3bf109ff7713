//! 원격 토큰 검증(Token Introspection, RFC 7662) 백엔드
//!
//! Bearer 토큰을 인가 서버의 introspection 엔드포인트로 보내 활성 여부를 확인하는
//! suspending 백엔드입니다. 네트워크 응답을 기다리는 동안 워커를 점유하지 않습니다.
//!
//! # 동작
//!
//! 1. `Authorization: Bearer {token}` 헤더에서 토큰 추출
//! 2. 캐시에 유효한 결과가 있으면 즉시 반환
//! 3. `POST {endpoint}` (`token={token}`, 선택적으로 클라이언트 Basic 인증)
//! 4. 응답 JSON의 `active`가 `true`이면 응답 전체를 Identity로 사용하고 캐시에 저장
//!
//! 타임아웃, 연결 실패, 비정상 상태 코드는 모두 `Unauthorized`로 변환됩니다.
//! 디스패처는 별도의 타임아웃을 두지 않습니다.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AsyncAuthBackend;
use crate::services::auth::header::parse_auth_header;
use crate::services::auth::token_backend::DEFAULT_TOKEN_PREFIX;

pub const DEFAULT_INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_INTROSPECTION_CACHE_TTL: Duration = Duration::from_secs(60);

struct CachedIdentity {
    identity: Identity,
    expires_at: Instant,
}

/// RFC 7662 토큰 introspection 백엔드
pub struct IntrospectionAuthBackend {
    client: reqwest::Client,
    endpoint: String,
    client_credentials: Option<(String, String)>,
    auth_header_prefix: String,
    cache_ttl: Duration,
    cache: RwLock<HashMap<String, CachedIdentity>>,
}

impl IntrospectionAuthBackend {
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - HTTP 클라이언트 생성 실패
    pub fn new(endpoint: impl Into<String>) -> AppResult<Self> {
        Self::with_timeout(endpoint, DEFAULT_INTROSPECTION_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            client_credentials: None,
            auth_header_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            cache_ttl: DEFAULT_INTROSPECTION_CACHE_TTL,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// introspection 엔드포인트 호출 시 사용할 클라이언트 자격 증명
    pub fn with_client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_credentials = Some((client_id.into(), client_secret.into()));
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_header_prefix = prefix.into();
        self
    }

    /// 캐시 유효 시간 (0이면 캐시 비활성화)
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn unauthorized(&self, description: impl Into<String>) -> AppError {
        AppError::unauthorized(description, &self.auth_header_prefix)
    }

    fn cached(&self, token: &str) -> Option<Identity> {
        let cache = self.cache.read().ok()?;
        cache
            .get(token)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.identity.clone())
    }

    /// 캐시 보관 시간: TTL과 응답 `exp`까지 남은 시간 중 짧은 쪽
    fn cache_lifetime(&self, identity: &Identity, now_unix: i64) -> Duration {
        match identity.get("exp").and_then(Value::as_i64) {
            Some(exp) => {
                let remaining = Duration::from_secs(u64::try_from(exp.saturating_sub(now_unix)).unwrap_or(0));
                self.cache_ttl.min(remaining)
            }
            None => self.cache_ttl,
        }
    }

    fn remember(&self, token: &str, identity: &Identity) {
        let lifetime = self.cache_lifetime(identity, Utc::now().timestamp());
        if lifetime.is_zero() {
            return;
        }

        if let Ok(mut cache) = self.cache.write() {
            let now = Instant::now();
            cache.retain(|_, entry| entry.expires_at > now);
            cache.insert(
                token.to_string(),
                CachedIdentity {
                    identity: identity.clone(),
                    expires_at: now + lifetime,
                },
            );
        }
    }

    async fn introspect(&self, token: &str) -> AppResult<Identity> {
        let mut request = self.client.post(&self.endpoint).form(&[("token", token)]);
        if let Some((client_id, client_secret)) = &self.client_credentials {
            request = request.basic_auth(client_id, Some(client_secret));
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("토큰 introspection 요청 실패: {}", e);
            self.unauthorized("Token introspection failed")
        })?;

        if !response.status().is_success() {
            log::warn!("토큰 introspection 응답 상태 비정상: {}", response.status());
            return Err(self.unauthorized("Token introspection failed"));
        }

        let body: Value = response.json().await.map_err(|e| {
            log::warn!("토큰 introspection 응답 파싱 실패: {}", e);
            self.unauthorized("Token introspection failed")
        })?;

        active_identity(body).ok_or_else(|| self.unauthorized("Inactive Token"))
    }
}

/// `active: true` 응답만 Identity로 인정
fn active_identity(body: Value) -> Option<Identity> {
    let active = body.get("active").and_then(Value::as_bool).unwrap_or(false);
    active.then(|| Identity::new(body))
}

#[async_trait]
impl AsyncAuthBackend for IntrospectionAuthBackend {
    fn name(&self) -> &str {
        "introspection"
    }

    async fn authenticate(
        &self,
        req: &AuthRequest,
        _resource: &dyn Resource,
    ) -> AppResult<Identity> {
        let prefix = &self.auth_header_prefix;
        let token = parse_auth_header(req, prefix, prefix)?;

        if let Some(identity) = self.cached(token) {
            log::debug!("introspection 캐시 적중");
            return Ok(identity);
        }

        let identity = self.introspect(token).await?;
        self.remember(token, &identity);
        Ok(identity)
    }
}
