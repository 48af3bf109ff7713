//! JWT 인증 백엔드
//!
//! `Authorization: JWT {token}` 헤더의 JSON Web Token을 검증하고,
//! 검증된 클레임으로 user loader를 호출하여 Identity를 얻습니다.
//!
//! # 지원 알고리즘
//!
//! | 계열 | 알고리즘 | 키 |
//! |------|----------|----|
//! | HMAC | HS256, HS384, HS512 | 공유 비밀키 |
//! | RSA | RS256, RS384, RS512, PS256, PS384, PS512 | PEM 공개키 |
//! | ECDSA | ES256, ES384 | PEM 공개키 |
//! | EdDSA | EdDSA | PEM 공개키 |
//!
//! 키 형식이 알고리즘과 맞지 않으면 생성 시점에 `ConfigurationError`로 실패합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let backend = JwtAuthBackend::hmac(JwtConfig::secret(), Algorithm::HS256, claims_as_identity)?
//!     .with_leeway(30)
//!     .with_audience("api");
//! ```

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AuthBackend;
use crate::services::auth::header::parse_auth_header;

/// 검증된 클레임 → Identity 조회 함수
pub type JwtUserLoader = dyn Fn(&Value) -> Option<Identity> + Send + Sync;

pub const DEFAULT_JWT_PREFIX: &str = "JWT";

/// 기본 필수 클레임
pub const DEFAULT_REQUIRED_CLAIMS: [&str; 3] = ["exp", "iat", "nbf"];

/// 클레임 전체를 Identity로 사용하는 기본 user loader
pub fn claims_as_identity(claims: &Value) -> Option<Identity> {
    Some(Identity::new(claims.clone()))
}

/// JSON Web Token 인증 백엔드
pub struct JwtAuthBackend {
    user_loader: Arc<JwtUserLoader>,
    decoding_key: DecodingKey,
    validation: Validation,
    required_claims: Vec<String>,
    auth_header_prefix: String,
}

impl JwtAuthBackend {
    /// HMAC 공유 비밀키 기반 백엔드
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - HMAC 계열이 아닌 알고리즘
    pub fn hmac<F>(secret: impl AsRef<[u8]>, algorithm: Algorithm, user_loader: F) -> AppResult<Self>
    where
        F: Fn(&Value) -> Option<Identity> + Send + Sync + 'static,
    {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AppError::ConfigurationError(format!(
                "{:?} 알고리즘은 공유 비밀키로 검증할 수 없습니다",
                algorithm
            )));
        }

        Ok(Self::with_key(
            DecodingKey::from_secret(secret.as_ref()),
            algorithm,
            Arc::new(user_loader),
        ))
    }

    /// PEM 공개키 기반 백엔드 (RSA, ECDSA, EdDSA)
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - HMAC 알고리즘이거나 PEM 파싱 실패
    pub fn from_public_key_pem<F>(pem: &[u8], algorithm: Algorithm, user_loader: F) -> AppResult<Self>
    where
        F: Fn(&Value) -> Option<Identity> + Send + Sync + 'static,
    {
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(AppError::ConfigurationError(format!(
                    "{:?} 알고리즘은 공개키가 아닌 공유 비밀키가 필요합니다",
                    algorithm
                )));
            }
        }
        .map_err(|e| AppError::ConfigurationError(format!("JWT 공개키 파싱 실패: {}", e)))?;

        Ok(Self::with_key(decoding_key, algorithm, Arc::new(user_loader)))
    }

    fn with_key(decoding_key: DecodingKey, algorithm: Algorithm, user_loader: Arc<JwtUserLoader>) -> Self {
        let mut backend = Self {
            user_loader,
            decoding_key,
            validation: Validation::new(algorithm),
            required_claims: Vec::new(),
            auth_header_prefix: DEFAULT_JWT_PREFIX.to_string(),
        };
        backend.validation.leeway = 0;
        backend.validation.validate_nbf = true;
        // audience가 설정되지 않은 경우 aud 클레임은 검사하지 않음
        backend.validation.validate_aud = false;
        backend.with_required_claims(DEFAULT_REQUIRED_CLAIMS)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_header_prefix = prefix.into();
        self
    }

    /// exp/nbf 검증 시 허용하는 시계 오차 (초)
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }

    pub fn with_audience(mut self, audience: impl AsRef<str>) -> Self {
        self.validation.set_audience(&[audience.as_ref()]);
        self.validation.validate_aud = true;
        self
    }

    pub fn with_issuer(mut self, issuer: impl AsRef<str>) -> Self {
        self.validation.set_issuer(&[issuer.as_ref()]);
        self
    }

    /// 반드시 존재해야 하는 클레임 목록 (기본값: exp, iat, nbf)
    pub fn with_required_claims<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_claims = claims.into_iter().map(Into::into).collect();
        self.validation.set_required_spec_claims(&self.required_claims);
        self
    }

    pub fn required_claims(&self) -> &[String] {
        &self.required_claims
    }

    fn unauthorized(&self, detail: impl std::fmt::Display) -> AppError {
        AppError::unauthorized(
            format!("Invalid JWT Credentials: {}", detail),
            &self.auth_header_prefix,
        )
    }

    /// 서명과 시간 클레임을 검증하고 클레임을 반환
    fn decode_claims(&self, token: &str) -> AppResult<Value> {
        let claims = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| self.unauthorized(e))?;

        if let Some(missing) = self
            .required_claims
            .iter()
            .find(|claim| claims.get(claim.as_str()).is_none())
        {
            return Err(self.unauthorized(format!("missing required claim `{}`", missing)));
        }

        Ok(claims)
    }
}

impl AuthBackend for JwtAuthBackend {
    fn name(&self) -> &str {
        "jwt"
    }

    fn authenticate(&self, req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
        let prefix = &self.auth_header_prefix;
        let token = parse_auth_header(req, prefix, prefix)?;
        let claims = self.decode_claims(token)?;

        (self.user_loader)(&claims).ok_or_else(|| {
            log::debug!("JWT user loader가 사용자를 찾지 못했습니다");
            AppError::unauthorized("Invalid JWT Credentials", prefix)
        })
    }
}
