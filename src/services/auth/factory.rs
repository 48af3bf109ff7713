//! 환경 변수 기반 백엔드 구성
//!
//! `AUTH_BACKEND` 값에 따라 기본 백엔드를 생성합니다. `multi`는 설정이 존재하는
//! 모든 백엔드를 `token → basic → hawk → jwt → introspection` 순서로 묶습니다.

use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::config::{AuthEnvConfig, BackendKind, HawkConfig, IntrospectionConfig, JwtConfig};
use crate::core::{AppError, AppResult};
use crate::services::auth::backend::Backend;
use crate::services::auth::basic_backend::{BasicAuthBackend, BcryptCredentials};
use crate::services::auth::hawk_backend::{HawkAuthBackend, HawkCredentials};
use crate::services::auth::introspection_backend::IntrospectionAuthBackend;
use crate::services::auth::jwt_backend::{claims_as_identity, JwtAuthBackend};
use crate::services::auth::none_backend::NoneAuthBackend;
use crate::services::auth::token_backend::TokenAuthBackend;

/// 환경 변수로 기본 백엔드 생성
///
/// # Errors
///
/// * `AppError::ConfigurationError` - 키 형식 오류, 알 수 없는 알고리즘, 비어있는 multi 구성
pub fn backend_from_env() -> AppResult<Backend> {
    let kind = AuthEnvConfig::backend_kind();
    log::info!("기본 인증 백엔드: {}", kind.as_str());
    backend_for(kind)
}

pub fn backend_for(kind: BackendKind) -> AppResult<Backend> {
    match kind {
        BackendKind::Token => Ok(token_backend()),
        BackendKind::Basic => Ok(basic_backend()),
        BackendKind::Jwt => jwt_backend(),
        BackendKind::Hawk => Ok(hawk_backend()),
        BackendKind::None => {
            log::warn!("none 백엔드 사용 중: 모든 요청이 익명 사용자로 인증됩니다");
            Ok(Backend::blocking(NoneAuthBackend::anonymous()))
        }
        BackendKind::Multi => multi_backend(),
    }
}

fn token_backend() -> Backend {
    let tokens = AuthEnvConfig::static_tokens();
    if tokens.is_empty() {
        log::warn!("AUTH_TOKENS가 비어있습니다. 모든 토큰이 거부됩니다");
    }

    Backend::blocking(TokenAuthBackend::with_tokens(tokens).with_prefix(AuthEnvConfig::token_prefix()))
}

fn basic_backend() -> Backend {
    let credentials = BcryptCredentials::from_pairs(&AuthEnvConfig::basic_users());
    if credentials.is_empty() {
        log::warn!("BASIC_AUTH_USERS가 비어있습니다. 모든 사용자가 거부됩니다");
    }

    Backend::blocking(BasicAuthBackend::with_bcrypt(credentials))
}

fn hawk_backend() -> Backend {
    let credentials = HawkConfig::credentials()
        .into_iter()
        .map(|(id, key)| HawkCredentials::sha256(id, key));

    Backend::blocking(
        HawkAuthBackend::with_credentials(credentials)
            .with_timestamp_skew(HawkConfig::timestamp_skew_seconds()),
    )
}

fn jwt_backend() -> AppResult<Backend> {
    let name = JwtConfig::algorithm();
    let algorithm: Algorithm = name
        .parse()
        .map_err(|_| AppError::ConfigurationError(format!("지원하지 않는 JWT 알고리즘: {}", name)))?;

    let backend = match JwtConfig::public_key_path() {
        Some(path) => {
            let pem = std::fs::read(&path).map_err(|e| {
                AppError::ConfigurationError(format!("JWT 공개키 파일 읽기 실패 ({}): {}", path, e))
            })?;
            JwtAuthBackend::from_public_key_pem(&pem, algorithm, claims_as_identity)?
        }
        None => JwtAuthBackend::hmac(JwtConfig::secret(), algorithm, claims_as_identity)?,
    };

    let mut backend = backend
        .with_prefix(JwtConfig::auth_header_prefix())
        .with_leeway(JwtConfig::leeway_seconds());
    if let Some(audience) = JwtConfig::audience() {
        backend = backend.with_audience(audience);
    }
    if let Some(issuer) = JwtConfig::issuer() {
        backend = backend.with_issuer(issuer);
    }

    Ok(Backend::blocking(backend))
}

fn introspection_backend(endpoint: String) -> AppResult<Backend> {
    let timeout = Duration::from_secs(IntrospectionConfig::timeout_seconds());
    let mut backend = IntrospectionAuthBackend::with_timeout(endpoint, timeout)?
        .with_cache_ttl(Duration::from_secs(IntrospectionConfig::cache_ttl_seconds()));

    if let (Some(id), Some(secret)) = (
        IntrospectionConfig::client_id(),
        IntrospectionConfig::client_secret(),
    ) {
        backend = backend.with_client_credentials(id, secret);
    }

    Ok(Backend::suspending(backend))
}

fn multi_backend() -> AppResult<Backend> {
    let mut backends = Vec::new();

    if !AuthEnvConfig::static_tokens().is_empty() {
        backends.push(token_backend());
    }
    if !AuthEnvConfig::basic_users().trim().is_empty() {
        backends.push(basic_backend());
    }
    if !HawkConfig::credentials().is_empty() {
        backends.push(hawk_backend());
    }
    if std::env::var("JWT_SECRET").is_ok() || JwtConfig::public_key_path().is_some() {
        backends.push(jwt_backend()?);
    }
    if let Some(endpoint) = IntrospectionConfig::endpoint() {
        backends.push(introspection_backend(endpoint)?);
    }

    let names: Vec<&str> = backends.iter().map(Backend::name).collect();
    log::info!("multi 백엔드 구성: [{}]", names.join(", "));

    Backend::multi(backends)
}
