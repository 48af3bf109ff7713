//! Hawk 인증 백엔드
//!
//! Hawk HTTP 인증 스킴의 요청 헤더를 검증합니다.
//!
//! ```text
//! Authorization: Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2",
//!                ext="some-app-ext-data", mac="6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE="
//! ```
//!
//! 서버는 아래 정규화 문자열을 공유 키로 HMAC 서명하여 `mac`과 비교합니다.
//!
//! ```text
//! hawk.1.header\n{ts}\n{nonce}\n{METHOD}\n{resource}\n{host}\n{port}\n{hash}\n{ext}\n
//! ```
//!
//! # 제한 사항
//!
//! - `sha256` 알고리즘만 지원합니다.
//! - `hash` 속성은 MAC 계산에 포함되지만, 미들웨어 단계에서는 본문을 읽지 않으므로
//!   페이로드 해시 자체는 검증하지 않습니다.
//! - nonce 재사용 검사는 하지 않습니다. 타임스탬프 허용 범위로만 재전송을 제한합니다.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AuthBackend;

type HmacSha256 = Hmac<Sha256>;

pub const HAWK_PREFIX: &str = "Hawk";

/// 기본 타임스탬프 허용 오차 (초)
pub const DEFAULT_TIMESTAMP_SKEW_SECONDS: i64 = 60;

const HAWK_ATTRIBUTES: [&str; 8] = ["id", "ts", "nonce", "hash", "ext", "mac", "app", "dlg"];

/// Hawk 자격 증명
#[derive(Debug, Clone, PartialEq)]
pub struct HawkCredentials {
    pub id: String,
    pub key: String,
    pub algorithm: String,
}

impl HawkCredentials {
    pub fn sha256(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            algorithm: "sha256".to_string(),
        }
    }
}

/// 자격 증명 id → 자격 증명 조회 함수
pub type HawkCredentialsLoader = dyn Fn(&str) -> Option<HawkCredentials> + Send + Sync;

/// 자격 증명 id → Identity 조회 함수
pub type HawkUserLoader = dyn Fn(&str) -> Option<Identity> + Send + Sync;

/// 서명 대상 요청 정보
#[derive(Debug, Clone)]
pub struct HawkArtifacts<'a> {
    pub ts: &'a str,
    pub nonce: &'a str,
    pub method: &'a str,
    pub resource: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub hash: &'a str,
    pub ext: &'a str,
    pub app: Option<&'a str>,
    pub dlg: Option<&'a str>,
}

impl HawkArtifacts<'_> {
    /// `hawk.1.header` 정규화 문자열
    pub fn normalized_string(&self) -> String {
        let mut normalized = format!(
            "hawk.1.header\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
            self.ts,
            self.nonce,
            self.method.to_ascii_uppercase(),
            self.resource,
            self.host.to_ascii_lowercase(),
            self.port,
            self.hash,
            escape_ext(self.ext),
        );

        if let Some(app) = self.app {
            normalized.push_str(app);
            normalized.push('\n');
            normalized.push_str(self.dlg.unwrap_or_default());
            normalized.push('\n');
        }

        normalized
    }
}

fn escape_ext(ext: &str) -> String {
    ext.replace('\\', "\\\\").replace('\n', "\\n")
}

/// 정규화 문자열의 HMAC-SHA256 MAC (base64)
pub fn compute_mac(key: &str, artifacts: &HawkArtifacts<'_>) -> AppResult<String> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::InternalError(format!("Hawk MAC 초기화 실패: {}", e)))?;
    mac.update(artifacts.normalized_string().as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// `key="value", ...` 형식의 Hawk 속성 파싱
fn parse_attributes(input: &str) -> Result<HashMap<&str, &str>, &'static str> {
    let mut attributes = HashMap::new();
    let mut rest = input.trim();

    while !rest.is_empty() {
        let (key, after_key) = rest.split_once('=').ok_or("Bad header format")?;
        let key = key.trim();

        if !HAWK_ATTRIBUTES.contains(&key) {
            return Err("Unknown attribute");
        }

        let after_quote = after_key.trim_start().strip_prefix('"').ok_or("Bad header format")?;
        let (value, after_value) = after_quote.split_once('"').ok_or("Bad header format")?;

        if attributes.insert(key, value).is_some() {
            return Err("Duplicate attribute");
        }

        rest = after_value.trim_start();
        rest = rest.strip_prefix(',').unwrap_or(rest).trim_start();
    }

    Ok(attributes)
}

/// Hawk 요청 서명 검증 백엔드
pub struct HawkAuthBackend {
    credentials_loader: Arc<HawkCredentialsLoader>,
    user_loader: Arc<HawkUserLoader>,
    timestamp_skew_seconds: i64,
}

impl HawkAuthBackend {
    pub fn new<C, U>(credentials_loader: C, user_loader: U) -> Self
    where
        C: Fn(&str) -> Option<HawkCredentials> + Send + Sync + 'static,
        U: Fn(&str) -> Option<Identity> + Send + Sync + 'static,
    {
        Self {
            credentials_loader: Arc::new(credentials_loader),
            user_loader: Arc::new(user_loader),
            timestamp_skew_seconds: DEFAULT_TIMESTAMP_SKEW_SECONDS,
        }
    }

    /// 고정된 자격 증명 목록으로 검증하고 `{"id": ...}` Identity를 반환
    pub fn with_credentials<I>(credentials: I) -> Self
    where
        I: IntoIterator<Item = HawkCredentials>,
    {
        let by_id: HashMap<String, HawkCredentials> = credentials
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        Self::new(
            move |id| by_id.get(id).cloned(),
            |id| Some(Identity::new(json!({ "id": id }))),
        )
    }

    pub fn with_timestamp_skew(mut self, seconds: i64) -> Self {
        self.timestamp_skew_seconds = seconds;
        self
    }

    fn unauthorized(description: impl Into<String>) -> AppError {
        AppError::unauthorized(description, HAWK_PREFIX)
    }

    fn verify(&self, req: &AuthRequest, now: i64) -> AppResult<Identity> {
        let header = req
            .header("authorization")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Self::unauthorized("Missing Authorization Header"))?;

        let (scheme, params) = header.split_once(' ').unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case(HAWK_PREFIX) {
            return Err(Self::unauthorized(format!(
                "Invalid Authorization Header: Must start with {}",
                HAWK_PREFIX
            )));
        }

        let attributes = parse_attributes(params).map_err(Self::unauthorized)?;
        let required = |name: &str| {
            attributes
                .get(name)
                .copied()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Self::unauthorized(format!("Missing attribute: {}", name)))
        };

        let id = required("id")?;
        let ts = required("ts")?;
        let nonce = required("nonce")?;
        let provided_mac = required("mac")?;

        let credentials = (self.credentials_loader)(id)
            .ok_or_else(|| Self::unauthorized("Unknown credentials"))?;
        if !credentials.algorithm.eq_ignore_ascii_case("sha256") {
            return Err(Self::unauthorized("Unsupported algorithm"));
        }

        let timestamp: i64 = ts.parse().map_err(|_| Self::unauthorized("Invalid timestamp"))?;
        if now.abs_diff(timestamp) > self.timestamp_skew_seconds.unsigned_abs() {
            return Err(Self::unauthorized("Stale timestamp"));
        }

        let resource = req.resource_uri();
        let artifacts = HawkArtifacts {
            ts,
            nonce,
            method: req.method().as_str(),
            resource: &resource,
            host: req.host(),
            port: req.port(),
            hash: attributes.get("hash").copied().unwrap_or_default(),
            ext: attributes.get("ext").copied().unwrap_or_default(),
            app: attributes.get("app").copied(),
            dlg: attributes.get("dlg").copied(),
        };

        let provided = base64::engine::general_purpose::STANDARD
            .decode(provided_mac)
            .map_err(|_| Self::unauthorized("Bad mac"))?;

        let mut mac = HmacSha256::new_from_slice(credentials.key.as_bytes())
            .map_err(|e| AppError::InternalError(format!("Hawk MAC 초기화 실패: {}", e)))?;
        mac.update(artifacts.normalized_string().as_bytes());
        // verify_slice는 상수 시간 비교
        mac.verify_slice(&provided)
            .map_err(|_| Self::unauthorized("Bad mac"))?;

        (self.user_loader)(&credentials.id)
            .ok_or_else(|| Self::unauthorized("Invalid Hawk Credentials"))
    }
}

impl AuthBackend for HawkAuthBackend {
    fn name(&self) -> &str {
        "hawk"
    }

    fn authenticate(&self, req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
        self.verify(req, Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::DefaultResource;
    use actix_web::http::Method;

    const KEY: &str = "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn";

    fn readme_request() -> AuthRequest {
        AuthRequest::new(Method::GET, "/resource/1")
            .with_query("b=1&a=2")
            .with_host("example.com", 8000)
    }

    fn readme_artifacts(resource: &str) -> HawkArtifacts<'_> {
        HawkArtifacts {
            ts: "1353832234",
            nonce: "j4h3g2",
            method: "GET",
            resource,
            host: "example.com",
            port: 8000,
            hash: "",
            ext: "some-app-ext-data",
            app: None,
            dlg: None,
        }
    }

    fn backend() -> HawkAuthBackend {
        HawkAuthBackend::with_credentials([HawkCredentials::sha256("dh37fgj492je", KEY)])
    }

    #[test]
    fn test_reference_mac() {
        let mac = compute_mac(KEY, &readme_artifacts("/resource/1?b=1&a=2")).unwrap();
        assert_eq!(mac, "6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=");
    }

    #[test]
    fn test_reference_header_verifies() {
        let req = readme_request().with_authorization(
            r#"Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2", ext="some-app-ext-data", mac="6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=""#,
        );

        let identity = backend().verify(&req, 1353832234).unwrap();
        assert_eq!(identity.get("id"), Some(&json!("dh37fgj492je")));
    }

    #[test]
    fn test_current_request_authenticates() {
        let ts = Utc::now().timestamp().to_string();
        let mut artifacts = readme_artifacts("/resource/1?b=1&a=2");
        artifacts.ts = &ts;
        let mac = compute_mac(KEY, &artifacts).unwrap();

        let req = readme_request().with_authorization(&format!(
            r#"Hawk id="dh37fgj492je", ts="{}", nonce="j4h3g2", ext="some-app-ext-data", mac="{}""#,
            ts, mac
        ));

        assert!(backend().authenticate(&req, &DefaultResource).is_ok());
    }

    #[test]
    fn test_tampered_request_rejected() {
        let req = AuthRequest::new(Method::POST, "/resource/1")
            .with_query("b=1&a=2")
            .with_host("example.com", 8000)
            .with_authorization(
                r#"Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2", ext="some-app-ext-data", mac="6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=""#,
            );

        let err = backend().verify(&req, 1353832234).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Bad mac", "Hawk"));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let req = readme_request().with_authorization(
            r#"Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2", ext="some-app-ext-data", mac="6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=""#,
        );

        let err = backend().verify(&req, 1353832234 + 61).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Stale timestamp", "Hawk"));
    }

    #[test]
    fn test_extreme_timestamp_is_stale() {
        for ts in [i64::MIN, i64::MAX] {
            let req = readme_request().with_authorization(&format!(
                r#"Hawk id="dh37fgj492je", ts="{}", nonce="j4h3g2", mac="6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=""#,
                ts
            ));

            let err = backend().verify(&req, 1353832234).unwrap_err();
            assert_eq!(err, AppError::unauthorized("Stale timestamp", "Hawk"));
        }
    }

    #[test]
    fn test_unknown_id_and_missing_attributes() {
        let req = readme_request()
            .with_authorization(r#"Hawk id="nobody", ts="1353832234", nonce="j4h3g2", mac="abc=""#);
        let err = backend().verify(&req, 1353832234).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Unknown credentials", "Hawk"));

        let req = readme_request().with_authorization(r#"Hawk id="dh37fgj492je", ts="1353832234""#);
        let err = backend().verify(&req, 1353832234).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Missing attribute: nonce", "Hawk"));
    }

    #[test]
    fn test_blank_header_is_missing() {
        let req = readme_request().with_authorization(" ");

        let err = backend().verify(&req, 1353832234).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Missing Authorization Header", "Hawk"));
    }

    #[test]
    fn test_parse_attributes() {
        let attributes = parse_attributes(r#"id="a", ts="1",nonce="n", ext="x,y""#).unwrap();
        assert_eq!(attributes["id"], "a");
        assert_eq!(attributes["ext"], "x,y");

        assert_eq!(parse_attributes(r#"foo="bar""#), Err("Unknown attribute"));
        assert_eq!(parse_attributes(r#"id="a", id="b""#), Err("Duplicate attribute"));
        assert_eq!(parse_attributes(r#"id=a"#), Err("Bad header format"));
    }

    #[test]
    fn test_unsupported_algorithm() {
        let backend = HawkAuthBackend::new(
            |id| {
                Some(HawkCredentials {
                    id: id.to_string(),
                    key: KEY.to_string(),
                    algorithm: "sha1".to_string(),
                })
            },
            |id| Some(Identity::new(json!({ "id": id }))),
        );
        let req = readme_request().with_authorization(
            r#"Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2", mac="abc=""#,
        );

        let err = backend.verify(&req, 1353832234).unwrap_err();
        assert_eq!(err, AppError::unauthorized("Unsupported algorithm", "Hawk"));
    }
}
