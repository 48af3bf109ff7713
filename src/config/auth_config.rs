//! # Authentication Configuration Module
//!
//! 인증 미들웨어와 각 백엔드의 설정을 환경 변수에서 읽어오는 모듈입니다.
//! 모든 값은 기본값을 가지며, 보안상 위험한 기본값이 사용될 때는 경고 로그를 남깁니다.
//!
//! ## 환경 변수
//!
//! ### 미들웨어 전역 설정
//! ```bash
//! export AUTH_BACKEND="token"                  # token, basic, jwt, hawk, none, multi
//! export AUTH_EXEMPT_ROUTES="/health,/metrics"  # 인증을 건너뛸 라우트 템플릿
//! export AUTH_EXEMPT_METHODS="OPTIONS"          # 인증을 건너뛸 HTTP 메서드
//! ```
//!
//! ### 백엔드별 설정
//! ```bash
//! export AUTH_TOKENS="abc123,def456"            # Token 백엔드 허용 토큰
//! export AUTH_TOKEN_PREFIX="Bearer"
//! export BASIC_AUTH_USERS="alice:\$2b\$12\$..."   # 사용자명:bcrypt 해시
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_ALGORITHM="HS256"
//! export JWT_LEEWAY_SECONDS="0"
//! export JWT_AUDIENCE="api"
//! export JWT_ISSUER="auth-service"
//! export HAWK_CREDENTIALS="id1:key1,id2:key2"
//! export HAWK_TIMESTAMP_SKEW_SECONDS="60"
//! export AUTH_INTROSPECTION_URL="https://idp.example.com/oauth2/introspect"
//! ```

use std::env;

use actix_web::http::Method;

use crate::utils::string_utils::{clean_optional_string, parse_list};

/// 미들웨어 전역 인증 설정
pub struct AuthEnvConfig;

impl AuthEnvConfig {
    /// 기본 백엔드 종류 (기본값: token)
    pub fn backend_kind() -> BackendKind {
        let value = env::var("AUTH_BACKEND").unwrap_or_else(|_| "token".to_string());

        BackendKind::from_str(&value).unwrap_or_else(|e| {
            log::warn!("{}. token 백엔드를 사용합니다", e);
            BackendKind::Token
        })
    }

    /// 인증 면제 라우트 템플릿 (기본값: 없음)
    pub fn exempt_routes() -> Vec<String> {
        env::var("AUTH_EXEMPT_ROUTES")
            .map(|value| parse_list(&value))
            .unwrap_or_default()
    }

    /// 인증 면제 HTTP 메서드 (기본값: OPTIONS)
    pub fn exempt_methods() -> Vec<Method> {
        let value = env::var("AUTH_EXEMPT_METHODS").unwrap_or_else(|_| "OPTIONS".to_string());
        parse_methods(&value)
    }

    /// Token 백엔드가 허용하는 토큰 목록
    pub fn static_tokens() -> Vec<String> {
        env::var("AUTH_TOKENS")
            .map(|value| parse_list(&value))
            .unwrap_or_default()
    }

    pub fn token_prefix() -> String {
        env::var("AUTH_TOKEN_PREFIX").unwrap_or_else(|_| "Bearer".to_string())
    }

    /// Basic 백엔드 사용자 목록 (`사용자명:bcrypt해시` 쉼표 구분)
    pub fn basic_users() -> String {
        env::var("BASIC_AUTH_USERS").unwrap_or_default()
    }
}

/// HTTP 메서드 목록 파싱 (알 수 없는 값은 경고 후 무시)
pub fn parse_methods(value: &str) -> Vec<Method> {
    parse_list(value)
        .into_iter()
        .filter_map(|name| match Method::from_bytes(name.to_ascii_uppercase().as_bytes()) {
            Ok(method) => Some(method),
            Err(_) => {
                log::warn!("알 수 없는 HTTP 메서드 무시: {}", name);
                None
            }
        })
        .collect()
}

/// JWT 백엔드 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "your-secret-key".to_string()
        })
    }

    /// 서명 알고리즘 이름 (기본값: HS256)
    pub fn algorithm() -> String {
        env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string())
    }

    /// RS/ES 계열 알고리즘에서 사용할 PEM 공개키 경로
    pub fn public_key_path() -> Option<String> {
        clean_optional_string(env::var("JWT_PUBLIC_KEY_PATH").ok())
    }

    pub fn leeway_seconds() -> u64 {
        env::var("JWT_LEEWAY_SECONDS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .unwrap_or(0)
    }

    pub fn audience() -> Option<String> {
        clean_optional_string(env::var("JWT_AUDIENCE").ok())
    }

    pub fn issuer() -> Option<String> {
        clean_optional_string(env::var("JWT_ISSUER").ok())
    }

    pub fn auth_header_prefix() -> String {
        env::var("JWT_AUTH_HEADER_PREFIX").unwrap_or_else(|_| "JWT".to_string())
    }
}

/// Hawk 백엔드 설정
pub struct HawkConfig;

impl HawkConfig {
    /// `id:key` 쉼표 구분 목록
    pub fn credentials() -> Vec<(String, String)> {
        env::var("HAWK_CREDENTIALS")
            .map(|value| {
                parse_list(&value)
                    .into_iter()
                    .filter_map(|pair| {
                        pair.split_once(':')
                            .map(|(id, key)| (id.to_string(), key.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn timestamp_skew_seconds() -> i64 {
        env::var("HAWK_TIMESTAMP_SKEW_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60)
    }
}

/// 원격 토큰 introspection 설정
pub struct IntrospectionConfig;

impl IntrospectionConfig {
    pub fn endpoint() -> Option<String> {
        clean_optional_string(env::var("AUTH_INTROSPECTION_URL").ok())
    }

    pub fn client_id() -> Option<String> {
        clean_optional_string(env::var("AUTH_INTROSPECTION_CLIENT_ID").ok())
    }

    pub fn client_secret() -> Option<String> {
        clean_optional_string(env::var("AUTH_INTROSPECTION_CLIENT_SECRET").ok())
    }

    pub fn timeout_seconds() -> u64 {
        env::var("AUTH_INTROSPECTION_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5)
    }

    pub fn cache_ttl_seconds() -> u64 {
        env::var("AUTH_INTROSPECTION_CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60)
    }
}

/// 환경 변수로 선택할 수 있는 기본 백엔드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Token,
    Basic,
    Jwt,
    Hawk,
    None,
    /// 설정된 모든 백엔드를 순서대로 시도
    Multi,
}

impl BackendKind {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "token" => Ok(BackendKind::Token),
            "basic" => Ok(BackendKind::Basic),
            "jwt" => Ok(BackendKind::Jwt),
            "hawk" => Ok(BackendKind::Hawk),
            "none" => Ok(BackendKind::None),
            "multi" => Ok(BackendKind::Multi),
            _ => Err(format!("Unsupported auth backend: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Token => "token",
            BackendKind::Basic => "basic",
            BackendKind::Jwt => "jwt",
            BackendKind::Hawk => "hawk",
            BackendKind::None => "none",
            BackendKind::Multi => "multi",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_from_string() {
        assert_eq!(BackendKind::from_str("token").unwrap(), BackendKind::Token);
        assert_eq!(BackendKind::from_str("basic").unwrap(), BackendKind::Basic);
        assert_eq!(BackendKind::from_str("jwt").unwrap(), BackendKind::Jwt);
        assert_eq!(BackendKind::from_str("hawk").unwrap(), BackendKind::Hawk);
        assert_eq!(BackendKind::from_str("none").unwrap(), BackendKind::None);
        assert_eq!(BackendKind::from_str("multi").unwrap(), BackendKind::Multi);

        // 대소문자 무관 테스트
        assert_eq!(BackendKind::from_str("JWT").unwrap(), BackendKind::Jwt);
        assert_eq!(BackendKind::from_str(" Multi ").unwrap(), BackendKind::Multi);

        assert!(BackendKind::from_str("kerberos").is_err());
    }

    #[test]
    fn test_backend_kind_roundtrip() {
        let kinds = ["token", "basic", "jwt", "hawk", "none", "multi"];

        for &kind in &kinds {
            assert_eq!(BackendKind::from_str(kind).unwrap().as_str(), kind);
        }
    }

    #[test]
    fn test_parse_methods() {
        let methods = parse_methods("options, get,BOGUS METHOD,head");

        assert_eq!(methods, vec![Method::OPTIONS, Method::GET, Method::HEAD]);
    }
}
