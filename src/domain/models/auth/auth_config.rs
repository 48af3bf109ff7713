//! 리소스 단위 인증 설정
//!
//! 전역 미들웨어 설정을 특정 리소스에서만 덮어쓰기 위한 모델입니다.
//! 리소스 등록 시점에 만들어지고 요청마다 읽기 전용으로 참조됩니다.

use std::collections::HashSet;

use actix_web::http::Method;

use crate::services::auth::Backend;

/// 리소스가 선택적으로 갖는 인증 설정 오버라이드
///
/// - `backend`: 이 리소스에만 사용할 백엔드
/// - `exempt_methods`: 이 리소스에서 인증을 건너뛸 HTTP 메서드
/// - `auth_disabled`: 이 리소스의 라우트를 요청 단위로 면제 목록에 추가
///
/// 지정하지 않은 항목은 미들웨어의 전역 기본값을 따릅니다.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub backend: Option<Backend>,
    pub exempt_methods: Option<HashSet<Method>>,
    pub auth_disabled: bool,
}

impl AuthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 인증을 완전히 끈 설정
    pub fn disabled() -> Self {
        Self {
            auth_disabled: true,
            ..Self::default()
        }
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// 빈 목록은 지정하지 않은 것으로 보고 전역 설정을 따름
    pub fn with_exempt_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let methods: HashSet<Method> = methods.into_iter().collect();
        self.exempt_methods = (!methods.is_empty()).then_some(methods);
        self
    }
}

/// 라우트가 가리키는 대상 리소스
pub trait Resource: Send + Sync {
    /// 리소스 단위 인증 설정 (없으면 전역 설정 사용)
    fn auth_config(&self) -> Option<&AuthConfig> {
        None
    }
}

/// 오버라이드가 없는 리소스
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResource;

impl Resource for DefaultResource {}

/// 라우트 템플릿에 등록된 리소스
#[derive(Debug, Clone)]
pub struct RouteResource {
    template: String,
    auth: Option<AuthConfig>,
}

impl RouteResource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            auth: None,
        }
    }

    pub fn with_auth(mut self, config: AuthConfig) -> Self {
        self.auth = Some(config);
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Resource for RouteResource {
    fn auth_config(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }
}
