//! 전역 설정과 리소스 오버라이드를 합쳐 요청 단위의 유효 인증 설정을 계산합니다.
//!
//! 면제 라우트 집합은 기본적으로 전역 집합을 빌려 쓰고(`Cow::Borrowed`),
//! `auth_disabled` 리소스에서만 현재 라우트를 더한 사본을 만듭니다(`Cow::Owned`).
//! 어떤 경우에도 전역 집합은 변경되지 않습니다.

use std::borrow::Cow;
use std::collections::HashSet;

use actix_web::http::Method;

use crate::domain::auth::{AuthRequest, Resource};
use crate::services::auth::Backend;

/// 미들웨어 생성 후 변경되지 않는 전역 인증 설정
#[derive(Debug, Clone)]
pub struct GlobalAuthSettings {
    pub backend: Backend,
    pub exempt_routes: HashSet<String>,
    pub exempt_methods: HashSet<Method>,
}

impl GlobalAuthSettings {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            exempt_routes: HashSet::new(),
            exempt_methods: default_exempt_methods(),
        }
    }
}

/// `{OPTIONS}`
pub fn default_exempt_methods() -> HashSet<Method> {
    HashSet::from([Method::OPTIONS])
}

/// 한 요청에 적용되는 유효 인증 설정
#[derive(Debug)]
pub struct EffectiveAuth<'a> {
    pub backend: &'a Backend,
    pub exempt_routes: Cow<'a, HashSet<String>>,
    pub exempt_methods: &'a HashSet<Method>,
}

impl EffectiveAuth<'_> {
    /// 메서드 또는 라우트가 면제 대상인지 확인
    pub fn is_exempt(&self, req: &AuthRequest) -> bool {
        self.exempt_methods.contains(req.method()) || self.exempt_routes.contains(req.route_key())
    }
}

/// 전역 설정 위에 리소스 오버라이드를 적용
pub fn resolve<'a>(
    global: &'a GlobalAuthSettings,
    resource: &'a dyn Resource,
    route_key: &str,
) -> EffectiveAuth<'a> {
    let local = resource.auth_config();

    let mut exempt_routes = Cow::Borrowed(&global.exempt_routes);
    if local.is_some_and(|config| config.auth_disabled) {
        exempt_routes.to_mut().insert(route_key.to_string());
    }

    EffectiveAuth {
        backend: local
            .and_then(|config| config.backend.as_ref())
            .unwrap_or(&global.backend),
        exempt_routes,
        exempt_methods: local
            .and_then(|config| config.exempt_methods.as_ref())
            .filter(|methods| !methods.is_empty())
            .unwrap_or(&global.exempt_methods),
    }
}
