//! 인증 디스패처
//!
//! 요청마다 면제 여부를 판단하고, 유효 백엔드로 인증한 뒤 결과 Identity를
//! 요청 컨텍스트의 `"user"` 키에 저장합니다. actix와 무관한 핵심 로직이며,
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 이를 감싸 사용합니다.
//!
//! # 상태 전이
//!
//! ```text
//! START → EXEMPTION_CHECK ─┬─ SKIP ─────────────→ Exempt
//!                          └─ AUTHENTICATE ─┬─→ Attached
//!                                           └─→ Unauthorized (ws: Deferred)
//! ```
//!
//! # 진입점
//!
//! | 메서드 | 실행 | 실패 |
//! |--------|------|------|
//! | [`AuthDispatcher::process_resource`] | 동기 | `Err(Unauthorized)` |
//! | [`AuthDispatcher::process_resource_async`] | 비동기 | `Err(Unauthorized)` |
//! | [`AuthDispatcher::process_resource_ws`] | 비동기 | `Ok(Deferred)` |
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let dispatcher = AuthDispatcher::builder(backend)
//!     .exempt_routes(["/health"])
//!     .build()?;
//!
//! let mut req = AuthRequest::new(Method::GET, "/items").with_authorization("Bearer abc123");
//! match dispatcher.process_resource(&mut req, &DefaultResource)? {
//!     DispatchOutcome::Attached => { /* req.context().user() 사용 */ }
//!     _ => {}
//! }
//! ```

use std::collections::HashSet;

use actix_web::http::Method;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::middlewares::resolution::{default_exempt_methods, resolve, EffectiveAuth, GlobalAuthSettings};
use crate::services::auth::{Backend, ExecutionMode};

/// 디스패처 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 면제 대상이라 백엔드를 호출하지 않음
    Exempt,
    /// 인증 성공, Identity가 컨텍스트에 저장됨
    Attached,
    /// 양방향 연결에서 인증 실패. 연결 종료는 핸들러가 결정
    Deferred,
}

/// 전역 설정을 보관하고 요청별 인증을 수행하는 디스패처
#[derive(Debug)]
pub struct AuthDispatcher {
    global: GlobalAuthSettings,
    mode: ExecutionMode,
}

/// [`AuthDispatcher`] 빌더
pub struct AuthDispatcherBuilder {
    backend: Backend,
    exempt_routes: HashSet<String>,
    exempt_methods: Option<HashSet<Method>>,
    mode: Option<ExecutionMode>,
}

impl AuthDispatcherBuilder {
    pub fn exempt_routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt_routes.extend(routes.into_iter().map(Into::into));
        self
    }

    /// 지정하면 기본값 `{OPTIONS}`를 대체. 빈 목록이면 기본값 유지
    pub fn exempt_methods<I>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        let methods: HashSet<Method> = methods.into_iter().collect();
        self.exempt_methods = (!methods.is_empty()).then_some(methods);
        self
    }

    /// 지정하지 않으면 기본 백엔드의 실행 모드를 따름
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - blocking 모드에 suspending 기본 백엔드를 지정한 경우
    pub fn build(self) -> AppResult<AuthDispatcher> {
        let mode = self.mode.unwrap_or_else(|| self.backend.mode());

        if mode == ExecutionMode::Blocking && !self.backend.is_blocking() {
            return Err(AppError::ConfigurationError(format!(
                "blocking 모드 미들웨어에 suspending 백엔드 '{}'를 사용할 수 없습니다",
                self.backend.name()
            )));
        }

        log::info!(
            "인증 디스패처 생성: backend={}, mode={}, exempt_routes={:?}",
            self.backend.name(),
            mode.as_str(),
            self.exempt_routes
        );

        Ok(AuthDispatcher {
            global: GlobalAuthSettings {
                backend: self.backend,
                exempt_routes: self.exempt_routes,
                exempt_methods: self.exempt_methods.unwrap_or_else(default_exempt_methods),
            },
            mode,
        })
    }
}

impl AuthDispatcher {
    pub fn builder(backend: Backend) -> AuthDispatcherBuilder {
        AuthDispatcherBuilder {
            backend,
            exempt_routes: HashSet::new(),
            exempt_methods: None,
            mode: None,
        }
    }

    /// 기본 설정(`exempt_methods = {OPTIONS}`, 백엔드 실행 모드)으로 생성
    pub fn new(backend: Backend) -> AppResult<Self> {
        Self::builder(backend).build()
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn settings(&self) -> &GlobalAuthSettings {
        &self.global
    }

    /// 요청에 적용될 유효 설정 계산
    pub fn resolve<'a>(&'a self, req: &AuthRequest, resource: &'a dyn Resource) -> EffectiveAuth<'a> {
        resolve(&self.global, resource, req.route_key())
    }

    /// 면제 대상이면 `Some(Exempt)`
    fn check_exemption(effective: &EffectiveAuth<'_>, req: &AuthRequest) -> Option<DispatchOutcome> {
        if effective.is_exempt(req) {
            log::debug!("인증 면제: {} {}", req.method(), req.route_key());
            return Some(DispatchOutcome::Exempt);
        }
        None
    }

    fn attach(
        req: &mut AuthRequest,
        backend_name: &str,
        result: AppResult<Identity>,
    ) -> AppResult<DispatchOutcome> {
        match result {
            Ok(identity) => {
                log::debug!("인증 성공 ({}): {} {}", backend_name, req.method(), req.route_key());
                req.context_mut().set_user(identity);
                Ok(DispatchOutcome::Attached)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    log::warn!("인증 실패 ({}): {} {} - {}", backend_name, req.method(), req.route_key(), err);
                } else {
                    log::error!("인증 처리 오류 ({}): {}", backend_name, err);
                }
                Err(err)
            }
        }
    }

    /// 동기 진입점
    ///
    /// 중단 지점이 없으며, suspending 리소스 오버라이드를 만나면
    /// 해당 요청을 `ConfigurationError`로 실패시킵니다.
    pub fn process_resource(&self, req: &mut AuthRequest, resource: &dyn Resource) -> AppResult<DispatchOutcome> {
        let effective = self.resolve(req, resource);
        if let Some(outcome) = Self::check_exemption(&effective, req) {
            return Ok(outcome);
        }

        let backend = effective.backend;
        let result = backend.authenticate_blocking(req, resource);
        Self::attach(req, backend.name(), result)
    }

    /// 비동기 진입점. 각 백엔드는 자신의 실행 모드대로 호출됩니다.
    pub async fn process_resource_async(
        &self,
        req: &mut AuthRequest,
        resource: &dyn Resource,
    ) -> AppResult<DispatchOutcome> {
        let effective = self.resolve(req, resource);
        if let Some(outcome) = Self::check_exemption(&effective, req) {
            return Ok(outcome);
        }

        let backend = effective.backend;
        let result = backend.authenticate(req, resource).await;
        Self::attach(req, backend.name(), result)
    }

    /// 양방향(WebSocket) 연결 수락 진입점
    ///
    /// `Unauthorized`는 전파하지 않고 `Deferred`로 돌려줍니다.
    /// 그 외 에러는 그대로 전파됩니다.
    pub async fn process_resource_ws(
        &self,
        req: &mut AuthRequest,
        resource: &dyn Resource,
    ) -> AppResult<DispatchOutcome> {
        match self.process_resource_async(req, resource).await {
            Err(err) if err.is_unauthorized() => {
                log::info!("WebSocket 인증 실패, 연결 처리를 핸들러에 위임: {}", req.route_key());
                Ok(DispatchOutcome::Deferred)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{AuthConfig, DefaultResource, RouteResource, USER_CONTEXT_KEY};
    use crate::services::auth::{AsyncAuthBackend, AuthBackend, IntrospectionAuthBackend, TokenAuthBackend};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 호출 횟수를 세고 항상 같은 결과를 돌려주는 백엔드
    struct Counting {
        name: &'static str,
        succeed: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Counting {
        fn backend(name: &'static str, succeed: bool) -> (Backend, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let backend = Backend::blocking(Self { name, succeed, calls: calls.clone() });
            (backend, calls)
        }
    }

    impl AuthBackend for Counting {
        fn name(&self) -> &str {
            self.name
        }

        fn authenticate(&self, _req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(Identity::new(json!({ "by": self.name })))
            } else {
                Err(AppError::unauthorized("Rejected", self.name))
            }
        }
    }

    struct AlwaysRejects;

    #[async_trait]
    impl AsyncAuthBackend for AlwaysRejects {
        fn name(&self) -> &str {
            "rejects"
        }

        async fn authenticate(&self, _req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
            Err(AppError::unauthorized("Rejected", "Bearer"))
        }
    }

    fn token_dispatcher() -> AuthDispatcher {
        AuthDispatcher::new(Backend::blocking(TokenAuthBackend::with_tokens(["abc123"]))).unwrap()
    }

    #[test]
    fn test_bearer_token_scenario() {
        let dispatcher = token_dispatcher();

        let mut req = AuthRequest::new(Method::GET, "/items")
            .with_uri_template("/items")
            .with_authorization("Bearer abc123");
        let outcome = dispatcher.process_resource(&mut req, &DefaultResource).unwrap();

        assert_eq!(outcome, DispatchOutcome::Attached);
        assert_eq!(req.context().user(), Some(Identity::new(json!({ "token": "abc123" }))));

        let mut req = AuthRequest::new(Method::GET, "/items")
            .with_uri_template("/items")
            .with_authorization("Bearer wrong");
        let err = dispatcher.process_resource(&mut req, &DefaultResource).unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!req.context().contains_key(USER_CONTEXT_KEY));
    }

    #[test]
    fn test_options_is_skipped_regardless_of_backend() {
        let (backend, calls) = Counting::backend("A", false);
        let dispatcher = AuthDispatcher::new(backend).unwrap();

        let mut req = AuthRequest::new(Method::OPTIONS, "/anything");
        let outcome = dispatcher.process_resource(&mut req, &DefaultResource).unwrap();

        assert_eq!(outcome, DispatchOutcome::Exempt);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!req.context().contains_key(USER_CONTEXT_KEY));
    }

    #[test]
    fn test_exempt_route_is_skipped() {
        let (backend, calls) = Counting::backend("A", false);
        let dispatcher = AuthDispatcher::builder(backend)
            .exempt_routes(["/health"])
            .build()
            .unwrap();

        let mut req = AuthRequest::new(Method::GET, "/health").with_uri_template("/health");
        let outcome = dispatcher.process_resource(&mut req, &DefaultResource).unwrap();

        assert_eq!(outcome, DispatchOutcome::Exempt);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(req.context().is_empty());
    }

    #[test]
    fn test_custom_exempt_methods_replace_default() {
        let (backend, calls) = Counting::backend("A", false);
        let dispatcher = AuthDispatcher::builder(backend)
            .exempt_methods([Method::HEAD])
            .build()
            .unwrap();

        let mut head = AuthRequest::new(Method::HEAD, "/items");
        assert_eq!(dispatcher.process_resource(&mut head, &DefaultResource).unwrap(), DispatchOutcome::Exempt);

        let mut options = AuthRequest::new(Method::OPTIONS, "/items");
        assert!(dispatcher.process_resource(&mut options, &DefaultResource).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_exempt_methods_keep_options_default() {
        let (backend, calls) = Counting::backend("A", false);
        let dispatcher = AuthDispatcher::builder(backend)
            .exempt_methods(Vec::<Method>::new())
            .build()
            .unwrap();

        let mut options = AuthRequest::new(Method::OPTIONS, "/items");
        assert_eq!(
            dispatcher.process_resource(&mut options, &DefaultResource).unwrap(),
            DispatchOutcome::Exempt
        );

        let local = RouteResource::new("/items")
            .with_auth(AuthConfig::new().with_exempt_methods(Vec::<Method>::new()));
        let mut options = AuthRequest::new(Method::OPTIONS, "/items");
        assert_eq!(dispatcher.process_resource(&mut options, &local).unwrap(), DispatchOutcome::Exempt);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_auth_disabled_does_not_accumulate() {
        let (backend, calls) = Counting::backend("A", false);
        let dispatcher = AuthDispatcher::builder(backend)
            .exempt_routes(["/health"])
            .build()
            .unwrap();
        let public = RouteResource::new("/public").with_auth(AuthConfig::disabled());

        for _ in 0..5 {
            let mut req = AuthRequest::new(Method::GET, "/public").with_uri_template("/public");
            assert_eq!(dispatcher.process_resource(&mut req, &public).unwrap(), DispatchOutcome::Exempt);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.settings().exempt_routes, HashSet::from(["/health".to_string()]));

        // 같은 경로라도 오버라이드가 없는 리소스에서는 인증이 필요
        let mut req = AuthRequest::new(Method::GET, "/public").with_uri_template("/public");
        assert!(dispatcher.process_resource(&mut req, &DefaultResource).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resource_backend_override_is_invoked() {
        let (default, default_calls) = Counting::backend("default", true);
        let (local, local_calls) = Counting::backend("local", true);
        let dispatcher = AuthDispatcher::new(default).unwrap();
        let resource = RouteResource::new("/items").with_auth(AuthConfig::new().with_backend(local));

        let mut req = AuthRequest::new(Method::GET, "/items");
        dispatcher.process_resource(&mut req, &resource).unwrap();

        assert_eq!(req.context().user().unwrap().get("by"), Some(&json!("local")));
        assert_eq!(local_calls.load(Ordering::SeqCst), 1);
        assert_eq!(default_calls.load(Ordering::SeqCst), 0);

        let mut req = AuthRequest::new(Method::GET, "/other");
        dispatcher.process_resource(&mut req, &DefaultResource).unwrap();
        assert_eq!(default_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blocking_mode_rejects_suspending_backend() {
        let err = AuthDispatcher::builder(Backend::suspending(AlwaysRejects))
            .mode(ExecutionMode::Blocking)
            .build()
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn test_mode_defaults_to_backend_mode() {
        assert_eq!(token_dispatcher().mode(), ExecutionMode::Blocking);

        let dispatcher = AuthDispatcher::new(Backend::suspending(AlwaysRejects)).unwrap();
        assert_eq!(dispatcher.mode(), ExecutionMode::Suspending);
    }

    #[test]
    fn test_suspending_override_in_blocking_mode_fails_request() {
        let dispatcher = token_dispatcher();
        let resource = RouteResource::new("/remote").with_auth(
            AuthConfig::new().with_backend(Backend::suspending(
                IntrospectionAuthBackend::new("http://127.0.0.1:9/introspect").unwrap(),
            )),
        );

        let mut req = AuthRequest::new(Method::GET, "/remote").with_authorization("Bearer abc123");
        let err = dispatcher.process_resource(&mut req, &resource).unwrap_err();

        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[actix_web::test]
    async fn test_async_entry_point() {
        let dispatcher = token_dispatcher();

        let mut req = AuthRequest::new(Method::GET, "/items").with_authorization("Bearer abc123");
        let outcome = dispatcher.process_resource_async(&mut req, &DefaultResource).await.unwrap();
        assert_eq!(outcome, DispatchOutcome::Attached);

        let mut req = AuthRequest::new(Method::GET, "/items").with_authorization("Bearer wrong");
        let err = dispatcher.process_resource_async(&mut req, &DefaultResource).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[actix_web::test]
    async fn test_ws_failure_is_deferred() {
        let dispatcher = AuthDispatcher::new(Backend::suspending(AlwaysRejects)).unwrap();

        let mut req = AuthRequest::new(Method::GET, "/ws");
        let outcome = dispatcher.process_resource_ws(&mut req, &DefaultResource).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Deferred);
        assert!(!req.context().contains_key(USER_CONTEXT_KEY));
    }

    #[actix_web::test]
    async fn test_ws_success_attaches_identity() {
        let dispatcher = token_dispatcher();

        let mut req = AuthRequest::new(Method::GET, "/ws").with_authorization("Bearer abc123");
        let outcome = dispatcher.process_resource_ws(&mut req, &DefaultResource).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Attached);
        assert!(req.context().user().is_some());
    }
}
