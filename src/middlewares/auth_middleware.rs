//! 인증 미들웨어
//!
//! [`AuthDispatcher`]를 ActixWeb 요청 파이프라인에 연결합니다.
//! 라우트 템플릿별로 등록된 리소스 설정을 찾아 디스패처에 넘기고,
//! 인증 결과 컨텍스트를 Request Extensions에 저장합니다.

use std::collections::HashMap;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::auth::{AuthConfig, RouteResource};
use crate::middlewares::auth_inner::{AuthMiddlewareService, ResourceRegistry};
use crate::middlewares::dispatcher::AuthDispatcher;

/// 플러그형 인증 미들웨어
///
/// ```rust,ignore
/// let dispatcher = AuthDispatcher::builder(backend_from_env()?).build()?;
///
/// App::new()
///     .wrap(
///         AuthMiddleware::new(dispatcher)
///             .resource("/health", AuthConfig::disabled())
///             .resource("/api/v1/admin", AuthConfig::new().with_backend(admin_backend)),
///     )
/// ```
#[derive(Clone)]
pub struct AuthMiddleware {
    dispatcher: Arc<AuthDispatcher>,
    resources: Arc<ResourceRegistry>,
}

impl AuthMiddleware {
    /// 새로운 인증 미들웨어 생성
    pub fn new(dispatcher: AuthDispatcher) -> Self {
        Self::shared(Arc::new(dispatcher))
    }

    /// 워커 간에 공유되는 디스패처로 생성
    pub fn shared(dispatcher: Arc<AuthDispatcher>) -> Self {
        Self {
            dispatcher,
            resources: Arc::new(HashMap::new()),
        }
    }

    /// 라우트 템플릿에 리소스 단위 인증 설정 등록
    pub fn resource(mut self, template: impl Into<String>, config: AuthConfig) -> Self {
        let template = template.into();
        let resource = RouteResource::new(template.clone()).with_auth(config);
        Arc::make_mut(&mut self.resources).insert(template, resource);
        self
    }

    pub fn dispatcher(&self) -> &AuthDispatcher {
        &self.dispatcher
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            dispatcher: self.dispatcher.clone(),
            resources: self.resources.clone(),
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{Identity, OptionalIdentity};
    use crate::services::auth::{Backend, NoneAuthBackend, TokenAuthBackend};
    use actix_web::http::{header, Method, StatusCode};
    use actix_web::{test, web, App, HttpResponse};
    use serde_json::{json, Value};

    async fn me(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().json(identity)
    }

    async fn maybe_me(identity: OptionalIdentity) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "authenticated": identity.0.is_some() }))
    }

    fn middleware() -> AuthMiddleware {
        let dispatcher = AuthDispatcher::builder(Backend::blocking(TokenAuthBackend::with_tokens(["abc123"])))
            .exempt_routes(["/health"])
            .build()
            .unwrap();

        AuthMiddleware::new(dispatcher)
            .resource("/public", AuthConfig::disabled())
            .resource(
                "/anonymous",
                AuthConfig::new().with_backend(Backend::blocking(NoneAuthBackend::anonymous())),
            )
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(middleware())
                    .route("/items", web::get().to(me))
                    .route("/items", web::method(Method::OPTIONS).to(maybe_me))
                    .route("/health", web::get().to(maybe_me))
                    .route("/public", web::get().to(maybe_me))
                    .route("/anonymous", web::get().to(me))
                    .route("/ws", web::get().to(maybe_me)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_token_reaches_handler() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/items")
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "token": "abc123" }));
    }

    #[actix_web::test]
    async fn test_invalid_token_is_rejected_with_challenge() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/items")
            .insert_header((header::AUTHORIZATION, "Bearer wrong"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["description"], "Invalid Token");
    }

    #[actix_web::test]
    async fn test_options_bypasses_authentication() {
        let app = app!();
        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/items")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "authenticated": false }));
    }

    #[actix_web::test]
    async fn test_exempt_and_disabled_routes() {
        let app = app!();

        for uri in ["/health", "/public", "/public"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }

        let req = test::TestRequest::get().uri("/items").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_resource_backend_override() {
        let app = app!();
        let req = test::TestRequest::get().uri("/anonymous").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "anonymous": true }));
    }

    #[actix_web::test]
    async fn test_websocket_failure_is_left_to_handler() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/ws")
            .insert_header((header::CONNECTION, "Upgrade"))
            .insert_header((header::UPGRADE, "websocket"))
            .insert_header((header::AUTHORIZATION, "Bearer wrong"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "authenticated": false }));
    }

    #[actix_web::test]
    async fn test_missing_header_returns_json_error() {
        let app = app!();
        let req = test::TestRequest::get().uri("/items").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "401 Unauthorized");
        assert_eq!(body["description"], "Missing Authorization Header");
    }
}
