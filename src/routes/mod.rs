//! API 라우트 설정 모듈
//!
//! 헬스체크와 `/api/v1` 엔드포인트를 등록합니다. 인증 여부는 라우트가 아닌
//! App 레벨의 [`AuthMiddleware`](crate::middlewares::AuthMiddleware)와
//! 라우트 템플릿별 [`AuthConfig`]가 결정합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(auth_middleware(dispatcher.clone()))
//!     .configure(configure_all_routes)
//! ```

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::domain::auth::AuthConfig;
use crate::handlers;
use crate::middlewares::{AuthDispatcher, AuthMiddleware};

pub const HEALTH_ROUTE: &str = "/health";
pub const PUBLIC_ROUTE: &str = "/api/v1/public";

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_api_routes(cfg);
}

/// `/api/v1` 라우트
///
/// - `GET /api/v1/me` - 인증 필수
/// - `GET /api/v1/items` - 인증 필수 (OPTIONS 등 면제 메서드는 통과)
/// - `GET /api/v1/public` - 리소스 설정으로 인증 비활성화
fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(handlers::api::me)
            .service(handlers::api::list_items)
            .service(handlers::api::public_info),
    );
}

/// 라우트별 인증 설정을 등록한 미들웨어
pub fn auth_middleware(dispatcher: Arc<AuthDispatcher>) -> AuthMiddleware {
    AuthMiddleware::shared(dispatcher)
        .resource(HEALTH_ROUTE, AuthConfig::disabled())
        .resource(PUBLIC_ROUTE, AuthConfig::disabled())
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "auth_gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{Backend, TokenAuthBackend};
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::Value;

    fn dispatcher() -> Arc<AuthDispatcher> {
        Arc::new(
            AuthDispatcher::new(Backend::blocking(TokenAuthBackend::with_tokens(["abc123"]))).unwrap(),
        )
    }

    #[actix_web::test]
    async fn test_health_and_public_skip_authentication() {
        let app = test::init_service(
            App::new()
                .wrap(auth_middleware(dispatcher()))
                .configure(configure_all_routes),
        )
        .await;

        for uri in [HEALTH_ROUTE, PUBLIC_ROUTE] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_me_requires_token() {
        let app = test::init_service(
            App::new()
                .wrap(auth_middleware(dispatcher()))
                .configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "user": { "token": "abc123" } }));
    }
}
