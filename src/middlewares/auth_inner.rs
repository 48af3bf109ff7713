//! AuthMiddleware 요청 처리 서비스
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::domain::auth::{AuthRequest, DefaultResource, Resource, RouteResource};
use crate::middlewares::dispatcher::AuthDispatcher;
use crate::services::auth::ExecutionMode;

/// 라우트 템플릿 → 등록된 리소스
pub type ResourceRegistry = HashMap<String, RouteResource>;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub dispatcher: Arc<AuthDispatcher>,
    pub resources: Arc<ResourceRegistry>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let dispatcher = self.dispatcher.clone();
        let resources = self.resources.clone();

        Box::pin(async move {
            let mut auth_req = AuthRequest::from_service_request(&req);
            let resource: &dyn Resource = match resources.get(auth_req.route_key()) {
                Some(resource) => resource,
                None => &DefaultResource,
            };

            let result = if auth_req.is_websocket_upgrade() {
                dispatcher.process_resource_ws(&mut auth_req, resource).await
            } else {
                match dispatcher.mode() {
                    ExecutionMode::Blocking => dispatcher.process_resource(&mut auth_req, resource),
                    ExecutionMode::Suspending => {
                        dispatcher.process_resource_async(&mut auth_req, resource).await
                    }
                }
            };

            match result {
                Ok(outcome) => {
                    log::debug!("인증 처리 결과: {:?}", outcome);
                    // Identity 추출기가 읽을 수 있도록 컨텍스트를 Request Extensions에 저장
                    req.extensions_mut().insert(auth_req.into_context());

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    Ok(ServiceResponse::new(req, response).map_into_right_body())
                }
            }
        })
    }
}
