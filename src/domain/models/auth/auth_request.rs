//! 인증 대상 요청 모델
//!
//! 특정 웹 프레임워크에 묶이지 않는 요청 표현입니다. ActixWeb 미들웨어는
//! `ServiceRequest`에서 이 구조체를 만들고, 디스패처가 채운 컨텍스트를
//! 다시 request extension으로 옮깁니다.

use actix_web::dev::ServiceRequest;
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::domain::auth::identity::RequestContext;

/// 인증 미들웨어가 다루는 요청
#[derive(Debug, Clone)]
pub struct AuthRequest {
    method: Method,
    /// 매칭된 라우트 템플릿 (예: `/items/{id}`), 매칭되지 않으면 `None`
    uri_template: Option<String>,
    path: String,
    query: String,
    host: String,
    port: u16,
    headers: HeaderMap,
    context: RequestContext,
}

impl AuthRequest {
    /// 새로운 요청 생성 (호스트 `localhost:80`)
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            uri_template: None,
            path: path.into(),
            query: String::new(),
            host: "localhost".to_string(),
            port: 80,
            headers: HeaderMap::new(),
            context: RequestContext::new(),
        }
    }

    pub fn with_uri_template(mut self, template: impl Into<String>) -> Self {
        self.uri_template = Some(template.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// `Authorization` 헤더 설정
    ///
    /// 헤더 값으로 쓸 수 없는 문자가 포함되면 무시하고 경고를 남깁니다.
    pub fn with_authorization(self, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => self.with_header(header::AUTHORIZATION, value),
            Err(e) => {
                log::warn!("Authorization 헤더 값이 유효하지 않습니다: {}", e);
                self
            }
        }
    }

    /// ActixWeb 요청에서 인증 요청 생성
    ///
    /// 라우트 템플릿은 `match_pattern()`으로 얻으므로 라우팅 이전의
    /// App 레벨 미들웨어에서도 사용할 수 있습니다.
    pub fn from_service_request(req: &ServiceRequest) -> Self {
        let connection_info = req.connection_info().clone();
        let default_port = if connection_info.scheme() == "https" { 443 } else { 80 };
        let (host, port) = split_host_port(connection_info.host(), default_port);

        Self {
            method: req.method().clone(),
            uri_template: req.match_pattern(),
            path: req.path().to_string(),
            query: req.query_string().to_string(),
            host,
            port,
            headers: req.headers().clone(),
            context: RequestContext::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri_template(&self) -> Option<&str> {
        self.uri_template.as_deref()
    }

    /// 면제 판단에 사용하는 라우트 식별자
    ///
    /// 라우트 템플릿이 있으면 템플릿을, 없으면 원본 경로를 사용합니다.
    pub fn route_key(&self) -> &str {
        self.uri_template.as_deref().unwrap_or(&self.path)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 경로와 쿼리 문자열 (Hawk 정규화 문자열의 resource 항목)
    pub fn resource_uri(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// 헤더 값을 문자열로 조회 (ASCII가 아니면 `None`)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// WebSocket 업그레이드 요청 여부
    pub fn is_websocket_upgrade(&self) -> bool {
        let upgrade = self
            .header(header::UPGRADE.as_str())
            .map(|v| v.eq_ignore_ascii_case("websocket"))
            .unwrap_or(false);
        let connection = self
            .header(header::CONNECTION.as_str())
            .map(|v| {
                v.split(',')
                    .any(|token| token.trim().eq_ignore_ascii_case("upgrade"))
            })
            .unwrap_or(false);

        upgrade && connection
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.context
    }

    pub fn into_context(self) -> RequestContext {
        self.context
    }
}

/// `host[:port]` 문자열 분리 (IPv6 대괄호 표기 포함)
fn split_host_port(value: &str, default_port: u16) -> (String, u16) {
    if let Some((host, port)) = value.rsplit_once(':') {
        if !host.is_empty() && !port.contains(']') {
            if let Ok(port) = port.parse::<u16>() {
                return (host.to_ascii_lowercase(), port);
            }
        }
    }
    (value.to_ascii_lowercase(), default_port)
}
