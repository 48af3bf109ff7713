//! 인증된 주체(Identity)와 요청 컨텍스트
//!
//! 백엔드가 반환한 Identity는 요청 컨텍스트의 고정 키 `"user"`에 저장되어
//! 다운스트림 핸들러로 전달됩니다. 키가 없으면 인증이 수행되지 않은 것(면제)입니다.

use std::collections::HashMap;
use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AppError;

/// Identity가 저장되는 요청 컨텍스트 키
pub const USER_CONTEXT_KEY: &str = "user";

/// 백엔드가 인증에 성공했을 때 반환하는 주체 정보
///
/// 코어는 내부 형태를 강제하지 않습니다. 토큰 백엔드는 `{"token": ...}`,
/// JWT 백엔드는 클레임 전체 등 백엔드의 user loader가 자유롭게 구성합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Value);

impl Identity {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// 객체형 Identity에서 필드 조회
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for Identity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// 요청 단위 컨텍스트 (string → value)
///
/// 요청이 끝나면 함께 폐기되며 요청 간에 공유되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    values: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 인증된 사용자 조회 (`"user"` 키)
    pub fn user(&self) -> Option<Identity> {
        self.get(USER_CONTEXT_KEY).cloned().map(Identity::from)
    }

    /// 인증된 사용자 저장 (`"user"` 키)
    pub fn set_user(&mut self, identity: Identity) {
        self.insert(USER_CONTEXT_KEY, identity.into_inner());
    }
}

/// ActixWeb FromRequest trait 구현
///
/// 미들웨어가 컨텍스트에 Identity를 저장하지 않은 경우 401을 반환합니다.
impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<RequestContext>().and_then(RequestContext::user);

        match user {
            Some(identity) => ready(Ok(identity)),
            None => ready(Err(AppError::unauthorized_without_challenge(
                "인증되지 않은 요청입니다",
            )
            .into())),
        }
    }
}

/// 선택적 인증 주체 추출자
///
/// 면제된 요청에서도 핸들러가 실행될 수 있도록 실패하지 않습니다.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<RequestContext>().and_then(RequestContext::user);
        ready(Ok(OptionalIdentity(user)))
    }
}
