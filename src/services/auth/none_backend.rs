//! 자격 증명을 검사하지 않는 백엔드
//!
//! 개발 환경이나 내부망 리소스에서 항상 같은 사용자로 인증할 때 사용합니다.

use std::sync::Arc;

use serde_json::json;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::AuthBackend;

pub type NoneUserLoader = dyn Fn() -> Option<Identity> + Send + Sync;

/// 항상 user loader의 결과로 인증하는 백엔드
pub struct NoneAuthBackend {
    user_loader: Arc<NoneUserLoader>,
}

impl NoneAuthBackend {
    pub fn new<F>(user_loader: F) -> Self
    where
        F: Fn() -> Option<Identity> + Send + Sync + 'static,
    {
        Self {
            user_loader: Arc::new(user_loader),
        }
    }

    /// `{"anonymous": true}` Identity를 반환하는 백엔드
    pub fn anonymous() -> Self {
        Self::new(|| Some(Identity::new(json!({ "anonymous": true }))))
    }
}

impl AuthBackend for NoneAuthBackend {
    fn name(&self) -> &str {
        "none"
    }

    fn authenticate(&self, _req: &AuthRequest, _resource: &dyn Resource) -> AppResult<Identity> {
        (self.user_loader)()
            .ok_or_else(|| AppError::unauthorized_without_challenge("Invalid User"))
    }
}
