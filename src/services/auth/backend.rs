//! # AuthBackend 계약
//!
//! 모든 자격 증명 전략(Token, Basic, JWT, Hawk, None, Multi 등)이 구현해야 하는
//! 단일 연산 `authenticate`를 정의합니다.
//!
//! ## 실행 모드
//!
//! 백엔드의 실행 모드는 인터페이스가 아니라 구현체의 선언된 속성입니다.
//!
//! | 모드 | 구현 trait | 특징 |
//! |------|-----------|------|
//! | `Blocking` | [`AuthBackend`] | 호출 스레드에서 동기 실행, 중단 지점 없음 |
//! | `Suspending` | [`AsyncAuthBackend`] | 원격 검증 등을 기다리는 동안 워커를 양보 |
//!
//! 두 종류는 등록 시점에 [`Backend`] 합 타입으로 감싸지며, 디스패처는
//! 호출 시점에 이름이나 타입을 검사하지 않고 variant만 보고 호출 방식을 결정합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use auth_gateway::services::auth::{Backend, TokenAuthBackend};
//!
//! let token = Backend::blocking(TokenAuthBackend::with_tokens(["abc123"]));
//! let remote = Backend::suspending(IntrospectionAuthBackend::new(url)?);
//!
//! // 혼합 구성도 가능 (하나라도 suspending이면 Multi 전체가 suspending)
//! let multi = Backend::multi(vec![token, remote])?;
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::multi_backend::MultiAuthBackend;

/// 백엔드 실행 모드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// 동기 실행 (스레드 풀 서버 모델)
    Blocking,
    /// 비동기 실행 (협력적 스케줄러)
    Suspending,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Blocking => "blocking",
            ExecutionMode::Suspending => "suspending",
        }
    }
}

/// 동기(blocking) 인증 백엔드
///
/// 요청을 검사해서 Identity를 만들거나 `AppError::Unauthorized`로 실패합니다.
/// 요청 단위로 공유 상태를 변경해서는 안 됩니다.
pub trait AuthBackend: Send + Sync {
    /// 로그와 진단에 사용하는 백엔드 이름
    fn name(&self) -> &str;

    fn authenticate(&self, req: &AuthRequest, resource: &dyn Resource) -> AppResult<Identity>;
}

/// 비동기(suspending) 인증 백엔드
///
/// 취소나 타임아웃은 백엔드 스스로 `Unauthorized`로 표면화해야 합니다.
#[async_trait]
pub trait AsyncAuthBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn authenticate(&self, req: &AuthRequest, resource: &dyn Resource)
        -> AppResult<Identity>;
}

/// 실행 모드가 명시된 백엔드 핸들
///
/// 복제 비용은 `Arc` 복제뿐이며, 전역 기본 백엔드와 리소스 오버라이드 모두
/// 이 타입으로 보관됩니다.
#[derive(Clone)]
pub enum Backend {
    Blocking(Arc<dyn AuthBackend>),
    Suspending(Arc<dyn AsyncAuthBackend>),
}

impl Backend {
    /// 동기 백엔드 등록
    pub fn blocking<B>(backend: B) -> Self
    where
        B: AuthBackend + 'static,
    {
        Backend::Blocking(Arc::new(backend))
    }

    /// 비동기 백엔드 등록
    pub fn suspending<B>(backend: B) -> Self
    where
        B: AsyncAuthBackend + 'static,
    {
        Backend::Suspending(Arc::new(backend))
    }

    /// 순서대로 시도하는 복합 백엔드 등록
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 백엔드 목록이 비어있는 경우
    pub fn multi(backends: Vec<Backend>) -> AppResult<Self> {
        Ok(MultiAuthBackend::new(backends)?.into_backend())
    }

    pub fn name(&self) -> &str {
        match self {
            Backend::Blocking(backend) => backend.name(),
            Backend::Suspending(backend) => backend.name(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        match self {
            Backend::Blocking(_) => ExecutionMode::Blocking,
            Backend::Suspending(_) => ExecutionMode::Suspending,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.mode() == ExecutionMode::Blocking
    }

    /// 호출 스레드에서 동기적으로 인증합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 인증 실패
    /// * `AppError::ConfigurationError` - suspending 백엔드를 blocking 경로에서 호출한 경우
    pub fn authenticate_blocking(
        &self,
        req: &AuthRequest,
        resource: &dyn Resource,
    ) -> AppResult<Identity> {
        match self {
            Backend::Blocking(backend) => backend.authenticate(req, resource),
            Backend::Suspending(backend) => Err(AppError::ConfigurationError(format!(
                "suspending 백엔드 '{}'는 blocking 모드에서 호출할 수 없습니다",
                backend.name()
            ))),
        }
    }

    /// 각 백엔드의 실행 모드에 맞게 인증합니다.
    ///
    /// blocking 백엔드는 중단 지점 없이 바로 실행되고,
    /// suspending 백엔드는 완료될 때까지 await 합니다.
    pub async fn authenticate(
        &self,
        req: &AuthRequest,
        resource: &dyn Resource,
    ) -> AppResult<Identity> {
        match self {
            Backend::Blocking(backend) => backend.authenticate(req, resource),
            Backend::Suspending(backend) => backend.authenticate(req, resource).await,
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.name())
            .field("mode", &self.mode())
            .finish()
    }
}
