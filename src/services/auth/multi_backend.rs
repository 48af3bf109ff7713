//! 복합 백엔드
//!
//! 여러 백엔드를 등록 순서대로 시도하여 처음 성공한 백엔드의 Identity를 반환합니다.
//! (first-match-wins, 병합하거나 마지막 결과를 쓰지 않음)
//!
//! # 순서
//!
//! 재정렬 휴리스틱이 없으므로 비용이 낮고 구체적인 백엔드를 앞에 두는 것은
//! 호출자의 책임입니다.
//!
//! ```rust,ignore
//! let backend = Backend::multi(vec![
//!     Backend::blocking(TokenAuthBackend::with_tokens(["abc123"])),   // 로컬 검증
//!     Backend::suspending(IntrospectionAuthBackend::new(url)?),       // 원격 검증
//! ])?;
//! ```
//!
//! # 실패
//!
//! 모든 백엔드가 실패하면 각 백엔드의 challenge를 순서대로 모은
//! `Unauthorized("Authentication Failed")`를 반환합니다.
//! `Unauthorized`가 아닌 에러는 즉시 전파됩니다.

use async_trait::async_trait;

use crate::core::{AppError, AppResult};
use crate::domain::auth::{AuthRequest, Identity, Resource};
use crate::services::auth::backend::{AsyncAuthBackend, AuthBackend, Backend, ExecutionMode};

/// 순서대로 시도하는 복합 백엔드
pub struct MultiAuthBackend {
    backends: Vec<Backend>,
}

impl MultiAuthBackend {
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 백엔드 목록이 비어있는 경우
    pub fn new(backends: Vec<Backend>) -> AppResult<Self> {
        if backends.is_empty() {
            return Err(AppError::ConfigurationError(
                "MultiAuthBackend에는 최소 하나의 백엔드가 필요합니다".to_string(),
            ));
        }

        Ok(Self { backends })
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    /// 모든 구성 백엔드가 blocking일 때만 blocking
    pub fn mode(&self) -> ExecutionMode {
        if self.backends.iter().all(Backend::is_blocking) {
            ExecutionMode::Blocking
        } else {
            ExecutionMode::Suspending
        }
    }

    /// 실행 모드에 맞는 `Backend`로 등록
    pub fn into_backend(self) -> Backend {
        match self.mode() {
            ExecutionMode::Blocking => Backend::blocking(self),
            ExecutionMode::Suspending => Backend::suspending(self),
        }
    }
}

/// 실패한 백엔드들의 challenge 누적
#[derive(Default)]
struct Failures {
    challenges: Vec<String>,
    last: Option<(String, String)>,
}

impl Failures {
    /// `Unauthorized`면 누적하고, 그 외 에러는 그대로 돌려줌
    fn record(&mut self, backend: &Backend, err: AppError) -> AppResult<()> {
        match err {
            AppError::Unauthorized { description, challenges } => {
                for challenge in challenges {
                    if !self.challenges.contains(&challenge) {
                        self.challenges.push(challenge);
                    }
                }
                self.last = Some((backend.name().to_string(), description));
                Ok(())
            }
            other => Err(other),
        }
    }

    fn into_error(self) -> AppError {
        if let Some((name, description)) = &self.last {
            log::debug!("모든 백엔드 인증 실패 (마지막: {} - {})", name, description);
        }

        AppError::Unauthorized {
            description: "Authentication Failed".to_string(),
            challenges: self.challenges,
        }
    }
}

fn log_success(backend: &Backend, index: usize) {
    log::debug!("MultiAuthBackend: {}번째 백엔드 '{}' 인증 성공", index + 1, backend.name());
}

impl AuthBackend for MultiAuthBackend {
    fn name(&self) -> &str {
        "multi"
    }

    fn authenticate(&self, req: &AuthRequest, resource: &dyn Resource) -> AppResult<Identity> {
        let mut failures = Failures::default();

        for (index, backend) in self.backends.iter().enumerate() {
            match backend.authenticate_blocking(req, resource) {
                Ok(identity) => {
                    log_success(backend, index);
                    return Ok(identity);
                }
                Err(err) => failures.record(backend, err)?,
            }
        }

        Err(failures.into_error())
    }
}

#[async_trait]
impl AsyncAuthBackend for MultiAuthBackend {
    fn name(&self) -> &str {
        "multi"
    }

    async fn authenticate(
        &self,
        req: &AuthRequest,
        resource: &dyn Resource,
    ) -> AppResult<Identity> {
        let mut failures = Failures::default();

        for (index, backend) in self.backends.iter().enumerate() {
            match backend.authenticate(req, resource).await {
                Ok(identity) => {
                    log_success(backend, index);
                    return Ok(identity);
                }
                Err(err) => failures.record(backend, err)?,
            }
        }

        Err(failures.into_error())
    }
}
