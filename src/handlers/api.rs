//! # API Handlers
//!
//! 인증 미들웨어 뒤에서 동작하는 예제 엔드포인트입니다.
//! 핸들러는 자격 증명을 직접 다루지 않고, 미들웨어가 요청 컨텍스트에 저장한
//! Identity를 추출기로 받아 사용합니다.
//!
//! | 메서드 | 경로 | 추출기 | 인증 |
//! |--------|------|--------|------|
//! | `GET` | `/api/v1/me` | `Identity` | 필수 |
//! | `GET` | `/api/v1/items` | `OptionalIdentity` | 전역 설정에 따름 |
//! | `GET` | `/api/v1/public` | 없음 | 비활성화 |

use actix_web::{get, HttpResponse};
use serde_json::json;

use crate::domain::auth::{Identity, OptionalIdentity};

/// 현재 인증된 사용자 조회
///
/// ```bash
/// curl http://localhost:8080/api/v1/me -H "Authorization: Bearer abc123"
/// ```
#[get("/me")]
pub async fn me(identity: Identity) -> HttpResponse {
    log::debug!("사용자 정보 조회: {}", identity.as_value());
    HttpResponse::Ok().json(json!({ "user": identity }))
}

/// 항목 목록 조회
///
/// 면제 메서드나 리소스 설정으로 인증을 건너뛴 경우에도 응답하며,
/// 인증된 경우에만 사용자 정보를 함께 돌려줍니다.
#[get("/items")]
pub async fn list_items(identity: OptionalIdentity) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "items": ["alpha", "beta", "gamma"],
        "user": identity.0,
    }))
}

/// 인증이 비활성화된 공개 엔드포인트
#[get("/public")]
pub async fn public_info() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "public resource",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
