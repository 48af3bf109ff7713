//! `Authorization` 헤더 파싱
//!
//! `"{prefix} {credentials}"` 형식의 헤더에서 자격 증명 부분만 추출합니다.
//! Token, Basic, JWT, Introspection 백엔드가 공유합니다.

use crate::core::{AppError, AppResult};
use crate::domain::auth::AuthRequest;

/// `Authorization` 헤더에서 prefix 뒤의 자격 증명을 추출
///
/// prefix 비교는 대소문자를 구분하지 않습니다. 실패 시 `challenge`를 담은
/// `Unauthorized`를 반환합니다.
///
/// # Errors
///
/// * 헤더 없음 또는 빈 값 → `Missing Authorization Header`
/// * prefix 불일치 → `Invalid Authorization Header: Must start with {prefix}`
/// * 자격 증명 없음 → `Invalid Authorization Header: Token Missing`
/// * 공백으로 구분된 추가 내용 → `Invalid Authorization Header: Contains extra content`
///
/// # Examples
///
/// ```rust,ignore
/// let req = AuthRequest::new(Method::GET, "/").with_authorization("Bearer abc123");
/// assert_eq!(parse_auth_header(&req, "Bearer", "Bearer")?, "abc123");
/// ```
pub fn parse_auth_header<'a>(
    req: &'a AuthRequest,
    prefix: &str,
    challenge: &str,
) -> AppResult<&'a str> {
    let auth_header = req
        .header("authorization")
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization Header", challenge))?;

    let mut parts = auth_header.split_whitespace();

    let scheme = parts.next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case(prefix) {
        return Err(AppError::unauthorized(
            format!("Invalid Authorization Header: Must start with {}", prefix),
            challenge,
        ));
    }

    let credentials = parts.next().ok_or_else(|| {
        AppError::unauthorized("Invalid Authorization Header: Token Missing", challenge)
    })?;

    if parts.next().is_some() {
        return Err(AppError::unauthorized(
            "Invalid Authorization Header: Contains extra content",
            challenge,
        ));
    }

    Ok(credentials)
}
