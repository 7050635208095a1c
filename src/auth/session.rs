use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use uuid::Uuid;

const SESSION_COOKIE: &str = "hh_session";
const FLASH_COOKIE: &str = "hh_flash";

/// One-shot notification rendered on the next page view, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: String,
    pub message: String,
}

/// Mark the session as authenticated for the given user.
pub fn authenticate(jar: SignedCookieJar, user_id: Uuid) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, user_id.to_string()))
            .path("/")
            .http_only(true)
            .build(),
    )
}

/// The authenticated user id, if the request carries a valid session cookie.
pub fn current_user(jar: &SignedCookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Drop the session cookie.
pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}

/// Queue a flash message for the next rendered page.
pub fn set_flash(jar: SignedCookieJar, kind: &str, message: &str) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, format!("{kind}|{message}")))
            .path("/")
            .http_only(true)
            .build(),
    )
}

/// Consume the pending flash message, removing its cookie.
pub fn take_flash(jar: SignedCookieJar) -> (SignedCookieJar, Option<Flash>) {
    let flash = jar.get(FLASH_COOKIE).and_then(|cookie| {
        let (kind, message) = cookie.value().split_once('|')?;
        Some(Flash {
            kind: kind.to_string(),
            message: message.to_string(),
        })
    });

    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/").build());
    (jar, flash)
}
