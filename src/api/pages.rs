use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::SignedCookieJar;

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::session::{self, Flash};
use crate::models::HealthSubmission;

/// Escape user-provided text before splicing it into HTML.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let flash_html = flash
        .map(|f| {
            format!(
                r#"<p class="flash {}">{}</p>"#,
                escape_html(&f.kind),
                escape_html(&f.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title} - HealthHub</title>
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/dashboard">Dashboard</a>
    <a href="/login">Login</a>
    <a href="/register">Register</a>
  </nav>
  {flash_html}
  {body}
</body>
</html>"#
    )
}

fn predict_form() -> &'static str {
    r#"<form method="post" action="/predict">
    <label>Age <input type="text" name="Age" required></label>
    <label>SystolicBP <input type="text" name="SystolicBP" required></label>
    <label>DiastolicBP <input type="text" name="DiastolicBP" required></label>
    <label>BS <input type="text" name="BS" required></label>
    <label>BodyTemp <input type="text" name="BodyTemp" required></label>
    <label>HeartRate <input type="text" name="HeartRate" required></label>
    <button type="submit">Predict</button>
  </form>"#
}

pub async fn index(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    let body = format!(
        r#"<h1>HealthHub</h1>
  <p>Enter six vital-sign measurements to get a health risk prediction.</p>
  {}"#,
        predict_form()
    );
    (jar, Html(layout("Home", flash.as_ref(), &body)))
}

/// Dashboard is only reachable with an authenticated session; anonymous
/// requests are redirected to the login page.
#[tracing::instrument(skip(state, jar))]
pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, ApiError> {
    let Some(user_id) = session::current_user(&jar) else {
        return Err(ApiError::Unauthenticated);
    };
    // A session cookie for a deleted account is treated the same way.
    let Some(user) = state.users.get_user_by_id(user_id).await? else {
        return Err(ApiError::Unauthenticated);
    };

    let recent = state.submissions.list_recent(10).await?;

    let (jar, flash) = session::take_flash(jar);
    let body = format!(
        r#"<h1>Dashboard</h1>
  <p>Signed in as {}.</p>
  <form method="post" action="/logout"><button type="submit">Log out</button></form>
  <h2>Recent submissions</h2>
  {}
  <h2>New prediction</h2>
  {}"#,
        escape_html(&user.email),
        submissions_table(&recent),
        predict_form()
    );

    Ok((jar, Html(layout("Dashboard", flash.as_ref(), &body))).into_response())
}

fn submissions_table(submissions: &[HealthSubmission]) -> String {
    if submissions.is_empty() {
        return "<p>No submissions yet.</p>".to_string();
    }

    let rows: String = submissions
        .iter()
        .map(|s| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                s.created_at.format("%Y-%m-%d %H:%M:%S"),
                s.age,
                s.systolic_bp,
                s.diastolic_bp,
                s.blood_sugar,
                s.body_temp,
                s.heart_rate,
                escape_html(&s.result_label),
            )
        })
        .collect();

    format!(
        r#"<table>
    <tr><th>When</th><th>Age</th><th>SystolicBP</th><th>DiastolicBP</th><th>BS</th><th>BodyTemp</th><th>HeartRate</th><th>Result</th></tr>
    {rows}
  </table>"#
    )
}

pub async fn login_page(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    let body = r#"<h1>Login</h1>
  <form method="post" action="/login">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Log in</button>
  </form>
  <p>No account yet? <a href="/register">Register</a>.</p>"#;
    (jar, Html(layout("Login", flash.as_ref(), body)))
}

pub async fn register_page(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, flash) = session::take_flash(jar);
    let body = r#"<h1>Register</h1>
  <form method="post" action="/register">
    <label>Email <input type="email" name="email" required></label>
    <label>Password <input type="password" name="password" required></label>
    <button type="submit">Create account</button>
  </form>"#;
    (jar, Html(layout("Register", flash.as_ref(), body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">&'"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
