use axum::{
    extract::State,
    response::Redirect,
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use super::errors::ApiError;
use super::routes::AppState;
use crate::auth::session;
use crate::models::CreateUser;
use crate::services::RegisterOutcome;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Register a new user
#[tracing::instrument(skip(state, jar, form))]
pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let email = form.email.trim().to_string();
    if email.is_empty() || form.password.is_empty() {
        return Err(ApiError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let outcome = state
        .users
        .register(CreateUser {
            email,
            password: form.password,
        })
        .await?;

    match outcome {
        RegisterOutcome::Created(user) => {
            info!(user_id = %user.id, "registered new user");
            Ok((
                session::set_flash(
                    jar,
                    "success",
                    "Registration successful. You can now log in.",
                ),
                Redirect::to("/login"),
            ))
        }
        RegisterOutcome::DuplicateEmail => Ok((
            session::set_flash(jar, "danger", "Email already registered. Please log in."),
            Redirect::to("/login"),
        )),
    }
}

/// Login user
#[tracing::instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    match state
        .users
        .verify_credentials(form.email.trim(), &form.password)
        .await?
    {
        Some(user) => {
            info!(user_id = %user.id, "login successful");
            let jar = session::authenticate(jar, user.id);
            Ok((
                session::set_flash(jar, "success", "Login successful"),
                Redirect::to("/dashboard"),
            ))
        }
        // Unknown email and wrong password get the same message.
        None => Ok((
            session::set_flash(
                jar,
                "danger",
                "Login failed. Please check your email and password.",
            ),
            Redirect::to("/login"),
        )),
    }
}

/// Logout user
#[tracing::instrument(skip(jar))]
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, Redirect) {
    let jar = session::clear(jar);
    (
        session::set_flash(jar, "success", "You have been logged out."),
        Redirect::to("/login"),
    )
}
