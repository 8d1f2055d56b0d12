//! Register, login and logout pages.

use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::session::{self, Session};
use crate::templates::{card, error_banner, flash_banner, html_escape, input, layout, submit_button};

/// Credentials posted by both forms.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Register page query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RegisterQuery {
    #[serde(default)]
    pub error: Option<String>,
}

/// Login page query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub registered: Option<String>,
}

/// `GET /register`
pub async fn register_page(
    State(ctx): State<AppContext>,
    Query(query): Query<RegisterQuery>,
) -> Html<String> {
    let error = match query.error.as_deref() {
        Some("taken") => Some("That username is already taken."),
        Some(_) => Some("Please enter a username and a password."),
        None => None,
    };
    Html(register_template(&ctx, error))
}

/// `POST /register`
pub async fn register_submit(
    State(ctx): State<AppContext>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Redirect> {
    match crate::auth::register(ctx.pool(), &form.username, &form.password).await {
        Ok(_) => Ok(Redirect::to("/login?registered=1")),
        Err(AppError::Conflict(msg)) => {
            tracing::warn!(%msg, "registration rejected");
            Ok(Redirect::to("/register?error=taken"))
        }
        Err(AppError::Validation(_)) => Ok(Redirect::to("/register?error=invalid")),
        Err(e) => Err(e),
    }
}

/// `GET /login`
pub async fn login_page(
    State(ctx): State<AppContext>,
    Query(query): Query<LoginQuery>,
) -> Html<String> {
    Html(login_template(&ctx, &query))
}

/// `POST /login`
pub async fn login_submit(
    State(ctx): State<AppContext>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let next = safe_next(form.next.as_deref());

    let Some(user) = crate::auth::authenticate(ctx.pool(), &form.username, &form.password).await?
    else {
        tracing::warn!(username = %form.username, "failed login");
        let next = next
            .map(|n| format!("&next={}", urlencoding::encode(n)))
            .unwrap_or_default();
        return Ok(Redirect::to(&format!("/login?error=invalid{next}")).into_response());
    };

    let token = session::create(ctx.pool(), user.id).await?;
    tracing::info!(user_id = user.id, "logged in");

    let cookie = session::session_cookie(&ctx.config().session, &token);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(next.unwrap_or("/")),
    )
        .into_response())
}

/// `GET /logout`
pub async fn logout(State(ctx): State<AppContext>, session: Session) -> AppResult<Response> {
    if let Some(token) = session.token() {
        session::destroy(ctx.pool(), token).await?;
    }
    let cookie = session::clear_cookie(&ctx.config().session);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//"))
}

fn register_template(ctx: &AppContext, error: Option<&str>) -> String {
    let error_html = error.map(error_banner).unwrap_or_default();
    let form = format!(
        r##"{error_html}
        <form method="POST" action="/register">
            {username}
            {password}
            {submit}
        </form>
        <p class="mt-6 text-sm text-gray-500">Already have an account? <a href="/login" class="text-primary-600 hover:underline">Log in</a></p>"##,
        username = input("username", "Username", "text", "", true),
        password = input("password", "Password", "password", "", true),
        submit = submit_button("Create account"),
    );
    let content = format!(r##"<div class="max-w-md mx-auto">{}</div>"##, card("Register", &form));
    layout(ctx.brand(), "Register", false, None, &content)
}

fn login_template(ctx: &AppContext, query: &LoginQuery) -> String {
    let notice = if query.error.is_some() {
        error_banner("Invalid username or password. Please try again.")
    } else if query.registered.is_some() {
        flash_banner("Account created. You can log in now.")
    } else {
        String::new()
    };

    let next_input = safe_next(query.next.as_deref())
        .map(|n| format!(r#"<input type="hidden" name="next" value="{}">"#, html_escape(n)))
        .unwrap_or_default();

    let form = format!(
        r##"{notice}
        <form method="POST" action="/login">
            {next_input}
            {username}
            {password}
            {submit}
        </form>
        <p class="mt-6 text-sm text-gray-500">No account yet? <a href="/register" class="text-primary-600 hover:underline">Register</a></p>"##,
        username = input("username", "Username", "text", "", true),
        password = input("password", "Password", "password", "", true),
        submit = submit_button("Sign in"),
    );
    let content = format!(r##"<div class="max-w-md mx-auto">{}</div>"##, card("Log in", &form));
    layout(ctx.brand(), "Log in", false, None, &content)
}
