//! Request handlers for the task tracker.
//!
//! Every handler resolves the session first: anonymous requests are sent to
//! `/login`, then record lookups fail with 404 or redirect to `/` when the
//! task belongs to someone else.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tally_core::{AppContext, AppError, AppResult, Session};

use crate::models::{TaskForm, TaskId};
use crate::pages::{self, FormMode};
use crate::store;

/// `GET /`
pub async fn index(State(ctx): State<AppContext>, session: Session) -> AppResult<Html<String>> {
    let user_id = session.require_user()?;
    let tasks = store::list_tasks(ctx.pool(), user_id).await?;
    let flash = session.take_flash(ctx.pool()).await?;
    Ok(Html(pages::task_list_page(&tasks, flash.as_deref())))
}

/// `GET /add_task`
pub async fn add_task_page(session: Session) -> AppResult<Html<String>> {
    session.require_user()?;
    Ok(Html(pages::task_form_page(&FormMode::Add, &TaskForm::default(), None)))
}

/// `POST /add_task`
pub async fn add_task_submit(
    State(ctx): State<AppContext>,
    session: Session,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let user_id = session.require_user()?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(e) => return invalid_form(&FormMode::Add, &form, e),
    };
    store::create_task(ctx.pool(), user_id, &fields).await?;
    Ok(Redirect::to("/").into_response())
}

/// `GET /edit_task/{id}`
pub async fn edit_task_page(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<TaskId>,
) -> AppResult<Html<String>> {
    let user_id = session.require_user()?;
    let task = store::owned_task(ctx.pool(), id, user_id).await?;
    Ok(Html(pages::task_form_page(
        &FormMode::Edit(id),
        &TaskForm::from_task(&task),
        None,
    )))
}

/// `POST /edit_task/{id}`
pub async fn edit_task_submit(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<TaskId>,
    Form(form): Form<TaskForm>,
) -> AppResult<Response> {
    let user_id = session.require_user()?;
    // Ownership first: a stranger is redirected whatever the body holds.
    store::owned_task(ctx.pool(), id, user_id).await?;
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(e) => return invalid_form(&FormMode::Edit(id), &form, e),
    };
    store::update_task(ctx.pool(), id, user_id, &fields).await?;
    Ok(Redirect::to("/").into_response())
}

/// `GET /delete_task/{id}`
pub async fn delete_task(
    State(ctx): State<AppContext>,
    session: Session,
    Path(id): Path<TaskId>,
) -> AppResult<Redirect> {
    let user_id = session.require_user()?;
    store::delete_task(ctx.pool(), id, user_id).await?;
    Ok(Redirect::to("/"))
}

/// Re-render the form with the validation message and a 400.
fn invalid_form(mode: &FormMode, form: &TaskForm, err: AppError) -> AppResult<Response> {
    match err {
        AppError::Validation(msg) => Ok((
            StatusCode::BAD_REQUEST,
            Html(pages::task_form_page(mode, form, Some(&msg))),
        )
            .into_response()),
        other => Err(other),
    }
}
