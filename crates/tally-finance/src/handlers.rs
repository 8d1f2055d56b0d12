//! Request handlers for the finance tracker.

use axum::{
    Form,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use tally_core::{AppContext, AppError, AppResult, Session, UserId, forms::DATE_FORMAT};

use crate::models::TransactionForm;
use crate::spreadsheet::{self, EXPORT_FILENAME, XLSX_CONTENT_TYPE};
use crate::{pages, report, store};

pub const ADDED_MESSAGE: &str = "Transaction added successfully";
pub const IMPORTED_MESSAGE: &str = "Data imported successfully";
pub const NO_FILE_MESSAGE: &str = "No file selected";

/// Multipart field carrying the uploaded workbook.
const UPLOAD_FIELD: &str = "file";

/// `GET /`
pub async fn index(State(ctx): State<AppContext>, session: Session) -> AppResult<Html<String>> {
    let user_id = session.require_user()?;
    let transactions = store::list_transactions(ctx.pool(), user_id).await?;
    let summary = report::summarize(&transactions);
    let flash = session.take_flash(ctx.pool()).await?;
    Ok(Html(pages::dashboard_page(&transactions, &summary, flash.as_deref())))
}

/// `GET /add_transaction`
pub async fn add_transaction_page(session: Session) -> AppResult<Html<String>> {
    session.require_user()?;
    let form = TransactionForm {
        date: chrono::Local::now().date_naive().format(DATE_FORMAT).to_string(),
        ..TransactionForm::default()
    };
    Ok(Html(pages::add_transaction_page(&form, None)))
}

/// `POST /add_transaction`
pub async fn add_transaction_submit(
    State(ctx): State<AppContext>,
    session: Session,
    Form(form): Form<TransactionForm>,
) -> AppResult<Response> {
    let user_id = session.require_user()?;
    let tx = match form.validate() {
        Ok(tx) => tx,
        Err(AppError::Validation(msg)) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(pages::add_transaction_page(&form, Some(&msg))),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    };

    store::add_transaction(ctx.pool(), user_id, &tx).await?;
    session.set_flash(ctx.pool(), ADDED_MESSAGE).await?;
    Ok(Redirect::to("/").into_response())
}

/// `GET /export`: the user's transactions as an `.xlsx` download.
pub async fn export(State(ctx): State<AppContext>, session: Session) -> AppResult<Response> {
    let user_id = session.require_user()?;
    let transactions = store::list_transactions(ctx.pool(), user_id).await?;
    let bytes = spreadsheet::export_xlsx(&transactions)?;
    tracing::info!(user_id, rows = transactions.len(), "exported transactions");

    let disposition = format!("attachment; filename=\"{EXPORT_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, disposition.as_str()),
        ],
        bytes,
    )
        .into_response())
}

/// `POST /import`
///
/// Always redirects to `/`; the outcome is reported as a flash message. A
/// request without a multipart body counts as no file chosen.
pub async fn import(
    State(ctx): State<AppContext>,
    session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Redirect> {
    let user_id = session.require_user()?;

    let upload = match multipart {
        Ok(multipart) => read_upload(multipart).await,
        Err(rejection) => {
            tracing::debug!(user_id, reason = %rejection.body_text(), "import without multipart body");
            Ok(None)
        }
    };

    let message = match upload {
        Ok(None) => NO_FILE_MESSAGE.to_string(),
        Ok(Some(bytes)) => match import_workbook(&ctx, user_id, &bytes).await {
            Ok(count) => {
                tracing::info!(user_id, count, "import finished");
                IMPORTED_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "import failed");
                format!("Import failed: {e}")
            }
        },
        Err(e) => {
            tracing::warn!(user_id, error = %e, "upload could not be read");
            format!("Import failed: {e}")
        }
    };

    session.set_flash(ctx.pool(), &message).await?;
    Ok(Redirect::to("/"))
}

/// Bytes of the `file` part, or `None` when no file was chosen.
async fn read_upload(mut multipart: Multipart) -> AppResult<Option<Vec<u8>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Spreadsheet(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if field.file_name().is_none_or(str::is_empty) {
            return Ok(None);
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Spreadsheet(e.body_text()))?;
        return Ok(Some(bytes.to_vec()));
    }
    Ok(None)
}

async fn import_workbook(ctx: &AppContext, user_id: UserId, bytes: &[u8]) -> AppResult<usize> {
    let rows = spreadsheet::import_xlsx(bytes)?;
    store::insert_batch(ctx.pool(), user_id, &rows).await
}
