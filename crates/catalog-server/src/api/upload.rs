use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use catalog_ingest::{ingest, report, Report, ReportBody, ReportKind};
use catalog_store::ProductStore;

use crate::middleware::RequestId;

use super::AppState;

const FILE_FIELD: &str = "file";
const NO_FILE_MESSAGE: &str = "no file selected";

/// `POST /api/upload`: import one CSV file sent as multipart field `file`.
pub(super) async fn upload<S: ProductStore>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ReportBody>) {
    let bytes = match read_file_field(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::info!(request_id = %req_id.0, "upload rejected: no file");
            return respond(Report::input_error(NO_FILE_MESSAGE));
        }
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "unreadable multipart body");
            return (
                e.status(),
                Json(ReportBody::Error {
                    error: e.body_text(),
                }),
            );
        }
    };

    let result = ingest(state.store.as_ref(), &state.images, &bytes).await;
    let report = report(&result);

    tracing::info!(
        request_id = %req_id.0,
        kind = ?report.kind,
        rows = report.row_count(),
        "upload finished"
    );

    respond(report)
}

/// Returns the content of the first non-empty `file` part. Other parts are
/// skipped, as is a `file` part with an empty filename (a form submitted
/// without choosing a file).
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if field.file_name().is_some_and(str::is_empty) {
            continue;
        }
        return field.bytes().await.map(Some);
    }
    Ok(None)
}

fn status_for(kind: ReportKind) -> StatusCode {
    match kind {
        ReportKind::Success | ReportKind::Empty => StatusCode::OK,
        ReportKind::InputError => StatusCode::BAD_REQUEST,
        ReportKind::DecodeFailed | ReportKind::StoreFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond(report: Report) -> (StatusCode, Json<ReportBody>) {
    (status_for(report.kind), Json(report.body))
}
