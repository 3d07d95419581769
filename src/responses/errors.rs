use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};
use tracing::{error, warn};

pub type ResultResp = Result<Response, ServerError>;

/// Convert a ServerError into an HTML error page with a matching status.
pub fn error_to_response(err: ServerError) -> Response {
    match err {
        ServerError::NotFound => html_error_response(404, "Not Found"),
        ServerError::BadRequest(msg) => {
            warn!(%msg, "Rejected request");
            html_error_response(400, &msg)
        }
        ServerError::Internal(msg) => {
            error!(%msg, "Request failed");
            html_error_response(500, "Internal Server Error")
        }
        ServerError::XlsxError(msg) => {
            error!(%msg, "Export failed");
            html_error_response(500, &format!("Spreadsheet Error: {msg}"))
        }
    }
}

pub fn html_error_response(status: u16, message: &str) -> Response {
    let html = error_page(status, message).into_string();

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
