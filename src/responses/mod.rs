pub mod errors;
pub mod html;
pub mod xlsx;

pub use errors::{error_to_response, html_error_response, ResultResp};
pub use html::{html_response, html_response_with_cookie};
pub use xlsx::{xlsx_response, XLSX_CONTENT_TYPE};
