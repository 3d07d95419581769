use crate::domain::search::SearchQuery;
use crate::domain::selection::select;
use crate::domain::session::{generate_session_id, SESSION_COOKIE};
use crate::errors::ServerError;
use crate::responses::{html_response, html_response_with_cookie, xlsx_response, ResultResp};
use crate::spreadsheets::export_listings_xlsx;
use crate::state::AppState;
use crate::templates;
use astra::Request;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, info};
use url::form_urlencoded;

pub fn handle(mut req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "Request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => html_response(templates::pages::home_page(&SearchQuery::default())),
        ("GET", "/search") => search(&req, state),
        ("POST", "/export") => export(&mut req, state),
        _ => Err(ServerError::NotFound),
    }
}

fn search(req: &Request, state: &AppState) -> ResultResp {
    let pairs = form_urlencoded::parse(req.uri().query().unwrap_or("").as_bytes()).into_owned();
    let query = SearchQuery::from_pairs(pairs)?;

    // Only ids this server issued and still holds are honored.
    let known = session_id(req).filter(|sid| state.sessions.contains(sid));
    let (sid, set_cookie) = match known {
        Some(sid) => (sid, None),
        None => {
            let sid = generate_session_id();
            let cookie = format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax");
            (sid, Some(cookie))
        }
    };

    let ticket = state.sessions.begin(&sid);
    debug!(sessions = state.sessions.len(), new_session = set_cookie.is_some(), "Search started");
    let outcome = state.pipeline.run(&query);
    let page = templates::pages::results_page(&outcome);
    state.sessions.complete(&sid, ticket, outcome);

    html_response_with_cookie(page, set_cookie.as_deref())
}

fn export(req: &mut Request, state: &AppState) -> ResultResp {
    let sid = session_id(req)
        .ok_or_else(|| ServerError::BadRequest("Run a search before exporting".into()))?;

    let mut body = String::new();
    req.body_mut()
        .reader()
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;

    let chosen: HashSet<String> = form_urlencoded::parse(body.as_bytes())
        .filter(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .collect();

    let (count, buffer) = state
        .sessions
        .with_outcome(&sid, |outcome| {
            let selected = select(&outcome.listings, &chosen);
            export_listings_xlsx(&selected, outcome.half_baths).map(|buf| (selected.len(), buf))
        })
        .ok_or_else(|| ServerError::BadRequest("Run a search before exporting".into()))??;

    let filename = format!("rentals_{}.xlsx", chrono::Local::now().format("%Y%m%d-%H%M%S"));
    info!(rows = count, requested = chosen.len(), %filename, "Exporting listings");

    xlsx_response(buffer, &filename)
}

/// The `sid` value from the request's Cookie header, if present.
fn session_id(req: &Request) -> Option<String> {
    req.headers()
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
