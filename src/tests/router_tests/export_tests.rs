// src/tests/router_tests/export_tests.rs
use crate::errors::ServerError;
use crate::responses::{error_to_response, XLSX_CONTENT_TYPE};
use crate::router::handle;
use crate::spreadsheets::export_xlsx::EXPORT_HEADERS;
use crate::tests::utils::{
    body_bytes, get, post_form, raw_listing, session_cookie, test_state, text, xlsx_rows,
};
use url::form_urlencoded::byte_serialize;

fn id_field(id: &str) -> String {
    format!("id={}", byte_serialize(id.as_bytes()).collect::<String>())
}

#[test]
fn exports_selected_listings_as_xlsx() -> Result<(), ServerError> {
    let state = test_state(vec![
        raw_listing("100", 2, 1, Some(1.0)),
        raw_listing("300", 2, 1, Some(3.0)),
    ]);

    let search = handle(get("/search?location=60614", None), &state)?;
    let cookie = session_cookie(&search).expect("session cookie");

    let form = format!(
        "{}&{}",
        id_field("https://www.realtor.com/rentals/details/300"),
        id_field("https://www.realtor.com/rentals/details/not-in-results")
    );
    let resp = handle(post_form("/export", Some(&cookie), &form), &state)?;

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").and_then(|v| v.to_str().ok()),
        Some(XLSX_CONTENT_TYPE)
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"rentals_"));
    assert!(disposition.ends_with(".xlsx\""));

    let rows = xlsx_rows(body_bytes(resp));
    assert_eq!(rows.len(), 2, "header plus the one listing that was in the results");
    assert_eq!(rows[1][4], text("https://www.realtor.com/rentals/details/300"));
    assert_eq!(rows[1][0], text("300 N Clark St"));
    Ok(())
}

#[test]
fn empty_selection_still_downloads() -> Result<(), ServerError> {
    let state = test_state(vec![raw_listing("100", 2, 1, Some(1.0))]);
    let search = handle(get("/search?location=60614", None), &state)?;
    let cookie = session_cookie(&search).expect("session cookie");

    let resp = handle(post_form("/export", Some(&cookie), ""), &state)?;
    assert_eq!(resp.status(), 200);

    let rows = xlsx_rows(body_bytes(resp));
    let header: Vec<_> = EXPORT_HEADERS.iter().map(|h| text(h)).collect();
    assert_eq!(rows, vec![header]);
    Ok(())
}

#[test]
fn export_without_search_is_rejected() {
    let state = test_state(Vec::new());

    let no_cookie = handle(post_form("/export", None, "id=x"), &state);
    assert!(matches!(no_cookie, Err(ServerError::BadRequest(_))));

    let unknown_session = handle(post_form("/export", Some("sid=never-searched"), "id=x"), &state);
    let err = match unknown_session {
        Err(e) => e,
        Ok(_) => panic!("expected rejection"),
    };
    assert!(matches!(err, ServerError::BadRequest(_)));
    assert_eq!(error_to_response(err).status(), 400);
}

#[test]
fn export_uses_latest_search() -> Result<(), ServerError> {
    let state = test_state(vec![
        raw_listing("100", 1, 1, Some(1.0)),
        raw_listing("300", 3, 2, Some(3.0)),
    ]);
    let first = handle(get("/search?location=60614", None), &state)?;
    let cookie = session_cookie(&first).expect("session cookie");
    handle(get("/search?location=60614&min_beds=3", Some(&cookie)), &state)?;

    let sid = cookie.trim_start_matches("sid=");
    let kept = state
        .sessions
        .with_outcome(sid, |o| o.listings.iter().map(|l| l.beds).collect::<Vec<_>>());
    assert_eq!(kept, Some(vec![3]));
    Ok(())
}
