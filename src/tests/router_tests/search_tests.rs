// src/tests/router_tests/search_tests.rs
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, raw_listing, session_cookie, test_state};
use serde_json::json;

#[test]
fn home_page_renders_search_form() -> Result<(), ServerError> {
    let state = test_state(Vec::new());

    let resp = handle(get("/", None), &state)?;
    assert_eq!(resp.status(), 200);

    let html = body_string(resp);
    assert!(html.contains(r#"action="/search""#));
    assert!(html.contains(r#"name="location""#));
    assert!(html.contains(r#"value="60614""#));
    assert!(html.contains(r#"name="property_type""#));
    Ok(())
}

#[test]
fn search_renders_ranked_results_and_sets_session() -> Result<(), ServerError> {
    let state = test_state(vec![
        raw_listing("800", 2, 1, Some(8.0)),
        raw_listing("300", 2, 1, Some(3.0)),
        raw_listing("100", 2, 1, Some(1.0)),
    ]);

    let resp = handle(get("/search?location=60614&radius=5&min_beds=2", None), &state)?;
    assert_eq!(resp.status(), 200);

    let cookie = session_cookie(&resp).expect("new visitors get a session cookie");
    assert!(cookie.starts_with("sid="));

    let html = body_string(resp);
    let near = html.find("details/100").expect("1 mi listing shown");
    let mid = html.find("details/300").expect("3 mi listing shown");
    assert!(near < mid, "closest listing comes first");
    assert!(!html.contains("details/800"));
    assert!(html.contains("1.0 mi"));
    assert!(html.contains(r#"action="/export""#));
    assert!(html.contains("mailto:agent100@example.com?subject="));
    Ok(())
}

#[test]
fn existing_session_is_reused() -> Result<(), ServerError> {
    let state = test_state(vec![raw_listing("100", 2, 1, Some(1.0))]);

    let first = handle(get("/search?location=60614", None), &state)?;
    let cookie = session_cookie(&first).expect("session cookie");

    let second = handle(get("/search?location=60614&min_beds=3", Some(&cookie)), &state)?;
    assert!(second.headers().get("Set-Cookie").is_none());
    assert_eq!(state.sessions.len(), 1);

    let sid = cookie.trim_start_matches("sid=");
    let stored = state.sessions.with_outcome(sid, |o| o.listings.len());
    assert_eq!(stored, Some(0));
    Ok(())
}

#[test]
fn unknown_session_ids_are_replaced() -> Result<(), ServerError> {
    let state = test_state(vec![raw_listing("100", 2, 1, Some(1.0))]);

    let resp = handle(get("/search?location=60614", Some("sid=made-up")), &state)?;
    let cookie = session_cookie(&resp).expect("a server-issued id replaces the forged one");
    assert_ne!(cookie, "sid=made-up");

    assert!(!state.sessions.contains("made-up"));
    assert_eq!(state.sessions.len(), 1);
    Ok(())
}

#[test]
fn empty_and_ungeocoded_searches_explain_themselves() -> Result<(), ServerError> {
    let state = test_state(Vec::new());
    let html = body_string(handle(get("/search?location=60614", None), &state)?);
    assert!(html.contains("No rental listings found"));
    assert!(!html.contains("Search failed"));

    let state = test_state(vec![raw_listing("100", 2, 1, Some(1.0))]);
    let html = body_string(handle(get("/search?location=Nowhere%2C+XX", None), &state)?);
    assert!(html.contains("could not be geocoded"));
    assert!(html.contains("details/100"));
    Ok(())
}

#[test]
fn results_show_size_bath_split_and_office() -> Result<(), ServerError> {
    let mut raw = raw_listing("100", 2, 1, Some(1.0));
    raw["half_baths"] = json!(1);
    raw["sqft"] = json!(1250);
    raw["office_name"] = json!("North Side Realty");
    raw["office_email"] = json!("leasing@example.com");
    let state = test_state(vec![raw]);

    let html = body_string(handle(get("/search?location=60614", None), &state)?);
    assert!(html.contains("<th>Sq ft</th>"));
    assert!(html.contains("<td>1,250</td>"));
    assert!(html.contains("<td>1 / 1</td>"));
    assert!(html.contains("North Side Realty"));
    assert!(html.contains("mailto:leasing@example.com?subject="));
    Ok(())
}

#[test]
fn invalid_query_is_bad_request() {
    let state = test_state(Vec::new());

    for uri in ["/search", "/search?location=60614&radius=500", "/search?location=60614&min_beds=x"] {
        let result = handle(get(uri, None), &state);
        assert!(
            matches!(result, Err(ServerError::BadRequest(_))),
            "expected 400 for {uri}"
        );
    }
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state(Vec::new());
    assert!(matches!(
        handle(get("/admin", None), &state),
        Err(ServerError::NotFound)
    ));
}
