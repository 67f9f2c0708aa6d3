//! Tests for pagination module

use super::*;
use serde_json::json;
use test_case::test_case;

const BASE: &str = "https://api.rechargeapps.com/subscriptions";

// ============================================================================
// next_url Tests
// ============================================================================

#[test_case(json!({}) ; "cursor absent")]
#[test_case(json!({"next_cursor": null}) ; "cursor null")]
#[test_case(json!({"subscriptions": [], "previous_cursor": "xyz"}) ; "only previous cursor")]
fn test_next_url_none_without_cursor(body: serde_json::Value) {
    assert_eq!(next_url(&body, BASE), None);
}

#[test]
fn test_next_url_with_cursor() {
    let body = json!({"next_cursor": "abc", "subscriptions": []});
    assert_eq!(
        next_url(&body, BASE).as_deref(),
        Some("https://api.rechargeapps.com/subscriptions?limit=250&page_info=abc")
    );
}

#[test]
fn test_next_url_passes_cursor_through() {
    let cursor = "eyJsYXN0X2lkIjo0MiwibGFzdF92YWx1ZSI6NDJ9==";
    let body = json!({ "next_cursor": cursor });
    assert_eq!(
        next_url(&body, "/orders"),
        Some(format!("/orders?limit=250&page_info={cursor}"))
    );
}

#[test]
fn test_extract_cursor_non_string() {
    assert_eq!(extract_cursor(&json!({"next_cursor": 17})), Some("17".to_string()));
    assert_eq!(extract_cursor(&json!({"next_cursor": null})), None);
}

// ============================================================================
// NextPage / PaginationState Tests
// ============================================================================

#[test]
fn test_next_page_variants() {
    let next = NextPage::with_url("https://api.example.com/page2");
    assert!(next.is_continue());
    assert!(!next.is_done());
    assert!(NextPage::Done.is_done());
}

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::new();
    assert_eq!(state.pages, 0);

    state.next_page();
    state.add_fetched(250);
    state.set_cursor("c1".to_string());
    assert_eq!(state.pages, 1);
    assert_eq!(state.total_fetched, 250);
    assert_eq!(state.cursor.as_deref(), Some("c1"));

    state.mark_done();
    assert!(state.done);
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_cursor_paginator_continue() {
    let paginator = CursorPaginator::new(BASE);
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!({"next_cursor": "abc"}), 250, &mut state);

    assert_eq!(
        next,
        NextPage::with_url(format!("{BASE}?limit=250&page_info=abc"))
    );
    assert_eq!(state.cursor.as_deref(), Some("abc"));
    assert_eq!(state.total_fetched, 250);
    assert!(!state.done);
}

#[test]
fn test_cursor_paginator_done_without_cursor() {
    let paginator = CursorPaginator::new(BASE);
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!({"subscriptions": []}), 0, &mut state);

    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.pages, 1);
}

#[test]
fn test_cursor_paginator_done_on_empty_cursor() {
    let paginator = CursorPaginator::new(BASE);
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!({"next_cursor": ""}), 3, &mut state);

    assert!(next.is_done());
    assert!(state.cursor.is_none());
}
