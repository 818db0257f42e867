//! Behaviour tests for the session symbol catalog and picker

mod support;

use hiram_core::{FetchError, HttpError, PickerState, SymbolCatalog, SymbolPicker};
use support::{client, ScriptedHttpClient};

// =============================================================================
// Catalog: Session Caching
// =============================================================================

#[tokio::test]
async fn when_catalog_is_requested_twice_only_one_request_is_made() {
    // Given: A backend serving two symbols
    let http = ScriptedHttpClient::new();
    http.respond_json("/symbols", support::CATALOG_JSON);
    let catalog = SymbolCatalog::new(client(&http));

    // When: The catalog is fetched twice in one session
    let first = catalog.fetch_all().await.expect("first fetch");
    let second = catalog.fetch_all().await.expect("second fetch");

    // Then: The second call is served from the session cache
    assert_eq!(first, second);
    assert_eq!(http.calls_to("/symbols"), 1);
    assert_eq!(first[1].label(), "MSFT - Microsoft Corp.");
}

#[tokio::test]
async fn when_catalog_is_requested_concurrently_one_request_is_shared() {
    let http = ScriptedHttpClient::new();
    http.respond_json("/symbols", support::CATALOG_JSON);
    let catalog = SymbolCatalog::new(client(&http));

    let (a, b, c) = tokio::join!(catalog.fetch_all(), catalog.fetch_all(), catalog.fetch_all());

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(http.calls_to("/symbols"), 1);
}

#[tokio::test]
async fn catalog_clones_share_the_cache() {
    let http = ScriptedHttpClient::new();
    http.respond_json("/symbols", support::CATALOG_JSON);
    let catalog = SymbolCatalog::new(client(&http));
    let picker_catalog = catalog.clone();

    assert!(catalog.cached().await.is_none());
    let _ = catalog.fetch_all().await.expect("fetch");

    assert_eq!(picker_catalog.cached().await.expect("shared").len(), 2);
    assert_eq!(http.calls_to("/symbols"), 1);
}

// =============================================================================
// Catalog: Failures
// =============================================================================

#[tokio::test]
async fn when_catalog_fails_the_picker_is_blocked_and_retry_refetches() {
    // Given: The symbols endpoint is down
    let http = ScriptedHttpClient::new();
    http.respond("/symbols", Err(HttpError::new("connection failed: refused")));
    let catalog = SymbolCatalog::new(client(&http));
    let mut picker = SymbolPicker::new();

    // When: The picker loads
    picker.load(&catalog).await;

    // Then: It is disabled with a blocking message
    assert!(!picker.is_enabled());
    assert!(matches!(picker.state(), PickerState::Unavailable { .. }));
    let message = picker.blocking_message().expect("blocking message");
    assert!(message.starts_with("Error loading data."), "message: {message}");

    // When: The service recovers and the picker reloads
    http.respond_json("/symbols", support::CATALOG_JSON);
    picker.load(&catalog).await;

    // Then: The failure was not cached and the picker is usable
    assert!(picker.is_enabled());
    assert_eq!(http.calls_to("/symbols"), 2);
    let options = picker.options("apple");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value.as_str(), "AAPL");
}

#[tokio::test]
async fn when_catalog_shape_is_wrong_a_decode_error_is_returned() {
    let http = ScriptedHttpClient::new();
    http.respond_json("/symbols", r#"{"symbols": []}"#);
    let catalog = SymbolCatalog::new(client(&http));

    let error = catalog.fetch_all().await.expect_err("must fail");

    assert!(matches!(error, FetchError::Decode(_)));
    assert!(catalog.cached().await.is_none());
}

#[tokio::test]
async fn when_the_directory_lists_preferred_shares_the_whole_catalog_loads() {
    // Given: A directory mixing common, preferred and unusable rows
    let http = ScriptedHttpClient::new();
    http.respond_json(
        "/symbols",
        r#"[
            {"symbol": "AAPL", "security_name": "Apple Inc."},
            {"symbol": "ABR$D", "security_name": "Arbor Realty Trust 6.375% Series D Preferred"},
            {"symbol": "BRK.B", "security_name": "Berkshire Hathaway Inc. Class B"},
            {"symbol": "", "security_name": "Blank row"}
        ]"#,
    );
    let catalog = SymbolCatalog::new(client(&http));
    let mut picker = SymbolPicker::new();

    // When: The picker loads
    picker.load(&catalog).await;

    // Then: It is usable and only the blank row is missing
    assert!(picker.is_enabled());
    let values: Vec<String> = picker
        .options("")
        .into_iter()
        .map(|option| option.value.to_string())
        .collect();
    assert_eq!(values, vec!["AAPL", "ABR$D", "BRK.B"]);

    // And: The preferred share can be searched for
    let options = picker.options("arbor preferred");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value.as_str(), "ABR$D");
}

#[tokio::test]
async fn empty_catalog_yields_enabled_picker_without_options() {
    let http = ScriptedHttpClient::new();
    http.respond_json("/symbols", "[]");
    let catalog = SymbolCatalog::new(client(&http));
    let mut picker = SymbolPicker::new();

    picker.load(&catalog).await;

    assert!(picker.is_enabled());
    assert!(picker.options("").is_empty());
}
