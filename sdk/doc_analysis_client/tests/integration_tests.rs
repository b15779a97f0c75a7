//! Integration tests for doc_analysis_client.
//!
//! These tests require a live document analysis endpoint.
//! Run with: `cargo test --features integration-tests`
//!
//! Required environment variables:
//! - `DOC_ANALYSIS_ENDPOINT`: The resource endpoint URL
//! - `DOC_ANALYSIS_API_KEY`: The API key for authentication
//! - `DOC_ANALYSIS_SAMPLE_RECEIPT_URL`: URL of a receipt image the resource can fetch

#![cfg(feature = "integration-tests")]

use doc_analysis_client::analyze::{self, AnalyzeRequest, PREBUILT_RECEIPT};
use doc_analysis_client::admin;
use doc_analysis_core::auth::DocCredential;
use doc_analysis_core::client::DocClient;
use std::time::Duration;

fn get_client() -> DocClient {
    let endpoint = std::env::var("DOC_ANALYSIS_ENDPOINT").expect("DOC_ANALYSIS_ENDPOINT not set");
    let api_key = std::env::var("DOC_ANALYSIS_API_KEY").expect("DOC_ANALYSIS_API_KEY not set");

    DocClient::builder()
        .endpoint(endpoint)
        .credential(DocCredential::api_key(api_key))
        .build()
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_receipt_analysis_lifecycle() {
    let client = get_client();
    let receipt_url = std::env::var("DOC_ANALYSIS_SAMPLE_RECEIPT_URL")
        .expect("DOC_ANALYSIS_SAMPLE_RECEIPT_URL not set");

    let request = AnalyzeRequest::builder()
        .model_id(PREBUILT_RECEIPT)
        .url_source(receipt_url)
        .build()
        .expect("valid request");

    let operation = analyze::begin_analyze(&client, &request)
        .await
        .expect("submit analysis");
    assert!(!operation.operation_location.is_empty());

    let result = operation
        .wait_for_completion(&client, Duration::from_secs(2), 60)
        .await
        .expect("analysis completes");

    assert_eq!(result.model_id, PREBUILT_RECEIPT);
    let documents = result.documents.expect("receipt produces documents");
    assert!(!documents.is_empty());
    assert!(documents[0].doc_type.starts_with("receipt"));
}

#[tokio::test]
async fn test_list_models_includes_prebuilts() {
    let client = get_client();

    let page = admin::list_models(&client).await.expect("list models");
    assert!(
        page.value.iter().any(|m| m.model_id == PREBUILT_RECEIPT),
        "prebuilt receipt model should be available"
    );
}
