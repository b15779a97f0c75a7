//! Model administration: inspect and delete the models available to a
//! resource, prebuilt and custom alike.

use chrono::{DateTime, Utc};
use doc_analysis_core::client::DocClient;
use doc_analysis_core::error::{DocError, DocResult};
use serde::Deserialize;
use std::collections::HashMap;

/// Summary entry returned when listing models.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModelSummary {
    /// The model identifier.
    pub model_id: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// When the model was created.
    pub created_date_time: Option<DateTime<Utc>>,
    /// API version the model was built with.
    pub api_version: Option<String>,
}

/// Schema of one field a document type can extract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field value type (e.g. "string", "number", "object").
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Details of one document type supported by a model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTypeDetails {
    /// Schema of the fields this document type extracts.
    #[serde(default)]
    pub field_schema: HashMap<String, FieldSchema>,
    /// Estimated extraction confidence per field.
    #[serde(default)]
    pub field_confidence: HashMap<String, f64>,
}

/// Full metadata of a trained or prebuilt model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModelDetails {
    /// The model identifier.
    pub model_id: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// When the model was created.
    pub created_date_time: Option<DateTime<Utc>>,
    /// API version the model was built with.
    pub api_version: Option<String>,
    /// Document types the model can extract, keyed by docType name.
    #[serde(default)]
    pub doc_types: HashMap<String, DocTypeDetails>,
}

/// One page of the model list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModelList {
    /// Models on this page.
    pub value: Vec<DocumentModelSummary>,
    /// Link to the next page, when more models exist.
    pub next_link: Option<String>,
}

fn require_model_id(model_id: &str) -> DocResult<()> {
    if model_id.is_empty() {
        return Err(DocError::InvalidRequest("model ID is required".into()));
    }
    Ok(())
}

/// Get the metadata of a single model.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::admin::get_model`.
#[tracing::instrument(
    name = "doc_analysis::admin::get_model",
    skip(client),
    fields(model_id = %model_id)
)]
pub async fn get_model(client: &DocClient, model_id: &str) -> DocResult<DocumentModelDetails> {
    require_model_id(model_id)?;

    let path = format!("/formrecognizer/documentModels/{model_id}");
    let response = client.get(&path).await?;
    Ok(response.json::<DocumentModelDetails>().await?)
}

/// List the models available to this resource (first page).
///
/// Follow [`DocumentModelList::next_link`] for subsequent pages.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::admin::list_models`.
#[tracing::instrument(name = "doc_analysis::admin::list_models", skip(client))]
pub async fn list_models(client: &DocClient) -> DocResult<DocumentModelList> {
    let response = client.get("/formrecognizer/documentModels").await?;
    Ok(response.json::<DocumentModelList>().await?)
}

/// Delete a custom model.
///
/// # Tracing
///
/// Emits a span named `doc_analysis::admin::delete_model`.
#[tracing::instrument(
    name = "doc_analysis::admin::delete_model",
    skip(client),
    fields(model_id = %model_id)
)]
pub async fn delete_model(client: &DocClient, model_id: &str) -> DocResult<()> {
    require_model_id(model_id)?;

    let path = format!("/formrecognizer/documentModels/{model_id}");
    client.delete(&path).await?;
    tracing::debug!("model deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_analysis_core::test_support::mock_client;
    use wiremock::matchers::{method, path as match_path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_model_requires_model_id() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        let err = get_model(&client, "").await.expect_err("should fail fast");
        assert!(
            matches!(err, DocError::InvalidRequest(_)),
            "got: {err:?}"
        );
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn delete_model_requires_model_id() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        let err = delete_model(&client, "")
            .await
            .expect_err("should fail fast");
        assert!(err.to_string().contains("model ID"), "error: {err}");
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn get_model_parses_details() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        Mock::given(method("GET"))
            .and(match_path("/formrecognizer/documentModels/custom-model-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "modelId": "custom-model-1",
                "description": "Purchase order extractor",
                "createdDateTime": "2023-05-01T12:30:00Z",
                "apiVersion": "2023-07-31",
                "docTypes": {
                    "custom-model-1": {
                        "fieldSchema": {
                            "Total": {"type": "number"},
                            "Vendor": {"type": "string"}
                        },
                        "fieldConfidence": {
                            "Total": 0.995,
                            "Vendor": 0.98
                        }
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let details = get_model(&client, "custom-model-1")
            .await
            .expect("should succeed");
        assert_eq!(details.model_id, "custom-model-1");
        assert_eq!(
            details.description.as_deref(),
            Some("Purchase order extractor")
        );

        let doc_type = &details.doc_types["custom-model-1"];
        assert_eq!(doc_type.field_schema["Total"].field_type, "number");
        assert_eq!(doc_type.field_confidence["Vendor"], 0.98);
    }

    #[tokio::test]
    async fn list_models_parses_page() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        Mock::given(method("GET"))
            .and(match_path("/formrecognizer/documentModels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [
                    {"modelId": "prebuilt-receipt", "description": "Receipts"},
                    {"modelId": "custom-model-1", "createdDateTime": "2023-05-01T12:30:00Z"}
                ],
                "nextLink": "https://example.com/formrecognizer/documentModels?page=2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = list_models(&client).await.expect("should succeed");
        assert_eq!(page.value.len(), 2);
        assert_eq!(page.value[0].model_id, "prebuilt-receipt");
        assert!(page.value[1].created_date_time.is_some());
        assert!(page.next_link.is_some());
    }

    #[tokio::test]
    async fn delete_model_accepts_204() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        Mock::given(method("DELETE"))
            .and(match_path("/formrecognizer/documentModels/custom-model-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        delete_model(&client, "custom-model-1")
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn get_model_surfaces_not_found() {
        let server = MockServer::start().await;
        let client = mock_client(&server);

        Mock::given(method("GET"))
            .and(match_path("/formrecognizer/documentModels/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "ModelNotFound", "message": "Model not found."}
            })))
            .mount(&server)
            .await;

        let err = get_model(&client, "missing").await.expect_err("should fail");
        match err {
            DocError::Api { code, .. } => assert_eq!(code, "ModelNotFound"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
