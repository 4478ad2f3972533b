use bom_estimator::{Estimator, EstimatorConfig, EstimatorError, GeminiClient, LocalStorage};
use httpmock::prelude::*;
use tempfile::TempDir;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn config_for(server: &MockServer, api_key: &str, output_path: &str) -> EstimatorConfig {
    let toml_content = format!(
        r#"
[ai]
endpoint = "{}"
api_key = "{}"
timeout_seconds = 5

[export]
output_path = "{}"
"#,
        server.base_url(),
        api_key,
        output_path
    );
    EstimatorConfig::from_toml_str(&toml_content).unwrap()
}

fn gemini_reply(items: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": items.to_string() }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_end_to_end_estimate_with_mock_gemini() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "integration-key")
                .body_contains("online store");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(gemini_reply(serde_json::json!([
                    {"serviceName": "Azure Front Door", "category": "Networking",
                     "description": "Standard, global edge", "estimatedMonthlyCost": 35,
                     "quantity": 1, "reasoning": "CDN and WAF"},
                    {"serviceName": "App Service", "category": "Compute",
                     "description": "P1v3, 2 instances", "estimatedMonthlyCost": 240.5,
                     "quantity": 2.7, "reasoning": "web tier"}
                ])));
        })
        .await;

    let config = config_for(&server, "integration-key", &output_path);
    let mut estimator = Estimator::new(GeminiClient::from_config(&config));

    estimator
        .add_from_catalog("sql-db-s0", "West Europe", 2)
        .unwrap();
    let added = estimator
        .generate_from_prompt("An online store with a SQL backend")
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(added, 2);

    let items = estimator.registry().items();
    assert_eq!(items.len(), 3);
    assert!(items[1].is_ai_generated());
    assert_eq!(items[1].region(), "Global/Recommended");
    assert_eq!(items[2].quantity(), 2);
    assert_eq!(items[2].monthly_unit_cost(), 120.25);
    assert_eq!(estimator.registry().total_monthly_cost(), 30.0 + 35.0 + 240.5);

    let summary = estimator.summary(config.top_n(), config.label_max_len());
    assert_eq!(summary.top_services[0].label, "App Service");
    assert_eq!(summary.top_services[1].label, "Azure Front Doo...");
    assert_eq!(summary.top_services[2].label, "Azure SQL Datab...");

    let storage = LocalStorage::new(&output_path);
    estimator
        .save_export(&storage, "celebal_azure_bom.csv")
        .await
        .unwrap();

    let csv = std::fs::read_to_string(temp_dir.path().join("celebal_azure_bom.csv")).unwrap();
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Service Name,Category,Description,Region,Quantity,Unit Cost,Total Cost"
    );
    assert_eq!(
        lines[1],
        "Azure SQL Database (Standard S0),Database,Standard tier - Database,West Europe,2,15.00,30.00"
    );
    assert_eq!(
        lines[3],
        "App Service,Compute,\"P1v3, 2 instances\",Global/Recommended,2,120.25,240.50"
    );
    assert!(!csv.ends_with('\n'));
}

#[tokio::test]
async fn test_upstream_failure_keeps_manual_items() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(503).body("overloaded");
        })
        .await;

    let config = config_for(&server, "integration-key", "./unused");
    let mut estimator = Estimator::new(GeminiClient::from_config(&config));
    estimator.add_from_catalog("vnet", "East US", 1).unwrap();

    let err = estimator
        .generate_from_prompt("anything")
        .await
        .unwrap_err();

    assert!(matches!(err, EstimatorError::GenerationFailed { .. }));
    assert_eq!(
        err.to_string(),
        "Failed to generate BOM from AI. Please try again."
    );
    assert_eq!(estimator.registry().len(), 1);
    assert!(!estimator.is_generating());
}

#[tokio::test]
async fn test_missing_key_never_reaches_network() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(serde_json::json!([])));
        })
        .await;

    let config = config_for(&server, "${BOM_IT_UNSET_KEY_VARIABLE}", "./unused");
    let client = GeminiClient::from_config(&config);
    assert!(!client.has_credential());

    let mut estimator = Estimator::new(client);
    let err = estimator
        .generate_from_prompt("a data platform")
        .await
        .unwrap_err();

    assert!(matches!(err, EstimatorError::MissingCredential { .. }));
    assert_eq!(err.to_string(), "API Key is missing.");
    assert_eq!(api_mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_blank_prompt_is_a_no_op() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(gemini_reply(serde_json::json!([])));
        })
        .await;

    let config = config_for(&server, "integration-key", "./unused");
    let mut estimator = Estimator::new(GeminiClient::from_config(&config));
    let added = estimator.generate_from_prompt("   ").await.unwrap();

    assert_eq!(added, 0);
    assert!(estimator.registry().is_empty());
    assert_eq!(api_mock.hits_async().await, 0);
}
