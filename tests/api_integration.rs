use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{Method::POST, MockServer};
use reviewlens::{api, config::Config, pipeline::AnalysisService};
use serde_json::{Value, json};
use tower::ServiceExt;

fn config_for(ollama_url: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("OLLAMA_URL".into(), ollama_url.into());
    vars.insert("HTTP_TIMEOUT_SECS".into(), "5".into());
    for (key, value) in extra {
        vars.insert((*key).into(), (*value).into());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("config")
}

async fn post_analyze(app: axum::Router, reviews: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/analyze")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "reviews": reviews }).to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn analyze_uses_ollama_for_topics_and_summary() {
    let server = MockServer::start_async().await;
    let embed = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed").json_body(json!({
                "model": "all-minilm",
                "input": [
                    "excellent battery life bright screen",
                    "battery",
                    "battery life",
                    "bright",
                    "bright screen",
                    "excellent",
                    "excellent battery",
                    "life",
                    "life bright",
                    "screen"
                ]
            }));
            then.status(200).json_body(json!({
                "embeddings": [
                    [1.0, 0.0],
                    [0.0, 1.0],
                    [1.0, 0.0],
                    [0.0, 1.0],
                    [0.9, 0.1],
                    [0.8, 0.2],
                    [0.0, 1.0],
                    [0.0, 1.0],
                    [0.0, 1.0],
                    [0.0, 1.0]
                ]
            }));
        })
        .await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate").json_body_partial(
                r#"{"model":"llama3.2:1b","stream":false,"options":{"num_predict":45}}"#,
            );
            then.status(200)
                .json_body(json!({ "response": "Great battery and screen.", "done": true }));
        })
        .await;

    let config = config_for(&server.base_url(), &[]);
    let service = AnalysisService::from_config(&config).expect("service");
    let app = api::create_router(Arc::new(service), &config.cors_allowed_origins);

    let (status, body) = post_analyze(
        app,
        json!(["Excellent battery life and a bright screen!", ""]),
    )
    .await;

    embed.assert_async().await;
    generate.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "review": "Excellent battery life and a bright screen!",
                "cleaned_review": "excellent battery life and a bright screen",
                "normalized_review": "excellent battery life bright screen",
                "sentiment": "positive",
                "topics": "battery life, bright screen, excellent",
                "summary": "Great battery and screen."
            },
            {
                "review": "",
                "cleaned_review": "",
                "normalized_review": "",
                "sentiment": "neutral",
                "topics": "",
                "summary": ""
            }
        ])
    );
}

#[tokio::test]
async fn provider_outages_degrade_without_failing_the_request() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/embed");
            then.status(500).body("embedder down");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(503).body("busy");
        })
        .await;

    let config = config_for(&server.base_url(), &[]);
    let service = Arc::new(AnalysisService::from_config(&config).expect("service"));
    let app = api::create_router(service.clone(), &config.cors_allowed_origins);

    let (status, body) = post_analyze(
        app,
        json!(["The charger broke after two days, terrible and disappointing purchase"]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = &body[0];
    assert_eq!(result["sentiment"], "negative");
    assert_eq!(result["topics"], "");
    let summary = result["summary"].as_str().expect("summary string");
    assert!(summary.starts_with("Error: "), "got {summary}");
    assert!(summary.contains("503"));

    let metrics = service.metrics().snapshot();
    assert_eq!(metrics.reviews_analyzed, 1);
    assert_eq!(metrics.topic_failures, 1);
    assert_eq!(metrics.summaries_failed, 1);
}

#[tokio::test]
async fn offline_providers_need_no_network() {
    let config = config_for(
        "http://127.0.0.1:9",
        &[
            ("EMBEDDING_PROVIDER", "hashed"),
            ("SUMMARIZATION_PROVIDER", "none"),
        ],
    );
    let service = AnalysisService::from_config(&config).expect("service");
    let app = api::create_router(Arc::new(service), &config.cors_allowed_origins);

    let long_review = "This blender is powerful and quiet, crushes ice in seconds, \
                       cleans easily and looks great on the counter. Highly recommend it.";
    let (status, body) = post_analyze(app, json!([long_review, "Bad."])).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("array");
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first["review"], long_review);
    assert_eq!(first["sentiment"], "positive");
    let topics = first["topics"].as_str().expect("topics");
    let phrases: Vec<&str> = topics.split(", ").collect();
    assert_eq!(phrases.len(), 3);
    assert!(phrases.iter().all(|p| (1..=2).contains(&p.split(' ').count())));
    let summary = first["summary"].as_str().expect("summary");
    assert!(first["normalized_review"]
        .as_str()
        .expect("normalized")
        .starts_with(summary));

    let second = &items[1];
    assert_eq!(second["normalized_review"], "bad");
    assert_eq!(second["sentiment"], "negative");
    assert_eq!(second["summary"], "bad");
}

#[tokio::test]
async fn default_scorer_flags_everyday_complaints() {
    let config = config_for(
        "http://127.0.0.1:9",
        &[
            ("EMBEDDING_PROVIDER", "hashed"),
            ("SUMMARIZATION_PROVIDER", "none"),
        ],
    );
    let service = AnalysisService::from_config(&config).expect("service");
    let app = api::create_router(Arc::new(service), &config.cors_allowed_origins);

    let (status, body) = post_analyze(
        app,
        json!([
            "The battery died within a week.",
            "Totally unreliable and overpriced"
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["normalized_review"], "battery died within week");
    assert_eq!(body[0]["sentiment"], "negative");
    assert_eq!(body[1]["normalized_review"], "totally unreliable overpriced");
    assert_eq!(body[1]["sentiment"], "negative");
}
