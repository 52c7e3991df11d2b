use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use vulnex::config::{ExtractionConfig, VulnexConfig};
use vulnex::db::Database;
use vulnex::errors::VulnexError;
use vulnex::extraction::ExtractionOrchestrator;
use vulnex::llm::{AgentProvider, AgentRole, GeminiClient};
use vulnex::models::ExtractionOptions;

/// Spawn a one-route provider stub that answers every request with the
/// given status/body after an optional delay, counting hits.
async fn spawn_provider(
    status: StatusCode,
    body: Value,
    delay: Duration,
) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = hits.clone();
    let app = Router::new().fallback(move || {
        let hits = handler_hits.clone();
        let body = body.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            (status, Json(body))
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn envelope(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

fn client(api_key: &str, base_url: &str, timeout: Duration) -> GeminiClient {
    GeminiClient::new(api_key, None, base_url, timeout).unwrap()
}

fn orchestrator_for(db: &Database, base_url: &str) -> ExtractionOrchestrator {
    let config = VulnexConfig::default();
    let agent: Arc<dyn AgentProvider> = Arc::new(client(
        "test-key",
        base_url,
        Duration::from_secs(10),
    ));
    ExtractionOrchestrator::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        agent,
        &config.extraction,
    )
}

#[tokio::test]
async fn test_scenario_empty_model_answer_is_success() {
    let (base_url, _) =
        spawn_provider(StatusCode::OK, envelope("[]"), Duration::ZERO).await;

    let db = Database::in_memory().unwrap();
    let report_id = db.insert_report("Clean audit", "# Audit\nNothing wrong.").unwrap();

    let result = orchestrator_for(&db, &base_url)
        .extract(report_id, &ExtractionOptions::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.total_extracted, 0);
    assert_eq!(result.total_created, 0);
    assert_eq!(result.duplicates_skipped, 0);
    assert_eq!(result.validation_warnings.len(), 1);
    assert!(result.validation_warnings[0].contains("No vulnerabilities found"));
    assert!(result.processing_errors.is_empty());
}

#[tokio::test]
async fn test_scenario_five_candidates_two_duplicates() {
    let payload = json!([
        {"title": "SQL injection in search", "description": "The q parameter is concatenated into the query string.", "severity": "critical", "category": "not_fixed"},
        {"title": "Reflected XSS on profile", "description": "The bio field is rendered without encoding.", "severity": "high", "category": "not_fixed"},
        {"title": "Weak password policy", "description": "Four character passwords are accepted at signup.", "severity": "medium", "category": "fixed"},
        {"title": "Missing rate limiting", "description": "Login attempts are unlimited from one address.", "severity": "low", "category": "not_fixed"},
        {"title": "Debug endpoint exposed", "description": "A diagnostics route dumps environment details.", "severity": "high", "category": "fixed"}
    ]);
    let (base_url, _) = spawn_provider(
        StatusCode::OK,
        envelope(&payload.to_string()),
        Duration::ZERO,
    )
    .await;

    let db = Database::in_memory().unwrap();
    let report_id = db.insert_report("Q2 audit", "# Audit body").unwrap();
    // Two findings already on record, titles differing only in case/whitespace
    for (title, description) in [
        ("sql injection in SEARCH", "An injection problem recorded earlier during triage."),
        ("reflected  xss on profile", "A cross site scripting issue recorded earlier."),
    ] {
        let conn_candidate = vulnex::models::CandidateVulnerability {
            title: title.to_string(),
            description: description.to_string(),
            severity: vulnex::models::Severity::High,
            category: vulnex::models::VulnCategory::NotFixed,
            raw_confidence: None,
        };
        use vulnex::db::VulnerabilityStore;
        db.create(report_id, &conn_candidate).unwrap();
    }

    let result = orchestrator_for(&db, &base_url)
        .extract(report_id, &ExtractionOptions::default(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.total_extracted, 5);
    assert_eq!(result.total_created, 3);
    assert_eq!(result.duplicates_skipped, 2);
    assert_eq!(result.created_vulnerability_ids.len(), 3);
    assert_eq!(
        result.total_extracted,
        result.total_created + result.duplicates_skipped + result.processing_errors.len()
    );

    let stored = db.get_vulnerabilities(report_id).unwrap();
    assert_eq!(stored.len(), 5);
}

#[tokio::test]
async fn test_scenario_oversized_report_rejected_before_network() {
    let (base_url, hits) =
        spawn_provider(StatusCode::OK, envelope("[]"), Duration::ZERO).await;

    let db = Database::in_memory().unwrap();
    let report_id = db
        .insert_report("Huge report", &"m".repeat(6_000_000))
        .unwrap();

    let err = orchestrator_for(&db, &base_url)
        .extract(report_id, &ExtractionOptions::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("too large"), "message was: {}", msg);
    assert!(msg.contains("5MB"), "message was: {}", msg);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_provider_401_names_status() {
    let (base_url, _) = spawn_provider(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "API key not valid"}}),
        Duration::ZERO,
    )
    .await;

    let err = client("bad-key", &base_url, Duration::from_secs(10))
        .call(AgentRole::Extractor, "prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Gemini API error"), "message was: {}", msg);
    assert!(msg.contains("401"), "message was: {}", msg);
    assert!(msg.contains("Unauthorized"), "message was: {}", msg);
}

#[tokio::test]
async fn test_missing_api_key_makes_no_network_call() {
    let (base_url, hits) =
        spawn_provider(StatusCode::OK, envelope("[]"), Duration::ZERO).await;

    for key in ["", "   "] {
        let err = client(key, &base_url, Duration::from_secs(10))
            .call(AgentRole::Extractor, "prompt", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, VulnexError::MissingApiKey(_)));
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancel_before_call_is_cancelled_not_timeout() {
    let (base_url, hits) =
        spawn_provider(StatusCode::OK, envelope("[]"), Duration::ZERO).await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client("test-key", &base_url, Duration::from_millis(1))
        .call(AgentRole::Extractor, "prompt", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, VulnexError::Cancelled(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slow_provider_without_cancellation_is_timeout() {
    let (base_url, _) = spawn_provider(
        StatusCode::OK,
        envelope("[]"),
        Duration::from_secs(5),
    )
    .await;

    let err = client("test-key", &base_url, Duration::from_millis(100))
        .call(AgentRole::Extractor, "prompt", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VulnexError::Timeout(_)), "got: {}", err);
}

#[tokio::test]
async fn test_cancellation_during_call_beats_slow_provider() {
    let (base_url, _) = spawn_provider(
        StatusCode::OK,
        envelope("[]"),
        Duration::from_secs(5),
    )
    .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client("test-key", &base_url, Duration::from_secs(10))
        .call(AgentRole::Extractor, "prompt", &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, VulnexError::Cancelled(_)), "got: {}", err);
}

#[tokio::test]
async fn test_unparseable_model_payload_aborts_run() {
    let (base_url, _) = spawn_provider(
        StatusCode::OK,
        envelope("I found nothing of note in this report."),
        Duration::ZERO,
    )
    .await;

    let db = Database::in_memory().unwrap();
    let report_id = db.insert_report("Audit", "# Body").unwrap();

    let err = orchestrator_for(&db, &base_url)
        .extract(report_id, &ExtractionOptions::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VulnexError::ResponseParse(_)));
    assert!(db.get_vulnerabilities(report_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_custom_content_ceiling_is_respected() {
    let (base_url, hits) =
        spawn_provider(StatusCode::OK, envelope("[]"), Duration::ZERO).await;

    let db = Database::in_memory().unwrap();
    let report_id = db.insert_report("Small report", &"b".repeat(2_001)).unwrap();

    let config = ExtractionConfig {
        max_content_bytes: 2_000,
    };
    let agent: Arc<dyn AgentProvider> = Arc::new(client(
        "test-key",
        &base_url,
        Duration::from_secs(10),
    ));
    let orchestrator = ExtractionOrchestrator::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        agent,
        &config,
    );

    let err = orchestrator
        .extract(report_id, &ExtractionOptions::default(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, VulnexError::ContentTooLarge { .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
