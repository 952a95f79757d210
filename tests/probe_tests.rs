//! Model probing and discovery against a mock Gemini server.

mod common;

use std::time::Duration;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use truthguard::config::CredentialPlacement;
use truthguard::error::{DiscoveryError, TruthGuardError};
use truthguard::generation::{build_request, Analyzer, ModelProber};
use truthguard::models::{CandidateOrigin, DiscoveryFilter};
use truthguard::provider::GeminiTransport;
use truthguard::types::AnalysisRequest;

#[tokio::test]
async fn falls_through_404_to_next_priority_model() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_generate(
        &server,
        "m2",
        ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(10))),
        1,
    )
    .await;
    mount_listing(&server, ResponseTemplate::new(200).set_body_json(listing(&[])), 0).await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1", "m2"], &[])).unwrap();
    let analysis = analyzer
        .analyze(&AnalysisRequest::text("hello, is this my bank?").unwrap())
        .await
        .expect("second model should answer");

    assert_eq!(analysis.result.risk_score(), 10);
    assert_eq!(analysis.model, "m2");
    assert_eq!(analysis.origin, CandidateOrigin::Priority);
    assert_eq!(analysis.failures.len(), 1);
    assert_eq!(analysis.failures[0].model, "m1");
    assert!(analysis.failures[0].reason.contains("not found"));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn first_success_short_circuits() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        "m1",
        ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(3))),
        1,
    )
    .await;
    mount_generate(&server, "m2", ResponseTemplate::new(200), 0).await;
    mount_listing(&server, ResponseTemplate::new(200), 0).await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1", "m2"], &[])).unwrap();
    let verdict = analyzer.analyze_text("hi mum, new number").await.unwrap();

    assert_eq!(verdict.risk_score, 3);
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn discovery_finds_untried_capable_model() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_generate(&server, "m2", ResponseTemplate::new(500), 1).await;
    mount_listing(
        &server,
        ResponseTemplate::new(200).set_body_json(listing(&[
            ("models/m1-gemini", &["countTokens"]),
            ("models/embedding-001", &["embedContent"]),
            ("models/gemini-2.0-flash", &["generateContent", "countTokens"]),
        ])),
        1,
    )
    .await;
    mount_generate(
        &server,
        "gemini-2.0-flash",
        ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(55))),
        1,
    )
    .await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1", "m2"], &[])).unwrap();
    let analysis = analyzer
        .analyze(&AnalysisRequest::text("guaranteed 30% monthly returns").unwrap())
        .await
        .unwrap();

    assert_eq!(analysis.model, "gemini-2.0-flash");
    assert_eq!(analysis.origin, CandidateOrigin::Discovered);
    assert_eq!(analysis.result.risk_score(), 55);
    // Two priority attempts, one listing, one discovered attempt.
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn discovery_skips_models_already_probed() {
    let server = MockServer::start().await;
    // Listed and in the priority list: must be attempted exactly once overall.
    mount_generate(&server, "gemini-1.5-flash", not_found("gemini-1.5-flash"), 1).await;
    mount_listing(
        &server,
        ResponseTemplate::new(200).set_body_json(listing(&[
            ("models/gemini-1.5-flash", &["generateContent"]),
            ("models/gemini-2.5-flash", &["generateContent"]),
        ])),
        1,
    )
    .await;
    mount_generate(
        &server,
        "gemini-2.5-flash",
        ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(20))),
        1,
    )
    .await;

    let analyzer = Analyzer::from_config(config_for(&server, &["gemini-1.5-flash"], &[])).unwrap();
    let verdict = analyzer.analyze_text("package held at customs").await.unwrap();
    assert_eq!(verdict.risk_score, 20);
}

#[tokio::test]
async fn listing_failure_reports_status_code() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_listing(
        &server,
        ResponseTemplate::new(403).set_body_json(json!({"error": {"message": "API key invalid"}})),
        1,
    )
    .await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1"], &[])).unwrap();
    let err = analyzer.analyze_text("verify your account").await.unwrap_err();

    match &err {
        TruthGuardError::Discovery(DiscoveryError::ListingFailed { status, .. }) => {
            assert_eq!(*status, 403)
        }
        other => panic!("expected listing failure, got {other:?}"),
    }
    assert!(err.to_string().contains("403"));
    assert_eq!(err.http_status(), 500);
}

#[tokio::test]
async fn all_discovered_models_failing_lists_attempts() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_listing(
        &server,
        ResponseTemplate::new(200).set_body_json(listing(&[
            ("models/gemini-a", &["generateContent"]),
            ("models/gemini-b", &["generateContent"]),
        ])),
        1,
    )
    .await;
    mount_generate(&server, "gemini-a", ResponseTemplate::new(429), 1).await;
    mount_generate(&server, "gemini-b", ResponseTemplate::new(503), 1).await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1"], &[])).unwrap();
    let err = analyzer.analyze_text("crypto mentor").await.unwrap_err();

    let TruthGuardError::Discovery(discovery) = &err else {
        panic!("expected discovery error, got {err:?}");
    };
    assert_eq!(discovery.attempted(), vec!["m1", "gemini-a", "gemini-b"]);
    let message = err.to_string();
    assert!(message.contains("gemini-a, gemini-b"), "unexpected message: {message}");
    assert!(message.contains("Too Many Requests"), "unexpected message: {message}");
}

#[tokio::test]
async fn empty_filtered_listing_is_discovery_error() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_listing(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(listing(&[("models/text-bison-001", &["generateText"])])),
        1,
    )
    .await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1"], &[])).unwrap();
    let err = analyzer.analyze_text("hello").await.unwrap_err();
    assert!(matches!(
        err,
        TruthGuardError::Discovery(DiscoveryError::NoWorkingModel { ref available, .. }) if available.is_empty()
    ));
}

#[tokio::test]
async fn disabled_discovery_reports_exhaustion() {
    let server = MockServer::start().await;
    mount_generate(&server, "m1", not_found("m1"), 1).await;
    mount_generate(&server, "m2", not_found("m2"), 1).await;
    mount_listing(&server, ResponseTemplate::new(200), 0).await;

    let mut config = config_for(&server, &["m1", "m2"], &[]);
    config.discovery = false;
    let analyzer = Analyzer::from_config(config).unwrap();
    let err = analyzer.analyze_text("hello").await.unwrap_err();

    assert!(matches!(err, TruthGuardError::ProbeExhausted { .. }));
    assert_eq!(err.probe_failures().len(), 2);
}

#[tokio::test]
async fn unreachable_provider_is_discovery_error() {
    // Nothing listens on port 9; every call fails at the transport.
    let transport = GeminiTransport::new(
        "http://127.0.0.1:9",
        TEST_KEY,
        CredentialPlacement::Query,
        Duration::from_secs(2),
    )
    .unwrap();
    let request = build_request(&AnalysisRequest::text("hello").unwrap());

    let err = ModelProber::new(&transport, vec!["m1".into()])
        .with_discovery(DiscoveryFilter::default())
        .run(&request)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TruthGuardError::Discovery(DiscoveryError::ListingUnreachable(_))
    ));
}

#[tokio::test]
async fn credential_travels_in_query_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path("m1")))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(1))))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = Analyzer::from_config(config_for(&server, &["m1"], &[])).unwrap();
    assert_eq!(analyzer.analyze_text("hello").await.unwrap().risk_score, 1);
}

#[tokio::test]
async fn credential_can_travel_in_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(generate_path("m1")))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&text_verdict(2))))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server, &["m1"], &[]);
    config.credential_placement = CredentialPlacement::Header;
    let analyzer = Analyzer::from_config(config).unwrap();
    assert_eq!(analyzer.analyze_text("hello").await.unwrap().risk_score, 2);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}
