//! Integration tests for scope resolution in the certificate commands
//!
//! Tests:
//! - Rejected tokens
//! - Deleted or inaccessible teams
//! - Unclassified resolver failures
//! - Team scoping of certificate requests

use deployctl::cli::certs::{add, issue, AddOptions, IssueArgs};
use deployctl::cli::scope::INVALID_TOKEN;
use deployctl::ApiError;
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::{
    args, context, expect_no_creation, platform_error, start_platform, team_context,
    RecordingOutput,
};

#[traced_test]
#[tokio::test]
async fn test_rejected_token_reports_resolver_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(platform_error("forbidden", "Not authorized")),
        )
        .expect(1)
        .mount(&server)
        .await;
    expect_no_creation(&server).await;
    let output = RecordingOutput::default();

    let code =
        add(&context(&server), &AddOptions::default(), &args(&["example.com"]), &output)
            .await
            .unwrap();

    assert_eq!(code, 1);
    assert_eq!(output.errors(), vec![INVALID_TOKEN.to_string()]);
    assert!(output.warnings().is_empty(), "nothing runs after a failed scope resolution");
    assert!(logs_contain("API client closed"));
}

/// Scenario: the active team was deleted
#[traced_test]
#[tokio::test]
async fn test_deleted_team_reports_and_releases_client() {
    let server = start_platform().await;
    Mock::given(method("GET"))
        .and(path("/v1/teams/team_gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(platform_error("not_found", "Team not found")),
        )
        .expect(1)
        .mount(&server)
        .await;
    expect_no_creation(&server).await;
    let output = RecordingOutput::default();

    let code = add(
        &team_context(&server, "team_gone"),
        &AddOptions::default(),
        &args(&["example.com"]),
        &output,
    )
    .await
    .unwrap();

    assert_eq!(code, 1);
    assert_eq!(output.errors(), vec![ApiError::team_deleted("team_gone").to_string()]);
    assert!(logs_contain("API client closed"));
}

#[tokio::test]
async fn test_inaccessible_team_is_not_authorized() {
    let server = start_platform().await;
    Mock::given(method("GET"))
        .and(path("/v1/teams/team_other"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    expect_no_creation(&server).await;
    let output = RecordingOutput::default();

    let code = issue(
        &team_context(&server, "team_other"),
        &IssueArgs { cns: args(&["example.com"]), debug: false },
        &output,
    )
    .await
    .unwrap();

    assert_eq!(code, 1);
    assert_eq!(output.errors().len(), 1);
    assert!(output.errors()[0].contains("team_other"));
}

#[traced_test]
#[tokio::test]
async fn test_unclassified_resolver_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    expect_no_creation(&server).await;
    let output = RecordingOutput::default();

    let result =
        add(&context(&server), &AddOptions::default(), &args(&["example.com"]), &output).await;

    let err = result.expect_err("unexpected resolver failures are fatal");
    let api_error = err.downcast_ref::<ApiError>().expect("ApiError is preserved");
    assert_eq!(api_error.status(), Some(500));
    assert!(output.lines().is_empty(), "fatal errors are not reported by the command");
    assert!(logs_contain("API client closed"));
}

#[tokio::test]
async fn test_team_scope_labels_and_scopes_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(query_param("teamId", "team_acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "usr_1", "username": "alice"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/teams/team_acme"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "team_acme", "slug": "acme"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .and(query_param("teamId", "team_acme"))
        .and(body_json(json!({"domains": ["shop.acme.dev"]})))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(platform_error("domain_permission", "No access")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = issue(
        &team_context(&server, "team_acme"),
        &IssueArgs { cns: args(&["shop.acme.dev"]), debug: true },
        &output,
    )
    .await
    .unwrap();

    assert_eq!(code, 1);
    assert_eq!(
        output.errors(),
        vec!["You don't have permissions over domain shop.acme.dev under acme.".to_string()]
    );
}
