//! Integration tests for issuing certificates by common name
//!
//! Tests:
//! - `certs add <cn>` deprecation warning, spinner and success report
//! - Common name flattening sent to the platform
//! - Platform rejections and unclassified failures
//! - `certs issue`

use deployctl::cli::certs::{add, issue, AddOptions, IssueArgs};
use deployctl::ApiError;
use serde_json::json;
use tracing_test::traced_test;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use super::support::{
    args, certificate, context, platform_error, start_platform, Line, RecordingOutput,
};

/// Scenario: a single common name, the platform issues the certificate
#[traced_test]
#[tokio::test]
async fn test_single_common_name_is_issued() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .and(body_json(json!({"domains": ["example.com"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(certificate(&["example.com"])))
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = add(&context(&server), &AddOptions::default(), &args(&["example.com"]), &output)
        .await
        .unwrap();

    assert_eq!(code, 0);
    let lines = output.lines();
    assert_eq!(lines.len(), 3, "warning, spinner, success: {:?}", lines);
    assert!(matches!(&lines[0], Line::Warn(message) if message.contains("certs issue")));
    assert!(matches!(&lines[1], Line::Spinner(label) if label.contains("example.com")));
    assert!(matches!(&lines[2], Line::Success(message) if message.contains("example.com")));
    assert!(logs_contain("API client closed"));
}

#[tokio::test]
async fn test_comma_lists_are_flattened_in_order() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .and(body_json(json!({"domains": ["a", "b", "c"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(certificate(&["a", "b", "c"])))
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = add(&context(&server), &AddOptions::default(), &args(&["a,b", "c"]), &output)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert!(output.spinners()[0].contains("a, b, c"));
    assert!(output.successes()[0].contains("a, b, c"));
}

#[tokio::test]
async fn test_rejection_is_reported_verbatim() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(platform_error("wildcard_not_allowed", "Wildcards are disabled")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = add(&context(&server), &AddOptions::default(), &args(&["*.example.com"]), &output)
        .await
        .unwrap();

    assert_eq!(code, 1);
    assert_eq!(
        output.errors(),
        vec!["Wildcard certificates are not allowed for *.example.com.".to_string()]
    );
    assert_eq!(output.spinners().len(), 1, "the spinner ran around the request");
    assert!(output.successes().is_empty());
}

#[tokio::test]
async fn test_rate_limit_uses_retry_after_header() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "42")
                .set_body_json(platform_error("too_many_requests", "Slow down")),
        )
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = issue(
        &context(&server),
        &IssueArgs { cns: args(&["example.com"]), debug: false },
        &output,
    )
    .await
    .unwrap();

    assert_eq!(code, 1);
    assert_eq!(
        output.errors(),
        vec!["Too many certificate requests. Try again in 42s.".to_string()]
    );
}

#[traced_test]
#[tokio::test]
async fn test_unclassified_creation_failure_propagates() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let err = add(&context(&server), &AddOptions::default(), &args(&["example.com"]), &output)
        .await
        .expect_err("unclassified failures are fatal");

    assert_eq!(err.downcast_ref::<ApiError>().and_then(ApiError::status), Some(500));
    assert!(output.errors().is_empty());
    assert!(output.successes().is_empty());
    assert!(logs_contain("API client closed"));
}

#[tokio::test]
async fn test_issue_has_no_deprecation_warning() {
    let server = start_platform().await;
    Mock::given(method("POST"))
        .and(path("/v3/certs"))
        .and(body_json(json!({"domains": ["example.com", "www.example.com"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(certificate(&["example.com", "www.example.com"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let output = RecordingOutput::default();

    let code = issue(
        &context(&server),
        &IssueArgs { cns: args(&["example.com", "www.example.com"]), debug: false },
        &output,
    )
    .await
    .unwrap();

    assert_eq!(code, 0);
    assert!(output.warnings().is_empty());
    assert!(output.successes()[0].contains("example.com, www.example.com"));
}
