use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use ingest_sink::InMemorySink;
use ingress_shopify::{
    ForwarderConfig, InboundEvent, Outcome, Rejection, WebhookForwarder, handle_invocation,
};
use lambda_runtime::{Context, LambdaEvent};
use rand::{Rng, RngCore};
use security::{WebhookSecret, sign_body};
use tracing_test::traced_test;

const SECRET: &str = "s3cr3t";
const STREAM: &str = "shopify-webhooks";

fn config(secret: &str, log_rejected_payloads: bool) -> ForwarderConfig {
    ForwarderConfig {
        secret: WebhookSecret::new(secret),
        delivery_stream: STREAM.into(),
        endpoint_url: None,
        log_rejected_payloads,
    }
}

fn setup() -> (InMemorySink, WebhookForwarder) {
    let sink = InMemorySink::new(STREAM);
    let forwarder = WebhookForwarder::new(Arc::new(sink.clone()), &config(SECRET, false));
    (sink, forwarder)
}

fn signed(body: &str) -> InboundEvent {
    InboundEvent::new(body, Some(sign_body(SECRET, body.as_bytes())))
}

fn random_body() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(0..512);
    (0..len)
        .map(|_| char::from(rng.random_range(b' '..=b'~')))
        .collect()
}

fn warn_count(lines: &[&str], needle: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.contains("WARN") && line.contains(needle))
        .count()
}

#[tokio::test]
#[traced_test]
async fn valid_signature_forwards_once() {
    let (sink, forwarder) = setup();
    let event = InboundEvent::new(
        "hello",
        Some("ayNlPwjHIHJVTl3++bcu/gH8/nJKlQaJ6ZHnvXCJ6z4=".into()),
    );

    let outcome = forwarder.handle(&event).await.unwrap();

    assert!(outcome.is_forwarded());
    assert_eq!(sink.records().await, vec![Bytes::from_static(b"hello\n")]);
    assert!(logs_contain("event added to firehose"));
}

#[tokio::test]
#[traced_test]
async fn missing_signature_is_dropped_with_one_warning() {
    let (sink, forwarder) = setup();

    for event in [
        InboundEvent::new("hello", None),
        InboundEvent::new("hello", Some(String::new())),
    ] {
        let outcome = forwarder.handle(&event).await.unwrap();
        assert_eq!(outcome, Outcome::Rejected(Rejection::MissingSignature));
    }

    assert!(sink.is_empty().await);
    logs_assert(|lines: &[&str]| {
        match warn_count(lines, "did not contain a Shopify HMAC digest header") {
            2 => Ok(()),
            n => Err(format!("expected one warning per request, saw {n}")),
        }
    });
}

#[tokio::test]
#[traced_test]
async fn wrong_signature_is_dropped_with_one_warning() {
    let (sink, forwarder) = setup();
    let wrong = sign_body("not-the-secret", b"hello");

    let outcome = forwarder
        .handle(&InboundEvent::new("hello", Some(wrong)))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Rejected(Rejection::SignatureMismatch));
    assert!(sink.is_empty().await);
    logs_assert(|lines: &[&str]| {
        match warn_count(lines, "computed digest does not match") {
            1 => Ok(()),
            n => Err(format!("expected exactly one mismatch warning, saw {n}")),
        }
    });
}

#[tokio::test]
async fn undecodable_signature_is_a_mismatch() {
    let (sink, forwarder) = setup();

    for header in ["%%%not-base64%%%", "ayNlPwjHIHJVTl3", "a"] {
        let outcome = forwarder
            .handle(&InboundEvent::new("hello", Some(header.into())))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::SignatureMismatch),
            "{header}"
        );
    }
    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn random_bodies_forward_exactly_their_framed_payload() {
    let (sink, forwarder) = setup();
    let mut expected = Vec::new();

    for _ in 0..64 {
        let body = random_body();
        let outcome = forwarder.handle(&signed(&body)).await.unwrap();
        assert!(outcome.is_forwarded(), "{body:?}");
        expected.push(Bytes::from(format!("{body}\n")));
    }

    assert_eq!(sink.records().await, expected);
}

#[tokio::test]
async fn signature_for_another_body_is_rejected() {
    let (sink, forwarder) = setup();

    for _ in 0..64 {
        let body = random_body();
        let other = format!("{body}x");
        let sig = sign_body(SECRET, other.as_bytes());
        let outcome = forwarder
            .handle(&InboundEvent::new(body, Some(sig)))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected(Rejection::SignatureMismatch));
    }

    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn random_signatures_never_forward() {
    let (sink, forwarder) = setup();
    let mut digest = [0u8; 32];

    for _ in 0..64 {
        rand::rng().fill_bytes(&mut digest);
        let event = InboundEvent::new("hello", Some(B64.encode(digest)));
        assert!(!forwarder.handle(&event).await.unwrap().is_forwarded());
    }

    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn verification_outcome_is_repeatable() {
    let (sink, forwarder) = setup();
    let good = signed("{\"id\":1}");
    let bad = InboundEvent::new("{\"id\":1}", Some(sign_body("x", b"{\"id\":1}")));

    for _ in 0..5 {
        assert!(forwarder.handle(&good).await.unwrap().is_forwarded());
        assert_eq!(
            forwarder.handle(&bad).await.unwrap(),
            Outcome::Rejected(Rejection::SignatureMismatch)
        );
    }

    assert_eq!(sink.len().await, 5);
}

#[tokio::test]
#[traced_test]
async fn rejection_logs_are_redacted_by_default() {
    let (_sink, forwarder) = setup();
    let event = InboundEvent::new("customer@example.com", Some("Zm9yZ2Vk".into()));

    forwarder.handle(&event).await.unwrap();

    assert!(logs_contain("body_sha256"));
    assert!(!logs_contain("customer@example.com"));
    assert!(!logs_contain("Zm9yZ2Vk"));
}

#[tokio::test]
#[traced_test]
async fn rejection_logs_include_payload_when_enabled() {
    let sink = InMemorySink::new(STREAM);
    let forwarder = WebhookForwarder::new(Arc::new(sink.clone()), &config(SECRET, true));
    let event = InboundEvent::new("customer@example.com", Some("Zm9yZ2Vk".into()));

    forwarder.handle(&event).await.unwrap();

    assert!(logs_contain("customer@example.com"));
    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn lambda_handler_completes_for_rejected_delivery() {
    let (sink, forwarder) = setup();
    let mut context = Context::default();
    context.request_id = "req-rejected".into();

    let result = handle_invocation(
        &forwarder,
        LambdaEvent::new(InboundEvent::new("hello", None), context),
    )
    .await;

    assert!(result.is_ok());
    assert!(sink.is_empty().await);
}

#[tokio::test]
#[traced_test]
async fn lambda_handler_logs_under_request_span() {
    let (sink, forwarder) = setup();
    let mut context = Context::default();
    context.request_id = "req-7f3a9c".into();

    handle_invocation(&forwarder, LambdaEvent::new(signed("hello"), context))
        .await
        .unwrap();

    assert_eq!(sink.len().await, 1);
    assert!(logs_contain("ingress.handle"));
    assert!(logs_contain("req-7f3a9c"));
}

#[tokio::test]
async fn lambda_handler_forwards_from_json_payload() {
    let (sink, forwarder) = setup();
    let payload: InboundEvent = serde_json::from_value(serde_json::json!({
        "shopify_hmac": sign_body(SECRET, b"{\"id\":42}"),
        "body": "{\"id\":42}",
    }))
    .unwrap();

    handle_invocation(&forwarder, LambdaEvent::new(payload, Context::default()))
        .await
        .unwrap();

    assert_eq!(sink.records().await, vec![Bytes::from_static(b"{\"id\":42}\n")]);
}

#[tokio::test]
async fn lambda_handler_surfaces_sink_failure() {
    let sink = InMemorySink::unavailable(STREAM);
    let forwarder = WebhookForwarder::new(Arc::new(sink), &config(SECRET, false));

    let err = handle_invocation(&forwarder, LambdaEvent::new(signed("hello"), Context::default()))
        .await
        .unwrap_err();

    assert!(err.to_string().contains(STREAM));
}

#[tokio::test]
async fn payload_without_body_never_reaches_the_sink() {
    let (sink, _forwarder) = setup();
    let payload = serde_json::json!({ "shopify_hmac": sign_body(SECRET, b"") });

    let err = serde_json::from_value::<InboundEvent>(payload).unwrap_err();

    assert!(err.to_string().contains("missing field `body`"), "{err}");
    assert!(sink.is_empty().await);
}
