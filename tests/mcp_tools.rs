//! MCP tool handlers called directly, without a transport.

use chrono::Duration;
use epic_consult::config::Config;
use epic_consult::error::EpicConsultError;
use epic_consult::server::EpicConsultServer;
use epic_consult::store::InMemoryConsultationStore;
use rmcp::model::{CallToolRequestParam, ErrorCode};
use serde_json::{Value, json};
use std::sync::Arc;

fn server() -> EpicConsultServer {
    let store = Arc::new(InMemoryConsultationStore::new(100, Duration::days(30)));
    EpicConsultServer::new(Arc::new(Config::default()), store)
}

fn call(name: &str, args: Value) -> CallToolRequestParam {
    CallToolRequestParam {
        name: name.to_string().into(),
        arguments: args.as_object().cloned(),
    }
}

fn acme(challenge: &str) -> Value {
    json!({
        "company_name": "Acme",
        "industry": "SaaS",
        "business_stage": "venture-seed",
        "challenge_text": challenge
    })
}

#[tokio::test]
async fn unknown_tool_is_method_not_found() {
    let err = server()
        .dispatch_tool(call("think_harder", json!({})))
        .await
        .expect_err("unknown tool");
    assert_eq!(err.code.0, ErrorCode::METHOD_NOT_FOUND.0);
    assert!(err.message.contains("think_harder"));
}

#[tokio::test]
async fn malformed_arguments_are_invalid_params() {
    let err = server()
        .dispatch_tool(call("epic_consultation", json!({"digital_presence": 5})))
        .await
        .expect_err("bad digital_presence");
    assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);

    let err = server()
        .dispatch_tool(call("epic_consultation", json!({"format": "pdf"})))
        .await
        .expect_err("bad format");
    assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
}

#[tokio::test]
async fn consultation_then_lookup() {
    let server = server();

    let err = server
        .dispatch_tool(call("consultation_lookup", acme("")))
        .await
        .expect_err("nothing cached yet");
    assert!(err.message.contains("acme-saas-venture-seed"));

    let result = server
        .dispatch_tool(call(
            "epic_consultation",
            acme("We need better product-led growth and onboarding"),
        ))
        .await
        .expect("consultation");
    let first = result.structured_content.expect("structured");
    assert_eq!(first["cached"], false);
    assert_eq!(first["consultation"]["primary_focus"], "P");
    assert!(first.get("html").is_none());

    let result = server
        .dispatch_tool(call("consultation_lookup", acme("")))
        .await
        .expect("lookup");
    let found = result.structured_content.expect("structured");
    assert_eq!(found["id"], first["consultation_id"]);
    assert_eq!(found["cache_key"], "acme-saas-venture-seed");
}

#[tokio::test]
async fn html_format_inlines_report() {
    let mut args = acme("seo and content");
    args["company_name"] = json!("<Acme & Co>");
    args["format"] = json!("html");
    let result = server()
        .dispatch_tool(call("epic_consultation", args))
        .await
        .expect("consultation");
    let body = result.structured_content.expect("structured");
    let html = body["html"].as_str().expect("html string");
    assert!(html.contains("&lt;Acme &amp; Co&gt;"));
    assert!(body["consultation"].is_object());
}

#[tokio::test]
async fn refresh_attaches_progress() {
    let server = server();
    server
        .dispatch_tool(call("epic_consultation", acme("onboarding")))
        .await
        .expect("first");

    let cached = server
        .dispatch_tool(call("epic_consultation", acme("onboarding")))
        .await
        .expect("second")
        .structured_content
        .expect("structured");
    assert_eq!(cached["cached"], true);
    assert!(cached.get("progress").is_none());

    let mut args = acme("onboarding and community events");
    args["refresh"] = json!(true);
    let refreshed = server
        .dispatch_tool(call("epic_consultation", args))
        .await
        .expect("refresh")
        .structured_content
        .expect("structured");
    assert_eq!(refreshed["cached"], false);
    let progress = &refreshed["progress"];
    assert_eq!(progress["previous_consultation_id"], cached["consultation_id"]);
    assert_eq!(progress["score_deltas"]["C"], 2);
}

#[tokio::test]
async fn score_tool_skips_the_cache() {
    let server = server();
    let result = server
        .dispatch_tool(call("epic_score", json!({})))
        .await
        .expect("score");
    let body = result.structured_content.expect("structured");
    assert_eq!(body["epic_scores"], json!({"E": 30, "P": 30, "I": 30, "C": 30}));
    assert_eq!(body["primary_focus"], "P");
    assert_eq!(server.store.len().await, 0);
}

#[tokio::test]
async fn detailed_help_formats() {
    let server = server();
    let listing = server
        .dispatch_tool(call("detailed_help", json!({})))
        .await
        .expect("listing")
        .structured_content
        .expect("structured");
    assert_eq!(listing["tools"].as_array().map(Vec::len), Some(4));

    let compact = server
        .dispatch_tool(call(
            "detailed_help",
            json!({"tool": "epic_score", "format": "compact"}),
        ))
        .await
        .expect("compact")
        .structured_content
        .expect("structured");
    assert_eq!(compact["tool"], "epic_score");

    let err = server
        .dispatch_tool(call(
            "detailed_help",
            json!({"tool": "epic_score", "format": "verbose"}),
        ))
        .await
        .expect_err("bad format");
    assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);

    let err = server
        .dispatch_tool(call("detailed_help", json!({"tool": "nope"})))
        .await
        .expect_err("unknown tool");
    assert_eq!(err.code.0, ErrorCode::INVALID_PARAMS.0);
}

#[tokio::test]
async fn slow_operations_time_out() {
    let mut config = Config::default();
    config.runtime.tool_timeout_ms = 10;
    let store = Arc::new(InMemoryConsultationStore::new(10, Duration::days(30)));
    let server = EpicConsultServer::new(Arc::new(config), store);

    let result: Result<(), EpicConsultError> = server
        .with_tool_timeout("epic_consultation", async {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            Ok(())
        })
        .await;
    assert!(matches!(
        result,
        Err(EpicConsultError::Timeout { timeout_ms: 10, .. })
    ));

    let fast: Result<u8, EpicConsultError> =
        server.with_tool_timeout("epic_score", async { Ok(7) }).await;
    assert_eq!(fast.ok(), Some(7));
}
