// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use medcrm_llm::Client;
use medcrm_testkit::{MockCompletionServer, MockResponse};
use std::time::Duration;

#[test]
fn unreachable_endpoint_error_is_actionable() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/v1",
        "gpt-4o-mini",
        Some("sk-test"),
        Duration::from_millis(200),
    )?;

    let error = client
        .generate("hello", "ctx", None)
        .expect_err("generate should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("http://127.0.0.1:1/v1"));
    assert!(message.contains("[llm].base_url") || message.contains("[llm].timeout"));
    Ok(())
}

#[test]
fn generate_sends_bearer_key_and_context() -> Result<()> {
    let server = MockCompletionServer::start(vec![MockResponse::completion(
        "There are 12 patients.",
    )])?;
    let client = Client::new(
        server.base_url(),
        "gpt-4o-mini",
        Some("sk-test"),
        Duration::from_secs(2),
    )?;

    let reply = client.generate(
        "How many patients?",
        "The user is viewing the patients list with 12 patients in total.",
        Some("Ward B is closed."),
    )?;
    assert_eq!(reply, "There are 12 patients.");

    let requests = server.finish()?;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/v1/chat/completions");
    assert_eq!(request.authorization.as_deref(), Some("Bearer sk-test"));

    let body = request.json()?;
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["stream"], false);
    let system = body["messages"][0]["content"].as_str().unwrap_or_default();
    assert!(system.contains("12 patients in total"));
    assert!(system.contains("Ward B is closed."));
    assert_eq!(body["messages"][1]["content"], "How many patients?");
    Ok(())
}

#[test]
fn generate_without_key_never_calls_out() -> Result<()> {
    let client = Client::new(
        "http://127.0.0.1:1/v1",
        "gpt-4o-mini",
        None,
        Duration::from_millis(200),
    )?;
    let error = client
        .generate("hello", "ctx", None)
        .expect_err("missing key should fail before the request");
    assert!(error.to_string().contains("no API key"));
    Ok(())
}

#[test]
fn error_envelope_surfaces_server_message() -> Result<()> {
    let server = MockCompletionServer::start(vec![MockResponse::error(
        401,
        "Incorrect API key provided",
    )])?;
    let client = Client::new(
        server.base_url(),
        "gpt-4o-mini",
        Some("sk-wrong"),
        Duration::from_secs(2),
    )?;

    let error = client
        .generate("hello", "ctx", None)
        .expect_err("401 should surface as an error");
    assert_eq!(
        error.to_string(),
        "server error (401): Incorrect API key provided"
    );
    server.finish()?;
    Ok(())
}

#[test]
fn empty_choices_are_an_error() -> Result<()> {
    let server =
        MockCompletionServer::start(vec![MockResponse::raw(200, r#"{"choices":[]}"#)])?;
    let client = Client::new(
        server.base_url(),
        "gpt-4o-mini",
        Some("sk-test"),
        Duration::from_secs(2),
    )?;

    let error = client
        .generate("hello", "ctx", None)
        .expect_err("empty choices should fail");
    assert!(error.to_string().contains("no choices"));
    server.finish()?;
    Ok(())
}

#[test]
fn list_models_and_ping_work_against_mock_server() -> Result<()> {
    let server = MockCompletionServer::start(vec![
        MockResponse::models(&["gpt-4o-mini", "gpt-4o"]),
        MockResponse::models(&["gpt-4o-mini", "gpt-4o"]),
        MockResponse::models(&["gpt-4o"]),
    ])?;
    let client = Client::new(
        server.base_url(),
        "gpt-4o-mini",
        Some("sk-test"),
        Duration::from_secs(2),
    )?;

    let models = client.list_models()?;
    assert_eq!(models, vec!["gpt-4o-mini".to_owned(), "gpt-4o".to_owned()]);
    client.ping()?;

    let error = client.ping().expect_err("missing model should fail ping");
    assert!(error.to_string().contains("set [llm].model"));

    let requests = server.finish()?;
    assert!(requests.iter().all(|request| request.url == "/v1/models"));
    Ok(())
}
