// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use medcrm_app::{GenerationRequest, ReplyOutcome};
use medcrm_data::MockDataset;
use medcrm_llm::Client;
use medcrm_tui::{AppRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

pub struct ClinicRuntime {
    data: MockDataset,
    llm_client: Option<Client>,
    extra_context: Option<String>,
}

impl ClinicRuntime {
    pub fn new(data: MockDataset, llm_client: Option<Client>, extra_context: &str) -> Self {
        let extra_context = extra_context.trim();
        Self {
            data,
            llm_client,
            extra_context: (!extra_context.is_empty()).then(|| extra_context.to_owned()),
        }
    }
}

impl AppRuntime for ClinicRuntime {
    fn dataset(&self) -> &MockDataset {
        &self.data
    }

    fn generate_reply(&mut self, request: &GenerationRequest) -> ReplyOutcome {
        generate(
            self.llm_client.as_ref(),
            self.extra_context.as_deref(),
            request,
        )
    }

    fn spawn_generation(
        &mut self,
        request_id: u64,
        request: GenerationRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.llm_client.clone();
        let extra_context = self.extra_context.clone();
        thread::Builder::new()
            .name("medcrm-chat".to_owned())
            .spawn(move || {
                let outcome = generate(client.as_ref(), extra_context.as_deref(), &request);
                if tx
                    .send(InternalEvent::ChatReply {
                        request_id,
                        outcome,
                    })
                    .is_err()
                {
                    tracing::debug!(request_id, "chat reply dropped, UI already gone");
                }
            })
            .context("spawn chat worker thread")?;
        Ok(())
    }
}

fn generate(
    client: Option<&Client>,
    extra_context: Option<&str>,
    request: &GenerationRequest,
) -> ReplyOutcome {
    let Some(client) = client else {
        tracing::info!("chat send ignored, assistant disabled in config");
        return ReplyOutcome::Failed("assistant is disabled; set [llm].enabled = true".to_owned());
    };
    if !client.has_credentials() {
        tracing::warn!(base_url = client.base_url(), "chat send skipped, no API key");
        return ReplyOutcome::CredentialsMissing;
    }

    let started = Instant::now();
    tracing::info!(
        model = client.model(),
        chars = request.user_message.chars().count(),
        context_chars = request.context_hint.chars().count(),
        "chat generation started"
    );
    match client.generate(&request.user_message, &request.context_hint, extra_context) {
        Ok(text) => {
            tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                reply_chars = text.chars().count(),
                "chat generation finished"
            );
            ReplyOutcome::Generated(text)
        }
        Err(error) => {
            let detail = format!("{error:#}");
            tracing::warn!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %detail,
                "chat generation failed"
            );
            ReplyOutcome::Failed(detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClinicRuntime;
    use anyhow::{Result, anyhow};
    use medcrm_app::{GenerationRequest, ReplyOutcome};
    use medcrm_data::MockDataset;
    use medcrm_llm::Client;
    use medcrm_testkit::{MockCompletionServer, MockResponse};
    use medcrm_tui::{AppRuntime, InternalEvent};
    use std::sync::mpsc;
    use std::time::Duration;

    fn request() -> GenerationRequest {
        GenerationRequest {
            user_message: "How many patients?".to_owned(),
            context_hint: "The user is viewing the patients list with 12 patients in total."
                .to_owned(),
        }
    }

    #[test]
    fn generate_reply_uses_client_and_extra_context() -> Result<()> {
        let server = MockCompletionServer::start(vec![MockResponse::completion("Twelve.")])?;
        let client = Client::new(
            server.base_url(),
            "gpt-4o-mini",
            Some("sk-test"),
            Duration::from_secs(2),
        )?;
        let mut runtime = ClinicRuntime::new(MockDataset::demo(), Some(client), " Ward B is closed. ");

        let outcome = runtime.generate_reply(&request());
        assert_eq!(outcome, ReplyOutcome::Generated("Twelve.".to_owned()));

        let requests = server.finish()?;
        assert_eq!(requests.len(), 1);
        let body = requests[0].json()?;
        let system = body["messages"][0]["content"].as_str().unwrap_or_default();
        assert!(system.contains("12 patients in total"));
        assert!(system.contains("Ward B is closed."));
        Ok(())
    }

    #[test]
    fn missing_key_never_reaches_the_network() -> Result<()> {
        let server = MockCompletionServer::start(Vec::new())?;
        let client = Client::new(server.base_url(), "gpt-4o-mini", None, Duration::from_secs(2))?;
        let mut runtime = ClinicRuntime::new(MockDataset::demo(), Some(client), "");

        assert_eq!(
            runtime.generate_reply(&request()),
            ReplyOutcome::CredentialsMissing
        );
        assert!(server.finish()?.is_empty());
        Ok(())
    }

    #[test]
    fn disabled_assistant_fails_with_config_hint() {
        let mut runtime = ClinicRuntime::new(MockDataset::demo(), None, "");
        match runtime.generate_reply(&request()) {
            ReplyOutcome::Failed(detail) => assert!(detail.contains("[llm].enabled")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn server_error_becomes_failed_outcome() -> Result<()> {
        let server = MockCompletionServer::start(vec![MockResponse::error(
            429,
            "Rate limit reached",
        )])?;
        let client = Client::new(
            server.base_url(),
            "gpt-4o-mini",
            Some("sk-test"),
            Duration::from_secs(2),
        )?;
        let mut runtime = ClinicRuntime::new(MockDataset::demo(), Some(client), "");

        match runtime.generate_reply(&request()) {
            ReplyOutcome::Failed(detail) => {
                assert!(detail.contains("429"));
                assert!(detail.contains("Rate limit reached"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        server.finish()?;
        Ok(())
    }

    #[test]
    fn spawned_generation_reports_through_channel() -> Result<()> {
        let server = MockCompletionServer::start(vec![MockResponse::completion("On it.")])?;
        let client = Client::new(
            server.base_url(),
            "gpt-4o-mini",
            Some("sk-test"),
            Duration::from_secs(2),
        )?;
        let mut runtime = ClinicRuntime::new(MockDataset::demo(), Some(client), "");
        let (tx, rx) = mpsc::channel();

        runtime.spawn_generation(7, request(), tx)?;
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .map_err(|error| anyhow!("no reply event: {error}"))?;
        assert_eq!(
            event,
            InternalEvent::ChatReply {
                request_id: 7,
                outcome: ReplyOutcome::Generated("On it.".to_owned()),
            }
        );
        server.finish()?;
        Ok(())
    }

    #[test]
    fn runtime_serves_the_demo_dataset() {
        let runtime = ClinicRuntime::new(MockDataset::demo(), None, "");
        assert_eq!(runtime.dataset(), &MockDataset::demo());
    }
}
