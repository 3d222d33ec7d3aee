// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ChatMessageId;

pub const GREETING_REPLY: &str =
    "Hello! I'm the clinic assistant. Ask me about patients, doctors, schedules or billing.";
pub const APOLOGY_REPLY: &str =
    "I'm sorry, I couldn't process that request right now. Please try again in a moment.";
pub const CREDENTIALS_MISSING_REPLY: &str =
    "The assistant is not configured: no API key was found. Set [llm].api_key or MEDCRM_API_KEY.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub sender: ChatSender,
    pub text: String,
}

/// Payload of one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub user_message: String,
    pub context_hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Generated(String),
    Failed(String),
    CredentialsMissing,
}

impl ReplyOutcome {
    /// The text shown to the user; empty generations fall back to the apology.
    pub fn reply_text(&self) -> &str {
        match self {
            Self::Generated(text) if !text.trim().is_empty() => text,
            Self::Generated(_) | Self::Failed(_) => APOLOGY_REPLY,
            Self::CredentialsMissing => CREDENTIALS_MISSING_REPLY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    Empty,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub request_id: u64,
    pub request: GenerationRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAssistant {
    transcript: Vec<ChatMessage>,
    in_flight: Option<u64>,
    next_message_id: i64,
    next_request_id: u64,
}

impl Default for ChatAssistant {
    fn default() -> Self {
        let mut assistant = Self::empty();
        assistant.push(ChatSender::Assistant, GREETING_REPLY.to_owned());
        assistant
    }
}

impl ChatAssistant {
    pub fn empty() -> Self {
        Self {
            transcript: Vec::new(),
            in_flight: None,
            next_message_id: 1,
            next_request_id: 0,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Appends the user message and enters the waiting state.
    pub fn begin_send(
        &mut self,
        raw: &str,
        context_hint: &str,
    ) -> Result<PendingReply, SendRejected> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }
        if self.in_flight.is_some() {
            return Err(SendRejected::Busy);
        }

        self.push(ChatSender::User, text.to_owned());
        let request_id = self.next_request_id();
        self.in_flight = Some(request_id);
        Ok(PendingReply {
            request_id,
            request: GenerationRequest {
                user_message: text.to_owned(),
                context_hint: context_hint.to_owned(),
            },
        })
    }

    /// Appends exactly one assistant message for the in-flight request and
    /// returns to idle. Unknown request ids are ignored.
    pub fn finish(&mut self, request_id: u64, outcome: &ReplyOutcome) -> bool {
        if self.in_flight != Some(request_id) {
            return false;
        }
        self.in_flight = None;
        self.push(ChatSender::Assistant, outcome.reply_text().to_owned());
        true
    }

    pub fn send_with<F>(
        &mut self,
        raw: &str,
        context_hint: &str,
        generate: F,
    ) -> Result<ReplyOutcome, SendRejected>
    where
        F: FnOnce(&GenerationRequest) -> ReplyOutcome,
    {
        let pending = self.begin_send(raw, context_hint)?;
        let outcome = generate(&pending.request);
        self.finish(pending.request_id, &outcome);
        Ok(outcome)
    }

    fn push(&mut self, sender: ChatSender, text: String) {
        let id = ChatMessageId::new(self.next_message_id);
        self.next_message_id += 1;
        self.transcript.push(ChatMessage { id, sender, text });
    }

    fn next_request_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.saturating_add(1);
        if self.next_request_id == 0 {
            self.next_request_id = 1;
        }
        self.next_request_id
    }
}

#[cfg(test)]
mod tests {
    use super::{
        APOLOGY_REPLY, CREDENTIALS_MISSING_REPLY, ChatAssistant, ChatSender, GREETING_REPLY,
        ReplyOutcome, SendRejected,
    };

    #[test]
    fn transcript_opens_with_greeting() {
        let chat = ChatAssistant::default();
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.transcript()[0].sender, ChatSender::Assistant);
        assert_eq!(chat.transcript()[0].text, GREETING_REPLY);
    }

    #[test]
    fn blank_messages_never_reach_the_generator() {
        let mut chat = ChatAssistant::default();
        let before = chat.transcript().len();

        for raw in ["", "   ", "\n\t "] {
            let result = chat.send_with(raw, "ctx", |_| {
                panic!("generator must not be called for blank input")
            });
            assert_eq!(result, Err(SendRejected::Empty));
        }
        assert_eq!(chat.transcript().len(), before);
        assert!(!chat.is_busy());
    }

    #[test]
    fn successful_reply_grows_transcript_by_two() {
        let mut chat = ChatAssistant::default();
        let before = chat.transcript().len();

        let outcome = chat
            .send_with("  How many patients?  ", "Viewing patients.", |request| {
                assert_eq!(request.user_message, "How many patients?");
                assert_eq!(request.context_hint, "Viewing patients.");
                ReplyOutcome::Generated("There are 12 patients.".to_owned())
            })
            .expect("send accepted");

        assert_eq!(
            outcome,
            ReplyOutcome::Generated("There are 12 patients.".to_owned())
        );
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), before + 2);
        assert_eq!(transcript[before].sender, ChatSender::User);
        assert_eq!(transcript[before].text, "How many patients?");
        assert_eq!(transcript[before + 1].sender, ChatSender::Assistant);
        assert_eq!(transcript[before + 1].text, "There are 12 patients.");
        assert!(!chat.is_busy());
    }

    #[test]
    fn failed_and_empty_replies_use_apology() {
        for outcome in [
            ReplyOutcome::Failed("connection refused".to_owned()),
            ReplyOutcome::Generated("   ".to_owned()),
        ] {
            let mut chat = ChatAssistant::default();
            let before = chat.transcript().len();
            chat.send_with("hello", "ctx", |_| outcome.clone())
                .expect("send accepted");

            assert_eq!(chat.transcript().len(), before + 2);
            assert_eq!(
                chat.transcript().last().map(|message| message.text.as_str()),
                Some(APOLOGY_REPLY)
            );
            assert!(!chat.is_busy());
        }
    }

    #[test]
    fn missing_credentials_reply_is_fixed_text() {
        let mut chat = ChatAssistant::default();
        chat.send_with("hello", "ctx", |_| ReplyOutcome::CredentialsMissing)
            .expect("send accepted");
        assert_eq!(
            chat.transcript().last().map(|message| message.text.as_str()),
            Some(CREDENTIALS_MISSING_REPLY)
        );
    }

    #[test]
    fn second_send_while_waiting_is_rejected() {
        let mut chat = ChatAssistant::default();
        let pending = chat.begin_send("first", "ctx").expect("first accepted");
        assert!(chat.is_busy());

        assert_eq!(chat.begin_send("second", "ctx"), Err(SendRejected::Busy));
        assert_eq!(chat.transcript().len(), 2);

        assert!(chat.finish(
            pending.request_id,
            &ReplyOutcome::Generated("done".to_owned())
        ));
        assert!(!chat.is_busy());
        assert!(chat.begin_send("second", "ctx").is_ok());
    }

    #[test]
    fn finish_ignores_unknown_request() {
        let mut chat = ChatAssistant::default();
        let pending = chat.begin_send("question", "ctx").expect("accepted");

        assert!(!chat.finish(
            pending.request_id + 1,
            &ReplyOutcome::Generated("stale".to_owned())
        ));
        assert!(chat.is_busy());
        assert_eq!(chat.transcript().len(), 2);
    }

    #[test]
    fn message_ids_are_sequential() {
        let mut chat = ChatAssistant::default();
        chat.send_with("one", "ctx", |_| ReplyOutcome::Generated("a".to_owned()))
            .expect("accepted");
        let ids: Vec<i64> = chat
            .transcript()
            .iter()
            .map(|message| message.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
