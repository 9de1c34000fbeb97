// src/notify.rs
// Outbound notifications for sections that just opened.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::config::consts::{USER_AGENT, WEBHOOK_TIMEOUT_SECS};
use crate::engine::SeatRecord;
use crate::error::NotifyError;

/// Delivers one message. Must be shareable across the delivery threads of a poll.
pub trait Notifier: Sync {
    fn send(&self, message: &str) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn send(&self, message: &str) -> Result<(), NotifyError> { (**self).send(message) }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, message: &str) -> Result<(), NotifyError> { (**self).send(message) }
}

/// Body layout expected by the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadShape {
    /// `{"text": ...}` (Slack and generic hooks)
    Text,
    /// `{"content": ...}` (Discord)
    Content,
}

impl PayloadShape {
    pub fn for_url(url: &str) -> Self {
        if url.to_ascii_lowercase().contains("discord.com/api/webhooks") {
            PayloadShape::Content
        } else {
            PayloadShape::Text
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WebhookPayload<'a> {
    Text { text: &'a str },
    Content { content: &'a str },
}

pub fn build_payload(shape: PayloadShape, message: &str) -> WebhookPayload<'_> {
    match shape {
        PayloadShape::Text => WebhookPayload::Text { text: message },
        PayloadShape::Content => WebhookPayload::Content { content: message },
    }
}

/// `CRN 13471 now has 14 open seat(s) for CS - Computer Science 3214.`
pub fn open_seat_message(record: &SeatRecord, course_label: &str) -> String {
    let seats = record
        .available_seats
        .map(|n| n.to_string())
        .unwrap_or_else(|| s!("unknown"));
    format!("CRN {} now has {} open seat(s) for {}.", record.identifier, seats, course_label)
}

pub struct WebhookNotifier {
    url: String,
    shape: PayloadShape,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { shape: PayloadShape::for_url(&url), url, client })
    }

    pub fn shape(&self) -> PayloadShape { self.shape }
}

impl Notifier for WebhookNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&build_payload(self.shape, message))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected { status: status.as_u16() });
        }
        logd!("Notify: webhook accepted ({})", status.as_u16());
        Ok(())
    }
}

/// Stand-in when no webhook is configured: the message only reaches the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        logw!("Notify: webhook URL not set; skipping notification: {message}");
        Ok(())
    }
}
