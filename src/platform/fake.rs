//! In-memory platform double recording every call in arrival order.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{ChatHandle, ChatPlatform, MediaKind, NewMessage, PlatformMessage};

#[derive(Debug, Clone)]
pub struct FakeMessage {
    pub id: i32,
    pub text: String,
    pub media: MediaKind,
}

impl FakeMessage {
    pub fn media(id: i32, kind: MediaKind, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            media: kind,
        }
    }

    pub fn text_only(id: i32, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            media: MediaKind::None,
        }
    }
}

impl PlatformMessage for FakeMessage {
    fn id(&self) -> i32 {
        self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn media_kind(&self) -> MediaKind {
        self.media
    }
}

/// One observed platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(String),
    Dialogs,
    History(i64),
    Forward {
        message_id: i32,
        source: i64,
        target: i64,
    },
    MediaCopy {
        message_id: i32,
        caption: String,
        target: i64,
    },
    Text {
        text: String,
        target: i64,
    },
}

pub fn handle(id: i64, name: &str) -> ChatHandle<()> {
    ChatHandle {
        id,
        name: name.to_string(),
        raw: (),
    }
}

#[derive(Default)]
pub struct FakePlatform {
    /// Identifiers answered by direct lookup.
    pub known: HashMap<String, ChatHandle<()>>,
    /// Dialog list served to the enumeration fallback.
    pub dialog_list: Vec<ChatHandle<()>>,
    /// Histories keyed by source chat id, oldest first.
    pub histories: HashMap<i64, Vec<FakeMessage>>,
    /// Message ids whose delivery must fail.
    pub failing: Vec<i32>,
    pub recorded: Mutex<Vec<Call>>,
}

impl FakePlatform {
    pub fn calls(&self) -> Vec<Call> {
        self.recorded.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.recorded.lock().unwrap().push(call);
    }

    fn delivery(&self, message_id: i32) -> Result<()> {
        if self.failing.contains(&message_id) {
            bail!("delivery rejected by platform");
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    type Raw = ();
    type Message = FakeMessage;

    async fn self_name(&self) -> Result<String> {
        Ok("fake-account".to_string())
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<ChatHandle<()>>> {
        self.record(Call::Lookup(identifier.to_string()));
        Ok(self.known.get(identifier).cloned())
    }

    async fn dialogs(&self) -> Result<Vec<ChatHandle<()>>> {
        self.record(Call::Dialogs);
        Ok(self.dialog_list.clone())
    }

    async fn history_oldest_first(&self, source: &ChatHandle<()>) -> Result<Vec<FakeMessage>> {
        self.record(Call::History(source.id));
        Ok(self.histories.get(&source.id).cloned().unwrap_or_default())
    }

    async fn forward_message(
        &self,
        message: &FakeMessage,
        source: &ChatHandle<()>,
        target: &ChatHandle<()>,
    ) -> Result<()> {
        self.record(Call::Forward {
            message_id: message.id,
            source: source.id,
            target: target.id,
        });
        self.delivery(message.id)
    }

    async fn send_media_copy(
        &self,
        message: &FakeMessage,
        caption: &str,
        target: &ChatHandle<()>,
    ) -> Result<()> {
        self.record(Call::MediaCopy {
            message_id: message.id,
            caption: caption.to_string(),
            target: target.id,
        });
        self.delivery(message.id)
    }

    async fn send_text(&self, text: &str, target: &ChatHandle<()>) -> Result<()> {
        self.record(Call::Text {
            text: text.to_string(),
            target: target.id,
        });
        Ok(())
    }

    async fn next_event(&self) -> Result<NewMessage<FakeMessage>> {
        bail!("the fake has no live event stream")
    }
}
