pub mod telegram;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

/// Addressable reference to a conversation (chat, channel or user).
///
/// Only the resolver produces these; the rest of the pipeline treats the
/// `raw` part as opaque address material.
#[derive(Debug, Clone)]
pub struct ChatHandle<R> {
    /// Platform-side conversation id.
    pub id: i64,
    /// Display name, for logs.
    pub name: String,
    /// Platform-specific address material (e.g. packed access hash).
    pub raw: R,
}

/// Media payload classification, decided once when a message enters the
/// pipeline. Video and audio arrive as documents on the wire; the
/// variants stay distinct for callers that can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum MediaKind {
    None,
    Photo,
    Video,
    Document,
    Audio,
    WebPagePreview,
    Poll,
    Other,
}

/// Read-only view of a platform message.
pub trait PlatformMessage {
    /// Per-conversation monotonically increasing id.
    fn id(&self) -> i32;
    /// Message text or media caption; empty when absent.
    fn text(&self) -> &str;
    fn media_kind(&self) -> MediaKind;
}

/// A newly arrived message from the platform's update stream.
pub struct NewMessage<M> {
    pub chat_id: i64,
    pub message: M,
}

/// Operations the relay needs from the chat platform.
///
/// The implementation owns the live session; every pipeline component
/// receives the platform as an explicit parameter instead of reading
/// ambient state.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Platform-specific part of a [`ChatHandle`].
    type Raw: Clone + Send + Sync;
    type Message: PlatformMessage + Send + Sync;

    /// Display name of the authorized account.
    async fn self_name(&self) -> anyhow::Result<String>;

    /// Direct lookup of an identifier (username or cached peer).
    /// `Ok(None)` means the platform does not know it; the caller decides
    /// whether to fall back to a dialog scan.
    async fn lookup(&self, identifier: &str) -> anyhow::Result<Option<ChatHandle<Self::Raw>>>;

    /// Every conversation visible to the account.
    async fn dialogs(&self) -> anyhow::Result<Vec<ChatHandle<Self::Raw>>>;

    /// Full history of `source` in chronological order, a snapshot taken
    /// at call time.
    async fn history_oldest_first(
        &self,
        source: &ChatHandle<Self::Raw>,
    ) -> anyhow::Result<Vec<Self::Message>>;

    /// Native forward of `message` into `target`, preserving provenance.
    async fn forward_message(
        &self,
        message: &Self::Message,
        source: &ChatHandle<Self::Raw>,
        target: &ChatHandle<Self::Raw>,
    ) -> anyhow::Result<()>;

    /// Re-upload the message's media payload to `target` with `caption`.
    async fn send_media_copy(
        &self,
        message: &Self::Message,
        caption: &str,
        target: &ChatHandle<Self::Raw>,
    ) -> anyhow::Result<()>;

    async fn send_text(&self, text: &str, target: &ChatHandle<Self::Raw>) -> anyhow::Result<()>;

    /// Next new-message event from the update stream. Pends until one
    /// arrives; errors only on transport failure.
    async fn next_event(&self) -> anyhow::Result<NewMessage<Self::Message>>;
}
