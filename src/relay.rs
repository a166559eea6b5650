use crate::config::RelayMode;
use crate::error::RelayError;
use crate::platform::{ChatHandle, ChatPlatform, MediaKind, PlatformMessage};

/// Make exactly one delivery attempt for `message` at `target`.
///
/// No internal retry: a failure is wrapped with the offending message id
/// and returned, and the caller decides whether to skip and continue.
pub async fn relay<P: ChatPlatform>(
    platform: &P,
    message: &P::Message,
    source: &ChatHandle<P::Raw>,
    target: &ChatHandle<P::Raw>,
    mode: RelayMode,
) -> Result<(), RelayError> {
    let message_id = message.id();
    let outcome = match mode {
        RelayMode::Forward => platform.forward_message(message, source, target).await,
        // Filtered messages always carry media, but the no-media path
        // stays total for callers that skip the filter.
        RelayMode::Copy => match message.media_kind() {
            MediaKind::None => platform.send_text(message.text(), target).await,
            _ => {
                platform
                    .send_media_copy(message, message.text(), target)
                    .await
            }
        },
    };

    outcome.map_err(|cause| RelayError::new(message_id, cause))
}
