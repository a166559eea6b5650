use crate::platform::{MediaKind, PlatformMessage};

/// Whether a message qualifies for relay: it must carry media, and
/// link previews and polls do not count as media here.
///
/// Pure predicate, safe to call repeatedly and concurrently.
pub fn is_relayable(message: &impl PlatformMessage) -> bool {
    !matches!(
        message.media_kind(),
        MediaKind::None | MediaKind::WebPagePreview | MediaKind::Poll
    )
}
