use tracing::{info, warn};

use crate::error::ResolutionError;
use crate::platform::{ChatHandle, ChatPlatform};

/// Map a user-supplied identifier (numeric id or display name) to a
/// conversation handle.
///
/// Direct lookup is fast but blind to conversations the session has not
/// cached; the dialog scan is slow but covers everything the account can
/// see. Two tiers, exact matches only, nothing beyond that.
pub async fn resolve<P: ChatPlatform>(
    platform: &P,
    identifier: &str,
) -> Result<ChatHandle<P::Raw>, ResolutionError> {
    match platform.lookup(identifier).await {
        Ok(Some(handle)) => return Ok(handle),
        Ok(None) => {
            warn!(identifier, "direct lookup found nothing, scanning dialogs");
        }
        Err(err) => {
            warn!(identifier, error = %err, "direct lookup failed, scanning dialogs");
        }
    }

    let dialogs = match platform.dialogs().await {
        Ok(dialogs) => dialogs,
        Err(err) => {
            warn!(error = %err, "dialog enumeration failed");
            return Err(ResolutionError::new(identifier));
        }
    };

    for dialog in dialogs {
        if dialog.id.to_string() == identifier || dialog.name == identifier {
            info!(identifier, id = dialog.id, name = %dialog.name, "found in dialogs");
            return Ok(dialog);
        }
    }

    Err(ResolutionError::new(identifier))
}
