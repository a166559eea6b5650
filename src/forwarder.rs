use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::RelayMode;
use crate::error::ResolutionError;
use crate::filter::is_relayable;
use crate::platform::{ChatHandle, ChatPlatform, PlatformMessage};
use crate::relay::relay;
use crate::resolver::resolve;

/// One (source, target) mapping under active relay.
pub struct ForwardingPair<R> {
    pub source: ChatHandle<R>,
    pub target: ChatHandle<R>,
}

/// Live routes keyed by source conversation id.
///
/// Each route owns its own copies of the pair handles, bound at
/// registration time, so no route can observe another pair's state.
pub struct RouteTable<R> {
    routes: HashMap<i64, ForwardingPair<R>>,
}

impl<R> RouteTable<R> {
    fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Arm the live route for `pair`. Called only after the pair's
    /// backlog drain has finished.
    fn register(&mut self, pair: ForwardingPair<R>) {
        self.routes.insert(pair.source.id, pair);
    }

    fn route_for(&self, chat_id: i64) -> Option<&ForwardingPair<R>> {
        self.routes.get(&chat_id)
    }
}

/// Replay the full backlog of `pair.source` at `pair.target`, returning
/// the number of successfully relayed messages.
///
/// History is consumed oldest-first so the target mirrors the original
/// timeline. A message that fails to relay is logged and skipped; the
/// drain keeps going.
pub async fn drain_backlog<P: ChatPlatform>(
    platform: &P,
    pair: &ForwardingPair<P::Raw>,
    mode: RelayMode,
) -> Result<u64> {
    let history = platform
        .history_oldest_first(&pair.source)
        .await
        .with_context(|| format!("failed to fetch history of {}", pair.source.name))?;

    let mut relayed = 0u64;
    for message in &history {
        if !is_relayable(message) {
            continue;
        }
        match relay(platform, message, &pair.source, &pair.target, mode).await {
            Ok(()) => relayed += 1,
            Err(err) => {
                error!(
                    message_id = err.message_id,
                    cause = %err.cause,
                    "backlog relay failed, skipping message"
                );
            }
        }
    }

    Ok(relayed)
}

/// Filter-and-relay path for one live event. A failed relay is logged
/// and swallowed; nothing here may tear down the listening loop.
async fn handle_new_message<P: ChatPlatform>(
    platform: &P,
    pair: &ForwardingPair<P::Raw>,
    message: &P::Message,
    mode: RelayMode,
) {
    if !is_relayable(message) {
        return;
    }
    match relay(platform, message, &pair.source, &pair.target, mode).await {
        Ok(()) => {
            info!(
                message_id = message.id(),
                target = %pair.target.name,
                "relayed new message"
            );
        }
        Err(err) => {
            error!(
                message_id = err.message_id,
                cause = %err.cause,
                "live relay failed"
            );
        }
    }
}

/// Sequences the whole run: resolve every mapping, drain each pair's
/// backlog in list order, then follow live traffic until the process
/// is stopped.
pub struct Forwarder<'a, P: ChatPlatform> {
    platform: &'a P,
    mode: RelayMode,
}

impl<'a, P: ChatPlatform> Forwarder<'a, P> {
    pub fn new(platform: &'a P, mode: RelayMode) -> Self {
        Self { platform, mode }
    }

    pub async fn run(&self, sources: &[String], targets: &[String]) -> Result<()> {
        let pairs = self.resolve_pairs(sources, targets).await?;
        let routes = self.drain_and_register(pairs).await?;

        info!("backlog done for all pairs, listening for new messages");
        self.listen(&routes).await
    }

    /// Resolve every configured identifier up front; a single failure
    /// aborts the run before any pair starts draining.
    async fn resolve_pairs(
        &self,
        sources: &[String],
        targets: &[String],
    ) -> Result<Vec<ForwardingPair<P::Raw>>, ResolutionError> {
        let mut pairs = Vec::with_capacity(sources.len());
        for (source, target) in sources.iter().zip(targets) {
            let source = resolve(self.platform, source).await?;
            let target = resolve(self.platform, target).await?;
            pairs.push(ForwardingPair { source, target });
        }
        Ok(pairs)
    }

    /// Per pair, strictly in list order: drain the backlog to completion,
    /// then arm the live route.
    async fn drain_and_register(
        &self,
        pairs: Vec<ForwardingPair<P::Raw>>,
    ) -> Result<RouteTable<P::Raw>> {
        let mut routes = RouteTable::new();
        for pair in pairs {
            info!(
                source = %pair.source.name,
                target = %pair.target.name,
                "draining backlog"
            );
            let relayed = drain_backlog(self.platform, &pair, self.mode).await?;
            info!(source = %pair.source.name, relayed, "backlog drained");
            routes.register(pair);
        }
        Ok(routes)
    }

    async fn listen(&self, routes: &RouteTable<P::Raw>) -> Result<()> {
        loop {
            let event = self.platform.next_event().await?;
            if let Some(pair) = routes.route_for(event.chat_id) {
                handle_new_message(self.platform, pair, &event.message, self.mode).await;
            }
        }
    }
}
