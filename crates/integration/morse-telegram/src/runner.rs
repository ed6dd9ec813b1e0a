//! Long-polling runner
//!
//! Polls `getUpdates`, answers every command on its own task and keeps going
//! through transport errors until the shutdown future resolves.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::client::BotClient;
use crate::command::reply_for;
use crate::types::Update;
use crate::Result;

/// Run the bot until `shutdown` completes.
///
/// Only the initial `getMe` is fatal; later failures are logged and retried.
pub async fn run(client: BotClient, shutdown: impl Future<Output = ()>) -> Result<()> {
    let me = client.get_me().await?;
    info!(username = me.username.as_deref().unwrap_or("?"), "authorized");

    let client = Arc::new(client);
    let retry_delay = client.config().retry_delay();
    let mut offset: Option<i64> = None;
    let mut tasks = JoinSet::new();

    tokio::pin!(shutdown);

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = client.get_updates(offset) => polled,
        };

        match polled {
            Ok(updates) => {
                for update in updates {
                    offset = Some(next_offset(offset, &update));

                    let client = Arc::clone(&client);
                    tasks.spawn(async move { handle_update(&client, update).await });
                }
            }
            Err(e) => {
                error!(error = %e, "failed to fetch updates");
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(retry_delay) => {}
                }
            }
        }

        // Reap finished handlers without blocking the poll loop.
        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "update handler panicked");
            }
        }
    }

    info!(in_flight = tasks.len(), "shutting down");
    while tasks.join_next().await.is_some() {}

    Ok(())
}

/// Offset that acknowledges `update`.
pub fn next_offset(current: Option<i64>, update: &Update) -> i64 {
    let next = update.update_id + 1;
    current.map_or(next, |current| current.max(next))
}

/// Reply to one update. Errors are logged, never propagated.
pub async fn handle_update(client: &BotClient, update: Update) {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "ignoring non-message update");
        return;
    };

    info!(update_id = update.update_id, sender = message.sender(), "message received");

    let Some(reply) = reply_for(&message) else {
        debug!(update_id = update.update_id, "not a command");
        return;
    };

    let parts = reply.parts();
    if parts.len() > 1 {
        debug!(update_id = update.update_id, parts = parts.len(), "splitting long reply");
    }

    // Only the first part quotes the message.
    let mut reply_to = reply.reply_to;
    for part in &parts {
        if let Err(e) = client.send_message(reply.chat_id, part, reply_to.take()).await {
            warn!(update_id = update.update_id, chat_id = reply.chat_id, error = %e, "failed to send reply");
            return;
        }
    }
}
