//! Background address lookup
//!
//! The lookup runs on its own tokio task and hands its single result back
//! through a oneshot channel. The caller awaits that channel exactly once.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{IpSource, ResolvedAddress};

/// Spawn the address lookup on a background task
///
/// The returned receiver yields the lookup result once. If the task dies
/// before reporting, the sender is dropped and the receiver errors.
pub fn spawn_lookup(source: Arc<dyn IpSource>) -> oneshot::Receiver<Result<ResolvedAddress>> {
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = source.current().await;
        if tx.send(result).is_err() {
            debug!("Address lookup finished after the caller stopped waiting");
        }
    });

    rx
}

/// Spawn the lookup and wait for its result
pub async fn resolve_address(source: Arc<dyn IpSource>) -> Result<ResolvedAddress> {
    spawn_lookup(source)
        .await
        .map_err(|_| Error::resolution("Address lookup task ended without a result"))?
}
