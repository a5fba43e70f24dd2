use futures::{stream::FuturesUnordered, StreamExt};
use log::{error, info};

use crate::api::ConnectionRemover;
use crate::error::PurgeError;
use crate::state::PageState;

/// Counts known once the batch has fully drained. Per-identifier outcomes
/// are only surfaced through the log.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub attempted: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Issue one deletion request per connection in the captured page state and
/// wait for every response to resolve.
///
/// Requests are all in flight at once, unordered and uncoupled: a failure
/// for one identifier never affects the others, and nothing is retried.
/// Returns `MissingSource` without issuing any request when the state holds
/// no connections object or the object is empty.
pub async fn purge<R>(remover: &R, state: &PageState) -> Result<PurgeReport, PurgeError>
where
    R: ConnectionRemover + Sync,
{
    let connections = state.connections().ok_or(PurgeError::MissingSource)?;
    if connections.is_empty() {
        return Err(PurgeError::MissingSource);
    }

    let mut outcomes = connections
        .keys()
        .map(|user_id| async move {
            info!("Attempting to delete connection for user ID: {}", user_id);
            (user_id, remover.delete_connection(user_id).await)
        })
        .collect::<FuturesUnordered<_>>();

    let mut report = PurgeReport {
        attempted: connections.len(),
        ..PurgeReport::default()
    };
    while let Some((user_id, result)) = outcomes.next().await {
        match result {
            Ok(body) => {
                info!(
                    "Successfully deleted connection for user ID: {}: {}",
                    user_id, body
                );
                report.deleted += 1;
            }
            Err(err) => {
                error!(
                    "Failed to delete connection for user ID: {}: {}",
                    user_id, err
                );
                report.failed += 1;
            }
        }
    }
    Ok(report)
}
