//! The Status Publisher.
//!
//! The single funnel through which computed statuses land on node records.
//! Publication is idempotent: a model structurally equal to the stored one
//! issues no write, bumps no version and triggers no dependent
//! invalidation. Without this discipline every publish would retrigger
//! every dependent indefinitely even with unchanged values; with it, a
//! cascade provably quiesces once every computed value matches its stored
//! value.

use crate::store::{StoreError, TopologyStore};
use crate::types::{NodeId, StatusModel};

/// What a publication attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Whether the stored model actually changed.
    pub changed: bool,
    pub previous: StatusModel,
    pub current: StatusModel,
}

/// Publish a computed status onto its node record, write-if-changed.
pub(crate) fn publish(
    store: &mut TopologyStore,
    id: &NodeId,
    status: StatusModel,
) -> Result<PublishOutcome, StoreError> {
    let previous = store
        .get_node(id)
        .map(|record| record.status)
        .ok_or_else(|| StoreError::UnknownNode { id: id.clone() })?;
    let changed = store.publish_status(id, status)?;
    if changed {
        tracing::info!(
            target: "topolight::status",
            node = %id,
            previous = %previous,
            current = %status,
            "status published"
        );
    }
    Ok(PublishOutcome {
        changed,
        previous,
        current: status,
    })
}
