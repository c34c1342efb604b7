//! Grouping selected permanodes into collections.
//!
//! A collection is just a permanode whose `camliMember` attributes point at
//! the member permanodes. Submission either creates a fresh collection or
//! targets an existing one the user named by ref.

use futures::future;
use tracing::{info, warn};

use crate::blobref::BlobRef;
use crate::client::{PermanodeStore, StoreError};

/// Where the selected permanodes should go.
#[derive(Debug, Clone)]
pub enum CollectionTarget {
    /// Create a new collection permanode first.
    New,
    /// User-supplied ref of an existing collection, unvalidated.
    Existing(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("no selected object")]
    EmptySelection,
    #[error("not a valid collection permanode ref: {0:?}")]
    InvalidCollectionRef(String),
    #[error("failed to create collection permanode: {0}")]
    CreateFailed(#[source] StoreError),
    #[error("{failed} of {total} member claims failed for {parent}")]
    MemberClaims {
        parent: BlobRef,
        failed: usize,
        total: usize,
    },
}

/// Add the ticked permanodes to a collection and return the collection ref
/// for navigation.
///
/// Input checks happen before any network call: an empty selection and a
/// malformed existing-collection ref both abort with zero store traffic.
/// Member claims for the whole selection are dispatched concurrently and
/// awaited as a set; completion order is unspecified. Partial failure
/// reports how many claims failed rather than stalling; claims that
/// succeeded are not rolled back.
pub async fn add_to_collection(
    store: &dyn PermanodeStore,
    ticked: &[BlobRef],
    target: CollectionTarget,
) -> Result<BlobRef, CollectionError> {
    if ticked.is_empty() {
        return Err(CollectionError::EmptySelection);
    }

    let parent = match target {
        CollectionTarget::New => store
            .create_permanode()
            .await
            .map_err(CollectionError::CreateFailed)?,
        CollectionTarget::Existing(input) => {
            let trimmed = input.trim();
            BlobRef::parse(trimmed)
                .ok_or_else(|| CollectionError::InvalidCollectionRef(trimmed.to_string()))?
        }
    };

    let claims = ticked.iter().map(|child| store.add_member(&parent, child));
    let outcomes = future::join_all(claims).await;

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    if failed > 0 {
        warn!(parent = %parent, failed, total = ticked.len(), "member claims failed");
        return Err(CollectionError::MemberClaims {
            parent,
            failed,
            total: ticked.len(),
        });
    }

    info!(parent = %parent, members = ticked.len(), "collection updated");
    Ok(parent)
}
