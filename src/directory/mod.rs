//! Player directory interfaces and identity resolution.
//!
//! Ownership model:
//! - `PlayerDirectory` is the pipeline-facing lookup interface.
//! - `resolve` owns the identifier precondition and guarantees at most one
//!   directory call per identifier.
//! - Backends (`PlayerDbDirectory`, `InMemoryDirectory`) only answer lookups.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::constants::directory::{IDENTIFIER_LEN, IN_MEMORY_SOURCE_ID};
use crate::data::ResolvedIdentity;
use crate::errors::ConvertError;
use crate::types::{Identifier, SourceId};

/// Playerdb-backed directory.
pub mod playerdb;

pub use playerdb::PlayerDbDirectory;

/// Lookup service mapping an identifier to a canonical player identity.
///
/// Implementations are called at most once per identifier per run and must
/// report no-match and transport errors alike as `ResolutionFailure`.
pub trait PlayerDirectory: Send + Sync {
    /// Stable directory identifier used in logs.
    fn id(&self) -> &str;
    /// Look up `identifier`. No retries.
    fn lookup(&self, identifier: &str) -> Result<ResolvedIdentity, ConvertError>;
}

/// Resolve `identifier`, short-circuiting malformed identifiers.
///
/// Identifiers whose length is not 36 characters fail with `InvalidIdentifier`
/// and never reach the directory.
pub fn resolve(
    directory: &dyn PlayerDirectory,
    identifier: &str,
) -> Result<ResolvedIdentity, ConvertError> {
    let length = identifier.chars().count();
    if length != IDENTIFIER_LEN {
        return Err(ConvertError::InvalidIdentifier {
            identifier: identifier.to_string(),
            length,
        });
    }
    debug!(
        "[cubostats:directory] resolving '{}' via {}",
        identifier,
        directory.id()
    );
    directory.lookup(identifier)
}

/// Fixed identifier table with a lookup counter.
pub struct InMemoryDirectory {
    id: SourceId,
    players: HashMap<Identifier, ResolvedIdentity>,
    lookups: AtomicUsize,
}

impl InMemoryDirectory {
    /// Empty directory.
    pub fn new() -> Self {
        Self {
            id: IN_MEMORY_SOURCE_ID.to_string(),
            players: HashMap::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Register a player answer for `identifier`.
    pub fn with_player(
        mut self,
        identifier: impl Into<Identifier>,
        identity: ResolvedIdentity,
    ) -> Self {
        self.players.insert(identifier.into(), identity);
        self
    }

    /// Number of `lookup` calls received so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerDirectory for InMemoryDirectory {
    fn id(&self) -> &str {
        &self.id
    }

    fn lookup(&self, identifier: &str) -> Result<ResolvedIdentity, ConvertError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.players
            .get(identifier)
            .cloned()
            .ok_or_else(|| ConvertError::ResolutionFailure {
                identifier: identifier.to_string(),
                reason: "no matching player".into(),
            })
    }
}

impl<T: PlayerDirectory + ?Sized> PlayerDirectory for std::sync::Arc<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn lookup(&self, identifier: &str) -> Result<ResolvedIdentity, ConvertError> {
        (**self).lookup(identifier)
    }
}
