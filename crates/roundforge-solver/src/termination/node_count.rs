//! Node count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates when a maximum number of nodes have been explored.
///
/// Unlike a wall-clock limit this is reproducible across machines, which
/// makes it the limit of choice in tests.
#[derive(Debug, Clone)]
pub struct NodeCountTermination {
    limit: u64,
}

impl NodeCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for NodeCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.nodes() >= self.limit
    }
}
