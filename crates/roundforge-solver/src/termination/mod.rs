//! Cooperative cancellation for search attempts.
//!
//! The search engine asks its termination at every recursive entry; once it
//! answers true, the whole attempt unwinds as cancelled.

mod composite;
mod external;
mod node_count;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use external::ExternalTermination;
pub use node_count::NodeCountTermination;
pub use time::TimeTermination;

/// Trait for deciding when a search attempt must stop.
pub trait Termination: Send + Sync + Debug {
    /// Returns true if the attempt should be cancelled.
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

/// Never terminates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        false
    }
}

/// An absent termination never fires.
impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}

impl<T: Termination + ?Sized> Termination for &T {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }
}

#[cfg(test)]
mod tests;
