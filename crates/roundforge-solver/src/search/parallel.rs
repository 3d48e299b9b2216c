//! Parallel exploration of root candidates.
//!
//! Root candidates keep their heuristic rank. Each one is searched on the
//! rayon pool and is cancelled as soon as a better-ranked sibling succeeds,
//! so the lowest-ranked success wins exactly as in the sequential search.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rayon::ThreadPool;
use roundforge_core::State;
use tracing::debug;

use super::engine::{Branch, Entry, Path};
use super::{SearchEngine, SearchOutcome};
use crate::scope::SearchScope;
use crate::termination::Termination;

/// Cancels a subtree once a better-ranked sibling has succeeded.
struct RankedTermination<'a, T: ?Sized> {
    inner: &'a T,
    rank: usize,
    best: &'a AtomicUsize,
}

impl<T: Termination + ?Sized> fmt::Debug for RankedTermination<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankedTermination")
            .field("inner", &self.inner)
            .field("rank", &self.rank)
            .finish()
    }
}

impl<T: Termination + ?Sized> Termination for RankedTermination<'_, T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.best.load(Ordering::Acquire) < self.rank || self.inner.is_terminated(scope)
    }
}

impl<T: Termination + ?Sized> SearchEngine<'_, T> {
    /// Searches for a plan from `initial`, exploring root candidates on `pool`.
    ///
    /// Returns the same plan as [`solve`](Self::solve) would, provided no
    /// termination fires.
    pub fn solve_parallel(
        &self,
        initial: &State,
        scope: &SearchScope,
        pool: &ThreadPool,
    ) -> SearchOutcome {
        let branch = self.descend_root(initial.clone(), scope, pool);
        self.finish(branch, scope)
    }

    fn descend_root(&self, state: State, scope: &SearchScope, pool: &ThreadPool) -> Branch {
        let candidates = match self.enter(&state, 0, scope) {
            Entry::Achieved => return Branch::Found(Path::ending_at(state)),
            Entry::Stop(branch) => return branch,
            Entry::Expand(candidates) => candidates,
        };

        let (indices, children): (Vec<usize>, Vec<State>) = candidates
            .into_iter()
            .filter_map(|c| {
                self.settle(c.successor, 1, scope)
                    .map(|settled| (c.index, settled))
            })
            .unzip();

        debug!(
            event = "parallel_root",
            children = children.len(),
            threads = pool.current_num_threads(),
        );

        let best = AtomicUsize::new(usize::MAX);
        let results: Vec<Branch> = pool.install(|| {
            children
                .into_par_iter()
                .enumerate()
                .map(|(rank, child)| {
                    let guard = RankedTermination {
                        inner: self.termination(),
                        rank,
                        best: &best,
                    };
                    let engine = SearchEngine::new(self.context(), self.budget(), &guard);
                    let branch = engine.descend(child, 1, scope);
                    if matches!(branch, Branch::Found(_)) {
                        best.fetch_min(rank, Ordering::AcqRel);
                    }
                    branch
                })
                .collect()
        });

        // A cancelled child ranked before the winner was cut short by the
        // attempt's own termination, so its verdict is unknown.
        for (index, branch) in indices.into_iter().zip(results) {
            match branch {
                Branch::Found(mut path) => {
                    path.extend(index, state);
                    return Branch::Found(path);
                }
                Branch::Cancelled => return Branch::Cancelled,
                Branch::Failed => {}
            }
        }
        Branch::Failed
    }
}
