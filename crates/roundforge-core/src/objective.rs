//! Target resource profiles.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundForgeError};
use crate::resource::Resource;

/// Target for a single resource.
///
/// # Examples
///
/// ```
/// use roundforge_core::ObjectiveTarget;
///
/// let at_least_two = ObjectiveTarget::Exact(2);
/// assert!(at_least_two.is_satisfied_by(5));
/// assert_eq!(at_least_two.distance(0), 4);
///
/// let band = ObjectiveTarget::Range(3, 7);
/// assert!(band.is_satisfied_by(7));
/// assert!(!band.is_satisfied_by(8));
/// assert_eq!(band.distance(9), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectiveTarget {
    /// Satisfied once the stock reaches at least `n`.
    Exact(i64),
    /// Satisfied while the stock lies in `[lo, hi]`, bounds inclusive.
    Range(i64, i64),
}

impl ObjectiveTarget {
    /// Returns true if `available` satisfies this target.
    #[inline]
    pub fn is_satisfied_by(&self, available: i64) -> bool {
        match *self {
            ObjectiveTarget::Exact(n) => available >= n,
            ObjectiveTarget::Range(lo, hi) => lo <= available && available <= hi,
        }
    }

    /// Squared shortfall from this target; zero exactly when satisfied.
    ///
    /// Overshooting an exact target never lowers the distance below zero.
    /// An uncovered range measures from its integer midpoint.
    pub fn distance(&self, available: i64) -> u64 {
        match *self {
            ObjectiveTarget::Exact(n) => {
                if available >= n {
                    0
                } else {
                    square(n.abs_diff(available))
                }
            }
            ObjectiveTarget::Range(lo, hi) => {
                if self.is_satisfied_by(available) {
                    0
                } else {
                    square(available.abs_diff(midpoint(lo, hi)))
                }
            }
        }
    }

    /// Checks that the target can be evaluated.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            ObjectiveTarget::Exact(_) => Ok(()),
            ObjectiveTarget::Range(lo, hi) if lo > hi => {
                Err(format!("range lower bound {} exceeds upper bound {}", lo, hi))
            }
            ObjectiveTarget::Range(..) => Ok(()),
        }
    }
}

impl fmt::Display for ObjectiveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveTarget::Exact(n) => write!(f, ">= {}", n),
            ObjectiveTarget::Range(lo, hi) => write!(f, "in [{}, {}]", lo, hi),
        }
    }
}

#[inline]
fn square(delta: u64) -> u64 {
    delta.saturating_mul(delta)
}

#[inline]
fn midpoint(lo: i64, hi: i64) -> i64 {
    // Overflow-free floor((lo + hi) / 2) for lo <= hi.
    lo + ((hi as i128 - lo as i128) / 2) as i64
}

/// A mapping from resource to target.
///
/// # Examples
///
/// ```
/// use roundforge_core::{Objective, ObjectiveTarget};
///
/// let objective = Objective::new()
///     .with_exact("data", 2)
///     .with_range("angle", -10, 10);
///
/// assert_eq!(objective.len(), 2);
/// assert!(objective.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Objective {
    targets: BTreeMap<Resource, ObjectiveTarget>,
}

impl Objective {
    /// Creates an empty objective, which every state achieves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a target.
    pub fn insert(&mut self, resource: impl Into<Resource>, target: ObjectiveTarget) {
        self.targets.insert(resource.into(), target);
    }

    /// Builder form of an `Exact` target.
    pub fn with_exact(mut self, resource: impl Into<Resource>, n: i64) -> Self {
        self.insert(resource, ObjectiveTarget::Exact(n));
        self
    }

    /// Builder form of a `Range` target.
    pub fn with_range(mut self, resource: impl Into<Resource>, lo: i64, hi: i64) -> Self {
        self.insert(resource, ObjectiveTarget::Range(lo, hi));
        self
    }

    /// Returns the target for `resource`, if any.
    pub fn get(&self, resource: &Resource) -> Option<&ObjectiveTarget> {
        self.targets.get(resource)
    }

    /// Returns the number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if there are no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterates targets in resource-name order.
    pub fn iter(&self) -> btree_map::Iter<'_, Resource, ObjectiveTarget> {
        self.targets.iter()
    }

    /// Rejects objectives containing targets that cannot be evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`RoundForgeError::MalformedObjective`] naming the first bad entry.
    pub fn validate(&self) -> Result<()> {
        for (resource, target) in &self.targets {
            target.validate().map_err(|reason| {
                RoundForgeError::MalformedObjective(format!("{}: {}", resource, reason))
            })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Objective {
    type Item = (&'a Resource, &'a ObjectiveTarget);
    type IntoIter = btree_map::Iter<'a, Resource, ObjectiveTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

impl<R: Into<Resource>> FromIterator<(R, ObjectiveTarget)> for Objective {
    fn from_iter<I: IntoIterator<Item = (R, ObjectiveTarget)>>(iter: I) -> Self {
        let mut objective = Objective::new();
        for (resource, target) in iter {
            objective.insert(resource, target);
        }
        objective
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (resource, target)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", resource, target)?;
        }
        Ok(())
    }
}
