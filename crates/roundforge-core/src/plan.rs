//! Ordered transformation sequences.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::transformation::Transformation;

/// An ordered sequence of transformations, one per round.
///
/// The plan length is exactly the number of rounds it consumes.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, Plan, Transformation};
///
/// let charge = Transformation::produce(resources! { "electricity" => 1 });
/// let plan = Plan::from(vec![charge.clone(), charge]);
///
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan.to_string(), "1: nothing => 1 electricity\n2: nothing => 1 electricity");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Plan {
    steps: Vec<Transformation>,
}

impl Plan {
    /// The plan that consumes no rounds.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rounds consumed by the plan.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Transformation] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transformation> {
        self.steps.iter()
    }

    pub fn into_steps(self) -> Vec<Transformation> {
        self.steps
    }

    /// Prepends a step. Used while unwinding a successful search branch.
    pub fn prepend(&mut self, step: Transformation) {
        self.steps.insert(0, step);
    }
}

impl From<Vec<Transformation>> for Plan {
    fn from(steps: Vec<Transformation>) -> Self {
        Self { steps }
    }
}

impl FromIterator<Transformation> for Plan {
    fn from_iter<I: IntoIterator<Item = Transformation>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Transformation;
    type IntoIter = std::slice::Iter<'a, Transformation>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for Plan {
    type Item = Transformation;
    type IntoIter = std::vec::IntoIter<Transformation>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl Index<usize> for Plan {
    type Output = Transformation;

    fn index(&self, index: usize) -> &Transformation {
        &self.steps[index]
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(no steps)");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", i + 1, step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources;

    #[test]
    fn test_prepend_keeps_order() {
        let charge = Transformation::produce(resources! { "electricity" => 1 });
        let transmit =
            Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 });

        let mut plan = Plan::from(vec![transmit.clone()]);
        plan.prepend(charge.clone());

        assert_eq!(plan.steps(), &[charge, transmit]);
    }

    #[test]
    fn test_empty_display() {
        assert_eq!(Plan::empty().to_string(), "(no steps)");
        assert!(Plan::empty().is_empty());
    }
}
