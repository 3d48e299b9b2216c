//! One-round resource transformation rules.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::resource::ResourceVector;

/// An immutable rule that consumes `inputs` and produces `outputs`.
///
/// Applying any transformation consumes exactly one round; there is no
/// other cost.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, Transformation};
///
/// let transmit =
///     Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 });
/// assert_eq!(transmit.to_string(), "1 electricity => 1 data");
///
/// let charge = Transformation::produce(resources! { "electricity" => 1 });
/// assert_eq!(charge.to_string(), "nothing => 1 electricity");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transformation {
    inputs: ResourceVector,
    outputs: ResourceVector,
}

impl Transformation {
    /// Creates a transformation from its inputs and outputs.
    pub fn new(inputs: ResourceVector, outputs: ResourceVector) -> Self {
        Self { inputs, outputs }
    }

    /// Creates a transformation that needs no inputs.
    pub fn produce(outputs: ResourceVector) -> Self {
        Self::new(ResourceVector::new(), outputs)
    }

    /// Resources consumed when the transformation is applied.
    #[inline]
    pub fn inputs(&self) -> &ResourceVector {
        &self.inputs
    }

    /// Resources produced when the transformation is applied.
    #[inline]
    pub fn outputs(&self) -> &ResourceVector {
        &self.outputs
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.inputs, self.outputs)
    }
}
