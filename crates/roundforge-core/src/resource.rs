//! Resources and zero-default resource vectors.

use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An opaque resource name.
///
/// Resources are compared by name. Exactly one resource kind,
/// [`Resource::ANGLE`], is unconstrained: it is exempt from affordability
/// checks and may go negative freely.
///
/// # Examples
///
/// ```
/// use roundforge_core::Resource;
///
/// let electricity = Resource::new("electricity");
/// assert_eq!(electricity.name(), "electricity");
/// assert!(!electricity.is_unconstrained());
/// assert!(Resource::ANGLE.is_unconstrained());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Resource(Cow<'static, str>);

impl Resource {
    /// The orientation quantity. Never limits whether a transformation applies.
    pub const ANGLE: Resource = Resource(Cow::Borrowed("angle"));

    /// Creates a resource from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Resource(Cow::Owned(name.into()))
    }

    /// Creates a resource from a static name without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Resource(Cow::Borrowed(name))
    }

    /// Returns the resource name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns true for the resource kind that skips affordability checks.
    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        self.name() == Self::ANGLE.name()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&'static str> for Resource {
    fn from(name: &'static str) -> Self {
        Resource::from_static(name)
    }
}

impl From<String> for Resource {
    fn from(name: String) -> Self {
        Resource(Cow::Owned(name))
    }
}

/// A mapping from resource to signed quantity.
///
/// Missing entries read as zero everywhere: in [`get`](Self::get), in
/// arithmetic, and in comparisons made by [`State`](crate::State). Iteration
/// order is by resource name, which keeps rendering deterministic.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, Resource, ResourceVector};
///
/// let mut stock = resources! { "electricity" => 2, "coms" => 0 };
/// assert_eq!(stock.get(&Resource::new("electricity")), 2);
/// assert_eq!(stock.get(&Resource::new("data")), 0);
///
/// stock.credit(Resource::new("data"), 3);
/// assert_eq!(stock.to_string(), "0 coms, 3 data, 2 electricity");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ResourceVector {
    quantities: BTreeMap<Resource, i64>,
}

impl ResourceVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the quantity of `resource`, treating a missing entry as zero.
    #[inline]
    pub fn get(&self, resource: &Resource) -> i64 {
        self.quantities.get(resource).copied().unwrap_or(0)
    }

    /// Returns true if the resource has an explicit entry.
    pub fn contains(&self, resource: &Resource) -> bool {
        self.quantities.contains_key(resource)
    }

    /// Overwrites the quantity of `resource`.
    pub fn set(&mut self, resource: impl Into<Resource>, quantity: i64) {
        self.quantities.insert(resource.into(), quantity);
    }

    /// Adds `quantity` to `resource`, starting from zero if missing.
    pub fn credit(&mut self, resource: impl Into<Resource>, quantity: i64) {
        let slot = self.quantities.entry(resource.into()).or_insert(0);
        *slot = slot.saturating_add(quantity);
    }

    /// Subtracts `quantity` from `resource`, starting from zero if missing.
    ///
    /// No floor is applied here; callers decide whether the debit is allowed.
    pub fn debit(&mut self, resource: impl Into<Resource>, quantity: i64) {
        let slot = self.quantities.entry(resource.into()).or_insert(0);
        *slot = slot.saturating_sub(quantity);
    }

    /// Returns the number of explicit entries.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// Returns true if there are no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Iterates explicit entries in resource-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Resource, i64)> + '_ {
        self.quantities.iter().map(|(r, q)| (r, *q))
    }

    /// Iterates the resources with explicit entries.
    pub fn resources(&self) -> btree_map::Keys<'_, Resource, i64> {
        self.quantities.keys()
    }
}

impl<R: Into<Resource>> FromIterator<(R, i64)> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = (R, i64)>>(iter: I) -> Self {
        let mut vector = ResourceVector::new();
        for (resource, quantity) in iter {
            vector.set(resource, quantity);
        }
        vector
    }
}

impl<R: Into<Resource>> Extend<(R, i64)> for ResourceVector {
    fn extend<I: IntoIterator<Item = (R, i64)>>(&mut self, iter: I) {
        for (resource, quantity) in iter {
            self.set(resource, quantity);
        }
    }
}

impl<'a> IntoIterator for &'a ResourceVector {
    type Item = (&'a Resource, &'a i64);
    type IntoIter = btree_map::Iter<'a, Resource, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.quantities.iter()
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        for (i, (resource, quantity)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", quantity, resource)?;
        }
        Ok(())
    }
}

/// Builds a [`ResourceVector`] from `name => quantity` pairs.
///
/// ```
/// use roundforge_core::resources;
///
/// let empty = resources! {};
/// assert!(empty.is_empty());
///
/// let stock = resources! { "nav" => 2, "data" => 1 };
/// assert_eq!(stock.len(), 2);
/// ```
#[macro_export]
macro_rules! resources {
    () => {
        $crate::ResourceVector::new()
    };
    ($($name:expr => $quantity:expr),+ $(,)?) => {{
        let mut vector = $crate::ResourceVector::new();
        $( vector.set($crate::Resource::from($name), $quantity); )+
        vector
    }};
}
