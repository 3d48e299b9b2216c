//! Periodic side-effects applied at period boundaries.
//!
//! A round is a period boundary when the number of rounds consumed since the
//! start of the attempt, counting the round just played, is a nonzero
//! multiple of the period. Search and replay both go through
//! [`EffectConfig::apply`], so they always agree on when effects fire.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, RoundForgeError};
use crate::resource::{Resource, ResourceVector};

/// Rounds between two effect firings.
pub const DEFAULT_PERIOD: u32 = 3;

/// Hazard credited at every boundary.
pub const DEFAULT_HAZARD_INCREMENT: i64 = 2;

/// Stock removed from the decaying resource at every boundary.
pub const DEFAULT_DECAY_DECREMENT: i64 = 1;

/// A resource that loses stock at every boundary, never dropping below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecayEffect {
    pub resource: Resource,
    pub decrement: i64,
}

/// A cumulative hazard that fails the mission once it reaches `threshold`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HazardEffect {
    pub resource: Resource,
    pub increment: i64,
    pub threshold: i64,
}

/// A resource overwritten with a fixed value at every boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResetEffect {
    pub resource: Resource,
    pub value: i64,
}

/// The hazard threshold was already met when a boundary was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("hazard {accumulated} reached threshold {threshold} at round {round}")]
pub struct HazardBreach {
    /// Rounds consumed when the breach was detected.
    pub round: u32,
    /// Hazard accumulated before the increment would have been credited.
    pub accumulated: i64,
    /// Configured failure threshold.
    pub threshold: i64,
}

/// What happened to a resource vector after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectOutcome {
    /// Not a period boundary; nothing changed.
    #[default]
    Quiet,
    /// Boundary reached and all configured effects were applied.
    Fired,
}

impl EffectOutcome {
    /// Returns true when effects were applied.
    pub fn fired(self) -> bool {
        matches!(self, EffectOutcome::Fired)
    }
}

/// Periodic side-effect schedule.
///
/// All effects are optional. The defaults mirror the mission rules: a
/// three-round period and a hazard increment of two.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, EffectConfig, EffectOutcome, Resource};
///
/// let effects = EffectConfig::new()
///     .with_decay("thrust")
///     .with_hazard("radiation", 5);
///
/// let mut stock = resources! { "thrust" => 2 };
/// assert_eq!(effects.apply(2, &mut stock), Ok(EffectOutcome::Quiet));
/// assert_eq!(effects.apply(3, &mut stock), Ok(EffectOutcome::Fired));
/// assert_eq!(stock.get(&Resource::new("thrust")), 1);
/// assert_eq!(stock.get(&Resource::new("radiation")), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffectConfig {
    pub period: u32,
    pub decay: Option<DecayEffect>,
    pub hazard: Option<HazardEffect>,
    pub reset: Option<ResetEffect>,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            decay: None,
            hazard: None,
            reset: None,
        }
    }
}

impl EffectConfig {
    /// Creates a schedule with the default period and no effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the period length in rounds.
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Decays `resource` by the default decrement.
    pub fn with_decay(self, resource: impl Into<Resource>) -> Self {
        self.with_decay_amount(resource, DEFAULT_DECAY_DECREMENT)
    }

    /// Decays `resource` by `decrement`.
    pub fn with_decay_amount(mut self, resource: impl Into<Resource>, decrement: i64) -> Self {
        self.decay = Some(DecayEffect {
            resource: resource.into(),
            decrement,
        });
        self
    }

    /// Tracks hazard on `resource` with the default increment.
    pub fn with_hazard(self, resource: impl Into<Resource>, threshold: i64) -> Self {
        self.with_hazard_increment(resource, DEFAULT_HAZARD_INCREMENT, threshold)
    }

    /// Tracks hazard on `resource` with an explicit increment.
    pub fn with_hazard_increment(
        mut self,
        resource: impl Into<Resource>,
        increment: i64,
        threshold: i64,
    ) -> Self {
        self.hazard = Some(HazardEffect {
            resource: resource.into(),
            increment,
            threshold,
        });
        self
    }

    /// Resets `resource` to `value` at every boundary.
    pub fn with_reset(mut self, resource: impl Into<Resource>, value: i64) -> Self {
        self.reset = Some(ResetEffect {
            resource: resource.into(),
            value,
        });
        self
    }

    /// Returns true if no effect is configured.
    pub fn is_inert(&self) -> bool {
        self.decay.is_none() && self.hazard.is_none() && self.reset.is_none()
    }

    /// Returns true if `elapsed` rounds lands on a period boundary.
    #[inline]
    pub fn is_boundary(&self, elapsed: u32) -> bool {
        self.period != 0 && elapsed != 0 && elapsed % self.period == 0
    }

    /// Number of boundaries crossed within the first `rounds` rounds.
    pub fn boundaries_within(&self, rounds: u32) -> u32 {
        if self.period == 0 {
            0
        } else {
            rounds / self.period
        }
    }

    /// Applies the schedule after the round that brought the total to `elapsed`.
    ///
    /// Order is fixed: decay, then hazard, then reset. The hazard is checked
    /// before its increment is credited; a breach leaves `resources`
    /// partially updated and the caller must discard it.
    ///
    /// # Errors
    ///
    /// Returns [`HazardBreach`] when accumulated hazard already meets the threshold.
    pub fn apply(
        &self,
        elapsed: u32,
        resources: &mut ResourceVector,
    ) -> std::result::Result<EffectOutcome, HazardBreach> {
        if !self.is_boundary(elapsed) {
            return Ok(EffectOutcome::Quiet);
        }

        if let Some(decay) = &self.decay {
            let stock = resources.get(&decay.resource);
            if stock > 0 {
                let decayed = stock.saturating_sub(decay.decrement).max(0);
                resources.set(decay.resource.clone(), decayed);
            }
        }

        if let Some(hazard) = &self.hazard {
            let accumulated = resources.get(&hazard.resource);
            if accumulated >= hazard.threshold {
                return Err(HazardBreach {
                    round: elapsed,
                    accumulated,
                    threshold: hazard.threshold,
                });
            }
            resources.credit(hazard.resource.clone(), hazard.increment);
        }

        if let Some(reset) = &self.reset {
            resources.set(reset.resource.clone(), reset.value);
        }

        Ok(EffectOutcome::Fired)
    }

    /// Rejects schedules that cannot be evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`RoundForgeError::MalformedEffectConfig`] for a zero period,
    /// a non-positive hazard threshold, a negative hazard increment, or a
    /// non-positive decay decrement.
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(malformed("period must be at least one round"));
        }
        if let Some(hazard) = &self.hazard {
            if hazard.threshold <= 0 {
                return Err(malformed(format!(
                    "hazard threshold for {} must be positive, got {}",
                    hazard.resource, hazard.threshold
                )));
            }
            if hazard.increment < 0 {
                return Err(malformed(format!(
                    "hazard increment for {} must not be negative, got {}",
                    hazard.resource, hazard.increment
                )));
            }
        }
        if let Some(decay) = &self.decay {
            if decay.decrement <= 0 {
                return Err(malformed(format!(
                    "decay decrement for {} must be positive, got {}",
                    decay.resource, decay.decrement
                )));
            }
        }
        Ok(())
    }
}

fn malformed(reason: impl Into<String>) -> RoundForgeError {
    RoundForgeError::MalformedEffectConfig(reason.into())
}

impl fmt::Display for EffectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} rounds:", self.period)?;
        if self.is_inert() {
            return f.write_str(" no effects");
        }
        if let Some(decay) = &self.decay {
            write!(f, " {} -{}", decay.resource, decay.decrement)?;
        }
        if let Some(hazard) = &self.hazard {
            write!(
                f,
                " {} +{} (fails at {})",
                hazard.resource, hazard.increment, hazard.threshold
            )?;
        }
        if let Some(reset) = &self.reset {
            write!(f, " {} := {}", reset.resource, reset.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "effects_tests.rs"]
mod tests;
