//! Tests for the periodic effect schedule.

use super::*;
use crate::resources;

fn thrust() -> Resource {
    Resource::new("thrust")
}

fn radiation() -> Resource {
    Resource::new("radiation")
}

#[test]
fn test_defaults() {
    let effects = EffectConfig::default();
    assert_eq!(effects.period, DEFAULT_PERIOD);
    assert!(effects.is_inert());
    assert!(effects.validate().is_ok());

    let hazard = EffectConfig::new().with_hazard("radiation", 5).hazard.unwrap();
    assert_eq!(hazard.increment, DEFAULT_HAZARD_INCREMENT);
}

#[test]
fn test_boundary_uses_elapsed_rounds() {
    let effects = EffectConfig::new().with_period(3);
    assert!(!effects.is_boundary(0));
    assert!(!effects.is_boundary(1));
    assert!(!effects.is_boundary(2));
    assert!(effects.is_boundary(3));
    assert!(!effects.is_boundary(4));
    assert!(effects.is_boundary(6));
    assert_eq!(effects.boundaries_within(12), 4);
    assert_eq!(effects.boundaries_within(11), 3);
}

#[test]
fn test_quiet_round_changes_nothing() {
    let effects = EffectConfig::new().with_decay("thrust").with_reset("angle", 0);
    let mut stock = resources! { "thrust" => 4, "angle" => 30 };
    let before = stock.clone();

    assert_eq!(effects.apply(1, &mut stock), Ok(EffectOutcome::Quiet));
    assert_eq!(stock, before);
}

#[test]
fn test_decay_only_when_positive() {
    let effects = EffectConfig::new().with_decay("thrust");

    let mut stock = resources! { "thrust" => 1 };
    effects.apply(3, &mut stock).unwrap();
    assert_eq!(stock.get(&thrust()), 0);

    effects.apply(6, &mut stock).unwrap();
    assert_eq!(stock.get(&thrust()), 0);

    let mut empty = ResourceVector::new();
    effects.apply(3, &mut empty).unwrap();
    assert!(!empty.contains(&thrust()));
}

#[test]
fn test_decay_amount_floors_at_zero() {
    let effects = EffectConfig::new().with_decay_amount("thrust", 3);
    let mut stock = resources! { "thrust" => 2 };
    effects.apply(3, &mut stock).unwrap();
    assert_eq!(stock.get(&thrust()), 0);
}

#[test]
fn test_hazard_checked_before_credit() {
    let effects = EffectConfig::new().with_hazard_increment("radiation", 2, 5);
    let mut stock = ResourceVector::new();

    effects.apply(3, &mut stock).unwrap();
    effects.apply(6, &mut stock).unwrap();
    assert_eq!(stock.get(&radiation()), 4);

    // 4 < 5: credited to 6
    effects.apply(9, &mut stock).unwrap();
    assert_eq!(stock.get(&radiation()), 6);

    let breach = effects.apply(12, &mut stock).unwrap_err();
    assert_eq!(
        breach,
        HazardBreach {
            round: 12,
            accumulated: 6,
            threshold: 5
        }
    );
}

#[test]
fn test_reset_overwrites() {
    let effects = EffectConfig::new().with_reset("angle", 0);
    let mut stock = resources! { "angle" => -40 };
    effects.apply(3, &mut stock).unwrap();
    assert_eq!(stock.get(&Resource::ANGLE), 0);
}

#[test]
fn test_effect_order_decay_hazard_reset() {
    // Reset targets the decaying resource: reset wins because it runs last.
    let effects = EffectConfig::new()
        .with_decay("thrust")
        .with_hazard("radiation", 10)
        .with_reset("thrust", 7);
    let mut stock = resources! { "thrust" => 3 };
    assert_eq!(effects.apply(3, &mut stock), Ok(EffectOutcome::Fired));
    assert_eq!(stock.get(&thrust()), 7);
    assert_eq!(stock.get(&radiation()), 2);
}

#[test]
fn test_validation() {
    assert!(matches!(
        EffectConfig::new().with_period(0).validate(),
        Err(RoundForgeError::MalformedEffectConfig(_))
    ));
    assert!(EffectConfig::new().with_hazard("radiation", 0).validate().is_err());
    assert!(EffectConfig::new()
        .with_hazard_increment("radiation", -1, 5)
        .validate()
        .is_err());
    assert!(EffectConfig::new().with_decay_amount("thrust", 0).validate().is_err());
    assert!(EffectConfig::new()
        .with_decay("thrust")
        .with_hazard("radiation", 5)
        .with_reset("angle", 0)
        .validate()
        .is_ok());
}

#[test]
fn test_zero_period_never_fires() {
    let effects = EffectConfig::new().with_period(0).with_decay("thrust");
    assert!(!effects.is_boundary(3));
    assert_eq!(effects.boundaries_within(9), 0);
}

#[test]
fn test_display() {
    let effects = EffectConfig::new().with_decay("thrust").with_hazard("radiation", 5);
    assert_eq!(
        effects.to_string(),
        "every 3 rounds: thrust -1 radiation +2 (fails at 5)"
    );
    assert_eq!(EffectConfig::new().to_string(), "every 3 rounds: no effects");
}
