//! Consistency checks over player state and ledger.
//!
//! These run after simulations and audits; a clean run returns no
//! violations. Each violation is self-describing.

use std::fmt;

use crate::game::state::PlayerData;
use crate::ledger::Ledger;

/// A single broken consistency rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check every consistency rule, returning all violations found.
#[must_use]
pub fn check_invariants(data: &PlayerData, ledger: &Ledger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if let Err(err) = ledger.validate_chain() {
        violations.push(InvariantViolation::new(format!("chain invalid: {err}")));
    }
    for (height, block) in ledger.blocks().iter().enumerate() {
        if height == 0 {
            if !block.transactions().is_empty() {
                violations.push(InvariantViolation::new(
                    "genesis block carries transactions",
                ));
            }
        } else if block.transactions().is_empty() {
            violations.push(InvariantViolation::new(format!(
                "block at height {height} carries no transactions"
            )));
        }
    }

    let baseline = PlayerData::default();
    if data.level < 1 {
        violations.push(InvariantViolation::new("level fell below 1"));
    }
    if data.studio_level < 1 {
        violations.push(InvariantViolation::new("studio level fell below 1"));
    }
    if data.song_quality < 1 {
        violations.push(InvariantViolation::new("song quality fell below 1"));
    }
    if data.tour_capacity < 1 {
        violations.push(InvariantViolation::new("tour capacity fell below 1"));
    }
    if data.tour_cost < baseline.tour_cost {
        violations.push(InvariantViolation::new("tour cost fell below its base"));
    }
    if data.song_cost < baseline.song_cost {
        violations.push(InvariantViolation::new("song cost fell below its base"));
    }
    if data.studio_upgrade_cost < baseline.studio_upgrade_cost {
        violations.push(InvariantViolation::new(
            "studio upgrade cost fell below its base",
        ));
    }
    if data.tour_upgrade_cost < baseline.tour_upgrade_cost {
        violations.push(InvariantViolation::new(
            "tour upgrade cost fell below its base",
        ));
    }
    if data.song_upgrade_cost < baseline.song_upgrade_cost {
        violations.push(InvariantViolation::new(
            "song upgrade cost fell below its base",
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Action;

    #[test]
    fn test_fresh_career_is_clean() {
        let data = PlayerData::default();
        let ledger = Ledger::new(1);
        assert!(check_invariants(&data, &ledger).is_empty());
    }

    #[test]
    fn test_state_after_actions_is_clean() {
        let mut data = PlayerData {
            money: 10_000,
            ..PlayerData::default()
        };
        for action in Action::ALL {
            assert!(data.try_apply(action).is_some());
        }
        let ledger = Ledger::new(1);
        assert!(check_invariants(&data, &ledger).is_empty());
    }

    #[test]
    fn test_degraded_state_is_flagged() {
        let data = PlayerData {
            level: 0,
            song_cost: 5,
            ..PlayerData::default()
        };
        let ledger = Ledger::new(0);
        let violations = check_invariants(&data, &ledger);
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.to_string().contains("level")));
        assert!(
            violations
                .iter()
                .any(|v| v.to_string().contains("song cost"))
        );
    }
}
