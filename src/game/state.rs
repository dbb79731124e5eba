//! Player state and the per-action arithmetic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five economic actions a player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Record a song: song quality +1.
    RecordSong,
    /// Go on tour: fans += tour capacity, level +1.
    GoOnTour,
    /// Upgrade the studio: studio level +1.
    UpgradeStudio,
    /// Upgrade the tour: capacity and ticket cost both double.
    UpgradeTour,
    /// Upgrade songwriting: song quality and recording cost both double.
    UpgradeSong,
}

impl Action {
    /// All actions, in menu order.
    pub const ALL: [Action; 5] = [
        Action::RecordSong,
        Action::GoOnTour,
        Action::UpgradeStudio,
        Action::UpgradeTour,
        Action::UpgradeSong,
    ];

    /// The message shown to the player when the action is unaffordable.
    #[must_use]
    pub const fn insufficient_funds_message(&self) -> &'static str {
        match self {
            Action::RecordSong => "Insufficient funds to record a song.",
            Action::GoOnTour => "Insufficient funds to go on tour.",
            Action::UpgradeStudio => "Insufficient funds to upgrade studio.",
            Action::UpgradeTour => "Insufficient funds to upgrade tour.",
            Action::UpgradeSong => "Insufficient funds to upgrade song quality.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::RecordSong => "record song",
            Action::GoOnTour => "go on tour",
            Action::UpgradeStudio => "upgrade studio",
            Action::UpgradeTour => "upgrade tour",
            Action::UpgradeSong => "upgrade song",
        };
        f.write_str(name)
    }
}

/// The full player snapshot: everything that is persisted between
/// sessions. All fields are non-negative; costs only ever double.
///
/// JSON round-trips reproduce every field exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    /// In-game currency, reconciled against the stablecoin balance on load.
    pub money: u64,
    /// Fan count, grown by touring.
    pub fans: u64,
    /// Career level, grown by touring.
    pub level: u64,
    /// Studio level.
    pub studio_level: u64,
    /// Song quality.
    pub song_quality: u64,
    /// Fans gained per tour.
    pub tour_capacity: u64,
    /// Cost of going on tour.
    pub tour_cost: u64,
    /// Cost of recording a song.
    pub song_cost: u64,
    /// Cost of the next studio upgrade.
    pub studio_upgrade_cost: u64,
    /// Cost of the next tour upgrade.
    pub tour_upgrade_cost: u64,
    /// Cost of the next song upgrade.
    pub song_upgrade_cost: u64,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            money: 100,
            fans: 0,
            level: 1,
            studio_level: 1,
            song_quality: 1,
            tour_capacity: 10,
            tour_cost: 50,
            song_cost: 20,
            studio_upgrade_cost: 100,
            tour_upgrade_cost: 200,
            song_upgrade_cost: 400,
        }
    }
}

impl PlayerData {
    /// The current cost of an action.
    #[must_use]
    pub const fn cost(&self, action: Action) -> u64 {
        match action {
            Action::RecordSong => self.song_cost,
            Action::GoOnTour => self.tour_cost,
            Action::UpgradeStudio => self.studio_upgrade_cost,
            Action::UpgradeTour => self.tour_upgrade_cost,
            Action::UpgradeSong => self.song_upgrade_cost,
        }
    }

    /// Whether the player can currently afford an action.
    #[must_use]
    pub const fn can_afford(&self, action: Action) -> bool {
        self.money >= self.cost(action)
    }

    /// Attempt an action: deduct its cost, apply its state change, and
    /// double its associated cost(s) exactly once.
    ///
    /// Returns the amount deducted, or `None` when funds are insufficient,
    /// in which case nothing changes.
    pub fn try_apply(&mut self, action: Action) -> Option<u64> {
        let cost = self.cost(action);
        if self.money < cost {
            return None;
        }
        self.money -= cost;

        match action {
            Action::RecordSong => {
                self.song_quality = self.song_quality.saturating_add(1);
                self.song_cost = self.song_cost.saturating_mul(2);
            }
            Action::GoOnTour => {
                self.fans = self.fans.saturating_add(self.tour_capacity);
                self.level = self.level.saturating_add(1);
                self.tour_cost = self.tour_cost.saturating_mul(2);
            }
            Action::UpgradeStudio => {
                self.studio_level = self.studio_level.saturating_add(1);
                self.studio_upgrade_cost = self.studio_upgrade_cost.saturating_mul(2);
            }
            Action::UpgradeTour => {
                self.tour_capacity = self.tour_capacity.saturating_mul(2);
                self.tour_cost = self.tour_cost.saturating_mul(2);
                self.tour_upgrade_cost = self.tour_upgrade_cost.saturating_mul(2);
            }
            Action::UpgradeSong => {
                self.song_quality = self.song_quality.saturating_mul(2);
                self.song_cost = self.song_cost.saturating_mul(2);
                self.song_upgrade_cost = self.song_upgrade_cost.saturating_mul(2);
            }
        }

        Some(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_new_career() {
        let data = PlayerData::default();
        assert_eq!(data.money, 100);
        assert_eq!(data.fans, 0);
        assert_eq!(data.level, 1);
        assert_eq!(data.tour_capacity, 10);
        assert_eq!(data.song_cost, 20);
        assert_eq!(data.song_upgrade_cost, 400);
    }

    #[test]
    fn test_record_song_bumps_quality_and_doubles_cost() {
        let mut data = PlayerData::default();
        let deducted = data.try_apply(Action::RecordSong);
        assert_eq!(deducted, Some(20));
        assert_eq!(data.money, 80);
        assert_eq!(data.song_quality, 2);
        assert_eq!(data.song_cost, 40);
    }

    #[test]
    fn test_go_on_tour_adds_fans_and_level() {
        let mut data = PlayerData::default();
        let deducted = data.try_apply(Action::GoOnTour);
        assert_eq!(deducted, Some(50));
        assert_eq!(data.money, 50);
        assert_eq!(data.fans, 10);
        assert_eq!(data.level, 2);
        assert_eq!(data.tour_cost, 100);
    }

    #[test]
    fn test_upgrade_tour_doubles_all_three() {
        let mut data = PlayerData {
            money: 200,
            ..PlayerData::default()
        };
        let deducted = data.try_apply(Action::UpgradeTour);
        assert_eq!(deducted, Some(200));
        assert_eq!(data.money, 0);
        assert_eq!(data.tour_capacity, 20);
        assert_eq!(data.tour_cost, 100);
        assert_eq!(data.tour_upgrade_cost, 400);
    }

    #[test]
    fn test_upgrade_song_doubles_quality_and_costs() {
        let mut data = PlayerData {
            money: 400,
            song_quality: 3,
            ..PlayerData::default()
        };
        assert_eq!(data.try_apply(Action::UpgradeSong), Some(400));
        assert_eq!(data.song_quality, 6);
        assert_eq!(data.song_cost, 40);
        assert_eq!(data.song_upgrade_cost, 800);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut data = PlayerData {
            money: 19,
            ..PlayerData::default()
        };
        let before = data;
        assert_eq!(data.try_apply(Action::RecordSong), None);
        assert_eq!(data, before);
    }

    #[test]
    fn test_doubling_saturates_instead_of_overflowing() {
        let mut data = PlayerData {
            money: u64::MAX,
            song_upgrade_cost: u64::MAX / 2 + 1,
            ..PlayerData::default()
        };
        assert!(data.try_apply(Action::UpgradeSong).is_some());
        assert_eq!(data.song_upgrade_cost, u64::MAX);
    }

    #[test]
    fn test_json_roundtrip_reproduces_every_field() {
        let data = PlayerData {
            money: 200,
            fans: 100,
            level: 2,
            studio_level: 2,
            song_quality: 2,
            tour_capacity: 20,
            tour_cost: 100,
            song_cost: 40,
            studio_upgrade_cost: 200,
            tour_upgrade_cost: 400,
            song_upgrade_cost: 800,
        };
        let json = serde_json::to_string(&data).unwrap();
        let back: PlayerData = serde_json::from_str(&json).unwrap();
        assert_eq!(data, back);
    }

    #[test]
    fn test_messages_are_action_specific() {
        assert_eq!(
            Action::RecordSong.insufficient_funds_message(),
            "Insufficient funds to record a song."
        );
        assert_eq!(
            Action::UpgradeSong.insufficient_funds_message(),
            "Insufficient funds to upgrade song quality."
        );
    }
}
