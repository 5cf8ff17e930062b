//! Game rules and the per-session mutable part of them

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Rule values that cannot drive a session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("lines_per_level must be at least 1")]
    ZeroLinesPerLevel,
    #[error("score_table must not be empty")]
    EmptyScoreTable,
    #[error("fall interval of {base_ms}ms reaches zero before level {max_level}")]
    IntervalExhausted { base_ms: u64, max_level: u32 },
}

/// Immutable rule set, supplied at session start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub max_level: u32,
    pub lines_per_level: u32,
    /// Fall interval at level 0, in milliseconds
    pub base_fall_interval_ms: u64,
    /// Interval decrease per level gained below the cap, in milliseconds
    pub fall_interval_step_ms: u64,
    /// Points by number of lines cleared at once, multiplied by `level + 1`
    pub score_table: Vec<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_level: 10,
            lines_per_level: 10,
            base_fall_interval_ms: 500,
            fall_interval_step_ms: 50,
            score_table: vec![0, 40, 100, 300, 1200],
        }
    }
}

impl GameRules {
    /// Check that every level up to the cap keeps a positive fall interval
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.lines_per_level == 0 {
            return Err(RulesError::ZeroLinesPerLevel);
        }
        if self.score_table.is_empty() {
            return Err(RulesError::EmptyScoreTable);
        }
        // The interval shrinks on each level-up that stays below the cap
        let decreases = u64::from(self.max_level.saturating_sub(1));
        let total = self.fall_interval_step_ms.saturating_mul(decreases);
        if total >= self.base_fall_interval_ms {
            return Err(RulesError::IntervalExhausted {
                base_ms: self.base_fall_interval_ms,
                max_level: self.max_level,
            });
        }
        Ok(())
    }

    pub fn base_fall_interval(&self) -> Duration {
        Duration::from_millis(self.base_fall_interval_ms)
    }

    /// Points for clearing `lines` rows at once, before the level multiplier
    ///
    /// Counts past the end of the table use its last entry.
    pub fn points_for(&self, lines: usize) -> u64 {
        self.score_table
            .get(lines)
            .or_else(|| self.score_table.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Rules owned by a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRules {
    pub rules: GameRules,
    fall_interval: Duration,
}

impl SessionRules {
    pub fn new(rules: GameRules) -> Self {
        let fall_interval = rules.base_fall_interval();
        Self { rules, fall_interval }
    }

    /// Current time between automatic descents
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Shorten the fall interval by one level step, never reaching zero
    pub fn speed_up(&mut self) {
        let step = Duration::from_millis(self.rules.fall_interval_step_ms);
        self.fall_interval = self
            .fall_interval
            .saturating_sub(step)
            .max(Duration::from_millis(1));
    }

    /// Restore the level-0 fall interval
    pub fn reset(&mut self) {
        self.fall_interval = self.rules.base_fall_interval();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        assert_eq!(GameRules::default().validate(), Ok(()));
    }

    #[test]
    fn test_invalid_rules() {
        let rules = GameRules {
            lines_per_level: 0,
            ..GameRules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::ZeroLinesPerLevel));

        let rules = GameRules {
            score_table: Vec::new(),
            ..GameRules::default()
        };
        assert_eq!(rules.validate(), Err(RulesError::EmptyScoreTable));

        let rules = GameRules {
            fall_interval_step_ms: 100,
            ..GameRules::default()
        };
        assert!(matches!(rules.validate(), Err(RulesError::IntervalExhausted { .. })));
    }

    #[test]
    fn test_points_for() {
        let rules = GameRules::default();
        assert_eq!(rules.points_for(0), 0);
        assert_eq!(rules.points_for(1), 40);
        assert_eq!(rules.points_for(4), 1200);
        assert_eq!(rules.points_for(6), 1200);
    }

    #[test]
    fn test_speed_up_and_reset() {
        let mut session = SessionRules::new(GameRules::default());
        assert_eq!(session.fall_interval(), Duration::from_millis(500));
        session.speed_up();
        session.speed_up();
        assert_eq!(session.fall_interval(), Duration::from_millis(400));
        session.reset();
        assert_eq!(session.fall_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rules_from_partial_toml() {
        let rules: GameRules = toml::from_str("max_level = 5\nscore_table = [0, 1, 2]").unwrap();
        assert_eq!(rules.max_level, 5);
        assert_eq!(rules.lines_per_level, 10);
        assert_eq!(rules.points_for(2), 2);
    }
}
