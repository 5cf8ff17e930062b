//! Scoring and level progression

use crate::rules::SessionRules;

/// Result of scoring one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearOutcome {
    pub lines: usize,
    pub points: u64,
    pub leveled_up: bool,
}

/// Score tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, 0 up to the rules' cap
    pub level: u32,
    /// Total lines cleared this session
    pub lines: u32,
    /// Lines counted toward the next level
    pub lines_toward_level: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `lines` rows cleared by one lock
    ///
    /// The level is bumped first, so the points for this clear use the new
    /// level. Below the cap each level-up also shortens the fall interval.
    pub fn add_clear(&mut self, lines: usize, rules: &mut SessionRules) -> ClearOutcome {
        let cleared = u32::try_from(lines).unwrap_or(u32::MAX);
        self.lines = self.lines.saturating_add(cleared);
        self.lines_toward_level = self.lines_toward_level.saturating_add(cleared);

        let mut leveled_up = false;
        let per_level = rules.rules.lines_per_level;
        if self.lines_toward_level >= per_level {
            self.lines_toward_level -= per_level;
            self.level += 1;
            if self.level >= rules.rules.max_level {
                self.level = rules.rules.max_level;
            } else {
                rules.speed_up();
            }
            leveled_up = true;
        }

        let points = rules
            .rules
            .points_for(lines)
            .saturating_mul(u64::from(self.level) + 1);
        self.points = self.points.saturating_add(points);

        ClearOutcome {
            lines,
            points,
            leveled_up,
        }
    }

    /// Back to a fresh session
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
