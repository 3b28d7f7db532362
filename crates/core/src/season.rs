//! # Season Level Curve
//!
//! Pure level and quest-progress math. Season XP itself is a cached sum of
//! ledger entries; these functions only derive levels and progress from it.

/// Level curve parameters for a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelCurve {
    pub xp_per_level: u32,
    pub max_level: u32,
}

impl LevelCurve {
    pub fn new(xp_per_level: u32, max_level: u32) -> Self {
        Self {
            // A zero-XP curve would make every division meaningless.
            xp_per_level: xp_per_level.max(1),
            max_level: max_level.max(1),
        }
    }

    /// Current level for the given XP: `min(max_level, xp / xp_per_level + 1)`.
    pub fn level_for(&self, xp: u32) -> u32 {
        (xp / self.xp_per_level + 1).min(self.max_level)
    }

    /// Progress within the current level as `(xp_into_level, xp_per_level)`.
    /// At max level the bar reads full.
    pub fn progress_within(&self, xp: u32) -> (u32, u32) {
        if self.level_for(xp) >= self.max_level {
            (self.xp_per_level, self.xp_per_level)
        } else {
            (xp % self.xp_per_level, self.xp_per_level)
        }
    }
}

/// Advance quest progress by `amount`, clamped at `target`. Returns the new
/// progress and whether this step was the one that completed the quest.
/// Overshoot is capped, not banked; a quest already at target never
/// completes again.
pub fn advance_progress(current: i32, amount: i32, target: i32) -> (i32, bool) {
    let amount = amount.max(0);
    let next = current.saturating_add(amount).min(target);
    (next, current < target && next >= target)
}
