//! XP and Level curve
//!
//! Levels are cumulative: going from level L to L+1 costs `floor(100 * L^1.5)` XP.

use crate::domain::constants::LEVEL_XP_BASE;

/// XP needed to advance from `level` to `level + 1`
pub fn xp_for_level(level: u32) -> u64 {
    (LEVEL_XP_BASE * f64::from(level.max(1)).powf(1.5)).floor() as u64
}

/// Total XP consumed by reaching `level + 1` from level 1
pub fn cumulative_xp_through(level: u32) -> u64 {
    (1..=level).map(xp_for_level).sum()
}

/// Where a total XP amount sits on the level curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u32,
    /// XP earned inside the current level
    pub current_in_level: u64,
    /// XP the current level requires in total
    pub needed_for_next: u64,
}

impl LevelProgress {
    /// Walk the curve from level 1, consuming each level's requirement while it is covered
    pub fn for_xp(total_xp: u64) -> Self {
        let mut level = 1u32;
        let mut consumed = 0u64;
        loop {
            let needed = xp_for_level(level);
            if consumed + needed > total_xp {
                return Self {
                    level,
                    current_in_level: total_xp - consumed,
                    needed_for_next: needed,
                };
            }
            consumed += needed;
            level += 1;
        }
    }

    /// Progress to next level (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.needed_for_next == 0 {
            1.0
        } else {
            self.current_in_level as f32 / self.needed_for_next as f32
        }
    }

    /// XP still missing for the next level
    pub fn remaining(&self) -> u64 {
        self.needed_for_next - self.current_in_level
    }
}

/// Shorthand for `LevelProgress::for_xp(total_xp).level`
pub fn level_for(total_xp: u64) -> u32 {
    LevelProgress::for_xp(total_xp).level
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(2), 282);
        assert_eq!(xp_for_level(3), 519);
        assert_eq!(xp_for_level(4), 800);
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(99), 1);
        assert_eq!(level_for(100), 2);
        assert_eq!(level_for(381), 2);
        assert_eq!(level_for(382), 3);
        // 100 + 282 + 519 + 800 = 1701
        assert_eq!(level_for(1700), 4);
        assert_eq!(level_for(1701), 5);
    }

    #[test]
    fn test_progress_within_level() {
        let p = LevelProgress::for_xp(150);
        assert_eq!(p.level, 2);
        assert_eq!(p.current_in_level, 50);
        assert_eq!(p.needed_for_next, 282);
        assert_eq!(p.remaining(), 232);
    }

    #[test]
    fn test_level_boundaries_start_at_zero() {
        for level in 1..=30 {
            let p = LevelProgress::for_xp(cumulative_xp_through(level));
            assert_eq!(p.level, level + 1);
            assert_eq!(p.current_in_level, 0);
        }
    }

    #[test]
    fn test_current_always_below_needed() {
        for xp in (0..50_000).step_by(37) {
            let p = LevelProgress::for_xp(xp);
            assert!(p.level >= 1);
            assert!(p.current_in_level < p.needed_for_next);
        }
    }
}
