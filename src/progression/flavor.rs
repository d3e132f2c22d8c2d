//! Narrative flavor derived from the character's numbers

use crate::domain::{Stat, Stats};

fn titles(stat: Stat) -> [&'static str; 3] {
    match stat {
        Stat::Strength => ["The Forge Master", "Keeper of the Anvil", "Backend Warden"],
        Stat::Intellect => ["The Arcane Analyst", "Scholar of the Codex", "Keeper of Scrolls"],
        Stat::Agility => ["The Swift Artisan", "Keeper of Momentum", "Vanguard of Output"],
        Stat::Wisdom => ["Keeper of Markets", "The Strategic Sage", "Chronicler of Returns"],
    }
}

/// The stat with the highest value; ties go to the earlier stat in `Stat::ALL`
pub fn dominant_stat(stats: &Stats) -> Stat {
    stats
        .iter()
        .fold((Stat::Strength, 0), |best, (stat, value)| {
            if value > best.1 { (stat, value) } else { best }
        })
        .0
}

/// Class title from the dominant stat, one tier per 33 points
pub fn class_title(stats: &Stats) -> &'static str {
    let stat = dominant_stat(stats);
    let tiers = titles(stat);
    let idx = ((stats.get(stat) / 33) as usize).min(tiers.len() - 1);
    tiers[idx]
}

pub fn class_flavor(stat: Stat) -> &'static str {
    match stat {
        Stat::Strength => "Building and backend fortify the realm.",
        Stat::Intellect => "Research and reading sharpen the mind.",
        Stat::Agility => "Speed and output win the day.",
        Stat::Wisdom => "Strategy and investing compound gains.",
    }
}

/// Equipment tier 0-3 unlocked at levels 6, 11 and 21
pub fn equipment_tier(level: u32) -> u8 {
    match level {
        21.. => 3,
        11.. => 2,
        6.. => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_title_tiers() {
        let mut stats = Stats::uniform(10);
        assert_eq!(class_title(&stats), "The Forge Master");

        stats.set(Stat::Agility, 40);
        assert_eq!(class_title(&stats), "Keeper of Momentum");

        stats.set(Stat::Wisdom, 100);
        assert_eq!(class_title(&stats), "Chronicler of Returns");
    }

    #[test]
    fn test_tie_prefers_earlier_stat() {
        let mut stats = Stats::uniform(0);
        stats.set(Stat::Intellect, 20);
        stats.set(Stat::Wisdom, 20);
        assert_eq!(dominant_stat(&stats), Stat::Intellect);
    }

    #[test]
    fn test_equipment_tier() {
        assert_eq!(equipment_tier(1), 0);
        assert_eq!(equipment_tier(6), 1);
        assert_eq!(equipment_tier(10), 1);
        assert_eq!(equipment_tier(11), 2);
        assert_eq!(equipment_tier(21), 3);
    }
}
