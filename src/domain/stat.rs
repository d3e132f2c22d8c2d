use serde::{Deserialize, Serialize};

/// Upper bound for every stat value
pub const STAT_MAX: u32 = 100;

/// The four character attributes a quest or daily can train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stat {
    #[default]
    Strength,
    Intellect,
    Agility,
    Wisdom,
}

impl Stat {
    /// All stats, in display (and tie-break) order
    pub const ALL: [Stat; 4] = [Stat::Strength, Stat::Intellect, Stat::Agility, Stat::Wisdom];

    /// Parse a stat from a string (supports short aliases)
    /// - strength: s, str, strength
    /// - intellect: i, int, intellect
    /// - agility: a, agi, agility
    /// - wisdom: w, wis, wisdom
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "str" | "strength" => Some(Stat::Strength),
            "i" | "int" | "intellect" => Some(Stat::Intellect),
            "a" | "agi" | "agility" => Some(Stat::Agility),
            "w" | "wis" | "wisdom" => Some(Stat::Wisdom),
            _ => None,
        }
    }

    /// Get the canonical (persisted) key
    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Strength => "STRENGTH",
            Stat::Intellect => "INTELLECT",
            Stat::Agility => "AGILITY",
            Stat::Wisdom => "WISDOM",
        }
    }

    /// Map an old three-letter key (`STR`, `INT`, `AGI`, `WIS`) to its full key
    pub fn legacy_key(key: &str) -> Option<&'static str> {
        match key {
            "STR" => Some("STRENGTH"),
            "INT" => Some("INTELLECT"),
            "AGI" => Some("AGILITY"),
            "WIS" => Some("WISDOM"),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One integer per stat, each kept within `[0, STAT_MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "STRENGTH")]
    pub strength: u32,
    #[serde(rename = "INTELLECT")]
    pub intellect: u32,
    #[serde(rename = "AGILITY")]
    pub agility: u32,
    #[serde(rename = "WISDOM")]
    pub wisdom: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(10)
    }
}

impl Stats {
    pub fn uniform(value: u32) -> Self {
        let value = value.min(STAT_MAX);
        Self {
            strength: value,
            intellect: value,
            agility: value,
            wisdom: value,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Intellect => self.intellect,
            Stat::Agility => self.agility,
            Stat::Wisdom => self.wisdom,
        }
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut u32 {
        match stat {
            Stat::Strength => &mut self.strength,
            Stat::Intellect => &mut self.intellect,
            Stat::Agility => &mut self.agility,
            Stat::Wisdom => &mut self.wisdom,
        }
    }

    /// Set a stat, clamping to `STAT_MAX`
    pub fn set(&mut self, stat: Stat, value: u32) {
        *self.slot_mut(stat) = value.min(STAT_MAX);
    }

    /// Raise a stat by `amount`, clamped at `STAT_MAX`.
    ///
    /// Returns the amount actually gained.
    pub fn raise(&mut self, stat: Stat, amount: u32) -> u32 {
        let slot = self.slot_mut(stat);
        let before = *slot;
        *slot = before.saturating_add(amount).min(STAT_MAX);
        *slot - before
    }

    /// True when every stat is at least `threshold`
    pub fn all_at_least(&self, threshold: u32) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) >= threshold)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, u32)> + '_ {
        Stat::ALL.iter().map(move |s| (*s, self.get(*s)))
    }
}
