//! Achievement definitions and metadata
//!
//! The catalog is fixed; every fresh state is seeded with one locked slot per entry.

use crate::domain::Achievement;

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementId {
    FirstQuest,
    Streak3,
    Level5,
    Xp100Day,
    AllStats50,
}

impl AchievementId {
    /// Get the string ID used in the persisted state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstQuest => "first_quest",
            Self::Streak3 => "streak_3",
            Self::Level5 => "level_5",
            Self::Xp100Day => "xp_100_day",
            Self::AllStats50 => "all_stats_50",
        }
    }

    /// Parse from the persisted string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_quest" => Some(Self::FirstQuest),
            "streak_3" => Some(Self::Streak3),
            "level_5" => Some(Self::Level5),
            "xp_100_day" => Some(Self::Xp100Day),
            "all_stats_50" => Some(Self::AllStats50),
            _ => None,
        }
    }

    /// Get all achievement IDs
    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstQuest,
            Self::Streak3,
            Self::Level5,
            Self::Xp100Day,
            Self::AllStats50,
        ]
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static achievement metadata
#[derive(Debug, Clone)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl AchievementDef {
    /// Look up the definition for an id
    pub fn get(id: AchievementId) -> &'static AchievementDef {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .unwrap_or(&ACHIEVEMENTS[0])
    }

    /// A locked state slot for this definition
    pub fn locked(&self) -> Achievement {
        Achievement {
            id: self.id.as_str().to_string(),
            name: self.name.to_string(),
            unlocked_at: None,
            icon: self.icon.to_string(),
        }
    }
}

/// The full catalog, in display order
pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: AchievementId::FirstQuest,
        name: "First Quest",
        description: "Complete your first quest",
        icon: "⚔",
    },
    AchievementDef {
        id: AchievementId::Streak3,
        name: "3-Day Streak",
        description: "Complete something three days in a row",
        icon: "🔥",
    },
    AchievementDef {
        id: AchievementId::Level5,
        name: "Level 5",
        description: "Reach level 5",
        icon: "⭐",
    },
    AchievementDef {
        id: AchievementId::Xp100Day,
        name: "100 XP in a Day",
        description: "Earn 100 XP within a single day",
        icon: "✨",
    },
    AchievementDef {
        id: AchievementId::AllStats50,
        name: "All Stats Above 50",
        description: "Raise every stat to 50",
        icon: "🏆",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_a_definition() {
        for id in AchievementId::all() {
            assert_eq!(AchievementDef::get(*id).id, *id);
            assert_eq!(AchievementId::from_str(id.as_str()), Some(*id));
        }
        assert_eq!(ACHIEVEMENTS.len(), AchievementId::all().len());
    }
}
