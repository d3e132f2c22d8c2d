use serde::{Deserialize, Serialize};

use super::Stat;

/// Quest difficulty, 1 (trivial) through 5 (epic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// XP granted when the whole quest is completed
    pub fn xp_reward(&self) -> u32 {
        match self.0 {
            1 => 50,
            2 => 120,
            3 => 250,
            _ => 500,
        }
    }

    /// Stat points granted when the whole quest is completed
    pub fn stat_reward(&self) -> u32 {
        match self.0 {
            1 => 2,
            2 => 4,
            3 => 8,
            _ => 15,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("difficulty must be 1..=5, got {}", value))
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

/// A checklist item owned by a quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub done: bool,
}

/// A one-off task, optionally split into subtasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    /// Display name (generated or user-supplied)
    pub title: String,
    /// What the user actually typed
    #[serde(default)]
    pub plain_description: String,
    #[serde(default)]
    pub skill: Stat,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    /// Fixed at creation from the difficulty table
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub stat_reward: u32,
}

impl Quest {
    pub fn sub_task(&self, sub_task_id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|t| t.id == sub_task_id)
    }

    /// Number of subtasks ticked off
    pub fn done_count(&self) -> usize {
        self.sub_tasks.iter().filter(|t| t.done).count()
    }

    /// True when there is at least one subtask and all of them are done
    pub fn all_done(&self) -> bool {
        !self.sub_tasks.is_empty() && self.sub_tasks.iter().all(|t| t.done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_tables() {
        let xp: Vec<u32> = (1..=5)
            .map(|d| Difficulty::new(d).unwrap().xp_reward())
            .collect();
        assert_eq!(xp, vec![50, 120, 250, 500, 500]);
        let stat: Vec<u32> = (1..=5)
            .map(|d| Difficulty::new(d).unwrap().stat_reward())
            .collect();
        assert_eq!(stat, vec![2, 4, 8, 15, 15]);
    }

    #[test]
    fn test_difficulty_rejects_out_of_range() {
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(6).is_none());
        assert!(serde_json::from_str::<Difficulty>("9").is_err());
        assert_eq!(serde_json::from_str::<Difficulty>("3").unwrap().value(), 3);
    }

    #[test]
    fn test_all_done_requires_subtasks() {
        let mut quest = Quest {
            id: "q".to_string(),
            title: "Empty".to_string(),
            plain_description: String::new(),
            skill: Stat::Strength,
            difficulty: Difficulty::default(),
            sub_tasks: vec![],
            completed_at: None,
            created_at: 0,
            xp_reward: 50,
            stat_reward: 2,
        };
        assert!(!quest.all_done());

        quest.sub_tasks.push(SubTask {
            id: "s".to_string(),
            label: "X".to_string(),
            done: true,
        });
        assert!(quest.all_done());
        assert_eq!(quest.done_count(), 1);
    }
}
