use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Nonbinary,
}

impl Gender {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            "n" | "nb" | "nonbinary" => Some(Gender::Nonbinary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SkinTone {
    #[default]
    Tone1,
    Tone2,
    Tone3,
    Tone4,
    Tone5,
}

impl SkinTone {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim_start_matches("tone") {
            "1" => Some(SkinTone::Tone1),
            "2" => Some(SkinTone::Tone2),
            "3" => Some(SkinTone::Tone3),
            "4" => Some(SkinTone::Tone4),
            "5" => Some(SkinTone::Tone5),
            _ => None,
        }
    }
}

/// Character appearance chosen during onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CharacterConfig {
    #[serde(default)]
    pub gender: Gender,
    pub character_name: String,
    #[serde(default)]
    pub class_title: String,
    #[serde(default)]
    pub skin_tone: SkinTone,
    #[serde(default)]
    pub hair_style: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub clothing: String,
    #[serde(default)]
    pub weapon: String,
}
