//! Character commands

use anyhow::{Result, bail};

use questlog::domain::{CharacterConfig, Gender, SkinTone};
use questlog::progression::Action;
use questlog::remote::{NameRequest, generate_or_fallback};

use super::Session;

pub async fn rename_command(session: &Session, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name cannot be empty");
    }
    let transition = session.run(Action::RenameCharacter(name.to_string())).await?;
    println!("You are now {}.", transition.state.character_name);
    Ok(())
}

/// Appearance choices from the command line
pub struct Appearance {
    pub name: Option<String>,
    pub class_title: Option<String>,
    pub gender: Gender,
    pub skin_tone: SkinTone,
    pub hair_style: String,
    pub hair_color: String,
    pub clothing: String,
    pub weapon: String,
}

pub async fn configure_command(session: &Session, appearance: Appearance) -> Result<()> {
    let generator = session.name_generator();
    let timeout = session.name_timeout();

    let character_name = match appearance.name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => match &generator {
            Some(g) => generate_or_fallback(g.clone(), NameRequest::CharacterName, timeout).await,
            None => NameRequest::CharacterName.fallback(),
        },
    };

    let class_title = match appearance.class_title.filter(|t| !t.trim().is_empty()) {
        Some(title) => title,
        None => {
            let request = NameRequest::ClassTitle {
                character_name: character_name.clone(),
            };
            match generator {
                Some(g) => generate_or_fallback(g, request, timeout).await,
                None => request.fallback(),
            }
        }
    };

    let config = CharacterConfig {
        gender: appearance.gender,
        character_name,
        class_title,
        skin_tone: appearance.skin_tone,
        hair_style: appearance.hair_style,
        hair_color: appearance.hair_color,
        clothing: appearance.clothing,
        weapon: appearance.weapon,
    };

    let transition = session.run(Action::ConfigureCharacter(config)).await?;
    if let Some(config) = &transition.state.character_config {
        println!("{}, {}", config.character_name, config.class_title);
    }
    Ok(())
}
