//! Name service commands

use anyhow::{Result, bail};

use questlog::remote::{NameRequest, generate_or_fallback, names};

use super::Session;

pub async fn names_test_command(session: &Session) -> Result<()> {
    let Some(generator) = session.name_generator() else {
        bail!(
            "Name generation is disabled or {} is not set",
            session.config.settings.names.api_key_env
        );
    };
    let message = tokio::task::spawn_blocking(move || names::test_connection(generator.as_ref())).await?;
    println!("{}", message);
    Ok(())
}

pub async fn names_character_command(session: &Session) -> Result<()> {
    let name = match session.name_generator() {
        Some(generator) => {
            generate_or_fallback(generator, NameRequest::CharacterName, session.name_timeout()).await
        }
        None => NameRequest::CharacterName.fallback(),
    };
    println!("{}", name);
    Ok(())
}
