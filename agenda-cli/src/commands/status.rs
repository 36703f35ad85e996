use agenda_core::config::AgendaConfig;
use agenda_core::storage::{FileStorage, TOKEN_INIT_DATE_KEY, TokenStorage};
use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

pub fn run(config: &AgendaConfig) -> Result<()> {
    let storage = FileStorage::new(config.storage_path());

    println!("{} {}", "Backend:".bold(), config.api_url);
    println!("{} {}", "Storage:".bold(), storage.path().display());

    if storage.token()?.is_none() {
        println!("{} {}", "Token:".bold(), "none".dimmed());
        return Ok(());
    }

    let issued = storage
        .get(TOKEN_INIT_DATE_KEY)?
        .and_then(|ms| ms.parse::<i64>().ok())
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    println!("{} stored (issued {})", "Token:".bold(), issued);
    println!("Run `agenda check` to validate it against the backend.");

    Ok(())
}
