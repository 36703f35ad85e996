use anyhow::{Context, Result};

/// Use the password given on the command line, or ask for it without echoing.
pub fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}
