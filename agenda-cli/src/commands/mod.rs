pub mod check;
pub mod login;
pub mod logout;
pub mod register;
pub mod status;

use agenda_core::auth::AuthStore;
use anyhow::Result;
use owo_colors::OwoColorize;

/// Print the session after a flow finished, or fail with the surfaced error.
fn report_session(auth: &AuthStore) -> Result<()> {
    let state = auth.state();

    if let Some(message) = &state.error_message {
        anyhow::bail!("{message}");
    }

    if !state.is_authenticated() {
        println!("{}", "Not signed in".dimmed());
        return Ok(());
    }

    let name = state.user.name.as_deref().unwrap_or("(unnamed)");
    let uid = state.user.uid.as_deref().unwrap_or("-");
    println!("Signed in as {} {}", name.bold(), format!("[{uid}]").dimmed());

    Ok(())
}
