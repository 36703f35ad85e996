use agenda_core::Agenda;
use anyhow::Result;

pub fn run(agenda: &Agenda) -> Result<()> {
    agenda.start_logout();
    println!("Signed out.");
    Ok(())
}
