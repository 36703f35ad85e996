use agenda_core::Agenda;
use anyhow::Result;

pub async fn run(agenda: &Agenda) -> Result<()> {
    agenda.auth().check_auth_token().await;

    super::report_session(agenda.auth())
}
