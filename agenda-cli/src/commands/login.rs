use agenda_core::Agenda;
use agenda_core::auth::LoginCredentials;
use anyhow::Result;

pub async fn run(agenda: &Agenda, email: String, password: String) -> Result<()> {
    let credentials = LoginCredentials { email, password };

    agenda.auth().start_login(&credentials).await;

    super::report_session(agenda.auth())
}
