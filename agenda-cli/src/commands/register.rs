use agenda_core::Agenda;
use agenda_core::auth::RegisterData;
use anyhow::Result;

pub async fn run(agenda: &Agenda, name: String, email: String, password: String) -> Result<()> {
    let data = RegisterData {
        name,
        email,
        password,
    };

    agenda.auth().start_register(&data).await;

    super::report_session(agenda.auth())
}
