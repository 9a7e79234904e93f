use anyhow::{Result, bail};

use edudash_application::ScreenService;
use edudash_core::session::{RecordSession, SaveOutcome};

use super::utils::{print_record, resolve_assignments};

pub async fn show(service: &ScreenService, screen: &str, id: &str) -> Result<()> {
    let session = service.open_record(screen, id).await?;
    print_record(session.schema(), session.working());
    Ok(())
}

pub async fn edit(service: &ScreenService, screen: &str, id: &str, sets: &[String]) -> Result<()> {
    let mut session = service.open_record(screen, id).await?;
    session.start_edit()?;
    apply_and_save(service, &mut session, sets).await
}

pub async fn create(
    service: &ScreenService,
    screen: &str,
    id: Option<&str>,
    sets: &[String],
) -> Result<()> {
    let mut session = service.new_record(screen, id)?;
    apply_and_save(service, &mut session, sets).await?;
    println!("id: {}", session.key().id);
    Ok(())
}

pub async fn delete(service: &ScreenService, screen: &str, id: &str) -> Result<()> {
    service.delete(screen, id).await?;
    println!("Deleted {}/{}", screen, id);
    Ok(())
}

async fn apply_and_save(
    service: &ScreenService,
    session: &mut RecordSession,
    sets: &[String],
) -> Result<()> {
    for (field, value) in resolve_assignments(session.schema(), sets)? {
        session.set_field(&field, value)?;
    }

    match service.save(session).await? {
        SaveOutcome::Saved(_) => {
            print_record(session.schema(), session.snapshot());
            Ok(())
        }
        SaveOutcome::Invalid(_) | SaveOutcome::Failed(_) => {
            bail!("{} was not saved", session.key())
        }
    }
}
