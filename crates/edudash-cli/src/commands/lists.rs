use anyhow::{Result, bail};

use edudash_application::ScreenService;
use edudash_core::session::{ListSession, SaveOutcome};
use edudash_core::view::TableView;

use super::utils::{print_table, resolve_assignments};

pub async fn show(service: &ScreenService, screen: &str, key: &str) -> Result<()> {
    let session = service.open_list(screen, key).await?;
    print_items(&session);
    Ok(())
}

pub async fn add_item(
    service: &ScreenService,
    screen: &str,
    key: &str,
    sets: &[String],
) -> Result<()> {
    let mut session = service.open_list(screen, key).await?;
    let assignments = resolve_assignments(session.spec().item_schema(), sets)?;

    session.start_edit()?;
    let id = session.add()?;
    for (field, value) in assignments {
        session.set_item_field(&id, &field, value)?;
    }
    save(service, &mut session).await?;
    println!("item id: {}", id);
    Ok(())
}

pub async fn remove_item(
    service: &ScreenService,
    screen: &str,
    key: &str,
    item_id: &str,
) -> Result<()> {
    let mut session = service.open_list(screen, key).await?;
    session.start_edit()?;
    if !session.remove(item_id)? {
        bail!("{} has no item '{}'", session.key(), item_id);
    }
    save(service, &mut session).await
}

async fn save(service: &ScreenService, session: &mut ListSession) -> Result<()> {
    match service.save(session).await? {
        SaveOutcome::Saved(_) => {
            print_items(session);
            Ok(())
        }
        SaveOutcome::Invalid(_) | SaveOutcome::Failed(_) => {
            bail!("{} was not saved", session.key())
        }
    }
}

fn print_items(session: &ListSession) {
    let view = TableView::build(session.spec().item_schema(), session.items().to_vec(), None);
    print_table(&view);
}
