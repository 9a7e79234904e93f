use anyhow::Result;
use colored::Colorize;

use edudash_application::ScreenService;
use edudash_core::view::SortSpec;

use super::utils::print_table;

pub fn list_screens(service: &ScreenService) {
    for screen in service.catalog().screens() {
        let kind = if screen.is_list() { "list" } else { "record" };
        let name = format!("{:<20}", screen.name);
        println!(
            "{} {:<20} {:<8} {}",
            name.bold(),
            screen.title,
            kind,
            screen.section.to_string().dimmed()
        );
    }
}

pub async fn list_rows(
    service: &ScreenService,
    screen: &str,
    sort: Option<String>,
    descending: bool,
) -> Result<()> {
    let sort = sort.map(|field| SortSpec { field, descending });
    let view = service.list_rows(screen, sort.as_ref()).await?;
    print_table(&view);
    Ok(())
}
