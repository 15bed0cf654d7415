use colored::Colorize;

use super::WorldSource;

pub fn run(source: &WorldSource) -> Result<(), String> {
    let loaded = super::load(source)?;
    let world = &loaded.world;

    println!(
        "  {} {} {}",
        "World".bold(),
        source.world.display(),
        format!("({} x {})", world.num_rows(), world.num_cols()).dimmed()
    );
    println!(
        "  {} lines loaded, {} entities, {} image frames",
        loaded.world_report.loaded,
        world.len(),
        loaded.image_report.loaded
    );
    println!();

    if world.is_empty() {
        println!("  No entities found.");
    } else {
        println!("{}", super::census_table(world));
    }
    println!();

    let skipped = loaded.world_report.diagnostics.len() + loaded.image_report.diagnostics.len();
    if skipped == 0 {
        println!("  {}", "All checks passed".green());
    } else {
        println!(
            "  {} line{} skipped",
            skipped.to_string().yellow(),
            if skipped == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
