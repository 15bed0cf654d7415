pub mod check;
pub mod init;
pub mod run;

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use reef_core::{Background, EntityKind, ImageStore, LoadReport, WorldModel, load_world};

/// Background id every cell starts with.
pub const DEFAULT_BACKGROUND: &str = "water";

/// Where to read a world from and how large its grid is.
pub struct WorldSource {
    pub world: PathBuf,
    pub images: PathBuf,
    pub rows: i32,
    pub cols: i32,
}

/// A world read from disk together with what the loaders had to say.
pub struct Loaded {
    pub world: WorldModel,
    pub images: ImageStore,
    pub world_report: LoadReport,
    pub image_report: LoadReport,
}

/// Read the image list (if present) and the world description.
/// Skipped lines are printed to stderr; a collision is an error.
fn load(source: &WorldSource) -> Result<Loaded, String> {
    let mut images = ImageStore::default();
    let image_report = if source.images.exists() {
        let text = read(&source.images)?;
        images.load_from_str(&text)
    } else {
        tracing::warn!(path = %source.images.display(), "image list not found, using placeholders");
        LoadReport::default()
    };
    print_diagnostics(&source.images, &image_report);

    let text = read(&source.world)?;
    let background = Background::new(DEFAULT_BACKGROUND, images.image_list(DEFAULT_BACKGROUND));
    let mut world = WorldModel::new(source.rows, source.cols, background);
    let world_report = load_world(&mut world, &text, &images)
        .map_err(|e| format!("{}: {e}", source.world.display()))?;
    print_diagnostics(&source.world, &world_report);

    Ok(Loaded {
        world,
        images,
        world_report,
        image_report,
    })
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Print skipped lines to stderr, numbered from 1.
fn print_diagnostics(path: &Path, report: &LoadReport) {
    if report.is_clean() {
        return;
    }
    for diag in &report.diagnostics {
        eprintln!(
            "  {} {}:{}: {}",
            "warning:".yellow().bold(),
            path.display(),
            diag.line + 1,
            diag.message
        );
    }
    let skipped = report.diagnostics.len();
    eprintln!(
        "  {} line{} skipped in {}",
        skipped,
        if skipped == 1 { "" } else { "s" },
        path.display()
    );
}

/// Per-kind entity counts as a table.
fn census_table(world: &WorldModel) -> Table {
    let census = world.census();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Glyph", "Count"]);
    for kind in EntityKind::ALL {
        let Some(count) = census.get(&kind) else {
            continue;
        };
        table.add_row(vec![
            kind.to_string(),
            kind.glyph().to_string(),
            count.to_string(),
        ]);
    }
    table
}
