use serde::Serialize;

use crate::assets::ImageStore;
use crate::error::{CoreError, CoreResult};
use crate::world::WorldModel;

/// A problem found on one line of an input file. Lines are numbered from 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Zero-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl Diagnostic {
    /// A diagnostic for `line`.
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Outcome of reading a line-oriented input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Lines that produced something.
    pub loaded: usize,
    /// Lines that were skipped, with the reason.
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
    /// True when no line was skipped.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Populate `world` from a world description.
///
/// Each non-blank line names a kind in its first field and is handed to the
/// matching parse factory. Malformed lines are skipped and reported.
///
/// # Errors
///
/// Returns [`CoreError::Occupied`] as soon as two lines place entities on the
/// same cell; the world keeps whatever was loaded before that line.
pub fn load_world(
    world: &mut WorldModel,
    text: &str,
    images: &ImageStore,
) -> CoreResult<LoadReport> {
    let mut report = LoadReport::default();
    for (index, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let Some(&key) = fields.first() else {
            continue;
        };

        let outcome = match key {
            "background" => world.parse_background(&fields, images),
            "obstacle" => world.parse_obstacle(&fields, images).map(drop),
            "fish" => world.parse_fish(&fields, images).map(drop),
            "seaGrass" => world.parse_sea_grass(&fields, images).map(drop),
            "octo" => world.parse_octo(&fields, images).map(drop),
            "atlantis" => world.parse_atlantis(&fields, images).map(drop),
            other => Err(CoreError::UnknownKey(other.to_string())),
        };

        match outcome {
            Ok(()) => report.loaded += 1,
            Err(err) if err.is_recoverable() => {
                tracing::warn!(line = index, error = %err, "skipping world line");
                report
                    .diagnostics
                    .push(Diagnostic::new(index, err.to_string()));
            }
            Err(err) => {
                tracing::error!(line = index, error = %err, "world load aborted");
                return Err(err);
            }
        }
    }
    tracing::info!(
        loaded = report.loaded,
        skipped = report.diagnostics.len(),
        entities = world.len(),
        "world loaded"
    );
    Ok(report)
}
