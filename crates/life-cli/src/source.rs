//! Where the starting grid comes from.

use anyhow::{Context, Result};
use life_core::{Cell, PatternFormat, RandomGridConfig, DEMO_PATTERN};
use life_world::Grid;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// A textual pattern source named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSource {
    /// Built-in glider
    Demo,
    Stdin,
    File(PathBuf),
    /// The pattern itself, given inline
    Literal(String),
}

impl GridSource {
    /// Blank means the demo, `-` means stdin, `@path` names a file, and anything
    /// else is the pattern itself.
    pub fn parse(arg: &str) -> Self {
        match arg.trim() {
            "" => GridSource::Demo,
            "-" => GridSource::Stdin,
            other => match other.strip_prefix('@') {
                Some(path) => GridSource::File(PathBuf::from(path)),
                None => GridSource::Literal(other.to_string()),
            },
        }
    }

    pub fn reads_stdin(&self) -> bool {
        matches!(self, GridSource::Stdin)
    }

    /// Inline patterns fit on one line, so their rows are split on `;`.
    pub fn default_format(&self) -> PatternFormat {
        match self {
            GridSource::Literal(_) => PatternFormat::with_delimiter(';'),
            _ => PatternFormat::default(),
        }
    }

    pub async fn read(&self) -> Result<String> {
        match self {
            GridSource::Demo => Ok(DEMO_PATTERN.to_string()),
            GridSource::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .context("failed to read grid from stdin")?;
                Ok(text)
            }
            GridSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read grid from {}", path.display())),
            GridSource::Literal(text) => Ok(text.clone()),
        }
    }

    pub async fn load(&self, format: Option<PatternFormat>) -> Result<Grid> {
        let text = self.read().await?;
        let format = format.unwrap_or_else(|| self.default_format());
        let grid = Grid::from_pattern(&text, format);
        if grid.is_empty() {
            warn!(source = ?self, "Starting grid has no live cells");
        }
        debug!(population = grid.population(), "Loaded starting grid");
        Ok(grid)
    }
}

pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Sample each cell of a `width` x `height` area independently.
pub fn random_grid<R: Rng>(config: &RandomGridConfig, rng: &mut R) -> life_core::Result<Grid> {
    config.validate()?;

    let mut grid = Grid::new();
    for y in 0..config.height {
        for x in 0..config.width {
            if rng.gen_bool(config.probability) {
                grid.insert(Cell::new(x.into(), y.into()));
            }
        }
    }
    Ok(grid)
}
