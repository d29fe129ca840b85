//! Entry points
//!
//!     Both functions validate the configuration, build the standard pipeline for their
//!     direction and run it over the whole buffer. A call holds no state beyond its own
//!     pipeline, so independent calls may run on different threads at once.

use crate::bython::config::{Direction, TranslationConfig};
use crate::bython::error::{TranslationError, Warning};
use crate::bython::pipeline::standard::translation_pipeline;
use crate::bython::rewriting::imports::Dependency;
use crate::bython::source::SourceBuffer;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A successful translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub output: String,
    /// Non-fatal findings, ordered by source line
    pub warnings: Vec<Warning>,
    /// Imports that resolved to files in the module index
    pub dependencies: Vec<Dependency>,
}

/// Bython → Python
pub fn translate_forward(
    source: &str,
    config: &TranslationConfig,
) -> Result<Translation, TranslationError> {
    translate(source, config, Direction::Forward)
}

/// Python → Bython
pub fn translate_reverse(
    source: &str,
    config: &TranslationConfig,
) -> Result<Translation, TranslationError> {
    translate(source, config, Direction::Reverse)
}

pub fn translate(
    source: &str,
    config: &TranslationConfig,
    direction: Direction,
) -> Result<Translation, TranslationError> {
    config.validate()?;
    debug!(direction = direction.name(), bytes = source.len(), "translating");
    let pipeline = translation_pipeline(Arc::new(config.clone()), direction);
    pipeline.run(SourceBuffer::new(source))
}
