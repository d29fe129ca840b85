//! Standard pipeline

use super::stages::{DepthTracking, Emitting, Rewriting, Scanning};
use super::Pipeline;
use crate::bython::config::{Direction, TranslationConfig};
use crate::bython::source::SourceBuffer;
use crate::bython::translate::Translation;
use std::sync::Arc;

/// Type alias for a complete translation pipeline
pub type TranslationPipeline = Pipeline<SourceBuffer, Translation>;

/// SourceBuffer → Translation
///
/// 1. Scanning
/// 2. Rewriting
/// 3. Depth tracking
/// 4. Emitting
pub fn translation_pipeline(
    config: Arc<TranslationConfig>,
    direction: Direction,
) -> TranslationPipeline {
    Pipeline::from_fn(Ok)
        .then(Scanning::new(config.clone(), direction))
        .then(Rewriting::new(config.clone(), direction))
        .then(DepthTracking::new(config.clone(), direction))
        .then(Emitting::new(config, direction))
}
