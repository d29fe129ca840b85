//! Translation pipeline
//!
//!     A translation is a chain of stages, each consuming the previous stage's output:
//!
//!         SourceBuffer → Scanned → Rewritten → Tracked → Translation
//!
//!     Stages implement [`Runnable`]. A [`Pipeline`] composes them with [`Pipeline::then`], and
//!     the compiler checks that each stage's input type matches the output of the stage before
//!     it. Both directions use the same chain; the stages pick their direction-specific
//!     component (tracker, emitter) from the direction they were built with.
//!
//! Usage
//!
//!     ```rust,ignore
//!     let pipeline = Pipeline::from_fn(Ok)
//!         .then(Scanning::new(config.clone(), Direction::Forward))
//!         .then(Rewriting::new(config.clone(), Direction::Forward));
//!     let rewritten = pipeline.run(SourceBuffer::new(source))?;
//!     ```
//!
//!     [`standard::translation_pipeline`] builds the full chain.
//!
//! Module Organization
//!
//!     - [`stages`]: The four stages and the data passed between them
//!     - [`standard`]: The complete pipeline

pub mod stages;
pub mod standard;

use crate::bython::error::TranslationError;

/// Anything that can turn an input into an output.
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TranslationError>;
}

/// A composable chain of stages from `I` to `O`.
pub struct Pipeline<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TranslationError> + Send + Sync>,
}

impl<I, O> Pipeline<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TranslationError> + Send + Sync + 'static,
    {
        Pipeline {
            run_fn: Box::new(f),
        }
    }

    /// Feed this pipeline's output into `stage`.
    pub fn then<O2, S>(self, stage: S) -> Pipeline<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Pipeline {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, TranslationError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Pipeline<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TranslationError> {
        Pipeline::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;
    impl Runnable<i32, i32> for Double {
        fn run(&self, input: i32) -> Result<i32, TranslationError> {
            Ok(input * 2)
        }
    }

    struct Describe;
    impl Runnable<i32, String> for Describe {
        fn run(&self, input: i32) -> Result<String, TranslationError> {
            Ok(format!("value {input}"))
        }
    }

    struct Reject;
    impl Runnable<i32, i32> for Reject {
        fn run(&self, _input: i32) -> Result<i32, TranslationError> {
            Err(TranslationError::InvalidConfig("rejected".to_string()))
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let pipeline = Pipeline::from_fn(|x: i32| Ok(x + 1))
            .then(Double)
            .then(Describe);
        assert_eq!(pipeline.run(4).unwrap(), "value 10");
    }

    #[test]
    fn test_error_stops_the_chain() {
        let pipeline = Pipeline::from_fn(Ok).then(Reject).then(Describe);
        assert_eq!(
            pipeline.run(1).unwrap_err(),
            TranslationError::InvalidConfig("rejected".to_string())
        );
    }

    #[test]
    fn test_pipeline_is_a_stage() {
        let inner = Pipeline::from_fn(Ok).then(Double);
        let outer = Pipeline::from_fn(Ok).then(inner).then(Double);
        assert_eq!(outer.run(3).unwrap(), 12);
    }
}
