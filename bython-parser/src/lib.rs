//! # bython-parser
//!
//! Translation engine between Bython, a brace-delimited dialect of Python, and Python itself.
//!
//! File Layout
//!
//!     Both directions share one staged pipeline. Each stage lives in its own module under
//!     `src/bython` and the pipeline glue composes them:
//!
//!     src/bython
//!       ├── scanning     Literal-aware scanner (ScanState machine, pieces per line)
//!       ├── token        logos tokens for code runs
//!       ├── rewriting    Comments, declarations, operators and imports
//!       ├── depth        Depth trackers (braces forward, indentation reverse)
//!       ├── emitting     Line emitters for both target dialects
//!       ├── pipeline     Stage trait, Pipeline composition and the concrete stages
//!       └── translate    The two entry points
//!
//! The engine performs no I/O. Callers read a whole buffer, call [`translate_forward`] or
//! [`translate_reverse`] with a [`TranslationConfig`], and get back a [`Translation`] or a
//! [`TranslationError`].

pub mod bython;

pub use bython::config::TranslationConfig;
pub use bython::error::{StructuralError, StructuralErrorKind, TranslationError, Warning};
pub use bython::translate::{translate_forward, translate_reverse, Translation};
