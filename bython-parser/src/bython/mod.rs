//! Main module for bython translation functionality

pub mod config;
pub mod depth;
pub mod emitting;
pub mod error;
pub mod pipeline;
pub mod rewriting;
pub mod scanning;
pub mod source;
pub mod token;
pub mod translate;
