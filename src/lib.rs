//! # flatten-xml Library
//!
//! A library for converting collections of XML-encoded records into a
//! tab-separated flat table. Records are located inside each document by a
//! prioritized list of namespace-qualified candidate paths, flattened one
//! child level deep into named columns, and accumulated under a dynamic
//! append-only column schema that grows in first-discovery order.

pub mod cli;
pub mod config;
pub mod emit;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod input;
pub mod locator;
pub mod output;
pub mod schema;

pub use cli::{Cli, VerbosityLevel};
pub use config::{Config, ConfigManager, EnvProvider, SystemEnvProvider};
pub use emit::{render_table, write_table};
pub use engine::{DocumentOutcome, DocumentStatus, ExtractionEngine, ExtractionResults};
pub use error::{ConfigError, FlattenError, PathError};
pub use flatten::flatten;
pub use input::{DocumentReader, InputStructure};
pub use locator::{PathSegment, RecordPath, locate};
pub use output::Output;
pub use schema::{ColumnSchema, ROWNUM_COLUMN, Row, RunCounters};
