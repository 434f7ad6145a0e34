//! # HoloBody Export
//!
//! Exchange-record serialization and the end-to-end generation entry point.
//!
//! ## Architecture
//!
//! ```text
//! GenerationConfig → compose → run_pipeline → ExchangeRecord → JSON file
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use holobody_export::{render_body, GenerationConfig};
//!
//! let config = GenerationConfig::default();
//! let record = render_body(&config)?;
//! record.write_json(&config.output)?;
//! # Ok::<(), holobody_export::ExportError>(())
//! ```

pub mod error;
pub mod exchange;
pub mod generation;

pub use error::{ExportError, ExportResult};
pub use exchange::ExchangeRecord;
pub use generation::{render_body, GenerationConfig, DEFAULT_OUTPUT_PATH};
