//! `pricechart-pipeline` — series reconciliation pipeline.
//!
//! Pure engine crate: receives input sources and widget selections, returns
//! plot-ready traces, a remarks summary, and display messages.
//! No CLI dependencies.

pub mod assemble;
pub mod columns;
pub mod dates;
pub mod engine;
pub mod error;
pub mod figure;
pub mod model;
pub mod remarks;
pub mod series;
pub mod store;
pub mod table;
pub mod window;

pub use columns::{normalize_header, Canonical, ColumnAliasMap, ColumnMatch};
pub use engine::run;
pub use error::PipelineError;
pub use model::{ChartOutput, ChartRequest, ChartStyle, Message, Severity, Trace};
pub use store::RemarksStore;
pub use table::{InputSource, RawTable};
pub use window::{DateWindow, Preset};
