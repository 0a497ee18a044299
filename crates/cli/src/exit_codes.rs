//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts that wrap `pricechart` rely on them.
//!
//! | Code | Meaning                                           |
//! |------|---------------------------------------------------|
//! | 0    | Success                                           |
//! | 1    | General error (unspecified)                       |
//! | 2    | Usage error (bad date, bad remark, unknown value) |
//! | 3    | Nothing plottable                                 |
//! | 4    | I/O error (unreadable input, unwritable output)   |
//! | 5    | Configuration error                               |

use pricechart_config::ConfigError;
use pricechart_pipeline::PipelineError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments the parser could not reject itself.
pub const EXIT_USAGE: u8 = 2;

/// Neither price input had plottable rows. The guidance prompt was printed.
pub const EXIT_NO_DATA: u8 = 3;

/// Cannot read an input or write an output file.
pub const EXIT_IO: u8 = 4;

/// global_config.json or labels.json is malformed, or a language is unknown.
pub const EXIT_CONFIG: u8 = 5;

/// Map a PipelineError to its exit code.
pub fn pipeline_exit_code(err: &PipelineError) -> u8 {
    match err {
        PipelineError::Io(_) | PipelineError::Csv(_) => EXIT_IO,
        PipelineError::MissingColumn { .. } => EXIT_IO,
        PipelineError::DateParse(_)
        | PipelineError::UnknownPreset(_)
        | PipelineError::UnknownStyle(_)
        | PipelineError::InvertedRange { .. }
        | PipelineError::InvalidRemark(_) => EXIT_USAGE,
    }
}

/// Map a ConfigError to its exit code.
pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Io(_) => EXIT_IO,
        ConfigError::Parse(_) | ConfigError::UnknownLanguage { .. } => EXIT_CONFIG,
    }
}
