//! Pipeline entry points for collector operations.
//!
//! - `run_collect`: fan out the active source adapter and merge the batch
//! - `validate`: score a batch and aggregate statistics
//! - `run_digest`: render and write the dated report

pub mod collect;
pub mod digest;
pub mod validate;

pub use collect::{CollectOutcome, run_collect};
pub use digest::{DigestInput, FallbackReport, ReportGenerator, run_digest};
pub use validate::{ValidationResult, ValidationSummary, Validator};
