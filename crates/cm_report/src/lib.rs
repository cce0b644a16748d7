//! cm_report/src/lib.rs — offline dashboard report model + renderers (JSON/text).
//!
//! Determinism rules:
//! - No I/O here. Callers pass an already-built `Dashboard`; writing files is
//!   the CLI's job (through `cm_io`'s canonical writer).
//! - No recomputation: every figure comes from the pipeline and is only
//!   formatted here.
//! - Stable section order and field names.

#![deny(unsafe_code)]

pub mod format;
pub mod model;
#[cfg(feature = "render_json")]
pub mod render_json;
#[cfg(feature = "render_text")]
pub mod render_text;

pub use model::{build_report_model, ReportModel};
#[cfg(feature = "render_json")]
pub use render_json::{render_report_json, render_report_json_pretty};
#[cfg(feature = "render_text")]
pub use render_text::render_report_text;
