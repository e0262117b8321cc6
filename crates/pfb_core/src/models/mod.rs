//! Data models for the posture feedback pipeline.
//!
//! All types here are plain data: immutable once produced, serializable
//! where they cross a process boundary (wire, config, report).

mod enums;
mod frame;
mod report;
mod results;

pub use enums::{PostureMode, ResultStatus};
pub use frame::{Frame, SourceContext};
pub use report::{FeedbackReport, ReportError, REPORT_FILE_NAME};
pub use results::{display_confidence, InferenceResult, Landmark};
