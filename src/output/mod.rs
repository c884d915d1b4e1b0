//! Console status surface.
//!
//! Every user-facing line goes through a [`StatusReporter`]:
//! - [`status`] - The reporter trait, the colored console reporter and a recording reporter
//! - [`banner`] - Service headers and the usage block

mod banner;
mod status;

pub use banner::{center, service_title, USAGE_LINES};
pub use status::{ConsoleStatus, RecordingStatus, StatusKind, StatusReporter};
