pub mod command_error;
pub mod error_classifier;
pub mod error_reporter;

pub use command_error::CommandError;
pub use error_classifier::{random_color, ErrorCategory};
pub use error_reporter::ErrorReporter;
