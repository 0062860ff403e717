//! Output formatter implementations

pub mod concise;
pub mod github;
pub mod grouped;
pub mod json;
pub mod json_lines;
pub mod pylint;
pub mod text;

pub use concise::ConciseFormatter;
pub use github::GitHubFormatter;
pub use grouped::GroupedFormatter;
pub use json::JsonFormatter;
pub use json_lines::JsonLinesFormatter;
pub use pylint::PylintFormatter;
pub use text::TextFormatter;
