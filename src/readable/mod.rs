//! Human-readable rendering of records

pub mod exporter;
pub mod renderer;

use serde::Serialize;

pub use exporter::KifuExporter;
pub use renderer::move_to_readable_kifu;

/// One ply of the selected line as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadableEntry {
    pub kifu: String,
    /// Alternatives recorded at this ply
    pub forks: Vec<String>,
    pub comments: Vec<String>,
}
