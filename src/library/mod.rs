//! Component library and implementation guides built from indexed blocks
//!
//! - `component`, `store`: screenshot-to-code components on disk
//! - `guide`: Markdown implementation guides per channel
//! - `prompt`: prompt file loading
//! - `extract`: the batch passes that produce both

pub mod component;
pub mod extract;
pub mod guide;
pub mod prompt;
pub mod store;

pub use component::{parse_extraction, ComponentIndex, ExtractedComponent, LibraryStats, SourceInfo};
pub use extract::{ComponentExtractor, ExtractOptions, GuideExtractor, RunStats};
pub use guide::{GuideStore, PromptType};
pub use store::ComponentStore;
