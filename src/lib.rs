//! refmatch: tag-based design reference matching
//!
//! A curated channel of UI screenshots is tagged once by a multimodal model
//! (`tags`). A new screenshot is tagged the same way, scored against every
//! indexed block by weighted tag overlap, and the best matches are explained
//! (`matching`). Matches can be packed into a ZIP for an implementer
//! (`export`). The same index feeds a component library and implementation
//! guides (`library`, `preview`).

pub mod core;
pub mod export;
pub mod library;
pub mod llm;
pub mod matching;
pub mod preview;
#[cfg(feature = "server")]
pub mod server;
pub mod tags;

pub use crate::core::error::{Error, Result};
