//! Export packs for handing references to an implementer

pub mod design_doc;
pub mod pack;

pub use pack::{build_pack, ExportPack, ExportRequest, PackReference, ReferenceBlock};
