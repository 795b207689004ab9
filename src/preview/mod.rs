//! Isolated HTML previews of extracted components

pub mod css;
pub mod page;

pub use css::scope_css;
pub use page::render_page;
