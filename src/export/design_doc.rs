//! Markdown design spec bundled with every export pack

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::pack::PackReference;

pub const DESIGN_DOC_NAME: &str = "DESIGN-SPEC.md";

/// Archive name of the k-th reference image (1-based)
pub fn image_name(position: usize) -> String {
    format!("ref-{}.jpg", position)
}

/// One reference as it ended up in the pack
pub struct DocEntry<'a> {
    pub position: usize,
    pub reference: &'a PackReference,
    pub has_image: bool,
}

pub struct DesignDoc<'a> {
    pub query_one_liner: &'a str,
    pub primary_id: Option<i64>,
    pub entries: Vec<DocEntry<'a>>,
    /// Implementation guide of the primary reference, if one was extracted
    pub primary_guide: Option<&'a str>,
    pub generated_at: DateTime<Utc>,
}

impl DesignDoc<'_> {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let building = if self.query_one_liner.trim().is_empty() {
            "UI design"
        } else {
            self.query_one_liner.trim()
        };

        let _ = writeln!(out, "# Design Spec\n");
        let _ = writeln!(out, "> **Building:** {}", building);
        let _ = writeln!(out, "> **References:** {}", self.entries.len());
        let _ = writeln!(out, "> **Generated:** {}\n", self.generated_at.to_rfc3339());

        if let Some(primary) = self.primary_entry() {
            let _ = writeln!(out, "## Primary Reference\n");
            let _ = writeln!(
                out,
                "Follow **{}** ({}) most closely. {}\n",
                primary.reference.block.display_title(),
                image_label(primary),
                primary.reference.relevance_note
            );
        }

        let _ = writeln!(out, "## References\n");
        for entry in &self.entries {
            let block = &entry.reference.block;
            let _ = writeln!(out, "### {}. {}\n", entry.position, block.display_title());
            let _ = writeln!(out, "- **Image:** {}", image_label(entry));
            if !entry.reference.relevance_note.is_empty() {
                let _ = writeln!(out, "- **Why it matches:** {}", entry.reference.relevance_note);
            }
            if !block.one_liner.is_empty() {
                let _ = writeln!(out, "- **What it is:** {}", block.one_liner);
            }
            if !block.arena_url.is_empty() {
                let _ = writeln!(out, "- **Source:** {}", block.arena_url);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "## How to Use\n");
        let _ = writeln!(
            out,
            "Attach the images in this pack alongside this document. Borrow layout, spacing and \
             visual treatment from the references; keep the content of what you are building."
        );

        if let Some(guide) = self.primary_guide {
            let _ = writeln!(out, "\n---\n\n## Primary Reference Implementation Guide\n");
            let _ = writeln!(out, "{}", guide.trim());
        }

        out
    }

    fn primary_entry(&self) -> Option<&DocEntry<'_>> {
        let id = self.primary_id?;
        self.entries.iter().find(|e| e.reference.block.id == id)
    }
}

fn image_label(entry: &DocEntry<'_>) -> String {
    if entry.has_image {
        format!("`{}`", image_name(entry.position))
    } else {
        "not included (download failed or no image)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pack::ReferenceBlock;

    fn reference(id: i64, title: Option<&str>, note: &str) -> PackReference {
        PackReference {
            block: ReferenceBlock {
                id,
                title: title.map(String::from),
                arena_url: format!("https://www.are.na/block/{}", id),
                image_url: None,
                one_liner: format!("Reference {}", id),
            },
            relevance_note: note.into(),
        }
    }

    #[test]
    fn test_render_lists_every_reference() {
        let a = reference(10, Some("Soft dashboard"), "Same soft cards");
        let b = reference(11, None, "");
        let doc = DesignDoc {
            query_one_liner: "Fitness tracking dashboard",
            primary_id: Some(10),
            entries: vec![
                DocEntry { position: 1, reference: &a, has_image: true },
                DocEntry { position: 2, reference: &b, has_image: false },
            ],
            primary_guide: None,
            generated_at: Utc::now(),
        };

        let md = doc.render();

        assert!(md.contains("> **Building:** Fitness tracking dashboard"));
        assert!(md.contains("## Primary Reference"));
        assert!(md.contains("Follow **Soft dashboard** (`ref-1.jpg`)"));
        assert!(md.contains("### 2. (untitled)"));
        assert!(md.contains("not included"));
        assert!(md.contains("- **Source:** https://www.are.na/block/11"));
        assert!(!md.contains("Implementation Guide"));
    }

    #[test]
    fn test_render_appends_primary_guide() {
        let a = reference(10, Some("Soft dashboard"), "x");
        let doc = DesignDoc {
            query_one_liner: "",
            primary_id: Some(10),
            entries: vec![DocEntry { position: 1, reference: &a, has_image: true }],
            primary_guide: Some("## Soft Data Dashboard\nUse 16px radius."),
            generated_at: Utc::now(),
        };

        let md = doc.render();

        assert!(md.contains("> **Building:** UI design"));
        assert!(md.contains("## Primary Reference Implementation Guide"));
        assert!(md.contains("Use 16px radius."));
    }

    #[test]
    fn test_unknown_primary_is_ignored() {
        let a = reference(10, None, "x");
        let doc = DesignDoc {
            query_one_liner: "x",
            primary_id: Some(99),
            entries: vec![DocEntry { position: 1, reference: &a, has_image: true }],
            primary_guide: None,
            generated_at: Utc::now(),
        };
        assert!(!doc.render().contains("## Primary Reference"));
    }
}
