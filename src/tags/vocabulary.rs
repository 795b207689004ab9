//! The four tag categories and their closed vocabularies

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// What UI elements are shown
    Component,
    /// Visual treatment
    Style,
    /// Where it would be used
    Context,
    /// Emotional quality
    Vibe,
}

impl Category {
    /// Fixed iteration order, used for scoring and for flattening matched tags
    pub const ALL: [Category; 4] = [
        Category::Component,
        Category::Style,
        Category::Context,
        Category::Vibe,
    ];

    /// Scoring weight. Component and context decide reusability the most.
    pub fn weight(self) -> f64 {
        match self {
            Category::Component => 3.0,
            Category::Context => 2.0,
            Category::Style => 1.5,
            Category::Vibe => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Component => "component",
            Category::Style => "style",
            Category::Context => "context",
            Category::Vibe => "vibe",
        }
    }

    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Category::Component => COMPONENT_TAGS,
            Category::Style => STYLE_TAGS,
            Category::Context => CONTEXT_TAGS,
            Category::Vibe => VIBE_TAGS,
        }
    }

    pub fn is_known(self, tag: &str) -> bool {
        self.vocabulary().contains(&tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const COMPONENT_TAGS: &[&str] = &[
    "hero", "navbar", "footer", "sidebar", "cards", "dashboard", "metrics", "charts", "form",
    "modal", "toast", "button", "cta", "pricing", "testimonials", "feature-grid", "bento",
    "gallery", "profile", "settings", "onboarding", "empty-state", "error-state", "loading",
    "search", "filters", "table", "list", "timeline", "calendar", "map",
];

pub const STYLE_TAGS: &[&str] = &[
    "dark-mode", "light-mode", "glassmorphism", "neumorphism", "brutalist", "minimal",
    "maximal", "rounded", "sharp", "gradient", "flat", "3d", "illustrated", "photographic",
    "geometric", "organic", "high-contrast", "muted", "neon", "pastel", "monochrome", "duotone",
];

pub const CONTEXT_TAGS: &[&str] = &[
    "landing-page", "saas", "mobile-app", "desktop-app", "marketing", "e-commerce", "fintech",
    "health", "productivity", "social", "media", "developer-tools", "b2b", "b2c", "enterprise",
    "startup", "portfolio", "blog", "docs",
];

pub const VIBE_TAGS: &[&str] = &[
    "playful", "serious", "premium", "budget", "trustworthy", "edgy", "calm", "energetic",
    "friendly", "professional", "futuristic", "retro", "warm", "cold", "confident", "humble",
    "bold", "subtle",
];

/// Instruction sent with every screenshot when extracting tags.
/// The option lists come straight from the vocabularies above.
pub fn tag_prompt() -> String {
    let mut prompt = String::from(
        "You are a design librarian. Analyze this UI/UX screenshot and output tags.\n\n## Tag Categories\n",
    );
    for category in Category::ALL {
        prompt.push_str(&format!(
            "\n### {}\nOptions: {}\n",
            category,
            category.vocabulary().join(", ")
        ));
    }
    prompt.push_str(
        "\n## Rules\n\
         - Output 2-5 tags per category (only what clearly applies)\n\
         - Skip categories if uncertain\n\
         - Output valid JSON only\n\n\
         ## Output Format\n\
         {\"component\": [\"...\"], \"style\": [\"...\"], \"context\": [\"...\"], \"vibe\": [\"...\"], \
         \"one_liner\": \"One sentence describing what this is\"}",
    );
    prompt
}
