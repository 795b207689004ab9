//! Selector scoping for previewing extracted component CSS in isolation

/// Prefix every selector in `css` with `#scope_id` so the rules only apply
/// inside the preview container.
///
/// This is a textual rewrite, not a CSS parser: rules are split on `}`.
/// `@` rules and selectors already under the scope are left alone, and
/// `:root`, `html` and `body` become the container itself.
pub fn scope_css(css: &str, scope_id: &str) -> String {
    let scope = format!("#{}", scope_id);

    css.split('}')
        .map(|rule| {
            let trimmed = rule.trim();
            if trimmed.is_empty() {
                return String::new();
            }
            let Some(brace) = trimmed.find('{') else {
                return trimmed.to_string();
            };

            let (selector, body) = trimmed.split_at(brace);
            let scoped = selector
                .trim()
                .split(',')
                .map(|sel| scope_selector(sel.trim(), &scope))
                .collect::<Vec<_>>()
                .join(", ");

            format!("{} {}", scoped, body)
        })
        .collect::<Vec<_>>()
        .join("}\n")
}

fn scope_selector(selector: &str, scope: &str) -> String {
    if selector.starts_with('@') || selector.starts_with(scope) {
        return selector.to_string();
    }
    match selector {
        ":root" | "html" | "body" => scope.to_string(),
        _ => format!("{} {}", scope, selector),
    }
}

/// Reset applied to the preview container before the component's own CSS
pub fn reset_css(scope_id: &str) -> String {
    format!(
        "#{id} {{\n  all: initial;\n  display: block;\n  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;\n  font-size: 16px;\n  line-height: 1.5;\n  color: #1a1a1a;\n  box-sizing: border-box;\n}}\n#{id} *, #{id} *::before, #{id} *::after {{\n  box-sizing: border-box;\n}}\n",
        id = scope_id
    )
}
