use chrono::{DateTime, Local};
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const DEFAULT_TEMPLATE: &str = r#"Site updated: {{ now("%Y-%m-%d %H:%M:%S") }}"#;

// `{{ now("<strftime>") }}`, single or double quoted
static NOW_HELPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*now\(\s*(?:"([^"]*)"|'([^']*)')\s*\)\s*\}\}"#).expect("valid pattern")
});

/// Render the commit message template against a fixed point in time. The
/// only helper is `now`, which formats that time with the given strftime
/// pattern. A template without placeholders comes back untouched.
pub fn render(template: Option<&str>, now: DateTime<Local>) -> String {
    let template = template.unwrap_or(DEFAULT_TEMPLATE);

    NOW_HELPER
        .replace_all(template, |caps: &Captures| {
            let format = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            now.format(format).to_string()
        })
        .into_owned()
}
