use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"\{\{\s*env\.([A-Za-z_][A-Za-z0-9_]*)\s*",
            r#"(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#,
        ))
        .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML using the process environment
///
/// Comment lines are left as written.
pub fn expand_env(input: &str) -> Result<String, String> {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand placeholders using an arbitrary variable lookup
fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, String> {
    let mut missing = None;

    let lines: Vec<String> = input
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_owned();
            }

            placeholder()
                .replace_all(line, |caps: &Captures<'_>| {
                    let name = &caps[1];
                    lookup(name)
                        .or_else(|| caps.get(2).map(|m| m.as_str().to_owned()))
                        .unwrap_or_else(|| {
                            missing.get_or_insert_with(|| name.to_owned());
                            String::new()
                        })
                })
                .into_owned()
        })
        .collect();

    match missing {
        Some(name) => Err(format!("environment variable not found: `{name}`")),
        None => Ok(lines.join("\n")),
    }
}
