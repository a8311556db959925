use std::sync::LazyLock;

use regex::{Captures, Regex};

// Group 1: the scoped key (`env.NAME`), group 2: optional default("...") value
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).unwrap()
});

/// Expand `{{ env.VAR }}` placeholders in raw config text
///
/// `{{ env.VAR | default("x") }}` falls back to `x` when `VAR` is unset.
/// Comment lines are copied unchanged, so a commented-out credential never
/// requires its variable.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    let mut output = input
        .lines()
        .map(expand_line)
        .collect::<anyhow::Result<Vec<_>>>()?
        .join("\n");

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> anyhow::Result<String> {
    if line.trim_start().starts_with('#') {
        return Ok(line.to_owned());
    }

    let mut expanded = String::with_capacity(line.len());
    let mut last_end = 0;

    for captures in PLACEHOLDER_RE.captures_iter(line) {
        let Some(placeholder) = captures.get(0) else {
            continue;
        };
        expanded.push_str(&line[last_end..placeholder.start()]);
        expanded.push_str(&resolve(&captures)?);
        last_end = placeholder.end();
    }

    expanded.push_str(&line[last_end..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> anyhow::Result<String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let default = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        anyhow::bail!("only variables scoped with 'env.' are supported: `{key}`");
    };

    match (std::env::var(var_name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable not found: `{var_name}`"),
    }
}
