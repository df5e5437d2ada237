use crate::ir::{SetDatum, VennChart};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%").unwrap());
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^venn(?:-beta)?\b(?:\s+title\s+(.*))?\s*$").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^title\s+(.+)$").unwrap());
static DATUM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|(?P<bare>[^:]+?))\s*:\s*(?P<value>\S+)$"#)
        .unwrap()
});

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub chart: VennChart,
    pub init_config: Option<serde_json::Value>,
}

/// Parses either a JSON/JSON5 option document or the line-based `venn`
/// definition.
pub fn parse_venn(input: &str) -> Result<ParseOutput> {
    if skip_json5_trivia(input).starts_with('{') {
        parse_option_document(input)
    } else {
        parse_venn_text(input)
    }
}

/// Skips leading whitespace and JSON5 `//` / `/* */` comments.
fn skip_json5_trivia(input: &str) -> &str {
    let mut rest = input.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |end| &after[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |end| &after[end + 2..]);
        } else {
            return rest;
        }
        rest = rest.trim_start();
    }
}

fn parse_option_document(input: &str) -> Result<ParseOutput> {
    let mut value = match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => value,
        Err(_) => json5::from_str::<serde_json::Value>(input)
            .context("venn option document is neither JSON nor JSON5")?,
    };
    let init_config = value
        .as_object_mut()
        .and_then(|object| object.remove("config"));
    let chart: VennChart =
        serde_json::from_value(value).context("invalid venn option document")?;
    Ok(ParseOutput { chart, init_config })
}

fn parse_venn_text(input: &str) -> Result<ParseOutput> {
    let (lines, init_config) = preprocess_input(input)?;
    let mut chart = VennChart::new();
    let mut seen_header = false;

    for (line_no, line) in lines.iter().enumerate() {
        if !seen_header {
            if let Some(caps) = HEADER_RE.captures(line) {
                seen_header = true;
                if let Some(title) = caps.get(1).map(|m| m.as_str().trim()) {
                    if !title.is_empty() {
                        chart.title = Some(strip_quotes(title));
                    }
                }
                continue;
            }
            return Err(anyhow::anyhow!(
                "expected `venn` header, found `{}`",
                line
            ));
        }
        if let Some(caps) = TITLE_RE.captures(line) {
            chart.title = Some(strip_quotes(&caps[1]));
            continue;
        }
        let datum = parse_datum_line(line)
            .with_context(|| format!("line {}: cannot parse `{}`", line_no + 1, line))?;
        chart.primary_series_mut().data.push(datum);
    }

    if !seen_header {
        return Err(anyhow::anyhow!("empty venn definition"));
    }
    Ok(ParseOutput { chart, init_config })
}

fn parse_datum_line(line: &str) -> Result<SetDatum> {
    let caps = DATUM_RE
        .captures(line)
        .ok_or_else(|| anyhow::anyhow!("expected `\"label\" : value`"))?;
    let name = caps
        .name("dq")
        .or_else(|| caps.name("sq"))
        .or_else(|| caps.name("bare"))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    let raw = &caps["value"];
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("invalid value `{raw}`"))?;
    Ok(SetDatum::new(name, value))
}

fn preprocess_input(input: &str) -> Result<(Vec<String>, Option<serde_json::Value>)> {
    let mut init_config: Option<serde_json::Value> = None;
    let mut lines = Vec::new();

    for raw_line in input.lines() {
        let trimmed_line = raw_line.trim();
        if trimmed_line.is_empty() {
            continue;
        }
        if let Some(json_str) = INIT_RE
            .captures(trimmed_line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        {
            let value = match serde_json::from_str::<serde_json::Value>(json_str) {
                Ok(value) => value,
                Err(_) => json5::from_str::<serde_json::Value>(json_str)
                    .context("invalid init directive")?,
            };
            init_config = Some(value);
            continue;
        }
        if trimmed_line.starts_with("%%") {
            continue;
        }
        let without_comment = strip_trailing_comment(trimmed_line);
        if without_comment.is_empty() {
            continue;
        }
        lines.push(without_comment);
    }

    Ok((lines, init_config))
}

fn strip_trailing_comment(line: &str) -> String {
    let mut quote: Option<char> = None;
    let mut chars = line.chars().peekable();
    let mut out = String::new();
    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            out.push(ch);
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            out.push(ch);
            continue;
        }
        if ch == '%'
            && let Some('%') = chars.peek().copied()
        {
            break;
        }
        out.push(ch);
    }
    out.trim().to_string()
}

fn strip_quotes(input: &str) -> String {
    let trimmed = input.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
    if quoted {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
