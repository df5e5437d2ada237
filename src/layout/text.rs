use crate::config::LayoutConfig;
use crate::text_metrics;

use super::TextBlock;

pub(super) fn measure_label_with_font_size(
    text: &str,
    font_size: f64,
    config: &LayoutConfig,
    wrap: bool,
    font_family: &str,
) -> TextBlock {
    let fast_metrics = config.fast_text_metrics;
    let max_width_px = max_label_width_px(
        config.max_label_width_chars,
        font_size,
        font_family,
        fast_metrics,
    );
    let mut lines = Vec::new();
    for line in split_lines(text) {
        if wrap {
            lines.extend(wrap_line(&line, max_width_px, font_size, font_family, fast_metrics));
        } else {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let width = lines
        .iter()
        .map(|line| text_width(line, font_size, font_family, fast_metrics))
        .fold(0.0, f64::max);
    let height = lines.len() as f64 * font_size * config.label_line_height;

    TextBlock {
        lines,
        width,
        height,
    }
}

pub(super) fn char_width_factor(ch: char) -> f64 {
    // Approximate advances, as a fraction of the font size, for a
    // sans-serif face.
    match ch {
        ' ' => 0.306,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'i' | 'j' | 'l' | 'I' => 0.25,
        'f' | 't' | 'r' => 0.34,
        'm' | 'w' => 0.84,
        'M' | 'W' => 0.93,
        'A'..='Z' => 0.67,
        'a'..='z' => 0.56,
        '0'..='9' => 0.6,
        '@' | '#' | '%' | '&' => 0.946,
        c if c.is_ascii() => 0.568,
        // CJK and other wide glyphs
        _ => 1.0,
    }
}

pub(super) fn split_lines(text: &str) -> Vec<String> {
    text.replace("<br/>", "\n")
        .replace("<br>", "\n")
        .replace("\\n", "\n")
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

pub(super) fn wrap_line(
    line: &str,
    max_width: f64,
    font_size: f64,
    font_family: &str,
    fast_metrics: bool,
) -> Vec<String> {
    if text_width(line, font_size, font_family, fast_metrics) <= max_width {
        return vec![line.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width(&candidate, font_size, font_family, fast_metrics) > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(super) fn text_width(text: &str, font_size: f64, font_family: &str, fast_metrics: bool) -> f64 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

fn fallback_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().map(char_width_factor).sum::<f64>() * font_size
}

fn max_label_width_px(max_chars: usize, font_size: f64, font_family: &str, fast_metrics: bool) -> f64 {
    let avg_char = if fast_metrics {
        font_size * 0.56
    } else {
        text_metrics::average_char_width(font_family, font_size).unwrap_or(font_size * 0.56)
    };
    max_chars.max(1) as f64 * avg_char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn split_lines_handles_br_tags() {
        assert_eq!(split_lines("a<br/>b"), vec!["a", "b"]);
        assert_eq!(split_lines("a<br>b"), vec!["a", "b"]);
        assert_eq!(split_lines("a\\nb"), vec!["a", "b"]);
    }

    #[test]
    fn fallback_text_width_scales_with_font_size() {
        let w16 = fallback_text_width("Hello", 16.0);
        let w32 = fallback_text_width("Hello", 32.0);
        assert!((w32 - w16 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_line_splits_long_text() {
        let result = wrap_line(
            "this is a rather long line that should be wrapped",
            100.0,
            16.0,
            "sans-serif",
            true,
        );
        assert!(result.len() > 1, "expected wrapping, got {:?}", result);
        assert_eq!(wrap_line("short", 1000.0, 16.0, "sans-serif", true).len(), 1);
    }

    #[test]
    fn measured_block_counts_lines() {
        let block = measure_label_with_font_size("one<br>two", 10.0, &fast_config(), false, "sans-serif");
        assert_eq!(block.lines, vec!["one", "two"]);
        assert!((block.height - 2.0 * 10.0 * 1.5).abs() < 1e-9);
        assert!(block.width > 0.0);
    }

    #[test]
    fn empty_label_keeps_one_line() {
        let block = measure_label_with_font_size("", 12.0, &fast_config(), true, "sans-serif");
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.width, 0.0);
    }
}
