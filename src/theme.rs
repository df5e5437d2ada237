use serde::{Deserialize, Serialize};

const CLASSIC_PALETTE: [&str; 8] = [
    "#ff7f50", "#87cefa", "#da70d6", "#32cd32", "#6495ed", "#ff69b4", "#ba55d3", "#cd5c5c",
];

const MODERN_PALETTE: [&str; 8] = [
    "#5B8FF9", "#F6BD16", "#5AD8A6", "#E8684A", "#6DC8EC", "#9270CA", "#FF9D4D", "#269A99",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f64,
    pub primary_text_color: String,
    pub line_color: String,
    pub background: String,
    pub title_text_size: f64,
    pub title_color: String,
    pub error_color: String,
    pub venn_colors: Vec<String>,
}

impl Theme {
    pub fn mermaid_default() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 16.0,
            primary_text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
            title_text_size: 25.0,
            title_color: "#333333".to_string(),
            error_color: "#552222".to_string(),
            venn_colors: CLASSIC_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            primary_text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
            title_text_size: 18.0,
            title_color: "#1C2430".to_string(),
            error_color: "#B42318".to_string(),
            venn_colors: MODERN_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Palette color for a series index, cycling when the palette is short.
    pub fn color_at(&self, index: usize) -> String {
        if self.venn_colors.is_empty() {
            return self.line_color.clone();
        }
        self.venn_colors[index % self.venn_colors.len()].clone()
    }
}

/// Moves a color toward black (`level > 0`) or toward white (`level < 0`).
///
/// `level` is clamped to `[-1, 1]`; returns `None` for unparseable input.
pub fn lift_color(color: &str, level: f64) -> Option<String> {
    let parsed = csscolorparser::parse(color).ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    let amount = level.abs().min(1.0);
    let lift = |channel: u8| -> u8 {
        let c = channel as f64;
        let value = if level > 0.0 {
            c * (1.0 - amount)
        } else {
            (255.0 - c) * amount + c
        };
        value.floor().clamp(0.0, 255.0) as u8
    };
    Some(format_rgb(lift(r), lift(g), lift(b), a))
}

/// Inverts each RGB channel, keeping alpha.
pub fn reverse_color(color: &str) -> Option<String> {
    let parsed = csscolorparser::parse(color).ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    Some(format_rgb(255 - r, 255 - g, 255 - b, a))
}

fn format_rgb(r: u8, g: u8, b: u8, a: u8) -> String {
    if a == 255 {
        format!("rgb({r},{g},{b})")
    } else {
        let alpha = (a as f64 / 255.0 * 1000.0).round() / 1000.0;
        format!("rgba({r},{g},{b},{alpha})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_lift_moves_toward_white() {
        assert_eq!(lift_color("#000000", -0.2).as_deref(), Some("rgb(51,51,51)"));
        assert_eq!(lift_color("#ffffff", -0.5).as_deref(), Some("rgb(255,255,255)"));
    }

    #[test]
    fn positive_lift_moves_toward_black() {
        assert_eq!(lift_color("#ffffff", 0.5).as_deref(), Some("rgb(127,127,127)"));
        assert_eq!(lift_color("rgb(100, 200, 50)", 2.0).as_deref(), Some("rgb(0,0,0)"));
    }

    #[test]
    fn reverse_inverts_channels_and_keeps_alpha() {
        assert_eq!(reverse_color("#ff7f50").as_deref(), Some("rgb(0,128,175)"));
        assert_eq!(
            reverse_color("rgba(255, 255, 255, 0.5)").as_deref(),
            Some("rgba(0,0,0,0.502)")
        );
    }

    #[test]
    fn invalid_colors_are_rejected() {
        assert!(lift_color("not-a-color", -0.2).is_none());
        assert!(reverse_color("").is_none());
    }

    #[test]
    fn palette_cycles() {
        let theme = Theme::modern();
        let len = theme.venn_colors.len();
        assert_eq!(theme.color_at(0), theme.color_at(len));
    }
}
