use crate::style::{
    ItemStyle, LabelLineStyle, LabelPosition, LabelStyle, LineLength, StateStyle,
};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with an intersection larger than the smaller set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InfeasiblePolicy {
    #[default]
    Reject,
    Clamp,
}

/// `Chart` returns layout errors to the caller, `Fallback` draws an error diagram instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VennRenderMode {
    #[default]
    Chart,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VennConfig {
    pub render_mode: VennRenderMode,
    pub width: f64,
    pub height: f64,
    /// Radius of the larger circle as a fraction of the canvas height.
    pub extent_ratio: f64,
    pub opacity: f64,
    pub emphasis_lift: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Smallest bracket width, relative to `r0 + r1`, before giving up.
    pub min_bracket_width: f64,
    pub infeasible: InfeasiblePolicy,
    pub calculable: bool,
    pub auto_line_gap: f64,
    pub z_level: i32,
    pub title_margin: f64,
    pub item_style: ItemStyle,
    pub error_message: String,
    pub error_text_size: f64,
    pub error_detail_size: f64,
}

impl Default for VennConfig {
    fn default() -> Self {
        Self {
            render_mode: VennRenderMode::Chart,
            width: 800.0,
            height: 600.0,
            extent_ratio: 1.0 / 3.0,
            opacity: 0.5,
            emphasis_lift: -0.2,
            tolerance: 0.001,
            max_iterations: 200,
            min_bracket_width: 1e-12,
            infeasible: InfeasiblePolicy::Reject,
            calculable: false,
            auto_line_gap: 10.0,
            z_level: 0,
            title_margin: 20.0,
            item_style: default_item_style(),
            error_message: "Cannot lay out venn diagram".to_string(),
            error_text_size: 24.0,
            error_detail_size: 13.0,
        }
    }
}

fn default_item_style() -> ItemStyle {
    ItemStyle {
        normal: Some(StateStyle {
            label: Some(LabelStyle {
                show: Some(true),
                position: Some(LabelPosition::Outer),
                ..LabelStyle::default()
            }),
            label_line: Some(LabelLineStyle {
                show: Some(true),
                length: Some(LineLength::Auto),
                line_style: None,
            }),
            ..StateStyle::default()
        }),
        emphasis: Some(StateStyle {
            label: Some(LabelStyle {
                show: Some(true),
                ..LabelStyle::default()
            }),
            label_line: Some(LabelLineStyle {
                show: Some(true),
                ..LabelLineStyle::default()
            }),
            ..StateStyle::default()
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub label_line_height: f64,
    pub max_label_width_chars: usize,
    pub fast_text_metrics: bool,
    pub venn: VennConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_line_height: 1.5,
            max_label_width_chars: 22,
            fast_text_metrics: false,
            venn: VennConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::mermaid_default(),
            layout: LayoutConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    primary_text_color: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
    title_text_size: Option<NumberOrString>,
    title_color: Option<String>,
    error_color: Option<String>,
    venn1: Option<String>,
    venn2: Option<String>,
    venn3: Option<String>,
    venn4: Option<String>,
    venn5: Option<String>,
    venn6: Option<String>,
    venn7: Option<String>,
    venn8: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VennConfigFile {
    render_mode: Option<VennRenderMode>,
    width: Option<f64>,
    height: Option<f64>,
    extent_ratio: Option<f64>,
    opacity: Option<f64>,
    emphasis_lift: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
    min_bracket_width: Option<f64>,
    infeasible: Option<InfeasiblePolicy>,
    calculable: Option<bool>,
    auto_line_gap: Option<f64>,
    z_level: Option<i32>,
    title_margin: Option<f64>,
    item_style: Option<ItemStyle>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    fast_text_metrics: Option<bool>,
    label_line_height: Option<f64>,
    venn: Option<VennConfigFile>,
}

impl ConfigFile {
    /// Parses strict JSON first and falls back to JSON5.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        match serde_json::from_str(contents) {
            Ok(parsed) => Ok(parsed),
            Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
                anyhow::anyhow!("invalid config: {json_err}; as JSON5: {json5_err}")
            }),
        }
    }

    pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed = ConfigFile::parse(&contents)?;
    Ok(apply_config_file(config, parsed))
}

pub fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "base" || theme_name == "default" || theme_name == "classic" {
            config.theme = Theme::mermaid_default();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.primary_text_color.or(vars.text_color) {
            config.theme.primary_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.title_text_size.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.title_text_size = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.error_color {
            config.theme.error_color = v;
        }
        let palette = [
            vars.venn1, vars.venn2, vars.venn3, vars.venn4, vars.venn5, vars.venn6, vars.venn7,
            vars.venn8,
        ];
        for (idx, color) in palette.into_iter().enumerate() {
            let Some(color) = color else {
                continue;
            };
            if idx < config.theme.venn_colors.len() {
                config.theme.venn_colors[idx] = color;
            } else {
                config.theme.venn_colors.push(color);
            }
        }
    }

    if let Some(v) = parsed.fast_text_metrics {
        config.layout.fast_text_metrics = v;
    }
    if let Some(v) = parsed.label_line_height {
        config.layout.label_line_height = v;
    }

    if let Some(venn) = parsed.venn {
        let cfg = &mut config.layout.venn;
        if let Some(v) = venn.render_mode {
            cfg.render_mode = v;
        }
        if let Some(v) = venn.width {
            cfg.width = v;
        }
        if let Some(v) = venn.height {
            cfg.height = v;
        }
        if let Some(v) = venn.extent_ratio {
            cfg.extent_ratio = v;
        }
        if let Some(v) = venn.opacity {
            cfg.opacity = v;
        }
        if let Some(v) = venn.emphasis_lift {
            cfg.emphasis_lift = v;
        }
        if let Some(v) = venn.tolerance {
            cfg.tolerance = v;
        }
        if let Some(v) = venn.max_iterations {
            cfg.max_iterations = v;
        }
        if let Some(v) = venn.min_bracket_width {
            cfg.min_bracket_width = v;
        }
        if let Some(v) = venn.infeasible {
            cfg.infeasible = v;
        }
        if let Some(v) = venn.calculable {
            cfg.calculable = v;
        }
        if let Some(v) = venn.auto_line_gap {
            cfg.auto_line_gap = v;
        }
        if let Some(v) = venn.z_level {
            cfg.z_level = v;
        }
        if let Some(v) = venn.title_margin {
            cfg.title_margin = v;
        }
        if let Some(v) = venn.item_style {
            cfg.item_style = v;
        }
        if let Some(v) = venn.error_message {
            cfg.error_message = v;
        }
    }

    config
}
