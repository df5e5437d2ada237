//! Item styles and their layered resolution.
//!
//! Every field of an [`ItemStyle`] is optional. A [`StyleChain`] stacks the
//! styles defined at each [`StyleLevel`]; the first level that defines a field
//! wins.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleLevel {
    Data,
    Series,
    Chart,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleState {
    Normal,
    Emphasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Inner,
    Inside,
    Left,
    Right,
    #[default]
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Leader line length: a fixed pixel length, or `"auto"` for a small gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(try_from = "NumberOrKeyword", into = "NumberOrKeyword")]
pub enum LineLength {
    #[default]
    Auto,
    Fixed(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum NumberOrKeyword {
    Number(f64),
    Keyword(String),
}

impl TryFrom<NumberOrKeyword> for LineLength {
    type Error = String;

    fn try_from(value: NumberOrKeyword) -> Result<Self, Self::Error> {
        match value {
            NumberOrKeyword::Number(len) => Ok(LineLength::Fixed(len)),
            NumberOrKeyword::Keyword(word) if word.trim().eq_ignore_ascii_case("auto") => {
                Ok(LineLength::Auto)
            }
            NumberOrKeyword::Keyword(word) => word
                .trim()
                .parse::<f64>()
                .map(LineLength::Fixed)
                .map_err(|_| format!("invalid label line length: {word}")),
        }
    }
}

impl From<LineLength> for NumberOrKeyword {
    fn from(value: LineLength) -> Self {
        match value {
            LineLength::Auto => NumberOrKeyword::Keyword("auto".to_string()),
            LineLength::Fixed(len) => NumberOrKeyword::Number(len),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LabelPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_style: Option<TextStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub line_type: Option<LineType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LineLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_line: Option<LabelLineStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<StateStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<StateStyle>,
}

impl ItemStyle {
    pub fn state(&self, state: StyleState) -> Option<&StateStyle> {
        match state {
            StyleState::Normal => self.normal.as_ref(),
            StyleState::Emphasis => self.emphasis.as_ref(),
        }
    }
}

/// Styles ordered from most to least specific.
#[derive(Debug, Clone, Default)]
pub struct StyleChain<'a> {
    layers: Vec<(StyleLevel, &'a ItemStyle)>,
}

impl<'a> StyleChain<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Adds a layer. Layers are kept sorted by level, so push order does not matter.
    pub fn with(mut self, level: StyleLevel, style: Option<&'a ItemStyle>) -> Self {
        if let Some(style) = style {
            self.layers.push((level, style));
            self.layers.sort_by_key(|(level, _)| *level);
        }
        self
    }

    /// First value defined for `state` across the layers.
    pub fn resolve<T>(&self, state: StyleState, query: impl Fn(&StateStyle) -> Option<T>) -> Option<T> {
        self.resolve_with_level(state, query).map(|(_, value)| value)
    }

    pub fn resolve_with_level<T>(
        &self,
        state: StyleState,
        query: impl Fn(&StateStyle) -> Option<T>,
    ) -> Option<(StyleLevel, T)> {
        self.layers.iter().find_map(|(level, style)| {
            style
                .state(state)
                .and_then(|state_style| query(state_style))
                .map(|value| (*level, value))
        })
    }

    /// Emphasis value when any layer defines one, else the normal value.
    pub fn resolve_emphasis<T>(&self, query: impl Fn(&StateStyle) -> Option<T>) -> Option<T> {
        self.resolve(StyleState::Emphasis, &query)
            .or_else(|| self.resolve(StyleState::Normal, &query))
    }

    pub fn resolve_for<T>(
        &self,
        state: StyleState,
        query: impl Fn(&StateStyle) -> Option<T>,
    ) -> Option<T> {
        match state {
            StyleState::Normal => self.resolve(StyleState::Normal, query),
            StyleState::Emphasis => self.resolve_emphasis(query),
        }
    }
}

/// First defined flag in data → series → chart order, else `default`.
pub fn resolve_flag(
    data: Option<bool>,
    series: Option<bool>,
    chart: Option<bool>,
    default: bool,
) -> bool {
    [
        (StyleLevel::Data, data),
        (StyleLevel::Series, series),
        (StyleLevel::Chart, chart),
    ]
    .into_iter()
    .find_map(|(_, flag)| flag)
    .unwrap_or(default)
}
