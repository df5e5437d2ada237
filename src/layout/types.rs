use serde::Serialize;

use crate::style::{LineType, TextAlign};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f64,
    pub height: f64,
}

/// Center and radius of one set's circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CircleParams {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesParams {
    pub location: CircleParams,
}

/// Per-set circle locations, A at index 0 and B at index 1.
pub type ParamsMap = Vec<SeriesParams>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    pub opacity: f64,
    pub stroke_color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub color: String,
    pub stroke_color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleShape {
    pub index: usize,
    pub name: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub z_level: i32,
    pub style: ShapeStyle,
    pub highlight: HighlightStyle,
    pub clickable: bool,
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelVariant {
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub align: TextAlign,
    pub baseline: String,
    pub font_size: f64,
    pub font_family: String,
    pub text: TextBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub index: usize,
    pub z_level: i32,
    pub visible: bool,
    pub hover_visible: bool,
    pub normal: LabelVariant,
    pub emphasis: LabelVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineVariant {
    pub x_start: f64,
    pub y_start: f64,
    pub x_end: f64,
    pub y_end: f64,
    pub color: String,
    pub line_type: LineType,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLineLayout {
    pub index: usize,
    pub z_level: i32,
    pub visible: bool,
    pub hover_visible: bool,
    pub normal: LineVariant,
    pub emphasis: LineVariant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverSummary {
    pub values: [f64; 3],
    pub radii: (f64, f64),
    pub distance: f64,
    pub iterations: usize,
    pub ratio: f64,
    pub target_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleLayout {
    pub x: f64,
    pub y: f64,
    pub text: TextBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VennLayout {
    pub params: ParamsMap,
    pub circles: Vec<CircleShape>,
    pub labels: Vec<LabelLayout>,
    pub label_lines: Vec<LabelLineLayout>,
    pub solver: SolverSummary,
    pub title: Option<TitleLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorLayout {
    pub message: String,
    pub detail: String,
    pub kind: String,
    pub text_x: f64,
    pub text_y: f64,
    pub text_size: f64,
    pub detail_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagramData {
    Venn(VennLayout),
    Error(ErrorLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub diagram: DiagramData,
}

impl Layout {
    pub fn venn(&self) -> Option<&VennLayout> {
        match &self.diagram {
            DiagramData::Venn(venn) => Some(venn),
            DiagramData::Error(_) => None,
        }
    }

    pub fn params(&self) -> &[SeriesParams] {
        self.venn().map(|venn| venn.params.as_slice()).unwrap_or(&[])
    }
}
