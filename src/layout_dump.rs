use crate::layout::{
    CircleShape, DiagramData, LabelLayout, LabelLineLayout, Layout, SeriesParams, SolverSummary,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Host-facing snapshot of a layout: the params map plus every decoration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub kind: String,
    pub width: f64,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub params: Vec<SeriesParams>,
    pub circles: Vec<CircleShape>,
    pub labels: Vec<LabelLayout>,
    pub label_lines: Vec<LabelLineLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDump>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDump {
    pub kind: String,
    pub message: String,
    pub detail: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        match &layout.diagram {
            DiagramData::Venn(venn) => LayoutDump {
                kind: "venn".to_string(),
                width: layout.width,
                height: layout.height,
                title: venn.title.as_ref().map(|t| t.text.lines.join("\n")),
                params: venn.params.clone(),
                circles: venn.circles.clone(),
                labels: venn.labels.clone(),
                label_lines: venn.label_lines.clone(),
                solver: Some(venn.solver.clone()),
                error: None,
            },
            DiagramData::Error(error) => LayoutDump {
                kind: "error".to_string(),
                width: layout.width,
                height: layout.height,
                title: None,
                params: Vec::new(),
                circles: Vec::new(),
                labels: Vec::new(),
                label_lines: Vec::new(),
                solver: None,
                error: Some(ErrorDump {
                    kind: error.kind.clone(),
                    message: error.message.clone(),
                    detail: error.detail.clone(),
                }),
            },
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
