use crate::style::ItemStyle;
use serde::{Deserialize, Serialize};

/// Index of each datum inside a venn series.
pub const SET_A: usize = 0;
pub const SET_B: usize = 1;
pub const INTERSECTION: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDatum {
    #[serde(default)]
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculable: Option<bool>,
}

impl SetDatum {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            item_style: None,
            calculable: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VennSeries {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub series_type: Option<String>,
    #[serde(default)]
    pub data: Vec<SetDatum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ItemStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculable: Option<bool>,
}

/// A chart option: only the first series is drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VennChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculable: Option<bool>,
    #[serde(default)]
    pub series: Vec<VennSeries>,
}

impl VennChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a single-series chart from the A, B and A∩B magnitudes.
    pub fn from_values(names: [&str; 3], values: [f64; 3]) -> Self {
        let data = names
            .iter()
            .zip(values)
            .map(|(name, value)| SetDatum::new(*name, value))
            .collect();
        Self {
            title: None,
            calculable: None,
            series: vec![VennSeries {
                name: String::new(),
                series_type: Some("venn".to_string()),
                data,
                item_style: None,
                calculable: None,
            }],
        }
    }

    pub fn primary_series(&self) -> Option<&VennSeries> {
        self.series.first()
    }

    pub fn primary_series_mut(&mut self) -> &mut VennSeries {
        if self.series.is_empty() {
            self.series.push(VennSeries {
                series_type: Some("venn".to_string()),
                ..VennSeries::default()
            });
        }
        &mut self.series[0]
    }
}
