use crate::config::LayoutConfig;
use crate::error::LayoutError;

use super::{DiagramData, ErrorLayout, Layout};

/// Degraded diagram drawn in place of circles when the input cannot be laid out.
pub(super) fn compute_error_layout(error: &LayoutError, config: &LayoutConfig) -> Layout {
    let venn = &config.venn;
    let width = venn.width.max(1.0);
    let height = venn.height.max(1.0);
    Layout {
        width,
        height,
        diagram: DiagramData::Error(ErrorLayout {
            message: venn.error_message.clone(),
            detail: error.to_string(),
            kind: error.kind().to_string(),
            text_x: width / 2.0,
            text_y: height / 2.0,
            text_size: venn.error_text_size,
            detail_size: venn.error_detail_size,
        }),
    }
}
