use crate::config::LayoutConfig;
use crate::layout::{
    CircleShape, DiagramData, ErrorLayout, LabelLayout, LabelLineLayout, LabelVariant, Layout,
    LineVariant, TitleLayout, VennLayout,
};
use crate::style::{LineType, TextAlign};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    match &layout.diagram {
        DiagramData::Venn(venn) => render_venn(&mut svg, venn, theme, config),
        DiagramData::Error(error) => render_error(&mut svg, error, theme),
    }

    svg.push_str("</svg>");
    svg
}

fn render_venn(svg: &mut String, venn: &VennLayout, theme: &Theme, config: &LayoutConfig) {
    svg.push_str("<style>");
    svg.push_str(".venn-label-emphasis,.venn-line-emphasis{display:none}");
    svg.push_str(".venn-set:hover .venn-label-emphasis,.venn-set:hover .venn-line-emphasis{display:inline}");
    svg.push_str(".venn-set:hover .venn-label-normal,.venn-set:hover .venn-line-normal{display:none}");
    for circle in &venn.circles {
        svg.push_str(&hover_rule(circle));
    }
    svg.push_str("</style>");

    if let Some(title) = &venn.title {
        render_title(svg, title, theme, config);
    }

    for circle in &venn.circles {
        svg.push_str(&format!(
            "<g class=\"venn-set venn-set-{}\" data-name=\"{}\" data-value=\"{}\" data-draggable=\"{}\" data-z-level=\"{}\"{}>",
            circle.index,
            escape_xml(&circle.name),
            circle.value,
            circle.draggable,
            circle.z_level,
            if circle.clickable { " cursor=\"pointer\"" } else { "" },
        ));
        svg.push_str(&circle_svg(circle));
        if let Some(line) = venn.label_lines.iter().find(|l| l.index == circle.index) {
            svg.push_str(&label_line_svg(line));
        }
        if let Some(label) = venn.labels.iter().find(|l| l.index == circle.index) {
            svg.push_str(&label_svg(label, config));
        }
        svg.push_str("</g>");
    }
}

fn hover_rule(circle: &CircleShape) -> String {
    let mut rule = format!(
        ".venn-set-{}:hover .venn-circle{{fill:{}",
        circle.index, circle.highlight.color
    );
    if let Some(stroke) = &circle.highlight.stroke_color {
        rule.push_str(&format!(";stroke:{stroke}"));
    }
    if let Some(width) = circle.highlight.line_width {
        rule.push_str(&format!(";stroke-width:{width}"));
    }
    rule.push('}');
    rule
}

fn circle_svg(circle: &CircleShape) -> String {
    let style = &circle.style;
    let stroke = match (&style.stroke_color, style.line_width) {
        (Some(color), width) => format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape_xml(color),
            width.unwrap_or(1.0)
        ),
        (None, Some(width)) => format!(
            " stroke=\"{}\" stroke-width=\"{width}\"",
            escape_xml(&style.color)
        ),
        (None, None) => String::new(),
    };
    format!(
        "<circle class=\"venn-circle\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" fill-opacity=\"{}\"{stroke}/>",
        circle.x,
        circle.y,
        circle.r,
        escape_xml(&style.color),
        style.opacity,
    )
}

fn label_line_svg(line: &LabelLineLayout) -> String {
    let mut out = String::new();
    if line.visible {
        out.push_str(&line_variant_svg(&line.normal, "venn-line-normal"));
    }
    if line.hover_visible {
        out.push_str(&line_variant_svg(&line.emphasis, "venn-line-emphasis"));
    }
    out
}

fn line_variant_svg(line: &LineVariant, class: &str) -> String {
    let dash = match line.line_type {
        LineType::Solid => String::new(),
        LineType::Dashed => format!(
            " stroke-dasharray=\"{:.1} {:.1}\"",
            line.width * 4.0,
            line.width * 3.0
        ),
        LineType::Dotted => format!(
            " stroke-dasharray=\"{:.1} {:.1}\"",
            line.width,
            line.width * 2.0
        ),
    };
    format!(
        "<line class=\"{class}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\"{dash}/>",
        line.x_start,
        line.y_start,
        line.x_end,
        line.y_end,
        escape_xml(&line.color),
        line.width,
    )
}

fn label_svg(label: &LabelLayout, config: &LayoutConfig) -> String {
    let mut out = String::new();
    if label.visible {
        out.push_str(&text_variant_svg(&label.normal, "venn-label-normal", config));
    }
    if label.hover_visible {
        out.push_str(&text_variant_svg(&label.emphasis, "venn-label-emphasis", config));
    }
    out
}

fn text_variant_svg(label: &LabelVariant, class: &str, config: &LayoutConfig) -> String {
    let anchor = match label.align {
        TextAlign::Left => "start",
        TextAlign::Right => "end",
        TextAlign::Center => "middle",
    };
    text_block_svg(
        label.x,
        label.y,
        &label.text.lines,
        TextAttrs {
            class,
            anchor,
            baseline: &label.baseline,
            font_family: &label.font_family,
            font_size: label.font_size,
            fill: &label.color,
            weight: None,
        },
        config,
    )
}

fn render_title(svg: &mut String, title: &TitleLayout, theme: &Theme, config: &LayoutConfig) {
    svg.push_str(&text_block_svg(
        title.x,
        title.y,
        &title.text.lines,
        TextAttrs {
            class: "venn-title",
            anchor: "middle",
            baseline: "middle",
            font_family: &theme.font_family,
            font_size: theme.title_text_size,
            fill: &theme.title_color,
            weight: Some("bold"),
        },
        config,
    ));
}

fn render_error(svg: &mut String, error: &ErrorLayout, theme: &Theme) {
    let message_y = error.text_y - error.detail_size;
    let detail_y = error.text_y + error.text_size * 0.5;
    svg.push_str(&format!(
        "<g class=\"venn-error\" data-kind=\"{}\">",
        escape_xml(&error.kind)
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{message_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        error.text_x,
        escape_xml(&theme.font_family),
        error.text_size,
        escape_xml(&theme.error_color),
        escape_xml(&error.message)
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{detail_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        error.text_x,
        escape_xml(&theme.font_family),
        error.detail_size,
        escape_xml(&theme.error_color),
        escape_xml(&error.detail)
    ));
    svg.push_str("</g>");
}

struct TextAttrs<'a> {
    class: &'a str,
    anchor: &'a str,
    baseline: &'a str,
    font_family: &'a str,
    font_size: f64,
    fill: &'a str,
    weight: Option<&'a str>,
}

fn text_block_svg(
    x: f64,
    y: f64,
    lines: &[String],
    attrs: TextAttrs<'_>,
    config: &LayoutConfig,
) -> String {
    let line_height = attrs.font_size * config.label_line_height;
    let start_y = y - (lines.len().saturating_sub(1)) as f64 * line_height / 2.0;
    let baseline = match attrs.baseline {
        "top" => "hanging",
        "bottom" => "text-after-edge",
        "alphabetic" => "alphabetic",
        _ => "central",
    };
    let weight = attrs
        .weight
        .map(|w| format!(" font-weight=\"{w}\""))
        .unwrap_or_default();

    let mut text = format!(
        "<text class=\"{}\" x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"{}\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\"{weight}>",
        attrs.class,
        attrs.anchor,
        escape_xml(attrs.font_family),
        attrs.font_size,
        escape_xml(attrs.fill),
    );
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

/// Writes to `output`, or to stdout when no path is given.
pub fn write_output(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)?;
        }
        None => {
            print!("{}", contents);
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VennRenderMode;
    use crate::ir::VennChart;
    use crate::layout::compute_layout;
    use crate::style::{ItemStyle, LabelStyle, LineStyle, LabelLineStyle, StateStyle};

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn render_svg_basic() {
        let mut chart = VennChart::from_values(["Cats & Dogs", "<Birds>", "Both"], [10.0, 8.0, 3.0]);
        chart.title = Some("Pets".to_string());
        let config = fast_config();
        let layout = compute_layout(&chart, &Theme::modern(), &config).unwrap();
        let svg = render_svg(&layout, &Theme::modern(), &config);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains("fill-opacity=\"0.5\""));
        assert!(svg.contains("Cats &amp; Dogs"));
        assert!(svg.contains("&lt;Birds&gt;"));
        assert!(!svg.contains("<Birds>"));
        assert!(svg.contains(">Pets</tspan>"));
        assert!(svg.contains("data-draggable=\"false\""));
        assert!(svg.contains(".venn-set-0:hover .venn-circle{fill:"));
    }

    #[test]
    fn outer_labels_anchor_away_from_each_other() {
        let chart = VennChart::from_values(["A", "B", "AB"], [10.0, 10.0, 2.0]);
        let config = fast_config();
        let layout = compute_layout(&chart, &Theme::modern(), &config).unwrap();
        let svg = render_svg(&layout, &Theme::modern(), &config);
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("class=\"venn-line-normal\""));
    }

    #[test]
    fn dashed_leader_lines_and_custom_border() {
        let mut chart = VennChart::from_values(["A", "B", "AB"], [10.0, 10.0, 2.0]);
        chart.primary_series_mut().item_style = Some(ItemStyle {
            normal: Some(StateStyle {
                border_color: Some("#123456".to_string()),
                border_width: Some(3.0),
                label_line: Some(LabelLineStyle {
                    line_style: Some(LineStyle {
                        line_type: Some(LineType::Dashed),
                        width: Some(2.0),
                        ..LineStyle::default()
                    }),
                    ..LabelLineStyle::default()
                }),
                ..StateStyle::default()
            }),
            emphasis: None,
        });
        let config = fast_config();
        let layout = compute_layout(&chart, &Theme::modern(), &config).unwrap();
        let svg = render_svg(&layout, &Theme::modern(), &config);
        assert!(svg.contains("stroke-dasharray=\"8.0 6.0\""));
        assert!(svg.contains("stroke=\"#123456\" stroke-width=\"3\""));
    }

    #[test]
    fn hidden_normal_label_is_revealed_on_hover_only() {
        let mut chart = VennChart::from_values(["Alpha", "Beta", "AB"], [10.0, 10.0, 2.0]);
        chart.primary_series_mut().item_style = Some(ItemStyle {
            normal: Some(StateStyle {
                label: Some(LabelStyle {
                    show: Some(false),
                    ..LabelStyle::default()
                }),
                ..StateStyle::default()
            }),
            emphasis: None,
        });
        let config = fast_config();
        let layout = compute_layout(&chart, &Theme::modern(), &config).unwrap();
        let svg = render_svg(&layout, &Theme::modern(), &config);
        assert!(!svg.contains("class=\"venn-label-normal\""));
        assert_eq!(svg.matches("class=\"venn-label-emphasis\"").count(), 2);
    }

    #[test]
    fn render_error_diagram() {
        let chart = VennChart::from_values(["A", "B", "AB"], [10.0, 5.0, 20.0]);
        let mut config = fast_config();
        config.venn.render_mode = VennRenderMode::Fallback;
        let layout = compute_layout(&chart, &Theme::modern(), &config).unwrap();
        let svg = render_svg(&layout, &Theme::modern(), &config);
        assert!(svg.contains("data-kind=\"domain\""));
        assert!(svg.contains(&config.venn.error_message));
        assert!(!svg.contains("<circle"));
    }
}
