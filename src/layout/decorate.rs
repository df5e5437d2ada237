use crate::config::LayoutConfig;
use crate::ir::{SET_A, SetDatum, VennChart, VennSeries};
use crate::style::{
    LabelPosition, LineLength, LineType, StyleChain, StyleLevel, StyleState, TextAlign,
    resolve_flag,
};
use crate::theme::{Theme, lift_color, reverse_color};

use super::text::measure_label_with_font_size;
use super::{
    CircleParams, CircleShape, HighlightStyle, LabelLayout, LabelLineLayout, LabelVariant,
    LineVariant, ShapeStyle,
};

/// Everything needed to decorate one primary set.
pub(super) struct SetContext<'a> {
    pub index: usize,
    pub datum: &'a SetDatum,
    pub series: &'a VennSeries,
    pub chart: &'a VennChart,
    pub location: CircleParams,
}

impl<'a> SetContext<'a> {
    fn chain(&self, config: &'a LayoutConfig) -> StyleChain<'a> {
        StyleChain::new()
            .with(StyleLevel::Data, self.datum.item_style.as_ref())
            .with(StyleLevel::Series, self.series.item_style.as_ref())
            .with(StyleLevel::Default, Some(&config.venn.item_style))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Center,
}

fn side_for(position: LabelPosition, index: usize) -> Side {
    match position {
        LabelPosition::Inner | LabelPosition::Inside => Side::Center,
        LabelPosition::Left => Side::Left,
        LabelPosition::Right => Side::Right,
        // Away from the partner circle.
        LabelPosition::Outer if index == SET_A => Side::Left,
        LabelPosition::Outer => Side::Right,
    }
}

pub(super) fn build_circle(
    ctx: &SetContext<'_>,
    theme: &Theme,
    config: &LayoutConfig,
) -> CircleShape {
    let venn = &config.venn;
    let chain = ctx.chain(config);
    let normal_color = chain
        .resolve(StyleState::Normal, |s| s.color.clone())
        .unwrap_or_else(|| theme.color_at(ctx.index));
    let emphasis_color = chain
        .resolve(StyleState::Emphasis, |s| s.color.clone())
        .or_else(|| lift_color(&normal_color, venn.emphasis_lift))
        .unwrap_or_else(|| normal_color.clone());

    let draggable = resolve_flag(
        ctx.datum.calculable,
        ctx.series.calculable,
        ctx.chart.calculable,
        venn.calculable,
    );

    CircleShape {
        index: ctx.index,
        name: ctx.datum.name.clone(),
        value: ctx.datum.value,
        x: ctx.location.x,
        y: ctx.location.y,
        r: ctx.location.r,
        z_level: venn.z_level,
        style: ShapeStyle {
            color: normal_color,
            opacity: venn.opacity,
            stroke_color: chain.resolve(StyleState::Normal, |s| s.border_color.clone()),
            line_width: chain.resolve(StyleState::Normal, |s| s.border_width),
        },
        highlight: HighlightStyle {
            color: emphasis_color,
            stroke_color: chain.resolve(StyleState::Emphasis, |s| s.border_color.clone()),
            line_width: chain.resolve(StyleState::Emphasis, |s| s.border_width),
        },
        clickable: true,
        draggable,
    }
}

pub(super) fn build_label(
    ctx: &SetContext<'_>,
    fill: &str,
    theme: &Theme,
    config: &LayoutConfig,
) -> LabelLayout {
    let chain = ctx.chain(config);
    let visible = chain
        .resolve(StyleState::Normal, |s| s.label.as_ref()?.show)
        .unwrap_or(false);
    let hover_visible = chain
        .resolve(StyleState::Emphasis, |s| s.label.as_ref()?.show)
        .unwrap_or(visible);

    LabelLayout {
        index: ctx.index,
        z_level: config.venn.z_level + 1,
        visible,
        hover_visible,
        normal: label_variant(ctx, &chain, StyleState::Normal, fill, theme, config),
        emphasis: label_variant(ctx, &chain, StyleState::Emphasis, fill, theme, config),
    }
}

fn label_variant(
    ctx: &SetContext<'_>,
    chain: &StyleChain<'_>,
    state: StyleState,
    fill: &str,
    theme: &Theme,
    config: &LayoutConfig,
) -> LabelVariant {
    let formatter = chain.resolve_for(state, |s| s.label.as_ref()?.formatter.clone());
    let text = format_label(formatter.as_deref(), &ctx.series.name, ctx.datum);
    let text_field = |query: fn(&crate::style::TextStyle) -> Option<String>| {
        chain.resolve_for(state, |s| query(s.label.as_ref()?.text_style.as_ref()?))
    };
    let font_size = chain
        .resolve_for(state, |s| s.label.as_ref()?.text_style.as_ref()?.font_size)
        .unwrap_or(theme.font_size);
    let font_family = text_field(|t| t.font_family.clone()).unwrap_or_else(|| theme.font_family.clone());
    let block = measure_label_with_font_size(&text, font_size, config, false, &font_family);

    let (side, gap) = placement(ctx, chain, state, config);
    let CircleParams { x: cx, y: cy, r } = ctx.location;
    let (x, align, default_color) = match side {
        Side::Center => {
            let color = if r > block.width {
                "#fff".to_string()
            } else {
                reverse_color(fill).unwrap_or_else(|| theme.primary_text_color.clone())
            };
            (cx, TextAlign::Center, color)
        }
        Side::Left => (cx - r - gap, TextAlign::Right, fill.to_string()),
        Side::Right => (cx + r + gap, TextAlign::Left, fill.to_string()),
    };

    LabelVariant {
        x,
        y: cy,
        color: text_field(|t| t.color.clone()).unwrap_or(default_color),
        align: chain
            .resolve_for(state, |s| s.label.as_ref()?.text_style.as_ref()?.align)
            .unwrap_or(align),
        baseline: text_field(|t| t.baseline.clone()).unwrap_or_else(|| "middle".to_string()),
        font_size,
        font_family,
        text: block,
    }
}

pub(super) fn build_label_line(
    ctx: &SetContext<'_>,
    fill: &str,
    config: &LayoutConfig,
) -> LabelLineLayout {
    let chain = ctx.chain(config);
    let normal = line_variant(ctx, &chain, StyleState::Normal, fill, config);
    let emphasis = line_variant(ctx, &chain, StyleState::Emphasis, fill, config);
    let show = chain
        .resolve(StyleState::Normal, |s| s.label_line.as_ref()?.show)
        .unwrap_or(false);
    let hover_show = chain
        .resolve(StyleState::Emphasis, |s| s.label_line.as_ref()?.show)
        .unwrap_or(show);
    let (normal_side, _) = placement(ctx, &chain, StyleState::Normal, config);
    let (emphasis_side, _) = placement(ctx, &chain, StyleState::Emphasis, config);

    LabelLineLayout {
        index: ctx.index,
        z_level: config.venn.z_level + 1,
        visible: show && normal_side != Side::Center,
        hover_visible: hover_show && emphasis_side != Side::Center,
        normal,
        emphasis,
    }
}

fn line_variant(
    ctx: &SetContext<'_>,
    chain: &StyleChain<'_>,
    state: StyleState,
    fill: &str,
    config: &LayoutConfig,
) -> LineVariant {
    let (side, gap) = placement(ctx, chain, state, config);
    let CircleParams { x: cx, y: cy, r } = ctx.location;
    let (x_start, x_end) = match side {
        Side::Center => (cx, cx),
        Side::Left => (cx - r, cx - r - gap),
        Side::Right => (cx + r, cx + r + gap),
    };
    LineVariant {
        x_start,
        y_start: cy,
        x_end,
        y_end: cy,
        color: chain
            .resolve_for(state, |s| s.label_line.as_ref()?.line_style.as_ref()?.color.clone())
            .unwrap_or_else(|| fill.to_string()),
        line_type: chain
            .resolve_for(state, |s| s.label_line.as_ref()?.line_style.as_ref()?.line_type)
            .unwrap_or(LineType::Solid),
        width: chain
            .resolve_for(state, |s| s.label_line.as_ref()?.line_style.as_ref()?.width)
            .unwrap_or(1.0),
    }
}

fn placement(
    ctx: &SetContext<'_>,
    chain: &StyleChain<'_>,
    state: StyleState,
    config: &LayoutConfig,
) -> (Side, f64) {
    let position = chain
        .resolve_for(state, |s| s.label.as_ref()?.position)
        .unwrap_or_default();
    let gap = match chain
        .resolve_for(state, |s| s.label_line.as_ref()?.length)
        .unwrap_or_default()
    {
        LineLength::Auto => config.venn.auto_line_gap,
        LineLength::Fixed(len) => len.max(0.0),
    };
    (side_for(position, ctx.index), gap)
}

/// Expands `{a}` (series name), `{b}` (datum name) and `{c}` (value).
pub fn format_label(formatter: Option<&str>, series_name: &str, datum: &SetDatum) -> String {
    let Some(template) = formatter else {
        return datum.name.clone();
    };
    template
        .replace("{a}", series_name)
        .replace("{b}", &datum.name)
        .replace("{c}", &format_value(datum.value))
}

/// Shortest decimal form of the value, so `3.0` prints as `3`.
pub fn format_value(value: f64) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ItemStyle, LabelLineStyle, LabelStyle, LineStyle, StateStyle, TextStyle};

    fn fast_config() -> LayoutConfig {
        LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        }
    }

    fn chart_with(series_style: Option<ItemStyle>, datum_style: Option<ItemStyle>) -> VennChart {
        let mut chart = VennChart::from_values(["Search", "Social", "Both"], [100.0, 80.0, 30.0]);
        let series = chart.primary_series_mut();
        series.name = "Visitors".to_string();
        series.item_style = series_style;
        series.data[0].item_style = datum_style;
        chart
    }

    fn context<'a>(chart: &'a VennChart, index: usize, location: CircleParams) -> SetContext<'a> {
        let series = chart.primary_series().unwrap();
        SetContext {
            index,
            datum: &series.data[index],
            series,
            chart,
            location,
        }
    }

    fn normal(state: StateStyle) -> ItemStyle {
        ItemStyle {
            normal: Some(state),
            emphasis: None,
        }
    }

    const LEFT_CIRCLE: CircleParams = CircleParams { x: 250.0, y: 300.0, r: 150.0 };
    const RIGHT_CIRCLE: CircleParams = CircleParams { x: 400.0, y: 300.0, r: 134.0 };

    #[test]
    fn circle_uses_palette_and_lifted_highlight() {
        let chart = chart_with(None, None);
        let theme = Theme::mermaid_default();
        let circle = build_circle(&context(&chart, 0, LEFT_CIRCLE), &theme, &fast_config());
        assert_eq!(circle.style.color, "#ff7f50");
        assert_eq!(circle.style.opacity, 0.5);
        assert_eq!(circle.highlight.color, "rgb(255,152,115)");
        assert!(circle.clickable);
        assert!(!circle.draggable);
        assert_eq!((circle.x, circle.y, circle.r), (250.0, 300.0, 150.0));
    }

    #[test]
    fn datum_color_beats_series_color() {
        let series_style = normal(StateStyle {
            color: Some("#000000".to_string()),
            border_width: Some(2.0),
            ..StateStyle::default()
        });
        let datum_style = normal(StateStyle {
            color: Some("#00ff00".to_string()),
            ..StateStyle::default()
        });
        let chart = chart_with(Some(series_style), Some(datum_style));
        let theme = Theme::modern();
        let first = build_circle(&context(&chart, 0, LEFT_CIRCLE), &theme, &fast_config());
        let second = build_circle(&context(&chart, 1, RIGHT_CIRCLE), &theme, &fast_config());
        assert_eq!(first.style.color, "#00ff00");
        assert_eq!(first.style.line_width, Some(2.0));
        assert_eq!(second.style.color, "#000000");
    }

    #[test]
    fn calculable_resolves_through_chart() {
        let mut chart = chart_with(None, None);
        chart.calculable = Some(true);
        chart.primary_series_mut().data[1].calculable = Some(false);
        let theme = Theme::modern();
        let config = fast_config();
        assert!(build_circle(&context(&chart, 0, LEFT_CIRCLE), &theme, &config).draggable);
        assert!(!build_circle(&context(&chart, 1, RIGHT_CIRCLE), &theme, &config).draggable);
    }

    #[test]
    fn outer_labels_point_away_from_the_partner() {
        let chart = chart_with(None, None);
        let theme = Theme::modern();
        let config = fast_config();
        let left = build_label(&context(&chart, 0, LEFT_CIRCLE), "#ff0000", &theme, &config);
        let right = build_label(&context(&chart, 1, RIGHT_CIRCLE), "#0000ff", &theme, &config);
        assert!(left.visible && left.hover_visible);
        assert_eq!(left.normal.align, TextAlign::Right);
        assert_eq!(left.normal.x, 250.0 - 150.0 - 10.0);
        assert_eq!(left.normal.color, "#ff0000");
        assert_eq!(right.normal.align, TextAlign::Left);
        assert_eq!(right.normal.x, 400.0 + 134.0 + 10.0);
        assert_eq!(right.normal.text.lines, vec!["Social"]);
    }

    #[test]
    fn inner_label_is_white_when_it_fits() {
        let style = normal(StateStyle {
            label: Some(LabelStyle {
                position: Some(LabelPosition::Inside),
                ..LabelStyle::default()
            }),
            ..StateStyle::default()
        });
        let chart = chart_with(Some(style), None);
        let theme = Theme::modern();
        let config = fast_config();
        let label = build_label(&context(&chart, 0, LEFT_CIRCLE), "#ff7f50", &theme, &config);
        assert_eq!(label.normal.align, TextAlign::Center);
        assert_eq!(label.normal.x, 250.0);
        assert_eq!(label.normal.color, "#fff");

        let tiny = CircleParams { x: 10.0, y: 10.0, r: 1.0 };
        let label = build_label(&context(&chart, 0, tiny), "#ff7f50", &theme, &config);
        assert_eq!(label.normal.color, "rgb(0,128,175)");

        let line = build_label_line(&context(&chart, 0, tiny), "#ff7f50", &config);
        assert!(!line.visible);
    }

    #[test]
    fn fixed_line_length_and_line_style() {
        let style = normal(StateStyle {
            label: Some(LabelStyle {
                position: Some(LabelPosition::Right),
                text_style: Some(TextStyle {
                    color: Some("#222".to_string()),
                    ..TextStyle::default()
                }),
                ..LabelStyle::default()
            }),
            label_line: Some(LabelLineStyle {
                show: Some(true),
                length: Some(LineLength::Fixed(30.0)),
                line_style: Some(LineStyle {
                    color: Some("#999".to_string()),
                    line_type: Some(LineType::Dashed),
                    width: Some(2.0),
                }),
            }),
            ..StateStyle::default()
        });
        let chart = chart_with(Some(style), None);
        let config = fast_config();
        let ctx = context(&chart, 0, LEFT_CIRCLE);
        let line = build_label_line(&ctx, "#ff7f50", &config);
        assert!(line.visible);
        assert_eq!(line.normal.x_start, 400.0);
        assert_eq!(line.normal.x_end, 430.0);
        assert_eq!(line.normal.line_type, LineType::Dashed);
        // Emphasis inherits the normal settings when nothing overrides them.
        assert_eq!(line.emphasis, line.normal);

        let label = build_label(&ctx, "#ff7f50", &Theme::modern(), &config);
        assert_eq!(label.normal.x, 430.0);
        assert_eq!(label.normal.color, "#222");
    }

    #[test]
    fn hidden_labels_stay_hidden_on_hover_when_emphasis_says_so() {
        let style = ItemStyle {
            normal: Some(StateStyle {
                label: Some(LabelStyle {
                    show: Some(false),
                    ..LabelStyle::default()
                }),
                ..StateStyle::default()
            }),
            emphasis: Some(StateStyle {
                label: Some(LabelStyle {
                    show: Some(false),
                    ..LabelStyle::default()
                }),
                ..StateStyle::default()
            }),
        };
        let chart = chart_with(Some(style), None);
        let label = build_label(
            &context(&chart, 1, RIGHT_CIRCLE),
            "#000",
            &Theme::modern(),
            &fast_config(),
        );
        assert!(!label.visible);
        assert!(!label.hover_visible);
    }

    #[test]
    fn formatter_expands_placeholders() {
        let datum = SetDatum::new("Search", 100.0);
        assert_eq!(format_label(None, "Visitors", &datum), "Search");
        assert_eq!(
            format_label(Some("{a}: {b} ({c})"), "Visitors", &datum),
            "Visitors: Search (100)"
        );
        assert_eq!(format_value(12.345), "12.345");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(
            format_label(Some("{c}"), "", &SetDatum::new("x", 0.125)),
            "0.125"
        );
    }
}
