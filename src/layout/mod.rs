mod decorate;
mod emit;
mod error;
mod overlap;
mod radius;
mod text;
pub(crate) mod types;
pub use types::*;

pub use decorate::{format_label, format_value};
pub use emit::emit_params;
pub use overlap::{Solution, SolverOptions, lens_area, solve_distance};
pub use radius::circle_radii;

use crate::config::{LayoutConfig, VennRenderMode};
use crate::error::{LayoutError, Result};
use crate::ir::{INTERSECTION, SET_A, SET_B, VennChart};
use crate::theme::Theme;
use decorate::{SetContext, build_circle, build_label, build_label_line};
use error::compute_error_layout;
use text::measure_label_with_font_size;

/// Lays out a two-set venn chart.
///
/// With `venn.render_mode = Fallback` failures produce an error diagram
/// instead of an `Err`.
#[tracing::instrument(skip_all)]
pub fn compute_layout(chart: &VennChart, theme: &Theme, config: &LayoutConfig) -> Result<Layout> {
    match compute_venn_layout(chart, theme, config) {
        Ok(layout) => Ok(layout),
        Err(err) if config.venn.render_mode == VennRenderMode::Fallback => {
            tracing::warn!(error = %err, kind = err.kind(), "venn layout failed, drawing fallback");
            Ok(compute_error_layout(&err, config))
        }
        Err(err) => Err(err),
    }
}

fn compute_venn_layout(chart: &VennChart, theme: &Theme, config: &LayoutConfig) -> Result<Layout> {
    let venn = &config.venn;
    let series = chart
        .primary_series()
        .ok_or(LayoutError::InvalidDataset { count: 0 })?;
    if series.data.len() != 3 {
        return Err(LayoutError::InvalidDataset {
            count: series.data.len(),
        });
    }
    let values = [
        series.data[SET_A].value,
        series.data[SET_B].value,
        series.data[INTERSECTION].value,
    ];

    let width = venn.width.max(1.0);
    let height = venn.height.max(1.0);
    let extent = height * venn.extent_ratio;
    let (r0, r1) = circle_radii(values[0], values[1], extent)?;
    let solution = solve_distance(values, r0, r1, &SolverOptions::from(venn))?;
    tracing::debug!(r0, r1, distance = solution.distance, "venn circles solved");

    let params = emit_params(r0, r1, solution.distance, (width / 2.0, height / 2.0));

    let mut circles = Vec::with_capacity(params.len());
    let mut labels = Vec::with_capacity(params.len());
    let mut label_lines = Vec::with_capacity(params.len());
    for (index, entry) in params.iter().enumerate() {
        let ctx = SetContext {
            index,
            datum: &series.data[index],
            series,
            chart,
            location: entry.location,
        };
        let circle = build_circle(&ctx, theme, config);
        labels.push(build_label(&ctx, &circle.style.color, theme, config));
        label_lines.push(build_label_line(&ctx, &circle.style.color, config));
        circles.push(circle);
    }

    let title = chart.title.as_ref().map(|title| {
        let text = measure_label_with_font_size(
            title,
            theme.title_text_size,
            config,
            false,
            theme.font_family.as_str(),
        );
        TitleLayout {
            x: width / 2.0,
            y: venn.title_margin + text.height / 2.0,
            text,
        }
    });

    Ok(Layout {
        width,
        height,
        diagram: DiagramData::Venn(VennLayout {
            params,
            circles,
            labels,
            label_lines,
            solver: SolverSummary {
                values,
                radii: (r0, r1),
                distance: solution.distance,
                iterations: solution.iterations,
                ratio: solution.ratio,
                target_ratio: solution.target_ratio,
            },
            title,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SetDatum;
    use std::f64::consts::PI;

    fn config(width: f64, height: f64) -> LayoutConfig {
        let mut config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        config.venn.width = width;
        config.venn.height = height;
        config
    }

    #[test]
    fn reference_chart_layout() {
        let chart = VennChart::from_values(["A", "B", "AB"], [100.0, 80.0, 30.0]);
        let layout = compute_layout(&chart, &Theme::modern(), &config(800.0, 450.0)).unwrap();
        let venn = layout.venn().unwrap();
        assert_eq!(venn.params.len(), 2);
        assert_eq!(venn.circles.len(), 2);

        let a = venn.params[0].location;
        let b = venn.params[1].location;
        assert_eq!(a.r, 150.0);
        assert_eq!(a.x, 400.0 - 150.0);
        assert_eq!(a.y, 225.0);
        assert_eq!(b.y, 225.0);
        let distance = b.x - a.x;
        assert!((distance - venn.solver.distance).abs() < 1e-9);

        let ratio = lens_area(a.r, b.r, distance) / (PI * a.r * a.r);
        assert!((ratio / 0.3 - 1.0).abs() < 0.001);
    }

    #[test]
    fn layout_is_idempotent() {
        let chart = VennChart::from_values(["A", "B", "AB"], [64.0, 90.0, 12.0]);
        let cfg = config(640.0, 480.0);
        let first = compute_layout(&chart, &Theme::modern(), &cfg).unwrap();
        let second = compute_layout(&chart, &Theme::modern(), &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_data_count_is_rejected() {
        let mut chart = VennChart::from_values(["A", "B", "AB"], [1.0, 1.0, 1.0]);
        chart.primary_series_mut().data.push(SetDatum::new("C", 1.0));
        let err = compute_layout(&chart, &Theme::modern(), &config(400.0, 300.0)).unwrap_err();
        assert_eq!(err, LayoutError::InvalidDataset { count: 4 });

        let err = compute_layout(&VennChart::new(), &Theme::modern(), &config(400.0, 300.0))
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidDataset { count: 0 });
    }

    #[test]
    fn fallback_mode_draws_error_diagram() {
        let chart = VennChart::from_values(["A", "B", "AB"], [10.0, 5.0, 20.0]);
        let mut cfg = config(400.0, 300.0);
        assert!(compute_layout(&chart, &Theme::modern(), &cfg).is_err());

        cfg.venn.render_mode = VennRenderMode::Fallback;
        let layout = compute_layout(&chart, &Theme::modern(), &cfg).unwrap();
        match &layout.diagram {
            DiagramData::Error(error) => {
                assert_eq!(error.kind, "domain");
                assert!(error.detail.contains("exceeds"));
            }
            other => panic!("expected error layout, got {other:?}"),
        }
        assert!(layout.params().is_empty());
    }

    #[test]
    fn title_is_centered_above_the_circles() {
        let mut chart = VennChart::from_values(["A", "B", "AB"], [10.0, 10.0, 2.0]);
        chart.title = Some("Overlap".to_string());
        let layout = compute_layout(&chart, &Theme::modern(), &config(500.0, 400.0)).unwrap();
        let title = layout.venn().unwrap().title.as_ref().unwrap();
        assert_eq!(title.x, 250.0);
        assert_eq!(title.text.lines, vec!["Overlap"]);
    }

    #[test]
    fn equal_full_overlap_places_circles_on_top_of_each_other() {
        let chart = VennChart::from_values(["A", "B", "AB"], [50.0, 50.0, 50.0]);
        let layout = compute_layout(&chart, &Theme::modern(), &config(600.0, 600.0)).unwrap();
        let params = layout.params();
        assert_eq!(params[0].location, params[1].location);
    }
}
