#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod style;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, VennConfig};
pub use error::LayoutError;
pub use ir::{SetDatum, VennChart, VennSeries};
pub use layout::{ParamsMap, compute_layout};
pub use layout_dump::LayoutDump;
pub use parser::{ParseOutput, parse_venn};
pub use render::render_svg;
pub use theme::Theme;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::mermaid_default()
    }
}

impl RenderOptions {
    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn mermaid_default() -> Self {
        Self {
            theme: Theme::mermaid_default(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.layout.venn.width = width;
        self.layout.venn.height = height;
        self
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
        }
    }
}

/// Renders a venn definition (text or option document) to SVG with the
/// default options.
pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_options(input, RenderOptions::default())
}

/// Renders with explicit options. An init directive in the input is applied
/// on top of `options`.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let parsed = parse_venn(input)?;
    let mut config = Config {
        theme: options.theme,
        layout: options.layout,
    };
    if let Some(init) = parsed.init_config {
        let file = config::ConfigFile::from_value(init)?;
        config = config::apply_config_file(config, file);
    }
    let layout = compute_layout(&parsed.chart, &config.theme, &config.layout)?;
    Ok(render_svg(&layout, &config.theme, &config.layout))
}
