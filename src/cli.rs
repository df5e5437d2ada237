use crate::config::{Config, ConfigFile, apply_config_file, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::LayoutDump;
use crate::parser::parse_venn;
use crate::render::{render_svg, write_output};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "vennr", version, about = "Two-set venn diagram renderer")]
pub struct Args {
    /// Input file (.venn, .json, .json5, .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5, Mermaid-like themeVariables plus `venn`)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width [default: 800]
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Canvas height [default: 600]
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut base_config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    if let Some(width) = args.width {
        base_config.layout.venn.width = width;
    }
    if let Some(height) = args.height {
        base_config.layout.venn.height = height;
    }

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let diagrams = if is_markdown {
        extract_venn_blocks(&input)
    } else {
        vec![input]
    };

    if diagrams.is_empty() {
        return Err(anyhow::anyhow!("No venn diagrams found in input"));
    }

    if diagrams.len() == 1 {
        let output = render_diagram(&diagrams[0], &base_config, args.output_format)?;
        return write_output(&output, args.output.as_deref());
    }

    // Multiple diagrams (Markdown input)
    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, diagrams.len())?;
    for (idx, diagram) in diagrams.iter().enumerate() {
        let output = render_diagram(diagram, &base_config, args.output_format)
            .with_context(|| format!("diagram {}", idx + 1))?;
        write_output(&output, Some(&outputs[idx]))?;
    }

    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so stdout stays clean for the rendered output.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init();
}

fn render_diagram(source: &str, base_config: &Config, format: OutputFormat) -> Result<String> {
    let parsed = parse_venn(source)?;
    let mut config = base_config.clone();
    if let Some(init_cfg) = parsed.init_config {
        config = merge_init_config(config, init_cfg)?;
    }
    let layout = compute_layout(&parsed.chart, &config.theme, &config.layout)?;
    match format {
        OutputFormat::Svg => Ok(render_svg(&layout, &config.theme, &config.layout)),
        OutputFormat::Json => LayoutDump::from_layout(&layout).to_json(),
    }
}

fn merge_init_config(config: Config, init: serde_json::Value) -> Result<Config> {
    let parsed = ConfigFile::from_value(init).context("invalid init directive")?;
    Ok(apply_config_file(config, parsed))
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn extract_venn_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    let mut fence: Option<&str> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        match fence {
            None => fence = detect_venn_fence(trimmed),
            Some(open) if is_fence_end(trimmed, open) => {
                fence = None;
                blocks.push(current.join("\n"));
                current.clear();
            }
            Some(_) => current.push(line),
        }
    }

    blocks
}

fn detect_venn_fence(line: &str) -> Option<&'static str> {
    ["```", "~~~"].into_iter().find(|fence| {
        line.strip_prefix(*fence)
            .is_some_and(|rest| rest.trim().starts_with("venn"))
    })
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    line.strip_prefix(fence)
        .is_some_and(|rest| rest.trim().is_empty())
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("diagram-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("diagram");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}
