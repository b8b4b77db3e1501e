#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::RankedEntry;
pub use layout::{Canvas, Layout, compute_layout, compute_layout_seeded};
pub use parser::{ParseError, parse_scores};
pub use render::render_svg;
pub use text_metrics::{FontMetrics, HeuristicMetrics, MetricsError, TextExtent, TextMeasure};
pub use theme::Theme;

/// Everything needed to turn a score list into an SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub seed: Option<u64>,
}

impl RenderOptions {
    pub fn neon() -> Self {
        Self::default()
    }

    pub fn light() -> Self {
        Self {
            theme: Theme::light(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            seed: None,
        }
    }
}

pub fn render_with_options(entries: &[RankedEntry], options: &RenderOptions) -> String {
    let canvas = Canvas::new(options.render.canvas_size, options.layout.boundary_margin);
    let measurer = text_metrics::measurer_for(&options.layout);
    let layout = compute_layout_seeded(
        entries,
        &options.theme,
        &options.layout,
        canvas,
        measurer.as_ref(),
        options.seed,
    );
    render_svg(&layout, &options.theme)
}

pub fn render_scores(input: &str) -> Result<String, ParseError> {
    let entries = parse_scores(input)?;
    Ok(render_with_options(&entries, &RenderOptions::default()))
}
