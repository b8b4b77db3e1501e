pub mod geometry;
pub mod normalize;
pub mod spiral;
pub(crate) mod types;
pub use geometry::BoundingBox;
pub use types::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::ir::RankedEntry;
use crate::text_metrics::{HeuristicMetrics, TextExtent, TextMeasure};
use crate::theme::Theme;
use normalize::normalize_entries;
use spiral::place_item;

/// Lay out a leaderboard: the top entry at the center, the rest placed
/// largest-first along a jittered spiral. Labels that cannot be placed
/// are reported in `Layout::unplaced` and otherwise ignored.
pub fn compute_layout<M, R>(
    entries: &[RankedEntry],
    theme: &Theme,
    config: &LayoutConfig,
    canvas: Canvas,
    measurer: &M,
    rng: &mut R,
) -> Layout
where
    M: TextMeasure + ?Sized,
    R: Rng + ?Sized,
{
    let mut config = config.clone();
    config.sanitize();
    let canvas = Canvas::new(canvas.size, canvas.boundary_margin);

    let normalized = normalize_entries(entries, &config, theme, rng);
    let Some(top) = normalized.center else {
        return Layout::empty(canvas);
    };

    let family = theme.font_family.as_str();
    let (center_font, center_extent, center_box) =
        fit_center(measurer, &top.text, family, top.font_size, &config, &canvas);
    let (cx, cy) = canvas.center;
    let center = CenterLabel {
        text: top.text,
        score: top.score,
        font_size: center_font,
        color: top.color,
        x: cx,
        y: cy,
        width: center_extent.width,
        height: center_extent.height,
    };

    let mut layout = Layout::empty(canvas);
    layout.boxes.push(center_box);
    layout.center = Some(center);

    for sized in normalized.items {
        let extent = match measurer.measure(&sized.text, family, sized.font_size as f32) {
            Ok(extent) => extent,
            Err(err) => {
                tracing::debug!(text = %sized.text, error = %err, "label dropped: metrics failed");
                layout.unplaced.push(UnplacedLabel {
                    text: sized.text,
                    score: sized.score,
                    font_size: sized.font_size,
                    reason: UnplacedReason::Metrics,
                });
                continue;
            }
        };

        let placement = place_item(
            rng,
            extent.width,
            extent.height,
            &canvas,
            &mut layout.boxes,
            &config,
        );
        let item = LayoutItem {
            text: sized.text,
            score: sized.score,
            font_size: sized.font_size,
            width: extent.width,
            height: extent.height,
            color: sized.color,
        };
        match placement {
            Placement::Placed {
                x,
                y,
                rotation,
                bounds,
            } => layout.labels.push(PlacedLabel {
                item,
                x,
                y,
                rotation,
                bounds,
            }),
            Placement::Unplaced => {
                tracing::debug!(
                    text = %item.text,
                    font_size = item.font_size,
                    "label dropped: no free position"
                );
                layout.unplaced.push(UnplacedLabel {
                    text: item.text,
                    score: item.score,
                    font_size: item.font_size,
                    reason: UnplacedReason::Exhausted,
                });
            }
        }
    }

    tracing::debug!(
        placed = layout.labels.len(),
        unplaced = layout.unplaced.len(),
        "layout complete"
    );
    layout
}

/// `compute_layout` with its own `StdRng`, seeded when `seed` is given.
pub fn compute_layout_seeded<M>(
    entries: &[RankedEntry],
    theme: &Theme,
    config: &LayoutConfig,
    canvas: Canvas,
    measurer: &M,
    seed: Option<u64>,
) -> Layout
where
    M: TextMeasure + ?Sized,
{
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    compute_layout(entries, theme, config, canvas, measurer, &mut rng)
}

/// Measure the center label and shrink its font until the margin-expanded
/// box fits inside the boundary. Returns the final font size, extent and
/// reserved box.
fn fit_center<M: TextMeasure + ?Sized>(
    measurer: &M,
    text: &str,
    family: &str,
    font_size: u32,
    config: &LayoutConfig,
    canvas: &Canvas,
) -> (u32, TextExtent, BoundingBox) {
    let (cx, cy) = canvas.center;
    let available = canvas.size - 2.0 * canvas.boundary_margin;
    let mut size = font_size.max(1);
    loop {
        let extent = measure_center(measurer, text, family, size as f32, config.line_height);
        let reserved = BoundingBox::centered(cx, cy, extent.width, extent.height)
            .inflate(config.default_margin);
        if canvas.contains(&reserved) {
            if size < font_size {
                tracing::warn!(
                    text,
                    from = font_size,
                    to = size,
                    "center label shrunk to fit canvas"
                );
            }
            return (size, extent, reserved);
        }
        if size <= 1 {
            tracing::warn!(text, canvas = canvas.size, "center label does not fit canvas");
            return (size, extent, reserved);
        }
        let scale = (available / reserved.width()).min(available / reserved.height());
        let scaled = if scale.is_finite() && scale > 0.0 {
            (size as f32 * scale).floor() as u32
        } else {
            1
        };
        size = scaled.clamp(1, size - 1);
    }
}

// The center label is never dropped, so a measuring failure degrades to
// the heuristic estimate.
fn measure_center<M: TextMeasure + ?Sized>(
    measurer: &M,
    text: &str,
    family: &str,
    font_size: f32,
    line_height: f32,
) -> TextExtent {
    let heuristic = HeuristicMetrics { line_height };
    measurer
        .measure(text, family, font_size)
        .or_else(|err| {
            tracing::warn!(text, error = %err, "center label measured heuristically");
            heuristic.measure(text, family, font_size)
        })
        .unwrap_or(TextExtent {
            width: 0.0,
            height: font_size * line_height,
        })
}
