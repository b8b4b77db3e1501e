use crate::layout::Layout;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

#[cfg(feature = "png")]
use crate::config::RenderConfig;

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let size = layout.canvas.size.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    if let Some(center) = &layout.center {
        svg.push_str(&text_svg(
            center.x,
            center.y,
            0.0,
            center.font_size,
            &center.color,
            &center.text,
            theme,
        ));
    }

    for label in &layout.labels {
        svg.push_str(&text_svg(
            label.x,
            label.y,
            label.rotation,
            label.item.font_size,
            &label.item.color,
            &label.item.text,
            theme,
        ));
    }

    svg.push_str("</svg>");
    svg
}

// Regular weight throughout, matching what the layout measured.
fn text_svg(
    x: f32,
    y: f32,
    rotation: f32,
    font_size: u32,
    color: &str,
    text: &str,
    theme: &Theme,
) -> String {
    let transform = if rotation.abs() > f32::EPSILON {
        format!(" transform=\"rotate({rotation:.2} {x:.2} {y:.2})\"")
    } else {
        String::new()
    };
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\"{transform}>{}</text>",
        escape_xml(&theme.font_family),
        escape_xml(color),
        escape_xml(text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "sans-serif".to_string());
    opt.fontdb_mut().load_system_fonts();
    let side = render_cfg.canvas_size.max(1.0);
    opt.default_size = usvg::Size::from_wh(side, side)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size {side}"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
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
    use crate::config::LayoutConfig;
    use crate::ir::RankedEntry;
    use crate::layout::{Canvas, compute_layout_seeded};
    use crate::text_metrics::HeuristicMetrics;

    #[test]
    fn render_svg_basic() {
        let entries = vec![
            RankedEntry::new("Alpha", 9),
            RankedEntry::new("Beta", 5),
            RankedEntry::new("Gamma", 1),
        ];
        let theme = Theme::neon();
        let layout = compute_layout_seeded(
            &entries,
            &theme,
            &LayoutConfig::default(),
            Canvas::new(1400.0, 20.0),
            &HeuristicMetrics::default(),
            Some(12),
        );
        let svg = render_svg(&layout, &theme);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Alpha</text>"));
        assert!(svg.contains("viewBox=\"0 0 1400 1400\""));
        for label in &layout.labels {
            assert!(svg.contains(&format!(">{}</text>", label.item.text)));
        }
    }

    #[test]
    fn center_uses_its_measured_size_and_weight() {
        let entries = vec![RankedEntry::new("Champion", 9), RankedEntry::new("runner", 2)];
        let theme = Theme::neon();
        let layout = compute_layout_seeded(
            &entries,
            &theme,
            &LayoutConfig::default(),
            Canvas::new(1400.0, 20.0),
            &HeuristicMetrics::default(),
            Some(8),
        );
        let svg = render_svg(&layout, &theme);
        assert!(!svg.contains("font-weight"));
        let center = layout.center.as_ref().unwrap();
        assert!(svg.contains(&format!(
            "font-size=\"{}\" fill=\"{}\">Champion</text>",
            center.font_size, center.color
        )));
    }

    #[test]
    fn empty_layout_is_blank_canvas() {
        let layout = Layout::empty(Canvas::new(600.0, 20.0));
        let svg = render_svg(&layout, &Theme::light());
        assert!(!svg.contains("<text"));
        assert!(svg.contains("fill=\"#FFFFFF\""));
    }

    #[test]
    fn escapes_markup_in_names() {
        let entries = vec![RankedEntry::new("<b>&co</b>", 1)];
        let layout = compute_layout_seeded(
            &entries,
            &Theme::neon(),
            &LayoutConfig::default(),
            Canvas::new(1400.0, 20.0),
            &HeuristicMetrics::default(),
            Some(0),
        );
        let svg = render_svg(&layout, &Theme::neon());
        assert!(svg.contains("&lt;b&gt;&amp;co&lt;/b&gt;"));
        assert!(!svg.contains("<b>"));
    }
}
