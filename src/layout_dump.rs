use crate::layout::{BoundingBox, Layout, UnplacedReason};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub canvas_size: f32,
    pub boundary_margin: f32,
    pub center: Option<CenterDump>,
    pub labels: Vec<LabelDump>,
    pub unplaced: Vec<UnplacedDump>,
}

#[derive(Debug, Serialize)]
pub struct CenterDump {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    pub bounds: [f32; 4],
}

#[derive(Debug, Serialize)]
pub struct UnplacedDump {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub reason: UnplacedReason,
}

fn box_array(b: &BoundingBox) -> [f32; 4] {
    [b.x1, b.y1, b.x2, b.y2]
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let center = layout.center.as_ref().map(|center| CenterDump {
            text: center.text.clone(),
            score: center.score,
            font_size: center.font_size,
            color: center.color.clone(),
            x: center.x,
            y: center.y,
            width: center.width,
            height: center.height,
        });

        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                text: label.item.text.clone(),
                score: label.item.score,
                font_size: label.item.font_size,
                color: label.item.color.clone(),
                x: label.x,
                y: label.y,
                rotation: label.rotation,
                width: label.item.width,
                height: label.item.height,
                bounds: box_array(&label.bounds),
            })
            .collect();

        let unplaced = layout
            .unplaced
            .iter()
            .map(|item| UnplacedDump {
                text: item.text.clone(),
                score: item.score,
                font_size: item.font_size,
                reason: item.reason,
            })
            .collect();

        LayoutDump {
            canvas_size: layout.canvas.size,
            boundary_margin: layout.canvas.boundary_margin,
            center,
            labels,
            unplaced,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::RankedEntry;
    use crate::layout::{Canvas, compute_layout_seeded};
    use crate::text_metrics::HeuristicMetrics;
    use crate::theme::Theme;

    #[test]
    fn dump_serializes_every_section() {
        let entries = vec![
            RankedEntry::new("Alice", 30),
            RankedEntry::new("Bob", 20),
            RankedEntry::new("Carol", 10),
        ];
        let layout = compute_layout_seeded(
            &entries,
            &Theme::neon(),
            &LayoutConfig::default(),
            Canvas::new(1400.0, 20.0),
            &HeuristicMetrics::default(),
            Some(4),
        );
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.labels.len() + dump.unplaced.len(), 2);
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["center"]["text"], "Alice");
        assert_eq!(json["center"]["color"], Theme::neon().center_color.as_str());
        assert_eq!(json["canvas_size"], 1400.0);
        assert!(json["labels"].is_array());
    }

    #[test]
    fn empty_layout_dumps_null_center() {
        let layout = Layout::empty(Canvas::new(500.0, 20.0));
        let json = serde_json::to_value(LayoutDump::from_layout(&layout)).unwrap();
        assert!(json["center"].is_null());
        assert_eq!(json["labels"].as_array().map(Vec::len), Some(0));
    }
}
