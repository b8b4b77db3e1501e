// Rank ordering and score -> font size mapping.

use rand::Rng;

use crate::config::LayoutConfig;
use crate::ir::RankedEntry;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub struct CenterEntry {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizedEntry {
    pub text: String,
    pub score: i64,
    pub font_size: u32,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub center: Option<CenterEntry>,
    /// Remaining entries, largest font first.
    pub items: Vec<SizedEntry>,
}

pub fn normalize_entries<R: Rng + ?Sized>(
    entries: &[RankedEntry],
    config: &LayoutConfig,
    theme: &Theme,
    rng: &mut R,
) -> Normalized {
    let mut ranked: Vec<&RankedEntry> = entries.iter().collect();
    // `sort_by` is stable, so equal scores keep input order.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let Some((top, rest)) = ranked.split_first() else {
        return Normalized::default();
    };

    let center = CenterEntry {
        text: top.name.clone(),
        score: top.score,
        font_size: config.center_font_px.floor() as u32,
        color: theme.center_color.clone(),
    };

    let min_score = rest.iter().map(|e| e.score).min().unwrap_or(0);
    let max_score = rest.iter().map(|e| e.score).max().unwrap_or(0);
    let range = score_range(min_score, max_score);

    let mut items: Vec<SizedEntry> = rest
        .iter()
        .map(|entry| SizedEntry {
            text: entry.name.to_lowercase(),
            score: entry.score,
            font_size: font_size_for(entry.score, min_score, range, config),
            color: theme.pick_color(rng),
        })
        .collect();
    items.sort_by(|a, b| b.font_size.cmp(&a.font_size));

    Normalized {
        center: Some(center),
        items,
    }
}

/// `max - min`, or 1 when every score is equal.
pub fn score_range(min_score: i64, max_score: i64) -> f64 {
    let range = max_score as f64 - min_score as f64;
    if range <= 0.0 { 1.0 } else { range }
}

pub fn font_size_for(score: i64, min_score: i64, range: f64, config: &LayoutConfig) -> u32 {
    let normalized = ((score as f64 - min_score as f64) / range).clamp(0.0, 1.0);
    let min_px = config.min_font_px as f64;
    let max_px = config.max_font_px as f64;
    (min_px + normalized * (max_px - min_px)).floor() as u32
}
