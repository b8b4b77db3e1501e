use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use ttf_parser::{Face, GlyphId};

use crate::config::LayoutConfig;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

const DEFAULT_LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    #[error("no font face available for family `{0}`")]
    FontUnavailable(String),
    #[error("invalid font size {0}")]
    InvalidSize(f32),
    #[error("no glyphs could be resolved for `{0}`")]
    Unmeasurable(String),
}

/// Pixel extents of a single-line label. Implementations must return the
/// same extent for the same inputs for the duration of a layout.
pub trait TextMeasure {
    fn measure(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
    ) -> Result<TextExtent, MetricsError>;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn measure(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
    ) -> Result<TextExtent, MetricsError> {
        (**self).measure(text, font_family, font_size)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn measure(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
    ) -> Result<TextExtent, MetricsError> {
        (**self).measure(text, font_family, font_size)
    }
}

/// Calibrated per-character estimate; needs no installed fonts.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicMetrics {
    pub line_height: f32,
}

impl Default for HeuristicMetrics {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl TextMeasure for HeuristicMetrics {
    fn measure(
        &self,
        text: &str,
        _font_family: &str,
        font_size: f32,
    ) -> Result<TextExtent, MetricsError> {
        check_size(font_size)?;
        Ok(TextExtent {
            width: estimate_text_width(text, font_size),
            height: font_size * self.line_height,
        })
    }
}

/// System fonts resolved through fontdb, advances read with ttf-parser.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    pub line_height: f32,
    fallback: Option<HeuristicMetrics>,
}

impl FontMetrics {
    pub fn new(line_height: f32) -> Self {
        Self {
            line_height,
            fallback: None,
        }
    }

    /// Use heuristic widths when the family resolves to no installed face.
    pub fn with_heuristic_fallback(mut self) -> Self {
        self.fallback = Some(HeuristicMetrics {
            line_height: self.line_height,
        });
        self
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_HEIGHT)
    }
}

impl TextMeasure for FontMetrics {
    fn measure(
        &self,
        text: &str,
        font_family: &str,
        font_size: f32,
    ) -> Result<TextExtent, MetricsError> {
        check_size(font_size)?;
        let line = font_size * self.line_height;
        if text.is_empty() {
            return Ok(TextExtent {
                width: 0.0,
                height: line,
            });
        }
        let measured = {
            let mut guard = TEXT_MEASURER
                .lock()
                .map_err(|_| MetricsError::FontUnavailable(font_family.to_string()))?;
            guard.measure(text, font_size, font_family)
        };
        match measured {
            Ok((width, ascent_descent)) => Ok(TextExtent {
                width,
                height: line.max(ascent_descent),
            }),
            Err(MetricsError::FontUnavailable(family)) => match &self.fallback {
                Some(fallback) => fallback.measure(text, font_family, font_size),
                None => Err(MetricsError::FontUnavailable(family)),
            },
            Err(err) => Err(err),
        }
    }
}

pub fn measurer_for(config: &LayoutConfig) -> Box<dyn TextMeasure> {
    if config.fast_text_metrics {
        Box::new(HeuristicMetrics {
            line_height: config.line_height,
        })
    } else {
        Box::new(FontMetrics::new(config.line_height).with_heuristic_fallback())
    }
}

fn check_size(font_size: f32) -> Result<(), MetricsError> {
    if font_size.is_finite() && font_size > 0.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidSize(font_size))
    }
}

pub(crate) fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars()
        .filter(|ch| *ch != '\n')
        .map(char_width_factor)
        .sum::<f32>()
        * font_size
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    // Calibrated against sans-serif advances at a 16px baseline.
    match ch {
        ' ' => 0.306,
        '\\' | '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' | '{' | '}' => 0.321,
        'a' => 0.550,
        'b' => 0.603,
        'c' => 0.547,
        'd' => 0.609,
        'e' => 0.570,
        'f' => 0.340,
        'g' | 'h' => 0.600,
        'i' => 0.235,
        'j' => 0.227,
        'k' => 0.522,
        'l' => 0.239,
        'm' => 0.867,
        'n' | 'q' | 'u' => 0.585,
        'o' => 0.574,
        'p' => 0.595,
        'r' => 0.364,
        's' => 0.523,
        't' => 0.305,
        'v' => 0.545,
        'w' => 0.811,
        'x' => 0.538,
        'y' => 0.556,
        'z' => 0.550,
        'I' => 0.272,
        'M' => 0.903,
        'W' => 0.958,
        'A'..='Z' => 0.660,
        '1' => 0.396,
        '0'..='9' => 0.600,
        '@' | '#' | '%' | '&' => 0.946,
        // CJK and other wide glyphs.
        c if (c as u32) >= 0x2E80 => 1.0,
        _ => 0.568,
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    cache: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            cache: HashMap::new(),
        }
    }

    /// Returns `(advance width, ascender - descender)` in pixels.
    fn measure(
        &mut self,
        text: &str,
        font_size: f32,
        font_family: &str,
    ) -> Result<(f32, f32), MetricsError> {
        let family_key = normalize_family_key(font_family);
        if !self.cache.contains_key(&family_key) {
            let face = self.load_face(font_family);
            if face.is_none() {
                tracing::debug!(family = %family_key, "no font face resolved");
            }
            self.cache.insert(family_key.clone(), face);
        }
        let face = self
            .cache
            .get_mut(&family_key)
            .and_then(|face| face.as_mut())
            .ok_or_else(|| MetricsError::FontUnavailable(family_key.clone()))?;
        let normalized = text.replace('\t', "    ");
        let width = face
            .measure_width(&normalized, font_size)
            .ok_or_else(|| MetricsError::Unmeasurable(text.to_string()))?;
        Ok((width, face.vertical_extent(font_size)))
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        #[derive(Clone, Copy)]
        enum FamilyToken {
            Generic(fontdb::Family<'static>),
            Name(usize),
        }

        let mut names: Vec<String> = Vec::new();
        let mut order: Vec<FamilyToken> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => order.push(FamilyToken::Generic(Family::Serif)),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    order.push(FamilyToken::Generic(Family::SansSerif))
                }
                "monospace" | "ui-monospace" => order.push(FamilyToken::Generic(Family::Monospace)),
                "cursive" => order.push(FamilyToken::Generic(Family::Cursive)),
                "fantasy" => order.push(FamilyToken::Generic(Family::Fantasy)),
                _ => {
                    let idx = names.len();
                    names.push(raw.to_string());
                    order.push(FamilyToken::Name(idx));
                }
            }
        }
        if order.is_empty() {
            order.push(FamilyToken::Generic(Family::SansSerif));
        }

        let families: Vec<Family<'_>> = order
            .into_iter()
            .map(|token| match token {
                FamilyToken::Generic(family) => family,
                FamilyToken::Name(idx) => Family::Name(names[idx].as_str()),
            })
            .collect();

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            loaded = FontFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    ascii_advances: [Option<u16>; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let (units_per_em, ascender, descender, ascii_advances) = {
            let face = Face::parse(&data, index).ok()?;
            let mut advances = [None; 128];
            for byte in 0u8..=127 {
                advances[byte as usize] = face
                    .glyph_index(byte as char)
                    .and_then(|glyph| face.glyph_hor_advance(glyph));
            }
            (
                face.units_per_em().max(1),
                face.ascender(),
                face.descender(),
                advances,
            )
        };
        Some(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn vertical_extent(&self, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        (self.ascender as f32 - self.descender as f32) * scale
    }

    /// `None` when not a single visible glyph resolves.
    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        let mut visible = 0usize;
        let mut resolved = 0usize;

        let needs_face = !text.is_ascii();
        let face = if needs_face {
            Face::parse(&self.data, self.index).ok()
        } else {
            None
        };

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            if !ch.is_whitespace() {
                visible += 1;
            }
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else if let Some(cached) = self.advance_cache.get(&ch) {
                *cached
            } else {
                let value = face.as_ref().and_then(|face| {
                    face.glyph_index(ch)
                        .map(|id| id.0)
                        .and_then(|id| face.glyph_hor_advance(GlyphId(id)))
                });
                self.advance_cache.insert(ch, value);
                value
            };
            match advance {
                Some(advance) if advance > 0 => {
                    if !ch.is_whitespace() {
                        resolved += 1;
                    }
                    width += advance as f32 * scale;
                }
                _ => width += fallback,
            }
        }

        if visible > 0 && resolved == 0 {
            return None;
        }
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
