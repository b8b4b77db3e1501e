use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub min_font_px: f32,
    pub max_font_px: f32,
    pub center_font_px: f32,
    /// Spiral search budget per label.
    pub max_attempts: usize,
    /// Radians between successive spiral samples.
    pub angle_increment: f32,
    pub start_radius: f32,
    /// Radius gained per radian of spiral angle.
    pub tightness: f32,
    pub angle_jitter: f32,
    pub radius_jitter: f32,
    /// Random rotations are drawn from `[-rotation_range, rotation_range]` degrees.
    pub rotation_range: f32,
    pub radial_rotation_probability: f64,
    pub collision_margin: f32,
    /// Margin reserved around the center label.
    pub default_margin: f32,
    pub boundary_margin: f32,
    pub fallback_attempts: usize,
    pub fallback_min_radius: f32,
    pub fallback_max_radius: f32,
    pub line_height: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_font_px: 18.0,
            max_font_px: 60.0,
            center_font_px: 60.0,
            max_attempts: 100,
            angle_increment: 0.5,
            start_radius: 120.0,
            tightness: 8.0,
            angle_jitter: 0.3,
            radius_jitter: 15.0,
            rotation_range: 70.0,
            radial_rotation_probability: 0.3,
            collision_margin: 6.0,
            default_margin: 8.0,
            boundary_margin: 20.0,
            fallback_attempts: 20,
            fallback_min_radius: 400.0,
            fallback_max_radius: 650.0,
            line_height: 1.2,
            fast_text_metrics: false,
        }
    }
}

impl LayoutConfig {
    /// Clamp values that would make the search ill-defined. Non-finite
    /// numbers fall back to their defaults first.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for (value, default) in [
            (&mut self.min_font_px, defaults.min_font_px),
            (&mut self.max_font_px, defaults.max_font_px),
            (&mut self.center_font_px, defaults.center_font_px),
            (&mut self.angle_increment, defaults.angle_increment),
            (&mut self.start_radius, defaults.start_radius),
            (&mut self.tightness, defaults.tightness),
            (&mut self.angle_jitter, defaults.angle_jitter),
            (&mut self.radius_jitter, defaults.radius_jitter),
            (&mut self.rotation_range, defaults.rotation_range),
            (&mut self.collision_margin, defaults.collision_margin),
            (&mut self.default_margin, defaults.default_margin),
            (&mut self.boundary_margin, defaults.boundary_margin),
            (&mut self.fallback_min_radius, defaults.fallback_min_radius),
            (&mut self.fallback_max_radius, defaults.fallback_max_radius),
            (&mut self.line_height, defaults.line_height),
        ] {
            if !value.is_finite() {
                *value = default;
            }
        }
        if !self.radial_rotation_probability.is_finite() {
            self.radial_rotation_probability = defaults.radial_rotation_probability;
        }

        self.min_font_px = self.min_font_px.max(1.0);
        if self.max_font_px < self.min_font_px {
            self.max_font_px = self.min_font_px;
        }
        self.center_font_px = self.center_font_px.max(1.0);
        self.angle_jitter = self.angle_jitter.abs();
        self.radius_jitter = self.radius_jitter.abs();
        self.rotation_range = self.rotation_range.abs().min(180.0);
        self.radial_rotation_probability = self.radial_rotation_probability.clamp(0.0, 1.0);
        self.collision_margin = self.collision_margin.max(0.0);
        self.default_margin = self.default_margin.max(0.0);
        self.boundary_margin = self.boundary_margin.max(0.0);
        self.fallback_min_radius = self.fallback_min_radius.max(0.0);
        if self.fallback_max_radius < self.fallback_min_radius {
            self.fallback_max_radius = self.fallback_min_radius;
        }
        if self.line_height <= 0.0 {
            self.line_height = 1.2;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub canvas_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { canvas_size: 1400.0 }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::neon(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    center_color: Option<String>,
    background: Option<String>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    min_font_px: Option<f32>,
    max_font_px: Option<f32>,
    center_font_px: Option<f32>,
    max_attempts: Option<usize>,
    angle_increment: Option<f32>,
    start_radius: Option<f32>,
    tightness: Option<f32>,
    angle_jitter: Option<f32>,
    radius_jitter: Option<f32>,
    rotation_range: Option<f32>,
    radial_rotation_probability: Option<f64>,
    collision_margin: Option<f32>,
    default_margin: Option<f32>,
    boundary_margin: Option<f32>,
    fallback_attempts: Option<usize>,
    fallback_min_radius: Option<f32>,
    fallback_max_radius: Option<f32>,
    line_height: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    canvas_size: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    parse_config(&contents, is_json5)
}

pub fn parse_config(contents: &str, json5_syntax: bool) -> anyhow::Result<Config> {
    let parsed: ConfigFile = if json5_syntax {
        json5::from_str(contents)?
    } else {
        serde_json::from_str(contents)?
    };
    Ok(apply_config_file(Config::default(), parsed))
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> Config {
    if let Some(theme_name) = parsed.theme.as_deref() {
        if let Some(theme) = Theme::from_name(theme_name) {
            config.theme = theme;
        } else {
            tracing::warn!(theme = theme_name, "unknown theme preset, keeping default");
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.center_color {
            config.theme.center_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.palette {
            config.theme.palette = v;
        }
    }

    if let Some(size) = parsed.canvas_size {
        config.render.canvas_size = size;
    }
    if !(config.render.canvas_size.is_finite() && config.render.canvas_size > 0.0) {
        config.render.canvas_size = RenderConfig::default().canvas_size;
    }

    if let Some(file) = parsed.layout {
        let layout = &mut config.layout;
        if let Some(v) = file.min_font_px {
            layout.min_font_px = v;
        }
        if let Some(v) = file.max_font_px {
            layout.max_font_px = v;
        }
        if let Some(v) = file.center_font_px {
            layout.center_font_px = v;
        }
        if let Some(v) = file.max_attempts {
            layout.max_attempts = v;
        }
        if let Some(v) = file.angle_increment {
            layout.angle_increment = v;
        }
        if let Some(v) = file.start_radius {
            layout.start_radius = v;
        }
        if let Some(v) = file.tightness {
            layout.tightness = v;
        }
        if let Some(v) = file.angle_jitter {
            layout.angle_jitter = v;
        }
        if let Some(v) = file.radius_jitter {
            layout.radius_jitter = v;
        }
        if let Some(v) = file.rotation_range {
            layout.rotation_range = v;
        }
        if let Some(v) = file.radial_rotation_probability {
            layout.radial_rotation_probability = v;
        }
        if let Some(v) = file.collision_margin {
            layout.collision_margin = v;
        }
        if let Some(v) = file.default_margin {
            layout.default_margin = v;
        }
        if let Some(v) = file.boundary_margin {
            layout.boundary_margin = v;
        }
        if let Some(v) = file.fallback_attempts {
            layout.fallback_attempts = v;
        }
        if let Some(v) = file.fallback_min_radius {
            layout.fallback_min_radius = v;
        }
        if let Some(v) = file.fallback_max_radius {
            layout.fallback_max_radius = v;
        }
        if let Some(v) = file.line_height {
            layout.line_height = v;
        }
        if let Some(v) = file.fast_text_metrics {
            layout.fast_text_metrics = v;
        }
    }
    config.layout.sanitize();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.min_font_px, 18.0);
        assert_eq!(cfg.max_font_px, 60.0);
        assert_eq!(cfg.max_attempts, 100);
        assert_eq!(cfg.fallback_attempts, 20);
        assert_eq!(cfg.collision_margin, 6.0);
        assert_eq!(cfg.boundary_margin, 20.0);
    }

    #[test]
    fn no_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.render.canvas_size, 1400.0);
        assert_eq!(config.theme.background, Theme::neon().background);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = parse_config(
            r##"{
                "theme": "light",
                "themeVariables": { "palette": ["#000000"] },
                "layout": { "maxAttempts": 10, "fallbackMaxRadius": 500 },
                "canvasSize": 900
            }"##,
            false,
        )
        .unwrap();
        assert_eq!(config.theme.palette, vec!["#000000".to_string()]);
        assert_eq!(config.theme.background, "#FFFFFF");
        assert_eq!(config.layout.max_attempts, 10);
        assert_eq!(config.layout.fallback_max_radius, 500.0);
        assert_eq!(config.layout.start_radius, 120.0);
        assert_eq!(config.render.canvas_size, 900.0);
    }

    #[test]
    fn json5_syntax_allows_comments() {
        let config = parse_config(
            "{ // tighter spiral\n layout: { tightness: 4, }, }",
            true,
        )
        .unwrap();
        assert_eq!(config.layout.tightness, 4.0);
    }

    #[test]
    fn sanitize_resets_non_finite_values() {
        let mut cfg = LayoutConfig {
            angle_increment: f32::NAN,
            start_radius: f32::INFINITY,
            tightness: f32::NAN,
            fallback_max_radius: f32::NAN,
            fallback_min_radius: f32::NEG_INFINITY,
            radius_jitter: f32::NAN,
            line_height: f32::NAN,
            radial_rotation_probability: f64::NAN,
            ..Default::default()
        };
        cfg.sanitize();
        let defaults = LayoutConfig::default();
        assert_eq!(cfg.angle_increment, defaults.angle_increment);
        assert_eq!(cfg.start_radius, defaults.start_radius);
        assert_eq!(cfg.tightness, defaults.tightness);
        assert_eq!(cfg.fallback_min_radius, defaults.fallback_min_radius);
        assert_eq!(cfg.fallback_max_radius, defaults.fallback_max_radius);
        assert_eq!(cfg.radius_jitter, defaults.radius_jitter);
        assert_eq!(cfg.line_height, defaults.line_height);
        assert_eq!(
            cfg.radial_rotation_probability,
            defaults.radial_rotation_probability
        );
    }

    #[test]
    fn sanitize_orders_inverted_ranges() {
        let config = parse_config(
            r#"{ "layout": { "minFontPx": 40, "maxFontPx": 20, "fallbackMinRadius": 700, "fallbackMaxRadius": 100 }, "canvasSize": -5 }"#,
            false,
        )
        .unwrap();
        assert_eq!(config.layout.max_font_px, 40.0);
        assert_eq!(config.layout.fallback_max_radius, 700.0);
        assert_eq!(config.render.canvas_size, 1400.0);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_config("{ not json", false).is_err());
    }
}
