use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

const NEON_PALETTE: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#FFD93D", "#6BCB77", "#4D96FF", "#C77DFF", "#FF9F1C", "#2EC4B6",
    "#F15BB5", "#9BF6FF",
];

const LIGHT_PALETTE: [&str; 8] = [
    "#1F77B4", "#D62728", "#2CA02C", "#9467BD", "#8C564B", "#E377C2", "#17BECF", "#BCBD22",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub center_color: String,
    pub background: String,
    pub palette: Vec<String>,
}

impl Theme {
    pub fn neon() -> Self {
        Self {
            font_family: "Impact, Haettenschweiler, \"Arial Black\", sans-serif".to_string(),
            center_color: "#FFD700".to_string(),
            background: "#0B0F1A".to_string(),
            palette: NEON_PALETTE.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            center_color: "#111111".to_string(),
            background: "#FFFFFF".to_string(),
            palette: LIGHT_PALETTE.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "neon" | "dark" | "default" => Some(Self::neon()),
            "light" | "classic" => Some(Self::light()),
            _ => None,
        }
    }

    /// Uniform pick from the palette; the center color stands in for an
    /// empty palette.
    pub fn pick_color<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.palette
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| self.center_color.clone())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::neon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn pick_color_stays_in_palette() {
        let theme = Theme::neon();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let color = theme.pick_color(&mut rng);
            assert!(theme.palette.contains(&color), "{color} not in palette");
        }
    }

    #[test]
    fn empty_palette_uses_center_color() {
        let mut theme = Theme::light();
        theme.palette.clear();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(theme.pick_color(&mut rng), theme.center_color);
    }

    #[test]
    fn from_name_resolves_presets() {
        assert_eq!(Theme::from_name("Light").map(|t| t.background), Some("#FFFFFF".to_string()));
        assert!(Theme::from_name("neon").is_some());
        assert!(Theme::from_name("sepia").is_none());
    }
}
