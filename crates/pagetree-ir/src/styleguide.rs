//! Design-system data exported by the page builder.
//!
//! The styleguide is consumed in two places: the HTML adapter promotes its
//! fonts, theme colors and size presets onto element attributes before the
//! parse, and the button producer looks up named button styles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const FALLBACK_HEX: &str = "#000000";

/// Identifiers arrive as strings or numbers depending on the exporter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawId")]
pub struct StyleId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for StyleId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => StyleId(text),
            RawId::Number(number) => StyleId(number.to_string()),
        }
    }
}

impl StyleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styleguide {
    pub typography: Option<Typography>,
    pub paint_themes: Vec<PaintTheme>,
    pub colors: Vec<ColorSwatch>,
    pub buttons: Vec<ButtonStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Typography {
    pub base_size: f64,
    pub scale_ratio: f64,
    pub headline_font: Option<String>,
    pub subheadline_font: Option<String>,
    pub content_font: Option<String>,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            base_size: 16.0,
            scale_ratio: 1.25,
            headline_font: None,
            subheadline_font: None,
            content_font: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintTheme {
    pub id: StyleId,
    pub headline_color_id: Option<StyleId>,
    pub subheadline_color_id: Option<StyleId>,
    pub content_color_id: Option<StyleId>,
    pub icon_color_id: Option<StyleId>,
    pub link_color_id: Option<StyleId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSwatch {
    pub id: StyleId,
    pub hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonColors {
    pub bg: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStyle {
    pub id: StyleId,
    pub regular: Option<ButtonColors>,
    pub hover: Option<ButtonColors>,
    pub border_radius: Option<f64>,
    pub border_width: Option<f64>,
    pub border_color: Option<String>,
}

/// Which typescale a text kind reads its size presets from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleRole {
    Headline,
    Subheadline,
    Paragraph,
}

/// Resolved theme colors for one paint theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub headline: String,
    pub subheadline: String,
    pub content: String,
    pub icon: String,
    pub link: Option<String>,
}

impl Styleguide {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Hex for a color id, black when the id is unknown.
    pub fn color_hex(&self, id: Option<&StyleId>) -> String {
        id.and_then(|id| self.colors.iter().find(|swatch| &swatch.id == id))
            .map(|swatch| swatch.hex.clone())
            .unwrap_or_else(|| FALLBACK_HEX.to_string())
    }

    pub fn theme_colors(&self, theme: &PaintTheme) -> ThemeColors {
        ThemeColors {
            headline: self.color_hex(theme.headline_color_id.as_ref()),
            subheadline: self.color_hex(theme.subheadline_color_id.as_ref()),
            content: self.color_hex(theme.content_color_id.as_ref()),
            icon: self.color_hex(theme.icon_color_id.as_ref()),
            link: theme
                .link_color_id
                .as_ref()
                .map(|id| self.color_hex(Some(id))),
        }
    }

    pub fn button(&self, id: &str) -> Option<&ButtonStyle> {
        self.buttons.iter().find(|button| button.id.as_str() == id)
    }
}

impl Typography {
    /// Scale points `n3`..`p8` around the base size.
    fn scale_point(&self, step: i32) -> f64 {
        if step == 0 {
            return self.base_size;
        }
        (self.base_size * self.scale_ratio.powi(step)).round()
    }

    /// Pixel size for a preset name (`xl`, `m`, ...) in the given role's scale.
    pub fn preset_size(&self, role: ScaleRole, preset: &str) -> Option<f64> {
        let offset = match role {
            ScaleRole::Headline => 0,
            ScaleRole::Subheadline => -1,
            ScaleRole::Paragraph => -2,
        };
        let step = match preset {
            "5xl" => 8,
            "4xl" => 7,
            "3xl" => 6,
            "2xl" => 5,
            "xl" => 4,
            "l" | "lg" => 3,
            "m" | "md" => 2,
            "s" | "sm" => 1,
            "xs" => 0,
            _ => return None,
        };
        Some(self.scale_point(step + offset))
    }

    /// Every preset of `role` with its pixel size.
    pub fn preset_table(&self, role: ScaleRole) -> BTreeMap<&'static str, f64> {
        ["5xl", "4xl", "3xl", "2xl", "xl", "l", "lg", "m", "md", "s", "sm", "xs"]
            .into_iter()
            .filter_map(|preset| Some((preset, self.preset_size(role, preset)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "typography": { "baseSize": 16, "scaleRatio": 1.25, "headlineFont": "Poppins" },
        "paintThemes": [{ "id": 1, "headlineColorId": "c1", "linkColorId": 2 }],
        "colors": [{ "id": "c1", "hex": "#112233" }, { "id": 2, "hex": "#ff0000" }],
        "buttons": [{ "id": "primary", "regular": { "bg": "#000", "color": "#fff" }, "borderRadius": 8 }]
    }"##;

    #[test]
    fn loose_ids_compare_as_strings() -> anyhow::Result<()> {
        let guide = Styleguide::from_json(SAMPLE)?;
        let theme = &guide.paint_themes[0];
        assert_eq!(theme.id.as_str(), "1");
        let colors = guide.theme_colors(theme);
        assert_eq!(colors.headline, "#112233");
        assert_eq!(colors.content, FALLBACK_HEX);
        assert_eq!(colors.link.as_deref(), Some("#ff0000"));
        assert_eq!(guide.button("primary").and_then(|b| b.border_radius), Some(8.0));
        Ok(())
    }

    #[test]
    fn typescale_matches_builder_presets() {
        let typography = Typography::default();
        assert_eq!(typography.preset_size(ScaleRole::Headline, "5xl"), Some(95.0));
        assert_eq!(typography.preset_size(ScaleRole::Headline, "s"), Some(20.0));
        assert_eq!(typography.preset_size(ScaleRole::Headline, "xs"), Some(16.0));
        assert_eq!(typography.preset_size(ScaleRole::Subheadline, "xs"), Some(13.0));
        assert_eq!(typography.preset_size(ScaleRole::Paragraph, "s"), Some(13.0));
        assert_eq!(typography.preset_size(ScaleRole::Paragraph, "xs"), Some(10.0));
        assert_eq!(typography.preset_size(ScaleRole::Paragraph, "m"), Some(16.0));
        assert_eq!(typography.preset_size(ScaleRole::Paragraph, "20px"), None);
        assert_eq!(typography.preset_table(ScaleRole::Headline).len(), 12);
    }
}
