//! Typed model of a branding profile document.
//!
//! Sections the renderer cannot work without (`brand`, `colors`, `fonts`,
//! `image`, `cta`, `tone`, `content`) are required by deserialization, so a
//! profile missing one fails at load time. Everything inside a section has a
//! default taken from the built-in profile, and unknown keys in open-ended
//! sections are preserved in `extra` maps so templates can still reach them.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::funnel::Stage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandingProfile {
    pub brand: BrandSection,
    pub colors: ColorPalette,
    pub fonts: FontSettings,
    pub image: ImageSettings,
    #[serde(default)]
    pub card: CardSettings,
    pub cta: CtaSettings,
    pub tone: ToneSettings,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
    pub content: FunnelContent,
    /// Extra top-level sections (`banner`, `icons`, ...) passed to templates as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSection {
    pub name: String,
    pub logo: Logo,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Handles and any other brand keys (`telegram`, `instagram`, asset paths).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Brand logo. Profiles may give a bare string or a `{text, image}` mapping;
/// templates always see the mapping form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LogoRepr")]
pub struct Logo {
    pub text: String,
    pub image: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogoRepr {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        image: Option<String>,
    },
}

impl From<LogoRepr> for Logo {
    fn from(repr: LogoRepr) -> Self {
        match repr {
            LogoRepr::Text(text) => Logo { text, image: None },
            LogoRepr::Detailed { text, image } => Logo { text, image },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub background: String,
    pub text_primary: String,
    #[serde(default = "defaults::secondary")]
    pub secondary: String,
    #[serde(default = "defaults::accent")]
    pub accent: String,
    #[serde(default = "defaults::background_alt")]
    pub background_alt: String,
    #[serde(default = "defaults::text_secondary")]
    pub text_secondary: String,
    #[serde(default = "defaults::button_bg")]
    pub button_bg: String,
    #[serde(default = "defaults::button_text")]
    pub button_text: String,
    #[serde(default = "defaults::border")]
    pub border: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSettings {
    #[serde(default = "defaults::heading_font")]
    pub heading: String,
    #[serde(default = "defaults::heading_weight", deserialize_with = "string_or_number")]
    pub heading_weight: String,
    #[serde(default = "defaults::body_font")]
    pub body: String,
    #[serde(default = "defaults::body_weight", deserialize_with = "string_or_number")]
    pub body_weight: String,
    #[serde(default = "defaults::size_title")]
    pub size_title: u32,
    #[serde(default = "defaults::size_subtitle")]
    pub size_subtitle: u32,
    #[serde(default = "defaults::size_body")]
    pub size_body: u32,
    #[serde(default = "defaults::size_small")]
    pub size_small: u32,
    #[serde(default = "defaults::size_button")]
    pub size_button: u32,
    #[serde(default = "defaults::line_height")]
    pub line_height: f32,
    /// Optional font file used by the canvas renderer, relative to the assets root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSettings {
    #[serde(default = "defaults::image_format")]
    pub format: String,
    #[serde(default)]
    pub sizes: BTreeMap<String, [u32; 2]>,
    #[serde(default = "defaults::quality")]
    pub quality: u8,
    #[serde(default = "defaults::dpi")]
    pub dpi: u32,
}

impl ImageSettings {
    /// Pixel size for the selected format.
    ///
    /// Uses the profile's own `sizes` entry when it has one with positive
    /// dimensions, otherwise the built-in table for that format name.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        match self.sizes.get(&self.format) {
            Some(&[w, h]) if w > 0 && h > 0 => (w, h),
            _ => default_image_size(&self.format),
        }
    }
}

/// Built-in pixel sizes by format name; unknown names get 800x600.
#[must_use]
pub fn default_image_size(format: &str) -> (u32, u32) {
    match format {
        "square" => (800, 800),
        "wide" => (1200, 900),
        "story" => (1080, 1920),
        _ => (800, 600),
    }
}

/// Format names the built-in size table knows about.
pub const KNOWN_IMAGE_FORMATS: [&str; 4] = ["square", "wide", "story", "compact"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSettings {
    #[serde(default = "defaults::border_radius")]
    pub border_radius: u32,
    #[serde(default = "defaults::padding")]
    pub padding: u32,
    #[serde(default = "defaults::shadow")]
    pub shadow: String,
    #[serde(default)]
    pub border_width: u32,
    #[serde(default = "defaults::background_type")]
    pub background_type: String,
    #[serde(default = "defaults::gradient_direction")]
    pub gradient_direction: String,
    #[serde(default)]
    pub gradient_colors: Vec<String>,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            border_radius: defaults::border_radius(),
            padding: defaults::padding(),
            shadow: defaults::shadow(),
            border_width: 0,
            background_type: defaults::background_type(),
            gradient_direction: defaults::gradient_direction(),
            gradient_colors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaSettings {
    #[serde(default = "defaults::cta_style")]
    pub style: String,
    #[serde(default = "defaults::cta_icon")]
    pub icon: String,
    #[serde(default = "defaults::yes")]
    pub shadow: bool,
    /// Button copy keyed by stage name.
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    /// Append the recipient's name to the chat button label.
    #[serde(default = "defaults::yes")]
    pub personalize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneSettings {
    #[serde(default = "defaults::tone_style")]
    pub style: String,
    #[serde(default)]
    pub greetings: BTreeMap<String, String>,
    #[serde(default)]
    pub calls_to_action: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelContent {
    pub interest: StageContent,
    pub solution: StageContent,
    pub deadline: StageContent,
}

impl FunnelContent {
    #[must_use]
    pub fn for_stage(&self, stage: Stage) -> &StageContent {
        match stage {
            Stage::Interest => &self.interest,
            Stage::Solution => &self.solution,
            Stage::Deadline => &self.deadline,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageContent {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One feature bullet. Profiles may write a bare string or `{icon, text}`;
/// a missing icon becomes the default bullet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeatureRepr")]
pub struct Feature {
    pub icon: String,
    pub text: String,
}

pub const DEFAULT_BULLET: &str = "•";

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureRepr {
    Plain(String),
    Detailed {
        #[serde(default)]
        icon: Option<String>,
        text: String,
    },
}

impl From<FeatureRepr> for Feature {
    fn from(repr: FeatureRepr) -> Self {
        match repr {
            FeatureRepr::Plain(text) => Feature {
                icon: DEFAULT_BULLET.to_string(),
                text,
            },
            FeatureRepr::Detailed { icon, text } => Feature {
                icon: icon
                    .filter(|i| !i.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BULLET.to_string()),
                text,
            },
        }
    }
}

impl From<&str> for Feature {
    fn from(text: &str) -> Self {
        FeatureRepr::Plain(text.to_string()).into()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

mod defaults {
    pub(super) fn secondary() -> String {
        "#A38DA2".to_string()
    }
    pub(super) fn accent() -> String {
        "#8CA29B".to_string()
    }
    pub(super) fn background_alt() -> String {
        "#E3D6C4".to_string()
    }
    pub(super) fn text_secondary() -> String {
        "#6B7064".to_string()
    }
    pub(super) fn button_bg() -> String {
        "#8CA29B".to_string()
    }
    pub(super) fn button_text() -> String {
        "#FFFFFF".to_string()
    }
    pub(super) fn border() -> String {
        "#D4CFC7".to_string()
    }
    pub(super) fn heading_font() -> String {
        "Cormorant Garamond".to_string()
    }
    pub(super) fn heading_weight() -> String {
        "600".to_string()
    }
    pub(super) fn body_font() -> String {
        "Inter".to_string()
    }
    pub(super) fn body_weight() -> String {
        "400".to_string()
    }
    pub(super) fn size_title() -> u32 {
        42
    }
    pub(super) fn size_subtitle() -> u32 {
        26
    }
    pub(super) fn size_body() -> u32 {
        18
    }
    pub(super) fn size_small() -> u32 {
        14
    }
    pub(super) fn size_button() -> u32 {
        16
    }
    pub(super) fn line_height() -> f32 {
        1.6
    }
    pub(super) fn image_format() -> String {
        "wide".to_string()
    }
    pub(super) fn quality() -> u8 {
        95
    }
    pub(super) fn dpi() -> u32 {
        144
    }
    pub(super) fn border_radius() -> u32 {
        16
    }
    pub(super) fn padding() -> u32 {
        48
    }
    pub(super) fn shadow() -> String {
        "soft".to_string()
    }
    pub(super) fn background_type() -> String {
        "gradient".to_string()
    }
    pub(super) fn gradient_direction() -> String {
        "to bottom right".to_string()
    }
    pub(super) fn cta_style() -> String {
        "rounded".to_string()
    }
    pub(super) fn cta_icon() -> String {
        "→".to_string()
    }
    pub(super) fn tone_style() -> String {
        "friendly".to_string()
    }
    pub(super) fn yes() -> bool {
        true
    }
}
