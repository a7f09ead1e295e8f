use std::collections::BTreeMap;

use super::types::{
    BrandSection, BrandingProfile, CardSettings, ColorPalette, CtaSettings, Feature, FontSettings,
    FunnelContent, ImageSettings, Logo, StageContent, ToneSettings,
};

fn strings<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn features(items: &[&str]) -> Vec<Feature> {
    items.iter().map(|t| Feature::from(*t)).collect()
}

/// The hard-coded profile used when no profile file can be loaded.
///
/// Fully populated: every section and every stage has content.
#[must_use]
pub fn default_profile() -> BrandingProfile {
    BrandingProfile {
        brand: BrandSection {
            name: "Know Yourself".to_string(),
            logo: Logo {
                text: "KNOW YOURSELF".to_string(),
                image: None,
            },
            tagline: "The way to yourself starts here".to_string(),
            website: Some("https://knowyourself.example".to_string()),
            extra: [(
                "telegram".to_string(),
                serde_json::Value::from("@knowyourself"),
            )]
            .into_iter()
            .collect(),
        },
        colors: ColorPalette {
            primary: "#4A4F46".to_string(),
            background: "#F5F3EF".to_string(),
            text_primary: "#4A4F46".to_string(),
            secondary: "#A38DA2".to_string(),
            accent: "#8CA29B".to_string(),
            background_alt: "#E3D6C4".to_string(),
            text_secondary: "#6B7064".to_string(),
            button_bg: "#8CA29B".to_string(),
            button_text: "#FFFFFF".to_string(),
            border: "#D4CFC7".to_string(),
            extra: strings([
                ("text_light", "#FFFFFF"),
                ("button_hover", "#7A9189"),
                ("shadow", "rgba(74, 79, 70, 0.1)"),
            ]),
        },
        fonts: FontSettings {
            heading: "Cormorant Garamond".to_string(),
            heading_weight: "600".to_string(),
            body: "Inter".to_string(),
            body_weight: "400".to_string(),
            size_title: 36,
            size_subtitle: 24,
            size_body: 18,
            size_small: 14,
            size_button: 16,
            line_height: 1.6,
            file: None,
        },
        image: ImageSettings {
            format: "wide".to_string(),
            sizes: [
                ("square".to_string(), [800, 800]),
                ("wide".to_string(), [1200, 630]),
                ("story".to_string(), [1080, 1920]),
                ("compact".to_string(), [800, 600]),
            ]
            .into_iter()
            .collect(),
            quality: 95,
            dpi: 144,
        },
        card: CardSettings {
            border_radius: 16,
            padding: 40,
            shadow: "soft".to_string(),
            border_width: 0,
            background_type: "gradient".to_string(),
            gradient_direction: "to bottom right".to_string(),
            gradient_colors: vec!["#F5F3EF".to_string(), "#E3D6C4".to_string()],
        },
        cta: CtaSettings {
            style: "rounded".to_string(),
            icon: "→".to_string(),
            shadow: true,
            texts: strings([
                ("interest", "Learn more"),
                ("solution", "Get the program"),
                ("deadline", "Sign up now"),
            ]),
            personalize: true,
        },
        tone: ToneSettings {
            style: "friendly".to_string(),
            greetings: strings([
                ("formal", "Dear {{ name }},"),
                ("friendly", "{{ name }}, good afternoon!"),
                ("dynamic", "{{ name }}, this is your moment!"),
            ]),
            calls_to_action: strings([
                ("formal", "We will be glad to see you in the program"),
                ("friendly", "Join us on the journey to yourself"),
                ("dynamic", "Act right now!"),
            ]),
        },
        social: strings([
            ("telegram", "@knowyourself"),
            ("instagram", "@know.yourself"),
            ("website", "https://knowyourself.example"),
            ("email", "hello@knowyourself.example"),
        ]),
        content: FunnelContent {
            interest: StageContent {
                headline: "Discover the depth within".to_string(),
                subheadline: "Self-discovery starts with the first step".to_string(),
                features: features(&["Personal approach", "Safe space", "Deep insights"]),
                ..StageContent::default()
            },
            solution: StageContent {
                headline: "Your transformation program".to_string(),
                subheadline: "One-on-one sessions with an expert".to_string(),
                features: features(&[
                    "5-10 personal sessions",
                    "PDF reports with insights",
                    "Support between sessions",
                ]),
                ..StageContent::default()
            },
            deadline: StageContent {
                headline: "Only a few places left".to_string(),
                subheadline: "Start your journey today".to_string(),
                urgency: Some("Only 10 places available!".to_string()),
                price_range: Some("$300 - $900".to_string()),
                ..StageContent::default()
            },
        },
        extra: BTreeMap::new(),
    }
}
