//! Branding profiles: the typed document, the built-in default, and the
//! on-disk profile store.

mod builtin;
mod store;
mod types;
mod validate;

pub use builtin::default_profile;
pub use store::{
    list_available, load_profile, load_profile_file, resolve_profile_path, LoadedProfile,
    ProfileSource, FALLBACK_PROFILE,
};
pub use types::{
    default_image_size, BrandSection, BrandingProfile, CardSettings, ColorPalette, CtaSettings,
    Feature, FontSettings, FunnelContent, ImageSettings, Logo, StageContent, ToneSettings,
    DEFAULT_BULLET, KNOWN_IMAGE_FORMATS,
};
pub use validate::{parse_hex_color, validate_profile};

use crate::funnel::Stage;

const NAME_PLACEHOLDER: &str = "{{ name }}";
const DEFAULT_GREETING: &str = "{{ name }}, good afternoon!";
const DEFAULT_CTA: &str = "Learn more →";
const DEFAULT_WEBSITE: &str = "https://example.com";

impl BrandingProfile {
    /// Pixel size of the rendered image for this profile.
    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        self.image.size()
    }

    /// Greeting for `name` in the profile's tone.
    ///
    /// Only the literal `{{ name }}` placeholder is substituted; the greeting is
    /// not evaluated as a template.
    #[must_use]
    pub fn greeting(&self, name: &str) -> String {
        self.tone
            .greetings
            .get(&self.tone.style)
            .map_or(DEFAULT_GREETING, String::as_str)
            .replace(NAME_PLACEHOLDER, name)
    }

    /// Call-to-action copy for `stage`.
    ///
    /// Text that already ends in `!`/`?` or carries an arrow is returned as-is;
    /// otherwise the profile icon is appended once.
    #[must_use]
    pub fn cta_text(&self, stage: Stage) -> String {
        let text = self
            .cta
            .texts
            .get(stage.as_str())
            .map_or(DEFAULT_CTA, String::as_str);

        if text.contains('→') || text.contains('←') || text.ends_with('!') || text.ends_with('?')
        {
            return text.to_string();
        }

        let icon = self.cta.icon.as_str();
        if !icon.is_empty() && !text.contains(icon) {
            return format!("{text} {icon}");
        }
        text.to_string()
    }

    /// Base URL that chat buttons link to.
    #[must_use]
    pub fn website(&self) -> &str {
        self.brand
            .website
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .unwrap_or(DEFAULT_WEBSITE)
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
