use super::types::{BrandingProfile, KNOWN_IMAGE_FORMATS};

/// Parse `#RGB` or `#RRGGBB` (leading `#` optional) into an RGB triple.
#[must_use]
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let mut out = [0u8; 3];
            for (slot, c) in out.iter_mut().zip(hex.chars()) {
                let v = u8::try_from(c.to_digit(16)?).ok()?;
                *slot = v * 16 + v;
            }
            Some(out)
        }
        _ => None,
    }
}

/// Semantic checks that deserialization cannot express.
///
/// Returns every problem found; an empty list means the profile is usable.
#[must_use]
pub fn validate_profile(profile: &BrandingProfile) -> Vec<String> {
    let mut problems = Vec::new();

    if profile.brand.name.trim().is_empty() {
        problems.push("brand.name must be non-empty".to_string());
    }
    if profile.brand.logo.text.trim().is_empty() {
        problems.push("brand.logo must have text".to_string());
    }

    let colors = &profile.colors;
    for (role, value) in [
        ("primary", &colors.primary),
        ("background", &colors.background),
        ("text_primary", &colors.text_primary),
    ] {
        if parse_hex_color(value).is_none() {
            problems.push(format!("colors.{role} '{value}' is not a hex color"));
        }
    }

    for (format, [w, h]) in &profile.image.sizes {
        if *w == 0 || *h == 0 {
            problems.push(format!("image.sizes.{format} must be positive, got {w}x{h}"));
        }
    }
    if !profile.image.sizes.contains_key(&profile.image.format)
        && !KNOWN_IMAGE_FORMATS.contains(&profile.image.format.as_str())
    {
        problems.push(format!(
            "image.format '{}' has no entry in image.sizes",
            profile.image.format
        ));
    }

    for (role, size) in [
        ("size_title", profile.fonts.size_title),
        ("size_subtitle", profile.fonts.size_subtitle),
        ("size_body", profile.fonts.size_body),
    ] {
        if size == 0 {
            problems.push(format!("fonts.{role} must be positive"));
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex_color("#F5F3EF"), Some([0xF5, 0xF3, 0xEF]));
        assert_eq!(parse_hex_color("8ca29b"), Some([0x8C, 0xA2, 0x9B]));
        assert_eq!(parse_hex_color("#fff"), Some([255, 255, 255]));
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(parse_hex_color("rgba(0,0,0,0.1)"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#ÀÀÀ"), None);
    }

    #[test]
    fn default_profile_is_valid() {
        assert!(validate_profile(&default_profile()).is_empty());
    }

    #[test]
    fn reports_each_problem() {
        let mut profile = default_profile();
        profile.brand.name = " ".to_string();
        profile.colors.primary = "blue".to_string();
        profile.image.sizes.insert("wide".to_string(), [0, 630]);

        let problems = validate_profile(&profile);
        assert_eq!(problems.len(), 3, "got: {problems:?}");
        assert!(problems.iter().any(|p| p.contains("brand.name")));
        assert!(problems.iter().any(|p| p.contains("colors.primary")));
        assert!(problems.iter().any(|p| p.contains("image.sizes.wide")));
    }

    #[test]
    fn optional_colors_accept_css_values() {
        let mut profile = default_profile();
        profile.colors.button_bg = "rgba(0, 120, 255, 0.9)".to_string();
        profile.colors.background_alt = "transparent".to_string();
        assert!(validate_profile(&profile).is_empty());
    }

    #[test]
    fn unknown_format_without_size_entry_is_a_problem() {
        let mut profile = default_profile();
        profile.image.format = "banner".to_string();
        let problems = validate_profile(&profile);
        assert!(problems.iter().any(|p| p.contains("image.format 'banner'")));

        profile
            .image
            .sizes
            .insert("banner".to_string(), [1500, 500]);
        assert!(validate_profile(&profile).is_empty());
    }
}
