use super::*;
use crate::funnel::Stage;

fn parse(yaml: &str) -> BrandingProfile {
    serde_yaml::from_str(yaml).expect("profile yaml should parse")
}

const DETAILED_PROFILE: &str = r##"
brand:
  name: Northwind
  logo:
    text: NORTHWIND
    image: assets/logo.png
  website: https://northwind.example
  telegram: "@northwind"
colors:
  primary: "#1E3A5F"
  background: "#FFFFFF"
  text_primary: "#1A1A1A"
  highlight: "#FFD700"
fonts:
  heading: Georgia
  heading_weight: 700
  size_title: 48
image:
  format: banner
  sizes:
    banner: [1500, 500]
cta:
  icon: "»"
  personalize: false
  texts:
    interest: Discover
    solution: Buy now!
    deadline: "Last chance →"
tone:
  style: dynamic
  greetings:
    dynamic: "Hey {{ name }}, ready?"
icons:
  check: "✓"
content:
  interest:
    headline: Meet Northwind
    features:
      - Plain bullet
      - icon: "✓"
        text: Checked bullet
      - icon: ""
        text: Blank icon
  solution:
    headline: The plan
    price_range: "$10"
  deadline:
    headline: Ends Friday
    urgency: Hurry
    countdown: 3
"##;

#[test]
fn parses_detailed_profile_forms() {
    let profile = parse(DETAILED_PROFILE);

    assert_eq!(profile.brand.logo.text, "NORTHWIND");
    assert_eq!(profile.brand.logo.image.as_deref(), Some("assets/logo.png"));
    assert_eq!(
        profile.brand.extra.get("telegram"),
        Some(&serde_json::Value::from("@northwind"))
    );
    assert_eq!(profile.colors.extra.get("highlight").map(String::as_str), Some("#FFD700"));
    assert_eq!(profile.fonts.heading_weight, "700");
    assert_eq!(profile.fonts.size_title, 48);
    assert_eq!(profile.fonts.size_body, 18);
    assert!(!profile.cta.personalize);

    let features = &profile.content.interest.features;
    assert_eq!(features.len(), 3);
    assert_eq!(features[0].icon, DEFAULT_BULLET);
    assert_eq!(features[0].text, "Plain bullet");
    assert_eq!(features[1].icon, "✓");
    assert_eq!(features[2].icon, DEFAULT_BULLET);

    assert_eq!(profile.content.solution.price_range.as_deref(), Some("$10"));
    assert_eq!(
        profile.content.deadline.extra.get("countdown"),
        Some(&serde_json::Value::from(3))
    );
    assert_eq!(
        profile.extra.get("icons"),
        Some(&serde_json::json!({ "check": "✓" }))
    );
    assert!(!profile.extra.contains_key("content"));
}

#[test]
fn logo_accepts_bare_string() {
    let profile = parse(&DETAILED_PROFILE.replace(
        "  logo:\n    text: NORTHWIND\n    image: assets/logo.png\n",
        "  logo: NW\n",
    ));
    assert_eq!(profile.brand.logo.text, "NW");
    assert_eq!(profile.brand.logo.image, None);
}

#[test]
fn image_size_prefers_profile_sizes() {
    let profile = parse(DETAILED_PROFILE);
    assert_eq!(profile.image_size(), (1500, 500));
}

#[test]
fn image_size_falls_back_to_builtin_table() {
    let mut profile = default_profile();
    profile.image.sizes.clear();

    profile.image.format = "square".to_string();
    assert_eq!(profile.image_size(), (800, 800));
    profile.image.format = "story".to_string();
    assert_eq!(profile.image_size(), (1080, 1920));
    profile.image.format = "wide".to_string();
    assert_eq!(profile.image_size(), (1200, 900));
    profile.image.format = "poster".to_string();
    assert_eq!(profile.image_size(), (800, 600));
}

#[test]
fn image_size_ignores_zero_dimensions() {
    let mut profile = default_profile();
    profile.image.format = "square".to_string();
    profile.image.sizes.insert("square".to_string(), [0, 0]);
    assert_eq!(profile.image_size(), (800, 800));
}

#[test]
fn greeting_substitutes_name_for_selected_style() {
    let profile = parse(DETAILED_PROFILE);
    assert_eq!(profile.greeting("Anna"), "Hey Anna, ready?");
}

#[test]
fn greeting_defaults_when_style_has_no_entry() {
    let mut profile = default_profile();
    profile.tone.style = "playful".to_string();
    assert_eq!(profile.greeting("Anna"), "Anna, good afternoon!");
}

#[test]
fn greeting_does_not_evaluate_other_template_syntax() {
    let mut profile = default_profile();
    profile
        .tone
        .greetings
        .insert("friendly".to_string(), "{{ company }} welcomes {{ name }}".to_string());
    assert_eq!(profile.greeting("Anna"), "{{ company }} welcomes Anna");
}

#[test]
fn cta_text_appends_icon_once() {
    let profile = parse(DETAILED_PROFILE);
    assert_eq!(profile.cta_text(Stage::Interest), "Discover »");
}

#[test]
fn cta_text_keeps_terminal_punctuation_and_arrows() {
    let profile = parse(DETAILED_PROFILE);
    assert_eq!(profile.cta_text(Stage::Solution), "Buy now!");
    assert_eq!(profile.cta_text(Stage::Deadline), "Last chance →");
}

#[test]
fn cta_text_defaults_when_stage_missing() {
    let mut profile = default_profile();
    profile.cta.texts.clear();
    assert_eq!(profile.cta_text(Stage::Solution), "Learn more →");
}

#[test]
fn cta_text_without_icon_is_unchanged() {
    let mut profile = default_profile();
    profile.cta.icon = String::new();
    assert_eq!(profile.cta_text(Stage::Interest), "Learn more");
}

#[test]
fn default_profile_cta_texts() {
    let profile = default_profile();
    assert_eq!(profile.cta_text(Stage::Interest), "Learn more →");
    assert_eq!(profile.cta_text(Stage::Solution), "Get the program →");
    assert_eq!(profile.cta_text(Stage::Deadline), "Sign up now →");
}

#[test]
fn website_falls_back_when_blank_or_missing() {
    let mut profile = default_profile();
    assert_eq!(profile.website(), "https://knowyourself.example");

    profile.brand.website = Some("  ".to_string());
    assert_eq!(profile.website(), "https://example.com");

    profile.brand.website = None;
    assert_eq!(profile.website(), "https://example.com");
}

#[test]
fn content_for_stage_selects_matching_block() {
    let profile = default_profile();
    assert_eq!(
        profile.content.for_stage(Stage::Deadline).urgency.as_deref(),
        Some("Only 10 places available!")
    );
    assert_eq!(
        profile.content.for_stage(Stage::Interest).headline,
        "Discover the depth within"
    );
}
