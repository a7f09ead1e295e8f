use std::path::{Path, PathBuf};

use funnel_core::profile::default_profile;
use serde_json::json;

use super::*;

fn repo_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(name)
}

fn anna() -> Recipient {
    Recipient {
        name: "Anna".to_string(),
        role: "Founder".to_string(),
        company: "Acme".to_string(),
        telegram_id: 555,
        variant: Variant::B,
    }
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("funnel-render-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn inline(template: &str) -> TemplateSet {
    TemplateSet::from_sources(&[("interest_a.html", template)], Path::new(".")).unwrap()
}

#[test]
fn template_names_follow_stage_variant() {
    assert_eq!(template_name(Stage::Deadline, Variant::C), "deadline_c.html");
}

#[test]
fn repository_templates_cover_every_pair() {
    let set = TemplateSet::load(&repo_dir("templates"), &repo_dir(".")).unwrap();
    assert!(set.missing_funnel_templates().is_empty());
}

#[test]
fn every_repository_template_contains_name_greeting_and_cta() {
    let set = TemplateSet::load(&repo_dir("templates"), &repo_dir(".")).unwrap();
    let profile = default_profile();
    let recipient = anna();

    for stage in Stage::ALL {
        for variant in Variant::ALL {
            let html = set
                .render(stage, variant, &recipient, &profile)
                .unwrap_or_else(|e| panic!("{stage}_{variant}: {e}"));
            assert!(html.contains("Anna"), "{stage}_{variant} lacks name");
            assert!(
                html.contains("Anna, good afternoon!"),
                "{stage}_{variant} lacks greeting"
            );
            assert!(
                html.contains(&profile.cta_text(stage)),
                "{stage}_{variant} lacks cta text"
            );
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let set = TemplateSet::load(&repo_dir("templates"), &repo_dir(".")).unwrap();
    let profile = default_profile();
    let first = set
        .render(Stage::Solution, Variant::A, &anna(), &profile)
        .unwrap();
    let second = set
        .render(Stage::Solution, Variant::A, &anna(), &profile)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_template_is_reported_by_name() {
    let set = inline("{{ name }}");
    let err = set
        .render(Stage::Deadline, Variant::B, &anna(), &default_profile())
        .unwrap_err();
    assert!(
        matches!(err, RenderError::TemplateNotFound { ref name } if name == "deadline_b.html"),
        "got: {err:?}"
    );
    assert_eq!(
        set.missing_funnel_templates().len(),
        8,
        "only interest_a is loaded"
    );
}

#[test]
fn undefined_variable_names_stage_and_variant() {
    let set = inline("{{ no_such_value }}");
    let err = set
        .render(Stage::Interest, Variant::A, &anna(), &default_profile())
        .unwrap_err();
    assert!(matches!(err, RenderError::Template { .. }), "got: {err:?}");
    let message = err.to_string();
    assert!(message.contains("interest_a"), "got: {message}");
    assert!(message.contains("no_such_value"), "got: {message}");
}

#[test]
fn context_exposes_stage_content_and_computed_copy() {
    let set = inline(
        "{{ stage }}|{{ variant }}|{{ content.headline }}|{{ cta_text }}|{{ brand.logo.text }}|{{ role }} at {{ company }}",
    );
    let out = set
        .render(Stage::Interest, Variant::A, &anna(), &default_profile())
        .unwrap();
    assert_eq!(
        out,
        "interest|a|Discover the depth within|Learn more →|KNOW YOURSELF|Founder at Acme"
    );
}

#[test]
fn content_is_narrowed_to_current_stage() {
    let set = inline("{% if content.urgency %}{{ content.urgency }}{% else %}none{% endif %}");
    let out = set
        .render(Stage::Interest, Variant::A, &anna(), &default_profile())
        .unwrap();
    assert_eq!(out, "none");
}

#[test]
fn greeting_placeholder_is_not_reevaluated() {
    let mut profile = default_profile();
    profile
        .tone
        .greetings
        .insert("friendly".to_string(), "Hi {{ name }} from {{ company }}".to_string());
    let out = inline("{{ greeting }}")
        .render(Stage::Interest, Variant::A, &anna(), &profile)
        .unwrap();
    assert_eq!(out, "Hi Anna from {{ company }}");
}

#[test]
fn asset_paths_resolve_to_existing_files_only() {
    let root = scratch_dir();
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/logo.png"), b"png").unwrap();

    let brand = json!({
        "name": "Acme",
        "logo": { "text": "ACME", "image": "assets/logo.png" },
        "banner": "assets/missing.png",
        "website": "https://acme.example/assets/x.png",
        "count": 3
    });
    let resolved = resolve_asset_paths(brand, &root);

    let logo = resolved["logo"]["image"].as_str().unwrap();
    assert!(logo.starts_with("file://"), "got: {logo}");
    assert!(logo.ends_with("assets/logo.png"), "got: {logo}");
    assert_eq!(resolved["banner"], "assets/missing.png");
    assert_eq!(resolved["website"], "https://acme.example/assets/x.png");
    assert_eq!(resolved["count"], 3);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn recipient_fields_are_not_asset_resolved() {
    let root = scratch_dir();
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::write(root.join("assets/me.png"), b"png").unwrap();

    let mut recipient = anna();
    recipient.company = "assets/me.png".to_string();
    let set = TemplateSet::from_sources(&[("interest_a.html", "{{ company }}")], &root).unwrap();
    let out = set
        .render(Stage::Interest, Variant::A, &recipient, &default_profile())
        .unwrap();
    assert_eq!(out, "assets/me.png");

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn repository_templates_keep_names_verbatim() {
    let set = TemplateSet::load(&repo_dir("templates"), &repo_dir(".")).unwrap();
    let mut recipient = anna();
    recipient.name = "O'Brien & Sons".to_string();
    let profile = default_profile();

    for variant in Variant::ALL {
        let html = set
            .render(Stage::Interest, variant, &recipient, &profile)
            .unwrap();
        assert!(html.contains("O'Brien & Sons, good afternoon!"), "interest_{variant}: {html}");
        assert!(!html.contains("&amp;"), "interest_{variant} escaped the name");
    }
}

#[test]
fn extra_profile_sections_reach_templates() {
    let mut profile = default_profile();
    profile
        .extra
        .insert("banner".to_string(), json!({ "text": "Spring sale" }));
    profile
        .extra
        .insert("name".to_string(), json!("shadowed"));

    let out = inline("{{ banner.text }}|{{ name }}")
        .render(Stage::Interest, Variant::A, &anna(), &profile)
        .unwrap();
    assert_eq!(out, "Spring sale|Anna");
}
