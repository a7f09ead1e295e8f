//! Template rendering: one HTML document per (stage, variant, recipient).

use std::path::{Path, PathBuf};

use funnel_core::profile::BrandingProfile;
use funnel_core::{Recipient, Stage, Variant};
use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{describe_tera, RenderError};

/// Brand values starting with this prefix are asset references.
pub const ASSET_PREFIX: &str = "assets/";

/// File name of the template for a (stage, variant) pair.
#[must_use]
pub fn template_name(stage: Stage, variant: Variant) -> String {
    format!("{stage}_{variant}.html")
}

/// The loaded funnel templates plus the directory asset paths resolve against.
pub struct TemplateSet {
    tera: Tera,
    assets_root: PathBuf,
}

impl TemplateSet {
    /// Load every `*.html` template under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateLoad`] if a template fails to parse.
    pub fn load(dir: &Path, assets_root: &Path) -> Result<Self, RenderError> {
        let glob = format!("{}/**/*.html", dir.display());
        let mut tera = Tera::new(&glob).map_err(|e| RenderError::TemplateLoad {
            dir: dir.display().to_string(),
            detail: describe_tera(&e),
            source: e,
        })?;
        // Names and copy are substituted verbatim.
        tera.autoescape_on(vec![]);
        tracing::debug!(
            dir = %dir.display(),
            count = tera.get_template_names().count(),
            "loaded templates"
        );
        Ok(Self {
            tera,
            assets_root: assets_root.to_path_buf(),
        })
    }

    /// Build a set from in-memory `(name, source)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateLoad`] if a template fails to parse.
    pub fn from_sources(
        sources: &[(&str, &str)],
        assets_root: &Path,
    ) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_templates(sources.iter().copied())
            .map_err(|e| RenderError::TemplateLoad {
                dir: "<memory>".to_string(),
                detail: describe_tera(&e),
                source: e,
            })?;
        Ok(Self {
            tera,
            assets_root: assets_root.to_path_buf(),
        })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// The (stage, variant) templates that are not loaded.
    #[must_use]
    pub fn missing_funnel_templates(&self) -> Vec<String> {
        Stage::ALL
            .iter()
            .flat_map(|s| Variant::ALL.iter().map(move |v| template_name(*s, *v)))
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Render the document for one recipient at one stage.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateNotFound`] when the stage/variant template
    /// is absent, or [`RenderError::Template`] when substitution fails.
    pub fn render(
        &self,
        stage: Stage,
        variant: Variant,
        recipient: &Recipient,
        profile: &BrandingProfile,
    ) -> Result<String, RenderError> {
        let name = template_name(stage, variant);
        if !self.contains(&name) {
            return Err(RenderError::TemplateNotFound { name });
        }

        let context = build_context(stage, variant, recipient, profile, &self.assets_root)?;
        self.tera
            .render(&name, &context)
            .map_err(|e| RenderError::Template {
                stage: stage.to_string(),
                variant: variant.to_string(),
                detail: describe_tera(&e),
                source: e,
            })
    }
}

/// Assemble the substitution context for one document.
///
/// # Errors
///
/// Returns [`RenderError::Context`] if a profile section cannot be serialized.
pub fn build_context(
    stage: Stage,
    variant: Variant,
    recipient: &Recipient,
    profile: &BrandingProfile,
    assets_root: &Path,
) -> Result<Context, RenderError> {
    let mut context = Context::new();

    // Extra profile sections go in first so the standard keys win on collision.
    for (key, value) in &profile.extra {
        context.insert(key.as_str(), value);
    }

    context.insert("name", &recipient.name);
    context.insert("role", &recipient.role);
    context.insert("company", &recipient.company);
    context.insert("telegram_id", &recipient.telegram_id);

    let brand = serde_json::to_value(&profile.brand)?;
    context.insert("brand", &resolve_asset_paths(brand, assets_root));

    context.insert("colors", &profile.colors);
    context.insert("fonts", &profile.fonts);
    context.insert("social", &profile.social);
    context.insert("card", &profile.card);
    context.insert("cta", &profile.cta);
    context.insert("image", &profile.image);
    context.insert("tone", &profile.tone);
    context.insert("content", profile.content.for_stage(stage));

    context.insert("greeting", &profile.greeting(&recipient.name));
    context.insert("cta_text", &profile.cta_text(stage));
    context.insert("stage", stage.as_str());
    context.insert("variant", variant.as_str());

    Ok(context)
}

/// Rewrite `assets/...` strings to absolute `file://` URLs.
///
/// Recurses into nested mappings. Strings without the prefix, and prefixed
/// strings whose file does not exist under `assets_root`, are left as-is.
#[must_use]
pub fn resolve_asset_paths(value: Value, assets_root: &Path) -> Value {
    match value {
        Value::String(s) if s.starts_with(ASSET_PREFIX) => {
            Value::String(resolve_asset(&s, assets_root).unwrap_or(s))
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, resolve_asset_paths(v, assets_root)))
                .collect(),
        ),
        other => other,
    }
}

fn resolve_asset(relative: &str, assets_root: &Path) -> Option<String> {
    let path = assets_root.join(relative);
    if !path.is_file() {
        tracing::debug!(asset = relative, "asset not found; leaving path unchanged");
        return None;
    }
    let absolute = std::fs::canonicalize(&path).ok()?;
    Some(format!("file://{}", absolute.display()))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
