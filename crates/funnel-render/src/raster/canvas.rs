//! Canvas rendering: draws a simplified promo card from the profile alone,
//! without looking at the HTML document.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use funnel_core::profile::{parse_hex_color, BrandingProfile};

use super::{ensure_dir, RasterJob, Rasterizer};
use crate::error::RenderError;

/// Face bundled into the binary so text renders on hosts without fonts.
static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const EMBEDDED_FAMILY: &str = "DejaVu Sans";
const MAX_FEATURES: usize = 3;
const BUTTON_HEIGHT: u32 = 50;
const BUTTON_RADIUS: u32 = 25;
const BUTTON_LABEL: &str = "#FFFFFF";

pub struct CanvasRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
    family: String,
}

impl CanvasRasterizer {
    /// Build a canvas renderer over the system fonts plus `font_file`.
    ///
    /// A missing or unreadable `font_file` logs a warning and falls back to the
    /// embedded face.
    #[must_use]
    pub fn new(font_file: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_database(db, font_file)
    }

    /// Build over `db` as given, adding the embedded face and `font_file`.
    pub(crate) fn with_database(mut db: usvg::fontdb::Database, font_file: Option<&Path>) -> Self {
        db.load_font_data(EMBEDDED_FONT.to_vec());

        let family = font_file
            .and_then(|path| load_font_family(&mut db, path))
            .unwrap_or_else(|| EMBEDDED_FAMILY.to_string());

        Self {
            fontdb: Arc::new(db),
            family,
        }
    }

    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }
}

impl Rasterizer for CanvasRasterizer {
    fn describe(&self) -> String {
        format!("canvas ({})", self.family)
    }

    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError> {
        let (width, height) = job.size();
        let svg = scene_svg(job, &self.family);

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            RenderError::Raster(format!("cannot allocate {width}x{height} canvas"))
        })?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let rgba: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        ensure_dir(job.output_dir)?;
        let dest = job.output_path();
        image::save_buffer_with_format(
            &dest,
            &rgba,
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(dest)
    }
}

/// SVG source of the card for `job`, drawn top to bottom.
pub(crate) fn scene_svg(job: &RasterJob<'_>, family: &str) -> String {
    let profile = job.profile;
    let (width, height) = job.size();
    let colors = Palette::from_profile(profile);
    let fonts = &profile.fonts;
    let pad = profile.card.padding;
    let content = profile.content.for_stage(job.stage);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = write!(
        svg,
        r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
        colors.background, colors.background_alt
    );
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{width}" height="{height}" fill="url(#bg)"/>"#
    );

    let mut scene = Scene {
        svg,
        family: escape(family),
        x: pad,
    };
    let mut y = pad;

    scene.text(
        y,
        fonts.size_title,
        &fonts.heading_weight,
        &colors.primary,
        &profile.brand.logo.text,
    );
    y = advance(y, fonts.size_title, 20);

    scene.text(
        y,
        fonts.size_subtitle,
        &fonts.body_weight,
        &colors.text_primary,
        &profile.greeting(&job.recipient.name),
    );
    y = advance(y, fonts.size_subtitle, 30);

    if !content.headline.is_empty() {
        scene.text(
            y,
            fonts.size_subtitle,
            &fonts.heading_weight,
            &colors.secondary,
            &content.headline,
        );
        y = advance(y, fonts.size_subtitle, 15);
    }

    if !content.subheadline.is_empty() {
        scene.text(
            y,
            fonts.size_body,
            &fonts.body_weight,
            &colors.text_secondary,
            &content.subheadline,
        );
        y = advance(y, fonts.size_body, 25);
    }

    for feature in content.features.iter().take(MAX_FEATURES) {
        let line = format!("{} {}", feature.icon, feature.text);
        scene.text(
            y,
            fonts.size_body,
            &fonts.body_weight,
            &colors.text_primary,
            &line,
        );
        y = advance(y, fonts.size_body, 12);
    }

    let cta = profile.cta_text(job.stage);
    let button_y = height.saturating_sub(pad.saturating_add(70));
    let button_width = button_width(&cta);
    let _ = write!(
        scene.svg,
        r#"<rect x="{pad}" y="{button_y}" width="{button_width}" height="{BUTTON_HEIGHT}" rx="{BUTTON_RADIUS}" fill="{}"/>"#,
        colors.button_bg
    );
    scene.x = pad.saturating_add(30);
    scene.text(
        button_y.saturating_add(12),
        fonts.size_button,
        &fonts.body_weight,
        BUTTON_LABEL,
        &cta,
    );

    scene.x = pad;
    scene.text(
        height.saturating_sub(pad.saturating_add(10)),
        fonts.size_small,
        &fonts.body_weight,
        &colors.text_secondary,
        &profile.brand.tagline,
    );

    scene.svg.push_str("</svg>");
    scene.svg
}

/// Next line's top edge after a line of `size` and a `gap`.
fn advance(y: u32, size: u32, gap: u32) -> u32 {
    y.saturating_add(size).saturating_add(gap)
}

/// Button width grows with the label: 12px per character plus 60px of padding.
pub(crate) fn button_width(label: &str) -> u32 {
    let chars = u32::try_from(label.chars().count()).unwrap_or(u32::MAX);
    chars.saturating_mul(12).saturating_add(60)
}

struct Scene {
    svg: String,
    family: String,
    x: u32,
}

impl Scene {
    /// Text whose top edge sits at `top`.
    fn text(&mut self, top: u32, size: u32, weight: &str, fill: &str, content: &str) {
        if content.is_empty() {
            return;
        }
        let baseline = top.saturating_add(size);
        let _ = write!(
            self.svg,
            r#"<text x="{}" y="{baseline}" font-family="'{}', sans-serif" font-size="{size}" font-weight="{}" fill="{fill}">{}</text>"#,
            self.x,
            self.family,
            escape(weight),
            escape(content)
        );
    }
}

/// Profile colors normalized to `#RRGGBB`, with defaults for unparseable values.
struct Palette {
    primary: String,
    secondary: String,
    background: String,
    background_alt: String,
    text_primary: String,
    text_secondary: String,
    button_bg: String,
}

impl Palette {
    fn from_profile(profile: &BrandingProfile) -> Self {
        let c = &profile.colors;
        Self {
            primary: hex_or(&c.primary, "#4A4F46"),
            secondary: hex_or(&c.secondary, "#A38DA2"),
            background: hex_or(&c.background, "#F5F3EF"),
            background_alt: hex_or(&c.background_alt, "#E3D6C4"),
            text_primary: hex_or(&c.text_primary, "#4A4F46"),
            text_secondary: hex_or(&c.text_secondary, "#6B7064"),
            button_bg: hex_or(&c.button_bg, "#8CA29B"),
        }
    }
}

fn hex_or(value: &str, fallback: &str) -> String {
    parse_hex_color(value).map_or_else(
        || fallback.to_string(),
        |[r, g, b]| format!("#{r:02X}{g:02X}{b:02X}"),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn load_font_family(db: &mut usvg::fontdb::Database, path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                font = %path.display(),
                error = %e,
                "font file unavailable; using embedded face"
            );
            return None;
        }
    };

    let ids = db.load_font_source(usvg::fontdb::Source::Binary(Arc::new(bytes)));
    let family = ids
        .first()
        .and_then(|id| db.face(*id))
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    if family.is_none() {
        tracing::warn!(font = %path.display(), "font file has no usable face; using embedded face");
    }
    family
}

fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            // Scene text is always upright and normal width.
            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };

            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod tests;
