//! Turning rendered documents into PNG files.
//!
//! Two implementations sit behind [`Rasterizer`]: a headless browser that
//! screenshots the HTML, and a canvas painter that draws a simplified card
//! straight from the profile. [`select_rasterizer`] looks for a browser once
//! at startup and wires the canvas in behind it.

mod canvas;
mod chromium;

use std::path::{Path, PathBuf};

use funnel_core::profile::BrandingProfile;
use funnel_core::{Recipient, Stage};

use crate::error::RenderError;

pub use canvas::CanvasRasterizer;
pub use chromium::{ChromiumRasterizer, BROWSER_CANDIDATES};

/// Everything needed to produce one image.
#[derive(Debug, Clone, Copy)]
pub struct RasterJob<'a> {
    /// Rendered HTML document.
    pub document: &'a str,
    /// File-name prefix, e.g. `interest_b` or `interest`.
    pub label: &'a str,
    pub stage: Stage,
    pub recipient: &'a Recipient,
    pub profile: &'a BrandingProfile,
    pub output_dir: &'a Path,
}

impl RasterJob<'_> {
    /// `{output_dir}/{label}_{telegram_id}.png`
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.png", self.label, self.recipient.telegram_id))
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.profile.image_size()
    }
}

pub trait Rasterizer: Send + Sync {
    /// Short human-readable name for logs and diagnostics.
    fn describe(&self) -> String;

    /// Write the image for `job` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if no image could be written.
    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for Box<R> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError> {
        (**self).rasterize(job)
    }
}

/// Runs `primary`, falling back to `fallback` when it fails.
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Rasterizer, F: Rasterizer> Rasterizer for WithFallback<P, F> {
    fn describe(&self) -> String {
        format!(
            "{} (fallback: {})",
            self.primary.describe(),
            self.fallback.describe()
        )
    }

    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError> {
        match self.primary.rasterize(job) {
            Ok(path) => Ok(path),
            Err(e) => {
                tracing::warn!(
                    renderer = %self.primary.describe(),
                    label = job.label,
                    recipient = job.recipient.telegram_id,
                    error = %e,
                    "primary renderer failed; using fallback"
                );
                self.fallback.rasterize(job)
            }
        }
    }
}

/// Pick the rasterizer for this run.
///
/// Uses a headless browser when one answers `--version`, with the canvas
/// painter as its fallback; otherwise the canvas painter alone.
#[must_use]
pub fn select_rasterizer(
    browser_override: Option<&Path>,
    font_file: Option<&Path>,
) -> Box<dyn Rasterizer> {
    let canvas = CanvasRasterizer::new(font_file);
    match ChromiumRasterizer::detect(browser_override) {
        Some(browser) => {
            tracing::info!(browser = %browser.binary().display(), "using headless browser renderer");
            Box::new(WithFallback::new(browser, canvas))
        }
        None => {
            tracing::warn!("no headless browser found; using canvas renderer");
            Box::new(canvas)
        }
    }
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir).map_err(|e| RenderError::io(dir, e))
}
