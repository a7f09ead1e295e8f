use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{ensure_dir, RasterJob, Rasterizer};
use crate::error::RenderError;

/// Browser executables tried, in order, when no explicit path is configured.
pub const BROWSER_CANDIDATES: [&str; 5] = [
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

const PAGE_FILE: &str = "page.html";
const SHOT_FILE: &str = "shot.png";

/// Screenshots the HTML document with a headless Chromium-family browser.
#[derive(Debug, Clone)]
pub struct ChromiumRasterizer {
    binary: PathBuf,
}

impl ChromiumRasterizer {
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Find a working browser.
    ///
    /// An explicit path is the only candidate when given; otherwise each of
    /// [`BROWSER_CANDIDATES`] is tried on `PATH`.
    #[must_use]
    pub fn detect(explicit: Option<&Path>) -> Option<Self> {
        if let Some(path) = explicit {
            if responds_to_version(path) {
                return Some(Self::new(path));
            }
            tracing::warn!(
                browser = %path.display(),
                "configured browser did not respond to --version"
            );
            return None;
        }

        BROWSER_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|candidate| responds_to_version(candidate))
            .map(Self::new)
    }

    fn convert(&self, job: &RasterJob<'_>, work_dir: &Path) -> Result<PathBuf, RenderError> {
        let page = work_dir.join(PAGE_FILE);
        std::fs::write(&page, job.document).map_err(|e| RenderError::io(&page, e))?;

        let shot = work_dir.join(SHOT_FILE);
        self.screenshot(&page, &shot, job.size())?;

        ensure_dir(job.output_dir)?;
        let dest = job.output_path();
        move_file(&shot, &dest)?;
        Ok(dest)
    }

    fn screenshot(
        &self,
        page: &Path,
        shot: &Path,
        (width, height): (u32, u32),
    ) -> Result<(), RenderError> {
        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--screenshot={}", shot.display()))
            .arg(format!("file://{}", page.display()))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                RenderError::Browser(format!("failed to start {}: {e}", self.binary.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("");
            return Err(RenderError::Browser(format!(
                "{} exited with {}: {last_line}",
                self.binary.display(),
                output.status
            )));
        }
        if !shot.is_file() {
            return Err(RenderError::Browser("browser produced no screenshot".to_string()));
        }
        Ok(())
    }
}

impl Rasterizer for ChromiumRasterizer {
    fn describe(&self) -> String {
        format!("headless browser ({})", self.binary.display())
    }

    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError> {
        let work_dir = std::env::temp_dir().join(format!("funnel-{}", uuid::Uuid::new_v4()));
        ensure_dir(&work_dir)?;

        let result = self.convert(job, &work_dir);

        if let Err(e) = std::fs::remove_dir_all(&work_dir) {
            tracing::debug!(
                dir = %work_dir.display(),
                error = %e,
                "failed to remove browser work dir"
            );
        }

        result
    }
}

/// Rename, or copy and delete when the rename crosses filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), RenderError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).map_err(|e| RenderError::io(to, e))?;
    std::fs::remove_file(from).ok();
    Ok(())
}

fn responds_to_version(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
