//! Loading branding profiles from a profiles directory or an explicit path.
//!
//! Loading never fails a run: a missing profile is replaced by
//! [`FALLBACK_PROFILE`], and anything unreadable or invalid is replaced by the
//! built-in [`default_profile`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::builtin::default_profile;
use super::types::BrandingProfile;
use super::validate::validate_profile;
use crate::ConfigError;

/// Profile substituted when the requested one does not exist.
pub const FALLBACK_PROFILE: &str = "wellness";

const PROFILE_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Where the profile in a [`LoadedProfile`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// The requested file.
    File(PathBuf),
    /// The requested file was missing; the fallback profile file was used.
    Substituted { requested: String, path: PathBuf },
    /// No file could be used; the hard-coded profile was used.
    BuiltIn,
}

#[derive(Debug, Clone)]
pub struct LoadedProfile {
    pub profile: BrandingProfile,
    pub source: ProfileSource,
}

fn has_profile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| PROFILE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Resolve a profile name or path to a file path.
///
/// Arguments ending in `.yaml`/`.yml` are literal paths; anything else is a
/// name looked up as `{profiles_dir}/{name}.yaml`.
#[must_use]
pub fn resolve_profile_path(name_or_path: &str, profiles_dir: &Path) -> PathBuf {
    let candidate = Path::new(name_or_path);
    if has_profile_extension(candidate) {
        candidate.to_path_buf()
    } else {
        profiles_dir.join(format!("{name_or_path}.yaml"))
    }
}

/// Read, parse, and validate one profile file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile_file(path: &Path) -> Result<BrandingProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: BrandingProfile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ProfileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let problems = validate_profile(&profile);
    if !problems.is_empty() {
        return Err(ConfigError::ProfileValidation {
            path: path.display().to_string(),
            problems,
        });
    }

    Ok(profile)
}

/// Load a profile by name or path, substituting fallbacks instead of failing.
#[must_use]
pub fn load_profile(name_or_path: &str, profiles_dir: &Path) -> LoadedProfile {
    let requested = resolve_profile_path(name_or_path, profiles_dir);

    let (path, substituted) = if requested.is_file() {
        (requested, false)
    } else {
        let fallback = profiles_dir.join(format!("{FALLBACK_PROFILE}.yaml"));
        tracing::warn!(
            profile = name_or_path,
            path = %requested.display(),
            fallback = FALLBACK_PROFILE,
            "profile not found; using '{FALLBACK_PROFILE}'"
        );
        (fallback, true)
    };

    match load_profile_file(&path) {
        Ok(profile) => {
            tracing::info!(
                profile = %path.file_stem().unwrap_or_default().to_string_lossy(),
                brand = %profile.brand.name,
                "loaded branding profile"
            );
            let source = if substituted {
                ProfileSource::Substituted {
                    requested: name_or_path.to_string(),
                    path,
                }
            } else {
                ProfileSource::File(path)
            };
            LoadedProfile { profile, source }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load profile; using built-in default");
            LoadedProfile {
                profile: default_profile(),
                source: ProfileSource::BuiltIn,
            }
        }
    }
}

/// Names of the `.yaml` profiles in `profiles_dir`, sorted and deduplicated.
///
/// A missing or unreadable directory yields an empty list.
#[must_use]
pub fn list_available(profiles_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(profiles_dir) else {
        return Vec::new();
    };

    entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "yaml"))
        .filter_map(|path| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
