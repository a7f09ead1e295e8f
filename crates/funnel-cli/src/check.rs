//! `funnel check`: verify a run's inputs without rendering or sending.

use std::path::Path;

use funnel_core::profile::{load_profile_file, resolve_profile_path};
use funnel_core::{load_recipients, variant_distribution, AppConfig, Stage, Variant};
use funnel_render::{select_rasterizer, template_name};

/// Placeholders every funnel template must use.
const REQUIRED_PLACEHOLDERS: [&str; 2] = ["greeting", "cta_text"];

struct Finding {
    subject: &'static str,
    result: Result<String, String>,
}

impl Finding {
    fn print(&self) {
        match &self.result {
            Ok(detail) => println!("  ok    {}: {detail}", self.subject),
            Err(detail) => println!("  FAIL  {}: {detail}", self.subject),
        }
    }
}

/// Problems with the funnel templates in `dir`, one line per template.
fn template_problems(dir: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    for stage in Stage::ALL {
        for variant in Variant::ALL {
            let name = template_name(stage, variant);
            let Ok(source) = std::fs::read_to_string(dir.join(&name)) else {
                problems.push(format!("{name} is missing"));
                continue;
            };
            let absent: Vec<&str> = REQUIRED_PLACEHOLDERS
                .into_iter()
                .filter(|p| !source.contains(p))
                .collect();
            if !absent.is_empty() {
                problems.push(format!("{name} does not use {}", absent.join(", ")));
            }
        }
    }
    problems
}

fn check_recipients(path: &Path) -> Result<String, String> {
    let recipients = load_recipients(path).map_err(|e| e.to_string())?;
    if recipients.is_empty() {
        return Err(format!("{} has no rows", path.display()));
    }
    let distribution = variant_distribution(&recipients)
        .into_iter()
        .map(|(variant, count)| format!("{variant}={count}"))
        .collect::<Vec<_>>()
        .join(" ");
    Ok(format!("{} loaded ({distribution})", recipients.len()))
}

fn check_profile(brand: &str, profiles_dir: &Path) -> Result<String, String> {
    let path = resolve_profile_path(brand, profiles_dir);
    let profile = load_profile_file(&path).map_err(|e| e.to_string())?;
    let (width, height) = profile.image_size();
    Ok(format!(
        "{} from {} ({width}x{height})",
        profile.brand.name,
        path.display()
    ))
}

fn check_templates(dir: &Path) -> Result<String, String> {
    let problems = template_problems(dir);
    if problems.is_empty() {
        Ok(format!("all funnel templates present in {}", dir.display()))
    } else {
        Err(problems.join("; "))
    }
}

/// Print one line per check and fail if any check failed.
pub(crate) fn run_check(config: &AppConfig, brand: &str) -> anyhow::Result<()> {
    let renderer = select_rasterizer(config.browser_path.as_deref(), None).describe();
    let findings = [
        Finding {
            subject: "bot token",
            result: config
                .require_bot_token()
                .map(|_| "set".to_string())
                .map_err(|e| e.to_string()),
        },
        Finding {
            subject: "recipients",
            result: check_recipients(&config.users_path),
        },
        Finding {
            subject: "profile",
            result: check_profile(brand, &config.profiles_dir),
        },
        Finding {
            subject: "templates",
            result: check_templates(&config.templates_dir),
        },
        Finding {
            subject: "renderer",
            result: Ok(renderer),
        },
    ];

    for finding in &findings {
        finding.print();
    }

    let failed = findings.iter().filter(|f| f.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} check(s) failed");
    }
    Ok(())
}
