use std::fmt::Write as _;
use std::path::Path;

use funnel_core::profile::list_available;

fn profile_glyph(name: &str) -> &'static str {
    match name {
        "wellness" => "🌿",
        "corporate" => "🏢",
        "creative" | "custom" => "🎨",
        "luxury" => "👑",
        "tech" => "💻",
        "minimal" => "⬜",
        _ => "📄",
    }
}

fn format_listing(names: &[String]) -> String {
    let mut out = String::from("Available branding profiles:\n\n");
    if names.is_empty() {
        out.push_str("  (none)\n");
    }
    for name in names {
        let _ = writeln!(out, "  {} {name}", profile_glyph(name));
    }
    out.push_str("\nUsage: funnel run --test --brand <profile>\n");
    out
}

pub(crate) fn print_profiles(profiles_dir: &Path) {
    let names = list_available(profiles_dir);
    tracing::debug!(dir = %profiles_dir.display(), count = names.len(), "listed profiles");
    print!("{}", format_listing(&names));
}
