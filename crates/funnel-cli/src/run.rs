use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use funnel_core::profile::load_profile;
use funnel_core::{load_recipients, AppConfig, Stage, Variant, VariantMode};
use funnel_render::{select_rasterizer, TemplateSet};
use funnel_telegram::TelegramClient;

use crate::delivery::{run_funnel, DeliveryOptions, RunSummary};

pub(crate) struct RunRequest {
    pub send_enabled: bool,
    pub variant_mode: VariantMode,
    pub brand: String,
}

/// Load everything a run needs, then drive the delivery loop.
///
/// Startup problems (missing token, unreadable or empty recipient table,
/// unloadable templates) are fatal. Problems with individual images are not.
pub(crate) async fn run(config: &AppConfig, request: RunRequest) -> anyhow::Result<RunSummary> {
    let token = config.require_bot_token()?;
    let mode = if request.send_enabled { "send" } else { "test" };

    let profile = load_profile(&request.brand, &config.profiles_dir).profile;

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let recipients = load_recipients(&config.users_path).with_context(|| {
        format!(
            "failed to load recipients from {}",
            config.users_path.display()
        )
    })?;
    if recipients.is_empty() {
        anyhow::bail!(
            "recipient table {} has no rows",
            config.users_path.display()
        );
    }

    let templates = TemplateSet::load(&config.templates_dir, &config.assets_root)
        .context("failed to load templates")?;
    let missing = templates.missing_funnel_templates();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "templates missing; those images will be skipped");
    }

    let font_file = profile.fonts.file.as_ref().map(|f| config.assets_root.join(f));
    let rasterizer = select_rasterizer(config.browser_path.as_deref(), font_file.as_deref());

    let client = TelegramClient::with_base_url(
        token,
        config.request_timeout_secs,
        &config.telegram_api_url,
    )?;

    tracing::info!(
        recipients = recipients.len(),
        mode,
        variant_mode = %request.variant_mode,
        brand = %profile.brand.name,
        renderer = %rasterizer.describe(),
        "starting funnel"
    );

    let interrupt = Arc::new(AtomicBool::new(false));
    let listener = tokio::spawn(watch_interrupt(Arc::clone(&interrupt)));

    let options = DeliveryOptions {
        stages: &Stage::ALL,
        variants: &Variant::ALL,
        variant_mode: request.variant_mode,
        send_enabled: request.send_enabled,
        send_delay: config.send_delay(),
        output_dir: &config.output_dir,
    };
    let summary = run_funnel(
        &recipients,
        &profile,
        &templates,
        &*rasterizer,
        &client,
        &options,
        &interrupt,
    )
    .await;
    listener.abort();

    summary.print();
    if summary.interrupted {
        tracing::warn!(
            processed = summary.processed,
            expected = summary.expected,
            "run interrupted"
        );
    }
    Ok(summary)
}

/// Set `flag` on Ctrl-C.
async fn watch_interrupt(flag: Arc<AtomicBool>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("interrupt received; stopping after the current image");
            flag.store(true, Ordering::SeqCst);
        }
        Err(e) => tracing::error!(error = %e, "failed to listen for ctrl-c"),
    }
}
