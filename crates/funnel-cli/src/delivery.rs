//! The delivery loop: render, rasterize and optionally send one image per
//! (recipient, stage) pair, strictly in order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use funnel_core::profile::BrandingProfile;
use funnel_core::{Recipient, Stage, Variant, VariantMode};
use funnel_render::{RasterJob, Rasterizer, TemplateSet};
use funnel_telegram::{InlineKeyboardMarkup, TelegramClient, TelegramError};
use rand::seq::IndexedRandom;

/// Transport for finished images.
pub(crate) trait PhotoSender {
    async fn deliver(
        &self,
        chat_id: i64,
        photo: &Path,
        markup: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError>;
}

impl PhotoSender for TelegramClient {
    async fn deliver(
        &self,
        chat_id: i64,
        photo: &Path,
        markup: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError> {
        self.send_photo(chat_id, photo, Some(markup)).await.map(|_| ())
    }
}

pub(crate) struct DeliveryOptions<'a> {
    pub stages: &'a [Stage],
    /// Pool for random draws.
    pub variants: &'a [Variant],
    pub variant_mode: VariantMode,
    pub send_enabled: bool,
    /// Pause after every transmission attempt.
    pub send_delay: Duration,
    pub output_dir: &'a Path,
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub expected: usize,
    pub processed: usize,
    /// Images written, per variant.
    pub per_variant: BTreeMap<Variant, usize>,
    pub sent: usize,
    pub failed: usize,
    pub interrupted: bool,
    pub output_dir: PathBuf,
}

impl RunSummary {
    pub(crate) fn print(&self) {
        println!();
        if self.interrupted {
            println!("Run interrupted.");
        }
        println!("Processed {}/{}", self.processed, self.expected);
        for (variant, count) in &self.per_variant {
            if *count > 0 {
                println!("  variant {}: {count}", variant.as_str().to_uppercase());
            }
        }
        if self.failed > 0 {
            println!("  failed: {}", self.failed);
        }
        println!("PNG saved in: {}/", self.output_dir.display());
    }
}

/// File-name prefix for an artifact. Send mode keeps one file per stage.
pub(crate) fn artifact_label(stage: Stage, variant: Variant, send_enabled: bool) -> String {
    if send_enabled {
        stage.as_str().to_string()
    } else {
        format!("{}_{}", stage.as_str(), variant.as_str())
    }
}

pub(crate) fn build_keyboard(
    profile: &BrandingProfile,
    stage: Stage,
    recipient: &Recipient,
) -> InlineKeyboardMarkup {
    let cta = profile.cta_text(stage);
    let label = if profile.cta.personalize && !recipient.name.is_empty() {
        format!("{cta} for {}", recipient.name)
    } else {
        cta
    };
    let url = format!(
        "{}/{}?user={}",
        profile.website().trim_end_matches('/'),
        stage.as_str(),
        recipient.telegram_id
    );
    InlineKeyboardMarkup::single_url_button(label, url)
}

/// The recipient-level variant, when one applies to every stage.
fn stored_variant(mode: VariantMode, recipient: &Recipient) -> Option<Variant> {
    match mode {
        VariantMode::Fixed => Some(recipient.variant),
        VariantMode::Random => None,
    }
}

fn pick_variant(mode: VariantMode, pool: &[Variant], recipient: &Recipient) -> Variant {
    match mode {
        VariantMode::Fixed => recipient.variant,
        VariantMode::Random => pool
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(recipient.variant),
    }
}

/// Run every (recipient, stage) pair in order.
///
/// Per-pair failures are logged and skipped. `interrupt` is checked before
/// each pair; once set, the loop stops and the summary is marked interrupted.
pub(crate) async fn run_funnel<S: PhotoSender>(
    recipients: &[Recipient],
    profile: &BrandingProfile,
    templates: &TemplateSet,
    rasterizer: &dyn Rasterizer,
    sender: &S,
    options: &DeliveryOptions<'_>,
    interrupt: &AtomicBool,
) -> RunSummary {
    let mut summary = RunSummary {
        expected: recipients.len() * options.stages.len(),
        output_dir: options.output_dir.to_path_buf(),
        ..RunSummary::default()
    };

    'recipients: for recipient in recipients {
        tracing::info!(
            recipient = %recipient.name,
            telegram_id = recipient.telegram_id,
            variant = stored_variant(options.variant_mode, recipient).map(Variant::as_str),
            "processing recipient"
        );

        for &stage in options.stages {
            if interrupt.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break 'recipients;
            }

            let variant = pick_variant(options.variant_mode, options.variants, recipient);
            let document = match templates.render(stage, variant, recipient, profile) {
                Ok(document) => document,
                Err(e) => {
                    tracing::error!(
                        recipient = %recipient.name,
                        stage = %stage,
                        variant = %variant,
                        error = %e,
                        "render failed; skipping"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            let label = artifact_label(stage, variant, options.send_enabled);
            let job = RasterJob {
                document: &document,
                label: &label,
                stage,
                recipient,
                profile,
                output_dir: options.output_dir,
            };
            let path = match rasterizer.rasterize(&job) {
                Ok(path) => path,
                Err(e) => {
                    tracing::error!(
                        recipient = %recipient.name,
                        stage = %stage,
                        variant = %variant,
                        error = %e,
                        "rasterization failed; skipping"
                    );
                    summary.failed += 1;
                    continue;
                }
            };
            *summary.per_variant.entry(variant).or_insert(0) += 1;

            if !options.send_enabled {
                tracing::info!(stage = %stage, variant = %variant, path = %path.display(), "image generated");
                summary.processed += 1;
                continue;
            }

            let markup = build_keyboard(profile, stage, recipient);
            match sender.deliver(recipient.telegram_id, &path, &markup).await {
                Ok(()) => {
                    tracing::info!(
                        recipient = %recipient.name,
                        stage = %stage,
                        variant = %variant,
                        "image sent"
                    );
                    summary.sent += 1;
                    summary.processed += 1;
                }
                Err(e) if e.is_recipient_unreachable() => {
                    tracing::warn!(
                        recipient = %recipient.name,
                        telegram_id = recipient.telegram_id,
                        stage = %stage,
                        error = %e,
                        "recipient unreachable; skipping"
                    );
                    summary.failed += 1;
                }
                Err(e) => {
                    tracing::error!(
                        recipient = %recipient.name,
                        stage = %stage,
                        variant = %variant,
                        error = %e,
                        "send failed; skipping"
                    );
                    summary.failed += 1;
                }
            }
            tokio::time::sleep(options.send_delay).await;
        }
    }

    summary
}

#[cfg(test)]
#[path = "delivery_test.rs"]
mod tests;
