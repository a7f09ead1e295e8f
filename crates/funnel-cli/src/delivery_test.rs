use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;

use funnel_core::profile::default_profile;
use funnel_render::{CanvasRasterizer, RenderError};

use super::*;

fn repo_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(name)
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("funnel-cli-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn recipient(name: &str, telegram_id: i64, variant: Variant) -> Recipient {
    Recipient {
        name: name.to_string(),
        role: "Founder".to_string(),
        company: "Acme".to_string(),
        telegram_id,
        variant,
    }
}

fn templates() -> TemplateSet {
    TemplateSet::load(&repo_dir("templates"), &repo_dir(".")).expect("repository templates")
}

fn options(output_dir: &Path, send_enabled: bool, variant_mode: VariantMode) -> DeliveryOptions<'_> {
    DeliveryOptions {
        stages: &Stage::ALL,
        variants: &Variant::ALL,
        variant_mode,
        send_enabled,
        send_delay: Duration::ZERO,
        output_dir,
    }
}

/// Writes a placeholder file instead of painting.
struct StubRasterizer {
    calls: AtomicUsize,
    fail_stage: Option<Stage>,
}

impl StubRasterizer {
    fn new(fail_stage: Option<Stage>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_stage,
        }
    }
}

impl Rasterizer for StubRasterizer {
    fn describe(&self) -> String {
        "stub".to_string()
    }

    fn rasterize(&self, job: &RasterJob<'_>) -> Result<PathBuf, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stage == Some(job.stage) {
            return Err(RenderError::Raster("stub failure".to_string()));
        }
        let path = job.output_path();
        std::fs::write(&path, job.document).map_err(|e| RenderError::Raster(e.to_string()))?;
        Ok(path)
    }
}

/// Records deliveries; rejects any photo whose file name starts with `blocked_prefix`.
#[derive(Default)]
struct FakeSender {
    blocked_prefix: Option<String>,
    delivered: Mutex<Vec<(i64, String, InlineKeyboardMarkup)>>,
}

impl PhotoSender for FakeSender {
    async fn deliver(
        &self,
        chat_id: i64,
        photo: &Path,
        markup: &InlineKeyboardMarkup,
    ) -> Result<(), TelegramError> {
        let file_name = photo
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if let Some(prefix) = &self.blocked_prefix {
            if file_name.starts_with(prefix.as_str()) {
                return Err(TelegramError::Forbidden(
                    "bot was blocked by the user".to_string(),
                ));
            }
        }
        self.delivered
            .lock()
            .unwrap()
            .push((chat_id, file_name, markup.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn test_mode_writes_one_image_per_stage_for_fixed_variant() {
    let out = scratch_dir();
    let recipients = [recipient("Anna", 555, Variant::B)];
    let rasterizer = CanvasRasterizer::new(None);
    let sender = FakeSender::default();

    let summary = run_funnel(
        &recipients,
        &default_profile(),
        &templates(),
        &rasterizer,
        &sender,
        &options(&out, false, VariantMode::Fixed),
        &AtomicBool::new(false),
    )
    .await;

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.expected, 3);
    assert_eq!(summary.per_variant.get(&Variant::B), Some(&3));
    assert_eq!(summary.sent, 0);
    assert!(!summary.interrupted);

    let mut files: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    assert_eq!(
        files,
        ["deadline_b_555.png", "interest_b_555.png", "solution_b_555.png"]
    );
    assert!(sender.delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn blocked_recipient_pair_is_skipped_and_not_counted() {
    let out = scratch_dir();
    let recipients = [recipient("Anna", 555, Variant::A)];
    let rasterizer = StubRasterizer::new(None);
    let sender = FakeSender {
        blocked_prefix: Some("solution_".to_string()),
        ..FakeSender::default()
    };

    let summary = run_funnel(
        &recipients,
        &default_profile(),
        &templates(),
        &rasterizer,
        &sender,
        &options(&out, true, VariantMode::Fixed),
        &AtomicBool::new(false),
    )
    .await;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.expected, 3);
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 1);
    // The image was still produced for the failed pair.
    assert_eq!(summary.per_variant.get(&Variant::A), Some(&3));

    let delivered = sender.delivered.lock().unwrap();
    let names: Vec<&str> = delivered.iter().map(|(_, n, _)| n.as_str()).collect();
    assert_eq!(names, ["interest_555.png", "deadline_555.png"]);
    assert!(delivered.iter().all(|(id, _, _)| *id == 555));
}

#[tokio::test]
async fn rasterization_failure_skips_only_that_pair() {
    let out = scratch_dir();
    let recipients = [
        recipient("Anna", 555, Variant::A),
        recipient("Boris", 777, Variant::C),
    ];
    let rasterizer = StubRasterizer::new(Some(Stage::Deadline));
    let sender = FakeSender::default();

    let summary = run_funnel(
        &recipients,
        &default_profile(),
        &templates(),
        &rasterizer,
        &sender,
        &options(&out, false, VariantMode::Fixed),
        &AtomicBool::new(false),
    )
    .await;

    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 6);
    assert_eq!(summary.expected, 6);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.per_variant.get(&Variant::A), Some(&2));
    assert_eq!(summary.per_variant.get(&Variant::C), Some(&2));
}

#[tokio::test]
async fn missing_template_is_a_per_pair_failure() {
    let out = scratch_dir();
    let set = TemplateSet::from_sources(
        &[("interest_a.html", "<p>{{ name }}</p>")],
        Path::new("."),
    )
    .unwrap();
    let rasterizer = StubRasterizer::new(None);

    let summary = run_funnel(
        &[recipient("Anna", 555, Variant::A)],
        &default_profile(),
        &set,
        &rasterizer,
        &FakeSender::default(),
        &options(&out, false, VariantMode::Fixed),
        &AtomicBool::new(false),
    )
    .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 1);
    assert!(out.join("interest_a_555.png").exists());
}

#[tokio::test]
async fn random_mode_draws_from_the_pool() {
    let out = scratch_dir();
    let recipients = [
        recipient("Anna", 1, Variant::A),
        recipient("Boris", 2, Variant::A),
    ];
    let rasterizer = StubRasterizer::new(None);
    let opts = DeliveryOptions {
        variants: &[Variant::C],
        ..options(&out, false, VariantMode::Random)
    };

    let summary = run_funnel(
        &recipients,
        &default_profile(),
        &templates(),
        &rasterizer,
        &FakeSender::default(),
        &opts,
        &AtomicBool::new(false),
    )
    .await;

    assert_eq!(summary.processed, 6);
    assert_eq!(summary.per_variant.get(&Variant::C), Some(&6));
    assert_eq!(summary.per_variant.get(&Variant::A), None);
    assert!(out.join("solution_c_2.png").exists());
}

#[tokio::test]
async fn interrupt_stops_before_the_next_pair() {
    let out = scratch_dir();
    let rasterizer = StubRasterizer::new(None);

    let summary = run_funnel(
        &[recipient("Anna", 555, Variant::A)],
        &default_profile(),
        &templates(),
        &rasterizer,
        &FakeSender::default(),
        &options(&out, false, VariantMode::Fixed),
        &AtomicBool::new(true),
    )
    .await;

    assert!(summary.interrupted);
    assert_eq!(summary.processed, 0);
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn labels_depend_on_mode() {
    assert_eq!(artifact_label(Stage::Interest, Variant::B, false), "interest_b");
    assert_eq!(artifact_label(Stage::Interest, Variant::B, true), "interest");
}

#[test]
fn keyboard_links_stage_and_recipient() {
    let profile = default_profile();
    let markup = build_keyboard(&profile, Stage::Solution, &recipient("Anna", 555, Variant::A));
    let button = &markup.inline_keyboard[0][0];
    assert_eq!(button.text, "Get the program → for Anna");
    assert_eq!(button.url, "https://knowyourself.example/solution?user=555");
}

#[test]
fn keyboard_without_personalization_uses_plain_cta() {
    let mut profile = default_profile();
    profile.cta.personalize = false;
    profile.brand.website = Some("https://shop.example.org/".to_string());
    let markup = build_keyboard(&profile, Stage::Deadline, &recipient("Anna", 9, Variant::A));
    let button = &markup.inline_keyboard[0][0];
    assert_eq!(button.text, "Sign up now →");
    assert_eq!(button.url, "https://shop.example.org/deadline?user=9");
}

#[test]
fn recipient_variant_is_only_reported_in_fixed_mode() {
    let anna = recipient("Anna", 555, Variant::B);
    assert_eq!(stored_variant(VariantMode::Fixed, &anna), Some(Variant::B));
    assert_eq!(stored_variant(VariantMode::Random, &anna), None);
}
