mod check;
mod delivery;
mod profiles;
mod run;

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use funnel_core::profile::FALLBACK_PROFILE;
use funnel_core::{AppConfig, VariantMode};
use tracing_subscriber::EnvFilter;

/// Exit status for a run stopped by Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[derive(Debug, Parser)]
#[command(name = "funnel")]
#[command(about = "Render personalized promo images and deliver them over Telegram")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the interest, solution and deadline images for every recipient
    Run {
        /// Only generate images (the default)
        #[arg(long, conflicts_with = "send")]
        test: bool,
        /// Generate images and send them to recipients
        #[arg(long)]
        send: bool,
        /// How each pair's variant is chosen
        #[arg(long, value_enum, default_value_t = VariantArg::Fixed)]
        variant: VariantArg,
        /// Profile name from the profiles directory, or a path to a .yaml file
        #[arg(long, default_value = FALLBACK_PROFILE)]
        brand: String,
        #[command(flatten)]
        paths: PathOverrides,
    },
    /// List the branding profiles in the profiles directory
    Profiles {
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
    },
    /// Verify recipients, profile and templates without rendering anything
    Check {
        #[arg(long, default_value = FALLBACK_PROFILE)]
        brand: String,
        #[command(flatten)]
        paths: PathOverrides,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Use the variant from the recipient table
    Fixed,
    /// Draw a variant at random for every image
    Random,
}

impl From<VariantArg> for VariantMode {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Fixed => VariantMode::Fixed,
            VariantArg::Random => VariantMode::Random,
        }
    }
}

/// Command-line overrides for the configured directories.
#[derive(Debug, Default, Args)]
struct PathOverrides {
    /// Recipient CSV
    #[arg(long)]
    users: Option<PathBuf>,
    /// Directory for generated images
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    profiles_dir: Option<PathBuf>,
    #[arg(long)]
    templates_dir: Option<PathBuf>,
}

impl PathOverrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(users) = self.users {
            config.users_path = users;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(dir) = self.profiles_dir {
            config.profiles_dir = dir;
        }
        if let Some(dir) = self.templates_dir {
            config.templates_dir = dir;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = funnel_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Run {
            test: _,
            send,
            variant,
            brand,
            paths,
        }) => {
            paths.apply(&mut config);
            let outcome = run::run(
                &config,
                run::RunRequest {
                    send_enabled: send,
                    variant_mode: variant.into(),
                    brand,
                },
            )
            .await?;
            if outcome.interrupted {
                std::process::exit(EXIT_INTERRUPTED);
            }
        }
        Some(Commands::Profiles { profiles_dir }) => {
            let dir = profiles_dir.unwrap_or(config.profiles_dir);
            profiles::print_profiles(&dir);
        }
        Some(Commands::Check { brand, paths }) => {
            paths.apply(&mut config);
            check::run_check(&config, &brand)?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
