use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use snapframe_lib::background::{available_presets, BackgroundSpec};
use snapframe_lib::compose::{self, ChromeTheme, DEFAULT_OUTPUT_SUFFIX};
use snapframe_lib::settings::Settings;
use snapframe_lib::watch;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Frame screenshots in window chrome with a shadow and backdrop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Frame a single screenshot.
    Frame {
        input: PathBuf,
        /// Defaults to `<stem>-framed.png` next to the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// `auto`, a preset name, `#a,#b[@angle]`, or an image path.
        #[arg(short, long)]
        background: Option<BackgroundSpec>,
        #[arg(long)]
        padding: Option<i32>,
        #[arg(long)]
        radius: Option<i32>,
        #[arg(long)]
        no_shadow: bool,
        #[arg(long)]
        theme: Option<ChromeTheme>,
        /// Print the PNG as base64 instead of writing a file.
        #[arg(long)]
        base64: bool,
    },
    /// Frame every new screenshot that appears in a folder.
    Watch {
        dir: Option<PathBuf>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        delete_original: bool,
        #[arg(long)]
        clipboard: bool,
    },
    /// List the background presets.
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Frame {
            input,
            output,
            background,
            padding,
            radius,
            no_shadow,
            theme,
            base64,
        } => {
            let settings = Settings::load()?;
            let mut config = settings.composition.clone();
            if let Some(background) = background {
                config.background = background;
            }
            if let Some(padding) = padding {
                config.padding = padding;
            }
            if let Some(radius) = radius {
                config.corner_radius = radius;
            }
            if let Some(theme) = theme {
                config.theme = theme;
            }
            if no_shadow {
                config.shadow_enabled = false;
            }

            if base64 {
                let source = compose::load_source(&input)?;
                let png = compose::compose_to_png_bytes(&source, &config)?;
                println!("{}", compose::to_base64_png(&png));
                return Ok(());
            }

            let output = output.unwrap_or_else(|| {
                let suffix = if settings.output_suffix.is_empty() {
                    DEFAULT_OUTPUT_SUFFIX
                } else {
                    settings.output_suffix.as_str()
                };
                compose::default_output_path(&input, settings.output_dir.as_deref(), suffix)
            });
            if output == input {
                bail!("output would overwrite the input {}", input.display());
            }
            let written = compose::compose_file(&input, &output, &config)
                .with_context(|| format!("framing {}", input.display()))?;
            println!("{}", written.display());
        }
        Commands::Watch {
            dir,
            output_dir,
            workers,
            delete_original,
            clipboard,
        } => {
            let mut settings = Settings::load()?;
            if dir.is_some() {
                settings.watch_dir = dir;
            }
            if output_dir.is_some() {
                settings.output_dir = output_dir;
            }
            if let Some(workers) = workers {
                settings.workers = workers;
            }
            settings.delete_original |= delete_original;
            settings.copy_to_clipboard |= clipboard;
            settings.composition.validate()?;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("[WATCH] Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            let status = watch::run(settings, shutdown).await?;
            println!(
                "framed {}, failed {}, skipped {}",
                status.processed,
                status.failed,
                status.skipped_duplicates + status.skipped_overwrites
            );
        }
        Commands::Presets => {
            for preset in available_presets() {
                let colors: Vec<String> = preset.colors.iter().map(|c| c.to_hex()).collect();
                println!(
                    "{:<10} {:>5}°  {:<28} {}",
                    preset.name,
                    preset.angle,
                    colors.join(" → "),
                    preset.description
                );
            }
            println!("{:<10} {:>5}   derived from the screenshot", "auto", "");
        }
    }
    Ok(())
}
