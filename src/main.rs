use clap::{Parser, Subcommand};
use screenshot_cropper::config::{self, ScreenshotConfig};
use screenshot_cropper::imaging::RustBackend;
use screenshot_cropper::paths::ProjectPaths;
use screenshot_cropper::process::{self, BatchOptions};
use screenshot_cropper::template::Template;
use screenshot_cropper::output;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "screenshot-cropper")]
#[command(about = "Batch-generate localized store screenshots")]
#[command(long_about = "\
Batch-generate localized store screenshots

Each screenshot is cropped, scaled onto a background, captioned with the
text for every locale and written once per locale.

Project structure (--directory mode):

  project/
  ├── screenshot-cropper.json      # Crop, background, text, overlay, export
  ├── fonts/                       # Font files referenced by text.font.files
  ├── input/
  │   ├── background.png           # Referenced by background.file
  │   ├── screenshots/
  │   │   ├── 1.png                # Number in the name picks Text_1
  │   │   └── 2.png
  │   └── locales/
  │       ├── de.json              # {\"Text_1\": \"...\", \"Text_2\": \"...\"}
  │       └── en.json
  └── output/
      ├── de/1_de.png
      └── en/1_en.png

With --config FILE the directories come from the config's `directories`
section instead, relative to the config file.

Run 'screenshot-cropper gen-config' to print a documented config.")]
#[command(version)]
struct Cli {
    /// Project directory
    #[arg(long, global = true, conflicts_with = "config")]
    directory: Option<PathBuf>,

    /// Config file; directories are taken from its `directories` section
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every screenshot for every locale
    Process {
        /// Only screenshots whose file name carries this number
        #[arg(long)]
        screenshot: Option<u32>,
        /// Only this locale code
        #[arg(long)]
        language: Option<String>,
        /// Do not overwrite outputs that already exist
        #[arg(long)]
        skip_existing: bool,
    },
    /// Validate the project and list what would be rendered
    Check,
    /// Print a stock screenshot-cropper.json with every option
    GenConfig,
    /// Build a translation template from source strings, one per line
    Template {
        /// Text file with one source string per line
        #[arg(long)]
        input: PathBuf,
        /// Template JSON to create or merge into
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match &cli.command {
        Command::Process {
            screenshot,
            language,
            skip_existing,
        } => {
            let (paths, config) = resolve_project(&cli)?;
            init_thread_pool(&config.processing);
            let options = BatchOptions {
                screenshot: *screenshot,
                language: language.clone(),
                skip_existing: *skip_existing,
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&paths, &config, &options, Some(tx));
            printer.join().map_err(|_| "output thread panicked")?;
            let summary = result?;
            output::print_summary(&summary);
            if summary.has_failures() {
                std::process::exit(1);
            }
        }
        Command::Check => {
            let (paths, config) = resolve_project(&cli)?;
            let check = process::check_project(&RustBackend::new(), &paths, &config)?;
            output::print_check(&check, &paths);
            println!("==> Project is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_json());
        }
        Command::Template { input, output: out } => {
            let source = std::fs::read_to_string(input)?;
            let mut template = Template::load_or_default(out)?;
            let keys = template.extend_from_lines(&source);
            template.save(out)?;
            output::print_template_output(&keys, out);
        }
    }

    Ok(())
}

/// Structured logs go to stderr so stdout stays a clean report.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Paths and config from `--config FILE`, else from `--directory DIR`
/// (default: the current directory).
fn resolve_project(cli: &Cli) -> Result<(ProjectPaths, ScreenshotConfig), Box<dyn std::error::Error>> {
    if let Some(file) = &cli.config {
        let config = config::load_config(file)?;
        let paths = ProjectPaths::from_config_file(file, &config.directories)?;
        return Ok((paths, config));
    }
    let dir = cli.directory.as_deref().unwrap_or(Path::new("."));
    let paths = ProjectPaths::from_directory(dir)?;
    let config = config::load_config(&paths.config_file)?;
    Ok((paths, config))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
