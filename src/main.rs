use std::path::{Path, PathBuf};

use cafecito::{
    CafecitoError, Config, ConfigError, FileThemeStore, FsPostSource, IndexPage, ThemeToggle,
    cli::{self, Command, ThemeAction},
    templates::Templates,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Folder, relative to the root, the index is written to by default.
const OUTPUT_DIR: &str = "public";

fn main() -> Result<(), CafecitoError> {
    let args = cli::Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let absolute_path =
        args.path
            .canonicalize()
            .map_err(|e| ConfigError::CanonicalizeFailed {
                path: args.path.clone(),
                source: e,
            })?;

    let mut config = Config::read(&absolute_path)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    tracing::info!("Root dir: {}", config.root_dir.display());

    match &args.command {
        Some(Command::Theme { action }) => run_theme(&config.root_dir, *action),
        None => render_index(&config, &args)
            .inspect_err(|e| tracing::error!("Error rendering index: {e}")),
    }
}

fn apply_overrides(config: &mut Config, args: &cli::Args) {
    if let Some(folder) = &args.template_folder {
        config.template_folder = Some(folder.clone());
    }
    if let Some(dir) = &args.content_dir {
        config.content_dir = dir.clone();
    }
}

fn run_theme(root: &Path, action: ThemeAction) -> Result<(), CafecitoError> {
    let mut toggle = ThemeToggle::init(FileThemeStore::open_in(root));
    let preference = match action {
        ThemeAction::Show => toggle.preference(),
        ThemeAction::Toggle => toggle.toggle(),
    };
    println!("{preference}");
    Ok(())
}

fn render_index(config: &Config, args: &cli::Args) -> Result<(), CafecitoError> {
    let template_folder = config
        .template_folder
        .as_deref()
        .map(|folder| config.resolve(folder));
    let templates = Templates::new(template_folder.as_deref())
        .inspect_err(|e| tracing::error!("Error parsing template: {e}"))?;
    let source = FsPostSource::from_config(config);
    let toggle = ThemeToggle::init(FileThemeStore::open_in(&config.root_dir));
    let page = IndexPage::new(config, &templates);

    if args.stdout {
        println!("{}", page.render(&source, &toggle)?);
    } else {
        let output = output_path(config, args.output.as_deref());
        let written = page.render_to_file(&source, &toggle, &output)?;
        eprintln!("Wrote {}", written.display());
    }
    Ok(())
}

/// `--output` as given, or `<root>/public/index.html`.
fn output_path(config: &Config, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => config.root_dir.join(OUTPUT_DIR).join("index.html"),
    }
}
