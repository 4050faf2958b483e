use anyhow::{Context, Result};
use gloam_runtime::Engine;
use gloam_template::{CompileOptions, CompileReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "gloam.toml";

/// Flags of `gloam build`. Anything given here overrides the config file;
/// list flags extend the file's lists.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BuildArgs {
    /// Config file (default: ./gloam.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory holding the source templates
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Directory the compiled templates are written to (emptied first)
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Directory for hoisted scripts and styles (default: the output directory)
    #[arg(long)]
    pub assets: Option<PathBuf>,
    /// Extra component to hoist; repeatable
    #[arg(long = "hoist", value_name = "NAME")]
    pub hoist: Vec<String>,
    /// Extra component to keep as literal markup; repeatable
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,
    /// Template file extension
    #[arg(long)]
    pub extension: Option<String>,
    /// Skip compilation
    #[arg(long)]
    pub disable: bool,
}

/// Merge the config file and flags into the options for one run.
pub fn resolve_options(args: &BuildArgs) -> Result<CompileOptions> {
    let mut options = match &args.config {
        Some(path) => CompileOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).is_file() => CompileOptions::load(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load config {DEFAULT_CONFIG}"))?,
        None => CompileOptions::default(),
    };

    if let Some(input) = &args.input {
        options.input = input.clone();
    }
    if let Some(output) = &args.output {
        options.output = output.clone();
    }
    if let Some(assets) = &args.assets {
        options.assets = Some(assets.clone());
    }
    if let Some(extension) = &args.extension {
        options.extension = extension.trim_start_matches('.').to_string();
    }
    options.hoist.extend(args.hoist.iter().cloned());
    options.ignore.extend(args.ignore.iter().cloned());
    if args.disable {
        options.enabled = false;
    }
    Ok(options)
}

/// Compile a template directory and print a summary.
pub fn build_cmd(args: &BuildArgs) -> Result<Option<CompileReport>> {
    let options = resolve_options(args)?;
    let report = gloam_template::compile(&options).with_context(|| {
        format!(
            "failed to compile {} into {}",
            options.input.display(),
            options.output.display()
        )
    })?;

    match &report {
        Some(report) => {
            println!(
                "Compiled {} template(s) in {:.3}s",
                report.file_count,
                report.elapsed.as_secs_f64()
            );
            for file in &report.files {
                println!("  {}", options.output.join(file).display());
            }
            for asset in &report.assets {
                println!("  {}", asset.display());
            }
        }
        None => println!("Compilation disabled"),
    }
    Ok(report)
}

/// Render a compiled template with an optional JSON context file.
pub fn render_cmd(template: &str, root: &Path, context: Option<&Path>) -> Result<String> {
    let context = match context {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&src)
                .with_context(|| format!("invalid JSON in {}", path.display()))?
        }
        None => serde_json::Value::Object(serde_json::Map::new()),
    };
    let engine = Engine::new(root);
    engine
        .render(template, context)
        .with_context(|| format!("failed to render {template}"))
}

/// Component names a template uses, recursively.
pub fn find_cmd(template: &str, root: &Path) -> Result<Vec<String>> {
    gloam_template::find_components(root, template)
        .with_context(|| format!("failed to scan {}", root.join(template).display()))
}

/// Install the log subscriber. `RUST_LOG` wins unless `verbose` is set.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
