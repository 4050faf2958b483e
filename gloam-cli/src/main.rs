use anyhow::Result;
use clap::{Parser, Subcommand};
use gloam_cli::{BuildArgs, build_cmd, find_cmd, init_logging, render_cmd};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gloam", version, about = "Component template compiler")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a directory of templates.
    Build(BuildArgs),
    /// Render a compiled template.
    Render {
        /// Template path relative to the root, e.g. page.twig
        template: String,
        /// Compiled output directory
        #[arg(long)]
        root: PathBuf,
        /// JSON file with the render context
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// List the components a template uses.
    Find {
        template: String,
        /// Template root directory
        #[arg(long)]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Build(args) => {
            build_cmd(&args)?;
        }
        Commands::Render {
            template,
            root,
            context,
        } => print!("{}", render_cmd(&template, &root, context.as_deref())?),
        Commands::Find { template, root } => {
            for name in find_cmd(&template, &root)? {
                println!("{name}");
            }
        }
    }
    Ok(())
}
