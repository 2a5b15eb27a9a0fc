use clap::{Parser, Subcommand};
use miette::{miette, Result};
use std::path::PathBuf;

use avm2_dec_rs::cli;

#[derive(Parser)]
#[command(name = "avm2-dec-rs")]
#[command(about = "Expression IR and source renderer for AVM2 bytecode decompilation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render JSON method bodies to source
    Render {
        /// Input JSON files, each a method body or a list of them
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with decompiler options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fold constant subexpressions before rendering
        #[arg(long)]
        fold: bool,

        /// Cancel rendering after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Cancel rendering once a method renders this many nodes
        #[arg(long)]
        max_nodes: Option<usize>,
    },

    /// Fold a JSON expression and print the result
    Fold {
        /// Input JSON expression
        input: PathBuf,
    },

    /// Replace shapes with image or SVG files named after their character id
    ImportShapes {
        /// Directory with the replacement files
        shapes_dir: PathBuf,

        /// JSON character table
        characters: PathBuf,

        /// Resize shapes to the image instead of filling their bounds
        #[arg(long)]
        no_fill: bool,

        /// Output file for the updated table (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            inputs,
            output,
            config,
            fold,
            timeout_ms,
            max_nodes,
        } => {
            let args = cli::render::RenderArgs {
                inputs,
                output_path: output,
                config_path: config,
                fold,
                timeout_ms,
                max_nodes,
            };
            cli::render::render(&args).map_err(|e| miette!("{}", e))
        }
        Commands::Fold { input } => cli::fold::fold(&input).map_err(|e| miette!("{}", e)),
        Commands::ImportShapes {
            shapes_dir,
            characters,
            no_fill,
            output,
        } => {
            let args = cli::import_shapes::ImportShapesArgs {
                shapes_dir,
                characters_path: characters,
                no_fill,
                output_path: output,
            };
            cli::import_shapes::import_shapes(&args).map_err(|e| miette!("{}", e))
        }
    }
}
