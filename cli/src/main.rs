use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use pitaka_structure::logger;
use pitaka_structure_cli::{classify, detect, extract, list_families, ExtractOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract chapter and sutta structure from Pāli canon volumes", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the structure of one work from its volume files, in physical order
    #[command(arg_required_else_help = true)]
    Extract {
        /// Built-in family key or Pāli collection name. Detected from the first volume if not given.
        #[arg(long, env = "PITAKA_FAMILY")]
        family: Option<String>,

        /// JSON file with a custom book family, used instead of a built-in one
        #[arg(long, value_name = "FILE_PATH", env = "PITAKA_FAMILY_CONFIG")]
        config: Option<PathBuf>,

        /// Override the family's id prefix (e.g. "sn")
        #[arg(long)]
        prefix: Option<String>,

        /// Last chapter number of the previous volume of this work
        #[arg(long, value_name = "NUMBER")]
        continue_from: Option<u32>,

        /// Read the numbering state from this file and save the new state to it
        #[arg(long, value_name = "FILE_PATH")]
        state_file: Option<PathBuf>,

        /// Output JSON file
        #[arg(long, short, value_name = "FILE_PATH")]
        output: Option<PathBuf>,

        /// Folder for "<prefix>.json" when no output file is given
        #[arg(long, value_name = "DIRECTORY_PATH", env = "PITAKA_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Volume files (.txt or .jsonl)
        #[arg(value_name = "FILE_PATH", required = true)]
        volumes: Vec<PathBuf>,
    },

    /// List the built-in book families as JSON
    Families,

    /// Print the detected book family of a volume file
    #[command(arg_required_else_help = true)]
    Detect {
        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,
    },

    /// Print the heading classification of each normalized line, for tuning suffix tables
    #[command(arg_required_else_help = true)]
    Classify {
        #[arg(long, env = "PITAKA_FAMILY")]
        family: Option<String>,

        #[arg(long, value_name = "FILE_PATH", env = "PITAKA_FAMILY_CONFIG")]
        config: Option<PathBuf>,

        #[arg(value_name = "FILE_PATH")]
        path: PathBuf,
    },
}

fn main() {
    // Attempt to load .env file. This might define PITAKA_FAMILY and friends,
    // which clap picks up through the `env` attributes.
    if dotenv().is_err() {
        eprintln!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();
    logger::init();

    let command_result = match cli.command {
        Commands::Extract { family, config, prefix, continue_from, state_file, output, output_dir, volumes } => {
            extract(ExtractOptions { family, config, prefix, continue_from, state_file, output, output_dir, volumes })
                .map(|_| ())
        }
        Commands::Families => list_families(),
        Commands::Detect { path } => detect(&path),
        Commands::Classify { family, config, path } => classify(family, config, &path),
    };

    if let Err(e) = command_result {
        logger::error(&format!("{:#}", e));
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
