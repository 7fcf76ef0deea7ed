use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use classremap::common::Config;
use classremap::properties;

#[derive(Parser)]
#[command(name = "classremap")]
#[command(about = "Rewrites constant-pool string literals in JVM class files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a .class file, a jar archive, or a directory tree
    Transform {
        /// Input .class file, archive, or directory
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path of the same kind as the input
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Mapping properties file (default: embedded javax->jakarta mapping)
        #[arg(short, long, value_name = "FILE")]
        mapping: Option<PathBuf>,

        /// Report each rewritten file
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the effective mapping pairs
    Mappings {
        /// Mapping properties file (default: embedded javax->jakarta mapping)
        #[arg(short, long, value_name = "FILE")]
        mapping: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Transform { input, output, mapping, verbose } => {
            let mut config = Config::new().with_verbose(*verbose);
            if let Some(path) = mapping {
                config = config.with_mapping_file(path);
            }
            classremap::transform_path(input, output, &config)?;
        }
        Commands::Mappings { mapping } => {
            print_mappings(mapping.as_deref())?;
        }
    }

    Ok(())
}

fn print_mappings(mapping: Option<&std::path::Path>) -> Result<()> {
    let text = match mapping {
        Some(path) => fs::read_to_string(path)?,
        None => properties::DEFAULT_MAPPING.to_owned(),
    };
    // build once so an invalid file is reported instead of printed
    properties::table_from_str(&text)?;
    for (from, to) in properties::parse_mapping(&text)? {
        println!("{from} -> {to}");
    }
    Ok(())
}
