//! Command-line interface implementation for gecko.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_TEMPLATES_DIR;

/// Command-line arguments structure for gecko.
#[derive(Parser, Debug)]
#[command(author, version, about = "gecko: scaffold test projects from templates", long_about = None)]
pub struct Args {
    /// Builtin template name, directory under the templates root,
    /// git repository URL, or gh@owner/repo archive
    #[arg(value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Project name, also the name of the generated directory
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory the project directory is created in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding local templates
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_TEMPLATES_DIR)]
    pub templates_dir: PathBuf,

    /// Extra template variable, repeatable
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// JSON or YAML file with extra template variables
    #[arg(long, value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Never prompt; missing answers fall back to defaults
    #[arg(short = 'y', long)]
    pub no_input: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
