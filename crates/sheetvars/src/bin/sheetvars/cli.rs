//! sheetvars cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; sheetvars ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate tfvars from parameter workbooks
    #[command(alias = "gen")]
    Generate(GenerateCommand),

    /// Print debug information for development
    Dev(DevCommand),
}

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Directory receiving the tfvars file and policy documents
    #[clap(short = 'o', long = "output-dir", default_value = "output_tfvars")]
    pub output_dir: PathBuf,

    /// Skip the terraform fmt pass on the written file
    #[clap(long = "no-fmt")]
    pub no_fmt: bool,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Directory containing parameter workbooks
    #[clap(short = 'p', long = "parameter-dir", default_value = "parameter")]
    pub parameter_dir: PathBuf,

    /// Sheet-name mapping file, a JSON object of sheet name to exact name
    ///
    /// Defaults to sheetname_config.json when that file exists.
    #[clap(short = 'm', long = "sheet-map")]
    pub sheet_map: Option<PathBuf>,

    /// Common workbook with run-wide key/value parameters
    ///
    /// Defaults to <parameter-dir>/common.xlsx when that file exists.
    /// A loaded common workbook must define the `env` key; it routes the
    /// output into a per-environment directory.
    #[clap(long = "common")]
    pub common: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DevCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: DevSubCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevSubCommand {
    /// Print the loaded sheet tables
    Sheets,
    /// Print the built document
    Tree,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
