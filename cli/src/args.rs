use clap::{error::ErrorKind, CommandFactory, Parser};
use lifesep_lib::SeparatorConfig;
use std::path::PathBuf;

/// Separate a pattern of an isotropic non-totalistic Life-like rule into its objects.
///
/// The pattern is read in RLE format from a file, or from stdin if no file is given.
#[derive(Debug, Parser)]
#[command(name = "lifesep")]
pub struct Args {
    /// RLE file to read the pattern from.
    pub input: Option<PathBuf>,

    /// Birth transitions, e.g. `3` or `2a,3-q`.
    #[arg(short, long, value_delimiter = ',', default_value = "3")]
    pub birth: Vec<String>,

    /// Survival transitions, e.g. `2,3` or `1e,2`.
    #[arg(short, long, value_delimiter = ',', default_values = ["2", "3"])]
    pub survival: Vec<String>,

    #[command(flatten)]
    pub config: SeparatorConfig,

    /// Generate a random square soup of this size instead of reading a pattern.
    #[arg(long, conflicts_with = "input")]
    pub soup: Option<usize>,

    /// Seed of the random soup.
    ///
    /// If not given, a random seed is used.
    #[arg(long, requires = "soup")]
    pub seed: Option<u64>,

    /// Density of living cells in the random soup.
    #[arg(long, default_value = "0.5")]
    pub density: f64,

    /// Number of generations to run the pattern before separating it.
    #[arg(short, long, default_value = "0")]
    pub run: u64,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Parse and validate the command line arguments.
    pub fn parse_and_validate() -> Self {
        let args = Self::parse();

        if !(0.0..=1.0).contains(&args.density) {
            Self::command()
                .error(ErrorKind::ValueValidation, "density must be between 0 and 1")
                .exit();
        }

        if args.soup == Some(0) {
            Self::command()
                .error(ErrorKind::ValueValidation, "soup size must be > 0")
                .exit();
        }

        match args.config.check() {
            Ok(config) => Self { config, ..args },
            Err(e) => Self::command().error(ErrorKind::ValueValidation, e).exit(),
        }
    }
}
