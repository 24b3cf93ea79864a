use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use longevity::charts;
use longevity::data::load_dataset;
use longevity::report;

#[derive(Parser)]
#[command(
    name = "longevity",
    about = "Country life-expectancy CSV analysis & chart toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text EDA report
    Report {
        /// Optional path to the CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Top N by life expectancy
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Filter year for the top list
        #[arg(long)]
        year: Option<i64>,

        /// Also print the trend for a country
        #[arg(long)]
        country: Option<String>,

        /// Columns to include in the correlation matrix
        #[arg(long, num_args = 0.., value_name = "COL")]
        corrcols: Vec<String>,
    },
    /// Render the chart set as PNG files
    Charts {
        /// Optional path to the CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Country for the trend chart
        #[arg(long, default_value = "Thailand")]
        country: String,

        /// Top N for the bar chart
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Year for the bar chart; defaults to the most frequent year
        #[arg(long)]
        year: Option<i64>,

        /// Output directory for the images
        #[arg(long, default_value = "outputs")]
        out: PathBuf,

        /// Keep the GDP axis linear instead of log-scaled
        #[arg(long)]
        linear_gdp: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            csv,
            top,
            year,
            country,
            corrcols,
        } => {
            let df = load_dataset(csv.as_deref())?;
            report::print_report(&df, top, year, country.as_deref(), &corrcols)?;
        }
        Commands::Charts {
            csv,
            country,
            top,
            year,
            out,
            linear_gdp,
        } => {
            let df = load_dataset(csv.as_deref())?;
            charts::prepare_output_dir(&out)?;
            charts::render_all(&df, &out, &country, top, year, !linear_gdp)?;
        }
    }
    Ok(())
}
