#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use features_maximization_metric::{Dataset, FeaturesMaximizationMetric, RankingOptions, SortBy};

#[derive(Parser)]
#[command(name = "fmc", version, about = "Features Maximization Metric CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ModelArgs {
    /// Path to dataset JSON (features, classes, vectors)
    #[arg(long)]
    dataset: PathBuf,
    /// Override the dataset's amplification factor
    #[arg(long, allow_hyphen_values = true)]
    amplification_factor: Option<i64>,
    /// Report construction milestones (shown with -v)
    #[arg(long)]
    verbose_progress: bool,
}

#[derive(Args)]
struct RankArgs {
    /// Include non-activated candidates
    #[arg(long)]
    all: bool,
    /// Ranking metric: contrast or fmeasure
    #[arg(long, default_value = "contrast")]
    sort_by: String,
    /// Maximum number of results
    #[arg(long)]
    max_number: Option<usize>,
}

impl RankArgs {
    fn options(&self) -> Result<RankingOptions, Box<dyn std::error::Error>> {
        let sort_by: SortBy = self.sort_by.parse()?;
        Ok(RankingOptions {
            activation_only: !self.all,
            sort_by,
            max_number: self.max_number,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print selection and activation of every feature
    Summary {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Rank classes for a feature
    Classes {
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        feature: String,
        #[command(flatten)]
        rank: RankArgs,
    },
    /// Rank features for a class
    Features {
        #[command(flatten)]
        model: ModelArgs,
        #[arg(long)]
        classe: String,
        #[command(flatten)]
        rank: RankArgs,
    },
    /// Compare a dataset's modelization against a reference one
    Compare {
        #[command(flatten)]
        model: ModelArgs,
        /// Reference dataset JSON (same features)
        #[arg(long)]
        reference: PathBuf,
        /// Round scores to this many decimals
        #[arg(long)]
        rounded: Option<u32>,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_model(
    path: &Path,
    args: &ModelArgs,
) -> Result<FeaturesMaximizationMetric, Box<dyn std::error::Error>> {
    let dataset = Dataset::load(path)?;
    let mut config = dataset.config.clone();
    if let Some(factor) = args.amplification_factor {
        config.amplification_factor = factor;
    }
    if args.verbose_progress {
        config.verbose = true;
    }
    Ok(dataset.modelize_with(&config)?)
}

fn print_summary(fmc: &FeaturesMaximizationMetric) {
    println!("classes: {}", fmc.classes().join(", "));
    println!("overall_average: {}", fmc.overall_average());
    let options = RankingOptions::default();
    for (feature, selected) in fmc.selection().iter() {
        let activated = fmc
            .get_most_activated_classes_by_feature(feature, &options)
            .unwrap_or_default();
        let marginal = fmc.marginal_averages().get(feature).unwrap_or_default();
        println!(
            "{feature}\tselected={selected}\tmarginal_average={marginal}\tactivated=[{}]",
            activated.join(", ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Summary { model } => {
            let fmc = load_model(&model.dataset, &model)?;
            print_summary(&fmc);
        }
        Commands::Classes {
            model,
            feature,
            rank,
        } => {
            let fmc = load_model(&model.dataset, &model)?;
            let options = rank.options()?;
            for classe in fmc.get_most_activated_classes_by_feature(&feature, &options)? {
                println!("{classe}");
            }
        }
        Commands::Features {
            model,
            classe,
            rank,
        } => {
            let fmc = load_model(&model.dataset, &model)?;
            let options = rank.options()?;
            for feature in fmc.get_most_active_features_by_classe(&classe, &options)? {
                println!("{feature}");
            }
        }
        Commands::Compare {
            model,
            reference,
            rounded,
        } => {
            let fmc = load_model(&model.dataset, &model)?;
            let reference = load_model(&reference, &model)?;
            let similarity = fmc.compare(&reference, rounded)?;
            println!("homogeneity={}", similarity.homogeneity);
            println!("completeness={}", similarity.completeness);
            println!("v_measure={}", similarity.v_measure);
        }
    }
    Ok(())
}
