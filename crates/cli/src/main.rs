use als::{AlsConfig, AlsTrainer, InteractionMatrix};
use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::{InteractionDataset, holdout_split};
use pipeline::{Recommender, evaluate};
use rand::Rng;
use server::{ModelSnapshot, Recommendation, RecommendationService, train_snapshot};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// vidrec - implicit-feedback video recommendation engine
#[derive(Parser)]
#[command(name = "vidrec")]
#[command(about = "Video recommendations from implicit feedback using ALS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate raw interactions and show the indexed table
    Features {
        /// Raw interactions CSV (userId,videoId,interactionValue)
        #[arg(long, env = "VIDREC_DATA", default_value = "data/interactions.csv")]
        input: PathBuf,
    },

    /// Train a model and write its snapshot
    Train {
        #[arg(long, env = "VIDREC_DATA", default_value = "data/interactions.csv")]
        input: PathBuf,

        /// Where to write the model snapshot
        #[arg(long, env = "VIDREC_MODEL", default_value = "models/als_model.json")]
        output: PathBuf,

        #[command(flatten)]
        hyper: HyperParams,
    },

    /// Get video recommendations for a user
    Recommend {
        #[arg(long, env = "VIDREC_MODEL", default_value = "models/als_model.json")]
        model: PathBuf,

        /// User key, e.g. u002
        #[arg(long)]
        user_id: String,

        /// Number of recommendations to return
        #[arg(short, long, default_value = "5")]
        k: usize,
    },

    /// Find videos similar to a video
    Similar {
        #[arg(long, env = "VIDREC_MODEL", default_value = "models/als_model.json")]
        model: PathBuf,

        /// Video key, e.g. v001
        #[arg(long)]
        video_id: String,

        #[arg(short, long, default_value = "5")]
        k: usize,
    },

    /// Hold out part of the data, train on the rest and report precision/recall@K
    Evaluate {
        #[arg(long, env = "VIDREC_DATA", default_value = "data/interactions.csv")]
        input: PathBuf,

        #[arg(short, long, default_value = "5")]
        k: usize,

        /// Fraction of interactions held out for testing
        #[arg(long, default_value = "0.2")]
        test_ratio: f64,

        /// Seed for the holdout shuffle
        #[arg(long, default_value = "7")]
        split_seed: u64,

        #[command(flatten)]
        hyper: HyperParams,
    },

    /// Run benchmark to test recommendation latency
    Benchmark {
        #[arg(long, env = "VIDREC_MODEL", default_value = "models/als_model.json")]
        model: PathBuf,

        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        #[arg(short, long, default_value = "5")]
        k: usize,
    },

    /// Serve the HTTP API for a trained model
    Serve {
        #[arg(long, env = "VIDREC_MODEL", default_value = "models/als_model.json")]
        model: PathBuf,

        /// Address to listen on
        #[arg(long, env = "VIDREC_ADDR", default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
}

/// ALS hyper-parameters
#[derive(Args)]
struct HyperParams {
    /// Latent factors per user and video
    #[arg(long, env = "VIDREC_FACTORS", default_value = "20")]
    factors: usize,

    /// L2 regularization weight
    #[arg(long, env = "VIDREC_REGULARIZATION", default_value = "0.1")]
    regularization: f32,

    /// ALS sweeps over users and videos
    #[arg(long, env = "VIDREC_ITERATIONS", default_value = "20")]
    iterations: usize,

    /// Confidence scale: c = 1 + alpha * strength
    #[arg(long, env = "VIDREC_ALPHA", default_value = "1.0")]
    alpha: f32,

    /// Seed for factor initialization
    #[arg(long, env = "VIDREC_SEED", default_value = "42")]
    seed: u64,

    /// Log the training loss after every iteration (debug level)
    #[arg(long)]
    training_loss: bool,
}

impl HyperParams {
    fn config(&self) -> AlsConfig {
        AlsConfig::new(self.factors, self.regularization, self.iterations, self.alpha)
            .with_seed(self.seed)
            .with_training_loss(self.training_loss)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Features { input } => handle_features(&input)?,
        Commands::Train {
            input,
            output,
            hyper,
        } => handle_train(&input, &output, hyper.config())?,
        Commands::Recommend { model, user_id, k } => {
            handle_recommend(load_service(&model)?, &user_id, k)?
        }
        Commands::Similar { model, video_id, k } => {
            handle_similar(load_service(&model)?, &video_id, k)?
        }
        Commands::Evaluate {
            input,
            k,
            test_ratio,
            split_seed,
            hyper,
        } => handle_evaluate(&input, k, test_ratio, split_seed, hyper.config())?,
        Commands::Benchmark {
            model,
            requests,
            concurrent,
            k,
        } => handle_benchmark(Arc::new(load_service(&model)?), requests, concurrent, k).await?,
        Commands::Serve { model, addr } => {
            server::serve(Arc::new(load_service(&model)?), addr).await?
        }
    }

    Ok(())
}

fn load_dataset(input: &Path) -> Result<InteractionDataset> {
    println!("Loading interactions from {}...", input.display());
    let start = Instant::now();
    let dataset = InteractionDataset::load_from_file(input)
        .with_context(|| format!("Failed to load interactions from {}", input.display()))?;
    let (users, videos, records) = dataset.counts();
    println!(
        "{} Loaded {} users, {} videos, {} user-video pairs in {:?}",
        "✓".green(),
        users,
        videos,
        records,
        start.elapsed()
    );
    Ok(dataset)
}

fn load_service(model: &Path) -> Result<RecommendationService> {
    let snapshot = ModelSnapshot::load(model)
        .with_context(|| format!("Failed to load model snapshot {}", model.display()))?;
    RecommendationService::from_snapshot(snapshot).context("Model snapshot is inconsistent")
}

/// Handle the 'features' command
fn handle_features(input: &Path) -> Result<()> {
    let dataset = load_dataset(input)?;

    println!(
        "{}",
        format!(
            "{:<10} {:<10} {:>10} {:>9} {:>10}",
            "userId", "videoId", "rating", "user_idx", "video_idx"
        )
        .bold()
        .blue()
    );
    for record in dataset.records() {
        let user_idx = dataset.users().index_of(&record.user_key);
        let video_idx = dataset.videos().index_of(&record.video_key);
        println!(
            "{:<10} {:<10} {:>10} {:>9} {:>10}",
            record.user_key,
            record.video_key,
            record.strength,
            user_idx.map(|i| i.to_string()).unwrap_or_default(),
            video_idx.map(|i| i.to_string()).unwrap_or_default()
        );
    }
    Ok(())
}

/// Handle the 'train' command
fn handle_train(input: &Path, output: &Path, config: AlsConfig) -> Result<()> {
    let dataset = load_dataset(input)?;

    println!(
        "Training ALS (factors={}, regularization={}, iterations={}, alpha={})...",
        config.factors, config.regularization, config.iterations, config.alpha
    );
    let start = Instant::now();
    let snapshot = train_snapshot(&dataset, config).context("Training failed")?;
    println!("{} Trained model in {:?}", "✓".green(), start.elapsed());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    snapshot
        .save(output)
        .with_context(|| format!("Failed to save model to {}", output.display()))?;
    println!("{} Saved model to {}", "✓".green(), output.display());
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(service: RecommendationService, user_id: &str, k: usize) -> Result<()> {
    let recommendations = service.recommend(user_id, k)?;
    if recommendations.is_empty() {
        println!("No recommendations available for user {}", user_id);
        return Ok(());
    }
    print_ranked(
        &format!("Recommendations for {}:", user_id),
        &recommendations,
    );
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(service: RecommendationService, video_id: &str, k: usize) -> Result<()> {
    let similar = service.similar_items(video_id, k)?;
    print_ranked(&format!("Videos similar to {}:", video_id), &similar);
    Ok(())
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    input: &Path,
    k: usize,
    test_ratio: f64,
    split_seed: u64,
    config: AlsConfig,
) -> Result<()> {
    let dataset = load_dataset(input)?;
    let split = holdout_split(&dataset.interactions(), test_ratio, split_seed)?;
    info!(
        "Split into {} training and {} held-out interactions",
        split.train.len(),
        split.test.len()
    );
    if split.test.is_empty() {
        return Err(anyhow!(
            "Nothing held out; use more data or a larger --test-ratio"
        ));
    }

    let (users, videos, _) = dataset.counts();
    let train = InteractionMatrix::from_interactions(users, videos, &split.train)?;
    let store = AlsTrainer::new(config)?.fit(&train)?;
    let recommender = Recommender::new(Arc::new(store));

    let report = evaluate(&recommender, &train, &split.test, k)?;

    println!("{}", "Offline evaluation:".bold().blue());
    println!("Users evaluated: {}", report.users_evaluated);
    println!("Precision@{}: {:.4}", k, report.precision);
    println!("Recall@{}: {:.4}", k, report.recall);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: Arc<RecommendationService>,
    requests: usize,
    concurrent: usize,
    k: usize,
) -> Result<()> {
    let users = service.users().keys().to_vec();
    if users.is_empty() || requests == 0 {
        return Err(anyhow!("Nothing to benchmark"));
    }

    // Pick random users from the model
    let user_keys: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| users[rng.random_range(0..users.len())].clone())
            .collect()
    };

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();
    let mut handles = vec![];
    for user in user_keys {
        let service = service.clone();
        let permits = permits.clone();
        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            tokio::task::spawn_blocking(move || service.recommend(&user, k)).await??;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Print a ranked list with a header
fn print_ranked(header: &str, items: &[Recommendation]) {
    println!("{}", header.bold().blue());
    for (rank, item) in items.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.4}",
            (rank + 1).to_string().green(),
            item.item_key,
            item.score
        );
    }
}
