use clap::Parser;
use shelter_store::AnimalShelter;
use shelter_train::cli::{log_filter, Cli, Commands};
use shelter_train::{import_documents, read_documents, TrainingConfig, TrainingJob};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            config,
            output,
            data_dir,
            database,
            collection,
            seed,
            test_ratio,
            verbose,
        } => {
            init_logging(verbose);

            let mut config = TrainingConfig::load(&config)?;
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(data_dir) = data_dir {
                config.store.data_dir = data_dir;
            }
            if let Some(database) = database {
                config.store.database = database;
            }
            if let Some(collection) = collection {
                config.store.collection = collection;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(test_ratio) = test_ratio {
                config.test_ratio = test_ratio;
            }

            let shelter = AnimalShelter::open(&config.store)?;
            let report = TrainingJob::new(shelter, config).run().await?;

            println!("Model trained. Accuracy: {:.4}", report.accuracy);
            println!("  Records:  {} ({} dropped)", report.records, report.dropped);
            println!("  Split:    {} train / {} test", report.train_rows, report.test_rows);
            println!("  Artifact: {}", report.artifact_path.display());
            println!("  SHA-256:  {}", report.fingerprint);
        }

        Commands::Import {
            file,
            config,
            data_dir,
            verbose,
        } => {
            init_logging(verbose);

            let mut config = TrainingConfig::load(&config)?;
            if let Some(data_dir) = data_dir {
                config.store.data_dir = data_dir;
            }

            let shelter = AnimalShelter::open(&config.store)?;
            let documents = read_documents(&file)?;
            let summary = import_documents(&shelter, documents).await?;

            println!(
                "Imported {} records into {}",
                summary.acknowledged,
                config.store.collection_path().display()
            );
            if summary.unacknowledged > 0 || summary.rejected > 0 {
                println!(
                    "  {} unacknowledged, {} rejected",
                    summary.unacknowledged, summary.rejected
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
