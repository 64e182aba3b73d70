use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncWriteExt, BufWriter, Stdout};
use tracing::{info, warn};

use pricefeed::prelude::*;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = match ImportConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pricefeed: {e}");
            std::process::exit(2);
        }
    };

    init_tracing(&config.log_level);

    CliApp::new("pricefeed")
        .run(|cancel, writer| run_import(args, config, cancel, writer))
        .await
}

/// Import the feed into an in-memory store and print the stored prices
async fn run_import(
    args: CliArgs,
    config: ImportConfig,
    cancel: CancellationToken,
    mut writer: BufWriter<Stdout>,
) -> Result<(), AppError> {
    let rows = PriceRowStream::from_file(&args.input, config.delimiter).await?;

    let store = Arc::new(ConcurrentPriceStore::new());
    let processor = ChunkStreamProcessor::new(PriceImporter::new(Arc::clone(&store)))
        .with_chunk_size(config.chunk_size);

    let timestamp = args.import_timestamp();
    info!(
        input = %args.input.display(),
        chunk_size = config.chunk_size,
        %timestamp,
        "Starting import"
    );

    // Chunks committed before a failure or cancellation are still reported
    let outcome = processor.process(&cancel, rows, timestamp).await;
    if let Err(e) = &outcome {
        warn!(error = %e, "Import finished with failures");
    }

    let entries = store
        .price_entries(&args.sort_options(), args.pagination())
        .await?;
    write_price_entries(&entries, &mut writer).await?;
    writer.flush().await?;

    outcome?;
    Ok(())
}
