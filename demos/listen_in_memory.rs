use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wal_listener::kafka::memory;
use wal_listener::listener::{payload_processor, PositionBatcher, Reader, ReaderConfig};
use wal_listener::wal::CommitPosition;
use wal_listener::Error;

/// Example: listening to an in-memory WAL topic
///
/// Writes a handful of records, listens until the queue is drained (or Ctrl-C),
/// and checkpoints processed positions in batches.
///
/// To run this example:
///   RUST_LOG=debug cargo run --example listen_in_memory

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ReaderConfig::new()
        .with_backoff_max_elapsed_time(Duration::from_secs(5))
        .with_checkpoint_flush_interval(3);

    let (mut writer, queue) = memory::channel("wal", 64);
    for i in 0..8 {
        let payload = format!(r#"{{"lsn":"0/{:X}","table":"accounts"}}"#, 0x1000 + i * 0x40);
        writer.write(i % 2, format!("accounts-{}", i), payload).await?;
    }
    info!(count = 8, topic = writer.topic(), "wrote test records");
    // Closing the writer lets the listener stop once the queue is drained
    drop(writer);

    let queue = Arc::new(queue);
    let (position_tx, mut position_rx) = mpsc::unbounded_channel::<CommitPosition>();
    let reader = Arc::new(Reader::new(
        queue.clone(),
        config.clone(),
        payload_processor(move |_cancel, value, position| {
            let position_tx = position_tx.clone();
            async move {
                info!(%position, payload = %String::from_utf8_lossy(&value), "processing record");
                position_tx
                    .send(position)
                    .map_err(|_| Error::Processing("checkpoint channel closed".to_string()))
            }
        }),
    )?);

    let cancel = CancellationToken::new();
    let mut listener = {
        let reader = Arc::clone(&reader);
        let cancel = cancel.clone();
        tokio::spawn(async move { reader.listen(&cancel).await })
    };

    // Checkpoints are not tied to the listener token
    let commit_cancel = CancellationToken::new();
    let mut batcher = PositionBatcher::new(config.checkpoint_flush_interval);
    loop {
        tokio::select! {
            Some(position) = position_rx.recv() => {
                if let Some(batch) = batcher.push(position) {
                    reader.checkpoint(&commit_cancel, &batch).await?;
                    info!(count = batch.len(), "checkpointed");
                }
            }
            result = &mut listener => {
                match result? {
                    Err(err) if err.is_canceled() => info!("listener canceled"),
                    Err(err) => warn!(error = %err, "listener stopped"),
                    Ok(()) => {}
                }
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
            }
        }
    }

    // Positions handed over before the listener stopped still need a checkpoint
    while let Ok(position) = position_rx.try_recv() {
        if let Some(batch) = batcher.push(position) {
            reader.checkpoint(&commit_cancel, &batch).await?;
            info!(count = batch.len(), "checkpointed");
        }
    }
    if let Some(batch) = batcher.flush() {
        reader.checkpoint(&commit_cancel, &batch).await?;
        info!(count = batch.len(), "checkpointed remaining positions");
    }

    for partition in 0..2 {
        info!(
            partition,
            committed = ?queue.committed_offset("wal", partition),
            "final committed offset"
        );
    }

    Ok(())
}
