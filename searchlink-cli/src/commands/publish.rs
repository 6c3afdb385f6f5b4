//! Publish command - send an index command to the queue.

use colored::Colorize;
use searchlink_config::PublishSettings;
use searchlink_messaging::{
    IndexCommand, IndexProducer, MemoryQueue, OffloadDecider, OffloadPolicy, SqsQueue,
};
use searchlink_storage::{MemoryBlobStore, S3BlobStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CliError, CliResult};

const DRY_RUN_QUEUE: &str = "memory://dry-run";
const DRY_RUN_BUCKET: &str = "dry-run";

/// Options for the publish command.
pub struct PublishOptions {
    pub file: PathBuf,
    pub attach: Option<PathBuf>,
    pub mime: Option<String>,
    pub threshold: Option<usize>,
    pub queue_limit: Option<usize>,
    pub dry_run: bool,
}

/// Publish a command read from a JSON file.
pub async fn run(options: PublishOptions) -> CliResult<()> {
    let command = read_command(&options).await?;

    let producer = if options.dry_run {
        dry_run_producer(options.threshold, options.queue_limit)?
    } else {
        producer(options.threshold, options.queue_limit)?
    };

    debug!(
        verb = %command.verb(),
        index = command.index(),
        document_id = command.document().id(),
        "Publishing"
    );

    let receipt = producer.publish(&command).await?;

    println!("{}", receipt.message_id());
    match receipt.offloaded() {
        Some(reference) => eprintln!(
            "{} payload of {} bytes offloaded to s3://{}/{}",
            "✓".green(),
            reference.size_bytes(),
            reference.bucket(),
            reference.key()
        ),
        None => eprintln!("{} payload sent inline", "✓".green()),
    }

    Ok(())
}

async fn read_command(options: &PublishOptions) -> CliResult<IndexCommand> {
    let bytes = tokio::fs::read(&options.file).await?;
    let command = IndexCommand::from_slice(&bytes)?;

    let Some(path) = &options.attach else {
        return Ok(command);
    };
    let mime = options.mime.as_deref().ok_or_else(|| {
        CliError::InvalidArgument("--attach requires --mime".to_string())
    })?;

    let data = tokio::fs::read(path).await?;
    debug!(path = %path.display(), bytes = data.len(), mime, "Attaching file");

    let document = command.document().clone().with_attachment(mime, &data);
    Ok(IndexCommand::new(command.verb(), command.index(), document)?)
}

fn producer(threshold: Option<usize>, queue_limit: Option<usize>) -> CliResult<IndexProducer> {
    let settings = PublishSettings::load()?;
    let credential = settings.credential();

    let store = S3BlobStore::with_credentials(
        settings.payload_bucket(),
        credential.region(),
        credential.access_key_id(),
        credential.secret_key(),
    )?;
    let queue = SqsQueue::with_credentials(
        credential.region(),
        credential.access_key_id(),
        credential.secret_key(),
    );
    let decider = OffloadDecider::new(
        OffloadPolicy::from_overrides(
            threshold.or(settings.payload_threshold()),
            queue_limit.or(settings.max_message_size()),
        )?,
        Arc::new(store),
    );

    Ok(IndexProducer::new(
        settings.queue_url().as_str(),
        decider,
        Arc::new(queue),
    ))
}

fn dry_run_producer(threshold: Option<usize>, queue_limit: Option<usize>) -> CliResult<IndexProducer> {
    let decider = OffloadDecider::new(
        OffloadPolicy::from_overrides(threshold, queue_limit)?,
        Arc::new(MemoryBlobStore::new(DRY_RUN_BUCKET)),
    );
    Ok(IndexProducer::new(
        DRY_RUN_QUEUE,
        decider,
        Arc::new(MemoryQueue::new()),
    ))
}
