//! bucketwork worker - S3 bucket lifecycle over NATS.
//!
//! Subscribes to `<resource>.create.<provider>`, `<resource>.update.<provider>`
//! and `<resource>.delete.<provider>`, runs each message on its own task, and
//! replies on `<subject>.done` or `<subject>.error`.
//!
//! # Usage
//!
//! ```text
//! NATS_URI=nats://127.0.0.1:4222 bucketwork-worker
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NATS_URI` | `nats://127.0.0.1:4222` | NATS server to subscribe on |
//! | `RESOURCE` | `s3` | Resource segment of the subjects |
//! | `PROVIDER` | `aws` | Provider segment of the subjects |
//! | `BUCKET_WAIT_TIMEOUT_SECS` | `120` | Bound for the post-create existence wait |
//! | `AWS_ENDPOINT_URL` | *(unset)* | S3-compatible endpoint override |
//! | `S3_FORCE_PATH_STYLE` | `false` | Path-style bucket addressing |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod nats;

use std::sync::Arc;

use anyhow::{Context, Result};
use bucketwork_core::{Dispatcher, S3ClientFactory, WorkerConfig};
use futures::StreamExt;
use futures::stream::SelectAll;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::nats::NatsPublisher;

/// Worker version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

type WorkerDispatcher = Dispatcher<S3ClientFactory, NatsPublisher>;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Subscribe to every inbound subject and merge the subscriptions.
async fn subscribe_all(
    client: &async_nats::Client,
    config: &WorkerConfig,
) -> Result<SelectAll<async_nats::Subscriber>> {
    let mut merged = SelectAll::new();
    for subject in config.subjects() {
        let subscriber = client
            .subscribe(subject.clone())
            .await
            .with_context(|| format!("failed to subscribe to {subject}"))?;
        info!(subject = %subject, "listening");
        merged.push(subscriber);
    }
    Ok(merged)
}

/// Re-raise a handler panic; anything else is logged.
fn check_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            std::panic::resume_unwind(e.into_panic());
        }
        error!(error = %e, "message handler task failed");
    }
}

/// Run one task per inbound message until a shutdown signal is received.
async fn serve(
    mut messages: SelectAll<async_nats::Subscriber>,
    dispatcher: Arc<WorkerDispatcher>,
) {
    let mut tasks = JoinSet::new();

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining in-flight requests");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            next = messages.next() => {
                let Some(message) = next else {
                    warn!("all subscriptions closed");
                    break;
                };

                let dispatcher = Arc::clone(&dispatcher);
                tasks.spawn(async move {
                    let subject = message.subject.to_string();
                    let outcome = dispatcher.handle(&subject, message.payload).await;
                    debug!(subject = %subject, ?outcome, "message handled");
                });
            }

            Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                check_join(result);
            }

            () = &mut shutdown => break,
        }
    }

    while let Some(result) = tasks.join_next().await {
        check_join(result);
    }
    info!("all in-flight requests finished");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = WorkerConfig::from_env();
    init_tracing(&config.log_level)?;

    info!(
        version = VERSION,
        nats_uri = %config.nats_uri,
        endpoint_url = ?config.endpoint_url,
        "starting bucketwork worker"
    );

    let client = async_nats::connect(config.nats_uri.as_str())
        .await
        .with_context(|| format!("failed to connect to NATS at {}", config.nats_uri))?;

    let dispatcher = Arc::new(Dispatcher::new(
        config.client_factory(),
        NatsPublisher::new(client.clone()),
    ));

    let messages = subscribe_all(&client, &config).await?;
    serve(messages, dispatcher).await;

    client
        .flush()
        .await
        .context("failed to flush pending replies")?;

    Ok(())
}
