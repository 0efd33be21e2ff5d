use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{Headline, Mode, QueryDescriptor, QueryTarget, Summary};
use crate::network::NewsApi;

#[derive(Debug)]
pub enum FetchUpdate {
    Headlines(Vec<Headline>),
    Summary(Summary),
    Failed(FetchError),
    /// Always the last event of a fetch that was not cancelled.
    Finished,
}

/// One step of a fetch, tagged with the generation that started it.
#[derive(Debug)]
pub struct FetchEvent {
    pub generation: u64,
    pub update: FetchUpdate,
}

/// Sequences the headline and summary calls for a query descriptor.
pub struct Fetcher {
    api: Arc<dyn NewsApi>,
    digest_topics: Vec<String>,
    why_prefix: String,
}

impl Fetcher {
    pub fn new(api: Arc<dyn NewsApi>, digest_topics: Vec<String>, why_prefix: String) -> Self {
        Self { api, digest_topics, why_prefix }
    }

    /// Summary request titles for a mode.
    pub fn summary_titles(&self, headlines: &[Headline], mode: Mode) -> Vec<String> {
        headlines
            .iter()
            .map(|h| match mode {
                Mode::Brief => h.title.clone(),
                Mode::Why => format!("{}{}", self.why_prefix, h.title),
            })
            .collect()
    }

    /// Runs the fetch and reports every step on `tx`. Stops without a
    /// `Finished` event if the token is cancelled.
    pub async fn run(
        &self,
        generation: u64,
        descriptor: QueryDescriptor,
        tx: UnboundedSender<FetchEvent>,
        cancel: CancellationToken,
    ) {
        let send = |update: FetchUpdate| {
            // receiver gone means the app is shutting down
            let _ = tx.send(FetchEvent { generation, update });
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(generation, "fetch superseded");
            }
            result = self.fetch_all(&descriptor, &send) => {
                if let Err(e) = result {
                    warn!(generation, error = %e, "fetch failed");
                    send(FetchUpdate::Failed(e));
                }
                info!(generation, "fetch finished");
                send(FetchUpdate::Finished);
            }
        }
    }

    async fn fetch_all(
        &self,
        descriptor: &QueryDescriptor,
        send: &impl Fn(FetchUpdate),
    ) -> Result<(), FetchError> {
        let headlines = match &descriptor.target {
            QueryTarget::Search(query) => {
                info!(query = %query, mode = ?descriptor.mode, "fetching headlines");
                self.api.headlines(query).await?
            }
            QueryTarget::Digest => {
                let mut all = Vec::new();
                for topic in &self.digest_topics {
                    info!(topic = %topic, mode = ?descriptor.mode, "fetching digest topic");
                    all.extend(self.api.headlines(topic).await?);
                }
                all
            }
        };

        let titles = self.summary_titles(&headlines, descriptor.mode);
        send(FetchUpdate::Headlines(headlines));

        let summary = self.api.summarize(&titles).await?;
        send(FetchUpdate::Summary(summary));
        Ok(())
    }

    /// Runs a fetch to completion and returns its events in order.
    pub async fn collect(&self, descriptor: QueryDescriptor) -> Vec<FetchUpdate> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        self.run(0, descriptor, tx, CancellationToken::new()).await;
        let mut updates = Vec::new();
        while let Some(event) = rx.recv().await {
            updates.push(event.update);
        }
        updates
    }
}
