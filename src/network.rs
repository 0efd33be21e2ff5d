use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::formatter::summary_from_text;
use crate::models::{Headline, Summary, SummaryMeta, SummaryPoint};

/// The two backend endpoints the client consumes.
pub trait NewsApi: Send + Sync {
    fn headlines<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Headline>, FetchError>>;

    fn summarize<'a>(&'a self, titles: &'a [String]) -> BoxFuture<'a, Result<Summary, FetchError>>;
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    headlines: &'a [String],
}

/// The backend answers either with structured points or with one bulleted string.
#[derive(Deserialize)]
#[serde(untagged)]
enum SummaryPayload {
    Structured { meta: SummaryMeta, points: Vec<SummaryPoint> },
    Text { summary: String },
}

pub struct HttpNewsApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpNewsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)?;
        // join() would otherwise replace the last path segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(path)?)
    }
}

impl NewsApi for HttpNewsApi {
    fn headlines<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Vec<Headline>, FetchError>> {
        self.get_headlines(query).boxed()
    }

    fn summarize<'a>(&'a self, titles: &'a [String]) -> BoxFuture<'a, Result<Summary, FetchError>> {
        self.post_summary(titles).boxed()
    }
}

impl HttpNewsApi {
    async fn get_headlines(&self, query: &str) -> Result<Vec<Headline>, FetchError> {
        let url = self.endpoint("headlines")?;
        debug!(%url, query, "GET headlines");
        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        let response = check_status(response)?;
        Ok(response.json::<Vec<Headline>>().await?)
    }

    async fn post_summary(&self, titles: &[String]) -> Result<Summary, FetchError> {
        let url = self.endpoint("headlines/summary")?;
        debug!(%url, count = titles.len(), "POST summary");
        let response = self
            .client
            .post(url)
            .json(&SummaryRequest { headlines: titles })
            .send()
            .await?;
        let body = check_status(response)?.bytes().await?;
        decode_summary(&body, titles.len())
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status { status, url: response.url().to_string() })
    }
}

pub fn decode_summary(body: &[u8], sources: usize) -> Result<Summary, FetchError> {
    match serde_json::from_slice::<SummaryPayload>(body) {
        Ok(SummaryPayload::Structured { meta, points }) => Ok(Summary { meta, points }),
        Ok(SummaryPayload::Text { summary }) => Ok(summary_from_text(&summary, sources)),
        Err(e) => Err(FetchError::MalformedSummary(e.to_string())),
    }
}
