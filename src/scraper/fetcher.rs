use crate::model::{FetchRequest, ScraperError};
use crate::scraper::traits::Scraper;

use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const MAX_ATTEMPTS: u32 = 3;

pub struct ScraperImpl {
    pub client: Client,
}

impl ScraperImpl {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) NandSniperBot/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self { client })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScraperError::Timeout
            } else {
                ScraperError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        if !status.is_success() {
            warn!("Source responded [{}]", status);
            return Err(ScraperError::InvalidResponse(body));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    /// Fetches the page, retrying transport failures with a jittered backoff.
    /// A non-success status is returned immediately with the body attached.
    async fn fetch(&self, req: &FetchRequest) -> Result<String, ScraperError> {
        let mut attempt = 1;
        loop {
            info!("Fetching {} (attempt {}/{})", req.url, attempt, MAX_ATTEMPTS);
            match self.fetch_once(&req.url).await {
                Ok(body) => return Ok(body),
                Err(e @ ScraperError::InvalidResponse(_)) => return Err(e),
                Err(e) if attempt >= MAX_ATTEMPTS => return Err(e),
                Err(e) => {
                    let jitter = rand::rng().random_range(0..1000);
                    let delay = Duration::from_millis(2000 * u64::from(attempt) + jitter);
                    warn!("Fetch failed: {}, retrying in {:?}", e, delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
