// Tracking run: one token, then extract -> fetch -> record -> pause per URL.
use crate::config::{AppConfig, PacingConfig};
use crate::model::{JobError, RunSummary, SessionToken, TokenError};
use crate::parser::extract_ids;
use crate::scraper::{ProductApi, TikiScraper};
use crate::storage::{CsvObservationLog, RecordOutcome};
use crate::utils::local_timestamp;

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Delay between consecutive product requests.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a uniformly random duration in `[min, max]` seconds.
pub struct RandomPacer {
    min_secs: f64,
    max_secs: f64,
}

impl RandomPacer {
    pub fn new(cfg: &PacingConfig) -> Self {
        Self {
            min_secs: cfg.min_delay_seconds,
            max_secs: cfg.max_delay_seconds,
        }
    }

    fn next_delay(&self) -> Duration {
        let secs = rand::rng().random_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

#[async_trait::async_trait]
impl Pacer for RandomPacer {
    async fn pause(&self) {
        let delay = self.next_delay();
        info!("--- Pausing {:.2}s... ---", delay.as_secs_f64());
        sleep(delay).await;
    }
}

/// Runs one full tracking pass with a fresh HTTP session.
/// The session, and every connection it holds, is dropped on return.
pub async fn run_tracking_job(config: &AppConfig) -> Result<RunSummary, JobError> {
    info!("--- Run started at {} ---", local_timestamp());

    let scraper = TikiScraper::open(&config.proxy_url)?;
    let log = CsvObservationLog::new(&config.output_path);
    let pacer = RandomPacer::new(&config.pacing);

    let summary = track_products(&scraper, &config.tracked_urls, &log, &pacer).await?;

    info!(
        "--- Run finished: {} recorded, {} bad URLs, {} failed fetches, {} without price, {} write errors ---",
        summary.recorded,
        summary.skipped_extract,
        summary.skipped_fetch,
        summary.skipped_invalid,
        summary.failed_record
    );
    Ok(summary)
}

/// Core loop. Only a token failure ends the run early; every per-URL
/// failure is logged and skipped. The pacer runs after every URL.
pub async fn track_products<A, P>(
    api: &A,
    urls: &[String],
    log: &CsvObservationLog,
    pacer: &P,
) -> Result<RunSummary, TokenError>
where
    A: ProductApi + ?Sized,
    P: Pacer + ?Sized,
{
    let token = match api.acquire_token().await {
        Ok(token) => {
            info!("✅ Guest token acquired");
            token
        }
        Err(e) => {
            error!("❌ No guest token, aborting run: {}", e);
            return Err(e);
        }
    };

    let mut summary = RunSummary::default();

    for url in urls {
        process_url(api, url, &token, log, &mut summary).await;
        pacer.pause().await;
    }

    Ok(summary)
}

async fn process_url<A: ProductApi + ?Sized>(
    api: &A,
    url: &str,
    token: &SessionToken,
    log: &CsvObservationLog,
    summary: &mut RunSummary,
) {
    let ids = match extract_ids(url) {
        Ok(ids) => ids,
        Err(e) => {
            warn!("⚠️ {}", e);
            summary.skipped_extract += 1;
            return;
        }
    };

    let observation = match api.fetch_product(&ids, token).await {
        Ok(obs) => obs,
        Err(e) => {
            warn!("❌ Product {} skipped: {}", ids.product_id, e);
            summary.skipped_fetch += 1;
            return;
        }
    };

    match log.record(&observation) {
        Ok(RecordOutcome::Written) => {
            info!(
                "✅ Saved: {} - price: {}đ",
                observation.name.as_deref().unwrap_or("?"),
                observation.price.unwrap_or_default()
            );
            summary.recorded += 1;
        }
        Ok(RecordOutcome::SkippedNoPrice) => {
            info!("➡️ Product {} has no price, not saved", ids.product_id);
            summary.skipped_invalid += 1;
        }
        Err(e) => {
            warn!("❌ Failed to write {}: {}", log.path().display(), e);
            summary.failed_record += 1;
        }
    }
}
