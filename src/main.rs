use chrono::{Local, Utc};
use nand_sniper::analyzer::{Analyzer, AnalyzerImpl};
use nand_sniper::config::{AppConfig, load_config};
use nand_sniper::model::{FetchRequest, PriceRecord, ScraperError};
use nand_sniper::normalizer::normalize_all;
use nand_sniper::notifier::{TelegramNotifier, render_report};
use nand_sniper::parser::{DramExchangeParser, Parser};
use nand_sniper::scraper::{QuoteProvider, Scraper, ScraperImpl, StubQuoteProvider, fetch_quotes};
use nand_sniper::storage::SqliteStorage;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let scraper = match ScraperImpl::new() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize scraper: {}", e);
            return;
        }
    };
    let parser = DramExchangeParser::new();
    let quotes = StubQuoteProvider;
    let analyzer = AnalyzerImpl::new(config.analysis.clone(), config.catalog());

    // Storage is the single writer of the history log
    let storage = match SqliteStorage::new(&config.db_path) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return;
        }
    };

    let refresh_notify = Arc::new(Notify::new());
    let notifier = match TelegramNotifier::new(storage.clone(), config.clone(), refresh_notify.clone()) {
        Ok(n) => Arc::new(n),
        Err(e) => {
            error!("Failed to initialize notifier: {}", e);
            return;
        }
    };

    if let Err(e) = notifier.set_my_commands().await {
        warn!("Failed to register bot commands: {:?}", e);
    }
    TelegramNotifier::spawn_listener(notifier.clone());

    info!("Sending startup message...");
    if let Err(e) = notifier.notify_text("🚀 NandSniper started!").await {
        warn!("Startup notification failed: {}", e);
    }

    loop {
        run_cycle(&config, &scraper, &parser, &quotes, &analyzer, &storage, &notifier).await;

        info!(
            "Waiting for timer ({}s) or manual refresh...",
            config.check_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = refresh_notify.notified() => {
                info!("Manual refresh triggered.");
            }
        }
    }
}

/// One daily check: fetch, parse, analyze against the stored history,
/// persist and report.
async fn run_cycle(
    config: &AppConfig,
    scraper: &dyn Scraper,
    parser: &DramExchangeParser,
    quote_provider: &dyn QuoteProvider,
    analyzer: &AnalyzerImpl,
    storage: &Arc<Mutex<SqliteStorage>>,
    notifier: &TelegramNotifier,
) {
    info!("Fetching prices from {}...", config.source_url);
    let request = FetchRequest {
        url: config.source_url.clone(),
    };
    let (page, quotes) = futures::join!(
        scraper.fetch(&request),
        fetch_quotes(quote_provider, &config.stocks)
    );

    let html = match page {
        Ok(html) => html,
        Err(e) => {
            if let ScraperError::InvalidResponse(body) = &e {
                log_and_save_html(body);
            }
            warn!("Scraper error: {}", e);
            if let Err(e) = notifier.notify_text("❌ NAND price fetch failed").await {
                warn!("Failure notification failed: {}", e);
            }
            return;
        }
    };

    info!("Parsing HTML...");
    let raw = match parser.parse(&html, &config.items) {
        Ok(raw) => raw,
        Err(e) => {
            log_and_save_html(&html);
            warn!("Parse error: {}", e);
            return;
        }
    };

    let items = normalize_all(raw, &config.items);
    info!("Parsed {} of {} tracked items", items.len(), config.items.len());
    if items.is_empty() {
        log_and_save_html(&html);
    }
    let record = PriceRecord {
        date: Local::now().date_naive(),
        fetched_at: Some(Utc::now()),
        items,
    };

    let retention = config.analysis.retention;
    let history = {
        let storage = storage.lock().await;
        match storage.load_history_before(record.date, retention) {
            Ok(h) => h,
            Err(e) => {
                warn!("History load failed, continuing without history: {}", e);
                Vec::new()
            }
        }
    };

    let analysis = analyzer.analyze(&record, &history);

    {
        let storage = storage.lock().await;
        if let Err(e) = storage.append_record(&record) {
            warn!("DB save error: {}", e);
        } else if let Err(e) = storage.truncate_history(retention) {
            warn!("History truncate error: {}", e);
        }
        let date = record.date.format("%Y-%m-%d").to_string();
        if let Err(e) = storage.save_stock_snapshot(&date, &quotes, retention) {
            warn!("Stock snapshot save error: {}", e);
        }
    }

    let report = render_report(&record, &analysis, &quotes, &history, Utc::now());
    info!("Sending report ({} chars)...", report.chars().count());
    if let Err(e) = notifier.notify_report(&report).await {
        warn!("Telegram send error: {}", e);
    }
}

/// Saves the fetched HTML for debugging parse problems.
fn log_and_save_html(html: &str) {
    let folder = Path::new("logs/html");
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create debug folder: {}", e);
        return;
    }
    let filename = folder.join(format!("debug-{}.html", Local::now().format("%Y%m%d-%H%M%S")));
    if let Err(e) = fs::write(&filename, html) {
        warn!("Failed to write debug HTML: {}", e);
    } else {
        info!("Saved debug HTML: {}", filename.display());
    }
}
