pub mod command_handler;
pub mod listener;
pub mod sender;

use crate::config::AppConfig;
use crate::model::NotifyError;
use crate::storage::SqliteStorage;
use reqwest::Client;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::time::Instant;
use tokio::sync::{Mutex, Notify};

pub struct TelegramNotifier {
    pub bot_token: String,
    pub chat_id: i64,
    pub client: Client,
    pub offset: Arc<AtomicI64>,
    pub storage: Arc<Mutex<SqliteStorage>>,
    pub config: Arc<AppConfig>,
    pub start_time: Instant,
    pub refresh_notify: Arc<Notify>,
}

impl TelegramNotifier {
    pub fn new(
        storage: Arc<Mutex<SqliteStorage>>,
        config: Arc<AppConfig>,
        refresh_notify: Arc<Notify>,
    ) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::ApiError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id,
            client,
            offset: Arc::new(AtomicI64::new(0)),
            storage,
            config,
            start_time: Instant::now(),
            refresh_notify,
        })
    }

    pub async fn notify_text(&self, text: &str) -> Result<(), NotifyError> {
        sender::send_text(self, text).await
    }

    /// Sends a report, split into several messages when it is too long.
    pub async fn notify_report(&self, report: &str) -> Result<(), NotifyError> {
        for chunk in sender::split_message(report, sender::MAX_MESSAGE_LEN) {
            sender::send_text(self, &chunk).await?;
        }
        Ok(())
    }

    pub async fn listen_for_commands(&self) {
        listener::listen_for_commands(self).await;
    }

    pub async fn set_my_commands(&self) -> Result<(), reqwest::Error> {
        let url = format!("https://api.telegram.org/bot{}/setMyCommands", self.bot_token);
        let commands = serde_json::json!({
            "commands": [
                { "command": "ping", "description": "Check connection" },
                { "command": "status", "description": "Show monitor status" },
                { "command": "help", "description": "Command list" },
                { "command": "last", "description": "Latest recorded prices" },
                { "command": "indicators", "description": "Current indicators" },
                { "command": "config", "description": "Current thresholds" },
                { "command": "stocks", "description": "Latest stock snapshot" },
                { "command": "refresh", "description": "Run a check now" },
                { "command": "uptime", "description": "Service uptime" }
            ]
        });
        self.client.post(&url).json(&commands).send().await?;
        Ok(())
    }

    pub fn spawn_listener(notifier: Arc<TelegramNotifier>) {
        tokio::spawn(async move {
            tracing::info!("▶️ Starting Telegram listener...");
            notifier.listen_for_commands().await;
            tracing::info!("🛑 Telegram listener ended.");
        });
    }
}
