// notifier/telegram/sender.rs

use crate::model::NotifyError;
use crate::notifier::telegram::TelegramNotifier;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// Telegram rejects messages above 4096 characters.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Sends a simple text message via Telegram.
pub async fn send_text(notifier: &TelegramNotifier, text: &str) -> Result<(), NotifyError> {
    let url = format!("https://api.telegram.org/bot{}/sendMessage", notifier.bot_token);
    let params = [
        ("chat_id", notifier.chat_id.to_string()),
        ("text", text.to_string()),
    ];
    let response = match timeout(
        Duration::from_secs(10),
        notifier.client.post(&url).form(&params).send(),
    )
    .await
    {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            warn!("❌ Telegram send() failed: {:?}", e);
            return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
        }
        Err(_) => {
            warn!("⏳ Telegram send() timed out");
            return Err(NotifyError::Unreachable);
        }
    };
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    if !status.is_success() {
        warn!("❌ Telegram API responded [{}]: {}", status, body);
        return Err(NotifyError::ApiError(format!("status {}", status)));
    }
    info!("✅ Telegram text sent [{}]", status);
    Ok(())
}

/// Splits `text` into chunks of at most `max_chars` characters, preferring
/// line boundaries.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_chars {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
