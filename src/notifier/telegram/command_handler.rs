// notifier/telegram/command_handler.rs

use crate::analyzer::AnalyzerImpl;
use crate::notifier::telegram::TelegramNotifier;
use tracing::{info, warn};

const HELP: &str = "📋 Available commands:\n\
    /ping — check connection\n\
    /status — monitor status\n\
    /help — command list\n\
    /last — latest recorded prices\n\
    /indicators — current MA / volatility / RSI\n\
    /config — current thresholds\n\
    /stocks — latest stock snapshot\n\
    /refresh — run a check now\n\
    /uptime — service uptime";

/// Handles an incoming command and sends the reply.
pub async fn handle_command(command_text: &str, notifier: &TelegramNotifier) {
    info!("Handling command: {}", command_text);
    let command = command_text.split_whitespace().next().unwrap_or_default();
    if command == "/refresh" {
        info!("/refresh command received, triggering refresh...");
        notifier.refresh_notify.notify_one();
    }
    let reply = reply_for(command, notifier).await;
    if let Err(e) = notifier.notify_text(&reply).await {
        warn!("{} reply error: {:?}", command, e);
    }
}

/// Builds the reply text for a command.
pub async fn reply_for(command: &str, notifier: &TelegramNotifier) -> String {
    match command {
        "/ping" => "✅ I am online!".to_string(),
        "/help" => HELP.to_string(),
        "/refresh" => "🔄 Price check started.".to_string(),
        "/status" => match notifier.storage.lock().await.history_len() {
            Ok(count) => format!(
                "📊 Monitor is running.\n🗂 {} records in history (keeping {}).\n⏲ Next check within {}s.",
                count, notifier.config.analysis.retention, notifier.config.check_interval_seconds
            ),
            Err(e) => format!("❌ Error: {}", e),
        },
        "/uptime" => {
            let uptime = notifier.start_time.elapsed();
            format!(
                "⏱ Uptime: {:02}:{:02}:{:02}",
                uptime.as_secs() / 3600,
                (uptime.as_secs() % 3600) / 60,
                uptime.as_secs() % 60
            )
        }
        "/last" => match notifier.storage.lock().await.last_record() {
            Ok(Some(record)) if record.is_valid() => {
                let mut msg = format!("🕵️ Prices on {}:\n", record.date);
                for item in &record.items {
                    msg.push_str(&format!("🔹 {} — ${:.3}\n", item.name, item.price));
                }
                msg
            }
            Ok(Some(record)) => format!("📭 No prices were published on {}.", record.date),
            Ok(None) => "📭 No prices recorded yet.".to_string(),
            Err(e) => format!("❌ Error: {}", e),
        },
        "/indicators" => {
            let cfg = &notifier.config;
            let history = match notifier.storage.lock().await.load_history(cfg.analysis.retention) {
                Ok(h) => h,
                Err(e) => return format!("❌ Error: {}", e),
            };
            let set = AnalyzerImpl::new(cfg.analysis.clone(), cfg.catalog()).indicators(&history);
            let fmt = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
            let mut msg = String::from("📐 Indicators (MA5 / MA10 / MA20 / vol% / RSI):\n");
            for name in cfg.catalog() {
                let i = set.for_item(&name);
                msg.push_str(&format!(
                    "🔸 {}: {} / {} / {} / {} / {}\n",
                    name,
                    fmt(i.ma_short),
                    fmt(i.ma_medium),
                    fmt(i.ma_long),
                    fmt(i.volatility),
                    fmt(i.rsi)
                ));
            }
            msg
        }
        "/config" => {
            let a = &notifier.config.analysis;
            format!(
                "⚙️ Thresholds:\n🔸 alert: {:.1}%\n🔸 volatility: {:.1}%\n🔸 RSI: {:.0}/{:.0}\n🔸 tracked items: {}",
                a.alert_threshold,
                a.volatility_threshold,
                a.rsi_oversold,
                a.rsi_overbought,
                notifier.config.catalog().join(", ")
            )
        }
        "/stocks" => match notifier.storage.lock().await.last_stock_snapshot() {
            Ok(Some(quotes)) if !quotes.is_empty() => {
                let mut msg = String::from("🏦 Latest stock snapshot:\n");
                for q in &quotes {
                    match q.price {
                        Some(price) => msg.push_str(&format!(
                            "🔹 {} {} — {:.2} ({:+.2}%)\n",
                            q.ticker,
                            q.name,
                            price,
                            q.change.unwrap_or(0.0)
                        )),
                        None => msg.push_str(&format!("🔹 {} {} — {}\n", q.ticker, q.name, q.note)),
                    }
                }
                msg
            }
            Ok(_) => "📭 No stock snapshot yet.".to_string(),
            Err(e) => format!("❌ Error: {}", e),
        },
        _ => "🤖 Unknown command. Type /help for a list of commands.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::model::{ItemPrice, PriceRecord, StockQuote};
    use crate::storage::SqliteStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tokio::sync::{Mutex, Notify};

    fn notifier() -> TelegramNotifier {
        let config = parse_config(r#"{"telegram_bot_token": "t", "telegram_chat_id": 1}"#).unwrap();
        let storage = SqliteStorage::new(":memory:").unwrap();
        TelegramNotifier::new(
            Arc::new(Mutex::new(storage)),
            Arc::new(config),
            Arc::new(Notify::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn last_reports_latest_prices() {
        let n = notifier();
        assert_eq!(reply_for("/last", &n).await, "📭 No prices recorded yet.");

        let record = PriceRecord::new(
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            vec![ItemPrice { name: "512Gb TLC".into(), price: 3.5 }],
        );
        n.storage.lock().await.append_record(&record).unwrap();
        let reply = reply_for("/last", &n).await;
        assert!(reply.contains("2026-10-01"));
        assert!(reply.contains("512Gb TLC — $3.500"));
    }

    #[tokio::test]
    async fn indicators_show_dashes_without_history() {
        let reply = reply_for("/indicators", &notifier()).await;
        assert!(reply.contains("🔸 512Gb TLC: - / - / - / - / -"));
    }

    #[tokio::test]
    async fn stocks_show_latest_snapshot() {
        let n = notifier();
        assert_eq!(reply_for("/stocks", &n).await, "📭 No stock snapshot yet.");

        let quote = StockQuote {
            ticker: "MU".into(),
            name: "Micron".into(),
            country: "US".into(),
            sector: "Memory".into(),
            price: None,
            change: None,
            note: "quote API unavailable".into(),
        };
        n.storage.lock().await.save_stock_snapshot("2026-10-01", &[quote], 30).unwrap();
        let reply = reply_for("/stocks", &n).await;
        assert!(reply.contains("MU Micron — quote API unavailable"));
    }

    #[tokio::test]
    async fn unknown_commands_point_to_help() {
        let reply = reply_for("/nope", &notifier()).await;
        assert!(reply.contains("/help"));
        assert!(reply_for("/config", &notifier()).await.contains("alert: 3.0%"));
    }
}
