// Plain-text daily report
use crate::model::{AnalysisResult, PredictionKind, PriceRecord, SignalKind, StockQuote};
use crate::utils::percent_change;
use chrono::{DateTime, Utc};

/// Records shown in the trend chart.
const CHART_DAYS: usize = 7;
/// Horizontal resolution of the chart.
const CHART_STEPS: f64 = 10.0;

/// Builds the full report. `history` is the log as it was before `record`
/// was added.
pub fn render_report(
    record: &PriceRecord,
    analysis: &AnalysisResult,
    quotes: &[StockQuote],
    history: &[PriceRecord],
    now: DateTime<Utc>,
) -> String {
    let previous_date = history
        .first()
        .map(|r| r.date.to_string())
        .unwrap_or_else(|| "none".to_string());
    let fetched = record
        .fetched_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut out = format!(
        "📊 NAND Flash monitor - {}\n\n🕐 Fetched: {}\n📡 Source: DRAMeXchange\n📅 Previous update: {}\n📋 Status: {}\n\n",
        record.date, fetched, previous_date, analysis.status
    );

    if !analysis.predictions.is_empty() {
        out.push_str("🔮 Expected automated trading\n");
        for p in &analysis.predictions {
            let emoji = match p.kind {
                PredictionKind::GoldenCross | PredictionKind::RsiOversold => "🟢",
                PredictionKind::DeathCross | PredictionKind::PriceHigh => "🔴",
                _ => "🟡",
            };
            out.push_str(&format!(
                "  {} {} {}\n     confidence: {} | {}\n     💡 {}\n",
                emoji, p.action, p.name, p.confidence, p.timing, p.reason
            ));
        }
        out.push('\n');
    }

    if !analysis.signals.is_empty() {
        out.push_str("🎯 Signals\n");
        for s in &analysis.signals {
            let (emoji, action) = match s.kind {
                SignalKind::Buy => ("🟢", "BUY"),
                SignalKind::Sell => ("🔴", "SELL"),
                SignalKind::Warn => ("🟡", "WATCH"),
            };
            out.push_str(&format!(
                "  {} {} {} ${:.2}\n     💡 {}\n",
                emoji, action, s.name, s.price, s.reason
            ));
        }
        out.push('\n');
    }

    if !analysis.alerts.is_empty() {
        out.push_str("🚨 Price alerts\n");
        for a in &analysis.alerts {
            let emoji = if a.change_pct > 0.0 { "📈" } else { "📉" };
            out.push_str(&format!(
                "  {} {:<10} {:+.1}% (${:.2})\n",
                emoji, a.name, a.change_pct, a.current
            ));
        }
        out.push('\n');
    }

    out.push_str("📦 NAND Flash prices (USD)\n");
    if record.items.is_empty() {
        out.push_str("  no prices published today\n");
    }
    for item in &record.items {
        let change = analysis
            .changes
            .iter()
            .find(|c| c.name == item.name)
            .map(|c| format!(" ({:+.1}%)", c.change_pct))
            .unwrap_or_default();
        out.push_str(&format!("  {:<12}: ${:<8.3}{}\n", item.name, item.price, change));
    }

    for (country, title, currency) in [("US", "🇺🇸 US memory stocks", "$"), ("CN", "🇨🇳 CN memory/semi stocks", "¥")] {
        let section: Vec<&StockQuote> = quotes.iter().filter(|q| q.country == country).collect();
        if section.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", title));
        for q in section {
            match (q.price, q.change) {
                (Some(price), change) => {
                    let change = change.unwrap_or(0.0);
                    let emoji = if change > 0.0 {
                        "📈"
                    } else if change < 0.0 {
                        "📉"
                    } else {
                        "➡️"
                    };
                    out.push_str(&format!(
                        "  {} {:<10} {:<16} {}{:.2} {:+.2}%\n",
                        emoji, q.ticker, q.name, currency, price, change
                    ));
                }
                (None, _) => {
                    out.push_str(&format!("  ➡️ {:<10} {:<16} ({})\n", q.ticker, q.name, q.note));
                }
            }
        }
    }

    if let Some(first) = record.items.first() {
        let mut recent: Vec<&PriceRecord> = vec![record];
        recent.extend(history.iter());
        out.push('\n');
        out.push_str(&render_trend_chart(&recent, &first.name));
    }

    out.push_str(&format!("\n\n---\n🕘 {}", now.format("%Y-%m-%d %H:%M:%S")));
    out
}

/// ASCII chart of one item over the latest records (most recent first in
/// `records`), drawn oldest to newest.
pub fn render_trend_chart(records: &[&PriceRecord], item: &str) -> String {
    if records.len() < 2 {
        return "📈 Not enough history yet".to_string();
    }

    let mut points: Vec<(String, f64)> = records
        .iter()
        .take(CHART_DAYS)
        .filter_map(|r| r.price_of(item).map(|p| (r.date.format("%m-%d").to_string(), p)))
        .collect();
    if points.len() < 2 {
        return format!("📈 No history for {} yet", item);
    }
    points.reverse();

    let min = points.iter().map(|(_, p)| *p).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|(_, p)| *p).fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };

    let mut chart = format!(
        "📊 {} last {} days\n${:.2}\n${:.2}\n${:.2}\n└{}\n",
        item,
        points.len(),
        max,
        (max + min) / 2.0,
        min,
        "─".repeat(points.len() * 4 + 1)
    );
    for (date, price) in &points {
        let pos = ((price - min) / range * CHART_STEPS) as usize;
        chart.push_str(&format!("    {}● ${:.2} ({})\n", "  ".repeat(pos), price, date));
    }

    let oldest = points[0].1;
    let newest = points[points.len() - 1].1;
    let total = percent_change(newest, oldest).unwrap_or(0.0);
    let trend = if total > 0.0 {
        "📈"
    } else if total < 0.0 {
        "📉"
    } else {
        "➡️"
    };
    chart.push_str(&format!("Trend: {} {:+.2}%", trend, total));
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alert, AnalysisStatus, ItemPrice, PriceChange, TradeSignal};
    use chrono::{NaiveDate, TimeZone};

    fn record(day: u32, price: f64) -> PriceRecord {
        PriceRecord::new(
            NaiveDate::from_ymd_opt(2026, 9, day).unwrap(),
            vec![ItemPrice { name: "512Gb TLC".into(), price }],
        )
    }

    #[test]
    fn chart_runs_oldest_to_newest() {
        let today = record(3, 2.2);
        let history = [record(2, 2.1), record(1, 2.0)];
        let recent: Vec<&PriceRecord> = std::iter::once(&today).chain(history.iter()).collect();
        let chart = render_trend_chart(&recent, "512Gb TLC");
        let first = chart.find("09-01").unwrap();
        let last = chart.find("09-03").unwrap();
        assert!(first < last);
        assert!(chart.ends_with("Trend: 📈 +10.00%"));
    }

    #[test]
    fn chart_needs_two_points() {
        let today = record(3, 2.2);
        assert_eq!(render_trend_chart(&[&today], "512Gb TLC"), "📈 Not enough history yet");
        let other = record(2, 1.0);
        assert!(render_trend_chart(&[&today, &other], "SLC 2Gb").contains("No history"));
    }

    #[test]
    fn report_lists_every_section() {
        let today = record(3, 2.1);
        let history = vec![record(2, 2.0)];
        let analysis = AnalysisResult {
            changes: vec![PriceChange {
                name: "512Gb TLC".into(),
                current: 2.1,
                previous: 2.0,
                change_pct: 5.0,
            }],
            alerts: vec![Alert {
                name: "512Gb TLC".into(),
                change_pct: 5.0,
                current: 2.1,
            }],
            signals: vec![TradeSignal {
                kind: SignalKind::Warn,
                name: "512Gb TLC".into(),
                price: 2.1,
                reason: "price deviates >5% above MA5".into(),
            }],
            predictions: vec![],
            status: AnalysisStatus::Normal,
        };
        let quotes = vec![StockQuote {
            ticker: "MU".into(),
            name: "Micron".into(),
            country: "US".into(),
            sector: "Memory".into(),
            price: None,
            change: None,
            note: "quote API unavailable".into(),
        }];
        let now = Utc.with_ymd_and_hms(2026, 9, 3, 9, 0, 0).unwrap();
        let report = render_report(&today, &analysis, &quotes, &history, now);

        assert!(report.contains("Previous update: 2026-09-02"));
        assert!(report.contains("🚨 Price alerts"));
        assert!(report.contains("+5.0%"));
        assert!(report.contains("WATCH 512Gb TLC"));
        assert!(report.contains("(quote API unavailable)"));
        assert!(!report.contains("CN memory"));
        assert!(report.contains("Trend: 📈 +5.00%"));
        assert!(report.ends_with("2026-09-03 09:00:00"));
    }
}
