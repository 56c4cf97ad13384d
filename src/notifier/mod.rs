pub mod report;
pub mod telegram;

pub use report::{render_report, render_trend_chart};
pub use telegram::TelegramNotifier;
