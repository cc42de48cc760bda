//! `docchat feedback`: Leave or review feedback.

use docchat_config::AppConfig;
use docchat_feedback::FeedbackLog;

fn open_log() -> Result<FeedbackLog, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(FeedbackLog::new(config.feedback_path()))
}

pub async fn add(text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let log = open_log()?;
    log.record(text)?;
    println!("✅ Thank you for your feedback!");
    println!("   Saved to {}", log.path().display());
    Ok(())
}

pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let log = open_log()?;
    let entries = log.entries()?;

    println!("💬 Feedback ({} entries)", entries.len());
    println!("=========================");
    for entry in &entries {
        println!("  [{}] {}", entry.timestamp, entry.feedback);
    }
    Ok(())
}
