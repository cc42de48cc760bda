//! `docchat status`: Show the effective configuration.

use docchat_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📄 DocChat Status");
    println!("=================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.effective_model());
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Max tokens:   {}", config.default_max_tokens);
    println!("  Timeout:      {}s", config.request_timeout_secs);
    println!("  Chunk size:   {} chars", config.chunking.max_chars);
    println!("  Top-k:        {}", config.retrieval.top_k);
    println!("  Tone:         {}", config.conversation.default_tone);
    println!("  Feedback log: {}", config.feedback_path().display());
    println!(
        "  API key:      {}",
        if config.has_api_key() { "set" } else { "missing" }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `docchat onboard` first");
    }

    Ok(())
}
