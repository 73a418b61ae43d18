//! `carewise status` — Show effective configuration.

use carewise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("carewise Status");
    println!("===============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    println!(
        "  Endpoint:     {}",
        config
            .api_url
            .clone()
            .unwrap_or_else(|| carewise_providers::router::default_base_url(&config.provider))
    );
    println!("  Model:        {}", config.model);
    println!("  Temperature:  {}", config.temperature);
    println!("  Max tokens:   {}", config.max_tokens);
    println!("  Timeout:      {}s", config.timeout_secs);
    println!("  History:      last {} turns", config.history_window);
    println!(
        "  API key:      {}",
        if config.has_access() { "configured" } else { "not set (fallback answers only)" }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `carewise onboard` first");
    }

    Ok(())
}
