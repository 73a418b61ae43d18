//! `carewise doctor` — Check configuration and gateway access.

use carewise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 carewise Doctor");
    println!("==================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file — run `carewise onboard` (defaults in use)");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");

            let gateway = carewise_providers::build_from_config(&config);
            if gateway.has_access(config.credential().as_ref()) {
                println!("  ✅ Gateway access: {} ({})", gateway.name(), config.model);
            } else {
                println!(
                    "  ⚠️  No API key for '{}' — answers will come from built-in guidance",
                    gateway.name()
                );
                issues += 1;
            }
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
        }
    }

    let rules = carewise_assistant::CategoryRuleSet::builtin();
    println!("  ✅ {} question categories loaded", rules.categories().len());

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
