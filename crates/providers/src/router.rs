//! Gateway construction from configuration.

use std::sync::Arc;
use std::time::Duration;

use carewise_config::AppConfig;
use carewise_core::gateway::ModelGateway;

use crate::openai_compat::ChatCompletionGateway;

/// Build the configured gateway.
///
/// Local endpoints (Ollama, vLLM, llama.cpp) are marked as not requiring a key.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn ModelGateway> {
    Arc::new(build_gateway(config))
}

fn build_gateway(config: &AppConfig) -> ChatCompletionGateway {
    let timeout = Duration::from_secs(config.timeout_secs);
    let api_url = config.api_url.as_deref();

    match (config.provider.as_str(), api_url) {
        ("openai", None) => ChatCompletionGateway::openai(timeout),
        ("openrouter", None) => ChatCompletionGateway::openrouter(timeout),
        ("ollama", url) => ChatCompletionGateway::ollama(url, timeout),
        (name, url) => {
            let base_url = url.map_or_else(|| default_base_url(name), str::to_string);
            let gateway = ChatCompletionGateway::new(name, base_url, timeout);
            if is_local(name) {
                gateway.without_key()
            } else {
                gateway
            }
        }
    }
}

fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carewise_core::gateway::Credential;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let gateway = build_from_config(&config);
        assert_eq!(gateway.name(), "openai");
        assert!(!gateway.has_access(None));
    }

    #[test]
    fn local_provider_is_keyless() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        let gateway = build_from_config(&config);
        assert!(gateway.has_access(None));
    }

    #[test]
    fn well_known_providers_use_their_endpoints() {
        let openrouter = AppConfig {
            provider: "openrouter".into(),
            ..AppConfig::default()
        };
        let gateway = build_gateway(&openrouter);
        assert_eq!(gateway.name(), "openrouter");
        assert!(gateway.base_url().contains("openrouter.ai"));
        assert!(!gateway.has_access(None));

        let ollama = AppConfig {
            provider: "ollama".into(),
            api_url: Some("http://gpu-box:11434/v1".into()),
            ..AppConfig::default()
        };
        let gateway = build_gateway(&ollama);
        assert_eq!(gateway.name(), "ollama");
        assert_eq!(gateway.base_url(), "http://gpu-box:11434/v1");
        assert!(gateway.has_access(None));
    }

    #[test]
    fn api_url_overrides_well_known_endpoint() {
        let config = AppConfig {
            api_url: Some("http://proxy.internal/v1".into()),
            ..AppConfig::default()
        };
        let gateway = build_gateway(&config);
        assert_eq!(gateway.name(), "openai");
        assert_eq!(gateway.base_url(), "http://proxy.internal/v1");
        assert!(!gateway.has_access(None));
    }

    #[test]
    fn configured_key_grants_access() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let gateway = build_from_config(&config);
        assert!(gateway.has_access(config.credential().as_ref()));
        assert!(gateway.has_access(Some(&Credential::new("sk-other"))));
    }
}
