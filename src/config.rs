use serde::Deserialize;

pub const DEFAULT_CLEARBIT_BASE_URL: &str = "https://company.clearbit.com";
pub const DEFAULT_OPENCORPORATES_BASE_URL: &str = "https://api.opencorporates.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub clearbit_api_key: Option<String>, // Keyed lookup is skipped when absent
    pub clearbit_base_url: String,
    pub opencorporates_base_url: String,
    pub enrichment_calls_per_minute: u32,
    pub enrichment_latency_min_ms: u64,
    pub enrichment_latency_max_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            clearbit_api_key: None,
            clearbit_base_url: DEFAULT_CLEARBIT_BASE_URL.to_string(),
            opencorporates_base_url: DEFAULT_OPENCORPORATES_BASE_URL.to_string(),
            enrichment_calls_per_minute: 10,
            enrichment_latency_min_ms: 1000,
            enrichment_latency_max_ms: 3000,
        }
    }
}

fn http_url(var: &str, default: &str) -> anyhow::Result<String> {
    let url = std::env::var(var).unwrap_or_else(|_| default.to_string());
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", var);
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn number<T: std::str::FromStr>(var: &str, default: T) -> anyhow::Result<T> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", var)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            clearbit_api_key: std::env::var("CLEARBIT_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            clearbit_base_url: http_url("CLEARBIT_BASE_URL", DEFAULT_CLEARBIT_BASE_URL)?,
            opencorporates_base_url: http_url(
                "OPENCORPORATES_BASE_URL",
                DEFAULT_OPENCORPORATES_BASE_URL,
            )?,
            enrichment_calls_per_minute: number("ENRICHMENT_CALLS_PER_MINUTE", 10u32)
                .and_then(|n| {
                    if n == 0 {
                        anyhow::bail!("ENRICHMENT_CALLS_PER_MINUTE must be at least 1");
                    }
                    Ok(n)
                })?,
            enrichment_latency_min_ms: number("ENRICHMENT_LATENCY_MIN_MS", 1000u64)?,
            enrichment_latency_max_ms: number("ENRICHMENT_LATENCY_MAX_MS", 3000u64)?,
        };

        if config.enrichment_latency_min_ms > config.enrichment_latency_max_ms {
            anyhow::bail!("ENRICHMENT_LATENCY_MIN_MS cannot exceed ENRICHMENT_LATENCY_MAX_MS");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        if config.clearbit_api_key.is_some() {
            tracing::info!("Clearbit lookup enabled: {}", config.clearbit_base_url);
        } else {
            tracing::info!("CLEARBIT_API_KEY not set, keyed lookup disabled");
        }
        tracing::debug!("OpenCorporates Base URL: {}", config.opencorporates_base_url);
        tracing::debug!(
            "Enrichment gate: {} calls/min, simulated latency {}-{}ms",
            config.enrichment_calls_per_minute,
            config.enrichment_latency_min_ms,
            config.enrichment_latency_max_ms
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
