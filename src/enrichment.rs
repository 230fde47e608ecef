//! Company enrichment cascade
//!
//! Enrichment never fails. Providers are tried in order and the first one
//! that returns data wins:
//! 1. Clearbit (only when an API key is configured)
//! 2. Built-in company directory
//! 3. OpenCorporates search
//! 4. Placeholder synthesized from the domain itself
//!
//! Every attempt first passes the shared [`EnrichmentGate`].

use crate::circuit_breaker::{create_provider_circuit_breaker, ProviderBreaker};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{EnrichedData, EnrichmentOutcome, EnrichmentSource};
use crate::rate_limiter::EnrichmentGate;
use crate::services::{ClearbitService, OpenCorporatesService};
use async_trait::async_trait;
use failsafe::futures::CircuitBreaker;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// One tier of the enrichment cascade.
#[async_trait]
pub trait EnrichmentProvider: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn source(&self) -> EnrichmentSource;

    /// `Ok(None)` means the provider has nothing for this domain.
    async fn lookup(&self, domain: &str) -> Result<Option<EnrichedData>, AppError>;
}

/// Unwraps a breaker-guarded call. A rejection (open circuit) counts as "no data".
fn unwrap_guarded<T>(
    provider: &str,
    result: Result<Option<T>, failsafe::Error<AppError>>,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(value),
        Err(failsafe::Error::Inner(e)) => Err(e),
        Err(failsafe::Error::Rejected) => {
            tracing::warn!("{} circuit open, skipping lookup", provider);
            Ok(None)
        }
    }
}

// ============ Providers ============

pub struct ClearbitProvider {
    service: ClearbitService,
    breaker: ProviderBreaker,
}

impl ClearbitProvider {
    pub fn new(service: ClearbitService) -> Self {
        Self {
            service,
            breaker: create_provider_circuit_breaker(),
        }
    }
}

#[async_trait]
impl EnrichmentProvider for ClearbitProvider {
    fn name(&self) -> &str {
        "clearbit"
    }

    fn source(&self) -> EnrichmentSource {
        EnrichmentSource::Clearbit
    }

    async fn lookup(&self, domain: &str) -> Result<Option<EnrichedData>, AppError> {
        let lookup = self.service.find_company(domain);
        unwrap_guarded(self.name(), self.breaker.call(lookup).await)
    }
}

/// Static records for well-known domains.
pub struct DirectoryProvider;

#[async_trait]
impl EnrichmentProvider for DirectoryProvider {
    fn name(&self) -> &str {
        "directory"
    }

    fn source(&self) -> EnrichmentSource {
        EnrichmentSource::Directory
    }

    async fn lookup(&self, domain: &str) -> Result<Option<EnrichedData>, AppError> {
        Ok(directory_entry(domain))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Looks up a domain in the built-in company directory.
pub fn directory_entry(domain: &str) -> Option<EnrichedData> {
    match domain {
        "stripe.com" => Some(EnrichedData {
            company_name: Some("Stripe".to_string()),
            industry: Some("Financial Technology".to_string()),
            employee_count: Some(7000),
            tech_stack: Some(strings(&[
                "react",
                "nodejs",
                "aws",
                "postgresql",
                "redis",
                "kubernetes",
            ])),
            description: Some("Online payment processing for internet businesses".to_string()),
            location: Some("San Francisco, CA".to_string()),
            founded: Some("2010".to_string()),
            revenue: Some("$1B+".to_string()),
            ..Default::default()
        }),
        "asana.com" => Some(EnrichedData {
            company_name: Some("Asana".to_string()),
            industry: Some("Productivity Software".to_string()),
            employee_count: Some(1500),
            tech_stack: Some(strings(&[
                "react",
                "typescript",
                "aws",
                "mongodb",
                "elasticsearch",
                "docker",
            ])),
            description: Some("Team collaboration and project management platform".to_string()),
            location: Some("San Francisco, CA".to_string()),
            founded: Some("2008".to_string()),
            revenue: Some("$500M+".to_string()),
            ..Default::default()
        }),
        _ => None,
    }
}

pub struct OpenCorporatesProvider {
    service: OpenCorporatesService,
    breaker: ProviderBreaker,
}

impl OpenCorporatesProvider {
    pub fn new(service: OpenCorporatesService) -> Self {
        Self {
            service,
            breaker: create_provider_circuit_breaker(),
        }
    }
}

#[async_trait]
impl EnrichmentProvider for OpenCorporatesProvider {
    fn name(&self) -> &str {
        "opencorporates"
    }

    fn source(&self) -> EnrichmentSource {
        EnrichmentSource::OpenCorporates
    }

    async fn lookup(&self, domain: &str) -> Result<Option<EnrichedData>, AppError> {
        let lookup = self.service.search_company(domain);
        unwrap_guarded(self.name(), self.breaker.call(lookup).await)
    }
}

// ============ Synthesis ============

/// Uppercases the first character, leaving the rest untouched.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds placeholder attributes from the domain alone.
///
/// The company name is the label before the first dot, capitalized. The
/// employee count is random in `[100, 5099]`.
pub fn synthesize_from_domain(domain: &str) -> EnrichedData {
    let prefix = domain.split('.').next().unwrap_or_default();
    let employee_count = rand::thread_rng().gen_range(100..5100);

    EnrichedData {
        company_name: Some(capitalize(prefix)),
        industry: Some("Technology".to_string()),
        employee_count: Some(employee_count),
        tech_stack: Some(strings(&["react", "nodejs", "aws"])),
        description: Some(format!(
            "{} is a technology company focused on innovative solutions.",
            prefix
        )),
        location: Some("San Francisco, CA".to_string()),
        ..Default::default()
    }
}

// ============ Enricher ============

/// Runs the provider cascade behind the shared gate.
pub struct Enricher {
    gate: Arc<EnrichmentGate>,
    providers: Vec<Arc<dyn EnrichmentProvider>>,
    latency_ms: (u64, u64),
}

impl Enricher {
    /// Creates an enricher with no simulated latency.
    pub fn new(gate: Arc<EnrichmentGate>, providers: Vec<Arc<dyn EnrichmentProvider>>) -> Self {
        Self {
            gate,
            providers,
            latency_ms: (0, 0),
        }
    }

    /// Adds an artificial delay, uniformly drawn from `[min_ms, max_ms]`, to every call.
    pub fn with_simulated_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_ms = (min_ms.min(max_ms), max_ms.max(min_ms));
        self
    }

    /// Builds the standard cascade from configuration.
    pub fn from_config(config: &Config, gate: Arc<EnrichmentGate>) -> Result<Self, AppError> {
        let mut providers: Vec<Arc<dyn EnrichmentProvider>> = Vec::new();

        if let Some(service) = ClearbitService::from_config(config)? {
            providers.push(Arc::new(ClearbitProvider::new(service)));
        }
        providers.push(Arc::new(DirectoryProvider));
        providers.push(Arc::new(OpenCorporatesProvider::new(
            OpenCorporatesService::new(&config.opencorporates_base_url)?,
        )));

        let enricher = Self::new(gate, providers).with_simulated_latency(
            config.enrichment_latency_min_ms,
            config.enrichment_latency_max_ms,
        );
        tracing::info!(
            "Enrichment cascade: {:?} -> synthesized",
            enricher.provider_names()
        );
        Ok(enricher)
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Enriches a domain, reporting which tier produced the data.
    pub async fn enrich(&self, domain: &str) -> EnrichmentOutcome {
        let domain = domain.trim().to_lowercase();

        self.gate.wait().await;
        self.simulate_latency().await;

        for provider in &self.providers {
            match provider.lookup(&domain).await {
                Ok(Some(data)) => {
                    tracing::info!("✓ Enriched {} via {}", domain, provider.name());
                    return EnrichmentOutcome {
                        data,
                        source: provider.source(),
                    };
                }
                Ok(None) => {
                    tracing::debug!("{} has no data for {}", provider.name(), domain);
                }
                Err(e) => {
                    tracing::warn!("{} lookup failed for {}: {}", provider.name(), domain, e);
                }
            }
        }

        tracing::info!("No provider matched {}, synthesizing placeholder data", domain);
        EnrichmentOutcome {
            data: synthesize_from_domain(&domain),
            source: EnrichmentSource::Synthesized,
        }
    }

    /// Enriches a domain, discarding provenance.
    pub async fn enrich_company_data(&self, domain: &str) -> EnrichedData {
        self.enrich(domain).await.data
    }

    async fn simulate_latency(&self) {
        let (min_ms, max_ms) = self.latency_ms;
        if max_ms == 0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(min_ms..=max_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}
