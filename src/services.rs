use crate::config::Config;
use crate::errors::AppError;
use crate::models::EnrichedData;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn build_client(service: &str) -> Result<Client, AppError> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| {
            AppError::ExternalApiError(format!("Failed to create {} client: {}", service, e))
        })
}

/// Turns a non-2xx response into an `ExternalApiError` carrying status and body.
async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(AppError::ExternalApiError(format!(
        "{} returned status {}: {}",
        service, status, error_text
    )))
}

// ============ Clearbit ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearbitCompany {
    pub name: Option<String>,
    pub description: Option<String>,
    pub founded_year: Option<i64>,
    #[serde(default)]
    pub category: Option<ClearbitCategory>,
    #[serde(default)]
    pub metrics: Option<ClearbitMetrics>,
    #[serde(default)]
    pub geo: Option<ClearbitGeo>,
    #[serde(default)]
    pub tech: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ClearbitCategory {
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearbitMetrics {
    pub employees: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearbitGeo {
    pub city: Option<String>,
    pub state_code: Option<String>,
}

impl From<ClearbitCompany> for EnrichedData {
    fn from(company: ClearbitCompany) -> Self {
        let location = company.geo.and_then(|geo| {
            let parts: Vec<String> = [geo.city, geo.state_code].into_iter().flatten().collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        });

        EnrichedData {
            company_name: company.name,
            industry: company.category.and_then(|c| c.industry),
            employee_count: company.metrics.and_then(|m| m.employees),
            tech_stack: Some(company.tech.unwrap_or_default()),
            description: company.description,
            location,
            founded: company.founded_year.map(|y| y.to_string()),
            ..Default::default()
        }
    }
}

/// Keyed company lookup by domain.
#[derive(Clone)]
pub struct ClearbitService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ClearbitService {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client("Clearbit")?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Returns `None` when no key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, AppError> {
        match config.clearbit_api_key.as_deref() {
            Some(key) => Self::new(&config.clearbit_base_url, key).map(Some),
            None => Ok(None),
        }
    }

    /// Finds a company by its domain.
    ///
    /// Clearbit answers 404 for domains it has no record of; that is `Ok(None)`,
    /// not an error, so it never counts against the provider's circuit breaker.
    pub async fn find_company(&self, domain: &str) -> Result<Option<EnrichedData>, AppError> {
        // Build URL with proper parameter encoding to prevent injection attacks
        let url = Url::parse_with_params(
            &format!("{}/v2/companies/find", self.base_url),
            &[("domain", domain)],
        )?;

        tracing::info!("Fetching Clearbit company data for domain: {}", domain);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Clearbit request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Clearbit has no record for domain: {}", domain);
            return Ok(None);
        }

        let response = ensure_success("Clearbit", response).await?;

        let company: ClearbitCompany = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Clearbit response: {}", e))
        })?;

        Ok(Some(company.into()))
    }
}

// ============ OpenCorporates ============

#[derive(Debug, Deserialize)]
pub struct OpenCorporatesSearchResponse {
    #[serde(default)]
    pub results: Option<OpenCorporatesResults>,
}

#[derive(Debug, Deserialize)]
pub struct OpenCorporatesResults {
    #[serde(default)]
    pub companies: Vec<OpenCorporatesEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OpenCorporatesEntry {
    pub company: OpenCorporatesCompany,
}

#[derive(Debug, Deserialize)]
pub struct OpenCorporatesCompany {
    pub name: Option<String>,
    pub jurisdiction_code: Option<String>,
    pub company_type: Option<String>,
}

impl From<OpenCorporatesCompany> for EnrichedData {
    fn from(company: OpenCorporatesCompany) -> Self {
        EnrichedData {
            company_name: company.name,
            location: company.jurisdiction_code,
            industry: company.company_type,
            ..Default::default()
        }
    }
}

/// Public company registry search.
#[derive(Clone)]
pub struct OpenCorporatesService {
    client: Client,
    base_url: String,
}

impl OpenCorporatesService {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client("OpenCorporates")?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Searches by free text and returns the first hit, if any.
    pub async fn search_company(&self, query: &str) -> Result<Option<EnrichedData>, AppError> {
        let url = Url::parse_with_params(
            &format!("{}/v0.4/companies/search", self.base_url),
            &[("q", query)],
        )?;

        tracing::info!("Searching OpenCorporates for: {}", query);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("OpenCorporates request failed: {}", e))
        })?;

        let response = ensure_success("OpenCorporates", response).await?;

        let result: OpenCorporatesSearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse OpenCorporates response: {}", e))
        })?;

        let first = result
            .results
            .and_then(|r| r.companies.into_iter().next())
            .map(|entry| entry.company.into());

        if first.is_none() {
            tracing::debug!("OpenCorporates returned no companies for: {}", query);
        }

        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clearbit_mapping() {
        let company: ClearbitCompany = serde_json::from_value(serde_json::json!({
            "name": "Stripe",
            "description": "Payments",
            "foundedYear": 2010,
            "category": {"industry": "Internet Software & Services"},
            "metrics": {"employees": 7000},
            "geo": {"city": "San Francisco", "stateCode": "CA"}
        }))
        .unwrap();

        let data: EnrichedData = company.into();
        assert_eq!(data.company_name.as_deref(), Some("Stripe"));
        assert_eq!(data.industry.as_deref(), Some("Internet Software & Services"));
        assert_eq!(data.employee_count, Some(7000));
        assert_eq!(data.location.as_deref(), Some("San Francisco, CA"));
        assert_eq!(data.founded.as_deref(), Some("2010"));
        assert_eq!(data.tech_stack, Some(vec![]));
    }

    #[test]
    fn test_clearbit_missing_geo_has_no_location() {
        let company: ClearbitCompany =
            serde_json::from_value(serde_json::json!({"name": "Quiet", "geo": {}})).unwrap();
        let data: EnrichedData = company.into();
        assert_eq!(data.location, None);
    }

    #[test]
    fn test_client_creation() {
        assert!(ClearbitService::new("https://example.com/", "key").is_ok());
        assert!(OpenCorporatesService::new("https://example.com").is_ok());
    }

    #[test]
    fn test_clearbit_disabled_without_key() {
        let config = Config::default();
        assert!(ClearbitService::from_config(&config).unwrap().is_none());
    }
}
