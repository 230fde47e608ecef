/// Integration tests with mocked external APIs
/// Exercises the enrichment cascade without hitting real company-data services
use leadgen_pro::config::Config;
use leadgen_pro::enrichment::Enricher;
use leadgen_pro::models::EnrichmentSource;
use leadgen_pro::rate_limiter::EnrichmentGate;
use leadgen_pro::services::{ClearbitService, OpenCorporatesService};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create test config
fn create_test_config(clearbit_base_url: String, opencorporates_base_url: String) -> Config {
    Config {
        port: 8080,
        clearbit_api_key: Some("sk_test".to_string()),
        clearbit_base_url,
        opencorporates_base_url,
        enrichment_calls_per_minute: 60_000,
        enrichment_latency_min_ms: 0,
        enrichment_latency_max_ms: 0,
    }
}

fn test_enricher(config: &Config) -> Enricher {
    let gate = Arc::new(EnrichmentGate::new(config.enrichment_calls_per_minute));
    Enricher::from_config(config, gate).unwrap()
}

fn opencorporates_hit() -> serde_json::Value {
    serde_json::json!({
        "results": {
            "companies": [
                {"company": {"name": "EXAMPLE HOLDINGS LTD", "jurisdiction_code": "gb", "company_type": "Private Limited Company"}},
                {"company": {"name": "Second Match", "jurisdiction_code": "us_de", "company_type": "LLC"}}
            ]
        }
    })
}

#[tokio::test]
async fn test_clearbit_successful_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .and(query_param("domain", "figma.com"))
        .and(header("Authorization", "Bearer sk_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Figma",
            "description": "Collaborative interface design tool",
            "foundedYear": 2012,
            "category": {"industry": "Design Software"},
            "metrics": {"employees": 800},
            "geo": {"city": "San Francisco", "stateCode": "CA"},
            "tech": ["react", "typescript"]
        })))
        .mount(&mock_server)
        .await;

    let service = ClearbitService::new(&mock_server.uri(), "sk_test").unwrap();
    let data = service.find_company("figma.com").await.unwrap().unwrap();

    assert_eq!(data.company_name.as_deref(), Some("Figma"));
    assert_eq!(data.industry.as_deref(), Some("Design Software"));
    assert_eq!(data.employee_count, Some(800));
    assert_eq!(data.location.as_deref(), Some("San Francisco, CA"));
    assert_eq!(data.founded.as_deref(), Some("2012"));
    assert_eq!(
        data.tech_stack,
        Some(vec!["react".to_string(), "typescript".to_string()])
    );
}

#[tokio::test]
async fn test_clearbit_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let service = ClearbitService::new(&mock_server.uri(), "sk_test").unwrap();
    let result = service.find_company("figma.com").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_clearbit_not_found_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Resource not found"))
        .mount(&mock_server)
        .await;

    let service = ClearbitService::new(&mock_server.uri(), "sk_test").unwrap();
    let result = service.find_company("unknown-domain.io").await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_opencorporates_takes_first_company() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0.4/companies/search"))
        .and(query_param("q", "example.co.uk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(opencorporates_hit()))
        .mount(&mock_server)
        .await;

    let service = OpenCorporatesService::new(&mock_server.uri()).unwrap();
    let data = service.search_company("example.co.uk").await.unwrap().unwrap();

    assert_eq!(data.company_name.as_deref(), Some("EXAMPLE HOLDINGS LTD"));
    assert_eq!(data.location.as_deref(), Some("gb"));
    assert_eq!(data.industry.as_deref(), Some("Private Limited Company"));
    assert_eq!(data.employee_count, None);
}

#[tokio::test]
async fn test_opencorporates_no_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0.4/companies/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": {"companies": []}})),
        )
        .mount(&mock_server)
        .await;

    let service = OpenCorporatesService::new(&mock_server.uri()).unwrap();
    let result = service.search_company("nothing.example").await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_cascade_prefers_clearbit() {
    let clearbit = MockServer::start().await;
    let opencorporates = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "Stripe, Inc."})),
        )
        .expect(1)
        .mount(&clearbit)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(opencorporates_hit()))
        .expect(0)
        .mount(&opencorporates)
        .await;

    let config = create_test_config(clearbit.uri(), opencorporates.uri());
    let outcome = test_enricher(&config).enrich("stripe.com").await;

    assert_eq!(outcome.source, EnrichmentSource::Clearbit);
    assert_eq!(outcome.data.company_name.as_deref(), Some("Stripe, Inc."));
}

#[tokio::test]
async fn test_cascade_clearbit_not_found_falls_back_to_directory() {
    let clearbit = MockServer::start().await;
    let opencorporates = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&clearbit)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(opencorporates_hit()))
        .expect(0)
        .mount(&opencorporates)
        .await;

    let config = create_test_config(clearbit.uri(), opencorporates.uri());
    let outcome = test_enricher(&config).enrich("asana.com").await;

    assert_eq!(outcome.source, EnrichmentSource::Directory);
    assert_eq!(outcome.data.company_name.as_deref(), Some("Asana"));
    assert_eq!(outcome.data.revenue.as_deref(), Some("$500M+"));
}

#[tokio::test]
async fn test_cascade_reaches_opencorporates_for_unknown_domain() {
    let clearbit = MockServer::start().await;
    let opencorporates = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&clearbit)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0.4/companies/search"))
        .and(query_param("q", "example.co.uk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(opencorporates_hit()))
        .expect(1)
        .mount(&opencorporates)
        .await;

    let config = create_test_config(clearbit.uri(), opencorporates.uri());
    let outcome = test_enricher(&config).enrich("example.co.uk").await;

    assert_eq!(outcome.source, EnrichmentSource::OpenCorporates);
    assert_eq!(
        outcome.data.company_name.as_deref(),
        Some("EXAMPLE HOLDINGS LTD")
    );
}

#[tokio::test]
async fn test_cascade_synthesizes_without_key_when_lookups_fail() {
    let opencorporates = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&opencorporates)
        .await;

    let config = Config {
        clearbit_api_key: None,
        ..create_test_config("http://127.0.0.1:9".to_string(), opencorporates.uri())
    };
    let enricher = test_enricher(&config);
    assert_eq!(enricher.provider_names(), vec!["directory", "opencorporates"]);

    let data = enricher.enrich_company_data("unknown-domain.xyz").await;

    assert_eq!(data.company_name.as_deref(), Some("Unknown-domain"));
    assert_eq!(data.industry.as_deref(), Some("Technology"));
    assert_eq!(
        data.tech_stack,
        Some(vec![
            "react".to_string(),
            "nodejs".to_string(),
            "aws".to_string()
        ])
    );
}

#[tokio::test]
async fn test_open_circuit_skips_network_call() {
    let clearbit = MockServer::start().await;
    let opencorporates = MockServer::start().await;

    // Three failures open the breaker; the fourth lookup never reaches the server
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&clearbit)
        .await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": {"companies": []}})),
        )
        .mount(&opencorporates)
        .await;

    let config = create_test_config(clearbit.uri(), opencorporates.uri());
    let enricher = test_enricher(&config);

    for _ in 0..4 {
        let outcome = enricher.enrich("stripe.com").await;
        assert_eq!(outcome.source, EnrichmentSource::Directory);
    }
}

#[tokio::test]
async fn test_unknown_domains_keep_clearbit_circuit_closed() {
    let clearbit = MockServer::start().await;
    let opencorporates = MockServer::start().await;

    // Only figma.com is known; every other domain gets wiremock's default 404
    Mock::given(method("GET"))
        .and(path("/v2/companies/find"))
        .and(query_param("domain", "figma.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "Figma", "metrics": {"employees": 800}})),
        )
        .expect(2)
        .mount(&clearbit)
        .await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": {"companies": []}})),
        )
        .mount(&opencorporates)
        .await;

    let config = create_test_config(clearbit.uri(), opencorporates.uri());
    let enricher = test_enricher(&config);

    let before = enricher.enrich("figma.com").await;
    assert_eq!(before.source, EnrichmentSource::Clearbit);

    for domain in ["a-unknown.io", "b-unknown.io", "c-unknown.io", "d-unknown.io"] {
        let outcome = enricher.enrich(domain).await;
        assert_eq!(outcome.source, EnrichmentSource::Synthesized);
    }

    let after = enricher.enrich("figma.com").await;
    assert_eq!(after.source, EnrichmentSource::Clearbit);
    assert_eq!(after.data.employee_count, Some(800));
}
