use crate::enrichment::Enricher;
use crate::errors::{AppError, ResultExt};
use crate::generator::{self, GenerateLeadsRequest, MAX_GENERATED_LEADS};
use crate::models::*;
use crate::scoring::{score_at, ScoreBreakdown};
use crate::store::LeadStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use regex::Regex;
use serde_json::json;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

/// Shared application state injected into handlers.
pub struct AppState {
    /// In-memory lead list.
    pub store: LeadStore,
    /// Enrichment cascade, gated by the process-wide throttle.
    pub enricher: Enricher,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "leadgen-pro",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

fn domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$")
            .expect("domain regex is valid")
    })
}

/// Validate a bare company domain such as `stripe.com`.
///
/// Rejects schemes, paths, whitespace and single-label hosts.
pub fn is_valid_domain(domain: &str) -> bool {
    domain.len() <= 253 && domain_regex().is_match(domain)
}

fn validate_new_lead(new_lead: &mut NewLead) -> Result<(), AppError> {
    new_lead.company_name = new_lead.company_name.trim().to_string();
    new_lead.domain = new_lead.domain.trim().to_lowercase();
    new_lead.tech_stack = new_lead
        .tech_stack
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if new_lead.company_name.is_empty() {
        return Err(AppError::BadRequest("companyName is required".to_string()));
    }
    if !is_valid_domain(&new_lead.domain) {
        tracing::warn!("❌ Invalid domain rejected: {}", new_lead.domain);
        return Err(AppError::BadRequest(format!(
            "Invalid domain: {}",
            new_lead.domain
        )));
    }
    if new_lead.employee_count < 0 {
        return Err(AppError::BadRequest(
            "employeeCount cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/v1/leads
///
/// Lists leads, optionally filtered by `search` (company name or domain)
/// and `priority`.
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<LeadFilter>,
) -> Json<Vec<Lead>> {
    tracing::debug!("GET /leads - filter: {:?}", filter);
    Json(state.store.list(&filter).await)
}

/// POST /api/v1/leads
///
/// Creates and scores a lead.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(mut new_lead): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    tracing::info!("POST /leads - domain: {}", new_lead.domain);

    validate_new_lead(&mut new_lead)?;
    let lead = state.store.add(new_lead).await;

    Ok((StatusCode::CREATED, Json(lead)))
}

/// POST /api/v1/leads/generate
///
/// Generates a batch of medium-priority prospects for an industry and size
/// bracket, scores them and stores them ahead of existing leads.
pub async fn generate_leads(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateLeadsRequest>,
) -> Result<(StatusCode, Json<Vec<Lead>>), AppError> {
    tracing::info!(
        "POST /leads/generate - industry: {}, size: {:?}, count: {}",
        request.industry,
        request.company_size,
        request.count
    );

    if request.count == 0 || request.count > MAX_GENERATED_LEADS {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {}",
            MAX_GENERATED_LEADS
        )));
    }

    let new_leads = generator::generate_leads(&request, &mut rand::thread_rng());
    let leads = state.store.add_many(new_leads).await;

    Ok((StatusCode::CREATED, Json(leads)))
}

async fn find_lead(state: &AppState, id: Uuid) -> Result<Lead, AppError> {
    state
        .store
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))
}

/// GET /api/v1/leads/:id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    find_lead(&state, id).await.map(Json)
}

/// GET /api/v1/leads/:id/score
///
/// Per-component breakdown of a stored lead's score, recomputed as of now.
pub async fn get_lead_score(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, AppError> {
    let lead = find_lead(&state, id).await?;
    let breakdown = lead.breakdown(Utc::now());

    Ok(Json(ScoreResponse {
        score: breakdown.total(),
        breakdown,
    }))
}

/// GET /api/v1/leads/metrics
pub async fn lead_metrics(State(state): State<Arc<AppState>>) -> Json<DashboardMetrics> {
    Json(state.store.metrics().await)
}

/// POST /api/v1/leads/:id/enrich
///
/// Runs the enrichment cascade for the lead's domain, merges the result and
/// rescores. Returns 409 while an earlier enrichment of the same lead is running.
pub async fn enrich_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichLeadResponse>, AppError> {
    tracing::info!("POST /leads/{}/enrich", id);

    let (lead, source) = state
        .store
        .enrich_lead(id, &state.enricher)
        .await
        .with_context(|| format!("Enriching lead {}", id))?;

    Ok(Json(EnrichLeadResponse::new(lead, source)))
}

/// POST /api/v1/enrich?domain=
///
/// Enriches a bare domain without storing anything.
pub async fn enrich_domain(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EnrichDomainParams>,
) -> Result<Json<EnrichDomainResponse>, AppError> {
    let domain = params.domain.trim().to_lowercase();
    if !is_valid_domain(&domain) {
        return Err(AppError::BadRequest(format!("Invalid domain: {}", domain)));
    }

    tracing::info!("POST /enrich - domain: {}", domain);
    Ok(Json(state.enricher.enrich(&domain).await.into()))
}

/// POST /api/v1/score
///
/// Scores an arbitrary partial lead and returns the per-component breakdown.
pub async fn score_lead(Json(lead): Json<PartialLead>) -> Json<ScoreResponse> {
    let now = Utc::now();
    Json(ScoreResponse {
        score: score_at(&lead, now),
        breakdown: ScoreBreakdown::compute(&lead, now),
    })
}
