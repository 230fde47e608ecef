use crate::enrichment::Enricher;
use crate::errors::AppError;
use crate::models::{
    DashboardMetrics, EnrichedData, EnrichmentSource, Lead, LeadFilter, NewLead, Priority,
};
use chrono::Utc;
use moka::future::Cache;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Leads scoring at or above this count as qualified.
pub const QUALIFIED_SCORE: u8 = 70;

/// In-memory lead list backing the dashboard. Newest leads come first.
pub struct LeadStore {
    leads: RwLock<Vec<Lead>>,
    /// Lead ids with an enrichment in flight. The TTL only matters if a
    /// release is ever lost.
    pending: Cache<Uuid, i64>,
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadStore {
    pub fn new() -> Self {
        Self {
            leads: RwLock::new(Vec::new()),
            pending: Cache::builder()
                .time_to_live(Duration::from_secs(300))
                .max_capacity(10_000)
                .build(),
        }
    }

    /// Scores and stores a new lead.
    pub async fn add(&self, new_lead: NewLead) -> Lead {
        let lead = Lead::from_new(new_lead, Utc::now());
        self.leads.write().await.insert(0, lead.clone());
        tracing::info!(
            "Added lead {} ({}) with score {}",
            lead.id,
            lead.domain,
            lead.score
        );
        lead
    }

    /// Stores a batch ahead of existing leads, keeping batch order.
    pub async fn add_many(&self, new_leads: Vec<NewLead>) -> Vec<Lead> {
        let now = Utc::now();
        let batch: Vec<Lead> = new_leads
            .into_iter()
            .map(|new_lead| Lead::from_new(new_lead, now))
            .collect();

        let mut leads = self.leads.write().await;
        leads.splice(0..0, batch.iter().cloned());
        tracing::info!("Added {} leads", batch.len());
        batch
    }

    pub async fn get(&self, id: Uuid) -> Option<Lead> {
        self.leads.read().await.iter().find(|l| l.id == id).cloned()
    }

    pub async fn list(&self, filter: &LeadFilter) -> Vec<Lead> {
        self.leads
            .read()
            .await
            .iter()
            .filter(|lead| filter.matches(lead))
            .cloned()
            .collect()
    }

    pub async fn metrics(&self) -> DashboardMetrics {
        let leads = self.leads.read().await;
        if leads.is_empty() {
            return DashboardMetrics::default();
        }

        let total: u64 = leads.iter().map(|l| u64::from(l.score)).sum();
        let avg = (total as f64 / leads.len() as f64).round() as u8;

        DashboardMetrics {
            total_leads: leads.len(),
            qualified_leads: leads.iter().filter(|l| l.score >= QUALIFIED_SCORE).count(),
            avg_score: avg,
            top_priority: leads.iter().filter(|l| l.priority == Priority::High).count(),
        }
    }

    /// Merges enrichment data into a stored lead and rescores it.
    pub async fn update_enrichment(&self, id: Uuid, data: &EnrichedData) -> Result<Lead, AppError> {
        let mut leads = self.leads.write().await;
        let lead = leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))?;

        let previous_score = lead.score;
        lead.apply_enrichment(data, Utc::now());
        tracing::info!(
            "Lead {} rescored after enrichment: {} -> {}",
            id,
            previous_score,
            lead.score
        );
        Ok(lead.clone())
    }

    pub fn is_pending(&self, id: Uuid) -> bool {
        self.pending.contains_key(&id)
    }

    /// Enriches a stored lead by its domain.
    ///
    /// Only one enrichment per lead may be in flight; a second request gets
    /// `Conflict`. The pending marker is released however the attempt ends.
    pub async fn enrich_lead(
        &self,
        id: Uuid,
        enricher: &Enricher,
    ) -> Result<(Lead, EnrichmentSource), AppError> {
        let lead = self
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))?;

        let claim = self
            .pending
            .entry(id)
            .or_insert_with(async { Utc::now().timestamp() })
            .await;
        if !claim.is_fresh() {
            tracing::warn!("Enrichment already in progress for lead {}", id);
            return Err(AppError::Conflict(format!(
                "Enrichment already in progress for lead {}",
                id
            )));
        }
        let marker = PendingMarker {
            cache: self.pending.clone(),
            id: Some(id),
        };

        let outcome = enricher.enrich(&lead.domain).await;
        let result = self.update_enrichment(id, &outcome.data).await;

        marker.release().await;
        result.map(|lead| (lead, outcome.source))
    }
}

/// Clears a pending marker, also when the enrichment future is dropped mid-flight.
struct PendingMarker {
    cache: Cache<Uuid, i64>,
    id: Option<Uuid>,
}

impl PendingMarker {
    async fn release(mut self) {
        if let Some(id) = self.id.take() {
            self.cache.invalidate(&id).await;
        }
    }
}

impl Drop for PendingMarker {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            let cache = self.cache.clone();
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move { cache.invalidate(&id).await });
            }
        }
    }
}
