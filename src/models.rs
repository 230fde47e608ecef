use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{score_at, ScoreBreakdown};

// ============ Lead Models ============

/// Sales priority assigned to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Score bonus granted for this priority.
    pub fn bonus(&self) -> u32 {
        match self {
            Priority::High => 15,
            Priority::Medium => 10,
            Priority::Low => 5,
        }
    }
}

/// A prospective company tracked by the dashboard.
///
/// `score` is derived; it is only ever written by [`Lead::rescore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Unique identifier for the lead.
    pub id: Uuid,
    /// Display name of the company.
    pub company_name: String,
    /// Company web domain, used as the enrichment key.
    pub domain: String,
    /// Free-form industry label.
    pub industry: String,
    /// Head count as last reported.
    pub employee_count: i64,
    /// Known technologies, in the order they were reported.
    pub tech_stack: Vec<String>,
    /// Derived quality score in [0, 100].
    pub score: u8,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    /// Last successful enrichment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_enriched: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl Lead {
    /// Builds a scored lead from a creation request.
    pub fn from_new(new_lead: NewLead, now: DateTime<Utc>) -> Self {
        let mut lead = Self {
            id: Uuid::new_v4(),
            company_name: new_lead.company_name,
            domain: new_lead.domain,
            industry: new_lead.industry,
            employee_count: new_lead.employee_count,
            tech_stack: new_lead.tech_stack,
            score: 0,
            priority: new_lead.priority,
            created_at: now,
            last_enriched: None,
            location: new_lead.location,
            description: new_lead.description,
            founded: None,
            revenue: None,
            contact_email: new_lead.contact_email,
            linkedin_url: new_lead.linkedin_url,
        };
        lead.rescore(now);
        lead
    }

    /// Projects the lead onto its scoring inputs.
    pub fn as_partial(&self) -> PartialLead {
        PartialLead {
            employee_count: Some(self.employee_count),
            tech_stack: Some(self.tech_stack.clone()),
            industry: Some(self.industry.clone()).filter(|i| !i.is_empty()),
            priority: Some(self.priority),
            created_at: Some(self.created_at),
        }
    }

    /// Recomputes `score` from the current attributes.
    pub fn rescore(&mut self, now: DateTime<Utc>) {
        self.score = score_at(&self.as_partial(), now);
    }

    /// Score contributions for display.
    pub fn breakdown(&self, now: DateTime<Utc>) -> ScoreBreakdown {
        ScoreBreakdown::compute(&self.as_partial(), now)
    }

    /// Merges every present enrichment attribute over the lead, then rescores.
    pub fn apply_enrichment(&mut self, data: &EnrichedData, now: DateTime<Utc>) {
        if let Some(ref name) = data.company_name {
            self.company_name = name.clone();
        }
        if let Some(ref industry) = data.industry {
            self.industry = industry.clone();
        }
        if let Some(count) = data.employee_count {
            self.employee_count = count;
        }
        if let Some(ref stack) = data.tech_stack {
            self.tech_stack = stack.clone();
        }
        merge(&mut self.description, &data.description);
        merge(&mut self.location, &data.location);
        merge(&mut self.founded, &data.founded);
        merge(&mut self.revenue, &data.revenue);
        merge(&mut self.contact_email, &data.contact_email);
        merge(&mut self.linkedin_url, &data.linkedin_url);

        self.rescore(now);
        self.last_enriched = Some(now);
    }
}

fn merge(target: &mut Option<String>, incoming: &Option<String>) {
    if incoming.is_some() {
        *target = incoming.clone();
    }
}

/// Scoring inputs; any missing field simply contributes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialLead {
    #[serde(default)]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for creating a lead.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub company_name: String,
    pub domain: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub employee_count: i64,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
}

// ============ Enrichment Models ============

/// Attributes returned by a company-data lookup. Any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

/// Which tier of the enrichment cascade produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentSource {
    Clearbit,
    Directory,
    OpenCorporates,
    Synthesized,
}

impl EnrichmentSource {
    /// Whether the data came from a real lookup rather than placeholder synthesis.
    pub fn is_authoritative(&self) -> bool {
        !matches!(self, EnrichmentSource::Synthesized)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentOutcome {
    pub data: EnrichedData,
    pub source: EnrichmentSource,
}

// ============ Dashboard Models ============

/// Query parameters for listing leads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    /// Case-insensitive substring matched against company name and domain.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                lead.company_name.to_lowercase().contains(&term)
                    || lead.domain.to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_priority = self.priority.map_or(true, |p| p == lead.priority);
        matches_search && matches_priority
    }
}

/// Aggregate figures shown on the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_leads: usize,
    pub qualified_leads: usize,
    pub avg_score: u8,
    pub top_priority: usize,
}

/// Response for `POST /api/v1/leads/:id/enrich`.
#[derive(Debug, Serialize)]
pub struct EnrichLeadResponse {
    pub lead: Lead,
    pub source: EnrichmentSource,
    /// False when the attributes are placeholders synthesized from the domain.
    pub authoritative: bool,
}

impl EnrichLeadResponse {
    pub fn new(lead: Lead, source: EnrichmentSource) -> Self {
        Self {
            lead,
            source,
            authoritative: source.is_authoritative(),
        }
    }
}

/// Response for `POST /api/v1/enrich`.
#[derive(Debug, Serialize)]
pub struct EnrichDomainResponse {
    pub data: EnrichedData,
    pub source: EnrichmentSource,
    pub authoritative: bool,
}

impl From<EnrichmentOutcome> for EnrichDomainResponse {
    fn from(outcome: EnrichmentOutcome) -> Self {
        Self {
            authoritative: outcome.source.is_authoritative(),
            data: outcome.data,
            source: outcome.source,
        }
    }
}

/// Response for `POST /api/v1/score`.
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Query parameters for `POST /api/v1/enrich`.
#[derive(Debug, Deserialize)]
pub struct EnrichDomainParams {
    pub domain: String,
}
