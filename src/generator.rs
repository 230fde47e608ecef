//! Prospect list generation.
//!
//! Builds batches of medium-priority leads from a small built-in company
//! catalog, sized to the requested head-count bracket. The store scores
//! them on insertion like any other lead.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::models::{NewLead, Priority};

/// Largest batch a single request may generate.
pub const MAX_GENERATED_LEADS: usize = 20;

const DEFAULT_INDUSTRY: &str = "technology";
const MIN_TECH_ITEMS: usize = 3;
const MAX_TECH_ITEMS: usize = 6;

/// Head-count bracket to draw employee counts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Startup,
    Small,
    #[default]
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    pub fn employee_range(&self) -> RangeInclusive<i64> {
        match self {
            CompanySize::Startup => 5..=50,
            CompanySize::Small => 51..=200,
            CompanySize::Medium => 201..=1000,
            CompanySize::Large => 1001..=5000,
            CompanySize::Enterprise => 5001..=50_000,
        }
    }
}

fn default_industry() -> String {
    DEFAULT_INDUSTRY.to_string()
}

fn default_count() -> usize {
    5
}

/// Request body for `POST /api/v1/leads/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLeadsRequest {
    /// Industry label stored on every lead. Unknown industries draw from
    /// the technology catalog.
    #[serde(default = "default_industry")]
    pub industry: String,
    /// Blank means a random major city per lead.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company_size: CompanySize,
    #[serde(default = "default_count")]
    pub count: usize,
}

struct CatalogCompany {
    name: &'static str,
    domain: &'static str,
    description: &'static str,
}

static TECHNOLOGY_COMPANIES: [CatalogCompany; 5] = [
    CatalogCompany {
        name: "TechFlow Solutions",
        domain: "techflow.com",
        description: "Cloud-based workflow automation platform",
    },
    CatalogCompany {
        name: "DataSync Pro",
        domain: "datasync.io",
        description: "Real-time data synchronization services",
    },
    CatalogCompany {
        name: "CloudVault Systems",
        domain: "cloudvault.net",
        description: "Enterprise cloud storage solutions",
    },
    CatalogCompany {
        name: "AI Insights Corp",
        domain: "aiinsights.ai",
        description: "Machine learning analytics platform",
    },
    CatalogCompany {
        name: "DevOps Central",
        domain: "devopscentral.com",
        description: "DevOps automation and monitoring tools",
    },
];

static HEALTHCARE_COMPANIES: [CatalogCompany; 4] = [
    CatalogCompany {
        name: "MedTech Innovations",
        domain: "medtech-inn.com",
        description: "Digital health monitoring solutions",
    },
    CatalogCompany {
        name: "HealthSync Platform",
        domain: "healthsync.care",
        description: "Patient data management system",
    },
    CatalogCompany {
        name: "CareConnect Solutions",
        domain: "careconnect.health",
        description: "Telemedicine platform provider",
    },
    CatalogCompany {
        name: "BioData Analytics",
        domain: "biodata.med",
        description: "Healthcare data analytics and insights",
    },
];

static FINANCE_COMPANIES: [CatalogCompany; 4] = [
    CatalogCompany {
        name: "FinTech Dynamics",
        domain: "fintech-dyn.com",
        description: "Digital banking solutions",
    },
    CatalogCompany {
        name: "PayStream Solutions",
        domain: "paystream.finance",
        description: "Payment processing platform",
    },
    CatalogCompany {
        name: "InvestPro Analytics",
        domain: "investpro.finance",
        description: "Investment portfolio management",
    },
    CatalogCompany {
        name: "CryptoVault Systems",
        domain: "cryptovault.secure",
        description: "Cryptocurrency security solutions",
    },
];

static TECHNOLOGY_STACK: [&str; 7] = [
    "React",
    "Node.js",
    "AWS",
    "Docker",
    "Kubernetes",
    "TypeScript",
    "PostgreSQL",
];
static HEALTHCARE_STACK: [&str; 6] = [
    "React",
    "Python",
    "AWS",
    "HIPAA Compliance",
    "MongoDB",
    "Redis",
];
static FINANCE_STACK: [&str; 6] = [
    "React",
    "Java",
    "AWS",
    "Blockchain",
    "PostgreSQL",
    "Security Protocols",
];

pub const LOCATIONS: [&str; 10] = [
    "San Francisco, CA",
    "New York, NY",
    "Austin, TX",
    "Seattle, WA",
    "Boston, MA",
    "Denver, CO",
    "Atlanta, GA",
    "Chicago, IL",
    "Los Angeles, CA",
    "Miami, FL",
];

fn catalog(industry: &str) -> (&'static [CatalogCompany], &'static [&'static str]) {
    match industry.trim().to_lowercase().as_str() {
        "healthcare" => (&HEALTHCARE_COMPANIES, &HEALTHCARE_STACK),
        "finance" => (&FINANCE_COMPANIES, &FINANCE_STACK),
        _ => (&TECHNOLOGY_COMPANIES, &TECHNOLOGY_STACK),
    }
}

fn linkedin_slug(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Generates `request.count` unscored leads.
///
/// Companies cycle through the industry catalog in order. Each lead gets a
/// random employee count inside the size bracket and 3 to 6 distinct
/// technologies from the industry stack.
pub fn generate_leads<R: Rng>(request: &GenerateLeadsRequest, rng: &mut R) -> Vec<NewLead> {
    let (companies, stack) = catalog(&request.industry);
    let range = request.company_size.employee_range();
    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    (0..request.count)
        .map(|index| {
            let company = &companies[index % companies.len()];

            let mut tech_stack: Vec<String> = stack.iter().map(|t| t.to_string()).collect();
            tech_stack.shuffle(rng);
            tech_stack.truncate(rng.gen_range(MIN_TECH_ITEMS..=MAX_TECH_ITEMS));

            let location = match location {
                Some(l) => l.to_string(),
                None => LOCATIONS
                    .choose(rng)
                    .copied()
                    .unwrap_or(LOCATIONS[0])
                    .to_string(),
            };

            NewLead {
                company_name: company.name.to_string(),
                domain: company.domain.to_string(),
                industry: request.industry.clone(),
                employee_count: rng.gen_range(range.clone()),
                tech_stack,
                priority: Priority::Medium,
                location: Some(location),
                description: Some(company.description.to_string()),
                contact_email: Some(format!("contact@{}", company.domain)),
                linkedin_url: Some(format!(
                    "https://linkedin.com/company/{}",
                    linkedin_slug(company.name)
                )),
            }
        })
        .collect()
}
