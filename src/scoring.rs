//! Lead scoring.
//!
//! A lead's score is the sum of five independent, capped contributions:
//!
//! | Component  | Range | Input            |
//! |------------|-------|------------------|
//! | size       | 0-25  | `employee_count` |
//! | tech stack | 0-30  | `tech_stack`     |
//! | industry   | 0-20  | `industry`       |
//! | priority   | 0-15  | `priority`       |
//! | recency    | 0-10  | `created_at`     |
//!
//! The total is clamped to 100. Missing inputs contribute 0, so scoring
//! never fails.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::PartialLead;

pub const MAX_SCORE: u8 = 100;

/// Technologies we sell into. Matched as lowercase substrings.
pub const TARGET_TECH: [&str; 7] = [
    "react",
    "nodejs",
    "aws",
    "typescript",
    "postgresql",
    "mongodb",
    "redis",
];

const HIGH_VALUE_INDUSTRIES: [&str; 4] = ["technology", "software", "fintech", "saas"];
const MEDIUM_VALUE_INDUSTRIES: [&str; 3] = ["e-commerce", "communication", "design"];

const TECH_POINTS_PER_MATCH: u32 = 5;
const TECH_CAP: u32 = 30;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Per-component contributions behind a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub size: u32,
    pub tech_stack: u32,
    pub industry: u32,
    pub priority: u32,
    pub recency: u32,
}

impl ScoreBreakdown {
    pub fn compute(lead: &PartialLead, now: DateTime<Utc>) -> Self {
        Self {
            size: size_points(lead.employee_count),
            tech_stack: tech_points(lead.tech_stack.as_deref()),
            industry: industry_points(lead.industry.as_deref()),
            priority: lead.priority.map_or(0, |p| p.bonus()),
            recency: recency_points(lead.created_at, now),
        }
    }

    /// Clamped sum of all components.
    pub fn total(&self) -> u8 {
        let sum = self.size + self.tech_stack + self.industry + self.priority + self.recency;
        sum.min(MAX_SCORE as u32) as u8
    }
}

/// Scores a lead against the current wall clock.
pub fn calculate_lead_score(lead: &PartialLead) -> u8 {
    score_at(lead, Utc::now())
}

/// Scores a lead as of `now`.
pub fn score_at(lead: &PartialLead, now: DateTime<Utc>) -> u8 {
    ScoreBreakdown::compute(lead, now).total()
}

/// Highest matching head-count bucket. Non-positive counts are treated as absent.
pub fn size_points(employee_count: Option<i64>) -> u32 {
    match employee_count {
        Some(n) if n >= 1000 => 25,
        Some(n) if n >= 500 => 20,
        Some(n) if n >= 100 => 15,
        Some(n) if n >= 50 => 10,
        Some(n) if n > 0 => 5,
        _ => 0,
    }
}

/// Five points per entry naming a target technology, capped at 30.
pub fn tech_points(tech_stack: Option<&[String]>) -> u32 {
    let Some(stack) = tech_stack else {
        return 0;
    };
    let matches = stack
        .iter()
        .filter(|tech| {
            let tech = tech.to_lowercase();
            TARGET_TECH.iter().any(|target| tech.contains(target))
        })
        .count() as u32;
    matches.saturating_mul(TECH_POINTS_PER_MATCH).min(TECH_CAP)
}

/// First matching tier wins; any other non-empty industry earns the base 10.
pub fn industry_points(industry: Option<&str>) -> u32 {
    let Some(industry) = industry.filter(|i| !i.is_empty()) else {
        return 0;
    };
    let industry = industry.to_lowercase();
    if HIGH_VALUE_INDUSTRIES.iter().any(|k| industry.contains(k)) {
        20
    } else if MEDIUM_VALUE_INDUSTRIES.iter().any(|k| industry.contains(k)) {
        15
    } else {
        10
    }
}

/// 10 points within a week of creation, 5 within thirty days.
pub fn recency_points(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(created_at) = created_at else {
        return 0;
    };
    let age_days = (now - created_at).num_milliseconds() as f64 / MS_PER_DAY;
    if age_days <= 7.0 {
        10
    } else if age_days <= 30.0 {
        5
    } else {
        0
    }
}
