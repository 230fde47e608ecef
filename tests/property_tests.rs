/// Property-based tests using proptest
/// Tests invariants that should hold for every scoring input
use chrono::{Duration, TimeZone, Utc};
use leadgen_pro::models::{PartialLead, Priority};
use leadgen_pro::scoring::{score_at, size_points, tech_points, TARGET_TECH};
use proptest::prelude::*;

fn priority_strategy() -> impl Strategy<Value = Option<Priority>> {
    prop::option::of(prop::sample::select(vec![
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ]))
}

fn tech_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(TARGET_TECH.to_vec()).prop_map(|t| t.to_uppercase()),
        "[a-z.]{1,12}",
    ]
}

prop_compose! {
    fn partial_lead()(
        employee_count in prop::option::of(-100i64..100_000),
        tech_stack in prop::option::of(prop::collection::vec(tech_strategy(), 0..12)),
        industry in prop::option::of("[A-Za-z -]{0,24}"),
        priority in priority_strategy(),
        age_days in prop::option::of(-5i64..90),
    ) -> PartialLead {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        PartialLead {
            employee_count,
            tech_stack,
            industry,
            priority,
            created_at: age_days.map(|d| now - Duration::days(d)),
        }
    }
}

fn reference_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

// Property: score is bounded and deterministic
proptest! {
    #[test]
    fn score_always_within_bounds(lead in partial_lead()) {
        let score = score_at(&lead, reference_now());
        prop_assert!(score <= 100);
    }

    #[test]
    fn score_is_idempotent(lead in partial_lead()) {
        let now = reference_now();
        prop_assert_eq!(score_at(&lead, now), score_at(&lead, now));
    }

    #[test]
    fn score_ignores_tech_stack_order(lead in partial_lead(), seed in any::<u64>()) {
        let now = reference_now();
        let mut shuffled = lead.clone();
        if let Some(ref mut stack) = shuffled.tech_stack {
            if !stack.is_empty() {
                let len = stack.len();
                stack.rotate_left((seed as usize) % len);
                stack.reverse();
            }
        }
        prop_assert_eq!(score_at(&lead, now), score_at(&shuffled, now));
    }
}

// Property: tech stack contribution
proptest! {
    #[test]
    fn tech_points_is_five_per_match_capped(stack in prop::collection::vec(tech_strategy(), 0..20)) {
        let matches = stack
            .iter()
            .filter(|t| {
                let t = t.to_lowercase();
                TARGET_TECH.iter().any(|target| t.contains(target))
            })
            .count() as u32;
        prop_assert_eq!(tech_points(Some(stack.as_slice())), (matches * 5).min(30));
    }

    #[test]
    fn tech_points_monotonic_when_adding_match(
        stack in prop::collection::vec(tech_strategy(), 0..20),
        extra in prop::sample::select(TARGET_TECH.to_vec()),
    ) {
        let before = tech_points(Some(stack.as_slice()));
        let mut grown = stack.clone();
        grown.push(extra.to_string());
        let after = tech_points(Some(grown.as_slice()));
        prop_assert!(after >= before);
        prop_assert!(after <= 30);
    }
}

// Property: size buckets
proptest! {
    #[test]
    fn large_companies_get_full_size_points(count in 1000i64..10_000_000) {
        prop_assert_eq!(size_points(Some(count)), 25);
    }

    #[test]
    fn size_points_monotonic(a in 0i64..5000, b in 0i64..5000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(size_points(Some(lo)) <= size_points(Some(hi)));
    }
}
