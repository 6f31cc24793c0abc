//! Property tests for the pure capability modules.

use proptest::prelude::*;

use quill_core::skills::{fact_check, planning};
use quill_core::{Depth, Verdict};

fn depth_strategy() -> impl Strategy<Value = Depth> {
    prop_oneof![
        Just(Depth::Shallow),
        Just(Depth::Medium),
        Just(Depth::Deep),
    ]
}

proptest! {
    #[test]
    fn query_count_never_exceeds_the_budget(
        topic in "[a-zA-Z][a-zA-Z ]{0,40}",
        depth in depth_strategy(),
        budget in 1usize..10,
    ) {
        let queries = planning::generate_queries(&topic, depth, budget);
        prop_assert!(!queries.is_empty());
        prop_assert!(queries.len() <= budget);

        let mut lowered: Vec<String> = queries.iter().map(|q| q.to_lowercase()).collect();
        lowered.sort();
        lowered.dedup();
        prop_assert_eq!(lowered.len(), queries.len(), "queries must be distinct");
    }

    #[test]
    fn claim_extraction_is_bounded_and_total(text in ".{0,400}") {
        let claims = fact_check::extract_claims(&text);
        prop_assert!(claims.len() <= fact_check::MAX_CLAIMS);

        // Every extracted claim resolves to exactly one verdict; with no
        // evidence that verdict is always unverifiable.
        for claim in &claims {
            let resolved = fact_check::resolve_claim(claim, &[]);
            prop_assert_eq!(resolved.verdict, Verdict::Unverifiable);
            prop_assert!(resolved.evidence.is_empty());
        }
    }

    #[test]
    fn plans_always_carry_objectives_and_queries(
        topic in "[a-zA-Z][a-zA-Z ]{0,40}",
        depth in depth_strategy(),
    ) {
        let budget = match depth {
            Depth::Shallow => 2,
            Depth::Medium => 5,
            Depth::Deep => 8,
        };
        let plan = planning::build_plan(&topic, depth, budget);
        prop_assert!(!plan.objectives.is_empty());
        prop_assert!(!plan.queries.is_empty());
        prop_assert!(plan.queries.len() <= budget);
    }
}
