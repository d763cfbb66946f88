//! Property tests for relation invariants.
//!
//! Random rounds are built and fed random true observations; after every
//! update the relations must stay symmetric and reflexive wherever the agent
//! has not ruled a world out, never grow, and repeating an update must
//! change nothing.

use epistemic::{binomial, build, impostor_atom, not_, Formula, KripkeModel};
use proptest::prelude::*;

/// A round: agent count, impostor set, and (observer, target) observations.
fn round_strategy() -> impl Strategy<Value = (usize, Vec<usize>, Vec<(usize, usize)>)> {
    (3usize..8, 1usize..3)
        .prop_filter("need at least one crewmate", |(n, k)| k < n)
        .prop_flat_map(|(n, k)| {
            let agents: Vec<usize> = (0..n).collect();
            (
                Just(n),
                proptest::sample::subsequence(agents, k),
                proptest::collection::vec((0..n, 0..n), 0..12),
            )
        })
}

/// The true fact about `target` in the real world.
fn true_fact(model: &KripkeModel, target: usize) -> Formula {
    if model.real_world().has_impostor(target) {
        impostor_atom(target)
    } else {
        not_(impostor_atom(target))
    }
}

proptest! {
    #[test]
    fn prop_world_count_is_binomial((n, impostors, _) in round_strategy()) {
        let model = build(n, impostors.len(), &impostors).unwrap();
        prop_assert_eq!(model.worlds().len(), binomial(n, impostors.len()).unwrap());
        for world in model.worlds() {
            prop_assert_eq!(world.true_count(), impostors.len());
        }
    }

    #[test]
    fn prop_relations_stay_well_formed((n, impostors, observations) in round_strategy()) {
        let mut model = build(n, impostors.len(), &impostors).unwrap();
        prop_assert!(model.is_well_formed());

        let real = model.real_world_index();
        for (observer, target) in observations {
            let fact = true_fact(&model, target);
            let outcome = model.update(observer, &fact).unwrap();
            prop_assert!(model.is_well_formed());

            let relation = model.relation(observer).unwrap();
            prop_assert!(relation.contains(real, real));
            for world in outcome.inconsistent_worlds {
                prop_assert!(!relation.is_live(world));
            }
        }
    }

    #[test]
    fn prop_relations_only_shrink((n, impostors, observations) in round_strategy()) {
        let mut model = build(n, impostors.len(), &impostors).unwrap();

        for (observer, target) in observations {
            let sizes: Vec<usize> = (0..n).map(|a| model.relation(a).unwrap().len()).collect();
            let fact = true_fact(&model, target);
            model.update(observer, &fact).unwrap();

            for agent in 0..n {
                let size = model.relation(agent).unwrap().len();
                if agent == observer {
                    prop_assert!(size <= sizes[agent]);
                } else {
                    prop_assert_eq!(size, sizes[agent]);
                }
            }
        }
    }

    #[test]
    fn prop_updates_are_idempotent((n, impostors, observations) in round_strategy()) {
        let mut model = build(n, impostors.len(), &impostors).unwrap();

        for (observer, target) in observations {
            let fact = true_fact(&model, target);
            model.update(observer, &fact).unwrap();
            let once = model.relation(observer).unwrap().clone();

            let outcome = model.update(observer, &fact).unwrap();
            prop_assert_eq!(outcome.removed_pairs, 0);
            prop_assert_eq!(model.relation(observer).unwrap(), &once);
        }
    }

    #[test]
    fn prop_broadcasts_never_mislead((n, impostors, observations) in round_strategy()) {
        let mut model = build(n, impostors.len(), &impostors).unwrap();
        for (observer, target) in observations {
            let fact = true_fact(&model, target);
            model.update(observer, &fact).unwrap();
        }

        for speaker in 0..n {
            let summary = model.summarize_knowledge(speaker).unwrap();
            for receiver in (0..n).filter(|&r| r != speaker) {
                model.update(receiver, &summary).unwrap();
            }
        }

        for observer in 0..n {
            for other in (0..n).filter(|&o| o != observer) {
                if model.knows_impostor(observer, other).unwrap() {
                    prop_assert!(impostors.contains(&other));
                }
                if model.knows_crewmate(observer, other).unwrap() {
                    prop_assert!(!impostors.contains(&other));
                }
            }
        }
    }
}
