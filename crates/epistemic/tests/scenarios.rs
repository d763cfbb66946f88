//! Scenario tests for the knowledge engine.
//!
//! Each test plays a short sequence of witnessed events against a freshly
//! built model and checks what the agents end up knowing.

use epistemic::{build, impostor_atom, know, not_, EpistemicError, KripkeModel};

/// Every claim a knowledge-derived formula makes must hold in the real world.
fn assert_beliefs_true(model: &KripkeModel, observer: usize) {
    let truth = model.real_world().impostors().to_vec();
    for other in model.agents().filter(|&a| a != observer) {
        if model.knows_impostor(observer, other).unwrap() {
            assert!(truth.contains(&other), "{} wrongly accuses {}", observer, other);
        }
        if model.knows_crewmate(observer, other).unwrap() {
            assert!(!truth.contains(&other), "{} wrongly clears {}", observer, other);
        }
    }
}

#[test]
fn test_witnessed_kill_identifies_impostor() {
    let mut model = build(3, 1, &[2]).unwrap();

    assert!(model.suspects(0, 1).unwrap());
    assert!(model.suspects(0, 2).unwrap());

    model.update(0, &impostor_atom(2)).unwrap();

    assert!(model.knows_impostor(0, 2).unwrap());
    assert!(!model.suspects(0, 1).unwrap());
    // Nobody else learned anything
    assert!(model.suspects(1, 0).unwrap());
    assert!(!model.knows_impostor(1, 2).unwrap());
}

#[test]
fn test_visual_task_clears_one_crewmate() {
    let mut model = build(4, 1, &[3]).unwrap();

    assert!(!model.knows_crewmate(0, 1).unwrap());

    model.update(0, &not_(impostor_atom(1))).unwrap();

    assert!(model.knows_crewmate(0, 1).unwrap());
    assert!(model.suspects(0, 2).unwrap());
    assert!(model.suspects(0, 3).unwrap());
}

#[test]
fn test_broadcast_summary_is_sound() {
    let mut model = build(5, 2, &[3, 4]).unwrap();
    model.update_known_crewmate(2, 0).unwrap();
    model.update_known_crewmate(2, 1).unwrap();
    model.update_known_crewmate(0, 1).unwrap();
    assert_eq!(model.known_impostors(2).unwrap(), vec![3, 4]);
    assert!(model.known_impostors(0).unwrap().is_empty());

    let summary = model.summarize_knowledge(2).unwrap();
    assert!(model.evaluate(&summary).unwrap());

    // The summary fails at Imp2_3 and Imp2_4: there agent 2 is guilty and
    // could not hold the accusation
    let outcome = model.update(0, &summary).unwrap();
    let names: Vec<_> = outcome
        .inconsistent_worlds
        .iter()
        .map(|w| model.world(*w).unwrap().name())
        .collect();
    assert_eq!(names, vec!["Imp2_3", "Imp2_4"]);

    assert_eq!(model.known_impostors(0).unwrap(), vec![3, 4]);
    assert_beliefs_true(&model, 0);
}

#[test]
fn test_summary_is_silent_on_ruled_out_worlds() {
    let mut model = build(5, 1, &[4]).unwrap();
    model.update_known_crewmate(1, 3).unwrap();

    let before = model.relation(0).unwrap().clone();
    let summary = model.summarize_knowledge(1).unwrap();
    let outcome = model.update(0, &summary).unwrap();

    // Agent 1 has no successors at Imp3, so its claim holds there vacuously
    assert_eq!(outcome.removed_pairs, 0);
    assert_eq!(model.relation(0).unwrap(), &before);
    assert!(!model.knows_crewmate(0, 3).unwrap());
    assert_beliefs_true(&model, 0);
}

#[test]
fn test_resolved_speaker_tells_nothing_new() {
    let mut model = build(5, 1, &[4]).unwrap();
    model.update_known_impostor(2, 4).unwrap();

    let summary = model.summarize_knowledge(2).unwrap();
    assert_eq!(model.update(0, &summary).unwrap().removed_pairs, 0);
    assert!(!model.knows_impostor(0, 4).unwrap());
}

#[test]
fn test_summary_clears_the_speaker() {
    let mut model = build(4, 1, &[3]).unwrap();
    model.update_known_crewmate(0, 1).unwrap();
    model.update_known_crewmate(0, 2).unwrap();
    assert_eq!(model.known_impostors(0).unwrap(), vec![3]);

    // Agent 0 never ruled out its own guilt world, and the accusation is
    // false there
    let summary = model.summarize_knowledge(0).unwrap();
    model.update(2, &summary).unwrap();

    assert!(model.knows_crewmate(2, 0).unwrap());
    assert!(!model.knows_impostor(2, 3).unwrap());
    assert_beliefs_true(&model, 2);
}

#[test]
fn test_summaries_from_every_agent_are_sound() {
    let mut model = build(6, 2, &[1, 5]).unwrap();
    model.update_known_impostor(0, 5).unwrap();
    model.update_known_crewmate(2, 3).unwrap();
    model.update_known_crewmate(3, 0).unwrap();

    let summaries: Vec<_> = (0..6)
        .map(|speaker| (speaker, model.summarize_knowledge(speaker).unwrap()))
        .collect();

    for receiver in 0..6 {
        for (speaker, summary) in &summaries {
            if *speaker != receiver {
                model.update(receiver, summary).unwrap();
            }
        }
        assert_beliefs_true(&model, receiver);
    }
    assert!(model.is_well_formed());
}

#[test]
fn test_two_impostor_round() {
    let mut model = build(5, 2, &[3, 4]).unwrap();
    assert_eq!(model.worlds().len(), 10);

    model.update_known_impostor(0, 3).unwrap();
    assert!(model.knows_impostor(0, 3).unwrap());
    // The second impostor is still open
    assert!(!model.knows_impostor(0, 4).unwrap());
    assert!(model.suspects(0, 4).unwrap());

    model.update_known_crewmate(0, 1).unwrap();
    model.update_known_crewmate(0, 2).unwrap();
    assert!(model.knows_impostor(0, 4).unwrap());
    assert_eq!(model.suspected(0).unwrap(), vec![3, 4]);
}

#[test]
fn test_nested_knowledge_for_the_impostor() {
    let mut model = build(4, 1, &[3]).unwrap();
    model.update_known_impostor(1, 3).unwrap();

    assert!(model.knows_that_knows(1, 3, 3).unwrap());
    assert!(!model.knows_that_knows(0, 3, 3).unwrap());
    assert!(model
        .evaluate(&know(3, not_(know(0, impostor_atom(3)))))
        .unwrap());
}

#[test]
fn test_lying_update_fails_fast() {
    let mut model = build(4, 1, &[3]).unwrap();
    let err = model.update(0, &impostor_atom(1)).unwrap_err();
    assert!(matches!(err, EpistemicError::ContradictsRealWorld { agent: 0, .. }));
    assert!(model.suspects(0, 1).unwrap());
}

#[test]
fn test_reset_forgets_round() {
    let mut model = build(4, 1, &[3]).unwrap();
    model.update_known_impostor(0, 3).unwrap();
    assert!(model.knows_impostor(0, 3).unwrap());

    model.reset().unwrap();
    assert!(!model.knows_impostor(0, 3).unwrap());
    assert!(model.suspects(0, 1).unwrap());
}
