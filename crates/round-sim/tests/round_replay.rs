//! End-to-end replays of the fixture scripts.

use std::io::{self, Write};

use game_events::{fixtures, generate_event_id, EventKind, GameEvent};
use round_sim::output::FINAL_TRIGGER;
use round_sim::{
    MeetingReport, Outcome, ReportWriter, RoundConfig, RoundError, RoundRunner, TrustEdge,
    TrustPolicy,
};

fn config(num_agents: usize, impostors: &[usize]) -> RoundConfig {
    let mut config = RoundConfig::default();
    config.game.num_agents = num_agents;
    config.game.num_impostors = impostors.len();
    config.game.impostors = impostors.to_vec();
    config
}

fn trusts(report: &MeetingReport, receiver: usize, speaker: usize) -> bool {
    report.trust.contains(&TrustEdge { receiver, speaker })
}

/// Four players, impostor 3: agents 0 and 1 clear each other and agent 2
/// through visual tasks, then agent 2 calls a meeting.
fn cleared_by_tasks() -> Vec<GameEvent> {
    let kinds = vec![
        EventKind::VisualTask {
            agent: 1,
            witnesses: vec![0],
        },
        EventKind::VisualTask {
            agent: 2,
            witnesses: vec![0, 1],
        },
        EventKind::VisualTask {
            agent: 0,
            witnesses: vec![1],
        },
        EventKind::EmergencyMeeting { caller: 2 },
    ];
    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| GameEvent::new(generate_event_id(i as u64 + 1), 2 * i as u64, kind))
        .collect()
}

struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "no space left"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_witnessed_kill_round() {
    let mut runner = RoundRunner::new(&config(5, &[4])).unwrap();
    let summary = runner.run(fixtures::witnessed_kill_events()).unwrap();

    assert_eq!(summary.real_world, "Imp4");
    assert_eq!(summary.events_applied, 5);
    assert_eq!(summary.meetings, 1);
    assert_eq!(summary.outcome, Outcome::CrewmatesWin);

    let reports = runner.reports();
    assert_eq!(reports.len(), 2);

    let meeting = &reports[0];
    assert_eq!(meeting.meeting, 1);
    assert_eq!(meeting.tick, 7);
    assert_eq!(meeting.trigger, "body_reported");
    assert_eq!(meeting.alive, vec![0, 2, 3, 4]);

    // Agent 2 saw the kill, which also ruled out the world where agent 2 is
    // guilty, so its summary holds everywhere and the accusation stays put
    assert_eq!(meeting.report.agent(2).unwrap().known_impostors, vec![4]);
    for crewmate in [0, 3] {
        let knowledge = meeting.report.agent(crewmate).unwrap();
        assert!(knowledge.known_impostors.is_empty(), "agent {}", crewmate);
        assert_eq!(knowledge.known_crewmates, vec![1, 2], "agent {}", crewmate);
    }
    let edges: Vec<_> = meeting.trust.iter().map(|e| (e.receiver, e.speaker)).collect();
    assert_eq!(edges, vec![(0, 2), (2, 0), (2, 3), (3, 2)]);
    // The dead take no part
    assert_eq!(meeting.report.agent(1).unwrap().suspects, vec![0, 2, 3, 4]);

    let last = &reports[1];
    assert_eq!(last.trigger, FINAL_TRIGGER);
    assert_eq!(last.meeting, 2);
    assert_eq!(last.alive, vec![0, 2, 3]);
    assert_eq!(&summary.final_report, last);
}

#[test]
fn test_without_sharing_only_the_witness_knows() {
    let mut config = config(5, &[4]);
    config.discussion.share_knowledge = false;

    let mut runner = RoundRunner::new(&config).unwrap();
    runner.run(fixtures::witnessed_kill_events()).unwrap();
    let model = runner.model();

    assert!(model.knows_impostor(2, 4).unwrap());
    assert!(!model.knows_impostor(0, 4).unwrap());
    assert!(!model.knows_impostor(3, 4).unwrap());
    // The body still clears the victim
    assert_eq!(model.known_crewmates(0).unwrap(), vec![1, 2]);
    assert_eq!(model.known_crewmates(3).unwrap(), vec![1, 2]);
    assert!(runner.reports()[0].trust.is_empty());
}

#[test]
fn test_emergency_meeting_round() {
    let mut runner = RoundRunner::new(&config(4, &[3])).unwrap();
    let summary = runner.run(fixtures::emergency_meeting_events()).unwrap();

    assert_eq!(summary.meetings, 1);
    assert_eq!(summary.outcome, Outcome::Undecided);

    let meeting = &runner.reports()[0];
    assert_eq!(meeting.trigger, "emergency_meeting");
    assert_eq!(meeting.alive, vec![0, 1, 2, 3]);

    // Agent 2 trusts agent 0, but agent 0 only knows agent 1 is innocent
    assert!(trusts(meeting, 2, 0));
    let two = meeting.report.agent(2).unwrap();
    assert_eq!(two.known_crewmates, vec![0]);
    assert!(two.known_impostors.is_empty());

    // Agent 0 cannot vouch for agent 2, so it does not listen
    assert!(trusts(meeting, 0, 1));
    assert!(!trusts(meeting, 0, 2));
    let zero = meeting.report.agent(0).unwrap();
    assert_eq!(zero.known_crewmates, vec![1]);
    assert!(zero.known_impostors.is_empty());

    let one = meeting.report.agent(1).unwrap();
    assert!(one.known_crewmates.is_empty());
    assert_eq!(one.suspects, vec![0, 2, 3]);
}

#[test]
fn test_trusting_everyone_converges() {
    let mut config = config(4, &[3]);
    config.discussion.trust_policy = TrustPolicy::Everyone;
    config.discussion.max_rounds = 3;

    let mut runner = RoundRunner::new(&config).unwrap();
    runner.run(cleared_by_tasks()).unwrap();

    let meeting = &runner.reports()[0];
    assert_eq!(meeting.trigger, "emergency_meeting");
    // Agents 0 and 1 solved it alone; agent 2 learns from their broadcasts
    for crewmate in 0..3 {
        assert!(meeting.report.agent(crewmate).unwrap().has_solved(1));
    }
    assert_eq!(meeting.trust.len(), 6);
    assert!(runner.model().is_well_formed());
}

#[test]
fn test_known_crewmates_leave_the_caller_guessing() {
    let mut runner = RoundRunner::new(&config(4, &[3])).unwrap();
    runner.run(cleared_by_tasks()).unwrap();

    let meeting = &runner.reports()[0];
    assert!(meeting.report.agent(0).unwrap().has_solved(1));
    assert!(meeting.report.agent(1).unwrap().has_solved(1));
    let two = meeting.report.agent(2).unwrap();
    assert!(!two.has_solved(1));
    assert_eq!(two.suspects, vec![0, 1, 3]);
    assert!(!meeting.trust.iter().any(|e| e.receiver == 2));
}

#[test]
fn test_report_write_failure_stops_the_round() {
    let writer = ReportWriter::from_writer(FullDisk);
    let mut runner = RoundRunner::new(&config(5, &[4])).unwrap().with_writer(writer);

    let result = runner.run(fixtures::witnessed_kill_events());
    assert!(matches!(result, Err(RoundError::Io(_))));
    // The meeting was still logged in memory before the round stopped
    assert_eq!(runner.reports().len(), 1);
}

#[test]
fn test_reports_written_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("output").join("reports.jsonl");

    let writer = ReportWriter::new(&path).unwrap();
    let mut runner = RoundRunner::new(&config(5, &[4])).unwrap().with_writer(writer);
    runner.run(fixtures::witnessed_kill_events()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<MeetingReport> = contents
        .lines()
        .map(|l| MeetingReport::from_jsonl(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].trigger, "body_reported");
    assert_eq!(lines[1].trigger, FINAL_TRIGGER);
}

#[test]
fn test_script_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round.jsonl");
    std::fs::write(&path, fixtures::EMERGENCY_MEETING_JSONL).unwrap();

    let events = game_events::load_script(&path).unwrap();
    let mut runner = RoundRunner::new(&config(4, &[3])).unwrap();
    let summary = runner.run(events).unwrap();
    assert_eq!(summary.events_applied, 4);
}
