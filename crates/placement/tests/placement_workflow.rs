use placement::workflows::placement::{
    AssignmentStatus, GreedyAllocator, MatchingConfig, PlacementReport, ScoringVariant,
};
use placement::workflows::roster::{ImportDiagnostic, RosterImporter};

fn fixture_rosters() -> (
    placement::workflows::roster::CandidateRoster,
    placement::workflows::roster::SlotRoster,
) {
    let importer = RosterImporter::default();
    let students = importer
        .candidates_from_reader(&include_bytes!("../fixtures/students.csv")[..])
        .expect("students roster resolves");
    let sites = importer
        .slots_from_reader(&include_bytes!("../fixtures/sites.csv")[..])
        .expect("sites roster resolves");
    (students, sites)
}

#[test]
fn hebrew_rosters_resolve_to_candidates_and_slots() {
    let (students, sites) = fixture_rosters();

    assert_eq!(students.candidates.len(), 5);
    assert!(students.diagnostics.is_empty());
    assert_eq!(students.candidates[0].id, "100000001");
    assert_eq!(students.candidates[0].city, "Haifa");

    assert_eq!(sites.slots.len(), 4);
    assert_eq!(sites.slots[0].supervisor, "Sara Katz");
    assert_eq!(sites.slots[2].capacity, 1);
    assert_eq!(
        sites.diagnostics,
        vec![ImportDiagnostic::CapacityDefaulted {
            site: "Akko School".to_string(),
            line: 4,
            raw: "two".to_string(),
            capacity: 1,
        }]
    );
}

#[test]
fn fixture_run_respects_capacity_and_quota() {
    let (students, sites) = fixture_rosters();
    let config = MatchingConfig::for_variant(ScoringVariant::Asymmetric);
    let outcome = GreedyAllocator::from_config(&config).allocate(&students.candidates, &sites.slots);

    let placements: Vec<(&str, AssignmentStatus, u8)> = outcome
        .records
        .iter()
        .map(|record| (record.slot_name.as_str(), record.status, record.score))
        .collect();
    assert_eq!(
        placements,
        vec![
            ("Rambam Lab", AssignmentStatus::Assigned, 100),
            ("Technion Physics", AssignmentStatus::Assigned, 73),
            ("Rambam Lab", AssignmentStatus::Assigned, 78),
            ("Akko School", AssignmentStatus::Assigned, 61),
            ("Carmel Clinic", AssignmentStatus::AssignedOverQuota, 0),
        ]
    );
    assert_eq!(outcome.supervisor_load.count("Sara Katz"), 3);

    let report = PlacementReport::new(&sites.slots, &outcome);
    let summaries = report.slot_summaries();
    let rambam = summaries
        .iter()
        .find(|entry| entry.slot_name == "Rambam Lab")
        .expect("rambam summarized");
    assert_eq!(rambam.recommendation, "Noa Levi + Maya Peretz");

    let capacities = report.capacities();
    assert_eq!(
        capacities
            .iter()
            .map(|entry| entry.slot_name.as_str())
            .collect::<Vec<_>>(),
        vec!["Akko School", "Carmel Clinic", "Rambam Lab", "Technion Physics"]
    );
    assert!(capacities.iter().all(|entry| entry.balance == 0));
}

#[test]
fn uniform_variant_changes_scores_but_not_capacity_rules() {
    let (students, sites) = fixture_rosters();
    let config = MatchingConfig::for_variant(ScoringVariant::Uniform);
    let outcome = GreedyAllocator::from_config(&config).allocate(&students.candidates, &sites.slots);

    assert_eq!(outcome.assigned_count(), 5);
    assert_eq!(outcome.records[0].slot_name, "Rambam Lab");
    assert_eq!(outcome.records[0].score, 98);
    for state in &outcome.slots {
        assert_eq!(state.capacity_remaining, 0);
    }
}
