use std::io::Cursor;
use std::path::Path;

use hashaudit::algorithm::HashAlgorithm::{Md5, Sha256};
use hashaudit::engine::{AuditEngine, ClassifyOptions, InputFile, MatchOutcome};
use hashaudit::known::{KnownStore, load_from_reader};

const H1: &str = "11111111111111111111111111111111";
const H2: &str = "22222222222222222222222222222222";

fn engine_from(listing: &str) -> AuditEngine {
    let mut store = KnownStore::new();
    let text = format!("%%%% HASHDEEP-1.0\n%%%% size,md5,filename\n{listing}");
    load_from_reader(&mut store, Cursor::new(text), Path::new("known.txt"), None)
        .expect("load known set");
    AuditEngine::new(store, &[Md5], ClassifyOptions::default()).expect("engine")
}

fn md5_input(name: &str, size: u64, digest: &str) -> InputFile {
    InputFile::from_pairs(name, Some(size), [(Md5, digest)])
}

#[test]
fn exact_match_passes() {
    let mut engine = engine_from(&format!("10,{H1},a.txt\n"));
    let verdict = engine.process(&md5_input("a.txt", 10, H1)).unwrap();
    assert_eq!(verdict.outcome, MatchOutcome::Exact);

    let report = engine.finish();
    assert!(report.passed);
    assert_eq!(report.counters.exact, 1);
}

#[test]
fn renamed_file_fails_as_moved() {
    let mut engine = engine_from(&format!("10,{H1},a.txt\n"));
    let verdict = engine.process(&md5_input("b.txt", 10, H1)).unwrap();
    assert_eq!(verdict.outcome, MatchOutcome::Moved);
    assert_eq!(verdict.moved_from.as_deref(), Some("a.txt"));

    let report = engine.finish();
    assert!(!report.passed);
    assert_eq!(report.counters.moved, 1);
    assert_eq!(report.unused_entries, vec!["a.txt".to_string()]);
}

#[test]
fn unknown_file_fails_and_leaves_entry_unused() {
    let mut engine = engine_from(&format!("10,{H1},a.txt\n"));
    let verdict = engine.process(&md5_input("c.txt", 10, H2)).unwrap();
    assert_eq!(verdict.outcome, MatchOutcome::Unmatched);

    let report = engine.finish();
    assert!(!report.passed);
    assert_eq!(report.counters.unmatched, 1);
    assert_eq!(report.counters.unused, 1);
    assert_eq!(report.unused_entries, vec!["a.txt".to_string()]);
}

#[test]
fn shared_digest_leaves_the_other_entry_unused() {
    let mut engine = engine_from(&format!("10,{H1},a.txt\n10,{H1},dup.txt\n"));
    let verdict = engine.process(&md5_input("a.txt", 10, H1)).unwrap();
    assert_eq!(verdict.outcome, MatchOutcome::Exact);

    let report = engine.finish();
    assert_eq!(report.unused_entries, vec!["dup.txt".to_string()]);
    assert!(!report.passed);
}

#[test]
fn weak_digest_collision_fails_only_as_unmatched() {
    let mut engine = engine_from(&format!("10,{H1},kernel.sys\n"));
    let verdict = engine.process(&md5_input("evil.sys", 99, H1)).unwrap();
    assert_eq!(verdict.outcome, MatchOutcome::Unmatched);
    assert!(verdict.flags.collision);

    let report = engine.finish();
    assert_eq!(report.counters.collision, 1);
    assert_eq!(report.counters.unmatched, 1);
    assert_eq!(report.counters.moved, 0);
    assert!(!report.passed);
}

#[test]
fn stronger_algorithm_disagreement_is_a_collision() {
    let mut store = KnownStore::new();
    let sha_known = "a".repeat(64);
    let sha_input = "b".repeat(64);
    let text = format!(
        "%%%% HASHDEEP-1.0\n%%%% size,md5,sha256,filename\n10,{H1},{sha_known},app.exe\n"
    );
    load_from_reader(&mut store, Cursor::new(text), Path::new("known.txt"), None).unwrap();
    let mut engine = AuditEngine::new(store, &[Md5, Sha256], ClassifyOptions::default()).unwrap();

    let file = InputFile::from_pairs("app.exe", Some(10), [(Md5, H1), (Sha256, sha_input.as_str())]);
    let verdict = engine.process(&file).unwrap();
    assert!(verdict.flags.collision);
    assert_eq!(verdict.outcome, MatchOutcome::Unmatched);
    assert_eq!(verdict.collision_with.as_deref(), Some("app.exe"));
}
