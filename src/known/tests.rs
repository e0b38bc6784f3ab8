use super::*;
use crate::algorithm::{DigestValue, HashAlgorithm};
use crate::engine::InputFile;
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

const MD5_A: &str = "d41d8cd98f00b204e9800998ecf8427e";
const SHA_A: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn load_str(text: &str, hint: Option<HashAlgorithm>) -> Result<KnownStore, KnownSetError> {
    let mut store = KnownStore::new();
    load_from_reader(&mut store, Cursor::new(text), Path::new("known.txt"), hint)?;
    Ok(store)
}

#[test]
fn insert_preserves_colliding_entries_in_order() {
    let mut store = KnownStore::new();
    let first = store.insert(KnownEntry::from_pairs("a", None, [(HashAlgorithm::Md5, MD5_A)]));
    let second = store.insert(KnownEntry::from_pairs("b", None, [(HashAlgorithm::Md5, MD5_A)]));

    let digest = DigestValue::new(MD5_A).unwrap();
    assert_eq!(store.lookup(HashAlgorithm::Md5, &digest), &[first, second]);
    assert_eq!(store.index(HashAlgorithm::Md5).unwrap().len(), 1);
    assert!(store.lookup(HashAlgorithm::Sha256, &digest).is_empty());
}

#[test]
fn entries_without_a_digest_are_not_indexed_for_it() {
    let mut store = KnownStore::new();
    store.insert(KnownEntry::from_pairs(
        "a",
        None,
        [(HashAlgorithm::Md5, MD5_A), (HashAlgorithm::Sha256, "")],
    ));
    assert_eq!(store.algorithms().collect::<Vec<_>>(), vec![HashAlgorithm::Md5]);
}

#[test]
fn loads_hashdeep_records_with_sizes_and_comments() {
    let text = format!(
        "%%%% HASHDEEP-1.0\n%%%% size,md5,sha256,filename\n## Invoked from: /tmp\n##\n0,{MD5_A},{SHA_A},/data/empty.txt\n"
    );
    let store = load_str(&text, None).unwrap();
    assert_eq!(store.len(), 1);
    let entry = store.iter().next().unwrap();
    assert_eq!(entry.name(), "/data/empty.txt");
    assert_eq!(entry.size(), Some(0));
    assert_eq!(entry.digest(HashAlgorithm::Sha256).unwrap().as_str(), SHA_A);
}

#[test]
fn hashdeep_filenames_may_contain_commas() {
    let text = format!("%%%% HASHDEEP-1.0\n%%%% size,md5,filename\n3,{MD5_A},a,b,c.txt\n");
    let store = load_str(&text, None).unwrap();
    assert_eq!(store.iter().next().unwrap().name(), "a,b,c.txt");
}

#[test]
fn hashdeep_header_requires_filename_last() {
    let err = load_str("%%%% HASHDEEP-1.0\n%%%% filename,md5\n", None).unwrap_err();
    assert!(matches!(err, KnownSetError::Header { .. }));
}

#[test]
fn hashdeep_header_rejects_unknown_algorithms() {
    let err = load_str("%%%% HASHDEEP-1.0\n%%%% size,crc32,filename\n", None).unwrap_err();
    assert!(err.to_string().contains("crc32"));
}

#[test]
fn hashdeep_record_errors_report_line_numbers() {
    let text = format!("%%%% HASHDEEP-1.0\n%%%% size,md5,filename\n## c\nxx,{MD5_A},a.txt\n");
    let err = load_str(&text, None).unwrap_err();
    match err {
        KnownSetError::Record { line, reason, .. } => {
            assert_eq!(line, 4);
            assert!(reason.contains("invalid size"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn plain_sums_infer_algorithm_from_length() {
    let text = format!("{MD5_A}  one.txt\n\n{SHA_A} *two.bin\n");
    let store = load_str(&text, None).unwrap();
    let names: Vec<_> = store.iter().map(|entry| entry.name().to_string()).collect();
    assert_eq!(names, vec!["one.txt", "two.bin"]);
    assert!(store.iter().next().unwrap().digest(HashAlgorithm::Md5).is_some());
    assert!(store.iter().nth(1).unwrap().digest(HashAlgorithm::Sha256).is_some());
}

#[test]
fn plain_sums_honor_algorithm_hint() {
    let text = format!("{SHA_A}  one.txt\n");
    let store = load_str(&text, Some(HashAlgorithm::Blake3)).unwrap();
    let entry = store.iter().next().unwrap();
    assert!(entry.digest(HashAlgorithm::Blake3).is_some());
    assert!(entry.digest(HashAlgorithm::Sha256).is_none());
}

#[test]
fn plain_sums_reject_unknown_lengths() {
    let err = load_str("abcd  short.txt\n", None).unwrap_err();
    assert!(err.to_string().contains("cannot infer algorithm"));
}

#[test]
fn load_known_set_reports_missing_files() {
    let dir = tempdir().unwrap();
    let mut store = KnownStore::new();
    let err = load_known_set(&mut store, &dir.path().join("missing.txt"), None).unwrap_err();
    assert!(matches!(err, KnownSetError::Read { .. }));
}

#[test]
fn writer_output_loads_back() {
    let algorithms = [HashAlgorithm::Md5, HashAlgorithm::Sha256];
    let mut writer = HashdeepWriter::start(Vec::new(), &algorithms, &["hashaudit".to_string()]).unwrap();
    let file = InputFile::from_pairs(
        "/data/empty.txt",
        Some(0),
        [(HashAlgorithm::Md5, MD5_A), (HashAlgorithm::Sha256, SHA_A)],
    );
    writer.record(&file).unwrap();
    let bytes = writer.finish().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with(HASHDEEP_MAGIC));

    let store = load_str(&text, None).unwrap();
    let entry = store.iter().next().unwrap();
    assert_eq!(entry.name(), file.name);
    assert_eq!(entry.size(), Some(0));
    assert_eq!(entry.digests(), &file.digests);
}

#[test]
fn hashdeep_records_may_omit_size() {
    let text = format!("%%%% HASHDEEP-1.0\n%%%% size,md5,filename\n,{MD5_A},a.txt\n");
    let store = load_str(&text, None).unwrap();
    assert_eq!(store.iter().next().unwrap().size(), None);
}

#[test]
fn hint_is_ignored_when_digest_length_disagrees() {
    let text = format!("{SHA_A}  one.txt\n");
    let store = load_str(&text, Some(HashAlgorithm::Md5)).unwrap();
    assert!(store.iter().next().unwrap().digest(HashAlgorithm::Sha256).is_some());
}

#[test]
fn nul_terminated_records_keep_newline_headers() {
    let algorithms = [HashAlgorithm::Md5];
    let mut writer = HashdeepWriter::start(Vec::new(), &algorithms, &[])
        .unwrap()
        .with_terminator('\0');
    writer
        .record(&InputFile::from_pairs("a.txt", Some(0), [(HashAlgorithm::Md5, MD5_A)]))
        .unwrap();
    writer
        .record(&InputFile::from_pairs("b.txt", None, [(HashAlgorithm::Md5, MD5_A)]))
        .unwrap();
    let text = String::from_utf8(writer.finish().unwrap()).unwrap();

    assert!(text.starts_with("%%%% HASHDEEP-1.0\n%%%% size,md5,filename\n"));
    assert!(text.ends_with(&format!("0,{MD5_A},a.txt\0,{MD5_A},b.txt\0")));
}

#[test]
fn records_leave_missing_digests_empty() {
    let file = InputFile::from_pairs("c.txt", Some(3), [(HashAlgorithm::Sha256, SHA_A)]);
    assert_eq!(
        format_record(&file, &[HashAlgorithm::Md5, HashAlgorithm::Sha256]),
        format!("3,,{SHA_A},c.txt")
    );
}
