// tests/loader_roundtrip.rs
use arxiv_trends::download::write_json_atomic;
use arxiv_trends::preprocess::{load, load_dir};
use arxiv_trends::search::Record;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;

fn record(id: &str, published: &str, title: &str) -> Record {
    Record {
        id: id.to_string(),
        title: title.to_string(),
        summary: format!("Summary of {id}"),
        published: published.to_string(),
        authors: vec!["Ada Lovelace".to_string()],
    }
}

fn corpus_map(records: Vec<Record>) -> BTreeMap<String, Record> {
    records.into_iter().map(|r| (r.id.clone(), r)).collect()
}

#[test]
fn persisted_map_loads_with_parsed_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arxiv_2018-01.json");
    let data = corpus_map(vec![
        record("1801.00001v1", "2018-01-02T10:00:00Z", "First"),
        record("1801.00002v1", "2018-01-20T23:15:00-05:00", "Second"),
        record("1801.00001v1", "2018-01-02T10:00:00Z", "First again"),
    ]);
    write_json_atomic(&path, &data).unwrap();

    let corpus = load(&path).unwrap();
    assert_eq!(corpus.len(), 2);

    let first = corpus.get("1801.00001v1").unwrap();
    assert_eq!(first.title, "First again");
    let published: DateTime<Utc> = first.published;
    assert_eq!(published, Utc.with_ymd_and_hms(2018, 1, 2, 10, 0, 0).unwrap());

    let second = corpus.get("1801.00002v1").unwrap();
    assert_eq!(
        second.published,
        Utc.with_ymd_and_hms(2018, 1, 21, 4, 15, 0).unwrap()
    );
}

#[test]
fn directory_load_concatenates_intervals() {
    let dir = tempfile::tempdir().unwrap();
    write_json_atomic(
        &dir.path().join("arxiv_2018-01.json"),
        &corpus_map(vec![record("a", "2018-01-05T00:00:00Z", "A")]),
    )
    .unwrap();
    write_json_atomic(
        &dir.path().join("arxiv_2018-02.json"),
        &corpus_map(vec![
            record("b", "2018-02-05T00:00:00Z", "B"),
            record("c", "2018-02-06T00:00:00Z", "C"),
        ]),
    )
    .unwrap();
    std::fs::write(dir.path().join("README.txt"), "not an artifact").unwrap();

    let corpus = load_dir(dir.path()).unwrap();
    assert_eq!(corpus.len(), 3);
    let ids: Vec<&str> = corpus.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load(&dir.path().join("arxiv_1999-01.json")).is_err());
}
