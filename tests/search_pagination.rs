// tests/search_pagination.rs
mod common;

use arxiv_trends::search::{Search, SearchQuery};
use chrono::NaiveDate;
use common::{StubTransport, PAGE_1, PAGE_2};
use std::sync::Arc;

fn january() -> SearchQuery {
    SearchQuery::category("stat.ML").between(
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2018, 2, 1).unwrap(),
    )
}

#[test]
fn pages_until_an_empty_page() {
    let stub = Arc::new(StubTransport::new(&[PAGE_1, PAGE_2], 2));
    let search = Search::new(&january(), 2, stub.clone());

    let records: Vec<_> = search.results().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 3);

    let urls = stub.urls();
    assert_eq!(urls.len(), 3, "two full pages plus the empty one");
    assert_eq!(
        urls[0],
        "http://export.arxiv.org/api/query?search_query=stat.ML+AND+submittedDate:[20180101+TO+20180201]&start=0&max_results=2&sortBy=submittedDate&sortOrder=descending"
    );
    assert!(urls[1].contains("&start=2&"));
    assert!(urls[2].contains("&start=4&"));
}

#[test]
fn records_are_normalized() {
    let stub = Arc::new(StubTransport::new(&[PAGE_1], 2));
    let search = Search::new(&january(), 2, stub);
    let first = search.results().next().unwrap().unwrap();

    assert_eq!(first.id, "1801.10001v1");
    assert_eq!(first.title, "Stochastic Optimization Methods for Sparse Graphs");
    assert!(!first.summary.contains('\n'));
    assert!(first.summary.starts_with("We study"));
    assert_eq!(first.published, "2018-01-31T18:59:59Z");
    assert_eq!(first.authors, vec!["Ada Lovelace", "Alan Turing"]);
}

#[test]
fn every_call_restarts_from_the_first_page() {
    let stub = Arc::new(StubTransport::new(&[PAGE_1], 2));
    let search = Search::new(&january(), 2, stub.clone());

    let a: Vec<_> = search.results().map(|r| r.unwrap().id).collect();
    let b: Vec<_> = search.results().map(|r| r.unwrap().id).collect();
    assert_eq!(a, b);
    assert_eq!(stub.urls().iter().filter(|u| u.contains("&start=0&")).count(), 2);
}

#[test]
fn transport_error_surfaces_once_then_stops() {
    let stub = Arc::new(StubTransport::new(&[PAGE_1, PAGE_2], 2).failing_at(1));
    let search = Search::new(&january(), 2, stub.clone());
    let mut it = search.results();

    assert!(it.next().unwrap().is_ok());
    assert!(it.next().unwrap().is_ok());
    let err = it.next().unwrap().unwrap_err();
    assert!(format!("{err:#}").contains("connection reset"));
    assert!(it.next().is_none());
    assert_eq!(stub.urls().len(), 2, "no retry after the failure");
}

#[test]
fn collect_by_id_keeps_last_duplicate() {
    let stub = Arc::new(StubTransport::new(&[PAGE_1, PAGE_2], 2));
    let search = Search::new(&january(), 2, stub);
    let data = search.collect_by_id().unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(
        data["1801.10002v2"].title,
        "Kernel Methods Revisited (updated)"
    );
    assert!(data.iter().all(|(k, v)| k == &v.id));
}

#[test]
fn keyword_from_config_is_used() {
    let cfg = arxiv_trends::config::SearchConfig {
        keyword: Some("bandits".into()),
        endpoint: "http://localhost:9/api/query".into(),
        ..Default::default()
    };
    let stub = Arc::new(StubTransport::new(&[], 10));
    let search = Search::from_config(&cfg, &SearchQuery::category("stat.ML"), stub);
    assert_eq!(search.query(), "stat.ML:bandits");
    assert!(search
        .page_url(0)
        .starts_with("http://localhost:9/api/query?search_query=stat.ML:bandits&start=0&max_results=10"));
}
