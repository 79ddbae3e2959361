//! Behavioural tests for the FIFO search cache.

use freight_core::{CandidateLocation, FifoCache};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

type SearchCache = FifoCache<String, Vec<CandidateLocation>>;

#[fixture]
fn cache() -> RefCell<SearchCache> {
    RefCell::new(FifoCache::new(0))
}

fn hits(query: &str) -> Vec<CandidateLocation> {
    vec![CandidateLocation::new(format!("{query}-1"), query)]
}

#[given("a search cache holding 2 entries")]
fn given_cache(#[from(cache)] cache: &RefCell<SearchCache>) {
    *cache.borrow_mut() = FifoCache::new(2);
}

#[when("I cache results for \"kig\", \"huy\" and \"mus\"")]
fn cache_three(#[from(cache)] cell: &RefCell<SearchCache>) {
    let mut cache = cell.borrow_mut();
    for query in ["kig", "huy", "mus"] {
        cache.insert(query.to_owned(), hits(query));
    }
}

#[when("I cache results for \"kig\" and \"huy\"")]
fn cache_two(#[from(cache)] cell: &RefCell<SearchCache>) {
    let mut cache = cell.borrow_mut();
    for query in ["kig", "huy"] {
        cache.insert(query.to_owned(), hits(query));
    }
}

#[when("I cache new results for \"kig\" and then \"mus\"")]
fn recache(#[from(cache)] cell: &RefCell<SearchCache>) {
    let mut cache = cell.borrow_mut();
    cache.insert("kig".to_owned(), Vec::new());
    cache.insert("mus".to_owned(), hits("mus"));
}

#[then("\"kig\" is no longer cached")]
fn kig_evicted(#[from(cache)] cache: &RefCell<SearchCache>) {
    assert!(!cache.borrow().contains_key(&"kig".to_owned()));
}

#[then("\"mus\" is cached")]
fn mus_cached(#[from(cache)] cache: &RefCell<SearchCache>) {
    assert_eq!(cache.borrow().get(&"mus".to_owned()), Some(&hits("mus")));
}

#[then("\"huy\" is cached")]
fn huy_cached(#[from(cache)] cache: &RefCell<SearchCache>) {
    assert!(cache.borrow().contains_key(&"huy".to_owned()));
}

#[scenario(path = "tests/features/search_cache.feature", index = 0)]
fn oldest_evicted(cache: RefCell<SearchCache>) {
    let _ = cache;
}

#[scenario(path = "tests/features/search_cache.feature", index = 1)]
fn recache_keeps_position(cache: RefCell<SearchCache>) {
    let _ = cache;
}
