//! Tests for `LocationResolver`.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use freight_core::NoticeLevel;
use freight_core::test_support::{RecordingNoticeSink, StubPlaces};
use rstest::rstest;

const DEBOUNCE: Duration = Duration::from_millis(300);

fn kigali() -> Vec<CandidateLocation> {
    vec![
        CandidateLocation::new("p-kigali", "Kigali, Rwanda"),
        CandidateLocation::new("p-kigali-airport", "Kigali International Airport"),
    ]
}

fn resolver(places: &Arc<StubPlaces>, notices: &Arc<RecordingNoticeSink>) -> LocationResolver {
    LocationResolver::new(
        Arc::clone(places) as Arc<dyn GeocodingProvider>,
        Arc::clone(places) as Arc<dyn PlaceDetailsProvider>,
        Arc::clone(notices) as Arc<dyn NoticeSink>,
        ResolverConfig::default().with_country("rw"),
    )
}

/// Let the debounce timer and any spawned work run to completion.
async fn settle(extra: Duration) {
    tokio::time::sleep(DEBOUNCE + extra + Duration::from_millis(1)).await;
}

#[rstest]
#[case("")]
#[case("k")]
#[case("  k  ")]
#[tokio::test(start_paused = true)]
async fn short_queries_resolve_empty_without_searching(#[case] query: &str) {
    let places = Arc::new(StubPlaces::new());
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    assert_eq!(resolver.resolve(query, Channel::Pickup), Resolution::Immediate(Vec::new()));
    settle(Duration::ZERO).await;
    assert!(places.searches().is_empty());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn rapid_typing_sends_one_search() {
    let places = Arc::new(StubPlaces::new().with_results("kigali", kigali()));
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    for query in ["kig", "kiga", "kigali"] {
        assert_eq!(resolver.resolve(query, Channel::Pickup), Resolution::Scheduled);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    settle(Duration::ZERO).await;

    assert_eq!(places.searches(), vec!["kigali".to_owned()]);
    let state = resolver.state(Channel::Pickup);
    assert_eq!(state.query, "kigali");
    assert_eq!(state.results, kigali());
    assert!(!state.loading);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn slow_superseded_search_never_overwrites() {
    let places = Arc::new(
        StubPlaces::new()
            .with_results("kig", vec![CandidateLocation::new("p-old", "Kigoma")])
            .with_delay("kig", Duration::from_secs(2))
            .with_results("kigali", kigali()),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kig", Channel::Pickup);
    settle(Duration::ZERO).await;
    assert!(resolver.state(Channel::Pickup).loading);

    resolver.resolve("kigali", Channel::Pickup);
    settle(Duration::from_secs(5)).await;

    assert_eq!(places.searches(), vec!["kig".to_owned(), "kigali".to_owned()]);
    assert_eq!(resolver.state(Channel::Pickup).results, kigali());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn repeated_query_is_served_from_cache() {
    let places = Arc::new(StubPlaces::new().with_results("kigali", kigali()));
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kigali", Channel::Pickup);
    settle(Duration::ZERO).await;

    assert_eq!(
        resolver.resolve(" KIGALI ", Channel::Destination),
        Resolution::Immediate(kigali())
    );
    assert_eq!(places.searches().len(), 1);
    assert_eq!(resolver.state(Channel::Destination).results, kigali());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn duplicate_of_in_flight_query_is_suppressed() {
    let places = Arc::new(
        StubPlaces::new()
            .with_results("huye", vec![CandidateLocation::new("p-huye", "Huye")])
            .with_delay("huye", Duration::from_secs(1)),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("huye", Channel::Destination);
    settle(Duration::ZERO).await;
    assert_eq!(resolver.resolve("huye", Channel::Destination), Resolution::Suppressed);
    settle(Duration::from_secs(1)).await;

    assert_eq!(places.searches().len(), 1);
    assert_eq!(resolver.state(Channel::Destination).results.len(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn returning_to_issued_query_cancels_pending_search() {
    let places = Arc::new(
        StubPlaces::new()
            .with_results("kigali", Vec::new())
            .with_results("kigal", vec![CandidateLocation::new("p-kigal", "Kigal stale")]),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kigali", Channel::Pickup);
    settle(Duration::ZERO).await;
    assert_eq!(resolver.resolve("kigal", Channel::Pickup), Resolution::Scheduled);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(resolver.resolve("kigali", Channel::Pickup), Resolution::Suppressed);
    settle(Duration::ZERO).await;

    assert_eq!(places.searches(), vec!["kigali".to_owned()]);
    let state = resolver.state(Channel::Pickup);
    assert_eq!(state.query, "kigali");
    assert!(state.results.is_empty());
    assert!(!state.loading);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn returning_to_query_after_cancelled_search_searches_again() {
    let places = Arc::new(
        StubPlaces::new()
            .with_results("kigali", kigali())
            .with_results("kigal", vec![CandidateLocation::new("p-kigal", "Kigal stale")])
            .with_delay("kigal", Duration::from_secs(2)),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kigal", Channel::Pickup);
    settle(Duration::ZERO).await;
    assert!(resolver.state(Channel::Pickup).loading);
    assert_eq!(resolver.resolve("kigali", Channel::Pickup), Resolution::Scheduled);
    assert_eq!(resolver.resolve("kigal", Channel::Pickup), Resolution::Scheduled);
    settle(Duration::from_secs(2)).await;

    assert_eq!(places.searches(), vec!["kigal".to_owned(), "kigal".to_owned()]);
    let state = resolver.state(Channel::Pickup);
    assert_eq!(state.query, "kigal");
    assert_eq!(state.results.len(), 1);
    assert!(!state.loading);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn channels_do_not_cancel_each_other() {
    let places = Arc::new(
        StubPlaces::new()
            .with_results("kigali", kigali())
            .with_results("huye", vec![CandidateLocation::new("p-huye", "Huye")]),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kigali", Channel::Pickup);
    resolver.resolve("huye", Channel::Destination);
    settle(Duration::ZERO).await;

    assert_eq!(places.searches().len(), 2);
    assert_eq!(resolver.state(Channel::Pickup).results, kigali());
    assert_eq!(resolver.state(Channel::Destination).results.len(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failure_clears_results_and_allows_retry() {
    let places = Arc::new(StubPlaces::new().with_error(
        "musanze",
        ProviderError::ServiceError {
            code: "OVER_QUERY_LIMIT".to_owned(),
            message: String::new(),
        },
    ));
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("musanze", Channel::Pickup);
    settle(Duration::ZERO).await;

    let state = resolver.state(Channel::Pickup);
    assert!(state.results.is_empty());
    assert!(!state.loading);
    let recorded = notices.notices();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded.first().map(|n| n.level), Some(NoticeLevel::Error));

    assert_eq!(resolver.resolve("musanze", Channel::Pickup), Resolution::Scheduled);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_search() {
    let places = Arc::new(StubPlaces::new().with_results("kigali", kigali()));
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);

    resolver.resolve("kigali", Channel::Pickup);
    resolver.shutdown();
    settle(Duration::ZERO).await;

    assert!(places.searches().is_empty());
    assert_eq!(resolver.state(Channel::Pickup), ChannelState::default());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn subscribers_see_published_results() {
    let places = Arc::new(StubPlaces::new().with_results("kigali", kigali()));
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);
    let mut updates = resolver.subscribe(Channel::Pickup);

    resolver.resolve("kigali", Channel::Pickup);
    settle(Duration::ZERO).await;

    assert!(updates.has_changed().unwrap_or(false));
    assert_eq!(updates.borrow_and_update().results, kigali());
}

#[rstest]
#[tokio::test]
async fn select_records_location() {
    let places = Arc::new(
        StubPlaces::new().with_coordinates("p-kigali", Coord { x: 30.06, y: -1.95 }),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);
    let candidate = CandidateLocation::new("p-kigali", "Kigali, Rwanda");

    let location = resolver
        .select(Channel::Pickup, &candidate)
        .await
        .expect("coordinates resolve");

    assert_eq!(location.description, "Kigali, Rwanda");
    assert_eq!(resolver.state(Channel::Pickup).selected, Some(location));
}

#[rstest]
#[tokio::test]
async fn failed_select_keeps_previous_selection() {
    let places = Arc::new(
        StubPlaces::new().with_coordinates("p-kigali", Coord { x: 30.06, y: -1.95 }),
    );
    let notices = Arc::new(RecordingNoticeSink::new());
    let resolver = resolver(&places, &notices);
    let kigali = CandidateLocation::new("p-kigali", "Kigali, Rwanda");
    let unknown = CandidateLocation::new("p-unknown", "Nowhere");

    let first = resolver
        .select(Channel::Pickup, &kigali)
        .await
        .expect("coordinates resolve");
    assert!(resolver.select(Channel::Pickup, &unknown).await.is_err());

    assert_eq!(resolver.state(Channel::Pickup).selected, Some(first));
    assert_eq!(notices.notices(), vec![Notice::error(DETAILS_FAILURE)]);
}
