#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural tests for `BookingSession` using rstest-bdd.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use freight_core::test_support::{RecordingNoticeSink, StubDistance, StubPlaces, StubPricing};
use freight_core::{
    CandidateLocation, CategoryId, DistanceProvider, GeocodingProvider, Notice, NoticeSink,
    PlaceDetailsProvider, PricingProvider, ProviderError,
};
use freight_resolve::{
    BookingSession, Channel, CostEstimate, CostSource, FALLBACK_NOTICE, SessionConfig,
    SessionProviders,
};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

/// Longer than any debounce delay the session uses.
const QUIET: Duration = Duration::from_secs(1);

struct World {
    runtime: Runtime,
    places: Arc<StubPlaces>,
    distance: Arc<StubDistance>,
    pricing: Arc<StubPricing>,
    notices: Arc<RecordingNoticeSink>,
    session: Option<BookingSession>,
    estimate: Option<CostEstimate>,
}

impl Default for World {
    fn default() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .expect("test runtime builds");
        Self {
            runtime,
            places: Arc::new(StubPlaces::new()),
            distance: Arc::new(StubDistance::with_meters(0.0)),
            pricing: Arc::new(StubPricing::with_error(ProviderError::Rejected {
                message: None,
            })),
            notices: Arc::new(RecordingNoticeSink::new()),
            session: None,
            estimate: None,
        }
    }
}

impl World {
    fn session(&mut self) -> &BookingSession {
        if self.session.is_none() {
            let providers = SessionProviders {
                geocoding: Arc::clone(&self.places) as Arc<dyn GeocodingProvider>,
                place_details: Arc::clone(&self.places) as Arc<dyn PlaceDetailsProvider>,
                distance: Arc::clone(&self.distance) as Arc<dyn DistanceProvider>,
                pricing: Arc::clone(&self.pricing) as Arc<dyn PricingProvider>,
                notices: Arc::clone(&self.notices) as Arc<dyn NoticeSink>,
            };
            self.session = Some(BookingSession::new(providers, SessionConfig::default()));
        }
        self.session.as_ref().expect("session was just opened")
    }

    fn type_queries(&mut self, channel: Channel, queries: &[&str]) {
        self.session();
        let World {
            runtime, session: open, ..
        } = self;
        let session = open.as_ref().expect("session is open");
        runtime.block_on(async {
            for query in queries {
                session.resolver().resolve(query, channel);
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        });
    }

    fn wait(&self) {
        self.runtime.block_on(async { tokio::time::sleep(QUIET).await });
    }
}

#[fixture]
fn world() -> RefCell<World> {
    RefCell::new(World::default())
}

fn kigali() -> CandidateLocation {
    CandidateLocation::new("p-kigali", "Kigali, Rwanda")
}

fn huye() -> CandidateLocation {
    CandidateLocation::new("p-huye", "Huye, Rwanda")
}

#[given("a places service that knows Kigali and Huye")]
fn given_places(#[from(world)] world: &RefCell<World>) {
    world.borrow_mut().places = Arc::new(
        StubPlaces::new()
            .with_results(
                "kigali",
                vec![
                    kigali(),
                    CandidateLocation::new("p-kigali-airport", "Kigali International Airport"),
                ],
            )
            .with_results("huye", vec![huye()])
            .with_coordinates("p-kigali", Coord { x: 30.06, y: -1.95 })
            .with_coordinates("p-huye", Coord { x: 29.74, y: -2.6 }),
    );
}

#[given("a route of {meters} meters")]
fn given_route(#[from(world)] world: &RefCell<World>, meters: f64) {
    world.borrow_mut().distance = Arc::new(StubDistance::with_meters(meters));
}

#[given("the pricing service is down")]
fn given_pricing_down(#[from(world)] world: &RefCell<World>) {
    world.borrow_mut().pricing = Arc::new(StubPricing::with_error(ProviderError::HttpError {
        url: "http://backend/pricing/estimate".to_owned(),
        status: 503,
        message: "service unavailable".to_owned(),
    }));
}

#[when("the user types \"kig\", \"kiga\" and \"kigali\" into the pickup field")]
fn type_kigali(#[from(world)] cell: &RefCell<World>) {
    let mut world = cell.borrow_mut();
    world.type_queries(Channel::Pickup, &["kig", "kiga", "kigali"]);
    world.wait();
}

#[when("the user types \"huye\" into the destination field")]
fn type_huye(#[from(world)] world: &RefCell<World>) {
    world
        .borrow_mut()
        .type_queries(Channel::Destination, &["huye"]);
}

#[when("the user selects Kigali as pickup and Huye as destination")]
fn select_locations(#[from(world)] cell: &RefCell<World>) {
    let mut world = cell.borrow_mut();
    world.session();
    let World {
        runtime, session: open, ..
    } = &*world;
    let session = open.as_ref().expect("session is open");
    runtime.block_on(async {
        session
            .resolver()
            .select(Channel::Pickup, &kigali())
            .await
            .expect("pickup resolves");
        session
            .resolver()
            .select(Channel::Destination, &huye())
            .await
            .expect("destination resolves");
        session.refresh_distance().expect("both locations selected");
        tokio::time::sleep(QUIET).await;
    });
}

#[when("a {weight} kg cargo is priced")]
fn price_cargo(#[from(world)] cell: &RefCell<World>, weight: f64) {
    let mut world = cell.borrow_mut();
    let estimate = {
        let World {
            runtime, session: open, ..
        } = &*world;
        let session = open.as_ref().expect("session is open");
        runtime
            .block_on(session.estimate_cost(weight, &CategoryId::new("general")))
            .expect("valid weight")
    };
    world.estimate = Some(estimate);
}

#[when("the session ends")]
fn end_session(#[from(world)] cell: &RefCell<World>) {
    let mut world = cell.borrow_mut();
    world.session = None;
    world.wait();
}

#[then("exactly one search is sent, for \"kigali\"")]
fn one_search(#[from(world)] world: &RefCell<World>) {
    assert_eq!(world.borrow().places.searches(), vec!["kigali".to_owned()]);
}

#[then("the pickup field lists {count} candidates")]
fn pickup_candidates(#[from(world)] cell: &RefCell<World>, count: usize) {
    let mut world = cell.borrow_mut();
    let state = world.session().resolver().state(Channel::Pickup);
    assert_eq!(state.results.len(), count);
}

#[then("the estimated cost is {cost} from the fallback rates")]
fn fallback_cost(#[from(world)] cell: &RefCell<World>, cost: f64) {
    let world = cell.borrow();
    let estimate = world.estimate.as_ref().expect("a price was estimated");
    assert_eq!(estimate.source, CostSource::Fallback);
    assert!((estimate.cost - cost).abs() < 1e-6);
}

#[then("the user is told the price is estimated")]
fn fallback_notice(#[from(world)] world: &RefCell<World>) {
    assert_eq!(
        world.borrow().notices.notices(),
        vec![Notice::info(FALLBACK_NOTICE)]
    );
}

#[then("no search is sent")]
fn no_search(#[from(world)] world: &RefCell<World>) {
    assert!(world.borrow().places.searches().is_empty());
}

#[scenario(path = "tests/features/booking_session.feature", index = 0)]
fn rapid_typing(world: RefCell<World>) {
    let _ = world;
}

#[scenario(path = "tests/features/booking_session.feature", index = 1)]
fn fallback_pricing(world: RefCell<World>) {
    let _ = world;
}

#[scenario(path = "tests/features/booking_session.feature", index = 2)]
fn session_end(world: RefCell<World>) {
    let _ = world;
}
