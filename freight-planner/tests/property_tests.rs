//! Property-based tests for the vehicle recommendation heuristic.
//!
//! # Invariants tested
//!
//! - **Split iff nothing fits:** the recommendation is a split exactly when
//!   no vehicle's capacity covers the cargo.
//! - **Feasibility:** a recommended vehicle can always carry the cargo.
//! - **Best fit:** no suitable vehicle has a smaller capacity than the
//!   recommended one.
//! - **First seen:** among equally good vehicles the earliest in roster order
//!   is chosen.
//! - **Order independence:** with the lowest-id tie-break the choice does not
//!   depend on roster order.

use freight_core::{Vehicle, VehicleId};
use freight_planner::{Recommendation, TieBreak, recommend};
use proptest::prelude::*;

/// Rosters of up to twelve vehicles with whole-kilogram capacities and
/// unique ids.
fn roster_strategy() -> impl Strategy<Value = Vec<Vehicle>> {
    prop::collection::vec(1_u32..=5_000_u32, 0..=12).prop_map(|capacities| {
        capacities
            .into_iter()
            .enumerate()
            .map(|(index, capacity)| Vehicle::new(format!("v-{index:02}"), f64::from(capacity)))
            .collect()
    })
}

fn capacity_of(vehicles: &[Vehicle], id: &VehicleId) -> Option<f64> {
    vehicles
        .iter()
        .find(|vehicle| &vehicle.id == id)
        .map(|vehicle| vehicle.capacity_kg)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: split is suggested exactly when no vehicle is large enough.
    #[test]
    fn split_iff_nothing_fits(
        vehicles in roster_strategy(),
        weight in 1_u32..=6_000_u32,
    ) {
        let weight = f64::from(weight);
        let anything_fits = vehicles.iter().any(|vehicle| vehicle.capacity_kg >= weight);
        let pick = recommend(weight, &vehicles, TieBreak::FirstSeen);
        prop_assert_eq!(pick == Recommendation::Split, !anything_fits);
    }

    /// Property: the recommended vehicle fits and no suitable vehicle is
    /// tighter.
    #[test]
    fn recommended_vehicle_is_tightest_fit(
        vehicles in roster_strategy(),
        weight in 1_u32..=6_000_u32,
    ) {
        let weight = f64::from(weight);
        if let Some(id) = recommend(weight, &vehicles, TieBreak::FirstSeen).vehicle_id() {
            let chosen = capacity_of(&vehicles, id).unwrap_or(f64::NAN);
            prop_assert!(chosen >= weight, "vehicle {id} cannot carry {weight} kg");
            for vehicle in vehicles.iter().filter(|v| v.capacity_kg >= weight) {
                prop_assert!(
                    vehicle.capacity_kg >= chosen,
                    "{} ({} kg) is a tighter fit than {id} ({chosen} kg)",
                    vehicle.id,
                    vehicle.capacity_kg
                );
            }
        }
    }

    /// Property: ties resolve to the first vehicle in roster order.
    #[test]
    fn first_seen_wins_ties(
        vehicles in roster_strategy(),
        weight in 1_u32..=6_000_u32,
    ) {
        let weight = f64::from(weight);
        if let Some(id) = recommend(weight, &vehicles, TieBreak::FirstSeen).vehicle_id() {
            let chosen = capacity_of(&vehicles, id).unwrap_or(f64::NAN);
            let first = vehicles
                .iter()
                .find(|vehicle| vehicle.capacity_kg >= weight && vehicle.capacity_kg <= chosen)
                .map(|vehicle| &vehicle.id);
            prop_assert_eq!(first, Some(id));
        }
    }

    /// Property: the lowest-id tie-break ignores roster order.
    #[test]
    fn lowest_id_is_order_independent(
        vehicles in roster_strategy(),
        weight in 1_u32..=6_000_u32,
    ) {
        let weight = f64::from(weight);
        let mut reversed = vehicles.clone();
        reversed.reverse();
        prop_assert_eq!(
            recommend(weight, &vehicles, TieBreak::LowestVehicleId),
            recommend(weight, &reversed, TieBreak::LowestVehicleId)
        );
    }
}
