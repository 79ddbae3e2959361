//! Best-fit vehicle recommendation.
//!
//! A vehicle is suitable when its capacity covers the whole cargo. Among the
//! suitable vehicles the one with the highest utilisation ratio
//! (`cargo weight / capacity`) wins, which minimises wasted capacity without
//! violating it. When nothing is suitable the cargo has to be split.

use freight_core::{AssignmentMode, Vehicle, VehicleId};

/// How to choose between vehicles with identical utilisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Keep the vehicle that appears first in roster order.
    #[default]
    FirstSeen,
    /// Prefer the lexicographically smallest vehicle id, independent of
    /// roster order.
    LowestVehicleId,
}

/// Suggested assignment for a cargo.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// One vehicle can carry the whole cargo.
    Full {
        /// Vehicle to preselect.
        vehicle_id: VehicleId,
        /// `cargo weight / capacity` for that vehicle.
        utilization: f64,
    },
    /// No single vehicle is large enough.
    Split,
}

impl Recommendation {
    /// Mode implied by the recommendation.
    #[must_use]
    pub const fn mode(&self) -> AssignmentMode {
        match self {
            Self::Full { .. } => AssignmentMode::Full,
            Self::Split => AssignmentMode::Split,
        }
    }

    /// Vehicle to preselect, if any.
    #[must_use]
    pub const fn vehicle_id(&self) -> Option<&VehicleId> {
        match self {
            Self::Full { vehicle_id, .. } => Some(vehicle_id),
            Self::Split => None,
        }
    }
}

/// Recommend a vehicle and mode for `cargo_weight_kg`.
///
/// Only strictly better utilisation replaces the current best, so with
/// [`TieBreak::FirstSeen`] the earliest vehicle wins exact ties.
///
/// # Examples
/// ```
/// use freight_core::Vehicle;
/// use freight_planner::{Recommendation, TieBreak, recommend};
///
/// let roster = [
///     Vehicle::new("v-150", 150.0),
///     Vehicle::new("v-500", 500.0),
///     Vehicle::new("v-100", 100.0),
/// ];
/// let pick = recommend(100.0, &roster, TieBreak::FirstSeen);
/// assert_eq!(pick.vehicle_id().map(|id| id.as_str()), Some("v-100"));
///
/// let pick = recommend(1_000.0, &roster, TieBreak::FirstSeen);
/// assert_eq!(pick, Recommendation::Split);
/// ```
#[must_use]
#[expect(
    clippy::float_cmp,
    reason = "ties are exact utilisation matches, which only identical capacities produce"
)]
pub fn recommend(cargo_weight_kg: f64, vehicles: &[Vehicle], tie_break: TieBreak) -> Recommendation {
    let mut best: Option<(&Vehicle, f64)> = None;
    for vehicle in vehicles.iter().filter(|v| v.capacity_kg >= cargo_weight_kg) {
        let utilization = cargo_weight_kg / vehicle.capacity_kg;
        let replace = match best {
            None => true,
            Some((current, current_utilization)) => {
                utilization > current_utilization
                    || (tie_break == TieBreak::LowestVehicleId
                        && utilization == current_utilization
                        && vehicle.id < current.id)
            }
        };
        if replace {
            best = Some((vehicle, utilization));
        }
    }

    best.map_or(Recommendation::Split, |(vehicle, utilization)| {
        log::debug!(
            "recommending vehicle {} at {:.0}% utilisation",
            vehicle.id,
            utilization * 100.0
        );
        Recommendation::Full {
            vehicle_id: vehicle.id.clone(),
            utilization,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fleet(capacities: &[(&str, f64)]) -> Vec<Vehicle> {
        capacities
            .iter()
            .map(|(id, capacity)| Vehicle::new(*id, *capacity))
            .collect()
    }

    #[rstest]
    fn picks_tightest_fit() {
        let roster = fleet(&[("a", 150.0), ("b", 500.0), ("c", 100.0)]);
        let pick = recommend(100.0, &roster, TieBreak::FirstSeen);
        assert_eq!(pick.mode(), AssignmentMode::Full);
        assert_eq!(pick.vehicle_id(), Some(&VehicleId::new("c")));
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::too_small(&[("a", 50.0), ("b", 99.9)])]
    fn suggests_split_when_nothing_fits(#[case] capacities: &[(&str, f64)]) {
        let roster = fleet(capacities);
        assert_eq!(recommend(100.0, &roster, TieBreak::FirstSeen), Recommendation::Split);
    }

    #[rstest]
    fn first_seen_wins_ties() {
        let roster = fleet(&[("z", 200.0), ("a", 200.0)]);
        let pick = recommend(100.0, &roster, TieBreak::FirstSeen);
        assert_eq!(pick.vehicle_id(), Some(&VehicleId::new("z")));
    }

    #[rstest]
    fn lowest_id_wins_ties_when_requested() {
        let roster = fleet(&[("z", 200.0), ("a", 200.0)]);
        let pick = recommend(100.0, &roster, TieBreak::LowestVehicleId);
        assert_eq!(pick.vehicle_id(), Some(&VehicleId::new("a")));
    }

    #[rstest]
    fn exact_capacity_is_suitable() {
        let roster = fleet(&[("a", 100.0)]);
        let Recommendation::Full { utilization, .. } =
            recommend(100.0, &roster, TieBreak::FirstSeen)
        else {
            panic!("expected a full recommendation");
        };
        assert!((utilization - 1.0).abs() < f64::EPSILON);
    }
}
