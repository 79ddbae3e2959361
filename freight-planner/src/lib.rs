//! Assignment planning for freight bookings.
//!
//! [`AssignmentPlanner`] recommends a vehicle for a cargo with a single-item
//! best-fit heuristic, validates full, partial and split assignments before
//! submission, and submits them through a
//! [`SubmissionProvider`](freight_core::SubmissionProvider). Split
//! submissions are atomic: the backend creates every portion or none.
//!
//! Validation is synchronous and never touches the network; provider
//! failures are turned into user notices at the call site.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod planner;
mod recommend;
mod validation;

pub use error::{RowEditError, SubmitError};
pub use planner::{AssignmentPlanner, GENERIC_SUBMIT_FAILURE, ROSTER_LOAD_FAILURE};
pub use recommend::{Recommendation, TieBreak, recommend};
pub use validation::{
    Field, PlannerError, RowField, Selection, ValidationError, ValidationErrors, validate_single,
    validate_split,
};
