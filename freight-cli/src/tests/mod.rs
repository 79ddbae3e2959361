//! Shared test harness modules for the freight CLI.

use super::*;

mod helpers;
