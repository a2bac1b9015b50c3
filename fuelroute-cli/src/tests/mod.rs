//! Shared test harness modules for the fuelroute CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod helpers;
mod import_unit;
mod plan_unit;
