//! Shared test harness modules for the dispatch CLI.

use super::*;

mod helpers;
mod unit;
