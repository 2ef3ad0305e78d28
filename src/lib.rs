pub mod activity;
pub mod calendar;
pub mod chart;
pub mod cli;
pub mod error;
pub mod extract;
pub mod logging;
pub mod model;
pub mod store;
pub mod util;
pub mod vcs;
