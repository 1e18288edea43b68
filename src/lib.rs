//! Macro indicator pipeline over FRED data.
//!
//! Series are fetched ([`data`]), projected onto a daily grid and turned into
//! changes, composite indices and a growth/inflation regime ([`signals`]),
//! then written as a dashboard CSV and companion artefacts ([`report`]).

pub mod catalog;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod report;
pub mod signals;
