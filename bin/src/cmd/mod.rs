//! CLI subcommand modules.
//!
//! This module contains the implementations for all greenblatt CLI subcommands.

pub(crate) mod kpis;
pub(crate) mod run;
pub(crate) mod universe;
