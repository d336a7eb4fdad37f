// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Grid Orchestration
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Reads a pulsation grid and an observation table, builds the
//! theoretical pattern of every model in parallel, and writes the
//! resulting pattern table.
//!
//! Tables are tab-separated with a header row. In the output, `-1`
//! stands for a mode without theoretical counterpart and `0` separates
//! the segments of an interrupted pattern.

pub mod observations;
pub mod orchestrator;
pub mod table;

pub use observations::{ObservationTable, MISSING_COLUMN};
pub use orchestrator::{PatternOrchestrator, PatternRow, PatternTable};
pub use table::{parse_order_column, GridModel, GridTable, ORDER_COLUMN_PREFIX};
