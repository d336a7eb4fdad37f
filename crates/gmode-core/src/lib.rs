// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Pattern-matching engine: pairs observed gravity-mode periods with a
//! model's theoretical spectrum and derives the model's best-aligned
//! pattern for every observed segment.
//!
//! # Invariants
//!
//! 1. **Shape is preserved**: every aligned pattern has exactly one entry
//!    per observed mode, in observed order. Modes beyond the ends of the
//!    spectrum are `None`, never dropped.
//!
//! 2. **Ties are deterministic**: nearest-mode matching, run selection and
//!    anchor lookup all keep the first candidate on an exact tie. Repeated
//!    runs on the same input are bit-identical.
//!
//! 3. **No shared state**: every function is pure over its inputs, so
//!    models can be processed in parallel without locking.

pub mod aligner;
pub mod anchored;
pub mod builder;
pub mod longest_sequence;
pub mod matcher;
pub mod modes;
pub mod segmenter;
pub mod selector;
pub mod spacing;

pub use aligner::{align, anchor_offset};
pub use anchored::{build_from_anchor, build_from_highest_frequency};
pub use builder::{build_model_pattern, build_segment};
pub use longest_sequence::chisq_longest_sequence;
pub use matcher::match_segment;
pub use modes::{ledoux_splitting, mode_k, roche_critical_frequency};
pub use segmenter::segment_runs;
pub use selector::select_run;
pub use spacing::{alignment_chi_square, observed_spacings, theoretical_spacings, SpacingSeries};
