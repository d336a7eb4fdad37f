// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Data model, configuration, and error hierarchy for the g-mode
//! pattern kernel, the engine that matches theoretical pulsation
//! spectra against observed period-spacing patterns.

pub mod config;
pub mod error;
pub mod pattern;
pub mod spectrum;

pub use config::{CredibleRegionConfig, MeritFunction, PatternConfig, PatternMethod};
pub use error::{GmodeError, GmodeResult};
pub use pattern::{
    AlignedMode, AlignedPattern, MatchedPair, ModelPattern, Run, ABSENT_ORDER, ABSENT_SENTINEL,
    GAP_MARKER, INSUFFICIENT_THEORY_CHI2,
};
pub use spectrum::{ObservedPattern, ObservedSegment, Observable, OrderDirection, TheoreticalSpectrum};
