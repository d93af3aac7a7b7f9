//! # Constants and type definitions for the muon detector cleaner
//!
//! This module centralizes the **numerical constants**, **raw identifier layout**, and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular constants used by the proximity test
//! - Bit layout of the 32-bit raw detector identifier shared by every technology
//! - Safety bounds for the composite-hit traversal
//! - Core type aliases (raw ids, angles, veto set)

use ahash::RandomState;
use std::collections::HashSet;

// -------------------------------------------------------------------------------------------------
// Angular constants
// -------------------------------------------------------------------------------------------------

/// 2π, used to wrap azimuthal differences
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Default ΔR radius below which a hit is considered close to a muon track
pub const DR_CUT: f64 = 0.4;

// -------------------------------------------------------------------------------------------------
// Composite hit traversal
// -------------------------------------------------------------------------------------------------

/// Maximum nesting depth accepted when decomposing a composite hit into its leaves.
///
/// Real segments nest at most three levels deep (4D segment → 2D segment → 1D hit pair);
/// anything beyond this bound is a malformed hit graph.
pub const MAX_DECOMPOSITION_DEPTH: usize = 64;

// -------------------------------------------------------------------------------------------------
// Raw detector identifier layout
// -------------------------------------------------------------------------------------------------

/// First bit of the 4-bit detector field
pub const DET_START_BIT: u32 = 28;
/// Mask of the detector field (after shifting)
pub const DET_MASK: u32 = 0xF;
/// First bit of the 3-bit subdetector field
pub const SUBDET_START_BIT: u32 = 25;
/// Mask of the subdetector field (after shifting)
pub const SUBDET_MASK: u32 = 0x7;
/// Detector code of the muon system
pub const MUON_DETECTOR: u32 = 2;

/// Log target used for every diagnostic emitted by the cleaner
pub const LOG_TARGET: &str = "TauEmbedding";

/// Instance label of the muon collection read when none is configured
pub const DEFAULT_MUON_COLLECTION: &str = "selectedMuonsForEmbedding";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Pseudo-rapidity (dimensionless)
pub type Eta = f64;
/// Length in centimeters (detector frame unit)
pub type Centimeter = f64;

/// Raw 32-bit detector element identifier
pub type RawDetId = u32;

/// Set of raw identifiers excluded from the output of one event.
///
/// Uses [`ahash`](https://docs.rs/ahash) for fast hashing.
pub type VetoSet = HashSet<RawDetId, RandomState>;
