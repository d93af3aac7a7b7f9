//! # Muon detector element identifiers
//!
//! Every hit carries the identifier of the detector element it was measured on. All
//! identifiers share a **32-bit raw encoding**:
//!
//! ```text
//!  31    28 27   25 24                                   0
//! +--------+-------+--------------------------------------+
//! |  det   | subdet|        technology-specific fields    |
//! +--------+-------+--------------------------------------+
//! ```
//!
//! * `det` is always [`MUON_DETECTOR`](crate::constants::MUON_DETECTOR) for the ids handled here,
//! * `subdet` is the [`Technology`] code (DT = 1, CSC = 2, RPC = 3).
//!
//! Since the subdetector field is part of the raw value, two ids of different technologies
//! can never share the same raw id. The veto set of the cleaner relies on this to pool raw
//! ids from every technology in a single hash set.
//!
//! Modules
//! -----------------
//! * [`csc_det_id`] – CSC layer identifier ([`CscDetId`]).
//! * [`dt_layer_id`] – DT chamber and layer identifiers ([`DtChamberId`], [`DtLayerId`]).
//! * [`rpc_det_id`] – RPC roll identifier ([`RpcDetId`]).

pub mod csc_det_id;
pub mod dt_layer_id;
pub mod rpc_det_id;

pub use csc_det_id::CscDetId;
pub use dt_layer_id::{DtChamberId, DtLayerId};
pub use rpc_det_id::RpcDetId;

use std::{fmt, hash::Hash};

use crate::{
    cleaner_errors::CleanerError,
    constants::{RawDetId, DET_MASK, DET_START_BIT, MUON_DETECTOR, SUBDET_MASK, SUBDET_START_BIT},
    technology::Technology,
};

/// Common interface of the typed muon detector identifiers.
///
/// A typed id is a cheap `Copy` value with a total order, so it can be used both as the
/// grouping key of a [`RecHitCollection`](crate::collections::RecHitCollection) and, through
/// [`raw`](MuonDetId::raw), as a member of the veto set.
pub trait MuonDetId:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Technology the identifier belongs to.
    const TECHNOLOGY: Technology;

    /// Raw 32-bit value of the identifier.
    fn raw(&self) -> RawDetId;

    /// Rebuild a typed identifier from its raw value.
    ///
    /// Fails with [`CleanerError::InvalidDetId`] when the raw value does not carry the muon
    /// detector code and this technology's subdetector code.
    fn from_raw(raw: RawDetId) -> Result<Self, CleanerError>;
}

/// Raw prefix (detector + subdetector bits) shared by every id of a technology.
pub(crate) fn muon_base(technology: Technology) -> RawDetId {
    (MUON_DETECTOR & DET_MASK) << DET_START_BIT
        | (technology.subdetector_code() & SUBDET_MASK) << SUBDET_START_BIT
}

/// Detector code of a raw identifier.
pub fn detector_of(raw: RawDetId) -> u32 {
    (raw >> DET_START_BIT) & DET_MASK
}

/// Subdetector code of a raw identifier.
pub fn subdetector_of(raw: RawDetId) -> u32 {
    (raw >> SUBDET_START_BIT) & SUBDET_MASK
}

/// Check that `raw` belongs to `technology`.
pub(crate) fn check_subdetector(raw: RawDetId, technology: Technology) -> Result<(), CleanerError> {
    if detector_of(raw) == MUON_DETECTOR && subdetector_of(raw) == technology.subdetector_code() {
        Ok(())
    } else {
        Err(CleanerError::InvalidDetId {
            technology,
            raw_id: raw,
        })
    }
}

#[inline]
pub(crate) fn field(raw: RawDetId, start_bit: u32, mask: u32) -> u32 {
    (raw >> start_bit) & mask
}

/// Validate that an id field lies in `min..=max`.
pub(crate) fn check_range(
    technology: Technology,
    field: &'static str,
    value: i32,
    min: i32,
    max: i32,
) -> Result<(), CleanerError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CleanerError::DetIdFieldOutOfRange {
            technology,
            field,
            value,
        })
    }
}
