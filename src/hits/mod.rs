//! # Detector hits: kinds, track hits and composite decomposition
//!
//! Muon tracks are fitted from a heterogeneous list of hits: tracker hits, CSC segments,
//! DT 4D segments, RPC hits... Many of them are **composite** (a DT 4D segment is built from
//! 2D superlayer segments, themselves built from 1D hit pairs). This module provides:
//!
//! * [`HitKind`] – the closed set of hit representations that can appear on a track,
//! * [`TrackingHit`] – a (possibly composite) hit attached to a track,
//! * [`decompose`] – flattening of a composite hit into the raw ids of its leaves,
//! * [`rec_hits`] – the technology-specific hit records stored in the input collections.
//!
//! Decomposition
//! -----------------
//! A hit without components is a leaf and contributes its own raw id. A composite hit
//! contributes the raw ids of all its leaves, in order, whatever the nesting. The traversal
//! is iterative and refuses to go deeper than
//! [`MAX_DECOMPOSITION_DEPTH`](crate::constants::MAX_DECOMPOSITION_DEPTH).
//!
//! ```rust
//! use muon_det_cleaner::hits::{decompose, HitKind, TrackingHit};
//!
//! let segment = TrackingHit::composite(
//!     HitKind::CscSegment,
//!     0x2400_9001,
//!     vec![
//!         TrackingHit::leaf(HitKind::CscRecHit2D, 0x2400_9009),
//!         TrackingHit::leaf(HitKind::CscRecHit2D, 0x2400_900a),
//!     ],
//! );
//!
//! let mut leaves = Vec::new();
//! decompose(&segment, &mut leaves).unwrap();
//! assert_eq!(leaves, vec![0x2400_9009, 0x2400_900a]);
//! ```
pub mod rec_hits;

use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    constants::{RawDetId, MAX_DECOMPOSITION_DEPTH},
};

/// Concrete representation of a hit found on a muon track.
///
/// This is a closed set: every [`MuonTechnology`](crate::technology::MuonTechnology) classifies
/// each variant explicitly, so a new variant cannot be added without deciding, per
/// technology, whether it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    /// CSC segment, the default CSC hit of a standalone/global muon track
    CscSegment,
    /// CSC 2D hit, one per layer
    CscRecHit2D,
    /// DT 4D segment, the default DT hit of a standalone/global muon track
    DtRecSegment4D,
    /// Pair of left/right DT 1D hits in one cell
    DtRecHit1DPair,
    /// DT superlayer cluster
    DtSlRecCluster,
    /// DT 2D segment in one superlayer
    DtSlRecSegment2D,
    /// RPC hit
    RpcRecHit,
    /// Silicon strip hit (inner tracker)
    SiStripHit,
    /// Silicon pixel hit (inner tracker)
    SiPixelHit,
    /// GEM hit
    GemRecHit,
}

impl HitKind {
    pub fn name(&self) -> &'static str {
        match self {
            HitKind::CscSegment => "CSCSegment",
            HitKind::CscRecHit2D => "CSCRecHit2D",
            HitKind::DtRecSegment4D => "DTRecSegment4D",
            HitKind::DtRecHit1DPair => "DTRecHit1DPair",
            HitKind::DtSlRecCluster => "DTSLRecCluster",
            HitKind::DtSlRecSegment2D => "DTSLRecSegment2D",
            HitKind::RpcRecHit => "RPCRecHit",
            HitKind::SiStripHit => "SiStripRecHit2D",
            HitKind::SiPixelHit => "SiPixelRecHit",
            HitKind::GemRecHit => "GEMRecHit",
        }
    }
}

/// A hit attached to a track.
///
/// `raw_id` is the detector element the hit was measured on. For composite hits
/// (`components` not empty) the raw id of the hit itself never enters the veto set, only the
/// raw ids of its leaves do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingHit {
    kind: HitKind,
    raw_id: RawDetId,
    valid: bool,
    components: Vec<TrackingHit>,
}

impl TrackingHit {
    /// A valid hit without components.
    pub fn leaf(kind: HitKind, raw_id: RawDetId) -> Self {
        TrackingHit {
            kind,
            raw_id,
            valid: true,
            components: Vec::new(),
        }
    }

    /// A valid hit built from `components`.
    pub fn composite(kind: HitKind, raw_id: RawDetId, components: Vec<TrackingHit>) -> Self {
        TrackingHit {
            kind,
            raw_id,
            valid: true,
            components,
        }
    }

    /// Same hit with the given validity flag.
    pub fn with_validity(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn kind(&self) -> HitKind {
        self.kind
    }

    pub fn raw_id(&self) -> RawDetId {
        self.raw_id
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn components(&self) -> &[TrackingHit] {
        &self.components
    }

    pub fn is_leaf(&self) -> bool {
        self.components.is_empty()
    }
}

/// Append the raw ids of every valid leaf reachable from `hit` to `out`.
///
/// Leaves are emitted in depth-first order, components in their stored order. An invalid
/// hit contributes nothing, neither itself nor any of its components. The hit
/// itself is at depth 0; reaching a component at a depth greater than
/// [`MAX_DECOMPOSITION_DEPTH`] aborts the traversal.
///
/// Arguments
/// -----------------
/// * `hit`: the track hit to flatten.
/// * `out`: any collection of raw ids (a `Vec` or the event veto set).
///
/// Return
/// ----------
/// * `Ok(())` once all leaves were appended, or
///   [`CleanerError::DecompositionTooDeep`] carrying the raw id of the top-level hit.
///   Leaves visited before the error are left in `out`.
pub fn decompose<E>(hit: &TrackingHit, out: &mut E) -> Result<(), CleanerError>
where
    E: Extend<RawDetId>,
{
    let mut pending: Vec<(&TrackingHit, usize)> = vec![(hit, 0)];

    while let Some((current, depth)) = pending.pop() {
        if !current.is_valid() {
            continue;
        }
        if current.is_leaf() {
            out.extend(std::iter::once(current.raw_id));
            continue;
        }
        if depth >= MAX_DECOMPOSITION_DEPTH {
            return Err(CleanerError::DecompositionTooDeep {
                raw_id: hit.raw_id,
                max_depth: MAX_DECOMPOSITION_DEPTH,
            });
        }
        // reversed so that the first component is popped first
        pending.extend(current.components.iter().rev().map(|c| (c, depth + 1)));
    }
    Ok(())
}

#[cfg(test)]
mod hits_test {
    use super::*;

    fn chain(depth: usize) -> TrackingHit {
        let mut hit = TrackingHit::leaf(HitKind::DtRecHit1DPair, 7);
        for level in 0..depth {
            hit = TrackingHit::composite(HitKind::DtSlRecSegment2D, 100 + level as u32, vec![hit]);
        }
        hit
    }

    #[test]
    fn test_primitive_hit_gives_its_own_id() {
        let hit = TrackingHit::leaf(HitKind::RpcRecHit, 0x2600_8123);
        let mut out = Vec::new();
        decompose(&hit, &mut out).unwrap();
        assert_eq!(out, vec![0x2600_8123]);
    }

    #[test]
    fn test_nested_composite_gives_all_leaves() {
        let sl_phi = TrackingHit::composite(
            HitKind::DtSlRecSegment2D,
            10,
            vec![
                TrackingHit::leaf(HitKind::DtRecHit1DPair, 1),
                TrackingHit::leaf(HitKind::DtRecHit1DPair, 2),
                TrackingHit::leaf(HitKind::DtRecHit1DPair, 3),
            ],
        );
        let sl_theta = TrackingHit::composite(
            HitKind::DtSlRecSegment2D,
            20,
            vec![TrackingHit::leaf(HitKind::DtRecHit1DPair, 4)],
        );
        let segment =
            TrackingHit::composite(HitKind::DtRecSegment4D, 99, vec![sl_phi, sl_theta]);

        let mut out = Vec::new();
        decompose(&segment, &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_duplicated_leaves_are_kept() {
        let segment = TrackingHit::composite(
            HitKind::CscSegment,
            50,
            vec![
                TrackingHit::leaf(HitKind::CscRecHit2D, 5),
                TrackingHit::leaf(HitKind::CscRecHit2D, 5),
            ],
        );
        let mut out = Vec::new();
        decompose(&segment, &mut out).unwrap();
        assert_eq!(out, vec![5, 5]);
    }

    #[test]
    fn test_invalid_components_are_skipped() {
        let sl = TrackingHit::composite(
            HitKind::DtSlRecSegment2D,
            10,
            vec![
                TrackingHit::leaf(HitKind::DtRecHit1DPair, 1),
                TrackingHit::leaf(HitKind::DtRecHit1DPair, 2).with_validity(false),
            ],
        );
        let dead_sl = TrackingHit::composite(
            HitKind::DtSlRecSegment2D,
            20,
            vec![TrackingHit::leaf(HitKind::DtRecHit1DPair, 3)],
        )
        .with_validity(false);
        let segment = TrackingHit::composite(HitKind::DtRecSegment4D, 99, vec![sl, dead_sl]);

        let mut out = Vec::new();
        decompose(&segment, &mut out).unwrap();
        assert_eq!(out, vec![1]);

        let mut out = Vec::new();
        decompose(&segment.clone().with_validity(false), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_depth_bound() {
        let mut out = Vec::new();
        decompose(&chain(MAX_DECOMPOSITION_DEPTH), &mut out).unwrap();
        assert_eq!(out, vec![7]);

        let too_deep = chain(MAX_DECOMPOSITION_DEPTH + 1);
        let mut out = Vec::new();
        assert_eq!(
            decompose(&too_deep, &mut out),
            Err(CleanerError::DecompositionTooDeep {
                raw_id: too_deep.raw_id(),
                max_depth: MAX_DECOMPOSITION_DEPTH
            })
        );
    }
}
