//! Technology-specific hit records, as stored in the hit collections of an event.
//!
//! Each record carries the typed id of the element it was measured on, a position in that
//! element's **local frame** (cm), and a validity flag. The [`RecHit`] trait is the common
//! view used by the generic cleaner.
use std::fmt::Debug;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use super::HitKind;
use crate::{
    constants::RawDetId,
    det_id::{CscDetId, DtLayerId, MuonDetId, RpcDetId},
};

/// Common view over the hit records of the three technologies.
pub trait RecHit: Clone + Debug + PartialEq + Send + Sync {
    /// Typed identifier of the detector element, also the grouping key of collections.
    type Id: MuonDetId;

    /// Concrete kind of the record.
    fn kind(&self) -> HitKind;

    fn det_id(&self) -> Self::Id;

    /// Position in the local frame of [`det_id`](RecHit::det_id).
    fn local_position(&self) -> &Point3<f64>;

    fn is_valid(&self) -> bool;

    /// Raw id compared against the veto set.
    fn raw_det_id(&self) -> RawDetId {
        self.det_id().raw()
    }
}

/// Two-dimensional CSC hit on one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CscRecHit2D {
    pub csc_id: CscDetId,
    pub local_position: Point3<f64>,
    pub valid: bool,
}

impl CscRecHit2D {
    pub fn new(csc_id: CscDetId, local_position: Point3<f64>) -> Self {
        CscRecHit2D {
            csc_id,
            local_position,
            valid: true,
        }
    }
}

/// Left/right ambiguous pair of 1D hits in one DT cell.
///
/// `local_position` is the mean of the two solutions, as reported by the pair itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtRecHit1DPair {
    pub layer_id: DtLayerId,
    pub wire: u16,
    pub local_position: Point3<f64>,
    pub valid: bool,
}

impl DtRecHit1DPair {
    pub fn new(layer_id: DtLayerId, wire: u16, local_position: Point3<f64>) -> Self {
        DtRecHit1DPair {
            layer_id,
            wire,
            local_position,
            valid: true,
        }
    }
}

/// RPC hit: a cluster of fired strips in one roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRecHit {
    pub rpc_id: RpcDetId,
    pub first_strip: u16,
    pub cluster_size: u16,
    pub bx: i32,
    pub local_position: Point3<f64>,
    pub valid: bool,
}

impl RpcRecHit {
    pub fn new(rpc_id: RpcDetId, first_strip: u16, cluster_size: u16, local_position: Point3<f64>) -> Self {
        RpcRecHit {
            rpc_id,
            first_strip,
            cluster_size,
            bx: 0,
            local_position,
            valid: true,
        }
    }
}

macro_rules! impl_rec_hit {
    ($hit:ty, $id:ty, $field:ident, $kind:expr) => {
        impl $hit {
            /// Same hit with the given validity flag.
            pub fn with_validity(mut self, valid: bool) -> Self {
                self.valid = valid;
                self
            }
        }

        impl RecHit for $hit {
            type Id = $id;

            fn kind(&self) -> HitKind {
                $kind
            }

            fn det_id(&self) -> $id {
                self.$field
            }

            fn local_position(&self) -> &Point3<f64> {
                &self.local_position
            }

            fn is_valid(&self) -> bool {
                self.valid
            }
        }
    };
}

impl_rec_hit!(CscRecHit2D, CscDetId, csc_id, HitKind::CscRecHit2D);
impl_rec_hit!(DtRecHit1DPair, DtLayerId, layer_id, HitKind::DtRecHit1DPair);
impl_rec_hit!(RpcRecHit, RpcDetId, rpc_id, HitKind::RpcRecHit);
