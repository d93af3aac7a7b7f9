//! # Muon detector geometry snapshot
//!
//! The cleaner only needs one thing from the detector geometry: the **placement** of the
//! element a hit was measured on, so the hit's local position can be expressed in the global
//! (CMS) frame and compared with the muon directions.
//!
//! ## Frames & conventions
//!
//! - Local frame: attached to a detector element, origin at its center, in cm.
//! - Global frame: `z` along the beam, `φ = atan2(y, x)`, `η = asinh(z / ρ)`.
//!
//! ```text
//! local point --(Surface: rotation, then translation)--> global point --> (η, φ)
//! ```
//!
//! ## Elements per technology
//!
//! | Technology | Element  | Key            |
//! |------------|----------|----------------|
//! | CSC        | layer    | [`CscDetId`]   |
//! | DT         | chamber  | [`DtChamberId`]|
//! | RPC        | roll     | [`RpcDetId`]   |
//!
//! ## Errors
//!
//! Lookups of an unknown element return [`CleanerError::UnknownGeometryElement`]. The
//! geometry is authoritative for the ids found in an event, so a miss means corrupted or
//! mismatched input and the event is abandoned by the caller.
use std::collections::HashMap;

use ahash::RandomState;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    constants::{Centimeter, Eta, Radian},
    det_id::{CscDetId, DtChamberId, MuonDetId, RpcDetId},
};

/// A point in the global detector frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalPoint(Point3<f64>);

impl GlobalPoint {
    pub fn new(x: Centimeter, y: Centimeter, z: Centimeter) -> Self {
        GlobalPoint(Point3::new(x, y, z))
    }

    /// Build the point at transverse radius `perp`, pseudo-rapidity `eta` and azimuth `phi`.
    pub fn from_perp_eta_phi(perp: Centimeter, eta: Eta, phi: Radian) -> Self {
        GlobalPoint::new(perp * phi.cos(), perp * phi.sin(), perp * eta.sinh())
    }

    pub fn x(&self) -> Centimeter {
        self.0.x
    }

    pub fn y(&self) -> Centimeter {
        self.0.y
    }

    pub fn z(&self) -> Centimeter {
        self.0.z
    }

    /// Transverse distance to the beam line.
    pub fn perp(&self) -> Centimeter {
        self.0.x.hypot(self.0.y)
    }

    /// Azimuthal angle in `(-π, π]`.
    pub fn phi(&self) -> Radian {
        self.0.y.atan2(self.0.x)
    }

    /// Pseudo-rapidity, `±∞` on the beam line and `0` at the origin.
    pub fn eta(&self) -> Eta {
        let perp = self.perp();
        if perp == 0.0 && self.0.z == 0.0 {
            return 0.0;
        }
        (self.0.z / perp).asinh()
    }

    pub fn as_point(&self) -> &Point3<f64> {
        &self.0
    }
}

impl From<Point3<f64>> for GlobalPoint {
    fn from(p: Point3<f64>) -> Self {
        GlobalPoint(p)
    }
}

/// Placement of a detector element: local → global rigid transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    placement: Isometry3<f64>,
}

impl Surface {
    /// Element centered at `position` with local axes rotated by `rotation`.
    pub fn new(position: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Surface {
            placement: Isometry3::from_parts(Translation3::from(position), rotation),
        }
    }

    /// Element centered at `position` with local axes parallel to the global ones.
    pub fn at(position: Vector3<f64>) -> Self {
        Surface::new(position, UnitQuaternion::identity())
    }

    /// Element centered at `position`, rotated by `phi` around the beam axis, like barrel
    /// chambers facing the interaction point.
    pub fn facing_beam(position: Vector3<f64>, phi: Radian) -> Self {
        Surface::new(position, UnitQuaternion::from_axis_angle(&Vector3::z_axis(), phi))
    }

    pub fn position(&self) -> GlobalPoint {
        GlobalPoint(Point3::from(self.placement.translation.vector))
    }

    pub fn to_global(&self, local: &Point3<f64>) -> GlobalPoint {
        GlobalPoint(self.placement.transform_point(local))
    }

    pub fn to_local(&self, global: &GlobalPoint) -> Point3<f64> {
        self.placement.inverse_transform_point(&global.0)
    }
}

/// Geometry snapshot of the muon system valid for one event (or run).
#[derive(Debug, Clone, Default)]
pub struct MuonGeometry {
    csc_layers: HashMap<CscDetId, Surface, RandomState>,
    dt_chambers: HashMap<DtChamberId, Surface, RandomState>,
    rpc_rolls: HashMap<RpcDetId, Surface, RandomState>,
}

impl MuonGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_csc_layer(&mut self, id: CscDetId, surface: Surface) -> &mut Self {
        self.csc_layers.insert(id, surface);
        self
    }

    pub fn add_dt_chamber(&mut self, id: DtChamberId, surface: Surface) -> &mut Self {
        self.dt_chambers.insert(id, surface);
        self
    }

    pub fn add_rpc_roll(&mut self, id: RpcDetId, surface: Surface) -> &mut Self {
        self.rpc_rolls.insert(id, surface);
        self
    }

    pub fn csc_layer(&self, id: &CscDetId) -> Result<&Surface, CleanerError> {
        lookup(&self.csc_layers, id)
    }

    pub fn dt_chamber(&self, id: &DtChamberId) -> Result<&Surface, CleanerError> {
        lookup(&self.dt_chambers, id)
    }

    pub fn rpc_roll(&self, id: &RpcDetId) -> Result<&Surface, CleanerError> {
        lookup(&self.rpc_rolls, id)
    }

    /// Number of elements known for all technologies.
    pub fn len(&self) -> usize {
        self.csc_layers.len() + self.dt_chambers.len() + self.rpc_rolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lookup<'a, K: MuonDetId>(
    elements: &'a HashMap<K, Surface, RandomState>,
    id: &K,
) -> Result<&'a Surface, CleanerError> {
    elements
        .get(id)
        .ok_or_else(|| CleanerError::UnknownGeometryElement {
            technology: K::TECHNOLOGY,
            raw_id: id.raw(),
        })
}
