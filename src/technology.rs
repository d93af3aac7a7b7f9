//! # Muon detector technologies
//!
//! The cleaning algorithm is identical for the three muon detector technologies; only a handful
//! of capabilities differ. They are gathered in the [`MuonTechnology`] trait, implemented by
//! the zero-sized markers [`Csc`], [`Dt`] and [`Rpc`]:
//!
//! | Capability                              | CSC              | DT                  | RPC        |
//! |-----------------------------------------|------------------|---------------------|------------|
//! | grouping key ([`MuonTechnology::DetId`])| [`CscDetId`]     | [`DtLayerId`]       | [`RpcDetId`] |
//! | hit record ([`MuonTechnology::Hit`])    | [`CscRecHit2D`]  | [`DtRecHit1DPair`]  | [`RpcRecHit`] |
//! | accepted track hit kinds                | 2                | 4                   | 1          |
//! | geometry element                        | layer            | chamber             | roll       |
//!
//! The runtime counterpart [`Technology`] names a technology in configuration, in errors, and
//! in the raw id layout (its subdetector code).
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    collections::RecHitCollection,
    det_id::{CscDetId, DtLayerId, MuonDetId, RpcDetId},
    event::{Event, Products},
    geometry::{GlobalPoint, MuonGeometry},
    hits::{
        rec_hits::{CscRecHit2D, DtRecHit1DPair, RecHit, RpcRecHit},
        HitKind,
    },
};

/// Muon detector technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technology {
    /// Drift tubes (barrel)
    Dt,
    /// Cathode strip chambers (endcaps)
    Csc,
    /// Resistive plate chambers (barrel and endcaps)
    Rpc,
}

impl Technology {
    pub const ALL: [Technology; 3] = [Technology::Csc, Technology::Dt, Technology::Rpc];

    /// Muon subdetector code stored in bits 25..27 of raw ids.
    pub fn subdetector_code(&self) -> u32 {
        match self {
            Technology::Dt => 1,
            Technology::Csc => 2,
            Technology::Rpc => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Technology::Dt => "DT",
            Technology::Csc => "CSC",
            Technology::Rpc => "RPC",
        }
    }

    /// Name of the cleaner producing this technology's collections.
    pub fn cleaner_name(&self) -> &'static str {
        match self {
            Technology::Dt => "DTRecHitColCleaner",
            Technology::Csc => "CSCRecHitColCleaner",
            Technology::Rpc => "RPCRecHitColCleaner",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Technology {
    type Err = CleanerError;

    /// Accepts the short names (`"csc"`, `"DT"`, ...) and the cleaner names
    /// (`"CSCRecHitColCleaner"`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Technology::ALL
            .into_iter()
            .find(|t| {
                wanted.eq_ignore_ascii_case(t.name())
                    || wanted.eq_ignore_ascii_case(t.cleaner_name())
            })
            .ok_or_else(|| CleanerError::UnknownTechnology(s.to_string()))
    }
}

/// Technology-specific capabilities used by the generic cleaner.
pub trait MuonTechnology: Send + Sync + 'static {
    const TECHNOLOGY: Technology;

    /// Grouping key of the hit collections.
    type DetId: MuonDetId;

    /// Hit record of the hit collections.
    type Hit: RecHit<Id = Self::DetId>;

    /// Whether a track hit of this kind belongs to this technology.
    ///
    /// Implementations match every [`HitKind`] explicitly, without a wildcard arm.
    fn accepts(kind: HitKind) -> bool;

    /// Global position of `hit`, through the element it was measured on.
    fn global_position(hit: &Self::Hit, geometry: &MuonGeometry) -> Result<GlobalPoint, CleanerError>;

    /// This technology's collections in `event`.
    fn products(event: &Event) -> &Products<Self::DetId, Self::Hit>;

    fn products_mut(event: &mut Event) -> &mut Products<Self::DetId, Self::Hit>;
}

/// Output collection type of technology `T`.
pub type CollectionOf<T> =
    RecHitCollection<<T as MuonTechnology>::DetId, <T as MuonTechnology>::Hit>;

/// Cathode strip chambers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Csc;

/// Drift tubes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dt;

/// Resistive plate chambers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rpc;

impl MuonTechnology for Csc {
    const TECHNOLOGY: Technology = Technology::Csc;
    type DetId = CscDetId;
    type Hit = CscRecHit2D;

    fn accepts(kind: HitKind) -> bool {
        match kind {
            // segments are what global and standalone tracks carry
            HitKind::CscSegment | HitKind::CscRecHit2D => true,
            HitKind::DtRecSegment4D
            | HitKind::DtRecHit1DPair
            | HitKind::DtSlRecCluster
            | HitKind::DtSlRecSegment2D
            | HitKind::RpcRecHit
            | HitKind::SiStripHit
            | HitKind::SiPixelHit
            | HitKind::GemRecHit => false,
        }
    }

    fn global_position(hit: &CscRecHit2D, geometry: &MuonGeometry) -> Result<GlobalPoint, CleanerError> {
        let layer = geometry.csc_layer(&hit.csc_id)?;
        Ok(layer.to_global(hit.local_position()))
    }

    fn products(event: &Event) -> &Products<CscDetId, CscRecHit2D> {
        event.csc()
    }

    fn products_mut(event: &mut Event) -> &mut Products<CscDetId, CscRecHit2D> {
        event.csc_mut()
    }
}

impl MuonTechnology for Dt {
    const TECHNOLOGY: Technology = Technology::Dt;
    type DetId = DtLayerId;
    type Hit = DtRecHit1DPair;

    fn accepts(kind: HitKind) -> bool {
        match kind {
            HitKind::DtRecSegment4D
            | HitKind::DtRecHit1DPair
            | HitKind::DtSlRecCluster
            | HitKind::DtSlRecSegment2D => true,
            HitKind::CscSegment
            | HitKind::CscRecHit2D
            | HitKind::RpcRecHit
            | HitKind::SiStripHit
            | HitKind::SiPixelHit
            | HitKind::GemRecHit => false,
        }
    }

    /// DT positions are resolved through the chamber surface, the local position of a
    /// hit pair being expressed in its chamber frame.
    fn global_position(
        hit: &DtRecHit1DPair,
        geometry: &MuonGeometry,
    ) -> Result<GlobalPoint, CleanerError> {
        let chamber = geometry.dt_chamber(&hit.layer_id.chamber_id())?;
        Ok(chamber.to_global(hit.local_position()))
    }

    fn products(event: &Event) -> &Products<DtLayerId, DtRecHit1DPair> {
        event.dt()
    }

    fn products_mut(event: &mut Event) -> &mut Products<DtLayerId, DtRecHit1DPair> {
        event.dt_mut()
    }
}

impl MuonTechnology for Rpc {
    const TECHNOLOGY: Technology = Technology::Rpc;
    type DetId = RpcDetId;
    type Hit = RpcRecHit;

    fn accepts(kind: HitKind) -> bool {
        match kind {
            HitKind::RpcRecHit => true,
            HitKind::CscSegment
            | HitKind::CscRecHit2D
            | HitKind::DtRecSegment4D
            | HitKind::DtRecHit1DPair
            | HitKind::DtSlRecCluster
            | HitKind::DtSlRecSegment2D
            | HitKind::SiStripHit
            | HitKind::SiPixelHit
            | HitKind::GemRecHit => false,
        }
    }

    fn global_position(hit: &RpcRecHit, geometry: &MuonGeometry) -> Result<GlobalPoint, CleanerError> {
        let roll = geometry.rpc_roll(&hit.rpc_id)?;
        Ok(roll.to_global(hit.local_position()))
    }

    fn products(event: &Event) -> &Products<RpcDetId, RpcRecHit> {
        event.rpc()
    }

    fn products_mut(event: &mut Event) -> &mut Products<RpcDetId, RpcRecHit> {
        event.rpc_mut()
    }
}
