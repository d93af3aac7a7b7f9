//! Resistive plate chamber roll identifier.
//!
//! ```text
//! bits  0..1   region     (-1, 0, +1, stored as region + 1)
//! bits  2..4   ring       (barrel wheel -2..2 / endcap ring 1..3, stored as ring + 2)
//! bits  5..6   station    (1..4, stored as station - 1)
//! bits  7..10  sector     (1..12)
//! bit   11     layer      (1..2, stored as layer - 1)
//! bits 12..14  subsector  (1..6, stored as subsector - 1)
//! bits 15..17  roll       (0 = whole chamber, 1..5)
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{check_range, check_subdetector, field, muon_base, MuonDetId};
use crate::{cleaner_errors::CleanerError, constants::RawDetId, technology::Technology};

const REGION_START: u32 = 0;
const REGION_MASK: u32 = 0x3;
const RING_START: u32 = 2;
const RING_MASK: u32 = 0x7;
const STATION_START: u32 = 5;
const STATION_MASK: u32 = 0x3;
const SECTOR_START: u32 = 7;
const SECTOR_MASK: u32 = 0xF;
const LAYER_START: u32 = 11;
const LAYER_MASK: u32 = 0x1;
const SUBSECTOR_START: u32 = 12;
const SUBSECTOR_MASK: u32 = 0x7;
const ROLL_START: u32 = 15;
const ROLL_MASK: u32 = 0x7;

/// Identifier of an RPC roll (eta partition of a chamber).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RpcDetId(RawDetId);

impl RpcDetId {
    /// Build an RPC roll id.
    ///
    /// Arguments
    /// -----------------
    /// * `region`: 0 for the barrel, ±1 for the endcaps.
    /// * `ring`: wheel (-2..=2) in the barrel, ring (1..=3) in the endcaps.
    /// * `station`, `sector`, `layer`, `subsector`: chamber coordinates.
    /// * `roll`: 0..=5, 0 designates the whole chamber.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        region: i32,
        ring: i32,
        station: u8,
        sector: u8,
        layer: u8,
        subsector: u8,
        roll: u8,
    ) -> Result<Self, CleanerError> {
        let t = Technology::Rpc;
        check_range(t, "region", region, -1, 1)?;
        if region == 0 {
            check_range(t, "ring", ring, -2, 2)?;
        } else {
            check_range(t, "ring", ring, 1, 3)?;
        }
        check_range(t, "station", station.into(), 1, 4)?;
        check_range(t, "sector", sector.into(), 1, 12)?;
        check_range(t, "layer", layer.into(), 1, 2)?;
        check_range(t, "subsector", subsector.into(), 1, 6)?;
        check_range(t, "roll", roll.into(), 0, 5)?;

        Ok(RpcDetId(
            muon_base(t)
                | (((region + 1) as u32) & REGION_MASK) << REGION_START
                | (((ring + 2) as u32) & RING_MASK) << RING_START
                | ((u32::from(station) - 1) & STATION_MASK) << STATION_START
                | (u32::from(sector) & SECTOR_MASK) << SECTOR_START
                | ((u32::from(layer) - 1) & LAYER_MASK) << LAYER_START
                | ((u32::from(subsector) - 1) & SUBSECTOR_MASK) << SUBSECTOR_START
                | (u32::from(roll) & ROLL_MASK) << ROLL_START,
        ))
    }

    pub fn region(&self) -> i32 {
        field(self.0, REGION_START, REGION_MASK) as i32 - 1
    }

    pub fn ring(&self) -> i32 {
        field(self.0, RING_START, RING_MASK) as i32 - 2
    }

    pub fn station(&self) -> u8 {
        field(self.0, STATION_START, STATION_MASK) as u8 + 1
    }

    pub fn sector(&self) -> u8 {
        field(self.0, SECTOR_START, SECTOR_MASK) as u8
    }

    pub fn layer(&self) -> u8 {
        field(self.0, LAYER_START, LAYER_MASK) as u8 + 1
    }

    pub fn subsector(&self) -> u8 {
        field(self.0, SUBSECTOR_START, SUBSECTOR_MASK) as u8 + 1
    }

    pub fn roll(&self) -> u8 {
        field(self.0, ROLL_START, ROLL_MASK) as u8
    }
}

impl MuonDetId for RpcDetId {
    const TECHNOLOGY: Technology = Technology::Rpc;

    fn raw(&self) -> RawDetId {
        self.0
    }

    fn from_raw(raw: RawDetId) -> Result<Self, CleanerError> {
        check_subdetector(raw, Technology::Rpc)?;
        Ok(RpcDetId(raw))
    }
}

impl TryFrom<RawDetId> for RpcDetId {
    type Error = CleanerError;

    fn try_from(raw: RawDetId) -> Result<Self, Self::Error> {
        RpcDetId::from_raw(raw)
    }
}

impl fmt::Display for RpcDetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.region() == 0 {
            write!(
                f,
                "W{:+}/RB{}/S{}/L{}/SS{} roll {}",
                self.ring(),
                self.station(),
                self.sector(),
                self.layer(),
                self.subsector(),
                self.roll()
            )
        } else {
            write!(
                f,
                "RE{:+}/{}/{}/S{}/SS{} roll {}",
                self.region() * i32::from(self.station()),
                self.ring(),
                self.layer(),
                self.sector(),
                self.subsector(),
                self.roll()
            )
        }
    }
}
