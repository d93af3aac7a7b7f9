//! Drift tube chamber and layer identifiers.
//!
//! ```text
//! bits 10..12  layer       (0 = whole superlayer, 1..4)
//! bits 13..14  superlayer  (0 = whole chamber, 1..3)
//! bits 15..17  wheel       (-2..2, stored as wheel + 3)
//! bits 18..21  sector      (1..14)
//! bits 22..24  station     (1..4)
//! ```
//!
//! DT hits are grouped by [`DtLayerId`] while the geometry is looked up per
//! [`DtChamberId`], obtained with [`DtLayerId::chamber_id`].
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{check_range, check_subdetector, field, muon_base, MuonDetId};
use crate::{cleaner_errors::CleanerError, constants::RawDetId, technology::Technology};

const LAYER_START: u32 = 10;
const LAYER_MASK: u32 = 0x7;
const SUPERLAYER_START: u32 = 13;
const SUPERLAYER_MASK: u32 = 0x3;
const WHEEL_START: u32 = 15;
const WHEEL_MASK: u32 = 0x7;
const SECTOR_START: u32 = 18;
const SECTOR_MASK: u32 = 0xF;
const STATION_START: u32 = 22;
const STATION_MASK: u32 = 0x7;

const MIN_WHEEL: i32 = -2;
const WHEEL_OFFSET: i32 = 1 - MIN_WHEEL;

/// Wire number bits, only present on wire-level raw ids.
const WIRE_BITS: u32 = 0x3FF;

/// Bits kept by [`DtLayerId::chamber_id`].
const CHAMBER_BITS: u32 =
    !(LAYER_MASK << LAYER_START | SUPERLAYER_MASK << SUPERLAYER_START | WIRE_BITS);

/// Identifier of a DT chamber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DtChamberId(RawDetId);

/// Identifier of a DT layer (the grouping key of DT hit collections).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DtLayerId(RawDetId);

fn encode_chamber(wheel: i32, station: u8, sector: u8) -> Result<RawDetId, CleanerError> {
    let t = Technology::Dt;
    check_range(t, "wheel", wheel, MIN_WHEEL, 2)?;
    check_range(t, "station", station.into(), 1, 4)?;
    check_range(t, "sector", sector.into(), 1, 14)?;

    Ok(muon_base(t)
        | (((wheel + WHEEL_OFFSET) as u32) & WHEEL_MASK) << WHEEL_START
        | (u32::from(sector) & SECTOR_MASK) << SECTOR_START
        | (u32::from(station) & STATION_MASK) << STATION_START)
}

fn wheel_of(raw: RawDetId) -> i32 {
    field(raw, WHEEL_START, WHEEL_MASK) as i32 - WHEEL_OFFSET
}

impl DtChamberId {
    pub fn new(wheel: i32, station: u8, sector: u8) -> Result<Self, CleanerError> {
        encode_chamber(wheel, station, sector).map(DtChamberId)
    }

    pub fn wheel(&self) -> i32 {
        wheel_of(self.0)
    }

    pub fn station(&self) -> u8 {
        field(self.0, STATION_START, STATION_MASK) as u8
    }

    pub fn sector(&self) -> u8 {
        field(self.0, SECTOR_START, SECTOR_MASK) as u8
    }
}

impl DtLayerId {
    /// Build a DT layer id.
    ///
    /// Arguments
    /// -----------------
    /// * `wheel`: -2..=2.
    /// * `station`: 1..=4.
    /// * `sector`: 1..=14 (sectors 13 and 14 only exist in station 4).
    /// * `superlayer`: 1..=3.
    /// * `layer`: 1..=4.
    pub fn new(
        wheel: i32,
        station: u8,
        sector: u8,
        superlayer: u8,
        layer: u8,
    ) -> Result<Self, CleanerError> {
        let t = Technology::Dt;
        check_range(t, "superlayer", superlayer.into(), 1, 3)?;
        check_range(t, "layer", layer.into(), 1, 4)?;
        let chamber = encode_chamber(wheel, station, sector)?;

        Ok(DtLayerId(
            chamber
                | (u32::from(superlayer) & SUPERLAYER_MASK) << SUPERLAYER_START
                | (u32::from(layer) & LAYER_MASK) << LAYER_START,
        ))
    }

    pub fn wheel(&self) -> i32 {
        wheel_of(self.0)
    }

    pub fn station(&self) -> u8 {
        field(self.0, STATION_START, STATION_MASK) as u8
    }

    pub fn sector(&self) -> u8 {
        field(self.0, SECTOR_START, SECTOR_MASK) as u8
    }

    pub fn superlayer(&self) -> u8 {
        field(self.0, SUPERLAYER_START, SUPERLAYER_MASK) as u8
    }

    pub fn layer(&self) -> u8 {
        field(self.0, LAYER_START, LAYER_MASK) as u8
    }

    /// Chamber holding this layer.
    pub fn chamber_id(&self) -> DtChamberId {
        DtChamberId(self.0 & CHAMBER_BITS)
    }
}

impl MuonDetId for DtChamberId {
    const TECHNOLOGY: Technology = Technology::Dt;

    fn raw(&self) -> RawDetId {
        self.0
    }

    fn from_raw(raw: RawDetId) -> Result<Self, CleanerError> {
        check_subdetector(raw, Technology::Dt)?;
        Ok(DtChamberId(raw & CHAMBER_BITS))
    }
}

impl MuonDetId for DtLayerId {
    const TECHNOLOGY: Technology = Technology::Dt;

    fn raw(&self) -> RawDetId {
        self.0
    }

    fn from_raw(raw: RawDetId) -> Result<Self, CleanerError> {
        check_subdetector(raw, Technology::Dt)?;
        // leaf hits may carry wire-level ids
        Ok(DtLayerId(raw & !WIRE_BITS))
    }
}

impl TryFrom<RawDetId> for DtLayerId {
    type Error = CleanerError;

    fn try_from(raw: RawDetId) -> Result<Self, Self::Error> {
        DtLayerId::from_raw(raw)
    }
}

impl TryFrom<RawDetId> for DtChamberId {
    type Error = CleanerError;

    fn try_from(raw: RawDetId) -> Result<Self, Self::Error> {
        DtChamberId::from_raw(raw)
    }
}

impl fmt::Display for DtChamberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MB{} W{:+} S{}", self.station(), self.wheel(), self.sector())
    }
}

impl fmt::Display for DtLayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} SL{} L{}",
            self.chamber_id(),
            self.superlayer(),
            self.layer()
        )
    }
}
