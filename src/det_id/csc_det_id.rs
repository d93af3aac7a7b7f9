//! Cathode strip chamber identifier.
//!
//! Layout of the technology-specific bits:
//!
//! ```text
//! bits  0..2   layer    (0 = whole chamber, 1..6)
//! bits  3..8   chamber  (1..36)
//! bits  9..11  ring     (1..4)
//! bits 12..14  station  (1..4)
//! bits 15..16  endcap   (1 = +z, 2 = -z)
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{check_range, check_subdetector, field, muon_base, MuonDetId};
use crate::{cleaner_errors::CleanerError, constants::RawDetId, technology::Technology};

const LAYER_START: u32 = 0;
const LAYER_MASK: u32 = 0x7;
const CHAMBER_START: u32 = 3;
const CHAMBER_MASK: u32 = 0x3F;
const RING_START: u32 = 9;
const RING_MASK: u32 = 0x7;
const STATION_START: u32 = 12;
const STATION_MASK: u32 = 0x7;
const ENDCAP_START: u32 = 15;
const ENDCAP_MASK: u32 = 0x3;

/// Identifier of a CSC layer (or of a whole chamber when `layer == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CscDetId(RawDetId);

impl CscDetId {
    /// Build a CSC id from its fields.
    ///
    /// Arguments
    /// -----------------
    /// * `endcap`: 1 (forward, +z) or 2 (backward, -z).
    /// * `station`: 1..=4.
    /// * `ring`: 1..=4.
    /// * `chamber`: 1..=36.
    /// * `layer`: 0..=6, where 0 designates the whole chamber.
    ///
    /// Return
    /// ----------
    /// * The id, or [`CleanerError::DetIdFieldOutOfRange`] naming the first invalid field.
    pub fn new(endcap: u8, station: u8, ring: u8, chamber: u8, layer: u8) -> Result<Self, CleanerError> {
        let t = Technology::Csc;
        check_range(t, "endcap", endcap.into(), 1, 2)?;
        check_range(t, "station", station.into(), 1, 4)?;
        check_range(t, "ring", ring.into(), 1, 4)?;
        check_range(t, "chamber", chamber.into(), 1, 36)?;
        check_range(t, "layer", layer.into(), 0, 6)?;

        Ok(CscDetId(
            muon_base(t)
                | (u32::from(layer) & LAYER_MASK) << LAYER_START
                | (u32::from(chamber) & CHAMBER_MASK) << CHAMBER_START
                | (u32::from(ring) & RING_MASK) << RING_START
                | (u32::from(station) & STATION_MASK) << STATION_START
                | (u32::from(endcap) & ENDCAP_MASK) << ENDCAP_START,
        ))
    }

    pub fn endcap(&self) -> u8 {
        field(self.0, ENDCAP_START, ENDCAP_MASK) as u8
    }

    pub fn station(&self) -> u8 {
        field(self.0, STATION_START, STATION_MASK) as u8
    }

    pub fn ring(&self) -> u8 {
        field(self.0, RING_START, RING_MASK) as u8
    }

    pub fn chamber(&self) -> u8 {
        field(self.0, CHAMBER_START, CHAMBER_MASK) as u8
    }

    pub fn layer(&self) -> u8 {
        field(self.0, LAYER_START, LAYER_MASK) as u8
    }

    /// Id of the chamber containing this layer.
    pub fn chamber_id(&self) -> CscDetId {
        CscDetId(self.0 & !(LAYER_MASK << LAYER_START))
    }
}

impl MuonDetId for CscDetId {
    const TECHNOLOGY: Technology = Technology::Csc;

    fn raw(&self) -> RawDetId {
        self.0
    }

    fn from_raw(raw: RawDetId) -> Result<Self, CleanerError> {
        check_subdetector(raw, Technology::Csc)?;
        Ok(CscDetId(raw))
    }
}

impl TryFrom<RawDetId> for CscDetId {
    type Error = CleanerError;

    fn try_from(raw: RawDetId) -> Result<Self, Self::Error> {
        CscDetId::from_raw(raw)
    }
}

impl fmt::Display for CscDetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.endcap() == 1 { '+' } else { '-' };
        write!(
            f,
            "ME{sign}{}/{}/{} L{}",
            self.station(),
            self.ring(),
            self.chamber(),
            self.layer()
        )
    }
}

#[cfg(test)]
mod csc_det_id_test {
    use super::*;

    #[test]
    fn test_fields_survive_raw_encoding() {
        let id = CscDetId::new(2, 3, 1, 17, 4).unwrap();
        let back = CscDetId::try_from(id.raw()).unwrap();
        assert_eq!(back, id);
        assert_eq!(
            (back.endcap(), back.station(), back.ring(), back.chamber(), back.layer()),
            (2, 3, 1, 17, 4)
        );
    }

    #[test]
    fn test_out_of_range_chamber() {
        assert_eq!(
            CscDetId::new(1, 1, 1, 37, 1),
            Err(CleanerError::DetIdFieldOutOfRange {
                technology: Technology::Csc,
                field: "chamber",
                value: 37
            })
        );
    }

    #[test]
    fn test_chamber_id_drops_layer() {
        let id = CscDetId::new(1, 2, 2, 5, 6).unwrap();
        let chamber = id.chamber_id();
        assert_eq!(chamber.layer(), 0);
        assert_eq!(chamber.chamber(), 5);
        assert_eq!(id.to_string(), "ME+2/2/5 L6");
    }

    #[test]
    fn test_rejects_foreign_raw_id() {
        let dt = crate::det_id::DtLayerId::new(0, 1, 1, 1, 1).unwrap();
        assert!(CscDetId::try_from(dt.raw()).is_err());
    }
}
