use thiserror::Error;

use crate::{constants::RawDetId, technology::Technology};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("No hit collection configured: 'oldCollection' must list at least one input")]
    NoCollectionsConfigured,

    #[error("Invalid cleaner parameter: {0}")]
    InvalidConfigParameter(String),

    #[error("Invalid input tag: {0:?}")]
    InvalidInputTag(String),

    #[error("Unknown cleaner technology: {0}")]
    UnknownTechnology(String),

    #[error("Input muon #{index} must be either global, standalone, RPC or tracker muon")]
    UnknownMuonType { index: usize },

    #[error("Input muon #{index} has no {track} track attached")]
    MissingTrack { index: usize, track: &'static str },

    #[error("Product not found in event: {0}")]
    ProductNotFound(String),

    #[error("Product already present in event: {0}")]
    ProductAlreadyExists(String),

    #[error("No {technology} geometry element for raw id {raw_id:#010x}")]
    UnknownGeometryElement {
        technology: Technology,
        raw_id: RawDetId,
    },

    #[error("Composite hit {raw_id:#010x} nests deeper than {max_depth} levels")]
    DecompositionTooDeep { raw_id: RawDetId, max_depth: usize },

    #[error("Raw id {raw_id:#010x} is not a {technology} detector id")]
    InvalidDetId {
        technology: Technology,
        raw_id: RawDetId,
    },

    #[error("{technology} id field '{field}' out of range: {value}")]
    DetIdFieldOutOfRange {
        technology: Technology,
        field: &'static str,
        value: i32,
    },
}

impl PartialEq for CleanerError {
    fn eq(&self, other: &Self) -> bool {
        use CleanerError::*;
        match (self, other) {
            (InvalidConfigParameter(a), InvalidConfigParameter(b)) => a == b,
            (InvalidInputTag(a), InvalidInputTag(b)) => a == b,
            (UnknownTechnology(a), UnknownTechnology(b)) => a == b,
            (ProductNotFound(a), ProductNotFound(b)) => a == b,
            (ProductAlreadyExists(a), ProductAlreadyExists(b)) => a == b,
            (UnknownMuonType { index: a }, UnknownMuonType { index: b }) => a == b,
            (
                MissingTrack {
                    index: a,
                    track: ta,
                },
                MissingTrack {
                    index: b,
                    track: tb,
                },
            ) => a == b && ta == tb,
            (
                UnknownGeometryElement {
                    technology: ta,
                    raw_id: a,
                },
                UnknownGeometryElement {
                    technology: tb,
                    raw_id: b,
                },
            ) => ta == tb && a == b,
            (
                DecompositionTooDeep {
                    raw_id: a,
                    max_depth: da,
                },
                DecompositionTooDeep {
                    raw_id: b,
                    max_depth: db,
                },
            ) => a == b && da == db,
            (
                InvalidDetId {
                    technology: ta,
                    raw_id: a,
                },
                InvalidDetId {
                    technology: tb,
                    raw_id: b,
                },
            ) => ta == tb && a == b,
            (
                DetIdFieldOutOfRange {
                    technology: ta,
                    field: fa,
                    value: a,
                },
                DetIdFieldOutOfRange {
                    technology: tb,
                    field: fb,
                    value: b,
                },
            ) => ta == tb && fa == fb && a == b,

            // Unit variants
            (NoCollectionsConfigured, NoCollectionsConfigured) => true,

            _ => false,
        }
    }
}
