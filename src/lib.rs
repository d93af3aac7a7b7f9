pub mod cleaner;
pub mod cleaner_errors;
pub mod collections;
pub mod constants;
pub mod det_id;
pub mod event;
pub mod geometry;
pub mod hits;
pub mod muons;
pub mod proximity;
pub mod technology;

pub use cleaner::{
    config::CleanerConfig, AnyCleaner, CscRecHitColCleaner, DtRecHitColCleaner, MuonDetCleaner,
    RpcRecHitColCleaner,
};
pub use cleaner_errors::CleanerError;
pub use technology::Technology;
