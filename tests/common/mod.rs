#![allow(dead_code)]

use nalgebra::{Point3, Vector3};

use muon_det_cleaner::{
    cleaner::config::CleanerConfig,
    constants::DEFAULT_MUON_COLLECTION,
    det_id::MuonDetId,
    event::InputTag,
    geometry::{GlobalPoint, Surface},
    hits::{HitKind, TrackingHit},
    muons::{Muon, Track},
};

/// Transverse distance of the test hits from the beam line (cm).
pub const HIT_PERP: f64 = 500.0;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn muon_tag() -> InputTag {
    InputTag::new(DEFAULT_MUON_COLLECTION, "")
}

pub fn config(collections: &[&str]) -> CleanerConfig {
    CleanerConfig::builder()
        .old_collections(collections.iter().copied())
        .build()
        .unwrap()
}

/// Local coordinates on `surface` of the point seen from the origin at (`eta`, `phi`).
pub fn local_at(surface: &Surface, eta: f64, phi: f64) -> Point3<f64> {
    surface.to_local(&GlobalPoint::from_perp_eta_phi(HIT_PERP, eta, phi))
}

/// Endcap-like element sitting on the beam axis at `z`.
pub fn endcap_surface(z: f64) -> Surface {
    Surface::at(Vector3::new(0.0, 0.0, z))
}

/// Barrel-like element at radius `r`, azimuth `phi`, facing the beam.
pub fn barrel_surface(r: f64, phi: f64) -> Surface {
    Surface::facing_beam(Vector3::new(r * phi.cos(), r * phi.sin(), 0.0), phi)
}

pub fn leaf<I: MuonDetId>(kind: HitKind, id: I) -> TrackingHit {
    TrackingHit::leaf(kind, id.raw())
}

pub fn global_muon(eta: f64, phi: f64, hits: Vec<TrackingHit>) -> Muon {
    Muon::global(Track::new(hits, eta, phi))
}

pub fn standalone_muon(eta: f64, phi: f64, hits: Vec<TrackingHit>) -> Muon {
    Muon::standalone(Track::new(hits, eta, phi))
}

pub fn tracker_muon(eta: f64, phi: f64, hits: Vec<TrackingHit>) -> Muon {
    Muon::tracker(Track::new(hits, eta, phi))
}
