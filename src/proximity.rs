//! Angular proximity between a hit and the muon tracks.
//!
//! The distance used is the usual
//!
//! ```text
//! ΔR = sqrt(Δη² + Δφ²)
//! ```
//!
//! where `Δφ` is wrapped into `[-π, π)` so that two directions on either side of the
//! `φ = ±π` boundary are recognised as neighbours. A hit is *close* to a track when
//! `ΔR < dr_cut` (strict), and close to the event when it is close to any of its tracks.
use crate::{
    constants::{Eta, Radian, DPI},
    geometry::GlobalPoint,
    muons::Track,
};
use std::f64::consts::PI;

/// Difference `phi1 - phi2` wrapped into `[-π, π)`.
#[inline]
pub fn delta_phi(phi1: Radian, phi2: Radian) -> Radian {
    (phi1 - phi2 + PI).rem_euclid(DPI) - PI
}

/// Angular distance between two (η, φ) directions.
#[inline]
pub fn delta_r(eta1: Eta, phi1: Radian, eta2: Eta, phi2: Radian) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    deta.hypot(dphi)
}

/// Whether `hit` lies within `dr_cut` of the outer direction of `track`.
#[inline]
pub fn is_close(hit: &GlobalPoint, track: &Track, dr_cut: f64) -> bool {
    delta_r(hit.eta(), hit.phi(), track.outer_eta(), track.outer_phi()) < dr_cut
}

/// Whether `hit` lies within `dr_cut` of at least one track.
pub fn close_to_any<'a, I>(hit: &GlobalPoint, tracks: I, dr_cut: f64) -> bool
where
    I: IntoIterator<Item = &'a Track>,
{
    tracks
        .into_iter()
        .any(|track| is_close(hit, track, dr_cut))
}
