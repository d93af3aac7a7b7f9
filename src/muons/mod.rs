//! # Muons and their tracks
//!
//! A reconstructed muon carries up to two tracks:
//!
//! * the **inner** track, fitted in the silicon tracker,
//! * the **outer** (standalone) track, fitted in the muon system.
//!
//! The cleaner needs one track per muon: the one that actually crossed the muon chambers
//! when it exists. [`Muon::best_track`] applies the selection
//!
//! | muon type         | track used |
//! |-------------------|------------|
//! | global            | outer      |
//! | standalone        | outer      |
//! | RPC               | inner      |
//! | tracker           | inner      |
//!
//! in that priority order. A muon of none of these types is a configuration error: the
//! input collection was not selected for embedding.
use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    constants::{Eta, Radian},
    geometry::GlobalPoint,
    hits::TrackingHit,
};

/// Ordered hits of one fitted track plus its direction at the outermost hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    hits: Vec<TrackingHit>,
    outer_eta: Eta,
    outer_phi: Radian,
}

impl Track {
    pub fn new(hits: Vec<TrackingHit>, outer_eta: Eta, outer_phi: Radian) -> Self {
        Track {
            hits,
            outer_eta,
            outer_phi,
        }
    }

    /// Track whose outer direction is the one of `outer_momentum`.
    pub fn from_outer_momentum(hits: Vec<TrackingHit>, outer_momentum: Vector3<f64>) -> Self {
        let direction = GlobalPoint::new(outer_momentum.x, outer_momentum.y, outer_momentum.z);
        Track::new(hits, direction.eta(), direction.phi())
    }

    pub fn hits(&self) -> &[TrackingHit] {
        &self.hits
    }

    pub fn outer_eta(&self) -> Eta {
        self.outer_eta
    }

    pub fn outer_phi(&self) -> Radian {
        self.outer_phi
    }
}

/// Which of the two tracks of a muon is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSelection {
    Inner,
    Outer,
}

impl TrackSelection {
    pub fn name(&self) -> &'static str {
        match self {
            TrackSelection::Inner => "inner",
            TrackSelection::Outer => "outer",
        }
    }
}

impl fmt::Display for TrackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reconstructed muon, as read from the selected muon collection.
///
/// The type flags are not exclusive: a global muon is usually also a tracker muon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Muon {
    pub is_global: bool,
    pub is_standalone: bool,
    pub is_tracker: bool,
    pub is_rpc: bool,
    inner_track: Option<Track>,
    outer_track: Option<Track>,
}

impl Muon {
    /// A muon without type flags nor tracks.
    pub fn untyped() -> Self {
        Self::default()
    }

    /// Global muon (also flagged tracker) with its outer track.
    pub fn global(outer_track: Track) -> Self {
        Muon {
            is_global: true,
            is_tracker: true,
            outer_track: Some(outer_track),
            ..Self::default()
        }
    }

    pub fn standalone(outer_track: Track) -> Self {
        Muon {
            is_standalone: true,
            outer_track: Some(outer_track),
            ..Self::default()
        }
    }

    pub fn tracker(inner_track: Track) -> Self {
        Muon {
            is_tracker: true,
            inner_track: Some(inner_track),
            ..Self::default()
        }
    }

    pub fn rpc(inner_track: Track) -> Self {
        Muon {
            is_rpc: true,
            inner_track: Some(inner_track),
            ..Self::default()
        }
    }

    pub fn with_inner_track(mut self, track: Track) -> Self {
        self.inner_track = Some(track);
        self
    }

    pub fn with_outer_track(mut self, track: Track) -> Self {
        self.outer_track = Some(track);
        self
    }

    pub fn inner_track(&self) -> Option<&Track> {
        self.inner_track.as_ref()
    }

    pub fn outer_track(&self) -> Option<&Track> {
        self.outer_track.as_ref()
    }

    /// Track the cleaner should use for this muon, from its type flags alone.
    pub fn track_selection(&self) -> Option<TrackSelection> {
        if self.is_global || self.is_standalone {
            Some(TrackSelection::Outer)
        } else if self.is_rpc || self.is_tracker {
            Some(TrackSelection::Inner)
        } else {
            None
        }
    }

    /// Resolve the track used by the cleaner.
    ///
    /// Arguments
    /// -----------------
    /// * `index`: position of the muon in its collection, used in the error.
    ///
    /// Return
    /// ----------
    /// * The selected track.
    /// * [`CleanerError::UnknownMuonType`] if no type flag is set.
    /// * [`CleanerError::MissingTrack`] if the selected track is absent.
    pub fn best_track(&self, index: usize) -> Result<&Track, CleanerError> {
        let selection = self
            .track_selection()
            .ok_or(CleanerError::UnknownMuonType { index })?;

        let track = match selection {
            TrackSelection::Inner => self.inner_track(),
            TrackSelection::Outer => self.outer_track(),
        };
        track.ok_or(CleanerError::MissingTrack {
            index,
            track: selection.name(),
        })
    }
}
