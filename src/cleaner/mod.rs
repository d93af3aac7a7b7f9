//! # Muon detector hit cleaner
//!
//! [`MuonDetCleaner`] removes, from every configured hit collection of one muon technology, the
//! hits that belong to the selected muons. It runs once per event:
//!
//! 1. **Track selection**
//!    Each muon of the configured muon collection contributes one track, chosen from its type
//!    flags (see [`Muon::best_track`]). An untyped muon, or a muon missing the selected track,
//!    aborts the event.
//!
//! 2. **Veto set**
//!    Every valid track hit accepted by the technology is decomposed down to its primitive hits
//!    (see [`decompose`]); their raw detector ids form the veto set.
//!
//! 3. **Cleaning**
//!    Each hit of each input collection is dropped when it is invalid, foreign to the
//!    technology, vetoed by raw id, or within `dr_cut` of any track (see
//!    [`close_to_any`]). Survivors are grouped by detector id.
//!
//! 4. **Commit**
//!    The cleaned collections are stored in the event under their instance names, only once
//!    every collection has been cleaned. A failing event leaves the output store untouched.
//!
//! The three technologies share this pipeline through the [`MuonTechnology`] capability trait;
//! [`CscRecHitColCleaner`], [`DtRecHitColCleaner`] and [`RpcRecHitColCleaner`] are its
//! instantiations, and [`AnyCleaner`] selects one at runtime from a [`Technology`].
//!
//! With the `parallel` feature the collections of one event are cleaned concurrently with
//! `rayon`. Outputs do not depend on the order collections are cleaned in.
//!
//! ## Example
//!
//! ```rust
//! use muon_det_cleaner::cleaner::{config::CleanerConfig, RpcRecHitColCleaner};
//! use muon_det_cleaner::event::{Event, InputTag};
//! use muon_det_cleaner::collections::RecHitCollection;
//! use muon_det_cleaner::geometry::MuonGeometry;
//!
//! let config = CleanerConfig::builder()
//!     .old_collection("rpcRecHits")
//!     .build()
//!     .unwrap();
//! let cleaner = RpcRecHitColCleaner::new(config);
//!
//! let mut event = Event::new(1);
//! event.put_muons(InputTag::new("selectedMuonsForEmbedding", ""), Vec::new());
//! event
//!     .rpc_mut()
//!     .insert_input(InputTag::new("rpcRecHits", ""), RecHitCollection::new());
//!
//! let summary = cleaner.produce(&mut event, &MuonGeometry::new()).unwrap();
//! assert_eq!(summary.n_tracks, 0);
//! assert!(event.rpc().output("").unwrap().is_empty());
//! ```
//!
//! ## See also
//!
//! * [`config::CleanerConfig`] – parameters and their validation.
//! * [`summary::EventSummary`] – per-event counters returned by `produce`.
pub mod config;
pub mod summary;

use std::marker::PhantomData;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::{debug, debug_span, error, trace};

use crate::{
    cleaner_errors::CleanerError,
    constants::{LOG_TARGET, VetoSet},
    event::{Event, InputTag, Products},
    geometry::MuonGeometry,
    hits::{decompose, rec_hits::RecHit},
    muons::{Muon, Track},
    proximity::close_to_any,
    technology::{CollectionOf, Csc, Dt, MuonTechnology, Rpc, Technology},
};

use self::{
    config::CleanerConfig,
    summary::{CleaningSummary, EventSummary},
};

/// Tracks of the muons of one event; rarely more than a few.
pub type TrackList<'a> = SmallVec<[&'a Track; 4]>;

/// Cleaned collection staged for commit, with its instance name and counters.
type Staged<T> = (String, CollectionOf<T>, CleaningSummary);

/// Select one track per muon.
///
/// Arguments
/// -----------------
/// * `muons`: the muon collection, in event order.
///
/// Return
/// ----------
/// * The selected tracks, in muon order.
/// * The first [`CleanerError::UnknownMuonType`] or [`CleanerError::MissingTrack`] met.
pub fn select_tracks(muons: &[Muon]) -> Result<TrackList<'_>, CleanerError> {
    muons
        .iter()
        .enumerate()
        .map(|(index, muon)| muon.best_track(index))
        .collect()
}

/// Raw ids of the primitive hits of `tracks` that belong to technology `T`.
///
/// Invalid track hits and hits of another technology are skipped; the components of an
/// accepted composite are taken as they are.
pub fn build_veto_set<T: MuonTechnology>(tracks: &[&Track]) -> Result<VetoSet, CleanerError> {
    let mut veto = VetoSet::default();
    for hit in tracks.iter().flat_map(|track| track.hits()) {
        if !hit.is_valid() || !T::accepts(hit.kind()) {
            continue;
        }
        decompose(hit, &mut veto)?;
    }
    Ok(veto)
}

/// Clean one input collection against the veto set and the tracks.
///
/// Arguments
/// -----------------
/// * `input`: the hit collection to clean.
/// * `veto`: raw ids of the muon hits of this technology.
/// * `tracks`: the muon tracks, for the proximity test.
/// * `geometry`: used to place each remaining hit in the global frame.
/// * `dr_cut`: strict upper bound on ΔR for a hit to be attributed to a track.
///
/// Return
/// ----------
/// * The surviving hits grouped by detector id, with the counters of the pass.
/// * [`CleanerError::UnknownGeometryElement`] if a hit lies on an element absent from
///   `geometry`.
pub fn clean_collection<T: MuonTechnology>(
    input: &CollectionOf<T>,
    veto: &VetoSet,
    tracks: &[&Track],
    geometry: &MuonGeometry,
    dr_cut: f64,
) -> Result<(CollectionOf<T>, CleaningSummary), CleanerError> {
    let mut summary = CleaningSummary::default();
    let mut kept: Vec<T::Hit> = Vec::new();

    for hit in input.iter() {
        summary.n_input += 1;
        if !hit.is_valid() {
            summary.n_invalid += 1;
            continue;
        }
        if !T::accepts(hit.kind()) {
            summary.n_foreign += 1;
            continue;
        }
        if veto.contains(&hit.raw_det_id()) {
            summary.n_vetoed += 1;
            continue;
        }
        let position = T::global_position(hit, geometry)?;
        if close_to_any(&position, tracks.iter().copied(), dr_cut) {
            summary.n_close += 1;
            continue;
        }
        kept.push(hit.clone());
    }
    summary.n_kept = kept.len();

    Ok((kept.into_iter().collect(), summary))
}

/// Hit cleaner for one muon technology.
#[derive(Debug, Clone)]
pub struct MuonDetCleaner<T: MuonTechnology> {
    config: CleanerConfig,
    technology: PhantomData<T>,
}

pub type CscRecHitColCleaner = MuonDetCleaner<Csc>;
pub type DtRecHitColCleaner = MuonDetCleaner<Dt>;
pub type RpcRecHitColCleaner = MuonDetCleaner<Rpc>;

impl<T: MuonTechnology> MuonDetCleaner<T> {
    pub fn new(config: CleanerConfig) -> Self {
        MuonDetCleaner {
            config,
            technology: PhantomData,
        }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn technology(&self) -> Technology {
        T::TECHNOLOGY
    }

    /// Clean the configured collections of `event` and store the results in it.
    ///
    /// Arguments
    /// -----------------
    /// * `event`: provides the muons and the input collections, receives the outputs.
    /// * `geometry`: geometry snapshot valid for this event.
    ///
    /// Return
    /// ----------
    /// * An [`EventSummary`] with the counters of every collection.
    /// * Any [`CleanerError`] met on the way. Nothing is written to `event` in that case,
    ///   and the error is logged under the `TauEmbedding` target.
    pub fn produce(
        &self,
        event: &mut Event,
        geometry: &MuonGeometry,
    ) -> Result<EventSummary, CleanerError> {
        let _span = debug_span!(
            target: LOG_TARGET,
            "produce",
            technology = %T::TECHNOLOGY,
            event = event.id()
        )
        .entered();

        let result = self.produce_inner(event, geometry);
        if let Err(e) = &result {
            error!(
                target: LOG_TARGET,
                "{} failed on event {}: {e}",
                T::TECHNOLOGY.cleaner_name(),
                event.id()
            );
        }
        result
    }

    fn produce_inner(
        &self,
        event: &mut Event,
        geometry: &MuonGeometry,
    ) -> Result<EventSummary, CleanerError> {
        let event_id = event.id();
        let (staged, n_tracks, veto_size) = {
            let tracks = select_tracks(event.muons(&self.config.muon_collection)?)?;
            let veto = build_veto_set::<T>(&tracks)?;
            trace!(
                target: LOG_TARGET,
                n_tracks = tracks.len(),
                veto_size = veto.len(),
                "veto set built"
            );
            let staged = self.clean_all(T::products(event), &veto, &tracks, geometry)?;
            (staged, tracks.len(), veto.len())
        };

        let products = T::products_mut(event);
        if let Some((instance, ..)) = staged.iter().find(|(i, ..)| products.has_output(i)) {
            return Err(CleanerError::ProductAlreadyExists(instance.clone()));
        }

        let mut summary = EventSummary {
            event_id,
            technology: T::TECHNOLOGY,
            n_tracks,
            veto_size,
            collections: Default::default(),
        };
        for (instance, collection, counters) in staged {
            debug!(target: LOG_TARGET, instance = %instance, "{counters}");
            products.put_output(&instance, collection)?;
            summary.collections.insert(instance, counters);
        }
        Ok(summary)
    }

    fn clean_all(
        &self,
        products: &Products<T::DetId, T::Hit>,
        veto: &VetoSet,
        tracks: &[&Track],
        geometry: &MuonGeometry,
    ) -> Result<Vec<Staged<T>>, CleanerError> {
        let clean_one = |tag: &InputTag| -> Result<Staged<T>, CleanerError> {
            let input = products.input(tag)?;
            let (collection, counters) =
                clean_collection::<T>(input, veto, tracks, geometry, self.config.dr_cut)?;
            Ok((tag.instance.clone(), collection, counters))
        };

        #[cfg(feature = "parallel")]
        let staged = self
            .config
            .old_collections
            .par_iter()
            .map(clean_one)
            .collect::<Result<Vec<_>, _>>();

        #[cfg(not(feature = "parallel"))]
        let staged = self
            .config
            .old_collections
            .iter()
            .map(clean_one)
            .collect::<Result<Vec<_>, _>>();

        staged
    }

    /// Run [`produce`](Self::produce) on every event of a batch.
    ///
    /// A failing event does not stop the batch: its error is returned at its position and
    /// the following events are processed normally.
    pub fn process_events(
        &self,
        events: &mut [Event],
        geometry: &MuonGeometry,
    ) -> Vec<Result<EventSummary, CleanerError>> {
        events
            .iter_mut()
            .map(|event| self.produce(event, geometry))
            .collect()
    }
}

/// A cleaner whose technology is chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyCleaner {
    Csc(CscRecHitColCleaner),
    Dt(DtRecHitColCleaner),
    Rpc(RpcRecHitColCleaner),
}

macro_rules! dispatch {
    ($self:expr, $cleaner:ident => $body:expr) => {
        match $self {
            AnyCleaner::Csc($cleaner) => $body,
            AnyCleaner::Dt($cleaner) => $body,
            AnyCleaner::Rpc($cleaner) => $body,
        }
    };
}

impl AnyCleaner {
    pub fn new(technology: Technology, config: CleanerConfig) -> Self {
        match technology {
            Technology::Csc => AnyCleaner::Csc(MuonDetCleaner::new(config)),
            Technology::Dt => AnyCleaner::Dt(MuonDetCleaner::new(config)),
            Technology::Rpc => AnyCleaner::Rpc(MuonDetCleaner::new(config)),
        }
    }

    /// Build the cleaner registered under `name` (`"CSCRecHitColCleaner"`, `"dt"`, ...).
    pub fn from_name(name: &str, config: CleanerConfig) -> Result<Self, CleanerError> {
        Ok(AnyCleaner::new(name.parse()?, config))
    }

    pub fn technology(&self) -> Technology {
        dispatch!(self, c => c.technology())
    }

    pub fn config(&self) -> &CleanerConfig {
        dispatch!(self, c => c.config())
    }

    pub fn produce(
        &self,
        event: &mut Event,
        geometry: &MuonGeometry,
    ) -> Result<EventSummary, CleanerError> {
        dispatch!(self, c => c.produce(event, geometry))
    }

    pub fn process_events(
        &self,
        events: &mut [Event],
        geometry: &MuonGeometry,
    ) -> Vec<Result<EventSummary, CleanerError>> {
        dispatch!(self, c => c.process_events(events, geometry))
    }
}
