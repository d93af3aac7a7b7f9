//! # Event store
//!
//! Minimal stand-in for the data of one processing event. It holds:
//!
//! * named muon collections,
//! * per technology, named **input** hit collections and the **output** store filled by the
//!   cleaners.
//!
//! Inputs are addressed by [`InputTag`] (`label:instance:process`), outputs by the instance
//! name they are produced under, mirroring how each configured input collection is re-emitted
//! under its own instance label.
use std::{collections::HashMap, fmt, str::FromStr};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    collections::RecHitCollection,
    det_id::{CscDetId, DtLayerId, RpcDetId},
    hits::rec_hits::{CscRecHit2D, DtRecHit1DPair, RpcRecHit},
    muons::Muon,
};

/// Address of a product: module label, optional instance and process names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputTag {
    pub label: String,
    pub instance: String,
    pub process: String,
}

impl InputTag {
    pub fn new(label: &str, instance: &str) -> Self {
        InputTag {
            label: label.to_string(),
            instance: instance.to_string(),
            process: String::new(),
        }
    }
}

impl FromStr for InputTag {
    type Err = CleanerError;

    /// Parse `"label"`, `"label:instance"` or `"label:instance:process"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (label, instance, process) = match parts.as_slice() {
            [label] => (*label, "", ""),
            [label, instance] => (*label, *instance, ""),
            [label, instance, process] => (*label, *instance, *process),
            _ => return Err(CleanerError::InvalidInputTag(s.to_string())),
        };
        if label.is_empty() {
            return Err(CleanerError::InvalidInputTag(s.to_string()));
        }
        Ok(InputTag {
            label: label.to_string(),
            instance: instance.to_string(),
            process: process.to_string(),
        })
    }
}

impl fmt::Display for InputTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if !self.instance.is_empty() || !self.process.is_empty() {
            write!(f, ":{}", self.instance)?;
        }
        if !self.process.is_empty() {
            write!(f, ":{}", self.process)?;
        }
        Ok(())
    }
}

/// Input and output hit collections of one technology.
#[derive(Debug, Clone)]
pub struct Products<K: Ord, H> {
    inputs: HashMap<InputTag, RecHitCollection<K, H>, RandomState>,
    outputs: HashMap<String, RecHitCollection<K, H>, RandomState>,
}

impl<K: Ord, H> Default for Products<K, H> {
    fn default() -> Self {
        Products {
            inputs: HashMap::default(),
            outputs: HashMap::default(),
        }
    }
}

impl<K: Ord, H> Products<K, H> {
    pub fn insert_input(&mut self, tag: InputTag, collection: RecHitCollection<K, H>) {
        self.inputs.insert(tag, collection);
    }

    pub fn input(&self, tag: &InputTag) -> Result<&RecHitCollection<K, H>, CleanerError> {
        self.inputs
            .get(tag)
            .ok_or_else(|| CleanerError::ProductNotFound(tag.to_string()))
    }

    pub fn output(&self, instance: &str) -> Option<&RecHitCollection<K, H>> {
        self.outputs.get(instance)
    }

    pub fn has_output(&self, instance: &str) -> bool {
        self.outputs.contains_key(instance)
    }

    /// Store a produced collection under `instance`.
    ///
    /// Fails with [`CleanerError::ProductAlreadyExists`] if `instance` was already produced
    /// in this event.
    pub fn put_output(
        &mut self,
        instance: &str,
        collection: RecHitCollection<K, H>,
    ) -> Result<(), CleanerError> {
        if self.has_output(instance) {
            return Err(CleanerError::ProductAlreadyExists(instance.to_string()));
        }
        self.outputs.insert(instance.to_string(), collection);
        Ok(())
    }

    pub fn n_outputs(&self) -> usize {
        self.outputs.len()
    }
}

/// Data of one processing event.
#[derive(Debug, Clone, Default)]
pub struct Event {
    id: u64,
    muons: HashMap<InputTag, Vec<Muon>, RandomState>,
    csc: Products<CscDetId, CscRecHit2D>,
    dt: Products<DtLayerId, DtRecHit1DPair>,
    rpc: Products<RpcDetId, RpcRecHit>,
}

impl Event {
    pub fn new(id: u64) -> Self {
        Event {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn put_muons(&mut self, tag: InputTag, muons: Vec<Muon>) {
        self.muons.insert(tag, muons);
    }

    pub fn muons(&self, tag: &InputTag) -> Result<&[Muon], CleanerError> {
        self.muons
            .get(tag)
            .map(Vec::as_slice)
            .ok_or_else(|| CleanerError::ProductNotFound(tag.to_string()))
    }

    pub fn csc(&self) -> &Products<CscDetId, CscRecHit2D> {
        &self.csc
    }

    pub fn csc_mut(&mut self) -> &mut Products<CscDetId, CscRecHit2D> {
        &mut self.csc
    }

    pub fn dt(&self) -> &Products<DtLayerId, DtRecHit1DPair> {
        &self.dt
    }

    pub fn dt_mut(&mut self) -> &mut Products<DtLayerId, DtRecHit1DPair> {
        &mut self.dt
    }

    pub fn rpc(&self) -> &Products<RpcDetId, RpcRecHit> {
        &self.rpc
    }

    pub fn rpc_mut(&mut self) -> &mut Products<RpcDetId, RpcRecHit> {
        &mut self.rpc
    }
}

#[cfg(test)]
mod event_test {
    use super::*;

    #[test]
    fn test_input_tag_parsing() {
        let tag: InputTag = "csc2DRecHits".parse().unwrap();
        assert_eq!(tag, InputTag::new("csc2DRecHits", ""));
        assert_eq!(tag.to_string(), "csc2DRecHits");

        let tag: InputTag = "dt1DRecHits:cleaned:RECO".parse().unwrap();
        assert_eq!(tag.instance, "cleaned");
        assert_eq!(tag.process, "RECO");
        assert_eq!(tag.to_string(), "dt1DRecHits:cleaned:RECO");

        assert_eq!(
            "a:b:c:d".parse::<InputTag>(),
            Err(CleanerError::InvalidInputTag("a:b:c:d".into()))
        );
        assert!(":inst".parse::<InputTag>().is_err());
    }

    #[test]
    fn test_products_store() {
        let mut event = Event::new(12);
        assert_eq!(event.id(), 12);

        let tag = InputTag::new("rpcRecHits", "");
        assert_eq!(
            event.rpc().input(&tag),
            Err(CleanerError::ProductNotFound("rpcRecHits".into()))
        );

        event.rpc_mut().insert_input(tag.clone(), RecHitCollection::new());
        assert!(event.rpc().input(&tag).is_ok());

        event.rpc_mut().put_output("", RecHitCollection::new()).unwrap();
        assert_eq!(
            event.rpc_mut().put_output("", RecHitCollection::new()),
            Err(CleanerError::ProductAlreadyExists(String::new()))
        );
        assert_eq!(event.rpc().n_outputs(), 1);
    }

    #[test]
    fn test_missing_muons() {
        let event = Event::new(1);
        let tag = InputTag::new("selectedMuonsForEmbedding", "");
        assert!(event.muons(&tag).is_err());
    }
}
