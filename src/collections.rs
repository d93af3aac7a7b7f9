//! # Hit collections grouped by detector element
//!
//! [`RecHitCollection`] is the container read from and written to the event. It maps each
//! detector element id to the **range** of hits measured on it:
//!
//! ```text
//! RecHitCollection<K, H> = BTreeMap<K, Vec<H>>
//! ```
//!
//! * keys are unique and iterated in increasing order,
//! * [`get`](RecHitCollection::get) returns the (possibly empty) range of one element,
//! * [`iter`](RecHitCollection::iter) walks every hit, element after element.
//!
//! Building a collection from loose hits groups them by their own id:
//!
//! ```rust
//! use nalgebra::Point3;
//! use muon_det_cleaner::collections::RecHitCollection;
//! use muon_det_cleaner::det_id::CscDetId;
//! use muon_det_cleaner::hits::rec_hits::CscRecHit2D;
//!
//! let l1 = CscDetId::new(1, 1, 2, 4, 1).unwrap();
//! let l2 = CscDetId::new(1, 1, 2, 4, 2).unwrap();
//! let hits: RecHitCollection<CscDetId, CscRecHit2D> = [
//!     CscRecHit2D::new(l2, Point3::new(1.0, 0.0, 0.0)),
//!     CscRecHit2D::new(l1, Point3::new(2.0, 0.0, 0.0)),
//!     CscRecHit2D::new(l2, Point3::new(3.0, 0.0, 0.0)),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(hits.len(), 3);
//! assert_eq!(hits.get(&l2).len(), 2);
//! assert_eq!(hits.ids().copied().collect::<Vec<_>>(), vec![l1, l2]);
//! ```
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::hits::rec_hits::RecHit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecHitCollection<K: Ord, H> {
    ranges: BTreeMap<K, Vec<H>>,
}

impl<K: Ord, H> Default for RecHitCollection<K, H> {
    fn default() -> Self {
        RecHitCollection {
            ranges: BTreeMap::new(),
        }
    }
}

impl<K: Ord, H> RecHitCollection<K, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits measured on `key`, empty if the element has none.
    pub fn get(&self, key: &K) -> &[H] {
        self.ranges.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &K) -> bool {
        self.ranges.contains_key(key)
    }

    /// Element ids, in increasing order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.ranges.keys()
    }

    /// `(id, range)` pairs, in increasing id order.
    pub fn ranges(&self) -> impl Iterator<Item = (&K, &[H])> {
        self.ranges.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Every hit, element after element.
    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.ranges.values().flatten()
    }

    /// Total number of hits.
    pub fn len(&self) -> usize {
        self.ranges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.values().all(Vec::is_empty)
    }

    /// Number of distinct elements.
    pub fn n_ids(&self) -> usize {
        self.ranges.len()
    }
}

impl<H: RecHit> RecHitCollection<H::Id, H> {
    /// Append `hits` to the range of `key`.
    ///
    /// Putting the same key twice extends the existing range; keys stay unique.
    /// Every hit must be measured on `key` (`hit.det_id() == key`); debug builds
    /// panic otherwise.
    pub fn put<I>(&mut self, key: H::Id, hits: I)
    where
        I: IntoIterator<Item = H>,
    {
        self.ranges
            .entry(key)
            .or_default()
            .extend(hits.into_iter().inspect(|hit| {
                debug_assert_eq!(hit.det_id(), key, "hit put under another element id");
            }));
    }
}

impl<H: RecHit> FromIterator<H> for RecHitCollection<H::Id, H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let grouped = iter.into_iter().into_group_map_by(|hit| hit.det_id());
        RecHitCollection {
            ranges: grouped.into_iter().collect(),
        }
    }
}

impl<H: RecHit> Extend<H> for RecHitCollection<H::Id, H> {
    fn extend<I: IntoIterator<Item = H>>(&mut self, iter: I) {
        for hit in iter {
            self.ranges.entry(hit.det_id()).or_default().push(hit);
        }
    }
}
