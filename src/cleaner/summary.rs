//! Counters reported by the cleaner for each collection and each event.
use std::{collections::BTreeMap, fmt, ops::AddAssign};

use serde::{Deserialize, Serialize};

use crate::technology::Technology;

/// What happened to the hits of one input collection.
///
/// Every input hit ends up in exactly one of the five outcome counters, so
///
/// ```text
/// n_input = n_invalid + n_foreign + n_vetoed + n_close + n_kept
/// ```
///
/// Display
/// -----------------
/// * `format!("{}", s)` – compact single line:
///   ```text
///   in=12, invalid=1, foreign=0, vetoed=6, close=2, kept=3
///   ```
/// * `format!("{:#}", s)` – one counter per line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub n_input: usize,
    /// Hits flagged invalid by their producer.
    pub n_invalid: usize,
    /// Hits of a kind this technology does not own.
    pub n_foreign: usize,
    /// Hits whose detector id is in the veto set.
    pub n_vetoed: usize,
    /// Hits within the proximity cut of a muon track.
    pub n_close: usize,
    pub n_kept: usize,
}

impl CleaningSummary {
    pub fn n_removed(&self) -> usize {
        self.n_vetoed + self.n_close
    }

    /// Whether the counters account for every input hit.
    pub fn is_balanced(&self) -> bool {
        self.n_input
            == self.n_invalid + self.n_foreign + self.n_vetoed + self.n_close + self.n_kept
    }
}

impl AddAssign for CleaningSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.n_input += rhs.n_input;
        self.n_invalid += rhs.n_invalid;
        self.n_foreign += rhs.n_foreign;
        self.n_vetoed += rhs.n_vetoed;
        self.n_close += rhs.n_close;
        self.n_kept += rhs.n_kept;
    }
}

impl fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "input   : {}", self.n_input)?;
            writeln!(f, "invalid : {}", self.n_invalid)?;
            writeln!(f, "foreign : {}", self.n_foreign)?;
            writeln!(f, "vetoed  : {}", self.n_vetoed)?;
            writeln!(f, "close   : {}", self.n_close)?;
            write!(f, "kept    : {}", self.n_kept)
        } else {
            write!(
                f,
                "in={}, invalid={}, foreign={}, vetoed={}, close={}, kept={}",
                self.n_input,
                self.n_invalid,
                self.n_foreign,
                self.n_vetoed,
                self.n_close,
                self.n_kept
            )
        }
    }
}

/// Outcome of one successful `produce` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: u64,
    pub technology: Technology,
    /// Number of muon tracks used for the proximity test.
    pub n_tracks: usize,
    /// Number of distinct raw ids in the veto set.
    pub veto_size: usize,
    /// Per output instance name.
    pub collections: BTreeMap<String, CleaningSummary>,
}

impl EventSummary {
    /// Sum of the per-collection counters.
    pub fn total(&self) -> CleaningSummary {
        self.collections
            .values()
            .fold(CleaningSummary::default(), |mut acc, s| {
                acc += *s;
                acc
            })
    }

    pub fn collection(&self, instance: &str) -> Option<&CleaningSummary> {
        self.collections.get(instance)
    }
}

impl fmt::Display for EventSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "{} cleaning, event {}", self.technology, self.event_id)?;
            writeln!(f, "-----------------------------")?;
            writeln!(f, "tracks    : {}", self.n_tracks)?;
            writeln!(f, "veto size : {}", self.veto_size)?;
            for (instance, summary) in &self.collections {
                writeln!(f, "  [{instance:?}] {summary}")?;
            }
            Ok(())
        } else {
            write!(
                f,
                "event {} ({}): tracks={}, veto={}, {}",
                self.event_id,
                self.technology,
                self.n_tracks,
                self.veto_size,
                self.total()
            )
        }
    }
}

#[cfg(test)]
mod summary_test {
    use super::*;

    #[test]
    fn test_total_and_balance() {
        let a = CleaningSummary {
            n_input: 5,
            n_invalid: 1,
            n_foreign: 0,
            n_vetoed: 2,
            n_close: 1,
            n_kept: 1,
        };
        let b = CleaningSummary {
            n_input: 3,
            n_kept: 3,
            ..Default::default()
        };
        let event = EventSummary {
            event_id: 7,
            technology: Technology::Rpc,
            n_tracks: 1,
            veto_size: 2,
            collections: [("a".to_string(), a), ("b".to_string(), b)].into(),
        };

        let total = event.total();
        assert!(a.is_balanced() && b.is_balanced() && total.is_balanced());
        assert_eq!(total.n_input, 8);
        assert_eq!(total.n_kept, 4);
        assert_eq!(total.n_removed(), 3);
        assert_eq!(
            event.to_string(),
            "event 7 (RPC): tracks=1, veto=2, in=8, invalid=1, foreign=0, vetoed=2, close=1, kept=4"
        );
    }
}
