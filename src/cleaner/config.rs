//! # Cleaner configuration
//!
//! [`CleanerConfig`] gathers the parameters of one cleaner instance:
//!
//! | Parameter          | Key               | Default                       |
//! |--------------------|-------------------|-------------------------------|
//! | `muon_collection`  | `MuonCollection`  | `selectedMuonsForEmbedding`   |
//! | `old_collections`  | `oldCollection`   | *(required, at least one)*    |
//! | `dr_cut`           | -                 | [`DR_CUT`] (0.4)              |
//!
//! Each entry of `old_collections` is read by its full [`InputTag`] and re-emitted under its
//! **instance** name, so instance names must be distinct within one configuration.
//!
//! ## Example
//!
//! ```rust
//! use muon_det_cleaner::cleaner::config::CleanerConfig;
//!
//! let config = CleanerConfig::builder()
//!     .muon_collection("selectedMuonsForEmbedding")
//!     .old_collection("csc2DRecHits")
//!     .dr_cut(0.3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.declared_products(), vec![""]);
//! println!("{config:#}");
//! ```
//!
//! A deserialized configuration goes through the same validation: serde reads a
//! [`CleanerConfigBuilder`] (tags as strings, missing keys take their default) and
//! converts it with [`CleanerConfigBuilder::build`].
use std::{collections::HashSet, fmt};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    cleaner_errors::CleanerError,
    constants::{DEFAULT_MUON_COLLECTION, DR_CUT},
    event::InputTag,
};

/// Parameters of a muon detector hit cleaner.
///
/// Build it with [`CleanerConfig::builder`]; the builder rejects configurations the
/// cleaner could not run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CleanerConfigBuilder", into = "CleanerConfigBuilder")]
pub struct CleanerConfig {
    /// Collection of the muons whose hits are removed.
    pub muon_collection: InputTag,
    /// Hit collections to clean, one output per entry.
    pub old_collections: Vec<InputTag>,
    /// Angular distance under which a hit is attributed to a muon.
    pub dr_cut: f64,
}

impl CleanerConfig {
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::new()
    }

    /// Instance names the cleaner produces, in configuration order.
    pub fn declared_products(&self) -> Vec<&str> {
        self.old_collections
            .iter()
            .map(|tag| tag.instance.as_str())
            .collect()
    }
}

/// Builder for [`CleanerConfig`], with validation.
///
/// Tags are kept as strings until [`build`](CleanerConfigBuilder::build), so that a
/// malformed tag is reported like any other configuration error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfigBuilder {
    muon_collection: String,
    old_collections: Vec<String>,
    dr_cut: f64,
}

impl Default for CleanerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CleanerConfigBuilder {
    pub fn new() -> Self {
        CleanerConfigBuilder {
            muon_collection: DEFAULT_MUON_COLLECTION.to_string(),
            old_collections: Vec::new(),
            dr_cut: DR_CUT,
        }
    }

    pub fn muon_collection(mut self, tag: &str) -> Self {
        self.muon_collection = tag.to_string();
        self
    }

    /// Append one hit collection to clean.
    pub fn old_collection(mut self, tag: &str) -> Self {
        self.old_collections.push(tag.to_string());
        self
    }

    /// Replace the list of hit collections to clean.
    pub fn old_collections<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.old_collections = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn dr_cut(mut self, v: f64) -> Self {
        self.dr_cut = v;
        self
    }

    /// Validate and produce the [`CleanerConfig`].
    ///
    /// Return
    /// ----------
    /// * `Ok(CleanerConfig)` when every rule holds.
    /// * [`CleanerError::InvalidInputTag`] if a tag cannot be parsed.
    /// * [`CleanerError::NoCollectionsConfigured`] if no hit collection was given.
    /// * [`CleanerError::InvalidConfigParameter`] if `dr_cut` is not a positive finite
    ///   number, or if two collections share an instance name.
    pub fn build(self) -> Result<CleanerConfig, CleanerError> {
        let muon_collection: InputTag = self.muon_collection.parse()?;
        let old_collections = self
            .old_collections
            .iter()
            .map(|tag| tag.parse::<InputTag>())
            .collect::<Result<Vec<_>, _>>()?;

        if old_collections.is_empty() {
            return Err(CleanerError::NoCollectionsConfigured);
        }

        if !(self.dr_cut.is_finite() && self.dr_cut > 0.0) {
            return Err(CleanerError::InvalidConfigParameter(format!(
                "dr_cut must be a positive finite number, got {}",
                self.dr_cut
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = old_collections
            .iter()
            .find(|tag| !seen.insert(tag.instance.as_str()))
        {
            return Err(CleanerError::InvalidConfigParameter(format!(
                "instance name {:?} produced twice (from {})",
                dup.instance, dup
            )));
        }

        Ok(CleanerConfig {
            muon_collection,
            old_collections,
            dr_cut: self.dr_cut,
        })
    }
}

impl TryFrom<CleanerConfigBuilder> for CleanerConfig {
    type Error = CleanerError;

    fn try_from(builder: CleanerConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<CleanerConfig> for CleanerConfigBuilder {
    fn from(config: CleanerConfig) -> Self {
        CleanerConfigBuilder {
            muon_collection: config.muon_collection.to_string(),
            old_collections: config
                .old_collections
                .iter()
                .map(ToString::to_string)
                .collect(),
            dr_cut: config.dr_cut,
        }
    }
}

impl fmt::Display for CleanerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 44;
            writeln!(f, "Muon Detector Cleaner Parameters")?;
            writeln!(f, "--------------------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            line!(
                "muon_collection = {}",
                self.muon_collection,
                "Muons whose hits are removed"
            )?;
            line!(
                "dr_cut          = {:.3}",
                self.dr_cut,
                "Proximity cut in (eta, phi)"
            )?;
            writeln!(f, "\n[Hit collections]")?;
            for tag in &self.old_collections {
                line!("{}", tag, format!("-> instance {:?}", tag.instance))?;
            }
            Ok(())
        } else {
            write!(
                f,
                "CleanerConfig(muons={}, dr_cut={:.3}, collections=[{}])",
                self.muon_collection,
                self.dr_cut,
                self.old_collections.iter().join(", ")
            )
        }
    }
}
