//! The run addressing scheme shared by the compositor and the edit engine.
//!
//! Every rendered run carries a `RunAddress` so that a later edit signal
//! can be mapped back to structured coordinates. The string form is the
//! one piece of wire format this engine owns: it must round-trip exactly
//! through whatever transport the edit-capture signal uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A stable (page, text item, run) address for one rendered run.
///
/// Addresses are deterministic: composing the same page twice yields the
/// same address for the same run. Ordering is page-major so queues keyed
/// by address iterate in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunAddress {
    pub page: usize,
    pub item: usize,
    pub run: usize,
}

impl RunAddress {
    pub fn new(page: usize, item: usize, run: usize) -> Self {
        Self { page, item, run }
    }
}

impl fmt::Display for RunAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}t{}r{}", self.page, self.item, self.run)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("malformed run address: '{0}'")]
    Malformed(String),
}

impl FromStr for RunAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AddressParseError::Malformed(s.to_string());

        let rest = s.strip_prefix('p').ok_or_else(malformed)?;
        let (page, rest) = rest.split_once('t').ok_or_else(malformed)?;
        let (item, run) = rest.split_once('r').ok_or_else(malformed)?;

        Ok(Self {
            page: page.parse().map_err(|_| malformed())?,
            item: item.parse().map_err(|_| malformed())?,
            run: run.parse().map_err(|_| malformed())?,
        })
    }
}
