use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::RegistryError;

///
/// Identity of one submitted region. Upload formats hand out either strings
/// or integers; both are kept as their decimal/string rendering.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct RegionId(String);

impl RegionId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        RegionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(value: &str) -> Self {
        RegionId(value.to_string())
    }
}

impl From<String> for RegionId {
    fn from(value: String) -> Self {
        RegionId(value)
    }
}

impl From<u64> for RegionId {
    fn from(value: u64) -> Self {
        RegionId(value.to_string())
    }
}

impl Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RegionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawRegionId {
            Text(String),
            Number(u64),
        }

        Ok(match RawRegionId::deserialize(deserializer)? {
            RawRegionId::Text(s) => RegionId(s),
            RawRegionId::Number(n) => RegionId(n.to_string()),
        })
    }
}

///
/// Genomic coordinates of a region, half-open `[start, end)`.
///
/// Upstream intersection queries only hand back coordinates, so this is
/// the key used when a record has to be joined back to a [Region].
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinates {
    pub chr: String,
    pub start: u32,
    pub end: u32,
}

impl Coordinates {
    pub fn new<S: Into<String>>(chr: S, start: u32, end: u32) -> Self {
        Coordinates {
            chr: chr.into(),
            start,
            end,
        }
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chr, self.start, self.end)
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Forward,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Reverse,
}

impl FromStr for Strand {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(RegistryError::InvalidStrand(s.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///
/// Region struct, one user-submitted variant or interval.
///
/// Created once when the submission is read and never mutated afterwards.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    pub id: RegionId,
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub ref_allele: Option<String>,
    pub alt_allele: Option<String>,
    pub strand: Option<Strand>,
}

impl Region {
    pub fn new<I: Into<RegionId>, S: Into<String>>(id: I, chr: S, start: u32, end: u32) -> Self {
        Region {
            id: id.into(),
            chr: chr.into(),
            start,
            end,
            ref_allele: None,
            alt_allele: None,
            strand: None,
        }
    }

    ///
    /// Get length of the region
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.chr.clone(), self.start, self.end)
    }

    /// True when `coords` spells out exactly this region.
    pub fn matches(&self, coords: &Coordinates) -> bool {
        self.chr == coords.chr && self.start == coords.start && self.end == coords.end
    }

    ///
    /// Get BED-like line for the Region
    ///
    pub fn as_string(&self) -> String {
        let mut line = format!("{}\t{}\t{}\t{}", self.chr, self.start, self.end, self.id);
        if self.ref_allele.is_some() || self.alt_allele.is_some() || self.strand.is_some() {
            line.push_str(&format!(
                "\t{}\t{}\t{}",
                self.ref_allele.as_deref().unwrap_or("."),
                self.alt_allele.as_deref().unwrap_or("."),
                self.strand.map_or(String::from("."), |s| s.to_string()),
            ));
        }
        line
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
