//! Join cCRE intersection records back to submitted regions.
//!
//! The intersection query returns `bedtools intersect -wa -wb` style tuples
//! of a 6-column cCRE BED against the submitted regions:
//!
//! | idx | field         |
//! |-----|---------------|
//! | 0-2 | cCRE chr, start, end |
//! | 3   | rDHS          |
//! | 4   | accession     |
//! | 5   | cCRE class    |
//! | 6-8 | input chr, start, end |
//!
//! The only link to a region is the input-side coordinate triple. Because
//! [RegionRegistry] rejects submissions with repeated coordinates, the
//! triple identifies at most one region.

use argo_core::models::{Coordinates, RegionId, RegionRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::CcreClass;

const CCRE_CHR: usize = 0;
const CCRE_START: usize = 1;
const CCRE_END: usize = 2;
const ACCESSION: usize = 4;
const CLASS: usize = 5;
const INPUT_CHR: usize = 6;
const INPUT_START: usize = 7;
const INPUT_END: usize = 8;

/// One cCRE overlapping a submitted region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ccre {
    pub chr: String,
    pub start: u32,
    pub end: u32,
    pub accession: String,
    pub class: Option<CcreClass>,
    #[serde(rename = "inputRegion")]
    pub input_region: Option<Coordinates>,
    /// `None` when the input side didn't match any region.
    #[serde(rename = "regionID")]
    pub region_id: Option<RegionId>,
}

fn field<S: AsRef<str>>(record: &[S], idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
}

fn coordinates_at<S: AsRef<str>>(
    record: &[S],
    chr: usize,
    start: usize,
    end: usize,
) -> Option<Coordinates> {
    Some(Coordinates::new(
        field(record, chr)?,
        field(record, start)?.parse().ok()?,
        field(record, end)?.parse().ok()?,
    ))
}

/// Split one tab-separated intersection line into its fields.
pub fn parse_intersection_line(line: &str) -> Vec<String> {
    line.split('\t').map(|s| s.to_string()).collect()
}

///
/// Resolve one intersection record.
///
/// Returns `None` only when the cCRE side itself is unusable. A malformed
/// or unmatched input side leaves `region_id` empty.
///
pub fn match_record<S: AsRef<str>>(registry: &RegionRegistry, record: &[S]) -> Option<Ccre> {
    let ccre = coordinates_at(record, CCRE_CHR, CCRE_START, CCRE_END)?;
    let accession = field(record, ACCESSION)?.to_string();

    let input_region = coordinates_at(record, INPUT_CHR, INPUT_START, INPUT_END);
    let region_id = input_region
        .as_ref()
        .and_then(|coords| registry.find_by_coordinates(coords))
        .map(|region| region.id.clone());

    if region_id.is_none() {
        debug!("cCRE {} did not match any submitted region", accession);
    }

    Some(Ccre {
        chr: ccre.chr,
        start: ccre.start,
        end: ccre.end,
        accession,
        class: field(record, CLASS).map(CcreClass::from),
        input_region,
        region_id,
    })
}

///
/// Resolve every intersection record against the registry.
///
/// Records whose cCRE side can't be parsed are skipped. Unmatched records
/// are kept with `region_id = None`; see [matched_ccres].
///
pub fn match_intersections<S: AsRef<str>>(
    registry: &RegionRegistry,
    records: &[Vec<S>],
) -> Vec<Ccre> {
    records
        .iter()
        .filter_map(|record| match_record(registry, record))
        .collect()
}

/// Only the cCREs that resolved to a region; the rest never reach ranking.
pub fn matched_ccres(ccres: Vec<Ccre>) -> Vec<Ccre> {
    ccres.into_iter().filter(|c| c.region_id.is_some()).collect()
}
