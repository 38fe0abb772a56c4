use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::RegistryError;
use crate::models::{Region, RegionId, Strand};

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> std::io::Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

/// Lines that carry no region: comments, UCSC track/browser lines, blanks.
pub fn is_comment_line(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

const HEADER_CHR_NAMES: [&str; 4] = ["chr", "chrom", "chromosome", "seqnames"];
const HEADER_START_NAMES: [&str; 3] = ["start", "chromstart", "begin"];

///
/// A column header like `chr start end id` without a leading `#`.
///
/// Only known column names count; a region line with a malformed start is
/// not a header and must fail to parse instead.
///
pub fn is_header_line(line: &str) -> bool {
    let mut fields = line.split('\t').map(|f| f.trim().to_ascii_lowercase());
    let chr = fields.next().unwrap_or_default();
    let start = fields.next().unwrap_or_default();

    HEADER_CHR_NAMES.contains(&chr.as_str()) || HEADER_START_NAMES.contains(&start.as_str())
}

fn optional_field(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty() && *s != ".")
}

///
/// Parse one BED-like line into a [Region].
///
/// Columns: `chr start end [regionID [ref alt strand]]`. A missing or `.`
/// ID column falls back to `default_id`. `.` in ref/alt/strand means absent.
///
/// # Arguments
/// - line: the raw tab-separated line
/// - line_number: 1-based line number, used for error messages
/// - default_id: identity to use when the line has none
pub fn parse_region_line(
    line: &str,
    line_number: usize,
    default_id: RegionId,
) -> Result<Region, RegistryError> {
    let mut fields = line.split('\t');

    let parse_err = |message: String| RegistryError::RegionParseError {
        line: line_number,
        message,
    };

    let chr = fields
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| parse_err("missing chromosome".to_string()))?;

    let start = fields
        .next()
        .ok_or_else(|| parse_err("missing start".to_string()))?
        .trim()
        .parse::<u32>()
        .map_err(|e| parse_err(format!("bad start position: {}", e)))?;

    let end = fields
        .next()
        .ok_or_else(|| parse_err("missing end".to_string()))?
        .trim()
        .parse::<u32>()
        .map_err(|e| parse_err(format!("bad end position: {}", e)))?;

    let id = optional_field(fields.next())
        .map(RegionId::from)
        .unwrap_or(default_id);

    let ref_allele = optional_field(fields.next()).map(str::to_string);
    let alt_allele = optional_field(fields.next()).map(str::to_string);
    let strand = optional_field(fields.next())
        .map(str::parse::<Strand>)
        .transpose()?;

    Ok(Region {
        id,
        chr: chr.to_string(),
        start,
        end,
        ref_allele,
        alt_allele,
        strand,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_minimal_line() {
        let region = parse_region_line("chr1\t10\t20", 1, RegionId::from(1u64)).unwrap();
        assert_eq!(region, Region::new("1", "chr1", 10, 20));
    }

    #[rstest]
    fn test_parse_full_line() {
        let region =
            parse_region_line("chr1\t10\t11\trs42\tA\tG\t+", 1, RegionId::from(1u64)).unwrap();
        assert_eq!(region.id, RegionId::from("rs42"));
        assert_eq!(region.ref_allele.as_deref(), Some("A"));
        assert_eq!(region.alt_allele.as_deref(), Some("G"));
        assert_eq!(region.strand, Some(Strand::Forward));
    }

    #[rstest]
    fn test_parse_dot_fields() {
        let region =
            parse_region_line("chr1\t10\t11\t.\t.\tG\t.", 3, RegionId::from(3u64)).unwrap();
        assert_eq!(region.id, RegionId::from("3"));
        assert_eq!(region.ref_allele, None);
        assert_eq!(region.alt_allele.as_deref(), Some("G"));
        assert_eq!(region.strand, None);
    }

    #[rstest]
    #[case("chr1\tabc\t20")]
    #[case("chr1\t10")]
    #[case("\t10\t20")]
    fn test_parse_bad_lines(#[case] line: &str) {
        let result = parse_region_line(line, 4, RegionId::from(4u64));
        assert!(matches!(
            result,
            Err(RegistryError::RegionParseError { line: 4, .. })
        ));
    }

    #[rstest]
    #[case("# comment", true)]
    #[case("track name=x", true)]
    #[case("", true)]
    #[case("chr1\t1\t2", false)]
    fn test_is_comment_line(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_comment_line(line), expected);
    }

    #[rstest]
    fn test_is_header_line() {
        assert!(is_header_line("chr\tstart\tend\tid"));
        assert!(is_header_line("Chrom\tStart\tEnd"));
        assert!(is_header_line("seqname\tchromStart\tchromEnd"));
        assert!(!is_header_line("chr1\t100\t200"));
        assert!(!is_header_line("chr1\t1O00\t1001\tR1"));
    }
}
