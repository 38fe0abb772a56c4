use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;

use crate::errors::RegistryError;
use crate::models::{Coordinates, Region, RegionId};
use crate::utils::{get_dynamic_reader, is_comment_line, is_header_line, parse_region_line};

///
/// RegionRegistry struct, the ordered set of regions in one submission.
///
/// Construction validates the submission once: every region must satisfy
/// `start < end`, IDs must be unique, and no two regions may share the same
/// `(chr, start, end)`. The last rule keeps coordinate joins unambiguous;
/// intersection queries only return coordinates, and a join that could hit
/// two regions would attribute data to the wrong one.
///
#[derive(Clone, Debug, Default)]
pub struct RegionRegistry {
    regions: Vec<Region>,
    by_id: FxHashMap<RegionId, usize>,
    by_coordinates: FxHashMap<Coordinates, usize>,
    pub path: Option<PathBuf>,
}

impl TryFrom<Vec<Region>> for RegionRegistry {
    type Error = RegistryError;

    fn try_from(regions: Vec<Region>) -> Result<Self, Self::Error> {
        let mut by_id: FxHashMap<RegionId, usize> = FxHashMap::default();
        let mut by_coordinates: FxHashMap<Coordinates, usize> = FxHashMap::default();

        for (idx, region) in regions.iter().enumerate() {
            if region.start >= region.end {
                return Err(RegistryError::InvalidInterval {
                    id: region.id.clone(),
                    start: region.start,
                    end: region.end,
                });
            }

            if by_id.insert(region.id.clone(), idx).is_some() {
                return Err(RegistryError::DuplicateRegionId(region.id.clone()));
            }

            if let Some(first) = by_coordinates.insert(region.coordinates(), idx) {
                return Err(RegistryError::DuplicateCoordinates {
                    first: regions[first].id.clone(),
                    second: region.id.clone(),
                    coordinates: region.coordinates(),
                });
            }
        }

        Ok(RegionRegistry {
            regions,
            by_id,
            by_coordinates,
            path: None,
        })
    }
}

impl TryFrom<&Path> for RegionRegistry {
    type Error = RegistryError;

    ///
    /// Create a new [RegionRegistry] from a BED-like file.
    ///
    /// # Arguments:
    /// - value: path to the file on disk, optionally gzipped.
    fn try_from(value: &Path) -> Result<Self, Self::Error> {
        let reader = get_dynamic_reader(value).map_err(|e| {
            RegistryError::FileReadError(format!("{}: {}", value.display(), e))
        })?;

        let mut regions: Vec<Region> = Vec::new();
        let mut first_line = true;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if is_comment_line(&line) {
                continue;
            }

            // column headers like `chr start end id` without #
            if first_line {
                first_line = false;
                if is_header_line(&line) {
                    continue;
                }
            }

            let default_id = RegionId::from((regions.len() + 1) as u64);
            regions.push(parse_region_line(&line, idx + 1, default_id)?);
        }

        if regions.is_empty() {
            return Err(RegistryError::EmptyRegistry(value.display().to_string()));
        }

        let mut registry = RegionRegistry::try_from(regions)?;
        registry.path = Some(value.to_path_buf());

        Ok(registry)
    }
}

impl TryFrom<&str> for RegionRegistry {
    type Error = RegistryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        RegionRegistry::try_from(Path::new(value))
    }
}

impl RegionRegistry {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> {
        self.regions.iter()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.position(id).map(|idx| &self.regions[idx])
    }

    /// Position of a region in submission order.
    pub fn position(&self, id: &RegionId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &RegionId) -> bool {
        self.by_id.contains_key(id)
    }

    ///
    /// Find the region with exactly these coordinates.
    ///
    /// Coordinates are unique per registry, so at most one region matches.
    ///
    pub fn find_by_coordinates(&self, coords: &Coordinates) -> Option<&Region> {
        self.by_coordinates
            .get(coords)
            .map(|&idx| &self.regions[idx])
    }
}

impl<'a> IntoIterator for &'a RegionRegistry {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data")
            .join(file_name)
    }

    #[fixture]
    fn regions() -> Vec<Region> {
        vec![
            Region::new("r1", "chr1", 100, 101),
            Region::new("r2", "chr1", 200, 201),
            Region::new("r3", "chr2", 100, 101),
        ]
    }

    #[rstest]
    fn test_registry_from_vec(regions: Vec<Region>) {
        let registry = RegionRegistry::try_from(regions).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.position(&RegionId::from("r2")), Some(1));
        assert_eq!(registry.get(&RegionId::from("r3")).unwrap().chr, "chr2");
        assert!(!registry.contains(&RegionId::from("r4")));
    }

    #[rstest]
    fn test_find_by_coordinates(regions: Vec<Region>) {
        let registry = RegionRegistry::try_from(regions).unwrap();
        let found = registry.find_by_coordinates(&Coordinates::new("chr1", 200, 201));
        assert_eq!(found.map(|r| r.id.clone()), Some(RegionId::from("r2")));
        assert!(
            registry
                .find_by_coordinates(&Coordinates::new("chr1", 200, 202))
                .is_none()
        );
    }

    #[rstest]
    fn test_duplicate_id(mut regions: Vec<Region>) {
        regions.push(Region::new("r1", "chr5", 1, 2));
        assert!(matches!(
            RegionRegistry::try_from(regions),
            Err(RegistryError::DuplicateRegionId(_))
        ));
    }

    #[rstest]
    fn test_duplicate_coordinates(mut regions: Vec<Region>) {
        regions.push(Region::new("r4", "chr1", 100, 101));
        match RegionRegistry::try_from(regions) {
            Err(RegistryError::DuplicateCoordinates { first, second, .. }) => {
                assert_eq!(first, RegionId::from("r1"));
                assert_eq!(second, RegionId::from("r4"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    #[case(100, 100)]
    #[case(101, 100)]
    fn test_invalid_interval(#[case] start: u32, #[case] end: u32) {
        let result = RegionRegistry::try_from(vec![Region::new("bad", "chr1", start, end)]);
        assert!(matches!(result, Err(RegistryError::InvalidInterval { .. })));
    }

    #[rstest]
    fn test_empty_vec_is_valid() {
        let registry = RegionRegistry::try_from(Vec::new()).unwrap();
        assert!(registry.is_empty());
    }

    #[rstest]
    fn test_open_from_path() {
        let registry = RegionRegistry::try_from(get_test_path("regions.bed").as_path()).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.regions()[0].id, RegionId::from("R1"));
        assert_eq!(registry.regions()[3].id, RegionId::from("R4"));
    }

    #[rstest]
    fn test_open_with_header_and_default_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.bed");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "chrom\tstart\tend").unwrap();
        writeln!(file, "# a comment").unwrap();
        writeln!(file, "chr1\t10\t11").unwrap();
        writeln!(file, "chr1\t20\t21").unwrap();

        let registry = RegionRegistry::try_from(path.as_path()).unwrap();
        let ids: Vec<String> = registry.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(registry.path, Some(path));
    }

    #[rstest]
    fn test_malformed_first_line_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("typo.bed");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "chr1\t1O00\t1001\tR1").unwrap();
        writeln!(file, "chr1\t2000\t2001\tR2").unwrap();

        assert!(matches!(
            RegionRegistry::try_from(path.as_path()),
            Err(RegistryError::RegionParseError { line: 1, .. })
        ));
    }

    #[rstest]
    fn test_open_bed_gz() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("variants.bed.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(encoder, "chr3\t5\t6\tv1\tC\tT\t+").unwrap();
        encoder.finish().unwrap();

        let registry = RegionRegistry::try_from(path.as_path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.regions()[0].alt_allele.as_deref(), Some("T"));
    }

    #[rstest]
    fn test_open_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.bed");
        File::create(&path).unwrap();
        assert!(matches!(
            RegionRegistry::try_from(path.as_path()),
            Err(RegistryError::EmptyRegistry(_))
        ));
    }

    #[rstest]
    fn test_open_missing_file() {
        assert!(matches!(
            RegionRegistry::try_from("does/not/exist.bed"),
            Err(RegistryError::FileReadError(_))
        ));
    }
}
