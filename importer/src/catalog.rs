use std::path::{Path, PathBuf};

use anyhow::Result;

use kmzutil::{prettyprint_usize, Timer};

use crate::overlays::OverlayRecord;

pub const CATALOG_FILENAME: &str = "coverage_overlays.json";

pub fn catalog_path(extract_to: &Path) -> PathBuf {
    extract_to.join(CATALOG_FILENAME)
}

/// The JSON list of overlays served to the frontend. It accumulates across runs.
#[derive(Debug, Default, PartialEq)]
pub struct Catalog {
    pub records: Vec<OverlayRecord>,
}

impl Catalog {
    /// A missing file is an empty catalog. So is a file that can't be read or parsed; that's only
    /// a warning, and the old contents will be lost when the catalog is saved.
    pub fn load(path: &Path, timer: &mut Timer) -> Catalog {
        if !path.exists() {
            return Catalog::default();
        }
        match kmzutil::read_json::<_, Vec<OverlayRecord>>(path) {
            Ok(records) => Catalog { records },
            Err(err) => {
                timer.warn(format!(
                    "Couldn't read the existing overlays ({:#}), so they'll be overwritten",
                    err
                ));
                Catalog::default()
            }
        }
    }

    /// Appends every new record that isn't an exact copy of one already in the catalog. Returns
    /// the number appended.
    ///
    /// Only the records present before this call are compared against, so duplicates within `new`
    /// all get appended. Two records for the same overlay with different image URLs are both kept.
    pub fn merge(&mut self, new: Vec<OverlayRecord>) -> usize {
        let num_existing = self.records.len();
        let mut appended = 0;
        for record in new {
            if !self.records[..num_existing].contains(&record) {
                self.records.push(record);
                appended += 1;
            }
        }
        appended
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        kmzutil::write_json(path, &self.records)
    }
}

/// Loads the catalog in `extract_to`, merges in the new records, and overwrites it. Returns the
/// size of the resulting catalog.
pub fn merge_into_file(
    extract_to: &Path,
    new: Vec<OverlayRecord>,
    timer: &mut Timer,
) -> Result<usize> {
    let path = catalog_path(extract_to);
    let mut catalog = Catalog::load(&path, timer);
    let appended = catalog.merge(new);
    catalog.save(&path)?;
    timer.note(format!(
        "Saved {} overlays to {} ({} new)",
        prettyprint_usize(catalog.records.len()),
        path.display(),
        prettyprint_usize(appended)
    ));
    Ok(catalog.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, url: &str, bounds: [f64; 4]) -> OverlayRecord {
        OverlayRecord {
            key: key.to_string(),
            image_url: url.to_string(),
            bounds,
        }
    }

    #[test]
    fn merge_skips_exact_copies_only() {
        let a = record("a.kmz", "http://x/a_img.png", [1.0, 2.0, 3.0, 4.0]);
        let b = record("b.kmz", "http://x/b_img.png", [1.0, 2.0, 3.0, 4.0]);
        let a_moved = record("a.kmz", "http://y/a_img.png", [1.0, 2.0, 3.0, 4.0]);

        let mut catalog = Catalog {
            records: vec![a.clone()],
        };
        assert_eq!(catalog.merge(vec![a.clone(), b.clone(), a_moved.clone()]), 2);
        assert_eq!(catalog.records, vec![a.clone(), b.clone(), a_moved]);

        // Running again changes nothing
        assert_eq!(catalog.merge(vec![a, b]), 0);
        assert_eq!(catalog.records.len(), 3);
    }

    #[test]
    fn merge_keeps_duplicates_within_one_batch() {
        let a = record("a.kmz", "http://x/a_img.png", [1.0, 2.0, 3.0, 4.0]);
        let mut catalog = Catalog::default();
        assert_eq!(catalog.merge(vec![a.clone(), a]), 2);
    }

    #[test]
    fn load_existing_catalog_with_integer_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(dir.path());
        std::fs::write(
            &path,
            r#"[{"key": "a.kmz", "imageUrl": "http://x/a_img.png", "bounds": [1, 2, 3, 4]}]"#,
        )
        .unwrap();

        let mut timer = Timer::throwaway();
        let mut catalog = Catalog::load(&path, &mut timer);
        assert_eq!(timer.num_warnings(), 0);
        assert_eq!(
            catalog.merge(vec![record(
                "a.kmz",
                "http://x/a_img.png",
                [1.0, 2.0, 3.0, 4.0]
            )]),
            0
        );
    }

    #[test]
    fn corrupt_catalog_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(catalog_path(dir.path()), "{ not json").unwrap();

        let mut timer = Timer::throwaway();
        let size = merge_into_file(
            dir.path(),
            vec![record("a.kmz", "u", [0.0, 0.0, 1.0, 1.0])],
            &mut timer,
        )
        .unwrap();
        assert_eq!(size, 1);
        assert_eq!(timer.num_warnings(), 1);

        let saved: Vec<OverlayRecord> = kmzutil::read_json(catalog_path(dir.path())).unwrap();
        assert_eq!(saved, vec![record("a.kmz", "u", [0.0, 0.0, 1.0, 1.0])]);
    }

    #[test]
    fn saved_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_path(dir.path());
        Catalog {
            records: vec![record(
                "Córdoba.kmz",
                "/extracted/overlay_images/Córdoba_a.png",
                [-31.5, -64.5, -31.0, -64.0],
            )],
        }
        .save(&path)
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"[
  {
    "key": "Córdoba.kmz",
    "imageUrl": "/extracted/overlay_images/Córdoba_a.png",
    "bounds": [
      -31.5,
      -64.5,
      -31.0,
      -64.0
    ]
  }
]"#
        );
    }
}
