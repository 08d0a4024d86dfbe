//! A KMZ is just a zip archive holding `doc.kml` and whatever images it references.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Unpacks every entry of the archive into `dest`, creating it if needed. Existing files with the
/// same names are overwritten; clearing out stale contents is up to the caller. Entries whose
/// names would escape `dest` are rejected.
pub fn extract<P1: AsRef<Path>, P2: AsRef<Path>>(kmz_path: P1, dest: P2) -> Result<()> {
    let kmz_path = kmz_path.as_ref();
    let dest = dest.as_ref();

    let file = fs_err::File::open(kmz_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("{} isn't a readable KMZ archive", kmz_path.display()))?;
    fs_err::create_dir_all(dest)?;
    archive
        .extract(dest)
        .with_context(|| format!("unpacking {} into {}", kmz_path.display(), dest.display()))?;

    debug!(
        "Unpacked {} entries from {} into {}",
        archive.len(),
        kmz_path.display(),
        dest.display()
    );
    Ok(())
}

/// Packs `(name, contents)` entries into a new archive, overwriting `kmz_path`. Only used to build
/// test fixtures.
#[doc(hidden)]
pub fn write<P: AsRef<Path>>(kmz_path: P, entries: &[(&str, &[u8])]) -> Result<()> {
    let file = fs_err::File::create(kmz_path.as_ref())?;
    let mut zip = zip::ZipWriter::new(file);
    for (name, bytes) in entries {
        zip.start_file(*name, zip::write::FileOptions::default())?;
        zip.write_all(bytes)?;
    }
    zip.finish()?;
    Ok(())
}
