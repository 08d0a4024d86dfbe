//! Turns folders of KMZ coverage maps into the overlay catalog the web frontend draws from:
//! `overlay_images/` plus `coverage_overlays.json`, both in one output directory.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use kmzutil::{prettyprint_usize, Timer};

pub use crate::catalog::{catalog_path, Catalog, CATALOG_FILENAME};
pub use crate::configuration::Config;
pub use crate::folder::{process_folder, FolderSummary};
pub use crate::overlays::{OverlayRecord, OVERLAY_IMAGES};

pub mod catalog;
mod configuration;
mod folder;
pub mod geojson_export;
pub mod overlays;

#[cfg(test)]
mod testutil;

/// Optional work beyond the catalog.
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Also write `consolidated_data.geojson` with placemarks and overlay footprints.
    pub geojson: bool,
}

/// `extracted/` next to the running executable.
pub fn default_extract_to() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("finding the running executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", exe.display()))?;
    Ok(dir.join("extracted"))
}

/// Processes every configured folder, in order, into the same output directory. Folders that
/// don't exist are skipped with a warning.
pub fn run(config: &Config, extract_to: &Path, opts: &Options) -> Result<Vec<FolderSummary>> {
    let mut timer = Timer::new("update KMZ overlays");
    fs_err::create_dir_all(extract_to)?;
    info!(
        "APP_ENV={} | folders={:?} | extract_to={}",
        config.app_env,
        config.folders,
        extract_to.display()
    );

    let mut summaries = Vec::new();
    let mut features = Vec::new();
    for folder in &config.folders {
        if !folder.is_dir() {
            timer.warn(format!(
                "{} isn't a valid directory, skipping it",
                folder.display()
            ));
            continue;
        }
        timer.start(format!("process folder {}", folder.display()));
        let mut summary = process_folder(folder, extract_to, config, opts, &mut timer)?;
        timer.stop(format!("process folder {}", folder.display()));
        timer.note(format!(
            "{}: {} KMZ files ({} skipped, {} failed), {} overlays ({} missing their image)",
            folder.display(),
            prettyprint_usize(summary.kmz_files),
            prettyprint_usize(summary.skipped),
            prettyprint_usize(summary.failed),
            prettyprint_usize(summary.overlays),
            prettyprint_usize(summary.missing_images)
        ));
        features.append(&mut summary.features);
        summaries.push(summary);
    }

    // After every catalog merge, and never fatal
    if opts.geojson {
        let num_features = features.len();
        match geojson_export::write(extract_to, features) {
            Ok(path) => info!(
                "Wrote {} features to {}",
                prettyprint_usize(num_features),
                path.display()
            ),
            Err(err) => timer.warn(format!("Couldn't write the GeoJSON export: {:#}", err)),
        }
    }

    info!("Done");
    Ok(summaries)
}
