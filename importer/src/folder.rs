use std::path::Path;

use anyhow::Result;
use geojson::Feature;

use kmzutil::Timer;

use crate::overlays::{self, is_site};
use crate::{catalog, geojson_export, Config, Options};

/// What happened to one source folder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FolderSummary {
    /// Every .kmz file in the folder, including skipped and failed ones
    pub kmz_files: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Records produced from this folder, before deduplication against the catalog
    pub overlays: usize,
    /// Records whose image wasn't in the archive. They're still in the catalog.
    pub missing_images: usize,
    /// Size of the catalog after merging this folder in
    pub catalog_size: usize,
    /// Placemarks and overlay footprints, only collected when the GeoJSON export is on
    pub features: Vec<Feature>,
}

/// Processes every .kmz file in `folder` (not recursively), in file name order, then merges the
/// overlays found into the catalog in `extract_to`. One bad file never stops the rest.
pub fn process_folder(
    folder: &Path,
    extract_to: &Path,
    config: &Config,
    opts: &Options,
    timer: &mut Timer,
) -> Result<FolderSummary> {
    let mut file_names = Vec::new();
    for entry in fs_err::read_dir(folder)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => file_names.push(name),
            Err(name) => timer.warn(format!(
                "Skipping {:?} in {}; the name isn't UTF-8",
                name,
                folder.display()
            )),
        }
    }
    file_names.sort();

    let mut summary = FolderSummary::default();
    let mut all_overlays = Vec::new();
    let mut all_placemarks = Vec::new();

    for file_name in file_names {
        if !file_name.to_lowercase().ends_with(".kmz") {
            continue;
        }
        summary.kmz_files += 1;
        if is_site(&file_name) {
            info!("Skipping site file {}", file_name);
            summary.skipped += 1;
            continue;
        }
        let kmz_path = folder.join(&file_name);
        let base_name = match kmzutil::basename(&file_name) {
            Some(x) => x,
            None => {
                summary.skipped += 1;
                continue;
            }
        };

        info!("Processing {}", file_name);
        timer.start(format!("process {}", file_name));
        match overlays::generate(
            &kmz_path,
            &base_name,
            extract_to,
            &config.api_base_url,
            timer,
        ) {
            Ok(result) => {
                info!(
                    "Generated {} overlays for {}",
                    result.records.len(),
                    file_name
                );
                summary.missing_images += result.missing_images;
                all_overlays.extend(result.records);
                all_placemarks.extend(result.placemarks);
            }
            Err(err) => {
                summary.failed += 1;
                timer.warn(format!(
                    "Error generating overlays for {}: {:#}",
                    file_name, err
                ));
            }
        }
        timer.stop(format!("process {}", file_name));

        // Keep the output directory clean; only the shared images stay around
        let _ = fs_err::remove_dir_all(extract_to.join(&base_name));
    }

    summary.overlays = all_overlays.len();
    if opts.geojson {
        summary.features = geojson_export::to_features(&all_overlays, &all_placemarks);
    }
    summary.catalog_size = catalog::merge_into_file(extract_to, all_overlays, timer)?;
    Ok(summary)
}
