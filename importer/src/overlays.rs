use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use kml::{Document, GroundOverlay, LatLonBox, Placemark};
use kmzutil::Timer;

/// Every overlay image from every KMZ is copied into this flat directory under the output
/// directory. The web server exposes it at `/extracted/overlay_images/`.
pub const OVERLAY_IMAGES: &str = "overlay_images";

/// One image for the frontend to drape over the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayRecord {
    /// The KMZ file the overlay came from, like "LTE RSRP AMBA.kmz"
    pub key: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// [south, west, north, east]. The frontend depends on this order.
    pub bounds: [f64; 4],
}

impl OverlayRecord {
    pub fn new(base_name: &str, image_url: String, bounds: &LatLonBox) -> OverlayRecord {
        OverlayRecord {
            key: format!("{}.kmz", base_name),
            image_url,
            bounds: [bounds.south, bounds.west, bounds.north, bounds.east],
        }
    }

    pub fn south(&self) -> f64 {
        self.bounds[0]
    }
    pub fn west(&self) -> f64 {
        self.bounds[1]
    }
    pub fn north(&self) -> f64 {
        self.bounds[2]
    }
    pub fn east(&self) -> f64 {
        self.bounds[3]
    }
}

/// Everything pulled out of one KMZ.
pub struct KmzOverlays {
    pub records: Vec<OverlayRecord>,
    pub placemarks: Vec<Placemark>,
    /// Records whose image wasn't in the archive
    pub missing_images: usize,
}

/// Unpacks one KMZ into `extract_to/{base_name}`, copies the images of its ground overlays into
/// the shared `extract_to/overlay_images`, and describes each overlay for the frontend.
///
/// Problems with a single overlay are logged and that overlay is skipped. An unreadable archive or
/// a missing/broken `doc.kml` fails the whole file. The caller owns removing the working
/// directory afterwards.
pub fn generate(
    kmz_path: &Path,
    base_name: &str,
    extract_to: &Path,
    api_base_url: &str,
    timer: &mut Timer,
) -> Result<KmzOverlays> {
    let kmz_extract_path = extract_to.join(base_name);
    if kmz_extract_path.exists() {
        let _ = fs_err::remove_dir_all(&kmz_extract_path);
    }
    fs_err::create_dir_all(&kmz_extract_path)?;
    let images_dir = extract_to.join(OVERLAY_IMAGES);
    fs_err::create_dir_all(&images_dir)?;

    kml::kmz::extract(kmz_path, &kmz_extract_path)?;
    let doc = Document::load_from_dir(&kmz_extract_path)?;

    let mut records = Vec::new();
    let mut missing_images = 0;
    for (idx, overlay) in doc.ground_overlays.into_iter().enumerate() {
        let result = overlay.and_then(|overlay| {
            overlay_record(
                &overlay,
                base_name,
                &kmz_extract_path,
                &images_dir,
                api_base_url,
                &mut missing_images,
                timer,
            )
        });
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => timer.warn(format!(
                "Error processing overlay {} in {}: {:#}",
                idx, base_name, err
            )),
        }
    }

    Ok(KmzOverlays {
        records,
        placemarks: doc.placemarks,
        missing_images,
    })
}

/// None means the overlay is deliberately ignored.
fn overlay_record(
    overlay: &GroundOverlay,
    base_name: &str,
    kmz_extract_path: &Path,
    images_dir: &Path,
    api_base_url: &str,
    missing_images: &mut usize,
    timer: &mut Timer,
) -> Result<Option<OverlayRecord>> {
    // Archives built on Windows sometimes use backslashes
    let href = overlay.href.replace('\\', "/");
    let dest_name = dest_image_name(base_name, &href);
    // Site overlays mark antenna locations, not coverage
    if is_site(&dest_name) {
        return Ok(None);
    }
    if !relocate_image(kmz_extract_path, &href, images_dir, &dest_name, timer)? {
        *missing_images += 1;
    }
    Ok(Some(OverlayRecord::new(
        base_name,
        image_url(api_base_url, &dest_name),
        &overlay.bounds,
    )))
}

/// Copies `extract_dir/href` to `images_dir/dest_name`, overwriting. A missing source image is
/// only a warning, and returns false; the overlay is still worth describing. Any other failure is
/// an error.
pub fn relocate_image(
    extract_dir: &Path,
    href: &str,
    images_dir: &Path,
    dest_name: &str,
    timer: &mut Timer,
) -> Result<bool> {
    let src = extract_dir.join(href);
    let dest = images_dir.join(dest_name);
    match fs_err::copy(&src, &dest) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !src.exists() => {
            timer.warn(format!("Image {} not found, so not copying it", src.display()));
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}

/// Images from different archives often share names, so prefix them with the archive's name.
/// `href` should already use forward slashes.
pub fn dest_image_name(base_name: &str, href: &str) -> String {
    let file_name = href.rsplit('/').next().unwrap_or(href);
    format!("{}_{}", base_name, file_name)
}

pub fn image_url(api_base_url: &str, dest_name: &str) -> String {
    format!("{}/extracted/{}/{}", api_base_url, OVERLAY_IMAGES, dest_name)
}

/// Case-insensitive check for "site", used to filter both whole files and individual overlays.
pub fn is_site(name: &str) -> bool {
    name.to_lowercase().contains("site")
}
