//! Reads the parts of KMZ archives that the coverage tools care about: ground overlays (an image
//! draped over a lat/lon box) and point placemarks.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod doc;
pub mod kmz;

pub use crate::doc::{Document, GroundOverlay, LatLonBox, LonLat, MissingDocument, Placemark};

/// The name of the KML document expected at the root of every KMZ archive.
pub const DOC_KML: &str = "doc.kml";
