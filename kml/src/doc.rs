use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The parts of a KML document we understand, pulled out of the XML tree up front. Elements are
/// matched by local tag name, so documents with or without the KML namespace behave the same.
pub struct Document {
    /// Every `GroundOverlay`, in document order. Overlays with a missing or malformed field are
    /// kept as errors, so callers can report and skip them individually.
    pub ground_overlays: Vec<Result<GroundOverlay>>,
    /// Every `Placemark` with a usable `Point`, in document order.
    pub placemarks: Vec<Placemark>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroundOverlay {
    /// The `Icon/href` exactly as written, usually a path relative to the archive root.
    pub href: String,
    pub bounds: LatLonBox,
}

/// In degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLonBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> LonLat {
        LonLat {
            longitude,
            latitude,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Placemark {
    pub name: Option<String>,
    pub pt: LonLat,
}

/// An extracted archive didn't have `doc.kml` at its root.
#[derive(Debug)]
pub struct MissingDocument {
    pub dir: PathBuf,
}

impl fmt::Display for MissingDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no {} found in {}", crate::DOC_KML, self.dir.display())
    }
}

impl std::error::Error for MissingDocument {}

impl Document {
    /// Loads `doc.kml` from the root of an extracted KMZ. If it's absent, the error wraps
    /// `MissingDocument`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Document> {
        let dir = dir.as_ref();
        let path = dir.join(crate::DOC_KML);
        if !path.is_file() {
            return Err(MissingDocument {
                dir: dir.to_path_buf(),
            }
            .into());
        }
        Document::load(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Document> {
        let path = path.as_ref();
        let bytes = fs_err::read(path)?;
        let raw_string = std::str::from_utf8(&bytes)
            .with_context(|| format!("{} isn't UTF-8", path.display()))?;
        Document::parse(raw_string).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(raw_string: &str) -> Result<Document> {
        let tree = roxmltree::Document::parse(raw_string)?;

        let mut ground_overlays = Vec::new();
        let mut placemarks = Vec::new();
        for node in tree.root().descendants() {
            match node.tag_name().name() {
                "GroundOverlay" if node.is_element() => {
                    ground_overlays.push(parse_ground_overlay(node));
                }
                "Placemark" if node.is_element() => {
                    if let Some(placemark) = parse_placemark(node) {
                        placemarks.push(placemark);
                    }
                }
                _ => {}
            }
        }

        Ok(Document {
            ground_overlays,
            placemarks,
        })
    }
}

fn child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|c| c.text())
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
}

fn parse_ground_overlay(node: roxmltree::Node) -> Result<GroundOverlay> {
    let href = child(node, "Icon")
        .and_then(|icon| child_text(icon, "href"))
        .ok_or_else(|| anyhow!("missing Icon/href"))?
        .to_string();

    let latlon = child(node, "LatLonBox").ok_or_else(|| anyhow!("missing LatLonBox"))?;
    let bound = |name: &str| -> Result<f64> {
        let text =
            child_text(latlon, name).ok_or_else(|| anyhow!("missing LatLonBox/{}", name))?;
        // nan and inf parse fine, but have no place in a bounding box or in JSON
        text.parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| anyhow!("LatLonBox/{} isn't a number: {}", name, text))
    };

    Ok(GroundOverlay {
        href,
        bounds: LatLonBox {
            north: bound("north")?,
            south: bound("south")?,
            east: bound("east")?,
            west: bound("west")?,
        },
    })
}

fn parse_placemark(node: roxmltree::Node) -> Option<Placemark> {
    let coordinates = child(node, "Point").and_then(|pt| child_text(pt, "coordinates"))?;
    let pt = parse_pt(coordinates)?;
    Some(Placemark {
        name: child(node, "name")
            .and_then(|n| n.text())
            .map(|x| x.to_string()),
        pt,
    })
}

fn parse_pt(input: &str) -> Option<LonLat> {
    let coords: Vec<&str> = input.split(',').collect();
    // Usually (lon, lat), but sometimes there's a third altitude component. Just ignore it.
    if coords.len() < 2 {
        return None;
    }
    match (coords[0].trim().parse::<f64>(), coords[1].trim().parse::<f64>()) {
        (Ok(lon), Ok(lat)) if lon.is_finite() && lat.is_finite() => {
            Some(LonLat::new(lon, lat))
        }
        _ => None,
    }
}
