pub fn ground_overlay(href: &str, north: &str, south: &str, east: &str, west: &str) -> String {
    format!(
        "<GroundOverlay><Icon><href>{}</href></Icon><LatLonBox>\
         <north>{}</north><south>{}</south><east>{}</east><west>{}</west>\
         </LatLonBox></GroundOverlay>",
        href, north, south, east, west
    )
}

pub fn kml_doc(features: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <kml xmlns=\"http://www.opengis.net/kml/2.2\"><Document><Folder>{}</Folder></Document></kml>",
        features.concat()
    )
}
