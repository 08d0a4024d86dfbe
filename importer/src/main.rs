use std::path::PathBuf;

use anyhow::Result;
use structopt::StructOpt;

use importer::{Config, Options};

#[derive(StructOpt)]
#[structopt(
    name = "coverage_importer",
    about = "Extracts ground overlays from folders of KMZ files for the coverage map"
)]
struct Flags {
    /// Where to write overlay_images/ and coverage_overlays.json. Defaults to extracted/ next to
    /// this executable.
    #[structopt(long, parse(from_os_str))]
    extract_to: Option<PathBuf>,
    /// Also write consolidated_data.geojson, with placemarks and the footprint of every overlay.
    #[structopt(long)]
    geojson: bool,
}

fn main() -> Result<()> {
    let flags = Flags::from_args();
    kmzutil::logger::setup();

    // Fail on missing configuration before touching the filesystem
    let config = Config::from_env()?;
    let extract_to = match flags.extract_to {
        Some(dir) => dir,
        None => importer::default_extract_to()?,
    };
    importer::run(
        &config,
        &extract_to,
        &Options {
            geojson: flags.geojson,
        },
    )?;
    Ok(())
}
