use std::error::Error;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;
use vidi_shp_import::i18n::Locale;
use vidi_shp_import::measure::AreaMode;
use vidi_shp_import::output::Output;
use vidi_shp_import::{import, ImportConfig};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "vidi-shp2json",
    about = "Convert a zipped shapefile into enriched GeoJSON features"
)]
struct Opt {
    /// Zip archive containing one or more shapefiles
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Locale of messages and measurements (en_US, da_DK)
    #[structopt(short, long, default_value = "en_US")]
    locale: Locale,

    /// Write a single FeatureCollection instead of one feature per line
    #[structopt(short, long)]
    geojson: bool,

    /// Subtract holes from polygon areas
    #[structopt(long)]
    subtract_holes: bool,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let opt = Opt::from_args();

    let mut config = ImportConfig::default();
    config.display.locale = opt.locale;
    if opt.subtract_holes {
        config.display.area_mode = AreaMode::SubtractHoles;
    }

    let layers = import(&opt.input, config)?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    if opt.geojson {
        layers.write_geojson(&mut writer)?;
    } else {
        layers.write_json_lines(&mut writer)?;
    }
    Ok(())
}
