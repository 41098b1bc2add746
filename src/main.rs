use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use zonemerge::codec::{self, Decoded};
use zonemerge::config::FileConfig;
use zonemerge::domain::ShapeSet;
use zonemerge::geometry::zoom_for_radius;
use zonemerge::overlay::{Driver, Resolver, Step};

const DEFAULT_DOCUMENT: &str = "zones.json";

/// Merge overlapping inside/outside zones stored in a feature-collection document
///
/// Examples:
///   # Add an inside zone of 250m and merge it with whatever it overlaps
///   zonemerge -d zones.json --lat 52.52 --lon 13.405 -r 250
///
///   # Add an exclusion zone, performing only a single merge
///   zonemerge -d zones.json --lat 52.521 --lon 13.41 -r 80 --outside --single-step
///
///   # Flip a zone between inside and outside, then re-converge
///   zonemerge -d zones.json --toggle-inside 7
#[derive(Parser, Debug)]
#[command(name = "zonemerge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches zonemerge.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document to load; a missing file starts an empty set
    #[arg(short = 'd', long)]
    document: Option<PathBuf>,

    /// Where to save the result (defaults to the loaded document)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Latitude of a new zone or marker (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of a new zone or marker (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Radius of the new zone in meters
    #[arg(short = 'r', long, default_value = "100.0")]
    radius: f64,

    /// Tag the new zone as outside the area of interest
    #[arg(long)]
    outside: bool,

    /// Place a marker at --lat/--lon instead of a zone
    #[arg(long, conflicts_with = "outside")]
    marker: bool,

    /// Flip the inside flag of an existing zone
    #[arg(long)]
    toggle_inside: Option<u64>,

    /// Flip the visibility of an existing zone
    #[arg(long)]
    toggle_visible: Option<u64>,

    /// Delete a zone or marker by id
    #[arg(long)]
    remove: Option<u64>,

    /// Perform at most one merge instead of converging
    #[arg(long)]
    single_step: bool,

    /// Vertices used to approximate each circle
    #[arg(long)]
    circle_steps: Option<usize>,

    /// Maximum merges when converging
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print the suggested map zoom level for --radius
    #[arg(long)]
    zoom: bool,

    /// Write the resulting document to stdout as well
    #[arg(long)]
    print: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    )
    .init();

    let circle_steps = args.circle_steps.unwrap_or(file_config.circle_steps);
    let max_steps = args.max_steps.unwrap_or(file_config.max_steps);
    if circle_steps < 3 {
        bail!("--circle-steps must be at least 3, got {}", circle_steps);
    }

    let document = args.document.clone().or(file_config.document.clone());
    let output = args
        .output
        .clone()
        .or_else(|| document.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT));

    let Decoded {
        shapes: mut set,
        mut circle_count,
        earned_reward,
    } = match document {
        Some(ref path) if path.exists() => {
            let loaded = codec::load(path)?;
            log::info!(
                "Loaded {} ({} circles, {} regions, {} markers)",
                path.display(),
                loaded.shapes.circles().len(),
                loaded.shapes.regions().len(),
                loaded.shapes.markers().len()
            );
            loaded
        }
        _ => Decoded {
            shapes: ShapeSet::new(),
            circle_count: 0,
            earned_reward: false,
        },
    };

    if let Some(id) = args.remove {
        if !set.remove_by_id(id) {
            bail!("No zone or marker with id {}", id);
        }
        println!("Removed {}", id);
    }
    if let Some(id) = args.toggle_inside {
        let shape = set.toggle_inside(id)?;
        println!(
            "Zone {} is now {}",
            id,
            if shape.inside() { "inside" } else { "outside" }
        );
    }
    if let Some(id) = args.toggle_visible {
        let shape = set.toggle_visible(id)?;
        println!(
            "Zone {} is now {}",
            id,
            if shape.visible() { "visible" } else { "hidden" }
        );
    }

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        if args.marker {
            let id = set.add_marker(lat, lon)?;
            println!("Added marker {} at ({:.5}, {:.5})", id, lat, lon);
        } else {
            let id = set.add_circle((lat, lon), args.radius, !args.outside)?;
            circle_count += 1;
            println!(
                "Added {} zone {} at ({:.5}, {:.5}), radius {}m",
                if args.outside { "outside" } else { "inside" },
                id,
                lat,
                lon,
                args.radius
            );
        }
    }

    if args.zoom {
        println!("Suggested zoom: {}", zoom_for_radius(args.radius));
    }

    let driver = Driver::new(Resolver::default().with_steps(circle_steps));
    let spinner = create_spinner("Merging overlapping zones...");
    let start = Instant::now();

    let merges = if args.single_step {
        match driver.converge_one_step(&mut set) {
            Step::Merged(merge) => {
                log::debug!("{:?}", merge);
                1
            }
            Step::Unchanged => 0,
        }
    } else {
        let result = driver.converge(&mut set, max_steps);
        if !result.converged {
            log::warn!(
                "Stopped after {} merges with overlaps remaining; run again to continue",
                result.steps
            );
        }
        result.steps
    };

    spinner.finish_with_message(format!(
        "Performed {} merge(s) [{:.1}s]",
        merges,
        start.elapsed().as_secs_f32()
    ));

    if verbose {
        for shape in set.shapes() {
            println!(
                "  {} {}: {}{}",
                shape.kind(),
                shape.id(),
                if shape.inside() { "inside" } else { "outside" },
                if shape.visible() { "" } else { " (hidden)" }
            );
        }
    }

    codec::save(&output, &set, circle_count, earned_reward)
        .context("Failed to save document")?;

    if args.print {
        let json = codec::encode_string(&set, circle_count, earned_reward)
            .context("Failed to encode document")?;
        println!("{}", json);
    }

    println!();
    println!(
        "{} circles, {} regions, {} markers -> {}",
        set.circles().len(),
        set.regions().len(),
        set.markers().len(),
        output.display()
    );
    println!("Done! Total time: {:.1}s", total_start.elapsed().as_secs_f32());

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
