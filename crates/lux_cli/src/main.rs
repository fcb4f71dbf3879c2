//! `lux` - render a sphere scene to a PPM or PNG image.
//!
//! Run with: cargo run --release --bin lux -- --output image.ppm

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use lux_renderer::{render, write_ppm, ImageBuffer};
use lux_scene::{default_scene, SceneDescription};
use rand::rngs::StdRng;
use rand::SeedableRng;

const DEFAULT_SEED: u64 = 42;

/// Where the finished image goes.
#[derive(Debug, Clone, PartialEq)]
enum OutputTarget {
    Stdout,
    Ppm(PathBuf),
    Png(PathBuf),
}

impl OutputTarget {
    fn from_path(path: &Path) -> Self {
        let is_png = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

        if is_png {
            Self::Png(path.to_path_buf())
        } else {
            Self::Ppm(path.to_path_buf())
        }
    }

    fn write(&self, image: &ImageBuffer) -> Result<()> {
        match self {
            Self::Stdout => {
                write_ppm(image, io::stdout().lock()).context("Failed to write image to stdout")
            }
            Self::Ppm(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_ppm(image, file)
                    .with_context(|| format!("Failed to write {}", path.display()))
            }
            Self::Png(path) => image
                .save_png(path)
                .with_context(|| format!("Failed to write {}", path.display())),
        }
    }
}

/// Parsed command line.
#[derive(Debug)]
struct Options {
    scene: Option<PathBuf>,
    output: OutputTarget,
    seed: u64,
    width: Option<u32>,
    samples: Option<u32>,
    depth: Option<u32>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            scene: matches.get_one::<PathBuf>("scene").cloned(),
            output: matches
                .get_one::<PathBuf>("output")
                .map_or(OutputTarget::Stdout, |path| OutputTarget::from_path(path)),
            seed: matches
                .get_one::<u64>("seed")
                .copied()
                .unwrap_or(DEFAULT_SEED),
            width: matches.get_one::<u32>("width").copied(),
            samples: matches.get_one::<u32>("samples").copied(),
            depth: matches.get_one::<u32>("depth").copied(),
        }
    }

    /// Load the requested scene and apply command line overrides.
    fn scene_description(&self) -> Result<SceneDescription> {
        let mut desc = match &self.scene {
            Some(path) => SceneDescription::from_file(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?,
            None => {
                log::info!("No scene file given, using the built-in scene");
                default_scene()
            }
        };

        if let Some(width) = self.width {
            desc.camera.image_width = width;
        }
        if let Some(samples) = self.samples {
            desc.camera.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            desc.camera.max_depth = depth;
        }

        Ok(desc)
    }
}

fn cli() -> Command {
    Command::new("lux")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Monte Carlo path tracer for scenes of spheres")
        .arg(
            Arg::new("scene")
                .short('s')
                .long("scene")
                .value_name("FILE")
                .help("JSON scene description (defaults to the built-in scene)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output image; .png writes PNG, anything else plain PPM (default: PPM on stdout)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Random seed; the same seed reproduces the same image")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("PIXELS")
                .help("Override the image width")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .value_name("N")
                .help("Override samples per pixel")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .value_name("N")
                .help("Override the maximum bounce depth")
                .value_parser(value_parser!(u32)),
        )
}

fn run(options: &Options) -> Result<()> {
    let start = Instant::now();
    let scene = options
        .scene_description()?
        .build()
        .context("Invalid scene")?;
    log::info!("Scene built in {:?}", start.elapsed());

    let mut rng = StdRng::seed_from_u64(options.seed);
    let image = render(&scene.camera, &scene.world, &mut rng);

    options.output.write(&image)?;
    match &options.output {
        OutputTarget::Stdout => log::info!("Done"),
        OutputTarget::Ppm(path) | OutputTarget::Png(path) => {
            log::info!("Saved to {}", path.display())
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = Options::from_matches(&cli().get_matches());
    log::debug!("{:?}", options);

    run(&options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> Options {
        let matches = cli()
            .try_get_matches_from(std::iter::once("lux").chain(args.iter().copied()))
            .unwrap();
        Options::from_matches(&matches)
    }

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let opts = options(&[]);
        assert_eq!(opts.scene, None);
        assert_eq!(opts.output, OutputTarget::Stdout);
        assert_eq!(opts.seed, DEFAULT_SEED);
        assert_eq!(opts.width, None);
    }

    #[test]
    fn test_seed_falls_back_to_default() {
        let matches = cli().try_get_matches_from(["lux"]).unwrap();
        assert!(matches.get_one::<u64>("seed").is_none());
        assert_eq!(Options::from_matches(&matches).seed, DEFAULT_SEED);
    }

    #[test]
    fn test_output_format_from_extension() {
        assert_eq!(
            options(&["-o", "out.PNG"]).output,
            OutputTarget::Png(PathBuf::from("out.PNG"))
        );
        assert_eq!(
            options(&["--output", "out.ppm"]).output,
            OutputTarget::Ppm(PathBuf::from("out.ppm"))
        );
        assert_eq!(
            options(&["--output", "image"]).output,
            OutputTarget::Ppm(PathBuf::from("image"))
        );
    }

    #[test]
    fn test_overrides_apply_to_scene() {
        let opts = options(&["--width", "64", "--samples", "3", "--depth", "7", "--seed", "9"]);
        let desc = opts.scene_description().unwrap();

        assert_eq!(opts.seed, 9);
        assert_eq!(desc.camera.image_width, 64);
        assert_eq!(desc.camera.samples_per_pixel, 3);
        assert_eq!(desc.camera.max_depth, 7);
    }

    #[test]
    fn test_zero_overrides_fail_validation() {
        let opts = options(&["--samples", "0"]);
        assert!(opts.scene_description().unwrap().build().is_err());
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(cli().try_get_matches_from(["lux", "--width", "-3"]).is_err());
        assert!(cli().try_get_matches_from(["lux", "--seed", "abc"]).is_err());
    }

    #[test]
    fn test_run_writes_ppm_file() {
        let path = std::env::temp_dir().join(format!("lux_cli_test_{}.ppm", std::process::id()));
        let mut opts = options(&["--width", "8", "--samples", "1", "--depth", "2"]);
        opts.output = OutputTarget::Ppm(path.clone());

        run(&opts).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("P3"));
        assert_eq!(lines.next(), Some("8 4"));
        assert_eq!(lines.next(), Some("255"));
        assert_eq!(lines.count(), 8 * 4);
    }
}
