use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use depthcam::field::{self, ScalarField};
use depthcam::output::write_field;
use depthcam::pseudo::{self, ProcessingMode, PseudoColorConfig};

#[derive(Parser, Debug)]
#[command(name = "depthcam")]
#[command(about = "False-color visualization of depth and luminance maps")]
struct Args {
    /// Input: text grid (.txt, .grid) or an image
    input: PathBuf,

    /// Output file (.png, anything else is written as raw f32 RGBA)
    #[arg(short, long)]
    output: PathBuf,

    /// Balance between linear (0.0) and smoothstep (1.0) interpolation
    #[arg(long)]
    smoothness: Option<f32>,

    /// Five comma-separated colors, e.g. 0xFF00FF,0x0000FF,0x00FF00,0xFF00FF,0x00FFFF
    #[arg(long)]
    colors: Option<String>,

    /// JSON palette file, takes precedence over --colors
    #[arg(long)]
    palette: Option<PathBuf>,

    /// Contrast applied around 0.5 before mapping
    #[arg(long)]
    contrast: Option<f32>,

    /// Rescale input to its own min/max before mapping
    #[arg(long)]
    normalize: bool,

    /// Map on a single thread
    #[arg(long, conflicts_with = "threads")]
    sequential: bool,

    /// Worker threads for mapping
    #[arg(long)]
    threads: Option<usize>,
}

impl Args {
    fn palette(&self) -> Result<PseudoColorConfig> {
        let mut config = if let Some(path) = &self.palette {
            pseudo::load_palette(path)?
        } else if let Some(list) = &self.colors {
            let colors = pseudo::parse_hex_palette(list)?;
            PseudoColorConfig::new(&colors, PseudoColorConfig::default().smoothness())?
        } else {
            PseudoColorConfig::default()
        };

        if let Some(smoothness) = self.smoothness {
            config = config.with_smoothness(smoothness);
        }
        if !(0.0..=1.0).contains(&config.smoothness()) {
            log::warn!(
                "smoothness {} is outside [0, 1], candidates will be extrapolated",
                config.smoothness()
            );
        }
        Ok(config)
    }

    fn mode(&self) -> ProcessingMode {
        match (self.sequential, self.threads) {
            (true, _) => ProcessingMode::Sequential,
            (false, Some(n)) => ProcessingMode::ParallelWith(n),
            (false, None) => ProcessingMode::Parallel,
        }
    }
}

fn is_text_grid(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("grid"))
}

fn load_input(path: &Path) -> Result<ScalarField> {
    if is_text_grid(path) {
        return Ok(field::load_grid(path)?);
    }

    let img = image::open(path)
        .with_context(|| format!("Cannot decode image {}", path.display()))?
        .to_rgb32f();
    let (width, height) = img.dimensions();
    let pixels: Vec<[f32; 3]> = img.pixels().map(|p| p.0).collect();
    Ok(field::luminance_field(
        width as usize,
        height as usize,
        &pixels,
    )?)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.palette()?;

    let mut scalar = load_input(&args.input)?;
    println!(
        "Loaded field: {}x{}, value range: {:?}",
        scalar.width(),
        scalar.height(),
        scalar.value_bounds()
    );

    if args.normalize {
        scalar = field::auto_normalize(&scalar);
    }
    if let Some(contrast) = args.contrast {
        scalar = field::apply_contrast(&scalar, contrast);
    }

    let rgba = pseudo::map_with(&scalar, &config, args.mode())
        .with_context(|| format!("Cannot map {}", args.input.display()))?;

    write_field(&rgba, &args.output)
        .with_context(|| format!("Cannot write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use depthcam::pseudo::{Color, PaletteFile};
    use std::io::Write;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["depthcam", "depth.txt", "-o", "out.png"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn palette_file(config: &PseudoColorConfig) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&PaletteFile::from(config)).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    // ==================== Palette Selection ====================

    #[test]
    fn test_default_palette_without_options() {
        let config = parse(&[]).palette().unwrap();
        assert_eq!(config, PseudoColorConfig::default());
    }

    #[test]
    fn test_colors_option() {
        let args = parse(&["--colors", "0x000000,0x000000,0x000000,0x000000,0xFFFFFF"]);
        let config = args.palette().unwrap();

        assert_eq!(config.color(0), Some(Color::rgb(0.0, 0.0, 0.0)));
        assert_eq!(config.color(4), Some(Color::rgb(1.0, 1.0, 1.0)));
        assert_eq!(config.smoothness(), 0.5);
    }

    #[test]
    fn test_colors_option_wrong_count() {
        let args = parse(&["--colors", "0xFF00FF,0x0000FF,0x00FF00,0xFF00FF"]);
        assert!(args.palette().is_err());
    }

    #[test]
    fn test_palette_file_wins_over_colors() {
        let from_file = PseudoColorConfig::from_colors([Color::GREEN; 5], 0.25);
        let file = palette_file(&from_file);
        let path = file.path().to_str().unwrap();

        let args = parse(&[
            "--palette",
            path,
            "--colors",
            "0x0000FF,0x0000FF,0x0000FF,0x0000FF,0x0000FF",
        ]);
        assert_eq!(args.palette().unwrap(), from_file);
    }

    #[test]
    fn test_smoothness_overrides_palette_file() {
        let from_file = PseudoColorConfig::from_colors([Color::CYAN; 5], 0.25);
        let file = palette_file(&from_file);
        let path = file.path().to_str().unwrap();

        let config = parse(&["--palette", path, "--smoothness", "0.9"])
            .palette()
            .unwrap();
        assert_eq!(config.smoothness(), 0.9);
        assert_eq!(config.colors(), from_file.colors());
    }

    #[test]
    fn test_smoothness_overrides_default() {
        let config = parse(&["--smoothness", "0.0"]).palette().unwrap();
        assert_eq!(config, PseudoColorConfig::default().with_smoothness(0.0));
    }

    #[test]
    fn test_out_of_range_smoothness_is_accepted() {
        let config = parse(&["--smoothness", "1.5"]).palette().unwrap();
        assert_eq!(config.smoothness(), 1.5);
    }

    // ==================== Processing Mode ====================

    #[test]
    fn test_mode_selection() {
        assert_eq!(parse(&[]).mode(), ProcessingMode::Parallel);
        assert_eq!(parse(&["--sequential"]).mode(), ProcessingMode::Sequential);
        assert_eq!(
            parse(&["--threads", "4"]).mode(),
            ProcessingMode::ParallelWith(4)
        );
    }

    #[test]
    fn test_sequential_conflicts_with_threads() {
        let result = Args::try_parse_from([
            "depthcam",
            "depth.txt",
            "-o",
            "out.png",
            "--sequential",
            "--threads",
            "2",
        ]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    // ==================== Input Detection ====================

    #[test]
    fn test_text_grid_extension_ignores_case() {
        assert!(is_text_grid(Path::new("depth.txt")));
        assert!(is_text_grid(Path::new("DEPTH.TXT")));
        assert!(is_text_grid(Path::new("scan.Grid")));
        assert!(!is_text_grid(Path::new("frame.png")));
        assert!(!is_text_grid(Path::new("noext")));
    }
}
