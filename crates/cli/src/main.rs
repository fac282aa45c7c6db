use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use vidbio_core::annotation::domain::annotation_smoother::{smooth, MaxAge};
use vidbio_core::annotation::domain::annotation_validator::MinFaceSizeValidator;
use vidbio_core::config::VideoConfig;
use vidbio_core::shared::annotation::AnnotationSequence;
use vidbio_core::shared::frame_container::FrameContainer;
use vidbio_core::storage::domain::container_encoding::ContainerEncoding;

/// Annotation smoothing and frame container tools for video biometrics.
#[derive(Parser)]
#[command(name = "vidbio")]
struct Cli {
    /// JSON configuration file (defaults to the per-user config, if any).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill gaps in per-frame face annotations with the last valid one.
    Smooth {
        /// Annotation JSON keyed by frame index.
        input: PathBuf,

        /// Where to write the smoothed annotations.
        output: PathBuf,

        /// Frames a detection may be carried forward (default: forever).
        #[arg(long)]
        max_age: Option<usize>,

        /// Smallest accepted face box, in pixels.
        #[arg(long)]
        min_face_size: Option<f64>,
    },
    /// Print the frames of a persisted container and the frames the
    /// configured selector would keep.
    Inspect {
        /// Container file written by a video adapter.
        container: PathBuf,

        /// Container encoding: record or compressed (default: from config).
        #[arg(long)]
        encoding: Option<String>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = VideoConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Smooth {
            input,
            output,
            max_age,
            min_face_size,
        } => {
            validate_face_size(min_face_size)?;
            let max_age = max_age.map_or(config.annotation.max_age, MaxAge::Frames);
            let validator = min_face_size.map_or_else(|| config.validator(), MinFaceSizeValidator::new);
            run_smooth(&input, &output, &validator, max_age)
        }
        Command::Inspect { container, encoding } => {
            let encoding = match encoding {
                Some(name) => parse_encoding(&name)?,
                None => config.encoding,
            };
            let report = inspect(&container, encoding, &config)?;
            print!("{report}");
            Ok(())
        }
    }
}

fn run_smooth(
    input: &Path,
    output: &Path,
    validator: &MinFaceSizeValidator,
    max_age: MaxAge,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = AnnotationSequence::from_json(&fs::read_to_string(input)?)?;
    let smoothed = smooth(&raw, validator, max_age);

    let filled = raw
        .iter()
        .zip(smoothed.iter())
        .filter(|((_, before), (_, after))| before != after)
        .count();
    log::info!(
        "Smoothed {} frames ({} changed, max age {:?}, min face size {})",
        smoothed.len(),
        filled,
        max_age,
        validator.min_face_size()
    );

    fs::write(output, smoothed.to_json()?)?;
    Ok(())
}

fn inspect(
    path: &Path,
    encoding: ContainerEncoding,
    config: &VideoConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let header = FrameContainer::read_header(path, encoding)?;
    let mut report = format!("{} ({encoding}): {} frames\n", path.display(), header.len());
    for entry in &header {
        match entry.quality() {
            Some(quality) => report.push_str(&format!("  frame {:>6}  quality {quality:.4}\n", entry.index())),
            None => report.push_str(&format!("  frame {:>6}  quality -\n", entry.index())),
        }
    }

    let selected: Vec<String> = config
        .frame_selector
        .select(&header)
        .iter()
        .map(|entry| entry.index().to_string())
        .collect();
    report.push_str(&format!(
        "selected by {:?}: [{}]\n",
        config.frame_selector,
        selected.join(", ")
    ));
    Ok(report)
}

fn parse_encoding(name: &str) -> Result<ContainerEncoding, Box<dyn std::error::Error>> {
    ContainerEncoding::from_name(name)
        .ok_or_else(|| format!("--encoding must be record or compressed, got '{name}'").into())
}

fn validate_face_size(min_face_size: Option<f64>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(size) = min_face_size {
        if size.is_nan() || size < 0.0 {
            return Err(format!("--min-face-size must be non-negative, got {size}").into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vidbio_core::selection::domain::frame_selector::FrameSelector;
    use vidbio_core::shared::annotation::Annotation;

    fn write_text(item: &String, sink: &mut dyn std::io::Write) -> Result<(), vidbio_core::shared::error::ComponentError> {
        sink.write_all(item.as_bytes())?;
        Ok(())
    }

    #[test]
    fn test_smooth_writes_filled_annotations() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("raw.json");
        let output = tmp.path().join("smoothed.json");
        fs::write(
            &input,
            r#"{"0": {"topleft": [0, 0], "bottomright": [40, 40]}, "1": {}, "2": {}}"#,
        )
        .unwrap();

        run_smooth(&input, &output, &MinFaceSizeValidator::default(), MaxAge::Frames(1)).unwrap();

        let smoothed = AnnotationSequence::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        let face = Annotation::from_box((0.0, 0.0), (40.0, 40.0));
        assert_eq!(smoothed.get(1), Some(&face));
        assert_eq!(smoothed.get(2), Some(&Annotation::new()));
    }

    #[test]
    fn test_inspect_reports_frames_and_selection() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("frames.bin");
        let mut fc = FrameContainer::new();
        fc.add(4, "a".to_string(), Some(0.5)).unwrap();
        fc.add(9, "b".to_string(), None).unwrap();
        fc.add(12, "c".to_string(), Some(0.25)).unwrap();
        fc.save(&path, ContainerEncoding::Record, write_text).unwrap();
        let config = VideoConfig {
            frame_selector: FrameSelector::TopQuality { count: 1 },
            ..VideoConfig::default()
        };

        let report = inspect(&path, ContainerEncoding::Record, &config).unwrap();

        assert!(report.contains("3 frames"));
        assert!(report.contains("quality 0.5000"));
        assert!(report.contains("quality -"));
        assert!(report.ends_with("[4]\n"));
    }

    #[test]
    fn test_encoding_flag_overrides_compressed_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("frames.bin");
        let mut fc = FrameContainer::new();
        fc.add(0, "a".to_string(), None).unwrap();
        fc.save(&path, ContainerEncoding::Record, write_text).unwrap();
        let config = VideoConfig {
            encoding: ContainerEncoding::Compressed,
            ..VideoConfig::default()
        };

        assert!(inspect(&path, config.encoding, &config).is_err());
        let encoding = parse_encoding("record").unwrap();
        let report = inspect(&path, encoding, &config).unwrap();
        assert!(report.contains("(record): 1 frames"));
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        assert!(parse_encoding("zip").is_err());
        assert_eq!(parse_encoding("compressed").unwrap(), ContainerEncoding::Compressed);
    }

    #[test]
    fn test_smooth_keeps_scalar_entries() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("raw.json");
        let output = tmp.path().join("smoothed.json");
        fs::write(
            &input,
            r#"{"0": {"topleft": [0, 0], "bottomright": [40, 40], "quality": 0.9}, "1": {}}"#,
        )
        .unwrap();

        run_smooth(&input, &output, &MinFaceSizeValidator::default(), MaxAge::Infinite).unwrap();

        let smoothed = AnnotationSequence::from_json(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(smoothed.get(1).unwrap().scalar("quality"), Some(0.9));
    }

    #[test]
    fn test_negative_face_size_is_rejected() {
        assert!(validate_face_size(Some(-2.0)).is_err());
        assert!(validate_face_size(Some(32.0)).is_ok());
        assert!(validate_face_size(None).is_ok());
    }
}
