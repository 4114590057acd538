//! Flat batch loop over sprite jobs
//!
//! A failing file is logged and counted, never fatal to the rest of the batch.

use std::path::{Path, PathBuf};

use glob::glob;
use petsprite_core::{
    keeps_alpha, load_sprite, normalize, save_sprite, ImageFormat, NormalizeOptions, SpriteError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// One source file, where to write it, and how to normalize it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub options: NormalizeOptions,
}

impl Job {
    /// Job that overwrites its source, or writes a PNG next to it when the
    /// source format cannot hold transparency.
    pub fn in_place(source: PathBuf, options: NormalizeOptions) -> Self {
        Self {
            dest: alpha_output_path(&source),
            source,
            options,
        }
    }
}

/// `path` with its extension switched to `png` when its format drops alpha.
pub fn alpha_output_path(path: &Path) -> PathBuf {
    match ImageFormat::from_path(path) {
        Ok(format) if !keeps_alpha(format) => path.with_extension("png"),
        _ => path.to_path_buf(),
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, SpriteError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Expand `pattern` into sorted jobs, skipping files whose name contains any
/// `exclude` substring. Outputs go to `out_dir` when given, in place otherwise.
pub fn expand_pattern(
    pattern: &str,
    exclude: &[String],
    out_dir: Option<&Path>,
    options: &NormalizeOptions,
) -> Result<Vec<Job>, BatchError> {
    let mut sources = Vec::new();

    for entry in glob(pattern)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(skip) = exclude.iter().find(|s| name.contains(s.as_str())) {
            log::info!("Skipping {} (excluded by '{}')", path.display(), skip);
            continue;
        }

        sources.push(path);
    }

    sources.sort();

    Ok(sources
        .into_iter()
        .map(|source| match (out_dir, source.file_name()) {
            (Some(dir), Some(name)) => Job {
                dest: alpha_output_path(&dir.join(name)),
                source,
                options: options.clone(),
            },
            _ => Job::in_place(source, options.clone()),
        })
        .collect())
}

/// Load, normalize and save one job. Returns the output dimensions.
pub fn process_job(job: &Job) -> Result<(u32, u32), SpriteError> {
    let raw = load_sprite(&job.source)?;
    let sprite = normalize(&raw, &job.options)?;
    save_sprite(&sprite, &job.dest)?;

    log::info!(
        "Processed {} -> {}: {}x{} -> {}x{}",
        job.source.display(),
        job.dest.display(),
        raw.width(),
        raw.height(),
        sprite.width(),
        sprite.height()
    );

    Ok(sprite.dimensions())
}

/// Run every job in order.
pub fn run_batch(jobs: &[Job]) -> BatchReport {
    let mut report = BatchReport::default();

    for job in jobs {
        match process_job(job) {
            Ok(_) => report.succeeded.push(job.source.clone()),
            Err(e) => {
                log::error!("Error processing {} ({}): {}", job.source.display(), e.kind(), e);
                report.failed.push((job.source.clone(), e));
            }
        }
    }

    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use petsprite_core::{BackgroundMode, Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("petsprite-batch-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_pet(path: &Path) {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        for y in 5..15 {
            for x in 8..13 {
                img.put_pixel(x, y, Rgba([200, 120, 40, 255]));
            }
        }
        save_sprite(&img, path).unwrap();
    }

    #[test]
    fn test_expand_pattern_sorts_and_excludes() {
        let dir = scratch_dir("expand");
        for name in ["pixel_lion.png", "pixel_duck.png", "pixel_cat.png", "other.png"] {
            write_pet(&dir.join(name));
        }

        let pattern = dir.join("pixel_*.png");
        let jobs = expand_pattern(
            &pattern.to_string_lossy(),
            &["duck".to_string()],
            None,
            &NormalizeOptions::default(),
        )
        .unwrap();

        let names: Vec<_> = jobs
            .iter()
            .map(|j| j.source.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["pixel_cat.png", "pixel_lion.png"]);
        assert!(jobs.iter().all(|j| j.source == j.dest));
    }

    #[test]
    fn test_in_place_jpeg_writes_png() {
        let options = NormalizeOptions::default();
        let job = Job::in_place(PathBuf::from("raw/cow.jpg"), options.clone());
        assert_eq!(job.dest, PathBuf::from("raw/cow.png"));

        let job = Job::in_place(PathBuf::from("pixel_cow.png"), options);
        assert_eq!(job.dest, job.source);
    }

    #[test]
    fn test_process_jpeg_source_keeps_transparency() {
        let dir = scratch_dir("jpeg-source");
        let source = dir.join("cow.jpg");
        let mut img = image::RgbImage::from_pixel(20, 20, image::Rgb([0, 0, 0]));
        for y in 4..16 {
            for x in 6..14 {
                img.put_pixel(x, y, image::Rgb([220, 220, 220]));
            }
        }
        img.save(&source).unwrap();

        let job = Job::in_place(source.clone(), NormalizeOptions::default().with_key_threshold(40));
        process_job(&job).unwrap();

        let written = image::open(dir.join("cow.png")).unwrap();
        assert_eq!(written.color(), image::ColorType::Rgba8);
        // The source is left as it was.
        assert_eq!(image::open(&source).unwrap().color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_expand_pattern_out_dir() {
        let dir = scratch_dir("out-dir");
        write_pet(&dir.join("pixel_wolf.png"));

        let out = dir.join("normalized");
        let jobs = expand_pattern(
            &dir.join("*.png").to_string_lossy(),
            &[],
            Some(&out),
            &NormalizeOptions::default(),
        )
        .unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].dest, out.join("pixel_wolf.png"));
    }

    #[test]
    fn test_run_batch_continues_after_failures() {
        let dir = scratch_dir("run");
        write_pet(&dir.join("pixel_cat.png"));
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();
        save_sprite(&RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])), dir.join("void.png")).unwrap();

        let options = NormalizeOptions::default().with_target_height(Some(16));
        let jobs = vec![
            Job::in_place(dir.join("broken.png"), options.clone()),
            Job::in_place(dir.join("void.png"), options.clone()),
            Job {
                source: dir.join("pixel_cat.png"),
                dest: dir.join("out/pixel_cat.png"),
                options: options.clone(),
            },
            Job::in_place(dir.join("missing.png"), options),
        ];

        let report = run_batch(&jobs);
        assert_eq!(report.succeeded, vec![dir.join("pixel_cat.png")]);
        assert!(!report.is_clean());

        let kinds: Vec<_> = report.failed.iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, ["decode", "empty", "io"]);

        let out = petsprite_core::load_sprite(dir.join("out/pixel_cat.png")).unwrap();
        assert_eq!(out.dimensions(), (8, 16));

        // The failed empty sprite is left exactly as it was.
        let void = petsprite_core::load_sprite(dir.join("void.png")).unwrap();
        assert_eq!(void.dimensions(), (8, 8));
    }

    #[test]
    fn test_process_job_in_place_is_stable() {
        let dir = scratch_dir("in-place");
        let path = dir.join("pixel_snake.png");
        write_pet(&path);

        let job = Job::in_place(
            path.clone(),
            NormalizeOptions::default()
                .with_background(BackgroundMode::ColorKey)
                .with_target_height(Some(20)),
        );
        assert_eq!(process_job(&job).unwrap(), (10, 20));
        let first = std::fs::read(&path).unwrap();

        assert_eq!(process_job(&job).unwrap(), (10, 20));
        assert_eq!(std::fs::read(&path).unwrap(), first);
    }
}
