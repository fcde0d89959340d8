//! QA spectrogram rendering for transcode sources.
//!
//! Two images are produced per source, named after it so that an external
//! gallery can pair them with the run's log: `<stem>_full.png` and
//! `<stem>_zoom.png`.

use crate::constants::spectrogram;
use crate::pipeline::{Pipeline, Role, Stage, Tool, path_arg};
use std::path::{Path, PathBuf};

/// Which view of the source a spectrogram shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Whole track.
    Full,
    /// Two seconds starting at one minute.
    Zoom,
}

impl View {
    /// Both views, in render order.
    pub const ALL: [Self; 2] = [Self::Full, Self::Zoom];

    const fn suffix(self) -> &'static str {
        match self {
            Self::Full => spectrogram::FULL_SUFFIX,
            Self::Zoom => spectrogram::ZOOM_SUFFIX,
        }
    }

    const fn args(self) -> &'static [&'static str] {
        match self {
            Self::Full => spectrogram::FULL_ARGS,
            Self::Zoom => spectrogram::ZOOM_ARGS,
        }
    }
}

/// A planned spectrogram render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrogramJob {
    /// View rendered.
    pub view: View,
    /// Image written.
    pub image: PathBuf,
    /// Resampler invocation producing the image.
    pub pipeline: Pipeline,
}

/// Image path for a source and view inside `dir`.
///
/// `#` is dropped from the stem since it breaks URLs in the gallery.
pub fn image_path(dir: &Path, source: &Path, view: View) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(|| "source".into(), |s| s.to_string_lossy())
        .replace('#', "");
    dir.join(format!("{stem}{}", view.suffix()))
}

/// Plan both spectrogram renders of `source` into `dir`.
pub fn plan(resampler: &Path, source: &Path, dir: &Path) -> Vec<SpectrogramJob> {
    let title = source
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());

    View::ALL
        .into_iter()
        .map(|view| {
            let image = image_path(dir, source, view);
            let stage = Stage::new(Tool::Resampler, Role::Sink, resampler)
                .arg(&*path_arg(source))
                .args(spectrogram::PREFIX_ARGS.iter().copied())
                .args(["-t", title.as_str(), "-o"])
                .arg(&*path_arg(&image))
                .args(view.args().iter().copied());
            SpectrogramJob {
                view,
                image,
                pipeline: Pipeline::single(stage),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_paths() {
        let dir = Path::new("/specs");
        let source = Path::new("/music/01 #1 Hit.flac");
        assert_eq!(
            image_path(dir, source, View::Full),
            PathBuf::from("/specs/01 1 Hit_full.png")
        );
        assert_eq!(
            image_path(dir, source, View::Zoom),
            PathBuf::from("/specs/01 1 Hit_zoom.png")
        );
    }

    #[test]
    fn test_plan_renders_both_views() {
        let jobs = plan(
            Path::new("sox"),
            Path::new("/music/track.flac"),
            Path::new("/specs"),
        );
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].pipeline.to_string(),
            "sox /music/track.flac -n remix 1 spectrogram -w Kaiser -t track -o \
             /specs/track_full.png -x 3000 -y 513 -z 120"
        );
        assert_eq!(
            jobs[1].pipeline.to_string(),
            "sox /music/track.flac -n remix 1 spectrogram -w Kaiser -t track -o \
             /specs/track_zoom.png -x 500 -y 1025 -z 120 -S 1:00 -d 0:02"
        );
    }

    #[test]
    fn test_dash_leading_source_is_guarded() {
        let jobs = plan(Path::new("sox"), Path::new("-live.flac"), Path::new(""));
        let args = &jobs[0].pipeline.stages()[0].args;
        assert_eq!(args[0], "./-live.flac");
        assert_eq!(jobs[0].image, PathBuf::from("-live_full.png"));
        assert!(args.iter().any(|a| a == "./-live_full.png"));
    }

    #[test]
    fn test_title_keeps_original_stem() {
        let jobs = plan(
            Path::new("sox"),
            Path::new("a#b.flac"),
            Path::new("out"),
        );
        let args: Vec<_> = jobs[0].pipeline.stages()[0]
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let title = args.iter().position(|a| a == "-t").map(|i| args[i + 1].as_str());
        assert_eq!(title, Some("a#b"));
        assert_eq!(jobs[0].image, PathBuf::from("out/ab_full.png"));
    }
}
