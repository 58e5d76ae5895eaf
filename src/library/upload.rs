use std::path::{Path, PathBuf};

use lofty::file::AudioFile;

use crate::format::format_time;

use super::model::{Track, TrackId};
use super::object_url::ObjectUrls;

pub const LOCAL_ARTIST: &str = "Local File";
pub const LOCAL_GENRE: &str = "Unknown";

/// Strip the last extension from a file name ("track one.mp3" -> "track one").
///
/// A leading dot counts as an extension separator, and a trailing dot is kept.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i + 1 < name.len() => &name[..i],
        _ => name,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Length of the file as `m:ss`, when its tags can be read.
fn duration_label(path: &Path) -> Option<String> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    if duration.is_zero() {
        return None;
    }
    Some(format_time(duration.as_secs_f64()))
}

/// Turn one picked batch of files into library tracks.
///
/// Ids are `local-{position in batch}-{file name}`; every file gets a fresh
/// session object url.
pub fn tracks_from_files(
    batch: &[PathBuf],
    urls: &mut ObjectUrls,
    placeholder_image: &str,
) -> Vec<Track> {
    batch
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let name = file_name(path);
            Track {
                id: TrackId::Text(format!("local-{index}-{name}")),
                title: strip_extension(&name).to_string(),
                artist: LOCAL_ARTIST.to_string(),
                genre: LOCAL_GENRE.to_string(),
                duration_label: duration_label(path),
                image_url: placeholder_image.to_string(),
                audio_url: urls.create(path),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MediaSource;

    #[test]
    fn strip_extension_removes_only_the_last_extension() {
        assert_eq!(strip_extension("track one.mp3"), "track one");
        assert_eq!(strip_extension("demo.wav"), "demo");
        assert_eq!(strip_extension("live.at.home.flac"), "live.at.home");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension("trailing."), "trailing.");
    }

    #[test]
    fn batch_tracks_get_positional_ids_and_local_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("track one.mp3");
        let demo = dir.path().join("demo.wav");
        std::fs::write(&one, b"not real audio").unwrap();
        std::fs::write(&demo, b"not real audio").unwrap();

        let mut urls = ObjectUrls::new();
        let tracks = tracks_from_files(&[one.clone(), demo], &mut urls, "placeholder.png");

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::Text("local-0-track one.mp3".into()));
        assert_eq!(tracks[1].id, TrackId::Text("local-1-demo.wav".into()));
        assert_eq!(tracks[0].title, "track one");
        assert_eq!(tracks[1].title, "demo");
        for t in &tracks {
            assert_eq!(t.artist, LOCAL_ARTIST);
            assert_eq!(t.genre, LOCAL_GENRE);
            assert_eq!(t.image_url, "placeholder.png");
            // Unreadable tags leave the length unknown.
            assert!(t.duration_label.is_none());
        }
        assert_ne!(tracks[0].audio_url, tracks[1].audio_url);
        assert_eq!(
            urls.resolve(&tracks[0].audio_url).unwrap(),
            MediaSource::Local(one)
        );
    }
}
