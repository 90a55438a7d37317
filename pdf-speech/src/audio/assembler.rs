//! MP3 assembly using FFmpeg.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use thiserror::Error;
use tts_client::{AudioFormat, AudioFragment};

/// Errors from audio assembly and encoding
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("No audio fragments to assemble")]
    NoFragments,

    #[error("FFmpeg not found; install ffmpeg to encode MP3 output")]
    EncoderMissing,

    #[error("FFmpeg failed: {0}")]
    Ffmpeg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check if FFmpeg is available on PATH.
pub fn is_ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Concatenate audio fragments, in order, into a single MP3 at `output_path`.
///
/// Fragments are staged in a temp directory and joined with FFmpeg's concat
/// demuxer, re-encoded with libmp3lame. The encoder writes to a scratch file
/// next to the destination which is renamed into place only on success, so a
/// failed run leaves no partial output.
pub fn write_mp3(
    fragments: &[AudioFragment],
    output_path: &Path,
    bitrate: &str,
) -> Result<(), EncodeError> {
    if fragments.is_empty() {
        return Err(EncodeError::NoFragments);
    }

    // A lone MP3 fragment needs no re-encoding
    if fragments.len() == 1 && fragments[0].format == AudioFormat::Mp3 {
        return write_atomic(output_path, &fragments[0].data);
    }

    if !is_ffmpeg_available() {
        return Err(EncodeError::EncoderMissing);
    }

    let staging = TempDir::new()?;

    let mut fragment_paths = Vec::with_capacity(fragments.len());
    for (i, fragment) in fragments.iter().enumerate() {
        let path = staging
            .path()
            .join(format!("fragment_{:05}.{}", i, fragment.format.extension()));
        std::fs::write(&path, &fragment.data)?;
        fragment_paths.push(path);
    }

    let list_file = staging.path().join("concat_list.txt");
    std::fs::write(&list_file, build_concat_list(&fragment_paths))?;

    let scratch = scratch_file(output_path)?;

    let output = Command::new("ffmpeg")
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(&list_file)
        .args(["-c:a", "libmp3lame", "-b:a", bitrate, "-f", "mp3"])
        .arg(scratch.path())
        .output()
        .map_err(|e| EncodeError::Ffmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EncodeError::Ffmpeg(stderr.trim().to_string()));
    }

    scratch
        .persist(output_path)
        .map_err(|e| EncodeError::Io(e.error))?;

    Ok(())
}

/// Write bytes to `output_path` through a scratch file in the same directory
fn write_atomic(output_path: &Path, data: &[u8]) -> Result<(), EncodeError> {
    let scratch = scratch_file(output_path)?;
    std::fs::write(scratch.path(), data)?;
    scratch
        .persist(output_path)
        .map_err(|e| EncodeError::Io(e.error))?;
    Ok(())
}

/// Scratch file in the destination's directory, so persist() is a rename
fn scratch_file(output_path: &Path) -> Result<tempfile::NamedTempFile, EncodeError> {
    let parent = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let scratch = tempfile::Builder::new()
        .prefix(".pdf-speech-")
        .suffix(".mp3")
        .tempfile_in(parent)?;
    Ok(scratch)
}

/// Build an FFmpeg concat demuxer file list
fn build_concat_list(paths: &[PathBuf]) -> String {
    let mut list = String::new();
    for path in paths {
        // Escape single quotes in path
        let escaped = path.to_string_lossy().replace('\'', "'\\''");
        list.push_str(&format!("file '{}'\n", escaped));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp3_fragment(data: &[u8]) -> AudioFragment {
        AudioFragment {
            data: data.to_vec(),
            format: AudioFormat::Mp3,
        }
    }

    #[test]
    fn test_no_fragments_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_mp3(&[], &dir.path().join("out.mp3"), "128k").unwrap_err();
        assert!(matches!(err, EncodeError::NoFragments));
    }

    #[test]
    fn test_single_mp3_fragment_is_written_directly() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp3");
        write_mp3(&[mp3_fragment(b"mp3-bytes")], &output, "128k").unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"mp3-bytes");
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let paths = vec![PathBuf::from("/tmp/it's.wav"), PathBuf::from("/tmp/b.wav")];
        let list = build_concat_list(&paths);
        assert_eq!(list, "file '/tmp/it'\\''s.wav'\nfile '/tmp/b.wav'\n");
    }

    #[test]
    fn test_ffmpeg_probe_does_not_panic() {
        let _ = is_ffmpeg_available();
    }
}
