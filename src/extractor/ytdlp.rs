//! yt-dlp backed extractor and stream fetcher.

use super::{MediaSource, StreamFetcher};
use mediagrab_av::{tools, Error, MediaItem, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Drives the yt-dlp CLI for metadata extraction and stream retrieval.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    /// Use the given yt-dlp binary.
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Locate yt-dlp on PATH.
    pub fn locate() -> Result<Self> {
        Ok(Self::new(tools::require_tool("yt-dlp")?))
    }

    fn run(&self, cmd: &mut Command) -> Result<String> {
        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found("yt-dlp")
            } else {
                Error::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::tool_failed("yt-dlp", stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Parse the JSON yt-dlp prints for `-J` into pipeline items.
///
/// yt-dlp reports formats sorted worst to best; the list is reversed here
/// so that "first in order" downstream means "preferred by the extractor"
/// when candidates tie on width and size.
fn parse_extraction(json: &str) -> Result<Vec<MediaItem>> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let mut items = Vec::new();
    match value.get("entries").and_then(|e| e.as_array()) {
        Some(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                if entry.is_null() {
                    tracing::warn!(position = index + 1, "skipping unavailable playlist entry");
                    continue;
                }
                let mut item: MediaItem = serde_json::from_value(entry.clone())?;
                item.sequence_index = Some(index + 1);
                item.formats.reverse();
                items.push(item);
            }
        }
        None => {
            let mut item: MediaItem = serde_json::from_value(value)?;
            item.formats.reverse();
            items.push(item);
        }
    }

    Ok(items)
}

impl MediaSource for YtDlp {
    fn extract(&self, url: &str) -> Result<Vec<MediaItem>> {
        tracing::info!(%url, "extracting metadata");
        let stdout = self.run(
            Command::new(&self.binary)
                .arg("-J")
                .arg("--no-warnings")
                .arg(url),
        )?;
        parse_extraction(&stdout)
    }
}

impl StreamFetcher for YtDlp {
    fn fetch(
        &self,
        url: &str,
        item: &MediaItem,
        format_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        tracing::info!(item = %item.id, format = %format_id, "retrieving stream");

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-f")
            .arg(format_id)
            .arg("-o")
            .arg(dest_dir.join("%(id)s.%(ext)s"))
            .arg("--force-overwrites")
            .arg("--no-warnings")
            .arg("--no-simulate")
            .arg("--print")
            .arg("after_move:filepath");
        if let Some(index) = item.sequence_index {
            cmd.arg("--playlist-items").arg(index.to_string());
        }
        cmd.arg(url);

        let stdout = self.run(&mut cmd)?;

        // The adapter reports the resulting path on stdout, one line per
        // downloaded entry; with a pinned format and playlist position
        // there is exactly one.
        let path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| Error::tool_failed("yt-dlp", "no destination path reported"))?;

        if !path.exists() {
            return Err(Error::tool_failed(
                "yt-dlp",
                format!("reported path does not exist: {}", path.display()),
            ));
        }

        Ok(path)
    }
}
