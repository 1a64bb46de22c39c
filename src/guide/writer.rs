//! Streaming XMLTV writer with atomic replacement
//!
//! The document is streamed into `<path>.tmp` next to the target and renamed
//! over it only once the root element is closed and the data is on disk, so
//! readers of `<path>` see either the previous guide or the new one in full.

use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use super::format::escape_xml;
use crate::errors::{AppError, AppResult};
use crate::models::{Channel, Programme};

pub const XMLTV_PROLOGUE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n\
<tv generator-info-name=\"antennas\">\n";

pub const XMLTV_EPILOGUE: &str = "</tv>\n";

/// Render one `<channel>` element
pub fn channel_element(channel: &Channel) -> String {
    let mut element = format!(
        "  <channel id=\"{}\">\n    <display-name>{}</display-name>\n",
        escape_xml(&channel.id),
        escape_xml(&channel.name)
    );
    if let Some(logo) = &channel.logo {
        element.push_str(&format!("    <icon src=\"{}\" />\n", escape_xml(logo)));
    }
    element.push_str("  </channel>\n");
    element
}

/// Render one `<programme>` element from pre-formatted timestamps
pub fn programme_element(programme: &Programme, start: &str, stop: &str) -> String {
    let mut element = format!(
        "  <programme start=\"{}\" stop=\"{}\" channel=\"{}\">\n    <title lang=\"en\">{}</title>\n",
        start,
        stop,
        escape_xml(&programme.channel_id),
        escape_xml(&programme.title)
    );
    if let Some(subtitle) = &programme.subtitle {
        element.push_str(&format!(
            "    <sub-title lang=\"en\">{}</sub-title>\n",
            escape_xml(subtitle)
        ));
    }
    // Presence, not emptiness, decides whether the element is written
    if let Some(summary) = &programme.summary {
        element.push_str(&format!("    <desc lang=\"en\">{}</desc>\n", escape_xml(summary)));
    }
    element.push_str("  </programme>\n");
    element
}

pub struct GuideWriter {
    final_path: PathBuf,
    temp_path: PathBuf,
    out: BufWriter<File>,
    bytes_written: u64,
}

impl GuideWriter {
    /// Open a fresh temp file next to `path` and write the prologue
    pub async fn create(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = temp_path_for(path)?;
        let file = File::create(&temp_path).await?;
        let mut writer = Self {
            final_path: path.to_path_buf(),
            temp_path,
            out: BufWriter::new(file),
            bytes_written: 0,
        };
        writer.write_raw(XMLTV_PROLOGUE).await?;
        Ok(writer)
    }

    pub async fn write_channel(&mut self, channel: &Channel) -> AppResult<()> {
        self.write_raw(&channel_element(channel)).await
    }

    pub async fn write_programme(
        &mut self,
        programme: &Programme,
        start: &str,
        stop: &str,
    ) -> AppResult<()> {
        self.write_raw(&programme_element(programme, start, stop)).await
    }

    /// Close the root element, sync to disk and atomically replace the target
    pub async fn commit(mut self) -> AppResult<u64> {
        let result = self.finish_and_rename().await;
        if result.is_err() {
            self.remove_temp().await;
        }
        result.map(|()| self.bytes_written)
    }

    /// Drop the partial document, leaving the previous guide untouched
    pub async fn discard(mut self) {
        let _ = self.out.flush().await;
        self.remove_temp().await;
    }

    async fn finish_and_rename(&mut self) -> AppResult<()> {
        self.write_raw(XMLTV_EPILOGUE).await?;
        self.out.flush().await?;
        self.out.get_mut().sync_all().await?;
        fs::rename(&self.temp_path, &self.final_path).await?;
        debug!(
            "Replaced guide {} ({} bytes)",
            self.final_path.display(),
            self.bytes_written
        );
        Ok(())
    }

    async fn write_raw(&mut self, chunk: &str) -> AppResult<()> {
        self.out.write_all(chunk.as_bytes()).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    async fn remove_temp(&self) {
        if let Err(e) = fs::remove_file(&self.temp_path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(
                "Failed to remove partial guide {}: {}",
                self.temp_path.display(),
                e
            );
        }
    }
}

fn temp_path_for(path: &Path) -> AppResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::guide(format!("guide path '{}' has no file name", path.display())))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    Ok(path.with_file_name(temp_name))
}
