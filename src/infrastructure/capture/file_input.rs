//! Audio input that replays an encoded file
//!
//! Lets the capture pipeline run without a microphone: the file's bytes
//! are delivered as chunks the moment capture starts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{AudioInput, CaptureError, ChunkSender, InputStream};
use crate::domain::audio::PcmFormat;
use crate::domain::capture::AudioChunk;
use crate::domain::config::DEFAULT_CHUNK_SIZE;

/// Input backed by an encoded audio file
#[derive(Debug, Clone)]
pub struct FileInput {
    path: PathBuf,
    chunk_size: usize,
}

impl FileInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the maximum size of a delivered chunk
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AudioInput for FileInput {
    type Stream = FileStream;

    async fn acquire(&self, _format: PcmFormat) -> Result<FileStream, CaptureError> {
        let display = self.path.display().to_string();
        let data = fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CaptureError::DeviceNotFound(display.clone()),
            ErrorKind::PermissionDenied => CaptureError::PermissionDenied(display.clone()),
            _ => CaptureError::OpenFailed(format!("{}: {}", display, e)),
        })?;

        debug!(path = %self.path.display(), bytes = data.len(), "file input opened");

        Ok(FileStream {
            data: Some(data),
            chunk_size: self.chunk_size,
        })
    }
}

/// An opened file; `None` once released
pub struct FileStream {
    data: Option<Vec<u8>>,
    chunk_size: usize,
}

#[async_trait]
impl InputStream for FileStream {
    fn start(&mut self, chunks: ChunkSender) -> Result<(), CaptureError> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| CaptureError::DeviceUnavailable("input already released".to_string()))?;

        for chunk in AudioChunk::split(data, self.chunk_size) {
            if chunks.send(chunk).is_err() {
                break;
            }
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn release(&mut self) {
        self.data = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let input = FileInput::new("/nonexistent/capture.flac");
        let err = input.acquire(PcmFormat::SPEECH).await.err().unwrap();
        assert!(matches!(err, CaptureError::DeviceNotFound(_)));
    }

    #[tokio::test]
    async fn delivers_file_in_sequenced_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");
        std::fs::write(&path, vec![7u8; 10]).unwrap();

        let input = FileInput::new(&path).chunk_size(4);
        let mut stream = input.acquire(PcmFormat::SPEECH).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        stream.start(tx).unwrap();
        stream.stop().await.unwrap();

        let mut received = Vec::new();
        while let Some(chunk) = rx.recv().await {
            received.push(chunk);
        }
        let sizes: Vec<usize> = received.iter().map(AudioChunk::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(received[2].sequence(), 2);
    }

    #[tokio::test]
    async fn start_after_release_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut stream = FileInput::new(&path)
            .acquire(PcmFormat::SPEECH)
            .await
            .unwrap();
        stream.release();
        stream.release();

        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(stream.start(tx).is_err());
    }
}
