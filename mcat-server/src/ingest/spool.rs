//! Request-scoped temporary buffers
//!
//! Upload bodies and archive entries arrive as forward-only streams, while
//! tag parsing and storage both need to rewind. Each stream is copied into
//! an anonymous temp file that the OS reclaims as soon as it is dropped.

use futures::{Stream, StreamExt};
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Create an empty anonymous temp file, in `dir` when given
pub fn temp_buffer(dir: Option<&Path>) -> io::Result<File> {
    match dir {
        Some(dir) => tempfile::tempfile_in(dir),
        None => tempfile::tempfile(),
    }
}

/// Copy a blocking reader into a fresh temp buffer, rewound to the start
pub fn spool_reader<R: Read + ?Sized>(reader: &mut R, dir: Option<&Path>) -> io::Result<File> {
    let mut buffer = temp_buffer(dir)?;
    io::copy(reader, &mut buffer)?;
    buffer.rewind()?;
    Ok(buffer)
}

/// Drain a byte stream (an HTTP body) into a fresh temp buffer, rewound to the start
pub async fn spool_stream<S, B, E>(body: S, dir: Option<&Path>) -> io::Result<File>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut body = std::pin::pin!(body);
    let mut buffer = tokio::fs::File::from_std(temp_buffer(dir)?);
    let mut total: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(io::Error::other)?;
        let chunk = chunk.as_ref();
        buffer.write_all(chunk).await?;
        total += chunk.len() as u64;
    }
    buffer.flush().await?;

    let mut buffer = buffer.into_std().await;
    buffer.rewind()?;

    tracing::debug!(bytes = total, "Spooled request body");
    Ok(buffer)
}
