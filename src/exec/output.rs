// src/exec/output.rs

//! Draining child process pipes.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::console::{format_output_line, OutputSink};
use crate::types::OutputStream;

/// Forward every non-blank line of `reader` to `sink`, prefixed with the
/// command name, until EOF.
///
/// Lines are split on `\n` and decoded lossily, so binary or non-UTF-8
/// output never stops the pipe from being drained.
pub fn spawn_line_forwarder<R>(
    command: String,
    stream: OutputStream,
    reader: R,
    sink: Arc<dyn OutputSink>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let raw = String::from_utf8_lossy(&buf);
                    if let Some(line) = format_output_line(&command, &raw) {
                        sink.write_line(&line);
                    } else {
                        trace!(command = %command, %stream, "dropped blank line");
                    }
                }
                Err(err) => {
                    debug!(command = %command, %stream, error = %err, "read error; stopping");
                    break;
                }
            }
        }
    })
}

/// Read `reader` to EOF. A missing pipe reads as empty.
pub async fn read_all<R>(reader: Option<R>) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        if let Err(err) = reader.read_to_end(&mut buf).await {
            debug!(error = %err, "failed to read captured output");
        }
    }
    buf
}
