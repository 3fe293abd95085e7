//! Newline-delimited JSON framing over any reader/writer pair.

use std::io::{BufRead, Write};
use std::sync::mpsc;
use std::thread;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::bridge::ChannelRouter;
use crate::model::args::ArgumentBag;
use crate::model::envelope::{FailureKind, ResponseEnvelope};
use crate::msg::Msg;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("read error: {0}")]
    Read(String),
    #[error("write error: {0}")]
    Write(String),
    #[error("encode error: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestFrame {
    pub id: u64,
    #[serde(default)]
    pub channel: Option<String>,
    pub method: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub arguments: ArgumentBag,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<ArgumentBag, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ArgumentBag>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFrame {
    pub id: Option<u64>,
    pub response: ResponseEnvelope,
}

/// Answers one raw frame. Never fails: malformed input becomes an
/// `invalid_arguments` reply, carrying the request id when one is readable.
pub fn handle_line(router: &ChannelRouter, line: &[u8]) -> ResponseFrame {
    let request = match serde_json::from_slice::<RequestFrame>(line) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!("malformed frame: {err}");
            return ResponseFrame {
                id: salvage_id(line),
                response: ResponseEnvelope::failure(
                    FailureKind::InvalidArguments,
                    format!("malformed frame: {err}"),
                ),
            };
        }
    };

    let channel = request
        .channel
        .as_deref()
        .or_else(|| router.default_channel())
        .unwrap_or_default();

    ResponseFrame {
        id: Some(request.id),
        response: router.route(channel, &request.method, request.arguments),
    }
}

fn salvage_id(line: &[u8]) -> Option<u64> {
    serde_json::from_slice::<Value>(line)
        .ok()?
        .get("id")
        .and_then(Value::as_u64)
}

/// Reads raw lines on a background thread and forwards them as [`Msg`]s.
///
/// Lines are passed through as bytes; decoding happens per frame so one
/// bad line cannot stop the stream.
pub fn spawn_reader<R>(mut reader: R, tx: mpsc::Sender<Msg>) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        loop {
            let mut buf = Vec::new();
            let msg = match reader.read_until(b'\n', &mut buf) {
                Ok(0) => Msg::Closed,
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                    }
                    Msg::Frame(buf)
                }
                Err(err) => Msg::ReadFailed(err.to_string()),
            };
            let done = !matches!(msg, Msg::Frame(_));
            if tx.send(msg).is_err() || done {
                return;
            }
        }
    })
}

/// Main loop: answers every frame until input closes.
pub fn serve<W: Write>(
    router: &ChannelRouter,
    rx: mpsc::Receiver<Msg>,
    mut writer: W,
) -> Result<usize, TransportError> {
    let mut answered = 0;

    // A dropped sender without `Closed` is treated as end of input.
    while let Ok(msg) = rx.recv() {
        match msg {
            Msg::Frame(line) => {
                if line.trim_ascii().is_empty() {
                    continue;
                }
                let reply = handle_line(router, &line);
                write_frame(&mut writer, &reply)?;
                answered += 1;
            }
            Msg::ReadFailed(err) => return Err(TransportError::Read(err)),
            Msg::Closed => break,
        }
    }

    tracing::info!(answered, "input closed");
    Ok(answered)
}

fn write_frame<W: Write>(writer: &mut W, frame: &ResponseFrame) -> Result<(), TransportError> {
    let encoded =
        serde_json::to_string(frame).map_err(|err| TransportError::Encode(err.to_string()))?;
    writeln!(writer, "{encoded}").map_err(|err| TransportError::Write(err.to_string()))?;
    writer
        .flush()
        .map_err(|err| TransportError::Write(err.to_string()))
}
