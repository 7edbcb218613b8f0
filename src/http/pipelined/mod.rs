//! Single-connection HTTP/1.1 client that pipelines every request.
//!
//! Requests are written back to back on one socket without waiting for the
//! previous response; responses are matched to requests in send order.
mod codec;

#[cfg(test)]
mod tests;

use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

use crate::args::{ClientKind, DEFAULT_USER_AGENT};
use crate::error::HttpError;

use super::backend::{AsyncHttpBackend, BackendSettings};
use super::completion::{PendingCompletion, ResponseHandler};
use super::request::{API_KEY_HEADER, SIGNATURE_HEADER, SignedRequest};
use super::runtime::IoRuntime;

use codec::ResponseDecoder;

trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

type BoxedStream = Box<dyn AsyncStream>;

pub(crate) struct PipelinedBackend {
    queue: UnboundedSender<PendingCompletion>,
    handler: ResponseHandler,
    runtime: IoRuntime,
}

impl PipelinedBackend {
    pub(crate) fn build(
        signed: &SignedRequest,
        settings: &BackendSettings,
        handler: ResponseHandler,
    ) -> Result<Self, HttpError> {
        let runtime = IoRuntime::build(ClientKind::Pipelined, settings.io_threads)?;
        let stream = runtime.block_on(connect(signed))?;
        debug!(
            "(pipelined) Connected to {}:{}.",
            signed.host(),
            signed.port()
        );

        let payload = Bytes::from(encode_request(signed));
        let (reader, writer) = tokio::io::split(stream);
        let (queue, queue_rx) = unbounded_channel();
        let (inflight_tx, inflight_rx) = unbounded_channel();
        runtime.spawn(write_loop(writer, payload, queue_rx, inflight_tx));
        runtime.spawn(read_loop(reader, inflight_rx));

        Ok(Self {
            queue,
            handler,
            runtime,
        })
    }
}

impl AsyncHttpBackend for PipelinedBackend {
    fn kind(&self) -> ClientKind {
        ClientKind::Pipelined
    }

    fn dispatch(&self) {
        let pending = self.handler.begin();
        if let Err(err) = self.queue.send(pending) {
            err.0.failed(&"connection writer stopped");
        }
    }

    fn shutdown(self: Box<Self>) {
        let Self {
            queue,
            handler,
            runtime,
        } = *self;
        drop(queue);
        drop(handler);
        runtime.shutdown();
    }
}

async fn connect(signed: &SignedRequest) -> Result<BoxedStream, HttpError> {
    let addr = format!("{}:{}", signed.host(), signed.port());
    let tcp = TcpStream::connect(&addr)
        .await
        .map_err(|err| HttpError::Connect {
            addr: addr.clone(),
            source: err,
        })?;
    tcp.set_nodelay(true)
        .map_err(|err| HttpError::Connect { addr, source: err })?;
    if !signed.is_tls() {
        return Ok(Box::new(tcp));
    }

    let connector = native_tls::TlsConnector::new()
        .map_err(|err| HttpError::TlsConnector { source: err })?;
    let connector = tokio_native_tls::TlsConnector::from(connector);
    let tls = connector
        .connect(signed.host(), tcp)
        .await
        .map_err(|err| HttpError::TlsHandshake {
            host: signed.host().to_owned(),
            source: err,
        })?;
    Ok(Box::new(tls))
}

/// Serialize the request once; every dispatch writes the same bytes.
pub(crate) fn encode_request(signed: &SignedRequest) -> Vec<u8> {
    let mut out = Vec::with_capacity(256);
    let request_line = format!("GET {} HTTP/1.1\r\n", signed.path_and_query());
    out.extend_from_slice(request_line.as_bytes());
    let host_line = format!("Host: {}\r\n", signed.authority());
    out.extend_from_slice(host_line.as_bytes());
    for (name, value) in [
        (API_KEY_HEADER, signed.api_key().as_bytes()),
        (SIGNATURE_HEADER, signed.signature().as_bytes()),
        ("User-Agent", DEFAULT_USER_AGENT.as_bytes()),
        ("Accept", b"*/*".as_slice()),
    ] {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"\r\n");
    out
}

async fn write_loop(
    mut writer: WriteHalf<BoxedStream>,
    payload: Bytes,
    mut queue: UnboundedReceiver<PendingCompletion>,
    inflight: UnboundedSender<PendingCompletion>,
) {
    let mut broken = false;
    while let Some(pending) = queue.recv().await {
        if broken {
            pending.failed(&"connection is broken");
            continue;
        }
        // Register before writing so the reader can never see the
        // response ahead of its request.
        if let Err(err) = inflight.send(pending) {
            err.0.failed(&"response reader stopped");
            continue;
        }
        let written = match writer.write_all(&payload).await {
            Ok(()) => writer.flush().await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            warn!("(pipelined) Write failed, connection is unusable: {}", err);
            broken = true;
        }
    }
    if let Err(err) = writer.shutdown().await {
        debug!("(pipelined) Writer shutdown: {}", err);
    }
}

async fn read_loop(reader: ReadHalf<BoxedStream>, mut inflight: UnboundedReceiver<PendingCompletion>) {
    let mut responses = FramedRead::new(reader, ResponseDecoder::new());
    let reason = loop {
        match responses.next().await {
            Some(Ok(status)) => match inflight.try_recv() {
                Ok(pending) => pending.responded(status),
                Err(err) => warn!(
                    "(pipelined) Response {} arrived with no request pending: {}",
                    status, err
                ),
            },
            Some(Err(err)) => break err.to_string(),
            None => break "connection closed by peer".to_owned(),
        }
    };

    inflight.close();
    while let Ok(pending) = inflight.try_recv() {
        pending.failed(&reason);
    }
}
