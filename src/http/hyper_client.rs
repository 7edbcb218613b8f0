use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Request, Uri, header};
use http_body_util::{BodyExt, Empty};
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

use crate::args::{ClientKind, DEFAULT_USER_AGENT};
use crate::error::HttpError;

use super::backend::{AsyncHttpBackend, BackendSettings};
use super::completion::ResponseHandler;
use super::request::SignedRequest;
use super::runtime::IoRuntime;

const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

type HttpsClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// hyper's pooled legacy client over native TLS.
pub(crate) struct HyperBackend {
    client: HttpsClient,
    uri: Uri,
    headers: HeaderMap,
    handler: ResponseHandler,
    runtime: IoRuntime,
}

impl HyperBackend {
    pub(crate) fn build(
        signed: &SignedRequest,
        settings: &BackendSettings,
        handler: ResponseHandler,
    ) -> Result<Self, HttpError> {
        let uri: Uri = signed
            .url()
            .as_str()
            .parse()
            .map_err(|err| HttpError::InvalidUri {
                url: signed.url().to_string(),
                source: err,
            })?;

        let mut headers = signed.headers();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        let runtime = IoRuntime::build(ClientKind::Hyper, settings.io_threads)?;
        let client = {
            let _runtime_guard = runtime.enter();
            let mut http = HttpConnector::new();
            http.enforce_http(false);
            http.set_nodelay(true);
            http.set_keepalive(Some(TCP_KEEPALIVE));
            let tls = native_tls::TlsConnector::new()
                .map_err(|err| HttpError::TlsConnector { source: err })?;
            let https = HttpsConnector::from((http, tls.into()));
            Client::builder(TokioExecutor::new())
                .retry_canceled_requests(false)
                .build(https)
        };

        Ok(Self {
            client,
            uri,
            headers,
            handler,
            runtime,
        })
    }

    fn request(&self) -> Request<Empty<Bytes>> {
        let mut request = Request::new(Empty::new());
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();
        request
    }
}

impl AsyncHttpBackend for HyperBackend {
    fn kind(&self) -> ClientKind {
        ClientKind::Hyper
    }

    fn dispatch(&self) {
        let pending = self.handler.begin();
        let request = self.request();
        let client = self.client.clone();
        self.runtime.spawn(async move {
            match client.request(request).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.into_body().collect().await {
                        Ok(_) => pending.responded(status),
                        Err(err) => pending.failed(&err),
                    }
                }
                Err(err) => pending.failed(&err),
            }
        });
    }

    fn shutdown(self: Box<Self>) {
        let Self {
            client,
            handler,
            runtime,
            ..
        } = *self;
        drop(client);
        drop(handler);
        runtime.shutdown();
    }
}
