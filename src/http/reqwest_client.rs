use std::time::Duration;

use reqwest::{Client, Request, redirect};

use crate::args::{ClientKind, DEFAULT_USER_AGENT};
use crate::error::HttpError;

use super::backend::{AsyncHttpBackend, BackendSettings};
use super::completion::ResponseHandler;
use super::request::SignedRequest;
use super::runtime::IoRuntime;

const TCP_KEEPALIVE: Duration = Duration::from_secs(60);

/// Pooled keep-alive client; each dispatch is one spawned `execute`.
pub(crate) struct ReqwestBackend {
    client: Client,
    request: Request,
    handler: ResponseHandler,
    runtime: IoRuntime,
}

impl ReqwestBackend {
    pub(crate) fn build(
        signed: &SignedRequest,
        settings: &BackendSettings,
        handler: ResponseHandler,
    ) -> Result<Self, HttpError> {
        let runtime = IoRuntime::build(ClientKind::Reqwest, settings.io_threads)?;
        let (client, request) = {
            let _runtime_guard = runtime.enter();
            let client = Client::builder()
                .user_agent(DEFAULT_USER_AGENT)
                .tcp_nodelay(true)
                .tcp_keepalive(Some(TCP_KEEPALIVE))
                .redirect(redirect::Policy::none())
                .build()
                .map_err(|err| HttpError::BuildClientFailed { source: err })?;
            let request = client
                .request(signed.method(), signed.url().clone())
                .headers(signed.headers())
                .build()
                .map_err(|err| HttpError::BuildRequestFailed { source: err })?;
            (client, request)
        };

        Ok(Self {
            client,
            request,
            handler,
            runtime,
        })
    }
}

impl AsyncHttpBackend for ReqwestBackend {
    fn kind(&self) -> ClientKind {
        ClientKind::Reqwest
    }

    fn dispatch(&self) {
        let pending = self.handler.begin();
        let Some(request) = self.request.try_clone() else {
            pending.failed(&"request template could not be cloned");
            return;
        };
        let client = self.client.clone();
        self.runtime.spawn(async move {
            match client.execute(request).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.bytes().await {
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
            request,
            handler,
            runtime,
        } = *self;
        drop(request);
        drop(client);
        drop(handler);
        runtime.shutdown();
    }
}
