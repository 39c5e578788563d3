//! Remote uppercase endpoint for a single peer.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::endpoint::{Endpoint, EndpointError, Request, Response, UppercaseResponse};

/// Issues uppercase requests to one peer over HTTP.
///
/// The request is POSTed as JSON to `http://<peer>/uppercase`. A non-2xx
/// status, an undecodable body or a non-empty `err` field all fail the call.
#[derive(Debug, Clone)]
pub struct HttpClientEndpoint {
    client: reqwest::Client,
    url: Url,
    cancel: CancellationToken,
}

impl HttpClientEndpoint {
    pub fn new(client: reqwest::Client, url: Url, cancel: CancellationToken) -> Self {
        Self { client, url, cancel }
    }

    async fn send(&self, request: Request) -> Result<Response, EndpointError> {
        let req = match request {
            Request::Uppercase(req) => req,
            other => {
                return Err(EndpointError::UnexpectedRequest {
                    endpoint: "uppercase client",
                    got: other.kind(),
                })
            }
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&req)
            .send()
            .await
            .map_err(|source| EndpointError::Transport {
                url: self.url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let body: UppercaseResponse = response.json().await.map_err(|source| EndpointError::Decode {
            url: self.url.to_string(),
            source,
        })?;

        if let Some(message) = body.err {
            return Err(EndpointError::Remote {
                url: self.url.to_string(),
                message,
            });
        }

        Ok(Response::Uppercase(body))
    }
}

#[async_trait]
impl Endpoint for HttpClientEndpoint {
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(EndpointError::Cancelled),
            result = self.send(request) => result,
        }
    }
}
