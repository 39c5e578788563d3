//! Adapters from [`StringService`] methods to [`Endpoint`]s.

use async_trait::async_trait;

use crate::endpoint::{
    CountResponse, Endpoint, EndpointError, Request, Response, UppercaseResponse,
};
use crate::service::StringService;

/// Endpoint for the uppercase operation.
#[derive(Debug, Clone)]
pub struct UppercaseEndpoint<S> {
    service: S,
}

/// Endpoint for the count operation.
#[derive(Debug, Clone)]
pub struct CountEndpoint<S> {
    service: S,
}

pub fn make_uppercase_endpoint<S: StringService>(service: S) -> UppercaseEndpoint<S> {
    UppercaseEndpoint { service }
}

pub fn make_count_endpoint<S: StringService>(service: S) -> CountEndpoint<S> {
    CountEndpoint { service }
}

#[async_trait]
impl<S> Endpoint for UppercaseEndpoint<S>
where
    S: StringService,
{
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        let req = match request {
            Request::Uppercase(req) => req,
            other => {
                return Err(EndpointError::UnexpectedRequest {
                    endpoint: "uppercase",
                    got: other.kind(),
                })
            }
        };

        // Service errors go into the payload; the endpoint call itself succeeds.
        let response = match self.service.uppercase(&req.s).await {
            Ok(v) => UppercaseResponse { v, err: None },
            Err(e) => UppercaseResponse {
                v: String::new(),
                err: Some(e.to_string()),
            },
        };
        Ok(Response::Uppercase(response))
    }
}

#[async_trait]
impl<S> Endpoint for CountEndpoint<S>
where
    S: StringService,
{
    async fn call(&self, request: Request) -> Result<Response, EndpointError> {
        match request {
            Request::Count(req) => {
                let v = self.service.count(&req.s).await;
                Ok(Response::Count(CountResponse { v }))
            }
            other => Err(EndpointError::UnexpectedRequest {
                endpoint: "count",
                got: other.kind(),
            }),
        }
    }
}
