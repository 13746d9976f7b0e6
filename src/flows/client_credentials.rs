//! Client Credentials flow (RFC 6749, section 4.4).
//!
//! [`TokenFlows::client_credentials`] issues a token to the application itself, for
//! non-interactive callers (CLIs, batch jobs, service-to-service calls) without principal
//! propagation. Each call performs exactly one request: nothing is cached, nothing is retried.

// self
use crate::{
	_prelude::*,
	context::{Interruption, RequestContext},
	error::TransportError,
	flows::{RequestOptions, TokenFlows, common},
	http::TokenHttpClient,
	obs::{self, FlowOutcome, FlowSpan},
};

impl<C> TokenFlows<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Performs the `client_credentials` grant and returns the raw access token.
	///
	/// `tenant_url` targets another tenant's authentication service, e.g.
	/// `https://custom.accounts.example.com`; only its host is used. `None` targets the
	/// identity's own token endpoint. `ctx` can cancel the call or bound it with a deadline.
	pub async fn client_credentials(
		&self,
		ctx: &RequestContext,
		tenant_url: Option<&str>,
		options: &RequestOptions,
	) -> Result<String> {
		const STAGE: &str = "client_credentials";

		obs::record_flow_outcome(FlowOutcome::Attempt, None);

		let result = match self.resolve_endpoint(tenant_url) {
			Ok(endpoint) =>
				FlowSpan::new(STAGE, &endpoint)
					.instrument(self.request_token(ctx, endpoint, options))
					.await,
			Err(e) => Err(e),
		};

		match &result {
			Ok(_) => obs::record_flow_outcome(FlowOutcome::Success, None),
			Err(e) => {
				obs::record_flow_failure(e);
				obs::record_flow_outcome(FlowOutcome::Failure, Some(e));
			},
		}

		result
	}

	fn resolve_endpoint(&self, tenant_url: Option<&str>) -> Result<Url> {
		match tenant_url {
			Some(value) => Ok(common::resolve_tenant_endpoint(value)?),
			None => Ok(self.token_endpoint.clone()),
		}
	}

	async fn request_token(
		&self,
		ctx: &RequestContext,
		endpoint: Url,
		options: &RequestOptions,
	) -> Result<String> {
		let form = common::token_form(&self.identity, options);
		let request = common::token_request(&endpoint, &form)?;
		let response = match ctx.guard(self.http_client.send(request)).await {
			Ok(Ok(response)) => response,
			Ok(Err(e)) => return Err(TransportError::network(endpoint, e).into()),
			Err(Interruption::Cancelled) =>
				return Err(TransportError::Cancelled { url: endpoint }.into()),
			Err(Interruption::DeadlineExceeded) =>
				return Err(TransportError::DeadlineExceeded { url: endpoint }.into()),
		};

		common::parse_token_response(&endpoint, response)
	}
}
