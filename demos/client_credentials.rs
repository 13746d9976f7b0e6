//! Demonstrates fetching a client-credentials token for a secret-based identity, then for a
//! tenant override, against a local mock authentication service.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_token_flows::{
	auth::Identity,
	context::RequestContext,
	flows::{ClientOptions, RequestOptions, TokenFlows},
	http::ReqwestHttpClient,
	reqwest::Client,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}");
		})
		.await;
	let identity = Identity::with_secret(server.url(""), "demo-client", "super-secret");
	// The mock service presents a self-signed certificate on its HTTPS side.
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let flows = TokenFlows::new(identity, ClientOptions::default().with_http_client(http_client))?;
	let ctx = RequestContext::background().with_timeout(Duration::from_secs(5));
	let options = RequestOptions::default().with_param("resource", "urn:demo:resource");
	let token = flows.client_credentials(&ctx, None, &options).await?;

	println!("Access token for `{}`: {token}.", flows.token_endpoint());

	let tenant_url = server.url("/any/path");
	let token = flows.client_credentials(&ctx, Some(tenant_url.as_str()), &options).await?;

	println!("Access token for tenant override `{tenant_url}`: {token}.");

	token_mock.assert_calls_async(2).await;

	Ok(())
}
