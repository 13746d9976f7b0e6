//! Transport primitives for token exchanges.
//!
//! [`TokenHttpClient`] is the only dependency the token flows have on an HTTP stack: a single
//! "send this request, hand back the response" operation expressed with the `oauth2` crate's
//! [`HttpRequest`]/[`HttpResponse`] types. [`ReqwestHttpClient`] is the default implementation,
//! and [`build_http_client`] is the factory that turns an optional
//! [`TransportConfig`](crate::tls::TransportConfig) into one.

// crates.io
use oauth2::{HttpClientError, HttpRequest, HttpResponse};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, tls::TransportConfig};

/// Request timeout applied to every call made through the default client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Idle connections kept per host when a custom transport configuration is attached.
pub const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 50;

/// Future returned by [`TokenHttpClient::send`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing token requests.
///
/// Implementations must send the request exactly as given: no retries, no rewriting of the
/// method, URI, headers, or body. Cancellation is cooperative: the token flows drop the returned
/// future when the caller's [`RequestContext`](crate::context::RequestContext) fires, so the
/// future must abort its in-flight work on drop. Implementations are shared across tasks and must
/// be `Send + Sync + 'static`.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves with the complete response, body included.
	fn send(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Settings applied when the default HTTP client is synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HttpClientSettings {
	/// Upper bound for every request, connect through body.
	pub timeout: Duration,
	/// Idle connections kept per host when a transport configuration is attached.
	pub max_idle_connections: usize,
}
impl HttpClientSettings {
	/// Overrides the request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the idle-connection cap.
	pub fn with_max_idle_connections(mut self, max: usize) -> Self {
		self.max_idle_connections = max;

		self
	}
}
impl Default for HttpClientSettings {
	fn default() -> Self {
		Self { timeout: DEFAULT_REQUEST_TIMEOUT, max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS }
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// The caller is responsible for the client's TLS configuration.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestClient> for ReqwestHttpClient {
	fn from(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn send(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let response =
				self.0.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(Box::new)?;
			let mut response_new = HttpResponse::new(body.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Builds the default HTTP client with the crate's default [`HttpClientSettings`].
#[cfg(feature = "reqwest")]
pub fn default_http_client(transport: Option<TransportConfig>) -> Result<ReqwestHttpClient> {
	build_http_client(transport, &HttpClientSettings::default())
}

/// Builds an HTTP client around an optional transport configuration.
///
/// Every request is bounded by `settings.timeout`. A transport configuration replaces reqwest's
/// TLS setup and caps idle connection reuse at `settings.max_idle_connections`; without one the
/// stock transport is used.
#[cfg(feature = "reqwest")]
pub fn build_http_client(
	transport: Option<TransportConfig>,
	settings: &HttpClientSettings,
) -> Result<ReqwestHttpClient> {
	let mut builder = ReqwestClient::builder().timeout(settings.timeout);

	if let Some(transport) = transport {
		builder = builder
			.use_preconfigured_tls(transport.into_client_config())
			.pool_max_idle_per_host(settings.max_idle_connections);
	}

	let client = builder.build().map_err(ConfigError::from)?;

	Ok(ReqwestHttpClient::with_client(client))
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// self
	use super::*;
	use crate::auth::Identity;

	const CERT_PEM: &str = include_str!("../tests/fixtures/identity.crt");
	const KEY_PEM: &str = include_str!("../tests/fixtures/identity.key");

	#[test]
	fn settings_default_to_named_constants() {
		let settings = HttpClientSettings::default();

		assert_eq!(settings.timeout, Duration::from_secs(10));
		assert_eq!(settings.max_idle_connections, 50);

		let tuned = settings.with_timeout(Duration::from_secs(3)).with_max_idle_connections(5);

		assert_eq!(tuned.timeout, Duration::from_secs(3));
		assert_eq!(tuned.max_idle_connections, 5);
	}

	#[test]
	fn builds_client_without_transport_config() {
		assert!(default_http_client(None).is_ok());
	}

	#[test]
	fn builds_client_with_transport_config() {
		let identity = Identity::with_certificate(
			"https://auth.example.com",
			"mtls-client",
			CERT_PEM,
			KEY_PEM,
		);
		let transport = TransportConfig::from_identity_with_roots(&identity, Vec::new())
			.expect("Fixture key pair should produce a transport config.");

		assert!(transport.is_some());
		assert!(default_http_client(transport).is_ok());
	}
}
