//! Token flow client bound to a single service identity.

pub mod common;

mod client_credentials;

pub use common::*;

// self
use crate::{_prelude::*, auth::Identity, http::TokenHttpClient};
#[cfg(feature = "reqwest")]
use crate::{
	http::{self, HttpClientSettings, ReqwestHttpClient},
	tls::TransportConfig,
};

#[cfg(feature = "reqwest")]
/// Token flows specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenFlows = TokenFlows<ReqwestHttpClient>;

/// Construction options for [`ReqwestTokenFlows`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
	/// Client used for every request; synthesized from the identity when unset.
	pub http_client: Option<ReqwestHttpClient>,
	/// Settings applied when the client is synthesized.
	pub settings: HttpClientSettings,
}
#[cfg(feature = "reqwest")]
impl ClientOptions {
	/// Supplies a pre-built client. Its TLS setup is used as-is, even for certificate-based
	/// identities.
	pub fn with_http_client(mut self, client: impl Into<ReqwestHttpClient>) -> Self {
		self.http_client = Some(client.into());

		self
	}

	/// Overrides the settings used when the client is synthesized.
	pub fn with_settings(mut self, settings: HttpClientSettings) -> Self {
		self.settings = settings;

		self
	}
}

/// Issues client-credentials tokens for one identity.
///
/// Constructed once per identity and shared freely afterwards: every call only reads the
/// identity, the HTTP client, and the precomputed default token endpoint.
pub struct TokenFlows<C>
where
	C: ?Sized + TokenHttpClient,
{
	identity: Identity,
	http_client: Arc<C>,
	token_endpoint: Url,
}
impl<C> TokenFlows<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates token flows that reuse the caller-provided transport.
	///
	/// The caller is responsible for the transport's TLS setup.
	pub fn with_http_client(identity: Identity, http_client: impl Into<Arc<C>>) -> Result<Self> {
		let token_endpoint = common::default_token_endpoint(identity.url())?;

		Ok(Self { identity, http_client: http_client.into(), token_endpoint })
	}

	/// Identity the flows authenticate as.
	pub fn identity(&self) -> &Identity {
		&self.identity
	}

	/// Shared HTTP client.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Token endpoint used when no tenant override is supplied.
	pub fn token_endpoint(&self) -> &Url {
		&self.token_endpoint
	}
}
#[cfg(feature = "reqwest")]
impl TokenFlows<ReqwestHttpClient> {
	/// Creates token flows for `identity`.
	///
	/// Without a client in `options`, one is built from the identity: certificate-based
	/// identities get a mutual-TLS transport, secret-based identities the stock transport.
	pub fn new(identity: Identity, options: ClientOptions) -> Result<Self> {
		let http_client = match options.http_client {
			Some(client) => client,
			None => http::build_http_client(
				TransportConfig::from_identity(&identity)?,
				&options.settings,
			)?,
		};

		Self::with_http_client(identity, http_client)
	}
}
impl<C> Clone for TokenFlows<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			identity: self.identity.clone(),
			http_client: Arc::clone(&self.http_client),
			token_endpoint: self.token_endpoint.clone(),
		}
	}
}
impl<C> Debug for TokenFlows<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenFlows")
			.field("client_id", &self.identity.client_id())
			.field("certificate_based", &self.identity.is_certificate_based())
			.field("token_endpoint", &self.token_endpoint.as_str())
			.finish()
	}
}
