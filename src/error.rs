//! Error types shared across the transport setup, endpoint resolution, and token flows.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal to client construction.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Tenant override could not be resolved into a token endpoint.
	#[error(transparent)]
	Endpoint(#[from] EndpointError),
	/// Transport failure (DNS, TCP, TLS, timeout, cancellation).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with a non-success status.
	#[error(transparent)]
	RequestFailed(#[from] RequestFailedError),
	/// Token endpoint answered `200 OK` with an unusable body.
	#[error(transparent)]
	Response(#[from] ResponseError),
}
impl Error {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Config(_) => "config",
			Self::Endpoint(_) => "endpoint",
			Self::Transport(_) => "transport",
			Self::RequestFailed(_) => "request_failed",
			Self::Response(_) => "response",
		}
	}
}

/// Configuration failures raised while preparing a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Identity certificate PEM contains no certificate.
	#[error("Identity certificate does not contain a PEM encoded certificate.")]
	MissingCertificate,
	/// Identity key PEM contains no private key.
	#[error("Identity key does not contain a PEM encoded private key.")]
	MissingPrivateKey,
	/// Certificate or key PEM could not be decoded.
	#[error("Identity certificate or key is not valid PEM.")]
	InvalidPem {
		/// Underlying PEM decoding failure.
		#[source]
		source: BoxError,
	},
	/// Certificate and key do not form a usable client certificate.
	#[error("Identity certificate and key do not form a valid key pair.")]
	InvalidKeyPair {
		/// Underlying TLS library failure.
		#[source]
		source: BoxError,
	},
	/// Platform trust store could not be loaded.
	#[error("Platform trust store is unavailable: {reason}.")]
	TrustStoreUnavailable {
		/// Summary of the platform loader failures.
		reason: String,
	},
	/// Identity certificate could not be added to the trust store.
	#[error("Identity certificate could not be added to the trust store.")]
	TrustAnchor {
		/// Underlying TLS library failure.
		#[source]
		source: BoxError,
	},
	/// Crypto provider rejected the requested protocol versions.
	#[error("TLS protocol versions are not supported by the crypto provider.")]
	ProtocolVersions {
		/// Underlying TLS library failure.
		#[source]
		source: BoxError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Identity base URL does not form a valid token endpoint.
	#[error("Identity URL `{url}` does not form a valid token endpoint.")]
	InvalidTokenEndpoint {
		/// Offending endpoint string.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures resolving a tenant override into a token endpoint.
#[derive(Debug, ThisError)]
pub enum EndpointError {
	/// Value does not look like a URL at all.
	#[error(
		"Customer tenant URL `{value}` is not a valid URL: a hostname without a scheme cannot be parsed."
	)]
	MissingScheme {
		/// Offending tenant override.
		value: String,
	},
	/// Value looks like a URL but could not be parsed.
	#[error("Customer tenant URL `{value}` cannot be parsed.")]
	Unparseable {
		/// Offending tenant override.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Value parsed but carries no host.
	#[error("Customer tenant URL `{value}` cannot be parsed: no host provided.")]
	MissingHost {
		/// Offending tenant override.
		value: String,
	},
}

/// Transport-level failures (network, cancellation, deadline).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a failure.
	#[error("Request to `{url}` failed.")]
	Network {
		/// Target URL of the failed request.
		url: Url,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Caller cancelled the request context.
	#[error("Request to `{url}` failed: context canceled.")]
	Cancelled {
		/// Target URL of the abandoned request.
		url: Url,
	},
	/// Caller deadline elapsed before the response arrived.
	#[error("Request to `{url}` failed: context deadline exceeded.")]
	DeadlineExceeded {
		/// Target URL of the abandoned request.
		url: Url,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(url: Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url, source: Box::new(src) }
	}

	/// Returns the URL the failed request targeted.
	pub fn url(&self) -> &Url {
		match self {
			Self::Network { url, .. } | Self::Cancelled { url } | Self::DeadlineExceeded { url } =>
				url,
		}
	}

	/// Returns `true` when the failure originates from the caller's request context.
	pub fn is_context(&self) -> bool {
		matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
	}
}

/// Non-success response returned by the token endpoint.
#[derive(Debug, ThisError)]
#[error("Request to `{url}` failed with status code `{status}` and payload: `{body}`.")]
pub struct RequestFailedError {
	/// Target URL of the failed request.
	pub url: Url,
	/// HTTP status code returned by the token endpoint.
	pub status: u16,
	/// Raw response body, kept for diagnostics.
	pub body: String,
}
impl RequestFailedError {
	/// Returns the HTTP status code of the failed request.
	pub fn status_code(&self) -> u16 {
		self.status
	}
}

/// Token endpoint answered `200 OK` but the payload is unusable.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Body is not the expected JSON document.
	#[error("Error parsing response from `{url}`.")]
	Malformed {
		/// Target URL of the request.
		url: Url,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Body is valid JSON without a usable access token.
	#[error(
		"Error parsing requested client credentials token from `{url}`: no access_token property provided."
	)]
	MissingAccessToken {
		/// Target URL of the request.
		url: Url,
	},
}
