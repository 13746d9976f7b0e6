//! Service identity descriptor consumed by the transport setup and token flows.
//!
//! An [`Identity`] is produced by whatever layer reads service bindings or environment
//! configuration. The flows only read it: the base URL of the authentication service, the
//! client identifier, and exactly one [`Credential`].

// self
use crate::{_prelude::*, auth::Secret};

/// Credential form a service identity authenticates with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
	/// Shared client secret sent in the token request body.
	Secret(SecretCredential),
	/// X.509 client certificate presented during the TLS handshake.
	Certificate(CertificateCredential),
}

/// Shared-secret credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretCredential {
	/// Client secret issued by the authentication service.
	pub client_secret: Secret,
}

/// Mutual-TLS credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateCredential {
	/// PEM encoded certificate (chain), leaf first.
	pub certificate: String,
	/// PEM encoded private key matching the leaf certificate.
	pub key: Secret,
}

/// Immutable descriptor of a service identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
	url: String,
	client_id: String,
	credential: Credential,
}
impl Identity {
	/// Creates an identity from its parts.
	pub fn new(url: impl Into<String>, client_id: impl Into<String>, credential: Credential) -> Self {
		Self { url: url.into(), client_id: client_id.into(), credential }
	}

	/// Creates an identity that authenticates with a shared client secret.
	pub fn with_secret(
		url: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<Secret>,
	) -> Self {
		Self::new(
			url,
			client_id,
			Credential::Secret(SecretCredential { client_secret: client_secret.into() }),
		)
	}

	/// Creates an identity that authenticates with an X.509 certificate and private key.
	pub fn with_certificate(
		url: impl Into<String>,
		client_id: impl Into<String>,
		certificate: impl Into<String>,
		key: impl Into<Secret>,
	) -> Self {
		Self::new(
			url,
			client_id,
			Credential::Certificate(CertificateCredential {
				certificate: certificate.into(),
				key: key.into(),
			}),
		)
	}

	/// Base URL of the authentication service.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Active credential.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Returns `true` when the identity authenticates via mutual TLS.
	pub fn is_certificate_based(&self) -> bool {
		matches!(self.credential, Credential::Certificate(_))
	}

	/// Returns the client secret when the identity carries a non-empty one.
	pub fn client_secret(&self) -> Option<&str> {
		match &self.credential {
			Credential::Secret(SecretCredential { client_secret }) if !client_secret.is_empty() =>
				Some(client_secret.expose()),
			_ => None,
		}
	}

	/// Returns the certificate credential of a certificate-based identity.
	pub fn certificate(&self) -> Option<&CertificateCredential> {
		match &self.credential {
			Credential::Certificate(credential) => Some(credential),
			Credential::Secret(_) => None,
		}
	}
}
