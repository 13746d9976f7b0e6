//! Shared helpers for token flows (endpoint resolution, form assembly, response validation).

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request, StatusCode,
		header::{CONTENT_TYPE, HeaderValue},
	},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Identity,
	error::{ConfigError, EndpointError, RequestFailedError, ResponseError},
};

/// Path of the token endpoint below an authentication service base URL.
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth2/token";

const CLIENT_ID: &str = "client_id";
const CLIENT_SECRET: &str = "client_secret";
const GRANT_TYPE: &str = "grant_type";
const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-call token request options.
///
/// Every entry is added to the form body after `client_id`/`client_secret`, so callers may
/// override those. `grant_type` is always forced to `client_credentials`: an entry named
/// `grant_type` is silently replaced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Form parameters added to (or overriding) the request body.
	pub params: HashMap<String, String>,
}
impl RequestOptions {
	/// Adds or replaces a form parameter.
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());

		self
	}
}
impl<K, V> FromIterator<(K, V)> for RequestOptions
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self { params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
	}
}

/// Resolves a tenant override into that tenant's token endpoint.
///
/// The override only contributes its host (and explicit port); the scheme is always `https`
/// and the path is always [`TOKEN_ENDPOINT_PATH`]. An explicit port is kept even when it is the
/// default port of the override's own scheme, so `http://host:80` targets `https://host:80`.
pub fn resolve_tenant_endpoint(tenant_url: &str) -> Result<Url, EndpointError> {
	let looks_like_url = tenant_url.starts_with("http");

	match Url::parse(tenant_url) {
		Ok(parsed) => match parsed.host_str().filter(|host| !host.is_empty()) {
			Some(host) => {
				let endpoint = match parsed.port().or_else(|| explicit_port(tenant_url)) {
					Some(port) => format!("https://{host}:{port}{TOKEN_ENDPOINT_PATH}"),
					None => format!("https://{host}{TOKEN_ENDPOINT_PATH}"),
				};

				Url::parse(&endpoint).map_err(|source| EndpointError::Unparseable {
					value: tenant_url.to_owned(),
					source,
				})
			},
			None if looks_like_url => Err(EndpointError::MissingHost { value: tenant_url.to_owned() }),
			None => Err(EndpointError::MissingScheme { value: tenant_url.to_owned() }),
		},
		Err(source) if looks_like_url =>
			Err(EndpointError::Unparseable { value: tenant_url.to_owned(), source }),
		Err(_) => Err(EndpointError::MissingScheme { value: tenant_url.to_owned() }),
	}
}

// `Url` normalizes away a port equal to the scheme default; read it from the raw authority.
fn explicit_port(tenant_url: &str) -> Option<u16> {
	let (_, rest) = tenant_url.split_once("://")?;
	let authority = rest.split(['/', '?', '#']).next()?;
	let host_port = authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port);
	let (_, port) = host_port.rsplit_once(':')?;

	port.parse().ok()
}

/// Assembles the client-credentials form for `identity`.
///
/// Order of precedence: identity parameters, then caller options, then the fixed grant type.
pub fn token_form(identity: &Identity, options: &RequestOptions) -> BTreeMap<String, String> {
	let mut form = BTreeMap::new();

	form.insert(CLIENT_ID.into(), identity.client_id().into());

	if let Some(secret) = identity.client_secret() {
		form.insert(CLIENT_SECRET.into(), secret.into());
	}
	for (name, value) in &options.params {
		form.insert(name.clone(), value.clone());
	}

	form.insert(GRANT_TYPE.into(), GRANT_TYPE_CLIENT_CREDENTIALS.into());

	form
}

pub(crate) fn default_token_endpoint(base_url: &str) -> Result<Url> {
	let raw = format!("{}{TOKEN_ENDPOINT_PATH}", base_url.trim_end_matches('/'));

	Url::parse(&raw).map_err(|source| ConfigError::InvalidTokenEndpoint { url: raw, source }.into())
}

pub(crate) fn token_request(endpoint: &Url, form: &BTreeMap<String, String>) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new()).extend_pairs(form.iter()).finish();

	Request::builder()
		.method(Method::POST)
		.uri(endpoint.as_str())
		.header(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE))
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

#[derive(Deserialize)]
struct TokenResponse {
	access_token: Option<String>,
}

pub(crate) fn parse_token_response(endpoint: &Url, response: HttpResponse) -> Result<String> {
	let status = response.status();

	if status != StatusCode::OK {
		return Err(RequestFailedError {
			url: endpoint.clone(),
			status: status.as_u16(),
			body: String::from_utf8_lossy(response.body()).into_owned(),
		}
		.into());
	}

	let mut deserializer = serde_json::Deserializer::from_slice(response.body());
	// A JSON `null` body is a response without a token, not a malformed one.
	let payload: Option<TokenResponse> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseError::Malformed { url: endpoint.clone(), source })?;

	match payload.and_then(|payload| payload.access_token) {
		Some(token) if !token.is_empty() => Ok(token),
		_ => Err(ResponseError::MissingAccessToken { url: endpoint.clone() }.into()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	fn endpoint() -> Url {
		Url::parse("https://auth.example.com/oauth2/token").expect("Failed to parse endpoint.")
	}

	fn response(status: u16, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() = StatusCode::from_u16(status).expect("Status should be valid.");

		response
	}

	#[test]
	fn tenant_override_forces_https_and_token_path() {
		let cases = [
			("https://tenant.accounts.example.com", "https://tenant.accounts.example.com/oauth2/token"),
			("http://tenant.example.com/some/path?q=1", "https://tenant.example.com/oauth2/token"),
			("https://tenant.example.com:8443/", "https://tenant.example.com:8443/oauth2/token"),
			("http://127.0.0.1:9000", "https://127.0.0.1:9000/oauth2/token"),
			("http://tenant.example.com:80", "https://tenant.example.com:80/oauth2/token"),
			("http://user@tenant.example.com:80/x", "https://tenant.example.com:80/oauth2/token"),
			("http://[::1]:80", "https://[::1]:80/oauth2/token"),
			("http://[::1]/path", "https://[::1]/oauth2/token"),
		];

		for (input, expected) in cases {
			let resolved = resolve_tenant_endpoint(input)
				.unwrap_or_else(|e| panic!("Override `{input}` should resolve: {e}."));

			assert_eq!(resolved.as_str(), expected);
		}
	}

	#[test]
	fn schemeless_overrides_are_not_urls() {
		for input in ["tenant.example.com", "", "localhost:8080"] {
			let err = resolve_tenant_endpoint(input).expect_err("Override should be rejected.");

			assert!(
				matches!(err, EndpointError::MissingScheme { ref value } if value == input),
				"Unexpected error for `{input}`: {err:?}."
			);
		}
	}

	#[test]
	fn malformed_urls_report_parse_failures() {
		let err = resolve_tenant_endpoint("https://").expect_err("Empty host should be rejected.");

		assert!(matches!(err, EndpointError::Unparseable { .. }));

		let err =
			resolve_tenant_endpoint("http://[::1").expect_err("Broken IPv6 host should be rejected.");

		assert!(matches!(err, EndpointError::Unparseable { .. }));

		let err = resolve_tenant_endpoint("httpx:opaque").expect_err("Host-less URL should fail.");

		assert!(matches!(err, EndpointError::MissingHost { .. }));
	}

	#[test]
	fn secret_identities_send_their_secret() {
		let identity = Identity::with_secret("https://auth.example.com", "client", "secret");
		let form = token_form(&identity, &RequestOptions::default());

		assert_eq!(form.get("client_id").map(String::as_str), Some("client"));
		assert_eq!(form.get("client_secret").map(String::as_str), Some("secret"));
		assert_eq!(form.get("grant_type").map(String::as_str), Some("client_credentials"));
	}

	#[test]
	fn certificate_identities_omit_the_secret() {
		let identity =
			Identity::with_certificate("https://auth.example.com", "client", "CERT", "KEY");
		let form = token_form(&identity, &RequestOptions::default());

		assert!(!form.contains_key("client_secret"));
		assert_eq!(form.len(), 2);
	}

	#[test]
	fn caller_options_override_credentials_but_not_grant_type() {
		let identity = Identity::with_secret("https://auth.example.com", "client", "secret");
		let options = RequestOptions::default()
			.with_param("client_id", "other-client")
			.with_param("client_secret", "other-secret")
			.with_param("grant_type", "password")
			.with_param("resource", "urn:sap:identity:app");
		let form = token_form(&identity, &options);

		assert_eq!(form.get("client_id").map(String::as_str), Some("other-client"));
		assert_eq!(form.get("client_secret").map(String::as_str), Some("other-secret"));
		assert_eq!(form.get("grant_type").map(String::as_str), Some("client_credentials"));
		assert_eq!(form.get("resource").map(String::as_str), Some("urn:sap:identity:app"));
	}

	#[test]
	fn token_request_is_a_form_post() {
		let form: BTreeMap<String, String> =
			[("client_id", "a b"), ("grant_type", "client_credentials"), ("scope", "x&y=z")]
				.into_iter()
				.map(|(k, v)| (k.to_owned(), v.to_owned()))
				.collect();
		let request = token_request(&endpoint(), &form).expect("Request should build.");

		assert_eq!(request.method(), &Method::POST);
		assert_eq!(request.uri().to_string(), "https://auth.example.com/oauth2/token");
		assert_eq!(
			request.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/x-www-form-urlencoded")
		);
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"client_id=a+b&grant_type=client_credentials&scope=x%26y%3Dz"
		);
	}

	#[test]
	fn successful_response_yields_token() {
		let token = parse_token_response(
			&endpoint(),
			response(200, r#"{"access_token":"abc123","token_type":"bearer"}"#),
		)
		.expect("Token should be extracted.");

		assert_eq!(token, "abc123");
	}

	#[test]
	fn empty_or_missing_token_is_a_semantic_error() {
		for body in ["{}", "null", r#"{"access_token":""}"#, r#"{"access_token":null}"#] {
			let err = parse_token_response(&endpoint(), response(200, body))
				.expect_err("Missing tokens should be rejected.");

			assert!(
				matches!(err, Error::Response(ResponseError::MissingAccessToken { .. })),
				"Unexpected error for `{body}`: {err:?}."
			);
		}
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		for body in ["not json", r#"{"access_token":42}"#] {
			let err = parse_token_response(&endpoint(), response(200, body))
				.expect_err("Malformed bodies should be rejected.");

			assert!(
				matches!(err, Error::Response(ResponseError::Malformed { .. })),
				"Unexpected error for `{body}`: {err:?}."
			);
		}
	}

	#[test]
	fn non_success_status_keeps_body() {
		let err = parse_token_response(&endpoint(), response(403, "denied"))
			.expect_err("Non-200 responses should fail.");

		match err {
			Error::RequestFailed(failed) => {
				assert_eq!(failed.status, 403);
				assert_eq!(failed.body, "denied");
				assert_eq!(failed.url, endpoint());
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
