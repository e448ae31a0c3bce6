//! Akismet request builder, dispatcher and response interpreter.
//!
//! # Design
//! `AkismetClient` owns its credentials, the current submission fields and an
//! injected `Transport`. Each network operation is a linear
//! validate → build → send → interpret sequence:
//!
//! - `build_*` checks the key, then the blog, and produces an `HttpRequest`
//!   without touching the network.
//! - The request goes through `Transport::send` exactly once.
//! - Only the body text is interpreted. Status codes are logged when they are
//!   not 2xx but never change the result.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::fields::{Credentials, Field, FieldValue, Submission};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpVersion, Transport};

/// Body returned by `submit-spam` and `submit-ham` on success.
pub const SUBMIT_THANKS: &str = "Thanks for making the web a better place.";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const API_HOST: &str = "rest.akismet.com";
const API_VERSION: &str = "1.1";

/// The four Akismet endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    VerifyKey,
    CommentCheck,
    SubmitSpam,
    SubmitHam,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::VerifyKey => "verify-key",
            Endpoint::CommentCheck => "comment-check",
            Endpoint::SubmitSpam => "submit-spam",
            Endpoint::SubmitHam => "submit-ham",
        }
    }

    /// Absolute URL. Everything except `verify-key` is addressed through the
    /// key as a subdomain.
    pub fn url(self, key: &str) -> String {
        match self {
            Endpoint::VerifyKey => format!("https://{API_HOST}/{API_VERSION}/{}", self.path()),
            _ => format!("https://{key}.{API_HOST}/{API_VERSION}/{}", self.path()),
        }
    }
}

macro_rules! text_accessors {
    ($($getter:ident / $setter:ident),* $(,)?) => {
        $(
            pub fn $getter(&self) -> Option<&str> {
                self.submission.$getter.as_deref()
            }

            pub fn $setter(&mut self, value: impl Into<String>) -> &mut Self {
                self.submission.$getter = Some(value.into());
                self
            }
        )*
    };
}

/// Stateful client for the Akismet API.
///
/// Setters return `&mut Self` so configuration can be chained. Network
/// operations take `&self`; sharing one client between threads needs external
/// synchronization because the setters mutate in place.
#[derive(Debug, Clone)]
pub struct AkismetClient<T> {
    transport: T,
    credentials: Credentials,
    submission: Submission,
}

impl<T> AkismetClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            credentials: Credentials::default(),
            submission: Submission::default(),
        }
    }

    pub fn with_credentials(transport: T, key: impl Into<String>, blog: impl Into<String>) -> Self {
        let mut client = Self::new(transport);
        client.set_key(key).set_blog(blog);
        client
    }

    /// Build a client from a configuration document: credentials first, then
    /// `params` merged through `set_params`.
    pub fn from_config(transport: T, config: ClientConfig) -> Self {
        let mut client = Self::new(transport);
        client.credentials.key = config.key;
        client.credentials.blog = config.blog;
        client.set_params(&config.params);
        client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn key(&self) -> Option<&str> {
        self.credentials.key.as_deref()
    }

    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.credentials.key = Some(key.into());
        self
    }

    pub fn blog(&self) -> Option<&str> {
        self.credentials.blog.as_deref()
    }

    pub fn set_blog(&mut self, blog: impl Into<String>) -> &mut Self {
        self.credentials.blog = Some(blog.into());
        self
    }

    text_accessors!(
        user_ip / set_user_ip,
        user_agent / set_user_agent,
        referrer / set_referrer,
        permalink / set_permalink,
        comment_type / set_comment_type,
        comment_author / set_comment_author,
        comment_author_email / set_comment_author_email,
        comment_author_url / set_comment_author_url,
        comment_content / set_comment_content,
        comment_date_gmt / set_comment_date_gmt,
        comment_post_modified_gmt / set_comment_post_modified_gmt,
        blog_lang / set_blog_lang,
        blog_charset / set_blog_charset,
        user_role / set_user_role,
    );

    pub fn is_test(&self) -> Option<bool> {
        self.submission.is_test
    }

    pub fn set_is_test(&mut self, is_test: bool) -> &mut Self {
        self.submission.is_test = Some(is_test);
        self
    }

    /// Read any wire field. `Field::Blog` reads the credential.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Blog => self.credentials.blog.clone().map(FieldValue::Text),
            _ => self.submission.get(field),
        }
    }

    /// Write any wire field. `Field::Blog` writes the credential.
    pub fn set(&mut self, field: Field, value: impl Into<FieldValue>) -> &mut Self {
        self.store(field, Some(value.into()));
        self
    }

    /// Clear a single field.
    pub fn unset(&mut self, field: Field) -> &mut Self {
        self.store(field, None);
        self
    }

    /// Merge a flat map of snake_case field names into the current state.
    ///
    /// Keys missing from `params` are left untouched and unknown keys are
    /// ignored. `null` clears a field; numbers and booleans are stringified
    /// for text fields. Arrays and objects are skipped.
    pub fn set_params(&mut self, params: &Map<String, Value>) -> &mut Self {
        for (name, value) in params {
            let Some(field) = Field::from_name(name) else {
                debug!(param = %name, "ignoring unknown parameter");
                continue;
            };
            let value = match value {
                Value::Null => None,
                Value::String(text) => Some(FieldValue::Text(text.clone())),
                Value::Bool(flag) => Some(FieldValue::Flag(*flag)),
                Value::Number(number) => Some(FieldValue::Text(number.to_string())),
                Value::Array(_) | Value::Object(_) => {
                    warn!(param = %name, "ignoring non-scalar parameter value");
                    continue;
                }
            };
            self.store(field, value);
        }
        self
    }

    /// Unset every submission field. Credentials are kept.
    pub fn flush(&mut self) -> &mut Self {
        self.submission.clear();
        self
    }

    /// The parameters sent by `check`, `spam` and `ham`, in wire order.
    /// Fields that are not set are omitted.
    pub fn get_params(&self) -> Vec<(&'static str, String)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field.name(), value.encode())))
            .collect()
    }

    pub fn build_verify_key(&self) -> Result<HttpRequest> {
        let (key, blog) = self.require_credentials()?;
        // verify-key takes the blog URL already percent-encoded inside the form.
        let blog = urlencoding::encode(blog);
        let body = form_body(&[("key", key), ("blog", blog.as_ref())][..])?;
        Ok(form_request(Endpoint::VerifyKey.url(key), body))
    }

    pub fn build_check(&self) -> Result<HttpRequest> {
        self.build_submission(Endpoint::CommentCheck)
    }

    pub fn build_spam(&self) -> Result<HttpRequest> {
        self.build_submission(Endpoint::SubmitSpam)
    }

    pub fn build_ham(&self) -> Result<HttpRequest> {
        self.build_submission(Endpoint::SubmitHam)
    }

    fn build_submission(&self, endpoint: Endpoint) -> Result<HttpRequest> {
        let (key, _) = self.require_credentials()?;
        let body = form_body(&self.get_params())?;
        Ok(form_request(endpoint.url(key), body))
    }

    /// Key first, then blog. Empty strings count as unset. The key becomes a
    /// hostname label, so anything but ASCII alphanumerics and inner `-` is
    /// rejected before a URL is formed.
    fn require_credentials(&self) -> Result<(&str, &str)> {
        let key = self.credentials.usable_key().ok_or(ClientError::KeyNotSet)?;
        if !is_host_label(key) {
            return Err(ClientError::KeyMalformed);
        }
        let blog = self.credentials.usable_blog().ok_or(ClientError::BlogNotSet)?;
        Ok((key, blog))
    }

    fn store(&mut self, field: Field, value: Option<FieldValue>) {
        match field {
            Field::Blog => self.credentials.blog = value.map(|value| value.encode()),
            _ => self.submission.set(field, value),
        }
    }
}

impl<T: Transport> AkismetClient<T> {
    /// Verify the key against the blog. Fails with `KeyInvalid` only when the
    /// service answers exactly `invalid`; any other body counts as valid.
    pub fn verify_key(&self) -> Result<bool> {
        let request = self.build_verify_key()?;
        let response = self.dispatch(Endpoint::VerifyKey, &request)?;
        if response.text() == "invalid" {
            if let Some(help) = response.header("X-akismet-debug-help") {
                warn!(help, "Akismet rejected the API key");
            }
            return Err(ClientError::KeyInvalid);
        }
        Ok(true)
    }

    /// Classify the current submission. `true` means spam.
    pub fn check(&self) -> Result<bool> {
        let request = self.build_check()?;
        let response = self.dispatch(Endpoint::CommentCheck, &request)?;
        Ok(response.text() == "true")
    }

    /// Report the current submission as missed spam.
    pub fn spam(&self) -> Result<bool> {
        let request = self.build_spam()?;
        let response = self.dispatch(Endpoint::SubmitSpam, &request)?;
        Ok(response.text() == SUBMIT_THANKS)
    }

    /// Report the current submission as a false positive.
    pub fn ham(&self) -> Result<bool> {
        let request = self.build_ham()?;
        let response = self.dispatch(Endpoint::SubmitHam, &request)?;
        Ok(response.text() == SUBMIT_THANKS)
    }

    fn dispatch(&self, endpoint: Endpoint, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(
            endpoint = endpoint.path(),
            fields = self.submission.len(),
            "sending Akismet request"
        );
        let response = self.transport.send(request)?;
        if !response.is_success() {
            warn!(
                endpoint = endpoint.path(),
                status = response.status,
                "Akismet answered with a non-success status"
            );
        }
        Ok(response)
    }
}

/// Form-encode a sequence of name/value pairs, preserving order.
fn form_body<P: Serialize + ?Sized>(pairs: &P) -> Result<String> {
    Ok(serde_urlencoded::to_string(pairs)?)
}

/// A single DNS label: 1 to 63 ASCII alphanumerics or `-`, not at either end.
fn is_host_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn form_request(url: String, body: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
        body: Some(body),
        version: HttpVersion::Http11,
    }
}
