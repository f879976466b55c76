//! Share links: the per-recipient key and the `?id=…&k=…` query that carries it.

use url::{form_urlencoded, Url};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{encoding, random_bytes};
use crate::error::ValidationError;

/// Byte length of a freshly generated link key before encoding.
pub const LINK_KEY_LEN: usize = 16;

/// Query parameter holding the recipient identifier.
pub const ID_PARAM: &str = "id";

/// Query parameter holding the link key.
pub const KEY_PARAM: &str = "k";

/// The secret carried in a share link: base64 text used as the passphrase.
///
/// Zeroed on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct LinkKey(Zeroizing<String>);

impl LinkKey {
    /// Generate [`LINK_KEY_LEN`] random bytes and encode them.
    pub fn generate() -> Self {
        let mut raw = random_bytes::<LINK_KEY_LEN>();
        let key = Self(Zeroizing::new(encoding::encode(raw)));
        raw.zeroize();
        key
    }

    /// Wrap a key taken from a link.
    pub fn from_encoded(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// The passphrase text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for LinkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LinkKey([REDACTED])")
    }
}

/// Build the share link for `recipient_id` under `base`.
///
/// Both values are form-urlencoded, so `+`, `/` and `=` in the key survive a
/// standard query parser unchanged. An existing query on `base` is kept.
pub fn build_link(base: &Url, recipient_id: &str, key: &LinkKey) -> String {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair(ID_PARAM, recipient_id)
        .append_pair(KEY_PARAM, key.as_str());
    url.into()
}

/// Parse and check the base URL links are built under.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for a blank base URL and
/// [`ValidationError::InvalidBaseUrl`] if it is not an absolute URL.
pub fn parse_base_url(base_url: &str) -> Result<Url, ValidationError> {
    let base = base_url.trim();
    if base.is_empty() {
        return Err(ValidationError::MissingField("base URL"));
    }
    match Url::parse(base) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ValidationError::InvalidBaseUrl(base.to_owned())),
    }
}

/// The `id` and `k` parameters of a link, as the viewer sees them.
///
/// The first occurrence of each parameter wins; an empty value counts as
/// absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LinkParams {
    /// Recipient identifier.
    pub recipient_id: Option<String>,
    /// Link key text.
    pub key: Option<String>,
}

impl LinkParams {
    /// Construct from already-decoded values.
    pub fn new(recipient_id: Option<&str>, key: Option<&str>) -> Self {
        Self {
            recipient_id: non_empty(recipient_id.map(str::to_owned)),
            key: non_empty(key.map(str::to_owned)),
        }
    }

    /// Parse a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut recipient_id = None;
        let mut key = None;
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            match name.as_ref() {
                ID_PARAM => {
                    recipient_id.get_or_insert_with(|| value.into_owned());
                }
                KEY_PARAM => {
                    key.get_or_insert_with(|| value.into_owned());
                }
                _ => {}
            }
        }
        Self {
            recipient_id: non_empty(recipient_id),
            key: non_empty(key),
        }
    }

    /// Parse the query of a full link.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidLink`] if `link` is not a URL.
    pub fn from_url(link: &str) -> Result<Self, ValidationError> {
        let url = Url::parse(link.trim()).map_err(|_| ValidationError::InvalidLink)?;
        Ok(Self::from_query(url.query().unwrap_or_default()))
    }
}

impl std::fmt::Debug for LinkParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkParams")
            .field("recipient_id", &self.recipient_id)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
