//! Push payloads and their form encoding.

use std::collections::BTreeMap;

use crate::types::DeviceId;

/// Form field carrying the target device.
pub const DEVICE_ID_FIELD: &str = "device_id";

/// URL-encoded form data for a push request.
///
/// Keys are kept sorted and each key maps to an ordered list of values, so a
/// multi-valued key (the `items` of a list) is emitted once per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushForm {
    fields: BTreeMap<String, Vec<String>>,
}

impl PushForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values of `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to `key`, keeping any existing values.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Builder-style [`PushForm::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style multi-value insert. An empty `values` still records the key.
    #[must_use]
    pub fn with_all<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let entry = self.fields.entry(key.into()).or_default();
        entry.extend(values.into_iter().map(Into::into));
        self
    }

    /// First value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values of `key`, in insertion order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.fields.remove(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set `device_id` to the given device.
    pub fn set_device_id(&mut self, id: DeviceId) {
        self.set(DEVICE_ID_FIELD, id.to_string());
    }

    /// Key/value pairs in encoding order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// Encode as `application/x-www-form-urlencoded`, keys sorted.
    #[must_use]
    pub fn encode(&self) -> String {
        self.pairs()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode one form component, with spaces as `+`.
fn encode_component(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

impl<K, V> FromIterator<(K, V)> for PushForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (k, v) in iter {
            form.add(k, v);
        }
        form
    }
}

/// A typed push payload, discriminated by the `type` form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push {
    Note { title: String, body: String },
    Link { title: String, url: String },
    Address { name: String, address: String },
    List { title: String, items: Vec<String> },
}

impl Push {
    /// Value of the `type` discriminant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Note { .. } => "note",
            Self::Link { .. } => "link",
            Self::Address { .. } => "address",
            Self::List { .. } => "list",
        }
    }

    /// Form fields for this payload, without a target.
    #[must_use]
    pub fn to_form(&self) -> PushForm {
        let form = PushForm::new().with("type", self.kind());
        match self {
            Self::Note { title, body } => form.with("title", title).with("body", body),
            Self::Link { title, url } => form.with("title", title).with("url", url),
            Self::Address { name, address } => form.with("name", name).with("address", address),
            Self::List { title, items } => form
                .with("title", title)
                .with_all("items", items.iter().map(String::as_str)),
        }
    }
}

impl From<&Push> for PushForm {
    fn from(push: &Push) -> Self {
        push.to_form()
    }
}

impl From<Push> for PushForm {
    fn from(push: Push) -> Self {
        push.to_form()
    }
}
