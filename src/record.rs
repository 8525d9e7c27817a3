use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A form-like object whose fields can be read and written by name.
/// This is the seam with the host that renders the form: derived-field rules read their
/// sources with `field` and publish their result with `set_field`.
pub trait Record {
    /// The current value of a field, or `None` if the field is absent or null.
    fn field(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Sets a field. Implementations that don't know `name` may ignore the write.
    fn set_field(&mut self, name: &str, value: String);
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.as_object()?.get(name)? {
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            serde_json::Value::Number(number) => Some(Cow::Owned(number.to_string())),
            serde_json::Value::Bool(value) => Some(Cow::Owned(value.to_string())),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => None,
        }
    }

    /// Writes are ignored unless the value is a JSON object.
    fn set_field(&mut self, name: &str, value: String) {
        if let Some(map) = self.as_object_mut() {
            map.insert(name.to_string(), serde_json::Value::String(value));
        }
    }
}

impl<S: BuildHasher> Record for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }

    fn set_field(&mut self, name: &str, value: String) {
        self.insert(name.to_string(), value);
    }
}
