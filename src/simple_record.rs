use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::Record;

/// A simple implementation of `Record` that remembers every write, the way a form host
/// would see `set_field` calls. This is meant for testing / demonstration purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleRecord {
    fields: BTreeMap<String, String>,
    writes: Vec<(String, String)>,
}

impl SimpleRecord {
    pub fn new(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            writes: vec![],
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Changes a field without recording a write, like a user typing into the form.
    pub fn edit(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// Every `set_field` call, in order.
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Record for SimpleRecord {
    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(Cow::Borrowed)
    }

    fn set_field(&mut self, name: &str, value: String) {
        self.writes.push((name.to_string(), value.clone()));
        self.fields.insert(name.to_string(), value);
    }
}
