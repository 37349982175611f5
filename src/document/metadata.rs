use serde_yaml::{Mapping, Value};

/// Ordered front matter fields owned by a single document
///
/// Keys keep their original order; overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    fields: Mapping,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(fields: Mapping) -> Self {
        Self { fields }
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a scalar field rendered as text, `None` when absent, null or not a scalar
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    pub fn get_str_or(&self, key: &str, default: &str) -> String {
        self.get_str(key).unwrap_or_else(|| default.to_string())
    }

    /// Unconditionally overwrite a field
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(Value::String(key.to_string()), value.into());
    }

    /// Insert a field only when its key is absent; an explicit null is kept
    ///
    /// Returns true when the value was inserted.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.contains(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.fields.iter()
    }
}

/// Render a YAML scalar the way it reads in the source (`1.0` stays `1.0`)
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut metadata = Metadata::new();
        metadata.set("title", "First");
        metadata.set("version", "1.0");
        metadata.set("title", "Second");

        let keys: Vec<_> = metadata.iter().map(|(k, _)| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["title", "version"]);
        assert_eq!(metadata.get_str("title"), Some("Second".to_string()));
    }

    #[test]
    fn test_set_default_keeps_existing() {
        let mut metadata = Metadata::new();
        metadata.set("author", "Ada");

        assert!(!metadata.set_default("author", "Grace"));
        assert!(metadata.set_default("date", "2024-01-01"));
        assert_eq!(metadata.get_str("author"), Some("Ada".to_string()));
        assert_eq!(metadata.get_str("date"), Some("2024-01-01".to_string()));
    }

    #[test]
    fn test_set_default_keeps_explicit_null() {
        let mut metadata: Metadata =
            Metadata::from_mapping(serde_yaml::from_str("author:\ntitle: x\n").unwrap());
        assert!(!metadata.set_default("author", "Ada"));
        assert_eq!(metadata.get("author"), Some(&Value::Null));
        assert_eq!(metadata.get_str("author"), None);
    }

    #[test]
    fn test_scalar_to_string() {
        let float: Value = serde_yaml::from_str("1.0").unwrap();
        assert_eq!(scalar_to_string(&float), Some("1.0".to_string()));

        let int: Value = serde_yaml::from_str("3").unwrap();
        assert_eq!(scalar_to_string(&int), Some("3".to_string()));

        let boolean: Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(scalar_to_string(&boolean), Some("true".to_string()));

        assert_eq!(scalar_to_string(&Value::Null), None);
        assert_eq!(scalar_to_string(&Value::Sequence(vec![])), None);
    }

    #[test]
    fn test_get_str_or() {
        let metadata = Metadata::new();
        assert_eq!(metadata.get_str_or("version", "unversioned"), "unversioned");
    }
}
