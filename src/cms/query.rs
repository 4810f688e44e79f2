//! Object queries: type, filters, projection, depth, limit, sort

use serde_json::{Map, Value};

/// A find query against one object type
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub object_type: String,
    /// Equality filters on dotted paths such as `metadata.featured`
    pub filters: Vec<(String, Value)>,
    /// Projected fields; empty means everything
    pub props: Vec<String>,
    /// How many levels of object references to resolve inline
    pub depth: u8,
    pub limit: Option<usize>,
    /// Field to sort by, `-` prefix for descending
    pub sort: Option<String>,
}

impl Query {
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            filters: Vec::new(),
            props: Vec::new(),
            depth: 0,
            limit: None,
            sort: None,
        }
    }

    pub fn filter(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((path.into(), value.into()));
        self
    }

    pub fn props(mut self, props: &[&str]) -> Self {
        self.props = props.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// The `query` JSON document sent to the objects API
    pub fn selector(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.object_type.clone()));
        for (path, value) in &self.filters {
            map.insert(path.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Comma-separated projection, if any
    pub fn props_param(&self) -> Option<String> {
        (!self.props.is_empty()).then(|| self.props.join(","))
    }
}

/// Look up a dotted path inside a JSON value
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}
