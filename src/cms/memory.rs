//! In-memory content source backed by a JSON fixtures file
//!
//! Used for offline development (`serve --fixtures content.json`) and in tests.
//! It honours the same query semantics as the objects API: type and equality
//! filters, sort, limit, reference depth and field projection. Empty results
//! are reported as not-found.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::query::lookup;
use super::{CmsError, ContentSource, Query};
use crate::helpers::slugify;

/// Content source holding every object in memory
pub struct MemorySource {
    objects: RwLock<Vec<Value>>,
    path: Option<PathBuf>,
}

impl MemorySource {
    /// Create a source from already-parsed objects
    pub fn new(objects: Vec<Value>) -> Self {
        Self {
            objects: RwLock::new(normalize(objects)),
            path: None,
        }
    }

    /// Parse fixtures text: either `{"objects": [...]}` or a bare array
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(parse_fixtures(text)?))
    }

    /// Load fixtures from a file; the path is remembered for [`reload`](Self::reload)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixtures {:?}", path))?;
        let objects = parse_fixtures(&text)
            .with_context(|| format!("Failed to parse fixtures {:?}", path))?;
        Ok(Self {
            objects: RwLock::new(normalize(objects)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Re-read the fixtures file, returning the new object count
    pub fn reload(&self) -> Result<usize> {
        let Some(path) = &self.path else {
            anyhow::bail!("Memory source was not loaded from a file");
        };
        let text = fs::read_to_string(path)?;
        let objects = normalize(parse_fixtures(&text)?);
        let count = objects.len();
        *self
            .objects
            .write()
            .map_err(|_| anyhow::anyhow!("Fixtures lock poisoned"))? = objects;
        Ok(count)
    }

    /// Path of the fixtures file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn find(&self, query: &Query) -> Result<Vec<Value>, CmsError> {
        let objects = self
            .objects
            .read()
            .map_err(|_| CmsError::Transport("fixtures lock poisoned".to_string()))?;

        let mut matched: Vec<&Value> = objects
            .iter()
            .filter(|obj| object_type(obj) == Some(query.object_type.as_str()))
            .filter(|obj| {
                query
                    .filters
                    .iter()
                    .all(|(path, expected)| lookup(obj, path) == Some(expected))
            })
            .collect();

        if let Some(sort) = &query.sort {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field, true),
                None => (sort.as_str(), false),
            };
            matched.sort_by(|a, b| {
                let ord = compare_values(lookup(a, field), lookup(b, field));
                if descending {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        if matched.is_empty() {
            return Err(CmsError::NotFound);
        }

        let index: HashMap<&str, &Value> = objects
            .iter()
            .filter_map(|obj| Some((obj.get("id")?.as_str()?, obj)))
            .collect();

        Ok(matched
            .into_iter()
            .map(|obj| {
                let resolved = resolve_references(obj, &index, query.depth);
                project(&resolved, &query.props)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

fn parse_fixtures(text: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(objects) => Ok(objects),
        Value::Object(mut map) => match map.remove("objects") {
            Some(Value::Array(objects)) => Ok(objects),
            _ => anyhow::bail!("Fixtures must contain an \"objects\" array"),
        },
        _ => anyhow::bail!("Fixtures must be an array or an object"),
    }
}

/// Rename the legacy `type_slug` discriminator to `type`, and derive missing
/// slugs from titles
fn normalize(objects: Vec<Value>) -> Vec<Value> {
    objects
        .into_iter()
        .map(|mut obj| {
            if let Some(map) = obj.as_object_mut() {
                if let Some(type_slug) = map.remove("type_slug") {
                    map.entry("type").or_insert(type_slug);
                }
                if !map.contains_key("slug") {
                    if let Some(title) = map.get("title").and_then(Value::as_str) {
                        let slug = slugify(title);
                        map.insert("slug".to_string(), Value::String(slug));
                    }
                }
            }
            obj
        })
        .collect()
}

fn object_type(obj: &Value) -> Option<&str> {
    obj.get("type")?.as_str()
}

/// Order two optional JSON values; missing values sort last
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_string().cmp(&b.to_string()),
        },
    }
}

/// Replace metadata values holding another object's id with that object
fn resolve_references(obj: &Value, index: &HashMap<&str, &Value>, depth: u8) -> Value {
    let mut obj = obj.clone();
    if depth == 0 {
        return obj;
    }

    if let Some(Value::Object(metadata)) = obj.get_mut("metadata") {
        let resolve = |value: &Value| {
            let target = value.as_str().and_then(|id| index.get(id))?;
            Some(resolve_references(target, index, depth - 1))
        };

        for value in metadata.values_mut() {
            if let Value::Array(items) = value {
                for item in items.iter_mut() {
                    if let Some(resolved) = resolve(item) {
                        *item = resolved;
                    }
                }
            } else if let Some(resolved) = resolve(value) {
                *value = resolved;
            }
        }
    }

    obj
}

/// Keep only the projected fields (dotted paths allowed)
fn project(obj: &Value, props: &[String]) -> Value {
    if props.is_empty() {
        return obj.clone();
    }

    let mut out = Map::new();
    for prop in props {
        if let Some(value) = lookup(obj, prop) {
            insert_path(&mut out, prop, value.clone());
        }
    }
    Value::Object(out)
}

fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixtures() -> MemorySource {
        MemorySource::new(vec![
            json!({"id": "t1", "slug": "ada", "title": "Ada", "type": "team-members",
                   "metadata": {"name": "Ada", "order": 2}}),
            json!({"id": "t2", "slug": "bob", "title": "Bob", "type_slug": "team-members",
                   "metadata": {"name": "Bob", "order": 1}}),
            json!({"id": "p1", "slug": "first", "title": "First", "type": "blog-posts",
                   "metadata": {"featured": true, "author": "t1",
                                "category": {"key": "design", "value": "Design"}}}),
            json!({"id": "p2", "slug": "second", "title": "Second", "type": "blog-posts",
                   "metadata": {"featured": false, "author": "t2",
                                "category": {"key": "strategy", "value": "Strategy"}}}),
        ])
    }

    #[tokio::test]
    async fn test_filters_by_type_and_path() {
        let source = fixtures();
        let found = source
            .find(&Query::new("blog-posts").filter("metadata.category.key", "design"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["slug"], "first");

        let team = source.find(&Query::new("team-members")).await.unwrap();
        assert_eq!(team.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let source = fixtures();
        let err = source
            .find(&Query::new("projects"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let err = source
            .find_one(&Query::new("blog-posts").filter("slug", "missing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_depth_resolves_references() {
        let source = fixtures();
        let shallow = source
            .find_one(&Query::new("blog-posts").filter("slug", "first"))
            .await
            .unwrap();
        assert_eq!(shallow["metadata"]["author"], "t1");

        let deep = source
            .find_one(&Query::new("blog-posts").filter("slug", "first").depth(1))
            .await
            .unwrap();
        assert_eq!(deep["metadata"]["author"]["metadata"]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_projection_sort_and_limit() {
        let source = fixtures();
        let team = source
            .find(
                &Query::new("team-members")
                    .props(&["slug", "metadata.order"])
                    .sort("metadata.order")
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(team, vec![json!({"slug": "bob", "metadata": {"order": 1}})]);
    }

    #[test]
    fn test_fixture_formats() {
        let wrapped = MemorySource::from_json(r#"{"objects": [{"id": "1"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 1);
        let bare = MemorySource::from_json(r#"[{"id": "1"}, {"id": "2"}]"#).unwrap();
        assert_eq!(bare.len(), 2);
        assert!(MemorySource::from_json(r#"{"items": []}"#).is_err());
    }

    #[tokio::test]
    async fn test_missing_slug_derived_from_title() {
        let source = MemorySource::new(vec![
            json!({"id": "x", "title": "Hello, World!", "type": "blog-posts", "metadata": {}}),
        ]);
        let post = source
            .find_one(&Query::new("blog-posts").filter("slug", "hello-world"))
            .await
            .unwrap();
        assert_eq!(post["id"], "x");
    }

    #[test]
    fn test_reload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        fs::write(&path, r#"[{"id": "1", "type": "projects"}]"#).unwrap();

        let source = MemorySource::load(&path).unwrap();
        assert_eq!(source.len(), 1);

        fs::write(&path, r#"[{"id": "1"}, {"id": "2"}, {"id": "3"}]"#).unwrap();
        assert_eq!(source.reload().unwrap(), 3);
        assert_eq!(source.len(), 3);

        assert!(MemorySource::new(Vec::new()).reload().is_err());
    }
}
