//! # Field Registry
//!
//! Explicit, per-type table of queryable field paths.
//!
//! Each path maps to an accessor returning every value found at that path.
//! A path through an optional record yields zero values when the record is
//! absent; a path through a collection yields one value per element, so a
//! criterion matches if any element matches.
//!
//! ```ignore
//! lazy_static! {
//!     static ref REGISTRY: FieldRegistry<Negotiation> = FieldRegistry::new()
//!         .field("id", |n| vec![n.id.clone().into()])
//!         .field("contractOffers.assetId", |n| {
//!             n.offers.iter().map(|o| o.asset_id.clone().into()).collect()
//!         });
//! }
//! ```

use super::value::FieldValue;
use std::collections::BTreeMap;

/// Accessor for a statically registered path.
pub type Accessor<T> = fn(&T) -> Vec<FieldValue>;

/// Accessor for open property maps; receives the full requested path.
pub type DynamicAccessor<T> = fn(&T, &str) -> Vec<FieldValue>;

/// Types that can be filtered and sorted by the query engine.
pub trait Queryable: Sized + 'static {
    fn registry() -> &'static FieldRegistry<Self>;
}

pub struct FieldRegistry<T> {
    fields: BTreeMap<&'static str, Accessor<T>>,
    dynamic: Option<(&'static str, DynamicAccessor<T>)>,
}

impl<T> FieldRegistry<T> {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            dynamic: None,
        }
    }

    /// Registers `path`.
    pub fn field(mut self, path: &'static str, accessor: Accessor<T>) -> Self {
        self.fields.insert(path, accessor);
        self
    }

    /// Accepts any unregistered path starting with `prefix` (property
    /// bags). An empty prefix accepts every path.
    pub fn dynamic(mut self, prefix: &'static str, accessor: DynamicAccessor<T>) -> Self {
        self.dynamic = Some((prefix, accessor));
        self
    }

    /// Resolves `path`, or `None` if the type does not expose it.
    pub fn resolve(&self, path: &str) -> Option<FieldRef<T>> {
        if let Some(accessor) = self.fields.get(path) {
            return Some(FieldRef::Static(*accessor));
        }
        match self.dynamic {
            Some((prefix, accessor)) if path.starts_with(prefix) => {
                Some(FieldRef::Dynamic(accessor, path.to_string()))
            }
            _ => None,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl<T> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved field path.
pub enum FieldRef<T> {
    Static(Accessor<T>),
    Dynamic(DynamicAccessor<T>, String),
}

impl<T> FieldRef<T> {
    pub fn values(&self, item: &T) -> Vec<FieldValue> {
        match self {
            Self::Static(accessor) => accessor(item),
            Self::Dynamic(accessor, path) => accessor(item, path),
        }
    }

    /// First value at the path; used as the sort key.
    pub fn first(&self, item: &T) -> Option<FieldValue> {
        self.values(item).into_iter().next()
    }
}

impl<T> Clone for FieldRef<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(accessor) => Self::Static(*accessor),
            Self::Dynamic(accessor, path) => Self::Dynamic(*accessor, path.clone()),
        }
    }
}

impl<T> std::fmt::Debug for FieldRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.write_str("FieldRef::Static"),
            Self::Dynamic(_, path) => write!(f, "FieldRef::Dynamic({path})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Item {
        id: String,
        tags: Vec<String>,
        props: HashMap<String, String>,
    }

    fn item() -> Item {
        Item {
            id: "a".to_string(),
            tags: vec!["x".to_string(), "y".to_string()],
            props: HashMap::from([("color".to_string(), "red".to_string())]),
        }
    }

    #[test]
    fn test_static_resolution() {
        let registry =
            FieldRegistry::<Item>::new().field("id", |i| vec![i.id.clone().into()]);

        let field = registry.resolve("id").unwrap();
        assert_eq!(field.first(&item()), Some(FieldValue::from("a")));
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn test_collection_yields_every_element() {
        let registry = FieldRegistry::<Item>::new().field("tags", |i| {
            i.tags.iter().map(|t| t.clone().into()).collect()
        });

        let values = registry.resolve("tags").unwrap().values(&item());
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_dynamic_fallback_receives_path() {
        let registry = FieldRegistry::<Item>::new()
            .field("id", |i| vec![i.id.clone().into()])
            .dynamic("props.", |i, path| {
                path.strip_prefix("props.")
                    .and_then(|key| i.props.get(key))
                    .map(Into::into)
                    .into_iter()
                    .collect()
            });

        let color = registry.resolve("props.color").unwrap();
        assert_eq!(color.first(&item()), Some(FieldValue::from("red")));

        let unknown = registry.resolve("props.size").unwrap();
        assert!(unknown.values(&item()).is_empty());

        assert!(registry.resolve("size").is_none());
    }

    #[test]
    fn test_paths_listing() {
        let registry = FieldRegistry::<Item>::new()
            .field("b", |_| Vec::new())
            .field("a", |_| Vec::new());
        assert_eq!(registry.paths().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
