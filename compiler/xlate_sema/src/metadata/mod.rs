//! Per-declaration index of attached annotations.
//!
//! A `MetadataCollection` groups annotations by kind name. Each group has
//! set semantics: identical annotations collapse, but insertion order is
//! kept so diagnostics and argument recovery are deterministic.

use std::collections::BTreeMap;

use xlate_ir::{Annotation, AnnotationArg, DeclRef, DeclStore};

use crate::SemaError;

/// Annotations of one declaration (or a merge of several), keyed by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataCollection {
    /// Qualified name of the declaration this was built from.
    owner: String,

    /// Kind name -> distinct annotations (`BTreeMap` for deterministic iteration).
    entries: BTreeMap<String, Vec<Annotation>>,
}

impl MetadataCollection {
    /// Create an empty collection.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Collect the given annotations.
    pub fn from_annotations<'a>(
        owner: impl Into<String>,
        annotations: impl IntoIterator<Item = &'a Annotation>,
    ) -> Self {
        let mut collection = Self::new(owner);
        for annotation in annotations {
            collection.insert(annotation.clone());
        }
        collection
    }

    /// Scan every annotation attached to `decl`.
    pub fn from_declaration(store: &DeclStore, decl: DeclRef) -> Self {
        Self::from_annotations(store.qualified_name(decl), store.annotations(decl))
    }

    fn insert(&mut self, annotation: Annotation) {
        let set = self.entries.entry(annotation.kind.clone()).or_default();
        if !set.contains(&annotation) {
            set.push(annotation);
        }
    }

    /// Qualified name of the declaration this collection describes.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn has(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// All annotations of a kind; empty if absent.
    pub fn get(&self, kind: &str) -> &[Annotation] {
        self.entries
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Constructor arguments of the single annotation of `kind`.
    ///
    /// Returns `None` when absent and a configuration error when more than
    /// one distinct annotation of that kind is present.
    pub fn get_single_constructor_args(
        &self,
        kind: &str,
    ) -> Result<Option<&[AnnotationArg]>, SemaError> {
        match self.get(kind) {
            [] => Ok(None),
            [single] => Ok(Some(&single.args)),
            many => Err(SemaError::configuration(
                &self.owner,
                format!("{} `{kind}` annotations where at most one is allowed", many.len()),
            )),
        }
    }

    /// First string argument of the single annotation of `kind`.
    ///
    /// An annotation without a string argument is a configuration error.
    pub fn get_single_string(&self, kind: &str) -> Result<Option<&str>, SemaError> {
        let Some(args) = self.get_single_constructor_args(kind)? else {
            return Ok(None);
        };
        match args.iter().find_map(AnnotationArg::as_str) {
            Some(value) => Ok(Some(value)),
            None => Err(SemaError::configuration(
                &self.owner,
                format!("`{kind}` requires a string argument"),
            )),
        }
    }

    /// Merge `other` into this collection.
    ///
    /// With `replace`, existing entries are dropped first; otherwise the
    /// two collections are unioned.
    pub fn update(&mut self, other: &MetadataCollection, replace: bool) {
        if replace {
            self.entries.clear();
        }
        for annotations in other.entries.values() {
            for annotation in annotations {
                self.insert(annotation.clone());
            }
        }
    }

    /// Annotation kinds present, in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total number of distinct annotations.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
