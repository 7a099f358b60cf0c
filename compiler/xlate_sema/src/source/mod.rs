//! The metadata source: memoized construction of semantic records.
//!
//! `SemaDb` owns the declaration store and builds each module, type and
//! proxy record at most once, however many threads ask for it. Every key
//! maps to a shared write-once cell. The first caller builds the record
//! while concurrent callers block on the same cell, and all of them get
//! the same `Arc` (or the same error).
//!
//! # Locking
//!
//! A `DashMap` shard lock is held only long enough to fetch or insert the
//! cell. Building a type record queries other keys (its module, its
//! proxies), so construction must never run under a shard lock.
//!
//! # Proxy lookup
//!
//! Proxies are found through an index of the target names their
//! annotations mention, read straight from the declarations. A type's
//! query builds only the proxy records that name it, so a broken proxy
//! fails the types it targets and `resolve_all`, nothing else.

use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashMap};
use xlate_ir::{DeclRef, DeclStore, ModuleId, TypeId};

use crate::member::MemberInfo;
use crate::proxy::{declared_targets, ProxyInfo};
use crate::type_info::{ModuleInfo, TypeInfo};
use crate::{SemaConfig, SemaError};

/// Read access to the semantic model.
///
/// Records are immutable snapshots shared through `Arc`. All failures are
/// fatal for the metadata-resolution pass.
pub trait MetadataSource: Sync {
    /// The declarations this source was built over.
    fn decls(&self) -> &DeclStore;

    fn config(&self) -> &SemaConfig;

    fn get_module(&self, id: ModuleId) -> Result<Arc<ModuleInfo>, SemaError>;

    fn get_type(&self, id: TypeId) -> Result<Arc<TypeInfo>, SemaError>;

    /// The record of a member declaration, from its declaring type's record.
    ///
    /// Module and type handles fail with `UnsupportedKind`.
    fn get_member(&self, decl: DeclRef) -> Result<Arc<MemberInfo>, SemaError>;

    /// Proxies targeting `id`, in registration order.
    fn get_proxies(&self, id: TypeId) -> Result<Arc<[Arc<ProxyInfo>]>, SemaError>;
}

type Cell<T> = Arc<OnceLock<Result<Arc<T>, SemaError>>>;

/// Write-once cells keyed by declaration handle.
struct Memo<K, T> {
    cells: DashMap<K, Cell<T>, FxBuildHasher>,
}

impl<K: Eq + Hash, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self {
            cells: DashMap::with_hasher(FxBuildHasher),
        }
    }
}

impl<K: Eq + Hash, T> Memo<K, T> {
    fn get_or_build(
        &self,
        key: K,
        build: impl FnOnce() -> Result<T, SemaError>,
    ) -> Result<Arc<T>, SemaError> {
        // Clone the cell out so the shard lock is released before building.
        let cell = Arc::clone(&*self.cells.entry(key).or_default());
        cell.get_or_init(|| build().map(Arc::new)).clone()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Default)]
struct ProxyIndex {
    /// Every type carrying the proxy marker, in declaration order.
    proxies: Vec<TypeId>,
    /// Proxied type full name -> proxy types, in registration order.
    targets: FxHashMap<String, Vec<TypeId>>,
}

/// The memoizing metadata source.
pub struct SemaDb {
    decls: DeclStore,
    config: SemaConfig,
    modules: Memo<ModuleId, ModuleInfo>,
    types: Memo<TypeId, TypeInfo>,
    proxies: Memo<TypeId, ProxyInfo>,
    proxy_index: OnceLock<ProxyIndex>,
}

impl SemaDb {
    pub fn new(decls: DeclStore, config: SemaConfig) -> Self {
        Self {
            decls,
            config,
            modules: Memo::default(),
            types: Memo::default(),
            proxies: Memo::default(),
            proxy_index: OnceLock::new(),
        }
    }

    /// The record of proxy type `id`.
    pub fn get_proxy(&self, id: TypeId) -> Result<Arc<ProxyInfo>, SemaError> {
        self.proxies.get_or_build(id, || {
            ProxyInfo::build(&self.decls, &self.config.annotations, id)
        })
    }

    /// Build every proxy and type record in parallel.
    ///
    /// Returns type records in declaration order, or the first failure.
    /// Proxies are validated even when they target no declared type.
    #[tracing::instrument(level = "debug", skip_all, fields(types = self.decls.types().count()))]
    pub fn resolve_all(&self) -> Result<Vec<Arc<TypeInfo>>, SemaError> {
        self.proxy_index()
            .proxies
            .par_iter()
            .try_for_each(|&id| self.get_proxy(id).map(drop))?;
        let ids: Vec<TypeId> = self.decls.types().collect();
        ids.par_iter().map(|&id| self.get_type(id)).collect()
    }

    /// Number of type records built so far.
    pub fn built_type_count(&self) -> usize {
        self.types.len()
    }

    /// Scan every type once for the proxy annotation.
    fn proxy_index(&self) -> &ProxyIndex {
        self.proxy_index.get_or_init(|| self.build_proxy_index())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn build_proxy_index(&self) -> ProxyIndex {
        let marker = &self.config.annotations.proxy;
        let mut index = ProxyIndex::default();
        for id in self.decls.types() {
            let mut is_proxy = false;
            for annotation in self.decls.annotations(DeclRef::Type(id)) {
                if annotation.kind != *marker {
                    continue;
                }
                is_proxy = true;
                for target in declared_targets(&annotation.args) {
                    let proxies = index.targets.entry(target.to_owned()).or_default();
                    if !proxies.contains(&id) {
                        proxies.push(id);
                    }
                }
            }
            if is_proxy {
                index.proxies.push(id);
            }
        }
        tracing::debug!(
            proxies = index.proxies.len(),
            targets = index.targets.len(),
            "proxy index built"
        );
        index
    }
}

impl MetadataSource for SemaDb {
    fn decls(&self) -> &DeclStore {
        &self.decls
    }

    fn config(&self) -> &SemaConfig {
        &self.config
    }

    fn get_module(&self, id: ModuleId) -> Result<Arc<ModuleInfo>, SemaError> {
        self.modules.get_or_build(id, || {
            Ok(ModuleInfo::build(&self.decls, &self.config.annotations, id))
        })
    }

    fn get_type(&self, id: TypeId) -> Result<Arc<TypeInfo>, SemaError> {
        self.types.get_or_build(id, || TypeInfo::build(self, id))
    }

    fn get_member(&self, decl: DeclRef) -> Result<Arc<MemberInfo>, SemaError> {
        let Some(owner) = self.decls.declaring_type(decl) else {
            return Err(SemaError::UnsupportedKind {
                name: self.decls.qualified_name(decl),
                found: decl.kind_name(),
                expected: "a field, property, event or method",
            });
        };
        let info = self.get_type(owner)?;
        info.member_for(decl).cloned().ok_or_else(|| {
            SemaError::configuration(
                self.decls.qualified_name(decl),
                format!("member is not part of the record of `{}`", info.full_name()),
            )
        })
    }

    fn get_proxies(&self, id: TypeId) -> Result<Arc<[Arc<ProxyInfo>]>, SemaError> {
        let full_name = &self.decls.type_decl(id).full_name;
        let Some(proxy_ids) = self.proxy_index().targets.get(full_name) else {
            return Ok(Arc::from([]));
        };
        proxy_ids
            .iter()
            .map(|&proxy| self.get_proxy(proxy))
            .collect::<Result<Vec<_>, _>>()
            .map(Arc::from)
    }
}
