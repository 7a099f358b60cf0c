//! Xlate Sema - semantic model construction for the bytecode translator.
//!
//! Turns raw assembly declarations into a resolved, queryable model that
//! code generation consumes:
//! - structural member identity across independent declarations
//! - proxy overlays that substitute or extend a target type's members
//! - deterministic overload grouping and visible naming
//! - enum value tables
//! - cascading "emit or ignore" classification
//!
//! # Architecture
//!
//! ```text
//! DeclStore ──► SemaDb (MetadataSource)
//!                 ├─ get_module ─► ModuleInfo
//!                 ├─ get_proxies ─► [ProxyInfo]
//!                 ├─ get_type ───► TypeInfo ─► MemberInfo, MethodGroup, EnumMember
//!                 └─ get_member ─► MemberInfo
//! ```
//!
//! Every record is built at most once and shared through `Arc`.

mod config;
mod error;
mod ignored;
mod member;
mod member_id;
mod metadata;
mod naming;
mod proxy;
mod source;
mod type_info;

use std::sync::Once;

pub use config::{AnnotationNames, SemaConfig};
pub use error::SemaError;
pub use ignored::is_ignored_name;
pub use member::{
    EnumMember, EventInfo, FieldInfo, Member, MemberCore, MemberInfo, MethodGroup, MethodInfo,
    PropertyInfo,
};
pub use member_id::{types_match, MemberIdentifier, MemberKind, MemberTable, ParamTypes};
pub use metadata::MetadataCollection;
pub use naming::{declared_name, visible_name, OVERLOAD_SEPARATOR};
pub use proxy::{declared_targets, resolve, AttributePolicy, MemberPolicy, ProxyConfig, ProxyInfo};
pub use source::{MetadataSource, SemaDb};
pub use type_info::{ModuleInfo, TypeInfo};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early to enable tracing. Controlled by `RUST_LOG` env var:
/// - `RUST_LOG=xlate_sema=debug` - record construction and proxy decisions
/// - `RUST_LOG=xlate_sema=trace` - also overload group assignment
///
/// Does nothing when `RUST_LOG` is unset, and only initializes once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
