//! Front-end configuration.
//!
//! The annotation vocabulary is a contract shared with the rest of the
//! translator. It is configurable so a toolchain can ship its own
//! annotation assembly under a different namespace.

/// Full names of the annotation kinds the front-end reacts to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationNames {
    /// Marks a declaration that must not be emitted.
    pub ignore: String,
    /// Renames a declaration; one string argument.
    pub rename: String,
    /// Marks a type as a proxy; policies and targets in any order.
    pub proxy: String,
    /// Marks an enum as a flags enum.
    pub flags: String,
    /// Disables overload suffixing in favor of runtime dispatch.
    pub runtime_dispatch: String,
    /// Enum type of the proxy's attribute-policy argument.
    pub attribute_policy_enum: String,
    /// Enum type of the proxy's member-policy argument.
    pub member_policy_enum: String,
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            ignore: "Xlate.Meta.IgnoreAttribute".to_owned(),
            rename: "Xlate.Meta.RenameAttribute".to_owned(),
            proxy: "Xlate.Meta.ProxyAttribute".to_owned(),
            flags: "System.FlagsAttribute".to_owned(),
            runtime_dispatch: "Xlate.Meta.RuntimeDispatchAttribute".to_owned(),
            attribute_policy_enum: "Xlate.Meta.ProxyAttributePolicy".to_owned(),
            member_policy_enum: "Xlate.Meta.ProxyMemberPolicy".to_owned(),
        }
    }
}

/// Configuration for semantic model construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SemaConfig {
    pub annotations: AnnotationNames,
}

impl SemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: AnnotationNames) -> Self {
        self.annotations = annotations;
        self
    }
}
