//! Compiler-synthesized name classification.
//!
//! Compilers emit scaffolding that must never reach the translated output
//! (the module root type, call-site caches, static-initializer helpers).
//! They also emit generated state the output depends on (closure classes,
//! lambda bodies, iterator state machines, auto-property backing fields).
//! Both are recognized purely by name.

use std::sync::LazyLock;

use regex::Regex;

/// `<scope>X__index`, where `X` is `b` (lambda body), `c` (closure class)
/// or `d` (iterator or async state machine).
#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static GENERATED_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^<>]*>[bcd]__\w*").expect("generated-state pattern is valid")
});

/// Substrings that mark a name as hidden scaffolding.
const HIDDEN_FRAGMENTS: &[&str] = &[
    "<Module>",
    "__SiteContainer",
    "$ArrayType$",
    "<PrivateImplementationDetails>",
    "Runtime.CompilerServices.CallSite",
    "__CachedAnonymousMethodDelegate",
];

/// Prefix of C#-compiler mangled helper names (`CS$<>9__...`).
const MANGLED_HELPER_PREFIX: &str = "CS$<";

/// Whether a name denotes generated state that must stay visible.
fn is_generated_state(name: &str) -> bool {
    GENERATED_STATE.is_match(name)
        || name.ends_with("__BackingField")
        || name.contains("__DisplayClass")
}

/// Whether `name` denotes compiler scaffolding that must not be emitted.
///
/// Exemptions for user-visible generated state are checked first and
/// short-circuit the hiding rules.
pub fn is_ignored_name(name: &str) -> bool {
    if is_generated_state(name) {
        return false;
    }

    name.starts_with(MANGLED_HELPER_PREFIX)
        || HIDDEN_FRAGMENTS
            .iter()
            .any(|fragment| name.contains(fragment))
}
