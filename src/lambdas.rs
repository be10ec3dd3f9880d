//! Lambda fixture binding.
//!
//! Records in the lambda spec group attach, under any `"lambda"` key in
//! their data tree, a fixture mapping implementation tags to literal source
//! fragments. The upstream harnesses evaluate their own tag's fragment at
//! run time; this port does not. Instead a [`LambdaRegistry`] maps each
//! fragment's exact source text to a statically compiled callable, and
//! binding is a lookup. A fixture with no fragment for the current tag, or
//! a fragment with no registered callable, skips the case rather than
//! failing it: missing per-implementation fixtures are an expected gap in
//! cross-implementation coverage.
//!
//! Binding rebuilds the data tree structurally. Sibling entries, key order,
//! and sequence order are untouched; only the `"lambda"` entry's value is
//! replaced.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::HarnessError;
use crate::value::{Lambda, LambdaFn, Value};

/// The data key whose value is a lambda fixture.
pub const LAMBDA_KEY: &str = "lambda";

/// The implementation tag this port consumes from fixtures by default.
pub const DEFAULT_IMPLEMENTATION_TAG: &str = "rust";

/// Maps a fragment's exact source text to its prebuilt callable.
#[derive(Clone, Default)]
pub struct LambdaRegistry {
    fragments: HashMap<String, LambdaFn>,
}

impl LambdaRegistry {
    /// An empty registry. Every lambda case will skip until fragments are
    /// registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callable under a fragment's exact source text,
    /// replacing any previous registration for the same text.
    pub fn register<F>(&mut self, fragment: impl Into<String>, func: F)
    where
        F: Fn(Option<&str>) -> Value + Send + Sync + 'static,
    {
        self.fragments.insert(fragment.into(), Arc::new(func));
    }

    /// Looks up the callable registered for a fragment's source text.
    pub fn lookup(&self, fragment: &str) -> Option<&LambdaFn> {
        self.fragments.get(fragment)
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The registry of canonical `~lambdas` fragments published under this
    /// port's `rust` tag. Callables here are pure: invoking one twice with
    /// the same text yields the same value. The upstream "Multiple Calls"
    /// counter fixture is stateful by construction and has no entry, so
    /// that case skips.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(r#"|_text| "world""#, |_| Value::from("world"));
        registry.register(r#"|_text| "{{planet}}""#, |_| Value::from("{{planet}}"));
        registry.register(r#"|_text| "|planet| => {{planet}}""#, |_| {
            Value::from("|planet| => {{planet}}")
        });
        registry.register(r#"|_text| ">""#, |_| Value::from(">"));
        registry.register(
            r#"|text| if text == Some("{{x}}") { "yes" } else { "no" }"#,
            |text| Value::from(if text == Some("{{x}}") { "yes" } else { "no" }),
        );
        registry.register(r#"|text| [text, "{{planet}}", text].concat()"#, |text| {
            let text = text.unwrap_or("");
            Value::String(format!("{text}{{{{planet}}}}{text}"))
        });
        registry.register(r#"|text| ["__", text, "__"].concat()"#, |text| {
            Value::String(format!("__{}__", text.unwrap_or("")))
        });
        registry.register(r#"|_text| false"#, |_| Value::from(false));
        registry
    }
}

/// Outcome of binding a case's data tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// All fixtures resolved; the rebuilt tree is ready to render.
    Data(Value),
    /// Some fixture had no usable fragment; the whole case skips.
    Skip(String),
}

/// How a single fixture resolved against the registry.
enum Resolution {
    Callable(Lambda),
    MissingTag,
    Unregistered,
}

/// Recursively resolves every lambda fixture in `data` against `registry`,
/// consuming only fragments tagged `tag`.
///
/// # Errors
///
/// Fails when a `"lambda"` key's value is not a tag-to-fragment mapping of
/// strings. Missing fragments are not errors; they surface as
/// [`Binding::Skip`].
pub fn bind(data: &Value, tag: &str, registry: &LambdaRegistry) -> Result<Binding, HarnessError> {
    match data {
        Value::Map(entries) => {
            let mut bound = Vec::with_capacity(entries.len());
            for (key, val) in entries {
                let val = if key == LAMBDA_KEY {
                    match resolve_fixture(val, tag, registry)? {
                        Resolution::Callable(lambda) => Value::Lambda(lambda),
                        Resolution::MissingTag => {
                            return Ok(Binding::Skip(format!("no '{tag}' fragment in fixture")));
                        }
                        Resolution::Unregistered => {
                            return Ok(Binding::Skip(format!(
                                "no prebuilt callable for '{tag}' fragment"
                            )));
                        }
                    }
                } else {
                    match bind(val, tag, registry)? {
                        Binding::Data(val) => val,
                        skip @ Binding::Skip(_) => return Ok(skip),
                    }
                };
                bound.push((key.clone(), val));
            }
            Ok(Binding::Data(Value::Map(bound)))
        }
        Value::List(items) => {
            let mut bound = Vec::with_capacity(items.len());
            for item in items {
                match bind(item, tag, registry)? {
                    Binding::Data(val) => bound.push(val),
                    skip @ Binding::Skip(_) => return Ok(skip),
                }
            }
            Ok(Binding::Data(Value::List(bound)))
        }
        scalar => Ok(Binding::Data(scalar.clone())),
    }
}

fn resolve_fixture(
    fixture: &Value,
    tag: &str,
    registry: &LambdaRegistry,
) -> Result<Resolution, HarnessError> {
    let Value::Map(entries) = fixture else {
        return Err(HarnessError::InvalidFixture {
            found: fixture.type_name(),
        });
    };
    let Some((_, fragment)) = entries.iter().find(|(key, _)| key == tag) else {
        return Ok(Resolution::MissingTag);
    };
    let Value::String(fragment) = fragment else {
        return Err(HarnessError::InvalidFixture {
            found: fragment.type_name(),
        });
    };
    match registry.lookup(fragment) {
        Some(func) => Ok(Resolution::Callable(Lambda::new(
            fragment.clone(),
            Arc::clone(func),
        ))),
        None => Ok(Resolution::Unregistered),
    }
}
