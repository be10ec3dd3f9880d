//! The capability surface consumed from the engine under test.
//!
//! The harness drives exactly one engine per run through this seam: replace
//! the partials registry, load a template, render it. The engine's own
//! failure detail rides in [`EngineFault`] and is surfaced verbatim in case
//! failures.

use std::collections::HashMap;

use thiserror::Error;

use crate::value::Value;

/// An engine-specific fault raised during template load or render.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{detail}")]
pub struct EngineFault {
    detail: String,
}

impl EngineFault {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// A compiled template, bound to the partials registered at load time.
pub trait RenderableTemplate {
    /// Renders the template against a data tree.
    ///
    /// # Errors
    ///
    /// Returns the engine's fault detail when rendering fails.
    fn render(&self, data: &Value) -> Result<String, EngineFault>;
}

/// The template engine under test.
///
/// The engine owns a mutable partials registry. Callers must wholesale-
/// replace it before every load; the executor is the only load path in this
/// crate and does so unconditionally, so no case can observe a prior case's
/// partials.
pub trait TemplateEngine {
    type Template: RenderableTemplate;

    /// Replaces the partials registry. Never merges: an empty mapping
    /// clears it.
    fn set_partials(&mut self, partials: HashMap<String, String>);

    /// Compiles template source against the currently registered partials.
    ///
    /// # Errors
    ///
    /// Returns the engine's fault detail for malformed template source.
    fn load_template(&mut self, source: &str) -> Result<Self::Template, EngineFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_detail_rides_through_display() {
        let fault = EngineFault::new("unclosed section 'a'");
        assert_eq!(fault.detail(), "unclosed section 'a'");
        assert_eq!(fault.to_string(), fault.detail());
    }
}
