//! Per-case conformance execution.
//!
//! A case moves Pending → Skipped | Pass | Fail, with no retries. Faults
//! are isolated per case: one case's failure never aborts its siblings.

use std::fmt;

use crate::case::ConformanceCase;
use crate::engine::{RenderableTemplate, TemplateEngine};
use crate::lambdas::{self, Binding, LambdaRegistry, DEFAULT_IMPLEMENTATION_TAG};
use crate::spec::SpecGroup;

/// Terminal outcome of a single case.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Pass,
    Fail(FailureDetail),
    Skipped { reason: String },
}

/// What went wrong in a failed case.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDetail {
    /// The engine faulted compiling the template.
    EngineLoad { fault: String },
    /// The engine faulted rendering the template.
    EngineRender { fault: String },
    /// Rendering succeeded but the output differs from expected. Exact
    /// string equality; no trimming or normalization.
    Mismatch { expected: String, actual: String },
    /// The case's lambda fixture was structurally invalid.
    BadFixture { detail: String },
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureDetail::EngineLoad { fault } => write!(f, "engine load fault: {fault}"),
            FailureDetail::EngineRender { fault } => write!(f, "engine render fault: {fault}"),
            FailureDetail::Mismatch { expected, actual } => write!(
                f,
                "output did not match expected\n  Expected: {expected:?}\n  Actual:   {actual:?}"
            ),
            FailureDetail::BadFixture { detail } => write!(f, "bad lambda fixture: {detail}"),
        }
    }
}

/// Drives the engine under test for one case at a time.
pub struct Executor<'e, E: TemplateEngine> {
    engine: &'e mut E,
    implementation_tag: String,
    registry: LambdaRegistry,
}

impl<'e, E: TemplateEngine> Executor<'e, E> {
    /// An executor consuming `rust`-tagged fragments via the builtin
    /// registry.
    pub fn new(engine: &'e mut E) -> Self {
        Self::with_lambdas(
            engine,
            DEFAULT_IMPLEMENTATION_TAG,
            LambdaRegistry::builtin(),
        )
    }

    /// An executor with a custom implementation tag and fragment registry.
    pub fn with_lambdas(
        engine: &'e mut E,
        implementation_tag: impl Into<String>,
        registry: LambdaRegistry,
    ) -> Self {
        Self {
            engine,
            implementation_tag: implementation_tag.into(),
            registry,
        }
    }

    /// Runs one case to its terminal outcome.
    pub fn run(&mut self, group: SpecGroup, case: &ConformanceCase) -> CaseOutcome {
        let data = if group.uses_lambdas() {
            match lambdas::bind(&case.data, &self.implementation_tag, &self.registry) {
                Ok(Binding::Data(data)) => data,
                Ok(Binding::Skip(reason)) => return CaseOutcome::Skipped { reason },
                Err(e) => {
                    return CaseOutcome::Fail(FailureDetail::BadFixture {
                        detail: e.to_string(),
                    });
                }
            }
        } else {
            case.data.clone()
        };

        // Wholesale replacement, even when empty: clears any registry state
        // left by a prior case.
        self.engine.set_partials(case.partials.clone());

        let template = match self.engine.load_template(&case.template) {
            Ok(template) => template,
            Err(fault) => {
                return CaseOutcome::Fail(FailureDetail::EngineLoad {
                    fault: fault.to_string(),
                });
            }
        };
        let actual = match template.render(&data) {
            Ok(actual) => actual,
            Err(fault) => {
                return CaseOutcome::Fail(FailureDetail::EngineRender {
                    fault: fault.to_string(),
                });
            }
        };

        if actual == case.expected {
            CaseOutcome::Pass
        } else {
            CaseOutcome::Fail(FailureDetail::Mismatch {
                expected: case.expected.clone(),
                actual,
            })
        }
    }
}
