//! A conformance harness validating a Mustache template engine against the
//! portable Mustache specification corpus.
//!
//! The engine under test plugs in through [`TemplateEngine`]; the harness
//! loads each spec group's YAML file, projects its records into cases,
//! binds lambda fixtures to prebuilt callables, and drives the engine one
//! case at a time, asserting exact output equality.
//!
//! ```rust,no_run
//! use mustache_conformance::{run_suite, report_results, summarize, Executor, RunConfig};
//! # struct MyEngine;
//! # use std::collections::HashMap;
//! # use mustache_conformance::{EngineFault, RenderableTemplate, TemplateEngine, Value};
//! # struct MyTemplate;
//! # impl RenderableTemplate for MyTemplate {
//! #     fn render(&self, _: &Value) -> Result<String, EngineFault> { Ok(String::new()) }
//! # }
//! # impl TemplateEngine for MyEngine {
//! #     type Template = MyTemplate;
//! #     fn set_partials(&mut self, _: HashMap<String, String>) {}
//! #     fn load_template(&mut self, _: &str) -> Result<MyTemplate, EngineFault> { Ok(MyTemplate) }
//! # }
//!
//! let mut engine = MyEngine;
//! let config = RunConfig::with_root("spec/specs");
//! let mut executor = Executor::new(&mut engine);
//! let reports = run_suite(&mut executor, &config);
//! report_results(&reports, &config);
//! assert!(summarize(&reports).is_clean());
//! ```

pub mod case;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod lambdas;
pub mod runner;
pub mod spec;
pub mod value;

pub use case::ConformanceCase;
pub use engine::{EngineFault, RenderableTemplate, TemplateEngine};
pub use errors::HarnessError;
pub use executor::{CaseOutcome, Executor, FailureDetail};
pub use lambdas::{bind, Binding, LambdaRegistry, DEFAULT_IMPLEMENTATION_TAG, LAMBDA_KEY};
pub use runner::{
    report_results, run_group, run_suite, summarize, CaseResult, GroupReport, RunConfig,
    SuiteSummary,
};
pub use spec::{load_records, SpecGroup, SpecRecord};
pub use value::{Lambda, LambdaFn, Value};
