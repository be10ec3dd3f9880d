//! Suite driving and reporting.
//!
//! Execution is fully sequential: one group at a time, one case at a time.
//! A group whose spec file is absent is reported skipped; a group whose
//! file is malformed is aborted without touching other groups.

use std::path::PathBuf;

use difference::Changeset;

use crate::case::ConformanceCase;
use crate::engine::TemplateEngine;
use crate::errors::HarnessError;
use crate::executor::{CaseOutcome, Executor, FailureDetail};
use crate::spec::{self, SpecGroup};

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";

/// Where the spec corpus lives and how results are printed.
pub struct RunConfig {
    /// Directory holding the per-group YAML files.
    pub spec_root: PathBuf,
    pub use_colors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            spec_root: PathBuf::from("spec/specs"),
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }
}

impl RunConfig {
    pub fn with_root(spec_root: impl Into<PathBuf>) -> Self {
        Self {
            spec_root: spec_root.into(),
            ..Self::default()
        }
    }

    /// Apply color formatting to text if colors are enabled.
    pub fn colorize(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// One case's label and terminal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub label: String,
    pub outcome: CaseOutcome,
}

/// Outcome of running one spec group.
#[derive(Debug)]
pub enum GroupReport {
    /// The group's spec file does not exist; nothing ran.
    Skipped { group: SpecGroup },
    /// The group's spec file could not be loaded; nothing ran.
    Aborted {
        group: SpecGroup,
        error: HarnessError,
    },
    /// Every record ran to a terminal outcome.
    Completed {
        group: SpecGroup,
        results: Vec<CaseResult>,
    },
}

/// Case-level and group-level tallies for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub groups_skipped: usize,
    pub groups_aborted: usize,
}

impl SuiteSummary {
    /// True when nothing failed and no group aborted.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.groups_aborted == 0
    }
}

/// Runs every record of one group through the executor, in file order.
pub fn run_group<E: TemplateEngine>(
    executor: &mut Executor<'_, E>,
    config: &RunConfig,
    group: SpecGroup,
) -> GroupReport {
    match spec::load_records(&config.spec_root, group) {
        Err(error) => GroupReport::Aborted { group, error },
        Ok(None) => GroupReport::Skipped { group },
        Ok(Some(records)) => {
            let results = records
                .iter()
                .map(|record| {
                    let case = ConformanceCase::project(record);
                    let outcome = executor.run(group, &case);
                    CaseResult {
                        label: case.label,
                        outcome,
                    }
                })
                .collect();
            GroupReport::Completed { group, results }
        }
    }
}

/// Runs all spec groups, in reporting order.
pub fn run_suite<E: TemplateEngine>(
    executor: &mut Executor<'_, E>,
    config: &RunConfig,
) -> Vec<GroupReport> {
    SpecGroup::ALL
        .iter()
        .map(|&group| run_group(executor, config, group))
        .collect()
}

/// Tallies case and group outcomes across a run.
pub fn summarize(reports: &[GroupReport]) -> SuiteSummary {
    let mut summary = SuiteSummary::default();
    for report in reports {
        match report {
            GroupReport::Skipped { .. } => summary.groups_skipped += 1,
            GroupReport::Aborted { .. } => summary.groups_aborted += 1,
            GroupReport::Completed { results, .. } => {
                for result in results {
                    match result.outcome {
                        CaseOutcome::Pass => summary.passed += 1,
                        CaseOutcome::Fail(_) => summary.failed += 1,
                        CaseOutcome::Skipped { .. } => summary.skipped += 1,
                    }
                }
            }
        }
    }
    summary
}

/// Print comprehensive results with colored output, then the summary line.
pub fn report_results(reports: &[GroupReport], config: &RunConfig) {
    for report in reports {
        match report {
            GroupReport::Skipped { group } => {
                println!(
                    "{}: group '{}' (spec file not present)",
                    config.colorize("SKIP", YELLOW),
                    group
                );
            }
            GroupReport::Aborted { group, error } => {
                eprintln!(
                    "{}: group '{}' aborted: {}",
                    config.colorize("FAIL", RED),
                    group,
                    error
                );
            }
            GroupReport::Completed { group, results } => {
                for result in results {
                    print_case(*group, result, config);
                }
            }
        }
    }

    let summary = summarize(reports);
    println!(
        "\nConformance summary: {} {}, {} {}, {} {} ({} group(s) skipped, {} aborted)",
        config.colorize("passed", GREEN),
        summary.passed,
        config.colorize("failed", RED),
        summary.failed,
        config.colorize("skipped", YELLOW),
        summary.skipped,
        summary.groups_skipped,
        summary.groups_aborted,
    );
}

fn print_case(group: SpecGroup, result: &CaseResult, config: &RunConfig) {
    match &result.outcome {
        CaseOutcome::Pass => {
            println!(
                "{}: {} [{}]",
                config.colorize("PASS", GREEN),
                result.label,
                group
            );
        }
        CaseOutcome::Skipped { reason } => {
            println!(
                "{}: {} [{}] ({})",
                config.colorize("SKIP", YELLOW),
                result.label,
                group,
                reason
            );
        }
        CaseOutcome::Fail(detail) => {
            eprintln!(
                "{}: {} [{}]",
                config.colorize("FAIL", RED),
                result.label,
                group
            );
            eprintln!("  {detail}");
            if let FailureDetail::Mismatch { expected, actual } = detail {
                eprintln!("  Diff:");
                eprintln!("{}", Changeset::new(expected, actual, "\n"));
            }
        }
    }
}
