//! Projection of spec records into executable conformance cases.

use std::collections::HashMap;

use crate::spec::SpecRecord;
use crate::value::Value;

/// One executable unit of work: what to render, against what, and what the
/// engine must produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceCase {
    /// `name: desc`, the case's identity in reports.
    pub label: String,
    pub template: String,
    pub partials: HashMap<String, String>,
    pub data: Value,
    pub expected: String,
}

impl ConformanceCase {
    /// Projects a record into a case. Pure and total for well-formed
    /// records; the loader has already rejected anything else.
    pub fn project(record: &SpecRecord) -> Self {
        Self {
            label: format!("{}: {}", record.name, record.desc),
            template: record.template.clone(),
            partials: record.partials.clone(),
            data: record.data.clone(),
            expected: record.expected.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SpecRecord {
        SpecRecord {
            name: "Inline".to_string(),
            desc: "Comment blocks should be removed from the template.".to_string(),
            template: "12345{{! Comment Block! }}67890".to_string(),
            partials: HashMap::new(),
            data: Value::Map(vec![]),
            expected: "1234567890".to_string(),
        }
    }

    #[test]
    fn label_is_name_colon_space_desc() {
        let case = ConformanceCase::project(&record());
        assert_eq!(
            case.label,
            "Inline: Comment blocks should be removed from the template."
        );
    }

    #[test]
    fn template_data_and_expected_pass_through() {
        let record = record();
        let case = ConformanceCase::project(&record);
        assert_eq!(case.template, record.template);
        assert_eq!(case.data, record.data);
        assert_eq!(case.expected, record.expected);
        assert!(case.partials.is_empty());
    }
}
