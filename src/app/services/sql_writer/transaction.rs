//! Assembling an emission plan into one transactional script
//!
//! The whole export becomes a single transaction, so a failing insert rolls
//! everything back and the file can be corrected and re-run. The assembler
//! never reorders fragments; `currval` linkage depends on the order the
//! emitter chose.

use super::emitter::EmissionPlan;

/// How the assembled transaction should end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEnd {
    /// `COMMIT;` for a real upload
    Commit,
    /// `ROLLBACK;` for a dry run against the live database
    Rollback,
}

impl TransactionEnd {
    pub fn statement(self) -> &'static str {
        match self {
            Self::Commit => "COMMIT;",
            Self::Rollback => "ROLLBACK;",
        }
    }
}

/// Render the plan as a complete SQL script
pub fn assemble(plan: &EmissionPlan, end: TransactionEnd) -> String {
    let mut script = String::from("BEGIN;\n");

    for fragment in &plan.fragments {
        script.push('\n');
        for statement in &fragment.statements {
            script.push_str(statement);
            script.push('\n');
        }
    }

    script.push('\n');
    script.push_str(end.statement());
    script.push('\n');
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::sql_writer::emitter::{
        EmissionPlan, LinkMode, StatementFragment,
    };

    fn plan_with_two_fragments() -> EmissionPlan {
        EmissionPlan {
            fragments: vec![
                StatementFragment {
                    line_no: 2,
                    table: "samples",
                    link_mode: LinkMode::LookupSubquery,
                    statements: vec!["SELECT 'one' as line;".to_string(), "INSERT 1;".to_string()],
                },
                StatementFragment {
                    line_no: 3,
                    table: "point_data",
                    link_mode: LinkMode::SequenceImplicit,
                    statements: vec!["SELECT 'two' as line;".to_string(), "INSERT 2;".to_string()],
                },
            ],
            skipped: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_assemble_commit() {
        let script = assemble(&plan_with_two_fragments(), TransactionEnd::Commit);
        assert!(script.starts_with("BEGIN;\n"));
        assert!(script.ends_with("COMMIT;\n"));
        // Fragment order is preserved.
        let first = script.find("INSERT 1;").unwrap();
        let second = script.find("INSERT 2;").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_assemble_rollback() {
        let script = assemble(&plan_with_two_fragments(), TransactionEnd::Rollback);
        assert!(script.ends_with("ROLLBACK;\n"));
        assert!(!script.contains("COMMIT;"));
    }

    #[test]
    fn test_empty_plan_is_still_a_transaction() {
        let script = assemble(&EmissionPlan::default(), TransactionEnd::Rollback);
        assert!(script.starts_with("BEGIN;\n"));
        assert!(script.ends_with("ROLLBACK;\n"));
    }
}
