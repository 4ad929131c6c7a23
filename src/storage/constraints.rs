//! Constraint suppression around a load window.
//!
//! The [`ConstraintManager`] owns the policy: disable every enabled constraint
//! that references the target table when the load opens, and re-enable the
//! ones it disabled when the load closes. Enumerating and toggling
//! constraints is backend specific and lives behind [`ConstraintDirectory`].

use strum_macros::Display;

use crate::error_handling::DatabaseError;

use super::batch::quote_identifier;
use super::executor::SqlExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ConstraintKind {
    /// The target table's own primary key
    PrimaryKey,
    /// A foreign key in another table referencing the target table
    ForeignKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ConstraintStatus {
    Enabled,
    Disabled,
}

/// A constraint whose dependency relationship includes the target table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub owner: String,
    /// Table the constraint is declared on
    pub table: String,
    pub name: String,
    pub kind: ConstraintKind,
    pub status: ConstraintStatus,
}

impl Constraint {
    /// `owner.table.name`, for log messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.owner, self.table, self.name)
    }

    /// Same owner, table and name, whatever the status.
    pub fn is_same(&self, other: &Constraint) -> bool {
        self.owner == other.owner && self.table == other.table && self.name == other.name
    }
}

/// Query surface for constraints referencing a table.
pub trait ConstraintDirectory: SqlExecutor {
    /// Returns the table's primary key and every foreign key referencing it.
    fn constraints_referencing(&mut self, table: &str) -> Result<Vec<Constraint>, DatabaseError>;

    /// Enables or disables one constraint.
    ///
    /// The default issues `ALTER TABLE ... ENABLE|DISABLE CONSTRAINT ...`
    /// through [`SqlExecutor::execute`].
    fn set_constraint_enabled(
        &mut self,
        constraint: &Constraint,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        self.execute(&alter_constraint_sql(constraint, enabled))
            .map(|_| ())
    }
}

impl<T: ConstraintDirectory + ?Sized> ConstraintDirectory for &mut T {
    fn constraints_referencing(&mut self, table: &str) -> Result<Vec<Constraint>, DatabaseError> {
        (**self).constraints_referencing(table)
    }

    fn set_constraint_enabled(
        &mut self,
        constraint: &Constraint,
        enabled: bool,
    ) -> Result<(), DatabaseError> {
        (**self).set_constraint_enabled(constraint, enabled)
    }
}

/// Builds the DDL toggling one constraint, with quoted identifiers.
pub fn alter_constraint_sql(constraint: &Constraint, enabled: bool) -> String {
    format!(
        "ALTER TABLE {}.{} {} CONSTRAINT {}",
        quote_identifier(&constraint.owner),
        quote_identifier(&constraint.table),
        if enabled { "ENABLE" } else { "DISABLE" },
        quote_identifier(&constraint.name)
    )
}

/// Tracks the constraints one load session disabled.
#[derive(Debug, Default)]
pub struct ConstraintManager {
    disabled: Vec<Constraint>,
}

impl ConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constraints disabled by this manager and not yet re-enabled.
    pub fn disabled(&self) -> &[Constraint] {
        &self.disabled
    }

    /// Disables every currently enabled constraint referencing `table`.
    ///
    /// If a toggle fails, the constraints disabled so far are re-enabled
    /// before the error is returned.
    pub fn disable<D: ConstraintDirectory + ?Sized>(
        &mut self,
        directory: &mut D,
        table: &str,
    ) -> Result<usize, DatabaseError> {
        let candidates: Vec<Constraint> = directory
            .constraints_referencing(table)?
            .into_iter()
            .filter(|c| c.status == ConstraintStatus::Enabled)
            .collect();

        let mut count = 0;
        for mut constraint in candidates {
            if let Err(e) = directory.set_constraint_enabled(&constraint, false) {
                log::error!(
                    "Failed to disable constraint {}: {}",
                    constraint.qualified_name(),
                    e
                );
                if let Err(restore_err) = self.enable(directory, table) {
                    log::warn!(
                        "Failed to re-enable constraints on {} after aborted disable: {}",
                        table,
                        restore_err
                    );
                }
                return Err(e);
            }
            log::debug!("Disabled constraint {}", constraint.qualified_name());
            constraint.status = ConstraintStatus::Disabled;
            self.disabled.push(constraint);
            count += 1;
        }

        log::info!("Disabled {} constraint(s) referencing {}", count, table);
        Ok(count)
    }

    /// Re-enables the constraints this manager disabled that are still disabled.
    ///
    /// Every constraint is attempted even if one fails; the first failure is
    /// returned and the failed constraints stay tracked for another attempt.
    pub fn enable<D: ConstraintDirectory + ?Sized>(
        &mut self,
        directory: &mut D,
        table: &str,
    ) -> Result<usize, DatabaseError> {
        if self.disabled.is_empty() {
            return Ok(0);
        }

        let current = directory.constraints_referencing(table)?;
        let pending = std::mem::take(&mut self.disabled);
        let mut remaining = Vec::new();
        let mut first_error = None;
        let mut count = 0;

        for constraint in pending {
            let still_disabled = current
                .iter()
                .any(|c| c.is_same(&constraint) && c.status == ConstraintStatus::Disabled);
            if !still_disabled {
                log::debug!(
                    "Constraint {} was already re-enabled",
                    constraint.qualified_name()
                );
                continue;
            }

            match directory.set_constraint_enabled(&constraint, true) {
                Ok(()) => {
                    log::debug!("Enabled constraint {}", constraint.qualified_name());
                    count += 1;
                }
                Err(e) => {
                    log::error!(
                        "Failed to enable constraint {}: {}",
                        constraint.qualified_name(),
                        e
                    );
                    remaining.push(constraint);
                    first_error.get_or_insert(e);
                }
            }
        }

        self.disabled = remaining;
        match first_error {
            Some(e) => Err(e),
            None => {
                log::info!("Re-enabled {} constraint(s) referencing {}", count, table);
                Ok(count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::batch::{ArrayParameter, InsertStatement};

    fn constraint(table: &str, name: &str, kind: ConstraintKind, status: ConstraintStatus) -> Constraint {
        Constraint {
            owner: "APP".to_string(),
            table: table.to_string(),
            name: name.to_string(),
            kind,
            status,
        }
    }

    /// Directory that applies the generated DDL to an in-memory constraint list.
    #[derive(Default)]
    struct FakeDirectory {
        constraints: Vec<Constraint>,
        statements: Vec<String>,
        fail_on: Option<String>,
    }

    impl SqlExecutor for FakeDirectory {
        fn execute(&mut self, sql: &str) -> Result<u64, DatabaseError> {
            if self.fail_on.as_deref().is_some_and(|name| sql.contains(name)) {
                return Err(DatabaseError::ExecutionFailed(format!("cannot run {sql}")));
            }
            self.statements.push(sql.to_string());
            for c in &mut self.constraints {
                if sql == alter_constraint_sql(c, true) {
                    c.status = ConstraintStatus::Enabled;
                } else if sql == alter_constraint_sql(c, false) {
                    c.status = ConstraintStatus::Disabled;
                }
            }
            Ok(0)
        }

        fn execute_batch(
            &mut self,
            _statement: &InsertStatement,
            _parameters: &[ArrayParameter],
        ) -> Result<u64, DatabaseError> {
            Ok(0)
        }
    }

    impl ConstraintDirectory for FakeDirectory {
        fn constraints_referencing(&mut self, _table: &str) -> Result<Vec<Constraint>, DatabaseError> {
            Ok(self.constraints.clone())
        }
    }

    fn directory() -> FakeDirectory {
        FakeDirectory {
            constraints: vec![
                constraint("T", "T_PK", ConstraintKind::PrimaryKey, ConstraintStatus::Enabled),
                constraint("CHILD", "CHILD_T_FK", ConstraintKind::ForeignKey, ConstraintStatus::Enabled),
                constraint("OTHER", "OTHER_T_FK", ConstraintKind::ForeignKey, ConstraintStatus::Disabled),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_alter_constraint_sql_quotes_identifiers() {
        let c = constraint("T", "T_PK", ConstraintKind::PrimaryKey, ConstraintStatus::Enabled);
        assert_eq!(
            alter_constraint_sql(&c, false),
            "ALTER TABLE \"APP\".\"T\" DISABLE CONSTRAINT \"T_PK\""
        );
        let odd = constraint("we\"ird", "X", ConstraintKind::ForeignKey, ConstraintStatus::Enabled);
        assert_eq!(
            alter_constraint_sql(&odd, true),
            "ALTER TABLE \"APP\".\"we\"\"ird\" ENABLE CONSTRAINT \"X\""
        );
    }

    #[test]
    fn test_disable_only_touches_enabled_constraints() {
        let mut dir = directory();
        let mut manager = ConstraintManager::new();

        assert_eq!(manager.disable(&mut dir, "T").unwrap(), 2);
        assert_eq!(dir.statements.len(), 2);
        assert!(dir.statements.iter().all(|s| !s.contains("OTHER_T_FK")));
        assert_eq!(manager.disabled().len(), 2);
        assert!(dir
            .constraints
            .iter()
            .all(|c| c.status == ConstraintStatus::Disabled));
    }

    #[test]
    fn test_enable_restores_only_what_was_disabled() {
        let mut dir = directory();
        let mut manager = ConstraintManager::new();
        manager.disable(&mut dir, "T").unwrap();

        assert_eq!(manager.enable(&mut dir, "T").unwrap(), 2);
        assert!(manager.disabled().is_empty());
        let statuses: Vec<ConstraintStatus> = dir.constraints.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                ConstraintStatus::Enabled,
                ConstraintStatus::Enabled,
                ConstraintStatus::Disabled
            ]
        );
    }

    #[test]
    fn test_enable_skips_constraints_reenabled_elsewhere() {
        let mut dir = directory();
        let mut manager = ConstraintManager::new();
        manager.disable(&mut dir, "T").unwrap();
        dir.constraints[0].status = ConstraintStatus::Enabled;
        dir.statements.clear();

        assert_eq!(manager.enable(&mut dir, "T").unwrap(), 1);
        assert_eq!(dir.statements.len(), 1);
        assert!(dir.statements[0].contains("CHILD_T_FK"));
    }

    #[test]
    fn test_enable_without_disable_is_noop() {
        let mut dir = directory();
        let mut manager = ConstraintManager::new();
        assert_eq!(manager.enable(&mut dir, "T").unwrap(), 0);
        assert!(dir.statements.is_empty());
    }

    #[test]
    fn test_failed_disable_rolls_back() {
        let mut dir = directory();
        dir.fail_on = Some("DISABLE CONSTRAINT \"CHILD_T_FK\"".to_string());
        let mut manager = ConstraintManager::new();

        assert!(manager.disable(&mut dir, "T").is_err());
        assert!(manager.disabled().is_empty());
        assert_eq!(dir.constraints[0].status, ConstraintStatus::Enabled);
        assert_eq!(dir.constraints[1].status, ConstraintStatus::Enabled);
    }

    #[test]
    fn test_failed_enable_keeps_constraint_tracked() {
        let mut dir = directory();
        let mut manager = ConstraintManager::new();
        manager.disable(&mut dir, "T").unwrap();
        dir.fail_on = Some("ENABLE CONSTRAINT \"T_PK\"".to_string());

        assert!(manager.enable(&mut dir, "T").is_err());
        assert_eq!(manager.disabled().len(), 1);
        assert_eq!(manager.disabled()[0].name, "T_PK");
        assert_eq!(dir.constraints[1].status, ConstraintStatus::Enabled);

        dir.fail_on = None;
        assert_eq!(manager.enable(&mut dir, "T").unwrap(), 1);
        assert!(manager.disabled().is_empty());
    }
}
