//! Registry: both record tables plus the operations that span them.
//!
//! The registry owns the account and student tables and enforces the
//! referential rules between them: student accounts are created together
//! with their student record and deleted together with it, admin accounts
//! are never deletable.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::validation;
use crate::record::{Account, Record, Role, Student};
use crate::table::Table;

/// Account and student tables with referential linkage.
#[derive(Debug, Clone)]
pub struct Registry {
    accounts: Table<Account>,
    students: Table<Student>,
}

impl Registry {
    /// Creates an empty registry with per-table capacity from the config.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            accounts: Table::with_capacity(config.table_capacity),
            students: Table::with_capacity(config.table_capacity),
        }
    }

    /// Assembles a registry from restored tables.
    pub(crate) fn from_tables(accounts: Table<Account>, students: Table<Student>) -> Self {
        Self { accounts, students }
    }

    /// Read access to the account table.
    pub fn accounts(&self) -> &Table<Account> {
        &self.accounts
    }

    /// Read access to the student table.
    pub fn students(&self) -> &Table<Student> {
        &self.students
    }

    /// Looks up an account by id.
    pub fn find_account(&self, id: u64) -> Option<&Account> {
        self.accounts.find(id)
    }

    /// Looks up a student by id.
    pub fn find_student(&self, id: u64) -> Option<&Student> {
        self.students.find(id)
    }

    /// Looks up an account by username.
    ///
    /// Usernames are not required to be unique; the first match in slot
    /// order wins. Linear scan.
    pub fn find_account_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    /// Creates an admin account and returns its id.
    pub fn create_admin_account(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<u64, StoreError> {
        let account = Account::admin(username, password);
        validation::validate_account(&account)?;
        self.accounts.insert(account)
    }

    /// Creates a student record and an account referencing it, atomically.
    ///
    /// Returns `(account_id, student_id)`. When either table is full the
    /// operation fails with `CapacityExceeded` and neither table changes.
    pub fn create_student_account(
        &mut self,
        username: &str,
        password: &str,
        student: Student,
    ) -> Result<(u64, u64), StoreError> {
        validation::validate_text("username", username)?;
        validation::validate_text("password", password)?;
        validation::validate_student(&student)?;

        // The account slot is confirmed up front: the student insert must
        // never outlive a failed account insert.
        if self.accounts.is_full() {
            return Err(StoreError::CapacityExceeded {
                table: Account::KIND,
                capacity: self.accounts.capacity(),
            });
        }

        let student_id = self.students.insert(student)?;
        match self.accounts.insert(Account::student(username, password, student_id)) {
            Ok(account_id) => {
                tracing::debug!(
                    "created student account {} linked to student {}",
                    account_id,
                    student_id
                );
                Ok((account_id, student_id))
            }
            Err(err) => {
                // Unreachable after the capacity check; undo the student
                // insert so the pair stays all-or-nothing.
                let _ = self.students.delete(student_id);
                Err(StoreError::InternalInconsistency(format!(
                    "account insert failed after capacity check: {}",
                    err
                )))
            }
        }
    }

    /// Overwrites all fields of an account except its id.
    pub fn update_account(&mut self, id: u64, account: Account) -> Result<(), StoreError> {
        validation::validate_account(&account)?;
        self.accounts.update(id, account)
    }

    /// Overwrites all fields of a student record except its id.
    pub fn update_student(&mut self, id: u64, student: Student) -> Result<(), StoreError> {
        validation::validate_student(&student)?;
        self.students.update(id, student)
    }

    /// Deletes a student account together with its student record.
    ///
    /// Admin accounts are rejected with `ForbiddenOperation`. The two
    /// deletions are all-or-nothing: once the checks pass, a failure on
    /// either side leaves both tables exactly as they were.
    pub fn delete_account(&mut self, account_id: u64) -> Result<(), StoreError> {
        let account = self.accounts.find(account_id).ok_or(StoreError::NotFound {
            table: Account::KIND,
            id: account_id,
        })?;

        if account.role == Role::Admin {
            return Err(StoreError::ForbiddenOperation(format!(
                "admin account {} cannot be deleted",
                account_id
            )));
        }

        let student_id = account
            .ref_student_id
            .ok_or(StoreError::DanglingReference { account_id })?;
        if self.students.find(student_id).is_none() {
            return Err(StoreError::DanglingReference { account_id });
        }

        // Both sides confirmed deletable; remove the account first, keeping
        // its slot for the rollback path.
        let account_pos = self.accounts.position(account_id).ok_or_else(|| {
            StoreError::InternalInconsistency(format!(
                "account {} vanished mid-delete",
                account_id
            ))
        })?;
        let removed = self.accounts.delete(account_id).map_err(|err| {
            StoreError::InternalInconsistency(format!(
                "account delete failed post-check: {}",
                err
            ))
        })?;

        if let Err(err) = self.students.delete(student_id) {
            self.accounts.restore_at(account_pos, removed);
            tracing::error!(
                "student {} delete failed after account {} was removed: {}",
                student_id,
                account_id,
                err
            );
            return Err(StoreError::InternalInconsistency(format!(
                "student delete failed post-check: {}",
                err
            )));
        }

        tracing::debug!(
            "cascade deleted account {} and student {}",
            account_id,
            student_id
        );
        Ok(())
    }
}
