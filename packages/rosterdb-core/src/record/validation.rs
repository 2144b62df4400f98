//! Write-time validation for record field values.
//!
//! The line grammar has no delimiter escaping, so values are checked before
//! they reach a table. Every stored record therefore serializes to a
//! grammar-conforming line and `Record::encode` stays infallible.

use crate::error::StoreError;

use super::codec::DELIMITER;
use super::{Account, Role, Student};

/// Rejects text values that would corrupt the line grammar.
pub(crate) fn validate_text(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.contains(DELIMITER) {
        return Err(StoreError::InvalidFieldValue {
            field,
            reason: format!("must not contain '{}'", DELIMITER),
        });
    }
    if value.contains('\n') || value.contains('\r') {
        return Err(StoreError::InvalidFieldValue {
            field,
            reason: "must not contain line breaks".to_string(),
        });
    }
    Ok(())
}

/// Validates all account fields prior to insert or update.
pub(crate) fn validate_account(account: &Account) -> Result<(), StoreError> {
    validate_text("username", &account.username)?;
    validate_text("password", &account.password)?;
    match account.role {
        Role::Admin if account.ref_student_id.is_some() => Err(StoreError::InvalidFieldValue {
            field: "refStudentId",
            reason: "admin accounts cannot reference a student".to_string(),
        }),
        Role::Student if account.ref_student_id.is_none() => Err(StoreError::InvalidFieldValue {
            field: "refStudentId",
            reason: "student accounts must reference a student".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Validates all student fields prior to insert or update.
pub(crate) fn validate_student(student: &Student) -> Result<(), StoreError> {
    validate_text("firstName", &student.first_name)?;
    validate_text("lastName", &student.last_name)?;
    validate_text("icNumber", &student.ic_number)?;
    validate_text("programme", &student.programme)?;
    if !student.cgpa.is_finite() || student.cgpa < 0.0 {
        return Err(StoreError::InvalidFieldValue {
            field: "cgpa",
            reason: format!("must be a finite non-negative number, got {}", student.cgpa),
        });
    }
    Ok(())
}
