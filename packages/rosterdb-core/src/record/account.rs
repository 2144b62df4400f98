//! Account record: a login identity, optionally linked to a student.

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

use super::codec;
use super::Record;

/// Authority role carried by an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    /// Wire tag used in the account line grammar.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "STUDENT" => Ok(Role::Student),
            _ => Err(()),
        }
    }
}

/// Login identity.
///
/// Student accounts carry a weak reference to the student record they
/// belong to; admin accounts never do. The reference is a foreign key, not
/// ownership: the student record lives in its own table.
///
/// Line grammar: `id,username,password,role[,refStudentId]`, where the
/// trailing field is present if and only if the role is `STUDENT`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Record id, assigned by the table on insert
    pub id: u64,
    pub username: String,
    pub password: String,
    pub role: Role,
    /// Referenced student id, meaningful only for [`Role::Student`]
    pub ref_student_id: Option<u64>,
}

impl Account {
    /// Creates an admin account with an unassigned id.
    pub fn admin(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password: password.into(),
            role: Role::Admin,
            ref_student_id: None,
        }
    }

    /// Creates a student account referencing the given student record,
    /// with an unassigned id.
    pub fn student(
        username: impl Into<String>,
        password: impl Into<String>,
        ref_student_id: u64,
    ) -> Self {
        Self {
            id: 0,
            username: username.into(),
            password: password.into(),
            role: Role::Student,
            ref_student_id: Some(ref_student_id),
        }
    }
}

impl Record for Account {
    const KIND: &'static str = "accounts";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn encode(&self) -> String {
        let mut fields = vec![
            self.id.to_string(),
            self.username.clone(),
            self.password.clone(),
            self.role.to_string(),
        ];
        if self.role == Role::Student {
            // Validated student accounts always carry a reference.
            fields.push(self.ref_student_id.unwrap_or_default().to_string());
        }
        codec::join_fields(&fields)
    }

    fn decode(line: &str) -> Result<Self, StoreError> {
        let fields = codec::split_fields(line);
        if fields.len() < 4 {
            return Err(codec::malformed(
                Self::KIND,
                format!("expected at least 4 fields, got {}", fields.len()),
            ));
        }

        let id = codec::parse_int(Self::KIND, "id", fields[0])?;
        let role: Role = fields[3]
            .parse()
            .map_err(|_| codec::malformed(Self::KIND, format!("unknown role '{}'", fields[3])))?;

        let ref_student_id = match role {
            Role::Admin => {
                if fields.len() != 4 {
                    return Err(codec::malformed(
                        Self::KIND,
                        format!("ADMIN record carries {} fields, expected 4", fields.len()),
                    ));
                }
                None
            }
            Role::Student => {
                if fields.len() != 5 {
                    return Err(codec::malformed(
                        Self::KIND,
                        format!("STUDENT record carries {} fields, expected 5", fields.len()),
                    ));
                }
                Some(codec::parse_int(Self::KIND, "refStudentId", fields[4])?)
            }
        };

        Ok(Account {
            id,
            username: fields[1].to_string(),
            password: fields[2].to_string(),
            role,
            ref_student_id,
        })
    }
}
