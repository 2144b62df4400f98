//! Student record: one academic record per enrolled student.

use crate::error::StoreError;

use super::codec;
use super::Record;

/// Academic record.
///
/// Line grammar:
/// `id,firstName,lastName,age,icNumber,programme,numOfSubjects,cgpa`.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// Record id, assigned by the table on insert
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub ic_number: String,
    pub programme: String,
    pub num_of_subjects: u32,
    /// Cumulative grade point average; finite and non-negative
    pub cgpa: f32,
}

impl Student {
    /// Creates a student record with an unassigned id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: u32,
        ic_number: impl Into<String>,
        programme: impl Into<String>,
        num_of_subjects: u32,
        cgpa: f32,
    ) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            ic_number: ic_number.into(),
            programme: programme.into(),
            num_of_subjects,
            cgpa,
        }
    }
}

impl Record for Student {
    const KIND: &'static str = "students";

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn encode(&self) -> String {
        codec::join_fields(&[
            self.id.to_string(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.age.to_string(),
            self.ic_number.clone(),
            self.programme.clone(),
            self.num_of_subjects.to_string(),
            self.cgpa.to_string(),
        ])
    }

    fn decode(line: &str) -> Result<Self, StoreError> {
        let fields = codec::split_fields(line);
        if fields.len() != 8 {
            return Err(codec::malformed(
                Self::KIND,
                format!("expected 8 fields, got {}", fields.len()),
            ));
        }

        Ok(Student {
            id: codec::parse_int(Self::KIND, "id", fields[0])?,
            first_name: fields[1].to_string(),
            last_name: fields[2].to_string(),
            age: codec::parse_int(Self::KIND, "age", fields[3])?,
            ic_number: fields[4].to_string(),
            programme: fields[5].to_string(),
            num_of_subjects: codec::parse_int(Self::KIND, "numOfSubjects", fields[6])?,
            cgpa: codec::parse_real(Self::KIND, "cgpa", fields[7])?,
        })
    }
}
