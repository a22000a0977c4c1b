//! Student directory snapshot and join.
//!
//! The directory is fetched once per view and treated as a read-only
//! snapshot; nothing mutates it in place. [`Directory::resolve`] enriches
//! complaint and room data with human-readable identity and never fails —
//! unknown ids get the sentinel record so one bad reference cannot block
//! rendering otherwise-valid data.

use std::collections::HashMap;

use serde_json::Value;

use crate::complaints::ComplaintView;
use crate::models::{ComplaintRecord, StudentId, StudentRecord};

/// Snapshot of the `Student/` subtree, indexed by store key.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    students: Vec<StudentRecord>,
    by_id: HashMap<StudentId, usize>,
}

impl Directory {
    /// Parse the raw `Student/` subtree. Entries that are not objects or
    /// fail to deserialize are dropped; an absent tree gives an empty
    /// directory.
    pub fn from_tree(tree: Option<&Value>) -> Directory {
        let mut dir = Directory::default();
        let Some(entries) = tree.and_then(Value::as_object) else {
            return dir;
        };
        for (key, value) in entries {
            let Ok(mut record) = serde_json::from_value::<StudentRecord>(value.clone()) else {
                continue;
            };
            record.id = StudentId::from(key.as_str());
            dir.by_id.insert(record.id.clone(), dir.students.len());
            dir.students.push(record);
        }
        dir
    }

    /// Look up a student by store key. Unknown ids resolve to
    /// [`StudentRecord::unknown`] rather than failing.
    pub fn resolve(&self, id: &StudentId) -> StudentRecord {
        match self.by_id.get(id) {
            Some(&idx) => self.students[idx].clone(),
            None => StudentRecord::unknown(id.clone()),
        }
    }

    /// All students, in input traversal order.
    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

/// One student's complaints, grouped for expand/collapse presentation.
#[derive(Debug, Clone)]
pub struct StudentComplaints<'a> {
    pub student: StudentRecord,
    pub count: usize,
    pub complaints: Vec<&'a ComplaintRecord>,
}

/// Arrange a [`ComplaintView`] per owning student, enriched through the
/// directory. Groups appear in order of each owner's first record;
/// owners absent from the directory get the sentinel.
pub fn group_by_student<'a>(view: &'a ComplaintView, dir: &Directory) -> Vec<StudentComplaints<'a>> {
    let mut order: Vec<&StudentId> = Vec::new();
    let mut grouped: HashMap<&StudentId, Vec<&'a ComplaintRecord>> = HashMap::new();

    for record in &view.records {
        let bucket = grouped.entry(&record.owner).or_default();
        if bucket.is_empty() {
            order.push(&record.owner);
        }
        bucket.push(record);
    }

    order
        .into_iter()
        .map(|owner| {
            let complaints = grouped.remove(owner).unwrap_or_default();
            StudentComplaints {
                student: dir.resolve(owner),
                count: view.per_student.get(owner).copied().unwrap_or(0),
                complaints,
            }
        })
        .collect()
}
