//! Complaint normalization.
//!
//! The `Complain/` subtree is untrusted and irregular: each top-level key
//! is a student id mapping to a subtree that may hold complaint objects
//! directly, hold a second level of keyed complaint objects, or hold
//! noise left behind by older clients. [`normalize`] flattens all of it
//! into a typed, insertion-ordered record sequence plus a sparse
//! per-student aggregate.
//!
//! # Shape classification
//!
//! Each first-level child is resolved by a type-and-shape test, not by
//! exception-driven control flow:
//!
//! | Shape | Test | Result |
//! |-------|------|--------|
//! | Direct | object with both `topic` and `desc` keys | one record, `sub_id = None` |
//! | Nested map | any other object | one record per child carrying `topic` or `desc` |
//! | Unrecognized | not an object | dropped |
//!
//! Malformed entries are dropped silently, never raised; an absent or
//! empty input yields an empty view, which callers map to a "not found"
//! message rather than an error.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{ComplaintAggregate, ComplaintRecord, StudentId};

/// The derived, immutable complaint view — recomputed from scratch on
/// every fetch, never incrementally updated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComplaintView {
    /// Flattened records, in input traversal order (student order as
    /// received, then sub-key order as received).
    pub records: Vec<ComplaintRecord>,
    /// Complaint count per student; zero counts are omitted.
    pub per_student: ComplaintAggregate,
    /// Entries that failed the shape test. Diagnostic only.
    pub skipped: usize,
}

impl ComplaintView {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// How one first-level child of a student's subtree is shaped.
enum Shape<'a> {
    /// A complaint object sitting directly under the group key.
    Direct(&'a Map<String, Value>),
    /// A mapping of sub-keys to candidate complaint objects.
    NestedMap(&'a Map<String, Value>),
    /// Noise coexisting at the same tree level.
    Unrecognized,
}

fn classify(value: &Value) -> Shape<'_> {
    match value.as_object() {
        None => Shape::Unrecognized,
        Some(obj) if obj.contains_key("topic") && obj.contains_key("desc") => Shape::Direct(obj),
        Some(obj) => Shape::NestedMap(obj),
    }
}

/// A nested child counts as a complaint if it exposes at least one of
/// the two content fields.
fn has_complaint_fields(obj: &Map<String, Value>) -> bool {
    obj.contains_key("topic") || obj.contains_key("desc")
}

/// Flatten the raw `Complain/` subtree into a [`ComplaintView`].
///
/// `None` (absent path) and non-object roots both produce the empty view.
pub fn normalize(tree: Option<&Value>) -> ComplaintView {
    let mut view = ComplaintView::default();
    let mut counts: HashMap<StudentId, usize> = HashMap::new();

    let Some(students) = tree.and_then(Value::as_object) else {
        return view;
    };

    for (student_key, subtree) in students {
        let owner = StudentId::from(student_key.as_str());
        let mut count = 0usize;

        let Some(groups) = subtree.as_object() else {
            view.skipped += 1;
            continue;
        };

        for (group_id, group_value) in groups {
            match classify(group_value) {
                Shape::Direct(obj) => {
                    view.records.push(record_from(&owner, group_id, None, obj));
                    count += 1;
                }
                Shape::NestedMap(children) => {
                    for (sub_id, child) in children {
                        match child.as_object() {
                            Some(obj) if has_complaint_fields(obj) => {
                                view.records
                                    .push(record_from(&owner, group_id, Some(sub_id.as_str()), obj));
                                count += 1;
                            }
                            _ => view.skipped += 1,
                        }
                    }
                }
                Shape::Unrecognized => view.skipped += 1,
            }
        }

        if count > 0 {
            counts.insert(owner, count);
        }
    }

    view.per_student = counts;
    view
}

fn record_from(
    owner: &StudentId,
    group_id: &str,
    sub_id: Option<&str>,
    obj: &Map<String, Value>,
) -> ComplaintRecord {
    let mut topic = None;
    let mut description = None;
    let mut resolved = false;
    let mut extra = Map::new();

    for (key, value) in obj {
        match key.as_str() {
            "topic" if value.is_string() => {
                topic = value.as_str().map(str::to_owned);
            }
            "desc" if value.is_string() => {
                description = value.as_str().map(str::to_owned);
            }
            "resolved" => {
                resolved = value.as_bool().unwrap_or(false);
            }
            _ => {
                extra.insert(key.clone(), value.clone());
            }
        }
    }

    ComplaintRecord {
        owner: owner.clone(),
        group_id: group_id.to_string(),
        sub_id: sub_id.map(str::to_owned),
        topic,
        description,
        resolved,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_tree_yields_empty_view() {
        let view = normalize(None);
        assert!(view.is_empty());
        assert!(view.per_student.is_empty());
        assert_eq!(view.skipped, 0);
    }

    #[test]
    fn test_non_object_root_yields_empty_view() {
        let view = normalize(Some(&json!("garbage")));
        assert!(view.is_empty());
    }

    #[test]
    fn test_direct_complaint_single_record() {
        let tree = json!({
            "S-key-1": {
                "c1": {"topic": "Noise", "desc": "loud", "resolved": false},
                "junk": "not an object"
            }
        });
        let view = normalize(Some(&tree));
        assert_eq!(view.records.len(), 1);
        let rec = &view.records[0];
        assert_eq!(rec.owner.as_str(), "S-key-1");
        assert_eq!(rec.group_id, "c1");
        assert!(rec.sub_id.is_none());
        assert_eq!(rec.topic.as_deref(), Some("Noise"));
        assert_eq!(rec.description.as_deref(), Some("loud"));
        assert!(!rec.resolved);
        assert_eq!(view.per_student[&StudentId::from("S-key-1")], 1);
        assert_eq!(view.skipped, 1);
    }

    #[test]
    fn test_nested_complaints_need_only_one_field() {
        let tree = json!({
            "u1": {
                "g1": {
                    "n1": {"topic": "Water"},
                    "n2": {"desc": "cold shower"},
                    "n3": {"status": "neither field"},
                    "n4": 42
                }
            }
        });
        let view = normalize(Some(&tree));
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.records[0].sub_id.as_deref(), Some("n1"));
        assert_eq!(view.records[1].sub_id.as_deref(), Some("n2"));
        assert_eq!(view.skipped, 2);
        assert_eq!(view.per_student[&StudentId::from("u1")], 2);
    }

    #[test]
    fn test_direct_requires_both_fields() {
        // A group object with only `topic` is treated as a nested map;
        // its string children fail the shape test, so nothing is emitted.
        let tree = json!({"u1": {"g1": {"topic": "Wifi"}}});
        let view = normalize(Some(&tree));
        assert!(view.records.is_empty());
        assert!(view.per_student.is_empty());
    }

    #[test]
    fn test_aggregate_never_contains_zero_counts() {
        let tree = json!({
            "noisy": {"g": {"a": {"topic": "t"}}},
            "silent": {"g": "junk only"}
        });
        let view = normalize(Some(&tree));
        assert_eq!(view.per_student.len(), 1);
        assert!(view.per_student.values().all(|&c| c > 0));
    }

    #[test]
    fn test_extra_fields_preserved() {
        let tree = json!({
            "u1": {
                "c1": {"topic": "Mess", "desc": "food", "name": "Asha", "number": "123"}
            }
        });
        let view = normalize(Some(&tree));
        let rec = &view.records[0];
        assert_eq!(rec.extra.get("name"), Some(&json!("Asha")));
        assert_eq!(rec.extra.get("number"), Some(&json!("123")));
        assert!(!rec.extra.contains_key("topic"));
    }

    #[test]
    fn test_non_string_topic_lands_in_extra() {
        let tree = json!({"u1": {"g1": {"n1": {"topic": 7, "desc": "x"}}}});
        let view = normalize(Some(&tree));
        let rec = &view.records[0];
        assert!(rec.topic.is_none());
        assert_eq!(rec.extra.get("topic"), Some(&json!(7)));
        assert_eq!(rec.description.as_deref(), Some("x"));
    }

    #[test]
    fn test_traversal_order_preserved() {
        let tree = json!({
            "zeta": {"c1": {"topic": "a", "desc": "a"}},
            "alpha": {"c2": {"topic": "b", "desc": "b"}}
        });
        let view = normalize(Some(&tree));
        // Input order, not key-sorted.
        assert_eq!(view.records[0].owner.as_str(), "zeta");
        assert_eq!(view.records[1].owner.as_str(), "alpha");
    }

    #[test]
    fn test_record_count_matches_wellformed_objects() {
        let tree = json!({
            "u1": {
                "direct": {"topic": "t", "desc": "d"},
                "nested": {
                    "a": {"topic": "t"},
                    "b": {"desc": "d"},
                    "c": {"other": true}
                },
                "noise": [1, 2, 3]
            }
        });
        let view = normalize(Some(&tree));
        assert_eq!(view.records.len(), 3);
        assert_eq!(view.per_student[&StudentId::from("u1")], 3);
    }

    #[test]
    fn test_resolved_flag_carried_through() {
        let tree = json!({"u1": {"c1": {"topic": "t", "desc": "d", "resolved": true}}});
        let view = normalize(Some(&tree));
        assert!(view.records[0].resolved);
    }
}
