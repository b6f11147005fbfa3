//! Conversion of the flat task list into an ordered forest.
//!
//! The remote service reports tasks as a flat sequence with `parent_id`
//! references; the UI wants root tasks with nested subtasks. [`build_forest`]
//! is the single place that conversion happens. It is pure: no I/O, no shared
//! state, deterministic for a given input.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::api::TaskRecord;

/// A task with its subtasks materialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub order: i32,
    pub content: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: i32,
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    fn from_record(record: &TaskRecord, subtasks: Vec<TaskNode>) -> Self {
        Self {
            id: record.id.clone(),
            parent_id: record.parent_id.clone(),
            order: record.order,
            content: record.content.clone(),
            description: record.description.clone(),
            is_completed: record.is_completed,
            priority: record.priority,
            subtasks,
        }
    }
}

/// Build the ordered forest from a flat record list.
///
/// Records whose `parent_id` is null become roots. A record whose declared
/// parent is absent from the input (an orphan) is promoted to a root rather
/// than dropped. Siblings, meaning the root sequence and every node's
/// `subtasks`, are sorted ascending by `order`; ties keep the input sequence
/// order (the sort is stable). Input order is otherwise irrelevant to the
/// result.
pub fn build_forest(records: &[TaskRecord]) -> Vec<TaskNode> {
    let known_ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

    // Group child indices under their parent, keeping input order so the
    // stable sort below preserves it for equal `order` values.
    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        match record.parent_id.as_deref() {
            Some(parent_id) if known_ids.contains(parent_id) && parent_id != record.id => {
                children.entry(parent_id).or_default().push(idx);
            }
            // No parent, or an orphaned reference: treat as a root.
            _ => roots.push(idx),
        }
    }

    let mut forest: Vec<TaskNode> = roots
        .iter()
        .map(|&idx| assemble(records, idx, &children))
        .collect();
    forest.sort_by_key(|node| node.order);
    forest
}

fn assemble(records: &[TaskRecord], idx: usize, children: &HashMap<&str, Vec<usize>>) -> TaskNode {
    let record = &records[idx];

    let mut subtasks: Vec<TaskNode> = children
        .get(record.id.as_str())
        .map(|indices| {
            indices
                .iter()
                .map(|&child_idx| assemble(records, child_idx, children))
                .collect()
        })
        .unwrap_or_default();
    subtasks.sort_by_key(|node| node.order);

    TaskNode::from_record(record, subtasks)
}
