//! Bucket and calendar views built from stored rows.
//!
//! Type tag, priority and the date/time split are recomputed here on every
//! call; nothing derived is ever read back from storage.

use crate::{
    models::{
        bucket::Bucket,
        task::Task,
        views::{BucketView, CalendarDay, TaskView},
    },
    services::{bucket_matcher::is_protected, categorizer, due_date},
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Calendar key for tasks without a due date.
pub const UNSCHEDULED_KEY: &str = "unscheduled";

pub fn task_view(task: &Task, today: NaiveDate) -> TaskView {
    let type_tag = categorizer::categorize(
        &task.raw,
        Some(&task.assignment_name),
        Some(&task.description),
    );
    let priority = categorizer::derive_priority(type_tag, task.due_date, &task.raw, today);
    let (due_date, due_time) = match task.due_date {
        Some(due) => {
            let (date, time) = due_date::split(due);
            (Some(date), time)
        }
        None => (None, None),
    };

    TaskView {
        id: task.id,
        bucket_id: task.bucket_id,
        raw: task.raw.clone(),
        assignment_name: task.assignment_name.clone(),
        description: task.description.clone(),
        due_date,
        due_time,
        type_tag,
        priority,
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// Buckets in the given (creation) order, each holding its tasks in the
/// given (creation) order.
pub fn bucket_views(buckets: &[Bucket], tasks: &[Task], today: NaiveDate) -> Vec<BucketView> {
    let mut by_bucket: HashMap<Uuid, Vec<TaskView>> = HashMap::new();
    for task in tasks {
        by_bucket
            .entry(task.bucket_id)
            .or_default()
            .push(task_view(task, today));
    }

    buckets
        .iter()
        .map(|bucket| BucketView {
            id: bucket.id,
            name: bucket.name.clone(),
            protected: is_protected(&bucket.name),
            created_at: bucket.created_at,
            tasks: by_bucket.remove(&bucket.id).unwrap_or_default(),
        })
        .collect()
}

/// Tasks grouped by due date, earliest date first, with the unscheduled
/// group last. Inside a date, tasks are ordered by due instant and then by
/// their position in `tasks` (creation order).
pub fn calendar_days(tasks: &[Task], today: NaiveDate) -> Vec<CalendarDay> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    // stable: equal due instants keep creation order
    ordered.sort_by_key(|task| task.due_date);

    let mut dated: BTreeMap<String, Vec<TaskView>> = BTreeMap::new();
    let mut unscheduled = Vec::new();
    for task in ordered {
        let view = task_view(task, today);
        match &view.due_date {
            Some(date) => dated.entry(date.clone()).or_default().push(view),
            None => unscheduled.push(view),
        }
    }

    let mut days: Vec<CalendarDay> = dated
        .into_iter()
        .map(|(date, tasks)| CalendarDay { date, tasks })
        .collect();
    if !unscheduled.is_empty() {
        days.push(CalendarDay {
            date: UNSCHEDULED_KEY.to_string(),
            tasks: unscheduled,
        });
    }
    days
}
