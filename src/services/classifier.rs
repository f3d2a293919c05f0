//! AI classification of free-form task text.
//!
//! Builds the prompt (task text, a summary of the user's buckets, today's
//! date), calls the [`LanguageModel`], and reads the reply loosely: every
//! field is optional and checked on its own. Call failures and unreadable
//! replies both come back as "no suggestion"; only a missing API key is
//! returned as an error.

use crate::{
    models::views::BucketView,
    services::language_model::{ChatRequest, LanguageModel, ModelError},
};
use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// Tasks per bucket shown to the model as examples.
const EXAMPLES_PER_BUCKET: usize = 2;

const SYSTEM_INSTRUCTION: &str =
    "You sort student tasks into buckets. Respond with JSON only. Always include parsedTask.";

/// Task fields extracted by the model. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTask {
    pub assignment_name: Option<String>,
    pub course_category: Option<String>,
    /// Unvalidated; may name a tag outside the enumeration.
    pub type_tag: Option<String>,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub description: Option<String>,
}

/// The model's proposal for one task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestion {
    /// Id of an existing bucket, as text; may not match anything.
    pub bucket_id: Option<String>,
    pub new_bucket_name: Option<String>,
    pub parsed_task: ParsedTask,
    pub reason: Option<String>,
}

#[derive(Clone)]
pub struct TaskClassifier {
    model: Arc<dyn LanguageModel>,
    model_name: String,
}

impl TaskClassifier {
    pub fn new(model: Arc<dyn LanguageModel>, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Ask the model where `text` belongs.
    ///
    /// `Ok(None)` covers every transient or malformed outcome. `Err` is
    /// reserved for configuration failures.
    pub async fn classify(
        &self,
        text: &str,
        buckets: &[BucketView],
        today: NaiveDate,
    ) -> Result<Option<Suggestion>, ModelError> {
        let request = ChatRequest {
            model: self.model_name.clone(),
            temperature: 0.0,
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(text, buckets, today),
        };

        let reply = match self.model.complete(&request).await {
            Ok(reply) => reply,
            Err(err) if err.is_configuration() => return Err(err),
            Err(err) => {
                tracing::warn!(error = %err, "Task classification call failed");
                return Ok(None);
            }
        };

        let suggestion = parse_suggestion(&reply);
        if suggestion.is_none() {
            tracing::warn!(reply = %reply, "Task classification reply was not a JSON object");
        }
        Ok(suggestion)
    }
}

/// Compact JSON summary of the user's buckets for the prompt.
fn bucket_summaries(buckets: &[BucketView]) -> Value {
    let summaries = buckets
        .iter()
        .map(|bucket| {
            let examples = bucket
                .tasks
                .iter()
                .take(EXAMPLES_PER_BUCKET)
                .map(|task| {
                    let mut example = Map::new();
                    example.insert("assignmentName".into(), json!(task.assignment_name));
                    if let Some(date) = &task.due_date {
                        example.insert("dueDate".into(), json!(date));
                    }
                    if let Some(time) = &task.due_time {
                        example.insert("dueTime".into(), json!(time));
                    }
                    Value::Object(example)
                })
                .collect::<Vec<_>>();
            json!({
                "id": bucket.id.to_string(),
                "name": bucket.name,
                "examples": examples,
            })
        })
        .collect::<Vec<_>>();
    Value::Array(summaries)
}

/// Full user prompt sent with every classification.
pub fn build_prompt(text: &str, buckets: &[BucketView], today: NaiveDate) -> String {
    let today = today.format("%Y-%m-%d");
    let summaries = bucket_summaries(buckets);

    format!(
        r#"Today's date is {today}.

A student typed this task:
"{text}"

Their existing buckets (id, name, example tasks):
{summaries}

Decide which bucket the task belongs in.
- If an existing bucket fits, return its id as "bucketId".
- Otherwise return a short course or subject name as "newBucketName". Do not invent a near-duplicate of an existing bucket name.
- Always return "parsedTask" with:
  - "assignmentName": a short title for the task
  - "courseCategory": the course or subject, if any
  - "typeTag": exactly one of Homework, Quiz, Lab, Test, Project, Event, Reminder, Other
  - "dueDate": YYYY-MM-DD, resolving relative dates like "Monday" or "tomorrow" against today's date
  - "dueTime": HH:MM in 24-hour time, only if a time was given
  - "description": one sentence describing the task
- Optionally add "reason": why you chose the bucket.

Example 1
Task: "APUSH reading chapter 5 due Monday"
Buckets: []
Answer: {{"newBucketName": "APUSH", "parsedTask": {{"assignmentName": "Chapter 5 Reading", "courseCategory": "APUSH", "typeTag": "Homework", "dueDate": "<the coming Monday>", "description": "Read chapter 5 for APUSH."}}, "reason": "No bucket for APUSH yet."}}

Example 2
Task: "chem lab report thursday 3pm"
Buckets: [{{"id": "b-42", "name": "Chemistry", "examples": [{{"assignmentName": "Stoichiometry worksheet"}}]}}]
Answer: {{"bucketId": "b-42", "parsedTask": {{"assignmentName": "Lab Report", "courseCategory": "Chemistry", "typeTag": "Lab", "dueDate": "<the coming Thursday>", "dueTime": "15:00", "description": "Write up the chemistry lab report."}}}}

Example 3
Task: "dentist appointment friday"
Buckets: [{{"id": "b-7", "name": "Others", "examples": []}}]
Answer: {{"bucketId": "b-7", "parsedTask": {{"assignmentName": "Dentist Appointment", "typeTag": "Event", "dueDate": "<the coming Friday>", "description": "Go to the dentist."}}}}

Respond with a single JSON object and nothing else."#
    )
}

/// Read a model reply. `None` unless the reply is a JSON object; individual
/// fields that are missing, blank or not strings are dropped.
pub fn parse_suggestion(reply: &str) -> Option<Suggestion> {
    let value: Value = serde_json::from_str(strip_code_fence(reply)).ok()?;
    let object = value.as_object()?;

    let parsed_task = object
        .get("parsedTask")
        .and_then(Value::as_object)
        .map(|task| ParsedTask {
            assignment_name: text_field(task, "assignmentName"),
            course_category: text_field(task, "courseCategory"),
            type_tag: text_field(task, "typeTag"),
            due_date: text_field(task, "dueDate"),
            due_time: text_field(task, "dueTime"),
            description: text_field(task, "description"),
        })
        .unwrap_or_default();

    Some(Suggestion {
        bucket_id: text_field(object, "bucketId"),
        new_bucket_name: text_field(object, "newBucketName"),
        parsed_task,
        reason: text_field(object, "reason"),
    })
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
