//! Schema migration for persisted documents.
//!
//! Documents written by older releases come in several historical shapes. This
//! module recognizes them and rewrites them into the current shape before any
//! typed accessor sees them.
//!
//! # Versioning
//!
//! Record-shaped documents (see [`Document::is_versioned`]) carry a
//! `schema_version` key. A file without it is version 1, the un-versioned
//! legacy era, and goes through the shape-sniffing normalizers exactly once:
//! the store writes the stamped result back immediately. Files already at
//! [`CURRENT_SCHEMA_VERSION`], or from a newer release, skip shape sniffing;
//! only their individual entries are repaired (see below).
//!
//! List-shaped documents and the users mapping are never stamped; their
//! normalizers only backfill missing fields and are cheap to run on every load.
//!
//! # Entry repair
//!
//! A single mistyped entry never costs the rest of a document. On every load,
//! each folder, subject, schedule day and user whose value does not decode is
//! rewritten into a usable shape or, failing that, dropped with a warning.
//! Only a document whose outer structure is unusable (a list where a record
//! belongs) is reset by the store.
//!
//! # Historical shapes
//!
//! | Document | Shapes recognized |
//! |---|---|
//! | notes | `["Math", ...]`, `{"folders": [...]}`, `{"content": "..."}`, `{"folders": {"Bio": {"content": "..."}}}`, current |
//! | resources | `["https://...", ...]`, current |
//! | schedule | `["entry", ...]`, current |
//!
//! All normalizers are pure: they never touch the filesystem and report
//! whether the value they return differs from the one they were given.

use crate::domain::Palette;
use crate::storage::documents::Document;
use crate::storage::models::{Folder, Priority, Subject};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::mem::discriminant;

/// Key holding the schema version in record-shaped documents.
pub const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Version written by this release.
pub const CURRENT_SCHEMA_VERSION: u64 = 2;

/// Version assumed for files that carry no stamp.
pub const LEGACY_SCHEMA_VERSION: u64 = 1;

/// Unit that receives the content of a folder from the single-content era.
pub const GENERAL_UNIT: &str = "General";

/// Subject that receives links from the flat-list era.
pub const GENERAL_SUBJECT: &str = "General";

/// Unit that receives links from the flat-list era.
pub const ALL_LINKS_UNIT: &str = "All";

/// Folder that receives the notes text of the very first release.
pub const LEGACY_NOTES_FOLDER: &str = "Notes";

/// Schedule key holding entries written before the calendar existed.
pub const LEGACY_SCHEDULE_KEY: &str = "__all__";

/// Outcome of bringing a raw document into its current shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    /// Document body in the current shape, without a version stamp.
    pub value: Value,
    /// Version the raw document was recognized as.
    pub from_version: u64,
    /// Version to stamp when the body is written back.
    pub schema_version: u64,
    /// Whether the body must be written back.
    pub changed: bool,
}

/// Brings a freshly loaded document into its current shape.
///
/// # Examples
///
/// ```
/// use student_helper::storage::{migrate, Document};
/// use serde_json::json;
///
/// let upgrade = migrate::upgrade(Document::Schedule, json!(["Mon 10am: Math"]));
/// assert!(upgrade.changed);
/// assert_eq!(upgrade.value, json!({ "__all__": ["Mon 10am: Math"] }));
/// ```
#[must_use]
pub fn upgrade(document: Document, raw: Value) -> Upgrade {
    if !document.is_versioned() {
        let (value, changed) = match document {
            Document::Todos => normalize_todos(raw),
            Document::Flashcards => normalize_flashcards(raw),
            Document::Users => repair_users(raw),
            _ => (raw, false),
        };
        return Upgrade {
            value,
            from_version: CURRENT_SCHEMA_VERSION,
            schema_version: CURRENT_SCHEMA_VERSION,
            changed,
        };
    }

    let (from_version, body) = split_version(raw);
    let (value, mut changed) = if from_version < CURRENT_SCHEMA_VERSION {
        let (value, _) = normalize_legacy(document, body);
        (value, true)
    } else {
        if from_version > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                document = %document,
                from_version,
                "document written by a newer release, reading as-is"
            );
        }
        repair_current(document, body)
    };

    let value = if document == Document::Settings {
        let (value, backfilled) = normalize_settings(value);
        changed |= backfilled;
        value
    } else {
        value
    };

    Upgrade {
        value,
        from_version,
        schema_version: from_version.max(CURRENT_SCHEMA_VERSION),
        changed,
    }
}

/// Removes the version stamp from a raw document.
///
/// Returns [`LEGACY_SCHEMA_VERSION`] when the value is not a record, has no
/// stamp, or the stamp is not a non-negative integer.
#[must_use]
pub fn split_version(raw: Value) -> (u64, Value) {
    match raw {
        Value::Object(mut map) => {
            let version = map
                .remove(SCHEMA_VERSION_KEY)
                .and_then(|v| v.as_u64())
                .unwrap_or(LEGACY_SCHEMA_VERSION);
            (version, Value::Object(map))
        }
        other => (LEGACY_SCHEMA_VERSION, other),
    }
}

/// Adds the version stamp to a document body about to be saved.
///
/// Bodies of un-versioned documents, and bodies that are not records, are
/// returned unchanged.
#[must_use]
pub fn stamp(document: Document, body: Value, version: u64) -> Value {
    match body {
        Value::Object(mut map) if document.is_versioned() => {
            map.insert(SCHEMA_VERSION_KEY.to_string(), Value::from(version));
            Value::Object(map)
        }
        other => other,
    }
}

fn normalize_legacy(document: Document, body: Value) -> (Value, bool) {
    match document {
        Document::Notes => normalize_notes(body),
        Document::Resources => normalize_resources(body),
        Document::Schedule => normalize_schedule(body),
        _ => (body, false),
    }
}

fn repair_current(document: Document, body: Value) -> (Value, bool) {
    match document {
        Document::Notes => repair_notes(body),
        Document::Resources => repair_resources(body),
        Document::Schedule => repair_schedule(body),
        _ => (body, false),
    }
}

/// Keeps every entry that decodes as `T`. The rest go through `fix`, and are
/// dropped when it gives nothing back.
fn repair_entries<T: DeserializeOwned>(
    entries: Map<String, Value>,
    fix: impl Fn(Value) -> Option<Value>,
) -> (Map<String, Value>, bool) {
    let mut changed = false;
    let entries: Map<String, Value> = entries
        .into_iter()
        .filter_map(|(key, entry)| {
            if serde_json::from_value::<T>(entry.clone()).is_ok() {
                return Some((key, entry));
            }
            changed = true;
            match fix(entry) {
                Some(entry) => {
                    tracing::warn!(key = %key, "repaired malformed entry");
                    Some((key, entry))
                }
                None => {
                    tracing::warn!(key = %key, "dropping entry that cannot be repaired");
                    None
                }
            }
        })
        .collect();
    (entries, changed)
}

/// Runs [`repair_entries`] over the record stored under `key`, leaving every
/// other key alone.
fn repair_nested<T: DeserializeOwned>(
    raw: Value,
    key: &str,
    fix: impl Fn(Value) -> Option<Value>,
) -> (Value, bool) {
    let mut map = match raw {
        Value::Object(map) => map,
        other => return (other, false),
    };
    match map.remove(key) {
        Some(Value::Object(entries)) => {
            let (entries, changed) = repair_entries::<T>(entries, fix);
            map.insert(key.to_string(), Value::Object(entries));
            (Value::Object(map), changed)
        }
        Some(other) => {
            map.insert(key.to_string(), other);
            (Value::Object(map), false)
        }
        None => (Value::Object(map), false),
    }
}

/// Repairs the folders of a current notes document that do not decode.
///
/// Well-formed folders, including any keys this release does not know, are
/// left exactly as they are.
#[must_use]
pub fn repair_notes(raw: Value) -> (Value, bool) {
    repair_nested::<Folder>(raw, "folders", |entry| Some(normalize_folder(entry)))
}

/// Repairs the subjects of a current resources document that do not decode.
#[must_use]
pub fn repair_resources(raw: Value) -> (Value, bool) {
    repair_nested::<Subject>(raw, "subjects", |entry| Some(normalize_subject(entry)))
}

fn schedule_day(entries: Value) -> Option<Value> {
    match entries {
        Value::Array(items) => Some(Value::Array(strings_only(items))),
        Value::String(entry) => Some(json!([entry])),
        _ => None,
    }
}

/// Repairs the days of a schedule record.
///
/// A day holding a single string becomes a one-entry list, non-string entries
/// are dropped, and a day holding anything else is dropped entirely.
///
/// # Examples
///
/// ```
/// use student_helper::storage::migrate::repair_schedule;
/// use serde_json::json;
///
/// let (schedule, changed) = repair_schedule(json!({
///     "2024-01-15": ["Exam"],
///     "2024-01-16": "Lab",
/// }));
/// assert!(changed);
/// assert_eq!(schedule, json!({ "2024-01-15": ["Exam"], "2024-01-16": ["Lab"] }));
/// ```
#[must_use]
pub fn repair_schedule(raw: Value) -> (Value, bool) {
    match raw {
        Value::Object(days) => {
            let (days, changed) = repair_entries::<Vec<String>>(days, schedule_day);
            (Value::Object(days), changed)
        }
        other => (other, false),
    }
}

/// Repairs the users mapping.
///
/// A password stored as a number or boolean becomes its JSON text; a user
/// whose password is anything else non-textual is dropped.
#[must_use]
pub fn repair_users(raw: Value) -> (Value, bool) {
    match raw {
        Value::Object(users) => {
            let (users, changed) = repair_entries::<String>(users, |password| match password {
                Value::Number(_) | Value::Bool(_) => Some(Value::String(password.to_string())),
                _ => None,
            });
            (Value::Object(users), changed)
        }
        other => (other, false),
    }
}

fn strings_only(items: Vec<Value>) -> Vec<Value> {
    items
        .into_iter()
        .filter(|item| {
            let keep = item.is_string();
            if !keep {
                tracing::warn!(item = %item, "dropping non-string list entry");
            }
            keep
        })
        .collect()
}

/// Text of a legacy content field. Non-string scalars keep their JSON text.
fn content_text(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s),
        Value::Null => Value::String(String::new()),
        other => Value::String(other.to_string()),
    }
}

fn empty_folder() -> Value {
    json!({ "complete": false, "units": {} })
}

fn general_unit_folder(content: Value) -> Value {
    json!({
        "complete": false,
        "units": { GENERAL_UNIT: { "content": content_text(content) } },
    })
}

fn folders_from_names(items: Vec<Value>) -> Map<String, Value> {
    strings_only(items)
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some((name, empty_folder())),
            _ => None,
        })
        .collect()
}

fn normalize_units(units: Map<String, Value>) -> Map<String, Value> {
    units
        .into_iter()
        .map(|(name, unit)| {
            let unit = match unit {
                Value::Object(mut fields) => {
                    let content = fields.remove("content").unwrap_or(Value::Null);
                    fields.insert("content".to_string(), content_text(content));
                    Value::Object(fields)
                }
                other => json!({ "content": content_text(other) }),
            };
            (name, unit)
        })
        .collect()
}

fn normalize_folder(entry: Value) -> Value {
    let mut folder = match entry {
        Value::Object(folder) => folder,
        Value::String(content) => return general_unit_folder(Value::String(content)),
        _ => return empty_folder(),
    };

    if !folder.contains_key("units") {
        if let Some(content) = folder.remove("content") {
            return general_unit_folder(content);
        }
    }

    let units = match folder.remove("units") {
        Some(Value::Object(units)) => normalize_units(units),
        Some(Value::Array(names)) => folders_from_names(names)
            .into_iter()
            .map(|(name, _)| (name, json!({ "content": "" })))
            .collect(),
        _ => Map::new(),
    };
    folder.insert("units".to_string(), Value::Object(units));

    if !folder.get("complete").is_some_and(Value::is_boolean) {
        folder.insert("complete".to_string(), Value::Bool(false));
    }
    Value::Object(folder)
}

/// Upgrades a notes document to `{"folders": {name: {complete, units}}}`.
///
/// # Rules
///
/// - A list of strings becomes one empty folder per string.
/// - A record whose `folders` is a list gets the same treatment.
/// - A record with only a top-level `content` string (first release) becomes a
///   [`LEGACY_NOTES_FOLDER`] folder when the text is non-empty.
/// - A folder holding `content` but no `units` becomes a single
///   [`GENERAL_UNIT`] unit with that content and `complete: false`.
/// - Missing `complete`/`units` are backfilled with `false`/`{}`.
///
/// # Examples
///
/// ```
/// use student_helper::storage::migrate::normalize_notes;
/// use serde_json::json;
///
/// let (notes, changed) = normalize_notes(json!(["Math", "History"]));
/// assert!(changed);
/// assert_eq!(notes, json!({ "folders": {
///     "Math": { "complete": false, "units": {} },
///     "History": { "complete": false, "units": {} },
/// }}));
/// ```
#[must_use]
pub fn normalize_notes(raw: Value) -> (Value, bool) {
    let original = raw.clone();

    let folders = match raw {
        Value::Array(items) => folders_from_names(items),
        Value::Object(mut map) => match map.remove("folders") {
            Some(Value::Object(folders)) => folders,
            Some(Value::Array(items)) => folders_from_names(items),
            _ => match map.remove("content") {
                Some(Value::String(text)) if !text.trim().is_empty() => {
                    let mut folders = Map::new();
                    folders.insert(
                        LEGACY_NOTES_FOLDER.to_string(),
                        json!({ "content": text }),
                    );
                    folders
                }
                _ => Map::new(),
            },
        },
        _ => Map::new(),
    };

    let folders: Map<String, Value> = folders
        .into_iter()
        .map(|(name, entry)| (name, normalize_folder(entry)))
        .collect();

    let value = json!({ "folders": folders });
    let changed = value != original;
    (value, changed)
}

fn normalize_link_list(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(strings_only(items)),
        Value::String(link) => json!([link]),
        _ => json!([]),
    }
}

fn normalize_subject(subject: Value) -> Value {
    match subject {
        Value::Object(mut fields) => {
            let units: Map<String, Value> = match fields.remove("units") {
                Some(Value::Object(units)) => units
                    .into_iter()
                    .map(|(name, links)| (name, normalize_link_list(links)))
                    .collect(),
                _ => Map::new(),
            };
            fields.insert("units".to_string(), Value::Object(units));
            Value::Object(fields)
        }
        links @ (Value::Array(_) | Value::String(_)) => {
            json!({ "units": { ALL_LINKS_UNIT: normalize_link_list(links) } })
        }
        _ => json!({ "units": {} }),
    }
}

/// Upgrades a resources document to `{"subjects": {name: {"units": {name: [url]}}}}`.
///
/// A flat list of URLs becomes subject [`GENERAL_SUBJECT`], unit
/// [`ALL_LINKS_UNIT`]. A missing or non-record `subjects` becomes `{}`.
///
/// # Examples
///
/// ```
/// use student_helper::storage::migrate::normalize_resources;
/// use serde_json::json;
///
/// let (resources, _) = normalize_resources(json!(["https://a.com", "https://b.com"]));
/// assert_eq!(resources, json!({ "subjects": {
///     "General": { "units": { "All": ["https://a.com", "https://b.com"] } }
/// }}));
/// ```
#[must_use]
pub fn normalize_resources(raw: Value) -> (Value, bool) {
    let original = raw.clone();

    let subjects = match raw {
        Value::Array(items) => {
            let mut subjects = Map::new();
            subjects.insert(
                GENERAL_SUBJECT.to_string(),
                json!({ "units": { ALL_LINKS_UNIT: strings_only(items) } }),
            );
            subjects
        }
        Value::Object(mut map) => match map.remove("subjects") {
            Some(Value::Object(subjects)) => subjects
                .into_iter()
                .map(|(name, subject)| (name, normalize_subject(subject)))
                .collect(),
            _ => Map::new(),
        },
        _ => Map::new(),
    };

    let value = json!({ "subjects": subjects });
    let changed = value != original;
    (value, changed)
}

/// Upgrades a schedule document to `{"yyyy-MM-dd": [entry], "__all__": [entry]}`.
///
/// A flat list becomes the [`LEGACY_SCHEDULE_KEY`] bucket and is never merged
/// into a real date. Records go through [`repair_schedule`]. Any other value
/// resets to `{}`.
#[must_use]
pub fn normalize_schedule(raw: Value) -> (Value, bool) {
    let original = raw.clone();

    let value = match raw {
        Value::Array(items) => json!({ LEGACY_SCHEDULE_KEY: strings_only(items) }),
        record @ Value::Object(_) => repair_schedule(record).0,
        _ => json!({}),
    };

    let changed = value != original;
    (value, changed)
}

fn todo_priority_is_valid(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|name| Priority::ALL.iter().any(|p| p.name() == name))
}

/// Backfills task records: `done` defaults to `false`, a missing or unknown
/// `priority` becomes `Medium`, bare strings become pending tasks.
#[must_use]
pub fn normalize_todos(raw: Value) -> (Value, bool) {
    let items = match raw {
        Value::Array(items) => items,
        other => return (other, false),
    };
    let original = items.clone();

    let items: Vec<Value> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut task) => {
                if !task.get("text").is_some_and(Value::is_string) {
                    let text = task.remove("text").unwrap_or(Value::Null);
                    task.insert("text".to_string(), content_text(text));
                }
                if !todo_priority_is_valid(task.get("priority")) {
                    task.insert("priority".to_string(), json!("Medium"));
                }
                if !task.get("done").is_some_and(Value::is_boolean) {
                    task.insert("done".to_string(), Value::Bool(false));
                }
                Some(Value::Object(task))
            }
            Value::String(text) => Some(json!({ "text": text, "priority": "Medium", "done": false })),
            _ => None,
        })
        .collect();

    let changed = items != original;
    (Value::Array(items), changed)
}

/// Backfills card records: `known` defaults to `false`, missing sides to `""`.
#[must_use]
pub fn normalize_flashcards(raw: Value) -> (Value, bool) {
    let items = match raw {
        Value::Array(items) => items,
        other => return (other, false),
    };
    let original = items.clone();

    let items: Vec<Value> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut card) => {
                for side in ["front", "back"] {
                    if !card.get(side).is_some_and(Value::is_string) {
                        let text = card.remove(side).unwrap_or(Value::Null);
                        card.insert(side.to_string(), content_text(text));
                    }
                }
                if !card.get("known").is_some_and(Value::is_boolean) {
                    card.insert("known".to_string(), Value::Bool(false));
                }
                Some(Value::Object(card))
            }
            _ => None,
        })
        .collect();

    let changed = items != original;
    (Value::Array(items), changed)
}

/// Extends a settings record with every missing key of the default record.
///
/// Keys whose JSON type differs from the default's, and a `theme` that is not
/// a known palette name, are replaced by the default value. Unknown keys are
/// kept; [`crate::storage::Settings`] carries them through typed saves.
#[must_use]
pub fn normalize_settings(raw: Value) -> (Value, bool) {
    let (_, defaults) = split_version(Document::Settings.default_value());
    let Value::Object(defaults) = defaults else {
        return (raw, false);
    };

    let (mut settings, mut changed) = match raw {
        Value::Object(map) => (map, false),
        _ => (Map::new(), true),
    };

    for (key, default) in defaults {
        let keep = settings
            .get(&key)
            .is_some_and(|current| discriminant(current) == discriminant(&default));
        if !keep {
            settings.insert(key, default);
            changed = true;
        }
    }

    let theme_known = settings
        .get("theme")
        .and_then(Value::as_str)
        .and_then(Palette::from_name)
        .is_some();
    if !theme_known {
        settings.insert(
            "theme".to_string(),
            Value::String(Palette::default().name().to_string()),
        );
        changed = true;
    }

    (Value::Object(settings), changed)
}
