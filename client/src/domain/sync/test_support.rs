//! Minimal bindings used by controller unit tests.

use serde::Deserialize;
use serde_json::{Value, json};

use super::{CollectionBinding, RecordBinding, SyncOptions};
use crate::domain::projection::{decode, expect_present, project_list, required};
use crate::domain::{Entity, Operation, SyncError, UserIdentity};

pub(crate) const FETCH: &str = "GetNotes";
pub(crate) const ADD: &str = "AddNote";
pub(crate) const UPDATE: &str = "UpdateNote";
pub(crate) const REMOVE: &str = "RemoveNote";

#[derive(Debug, Deserialize)]
struct RawNote {
    id: Option<String>,
    title: Option<String>,
}

/// Collection of titled notes nested under `getUserById.notes`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoteBinding {
    pub(crate) options: SyncOptions,
    pub(crate) read_only: bool,
}

impl NoteBinding {
    pub(crate) fn with_options(options: SyncOptions) -> Self {
        Self {
            options,
            read_only: false,
        }
    }
}

impl CollectionBinding for NoteBinding {
    type Fields = String;

    fn entity_name(&self) -> &'static str {
        "Notes"
    }

    fn options(&self) -> SyncOptions {
        self.options
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped(FETCH, "query GetNotes { notes }", identity)
    }

    fn project(&self, data: &Value) -> Result<Vec<Entity<String>>, SyncError> {
        let user = expect_present(data, &["getUserById"], "User not found")?;
        let list = user.get("notes").unwrap_or(&Value::Null);
        project_list("Notes", list, |raw: RawNote| {
            Ok(Entity::confirmed(
                required("Notes", "id", raw.id)?,
                required("Notes", "title", raw.title)?,
            ))
        })
    }

    fn add_operation(&self, identity: &UserIdentity, fields: &String) -> Option<Operation> {
        (!self.read_only).then(|| {
            Operation::scoped(ADD, "mutation AddNote { addNote }", identity)
                .with_variable("title", fields.as_str())
        })
    }

    fn update_operation(
        &self,
        identity: &UserIdentity,
        id: &str,
        fields: &String,
    ) -> Option<Operation> {
        (!self.read_only).then(|| {
            Operation::scoped(UPDATE, "mutation UpdateNote { updateNote }", identity)
                .with_variable("id", id)
                .with_variable("title", fields.as_str())
        })
    }

    fn remove_operation(&self, identity: &UserIdentity, id: &str) -> Option<Operation> {
        (!self.read_only).then(|| {
            Operation::scoped(REMOVE, "mutation RemoveNote { removeNote }", identity)
                .with_variable("id", id)
        })
    }
}

/// Payload for `getUserById.notes` built from `(id, title)` pairs.
pub(crate) fn notes_payload(notes: &[(&str, &str)]) -> Value {
    let notes: Vec<Value> = notes
        .iter()
        .map(|(id, title)| json!({ "id": id, "title": title }))
        .collect();
    json!({ "getUserById": { "notes": notes } })
}

/// Titles of the rows in order.
pub(crate) fn titles(rows: &[Entity<String>]) -> Vec<&str> {
    rows.iter().map(|row| row.fields().as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Motto {
    pub(crate) text: String,
}

/// Single record stored at `getUserById.motto`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MottoBinding {
    pub(crate) options: SyncOptions,
    pub(crate) read_only: bool,
}

impl RecordBinding for MottoBinding {
    type Record = Motto;

    fn entity_name(&self) -> &'static str {
        "Motto"
    }

    fn options(&self) -> SyncOptions {
        self.options
    }

    fn fetch_operation(&self, identity: &UserIdentity) -> Operation {
        Operation::scoped("GetMotto", "query GetMotto { motto }", identity)
    }

    fn project(&self, data: &Value) -> Result<Motto, SyncError> {
        let motto = expect_present(data, &["getUserById", "motto"], "Motto not found")?;
        decode("Motto", motto)
    }

    fn save_operation(&self, identity: &UserIdentity, record: &Motto) -> Option<Operation> {
        (!self.read_only).then(|| {
            Operation::scoped("SaveMotto", "mutation SaveMotto { saveMotto }", identity)
                .with_variable("text", record.text.as_str())
        })
    }
}

/// Payload for `getUserById.motto`.
pub(crate) fn motto_payload(text: &str) -> Value {
    json!({ "getUserById": { "motto": { "text": text } } })
}

/// Identity used by authenticated controller tests.
pub(crate) fn identity() -> UserIdentity {
    UserIdentity::try_from_parts("u-1", "tok-1").unwrap_or_else(|err| panic!("identity: {err}"))
}
