//! Journal actions
//!
//! Every edit to a page is recorded as an [`Action`]. The wire shape is a flat
//! JSON object tagged by `type`:
//!
//! ```json
//! {"type": "add", "id": "5bfaef3699a88622", "item": {...}, "after": "…", "date": 1341191691509}
//! ```
//!
//! Journals read from disk or from other sites may hold entries this crate
//! does not know. Those are kept verbatim as [`JournalEntry::Unrecognized`]
//! so that forking a page never loses history.

use crate::ids::ItemId;
use crate::page::Item;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Every `type` tag an [`Action`] can carry
pub const ACTION_TYPES: [&str; 6] = ["create", "add", "edit", "move", "remove", "fork"];

/// Payload of a `create` action. Only the title is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Per-type part of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionKind {
    /// Initialise a page
    Create { item: PageHeader },

    /// Insert an item, after `after` when given
    Add {
        item: Item,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after: Option<ItemId>,
    },

    /// Replace the item matching the action id
    Edit { item: Item },

    /// Rebuild the story in exactly this order
    Move { order: Vec<ItemId> },

    /// Delete the item matching the action id
    Remove {},

    /// Record that the page content came from `site`
    Fork {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        site: Option<String>,
    },
}

impl ActionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionKind::Create { .. } => "create",
            ActionKind::Add { .. } => "add",
            ActionKind::Edit { .. } => "edit",
            ActionKind::Move { .. } => "move",
            ActionKind::Remove {} => "remove",
            ActionKind::Fork { .. } => "fork",
        }
    }
}

/// One recognised journal action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(flatten)]
    pub kind: ActionKind,

    /// Subject item id (a random token for `create`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,

    /// Submission time, ms since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    /// Fork marker riding along with another action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork: Option<String>,
}

impl Action {
    fn from_kind(kind: ActionKind, id: Option<ItemId>) -> Self {
        Self {
            kind,
            id,
            date: None,
            fork: None,
        }
    }

    pub fn create(title: impl Into<String>) -> Self {
        let item = PageHeader {
            title: Some(title.into()),
            rest: Map::new(),
        };
        Self::from_kind(ActionKind::Create { item }, Some(ItemId::generate()))
    }

    pub fn add(item: Item, after: Option<ItemId>) -> Self {
        let id = item.id.clone();
        Self::from_kind(ActionKind::Add { item, after }, Some(id))
    }

    pub fn edit(item: Item) -> Self {
        let id = item.id.clone();
        Self::from_kind(ActionKind::Edit { item }, Some(id))
    }

    pub fn move_to(order: Vec<ItemId>) -> Self {
        Self::from_kind(ActionKind::Move { order }, None)
    }

    pub fn remove(id: ItemId) -> Self {
        Self::from_kind(ActionKind::Remove {}, Some(id))
    }

    pub fn fork(site: Option<String>) -> Self {
        Self::from_kind(ActionKind::Fork { site }, None)
    }

    pub fn with_date(mut self, date: i64) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the submission time in place
    pub fn stamp(&mut self, date: i64) {
        self.date = Some(date);
    }

    pub fn with_fork_marker(mut self, site: impl Into<String>) -> Self {
        self.fork = Some(site.into());
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Detach the fork marker, if any
    pub fn take_fork(&mut self) -> Option<String> {
        self.fork.take()
    }

    /// The item an `edit` or `remove` targets: the action id, falling back to
    /// the id of the carried item.
    pub fn subject(&self) -> Option<&ItemId> {
        match (&self.id, &self.kind) {
            (Some(id), _) => Some(id),
            (None, ActionKind::Edit { item }) | (None, ActionKind::Add { item, .. }) => {
                Some(&item.id)
            }
            _ => None,
        }
    }
}

/// A journal slot: a recognised action or a foreign entry kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JournalEntry {
    Action(Action),
    Unrecognized(Value),
}

impl JournalEntry {
    pub fn action(&self) -> Option<&Action> {
        match self {
            JournalEntry::Action(action) => Some(action),
            JournalEntry::Unrecognized(_) => None,
        }
    }

    /// The `type` tag, whether or not it is one this crate understands
    pub fn type_name(&self) -> Option<&str> {
        match self {
            JournalEntry::Action(action) => Some(action.type_name()),
            JournalEntry::Unrecognized(raw) => raw.get("type").and_then(Value::as_str),
        }
    }

    /// True for entries whose tag is known but whose payload did not parse
    pub fn is_malformed(&self) -> bool {
        matches!(self, JournalEntry::Unrecognized(_))
            && self
                .type_name()
                .is_some_and(|name| ACTION_TYPES.contains(&name))
    }

    pub fn date(&self) -> Option<i64> {
        match self {
            JournalEntry::Action(action) => action.date,
            JournalEntry::Unrecognized(raw) => raw.get("date").and_then(Value::as_i64),
        }
    }

    pub fn fork_site(&self) -> Option<&str> {
        match self.action().map(|action| &action.kind) {
            Some(ActionKind::Fork { site: Some(site) }) => Some(site),
            _ => None,
        }
    }
}

impl From<Action> for JournalEntry {
    fn from(action: Action) -> Self {
        JournalEntry::Action(action)
    }
}

/// Current wall-clock time in ms since the epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
