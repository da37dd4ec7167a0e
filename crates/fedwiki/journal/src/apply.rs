//! Live story mutation
//!
//! The rules the server applies when an action arrives. They match
//! [`replay`](crate::replay()) except for one case: an `add` with no `after`
//! goes to the head of the story, where replay puts it at the tail. Pages
//! built only from anchored adds replay to exactly their live story.

use crate::story;
use fedwiki_types::{Action, ActionKind, Item, JournalEntry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JournalError {
    /// The entry's `type` is not one of the six actions
    #[error("unfamiliar action: {0}")]
    Unsupported(String),

    /// The entry names a known action but its payload does not parse
    #[error("malformed {0} action")]
    Malformed(String),
}

/// Mutate a live story with one action.
pub fn apply_action(story: &mut Vec<Item>, action: &Action) {
    match &action.kind {
        ActionKind::Add { item, after } => {
            let index = match after {
                None => 0,
                Some(after) => story::position(story, after)
                    .map_or(story.len(), |index| index + 1),
            };
            story.insert(index, item.clone());
        }
        ActionKind::Edit { item } => story::replace_or_append(story, action.subject(), item),
        ActionKind::Move { order } => {
            *story = story::reorder(std::mem::take(story), order);
        }
        ActionKind::Remove {} => story::remove(story, action.subject()),
        ActionKind::Create { .. } | ActionKind::Fork { .. } => {}
    }
}

/// Accept a raw journal entry as an action, or say why it cannot be applied.
pub fn recognise(entry: JournalEntry) -> Result<Action, JournalError> {
    let malformed = entry.is_malformed();
    let name = entry.type_name().unwrap_or("<untyped>").to_string();
    match entry {
        JournalEntry::Action(action) => Ok(action),
        JournalEntry::Unrecognized(_) if malformed => Err(JournalError::Malformed(name)),
        JournalEntry::Unrecognized(_) => Err(JournalError::Unsupported(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedwiki_types::ItemId;

    fn item(id: &str) -> Item {
        Item::new(ItemId::new(id), "paragraph")
    }

    fn ids(story: &[Item]) -> Vec<&str> {
        story.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_add_without_after_goes_to_head() {
        let mut story = vec![item("a")];
        apply_action(&mut story, &Action::add(item("b"), None));
        assert_eq!(ids(&story), vec!["b", "a"]);
    }

    #[test]
    fn test_add_after_anchor() {
        let mut story = vec![item("a"), item("c")];
        apply_action(&mut story, &Action::add(item("b"), Some(ItemId::new("a"))));
        assert_eq!(ids(&story), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_after_missing_anchor_goes_to_tail() {
        let mut story = vec![item("a")];
        apply_action(&mut story, &Action::add(item("b"), Some(ItemId::new("gone"))));
        assert_eq!(ids(&story), vec!["a", "b"]);
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let mut story = vec![item("a"), item("b")];
        let edited = item("a").with_field("text", "changed");
        apply_action(&mut story, &Action::edit(edited));
        assert_eq!(ids(&story), vec!["a", "b"]);
        assert_eq!(story[0].text(), Some("changed"));
    }

    #[test]
    fn test_move_and_remove() {
        let mut story = vec![item("a"), item("b"), item("c")];
        apply_action(
            &mut story,
            &Action::move_to(vec![ItemId::new("c"), ItemId::new("a"), ItemId::new("x")]),
        );
        assert_eq!(ids(&story), vec!["c", "a"]);
        apply_action(&mut story, &Action::remove(ItemId::new("c")));
        assert_eq!(ids(&story), vec!["a"]);
    }

    #[test]
    fn test_recognise_classifies_entries() {
        let entry = JournalEntry::Unrecognized(serde_json::json!({"type": "teleport"}));
        assert_eq!(recognise(entry), Err(JournalError::Unsupported("teleport".into())));
        let entry = JournalEntry::Unrecognized(serde_json::json!({"type": "edit"}));
        assert_eq!(recognise(entry), Err(JournalError::Malformed("edit".into())));
        let entry = JournalEntry::Unrecognized(serde_json::json!({"text": "no type"}));
        assert_eq!(recognise(entry), Err(JournalError::Unsupported("<untyped>".into())));
        let action = Action::remove(ItemId::new("a"));
        assert_eq!(recognise(action.clone().into()), Ok(action));
    }
}
