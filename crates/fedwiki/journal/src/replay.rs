//! Revision replay
//!
//! Rebuilds a page's story from a prefix of its journal. This is the canonical
//! reading of history: whatever the live page looks like, a revision is what
//! folding these rules over the journal produces.
//!
//! | action   | effect on the story                                         |
//! |----------|-------------------------------------------------------------|
//! | `create` | sets the title when the item carries one                    |
//! | `add`    | after `after` when present in the story, else at the tail   |
//! | `edit`   | replaces the matching item in place, else appends           |
//! | `move`   | story becomes `order`, unknown ids dropped                  |
//! | `remove` | deletes the matching item, no-op when absent                |
//! | `fork`   | no effect                                                   |

use crate::story;
use fedwiki_types::{Action, ActionKind, JournalEntry, Page, Revision};

/// Replay `journal` up to `revision`, starting from `title`.
///
/// Pure and deterministic: the same inputs always give structurally equal
/// output, and nothing returned aliases the input. An empty journal yields
/// [`Page::empty`].
pub fn replay(journal: &[JournalEntry], title: &str, revision: Revision) -> Page {
    if journal.is_empty() {
        return Page::empty();
    }

    let prefix = &journal[..revision.prefix_len(journal.len())];
    let mut page = Page::new(title);

    for action in prefix.iter().filter_map(JournalEntry::action) {
        replay_step(&mut page, action);
    }

    page.journal = prefix.to_vec();
    page
}

/// Advance `page` by one action under the replay rules.
///
/// Only the story and title change; the journal is left to the caller. Use
/// this to move a page forward from whatever story it already has.
pub fn replay_step(page: &mut Page, action: &Action) {
    match &action.kind {
        ActionKind::Create { item } => {
            if let Some(title) = &item.title {
                page.title = title.clone();
            }
        }
        ActionKind::Add { item, after } => {
            let index = after
                .as_ref()
                .and_then(|after| story::position(&page.story, after))
                .map(|index| index + 1);
            match index {
                Some(index) => page.story.insert(index, item.clone()),
                None => page.story.push(item.clone()),
            }
        }
        ActionKind::Edit { item } => {
            story::replace_or_append(&mut page.story, action.subject(), item);
        }
        ActionKind::Move { order } => {
            page.story = story::reorder(std::mem::take(&mut page.story), order);
        }
        ActionKind::Remove {} => {
            story::remove(&mut page.story, action.subject());
        }
        ActionKind::Fork { .. } => {}
    }
}

/// Revision access on a whole page
pub trait Replay {
    /// The page as it stood at `revision`, recomputed from its journal
    fn at_revision(&self, revision: Revision) -> Page;
}

impl Replay for Page {
    fn at_revision(&self, revision: Revision) -> Page {
        replay(&self.journal, &self.title, revision)
    }
}
