//! Property tests: replay determinism and replay/live agreement.

use fedwiki_journal::{apply_action, replay};
use fedwiki_types::{Action, Item, ItemId, JournalEntry, Revision};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Add { anchor: usize, dangling: bool },
    Edit { target: usize, dangling: bool },
    Move { rotate: usize, extra: bool },
    Remove { target: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<bool>()).prop_map(|(anchor, dangling)| Op::Add { anchor, dangling }),
        (any::<usize>(), any::<bool>()).prop_map(|(target, dangling)| Op::Edit { target, dangling }),
        (any::<usize>(), any::<bool>()).prop_map(|(rotate, extra)| Op::Move { rotate, extra }),
        any::<usize>().prop_map(|target| Op::Remove { target }),
    ]
}

/// Turn abstract ops into a concrete journal whose adds are always anchored
/// once the story is non-empty, tracking the live story as it goes.
fn build_journal(ops: &[Op]) -> (Vec<JournalEntry>, Vec<Item>) {
    let mut live: Vec<Item> = Vec::new();
    let mut journal: Vec<JournalEntry> = vec![Action::create("generated").into()];
    for (n, op) in ops.iter().enumerate() {
        let action = match op {
            Op::Add { anchor, dangling } => {
                let item = Item::new(ItemId::new(format!("item{n}")), "paragraph")
                    .with_field("text", format!("text {n}"));
                let after = if *dangling {
                    Some(ItemId::new("dangling"))
                } else if live.is_empty() {
                    None
                } else {
                    Some(live[anchor % live.len()].id.clone())
                };
                Action::add(item, after)
            }
            Op::Edit { target, dangling } => {
                let id = if *dangling || live.is_empty() {
                    ItemId::new(format!("orphan{n}"))
                } else {
                    live[target % live.len()].id.clone()
                };
                Action::edit(Item::new(id, "paragraph").with_field("text", format!("edit {n}")))
            }
            Op::Move { rotate, extra } => {
                let mut order: Vec<ItemId> = live.iter().map(|item| item.id.clone()).collect();
                if !order.is_empty() {
                    let by = rotate % order.len();
                    order.rotate_left(by);
                }
                if *extra {
                    order.push(ItemId::new("never-added"));
                }
                Action::move_to(order)
            }
            Op::Remove { target } => {
                let id = if live.is_empty() {
                    ItemId::new("missing")
                } else {
                    live[target % live.len()].id.clone()
                };
                Action::remove(id)
            }
        };
        apply_action(&mut live, &action);
        journal.push(action.with_date(n as i64).into());
    }
    (journal, live)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn replay_is_deterministic(ops in prop::collection::vec(arb_op(), 0..40), cut in any::<usize>()) {
        let (journal, _) = build_journal(&ops);
        let revision = Revision::Index(cut % (journal.len() + 2));
        let first = replay(&journal, "generated", revision);
        let second = replay(&journal, "generated", revision);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn replay_prefix_length_matches_revision(ops in prop::collection::vec(arb_op(), 0..40), cut in any::<usize>()) {
        let (journal, _) = build_journal(&ops);
        let index = cut % journal.len();
        let version = replay(&journal, "generated", Revision::Index(index));
        prop_assert_eq!(version.journal.len(), index + 1);
        prop_assert_eq!(&version.journal[..], &journal[..=index]);
    }

    #[test]
    fn head_replay_equals_live_story(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (journal, live) = build_journal(&ops);
        let version = replay(&journal, "ignored", Revision::Head);
        prop_assert_eq!(version.title, "generated");
        prop_assert_eq!(version.story, live);
    }

    #[test]
    fn story_ids_stay_unique(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (journal, _) = build_journal(&ops);
        let version = replay(&journal, "generated", Revision::Head);
        let mut ids: Vec<_> = version.story.iter().map(|item| item.id.clone()).collect();
        ids.sort();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());
    }
}
