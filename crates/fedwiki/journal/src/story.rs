//! Story helpers shared by both engines

use fedwiki_types::{Item, ItemId};
use std::collections::HashMap;

pub(crate) fn position(story: &[Item], id: &ItemId) -> Option<usize> {
    story.iter().position(|item| &item.id == id)
}

/// Rebuild a story from `order`. Ids with no current item are dropped and
/// items missing from `order` are discarded.
pub(crate) fn reorder(story: Vec<Item>, order: &[ItemId]) -> Vec<Item> {
    let by_id: HashMap<ItemId, Item> = story
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();
    order.iter().filter_map(|id| by_id.get(id).cloned()).collect()
}

pub(crate) fn replace_or_append(story: &mut Vec<Item>, id: Option<&ItemId>, item: &Item) {
    match id.and_then(|id| position(story, id)) {
        Some(index) => story[index] = item.clone(),
        None => story.push(item.clone()),
    }
}

pub(crate) fn remove(story: &mut Vec<Item>, id: Option<&ItemId>) {
    if let Some(index) = id.and_then(|id| position(story, id)) {
        story.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> Item {
        Item::new(ItemId::new(id), "paragraph")
    }

    #[test]
    fn test_reorder_drops_unknown_and_omitted() {
        let story = vec![item("a"), item("b"), item("c")];
        let order = vec![ItemId::new("c"), ItemId::new("zz"), ItemId::new("a")];
        let ids: Vec<_> = reorder(story, &order)
            .into_iter()
            .map(|item| item.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }
}
