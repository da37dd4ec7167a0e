//! Pages, story items and citations
//!
//! A page on the wire is `{"title", "story", "journal"}`. Items carry an id
//! and a type tag; every other field is plugin specific and kept verbatim.

use crate::action::JournalEntry;
use crate::ids::{ItemId, Slug};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title of the canonical zero-value page
pub const EMPTY_TITLE: &str = "empty";

/// One element of a page's story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    /// Plugin tag, e.g. `paragraph` or `factory`
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Type-specific fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: ItemId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// A paragraph item with a fresh id
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(ItemId::generate(), "paragraph").with_field("text", text.into())
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn text(&self) -> Option<&str> {
        self.fields.get("text").and_then(Value::as_str)
    }
}

/// A wiki page: title, derived story and the journal it was derived from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub story: Vec<Item>,

    #[serde(default)]
    pub journal: Vec<JournalEntry>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            story: Vec::new(),
            journal: Vec::new(),
        }
    }

    /// The zero-value page. Every call builds a fresh instance.
    pub fn empty() -> Self {
        Self::new(EMPTY_TITLE)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.story.iter().find(|item| &item.id == id)
    }

    /// Sites named by fork entries, newest first, without duplicates.
    pub fn fork_sites(&self) -> Vec<String> {
        let mut sites: Vec<String> = Vec::new();
        for site in self
            .journal
            .iter()
            .rev()
            .filter_map(JournalEntry::fork_site)
        {
            if !sites.iter().any(|known| known == site) {
                sites.push(site.to_string());
            }
        }
        sites
    }

    /// Date of the newest journal entry that carries one
    pub fn last_edited(&self) -> Option<i64> {
        self.journal.iter().rev().find_map(JournalEntry::date)
    }
}

/// Cross-site reference produced when a bundle of pages is submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ItemId,
    pub site: String,
    pub slug: Slug,
    pub title: String,
    pub text: String,
}

impl Citation {
    pub const KIND: &'static str = "federatedWiki";

    pub fn new(
        site: impl Into<String>,
        slug: Slug,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            id: ItemId::generate(),
            site: site.into(),
            slug,
            title: title.into(),
            text: text.into(),
        }
    }

    /// The citation as a story item of type `federatedWiki`
    pub fn to_item(&self) -> Item {
        Item::new(self.id.clone(), Self::KIND)
            .with_field("site", self.site.clone())
            .with_field("slug", self.slug.to_string())
            .with_field("title", self.title.clone())
            .with_field("text", self.text.clone())
    }
}
