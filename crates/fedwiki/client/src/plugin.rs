//! Story item rendering
//!
//! Each item type is handled by a [`Plugin`] registered under its type tag.
//! The registry is built once and then only read. Items whose type has no
//! plugin render as a visible error element instead of failing the page.

use crate::context::ResolutionContext;
use fedwiki_types::{Item, Slug};
use std::collections::HashMap;
use std::sync::Arc;

/// Rendered form of one story item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Markup emitted for the item
    pub html: String,
    /// Pages the item links to, in order of appearance
    pub links: Vec<Link>,
    /// Interactions wired up by `bind`
    pub behaviors: Vec<Behavior>,
}

/// An internal `[[Title]]` link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub title: String,
    pub slug: Slug,
    /// Site the link points at, for cross-site references
    pub site: Option<String>,
}

/// Interactions a plugin can attach to its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Double click opens the text editor
    EditText,
    /// Accepts dropped items and turns into them
    DropTarget,
    /// Click opens the referenced page
    OpenPage,
}

/// Rendering capability for one item type
pub trait Plugin: Send + Sync {
    /// Append the item's markup to `container`
    fn emit(&self, container: &mut Container, item: &Item, context: &ResolutionContext);

    /// Attach interactions
    fn bind(&self, _container: &mut Container, _item: &Item) {}
}

/// Item-type to plugin mapping
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// `paragraph`, `factory` and `federatedWiki`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("paragraph", Arc::new(Paragraph));
        registry.register("factory", Arc::new(Factory));
        registry.register("federatedWiki", Arc::new(FederatedWiki));
        registry
    }

    pub fn register(&mut self, kind: impl Into<String>, plugin: Arc<dyn Plugin>) {
        self.plugins.insert(kind.into(), plugin);
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(kind)
    }

    /// Render one item: emit then bind
    pub fn render(&self, item: &Item, context: &ResolutionContext) -> Container {
        let mut container = Container::default();
        match self.get(&item.kind) {
            Some(plugin) => {
                plugin.emit(&mut container, item, context);
                plugin.bind(&mut container, item);
            }
            None => {
                tracing::debug!(kind = %item.kind, id = %item.id, "No plugin for item");
                container.html = format!(
                    "<div class=\"error\">Can't find plugin for '{}'</div>",
                    escape(&item.kind)
                );
            }
        }
        container
    }
}

/// Minimal HTML escaping for text that is not markup
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Turn `[[Title]]` into internal links and `[http://url label]` into
/// external ones. Returns the markup and the internal links found.
pub fn resolve_links(text: &str, context: &ResolutionContext) -> (String, Vec<Link>) {
    let mut html = String::with_capacity(text.len());
    let mut links = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find('[') {
        html.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(inner) = tail.strip_prefix("[[") {
            let link = inner.find("]]").and_then(|end| {
                let title = &inner[..end];
                Slug::from_title(title).map(|slug| (end, title, slug))
            });
            if let Some((end, title, slug)) = link {
                html.push_str(&format!(
                    "<a class=\"internal\" href=\"/{slug}.html\" data-page-name=\"{slug}\" title=\"{}\">{}</a>",
                    escape(&context.to_string()),
                    title
                ));
                links.push(Link {
                    title: title.to_string(),
                    slug,
                    site: None,
                });
                rest = &inner[end + 2..];
                continue;
            }
        } else if let Some(external) = external_link(tail) {
            html.push_str(&format!(
                "<a class=\"external\" target=\"_blank\" href=\"{}\">{}</a>",
                external.url, external.label
            ));
            rest = &tail[external.consumed..];
            continue;
        }

        html.push('[');
        rest = &tail[1..];
    }
    html.push_str(rest);

    (html, links)
}

struct ExternalLink<'a> {
    url: &'a str,
    label: &'a str,
    consumed: usize,
}

/// `[http... label]` at the start of `text`
fn external_link(text: &str) -> Option<ExternalLink<'_>> {
    let body = text.strip_prefix("[http")?;
    let close = body.find(']')?;
    let inside = &text[1..close + 5];
    let (url, label) = inside.split_once(' ')?;
    Some(ExternalLink {
        url,
        label,
        consumed: close + 6,
    })
}

/// Text with wiki links
struct Paragraph;

impl Plugin for Paragraph {
    fn emit(&self, container: &mut Container, item: &Item, context: &ResolutionContext) {
        let (html, links) = resolve_links(item.text().unwrap_or_default(), context);
        container.html.push_str(&format!("<p>{}</p>", html));
        container.links.extend(links);
    }

    fn bind(&self, container: &mut Container, _item: &Item) {
        container.behaviors.push(Behavior::EditText);
    }
}

/// Placeholder waiting to become another item
struct Factory;

impl Plugin for Factory {
    fn emit(&self, container: &mut Container, _item: &Item, _context: &ResolutionContext) {
        container
            .html
            .push_str("<p>Double-Click to Edit<br>Drop Text or Image to Insert</p>");
    }

    fn bind(&self, container: &mut Container, _item: &Item) {
        container.behaviors.push(Behavior::EditText);
        container.behaviors.push(Behavior::DropTarget);
    }
}

/// Reference to a page on another site, as produced by citations
struct FederatedWiki;

impl Plugin for FederatedWiki {
    fn emit(&self, container: &mut Container, item: &Item, _context: &ResolutionContext) {
        let field = |key: &str| item.field(key).and_then(|v| v.as_str()).unwrap_or_default();
        let site = field("site");
        let title = field("title");
        let slug = match field("slug") {
            "" => Slug::from_title(title),
            raw => Slug::from_title(raw),
        };

        match &slug {
            Some(slug) => container.html.push_str(&format!(
                "<p><a class=\"internal\" href=\"/{site}/{slug}\" data-site=\"{site}\" data-page-name=\"{slug}\">{}</a> on {}</p>",
                escape(title),
                escape(site),
                site = escape(site),
            )),
            None => container
                .html
                .push_str(&format!("<p>{} on {}</p>", escape(title), escape(site))),
        }
        let text = field("text");
        if !text.is_empty() {
            container.html.push_str(&format!("<ul>{}</ul>", text));
        }
        if let Some(slug) = slug {
            container.links.push(Link {
                title: title.to_string(),
                slug,
                site: Some(site.to_string()),
            });
        }
    }

    fn bind(&self, container: &mut Container, _item: &Item) {
        container.behaviors.push(Behavior::OpenPage);
    }
}
