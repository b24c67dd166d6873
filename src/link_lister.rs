/*!
 * Episode link discovery.
 *
 * Walks the markup events of an index page and collects `(title, href)` for
 * every anchor that is a direct child of a list item inside the page's
 * content container (`id="mw-content-text"`). Anything outside the container
 * is ignored.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::LinkError;
use crate::markup::{self, MarkupEvent};

/// Id of the element holding the index page's content.
pub const CONTENT_CONTAINER_ID: &str = "mw-content-text";

/// A link to one episode transcript, as listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLink {
    /// Anchor `title` attribute, used as the episode name
    pub title: String,
    /// Anchor `href` attribute, usually relative to the index page
    pub href: String,
}

/// The container element while it is open.
#[derive(Debug)]
struct ContainerScope {
    tag: String,
    /// Open elements sharing the container's tag name, the container included
    nesting: usize,
}

/// Streaming link lister for one index page.
#[derive(Debug)]
pub struct LinkLister {
    container_id: String,
    scope: Option<ContainerScope>,
    /// One entry per open list item: the number of elements open inside it.
    /// A zero on top means the next element is a direct child of an `li`
    list_items: Vec<usize>,
    anchors_seen: usize,
    links: Vec<EpisodeLink>,
}

impl Default for LinkLister {
    fn default() -> Self {
        Self::new(CONTENT_CONTAINER_ID)
    }
}

impl LinkLister {
    /// Create a lister scoped to the element whose id is `container_id`.
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            scope: None,
            list_items: Vec::new(),
            anchors_seen: 0,
            links: Vec::new(),
        }
    }

    /// Consume one markup event.
    pub fn handle(&mut self, event: &MarkupEvent) -> Result<(), LinkError> {
        match event {
            MarkupEvent::Open { tag, attrs } => self.open(tag, attrs),
            MarkupEvent::Close { tag } => {
                self.close(tag);
                Ok(())
            }
            MarkupEvent::Data(_) => Ok(()),
        }
    }

    /// Links collected so far, in document order.
    pub fn finish(self) -> Vec<EpisodeLink> {
        self.links
    }

    fn open(&mut self, tag: &str, attrs: &[(String, String)]) -> Result<(), LinkError> {
        if markup::is_void_element(tag) {
            return Ok(());
        }

        let Some(scope) = self.scope.as_mut() else {
            if markup::has_attr(attrs, "id", &self.container_id) {
                debug!("Entering link scope <{} id=\"{}\">", tag, self.container_id);
                self.scope = Some(ContainerScope { tag: tag.to_string(), nesting: 1 });
            }
            return Ok(());
        };

        if scope.tag == tag {
            scope.nesting += 1;
        }

        if tag == "li" {
            if let Some(depth) = self.list_items.last_mut() {
                *depth += 1;
            }
            self.list_items.push(0);
            return Ok(());
        }

        if tag == "a" && self.list_items.last() == Some(&0) {
            self.anchors_seen += 1;
            let link = Self::link_from(attrs, self.anchors_seen)?;
            self.links.push(link);
        }

        if let Some(depth) = self.list_items.last_mut() {
            *depth += 1;
        }
        Ok(())
    }

    fn close(&mut self, tag: &str) {
        // void elements were never counted on open
        if markup::is_void_element(tag) {
            return;
        }

        let Some(scope) = self.scope.as_mut() else {
            return;
        };

        if scope.tag == tag {
            scope.nesting -= 1;
            if scope.nesting == 0 {
                debug!("Leaving link scope after {} link(s)", self.links.len());
                self.scope = None;
                self.list_items.clear();
                return;
            }
        }

        if tag == "li" {
            self.list_items.pop();
        }
        if let Some(depth) = self.list_items.last_mut() {
            *depth = depth.saturating_sub(1);
        }
    }

    fn link_from(attrs: &[(String, String)], position: usize) -> Result<EpisodeLink, LinkError> {
        let title = markup::attr(attrs, "title")
            .ok_or(LinkError::MissingAttribute { attribute: "title", position })?;
        let href = markup::attr(attrs, "href")
            .ok_or(LinkError::MissingAttribute { attribute: "href", position })?;
        Ok(EpisodeLink {
            title: title.to_string(),
            href: href.to_string(),
        })
    }
}

/// List episode links from a sequence of markup events.
pub fn list_links<'e, I>(events: I) -> Result<Vec<EpisodeLink>, LinkError>
where
    I: IntoIterator<Item = &'e MarkupEvent>,
{
    let mut lister = LinkLister::default();
    for event in events {
        lister.handle(event)?;
    }
    Ok(lister.finish())
}

/// List episode links from index page markup.
pub fn list_links_in(html: &str) -> Result<Vec<EpisodeLink>, LinkError> {
    list_links(&markup::tokenize(html))
}
