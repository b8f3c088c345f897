//! # Item Model
//!
//! A node of the collection tree: a folder grouping other items, or a leaf
//! carrying one request. Tags flow top-down: children of a folder are tagged
//! with the folder's name.

use crate::config::ConversionOptions;
use crate::postman::auth::Auth;
use crate::postman::request::Request;
use crate::postman::url::Url;
use crate::postman::wire::{description_text, RawItem, RawRequest};
use crate::strings::string_formatting;
use serde_json::{Map, Value};
use tracing::debug;

/// A folder node.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    /// Display name; also the tag of its children.
    pub name: String,
    /// Postman item id.
    pub id: Option<String>,
    /// Cleaned description.
    pub description: String,
    /// Documentation anchor.
    pub docs_url: Option<String>,
    /// Folder-level auth.
    pub auth: Option<Auth>,
    /// Child nodes in document order.
    pub children: Vec<Item>,
}

/// A request node.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Display name; also the operation summary.
    pub name: String,
    /// Postman item id.
    pub id: Option<String>,
    /// Item-level auth (outside the request).
    pub auth: Option<Auth>,
    /// The request.
    pub request: Request,
    /// Nested nodes. Untagged, since requests do not propagate a tag.
    pub children: Vec<Item>,
}

/// One node of the collection tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Groups other items.
    Folder(Folder),
    /// Carries a request.
    Leaf(Box<Leaf>),
}

impl Item {
    /// Builds an item and its subtree.
    ///
    /// Returns `None` when the request URL is nothing but one unresolved
    /// `{variable}`; the whole subtree is discarded in that case.
    pub fn from_raw(raw: &RawItem, inherited_tag: &str, options: &ConversionOptions) -> Option<Self> {
        let name = raw.name.clone().unwrap_or_default();

        if let Some(request_url) = raw.request.as_ref().and_then(raw_request_url) {
            if Url::is_template_only(request_url) {
                debug!(item = %name, url = request_url, "Dropping item with template-only URL");
                return None;
            }
        }

        let id = raw.id.clone().filter(|id| !id.is_empty());
        let docs_url = id.as_deref().and_then(|id| options.docs_anchor(id));
        let auth = raw.auth.as_ref().and_then(Auth::parse);

        match &raw.request {
            None => {
                debug!(folder = %name, children = raw.item.len(), "Walking folder");
                let children = build_children(&raw.item, &name, options);
                Some(Self::Folder(Folder {
                    description: string_formatting(description_text(&raw.description)),
                    name,
                    id,
                    docs_url,
                    auth,
                    children,
                }))
            }
            Some(request) => {
                let request = Request::from_raw(request, &name, &raw.response)
                    .with_tag(inherited_tag)
                    .with_external_docs(docs_url)
                    .with_fallback_auth(auth.clone());
                let children = build_children(&raw.item, "", options);
                Some(Self::Leaf(Box::new(Leaf {
                    name,
                    id,
                    auth,
                    request,
                    children,
                })))
            }
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => &folder.name,
            Self::Leaf(leaf) => &leaf.name,
        }
    }

    /// True for folders.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Child nodes.
    pub fn children(&self) -> &[Item] {
        match self {
            Self::Folder(folder) => &folder.children,
            Self::Leaf(leaf) => &leaf.children,
        }
    }

    /// Item-level auth.
    pub fn auth(&self) -> Option<&Auth> {
        match self {
            Self::Folder(folder) => folder.auth.as_ref(),
            Self::Leaf(leaf) => leaf.auth.as_ref(),
        }
    }

    /// The request of a leaf.
    pub fn request(&self) -> Option<&Request> {
        match self {
            Self::Folder(_) => None,
            Self::Leaf(leaf) => Some(&leaf.request),
        }
    }

    /// OpenAPI path of a leaf.
    pub fn path(&self) -> Option<String> {
        self.request().map(Request::path)
    }

    /// Server base URL of a leaf; empty for folders.
    pub fn host(&self) -> String {
        self.request().map(Request::host).unwrap_or_default()
    }

    /// `(path, {method: operation})` for a leaf; folders yield nothing.
    ///
    /// Folders do not aggregate their children here, the collection flattens
    /// the tree itself.
    pub fn to_openapi(&self) -> Option<(String, Map<String, Value>)> {
        let request = self.request()?;
        Some((request.path(), request.to_openapi()))
    }

    /// Visits this item and every descendant, depth first, in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Item)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

/// Builds child items, dropping those rejected by [`Item::from_raw`].
pub(crate) fn build_children(raw: &[RawItem], tag: &str, options: &ConversionOptions) -> Vec<Item> {
    raw.iter()
        .filter_map(|child| Item::from_raw(child, tag, options))
        .collect()
}

fn raw_request_url(request: &RawRequest) -> Option<&str> {
    match request {
        RawRequest::Url(url) => Some(url),
        RawRequest::Full(obj) => obj.url.as_ref().and_then(|u| u.raw()),
    }
}
