#![forbid(unsafe_code)]

//! Template retrieval, caching, and content initializers.
//!
//! Retrieval itself is external: a [`ContentSource`] receives a
//! [`ContentRequest`] and either answers immediately ([`Fetch::Ready`]) or
//! keeps the [`ContentTicket`] and completes it later ([`Fetch::Pending`]).
//!
//! # Invariants
//!
//! 1. Every successful retrieval is cached under the template name, whether
//!    or not the requesting modal still wants it.
//! 2. A result is applied only while its modal is `Loading` and not already
//!    initializing; anything else is dropped after caching.
//! 3. Failures never touch the cache and leave the modal in `Loading`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::{ModalError, RetrievalError};
use crate::modal::{Modal, WeakModal};
use crate::options::TemplateOptions;

/// Data record handed to content initializers.
pub type DataRecord = BTreeMap<String, String>;

/// Dialog markup as produced by the content source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    markup: String,
}

impl Content {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    #[inline]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn markup_mut(&mut self) -> &mut String {
        &mut self.markup
    }
}

impl From<&str> for Content {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// What to retrieve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub name: String,
    pub uri: String,
}

impl ContentRequest {
    /// Address `name` according to `template`.
    pub fn resolve(name: &str, template: &TemplateOptions) -> Self {
        let mut uri = match &template.url_override {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!("{}{}{}", template.dir, name, template.ext),
        };
        for (key, value) in &template.params {
            append_param(&mut uri, key, value);
        }
        Self {
            name: name.to_owned(),
            uri,
        }
    }
}

fn append_param(uri: &mut String, key: &str, value: &str) {
    if !uri.contains('?') {
        uri.push('?');
    } else if !(uri.ends_with('?') || uri.ends_with('&')) {
        uri.push('&');
    }
    uri.push_str(key);
    uri.push('=');
    uri.push_str(value);
}

/// A source's answer to a fetch.
#[derive(Debug)]
pub enum Fetch {
    Ready(Result<Content, RetrievalError>),
    /// The source kept the ticket and will complete it later.
    Pending,
}

/// Retrieves template markup.
pub trait ContentSource {
    fn fetch(&self, request: &ContentRequest, ticket: ContentTicket) -> Fetch;
}

/// Shared template cache keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct ContentCache {
    entries: Rc<RefCell<AHashMap<String, Content>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Content> {
        self.entries.borrow().get(name).cloned()
    }

    pub fn insert(&self, name: impl Into<String>, content: Content) {
        self.entries.borrow_mut().insert(name.into(), content);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Completion handle for a pending fetch.
pub struct ContentTicket {
    modal: WeakModal,
    cache: ContentCache,
    name: String,
}

impl fmt::Debug for ContentTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTicket")
            .field("name", &self.name)
            .field("modal_alive", &self.modal.upgrade().is_some())
            .finish()
    }
}

impl ContentTicket {
    pub(crate) fn new(modal: &Modal, cache: ContentCache, name: impl Into<String>) -> Self {
        Self {
            modal: modal.downgrade(),
            cache,
            name: name.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver the retrieval result.
    ///
    /// Errors are returned as [`ModalError::Retrieval`] so the caller that
    /// drives the source observes them.
    pub fn complete(self, result: Result<Content, RetrievalError>) -> Result<(), ModalError> {
        settle(&self.cache, &self.name, self.modal.upgrade(), result)
    }
}

pub(crate) fn settle(
    cache: &ContentCache,
    name: &str,
    modal: Option<Modal>,
    result: Result<Content, RetrievalError>,
) -> Result<(), ModalError> {
    match result {
        Ok(content) => {
            cache.insert(name, content.clone());
            match modal {
                Some(modal) => modal.accept_content(content),
                None => {
                    tracing::trace!(template = name, "content cached for dropped modal");
                    Ok(())
                }
            }
        }
        Err(err) => {
            tracing::warn!(
                template = name,
                status = ?err.status,
                message = %err.message,
                "template retrieval failed"
            );
            Err(ModalError::Retrieval(err))
        }
    }
}

/// Populates a modal's content copy before it is mounted.
///
/// Runs once per display, skipped when the modal's `initializers` map turns
/// its [`key`](ContentInitializer::key) off.
pub trait ContentInitializer {
    fn key(&self) -> &str;

    fn initialize(&self, modal: &Modal, content: &mut Content, data: &DataRecord);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_from_dir_name_ext() {
        let tpl = TemplateOptions {
            dir: "/tpl/".into(),
            ..TemplateOptions::default()
        };
        assert_eq!(ContentRequest::resolve("confirm", &tpl).uri, "/tpl/confirm.html");
    }

    #[test]
    fn params_pick_separator() {
        let mut tpl = TemplateOptions::default();
        tpl.params.insert("a".into(), "1".into());
        tpl.params.insert("b".into(), "2".into());
        assert_eq!(ContentRequest::resolve("x", &tpl).uri, "x.html?a=1&b=2");

        tpl.url_override = Some("/api/dialog?id=7".into());
        assert_eq!(ContentRequest::resolve("x", &tpl).uri, "/api/dialog?id=7&a=1&b=2");

        tpl.url_override = Some("/api/dialog?".into());
        assert_eq!(ContentRequest::resolve("x", &tpl).uri, "/api/dialog?a=1&b=2");
    }

    #[test]
    fn empty_override_falls_back() {
        let tpl = TemplateOptions {
            url_override: Some(String::new()),
            ..TemplateOptions::default()
        };
        assert_eq!(ContentRequest::resolve("x", &tpl).uri, "x.html");
    }

    #[test]
    fn cache_is_shared_between_clones() {
        let cache = ContentCache::new();
        let other = cache.clone();
        cache.insert("a", Content::from("<p/>"));
        assert_eq!(other.get("a").map(|c| c.markup().to_owned()), Some("<p/>".into()));
        other.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = ContentCache::new();
        let err = settle(&cache, "x", None, Err(RetrievalError::new("x", "nope")));
        assert!(matches!(err, Err(ModalError::Retrieval(_))));
        assert!(!cache.contains("x"));

        settle(&cache, "x", None, Ok(Content::from("late"))).unwrap();
        assert!(cache.contains("x"));
    }
}
