#![forbid(unsafe_code)]

//! Scripted [`ContentSource`] with synchronous and deferred delivery.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use modalflow_widgets::{
    Content, ContentRequest, ContentSource, ContentTicket, Fetch, ModalError, RetrievalError,
};

/// Serves templates from an in-memory table.
///
/// In deferred mode every fetch is parked until [`complete_next`] or
/// [`complete_all`] is called, which lets tests interleave events with a
/// pending retrieval.
///
/// [`complete_next`]: ScriptedSource::complete_next
/// [`complete_all`]: ScriptedSource::complete_all
#[derive(Debug, Default)]
pub struct ScriptedSource {
    templates: RefCell<BTreeMap<String, String>>,
    failures: RefCell<BTreeMap<String, RetrievalError>>,
    deferred: Cell<bool>,
    pending: RefCell<VecDeque<(ContentRequest, ContentTicket)>>,
    requests: RefCell<Vec<ContentRequest>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.set_template(name, markup);
        self
    }

    #[must_use]
    pub fn deferred(self) -> Self {
        self.deferred.set(true);
        self
    }

    pub fn set_template(&self, name: impl Into<String>, markup: impl Into<String>) {
        self.templates
            .borrow_mut()
            .insert(name.into(), markup.into());
    }

    /// Make every fetch of `name` fail with `status`.
    pub fn fail(&self, name: impl Into<String>, status: u16, message: impl Into<String>) {
        let name = name.into();
        let err = RetrievalError::new(name.clone(), message).with_status(status);
        self.failures.borrow_mut().insert(name, err);
    }

    pub fn set_deferred(&self, deferred: bool) {
        self.deferred.set(deferred);
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Answer the oldest parked fetch.
    pub fn complete_next(&self) -> Option<Result<(), ModalError>> {
        let (request, ticket) = self.pending.borrow_mut().pop_front()?;
        let result = self.resolve(&request);
        Some(ticket.complete(result))
    }

    /// Answer every parked fetch, including ones parked while answering.
    pub fn complete_all(&self) -> Vec<Result<(), ModalError>> {
        let mut results = Vec::new();
        while let Some(result) = self.complete_next() {
            results.push(result);
        }
        results
    }

    fn resolve(&self, request: &ContentRequest) -> Result<Content, RetrievalError> {
        if let Some(err) = self.failures.borrow().get(&request.name) {
            return Err(err.clone());
        }
        self.templates
            .borrow()
            .get(&request.name)
            .map(|markup| Content::new(markup.as_str()))
            .ok_or_else(|| {
                RetrievalError::new(request.name.clone(), format!("no template at {}", request.uri))
                    .with_status(404)
            })
    }
}

impl ContentSource for ScriptedSource {
    fn fetch(&self, request: &ContentRequest, ticket: ContentTicket) -> Fetch {
        self.requests.borrow_mut().push(request.clone());
        if self.deferred.get() {
            tracing::trace!(template = %request.name, "fetch parked");
            self.pending.borrow_mut().push_back((request.clone(), ticket));
            return Fetch::Pending;
        }
        Fetch::Ready(self.resolve(request))
    }
}
