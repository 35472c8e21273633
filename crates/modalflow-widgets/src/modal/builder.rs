#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

use super::instance::Modal;
use crate::content::DataRecord;
use crate::context::ModalContext;
use crate::error::ModalError;
use crate::options::ModalOverrides;

/// Per-kind customization of a modal.
///
/// Every method has a default, so a unit struct is a valid behavior.
pub trait ModalBehavior {
    /// Template used when the builder is not given a name.
    fn template_name(&self) -> Option<&str> {
        None
    }

    /// Options layered between the context defaults and instance overrides.
    fn class_overrides(&self) -> ModalOverrides {
        ModalOverrides::default()
    }

    /// Set up the view after content arrives and `beforeDisplay` passes.
    ///
    /// Return `false` to hold the display until [`Modal::finish_display`].
    fn init_view(&self, modal: &Modal) -> bool {
        let _ = modal;
        true
    }
}

/// A behavior with no customization.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainModal;

impl ModalBehavior for PlainModal {}

/// Assembles a [`Modal`].
///
/// Options resolve as context defaults, then the behavior's class
/// overrides, then the builder's overrides.
pub struct ModalBuilder {
    ctx: ModalContext,
    name: Option<String>,
    behavior: Rc<dyn ModalBehavior>,
    data: DataRecord,
    overrides: ModalOverrides,
    parent: Option<Modal>,
}

impl fmt::Debug for ModalBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalBuilder")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("parent", &self.parent.as_ref().map(Modal::id))
            .finish_non_exhaustive()
    }
}

impl ModalBuilder {
    pub fn new(ctx: &ModalContext) -> Self {
        Self {
            ctx: ctx.clone(),
            name: None,
            behavior: Rc::new(PlainModal),
            data: DataRecord::new(),
            overrides: ModalOverrides::default(),
            parent: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn behavior(mut self, behavior: impl ModalBehavior + 'static) -> Self {
        self.behavior = Rc::new(behavior);
        self
    }

    #[must_use]
    pub fn shared_behavior(mut self, behavior: Rc<dyn ModalBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn data(mut self, data: DataRecord) -> Self {
        self.data = data;
        self
    }

    #[must_use]
    pub fn datum(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn overrides(mut self, overrides: ModalOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Open from `parent`: the new modal joins the parent's flow and, by
    /// default, hides the parent while it is displayed.
    #[must_use]
    pub fn parent(mut self, parent: &Modal) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Create the modal without displaying it.
    pub fn build(self) -> Result<Modal, ModalError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => self
                .behavior
                .template_name()
                .filter(|n| !n.is_empty())
                .map(str::to_owned)
                .ok_or(ModalError::MissingTemplate)?,
        };

        let options = self
            .ctx
            .defaults()
            .merged(&self.behavior.class_overrides())
            .merged(&self.overrides);

        let modal = Modal::create(
            self.ctx,
            name,
            self.behavior,
            self.data,
            options,
            self.parent.as_ref().map(Modal::downgrade),
        );

        if let Some(flow) = self.parent.as_ref().and_then(Modal::flow) {
            modal.join_flow(&flow);
        }
        Ok(modal)
    }

    /// Create the modal and display it unless `display_on_instantiation`
    /// is off.
    pub fn open(self) -> Result<Modal, ModalError> {
        let modal = self.build()?;
        if modal.options().display_on_instantiation {
            modal.display()?;
        }
        Ok(modal)
    }
}
