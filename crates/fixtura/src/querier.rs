//! Query façade over element wrappers.
//!
//! Every query is scoped to the strict descendants of the element it is
//! called on. Results are wrapped with the most specific wrapper for the
//! matched element.

use crate::element::{
    CustomElement, ElementKind, TestButton, TestElement, TestInput, TestSelect, TestTextArea,
};
use crate::host::{NodeId, SelectorList};
use crate::result::{FixturaError, FixturaResult};
use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// How to find elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    /// CSS selector
    Css(String),
    /// Elements carrying a directive or component instance
    Directive {
        /// `TypeId` of the stored `RefCell<D>`
        type_id: TypeId,
        /// Type name, for messages
        name: &'static str,
    },
}

impl By {
    /// CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Elements carrying an instance of `D`
    #[must_use]
    pub fn directive<D: 'static>() -> Self {
        Self::Directive {
            type_id: TypeId::of::<RefCell<D>>(),
            name: type_name::<D>(),
        }
    }
}

impl From<&str> for By {
    fn from(selector: &str) -> Self {
        Self::Css(selector.to_string())
    }
}

impl From<String> for By {
    fn from(selector: String) -> Self {
        Self::Css(selector)
    }
}

impl From<&String> for By {
    fn from(selector: &String) -> Self {
        Self::Css(selector.clone())
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(selector) => f.write_str(selector),
            Self::Directive { name, .. } => write!(f, "directive {name}"),
        }
    }
}

impl TestElement {
    fn matching(&self, by: &By) -> FixturaResult<Vec<NodeId>> {
        let fixture = self.fixture();
        let nodes = match by {
            By::Css(selector) => {
                let selector = SelectorList::parse(selector)?;
                selector.query_all(&fixture.dom(), self.node_id())
            }
            By::Directive { type_id, .. } => fixture
                .dom()
                .descendants(self.node_id())
                .into_iter()
                .filter(|node| fixture.has_instance(*node, *type_id))
                .collect(),
        };
        tracing::trace!(scope = %self.node_id(), by = %by, matches = nodes.len(), "query");
        Ok(nodes)
    }

    fn first(&self, by: &By) -> FixturaResult<Option<Self>> {
        Ok(self
            .matching(by)?
            .first()
            .map(|node| Self::wrap(self.fixture(), *node)))
    }

    fn first_of_kind(&self, by: impl Into<By>, kind: ElementKind) -> FixturaResult<Option<Self>> {
        let by = by.into();
        match self.first(&by)? {
            Some(element) if element.kind() != kind => Err(FixturaError::TypeMismatch {
                selector: by.to_string(),
                expected: kind.interface(),
            }),
            found => Ok(found),
        }
    }

    /// First matching element
    pub fn element(&self, by: impl Into<By>) -> FixturaResult<Option<Self>> {
        self.first(&by.into())
    }

    /// Every matching element, in document order
    pub fn elements(&self, by: impl Into<By>) -> FixturaResult<Vec<Self>> {
        Ok(self
            .matching(&by.into())?
            .into_iter()
            .map(|node| Self::wrap(self.fixture(), node))
            .collect())
    }

    /// First matching element, which must be an `input`
    ///
    /// # Errors
    ///
    /// [`FixturaError::TypeMismatch`] when the first match is something else.
    pub fn input(&self, by: impl Into<By>) -> FixturaResult<Option<TestInput>> {
        Ok(self
            .first_of_kind(by, ElementKind::Input)?
            .and_then(|e| e.as_input()))
    }

    /// First matching element, which must be a `select`
    pub fn select(&self, by: impl Into<By>) -> FixturaResult<Option<TestSelect>> {
        Ok(self
            .first_of_kind(by, ElementKind::Select)?
            .and_then(|e| e.as_select()))
    }

    /// First matching element, which must be a `textarea`
    pub fn textarea(&self, by: impl Into<By>) -> FixturaResult<Option<TestTextArea>> {
        Ok(self
            .first_of_kind(by, ElementKind::TextArea)?
            .and_then(|e| e.as_textarea()))
    }

    /// First matching element, which must be a `button`
    pub fn button(&self, by: impl Into<By>) -> FixturaResult<Option<TestButton>> {
        Ok(self
            .first_of_kind(by, ElementKind::Button)?
            .and_then(|e| e.as_button()))
    }

    /// Instance of `D` on the first element carrying one
    pub fn directive<D: 'static>(&self) -> FixturaResult<Option<Rc<RefCell<D>>>> {
        let fixture = self.fixture();
        Ok(self
            .matching(&By::directive::<D>())?
            .first()
            .and_then(|node| fixture.instance::<RefCell<D>>(*node)))
    }

    /// Instances of `D` on every element carrying one
    pub fn directives<D: 'static>(&self) -> FixturaResult<Vec<Rc<RefCell<D>>>> {
        let fixture = self.fixture();
        Ok(self
            .matching(&By::directive::<D>())?
            .into_iter()
            .filter_map(|node| fixture.instance::<RefCell<D>>(node))
            .collect())
    }

    /// Token `T` as seen from the first matching element
    ///
    /// `None` when nothing matches or the token is not provided.
    pub fn token<T: 'static>(&self, by: impl Into<By>) -> FixturaResult<Option<Rc<T>>> {
        let fixture = self.fixture();
        Ok(self
            .matching(&by.into())?
            .first()
            .and_then(|node| fixture.lookup_token::<T>(*node)))
    }

    /// Token `T` as seen from every matching element
    pub fn tokens<T: 'static>(&self, by: impl Into<By>) -> FixturaResult<Vec<Option<Rc<T>>>> {
        let fixture = self.fixture();
        Ok(self
            .matching(&by.into())?
            .into_iter()
            .map(|node| fixture.lookup_token::<T>(node))
            .collect())
    }

    /// First matching element, wrapped in `W`
    pub fn custom<W: CustomElement>(&self, by: impl Into<By>) -> FixturaResult<Option<W>> {
        Ok(self.element(by)?.map(W::from_element))
    }

    /// Every matching element, wrapped in `W`
    pub fn customs<W: CustomElement>(&self, by: impl Into<By>) -> FixturaResult<Vec<W>> {
        Ok(self
            .elements(by)?
            .into_iter()
            .map(W::from_element)
            .collect())
    }
}
