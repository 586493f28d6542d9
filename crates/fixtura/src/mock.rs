//! Mock factory.
//!
//! A mock is a [`Mock`] value with one [`Spy`] per method of a trait and of
//! the traits it extends. The `#[mockable]` attribute implements the trait
//! for [`Mock`], forwarding every call to the spy of the same name:
//!
//! ```rust,ignore
//! #[mockable]
//! trait Clock {
//!     fn now(&self) -> u64;
//! }
//!
//! let mock = create_mock::<dyn Clock>();
//! mock.spy("now").and_return(42_u64);
//! assert_eq!(mock.now(), 42);
//! assert_eq!(mock.spy("now").call_count(), 1);
//! ```

use crate::result::{FixturaError, FixturaResult};
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A trait whose methods can be mocked
pub trait Mockable {
    /// Trait name
    const NAME: &'static str;

    /// Methods of the trait, then of its parents; first occurrence wins
    fn method_names() -> Vec<&'static str>;
}

/// Merge method name lists, keeping the first occurrence of each name
#[must_use]
pub fn merge_method_names(lists: &[Vec<&'static str>]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for &name in lists.iter().flatten() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

type Produce = Rc<dyn Fn(&[String]) -> Box<dyn Any>>;

#[derive(Clone)]
enum Behavior {
    Unset,
    Produce(Produce),
}

struct SpyState {
    name: &'static str,
    calls: Vec<Vec<String>>,
    behavior: Behavior,
}

/// Call-recording stub for one method
///
/// Arguments are recorded in their `Debug` form.
#[derive(Clone)]
pub struct Spy {
    state: Rc<RefCell<SpyState>>,
}

impl fmt::Debug for Spy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Spy")
            .field("name", &state.name)
            .field("calls", &state.calls.len())
            .field("configured", &matches!(state.behavior, Behavior::Produce(_)))
            .finish()
    }
}

impl Spy {
    fn new(name: &'static str) -> Self {
        Self {
            state: Rc::new(RefCell::new(SpyState {
                name,
                calls: Vec::new(),
                behavior: Behavior::Unset,
            })),
        }
    }

    /// Method name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.state.borrow().name
    }

    /// Return a clone of `value` from every call
    pub fn and_return<R: Clone + 'static>(&self, value: R) -> &Self {
        self.state.borrow_mut().behavior =
            Behavior::Produce(Rc::new(move |_| Box::new(value.clone())));
        self
    }

    /// Compute every return value with `fake`
    pub fn and_call_fake<R: 'static>(&self, fake: impl Fn(&[String]) -> R + 'static) -> &Self {
        self.state.borrow_mut().behavior =
            Behavior::Produce(Rc::new(move |args| Box::new(fake(args))));
        self
    }

    /// Arguments of every call, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.borrow().calls.clone()
    }

    /// Number of calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Whether the spy was called at least once
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Whether one of the calls had exactly these arguments
    #[must_use]
    pub fn was_called_with(&self, args: &[&str]) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.iter().map(String::as_str).eq(args.iter().copied()))
    }

    /// Arguments of the last call
    #[must_use]
    pub fn most_recent_call(&self) -> Option<Vec<String>> {
        self.state.borrow().calls.last().cloned()
    }

    /// Forget recorded calls; the configured behavior is kept
    pub fn reset(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Record a call and produce its return value.
    ///
    /// # Panics
    ///
    /// When no behavior is configured and `R` is not `()`, or when the
    /// configured behavior produces another type than `R`.
    pub fn invoke<R: 'static>(&self, args: Vec<String>) -> R {
        let (name, behavior) = {
            let mut state = self.state.borrow_mut();
            tracing::trace!(spy = state.name, args = ?args, "spy called");
            state.calls.push(args.clone());
            (state.name, state.behavior.clone())
        };
        let produced: Box<dyn Any> = match behavior {
            Behavior::Produce(produce) => produce(&args),
            Behavior::Unset if TypeId::of::<R>() == TypeId::of::<()>() => Box::new(()),
            Behavior::Unset => panic!(
                "Spy '{name}' returns {} but has no configured return value; use and_return() or and_call_fake()",
                type_name::<R>()
            ),
        };
        match produced.downcast::<R>() {
            Ok(value) => *value,
            Err(_) => panic!(
                "Spy '{name}' was configured with a value that is not a {}",
                type_name::<R>()
            ),
        }
    }
}

/// A stand-in for any [`Mockable`] trait, with one spy per method
pub struct Mock {
    name: &'static str,
    spies: Vec<Spy>,
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("name", &self.name)
            .field("spies", &self.spies)
            .finish()
    }
}

impl Mock {
    fn new(name: &'static str, method_names: &[&'static str]) -> Self {
        Self {
            name,
            spies: method_names.iter().copied().map(Spy::new).collect(),
        }
    }

    /// Name of the mocked trait
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Mocked method names
    #[must_use]
    pub fn method_names(&self) -> Vec<&'static str> {
        self.spies.iter().map(Spy::name).collect()
    }

    /// Spy of `method`
    ///
    /// # Errors
    ///
    /// [`FixturaError::UnknownSpy`] when the trait has no such method.
    pub fn get_spy(&self, method: &str) -> FixturaResult<&Spy> {
        self.spies
            .iter()
            .find(|spy| spy.name() == method)
            .ok_or_else(|| FixturaError::UnknownSpy {
                mock: self.name,
                name: method.to_string(),
                known: self.method_names(),
            })
    }

    /// Spy of `method`
    ///
    /// # Panics
    ///
    /// When the trait has no such method.
    #[must_use]
    pub fn spy(&self, method: &str) -> &Spy {
        match self.get_spy(method) {
            Ok(spy) => spy,
            Err(e) => panic!("{e}"),
        }
    }
}

/// Create a mock of `T`, typically `dyn SomeTrait`
#[must_use]
pub fn create_mock<T: ?Sized + Mockable>() -> Mock {
    let names = T::method_names();
    tracing::debug!(mock = T::NAME, methods = names.len(), "mock created");
    Mock::new(T::NAME, &names)
}
