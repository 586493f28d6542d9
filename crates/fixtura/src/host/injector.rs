//! Type-keyed injectors.
//!
//! The root injector holds values provided on the test bed; every element
//! that carries directives gets its own injector holding the directive
//! instances. Lookups walk from an element's injector up through its
//! ancestors to the root.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

struct Entry {
    name: &'static str,
    value: Rc<dyn Any>,
}

/// A set of values keyed by their type
#[derive(Default, Clone)]
pub struct Injector {
    entries: HashMap<TypeId, Rc<Entry>>,
    order: Vec<TypeId>,
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| e.name)
            .collect();
        f.debug_struct("Injector").field("tokens", &names).finish()
    }
}

impl Injector {
    /// Create an empty injector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide `value` under its own type, replacing a previous value
    pub fn provide<T: 'static>(&mut self, value: T) {
        self.provide_rc(Rc::new(value));
    }

    /// Provide a shared value
    pub fn provide_rc<T: 'static>(&mut self, value: Rc<T>) {
        let type_id = TypeId::of::<T>();
        if !self.entries.contains_key(&type_id) {
            self.order.push(type_id);
        }
        let _ = self.entries.insert(
            type_id,
            Rc::new(Entry {
                name: type_name::<T>(),
                value,
            }),
        );
    }

    pub(crate) fn provide_erased(&mut self, type_id: TypeId, name: &'static str, value: Rc<dyn Any>) {
        if !self.entries.contains_key(&type_id) {
            self.order.push(type_id);
        }
        let _ = self.entries.insert(type_id, Rc::new(Entry { name, value }));
    }

    /// Value provided under `T`
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| Rc::clone(&entry.value).downcast::<T>().ok())
    }

    /// Whether a value is provided under `type_id`
    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.entries.contains_key(&type_id)
    }

    /// Type names of the provided values, in provision order
    #[must_use]
    pub fn token_names(&self) -> Vec<&'static str> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| e.name)
            .collect()
    }

    /// Number of provided values
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is provided
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, PartialEq)]
    struct ApiUrl(&'static str);

    mod injector_tests {
        use super::*;

        #[test]
        fn test_provide_and_get() {
            let mut injector = Injector::new();
            injector.provide(ApiUrl("/api"));
            assert_eq!(*injector.get::<ApiUrl>().unwrap(), ApiUrl("/api"));
            assert!(injector.get::<String>().is_none());
        }

        #[test]
        fn test_replace_keeps_order() {
            let mut injector = Injector::new();
            injector.provide(ApiUrl("/a"));
            injector.provide(7_u32);
            injector.provide(ApiUrl("/b"));
            assert_eq!(injector.len(), 2);
            assert_eq!(injector.get::<ApiUrl>().unwrap().0, "/b");
            assert!(injector.token_names()[0].ends_with("ApiUrl"));
        }

        #[test]
        fn test_shared_values_are_the_same_instance() {
            let shared = Rc::new(RefCell::new(0));
            let mut injector = Injector::new();
            injector.provide_rc(Rc::clone(&shared));
            *injector.get::<RefCell<i32>>().unwrap().borrow_mut() = 5;
            assert_eq!(*shared.borrow(), 5);
        }

        #[test]
        fn test_debug_lists_token_names() {
            let mut injector = Injector::new();
            injector.provide(ApiUrl("/api"));
            assert!(format!("{injector:?}").contains("ApiUrl"));
        }
    }
}
