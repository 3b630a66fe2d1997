use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use crate::object::Object;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Environment {
    store: BTreeMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment { store: BTreeMap::new(), outer: None }
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Environment { store: BTreeMap::new(), outer: Some(outer) }
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        match self.store.get(key) {
            Some(obj) => Some(obj.clone()),
            None => match &self.outer {
                Some(env) => env.borrow().get(key),
                None      => None,
            },
        }
    }

    pub fn set(&mut self, key: String, value: Object) {
        self.store.insert(key, value);
    }

    // updates the binding in the frame it was defined in; false if the name
    // is bound nowhere along the chain
    pub fn assign(&mut self, key: &str, value: Object) -> bool {
        if self.store.contains_key(key) {
            self.store.insert(key.to_string(), value);
            return true;
        }
        match &self.outer {
            Some(env) => env.borrow_mut().assign(key, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::rc::Rc;
    use crate::environment::Environment;
    use crate::object::Object;

    #[test]
    fn test_get_after_set() {
        let mut env = Environment::new();
        env.set("a".to_string(), Object::Integer(5));
        assert_eq!(env.get("a"), Some(Object::Integer(5)));
        assert_eq!(env.get("b"), None);
    }

    #[test]
    fn test_get_walks_outward() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().set("a".to_string(), Object::Integer(1));

        let mut inner = Environment::new_enclosed(Rc::clone(&outer));
        assert_eq!(inner.get("a"), Some(Object::Integer(1)));

        // shadowing writes only the innermost frame
        inner.set("a".to_string(), Object::Integer(2));
        assert_eq!(inner.get("a"), Some(Object::Integer(2)));
        assert_eq!(outer.borrow().get("a"), Some(Object::Integer(1)));
    }

    #[test]
    fn test_assign_updates_defining_frame() {
        let outer = Rc::new(RefCell::new(Environment::new()));
        outer.borrow_mut().set("a".to_string(), Object::Integer(1));

        let mut inner = Environment::new_enclosed(Rc::clone(&outer));
        assert!(inner.assign("a", Object::Integer(9)));

        // the outer frame holds the updated value, the inner stays empty
        assert_eq!(outer.borrow().get("a"), Some(Object::Integer(9)));
        assert_eq!(inner.get("a"), Some(Object::Integer(9)));

        assert!(!inner.assign("missing", Object::Null));
    }
}
