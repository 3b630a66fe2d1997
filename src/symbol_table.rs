use std::collections::BTreeMap;

pub type SymbolScope = &'static str;

pub const GLOBAL_SCOPE: SymbolScope = "GLOBAL";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    store: BTreeMap<String, Symbol>,
    num_definitions: usize,
    outer: Option<Box<SymbolTable>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable { store: BTreeMap::new(), num_definitions: 0, outer: None }
    }

    pub fn new_enclosed(outer: SymbolTable) -> Self {
        SymbolTable { store: BTreeMap::new(), num_definitions: 0, outer: Some(Box::new(outer)) }
    }

    // a re-definition in the same scope keeps its slot
    pub fn define(&mut self, name: &str) -> Symbol {
        if let Some(existing) = self.store.get(name) {
            return existing.clone();
        }

        let symbol = Symbol {
            name: name.to_string(),
            scope: GLOBAL_SCOPE,
            index: self.num_definitions,
        };
        self.num_definitions += 1;
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        match self.store.get(name) {
            Some(symbol) => Some(symbol.clone()),
            None => match &self.outer {
                Some(outer) => outer.resolve(name),
                None => None,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::symbol_table::{Symbol, SymbolTable, GLOBAL_SCOPE};

    #[test]
    fn test_define() {
        let mut global = SymbolTable::new();

        let a = global.define("a");
        assert_eq!(a, Symbol{ name: "a".to_string(), scope: GLOBAL_SCOPE, index: 0 });

        let b = global.define("b");
        assert_eq!(b, Symbol{ name: "b".to_string(), scope: GLOBAL_SCOPE, index: 1 });
    }

    #[test]
    fn test_resolve() {
        let mut global = SymbolTable::new();
        global.define("a");
        global.define("b");

        struct Test<'a> {
            name: &'a str,
            expected: Option<Symbol>,
        }
        let tests = vec![
            Test{ name: "a", expected: Some(Symbol{ name: "a".to_string(), scope: GLOBAL_SCOPE, index: 0 }) },
            Test{ name: "b", expected: Some(Symbol{ name: "b".to_string(), scope: GLOBAL_SCOPE, index: 1 }) },
            Test{ name: "c", expected: None },
        ];

        for tt in tests {
            assert_eq!(global.resolve(tt.name), tt.expected);
        }
    }

    #[test]
    fn test_redefine_keeps_slot() {
        let mut global = SymbolTable::new();

        let first = global.define("a");
        global.define("b");
        let again = global.define("a");

        assert_eq!(first.index, again.index);
        assert_eq!(global.define("c").index, 2);
    }

    #[test]
    fn test_resolve_searches_outward() {
        let mut global = SymbolTable::new();
        global.define("a");

        let mut local = SymbolTable::new_enclosed(global);
        let resolved = local.resolve("a").expect("a not resolved through outer table");
        assert_eq!(resolved.name, "a");
        assert_eq!(resolved.index, 0);

        local.define("b");
        assert!(local.resolve("b").is_some());
        assert!(local.resolve("c").is_none());
    }
}
