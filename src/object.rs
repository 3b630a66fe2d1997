use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use std::rc::Rc;
use crate::ast::{Expression, Statement};
use crate::builtin::BuiltinFunction;
use crate::code::Instructions;
use crate::environment::Environment;

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: HashKey,
    pub value: Object,
}

// only integers, booleans and strings can key a hash; equal content gives
// an equal key and the variant tag keeps 1, "1" and true apart
#[derive(Clone, Debug, Ord, PartialOrd, Eq, PartialEq)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(i) => write!(f, "{}", i),
            HashKey::Boolean(b) => write!(f, "{}", b),
            HashKey::String(s) => write!(f, "{}", s),
        }
    }
}

impl HashKey {
    pub fn from_object(obj: &Object) -> Option<Self> {
        match obj {
            Object::Integer(i) => Some(HashKey::Integer(*i)),
            Object::Boolean(b) => Some(HashKey::Boolean(*b)),
            Object::String(st) => Some(HashKey::String(st.to_string())),
            _ => None,
        }
    }
}

pub type HashPairs = BTreeMap<HashKey, KeyValue>;

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    ReturnValue(Box<Object>),
    Error(String),
    Function{
        parameters: Vec<Expression>,
        body: Statement,
        env: Rc<RefCell<Environment>>,
    },
    Builtin(BuiltinFunction),
    // arrays and hashes are reference values: an alias sees every mutation
    Array(Rc<RefCell<Vec<Object>>>),
    Hash(Rc<RefCell<HashPairs>>),
    CompiledFunction(Instructions),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Float(_) => "FLOAT",
            Object::String(_) => "STRING",
            Object::Boolean(_) => "BOOLEAN",
            Object::Null => "NULL",
            Object::ReturnValue(_) => "RETURN_VALUE",
            Object::Error(_) => "ERROR",
            Object::Function {..} => "FUNCTION",
            Object::Builtin(_) => "BUILTIN",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::CompiledFunction(_) => "COMPILED_FUNCTION",
        }
    }

    pub fn new_array(elements: Vec<Object>) -> Self {
        Object::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn new_hash(pairs: HashPairs) -> Self {
        Object::Hash(Rc::new(RefCell::new(pairs)))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Object::Integer(i) => format!("{}", i),
            Object::Float(fl) => if fl.fract() == 0.0 {
                format!("{:.1}", fl)
            } else {
                format!("{}", fl)
            },
            Object::String(s) => s.to_string(),
            Object::Boolean(b) => format!("{}", b),
            Object::Null => "null".to_string(),
            Object::ReturnValue(obj) => format!("return {}", obj),
            Object::Error(msg) => format!("error: {}", msg),
            Object::Function { parameters, body, .. } => format!("fn ({}) {{ {} }}",
                                                                 parameters.iter().map(|p| format!("{}", p)).collect::<Vec<_>>().join(", "), body),
            Object::Builtin(bf) => format!("builtin function {}", bf),
            Object::Array(arr) => format!("[{}]",
                    arr.borrow().iter().map(|p| format!("{}", p)).collect::<Vec<_>>().join(", ")),
            Object::Hash(hash) => format!("{{{}}}",
                    hash.borrow().iter().map(|(_, kv)| format!("{}: {}", kv.key, kv.value)).collect::<Vec<_>>().join(", ")),
            Object::CompiledFunction(_) => "compiled function".to_string(),
        };
        write!(f, "{}", msg)
    }
}

#[cfg(test)]
mod test {
    use crate::object::{HashKey, Object};

    #[test]
    fn test_hash_key_content_equality() {
        let hello1 = HashKey::from_object(&Object::String("hello world".to_string())).unwrap();
        let hello2 = HashKey::from_object(&Object::String("hello world".to_string())).unwrap();
        let diff = HashKey::from_object(&Object::String("my name is tuna".to_string())).unwrap();

        assert_eq!(hello1, hello2);
        assert_ne!(hello1, diff);

        let one1 = HashKey::from_object(&Object::Integer(1)).unwrap();
        let one2 = HashKey::from_object(&Object::Integer(1)).unwrap();
        let two = HashKey::from_object(&Object::Integer(2)).unwrap();

        assert_eq!(one1, one2);
        assert_ne!(one1, two);

        let t1 = HashKey::from_object(&Object::Boolean(true)).unwrap();
        let t2 = HashKey::from_object(&Object::Boolean(true)).unwrap();
        let f1 = HashKey::from_object(&Object::Boolean(false)).unwrap();

        assert_eq!(t1, t2);
        assert_ne!(t1, f1);
    }

    #[test]
    fn test_hash_key_types_never_collide() {
        // same textual content, different type tags
        let int_one = HashKey::from_object(&Object::Integer(1)).unwrap();
        let str_one = HashKey::from_object(&Object::String("1".to_string())).unwrap();
        assert_ne!(int_one, str_one);

        let bool_true = HashKey::from_object(&Object::Boolean(true)).unwrap();
        let str_true = HashKey::from_object(&Object::String("true".to_string())).unwrap();
        assert_ne!(bool_true, str_true);

        let int_zero = HashKey::from_object(&Object::Integer(0)).unwrap();
        let bool_false = HashKey::from_object(&Object::Boolean(false)).unwrap();
        assert_ne!(int_zero, bool_false);
    }

    #[test]
    fn test_unhashable_objects() {
        assert_eq!(HashKey::from_object(&Object::Null), None);
        assert_eq!(HashKey::from_object(&Object::Float(1.5)), None);
        assert_eq!(HashKey::from_object(&Object::new_array(vec![])), None);
    }

    #[test]
    fn test_inspect() {
        assert_eq!(format!("{}", Object::Integer(5)), "5");
        assert_eq!(format!("{}", Object::Float(3.0)), "3.0");
        assert_eq!(format!("{}", Object::Float(0.5)), "0.5");
        assert_eq!(format!("{}", Object::Boolean(true)), "true");
        assert_eq!(format!("{}", Object::Null), "null");
        assert_eq!(
            format!("{}", Object::new_array(vec![Object::Integer(1), Object::Integer(2)])),
            "[1, 2]"
        );
    }
}
