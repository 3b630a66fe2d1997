use std::fmt;
use std::fmt::Formatter;
use crate::evaluator::new_error;
use crate::object::Object;

pub type BuiltinFn = fn(args: Vec<Object>) -> Object;

#[derive(Clone, Debug, PartialEq)]
pub struct BuiltinFunction {
    name: String,
    func: BuiltinFn
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn wrong_arg_count(got: usize, want: usize) -> Object {
    new_error(format!("wrong number of arguments. got={}, want={}", got, want))
}

impl BuiltinFunction {
    pub fn look_up(name: &str) -> Option<Self> {
        match name {
            "len" => Some(Self {
                name: "len".to_string(),
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 1 {
                        return wrong_arg_count(args.len(), 1);
                    }

                    match &args[0] {
                        Object::String(s) => Object::Integer(s.len() as i64),
                        Object::Array(arr) => Object::Integer(arr.borrow().len() as i64),
                        other => new_error(format!("argument to `len` not supported, got {}", other.type_name()))
                    }
                }
            }),
            "first" => Some(Self {
                name: "first".to_string(),
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 1 {
                        return wrong_arg_count(args.len(), 1);
                    }

                    match &args[0] {
                        Object::Array(arr) => match arr.borrow().first() {
                            Some(obj) => obj.clone(),
                            None => Object::Null,
                        },
                        other => new_error(format!("argument to `first` must be an ARRAY, got {}", other.type_name()))
                    }
                }
            }),
            "last" => Some(Self {
                name: "last".to_string(),
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 1 {
                        return wrong_arg_count(args.len(), 1);
                    }

                    match &args[0] {
                        Object::Array(arr) => match arr.borrow().last() {
                            Some(obj) => obj.clone(),
                            None => Object::Null,
                        },
                        other => new_error(format!("argument to `last` must be an ARRAY, got {}", other.type_name()))
                    }
                }
            }),
            "rest" => Some(Self {
                name: "rest".to_string(),
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 1 {
                        return wrong_arg_count(args.len(), 1);
                    }

                    match &args[0] {
                        Object::Array(arr) => {
                            let elements = arr.borrow();
                            if elements.is_empty() {
                                Object::Null
                            } else {
                                Object::new_array(elements[1..].to_vec())
                            }
                        },
                        other => new_error(format!("argument to `rest` must be an ARRAY, got {}", other.type_name()))
                    }
                }
            }),
            "push" => Some(Self {
                name: "push".to_string(),
                func: |args: Vec<Object>| -> Object {
                    if args.len() != 2 {
                        return wrong_arg_count(args.len(), 2);
                    }

                    match &args[0] {
                        Object::Array(arr) => {
                            // the source array is left untouched
                            let mut elements = arr.borrow().clone();
                            elements.push(args[1].clone());
                            Object::new_array(elements)
                        },
                        other => new_error(format!("argument to `push` must be an ARRAY, got {}", other.type_name()))
                    }
                }
            }),
            "puts" => Some(Self {
                name: "puts".to_string(),
                func: |args: Vec<Object>| -> Object {
                    for arg in args {
                        println!("{}", arg)
                    }
                    Object::Null
                }
            }),
            _ => None,
        }
    }

    pub fn call(&self, args: Vec<Object>) -> Object {
        (self.func)(args)
    }
}
