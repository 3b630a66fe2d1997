use std::cell::RefCell;
use std::rc::Rc;
use crate::ast::{Expression, Node, Program, Statement};
use crate::builtin::BuiltinFunction;
use crate::object::{HashKey, HashPairs, KeyValue, Object};
use crate::environment::Environment;

pub struct Evaluator {
    env: Rc<RefCell<Environment>>
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            env: Rc::new(RefCell::new(Environment::new()))
        }
    }

    pub fn from(env: Environment) -> Self {
        Self {
            env: Rc::new(RefCell::new(env))
        }
    }

    pub fn get(&self, key: &str) -> Option<Object> {
        self.env.borrow().get(key)
    }

    fn set(&mut self, key: String, value: Object) {
        self.env.borrow_mut().set(key, value)
    }

    pub fn eval(&mut self, node: Node) -> Option<Object> {
        match node {
            Node::Program(program) => self.eval_program(program),
            Node::Statement(stmt) => match stmt {
                Statement::BlockStatement(b) => self.eval_block_statement(b),
                Statement::ExpressionStatement(exp) => self.eval(Node::Expression(exp)),
                Statement::ReturnStatement(r) => {
                    let val = self.eval(Node::Expression(r))?;
                    if is_error(&val) {
                        return Some(val);
                    }
                    Some(Object::ReturnValue(Box::new(val)))
                }
                Statement::LetStatement {identifier, value} => {
                    let val = self.eval(Node::Expression(value))?;
                    if is_error(&val) {
                        return Some(val);
                    }
                    match identifier {
                        Expression::Identifier(s) => {
                            self.set(s, val.clone());
                            Some(val)
                        },
                        _ => None,
                    }
                }
            },
            Node::Expression(exp) => match exp {
                Expression::Integer(i) => Some(Object::Integer(i)),
                Expression::Float(fl) => Some(Object::Float(fl)),
                Expression::String(s) => Some(Object::String(s)),
                Expression::Boolean(b) => Some(Object::Boolean(b)),
                Expression::PrefixExpression {operation, right} => {
                    let right = self.eval(Node::Expression(*right))?;
                    if is_error(&right) {
                        return Some(right);
                    }
                    Some(eval_prefix_expression(&operation, right))
                },
                Expression::InfixExpression {operation, left, right} => {
                    let left = self.eval(Node::Expression(*left))?;
                    if is_error(&left) {
                        return Some(left)
                    }
                    let right = self.eval(Node::Expression(*right))?;
                    if is_error(&right) {
                        return Some(right)
                    }
                    Some(eval_infix_expression(&operation, left, right))
                },
                Expression::IfExpression{..} => self.eval_if_expression(exp),
                Expression::LoopExpression {condition, body} => self.eval_loop_expression(*condition, *body),
                Expression::AssignExpression {target, value} => self.eval_assign_expression(*target, *value),
                Expression::Identifier(s) => self.eval_identifier(s),
                Expression::Function {parameters, body} => {
                    Some(Object::Function {
                        parameters,
                        body: *body,
                        env: Rc::clone(&self.env),
                    })
                },
                Expression::CallExpression {function, arguments} => {
                    let function = self.eval(Node::Expression(*function))?;
                    if is_error(&function) {
                        return Some(function);
                    }
                    let args = self.eval_expressions(arguments)?;
                    if args.len() == 1 && is_error(&args[0]) {
                        return Some(args[0].clone());
                    }
                    apply_function(function, args)
                },
                Expression::Array(exps) => {
                    let elements = self.eval_expressions(exps)?;
                    if elements.len() == 1 && is_error(&elements[0]) {
                        return Some(elements[0].clone());
                    }
                    Some(Object::new_array(elements))
                },
                Expression::IndexExpression {left, index} => {
                    let left = self.eval(Node::Expression(*left))?;
                    if is_error(&left) {
                        return Some(left);
                    }
                    let index = self.eval(Node::Expression(*index))?;
                    if is_error(&index) {
                        return Some(index);
                    }
                    Some(eval_index_expression(left, index))
                },
                Expression::Hash(pairs) => {
                    self.eval_hash_literal(pairs)
                }
            },
        }
    }

    fn eval_program(&mut self, program: Program) -> Option<Object> {
        let mut result = Object::Null;

        for stmt in program.statements {
            result = self.eval(Node::Statement(stmt))?;

            match result {
                Object::ReturnValue(ret) => {
                    return Some(*ret);
                },
                Object::Error(err) => {
                    return Some(Object::Error(err));
                }
                _ => {}
            }
        }
        Some(result)
    }

    fn eval_block_statement(&mut self, block: Vec<Statement>) -> Option<Object> {
        let mut result = Object::Null;

        for stmt in block {
            result = self.eval(Node::Statement(stmt))?;

            match result {
                Object::ReturnValue(_) | Object::Error(_) => {
                    return Some(result);
                },
                _ => {},
            }
        }

        Some(result)
    }

    fn eval_if_expression(&mut self, expression: Expression) -> Option<Object> {
        if let Expression::IfExpression {condition, consequence, alternative} = expression {
            let condition = self.eval(Node::Expression(*condition))?;
            if is_error(&condition) {
                return Some(condition);
            }

            if is_truthy(&condition) {
                self.eval(Node::Statement(*consequence))
            } else {
                match alternative {
                    None => Some(Object::Null),
                    Some(st) => self.eval(Node::Statement(*st))
                }
            }
        } else {
            None
        }
    }

    // runs the body while the condition holds; the value is the last body
    // value, or null when the body never ran
    fn eval_loop_expression(&mut self, condition: Expression, body: Statement) -> Option<Object> {
        let mut result = Object::Null;

        loop {
            let cond = self.eval(Node::Expression(condition.clone()))?;
            if is_error(&cond) {
                return Some(cond);
            }
            if !is_truthy(&cond) {
                break;
            }

            result = self.eval(Node::Statement(body.clone()))?;
            match result {
                Object::ReturnValue(_) | Object::Error(_) => {
                    return Some(result);
                },
                _ => {},
            }
        }

        Some(result)
    }

    fn eval_assign_expression(&mut self, target: Expression, value: Expression) -> Option<Object> {
        match target {
            Expression::Identifier(name) => {
                let val = self.eval(Node::Expression(value))?;
                if is_error(&val) {
                    return Some(val);
                }
                if self.env.borrow_mut().assign(&name, val.clone()) {
                    Some(val)
                } else {
                    Some(new_error(format!("identifier not found: {}", name)))
                }
            },
            Expression::IndexExpression {left, index} => {
                let container = self.eval(Node::Expression(*left))?;
                if is_error(&container) {
                    return Some(container);
                }
                let index = self.eval(Node::Expression(*index))?;
                if is_error(&index) {
                    return Some(index);
                }
                let val = self.eval(Node::Expression(value))?;
                if is_error(&val) {
                    return Some(val);
                }
                Some(eval_index_assignment(container, index, val))
            },
            other => Some(new_error(format!("invalid identifier: {}", other))),
        }
    }

    fn eval_identifier(&mut self, identifier: String) -> Option<Object> {
        match self.get(&identifier) {
            Some(obj) => Some(obj),
            None => match BuiltinFunction::look_up(&identifier) {
                Some(builtin) => Some(Object::Builtin(builtin)),
                None => Some(new_error(format!("identifier not found: {}", identifier)))
            }
        }
    }

    fn eval_expressions(&mut self, args: Vec<Expression>) -> Option<Vec<Object>> {
        let mut result = Vec::new();

        for arg in args {
            let evaluated = self.eval(Node::Expression(arg))?;
            if is_error(&evaluated) {
                return Some(vec![evaluated]);
            }
            result.push(evaluated);
        }
        Some(result)
    }

    fn eval_hash_literal(&mut self, pairs: Vec<(Expression, Expression)>) -> Option<Object> {
        let mut evaluated = HashPairs::new();
        for (key, value) in pairs {
            let key = self.eval(Node::Expression(key))?;
            if is_error(&key) {
                return Some(key);
            }

            let hashed_key = match HashKey::from_object(&key) {
                Some(k) => k,
                None => return Some(new_error(format!("unusable as hash key: {}", key.type_name()))),
            };

            let value = self.eval(Node::Expression(value))?;
            if is_error(&value) {
                return Some(value);
            }

            evaluated.insert(hashed_key.clone(), KeyValue{ key: hashed_key, value });
        }
        Some(Object::new_hash(evaluated))
    }

}

fn is_error(val: &Object) -> bool {
    matches!(val, Object::Error(_))
}

pub fn new_error(msg: String) -> Object {
    Object::Error(msg)
}

fn native_bool_to_object(input: bool) -> Object {
    Object::Boolean(input)
}

fn is_truthy(obj: &Object) -> bool {
    match obj {
        Object::Null => false,
        Object::Boolean(b) => *b,
        _ => true,
    }
}

fn as_float(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Float(f) => *f,
        _ => unreachable!(),
    }
}

// reference equality for the types that have no content comparison
fn objects_identical(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Null, Object::Null) => true,
        (Object::Array(a), Object::Array(b)) => Rc::ptr_eq(a, b),
        (Object::Hash(a), Object::Hash(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

fn eval_prefix_expression(operation: &str, right: Object) -> Object {
    match operation {
        "!" => eval_bang_expression(right),
        "-" => eval_minus_prefix_expression(right),
        _ => new_error(format!("unknown operator: {}{}", operation, right.type_name())),
    }
}

fn eval_bang_expression(right: Object) -> Object {
    native_bool_to_object(!is_truthy(&right))
}

fn eval_minus_prefix_expression(right: Object) -> Object {
    match right {
        Object::Integer(i) => Object::Integer(-i),
        Object::Float(f) => Object::Float(-f),
        _ => new_error(format!("unknown operator: -{}", right.type_name())),
    }
}

fn eval_infix_expression(operation: &str, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => {
            eval_integer_infix_expression(operation, *l, *r)
        },
        // one float promotes the whole operation
        (Object::Integer(_) | Object::Float(_), Object::Integer(_) | Object::Float(_)) => {
            eval_float_infix_expression(operation, as_float(&left), as_float(&right))
        },
        (Object::String(l), Object::String(r)) => {
            eval_string_infix_expression(operation, l, r)
        },
        (Object::Boolean(l), Object::Boolean(r)) => match operation {
            "==" => native_bool_to_object(l == r),
            "!=" => native_bool_to_object(l != r),
            _ => new_error(format!("unknown operator: {} {} {}", left.type_name(), operation, right.type_name())),
        },
        _ if left.type_name() != right.type_name() => match operation {
            "==" => Object::Boolean(false),
            "!=" => Object::Boolean(true),
            _ => new_error(format!("type mismatch: {} {} {}", left.type_name(), operation, right.type_name())),
        },
        _ => match operation {
            "==" => native_bool_to_object(objects_identical(&left, &right)),
            "!=" => native_bool_to_object(!objects_identical(&left, &right)),
            _ => new_error(format!("unknown operator: {} {} {}", left.type_name(), operation, right.type_name())),
        },
    }
}

fn eval_integer_infix_expression(operation: &str, left: i64, right: i64) -> Object {
    match operation {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => Object::Integer(left / right),
        "%" => Object::Integer(left % right),
        "<" => native_bool_to_object(left < right),
        ">" => native_bool_to_object(left > right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => new_error(format!("unknown operator: INTEGER {} INTEGER", operation)),
    }
}

fn eval_float_infix_expression(operation: &str, left: f64, right: f64) -> Object {
    match operation {
        "+" => Object::Float(left + right),
        "-" => Object::Float(left - right),
        "*" => Object::Float(left * right),
        "/" => Object::Float(left / right),
        "%" => Object::Float(left % right),
        "<" => native_bool_to_object(left < right),
        ">" => native_bool_to_object(left > right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => new_error(format!("unknown operator: FLOAT {} FLOAT", operation)),
    }
}

fn eval_string_infix_expression(operation: &str, left: &str, right: &str) -> Object {
    match operation {
        "+" => Object::String(left.to_string() + right),
        "==" => native_bool_to_object(left == right),
        "!=" => native_bool_to_object(left != right),
        _ => new_error(format!("unknown operator: STRING {} STRING", operation)),
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> Option<Object> {
    match function {
        Object::Function {parameters, body, env} => {
            if parameters.len() != args.len() {
                return Some(new_error(format!("wrong number of arguments. got={}, want={}", args.len(), parameters.len())));
            }

            let call_env = Environment::new_enclosed(Rc::clone(&env));
            let mut eval = Evaluator::from(call_env);
            for (i, param) in parameters.iter().enumerate() {
                if let Expression::Identifier(param) = param {
                    eval.set(param.to_string(), args[i].clone());
                }
            }

            match eval.eval(Node::Statement(body)) {
                None => None,
                Some(obj) => match obj {
                    Object::ReturnValue(exp) => {
                        Some(*exp)
                    },
                    other => Some(other)
                }
            }
        }
        Object::Builtin(bf) => {
            Some(bf.call(args))
        },
        other => Some(new_error(format!("not a function: {}", other.type_name()))),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Object {
    match (&left, &index) {
        (Object::Array(arr), Object::Integer(i)) => {
            let elements = arr.borrow();
            if *i < 0 || *i >= elements.len() as i64 {
                Object::Null
            } else {
                elements[*i as usize].clone()
            }
        },
        (Object::Hash(hash), _) => {
            let key = match HashKey::from_object(&index) {
                Some(k) => k,
                None => return new_error(format!("unusable as hash key: {}", index.type_name())),
            };
            match hash.borrow().get(&key) {
                Some(pair) => pair.value.clone(),
                None => Object::Null,
            }
        },
        _ => new_error(format!("index operator not supported: {}", left.type_name())),
    }
}

// containers mutate in place so every alias observes the write
fn eval_index_assignment(container: Object, index: Object, value: Object) -> Object {
    match (&container, &index) {
        (Object::Array(arr), Object::Integer(i)) => {
            let mut elements = arr.borrow_mut();
            if *i >= 0 && *i < elements.len() as i64 {
                elements[*i as usize] = value.clone();
            }
            // out-of-range writes are dropped, the value still flows through
            value
        },
        (Object::Hash(hash), _) => {
            let key = match HashKey::from_object(&index) {
                Some(k) => k,
                None => return new_error(format!("unusable as hash key: {}", index.type_name())),
            };
            hash.borrow_mut().insert(key.clone(), KeyValue{ key, value: value.clone() });
            value
        },
        _ => new_error(format!("index assignment not supported: {}", container.type_name())),
    }
}
