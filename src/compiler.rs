use crate::ast::{Expression, Node, Statement};
use crate::code::{make, Instructions, Operation};
use crate::object::{HashKey, HashPairs, KeyValue, Object};
use crate::symbol_table::SymbolTable;

// loop expressions are always available to the evaluator; lowering them to
// bytecode is opt-in
#[derive(Clone, Copy, Debug, Default)]
pub struct CompilerOptions {
    pub compile_loops: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct EmittedInstruction {
    operation: Operation,
    position: usize,
}

pub struct Compiler {
    instructions: Instructions,
    constants: Vec<Object>,
    symbol_table: SymbolTable,
    options: CompilerOptions,

    last_instruction: Option<EmittedInstruction>,
    previous_instruction: Option<EmittedInstruction>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::new_with_state(SymbolTable::new(), vec![])
    }

    // a REPL threads the symbol table and constants pool through every line
    pub fn new_with_state(symbol_table: SymbolTable, constants: Vec<Object>) -> Self {
        Self {
            instructions: Instructions::new(vec![]),
            constants,
            symbol_table,
            options: CompilerOptions::default(),
            last_instruction: None,
            previous_instruction: None,
        }
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn compile(&mut self, node: Node) -> Result<(), String> {
        match node {
            Node::Program(p) => {
                for s in p.statements {
                    self.compile(Node::Statement(s))?
                }
                Ok(())
            },
            Node::Statement(stmt) => match stmt {
                Statement::ExpressionStatement(exp) => {
                    self.compile(Node::Expression(exp))?;
                    self.emit(Operation::OpPop, vec![]);
                    Ok(())
                },
                Statement::BlockStatement(stmts) => {
                    for s in stmts {
                        self.compile(Node::Statement(s))?
                    }
                    Ok(())
                },
                Statement::LetStatement {identifier, value} => {
                    self.compile(Node::Expression(value))?;
                    match identifier {
                        Expression::Identifier(name) => {
                            let symbol = self.symbol_table.define(&name);
                            self.emit(Operation::OpSetGlobal, vec![symbol.index as i32]);
                            Ok(())
                        },
                        other => Err(format!("invalid identifier: {}", other)),
                    }
                },
                Statement::ReturnStatement(_) => {
                    Err("compiling return statements is not supported".to_string())
                },
            }
            Node::Expression(exp) => match exp {
                Expression::InfixExpression {operation, left, right} => {
                    if &operation == "<" {
                        // operand reversal turns < into the single greater-than opcode
                        self.compile(Node::Expression(*right))?;
                        self.compile(Node::Expression(*left))?;

                        self.emit(Operation::OpGreaterThan, vec![]);
                        return Ok(());
                    }

                    self.compile(Node::Expression(*left))?;
                    self.compile(Node::Expression(*right))?;

                    match operation.as_ref() {
                        "+" => {
                            self.emit(Operation::OpAdd, vec![]);
                        },
                        "-" => {
                            self.emit(Operation::OpSub, vec![]);
                        },
                        "*" => {
                            self.emit(Operation::OpMul, vec![]);
                        },
                        "/" => {
                            self.emit(Operation::OpDiv, vec![]);
                        },
                        "%" => {
                            self.emit(Operation::OpMod, vec![]);
                        },
                        ">" => {
                            self.emit(Operation::OpGreaterThan, vec![]);
                        },
                        "==" => {
                            self.emit(Operation::OpEqual, vec![]);
                        },
                        "!=" => {
                            self.emit(Operation::OpNotEqual, vec![]);
                        },
                        _ => return Err(format!("unknown operator {}", operation))
                    }
                    Ok(())
                },
                Expression::PrefixExpression {operation, right} => {
                    self.compile(Node::Expression(*right))?;

                    match operation.as_ref() {
                        "!" => {
                            self.emit(Operation::OpBang, vec![]);
                        },
                        "-" => {
                            self.emit(Operation::OpMinus, vec![]);
                        },
                        _ => return Err(format!("unknown operator {}", operation)),
                    }
                    Ok(())
                },
                Expression::Integer(i) => {
                    let pos = self.add_constant(Object::Integer(i)) as i32;
                    self.emit(Operation::OpConstant, vec![pos]);
                    Ok(())
                },
                Expression::Float(fl) => {
                    let pos = self.add_constant(Object::Float(fl)) as i32;
                    self.emit(Operation::OpConstant, vec![pos]);
                    Ok(())
                },
                Expression::String(s) => {
                    let pos = self.add_constant(Object::String(s)) as i32;
                    self.emit(Operation::OpConstant, vec![pos]);
                    Ok(())
                },
                Expression::Boolean(b) => {
                    if b {
                        self.emit(Operation::OpTrue, vec![]);
                    } else {
                        self.emit(Operation::OpFalse, vec![]);
                    }
                    Ok(())
                },
                Expression::Identifier(name) => {
                    match self.symbol_table.resolve(&name) {
                        Some(symbol) => {
                            self.emit(Operation::OpGetGlobal, vec![symbol.index as i32]);
                            Ok(())
                        },
                        None => Err(format!("undefined variable: {}", name)),
                    }
                },
                Expression::IfExpression {condition, consequence, alternative} => {
                    self.compile(Node::Expression(*condition))?;

                    // placeholder target, patched once the consequence is laid out
                    let jump_not_truthy_pos = self.emit(Operation::OpJumpNotTruthy, vec![9999]);

                    self.compile(Node::Statement(*consequence))?;
                    if self.last_instruction_is(Operation::OpPop) {
                        self.remove_last_instruction();
                    }

                    let jump_pos = self.emit(Operation::OpJump, vec![9999]);

                    let after_consequence = self.instructions.len();
                    self.change_operand(jump_not_truthy_pos, after_consequence as i32)?;

                    match alternative {
                        None => {
                            self.emit(Operation::OpNull, vec![]);
                        },
                        Some(alt) => {
                            self.compile(Node::Statement(*alt))?;
                            if self.last_instruction_is(Operation::OpPop) {
                                self.remove_last_instruction();
                            }
                        }
                    }

                    let after_alternative = self.instructions.len();
                    self.change_operand(jump_pos, after_alternative as i32)?;

                    Ok(())
                },
                Expression::LoopExpression {condition, body} => {
                    if !self.options.compile_loops {
                        return Err("compiling loop expressions is disabled".to_string());
                    }

                    let condition_pos = self.instructions.len();
                    self.compile(Node::Expression(*condition))?;

                    let exit_jump_pos = self.emit(Operation::OpJumpNotTruthy, vec![9999]);

                    // the body's expression statements pop themselves, so each
                    // iteration leaves the stack level unchanged
                    self.compile(Node::Statement(*body))?;
                    self.emit(Operation::OpJump, vec![condition_pos as i32]);

                    let after_body = self.instructions.len();
                    self.change_operand(exit_jump_pos, after_body as i32)?;

                    self.emit(Operation::OpNull, vec![]);
                    Ok(())
                },
                Expression::Array(elements) => {
                    let mut objs = Vec::with_capacity(elements.len());
                    for element in &elements {
                        match literal_object(element) {
                            Some(obj) => objs.push(obj),
                            None => return Err("only constant array literals can be compiled".to_string()),
                        }
                    }
                    let pos = self.add_constant(Object::new_array(objs)) as i32;
                    self.emit(Operation::OpConstant, vec![pos]);
                    Ok(())
                },
                Expression::Hash(pairs) => {
                    let mut map = HashPairs::new();
                    for (k, v) in &pairs {
                        let key_obj = match literal_object(k) {
                            Some(obj) => obj,
                            None => return Err("only constant hash literals can be compiled".to_string()),
                        };
                        let key = match HashKey::from_object(&key_obj) {
                            Some(key) => key,
                            None => return Err(format!("unusable as hash key: {}", key_obj.type_name())),
                        };
                        let value = match literal_object(v) {
                            Some(obj) => obj,
                            None => return Err("only constant hash literals can be compiled".to_string()),
                        };
                        map.insert(key.clone(), KeyValue{ key, value });
                    }
                    let pos = self.add_constant(Object::new_hash(map)) as i32;
                    self.emit(Operation::OpConstant, vec![pos]);
                    Ok(())
                },
                Expression::Function {..} => {
                    Err("compiling function literals is not supported".to_string())
                },
                Expression::CallExpression {..} => {
                    Err("compiling call expressions is not supported".to_string())
                },
                Expression::IndexExpression {..} => {
                    Err("compiling index expressions is not supported".to_string())
                },
                Expression::AssignExpression {..} => {
                    Err("compiling assignment expressions is not supported".to_string())
                },
            },
        }
    }

    fn add_constant(&mut self, obj: Object) -> usize {
        self.constants.push(obj);
        self.constants.len() - 1 // returns the object's index
    }

    fn emit(&mut self, op: Operation, operands: Vec<i32>) -> usize {
        let ins = make(op.as_byte(), &operands).expect("make instruction is failed");
        let pos = self.add_instruction(ins);

        self.previous_instruction = self.last_instruction;
        self.last_instruction = Some(EmittedInstruction{ operation: op, position: pos });

        pos
    }

    fn add_instruction(&mut self, mut ins: Vec<u8>) -> usize {
        let pos_new_instruction = self.instructions.len();
        self.instructions.append_vec(&mut ins);
        pos_new_instruction
    }

    fn last_instruction_is(&self, op: Operation) -> bool {
        match &self.last_instruction {
            Some(last) => last.operation == op,
            None => false,
        }
    }

    fn remove_last_instruction(&mut self) {
        if let Some(last) = self.last_instruction {
            self.instructions.truncate(last.position);
            self.last_instruction = self.previous_instruction;
            self.previous_instruction = None;
        }
    }

    fn change_operand(&mut self, pos: usize, operand: i32) -> Result<(), String> {
        let op = self.instructions[pos];
        let new_instruction = match make(op, &vec![operand]) {
            Some(ins) => ins,
            None => return Err(format!("invalid opcode at position {}: {}", pos, op)),
        };
        self.instructions.replace_at(pos, &new_instruction);
        Ok(())
    }

    pub fn byte_code(self) -> ByteCode {
        ByteCode{
            instructions: self.instructions,
            constants: self.constants,
        }
    }
}


pub struct ByteCode {
    pub instructions: Instructions,
    pub constants: Vec<Object>
}

// array and hash literals have no opcode of their own; a fully literal one is
// interned as a prebuilt constant instead
fn literal_object(exp: &Expression) -> Option<Object> {
    match exp {
        Expression::Integer(i) => Some(Object::Integer(*i)),
        Expression::Float(fl) => Some(Object::Float(*fl)),
        Expression::String(s) => Some(Object::String(s.clone())),
        Expression::Boolean(b) => Some(Object::Boolean(*b)),
        Expression::Array(elements) => {
            let mut objs = Vec::with_capacity(elements.len());
            for element in elements {
                objs.push(literal_object(element)?);
            }
            Some(Object::new_array(objs))
        },
        Expression::Hash(pairs) => {
            let mut map = HashPairs::new();
            for (k, v) in pairs {
                let key = HashKey::from_object(&literal_object(k)?)?;
                let value = literal_object(v)?;
                map.insert(key.clone(), KeyValue{ key, value });
            }
            Some(Object::new_hash(map))
        },
        _ => None,
    }
}
