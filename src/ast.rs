use std::string::String;
use std::fmt;
use std::fmt::Formatter;

pub enum Node {
    Program(Program),
    Statement(Statement),
    Expression(Expression),
}

#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Statement>
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in self.statements.iter() {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    LetStatement{identifier: Expression, value: Expression},
    ReturnStatement(Expression),
    ExpressionStatement(Expression),
    BlockStatement(Vec<Statement>)
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::LetStatement { identifier, value } => {
                write!(f, "let {} = {}", identifier, value)?
            },
            Statement::ReturnStatement(ret) => {
                write!(f, "return {}", ret)?
            },
            Statement::ExpressionStatement(exp) => {
                write!(f, "{}", exp)?
            },
            Statement::BlockStatement(block) => {
                for stmt in block.iter() {
                    write!(f, "{}", stmt)?
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Expression>),
    // hash literal pairs keep their source order
    Hash(Vec<(Expression, Expression)>),
    PrefixExpression{
        operation: String,
        right: Box<Expression>
    },
    InfixExpression {
        operation: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    IfExpression{
        condition: Box<Expression>,
        consequence: Box<Statement>,
        alternative: Option<Box<Statement>>,
    },
    LoopExpression{
        condition: Box<Expression>,
        body: Box<Statement>,
    },
    Function{
        parameters: Vec<Expression>,
        body: Box<Statement>,
    },
    CallExpression{
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    IndexExpression{
        left: Box<Expression>,
        index: Box<Expression>,
    },
    AssignExpression{
        target: Box<Expression>,
        value: Box<Expression>,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => {write!(f, "{}", ident)},
            Expression::Boolean(b) => {write!(f, "{}", b)},
            Expression::Integer(int) => {write!(f, "{}", int)},
            Expression::Float(fl) => {
                // keep the decimal point so the canonical form re-lexes as a float
                if fl.fract() == 0.0 {
                    write!(f, "{:.1}", fl)
                } else {
                    write!(f, "{}", fl)
                }
            },
            Expression::String(st) => {
                // quoted and re-escaped so the canonical form re-lexes as the
                // same string
                let escaped = st
                    .replace('\\', "\\\\")
                    .replace('"', "\\\"")
                    .replace('\n', "\\n")
                    .replace('\t', "\\t");
                write!(f, "\"{}\"", escaped)
            },
            Expression::Array(exps) => {
                write!(f, "[{}]", exps.iter().
                    map(|exp| format!("{}", exp)).
                    collect::<Vec<_>>().join(", "))
            },
            Expression::Hash(pairs) => {
                write!(f, "{{{}}}", pairs.iter().
                    map(|kv| format!("{}: {}", kv.0, kv.1)).
                    collect::<Vec<_>>().join(", "))
            },
            Expression::PrefixExpression { operation, right } => {
                write!(f, "({}{})", operation, right)
            },
            Expression::InfixExpression { operation, left, right } => {
                write!(f, "({} {} {})", left, operation, right)
            }
            Expression::IfExpression { condition, consequence, alternative } => {
                // conditions always get parens so the canonical form re-parses
                write!(f, "if ({}) {{{}}}{}", condition, consequence,
                       match alternative {
                           None => {
                               "".to_string()
                           },
                           Some(alt) => {
                               format!(" else {{{}}}", alt)
                           }
                       })
            },
            Expression::LoopExpression { condition, body } => {
                write!(f, "loop ({}) {{{}}}", condition, body)
            },
            Expression::Function { parameters, body } => {
                write!(f, "fn ({}) {{{}}}",
                    parameters.iter().map(|exp| format!("{}", exp)).
                        collect::<Vec<_>>().join(", "),
                    body
                )
            },
            Expression::CallExpression { function, arguments } => {
                write!(f, "{}({})", function,
                    arguments.iter().map(|arg| format!("{}", arg)).
                        collect::<Vec::<_>>().join(", ")
                )
            }
            Expression::IndexExpression { left, index} => {
                write!(f, "({}[{}])", left, index)
            }
            Expression::AssignExpression { target, value } => {
                write!(f, "({} = {})", target, value)
            }
        }
    }
}
