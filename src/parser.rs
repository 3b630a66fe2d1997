use core::fmt;
use std::fmt::Formatter;
use crate::ast::{Expression, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

#[derive(Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
enum Precedence {
    LOWEST,
    ASSIGN, // =
    EQUALS, // ==
    LessGreater, // > <
    SUM, // +, -
    PRODUCT, // *, /, %
    PREFIX, // -X, !X
    CALL,
    INDEX
}

impl fmt::Display for Precedence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self {
            Precedence::LOWEST => write!(f, "LOWEST"),
            Precedence::ASSIGN => write!(f, "ASSIGN"),
            Precedence::EQUALS => write!(f, "EQUALS"),
            Precedence::LessGreater => write!(f, "LessGreater"),
            Precedence::SUM => write!(f, "SUM"),
            Precedence::PRODUCT => write!(f, "PRODUCT"),
            Precedence::PREFIX => write!(f, "PREFIX"),
            Precedence::CALL => write!(f, "CALL"),
            Precedence::INDEX => write!(f, "INDEX")
        }
    }
}

fn get_precedence(token: TokenType) -> Option<Precedence> {
    match token {
        TokenType::ASSIGN => Some(Precedence::ASSIGN),
        TokenType::EQ | TokenType::NotEq => Some(Precedence::EQUALS),
        TokenType::LT | TokenType::GT => Some(Precedence::LessGreater),
        TokenType::PLUS | TokenType::MINUS => Some(Precedence::SUM),
        TokenType::ASTERISK | TokenType::SLASH | TokenType::PERCENT => Some(Precedence::PRODUCT),
        TokenType::LPAREN => Some(Precedence::CALL),
        TokenType::LBRACKET => Some(Precedence::INDEX),
        _ => None
    }
}

pub struct Parser {
    l: Lexer,
    errors: Vec<String>,

    cur_token: Option<Token>,
    peek_token: Option<Token>,
}

impl Parser {

    pub fn new(l: Lexer) -> Self {
        let mut p = Parser {
            l,
            errors: Vec::new(),

            cur_token: None,
            peek_token: None,
        };

        // filling the cur_token
        p.next_token();
        p.next_token();

        p
    }

    fn next_token(&mut self) {
        self.cur_token = self.peek_token.clone();
        self.peek_token = Some(self.l.next_token());
    }

    fn cur_token_is(&self, t: TokenType) -> bool {
        match &self.cur_token {
            None => false,
            Some(ct) => ct.token_type == t,
        }
    }

    fn peek_token_is(&self, t: TokenType) -> bool {
        match &self.peek_token {
            None => false,
            Some(pt) => pt.token_type == t,
        }
    }

    fn expect_peek(&mut self, t: TokenType) -> bool {
        if self.peek_token_is(t) {
            self.next_token();
            true
        } else {
            self.peek_error(t);
            false
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    fn peek_error(&mut self, t: TokenType) {
        self.errors.push(format!("expected next token to be {}, got {} instead",
            t, match &self.peek_token {
                None => "<none>".to_string(),
                Some(pt) => pt.token_type.to_string(),
            }))
    }

    fn no_prefix_fn_error(&mut self, t: TokenType) {
        self.errors.push(format!("no prefix parse function for {} found", t))
    }

    pub fn parse_program(&mut self) -> Program {
        let mut p = Program{
            statements: Vec::new(),
        };

        while !self.cur_token_is(TokenType::EOF) {
            let stmt = self.parse_statement();
            match stmt {
                None => {},
                Some(s) => p.statements.push(s)
            }
            self.next_token();
        }
        p
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match &self.cur_token {
            None => None,
            Some(ct) => match ct.token_type {
                TokenType::LET => self.parse_let_statement(),
                TokenType::RETURN => self.parse_return_statement(),
                _ => self.parse_expression_statement()
            }
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenType::IDENT) {
            return None;
        }

        let identifier = Expression::Identifier(self.cur_token.as_ref()?.literal.clone());

        if !self.expect_peek(TokenType::ASSIGN) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::LOWEST)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }

        let stmt = Statement::LetStatement {
            identifier,
            value
        };
        Some(stmt)
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let ret_val = self.parse_expression(Precedence::LOWEST)?;
        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }
        Some(Statement::ReturnStatement(ret_val))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::LOWEST)?;

        if self.peek_token_is(TokenType::SEMICOLON) {
            self.next_token();
        }
        Some(Statement::ExpressionStatement(expression))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left_exp = match &self.cur_token.as_ref()?.token_type {
            TokenType::IDENT => self.parse_identifier(),
            TokenType::INT => self.parse_integer_literal(),
            TokenType::FLOAT => self.parse_float_literal(),
            TokenType::STRING => self.parse_string_literal(),
            TokenType::MINUS | TokenType::BANG => self.parse_prefix_expression(),
            TokenType::LBRACKET => self.parse_array_literal(),
            TokenType::LPAREN => self.parse_grouped_expression(),
            TokenType::LBRACE => self.parse_hash_literal(),
            TokenType::TRUE | TokenType::FALSE => self.parse_boolean(),
            TokenType::IF => self.parse_if_expression(),
            TokenType::LOOP => self.parse_loop_expression(),
            TokenType::FUNCTION => self.parse_function_literal(),
            other => {
                let t = *other;
                self.no_prefix_fn_error(t);
                None
            },
        }?;

        while !self.peek_token_is(TokenType::SEMICOLON) && precedence < self.peek_precedence() {
            left_exp = match &self.peek_token.as_ref()?.token_type {
                TokenType::PLUS | TokenType::MINUS | TokenType::ASTERISK | TokenType::SLASH |
                    TokenType::PERCENT |
                    TokenType::EQ | TokenType::NotEq | TokenType::LT | TokenType::GT => {
                    self.next_token();
                    self.parse_infix_expression(left_exp)?
                },
                TokenType::ASSIGN => {
                    self.next_token();
                    self.parse_assign_expression(left_exp)?
                },
                TokenType::LPAREN => {
                    self.next_token();
                    self.parse_call_expression(left_exp)?
                },
                TokenType::LBRACKET => {
                    self.next_token();
                    self.parse_index_expression(left_exp)?
                },
                _ => left_exp
            }
        }
        Some(left_exp)
    }

    fn peek_precedence(&self) -> Precedence {
        let peek_token = match &self.peek_token {
            None => return Precedence::LOWEST,
            Some(pt) => pt,
        };
        match get_precedence(peek_token.token_type) {
            None => Precedence::LOWEST,
            Some(p) => p
        }
    }

    fn cur_precedence(&self) -> Precedence {
        let cur_token = match &self.cur_token {
            None => return Precedence::LOWEST,
            Some(ct) => ct,
        };
        match get_precedence(cur_token.token_type) {
            None => Precedence::LOWEST,
            Some(p) => p
        }
    }

    fn parse_identifier(&self) -> Option<Expression> {
        Some(Expression::Identifier(self.cur_token.as_ref()?.literal.clone()))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let lit = self.cur_token.as_ref()?.literal.clone();
        match lit.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                self.errors.push(format!("could not parse {} as integer", lit));
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let lit = self.cur_token.as_ref()?.literal.clone();
        match lit.parse::<f64>() {
            Ok(value) => Some(Expression::Float(value)),
            Err(_) => {
                self.errors.push(format!("could not parse {} as float", lit));
                None
            }
        }
    }

    fn parse_string_literal(&self) -> Option<Expression> {
        Some(Expression::String(self.cur_token.as_ref()?.literal.clone()))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let op = self.cur_token.as_ref()?.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::PREFIX)?;
        Some(Expression::PrefixExpression {
            operation: op,
            right: Box::new(right)
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let op = self.cur_token.as_ref()?.literal.clone();

        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::InfixExpression {
            operation: op,
            left: Box::new(left),
            right: Box::new(right)
        })
    }

    // right-associative: a = b = c groups as a = (b = c); whether the target
    // is assignable is the evaluator's concern
    fn parse_assign_expression(&mut self, target: Expression) -> Option<Expression> {
        self.next_token();
        let value = self.parse_expression(Precedence::LOWEST)?;
        Some(Expression::AssignExpression {
            target: Box::new(target),
            value: Box::new(value)
        })
    }

    fn parse_boolean(&self) -> Option<Expression> {
        if self.cur_token == None {
            return None;
        }
        Some(Expression::Boolean(self.cur_token_is(TokenType::TRUE)))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::LOWEST)?;
        if !self.expect_peek(TokenType::RPAREN) {
            return None;
        }
        Some(exp)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LPAREN) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::LOWEST)?;
        if !self.expect_peek(TokenType::RPAREN) {
            return None;
        }
        if !self.expect_peek(TokenType::LBRACE) {
            return None;
        }

        let consequence = self.parse_block_statement()?;

        let stmt = if self.peek_token_is(TokenType::ELSE) {
            self.next_token();
            if !self.expect_peek(TokenType::LBRACE) {
                return None;
            }
            let alternative = self.parse_block_statement()?;
            Expression::IfExpression {
                condition: Box::new(condition),
                consequence: Box::new(consequence),
                alternative: Some(Box::new(alternative))
            }
        } else {
            Expression::IfExpression {
                condition: Box::new(condition),
                consequence: Box::new(consequence),
                alternative: None
            }
        };
        Some(stmt)
    }

    fn parse_loop_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LPAREN) {
            return None;
        }

        self.next_token();
        let condition = self.parse_expression(Precedence::LOWEST)?;
        if !self.expect_peek(TokenType::RPAREN) {
            return None;
        }
        if !self.expect_peek(TokenType::LBRACE) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::LoopExpression {
            condition: Box::new(condition),
            body: Box::new(body)
        })
    }

    fn parse_block_statement(&mut self) -> Option<Statement> {
        let mut stmts = Vec::<Statement>::new();
        self.next_token();
        while !self.cur_token_is(TokenType::RBRACE) && !self.cur_token_is(TokenType::EOF) {
            let stmt = self.parse_statement();
            if let Some(st) = stmt {
                stmts.push(st);
            }
            self.next_token();
        }
        Some(Statement::BlockStatement(stmts))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenType::LPAREN) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        if !self.expect_peek(TokenType::LBRACE) {
            return None;
        }

        let body = self.parse_block_statement()?;

        Some(Expression::Function {
            parameters: params,
            body: Box::new(body)
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Expression>> {
        let mut params = Vec::new();
        if self.peek_token_is(TokenType::RPAREN) {
            self.next_token();
            return Some(params);
        }
        self.next_token();

        let ident = Expression::Identifier(self.cur_token.as_ref()?.literal.clone());
        params.push(ident);

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.next_token();
            let ident = Expression::Identifier(self.cur_token.as_ref()?.literal.clone());
            params.push(ident);
        }

        if !self.expect_peek(TokenType::RPAREN) {
            return None;
        }
        Some(params)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let args = self.parse_expression_list(TokenType::RPAREN)?;
        Some(Expression::CallExpression { function: Box::new(function), arguments: args })
    }

    fn parse_expression_list(&mut self, end: TokenType) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(end) {
            self.next_token();
            return Some(list)
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::LOWEST)?);

        while self.peek_token_is(TokenType::COMMA) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::LOWEST)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenType::RBRACKET)?;
        Some(Expression::Array(elements))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::LOWEST)?;

        if !self.expect_peek(TokenType::RBRACKET) {
            return None;
        }

        Some(Expression::IndexExpression { left: Box::new(left), index: Box::new(index) })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::<(Expression, Expression)>::new();

        while !self.peek_token_is(TokenType::RBRACE) {
            self.next_token();
            let key = self.parse_expression(Precedence::LOWEST)?;
            if !self.expect_peek(TokenType::COLON) {
                return None;
            }

            self.next_token();

            let value = self.parse_expression(Precedence::LOWEST)?;
            if !self.peek_token_is(TokenType::RBRACE) && !self.expect_peek(TokenType::COMMA) {
                return None;
            }

            pairs.push((key, value));
        }

        if !self.expect_peek(TokenType::RBRACE) {
            return None;
        }
        Some(Expression::Hash(pairs))
    }
}
