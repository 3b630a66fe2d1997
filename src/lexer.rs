use super::token::{TokenType, Token, look_up_ident};

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: char,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut l = Lexer {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: char::from(0),
        };
        l.read_char();
        l
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_white_space();

        let tok = match self.ch {
            '=' => if self.peek_char() == '=' {
                    let ch = self.ch;
                    self.read_char();
                    let literal = ch.to_string() + &*self.ch.to_string();
                    Token {
                        token_type: TokenType::EQ,
                        literal
                    }
                } else {
                    new_token(TokenType::ASSIGN, self.ch)
                },
            '+' => new_token(TokenType::PLUS, self.ch),
            '-' => new_token(TokenType::MINUS, self.ch),
            '*' => new_token(TokenType::ASTERISK, self.ch),
            '/' => new_token(TokenType::SLASH, self.ch),
            '%' => new_token(TokenType::PERCENT, self.ch),
            '!' => if self.peek_char() == '=' {
                let ch = self.ch;
                self.read_char();
                let literal = ch.to_string() + &*self.ch.to_string();
                Token {
                    token_type: TokenType::NotEq,
                    literal
                }
            } else {
                new_token(TokenType::BANG, self.ch)
            },
            '<' => new_token(TokenType::LT, self.ch),
            '>' => new_token(TokenType::GT, self.ch),
            ';' => new_token(TokenType::SEMICOLON, self.ch),
            ':' => new_token(TokenType::COLON, self.ch),
            ',' => new_token(TokenType::COMMA, self.ch),
            '{' => new_token(TokenType::LBRACE, self.ch),
            '}' => new_token(TokenType::RBRACE, self.ch),
            '(' => new_token(TokenType::LPAREN, self.ch),
            ')' => new_token(TokenType::RPAREN, self.ch),
            '[' => new_token(TokenType::LBRACKET, self.ch),
            ']' => new_token(TokenType::RBRACKET, self.ch),
            '"' => Token{
                token_type: TokenType::STRING,
                literal: self.read_string(),
            },
            '\0' => new_token(TokenType::EOF, self.ch),
            _ => if is_letter(self.ch) {
                let literal = self.read_identifier();
                return Token {
                    token_type: look_up_ident(&literal),
                    literal,
                }
            } else if is_digit(self.ch) {
                let (literal, is_float) = self.read_number();
                return Token {
                    token_type: if is_float { TokenType::FLOAT } else { TokenType::INT },
                    literal,
                }
            } else {
                new_token(TokenType::ILLEGAL, self.ch)
            },
        };
        self.read_char();

        tok
    }

    fn skip_white_space(&mut self)  {
        while self.ch == ' ' || self.ch == '\t' || self.ch == '\n' || self.ch == '\r' {
            self.read_char();
        }
    }

    fn read_char(&mut self) {
        self.ch = if self.read_position >= self.input.len() {
            char::from(0)
        } else {
            self.input[self.read_position]
        };
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> char {
        if self.read_position >= self.input.len() {
            char::from(0)
        } else {
            self.input[self.read_position]
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while is_letter(self.ch) || is_digit(self.ch) {
            ident.push(self.ch);
            self.read_char();
        }
        ident
    }

    // [0-9]+ or [0-9]+.[0-9]+; a dot not followed by a digit is left alone
    fn read_number(&mut self) -> (String, bool) {
        let mut number = String::new();
        while is_digit(self.ch) {
            number.push(self.ch);
            self.read_char();
        }
        if self.ch != '.' || !is_digit(self.peek_char()) {
            return (number, false);
        }
        number.push(self.ch);
        self.read_char();
        while is_digit(self.ch) {
            number.push(self.ch);
            self.read_char();
        }
        (number, true)
    }

    fn read_string(&mut self) -> String {
        let mut literal = String::new();
        loop {
            self.read_char();
            match self.ch {
                '"' => break,
                '\0' => break,
                '\\' => {
                    self.read_char();
                    literal.push(match self.ch {
                        'n' => '\n',
                        't' => '\t',
                        '"' => '"',
                        '\\' => '\\',
                        other => other,
                    });
                },
                other => literal.push(other),
            }
        }
        literal
    }

}

fn is_letter(ch: char) -> bool {
    ch >= 'a' && ch <= 'z' || ch >= 'A' && ch <= 'Z' || ch == '_'
}

fn is_digit(ch: char) -> bool {
    ch >= '0' && ch <= '9'
}

fn new_token(token_type: TokenType, ch: char) -> Token {
    Token {
        token_type,
        literal: ch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::token::TokenType;

    struct ExpectToken<'a> {
        exp_token_type: TokenType,
        exp_literal: &'a str,
    }

    fn run_lexer_test(input: &str, expected_tokens: Vec<ExpectToken>) {
        let mut l = Lexer::new(input);

        for (i, token) in expected_tokens.iter().enumerate() {
            let tok = l.next_token();
            assert_eq!(tok.token_type, token.exp_token_type, "test {}: wrong token type", i);
            assert_eq!(tok.literal, token.exp_literal, "test {}: wrong literal", i);
        }
    }

    #[test]
    fn test_next_token() {
        let input = r#"let a1 = 2 + 3;
let add = fn(x, y) {
    x + y;
}

let result = add(five, ten);
5 < 10 > 3;
if (5 < 10) {
    return true
} else {
    return false
}
10 == 10
10 != 9
10 % 3
"foo bar"
[1, 2];
{"key": 5}
loop (i < 2) { i = i + 1 }"#;

        let expected_tokens = vec![
            ExpectToken { exp_token_type: TokenType::LET, exp_literal: "let" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "a1" },
            ExpectToken { exp_token_type: TokenType::ASSIGN, exp_literal: "=" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "2" },
            ExpectToken { exp_token_type: TokenType::PLUS, exp_literal: "+" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "3" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::LET, exp_literal: "let" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "add" },
            ExpectToken { exp_token_type: TokenType::ASSIGN, exp_literal: "=" },
            ExpectToken { exp_token_type: TokenType::FUNCTION, exp_literal: "fn" },
            ExpectToken { exp_token_type: TokenType::LPAREN, exp_literal: "(" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "x" },
            ExpectToken { exp_token_type: TokenType::COMMA, exp_literal: "," },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "y" },
            ExpectToken { exp_token_type: TokenType::RPAREN, exp_literal: ")" },
            ExpectToken { exp_token_type: TokenType::LBRACE, exp_literal: "{" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "x" },
            ExpectToken { exp_token_type: TokenType::PLUS, exp_literal: "+" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "y" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::RBRACE, exp_literal: "}" },
            ExpectToken { exp_token_type: TokenType::LET, exp_literal: "let" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "result" },
            ExpectToken { exp_token_type: TokenType::ASSIGN, exp_literal: "=" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "add" },
            ExpectToken { exp_token_type: TokenType::LPAREN, exp_literal: "(" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "five" },
            ExpectToken { exp_token_type: TokenType::COMMA, exp_literal: "," },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "ten" },
            ExpectToken { exp_token_type: TokenType::RPAREN, exp_literal: ")" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "5" },
            ExpectToken { exp_token_type: TokenType::LT, exp_literal: "<" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::GT, exp_literal: ">" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "3" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::IF, exp_literal: "if" },
            ExpectToken { exp_token_type: TokenType::LPAREN, exp_literal: "(" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "5" },
            ExpectToken { exp_token_type: TokenType::LT, exp_literal: "<" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::RPAREN, exp_literal: ")" },
            ExpectToken { exp_token_type: TokenType::LBRACE, exp_literal: "{" },
            ExpectToken { exp_token_type: TokenType::RETURN, exp_literal: "return" },
            ExpectToken { exp_token_type: TokenType::TRUE, exp_literal: "true" },
            ExpectToken { exp_token_type: TokenType::RBRACE, exp_literal: "}" },
            ExpectToken { exp_token_type: TokenType::ELSE, exp_literal: "else" },
            ExpectToken { exp_token_type: TokenType::LBRACE, exp_literal: "{" },
            ExpectToken { exp_token_type: TokenType::RETURN, exp_literal: "return" },
            ExpectToken { exp_token_type: TokenType::FALSE, exp_literal: "false" },
            ExpectToken { exp_token_type: TokenType::RBRACE, exp_literal: "}" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::EQ, exp_literal: "==" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::NotEq, exp_literal: "!=" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "9" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "10" },
            ExpectToken { exp_token_type: TokenType::PERCENT, exp_literal: "%" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "3" },
            ExpectToken { exp_token_type: TokenType::STRING, exp_literal: "foo bar" },
            ExpectToken { exp_token_type: TokenType::LBRACKET, exp_literal: "[" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "1" },
            ExpectToken { exp_token_type: TokenType::COMMA, exp_literal: "," },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "2" },
            ExpectToken { exp_token_type: TokenType::RBRACKET, exp_literal: "]" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::LBRACE, exp_literal: "{" },
            ExpectToken { exp_token_type: TokenType::STRING, exp_literal: "key" },
            ExpectToken { exp_token_type: TokenType::COLON, exp_literal: ":" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "5" },
            ExpectToken { exp_token_type: TokenType::RBRACE, exp_literal: "}" },
            ExpectToken { exp_token_type: TokenType::LOOP, exp_literal: "loop" },
            ExpectToken { exp_token_type: TokenType::LPAREN, exp_literal: "(" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "i" },
            ExpectToken { exp_token_type: TokenType::LT, exp_literal: "<" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "2" },
            ExpectToken { exp_token_type: TokenType::RPAREN, exp_literal: ")" },
            ExpectToken { exp_token_type: TokenType::LBRACE, exp_literal: "{" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "i" },
            ExpectToken { exp_token_type: TokenType::ASSIGN, exp_literal: "=" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "i" },
            ExpectToken { exp_token_type: TokenType::PLUS, exp_literal: "+" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "1" },
            ExpectToken { exp_token_type: TokenType::RBRACE, exp_literal: "}" },
            ExpectToken { exp_token_type: TokenType::EOF, exp_literal: "\0" },
            ExpectToken { exp_token_type: TokenType::EOF, exp_literal: "\0" },
        ];

        run_lexer_test(input, expected_tokens);
    }

    #[test]
    fn test_float_tokens() {
        let expected_tokens = vec![
            ExpectToken { exp_token_type: TokenType::FLOAT, exp_literal: "5.1" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "5" },
            ExpectToken { exp_token_type: TokenType::SEMICOLON, exp_literal: ";" },
            ExpectToken { exp_token_type: TokenType::FLOAT, exp_literal: "0.25" },
            ExpectToken { exp_token_type: TokenType::PLUS, exp_literal: "+" },
            ExpectToken { exp_token_type: TokenType::FLOAT, exp_literal: "10.0" },
            ExpectToken { exp_token_type: TokenType::EOF, exp_literal: "\0" },
        ];

        run_lexer_test("5.1 5; 0.25 + 10.0", expected_tokens);
    }

    #[test]
    fn test_identifier_with_underscore() {
        let expected_tokens = vec![
            ExpectToken { exp_token_type: TokenType::LET, exp_literal: "let" },
            ExpectToken { exp_token_type: TokenType::IDENT, exp_literal: "_my_var2" },
            ExpectToken { exp_token_type: TokenType::ASSIGN, exp_literal: "=" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "3" },
        ];

        run_lexer_test("let _my_var2 = 3", expected_tokens);
    }

    #[test]
    fn test_string_escapes() {
        let expected_tokens = vec![
            ExpectToken { exp_token_type: TokenType::STRING, exp_literal: "a\nb\tc\"d\\e" },
            ExpectToken { exp_token_type: TokenType::EOF, exp_literal: "\0" },
        ];

        run_lexer_test(r#""a\nb\tc\"d\\e""#, expected_tokens);
    }

    #[test]
    fn test_illegal_token() {
        let expected_tokens = vec![
            ExpectToken { exp_token_type: TokenType::ILLEGAL, exp_literal: "@" },
            ExpectToken { exp_token_type: TokenType::INT, exp_literal: "1" },
        ];

        run_lexer_test("@1", expected_tokens);
    }
}
