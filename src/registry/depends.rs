//! Evaluation of `depends` expressions on `<require>` blocks.
//!
//! Expressions combine version and extension names with `+` (all of) and
//! `,` (any of); `+` binds tighter and parentheses group.

/// Evaluate a dependency expression against a predicate on names.
pub fn evaluate(expr: &str, enabled: &dyn Fn(&str) -> bool) -> bool {
    let tokens = tokenize(expr);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        enabled,
    };
    parser.any_of()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    And,
    Or,
    Open,
    Close,
}

fn tokenize(expr: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut name = String::new();

    for c in expr.chars() {
        let token = match c {
            '+' => Some(Token::And),
            ',' => Some(Token::Or),
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            c if c.is_whitespace() => None,
            c => {
                name.push(c);
                continue;
            }
        };
        if !name.is_empty() {
            tokens.push(Token::Name(std::mem::take(&mut name)));
        }
        if let Some(token) = token {
            tokens.push(token);
        }
    }
    if !name.is_empty() {
        tokens.push(Token::Name(name));
    }

    tokens
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    enabled: &'a dyn Fn(&str) -> bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn any_of(&mut self) -> bool {
        let mut result = self.all_of();
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.all_of();
            result = result || rhs;
        }
        result
    }

    fn all_of(&mut self) -> bool {
        let mut result = self.operand();
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.operand();
            result = result && rhs;
        }
        result
    }

    fn operand(&mut self) -> bool {
        match self.tokens.get(self.pos).cloned() {
            Some(Token::Open) => {
                self.pos += 1;
                let result = self.any_of();
                if self.peek() == Some(&Token::Close) {
                    self.pos += 1;
                }
                result
            }
            Some(Token::Name(name)) => {
                self.pos += 1;
                (self.enabled)(&name)
            }
            _ => false,
        }
    }
}
