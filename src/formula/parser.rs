use crate::formula::lexer::{ParseError, Token, TokenKind};
use crate::formula::Expression;
use crate::ir::Environment;

/// A parsed formula together with the values its leaves were assumed to have
/// while parsing: variables read as `false`, the literals as themselves.
///
/// The assumptions allow evaluating the tree directly with [`Expression::eval`]
/// without going through the solver.
#[derive(Debug)]
pub struct Parsed {
    pub expr: Expression,
    pub assumptions: Environment,
}

/// Deepest tree the parser builds. Every `NOT`, `(`, `AND` and `OR` adds a
/// level; the optimizer, the lowering and the evaluator all recurse once per
/// level.
pub const MAX_NESTING_DEPTH: usize = 500;

/// Recursive-descent parser.
///
/// ```text
/// expr  := conj ( OR expr )?
/// conj  := unary ( AND conj )?
/// unary := NOT unary | ( expr ) | 1 | 0 | identifier
/// ```
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    assumptions: Environment,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            assumptions: Environment::default(),
        }
    }

    pub fn parse(mut self) -> Result<Parsed, ParseError> {
        let expr = self.expr()?;
        self.expect(TokenKind::Eof)?;
        log::debug!("parsed {} nodes", expr.size());
        Ok(Parsed {
            expr,
            assumptions: self.assumptions,
        })
    }

    fn peek(&self) -> (TokenKind, usize) {
        match self.tokens.get(self.pos) {
            Some(token) => (token.kind, token.position),
            // a token stream without its `Eof` behaves as if it had one
            None => (TokenKind::Eof, self.tokens.last().map_or(0, |t| t.position)),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().0 == kind {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        let (found, position) = self.peek();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(ParseError::ExpectedToken {
                expected,
                found,
                position,
            })
        }
    }

    /// Runs `f` one level deeper, failing at `position` past the limit.
    fn nested<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                position,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.conj()?;
        let position = self.peek().1;
        if self.eat(TokenKind::Or) {
            let rhs = self.nested(position, Self::expr)?;
            return Ok(Expression::or(lhs, rhs));
        }
        Ok(lhs)
    }

    fn conj(&mut self) -> Result<Expression, ParseError> {
        let lhs = self.unary()?;
        let position = self.peek().1;
        if self.eat(TokenKind::And) {
            let rhs = self.nested(position, Self::conj)?;
            return Ok(Expression::and(lhs, rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expression, ParseError> {
        let (kind, position) = self.peek();
        match kind {
            TokenKind::Not => {
                self.pos += 1;
                let arg = self.nested(position, Self::unary)?;
                Ok(Expression::not(arg))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.nested(position, Self::expr)?;
                self.expect(TokenKind::RParen)?;
                Ok(Expression::paren(inner))
            }
            TokenKind::Variable | TokenKind::True | TokenKind::False => {
                let name = self.tokens[self.pos].lexeme.clone();
                self.pos += 1;
                self.assumptions.set(&name, kind == TokenKind::True);
                Ok(Expression::Var(name))
            }
            found => Err(ParseError::UnexpectedToken { found, position }),
        }
    }
}

/// Parses a token stream produced by [`tokenize`](crate::formula::lexer::tokenize).
pub fn parse(tokens: &[Token]) -> Result<Expression, ParseError> {
    Parser::new(tokens).parse().map(|parsed| parsed.expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::lexer::tokenize;
    use test_env_log::test;

    fn parse_str(text: &str) -> Result<Expression, ParseError> {
        parse(&tokenize(text)?)
    }

    fn v(name: &str) -> Expression {
        Expression::var(name)
    }

    #[test]
    fn parse_single_variable() {
        assert_eq!(parse_str("A"), Ok(v("A")));
        assert_eq!(parse_str("1"), Ok(Expression::constant(true)));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse_str("A AND B OR C"),
            Ok(Expression::or(Expression::and(v("A"), v("B")), v("C")))
        );
        assert_eq!(
            parse_str("A OR B AND C"),
            Ok(Expression::or(v("A"), Expression::and(v("B"), v("C"))))
        );
    }

    #[test]
    fn chains_are_right_associative() {
        assert_eq!(
            parse_str("A AND B AND A"),
            Ok(Expression::and(v("A"), Expression::and(v("B"), v("A"))))
        );
        assert_eq!(
            parse_str("A OR B OR C"),
            Ok(Expression::or(v("A"), Expression::or(v("B"), v("C"))))
        );
    }

    #[test]
    fn not_binds_tightest() {
        assert_eq!(
            parse_str("NOT A AND B"),
            Ok(Expression::and(Expression::not(v("A")), v("B")))
        );
        assert_eq!(
            parse_str("NOT NOT A"),
            Ok(Expression::not(Expression::not(v("A"))))
        );
    }

    #[test]
    fn parens_are_kept() {
        assert_eq!(
            parse_str("(A OR B) AND NOT A"),
            Ok(Expression::and(
                Expression::paren(Expression::or(v("A"), v("B"))),
                Expression::not(v("A"))
            ))
        );
        assert_eq!(
            parse_str("((A))"),
            Ok(Expression::paren(Expression::paren(v("A"))))
        );
    }

    #[test]
    fn assumptions_are_per_parse() {
        let tokens = tokenize("A OR 1 AND B").expect("failed to tokenize");
        let parsed = Parser::new(&tokens).parse().expect("failed to parse");
        let names: Vec<_> = parsed.assumptions.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(!parsed.assumptions.get("A"));
        assert!(parsed.assumptions.get("1"));
        assert!(!parsed.expr.eval(&parsed.assumptions));

        let tokens = tokenize("NOT C OR 0").expect("failed to tokenize");
        let parsed = Parser::new(&tokens).parse().expect("failed to parse");
        assert_eq!(parsed.assumptions.len(), 1);
        assert!(parsed.expr.eval(&parsed.assumptions));
    }

    #[test]
    fn unexpected_token() {
        assert_eq!(
            parse_str("A AND OR B"),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Or,
                position: 6
            })
        );
        assert_eq!(
            parse_str(""),
            Err(ParseError::UnexpectedToken {
                found: TokenKind::Eof,
                position: 0
            })
        );
    }

    #[test]
    fn missing_close_paren() {
        assert_eq!(
            parse_str("(A OR B"),
            Err(ParseError::ExpectedToken {
                expected: TokenKind::RParen,
                found: TokenKind::Eof,
                position: 7
            })
        );
    }

    #[test]
    fn trailing_input() {
        assert_eq!(
            parse_str("A B"),
            Err(ParseError::ExpectedToken {
                expected: TokenKind::Eof,
                found: TokenKind::Variable,
                position: 2
            })
        );
        assert!(parse_str("A)").is_err());
    }

    #[test]
    fn nesting_limit() {
        let at_limit = format!("{}A", "NOT ".repeat(MAX_NESTING_DEPTH));
        assert!(parse_str(&at_limit).is_ok());

        let too_deep = format!("{}A", "NOT ".repeat(MAX_NESTING_DEPTH + 1));
        assert_eq!(
            parse_str(&too_deep),
            Err(ParseError::TooDeep {
                limit: MAX_NESTING_DEPTH,
                position: 4 * MAX_NESTING_DEPTH
            })
        );

        let parens = format!("{}A{}", "(".repeat(5000), ")".repeat(5000));
        assert!(matches!(
            parse_str(&parens),
            Err(ParseError::TooDeep { position, .. }) if position == MAX_NESTING_DEPTH
        ));

        let chain = vec!["A"; 20_000].join(" AND ");
        assert!(matches!(parse_str(&chain), Err(ParseError::TooDeep { .. })));
        let chain = vec!["A"; 20_000].join(" OR ");
        assert!(matches!(parse_str(&chain), Err(ParseError::TooDeep { .. })));
    }
}
