// Filter parser - recursive descent over a cursor, producing an Expression

use super::cursor::Cursor;
use super::error::{ParseError, ParseResult};
use crate::expression::{BinaryOperator, ComparisonOperator, Expression, Pattern, UnaryOperator};
use crate::record::Value;

pub struct Parser<'a> {
    input: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        // Surrounding whitespace is dropped, but positions stay relative to
        // the caller's string.
        let end = input.trim_end().len();
        let start = end - input[..end].trim_start().len();
        Parser {
            input,
            cursor: Cursor::at(&input[..end], start),
        }
    }

    /// Parse the whole input as one filter expression
    pub fn parse(&mut self) -> ParseResult<Expression> {
        if self.input.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let expr = self.parse_expression()?;

        self.cursor.skip_whitespace();
        if !self.cursor.is_eof() {
            return Err(ParseError::UnexpectedInput {
                position: self.cursor.position(),
                found: self.cursor.describe_next(),
            });
        }

        Ok(expr)
    }

    /// Parse expression
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_or()
    }

    /// Parse OR expression
    fn parse_or(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_and()?;

        while self.cursor.match_keyword("OR") {
            let right = self.parse_and()?;
            left = Expression::Binary {
                op: BinaryOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse AND expression
    fn parse_and(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_not()?;

        while self.cursor.match_keyword("AND") {
            let right = self.parse_not()?;
            left = Expression::Binary {
                op: BinaryOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse NOT expression
    fn parse_not(&mut self) -> ParseResult<Expression> {
        if self.cursor.match_keyword("NOT") {
            let operand = self.parse_primary()?;
            Ok(Expression::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            })
        } else {
            self.parse_primary()
        }
    }

    /// Parse a parenthesized expression or a predicate on a field
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        self.cursor.skip_whitespace();

        let open = self.cursor.position();
        if self.cursor.match_str("(") {
            let expr = self.parse_expression()?;
            if !self.cursor.match_str(")") {
                return Err(ParseError::UnclosedParen {
                    position: open,
                    found: self.cursor.describe_next(),
                });
            }
            return Ok(expr);
        }

        let position = self.cursor.position();
        let field = self.cursor.read_identifier();
        if field.is_empty() {
            return Err(ParseError::ExpectedField {
                position,
                found: self.cursor.describe_next(),
            });
        }

        self.parse_predicate(field.to_string())
    }

    /// Parse whatever follows a field name
    fn parse_predicate(&mut self, field: String) -> ParseResult<Expression> {
        if self.cursor.match_keyword("IN") {
            let values = self.parse_value_list()?;
            return Ok(Expression::In {
                field,
                values,
                negate: false,
            });
        }

        if self.cursor.match_keyword("NOT") {
            if !self.cursor.match_keyword("IN") {
                return Err(ParseError::ExpectedToken {
                    expected: "IN after NOT",
                    position: self.cursor.position(),
                    found: self.cursor.describe_next(),
                });
            }
            let values = self.parse_value_list()?;
            return Ok(Expression::In {
                field,
                values,
                negate: true,
            });
        }

        if self.cursor.match_keyword("BETWEEN") {
            let lower = self.parse_value()?;
            if !self.cursor.match_keyword("AND") {
                return Err(ParseError::BetweenWithoutAnd {
                    position: self.cursor.position(),
                    found: self.cursor.describe_next(),
                });
            }
            let upper = self.parse_value()?;
            return Ok(Expression::Between {
                field,
                lower,
                upper,
            });
        }

        if self.cursor.match_keyword("LIKE") {
            let pattern = self.parse_pattern("LIKE")?;
            return Ok(Expression::Like {
                field,
                pattern: Pattern::like(pattern),
            });
        }

        if self.cursor.match_keyword("REGEXP") {
            let pattern = self.parse_pattern("REGEXP")?;
            return Ok(Expression::Regexp {
                field,
                pattern: Pattern::regexp(pattern),
            });
        }

        let position = self.cursor.position();
        let op = ComparisonOperator::ALL
            .into_iter()
            .find(|op| self.cursor.match_str(op.as_str()));

        match op {
            Some(op) => {
                let value = self.parse_value()?;
                Ok(Expression::Comparison { field, op, value })
            }
            None => Err(ParseError::ExpectedOperator {
                field,
                position,
                found: self.cursor.describe_next(),
            }),
        }
    }

    /// Parse a literal: a quoted string or a number.
    ///
    /// An unquoted token that is neither an integer nor a float is kept as
    /// a bare string.
    fn parse_value(&mut self) -> ParseResult<Value> {
        self.cursor.skip_whitespace();
        let position = self.cursor.position();

        if self.cursor.peek() == Some(b'\'') {
            let s = self.cursor.read_quoted()?;
            return Ok(Value::String(s.to_string()));
        }

        let token = self.cursor.read_number();
        if token.is_empty() {
            return Err(ParseError::ExpectedValue {
                position,
                found: self.cursor.describe_next(),
            });
        }

        if let Ok(i) = token.parse::<i64>() {
            Ok(Value::Integer(i))
        } else if let Ok(f) = token.parse::<f64>() {
            Ok(Value::Float(f))
        } else {
            Ok(Value::String(token.to_string()))
        }
    }

    /// Parse `( value, value, ... )`
    fn parse_value_list(&mut self) -> ParseResult<Vec<Value>> {
        if !self.cursor.match_str("(") {
            return Err(ParseError::ExpectedToken {
                expected: "'('",
                position: self.cursor.position(),
                found: self.cursor.describe_next(),
            });
        }

        let mut values = vec![];
        loop {
            values.push(self.parse_value()?);

            if self.cursor.match_str(",") {
                continue;
            }
            if self.cursor.match_str(")") {
                break;
            }
            return Err(ParseError::ExpectedToken {
                expected: "',' or ')' in value list",
                position: self.cursor.position(),
                found: self.cursor.describe_next(),
            });
        }

        Ok(values)
    }

    /// Parse the string operand of LIKE or REGEXP
    fn parse_pattern(&mut self, operator: &'static str) -> ParseResult<String> {
        self.cursor.skip_whitespace();
        let position = self.cursor.position();

        match self.parse_value()? {
            Value::String(pattern) => Ok(pattern),
            _ => Err(ParseError::PatternNotString { operator, position }),
        }
    }
}

/// Parse a filter expression string
pub fn parse(input: &str) -> ParseResult<Expression> {
    let expr = Parser::new(input).parse()?;
    log::debug!("parsed filter '{}' as {}", input.trim(), expr);
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comparison() {
        assert_eq!(parse("tool='Bash'").unwrap(), Expression::eq("tool", "Bash"));
        assert_eq!(
            parse("status != 'error'").unwrap(),
            Expression::ne("status", "error")
        );
        assert_eq!(parse("duration>100").unwrap(), Expression::gt("duration", 100));
        assert_eq!(parse("duration >= 100").unwrap(), Expression::ge("duration", 100));
        assert_eq!(parse("duration<=200").unwrap(), Expression::le("duration", 200));
        assert_eq!(parse("duration < 0.5").unwrap(), Expression::lt("duration", 0.5));
        assert_eq!(parse("delta=-3").unwrap(), Expression::eq("delta", -3));
    }

    #[test]
    fn test_parse_bare_value() {
        // Not a valid number, kept as an unquoted string
        assert_eq!(
            parse("version = 1.2.3").unwrap(),
            Expression::eq("version", "1.2.3")
        );
        assert_eq!(parse("x = -").unwrap(), Expression::eq("x", "-"));
    }

    #[test]
    fn test_parse_precedence() {
        // OR binds looser than AND
        let expr = parse("a=1 OR b=2 AND c=3").unwrap();
        assert_eq!(
            expr,
            Expression::or(
                Expression::eq("a", 1),
                Expression::and(Expression::eq("b", 2), Expression::eq("c", 3))
            )
        );

        // NOT binds tighter than AND
        let expr = parse("NOT a=1 AND b=2").unwrap();
        assert_eq!(
            expr,
            Expression::and(
                Expression::not_expr(Expression::eq("a", 1)),
                Expression::eq("b", 2)
            )
        );
    }

    #[test]
    fn test_parse_left_associative() {
        let expr = parse("a=1 AND b=2 AND c=3").unwrap();
        assert_eq!(
            expr,
            Expression::and(
                Expression::and(Expression::eq("a", 1), Expression::eq("b", 2)),
                Expression::eq("c", 3)
            )
        );

        let expr = parse("a=1 OR b=2 OR c=3").unwrap();
        assert_eq!(
            expr,
            Expression::or(
                Expression::or(Expression::eq("a", 1), Expression::eq("b", 2)),
                Expression::eq("c", 3)
            )
        );
    }

    #[test]
    fn test_parse_parentheses() {
        let expr = parse("tool='Bash' AND (status='error' OR status='success')").unwrap();
        assert_eq!(
            expr,
            Expression::and(
                Expression::eq("tool", "Bash"),
                Expression::or(
                    Expression::eq("status", "error"),
                    Expression::eq("status", "success")
                )
            )
        );

        let expr = parse("NOT (a=1 OR b=2)").unwrap();
        assert_eq!(
            expr,
            Expression::not_expr(Expression::or(Expression::eq("a", 1), Expression::eq("b", 2)))
        );

        assert_eq!(parse("((((a=1))))").unwrap(), Expression::eq("a", 1));
    }

    #[test]
    fn test_parse_in() {
        assert_eq!(
            parse("tool IN ('Bash', 'Edit', 'Write')").unwrap(),
            Expression::in_list("tool", vec!["Bash".into(), "Edit".into(), "Write".into()])
        );
        assert_eq!(
            parse("status NOT IN ('success')").unwrap(),
            Expression::not_in_list("status", vec!["success".into()])
        );
        assert_eq!(
            parse("code IN(1,2 , 3)").unwrap(),
            Expression::in_list("code", vec![1.into(), 2.into(), 3.into()])
        );
    }

    #[test]
    fn test_parse_between() {
        assert_eq!(
            parse("duration BETWEEN 500 AND 2000").unwrap(),
            Expression::between("duration", 500, 2000)
        );

        // The AND inside BETWEEN does not start a conjunction
        let expr = parse("duration BETWEEN 1 AND 2 AND tool='Bash'").unwrap();
        assert_eq!(
            expr,
            Expression::and(
                Expression::between("duration", 1, 2),
                Expression::eq("tool", "Bash")
            )
        );
    }

    #[test]
    fn test_parse_patterns() {
        assert_eq!(
            parse("tool LIKE 'meta%'").unwrap(),
            Expression::like("tool", "meta%")
        );
        assert_eq!(
            parse("error REGEXP 'permission.*denied'").unwrap(),
            Expression::regexp("error", "permission.*denied")
        );

        // Invalid regexps are only detected when evaluated
        assert!(parse("error REGEXP '(['").is_ok());
    }

    #[test]
    fn test_parse_keyword_boundaries() {
        // Field names that start with keywords
        assert_eq!(parse("ANDroid=1").unwrap(), Expression::eq("ANDroid", 1));
        assert_eq!(parse("NOTE='x'").unwrap(), Expression::eq("NOTE", "x"));
        assert_eq!(
            parse("ORIGIN='x' OR INDEX=2").unwrap(),
            Expression::or(Expression::eq("ORIGIN", "x"), Expression::eq("INDEX", 2))
        );
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse("  tool = 'Bash'  ").unwrap(), Expression::eq("tool", "Bash"));
        assert_eq!(
            parse("a=1\tAND\tb=2").unwrap(),
            Expression::and(Expression::eq("a", 1), Expression::eq("b", 2))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));

        assert_eq!(
            parse("tool='Bash"),
            Err(ParseError::UnterminatedString { position: 5 })
        );
        assert!(matches!(
            parse("(tool='Bash'"),
            Err(ParseError::UnclosedParen { position: 0, .. })
        ));
        assert!(matches!(
            parse("tool ~= 'Bash'"),
            Err(ParseError::ExpectedOperator { position: 5, .. })
        ));
        assert!(matches!(
            parse("tool="),
            Err(ParseError::ExpectedValue { position: 5, .. })
        ));
        assert!(matches!(
            parse("tool = Bash"),
            Err(ParseError::ExpectedValue { position: 7, .. })
        ));
        assert!(matches!(
            parse("duration BETWEEN 1 200"),
            Err(ParseError::BetweenWithoutAnd { .. })
        ));
        assert!(matches!(
            parse("tool LIKE 5"),
            Err(ParseError::PatternNotString {
                operator: "LIKE",
                position: 10
            })
        ));
        assert!(matches!(
            parse("tool REGEXP 1"),
            Err(ParseError::PatternNotString {
                operator: "REGEXP",
                ..
            })
        ));
        assert!(matches!(
            parse("tool IN 'Bash'"),
            Err(ParseError::ExpectedToken { expected: "'('", .. })
        ));
        assert!(matches!(
            parse("tool IN ('Bash' 'Edit')"),
            Err(ParseError::ExpectedToken { .. })
        ));
        assert!(matches!(
            parse("tool NOT 'Bash'"),
            Err(ParseError::ExpectedToken { .. })
        ));
        assert!(matches!(
            parse("= 1"),
            Err(ParseError::ExpectedField { position: 0, .. })
        ));
        assert!(matches!(
            parse("a=1 AND"),
            Err(ParseError::ExpectedField { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_input() {
        assert!(matches!(
            parse("tool='Bash' status='error'"),
            Err(ParseError::UnexpectedInput { position: 12, .. })
        ));
        assert!(matches!(
            parse("a=1 and b=2"),
            Err(ParseError::UnexpectedInput { .. })
        ));
        assert!(matches!(
            parse("a=1)"),
            Err(ParseError::UnexpectedInput { position: 3, .. })
        ));
    }

    #[test]
    fn test_positions_relative_to_input() {
        assert_eq!(
            parse("   tool='Bash"),
            Err(ParseError::UnterminatedString { position: 8 })
        );
    }

    #[test]
    fn test_display_reparses() {
        for input in [
            "tool='Bash'",
            "status!='error' AND duration>100",
            "NOT (a=1 OR b=2) AND c IN ('x', 2)",
            "duration BETWEEN 100 AND 200 OR name LIKE 'meta%'",
            "error REGEXP 'permission.*denied' AND status NOT IN ('success')",
        ] {
            let expr = parse(input).unwrap();
            assert_eq!(parse(&expr.to_string()).unwrap(), expr, "{}", input);
        }
    }
}
