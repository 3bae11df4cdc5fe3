//! Token parser for filter expressions given on the command line.
//!
//! Grammar:
//!
//! ```text
//! expr := term ((and|or) term)*
//! term := '(' expr ')' | ATTR OP [VALUE]
//! ```
//!
//! Comparators and operators are resolved through their aliases, so `eq`,
//! `=` and `==` are all accepted. NULL and NOTNULL never take a value.

use chrono::DateTime;
use onms::{Clause, Comparator, NestedRestriction, Operator, Restriction, RestrictionNode, RestrictionValue, Severity};

/// Error produced while parsing filter tokens.
#[derive(Debug, thiserror::Error)]
#[error("{message} (at token {position})")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

/// Parse tokens into the clause list of a filter.
///
/// The first clause of every list is tagged OR so that flat OR-only input
/// stays expressible in the V1 API.
pub fn parse_clauses(args: &[String]) -> Result<Vec<Clause>, ParseError> {
    let tokens = split_parens(args);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut parser = Parser { tokens, pos: 0 };
    let clauses = parser.expression(0)?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error(format!("unexpected '{}'", parser.tokens[parser.pos])));
    }
    Ok(clauses)
}

/// Separate leading `(` and trailing `)` from the tokens they are glued to.
///
/// A trailing `)` that closes a `(` inside the same token belongs to the
/// value, so `foo(bar)` stays whole.
fn split_parens(args: &[String]) -> Vec<String> {
    let mut tokens = Vec::new();
    for arg in args {
        let mut rest = arg.trim();
        while let Some(inner) = rest.strip_prefix('(') {
            tokens.push("(".to_string());
            rest = inner;
        }
        let unmatched = rest
            .matches(')')
            .count()
            .saturating_sub(rest.matches('(').count());
        let mut closing = 0;
        while closing < unmatched {
            let Some(inner) = rest.strip_suffix(')') else {
                break;
            };
            closing += 1;
            rest = inner;
        }
        if !rest.is_empty() {
            tokens.push(rest.to_string());
        }
        tokens.extend(std::iter::repeat(")".to_string()).take(closing));
    }
    tokens
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            position: self.pos + 1,
        }
    }

    fn expression(&mut self, depth: usize) -> Result<Vec<Clause>, ParseError> {
        let mut clauses = Vec::new();
        let mut operator = Operator::Or;

        loop {
            let node = self.term(depth)?;
            clauses.push(Clause::new(node, operator));

            match self.peek() {
                None => break,
                Some(")") if depth > 0 => break,
                Some(")") => return Err(self.error("unbalanced ')'".to_string())),
                Some(token) => {
                    operator = Operator::find(token)
                        .ok_or_else(|| self.error(format!("expected 'and' or 'or', found '{}'", token)))?;
                    self.pos += 1;
                }
            }
        }

        Ok(clauses)
    }

    fn term(&mut self, depth: usize) -> Result<RestrictionNode, ParseError> {
        let token = self
            .next()
            .ok_or_else(|| self.error("expected a restriction".to_string()))?;

        if token == "(" {
            let clauses = self.expression(depth + 1)?;
            return match self.next().as_deref() {
                Some(")") => Ok(NestedRestriction { clauses }.into()),
                _ => Err(self.error("missing ')'".to_string())),
            };
        }
        if token == ")" || Operator::find(&token).is_some() {
            return Err(self.error(format!("expected an attribute, found '{}'", token)));
        }

        let attribute = token;
        let op = self
            .next()
            .ok_or_else(|| self.error(format!("missing comparator after '{}'", attribute)))?;
        let comparator = Comparator::find(&op)
            .ok_or_else(|| self.error(format!("unknown comparator '{}'", op)))?;

        if comparator.is_null_check() {
            return Ok(Restriction::without_value(attribute, comparator).into());
        }

        let raw = self
            .next()
            .ok_or_else(|| self.error(format!("missing value for '{}'", attribute)))?;
        let value = parse_value(&attribute, &raw);
        Ok(Restriction::new(attribute, comparator, value).into())
    }
}

/// Interpret a value token.
///
/// Severity labels on the `severity` attribute become enum values, numbers
/// and RFC 3339 timestamps are typed, everything else stays a string.
pub fn parse_value(attribute: &str, raw: &str) -> RestrictionValue {
    if attribute.eq_ignore_ascii_case("severity") || attribute.ends_with(".severity") {
        if let Some(severity) = Severity::find(raw).filter(|_| raw.parse::<i64>().is_err()) {
            return severity.into();
        }
    }
    if let Ok(i) = raw.parse::<i64>() {
        return RestrictionValue::Int(i);
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return RestrictionValue::Float(f);
        }
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return RestrictionValue::Date(date);
    }
    RestrictionValue::Str(raw.to_string())
}
