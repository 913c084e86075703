//! Expression parsing.
//!
//! One method per precedence level, lowest first. Each method parses its
//! operands at the next-tighter level and folds same-level operators left to
//! right, so the chain itself encodes both precedence and associativity:
//!
//! ```text
//! or > and > not > is-null / is-of-type > comparison, between, in, exists
//!    > || > + - > * / > unary + - > path steps > primary
//! ```
//!
//! Parentheses re-enter the chain at the top and are not kept as nodes.

use crate::ast::{
    ArithOp, CompareOp, Expr, ExtractUnit, Keyword, MapFilterKind, MulOp, PathStep, Quantifier,
    Sign, Token, TypeSpec, Value,
};
use crate::error::Result;

use super::Parser;

impl Parser {
    /// Parses one expression at the lowest precedence level.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut expr = self.parse_and()?;
        while self.next_is_keyword(Keyword::Or)? {
            expr = Expr::Or(Box::new(expr), Box::new(self.parse_and()?));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut expr = self.parse_not()?;
        while self.next_is_keyword(Keyword::And)? {
            expr = Expr::And(Box::new(expr), Box::new(self.parse_not()?));
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if self.next_is_keyword(Keyword::Not)? {
            Ok(Expr::Not(Box::new(self.parse_not()?)))
        } else {
            self.parse_is()
        }
    }

    /// A parenthesized expression list may only feed the left side of IN;
    /// everywhere else it is not a value.
    fn reject_tuple(&self, expr: Expr) -> Result<Expr> {
        if matches!(expr, Expr::Tuple(_)) {
            Err(self.structural_error(
                "parenthesized expression list is only allowed on the left of IN",
            ))
        } else {
            Ok(expr)
        }
    }

    /// `expr IS [NOT] NULL` and `expr IS [NOT] OF TYPE (...)`. These are the
    /// only productions led by IS, so no lookahead is needed; negation lives
    /// on the node rather than wrapping it in NOT.
    fn parse_is(&mut self) -> Result<Expr> {
        let mut expr = self.parse_cond()?;
        while self.next_is_keyword(Keyword::Is)? {
            let negated = self.next_is_keyword(Keyword::Not)?;
            if self.next_is_keyword(Keyword::Null)? {
                expr = Expr::IsNull {
                    expr: Box::new(expr),
                    negated,
                };
            } else if self.next_is_keyword(Keyword::Of)? {
                self.expect_keyword(Keyword::Type)?;
                expr = Expr::IsOfType {
                    expr: Box::new(expr),
                    negated,
                    types: self.parse_type_specs()?,
                };
            } else {
                return Err(self.syntax_error(&["NULL", "OF"]));
            }
        }
        Ok(expr)
    }

    /// The non-chaining conditional level: comparison, BETWEEN, IN and
    /// EXISTS. At most one of these applies, so there is no fold loop.
    fn parse_cond(&mut self) -> Result<Expr> {
        if self.next_is_keyword(Keyword::Exists)? {
            let operand = self.parse_concat()?;
            return Ok(Expr::Exists(Box::new(self.reject_tuple(operand)?)));
        }
        let left = self.parse_concat()?;

        if self.next_is_keyword(Keyword::Between)? {
            let left = self.reject_tuple(left)?;
            // Bounds parse below AND so the separator is not eaten as a
            // logical conjunction.
            let low = self.parse_concat()?;
            let low = self.reject_tuple(low)?;
            self.expect_keyword(Keyword::And)?;
            let high = self.parse_concat()?;
            let high = self.reject_tuple(high)?;
            return Ok(Expr::Between {
                expr: Box::new(left),
                low: Box::new(low),
                high: Box::new(high),
            });
        }

        if let Some(op) = self.comparison_op() {
            let left = self.reject_tuple(left)?;
            self.advance()?;
            let quantifier = if self.next_is_keyword(Keyword::Any)? {
                Quantifier::Any
            } else if self.next_is_keyword(Keyword::Every)? {
                Quantifier::Every
            } else {
                Quantifier::None
            };
            let right = self.parse_concat()?;
            return Ok(Expr::Comparison {
                op,
                quantifier,
                left: Box::new(left),
                right: Box::new(self.reject_tuple(right)?),
            });
        }

        if self.at_keyword(Keyword::In) {
            return self.parse_in(left);
        }

        // A parenthesized expression list has no meaning of its own.
        if matches!(left, Expr::Tuple(_)) {
            return Err(self.structural_error(
                "parenthesized expression list is only allowed on the left of IN",
            ));
        }
        Ok(left)
    }

    fn comparison_op(&self) -> Option<CompareOp> {
        match self.token() {
            Token::Eq => Some(CompareOp::Eq),
            Token::NotEq => Some(CompareOp::NotEq),
            Token::Lt => Some(CompareOp::Lt),
            Token::LtEq => Some(CompareOp::LtEq),
            Token::Gt => Some(CompareOp::Gt),
            Token::GtEq => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    /// The three IN forms: value list, multi-key row list, and subquery.
    /// Every row must have the same arity as the target list.
    fn parse_in(&mut self, left: Expr) -> Result<Expr> {
        self.expect_keyword(Keyword::In)?;
        let targets = match left {
            Expr::Tuple(items) => items,
            other => vec![other],
        };
        self.expect(Token::LParen)?;

        if self.at_keyword(Keyword::Select) || self.at_keyword(Keyword::Declare) {
            let subquery = self.parse_select_statement()?;
            self.expect(Token::RParen)?;
            return Ok(Expr::InSubquery {
                targets,
                subquery: Box::new(subquery),
            });
        }

        let mut rows = Vec::new();
        loop {
            let row = if targets.len() > 1 {
                self.expect(Token::LParen)?;
                let mut row = vec![self.parse_expr()?];
                while self.next_is(&Token::Comma)? {
                    row.push(self.parse_expr()?);
                }
                self.expect(Token::RParen)?;
                row
            } else {
                vec![self.parse_expr()?]
            };
            if row.len() != targets.len() {
                return Err(self.structural_error(format!(
                    "IN row has {} values but {} search keys",
                    row.len(),
                    targets.len()
                )));
            }
            rows.push(row);
            if !self.next_is(&Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::InList { targets, rows })
    }

    /// Type alternatives of IS OF TYPE: `([ONLY] type, ...)`.
    fn parse_type_specs(&mut self) -> Result<Vec<TypeSpec>> {
        self.expect(Token::LParen)?;
        let mut specs = Vec::new();
        loop {
            let only = self.next_is_keyword(Keyword::Only)?;
            specs.push(TypeSpec {
                only,
                type_def: self.parse_type()?,
            });
            if !self.next_is(&Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(specs)
    }

    fn parse_concat(&mut self) -> Result<Expr> {
        let mut expr = self.parse_additive()?;
        while self.next_is(&Token::Concat)? {
            let right = self.parse_additive()?;
            expr = Expr::Concat(
                Box::new(self.reject_tuple(expr)?),
                Box::new(self.reject_tuple(right)?),
            );
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.token() {
                Token::Plus => ArithOp::Add,
                Token::Minus => ArithOp::Subtract,
                _ => return Ok(expr),
            };
            self.advance()?;
            let right = self.parse_multiplicative()?;
            expr = Expr::Arithmetic {
                op,
                left: Box::new(self.reject_tuple(expr)?),
                right: Box::new(self.reject_tuple(right)?),
            };
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.token() {
                Token::Star => MulOp::Multiply,
                Token::Slash => MulOp::Divide,
                _ => return Ok(expr),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            expr = Expr::Multiplicative {
                op,
                left: Box::new(self.reject_tuple(expr)?),
                right: Box::new(self.reject_tuple(right)?),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let sign = match self.token() {
            Token::Plus => Sign::Plus,
            Token::Minus => Sign::Minus,
            _ => return self.parse_path(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            sign,
            expr: Box::new(self.reject_tuple(operand)?),
        })
    }

    /// A primary followed by any number of navigation steps. A stepless
    /// path stays the bare primary. Also entered directly where the grammar
    /// wants a bare path, like update targets and index fields.
    pub(crate) fn parse_path(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        let mut steps = Vec::new();
        loop {
            if self.next_is(&Token::Dot)? {
                steps.push(self.parse_dot_step()?);
            } else if self.next_is(&Token::LBracket)? {
                steps.push(self.parse_bracket_step()?);
            } else {
                break;
            }
        }
        if steps.is_empty() {
            Ok(base)
        } else {
            Ok(Expr::Path {
                base: Box::new(self.reject_tuple(base)?),
                steps,
            })
        }
    }

    fn parse_dot_step(&mut self) -> Result<PathStep> {
        // .keys(...) / .values(...) are map filter steps; any other name,
        // keyword included, selects a field.
        for (keyword, kind) in [
            (Keyword::Keys, MapFilterKind::Keys),
            (Keyword::Values, MapFilterKind::Values),
        ] {
            if self.at_keyword(keyword) && *self.peek(1)? == Token::LParen {
                self.advance()?;
                self.expect(Token::LParen)?;
                let predicate = if self.at(&Token::RParen) {
                    None
                } else {
                    Some(Box::new(self.parse_expr()?))
                };
                self.expect(Token::RParen)?;
                return Ok(PathStep::MapFilter { kind, predicate });
            }
        }
        Ok(PathStep::MapField(self.ident_or_keyword()?))
    }

    /// The three bracketed step forms. An index and a single-element filter
    /// look the same until parsed; the shape of the expression decides:
    /// a boolean-topped expression is a filter, anything else an index.
    fn parse_bracket_step(&mut self) -> Result<PathStep> {
        if self.next_is(&Token::RBracket)? {
            return Ok(PathStep::ArrayFilter(None));
        }
        if self.next_is(&Token::Colon)? {
            let high = if self.at(&Token::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            self.expect(Token::RBracket)?;
            return Ok(PathStep::ArraySlice { low: None, high });
        }
        let expr = self.parse_expr()?;
        if self.next_is(&Token::Colon)? {
            let high = if self.at(&Token::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            self.expect(Token::RBracket)?;
            return Ok(PathStep::ArraySlice {
                low: Some(Box::new(expr)),
                high,
            });
        }
        self.expect(Token::RBracket)?;
        if expr.is_predicate() {
            Ok(PathStep::ArrayFilter(Some(Box::new(expr))))
        } else {
            Ok(PathStep::ArrayIndex(Box::new(expr)))
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.token() {
            Token::Integer(n) => {
                let n = *n;
                self.advance()?;
                Ok(Expr::Literal(Value::Int(n)))
            }
            Token::Float(f) => {
                let f = *f;
                self.advance()?;
                Ok(Expr::Literal(Value::Float(f)))
            }
            Token::Number(d) => {
                let d = *d;
                self.advance()?;
                Ok(Expr::Literal(Value::Number(d)))
            }
            Token::String(_) => Ok(Expr::Literal(Value::String(self.string_literal()?))),
            Token::Keyword(Keyword::True) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Bool(true)))
            }
            Token::Keyword(Keyword::False) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Bool(false)))
            }
            Token::Keyword(Keyword::Null) => {
                self.advance()?;
                Ok(Expr::Literal(Value::Null))
            }
            Token::Variable(_) => match self.take()? {
                Token::Variable(name) => Ok(Expr::VarRef(name)),
                _ => unreachable!(),
            },
            Token::LParen => self.parse_parenthesized(),
            Token::LBracket => self.parse_array_constructor(),
            Token::LBrace => self.parse_map_constructor(),
            Token::Keyword(Keyword::Case) => self.parse_case(),
            Token::Keyword(Keyword::Cast) => self.parse_cast(),
            Token::Keyword(Keyword::Extract) => self.parse_extract(),
            Token::Keyword(Keyword::SeqTransform) => self.parse_transform(),
            // Non-reserved keywords double as ordinary names here, so
            // columns called type, year or comment keep working.
            Token::Ident(_) => {
                let name = self.ident()?;
                if self.at(&Token::LParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Expr::ColumnRef(name))
                }
            }
            Token::Keyword(keyword) if !keyword.is_reserved() => {
                let name = self.ident()?;
                if self.at(&Token::LParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(Expr::ColumnRef(name))
                }
            }
            _ => Err(self.syntax_error(&["expression"])),
        }
    }

    /// `(expr)`, `(e1, e2, ...)` or `(SELECT ...)`. A single parenthesized
    /// expression unwraps to the expression itself.
    fn parse_parenthesized(&mut self) -> Result<Expr> {
        self.expect(Token::LParen)?;
        if self.at_keyword(Keyword::Select) || self.at_keyword(Keyword::Declare) {
            let subquery = self.parse_select_statement()?;
            self.expect(Token::RParen)?;
            return Ok(Expr::Subquery(Box::new(subquery)));
        }
        let first = self.parse_expr()?;
        if !self.next_is(&Token::Comma)? {
            self.expect(Token::RParen)?;
            return Ok(first);
        }
        let mut items = vec![first];
        loop {
            items.push(self.parse_expr()?);
            if !self.next_is(&Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::Tuple(items))
    }

    fn parse_array_constructor(&mut self) -> Result<Expr> {
        self.expect(Token::LBracket)?;
        let mut elements = Vec::new();
        if !self.at(&Token::RBracket) {
            loop {
                elements.push(self.parse_expr()?);
                if !self.next_is(&Token::Comma)? {
                    break;
                }
            }
        }
        self.expect(Token::RBracket)?;
        Ok(Expr::ArrayConstructor(elements))
    }

    /// `{k: v, ...}` with computed keys. Bare names and keywords in key
    /// position read as string constants, matching JSON habit.
    fn parse_map_constructor(&mut self) -> Result<Expr> {
        self.expect(Token::LBrace)?;
        let mut entries = Vec::new();
        if !self.at(&Token::RBrace) {
            loop {
                let bare_key = matches!(self.token(), Token::Ident(_) | Token::Keyword(_))
                    && *self.peek(1)? == Token::Colon;
                let key = if bare_key {
                    Expr::Literal(Value::String(self.ident_or_keyword()?))
                } else {
                    self.parse_expr()?
                };
                self.expect(Token::Colon)?;
                entries.push((key, self.parse_expr()?));
                if !self.next_is(&Token::Comma)? {
                    break;
                }
            }
        }
        self.expect(Token::RBrace)?;
        Ok(Expr::MapConstructor(entries))
    }

    fn parse_case(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::Case)?;
        let mut when_then = Vec::new();
        self.expect_keyword(Keyword::When)?;
        loop {
            let when = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            when_then.push((when, self.parse_expr()?));
            if !self.next_is_keyword(Keyword::When)? {
                break;
            }
        }
        let else_expr = if self.next_is_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case {
            when_then,
            else_expr,
        })
    }

    fn parse_cast(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(Token::LParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let target = self.parse_type()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            target,
        })
    }

    fn parse_extract(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::Extract)?;
        self.expect(Token::LParen)?;
        let unit = match self.token() {
            Token::Keyword(Keyword::Year) => ExtractUnit::Year,
            Token::Keyword(Keyword::Month) => ExtractUnit::Month,
            Token::Keyword(Keyword::Day) => ExtractUnit::Day,
            Token::Keyword(Keyword::Hour) => ExtractUnit::Hour,
            Token::Keyword(Keyword::Minute) => ExtractUnit::Minute,
            Token::Keyword(Keyword::Second) => ExtractUnit::Second,
            Token::Keyword(Keyword::Millisecond) => ExtractUnit::Millisecond,
            Token::Keyword(Keyword::Microsecond) => ExtractUnit::Microsecond,
            Token::Keyword(Keyword::Nanosecond) => ExtractUnit::Nanosecond,
            Token::Keyword(Keyword::Week) => ExtractUnit::Week,
            _ => return Err(self.syntax_error(&["datetime unit"])),
        };
        self.advance()?;
        self.expect_keyword(Keyword::From)?;
        let expr = self.parse_expr()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Extract {
            unit,
            expr: Box::new(expr),
        })
    }

    fn parse_transform(&mut self) -> Result<Expr> {
        self.expect_keyword(Keyword::SeqTransform)?;
        self.expect(Token::LParen)?;
        let input = self.parse_expr()?;
        self.expect(Token::Comma)?;
        let mapper = self.parse_expr()?;
        self.expect(Token::RParen)?;
        Ok(Expr::Transform {
            input: Box::new(input),
            mapper: Box::new(mapper),
        })
    }

    /// `name(args)`. A bare `*` is accepted as an argument for the
    /// aggregate form `count(*)`.
    fn parse_function_call(&mut self, name: String) -> Result<Expr> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.at(&Token::RParen) {
            loop {
                if self.next_is(&Token::Star)? {
                    args.push(Expr::Star);
                } else {
                    args.push(self.parse_expr()?);
                }
                if !self.next_is(&Token::Comma)? {
                    break;
                }
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::FunctionCall { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(input: &str) -> Expr {
        let mut parser = Parser::new(input).unwrap();
        let expr = parser.parse_expr().unwrap();
        assert!(parser.at(&Token::Eof), "trailing tokens in {input:?}");
        expr
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let parsed = expr("1 + 2 * 3");
        match parsed {
            Expr::Arithmetic { op, right, .. } => {
                assert_eq!(op, ArithOp::Add);
                assert!(matches!(*right, Expr::Multiplicative { .. }));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        // (a - b) - c
        match expr("a - b - c") {
            Expr::Arithmetic { op, left, right } => {
                assert_eq!(op, ArithOp::Subtract);
                assert!(matches!(*left, Expr::Arithmetic { .. }));
                assert_eq!(*right, Expr::ColumnRef("c".into()));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_index_versus_filter_step() {
        match expr("t.a[2]") {
            Expr::Path { steps, .. } => {
                assert!(matches!(steps[1], PathStep::ArrayIndex(_)));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        match expr("t.a[$element > 2]") {
            Expr::Path { steps, .. } => {
                assert!(matches!(steps[1], PathStep::ArrayFilter(Some(_))));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_stepless_path_stays_bare() {
        assert_eq!(expr("a"), Expr::ColumnRef("a".into()));
    }

    #[test]
    fn test_is_null_and_is_of_type() {
        assert!(matches!(
            expr("a.b IS NOT NULL"),
            Expr::IsNull { negated: true, .. }
        ));
        match expr("info IS OF TYPE (ONLY INTEGER, STRING)") {
            Expr::IsOfType {
                negated, types, ..
            } => {
                assert!(!negated);
                assert_eq!(types.len(), 2);
                assert!(types[0].only);
                assert!(!types[1].only);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_multi_key_in_checks_row_arity() {
        match expr("(a, b) IN ((1, 2), (3, 4))") {
            Expr::InList { targets, rows } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(rows.len(), 2);
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        let mut parser = Parser::new("(a, b) IN ((1, 2, 3))").unwrap();
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_dangling_tuple_rejected() {
        let mut parser = Parser::new("(a, b) + 1").unwrap();
        assert!(parser.parse_expr().is_err());
    }

    #[test]
    fn test_quantified_comparison() {
        match expr("zip = ANY addresses.zip") {
            Expr::Comparison { quantifier, .. } => assert_eq!(quantifier, Quantifier::Any),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_map_filter_step_keeps_field_fallback() {
        match expr("m.keys($key != 'x')") {
            Expr::Path { steps, .. } => {
                assert!(matches!(
                    steps[0],
                    PathStep::MapFilter {
                        kind: MapFilterKind::Keys,
                        predicate: Some(_)
                    }
                ));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        // without parens, keys is an ordinary field name
        match expr("m.keys") {
            Expr::Path { steps, .. } => {
                assert_eq!(steps[0], PathStep::MapField("keys".into()));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }
}
