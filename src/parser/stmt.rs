//! Query and DML statement parsing.
//!
//! Clauses are parsed in the grammar's fixed order; a clause written out of
//! order is simply an unexpected token to whatever follows it.

use crate::ast::{
    DeleteStatement, Direction, Expr, FromClause, InsertMode, InsertSource, InsertStatement,
    Keyword, NullsOrder, OrderBy, SelectItem, SelectStatement, Statement, TableRef, Token,
    TtlClause, TtlUnit, UnnestItem, UpdateClause, UpdateStatement, VarDecl,
};
use crate::error::Result;

use super::Parser;

impl Parser {
    pub(crate) fn parse_query(&mut self) -> Result<Statement> {
        Ok(Statement::Query(Box::new(self.parse_select_statement()?)))
    }

    /// A full query: optional DECLARE prolog, then the select clauses in
    /// their fixed order.
    pub(crate) fn parse_select_statement(&mut self) -> Result<SelectStatement> {
        let mut prolog = Vec::new();
        if self.next_is_keyword(Keyword::Declare)? {
            loop {
                let name = self.variable()?;
                let type_def = self.parse_type()?;
                self.expect(Token::Semicolon)?;
                prolog.push(VarDecl { name, type_def });
                if !matches!(self.token(), Token::Variable(_)) {
                    break;
                }
            }
        }

        self.expect_keyword(Keyword::Select)?;
        let mut hints = Vec::new();
        while let Token::Hint(_) = self.token() {
            match self.take()? {
                Token::Hint(body) => hints.push(body),
                _ => unreachable!(),
            }
        }
        let distinct = self.next_is_keyword(Keyword::Distinct)?;
        if !distinct {
            self.next_is_keyword(Keyword::All)?;
        }

        let mut items = vec![self.parse_select_item()?];
        while self.next_is(&Token::Comma)? {
            items.push(self.parse_select_item()?);
        }

        self.expect_keyword(Keyword::From)?;
        let from = self.parse_from_clause()?;

        let r#where = if self.next_is_keyword(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.next_is_keyword(Keyword::Group)? {
            self.expect_keyword(Keyword::By)?;
            group_by.push(self.parse_expr()?);
            while self.next_is(&Token::Comma)? {
                group_by.push(self.parse_expr()?);
            }
        }

        let mut order_by = Vec::new();
        if self.next_is_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            order_by.push(self.parse_order_term()?);
            while self.next_is(&Token::Comma)? {
                order_by.push(self.parse_order_term()?);
            }
        }

        let limit = if self.next_is_keyword(Keyword::Limit)? {
            let expr = self.parse_expr()?;
            self.check_nonneg_int(&expr, "LIMIT")?;
            Some(expr)
        } else {
            None
        };
        let offset = if self.next_is_keyword(Keyword::Offset)? {
            let expr = self.parse_expr()?;
            self.check_nonneg_int(&expr, "OFFSET")?;
            Some(expr)
        } else {
            None
        };

        Ok(SelectStatement {
            prolog,
            hints,
            distinct,
            items,
            from,
            r#where,
            group_by,
            order_by,
            limit,
            offset,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.next_is(&Token::Star)? {
            return Ok(SelectItem {
                expr: Expr::Star,
                alias: None,
            });
        }
        let expr = self.parse_expr()?;
        Ok(SelectItem {
            expr,
            alias: self.parse_alias()?,
        })
    }

    /// `[AS] name` or `[AS] $name`; absent when neither follows.
    fn parse_alias(&mut self) -> Result<Option<String>> {
        let explicit = self.next_is_keyword(Keyword::As)?;
        match self.token() {
            Token::Ident(_) => Ok(Some(self.ident()?)),
            Token::Variable(_) => Ok(Some(format!("${}", self.variable()?))),
            _ if explicit => Err(self.syntax_error(&["identifier"])),
            _ => Ok(None),
        }
    }

    fn variable(&mut self) -> Result<String> {
        match self.token() {
            Token::Variable(_) => match self.take()? {
                Token::Variable(name) => Ok(name),
                _ => unreachable!(),
            },
            _ => Err(self.syntax_error(&["variable"])),
        }
    }

    fn parse_from_clause(&mut self) -> Result<FromClause> {
        let mut tables = Vec::new();
        let mut unnest = Vec::new();
        loop {
            if self.next_is_keyword(Keyword::Unnest)? {
                self.expect(Token::LParen)?;
                loop {
                    let expr = self.parse_expr()?;
                    unnest.push(UnnestItem {
                        expr,
                        alias: self.parse_alias()?,
                    });
                    if !self.next_is(&Token::Comma)? {
                        break;
                    }
                }
                self.expect(Token::RParen)?;
            } else {
                tables.push(self.parse_table_ref()?);
            }
            if !self.next_is(&Token::Comma)? {
                break;
            }
        }
        Ok(FromClause { tables, unnest })
    }

    pub(crate) fn parse_table_ref(&mut self) -> Result<TableRef> {
        let name = self.parse_qualified_name()?;
        Ok(TableRef {
            name,
            alias: self.parse_alias()?,
        })
    }

    fn parse_order_term(&mut self) -> Result<OrderBy> {
        let expr = self.parse_expr()?;
        let direction = if self.next_is_keyword(Keyword::Desc)? {
            Direction::Desc
        } else {
            self.next_is_keyword(Keyword::Asc)?;
            Direction::Asc
        };
        let nulls = if self.next_is_keyword(Keyword::Nulls)? {
            if self.next_is_keyword(Keyword::First)? {
                Some(NullsOrder::First)
            } else {
                self.expect_keyword(Keyword::Last)?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(OrderBy {
            expr,
            direction,
            nulls,
        })
    }

    // ------------------------------------------------------------------
    // DML
    // ------------------------------------------------------------------

    /// INSERT and PUT share one shape; PUT overwrites an existing row where
    /// INSERT leaves it untouched.
    pub(crate) fn parse_insert(&mut self) -> Result<Statement> {
        let mode = if self.next_is_keyword(Keyword::Put)? {
            InsertMode::Put
        } else {
            self.expect_keyword(Keyword::Insert)?;
            InsertMode::Insert
        };
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_table_ref()?;

        let columns = if self.next_is(&Token::LParen)? {
            let mut columns = vec![self.ident()?];
            while self.next_is(&Token::Comma)? {
                columns.push(self.ident()?);
            }
            self.expect(Token::RParen)?;
            Some(columns)
        } else {
            None
        };

        let source = if self.next_is_keyword(Keyword::Json)? {
            InsertSource::Json(self.parse_json_value()?)
        } else {
            self.expect_keyword(Keyword::Values)?;
            self.expect(Token::LParen)?;
            let mut values = vec![self.parse_expr()?];
            while self.next_is(&Token::Comma)? {
                values.push(self.parse_expr()?);
            }
            self.expect(Token::RParen)?;
            InsertSource::Values(values)
        };

        let ttl = if self.next_is_keyword(Keyword::Set)? {
            self.expect_keyword(Keyword::Ttl)?;
            Some(self.parse_ttl_clause()?)
        } else {
            None
        };

        Ok(Statement::Insert(InsertStatement {
            mode,
            table,
            columns,
            source,
            ttl,
            returning: self.parse_returning()?,
        }))
    }

    pub(crate) fn parse_update(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Update)?;
        let table = self.parse_table_ref()?;

        let mut updates = vec![self.parse_update_clause()?];
        while self.next_is(&Token::Comma)? {
            updates.push(self.parse_update_clause()?);
        }

        let r#where = if self.next_is_keyword(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(Statement::Update(UpdateStatement {
            table,
            updates,
            r#where,
            returning: self.parse_returning()?,
        }))
    }

    /// Targets are bare paths, parsed below the operator chain so that
    /// `SET u.age = 1` keeps its `=` as the assignment separator.
    fn parse_update_clause(&mut self) -> Result<UpdateClause> {
        if self.next_is_keyword(Keyword::Set)? {
            if self.next_is_keyword(Keyword::Ttl)? {
                return Ok(UpdateClause::SetTtl(self.parse_ttl_clause()?));
            }
            let target = self.parse_path()?;
            self.expect(Token::Eq)?;
            return Ok(UpdateClause::Set {
                target,
                value: self.parse_expr()?,
            });
        }
        if self.next_is_keyword(Keyword::Add)? {
            let target = self.parse_path()?;
            return Ok(UpdateClause::Add {
                target,
                value: self.parse_expr()?,
            });
        }
        if self.next_is_keyword(Keyword::Put)? {
            let target = self.parse_path()?;
            return Ok(UpdateClause::Put {
                target,
                value: self.parse_expr()?,
            });
        }
        if self.next_is_keyword(Keyword::Remove)? {
            return Ok(UpdateClause::Remove {
                target: self.parse_path()?,
            });
        }
        if self.next_is_keyword(Keyword::Json)? {
            self.expect_keyword(Keyword::Merge)?;
            let target = self.parse_path()?;
            self.expect_keyword(Keyword::With)?;
            self.expect_keyword(Keyword::Patch)?;
            return Ok(UpdateClause::JsonMergePatch {
                target,
                patch: self.parse_json_value()?,
            });
        }
        Err(self.syntax_error(&["SET", "ADD", "PUT", "REMOVE", "JSON"]))
    }

    pub(crate) fn parse_delete(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_ref()?;
        let r#where = if self.next_is_keyword(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Statement::Delete(DeleteStatement {
            table,
            r#where,
            returning: self.parse_returning()?,
        }))
    }

    /// `value HOURS|DAYS` or `USING TABLE DEFAULT`, the SET TTL keywords
    /// already consumed.
    pub(crate) fn parse_ttl_clause(&mut self) -> Result<TtlClause> {
        if self.next_is_keyword(Keyword::Using)? {
            self.expect_keyword(Keyword::Table)?;
            self.expect_keyword(Keyword::Default)?;
            return Ok(TtlClause::TableDefault);
        }
        let value = self.parse_expr()?;
        let unit = if self.next_is_keyword(Keyword::Hours)? {
            TtlUnit::Hours
        } else if self.next_is_keyword(Keyword::Days)? {
            TtlUnit::Days
        } else {
            return Err(self.syntax_error(&["HOURS", "DAYS"]));
        };
        Ok(TtlClause::Duration { value, unit })
    }

    fn parse_returning(&mut self) -> Result<Option<Vec<SelectItem>>> {
        if !self.next_is_keyword(Keyword::Returning)? {
            return Ok(None);
        }
        let mut items = vec![self.parse_select_item()?];
        while self.next_is(&Token::Comma)? {
            items.push(self.parse_select_item()?);
        }
        Ok(Some(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(input: &str) -> SelectStatement {
        match Parser::parse(input).unwrap() {
            Statement::Query(select) => *select,
            other => panic!("expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_full_clause_order() {
        let query = select(
            "SELECT DISTINCT name, age FROM users u \
             WHERE age > 18 GROUP BY age ORDER BY age DESC NULLS LAST \
             LIMIT 10 OFFSET 20",
        );
        assert!(query.distinct);
        assert_eq!(query.items.len(), 2);
        assert_eq!(query.from.tables[0].alias.as_deref(), Some("u"));
        assert!(query.r#where.is_some());
        assert_eq!(query.group_by.len(), 1);
        assert_eq!(query.order_by[0].direction, Direction::Desc);
        assert_eq!(query.order_by[0].nulls, Some(NullsOrder::Last));
        assert!(query.limit.is_some());
        assert!(query.offset.is_some());
    }

    #[test]
    fn test_declare_prolog_and_variable_limit() {
        let query = select(
            "DECLARE $min INTEGER; $max INTEGER; \
             SELECT id FROM users WHERE age > $min LIMIT $max",
        );
        assert_eq!(query.prolog.len(), 2);
        assert_eq!(query.prolog[0].name, "min");
        assert_eq!(query.limit, Some(Expr::VarRef("max".into())));
    }

    #[test]
    fn test_negative_limit_literal_rejected() {
        assert!(Parser::parse("SELECT * FROM t LIMIT -1").is_err());
        assert!(Parser::parse("SELECT * FROM t OFFSET 1.5").is_err());
    }

    #[test]
    fn test_unnest_in_from() {
        let query = select("SELECT $phone FROM users u, UNNEST(u.phones[] $phone)");
        assert_eq!(query.from.tables.len(), 1);
        assert_eq!(query.from.unnest.len(), 1);
        assert_eq!(query.from.unnest[0].alias.as_deref(), Some("$phone"));
    }

    #[test]
    fn test_insert_values_with_ttl_and_returning() {
        let parsed = Parser::parse(
            "INSERT INTO users (id, name) VALUES (1, 'jo') SET TTL 5 DAYS RETURNING id",
        )
        .unwrap();
        let Statement::Insert(insert) = parsed else {
            panic!("expected insert");
        };
        assert_eq!(insert.mode, InsertMode::Insert);
        assert_eq!(insert.columns.as_deref().map(<[String]>::len), Some(2));
        assert!(matches!(
            insert.ttl,
            Some(TtlClause::Duration {
                unit: TtlUnit::Days,
                ..
            })
        ));
        assert_eq!(insert.returning.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_put_json_row() {
        let parsed =
            Parser::parse(r#"PUT INTO users JSON {"id": 1, "name": "jo"}"#).unwrap();
        let Statement::Insert(insert) = parsed else {
            panic!("expected insert");
        };
        assert_eq!(insert.mode, InsertMode::Put);
        assert!(matches!(insert.source, InsertSource::Json(_)));
    }

    #[test]
    fn test_update_clause_kinds() {
        let parsed = Parser::parse(
            "UPDATE users u SET u.age = u.age + 1, ADD u.phones '555', \
             REMOVE u.fax, SET TTL USING TABLE DEFAULT WHERE u.id = 7",
        )
        .unwrap();
        let Statement::Update(update) = parsed else {
            panic!("expected update");
        };
        assert_eq!(update.updates.len(), 4);
        assert!(matches!(update.updates[0], UpdateClause::Set { .. }));
        assert!(matches!(update.updates[1], UpdateClause::Add { .. }));
        assert!(matches!(update.updates[2], UpdateClause::Remove { .. }));
        assert!(matches!(
            update.updates[3],
            UpdateClause::SetTtl(TtlClause::TableDefault)
        ));
        assert!(update.r#where.is_some());
    }

    #[test]
    fn test_json_merge_patch() {
        let parsed = Parser::parse(
            r#"UPDATE users u JSON MERGE u.info WITH PATCH {"active": false} WHERE u.id = 1"#,
        )
        .unwrap();
        let Statement::Update(update) = parsed else {
            panic!("expected update");
        };
        assert!(matches!(
            update.updates[0],
            UpdateClause::JsonMergePatch { .. }
        ));
    }

    #[test]
    fn test_delete_returning() {
        let parsed =
            Parser::parse("DELETE FROM users WHERE id = 3 RETURNING id, name").unwrap();
        let Statement::Delete(delete) = parsed else {
            panic!("expected delete");
        };
        assert!(delete.r#where.is_some());
        assert_eq!(delete.returning.map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_namespace_qualified_table() {
        let query = select("SELECT * FROM ns1:parent.child");
        let name = &query.from.tables[0].name;
        assert_eq!(name.namespace.as_deref(), Some("ns1"));
        assert_eq!(name.parts, vec!["parent", "child"]);
    }
}
