//! DDL and administrative statement parsing: tables, indexes, namespaces,
//! regions, users, roles and privileges.

use crate::ast::{
    AccountAction, AdminStatement, AlterAction, DdlStatement, DescribeTarget, FieldDef,
    GeneratedKind, GrantTarget, IdentityDef, IndexField, JsonMrCounterPath, Keyword, MrCounterKind,
    Principal, PrincipalKind, PrimaryKeyDef, SequenceOptions, ShowTarget, Statement, Token,
    TypeDef, UuidDef, Value,
};
use crate::error::Result;

use super::Parser;

/// Privilege names granted system-wide rather than on an object. A grant of
/// anything else to a bare name is a role grant.
const SYSTEM_PRIVILEGES: &[&str] = &[
    "SYSVIEW", "SYSOPER", "SYSADMIN", "DBVIEW", "DBADMIN", "USRVIEW", "USRADMIN",
];

impl Parser {
    pub(crate) fn parse_create(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Create)?;
        if self.next_is_keyword(Keyword::Table)? {
            return self.parse_create_table();
        }
        if self.at_keyword(Keyword::Index) || self.at_keyword(Keyword::Fulltext) {
            return self.parse_create_index();
        }
        if self.next_is_keyword(Keyword::Namespace)? {
            let if_not_exists = self.parse_if_not_exists()?;
            return Ok(Statement::Ddl(DdlStatement::CreateNamespace {
                name: self.ident()?,
                if_not_exists,
            }));
        }
        if self.next_is_keyword(Keyword::Region)? {
            return Ok(Statement::Ddl(DdlStatement::CreateRegion {
                name: self.ident()?,
            }));
        }
        if self.next_is_keyword(Keyword::User)? {
            return self.parse_create_user();
        }
        if self.next_is_keyword(Keyword::Role)? {
            return Ok(Statement::Admin(AdminStatement::CreateRole {
                name: self.ident()?,
            }));
        }
        Err(self.syntax_error(&["TABLE", "INDEX", "FULLTEXT", "NAMESPACE", "REGION", "USER", "ROLE"]))
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    fn parse_create_table(&mut self) -> Result<Statement> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        self.expect(Token::LParen)?;
        if self.at(&Token::RParen) {
            return Err(self.structural_error("table definition must declare at least one field"));
        }
        let mut fields = Vec::new();
        let mut primary_key = None;
        loop {
            if self.at_keyword(Keyword::Primary) {
                let key_pos = self.pos();
                let key = self.parse_primary_key()?;
                if primary_key.is_some() {
                    return Err(crate::error::Error::Structural {
                        message: "duplicate PRIMARY KEY clause".into(),
                        position: key_pos,
                    });
                }
                primary_key = Some(key);
            } else {
                fields.push(self.parse_field_def()?);
            }
            if !self.next_is(&Token::Comma)? {
                break;
            }
        }
        self.expect(Token::RParen)?;
        if fields.is_empty() {
            return Err(self.structural_error("table definition must declare at least one field"));
        }

        let ttl = if self.next_is_keyword(Keyword::Using)? {
            self.expect_keyword(Keyword::Ttl)?;
            Some(self.parse_ttl_clause()?)
        } else {
            None
        };

        let mut regions = Vec::new();
        if self.next_is_keyword(Keyword::In)? {
            self.expect_keyword(Keyword::Regions)?;
            regions.push(self.ident()?);
            while self.next_is(&Token::Comma)? {
                regions.push(self.ident()?);
            }
        }

        Ok(Statement::Ddl(DdlStatement::CreateTable {
            name,
            if_not_exists,
            fields,
            primary_key,
            ttl,
            regions,
        }))
    }

    /// `PRIMARY KEY ([SHARD(f, ...),] f, ...)`. The shard key, when given,
    /// leads the list and must not be empty.
    fn parse_primary_key(&mut self) -> Result<PrimaryKeyDef> {
        self.expect_keyword(Keyword::Primary)?;
        self.expect_keyword(Keyword::Key)?;
        self.expect(Token::LParen)?;

        let shard_key = if self.next_is_keyword(Keyword::Shard)? {
            self.expect(Token::LParen)?;
            if self.at(&Token::RParen) {
                return Err(self.structural_error("SHARD key must name at least one field"));
            }
            let mut shard = vec![self.ident()?];
            while self.next_is(&Token::Comma)? {
                shard.push(self.ident()?);
            }
            self.expect(Token::RParen)?;
            Some(shard)
        } else {
            None
        };

        let mut fields = Vec::new();
        if shard_key.is_none() || self.next_is(&Token::Comma)? {
            fields.push(self.ident()?);
            while self.next_is(&Token::Comma)? {
                fields.push(self.ident()?);
            }
        }
        self.expect(Token::RParen)?;
        Ok(PrimaryKeyDef { shard_key, fields })
    }

    /// One column definition with its augmentations: default, NOT NULL,
    /// identity, UUID, MR counter, declared JSON counters, comment.
    fn parse_field_def(&mut self) -> Result<FieldDef> {
        let name = self.ident()?;
        let type_def = self.parse_type()?;
        let mut field = FieldDef::plain(name, type_def);

        if field.type_def == TypeDef::Json && self.next_is(&Token::LParen)? {
            loop {
                field.json_mr_counters.push(self.parse_json_mr_counter()?);
                if !self.next_is(&Token::Comma)? {
                    break;
                }
            }
            self.expect(Token::RParen)?;
        }

        loop {
            if self.next_is_keyword(Keyword::Default)? {
                field.default = Some(self.parse_expr()?);
            } else if self.next_is_keyword(Keyword::Not)? {
                self.expect_keyword(Keyword::Null)?;
                field.not_null = true;
            } else if self.at_keyword(Keyword::Generated) {
                field.identity = Some(self.parse_identity()?);
            } else if self.next_is_keyword(Keyword::As)? {
                if self.next_is_keyword(Keyword::Uuid)? {
                    let generated = if self.next_is_keyword(Keyword::Generated)? {
                        self.expect_keyword(Keyword::By)?;
                        self.expect_keyword(Keyword::Default)?;
                        true
                    } else {
                        false
                    };
                    field.uuid = Some(UuidDef { generated });
                } else if self.next_is_keyword(Keyword::MrCounter)? {
                    field.mr_counter = true;
                } else {
                    return Err(self.syntax_error(&["UUID", "MR_COUNTER"]));
                }
            } else if self.next_is_keyword(Keyword::Comment)? {
                field.comment = Some(self.string_literal()?);
            } else {
                break;
            }
        }
        Ok(field)
    }

    /// `path AS INTEGER|LONG|NUMBER MR_COUNTER` inside a JSON column.
    fn parse_json_mr_counter(&mut self) -> Result<JsonMrCounterPath> {
        let mut path = vec![self.ident()?];
        while self.next_is(&Token::Dot)? {
            path.push(self.ident()?);
        }
        self.expect_keyword(Keyword::As)?;
        let kind = if self.next_is_keyword(Keyword::Integer)? {
            MrCounterKind::Integer
        } else if self.next_is_keyword(Keyword::Long)? {
            MrCounterKind::Long
        } else if self.next_is_keyword(Keyword::Number)? {
            MrCounterKind::Number
        } else {
            return Err(self.syntax_error(&["INTEGER", "LONG", "NUMBER"]));
        };
        self.expect_keyword(Keyword::MrCounter)?;
        Ok(JsonMrCounterPath { path, kind })
    }

    /// `GENERATED ALWAYS|BY DEFAULT [ON NULL] AS IDENTITY [(options)]`.
    fn parse_identity(&mut self) -> Result<IdentityDef> {
        self.expect_keyword(Keyword::Generated)?;
        let generated = if self.next_is_keyword(Keyword::Always)? {
            GeneratedKind::Always
        } else {
            self.expect_keyword(Keyword::By)?;
            self.expect_keyword(Keyword::Default)?;
            if self.next_is_keyword(Keyword::On)? {
                self.expect_keyword(Keyword::Null)?;
                GeneratedKind::ByDefaultOnNull
            } else {
                GeneratedKind::ByDefault
            }
        };
        self.expect_keyword(Keyword::As)?;
        self.expect_keyword(Keyword::Identity)?;

        let mut options = SequenceOptions::default();
        if self.next_is(&Token::LParen)? {
            while !self.at(&Token::RParen) {
                if self.next_is_keyword(Keyword::Start)? {
                    self.expect_keyword(Keyword::With)?;
                    options.start = Some(self.integer_literal()?);
                } else if self.next_is_keyword(Keyword::Increment)? {
                    self.expect_keyword(Keyword::By)?;
                    options.increment = Some(self.integer_literal()?);
                } else if self.next_is_keyword(Keyword::Minvalue)? {
                    options.min = Some(self.integer_literal()?);
                } else if self.next_is_keyword(Keyword::Maxvalue)? {
                    options.max = Some(self.integer_literal()?);
                } else if self.next_is_keyword(Keyword::Cache)? {
                    options.cache = Some(self.integer_literal()?);
                } else if self.next_is_keyword(Keyword::Cycle)? {
                    options.cycle = Some(true);
                } else if self.next_is_keyword(Keyword::No)? {
                    self.expect_keyword(Keyword::Cycle)?;
                    options.cycle = Some(false);
                } else {
                    return Err(self.syntax_error(&[
                        "START", "INCREMENT", "MINVALUE", "MAXVALUE", "CACHE", "CYCLE", "NO",
                    ]));
                }
            }
            self.expect(Token::RParen)?;
        }
        Ok(IdentityDef { generated, options })
    }

    pub(crate) fn parse_alter(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Alter)?;
        if self.next_is_keyword(Keyword::User)? {
            return self.parse_alter_user();
        }
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_qualified_name()?;

        let mut actions = Vec::new();
        if self.next_is(&Token::LParen)? {
            loop {
                if self.next_is_keyword(Keyword::Add)? {
                    actions.push(AlterAction::AddField(self.parse_field_def()?));
                } else if self.next_is_keyword(Keyword::Drop)? {
                    actions.push(AlterAction::DropField(self.ident()?));
                } else if self.next_is_keyword(Keyword::Modify)? {
                    actions.push(AlterAction::ModifyField(self.parse_field_def()?));
                } else {
                    return Err(self.syntax_error(&["ADD", "DROP", "MODIFY"]));
                }
                if !self.next_is(&Token::Comma)? {
                    break;
                }
            }
            self.expect(Token::RParen)?;
        } else if self.next_is_keyword(Keyword::Freeze)? {
            actions.push(AlterAction::Freeze);
        } else if self.next_is_keyword(Keyword::Unfreeze)? {
            actions.push(AlterAction::Unfreeze);
        } else if self.next_is_keyword(Keyword::Add)? {
            self.expect_keyword(Keyword::Regions)?;
            actions.push(AlterAction::AddRegions(self.parse_name_list()?));
        } else if self.next_is_keyword(Keyword::Drop)? {
            self.expect_keyword(Keyword::Regions)?;
            actions.push(AlterAction::DropRegions(self.parse_name_list()?));
        } else {
            return Err(self.syntax_error(&["(", "FREEZE", "UNFREEZE", "ADD", "DROP"]));
        }

        Ok(Statement::Ddl(DdlStatement::AlterTable { table, actions }))
    }

    pub(crate) fn parse_drop(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Drop)?;
        if self.next_is_keyword(Keyword::Table)? {
            let if_exists = self.parse_if_exists()?;
            return Ok(Statement::Ddl(DdlStatement::DropTable {
                name: self.parse_qualified_name()?,
                if_exists,
            }));
        }
        if self.next_is_keyword(Keyword::Index)? {
            let if_exists = self.parse_if_exists()?;
            let name = self.ident()?;
            self.expect_keyword(Keyword::On)?;
            return Ok(Statement::Ddl(DdlStatement::DropIndex {
                name,
                table: self.parse_qualified_name()?,
                if_exists,
            }));
        }
        if self.next_is_keyword(Keyword::Namespace)? {
            let if_exists = self.parse_if_exists()?;
            let name = self.ident()?;
            return Ok(Statement::Ddl(DdlStatement::DropNamespace {
                name,
                if_exists,
                cascade: self.next_is_keyword(Keyword::Cascade)?,
            }));
        }
        if self.next_is_keyword(Keyword::Region)? {
            return Ok(Statement::Ddl(DdlStatement::DropRegion {
                name: self.ident()?,
            }));
        }
        if self.next_is_keyword(Keyword::User)? {
            return Ok(Statement::Admin(AdminStatement::DropUser {
                name: self.ident()?,
            }));
        }
        if self.next_is_keyword(Keyword::Role)? {
            return Ok(Statement::Admin(AdminStatement::DropRole {
                name: self.ident()?,
            }));
        }
        Err(self.syntax_error(&["TABLE", "INDEX", "NAMESPACE", "REGION", "USER", "ROLE"]))
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    fn parse_create_index(&mut self) -> Result<Statement> {
        let fulltext = self.next_is_keyword(Keyword::Fulltext)?;
        self.expect_keyword(Keyword::Index)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.ident()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.parse_qualified_name()?;

        self.expect(Token::LParen)?;
        let mut fields = vec![self.parse_index_field()?];
        while self.next_is(&Token::Comma)? {
            fields.push(self.parse_index_field()?);
        }
        self.expect(Token::RParen)?;

        let mut properties = Vec::new();
        if fulltext && self.next_is_keyword(Keyword::With)? {
            match self.parse_json_value()? {
                Value::Map(pairs) => properties = pairs,
                _ => return Err(self.syntax_error(&["JSON object"])),
            }
        }

        Ok(Statement::Ddl(DdlStatement::CreateIndex {
            name,
            table,
            if_not_exists,
            fields,
            fulltext,
            properties,
        }))
    }

    /// One indexed path, optionally typed for paths into JSON
    /// (`info.age AS INTEGER`).
    fn parse_index_field(&mut self) -> Result<IndexField> {
        let path = self.parse_path()?;
        let type_def = if self.next_is_keyword(Keyword::As)? {
            Some(self.parse_type()?)
        } else {
            None
        };
        Ok(IndexField { path, type_def })
    }

    // ------------------------------------------------------------------
    // Regions
    // ------------------------------------------------------------------

    pub(crate) fn parse_set_local_region(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Set)?;
        self.expect_keyword(Keyword::Local)?;
        self.expect_keyword(Keyword::Region)?;
        Ok(Statement::Ddl(DdlStatement::SetLocalRegion {
            name: self.ident()?,
        }))
    }

    // ------------------------------------------------------------------
    // Users and roles
    // ------------------------------------------------------------------

    fn parse_create_user(&mut self) -> Result<Statement> {
        let name = self.ident()?;
        let password = if self.next_is_keyword(Keyword::Identified)? {
            self.expect_keyword(Keyword::By)?;
            Some(self.string_literal()?)
        } else {
            None
        };
        let admin = self.next_is_keyword(Keyword::Admin)?;
        Ok(Statement::Admin(AdminStatement::CreateUser {
            name,
            password,
            admin,
        }))
    }

    fn parse_alter_user(&mut self) -> Result<Statement> {
        let name = self.ident()?;
        let mut password = None;
        let mut account = None;
        loop {
            if self.next_is_keyword(Keyword::Identified)? {
                self.expect_keyword(Keyword::By)?;
                password = Some(self.string_literal()?);
            } else if self.next_is_keyword(Keyword::Account)? {
                account = Some(if self.next_is_keyword(Keyword::Lock)? {
                    AccountAction::Lock
                } else {
                    self.expect_keyword(Keyword::Unlock)?;
                    AccountAction::Unlock
                });
            } else {
                break;
            }
        }
        Ok(Statement::Admin(AdminStatement::AlterUser {
            name,
            password,
            account,
        }))
    }

    pub(crate) fn parse_grant(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Grant)?;
        let target = self.parse_grant_target(Keyword::To)?;
        Ok(Statement::Admin(AdminStatement::Grant(target)))
    }

    pub(crate) fn parse_revoke(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Revoke)?;
        let target = self.parse_grant_target(Keyword::From)?;
        Ok(Statement::Admin(AdminStatement::Revoke(target)))
    }

    /// The shared body of GRANT and REVOKE; only the grantee-introducing
    /// keyword differs (TO versus FROM).
    ///
    /// Three forms share one leading name list. ON makes it an object
    /// privilege grant; a USER/ROLE-marked grantee makes it a role grant;
    /// otherwise names drawn entirely from the system privilege set go to
    /// a role, and anything else is a role grant to a bare principal.
    fn parse_grant_target(&mut self, grantee_keyword: Keyword) -> Result<GrantTarget> {
        let names = self.parse_name_list()?;

        if self.next_is_keyword(Keyword::On)? {
            let object = self.parse_qualified_name()?;
            self.expect_keyword(grantee_keyword)?;
            return Ok(GrantTarget::ObjectPrivileges {
                privileges: names,
                object,
                role: self.ident()?,
            });
        }

        self.expect_keyword(grantee_keyword)?;
        if self.next_is_keyword(Keyword::User)? {
            return Ok(GrantTarget::Roles {
                roles: names,
                grantee: Principal {
                    kind: Some(PrincipalKind::User),
                    name: self.ident()?,
                },
            });
        }
        if self.next_is_keyword(Keyword::Role)? {
            return Ok(GrantTarget::Roles {
                roles: names,
                grantee: Principal {
                    kind: Some(PrincipalKind::Role),
                    name: self.ident()?,
                },
            });
        }

        let all_system = names
            .iter()
            .all(|name| SYSTEM_PRIVILEGES.contains(&name.to_uppercase().as_str()));
        if all_system {
            Ok(GrantTarget::SystemPrivileges {
                privileges: names,
                role: self.ident()?,
            })
        } else {
            Ok(GrantTarget::Roles {
                roles: names,
                grantee: Principal {
                    kind: None,
                    name: self.ident()?,
                },
            })
        }
    }

    fn parse_name_list(&mut self) -> Result<Vec<String>> {
        let mut names = vec![self.ident()?];
        while self.next_is(&Token::Comma)? {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub(crate) fn parse_describe(&mut self) -> Result<Statement> {
        if !self.next_is_keyword(Keyword::Describe)? {
            self.expect_keyword(Keyword::Desc)?;
        }
        let as_json = self.parse_as_json()?;
        let target = if self.next_is_keyword(Keyword::Index)? {
            let name = self.ident()?;
            self.expect_keyword(Keyword::On)?;
            DescribeTarget::Index {
                name,
                table: self.parse_qualified_name()?,
            }
        } else {
            self.expect_keyword(Keyword::Table)?;
            let name = self.parse_qualified_name()?;
            let mut fields = Vec::new();
            if self.next_is(&Token::LParen)? {
                fields.push(self.parse_field_path()?);
                while self.next_is(&Token::Comma)? {
                    fields.push(self.parse_field_path()?);
                }
                self.expect(Token::RParen)?;
            }
            DescribeTarget::Table { name, fields }
        };
        Ok(Statement::Admin(AdminStatement::Describe { as_json, target }))
    }

    fn parse_field_path(&mut self) -> Result<String> {
        let mut path = self.ident()?;
        while self.next_is(&Token::Dot)? {
            path.push('.');
            path.push_str(&self.ident()?);
        }
        Ok(path)
    }

    pub(crate) fn parse_show(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::Show)?;
        let as_json = self.parse_as_json()?;
        let target = if self.next_is_keyword(Keyword::Tables)? {
            ShowTarget::Tables
        } else if self.next_is_keyword(Keyword::Table)? {
            ShowTarget::Table(self.parse_qualified_name()?)
        } else if self.next_is_keyword(Keyword::Indexes)? {
            self.expect_keyword(Keyword::On)?;
            ShowTarget::Indexes {
                table: self.parse_qualified_name()?,
            }
        } else if self.next_is_keyword(Keyword::Users)? {
            ShowTarget::Users
        } else if self.next_is_keyword(Keyword::User)? {
            ShowTarget::User(self.ident()?)
        } else if self.next_is_keyword(Keyword::Roles)? {
            ShowTarget::Roles
        } else if self.next_is_keyword(Keyword::Role)? {
            ShowTarget::Role(self.ident()?)
        } else if self.next_is_keyword(Keyword::Namespaces)? {
            ShowTarget::Namespaces
        } else if self.next_is_keyword(Keyword::Regions)? {
            ShowTarget::Regions
        } else {
            return Err(self.syntax_error(&[
                "TABLES", "TABLE", "INDEXES", "USERS", "USER", "ROLES", "ROLE", "NAMESPACES",
                "REGIONS",
            ]));
        };
        Ok(Statement::Admin(AdminStatement::Show { as_json, target }))
    }

    fn parse_as_json(&mut self) -> Result<bool> {
        if self.next_is_keyword(Keyword::As)? {
            self.expect_keyword(Keyword::Json)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ------------------------------------------------------------------
    // Small shared pieces
    // ------------------------------------------------------------------

    fn parse_if_not_exists(&mut self) -> Result<bool> {
        if self.next_is_keyword(Keyword::If)? {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool> {
        if self.next_is_keyword(Keyword::If)? {
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
