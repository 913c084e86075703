//! Declared type parsing, shared by DDL field definitions, DECLARE prologs,
//! CAST targets and IS OF TYPE tests.

use crate::ast::{Keyword, RecordField, Token, TypeDef};
use crate::error::Result;

use super::Parser;

impl Parser {
    /// Parses one declared type.
    pub(crate) fn parse_type(&mut self) -> Result<TypeDef> {
        let keyword = match self.token() {
            Token::Keyword(keyword) => *keyword,
            _ => return Err(self.syntax_error(&["type name"])),
        };
        self.advance()?;
        match keyword {
            Keyword::Integer => Ok(TypeDef::Integer),
            Keyword::Long => Ok(TypeDef::Long),
            Keyword::Float => Ok(TypeDef::Float),
            Keyword::Double => Ok(TypeDef::Double),
            Keyword::Number => Ok(TypeDef::Number),
            Keyword::String => Ok(TypeDef::String),
            Keyword::Boolean => Ok(TypeDef::Boolean),
            Keyword::Json => Ok(TypeDef::Json),
            Keyword::Any => Ok(TypeDef::Any),
            Keyword::AnyAtomic => Ok(TypeDef::AnyAtomic),
            Keyword::AnyJsonAtomic => Ok(TypeDef::AnyJsonAtomic),
            Keyword::AnyRecord => Ok(TypeDef::AnyRecord),
            Keyword::Binary => {
                let fixed_size = if self.next_is(&Token::LParen)? {
                    let size = self.integer_literal()?;
                    if size <= 0 {
                        return Err(
                            self.structural_error("BINARY size must be a positive integer")
                        );
                    }
                    self.expect(Token::RParen)?;
                    Some(size as u64)
                } else {
                    None
                };
                Ok(TypeDef::Binary { fixed_size })
            }
            Keyword::Timestamp => {
                let precision = if self.next_is(&Token::LParen)? {
                    let precision = self.integer_literal()?;
                    if !(0..=9).contains(&precision) {
                        return Err(
                            self.structural_error("TIMESTAMP precision must be between 0 and 9")
                        );
                    }
                    self.expect(Token::RParen)?;
                    Some(precision as u32)
                } else {
                    None
                };
                Ok(TypeDef::Timestamp { precision })
            }
            Keyword::Enum => {
                self.expect(Token::LParen)?;
                let mut values = vec![self.ident()?];
                while self.next_is(&Token::Comma)? {
                    values.push(self.ident()?);
                }
                self.expect(Token::RParen)?;
                Ok(TypeDef::Enum { values })
            }
            Keyword::Array => {
                self.expect(Token::LParen)?;
                let element = self.parse_type()?;
                self.expect(Token::RParen)?;
                Ok(TypeDef::Array(Box::new(element)))
            }
            Keyword::Map => {
                self.expect(Token::LParen)?;
                let value = self.parse_type()?;
                self.expect(Token::RParen)?;
                Ok(TypeDef::Map(Box::new(value)))
            }
            Keyword::Record => {
                self.expect(Token::LParen)?;
                let mut fields = vec![self.parse_record_field()?];
                while self.next_is(&Token::Comma)? {
                    fields.push(self.parse_record_field()?);
                }
                self.expect(Token::RParen)?;
                for (i, field) in fields.iter().enumerate() {
                    if fields[..i].iter().any(|f| f.name == field.name) {
                        return Err(self.structural_error(format!(
                            "duplicate field '{}' in RECORD type",
                            field.name
                        )));
                    }
                }
                Ok(TypeDef::Record { fields })
            }
            _ => Err(self.syntax_error(&["type name"])),
        }
    }

    fn parse_record_field(&mut self) -> Result<RecordField> {
        let name = self.ident()?;
        let type_def = self.parse_type()?;
        let mut default = None;
        let mut not_null = false;
        loop {
            if self.next_is_keyword(Keyword::Default)? {
                default = Some(self.parse_expr()?);
            } else if self.next_is_keyword(Keyword::Not)? {
                self.expect_keyword(Keyword::Null)?;
                not_null = true;
            } else {
                break;
            }
        }
        Ok(RecordField {
            name,
            type_def,
            default,
            not_null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<TypeDef> {
        Parser::new(input)?.parse_type()
    }

    #[test]
    fn test_nested_structured_types() {
        let parsed = parse("MAP(ARRAY(RECORD(a INTEGER, b STRING NOT NULL)))").unwrap();
        let TypeDef::Map(value) = parsed else {
            panic!("expected map");
        };
        let TypeDef::Array(element) = *value else {
            panic!("expected array");
        };
        let TypeDef::Record { fields } = *element else {
            panic!("expected record");
        };
        assert_eq!(fields.len(), 2);
        assert!(fields[1].not_null);
    }

    #[test]
    fn test_duplicate_record_field_rejected() {
        assert!(parse("RECORD(a INTEGER, a STRING)").is_err());
    }

    #[test]
    fn test_timestamp_precision_bounds() {
        assert_eq!(
            parse("TIMESTAMP(9)").unwrap(),
            TypeDef::Timestamp { precision: Some(9) }
        );
        assert!(parse("TIMESTAMP(10)").is_err());
    }

    #[test]
    fn test_fixed_binary() {
        assert_eq!(
            parse("BINARY(16)").unwrap(),
            TypeDef::Binary {
                fixed_size: Some(16)
            }
        );
        assert!(parse("BINARY(0)").is_err());
    }
}
