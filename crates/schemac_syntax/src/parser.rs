//! Recursive descent parser for GraphQL SDL.
//!
//! Parsing stops at the first token the grammar does not accept; there is no
//! error recovery and no partial result.

use crate::lexer::Lexer;
use crate::string::{block_string_value, unescape};
use crate::token::{Token, TokenKind};
use schemac_core::{
    is_core_directive, CompileError, Construct, LineIndex, Origin, RawDecl, RawDeclKind, RawField,
    RawInputValue, RawSchema, Result, Span, TypeRef, UnsupportedPolicy, Value,
};
use tracing::debug;

/// Maximum nesting of list types and of list or object values.
pub const MAX_DEPTH: usize = 128;

/// Parser for GraphQL SDL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lines: LineIndex<'a>,
    current: Token,
    policy: UnsupportedPolicy,
    schema: RawSchema,
    schema_defined: bool,
    depth: usize,
}

/// Parses SDL text into raw declarations.
///
/// # Errors
///
/// Returns [`CompileError::Syntax`] on malformed input and
/// [`CompileError::UnsupportedConstruct`] under [`UnsupportedPolicy::Reject`].
pub fn parse_schema(source: &str, policy: UnsupportedPolicy) -> Result<RawSchema> {
    let mut parser = Parser::new(source, policy);
    parser.parse_document()?;
    Ok(parser.finish())
}

/// Parses a single constant GraphQL value, e.g. an introspection `defaultValue`.
///
/// # Errors
///
/// Returns [`CompileError::Syntax`] if `source` is not exactly one value.
pub fn parse_value(source: &str) -> Result<Value> {
    let mut parser = Parser::new(source, UnsupportedPolicy::Skip);
    parser.check_token()?;
    let value = parser.parse_const_value()?;
    parser.expect(TokenKind::Eof)?;
    Ok(value)
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    #[must_use]
    pub fn new(source: &'a str, policy: UnsupportedPolicy) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            lines: LineIndex::new(source),
            current,
            policy,
            schema: RawSchema::new(Origin::Sdl { line: 1, column: 1 }),
            schema_defined: false,
            depth: 0,
        }
    }

    /// Returns the current token kind.
    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns true if at the given kind.
    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advances to the next token.
    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token();
        self.check_token()
    }

    /// Turns a lexer error token into a syntax error.
    fn check_token(&mut self) -> Result<()> {
        if self.at_kind(TokenKind::Error) {
            let message = self
                .lexer
                .take_error()
                .unwrap_or_else(|| "unexpected character".to_string());
            return Err(self.error_at(self.current.span, message));
        }
        Ok(())
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.at_kind(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expects a specific token kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.at_kind(kind) {
            let token = self.current;
            self.advance()?;
            Ok(token)
        } else if kind == TokenKind::Eof {
            Err(self.unexpected("end of input"))
        } else {
            Err(self.unexpected(&format!("`{kind}`")))
        }
    }

    /// Gets the text of the current token.
    fn current_text(&self) -> &'a str {
        self.lexer.span_text(self.current.span)
    }

    /// Returns the origin of the current token.
    fn origin(&self) -> Origin {
        Origin::sdl(self.lines.line_col(self.current.span.start))
    }

    fn error_at(&self, span: Span, message: impl Into<String>) -> CompileError {
        let pos = self.lines.line_col(span.start);
        CompileError::Syntax {
            message: message.into(),
            line: pos.line,
            column: pos.column,
            span: span.into(),
        }
    }

    /// Reports an unexpected current token.
    fn unexpected(&self, expected: &str) -> CompileError {
        let found = if self.current.is_eof() {
            "end of input".to_string()
        } else {
            format!("`{}`", self.current_text())
        };
        self.error_at(self.current.span, format!("expected {expected}, found {found}"))
    }

    /// Consumes an opening bracket or brace, one level deeper.
    fn open_nested(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error_at(
                self.current.span,
                format!("nesting exceeds {MAX_DEPTH} levels"),
            ));
        }
        self.depth += 1;
        self.advance()
    }

    /// Applies the unsupported-construct policy.
    fn unsupported(&mut self, construct: Construct, name: String, origin: Origin) -> Result<()> {
        if self.policy == UnsupportedPolicy::Skip {
            debug!(%construct, %name, %origin, "skipping unsupported construct");
        }
        self.schema.unsupported(self.policy, construct, name, origin)
    }

    fn finish(mut self) -> RawSchema {
        if !self.schema_defined {
            let declares_object = |schema: &RawSchema, name: &str| {
                schema
                    .get(name)
                    .is_some_and(|decl| matches!(decl.kind, RawDeclKind::Object { .. }))
            };
            let roots = [
                declares_object(&self.schema, "Query").then(|| "Query".to_string()),
                declares_object(&self.schema, "Mutation").then(|| "Mutation".to_string()),
                declares_object(&self.schema, "Subscription").then(|| "Subscription".to_string()),
            ];
            let [query, mutation, subscription] = roots;
            self.schema.roots.query = query;
            self.schema.roots.mutation = mutation;
            self.schema.roots.subscription = subscription;
        }
        debug!(
            declarations = self.schema.declarations.len(),
            skipped = self.schema.skipped.len(),
            "parsed SDL schema"
        );
        self.schema
    }

    /// Parses a document.
    fn parse_document(&mut self) -> Result<()> {
        self.check_token()?;
        while !self.at_kind(TokenKind::Eof) {
            self.parse_definition()?;
        }
        Ok(())
    }

    /// Parses a definition, returning the defined name.
    fn parse_definition(&mut self) -> Result<String> {
        self.skip_description()?;

        match self.at() {
            TokenKind::Schema => self.parse_schema_definition(),
            TokenKind::Type => self.parse_object_type(),
            TokenKind::Input => self.parse_input_object_type(),
            TokenKind::Enum => self.parse_enum_type(),
            TokenKind::Scalar => self.parse_scalar_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::Union => self.parse_union_type(),
            TokenKind::Directive => self.parse_directive_definition(),
            TokenKind::Extend => self.parse_extension(),
            _ => Err(self.unexpected("a type system definition")),
        }
    }

    /// Skips a description, validating its escapes.
    fn skip_description(&mut self) -> Result<()> {
        match self.at() {
            TokenKind::StringLiteral => {
                self.parse_const_value()?;
            }
            TokenKind::BlockStringLiteral => self.advance()?,
            _ => {}
        }
        Ok(())
    }

    /// Parses a name. Keywords are valid names.
    fn parse_name(&mut self) -> Result<String> {
        if self.at().is_name() {
            let name = self.current_text().to_string();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.unexpected("a name"))
        }
    }

    fn push_decl(&mut self, name: String, kind: RawDeclKind, origin: Origin) -> Result<String> {
        self.schema.declarations.push(RawDecl {
            name: name.clone(),
            kind,
            origin,
        });
        Ok(name)
    }

    /// Parses schema definition.
    fn parse_schema_definition(&mut self) -> Result<String> {
        if self.schema_defined {
            return Err(self.error_at(self.current.span, "schema is defined more than once"));
        }
        let origin = self.origin();
        self.advance()?; // schema
        self.parse_directives()?;

        if self.eat(TokenKind::LBrace)? {
            while !self.eat(TokenKind::RBrace)? {
                let op = self.current;
                if !matches!(
                    op.kind,
                    TokenKind::Query | TokenKind::Mutation | TokenKind::Subscription
                ) {
                    return Err(self.unexpected("`query`, `mutation` or `subscription`"));
                }
                self.advance()?;
                self.expect(TokenKind::Colon)?;
                let name = self.parse_name()?;

                let roots = &self.schema.roots;
                let taken = match op.kind {
                    TokenKind::Query => roots.query.is_some(),
                    TokenKind::Mutation => roots.mutation.is_some(),
                    _ => roots.subscription.is_some(),
                };
                if taken {
                    return Err(self.error_at(
                        op.span,
                        format!("root operation `{}` is defined more than once", op.kind),
                    ));
                }
                let roots = &mut self.schema.roots;
                match op.kind {
                    TokenKind::Query => roots.query = Some(name),
                    TokenKind::Mutation => roots.mutation = Some(name),
                    _ => roots.subscription = Some(name),
                }
            }
        }

        self.schema.roots_origin = origin;
        self.schema_defined = true;
        Ok("schema".to_string())
    }

    /// Parses object type definition.
    fn parse_object_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // type

        let name = self.parse_name()?;
        self.parse_implements()?;
        self.parse_directives()?;

        let fields = if self.at_kind(TokenKind::LBrace) {
            self.parse_field_definitions()?
        } else {
            Vec::new()
        };

        self.push_decl(name, RawDeclKind::Object { fields }, origin)
    }

    /// Parses interface type definition. Interfaces are not compiled.
    fn parse_interface_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // interface

        let name = self.parse_name()?;
        self.parse_implements()?;
        self.parse_directives()?;
        if self.at_kind(TokenKind::LBrace) {
            self.parse_field_definitions()?;
        }

        self.unsupported(Construct::Interface, name.clone(), origin)?;
        Ok(name)
    }

    /// Parses union type definition. Unions are not compiled.
    fn parse_union_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // union

        let name = self.parse_name()?;
        self.parse_directives()?;

        if self.eat(TokenKind::Eq)? {
            self.eat(TokenKind::Pipe)?;
            self.parse_name()?;
            while self.eat(TokenKind::Pipe)? {
                self.parse_name()?;
            }
        }

        self.unsupported(Construct::Union, name.clone(), origin)?;
        Ok(name)
    }

    /// Parses enum type definition.
    fn parse_enum_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // enum

        let name = self.parse_name()?;
        self.parse_directives()?;

        let mut values = Vec::new();
        if self.eat(TokenKind::LBrace)? {
            while !self.eat(TokenKind::RBrace)? {
                self.skip_description()?;
                if matches!(
                    self.at(),
                    TokenKind::True | TokenKind::False | TokenKind::Null
                ) {
                    return Err(self.error_at(
                        self.current.span,
                        format!("enum value cannot be named `{}`", self.at()),
                    ));
                }
                values.push(self.parse_name()?);
                self.parse_directives()?;
            }
        }

        self.push_decl(name, RawDeclKind::Enum { values }, origin)
    }

    /// Parses input object type definition.
    fn parse_input_object_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // input

        let name = self.parse_name()?;
        self.parse_directives()?;

        let mut fields = Vec::new();
        if self.eat(TokenKind::LBrace)? {
            while !self.eat(TokenKind::RBrace)? {
                fields.push(self.parse_input_value_definition()?);
            }
        }

        self.push_decl(name, RawDeclKind::Input { fields }, origin)
    }

    /// Parses scalar type definition.
    fn parse_scalar_type(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // scalar

        let name = self.parse_name()?;
        self.parse_directives()?;

        self.push_decl(name, RawDeclKind::Scalar, origin)
    }

    /// Parses a directive definition. Directive definitions are not compiled.
    fn parse_directive_definition(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // directive
        self.expect(TokenKind::At)?;

        let name = self.parse_name()?;
        if self.at_kind(TokenKind::LParen) {
            self.parse_argument_definitions()?;
        }
        self.eat(TokenKind::Repeatable)?;
        self.expect(TokenKind::On)?;
        self.eat(TokenKind::Pipe)?;
        self.parse_name()?;
        while self.eat(TokenKind::Pipe)? {
            self.parse_name()?;
        }

        self.unsupported(Construct::DirectiveDefinition, name.clone(), origin)?;
        Ok(name)
    }

    /// Parses `extend <definition>`. The extended definition is parsed for
    /// syntax and then discarded.
    fn parse_extension(&mut self) -> Result<String> {
        let origin = self.origin();
        self.advance()?; // extend

        if !matches!(
            self.at(),
            TokenKind::Schema
                | TokenKind::Type
                | TokenKind::Interface
                | TokenKind::Union
                | TokenKind::Enum
                | TokenKind::Input
                | TokenKind::Scalar
        ) {
            return Err(self.unexpected("a definition to extend"));
        }

        let declarations = self.schema.declarations.len();
        let skipped = self.schema.skipped.len();
        let roots = self.schema.roots.clone();
        let roots_origin = self.schema.roots_origin.clone();
        let schema_defined = std::mem::replace(&mut self.schema_defined, false);

        let name = self.parse_definition()?;

        self.schema.declarations.truncate(declarations);
        self.schema.skipped.truncate(skipped);
        self.schema.roots = roots;
        self.schema.roots_origin = roots_origin;
        self.schema_defined = schema_defined;

        self.unsupported(Construct::Extension, name.clone(), origin)?;
        Ok(name)
    }

    /// Parses `implements A & B`. Interfaces are not compiled.
    fn parse_implements(&mut self) -> Result<()> {
        if self.eat(TokenKind::Implements)? {
            self.eat(TokenKind::Amp)?;
            loop {
                let origin = self.origin();
                let interface = self.parse_name()?;
                self.unsupported(Construct::Implements, interface, origin)?;
                if !self.eat(TokenKind::Amp)? {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Parses field definitions.
    fn parse_field_definitions(&mut self) -> Result<Vec<RawField>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.eat(TokenKind::RBrace)? {
            fields.push(self.parse_field_definition()?);
        }
        Ok(fields)
    }

    /// Parses a field definition.
    fn parse_field_definition(&mut self) -> Result<RawField> {
        self.skip_description()?;
        let origin = self.origin();
        let name = self.parse_name()?;

        let args = if self.at_kind(TokenKind::LParen) {
            self.parse_argument_definitions()?
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.parse_directives()?;

        Ok(RawField {
            name,
            ty,
            args,
            origin,
        })
    }

    /// Parses `( InputValueDefinition* )`.
    fn parse_argument_definitions(&mut self) -> Result<Vec<RawInputValue>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.eat(TokenKind::RParen)? {
            args.push(self.parse_input_value_definition()?);
        }
        Ok(args)
    }

    /// Parses an input value definition.
    fn parse_input_value_definition(&mut self) -> Result<RawInputValue> {
        self.skip_description()?;
        let origin = self.origin();
        let name = self.parse_name()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;

        let default_value = if self.eat(TokenKind::Eq)? {
            Some(self.parse_const_value()?)
        } else {
            None
        };

        self.parse_directives()?;

        Ok(RawInputValue {
            name,
            ty,
            default_value,
            origin,
        })
    }

    /// Parses a type reference: `Name`, `[Type]`, and a trailing `!` on either.
    fn parse_type(&mut self) -> Result<TypeRef> {
        let ty = if self.at_kind(TokenKind::LBracket) {
            self.open_nested()?;
            let inner = self.parse_type()?;
            self.expect(TokenKind::RBracket)?;
            self.depth -= 1;
            TypeRef::list(inner)
        } else if self.at().is_name() {
            TypeRef::Named(self.parse_name()?)
        } else {
            return Err(self.unexpected("a type"));
        };

        if self.eat(TokenKind::Bang)? {
            Ok(TypeRef::NonNull(Box::new(ty)))
        } else {
            Ok(ty)
        }
    }

    /// Parses directive usages, skipping or rejecting non-core ones.
    fn parse_directives(&mut self) -> Result<()> {
        while self.at_kind(TokenKind::At) {
            let origin = self.origin();
            self.advance()?; // @

            let name = self.parse_name()?;
            if self.eat(TokenKind::LParen)? {
                while !self.eat(TokenKind::RParen)? {
                    self.parse_name()?;
                    self.expect(TokenKind::Colon)?;
                    self.parse_const_value()?;
                }
            }

            if !is_core_directive(&name) {
                self.unsupported(Construct::Directive, name, origin)?;
            }
        }
        Ok(())
    }

    /// Parses a constant value.
    fn parse_const_value(&mut self) -> Result<Value> {
        let span = self.current.span;
        let text = self.current_text();

        let value = match self.at() {
            TokenKind::IntLiteral => Value::Int(text.to_string()),
            TokenKind::FloatLiteral => Value::Float(text.to_string()),
            TokenKind::StringLiteral => {
                let value = unescape(&text[1..text.len() - 1])
                    .map_err(|message| self.error_at(span, message))?;
                Value::String(value)
            }
            TokenKind::BlockStringLiteral => {
                Value::String(block_string_value(&text[3..text.len() - 3]))
            }
            TokenKind::True => Value::Boolean(true),
            TokenKind::False => Value::Boolean(false),
            TokenKind::Null => Value::Null,
            TokenKind::LBracket => {
                self.open_nested()?;
                let mut values = Vec::new();
                while !self.eat(TokenKind::RBracket)? {
                    values.push(self.parse_const_value()?);
                }
                self.depth -= 1;
                return Ok(Value::List(values));
            }
            TokenKind::LBrace => {
                self.open_nested()?;
                let mut fields = Vec::new();
                while !self.eat(TokenKind::RBrace)? {
                    let name = self.parse_name()?;
                    self.expect(TokenKind::Colon)?;
                    fields.push((name, self.parse_const_value()?));
                }
                self.depth -= 1;
                return Ok(Value::Object(fields));
            }
            kind if kind.is_name() => Value::Enum(text.to_string()),
            _ => return Err(self.unexpected("a value")),
        };

        self.advance()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> RawSchema {
        match parse_schema(source, UnsupportedPolicy::Skip) {
            Ok(schema) => schema,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    fn object_fields<'s>(schema: &'s RawSchema, name: &str) -> &'s [RawField] {
        match &schema.get(name).expect("declared").kind {
            RawDeclKind::Object { fields } => fields,
            other => panic!("expected object, found {}", other.as_str()),
        }
    }

    fn syntax_error(source: &str) -> (String, u32, u32) {
        match parse_schema(source, UnsupportedPolicy::Skip) {
            Err(CompileError::Syntax {
                message,
                line,
                column,
                ..
            }) => (message, line, column),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_type() {
        let schema = parse_ok("type Query { hello: String }");
        assert_eq!(schema.declarations.len(), 1);
        let fields = object_fields(&schema, "Query");
        assert_eq!(fields[0].name, "hello");
        assert_eq!(fields[0].ty, TypeRef::named("String"));
        assert_eq!(schema.roots.query.as_deref(), Some("Query"));
        assert_eq!(schema.roots.mutation, None);
    }

    #[test]
    fn test_parse_nested_wrapping() {
        let schema = parse_ok("type Query { grid: [[Int!]]! }");
        let ty = &object_fields(&schema, "Query")[0].ty;
        let expected = TypeRef::NonNull(Box::new(TypeRef::list(TypeRef::list(
            TypeRef::NonNull(Box::new(TypeRef::named("Int"))),
        ))));
        assert_eq!(ty, &expected);
        assert_eq!(ty.to_string(), "[[Int!]]!");
    }

    fn nested_list_field(levels: usize) -> String {
        format!(
            "type Query {{ deep: {}Int{} }}",
            "[".repeat(levels),
            "]".repeat(levels)
        )
    }

    #[test]
    fn test_deep_list_type_within_limit() {
        let schema = parse_ok(&nested_list_field(MAX_DEPTH));
        let ty = &object_fields(&schema, "Query")[0].ty;
        assert_eq!(ty.list_depth(), MAX_DEPTH);
    }

    #[test]
    fn test_list_type_too_deep() {
        let (message, line, column) = syntax_error(&nested_list_field(MAX_DEPTH * 8));
        assert_eq!(message, "nesting exceeds 128 levels");
        // `type Query { deep: ` is 19 columns wide; the 129th `[` is rejected.
        assert_eq!((line, column), (1, 19 + 129));
    }

    #[test]
    fn test_value_too_deep() {
        let source = format!("{}1{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert!(matches!(
            parse_value(&source),
            Err(CompileError::Syntax { column: 129, .. })
        ));

        let source = format!("{}1{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse_value(&source).is_ok());
    }

    #[test]
    fn test_parse_arguments_and_defaults() {
        let schema = parse_ok(
            r#"
            type Query {
              users(first: Int = 10, order: Order = ASC, filter: Filter = {name: "a\"b", tags: []}): [User]
            }
            "#,
        );
        let args = &object_fields(&schema, "Query")[0].args;
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].default_value, Some(Value::Int("10".into())));
        assert_eq!(args[1].default_value, Some(Value::Enum("ASC".into())));
        assert_eq!(
            args[2].default_value,
            Some(Value::Object(vec![
                ("name".into(), Value::String("a\"b".into())),
                ("tags".into(), Value::List(vec![])),
            ]))
        );
    }

    #[test]
    fn test_comments_and_descriptions() {
        let schema = parse_ok(
            r#"
            # leading comment
            """
            The root type.
            """
            type Query {
              "the greeting" # trailing comment
              hello(
                "who to greet"
                name: String
              ): String
            }

            "Sort order"
            enum Order { "ascending" ASC DESC }
            "#,
        );
        assert_eq!(schema.declarations.len(), 2);
        assert_eq!(object_fields(&schema, "Query")[0].args[0].name, "name");
        assert_eq!(
            schema.get("Order").map(|d| &d.kind),
            Some(&RawDeclKind::Enum {
                values: vec!["ASC".into(), "DESC".into()]
            })
        );
    }

    #[test]
    fn test_keywords_are_names() {
        let schema = parse_ok("type Query { type: String input(enum: Int): query }\ntype query { on: Boolean }");
        let fields = object_fields(&schema, "Query");
        assert_eq!(fields[0].name, "type");
        assert_eq!(fields[1].args[0].name, "enum");
        assert_eq!(fields[1].ty, TypeRef::named("query"));
    }

    #[test]
    fn test_schema_block_roots() {
        let schema = parse_ok(
            r"
            schema { query: RootQuery mutation: RootMutation }
            type RootQuery { a: Int }
            type RootMutation { b: Int }
            type Mutation { c: Int }
            ",
        );
        assert_eq!(schema.roots.query.as_deref(), Some("RootQuery"));
        assert_eq!(schema.roots.mutation.as_deref(), Some("RootMutation"));
        assert_eq!(schema.roots_origin, Origin::Sdl { line: 2, column: 13 });
    }

    #[test]
    fn test_input_scalar_and_positions() {
        let schema = parse_ok("scalar DateTime\n\ninput NewUser {\n  name: String!\n  born: DateTime = \"2000-01-01\"\n}");
        let decl = schema.get("NewUser").unwrap();
        assert_eq!(decl.origin, Origin::Sdl { line: 3, column: 1 });
        match &decl.kind {
            RawDeclKind::Input { fields } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[1].origin, Origin::Sdl { line: 5, column: 3 });
                assert_eq!(
                    fields[1].default_value,
                    Some(Value::String("2000-01-01".into()))
                );
            }
            other => panic!("expected input, found {}", other.as_str()),
        }
        assert_eq!(schema.get("DateTime").map(|d| &d.kind), Some(&RawDeclKind::Scalar));
    }

    #[test]
    fn test_syntax_error_location() {
        let (message, line, column) = syntax_error("type Query {\n  hello String\n}");
        assert_eq!(message, "expected `:`, found `String`");
        assert_eq!((line, column), (2, 9));
    }

    #[test]
    fn test_syntax_error_at_eof() {
        let (message, line, _) = syntax_error("type Query {\n  hello: [Int\n");
        assert_eq!(message, "expected `]`, found end of input");
        assert_eq!(line, 3);
    }

    #[test]
    fn test_syntax_error_display() {
        let err = parse_schema("type Query {", UnsupportedPolicy::Skip).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"syntax error at 1:13: expected a name, found end of input");
    }

    #[test]
    fn test_double_bang_rejected() {
        let (message, ..) = syntax_error("type Query { a: Int!! }");
        assert_eq!(message, "expected a name, found `!`");
    }

    #[test]
    fn test_lexer_error_surfaces() {
        let (message, line, column) = syntax_error("type Query {\n  a: \"oops\n}");
        assert_eq!(message, "unterminated string");
        assert_eq!((line, column), (2, 6));
    }

    #[test]
    fn test_operations_are_not_schema() {
        let (message, ..) = syntax_error("query { hello }");
        assert_eq!(message, "expected a type system definition, found `query`");
    }

    #[test]
    fn test_unsupported_skipped() {
        let schema = parse_ok(
            r#"
            directive @key(fields: String!) repeatable on OBJECT | INTERFACE
            interface Node { id: ID! }
            union SearchResult = | User | Post
            type User implements Node @key(fields: "id") { id: ID! @deprecated(reason: "x") }
            type Post { id: ID! }
            extend type Post { title: String }
            "#,
        );
        let constructs: Vec<_> = schema.skipped.iter().map(|s| s.construct).collect();
        assert_eq!(
            constructs,
            vec![
                Construct::DirectiveDefinition,
                Construct::Interface,
                Construct::Union,
                Construct::Implements,
                Construct::Directive,
                Construct::Extension,
            ]
        );
        assert_eq!(schema.declarations.len(), 2);
        assert_eq!(object_fields(&schema, "Post").len(), 1);
    }

    #[test]
    fn test_unsupported_rejected() {
        let err = parse_schema(
            "type Query { a: Int }\nunion U = Query",
            UnsupportedPolicy::Reject,
        )
        .unwrap_err();
        match err {
            CompileError::UnsupportedConstruct {
                construct,
                name,
                origin,
            } => {
                assert_eq!(construct, Construct::Union);
                assert_eq!(name, "U");
                assert_eq!(origin, Origin::Sdl { line: 2, column: 1 });
            }
            other => panic!("expected unsupported construct, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_is_deterministic() {
        let source = "interface A { x: Int }\nunion B = C\ntype C { x: Int }";
        let first = parse_ok(source);
        let second = parse_ok(source);
        assert_eq!(first.skipped, second.skipped);
        assert_eq!(first.declarations, second.declarations);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("42").unwrap(), Value::Int("42".into()));
        assert_eq!(
            parse_value(r#"["a", B, {c: null}]"#).unwrap(),
            Value::List(vec![
                Value::String("a".into()),
                Value::Enum("B".into()),
                Value::Object(vec![("c".into(), Value::Null)]),
            ])
        );
        assert_eq!(
            parse_value("\"\"\"\n  block\n  text\n\"\"\"").unwrap(),
            Value::String("block\ntext".into())
        );
        assert!(parse_value("1 2").is_err());
        assert!(parse_value("").is_err());
    }
}
