/*!
Recursive‑descent statement parser with a Pratt expression core.

Grammar (EBNF, condensed)
--------------------------

```text
program        → statement* EOF ;
statement      → letStmt | returnStmt | exprStmt ;
letStmt        → "let" IDENT "=" expression ";"? ;
returnStmt     → "return" expression ";"? ;
exprStmt       → expression ";"? ;
block          → "{" statement* "}" ;
expression     → prefix ( infix )* ;            // precedence climbing
prefix         → IDENT | INT | STRING | "true" | "false"
               | ( "!" | "-" ) expression
               | "(" expression ")"
               | "if" "(" expression ")" block ( "else" block )?
               | "fn" "(" ( IDENT ( "," IDENT )* )? ")" block
               | "[" list? "]"
               | "{" ( expression ":" expression ( "," … )* )? "}" ;
infix          → ( "+" | "-" | "*" | "/" | "<" | ">" | "==" | "!=" ) expression
               | "(" list? ")"
               | "[" expression "]" ;
list           → expression ( "," expression )* ;
```

### Failure policy

| Situation                                  | Kind        | Effect                                   |
|--------------------------------------------|-------------|------------------------------------------|
| `let` without identifier or `=`            | recoverable | message recorded, skip to `;` or the enclosing `}`, continue |
| any other unexpected token                 | fatal       | message recorded, parse stops            |
| no prefix handler for a token              | fatal       | message recorded, parse stops            |
| lexer failure (unterminated string)        | fatal       | lexer message recorded, parse stops      |

Recorded messages are exposed through [`Parser::errors`]; a fatal one is
always the last entry.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse_program`| `info` | Lifecycle milestones.                    |
| statement / expression entry | `debug`| Descent into grammar branches.            |
*/

use std::rc::Rc;

use crate::ast::{
    ArrayLiteral, BlockStatement, BooleanLiteral, CallExpression, Expression,
    ExpressionStatement, FunctionLiteral, HashLiteral, Identifier, IfExpression, IndexExpression,
    InfixExpression, InfixOperator, IntegerLiteral, LetStatement, PrefixExpression,
    PrefixOperator, Program, ReturnStatement, Statement, StringLiteral,
};
use crate::error::{MonkeyError, Result};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

use log::{debug, info};

/// Binding strength of operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `>`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
    /// `a[i]`
    Index,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EQ | TokenKind::NOT_EQ => Precedence::Equals,
            TokenKind::LT | TokenKind::GT => Precedence::LessGreater,
            TokenKind::PLUS | TokenKind::MINUS => Precedence::Sum,
            TokenKind::ASTERISK | TokenKind::SLASH => Precedence::Product,
            TokenKind::LPAREN => Precedence::Call,
            TokenKind::LBRACKET => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn<'a> = fn(&mut Parser<'a>) -> Result<Expression>;
type InfixParseFn<'a> = fn(&mut Parser<'a>, Expression) -> Result<Expression>;

/// Parser over a [`Lexer`], holding two tokens of lookahead.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
    lex_error: Option<MonkeyError>,
    block_depth: usize,
}

impl<'a> Parser<'a> {
    /// Construct a new parser and prime `cur` and `peek`.
    pub fn new(lexer: Lexer<'a>) -> Self {
        info!("Parser created");

        let mut parser = Self {
            lexer,
            cur: Token::eof(1),
            peek: Token::eof(1),
            errors: Vec::new(),
            lex_error: None,
            block_depth: 0,
        };

        parser.next_token();
        parser.next_token();
        parser
    }

    /// Messages recorded so far, in the order they were found.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Consume the parser, keeping only its messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse statements until `EOF` or the first fatal error.
    pub fn parse_program(&mut self) -> Program {
        info!("Beginning parse phase");

        let mut program = Program::default();

        while !self.cur_is(TokenKind::EOF) {
            match self.parse_statement() {
                Ok(Some(statement)) => program.statements.push(statement),
                Ok(None) => {}
                Err(e) => {
                    self.record_fatal(e);
                    break;
                }
            }

            if let Some(e) = self.lex_error.take() {
                self.errors.push(e.to_string());
                break;
            }

            self.next_token();
        }

        // The lexer may fail before any statement starts.
        if let Some(e) = self.lex_error.take() {
            self.errors.push(e.to_string());
        }

        info!(
            "Parsed {} statement(s) with {} error(s)",
            program.statements.len(),
            self.errors.len()
        );

        program
    }

    /// A lexer failure is the root cause of whatever the parser tripped over
    /// next, so it replaces that message.
    fn record_fatal(&mut self, e: MonkeyError) {
        let message = match self.lex_error.take() {
            Some(lex) => lex.to_string(),
            None => e.to_string(),
        };

        debug!("Fatal parse error: {}", message);

        self.errors.push(message);
    }

    // ──────────────────────── statement rules ─────────────────────

    /// `Ok(None)` means a recoverable error was recorded and the statement
    /// skipped.
    fn parse_statement(&mut self) -> Result<Option<Statement>> {
        debug!("Entering statement at {:?}", self.cur.kind);

        match self.cur.kind {
            TokenKind::LET => self.parse_let_statement(),
            TokenKind::RETURN => self.parse_return_statement().map(Some),
            _ => self.parse_expression_statement().map(Some),
        }
    }

    fn parse_let_statement(&mut self) -> Result<Option<Statement>> {
        let token = self.cur.clone();

        if !self.expect_peek(TokenKind::IDENT) {
            self.skip_statement();
            return Ok(None);
        }

        let name = Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        };

        if !self.expect_peek(TokenKind::ASSIGN) {
            self.skip_statement();
            return Ok(None);
        }

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::SEMICOLON) {
            self.next_token();
        }

        Ok(Some(Statement::Let(LetStatement { token, name, value })))
    }

    fn parse_return_statement(&mut self) -> Result<Statement> {
        let token = self.cur.clone();

        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::SEMICOLON) {
            self.next_token();
        }

        Ok(Statement::Return(ReturnStatement { token, value }))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let token = self.cur.clone();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_is(TokenKind::SEMICOLON) {
            self.next_token();
        }

        Ok(Statement::Expression(ExpressionStatement { token, expression }))
    }

    /// `cur` is the `{`; on return `cur` is the closing `}` (or `EOF`).
    fn parse_block_statement(&mut self) -> Result<BlockStatement> {
        let token = self.cur.clone();
        let mut statements = Vec::new();

        self.block_depth += 1;
        self.next_token();

        while !self.cur_is(TokenKind::RBRACE) && !self.cur_is(TokenKind::EOF) {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            self.next_token();
        }

        self.block_depth -= 1;

        Ok(BlockStatement { token, statements })
    }

    /// Recovery: leave `cur` on the `;` ending the broken statement, on the
    /// last token before the `}` closing the current block, or on the last
    /// token before `EOF`.  Braces opened while skipping are matched.
    fn skip_statement(&mut self) {
        let mut nesting = 0usize;

        loop {
            match self.cur.kind {
                TokenKind::LBRACE => nesting += 1,
                TokenKind::RBRACE => nesting = nesting.saturating_sub(1),
                TokenKind::SEMICOLON if nesting == 0 => return,
                _ => {}
            }

            if self.peek_is(TokenKind::EOF) {
                return;
            }

            if nesting == 0 && self.block_depth > 0 && self.peek_is(TokenKind::RBRACE) {
                debug!("Recovery stopped at end of block");
                return;
            }

            self.next_token();
        }
    }

    // ─────────────────────── expression rules (Pratt) ─────────────

    fn prefix_parse_fn(kind: TokenKind) -> Option<PrefixParseFn<'a>> {
        let f: PrefixParseFn<'a> = match kind {
            TokenKind::IDENT => Self::parse_identifier,
            TokenKind::INT => Self::parse_integer_literal,
            TokenKind::STRING => Self::parse_string_literal,
            TokenKind::TRUE | TokenKind::FALSE => Self::parse_boolean_literal,
            TokenKind::BANG | TokenKind::MINUS => Self::parse_prefix_expression,
            TokenKind::LPAREN => Self::parse_grouped_expression,
            TokenKind::IF => Self::parse_if_expression,
            TokenKind::FUNCTION => Self::parse_function_literal,
            TokenKind::LBRACKET => Self::parse_array_literal,
            TokenKind::LBRACE => Self::parse_hash_literal,
            _ => return None,
        };

        Some(f)
    }

    fn infix_parse_fn(kind: TokenKind) -> Option<InfixParseFn<'a>> {
        let f: InfixParseFn<'a> = match kind {
            TokenKind::PLUS
            | TokenKind::MINUS
            | TokenKind::ASTERISK
            | TokenKind::SLASH
            | TokenKind::LT
            | TokenKind::GT
            | TokenKind::EQ
            | TokenKind::NOT_EQ => Self::parse_infix_expression,
            TokenKind::LPAREN => Self::parse_call_expression,
            TokenKind::LBRACKET => Self::parse_index_expression,
            _ => return None,
        };

        Some(f)
    }

    /// Parse an expression whose operators all bind tighter than `precedence`.
    pub fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let Some(prefix) = Self::prefix_parse_fn(self.cur.kind) else {
            return Err(MonkeyError::parse(format!(
                "no prefix parse function for {} found",
                self.cur.kind
            )));
        };

        let mut left = prefix(self)?;

        while !self.peek_is(TokenKind::SEMICOLON) && precedence < self.peek_precedence() {
            let Some(infix) = Self::infix_parse_fn(self.peek.kind) else {
                return Ok(left);
            };

            self.next_token();

            left = infix(self, left)?;
        }

        Ok(left)
    }

    fn parse_identifier(&mut self) -> Result<Expression> {
        Ok(Expression::Identifier(self.cur_identifier()))
    }

    fn parse_integer_literal(&mut self) -> Result<Expression> {
        let token = self.cur.clone();

        let value = token.literal.parse::<i64>().map_err(|_| {
            MonkeyError::parse(format!("could not parse {} as integer", token.literal))
        })?;

        Ok(Expression::Integer(IntegerLiteral { token, value }))
    }

    fn parse_string_literal(&mut self) -> Result<Expression> {
        Ok(Expression::String(StringLiteral {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        }))
    }

    fn parse_boolean_literal(&mut self) -> Result<Expression> {
        Ok(Expression::Boolean(BooleanLiteral {
            token: self.cur.clone(),
            value: self.cur_is(TokenKind::TRUE),
        }))
    }

    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let token = self.cur.clone();
        let operator = match token.kind {
            TokenKind::BANG => PrefixOperator::Bang,
            _ => PrefixOperator::Minus,
        };

        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;

        Ok(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let token = self.cur.clone();
        let precedence = self.cur_precedence();
        let operator = match token.kind {
            TokenKind::PLUS => InfixOperator::Plus,
            TokenKind::MINUS => InfixOperator::Minus,
            TokenKind::ASTERISK => InfixOperator::Asterisk,
            TokenKind::SLASH => InfixOperator::Slash,
            TokenKind::LT => InfixOperator::Lt,
            TokenKind::GT => InfixOperator::Gt,
            TokenKind::EQ => InfixOperator::Eq,
            _ => InfixOperator::NotEq,
        };

        self.next_token();

        let right = self.parse_expression(precedence)?;

        Ok(Expression::Infix(InfixExpression {
            token,
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;

        self.consume_peek(TokenKind::RPAREN)?;

        Ok(expression)
    }

    fn parse_if_expression(&mut self) -> Result<Expression> {
        debug!("Entering if expression");

        let token = self.cur.clone();

        self.consume_peek(TokenKind::LPAREN)?;
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;

        self.consume_peek(TokenKind::RPAREN)?;
        self.consume_peek(TokenKind::LBRACE)?;

        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_is(TokenKind::ELSE) {
            self.next_token();
            self.consume_peek(TokenKind::LBRACE)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Ok(Expression::If(IfExpression {
            token,
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Result<Expression> {
        debug!("Entering function literal");

        let token = self.cur.clone();

        self.consume_peek(TokenKind::LPAREN)?;

        let parameters = self.parse_function_parameters()?;

        self.consume_peek(TokenKind::LBRACE)?;

        let body = self.parse_block_statement()?;

        Ok(Expression::Function(FunctionLiteral {
            token,
            parameters,
            body: Rc::new(body),
        }))
    }

    /// `cur` is the `(`; on return `cur` is the `)`.
    fn parse_function_parameters(&mut self) -> Result<Vec<Identifier>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RPAREN) {
            self.next_token();
            return Ok(parameters);
        }

        self.consume_peek(TokenKind::IDENT)?;
        parameters.push(self.cur_identifier());

        while self.peek_is(TokenKind::COMMA) {
            self.next_token();
            self.consume_peek(TokenKind::IDENT)?;
            parameters.push(self.cur_identifier());
        }

        self.consume_peek(TokenKind::RPAREN)?;

        Ok(parameters)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let token = self.cur.clone();
        let arguments = self.parse_expression_list(TokenKind::RPAREN)?;

        Ok(Expression::Call(CallExpression {
            token,
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_array_literal(&mut self) -> Result<Expression> {
        let token = self.cur.clone();
        let elements = self.parse_expression_list(TokenKind::RBRACKET)?;

        Ok(Expression::Array(ArrayLiteral { token, elements }))
    }

    /// Comma‑separated expressions up to `end`; `cur` is the opening
    /// delimiter and ends up on `end`.  Zero elements are allowed.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>> {
        let mut list = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Ok(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(TokenKind::COMMA) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.consume_peek(end)?;

        Ok(list)
    }

    fn parse_hash_literal(&mut self) -> Result<Expression> {
        let token = self.cur.clone();
        let mut pairs = Vec::new();

        if self.peek_is(TokenKind::RBRACE) {
            self.next_token();
            return Ok(Expression::Hash(HashLiteral { token, pairs }));
        }

        // Like lists, a trailing comma is not allowed.
        loop {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            self.consume_peek(TokenKind::COLON)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;

            pairs.push((key, value));

            if self.peek_is(TokenKind::RBRACE) {
                break;
            }

            self.consume_peek(TokenKind::COMMA)?;
        }

        self.consume_peek(TokenKind::RBRACE)?;

        Ok(Expression::Hash(HashLiteral { token, pairs }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        let token = self.cur.clone();

        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;

        self.consume_peek(TokenKind::RBRACKET)?;

        Ok(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    // ────────────────────── utility helpers ───────────────────────

    fn next_token(&mut self) {
        let next = match self.lexer.next_token() {
            Ok(token) => token,
            Err(e) => {
                let line = match &e {
                    MonkeyError::Lex { line, .. } => *line,
                    _ => self.peek.line,
                };
                self.lex_error.get_or_insert(e);
                Token::eof(line)
            }
        };

        self.cur = std::mem::replace(&mut self.peek, next);
    }

    fn cur_identifier(&self) -> Identifier {
        Identifier {
            token: self.cur.clone(),
            value: self.cur.literal.clone(),
        }
    }

    #[inline(always)]
    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    #[inline(always)]
    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    #[inline(always)]
    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    #[inline(always)]
    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur.kind)
    }

    fn peek_error(&self, kind: TokenKind) -> String {
        format!(
            "expected next token to be {}, got {} instead",
            kind, self.peek.kind
        )
    }

    /// Advance iff `peek` is `kind`; otherwise record a recoverable error.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.next_token();
            return true;
        }

        let message = self.peek_error(kind);

        debug!("Recoverable parse error: {}", message);

        self.errors.push(message);
        false
    }

    /// Advance iff `peek` is `kind`; otherwise fail the parse.
    fn consume_peek(&mut self, kind: TokenKind) -> Result<()> {
        if self.peek_is(kind) {
            self.next_token();
            return Ok(());
        }

        Err(MonkeyError::parse(self.peek_error(kind)))
    }
}
