//! Abstract syntax tree produced by the [`Parser`](crate::parser::Parser).
//!
//! Two closed node families, [`Statement`] and [`Expression`], each an enum
//! over per‑construct structs. Every struct keeps the [`Token`] it started
//! from. `Display` renders the canonical, fully parenthesised form used by
//! diagnostics and parser tests; `Serialize` feeds the JSON tree view.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::token::Token;

/// Shared behaviour of all nodes.
pub trait Node: fmt::Display {
    /// Literal text of the token the node started from.
    fn token_literal(&self) -> &str;
}

/// Write `items` separated by `sep`.
fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// Root node: the ordered top‑level statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join(f, &self.statements, "\n")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(BlockStatement),
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(s) => &s.token.literal,
            Statement::Return(s) => &s.token.literal,
            Statement::Expression(s) => &s.token.literal,
            Statement::Block(s) => &s.token.literal,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => write!(f, "{} {} = {}", s.token.literal, s.name, s.value),
            Statement::Return(s) => write!(f, "{} {}", s.token.literal, s.value),
            Statement::Expression(s) => write!(f, "{}", s.expression),
            Statement::Block(s) => write!(f, "{}", s),
        }
    }
}

/// `let <name> = <value>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Expression,
}

/// `return <value>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub token: Token,
    pub value: Expression,
}

/// A bare expression used as a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expression,
}

/// `{ … }` body of an `if` branch or a function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{}");
        }

        f.write_str("{ ")?;
        join(f, &self.statements, "; ")?;
        f.write_str(" }")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(BooleanLiteral),
    String(StringLiteral),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Function(FunctionLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Call(CallExpression),
    Index(IndexExpression),
}

impl Expression {
    /// The token this expression started from.
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(e) => &e.token,
            Expression::Integer(e) => &e.token,
            Expression::Boolean(e) => &e.token,
            Expression::String(e) => &e.token,
            Expression::Array(e) => &e.token,
            Expression::Hash(e) => &e.token,
            Expression::Function(e) => &e.token,
            Expression::Prefix(e) => &e.token,
            Expression::Infix(e) => &e.token,
            Expression::If(e) => &e.token,
            Expression::Call(e) => &e.token,
            Expression::Index(e) => &e.token,
        }
    }
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(e) => write!(f, "{}", e),
            Expression::Integer(e) => f.write_str(&e.token.literal),
            Expression::Boolean(e) => f.write_str(&e.token.literal),
            Expression::String(e) => f.write_str(&e.value),

            Expression::Array(e) => {
                f.write_str("[")?;
                join(f, &e.elements, ", ")?;
                f.write_str("]")
            }

            Expression::Hash(e) => {
                if e.pairs.is_empty() {
                    return f.write_str("{}");
                }

                f.write_str("{ ")?;
                for (i, (key, value)) in e.pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str(" }")
            }

            Expression::Function(e) => {
                write!(f, "{}(", e.token.literal)?;
                join(f, &e.parameters, ", ")?;
                write!(f, ") {}", e.body)
            }

            Expression::Prefix(e) => write!(f, "({}{})", e.operator, e.right),

            Expression::Infix(e) => write!(f, "({} {} {})", e.left, e.operator, e.right),

            Expression::If(e) => {
                write!(f, "if {} {}", e.condition, e.consequence)?;
                if let Some(alternative) = &e.alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }

            Expression::Call(e) => {
                write!(f, "{}(", e.function)?;
                join(f, &e.arguments, ", ")?;
                f.write_str(")")
            }

            Expression::Index(e) => write!(f, "({}[{}])", e.left, e.index),
        }
    }
}

/// A name; also used for `let` targets and function parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayLiteral {
    pub token: Token,
    pub elements: Vec<Expression>,
}

/// `{ key: value, … }` in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashLiteral {
    pub token: Token,
    pub pairs: Vec<(Expression, Expression)>,
}

/// `fn(<parameters>) <body>`.  The body is shared with every function object
/// created from this literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLiteral {
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: Rc<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfExpression {
    pub token: Token,
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    /// The `(` token.
    pub token: Token,
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexExpression {
    /// The `[` token.
    pub token: Token,
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    /// `!`
    Bang,
    /// `-`
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Plus,
    Minus,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Asterisk => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Lt => "<",
            InfixOperator::Gt => ">",
            InfixOperator::Eq => "==",
            InfixOperator::NotEq => "!=",
        })
    }
}
