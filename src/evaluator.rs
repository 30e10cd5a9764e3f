//! Tree‑walking evaluator.
//!
//! Every rule returns an [`Object`]; a runtime failure is an `Object::Error`
//! that each composite rule hands straight back before doing any more work,
//! so at most one error surfaces per evaluation and side effects already
//! performed (`puts`) stand.  `return` travels upwards the same way as
//! `Object::ReturnValue`, even out of an `if` used as an operand, and is
//! unwrapped by the nearest function call or by the program itself.

use std::rc::Rc;

use log::{debug, info};

use crate::ast::{
    BlockStatement, Expression, HashLiteral, Identifier, IfExpression, InfixOperator,
    PrefixOperator, Program, Statement,
};
use crate::builtins;
use crate::environment::{Env, Environment};
use crate::object::{Function, HashObject, HashPair, Object, NULL};

/// Return early from the enclosing function if `$obj` is an error or a
/// pending `return`.
macro_rules! propagate {
    ($obj:expr) => {{
        let obj = $obj;
        if obj.is_unwinding() {
            return obj;
        }
        obj
    }};
}

/// An evaluation session: one top‑level environment reused across calls, so
/// bindings from earlier programs stay visible to later ones.
pub struct Interpreter {
    env: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        Self {
            env: Environment::new(),
        }
    }

    /// Evaluate `program` in the session environment.
    pub fn interpret(&mut self, program: &Program) -> Object {
        debug!("Interpreting {} statements", program.statements.len());

        let result = eval_program(program, &self.env);

        info!("Interpretation finished with {}", result.object_type());

        result
    }

    /// The session's top‑level environment.
    pub fn env(&self) -> &Env {
        &self.env
    }
}

/// Evaluate a whole program.  A top‑level `return` ends it early and yields
/// the returned value.
pub fn eval_program(program: &Program, env: &Env) -> Object {
    let mut result = NULL;

    for statement in &program.statements {
        result = eval_statement(statement, env);

        match result {
            Object::ReturnValue(value) => return *value,
            Object::Error(_) => return result,
            _ => {}
        }
    }

    result
}

/// Unlike [`eval_program`], a block hands `ReturnValue` up still wrapped so
/// it can escape any number of nested blocks.
fn eval_block_statement(block: &BlockStatement, env: &Env) -> Object {
    let mut result = NULL;

    for statement in &block.statements {
        result = eval_statement(statement, env);

        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Env) -> Object {
    match statement {
        Statement::Let(s) => {
            let value = propagate!(eval_expression(&s.value, env));

            env.borrow_mut().set(&s.name.value, value.clone());
            value
        }

        Statement::Return(s) => {
            let value = propagate!(eval_expression(&s.value, env));

            Object::ReturnValue(Box::new(value))
        }

        Statement::Expression(s) => eval_expression(&s.expression, env),

        Statement::Block(block) => eval_block_statement(block, env),
    }
}

pub fn eval_expression(expression: &Expression, env: &Env) -> Object {
    match expression {
        Expression::Integer(e) => Object::Integer(e.value),

        Expression::Boolean(e) => Object::from(e.value),

        Expression::String(e) => Object::string(&e.value),

        Expression::Identifier(ident) => eval_identifier(ident, env),

        Expression::Prefix(e) => {
            let right = propagate!(eval_expression(&e.right, env));

            eval_prefix_expression(e.operator, right)
        }

        Expression::Infix(e) => {
            let left = propagate!(eval_expression(&e.left, env));
            let right = propagate!(eval_expression(&e.right, env));

            eval_infix_expression(e.operator, &left, &right)
        }

        Expression::If(e) => eval_if_expression(e, env),

        Expression::Function(e) => Object::Function(Rc::new(Function {
            parameters: e.parameters.clone(),
            body: Rc::clone(&e.body),
            env: Rc::clone(env),
        })),

        Expression::Call(e) => {
            let function = propagate!(eval_expression(&e.function, env));

            let arguments = match eval_expressions(&e.arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return error,
            };

            apply_function(&function, arguments)
        }

        Expression::Array(e) => match eval_expressions(&e.elements, env) {
            Ok(elements) => Object::array(elements),
            Err(error) => error,
        },

        Expression::Hash(e) => eval_hash_literal(e, env),

        Expression::Index(e) => {
            let left = propagate!(eval_expression(&e.left, env));
            let index = propagate!(eval_expression(&e.index, env));

            eval_index_expression(&left, &index)
        }
    }
}

/// Evaluate left to right, stopping at the first error or `return`.
fn eval_expressions(expressions: &[Expression], env: &Env) -> Result<Vec<Object>, Object> {
    let mut result = Vec::with_capacity(expressions.len());

    for expression in expressions {
        let evaluated = eval_expression(expression, env);

        if evaluated.is_unwinding() {
            return Err(evaluated);
        }

        result.push(evaluated);
    }

    Ok(result)
}

fn eval_identifier(ident: &Identifier, env: &Env) -> Object {
    debug!("Looking up identifier '{}'", ident.value);

    if let Some(value) = env.borrow().get(&ident.value) {
        return value;
    }

    if let Some(builtin) = builtins::lookup(&ident.value) {
        return Object::Builtin(builtin);
    }

    Object::error(format!("identifier not found: {}", ident.value))
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Object {
    match operator {
        PrefixOperator::Bang => match right {
            Object::Boolean(b) => Object::from(!b),
            Object::Null => Object::from(true),
            _ => Object::from(false),
        },

        PrefixOperator::Minus => match right {
            Object::Integer(n) => Object::Integer(n.wrapping_neg()),
            other => Object::error(format!("unknown operator: -{}", other.object_type())),
        },
    }
}

fn eval_infix_expression(operator: InfixOperator, left: &Object, right: &Object) -> Object {
    if left.object_type() != right.object_type() {
        return Object::error(format!(
            "type mismatch: {} {} {}",
            left.object_type(),
            operator,
            right.object_type()
        ));
    }

    match (left, right) {
        (Object::Integer(a), Object::Integer(b)) => {
            eval_integer_infix_expression(operator, *a, *b)
        }

        (Object::String(a), Object::String(b)) => match operator {
            InfixOperator::Plus => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Object::string(joined)
            }
            InfixOperator::Eq => Object::from(a == b),
            InfixOperator::NotEq => Object::from(a != b),
            _ => unknown_infix_operator(operator, left, right),
        },

        _ => match operator {
            InfixOperator::Eq => Object::from(left.is_identical(right)),
            InfixOperator::NotEq => Object::from(!left.is_identical(right)),
            _ => unknown_infix_operator(operator, left, right),
        },
    }
}

fn unknown_infix_operator(operator: InfixOperator, left: &Object, right: &Object) -> Object {
    Object::error(format!(
        "unknown operator: {} {} {}",
        left.object_type(),
        operator,
        right.object_type()
    ))
}

/// Wrapping 64‑bit arithmetic; `/` truncates toward zero.
fn eval_integer_infix_expression(operator: InfixOperator, a: i64, b: i64) -> Object {
    match operator {
        InfixOperator::Plus => Object::Integer(a.wrapping_add(b)),
        InfixOperator::Minus => Object::Integer(a.wrapping_sub(b)),
        InfixOperator::Asterisk => Object::Integer(a.wrapping_mul(b)),
        InfixOperator::Slash => {
            if b == 0 {
                debug!("Division of {} by zero", a);
                return Object::error("division by zero");
            }
            Object::Integer(a.wrapping_div(b))
        }
        InfixOperator::Lt => Object::from(a < b),
        InfixOperator::Gt => Object::from(a > b),
        InfixOperator::Eq => Object::from(a == b),
        InfixOperator::NotEq => Object::from(a != b),
    }
}

fn eval_if_expression(e: &IfExpression, env: &Env) -> Object {
    let condition = propagate!(eval_expression(&e.condition, env));

    if condition.is_truthy() {
        debug!("Condition is truthy; evaluating consequence");
        eval_block_statement(&e.consequence, env)
    } else if let Some(alternative) = &e.alternative {
        debug!("Condition is falsy; evaluating alternative");
        eval_block_statement(alternative, env)
    } else {
        NULL
    }
}

fn eval_hash_literal(e: &HashLiteral, env: &Env) -> Object {
    let mut hash = HashObject::new();

    for (key_expression, value_expression) in &e.pairs {
        let key = propagate!(eval_expression(key_expression, env));

        let Some(hash_key) = key.hash_key() else {
            return Object::error(format!("unusable as hash key: {}", key.object_type()));
        };

        let value = propagate!(eval_expression(value_expression, env));

        hash.insert(hash_key, HashPair { key, value });
    }

    Object::Hash(Rc::new(hash))
}

fn eval_index_expression(left: &Object, index: &Object) -> Object {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(NULL),

        (Object::Hash(hash), _) => match index.hash_key() {
            Some(key) => hash.get(&key).map_or(NULL, |pair| pair.value.clone()),
            None => Object::error(format!("unusable as hash key: {}", index.object_type())),
        },

        _ => Object::error(format!(
            "index operator not supported: {}",
            left.object_type()
        )),
    }
}

fn apply_function(function: &Object, arguments: Vec<Object>) -> Object {
    match function {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Object::error(format!(
                    "wrong number of arguments: want={}, got={}",
                    function.parameters.len(),
                    arguments.len()
                ));
            }

            let call_env = Environment::enclosed(Rc::clone(&function.env));

            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                call_env.borrow_mut().set(&parameter.value, argument);
            }

            match eval_block_statement(&function.body, &call_env) {
                Object::ReturnValue(value) => *value,
                other => other,
            }
        }

        Object::Builtin(builtin) => {
            debug!("Calling builtin '{}'", builtin.name);

            (builtin.func)(&arguments)
        }

        other => Object::error(format!("not a function: {}", other.object_type())),
    }
}
