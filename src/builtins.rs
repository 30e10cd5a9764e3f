//! Native functions available to every Monkey program.
//!
//! The table is a compile‑time perfect‑hash map, so it is immutable and
//! shared by all evaluations.  Each builtin validates its own arguments and
//! reports misuse as an `Error` object.

use std::fmt;

use log::debug;
use phf::phf_map;

use crate::object::{Object, NULL};

/// Signature shared by all builtins.
pub type BuiltinFn = fn(&[Object]) -> Object;

pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "len"   => Builtin { name: "len",   func: len },
    "first" => Builtin { name: "first", func: first },
    "last"  => Builtin { name: "last",  func: last },
    "rest"  => Builtin { name: "rest",  func: rest },
    "push"  => Builtin { name: "push",  func: push },
    "puts"  => Builtin { name: "puts",  func: puts },
};

/// Find the builtin called `name`.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

fn wrong_arity(got: usize, want: usize) -> Object {
    Object::error(format!(
        "wrong number of arguments. got={}, want={}",
        got, want
    ))
}

fn len(args: &[Object]) -> Object {
    let [arg] = args else {
        return wrong_arity(args.len(), 1);
    };

    match arg {
        // Unicode scalar values, not bytes.
        Object::String(s) => Object::Integer(s.chars().count() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::error(format!(
            "argument to `len` not supported, got={}",
            other.object_type()
        )),
    }
}

fn first(args: &[Object]) -> Object {
    let [arg] = args else {
        return wrong_arity(args.len(), 1);
    };

    match arg {
        Object::Array(elements) => elements.first().cloned().unwrap_or(NULL),
        other => Object::error(format!(
            "argument to `first` must be ARRAY, got {}",
            other.object_type()
        )),
    }
}

fn last(args: &[Object]) -> Object {
    let [arg] = args else {
        return wrong_arity(args.len(), 1);
    };

    match arg {
        Object::Array(elements) => elements.last().cloned().unwrap_or(NULL),
        other => Object::error(format!(
            "argument to `last` must be ARRAY, got {}",
            other.object_type()
        )),
    }
}

fn rest(args: &[Object]) -> Object {
    let [arg] = args else {
        return wrong_arity(args.len(), 1);
    };

    match arg {
        Object::Array(elements) if elements.is_empty() => NULL,
        Object::Array(elements) => Object::array(elements[1..].to_vec()),
        other => Object::error(format!(
            "argument to `rest` must be ARRAY, got {}",
            other.object_type()
        )),
    }
}

/// Returns a new array; the argument is left untouched.
fn push(args: &[Object]) -> Object {
    let [array, value] = args else {
        return wrong_arity(args.len(), 2);
    };

    match array {
        Object::Array(elements) => {
            let mut extended = Vec::with_capacity(elements.len() + 1);
            extended.extend(elements.iter().cloned());
            extended.push(value.clone());
            Object::array(extended)
        }
        other => Object::error(format!(
            "argument to `push` must be ARRAY, got {}",
            other.object_type()
        )),
    }
}

fn puts(args: &[Object]) -> Object {
    for arg in args {
        debug!("puts: {}", arg);

        println!("{}", arg);
    }

    NULL
}
