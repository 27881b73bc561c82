//! Signature matching
//!
//! Picks the constructor or method overload that best fits a list of
//! argument values:
//!
//! 1. Keep candidates whose arity equals the argument count.
//! 2. Keep candidates where every argument fits its parameter: a non-null
//!    argument's runtime kind must be assignable to the parameter kind, a
//!    null argument needs a parameter that accepts null.
//! 3. One survivor wins outright.
//! 4. Otherwise the survivor that is more specific than every other one
//!    wins. `A` is more specific than `B` when each of `A`'s parameters (at
//!    non-null argument positions) is assignable to `B`'s, and at least one
//!    of them is strictly narrower. No such survivor is an ambiguity.

use refract_types::{accepts_null, is_assignable, is_strictly_narrower, TypeKind};
use tracing::{debug, trace};

use crate::error::{ReflectError, ReflectResult};
use crate::shape::{Constructor, Method};
use crate::value::Value;

/// Anything with a parameter list that can be matched against arguments
pub trait Signature {
    /// Parameter kinds in declaration order
    fn params(&self) -> &[TypeKind];

    /// Human-readable signature, e.g. `Person(String, i32)`
    fn describe(&self) -> String;
}

impl Signature for Constructor {
    fn params(&self) -> &[TypeKind] {
        Constructor::params(self)
    }

    fn describe(&self) -> String {
        format!("{}({})", self.owner(), join_kinds(self.params()))
    }
}

impl Signature for Method {
    fn params(&self) -> &[TypeKind] {
        Method::params(self)
    }

    fn describe(&self) -> String {
        format!("{}.{}({})", self.owner(), self.name(), join_kinds(self.params()))
    }
}

fn join_kinds(kinds: &[TypeKind]) -> String {
    kinds.iter().map(|k| k.type_name()).collect::<Vec<_>>().join(", ")
}

fn applicable(params: &[TypeKind], arg_kinds: &[Option<TypeKind>]) -> bool {
    params.len() == arg_kinds.len()
        && params.iter().zip(arg_kinds).all(|(param, arg)| match arg {
            Some(kind) => is_assignable(kind, param),
            None => accepts_null(param),
        })
}

/// Check if `a` is more specific than `b` for the given arguments
fn more_specific(a: &[TypeKind], b: &[TypeKind], arg_kinds: &[Option<TypeKind>]) -> bool {
    let mut strictly = false;
    for ((pa, pb), arg) in a.iter().zip(b).zip(arg_kinds) {
        if arg.is_none() {
            continue;
        }
        if !is_assignable(pa, pb) {
            return false;
        }
        if is_strictly_narrower(pa, pb) {
            strictly = true;
        }
    }
    strictly
}

/// Select the best candidate for `args`.
///
/// `target` names what is being resolved and appears in errors.
pub fn select<'c, S: Signature>(
    target: &str,
    candidates: &'c [S],
    args: &[Value],
) -> ReflectResult<&'c S> {
    let arg_kinds: Vec<Option<TypeKind>> = args.iter().map(Value::runtime_kind).collect();

    let survivors: Vec<&S> = candidates
        .iter()
        .filter(|c| {
            let fits = applicable(c.params(), &arg_kinds);
            if !fits {
                trace!(signature = target, candidate = %c.describe(), "discarded signature");
            }
            fits
        })
        .collect();
    trace!(signature = target, candidates = candidates.len(), survivors = survivors.len(), "filtered signatures");

    match survivors.as_slice() {
        [] => Err(ReflectError::NoMatchingSignature {
            target: target.to_string(),
            arg_types: args.iter().map(Value::type_name).collect(),
        }),
        [only] => Ok(*only),
        many => {
            let best: Vec<&S> = many
                .iter()
                .enumerate()
                .filter(|(i, c)| {
                    many.iter()
                        .enumerate()
                        .all(|(j, other)| *i == j || more_specific(c.params(), other.params(), &arg_kinds))
                })
                .map(|(_, c)| *c)
                .collect();
            match best.as_slice() {
                [winner] => {
                    debug!(signature = target, chosen = %winner.describe(), "selected most specific signature");
                    Ok(*winner)
                }
                _ => Err(ReflectError::AmbiguousMatch {
                    target: target.to_string(),
                    candidates: many.iter().map(|c| c.describe()).collect(),
                }),
            }
        }
    }
}

/// Select the candidate whose parameter list is exactly `params`
pub fn select_exact<'c, S: Signature>(
    target: &str,
    candidates: &'c [S],
    params: &[TypeKind],
) -> ReflectResult<&'c S> {
    candidates
        .iter()
        .find(|c| c.params() == params)
        .ok_or_else(|| ReflectError::NoMatchingSignature {
            target: target.to_string(),
            arg_types: params.iter().map(|k| k.type_name()).collect(),
        })
}
