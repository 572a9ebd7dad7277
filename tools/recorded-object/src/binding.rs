//! Call-binding checks for recorded operations.
//!
//! Counts follow the convention of the receiver being an implicit first
//! argument, so `f(self, a)` called as `f(1)` is "2 given".

use crate::errors::CallError;
use crate::signature::Signature;
use crate::types::Arguments;

const RECEIVER: usize = 1;

/// Decides whether `operation(*args.positional, **args.keyword)` would bind
/// against `signature`. The first failing guard is the one reported.
pub fn check_call(
    operation: &str,
    args: &Arguments,
    signature: &Signature,
) -> Result<(), CallError> {
    let num_args = signature.num_named() + RECEIVER;
    let min_args = signature.num_required() + RECEIVER;
    let positional = args.positional.len() + RECEIVER;
    let mut given = positional;

    for keyword in args.keyword.keys() {
        match signature.position(keyword).map(|pos| pos + RECEIVER) {
            Some(pos) if pos < positional => {
                return Err(CallError::DuplicateKeyword {
                    operation: operation.to_string(),
                    keyword: keyword.clone(),
                });
            }
            // Naming a required parameter still satisfies it.
            Some(pos) if pos < min_args => given += 1,
            Some(_) => {}
            None if !signature.accepts_varkw() => {
                return Err(CallError::UnexpectedKeyword {
                    operation: operation.to_string(),
                    keyword: keyword.clone(),
                });
            }
            None => {}
        }
    }

    if signature.is_exact() && given != min_args {
        return Err(CallError::ArityMismatch {
            operation: operation.to_string(),
            expected: num_args,
            given,
        });
    }
    if given < min_args {
        return Err(CallError::TooFewArguments {
            operation: operation.to_string(),
            minimum: min_args,
            given,
            non_keyword: !args.keyword.is_empty(),
        });
    }
    if given > num_args && !signature.accepts_varargs() {
        return Err(CallError::TooManyArguments {
            operation: operation.to_string(),
            maximum: num_args,
            given,
        });
    }
    Ok(())
}

pub fn arg_count(n: usize, non_keyword: bool) -> String {
    let qualifier = if non_keyword { "non-keyword " } else { "" };
    if n == 1 {
        format!("1 {qualifier}argument")
    } else {
        format!("{n} {qualifier}arguments")
    }
}
