//! Block validation rules
//!
//! A rule invocation is turned into a typed [`BlockRule`] by a fallible parse
//! step. A [`MalformedRule`] never fails a block - the enforcer ignores the
//! invocation instead - whereas a well-formed rule which the block breaks
//! yields a [`BlockRuleViolation`].

pub mod evaluators;
pub mod grammar;

use crate::transactions::FlattenedTransactions;
use gatekeeper_common::validation::BlockRuleViolation;
use grammar::RuleInvocation;
use thiserror::Error;

pub const N_OF_X: &str = "NofX";
pub const X_AT_Y: &str = "XatY";
pub const LOCAL: &str = "local";

/// Block validation rule with typed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRule {
    /// `NofX:N,family` - no more than `limit` transactions of `family`
    NofX { limit: usize, family: String },

    /// `XatY:family,Y` - the transaction at `index` is of `family`
    XatY { family: String, index: usize },

    /// `local:Y[,Y...]` - the transactions at `indices` are signed by the block signer
    Local { indices: Vec<usize> },

    /// Any other kind - always satisfied
    Unrecognised(String),
}

/// Why an invocation could not be turned into a rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRule {
    #[error("{kind} requires arguments in the format {format}, not '{arguments}'")]
    BadArguments {
        kind: &'static str,
        format: &'static str,
        arguments: String,
    },

    #[error("{kind} requires non-negative integer positions, not '{value}'")]
    NotAPosition { kind: &'static str, value: String },

    #[error("{kind} requires a non-negative integer limit, not '{value}'")]
    NotALimit { kind: &'static str, value: String },

    #[error("{kind} requires a non-empty family name")]
    EmptyFamily { kind: &'static str },
}

impl BlockRule {
    /// Interpret an invocation, rejecting arguments of the wrong shape
    pub fn from_invocation(invocation: &RuleInvocation<'_>) -> Result<Self, MalformedRule> {
        match invocation.kind {
            N_OF_X => {
                let [limit, family] = two_arguments(N_OF_X, "int,family", &invocation.args)?;
                Ok(BlockRule::NofX {
                    limit: limit.parse().map_err(|_| MalformedRule::NotALimit {
                        kind: N_OF_X,
                        value: limit.to_string(),
                    })?,
                    family: family_name(N_OF_X, family)?,
                })
            }
            X_AT_Y => {
                let [family, index] = two_arguments(X_AT_Y, "family,int", &invocation.args)?;
                Ok(BlockRule::XatY {
                    family: family_name(X_AT_Y, family)?,
                    index: position(X_AT_Y, index)?,
                })
            }
            LOCAL => {
                if invocation.args.is_empty() {
                    return Err(MalformedRule::BadArguments {
                        kind: LOCAL,
                        format: "int[,int...]",
                        arguments: String::new(),
                    });
                }
                let indices = invocation
                    .args
                    .iter()
                    .map(|arg| position(LOCAL, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(BlockRule::Local { indices })
            }
            other => Ok(BlockRule::Unrecognised(other.to_string())),
        }
    }

    /// Check the rule against a block's transactions
    pub fn check(
        &self,
        txns: &FlattenedTransactions<'_>,
        block_signer: &str,
    ) -> Result<(), BlockRuleViolation> {
        match self {
            BlockRule::NofX { limit, family } => evaluators::n_of_x(txns, *limit, family),
            BlockRule::XatY { family, index } => evaluators::x_at_y(txns, family, *index),
            BlockRule::Local { indices } => evaluators::local(txns, indices, block_signer),
            BlockRule::Unrecognised(_) => Ok(()),
        }
    }
}

fn two_arguments<'a>(
    kind: &'static str,
    format: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; 2], MalformedRule> {
    match args {
        [first, second] => Ok([*first, *second]),
        _ => Err(MalformedRule::BadArguments {
            kind,
            format,
            arguments: args.join(","),
        }),
    }
}

fn position(kind: &'static str, arg: &str) -> Result<usize, MalformedRule> {
    arg.parse().map_err(|_| MalformedRule::NotAPosition {
        kind,
        value: arg.to_string(),
    })
}

fn family_name(kind: &'static str, arg: &str) -> Result<String, MalformedRule> {
    if arg.is_empty() {
        return Err(MalformedRule::EmptyFamily { kind });
    }
    Ok(arg.to_string())
}
