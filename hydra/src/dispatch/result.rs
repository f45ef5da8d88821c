//! Dispatch result types and errors.

use thiserror::Error;

use crate::node::TypeNode;

/// Where a resolution failed: which argument, its runtime type, and the
/// hierarchy members that were probed.
#[derive(Debug)]
pub struct ResolveSite<'a> {
    /// Zero-based argument position.
    pub argument: usize,
    /// Runtime type name of the argument.
    pub runtime_type: &'static str,
    /// The hierarchy declared for the argument, most-derived first.
    pub candidates: &'a [TypeNode],
}

/// A dispatch invocation that produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No member of the argument's hierarchy accepted its runtime type.
    #[error(
        "argument {argument} has runtime type `{runtime_type}`, \
         which matches no member of [{}]",
        .candidates.join(", ")
    )]
    NoMatch {
        /// Zero-based argument position.
        argument: usize,
        /// Runtime type name of the argument.
        runtime_type: &'static str,
        /// Member names of the probed hierarchy, most-derived first.
        candidates: Vec<&'static str>,
    },

    /// Raised by a custom error policy.
    #[error("{0}")]
    Policy(String),
}

impl DispatchError {
    /// The default rendering of a failed resolution site.
    pub fn no_match(site: &ResolveSite<'_>) -> Self {
        Self::NoMatch {
            argument: site.argument,
            runtime_type: site.runtime_type,
            candidates: site.candidates.iter().map(TypeNode::name).collect(),
        }
    }
}
