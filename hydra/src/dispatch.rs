//! Multiple dispatch resolution.
//!
//! This module implements the dispatch algorithm that selects which arm of
//! a callable to invoke based on the runtime types of all arguments at
//! once.
//!
//! # Algorithm Overview
//!
//! 1. **Fold hierarchies**: consume one (hierarchy, argument) pair per
//!    step, left to right ([`Fold`])
//! 2. **Probe members**: within a hierarchy, probe the argument's runtime
//!    type against each member, most-derived first; the first member the
//!    cast policy accepts wins ([`Resolve`])
//! 3. **Bind**: each match produces a callable with that argument bound at
//!    its narrowed type ([`bind::BoundArg`], [`bind::Resolution`])
//! 4. **Invoke**: once every hierarchy is consumed, the fully-bound
//!    callable runs the arm selected by the narrowed argument tuple
//!
//! Probing is one checked type test per visited member; a mismatch at any
//! argument stops the fold and hands the resolution site to the error
//! policy. Hierarchy order is load-bearing and is validated when the
//! [`Hierarchy`] is constructed, never here.

use std::any::TypeId;

use tracing::trace;

use crate::hierarchy::Hierarchy;
use crate::lineage::{Cons, Lineage, Nil};
use crate::member::{short_type_name, Member, Polymorphic};
use crate::node::TypeNode;
use crate::policy::{CastPolicy, CheckedCast, ErrorPolicy, Policy, Strict};

pub mod bind;
pub mod result;

pub use bind::{BoundArg, Invoke, Resolution, Root};
pub use result::{DispatchError, ResolveSite};

/// The candidate set of a multi-method: one implementation per tuple of
/// narrowed argument types the dispatch can resolve.
///
/// Coverage and ambiguity are host-language concerns. Every combination of
/// member types reachable through the declared hierarchies needs exactly
/// one applicable impl, and all impls for one callable must agree on
/// `Output`. Overlapping impls are rejected by the compiler at the impl
/// site; a missing combination surfaces as an unsatisfied bound at the
/// dispatch call site.
pub trait Arms<Args> {
    /// What every arm of this callable returns.
    type Output;

    /// Invoke the arm selected for `args`.
    fn call(&mut self, args: Args) -> Self::Output;
}

/// A dispatchable argument: a reference whose runtime type can be probed
/// and which narrows to a member type without changing its reference
/// category.
///
/// A shared subject narrows to `&T`, an exclusive subject to `&mut T`;
/// narrowing never adds or drops mutability. Implemented for
/// `&dyn Polymorphic`, `&mut dyn Polymorphic`, and plain `&T` / `&mut T`
/// references to member types.
pub trait Subject: Sized {
    /// The narrowed form of this subject at member type `T`.
    type Narrowed<T: 'static>;

    /// Runtime type of the referenced value.
    fn runtime_type(&self) -> TypeId;

    /// Display name of the runtime type.
    fn runtime_type_name(&self) -> &'static str;

    /// Narrow to member type `T` under the given cast policy, handing the
    /// subject back on refusal.
    fn narrow<T: 'static, C: CastPolicy>(self, cast: &C) -> Result<Self::Narrowed<T>, Self>;
}

impl<'a> Subject for &'a dyn Polymorphic {
    type Narrowed<T: 'static> = &'a T;

    fn runtime_type(&self) -> TypeId {
        Polymorphic::runtime_type(*self)
    }

    fn runtime_type_name(&self) -> &'static str {
        Polymorphic::runtime_type_name(*self)
    }

    fn narrow<T: 'static, C: CastPolicy>(self, cast: &C) -> Result<&'a T, Self> {
        cast.narrow::<T>(self).ok_or(self)
    }
}

impl<'a> Subject for &'a mut dyn Polymorphic {
    type Narrowed<T: 'static> = &'a mut T;

    fn runtime_type(&self) -> TypeId {
        Polymorphic::runtime_type(&**self)
    }

    fn runtime_type_name(&self) -> &'static str {
        Polymorphic::runtime_type_name(&**self)
    }

    fn narrow<T: 'static, C: CastPolicy>(self, cast: &C) -> Result<&'a mut T, Self> {
        cast.narrow_mut::<T>(self)
    }
}

impl<'a, P: Polymorphic> Subject for &'a P {
    type Narrowed<T: 'static> = &'a T;

    fn runtime_type(&self) -> TypeId {
        Polymorphic::runtime_type(*self)
    }

    fn runtime_type_name(&self) -> &'static str {
        Polymorphic::runtime_type_name(*self)
    }

    fn narrow<T: 'static, C: CastPolicy>(self, cast: &C) -> Result<&'a T, Self> {
        cast.narrow::<T>(self).ok_or(self)
    }
}

impl<'a, P: Polymorphic> Subject for &'a mut P {
    type Narrowed<T: 'static> = &'a mut T;

    fn runtime_type(&self) -> TypeId {
        Polymorphic::runtime_type(&**self)
    }

    fn runtime_type_name(&self) -> &'static str {
        Polymorphic::runtime_type_name(&**self)
    }

    fn narrow<T: 'static, C: CastPolicy>(self, cast: &C) -> Result<&'a mut T, Self> {
        match cast.narrow_mut::<T>(self) {
            Ok(narrowed) => Ok(narrowed),
            Err(subject) => {
                // a concrete reference always narrows back to its own type
                match subject
                    .narrow_to_mut(TypeId::of::<P>())
                    .and_then(|own| own.downcast_mut::<P>())
                {
                    Some(original) => Err(original),
                    None => panic!(
                        "`Polymorphic` impl for `{}` does not narrow to its own type",
                        short_type_name::<P>()
                    ),
                }
            }
        }
    }
}

/// Resolves one argument against one hierarchy's members, most-derived
/// first; the first member the cast policy accepts wins.
///
/// Implemented by recursion over the lineage: the single-member lineage is
/// the base case, every longer lineage probes its head and defers to its
/// tail.
pub trait Resolve<S, F, C, E>: Lineage
where
    S: Subject,
    C: CastPolicy,
    E: ErrorPolicy,
{
    /// The partially-applied callable produced on success.
    type Bound;

    fn resolve(
        callable: F,
        argument: S,
        policy: &Policy<C, E>,
        argument_index: usize,
        candidates: &[TypeNode],
    ) -> Result<Self::Bound, DispatchError>;
}

impl<S, F, C, E, H> Resolve<S, F, C, E> for Cons<H, Nil>
where
    S: Subject,
    C: CastPolicy,
    E: ErrorPolicy,
    H: Member,
{
    type Bound = BoundArg<F, S::Narrowed<H>>;

    fn resolve(
        callable: F,
        argument: S,
        policy: &Policy<C, E>,
        argument_index: usize,
        candidates: &[TypeNode],
    ) -> Result<Self::Bound, DispatchError> {
        match argument.narrow::<H, C>(&policy.cast) {
            Ok(narrowed) => {
                trace!(member = short_type_name::<H>(), argument = argument_index, "bound");
                Ok(BoundArg::new(callable, narrowed))
            }
            Err(argument) => Err(policy.error.no_match(&ResolveSite {
                argument: argument_index,
                runtime_type: argument.runtime_type_name(),
                candidates,
            })),
        }
    }
}

impl<S, F, C, E, H, H2, T> Resolve<S, F, C, E> for Cons<H, Cons<H2, T>>
where
    S: Subject,
    C: CastPolicy,
    E: ErrorPolicy,
    H: Member,
    Cons<H2, T>: Resolve<S, F, C, E>,
{
    type Bound = Resolution<BoundArg<F, S::Narrowed<H>>, <Cons<H2, T> as Resolve<S, F, C, E>>::Bound>;

    fn resolve(
        callable: F,
        argument: S,
        policy: &Policy<C, E>,
        argument_index: usize,
        candidates: &[TypeNode],
    ) -> Result<Self::Bound, DispatchError> {
        match argument.narrow::<H, C>(&policy.cast) {
            Ok(narrowed) => {
                trace!(member = short_type_name::<H>(), argument = argument_index, "bound");
                Ok(Resolution::Here(BoundArg::new(callable, narrowed)))
            }
            Err(argument) => {
                trace!(member = short_type_name::<H>(), argument = argument_index, "probe missed");
                <Cons<H2, T> as Resolve<S, F, C, E>>::resolve(
                    callable,
                    argument,
                    policy,
                    argument_index,
                    candidates,
                )
                .map(Resolution::Deeper)
            }
        }
    }
}

/// Left fold of hierarchy/argument pairs: each step consumes one pair and
/// produces a callable with one fewer open argument; the terminal step
/// invokes the fully-bound callable.
pub trait Fold<F, C, E>
where
    C: CastPolicy,
    E: ErrorPolicy,
{
    /// What the selected arm returns.
    type Output;

    fn fold(
        self,
        callable: F,
        policy: &Policy<C, E>,
        argument_index: usize,
    ) -> Result<Self::Output, DispatchError>;
}

impl<F, C, E> Fold<F, C, E> for ()
where
    F: Invoke<()>,
    C: CastPolicy,
    E: ErrorPolicy,
{
    type Output = <F as Invoke<()>>::Output;

    fn fold(
        self,
        callable: F,
        _policy: &Policy<C, E>,
        _argument_index: usize,
    ) -> Result<Self::Output, DispatchError> {
        Ok(callable.invoke(()))
    }
}

impl<'h, L, S, Rest, F, C, E> Fold<F, C, E> for ((&'h Hierarchy<L>, S), Rest)
where
    L: Resolve<S, F, C, E>,
    S: Subject,
    Rest: Fold<<L as Resolve<S, F, C, E>>::Bound, C, E>,
    C: CastPolicy,
    E: ErrorPolicy,
{
    type Output = <Rest as Fold<<L as Resolve<S, F, C, E>>::Bound, C, E>>::Output;

    fn fold(
        self,
        callable: F,
        policy: &Policy<C, E>,
        argument_index: usize,
    ) -> Result<Self::Output, DispatchError> {
        let ((hierarchy, argument), rest) = self;
        let bound = L::resolve(
            callable,
            argument,
            policy,
            argument_index,
            hierarchy.nodes().as_slice(),
        )?;
        rest.fold(bound, policy, argument_index + 1)
    }
}

/// Dispatch `callable` on the runtime types of the paired arguments using
/// the default policies.
///
/// `pairs` is the stack built by [`args!`](crate::args): one
/// (hierarchy, argument) pair per dispatch axis. The selected arm's result
/// is returned unchanged; if some argument's runtime type matches no member
/// of its hierarchy, the default error policy reports a
/// [`DispatchError::NoMatch`] and no arm runs.
pub fn dispatch<'f, F, Pairs>(
    callable: &'f mut F,
    pairs: Pairs,
) -> Result<Pairs::Output, DispatchError>
where
    Pairs: Fold<Root<'f, F>, CheckedCast, Strict>,
{
    dispatch_with(&Policy::default(), callable, pairs)
}

/// Dispatch with explicit cast and error policies.
pub fn dispatch_with<'f, F, C, E, Pairs>(
    policy: &Policy<C, E>,
    callable: &'f mut F,
    pairs: Pairs,
) -> Result<Pairs::Output, DispatchError>
where
    C: CastPolicy,
    E: ErrorPolicy,
    Pairs: Fold<Root<'f, F>, C, E>,
{
    pairs.fold(Root::new(callable), policy, 0)
}

/// Pair each hierarchy with its runtime argument:
/// `args![(&h1, a1), (&h2, a2)]`.
///
/// Expands to the nested pair stack [`dispatch`] folds over; at least one
/// pair is required for the dispatch to compile.
#[macro_export]
macro_rules! args {
    () => { () };
    ( ($hierarchy:expr, $argument:expr) $(, ($h:expr, $a:expr))* $(,)? ) => {
        (($hierarchy, $argument), $crate::args!($( ($h, $a) ),*))
    };
}
