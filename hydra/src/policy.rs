//! Pluggable narrowing and mismatch strategies.
//!
//! Dispatch runs under a [`Policy`]: the cast policy decides how an
//! argument narrows to a probed member type, the error policy decides what
//! a failed resolution turns into. The defaults ([`CheckedCast`] +
//! [`Strict`]) give ancestor-aware checked downcasts and a
//! [`DispatchError::NoMatch`] on fallthrough; both strategies are ordinary
//! trait objects of the embedding code's choosing.

use std::any::TypeId;

use crate::dispatch::result::{DispatchError, ResolveSite};
use crate::member::Polymorphic;

/// Governs how an argument is narrowed to a probed member type.
pub trait CastPolicy {
    /// Narrow a shared reference to `T`, if the subject's runtime type
    /// permits it.
    fn narrow<'a, T: 'static>(&self, subject: &'a dyn Polymorphic) -> Option<&'a T>;

    /// Narrow an exclusive reference to `T`; on refusal the subject is
    /// handed back so the caller can keep probing.
    fn narrow_mut<'a, T: 'static>(
        &self,
        subject: &'a mut dyn Polymorphic,
    ) -> Result<&'a mut T, &'a mut dyn Polymorphic>;
}

/// Default cast policy: checked downcast accepting the runtime type itself
/// or any type it declares as an ancestor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckedCast;

impl CastPolicy for CheckedCast {
    fn narrow<'a, T: 'static>(&self, subject: &'a dyn Polymorphic) -> Option<&'a T> {
        subject
            .narrow_to(TypeId::of::<T>())
            .and_then(|narrowed| narrowed.downcast_ref::<T>())
    }

    /// # Panics
    ///
    /// If the subject's `narrow_to` accepts the target but `narrow_to_mut`
    /// does not; the two sides of a [`Polymorphic`] impl must agree.
    fn narrow_mut<'a, T: 'static>(
        &self,
        subject: &'a mut dyn Polymorphic,
    ) -> Result<&'a mut T, &'a mut dyn Polymorphic> {
        // probe through a shared borrow first so the exclusive borrow
        // survives a miss
        if subject.narrow_to(TypeId::of::<T>()).is_none() {
            return Err(subject);
        }
        match subject
            .narrow_to_mut(TypeId::of::<T>())
            .and_then(|narrowed| narrowed.downcast_mut::<T>())
        {
            Some(narrowed) => Ok(narrowed),
            None => panic!(
                "`narrow_to` and `narrow_to_mut` disagree for `{}`",
                std::any::type_name::<T>()
            ),
        }
    }
}

/// Narrow only when the runtime type is exactly the probed type.
///
/// Under this policy an argument never binds to an ancestor of its runtime
/// type, so a hierarchy must name the exact type of every argument it is
/// dispatched with.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCast;

impl CastPolicy for ExactCast {
    fn narrow<'a, T: 'static>(&self, subject: &'a dyn Polymorphic) -> Option<&'a T> {
        if subject.runtime_type() != TypeId::of::<T>() {
            return None;
        }
        CheckedCast.narrow(subject)
    }

    fn narrow_mut<'a, T: 'static>(
        &self,
        subject: &'a mut dyn Polymorphic,
    ) -> Result<&'a mut T, &'a mut dyn Polymorphic> {
        if subject.runtime_type() != TypeId::of::<T>() {
            return Err(subject);
        }
        CheckedCast.narrow_mut(subject)
    }
}

/// Maps a failed resolution to the error surfaced to the caller.
pub trait ErrorPolicy {
    /// No member of the hierarchy accepted the argument's runtime type.
    fn no_match(&self, site: &ResolveSite<'_>) -> DispatchError;
}

/// Default error policy: report the mismatch as
/// [`DispatchError::NoMatch`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl ErrorPolicy for Strict {
    fn no_match(&self, site: &ResolveSite<'_>) -> DispatchError {
        DispatchError::no_match(site)
    }
}

/// The strategies one dispatch invocation runs with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policy<C = CheckedCast, E = Strict> {
    pub cast: C,
    pub error: E,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymorphic;

    #[derive(Default)]
    struct Animal;

    #[derive(Default)]
    struct Dog {
        base: Animal,
        barks: u32,
    }

    #[derive(Default)]
    struct Rock;

    polymorphic!(Animal);
    polymorphic!(Dog: Animal, base);
    polymorphic!(Rock);

    #[test]
    fn test_checked_cast_accepts_self_and_ancestors() {
        let dog = Dog::default();
        let subject: &dyn Polymorphic = &dog;
        assert!(CheckedCast.narrow::<Dog>(subject).is_some());
        assert!(CheckedCast.narrow::<Animal>(subject).is_some());
        assert!(CheckedCast.narrow::<Rock>(subject).is_none());
    }

    #[test]
    fn test_checked_cast_narrow_mut_roundtrip() {
        let mut dog = Dog::default();
        let subject: &mut dyn Polymorphic = &mut dog;
        let narrowed = CheckedCast.narrow_mut::<Dog>(subject).ok().unwrap();
        narrowed.barks += 1;
        assert_eq!(dog.barks, 1);
    }

    #[test]
    fn test_checked_cast_narrow_mut_returns_the_subject_on_miss() {
        let mut dog = Dog::default();
        let subject: &mut dyn Polymorphic = &mut dog;
        let subject = CheckedCast.narrow_mut::<Rock>(subject).err().unwrap();
        // the handed-back subject is still usable for further probes
        assert_eq!(subject.runtime_type_name(), "Dog");
    }

    #[test]
    fn test_exact_cast_refuses_ancestors() {
        let dog = Dog::default();
        let subject: &dyn Polymorphic = &dog;
        assert!(ExactCast.narrow::<Dog>(subject).is_some());
        assert!(ExactCast.narrow::<Animal>(subject).is_none());

        let mut dog = Dog::default();
        let subject: &mut dyn Polymorphic = &mut dog;
        assert!(ExactCast.narrow_mut::<Animal>(subject).is_err());
    }
}
