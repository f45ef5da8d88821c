//! Hierarchy membership: runtime type identity and declared parent links.
//!
//! Rust has no class inheritance, so a hierarchy is declared rather than
//! inferred: each member embeds its parent struct by value and the
//! [`polymorphic!`](crate::polymorphic) macro implements the narrowing chain
//! over those embedded fields. Narrowing a value to a probed type succeeds
//! exactly when the probed type is the value's own type or one of its
//! declared ancestors.

use std::any::{Any, TypeId};

/// Object-safe runtime-type surface of a hierarchy member.
///
/// Implementations are expected to come from the
/// [`polymorphic!`](crate::polymorphic) macro. Hand-written implementations
/// must keep `narrow_to` and `narrow_to_mut` in agreement: a target id
/// accepted by one must be accepted by the other, and the returned value
/// must downcast to the target type.
pub trait Polymorphic: 'static {
    /// The most-derived type of `self`.
    fn runtime_type(&self) -> TypeId;

    /// Display name of the most-derived type of `self`.
    fn runtime_type_name(&self) -> &'static str;

    /// Walk the embedded parent chain looking for `target`.
    fn narrow_to(&self, target: TypeId) -> Option<&dyn Any>;

    /// Exclusive-reference form of [`narrow_to`](Polymorphic::narrow_to).
    fn narrow_to_mut(&mut self, target: TypeId) -> Option<&mut dyn Any>;
}

/// A hierarchy member with its declared parent link.
///
/// A hierarchy root names itself as its parent; the ancestor walk stops at
/// the first self-parented type.
pub trait Member: Polymorphic + Sized {
    /// The declared parent type.
    type Parent: Member;
}

/// The declared strict ancestors of `T`, nearest parent first.
pub fn ancestors_of<T: Member>() -> Vec<TypeId> {
    let mut ancestors = Vec::new();
    push_ancestors::<T>(&mut ancestors);
    ancestors
}

fn push_ancestors<T: Member>(ancestors: &mut Vec<TypeId>) {
    if TypeId::of::<T::Parent>() == TypeId::of::<T>() {
        return;
    }
    ancestors.push(TypeId::of::<T::Parent>());
    push_ancestors::<T::Parent>(ancestors);
}

/// The unqualified name of `T`.
pub fn short_type_name<T: 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Declare a type as a hierarchy member.
///
/// `polymorphic!(Root)` declares a hierarchy root; `polymorphic!(Derived:
/// Parent, field)` declares a derived member whose parent is embedded in
/// the named field.
///
/// ```
/// use hydra::polymorphic;
///
/// #[derive(Default)]
/// struct Vehicle;
///
/// #[derive(Default)]
/// struct Car {
///     base: Vehicle,
/// }
///
/// polymorphic!(Vehicle);
/// polymorphic!(Car: Vehicle, base);
/// ```
#[macro_export]
macro_rules! polymorphic {
    ($ty:ty) => {
        impl $crate::member::Polymorphic for $ty {
            fn runtime_type(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<$ty>()
            }

            fn runtime_type_name(&self) -> &'static str {
                $crate::member::short_type_name::<$ty>()
            }

            fn narrow_to(&self, target: ::std::any::TypeId) -> Option<&dyn ::std::any::Any> {
                if target == ::std::any::TypeId::of::<$ty>() {
                    Some(self)
                } else {
                    None
                }
            }

            fn narrow_to_mut(
                &mut self,
                target: ::std::any::TypeId,
            ) -> Option<&mut dyn ::std::any::Any> {
                if target == ::std::any::TypeId::of::<$ty>() {
                    Some(self)
                } else {
                    None
                }
            }
        }

        impl $crate::member::Member for $ty {
            type Parent = $ty;
        }
    };
    ($ty:ty : $parent:ty , $field:ident) => {
        impl $crate::member::Polymorphic for $ty {
            fn runtime_type(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<$ty>()
            }

            fn runtime_type_name(&self) -> &'static str {
                $crate::member::short_type_name::<$ty>()
            }

            fn narrow_to(&self, target: ::std::any::TypeId) -> Option<&dyn ::std::any::Any> {
                if target == ::std::any::TypeId::of::<$ty>() {
                    return Some(self);
                }
                let parent: &$parent = &self.$field;
                $crate::member::Polymorphic::narrow_to(parent, target)
            }

            fn narrow_to_mut(
                &mut self,
                target: ::std::any::TypeId,
            ) -> Option<&mut dyn ::std::any::Any> {
                if target == ::std::any::TypeId::of::<$ty>() {
                    return Some(self);
                }
                let parent: &mut $parent = &mut self.$field;
                $crate::member::Polymorphic::narrow_to_mut(parent, target)
            }
        }

        impl $crate::member::Member for $ty {
            type Parent = $parent;
        }
    };
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
    }

    #[derive(Default)]
    struct Puppy {
        base: Dog,
    }

    #[derive(Default)]
    struct Rock;

    polymorphic!(Animal);
    polymorphic!(Dog: Animal, base);
    polymorphic!(Puppy: Dog, base);
    polymorphic!(Rock);

    #[test]
    fn test_runtime_type_is_the_concrete_type() {
        let puppy = Puppy::default();
        assert_eq!(puppy.runtime_type(), TypeId::of::<Puppy>());
        assert_eq!(puppy.runtime_type_name(), "Puppy");
    }

    #[test]
    fn test_narrow_walks_the_parent_chain() {
        let puppy = Puppy::default();
        assert!(puppy.narrow_to(TypeId::of::<Puppy>()).is_some());
        assert!(puppy.narrow_to(TypeId::of::<Dog>()).is_some());
        assert!(puppy.narrow_to(TypeId::of::<Animal>()).is_some());
        assert!(puppy.narrow_to(TypeId::of::<Rock>()).is_none());
    }

    #[test]
    fn test_narrow_does_not_invent_descendants() {
        // an Animal is not a Dog, even though a Dog is an Animal
        let animal = Animal::default();
        assert!(animal.narrow_to(TypeId::of::<Dog>()).is_none());
    }

    #[test]
    fn test_narrowed_value_downcasts_to_the_target() {
        let mut puppy = Puppy::default();
        let dog = puppy.narrow_to(TypeId::of::<Dog>()).unwrap();
        assert!(dog.downcast_ref::<Dog>().is_some());

        let dog = puppy.narrow_to_mut(TypeId::of::<Dog>()).unwrap();
        assert!(dog.downcast_mut::<Dog>().is_some());
    }

    #[test]
    fn test_ancestors_are_nearest_first() {
        assert_eq!(
            ancestors_of::<Puppy>(),
            vec![TypeId::of::<Dog>(), TypeId::of::<Animal>()]
        );
        assert_eq!(ancestors_of::<Dog>(), vec![TypeId::of::<Animal>()]);
        assert!(ancestors_of::<Animal>().is_empty());
    }

    #[test]
    fn test_short_type_name_strips_the_module_path() {
        assert_eq!(short_type_name::<Animal>(), "Animal");
        assert_eq!(short_type_name::<std::string::String>(), "String");
    }
}
