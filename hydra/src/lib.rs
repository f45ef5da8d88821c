//! Multiple dispatch over declared type hierarchies.
//!
//! Single dispatch resolves polymorphism on one receiver; `hydra` resolves
//! it on every argument at once. Callers declare each hierarchy as an
//! ordered, most-derived-first [`Hierarchy`], implement one [`Arms`] arm
//! per combination of member types, and [`dispatch`] selects the arm
//! matching the runtime types of all arguments, at the cost of one checked
//! type test per probed hierarchy member.
//!
//! Hierarchies are declared, not inferred: a member embeds its parent
//! struct by value and the [`polymorphic!`] macro implements the narrowing
//! chain. Declarations are validated when the [`Hierarchy`] is built
//! (non-empty, duplicate-free, derived-before-base), so a misordered
//! hierarchy fails at construction instead of silently binding a
//! less-derived arm.
//!
//! # Example
//!
//! ```
//! use hydra::{args, dispatch, lineage, polymorphic, Arms, Hierarchy};
//!
//! // One chain per dispatch axis, parents embedded by value.
//! #[derive(Default)]
//! struct Shape;
//!
//! #[derive(Default)]
//! struct Circle {
//!     base: Shape,
//! }
//!
//! #[derive(Default)]
//! struct Tool;
//!
//! #[derive(Default)]
//! struct Brush {
//!     base: Tool,
//! }
//!
//! polymorphic!(Shape);
//! polymorphic!(Circle: Shape, base);
//! polymorphic!(Tool);
//! polymorphic!(Brush: Tool, base);
//!
//! // One arm per resolvable pair of member types.
//! struct Draw;
//!
//! impl<'a, 'b> Arms<(&'a Shape, &'b Tool)> for Draw {
//!     type Output = &'static str;
//!     fn call(&mut self, _: (&Shape, &Tool)) -> &'static str {
//!         "shape/tool"
//!     }
//! }
//!
//! impl<'a, 'b> Arms<(&'a Shape, &'b Brush)> for Draw {
//!     type Output = &'static str;
//!     fn call(&mut self, _: (&Shape, &Brush)) -> &'static str {
//!         "shape/brush"
//!     }
//! }
//!
//! impl<'a, 'b> Arms<(&'a Circle, &'b Tool)> for Draw {
//!     type Output = &'static str;
//!     fn call(&mut self, _: (&Circle, &Tool)) -> &'static str {
//!         "circle/tool"
//!     }
//! }
//!
//! impl<'a, 'b> Arms<(&'a Circle, &'b Brush)> for Draw {
//!     type Output = &'static str;
//!     fn call(&mut self, _: (&Circle, &Brush)) -> &'static str {
//!         "circle/brush"
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shapes = Hierarchy::<lineage![Circle, Shape]>::new()?;
//!     let tools = Hierarchy::<lineage![Brush, Tool]>::new()?;
//!
//!     let circle = Circle::default();
//!     let brush = Brush::default();
//!
//!     // both runtime types recovered in one call
//!     let mut draw = Draw;
//!     let drawn = dispatch(&mut draw, args![(&shapes, &circle), (&tools, &brush)])?;
//!     assert_eq!(drawn, "circle/brush");
//!     Ok(())
//! }
//! ```
//!
//! Dispatch runs under a [`Policy`]; the defaults give ancestor-aware
//! checked narrowing ([`CheckedCast`]) and a [`DispatchError::NoMatch`]
//! when an argument's runtime type matches no hierarchy member
//! ([`Strict`]). Both strategies are replaceable through
//! [`dispatch_with`].

pub mod dispatch;
pub mod hierarchy;
pub mod lineage;
pub mod member;
pub mod node;
pub mod policy;

pub use dispatch::{
    dispatch, dispatch_with, Arms, DispatchError, Fold, Invoke, Resolve, ResolveSite, Subject,
};
pub use hierarchy::{Hierarchy, HierarchyError};
pub use lineage::{Concat, Cons, Lineage, Nil};
pub use member::{short_type_name, Member, Polymorphic};
pub use node::{NodeList, TypeNode};
pub use policy::{CastPolicy, CheckedCast, ErrorPolicy, ExactCast, Policy, Strict};
