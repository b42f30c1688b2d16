//! Type-erased element plumbing.
//!
//! This module provides:
//! - [`Element`]: the boxed, type-erased value that travels between stages.
//! - [`ElementIter`]: the pull interface every stage consumes and produces.
//! - [`Elem`]: the bound every pipeline element type satisfies.
//! - [`TypeTag`]: a lightweight runtime type identifier used in mismatch diagnostics.
//!
//! The typed [`Pipeline`](crate::Pipeline) API guarantees that each stage downcasts to
//! the type the previous stage produced. The helpers here still return
//! [`StreamError::TypeMismatch`] instead of panicking if that guarantee is ever broken.

use crate::error::{Result, StreamError};
use std::any::{Any, TypeId, type_name};

/// A single element in flight between stages.
pub type Element = Box<dyn Any + Send>;

/// Pull-based element stream. Each `next()` call requests exactly one element.
pub type ElementIter = Box<dyn Iterator<Item = Result<Element>>>;

/// Bound for values flowing through a pipeline.
pub trait Elem: 'static + Send {}
impl<T> Elem for T where T: 'static + Send {}

/// Bound for values held by replayable or partitionable sources.
pub trait SourceElem: Elem + Clone + Sync {}
impl<T> SourceElem for T where T: Elem + Clone + Sync {}

/// A lightweight runtime type tag for debugging and assertions.
///
/// ```
/// use ironstream::type_token::TypeTag;
/// let tag = TypeTag::of::<u32>();
/// assert_eq!(tag.name, "u32");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    /// Stable Rust type identifier.
    pub id: TypeId,
    /// Human-readable type name (best-effort).
    pub name: &'static str,
}

impl TypeTag {
    /// Construct a tag for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    fn mismatch(&self) -> StreamError {
        StreamError::TypeMismatch { expected: self.name }
    }
}

/// Box a typed value as an [`Element`].
#[inline]
pub fn erase<T: Elem>(value: T) -> Element {
    Box::new(value)
}

/// Recover an owned `T` from an [`Element`].
pub fn downcast<T: Elem>(element: Element) -> Result<T> {
    element
        .downcast::<T>()
        .map(|b| *b)
        .map_err(|_| TypeTag::of::<T>().mismatch())
}

/// Borrow the `T` inside an [`Element`].
pub fn downcast_ref<T: Elem>(element: &Element) -> Result<&T> {
    element
        .downcast_ref::<T>()
        .ok_or_else(|| TypeTag::of::<T>().mismatch())
}
