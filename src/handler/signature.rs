//! Declared call signatures and the calling-convention check.
//!
//! Every handler method is described by a [`Signature`]: the parameters after
//! the receiver plus the declared results. A method is callable over RPC only
//! when its signature has the shape
//!
//! ```text
//! fn(&self, ctx: &Context, args: &Args, reply: &mut Reply) -> Error
//! ```
//!
//! where `Context` and `Error` are the types configured on the registry and
//! `Args`/`Reply` are exported (simple name starts uppercase) or built-in.
//!
//! # Example
//!
//! ```
//! use rpc_service_map::handler::{Param, Signature, TypeTag};
//!
//! // fn helper(&self, x: i32) -> i32
//! let sig = Signature::new()
//!     .param(Param::value::<i32>())
//!     .returns(TypeTag::of::<i32>());
//! assert_eq!(sig.arity(), 2);
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Number of positional slots in a conforming method, receiver included.
pub const METHOD_ARITY: usize = 4;

/// Runtime descriptor of a Rust type: its `TypeId` plus its name.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The underlying `TypeId`.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by `std::any::type_name`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment with generic arguments stripped.
    pub fn simple_name(&self) -> &'static str {
        simple_type_name(self.name)
    }

    /// True for primitives and compound built-ins (tuples, slices, arrays, references).
    pub fn is_builtin(&self) -> bool {
        self.name.starts_with(['(', '[', '&', '*']) || !self.name.contains("::")
    }

    /// True when the type may cross the RPC boundary.
    pub fn is_exported_or_builtin(&self) -> bool {
        self.is_builtin() || is_exported(self.simple_name())
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Passed by value.
    Value,
    /// Passed as `&T`.
    Ref,
    /// Passed as `&mut T`.
    MutRef,
}

/// One declared parameter (receiver excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Passing mode.
    pub kind: ParamKind,
    /// Referenced (or owned) type.
    pub ty: TypeTag,
}

impl Param {
    /// `T` by value.
    pub fn value<T: ?Sized + 'static>() -> Self {
        Self {
            kind: ParamKind::Value,
            ty: TypeTag::of::<T>(),
        }
    }

    /// `&T`.
    pub fn by_ref<T: ?Sized + 'static>() -> Self {
        Self {
            kind: ParamKind::Ref,
            ty: TypeTag::of::<T>(),
        }
    }

    /// `&mut T`.
    pub fn by_mut<T: ?Sized + 'static>() -> Self {
        Self {
            kind: ParamKind::MutRef,
            ty: TypeTag::of::<T>(),
        }
    }

    /// True for `&T` and `&mut T`.
    #[inline]
    pub fn is_reference(&self) -> bool {
        self.kind != ParamKind::Value
    }
}

/// Declared signature of a handler method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Parameters after the receiver.
    pub params: Vec<Param>,
    /// Declared results.
    pub results: Vec<TypeTag>,
}

/// Types bound by a conforming signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conforming {
    /// Type behind the args reference.
    pub args: TypeTag,
    /// Type behind the reply reference.
    pub reply: TypeTag,
}

/// Why a signature does not satisfy the calling convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureMismatch {
    #[error("expected 4 parameters including receiver, found {0}")]
    Arity(usize),

    #[error("context parameter must be a reference")]
    ContextByValue,

    #[error("context parameter has type {found}, expected {expected}")]
    ContextType {
        found: &'static str,
        expected: &'static str,
    },

    #[error("{slot} parameter must be a reference")]
    NotReference { slot: &'static str },

    #[error("{slot} type {ty} is not exported")]
    NotExported {
        slot: &'static str,
        ty: &'static str,
    },

    #[error("expected exactly one result, found {0}")]
    ResultCount(usize),

    #[error("result has type {found}, expected {expected}")]
    ResultType {
        found: &'static str,
        expected: &'static str,
    },
}

impl Signature {
    /// Create an empty signature (`fn(&self)`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Append a result.
    pub fn returns(mut self, ty: TypeTag) -> Self {
        self.results.push(ty);
        self
    }

    /// Number of positional slots, receiver included.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len() + 1
    }

    /// Check the signature against the calling convention.
    pub fn check(
        &self,
        context: TypeTag,
        error: TypeTag,
    ) -> std::result::Result<Conforming, SignatureMismatch> {
        let [ctx, args, reply] = self.params.as_slice() else {
            return Err(SignatureMismatch::Arity(self.arity()));
        };

        if !ctx.is_reference() {
            return Err(SignatureMismatch::ContextByValue);
        }
        if ctx.ty != context {
            return Err(SignatureMismatch::ContextType {
                found: ctx.ty.name(),
                expected: context.name(),
            });
        }

        for (slot, param) in [("args", args), ("reply", reply)] {
            if !param.is_reference() {
                return Err(SignatureMismatch::NotReference { slot });
            }
            if !param.ty.is_exported_or_builtin() {
                return Err(SignatureMismatch::NotExported {
                    slot,
                    ty: param.ty.name(),
                });
            }
        }

        match self.results.as_slice() {
            [result] if *result == error => Ok(Conforming {
                args: args.ty,
                reply: reply.ty,
            }),
            [result] => Err(SignatureMismatch::ResultType {
                found: result.name(),
                expected: error.name(),
            }),
            results => Err(SignatureMismatch::ResultCount(results.len())),
        }
    }
}

/// True when `name` starts with an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Last path segment of a type name with generics stripped.
///
/// Compound built-ins (`(A, B)`, `[T]`, `&T`) are returned unchanged.
pub fn simple_type_name(full: &str) -> &str {
    if full.starts_with(['(', '[', '&', '*']) {
        return full;
    }
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx;
    struct Failure;
    struct Operands;

    #[allow(non_camel_case_types)]
    struct hidden;

    fn conforming() -> Signature {
        Signature::new()
            .param(Param::by_ref::<Ctx>())
            .param(Param::by_ref::<Operands>())
            .param(Param::by_mut::<i64>())
            .returns(TypeTag::of::<Failure>())
    }

    fn check(sig: &Signature) -> std::result::Result<Conforming, SignatureMismatch> {
        sig.check(TypeTag::of::<Ctx>(), TypeTag::of::<Failure>())
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("alloc::string::String"), "String");
        assert_eq!(simple_type_name("alloc::vec::Vec<i32>"), "Vec");
        assert_eq!(
            simple_type_name("std::collections::HashMap<alloc::string::String, u8>"),
            "HashMap"
        );
        assert_eq!(simple_type_name("i32"), "i32");
        assert_eq!(simple_type_name("(i32, alloc::string::String)"), "(i32, alloc::string::String)");
    }

    #[test]
    fn test_is_exported() {
        assert!(is_exported("Add"));
        assert!(is_exported("Ärger"));
        assert!(!is_exported("add"));
        assert!(!is_exported("_Add"));
        assert!(!is_exported(""));
    }

    #[test]
    fn test_builtin_detection() {
        assert!(TypeTag::of::<i32>().is_builtin());
        assert!(TypeTag::of::<str>().is_builtin());
        assert!(TypeTag::of::<()>().is_builtin());
        assert!(TypeTag::of::<(i32, String)>().is_builtin());
        assert!(TypeTag::of::<[u8]>().is_builtin());
        assert!(!TypeTag::of::<String>().is_builtin());
        assert!(!TypeTag::of::<Operands>().is_builtin());
    }

    #[test]
    fn test_exported_or_builtin() {
        assert!(TypeTag::of::<Operands>().is_exported_or_builtin());
        assert!(TypeTag::of::<Vec<hidden>>().is_exported_or_builtin());
        assert!(TypeTag::of::<u64>().is_exported_or_builtin());
        assert!(!TypeTag::of::<hidden>().is_exported_or_builtin());
    }

    #[test]
    fn test_type_tag_equality_uses_type_id() {
        assert_eq!(TypeTag::of::<Ctx>(), TypeTag::of::<Ctx>());
        assert_ne!(TypeTag::of::<Ctx>(), TypeTag::of::<Failure>());
        assert_eq!(TypeTag::of::<Operands>().simple_name(), "Operands");
    }

    #[test]
    fn test_conforming_signature() {
        let bound = check(&conforming()).unwrap();
        assert_eq!(bound.args, TypeTag::of::<Operands>());
        assert_eq!(bound.reply, TypeTag::of::<i64>());
        assert_eq!(conforming().arity(), METHOD_ARITY);
    }

    #[test]
    fn test_wrong_arity() {
        let sig = Signature::new()
            .param(Param::value::<i32>())
            .returns(TypeTag::of::<i32>());
        assert_eq!(check(&sig), Err(SignatureMismatch::Arity(2)));

        let mut sig = conforming();
        sig.params.push(Param::by_ref::<u8>());
        assert_eq!(check(&sig), Err(SignatureMismatch::Arity(5)));
    }

    #[test]
    fn test_context_checks() {
        let mut sig = conforming();
        sig.params[0] = Param::value::<Ctx>();
        assert_eq!(check(&sig), Err(SignatureMismatch::ContextByValue));

        sig.params[0] = Param::by_ref::<String>();
        assert!(matches!(check(&sig), Err(SignatureMismatch::ContextType { .. })));
    }

    #[test]
    fn test_args_and_reply_must_be_references() {
        let mut sig = conforming();
        sig.params[1] = Param::value::<Operands>();
        assert_eq!(
            check(&sig),
            Err(SignatureMismatch::NotReference { slot: "args" })
        );

        let mut sig = conforming();
        sig.params[2] = Param::value::<i64>();
        assert_eq!(
            check(&sig),
            Err(SignatureMismatch::NotReference { slot: "reply" })
        );
    }

    #[test]
    fn test_unexported_payload_type() {
        let mut sig = conforming();
        sig.params[2] = Param::by_mut::<hidden>();
        assert!(matches!(
            check(&sig),
            Err(SignatureMismatch::NotExported { slot: "reply", .. })
        ));
    }

    #[test]
    fn test_result_checks() {
        let mut sig = conforming();
        sig.results.clear();
        assert_eq!(check(&sig), Err(SignatureMismatch::ResultCount(0)));

        sig.results = vec![TypeTag::of::<Failure>(), TypeTag::of::<Failure>()];
        assert_eq!(check(&sig), Err(SignatureMismatch::ResultCount(2)));

        sig.results = vec![TypeTag::of::<String>()];
        assert!(matches!(check(&sig), Err(SignatureMismatch::ResultType { .. })));
    }
}
