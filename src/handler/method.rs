//! Method tables, type-erased invokers and resolved method descriptors.
//!
//! A handler describes its capability set through [`Service::methods`]: a list
//! of [`MethodSpec`] entries. Typed entries carry a body and a signature
//! derived from the Rust function type; declared entries carry only a
//! signature and are never callable. The registry filters the table against
//! the calling convention and turns the survivors into [`MethodDescriptor`]s.
//!
//! # Example
//!
//! ```
//! use rpc_service_map::handler::{CallResult, MethodSpec, Service};
//! use rpc_service_map::RequestContext;
//!
//! struct Echo;
//!
//! impl Echo {
//!     fn say(&self, _ctx: &RequestContext, args: &String, reply: &mut String) -> CallResult {
//!         reply.push_str(args);
//!         Ok(())
//!     }
//! }
//!
//! impl Service for Echo {
//!     fn methods(&self) -> Vec<MethodSpec> {
//!         vec![MethodSpec::method("Say", Echo::say)]
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::signature::{simple_type_name, Param, Signature, TypeTag};
use crate::codec::MsgPackCodec;
use crate::error::{CallError, Result};

/// Shared reference to a registered handler instance.
pub type HandlerRef = Arc<dyn Any + Send + Sync>;

/// Result type of every callable handler method.
pub type CallResult = std::result::Result<(), CallError>;

/// A handler object whose declared methods may be invoked remotely.
pub trait Service: Send + Sync + 'static {
    /// The handler's capability table.
    fn methods(&self) -> Vec<MethodSpec>;

    /// Name used when the handler is registered under an empty path.
    ///
    /// Defaults to the type's simple name (`my_crate::Calculator` becomes
    /// `Calculator`). Overrides must return a single exported segment;
    /// dotted names are rejected at registration.
    fn service_name(&self) -> String
    where
        Self: Sized,
    {
        simple_type_name(std::any::type_name::<Self>()).to_string()
    }
}

/// Type-erased invoker bound to one handler method.
///
/// Also carries the codec binding for the method's args and reply types.
pub trait Callable: Send + Sync + 'static {
    /// Invoke against `handler` with erased (context, args, reply) slots.
    fn invoke(
        &self,
        handler: &(dyn Any + Send + Sync),
        ctx: &dyn Any,
        args: &dyn Any,
        reply: &mut dyn Any,
    ) -> CallResult;

    /// Decode an args value from a MsgPack payload.
    fn decode_args(&self, payload: &[u8]) -> Result<Box<dyn Any + Send>>;

    /// Allocate a default reply value.
    fn new_reply(&self) -> Box<dyn Any + Send>;

    /// Encode a reply value to MsgPack.
    fn encode_reply(&self, reply: &dyn Any) -> Result<Vec<u8>>;
}

/// Callable wrapper around `Fn(&S, &C, &A, &mut R) -> Result<(), E>`.
///
/// The handler's own error type `E` is converted into [`CallError`] at the
/// erased boundary.
pub struct TypedMethod<S, C, A, R, E, F> {
    handler: F,
    _phantom: PhantomData<fn(&S, &C, &A, &mut R) -> E>,
}

impl<S, C, A, R, E, F> TypedMethod<S, C, A, R, E, F>
where
    F: Fn(&S, &C, &A, &mut R) -> std::result::Result<(), E> + Send + Sync + 'static,
{
    /// Create a new typed method.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<S, C, A, R, E, F> Callable for TypedMethod<S, C, A, R, E, F>
where
    S: Send + Sync + 'static,
    C: 'static,
    A: DeserializeOwned + Send + 'static,
    R: Serialize + Default + Send + 'static,
    E: Into<CallError> + 'static,
    F: Fn(&S, &C, &A, &mut R) -> std::result::Result<(), E> + Send + Sync + 'static,
{
    fn invoke(
        &self,
        handler: &(dyn Any + Send + Sync),
        ctx: &dyn Any,
        args: &dyn Any,
        reply: &mut dyn Any,
    ) -> CallResult {
        let handler = handler.downcast_ref::<S>().ok_or_else(CallError::mismatch::<S>)?;
        let ctx = ctx.downcast_ref::<C>().ok_or_else(CallError::mismatch::<C>)?;
        let args = args.downcast_ref::<A>().ok_or_else(CallError::mismatch::<A>)?;
        let reply = reply.downcast_mut::<R>().ok_or_else(CallError::mismatch::<R>)?;

        (self.handler)(handler, ctx, args, reply).map_err(Into::into)
    }

    fn decode_args(&self, payload: &[u8]) -> Result<Box<dyn Any + Send>> {
        let args: A = MsgPackCodec::decode(payload)?;
        Ok(Box::new(args))
    }

    fn new_reply(&self) -> Box<dyn Any + Send> {
        Box::new(R::default())
    }

    fn encode_reply(&self, reply: &dyn Any) -> Result<Vec<u8>> {
        let reply = reply.downcast_ref::<R>().ok_or_else(CallError::mismatch::<R>)?;
        MsgPackCodec::encode(reply)
    }
}

/// One entry of a handler's capability table.
#[derive(Clone)]
pub struct MethodSpec {
    name: String,
    signature: Signature,
    callable: Option<Arc<dyn Callable>>,
}

impl MethodSpec {
    /// A callable method; the signature is derived from `F`.
    ///
    /// The recorded result type is the handler's error type `E`, so the entry
    /// is accepted only by a registry whose configured error type is `E`.
    pub fn method<S, C, A, R, E, F>(name: &str, handler: F) -> Self
    where
        S: Send + Sync + 'static,
        C: 'static,
        A: DeserializeOwned + Send + 'static,
        R: Serialize + Default + Send + 'static,
        E: Into<CallError> + 'static,
        F: Fn(&S, &C, &A, &mut R) -> std::result::Result<(), E> + Send + Sync + 'static,
    {
        let signature = Signature::new()
            .param(Param::by_ref::<C>())
            .param(Param::by_ref::<A>())
            .param(Param::by_mut::<R>())
            .returns(TypeTag::of::<E>());

        Self {
            name: name.to_string(),
            signature,
            callable: Some(Arc::new(TypedMethod::<S, C, A, R, E, F>::new(handler))),
        }
    }

    /// A method known only by its signature. Never callable.
    pub fn declared(name: &str, signature: Signature) -> Self {
        Self {
            name: name.to_string(),
            signature,
            callable: None,
        }
    }

    /// Method name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared signature.
    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// True when the entry has a body.
    #[inline]
    pub fn is_callable(&self) -> bool {
        self.callable.is_some()
    }

    pub(crate) fn callable(&self) -> Option<&Arc<dyn Callable>> {
        self.callable.as_ref()
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("callable", &self.is_callable())
            .finish()
    }
}

/// A resolved, callable method plus its args/reply type metadata.
///
/// Cloning is cheap; the invoker is shared.
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    arg_type: TypeTag,
    reply_type: TypeTag,
    callable: Arc<dyn Callable>,
}

impl MethodDescriptor {
    pub(crate) fn new(
        name: &str,
        arg_type: TypeTag,
        reply_type: TypeTag,
        callable: Arc<dyn Callable>,
    ) -> Self {
        Self {
            name: name.to_string(),
            arg_type,
            reply_type,
            callable,
        }
    }

    /// Method name as exposed by the handler.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type of the args value.
    #[inline]
    pub fn arg_type(&self) -> TypeTag {
        self.arg_type
    }

    /// Type of the reply value.
    #[inline]
    pub fn reply_type(&self) -> TypeTag {
        self.reply_type
    }

    /// Invoke the method on its owning handler.
    pub fn invoke(
        &self,
        handler: &HandlerRef,
        ctx: &dyn Any,
        args: &dyn Any,
        reply: &mut dyn Any,
    ) -> CallResult {
        self.callable.invoke(&**handler, ctx, args, reply)
    }

    /// Decode an args value from a MsgPack payload.
    pub fn decode_args(&self, payload: &[u8]) -> Result<Box<dyn Any + Send>> {
        self.callable.decode_args(payload)
    }

    /// Allocate a default reply value.
    pub fn new_reply(&self) -> Box<dyn Any + Send> {
        self.callable.new_reply()
    }

    /// Encode a reply value to MsgPack.
    pub fn encode_reply(&self, reply: &dyn Any) -> Result<Vec<u8>> {
        self.callable.encode_reply(reply)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("arg_type", &self.arg_type)
            .field("reply_type", &self.reply_type)
            .finish_non_exhaustive()
    }
}
