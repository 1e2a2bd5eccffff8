//! Codec module - serialization of method args and replies.
//!
//! - [`MsgPackCodec`] - MessagePack using `rmp-serde` (`to_vec_named`)
//!
//! # Design
//!
//! Codecs are marker structs with static methods. Each typed method captures
//! its args/reply types at registration, so
//! [`MethodDescriptor`](crate::MethodDescriptor) can decode and encode through
//! the codec without the caller naming the concrete types.

mod msgpack;

pub use msgpack::MsgPackCodec;
