mod array;
mod decode;
mod error;
#[cfg(test)]
mod fake;
mod fields;
mod header;
mod list;
mod map;
mod object;
mod resolve;
mod session;
mod string;
mod subtype;
mod target;
mod typeinfo;
mod value;

/// Array element decoding and the materialized-child cap.
pub use array::{ArrayDecoder, MAX_CHILDREN};
/// Per-kind field decoding entry point.
pub use decode::decode_field;
/// Error and result aliases.
pub use error::{HeapError, Result};
/// Field descriptors and the primitive-kind table.
pub use fields::{FieldDescriptor, FieldKind};
/// Raw-address classification by the self-reference rule.
pub use header::{Classified, classify};
/// List decoding over a discovered backing array.
pub use list::ListDecoder;
/// Map decoding over paired backing arrays.
pub use map::MapDecoder;
/// Generic field-by-field object decoding.
pub use object::ObjectDecoder;
/// Top-level decoder selection.
pub use resolve::{Decoder, resolve};
/// Session-scoped caches and well-known type resolution.
pub use session::{KnownType, KnownTypes, Session, TransferBuffer};
/// String transcoding through the shared transfer buffer.
pub use string::StringDecoder;
/// Subtype testing against well-known records.
pub use subtype::is_subtype;
/// Host contract and typed introspection expressions.
pub use target::{Expr, POINTER_SIZE, TAG_MASK, Target};
/// Runtime type metadata records.
pub use typeinfo::{TypeFlags, TypeInfo};
/// Decoded value union.
pub use value::{DecodedValue, ObjectRef};
