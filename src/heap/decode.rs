use crate::heap::Result;
use crate::heap::fields::FieldKind;
use crate::heap::session::Session;
use crate::heap::target::{Target, read_exact};
use crate::heap::value::{DecodedValue, ObjectRef};

/// Decode the field of kind `kind` stored at `addr`.
///
/// Object references are not followed here; the caller resolves them on
/// demand through the dispatcher, which keeps recursion through object
/// graphs bounded by navigation depth. Unknown kinds produce
/// [`DecodedValue::None`] so display degrades instead of failing.
pub fn decode_field<T: Target>(session: &mut Session<T>, kind: FieldKind, addr: u64) -> Result<DecodedValue> {
	let target = session.target_mut();

	Ok(match kind {
		FieldKind::Invalid => DecodedValue::None,
		FieldKind::Object => DecodedValue::Object(ObjectRef(target.read_ptr(addr)?)),
		FieldKind::Int8 => DecodedValue::I8(scalar::<T, 1>(target, addr)?[0] as i8),
		FieldKind::Int16 => DecodedValue::I16(i16::from_le_bytes(scalar(target, addr)?)),
		FieldKind::Int32 => DecodedValue::I32(i32::from_le_bytes(scalar(target, addr)?)),
		FieldKind::Int64 => DecodedValue::I64(i64::from_le_bytes(scalar(target, addr)?)),
		FieldKind::Float32 => DecodedValue::F32(f32::from_le_bytes(scalar(target, addr)?)),
		FieldKind::Float64 => DecodedValue::F64(f64::from_le_bytes(scalar(target, addr)?)),
		FieldKind::NativePtr => DecodedValue::NativePtr(target.read_ptr(addr)?),
		FieldKind::Boolean => DecodedValue::Bool(scalar::<T, 1>(target, addr)?[0] != 0),
	})
}

fn scalar<T: Target, const N: usize>(target: &mut T, addr: u64) -> Result<[u8; N]> {
	let bytes = read_exact(target, addr, N)?;
	let mut buf = [0_u8; N];
	buf.copy_from_slice(&bytes);
	Ok(buf)
}
