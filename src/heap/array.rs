use crate::heap::Result;
use crate::heap::decode::decode_field;
use crate::heap::fields::FieldKind;
use crate::heap::header::{Classified, classify};
use crate::heap::session::Session;
use crate::heap::target::{Expr, Target};
use crate::heap::typeinfo::TypeInfo;
use crate::heap::value::DecodedValue;

/// Largest number of elements materialized as children.
///
/// Every element access is a round trip to the live process; the cap
/// bounds worst-case display latency on huge arrays.
pub const MAX_CHILDREN: usize = 20;

/// Element-wise decoder over a contiguous array object.
#[derive(Debug, Clone)]
pub struct ArrayDecoder {
	base: u64,
	count: usize,
	kind: FieldKind,
	first_offset: u64,
	stride: u64,
}

impl ArrayDecoder {
	/// Probe element geometry for the array object at `base`.
	///
	/// The true count comes from the runtime; element kind and the base
	/// offset come from element 0, and the stride is measured between the
	/// first two element addresses when a second element exists.
	pub fn new<T: Target>(session: &mut Session<T>, base: u64) -> Result<Self> {
		let target = session.target_mut();
		let count = target.evaluate(&Expr::FieldCount(base))? as i32;
		let count = usize::try_from(count).unwrap_or(0);

		let mut kind = FieldKind::Invalid;
		let mut first_offset = 0_u64;
		let mut stride = 0_u64;
		if count > 0 {
			kind = FieldKind::from_raw(target.evaluate(&Expr::FieldType(base, 0))?);
			let first = target.evaluate(&Expr::FieldAddress(base, 0))?;
			first_offset = first.saturating_sub(base);
			stride = if count > 1 {
				target.evaluate(&Expr::FieldAddress(base, 1))?.saturating_sub(first)
			} else {
				kind.width().unwrap_or(0)
			};
		}

		Ok(Self {
			base,
			count,
			kind,
			first_offset,
			stride,
		})
	}

	/// Follow the object reference stored at `field_addr` and build a
	/// decoder when it points at an array-shaped object.
	pub(crate) fn through_field<T: Target>(session: &mut Session<T>, field_addr: u64) -> Result<Option<Self>> {
		let ptr = session.target_mut().read_ptr(field_addr)?;
		let Classified::Instance(type_info) = classify(session.target_mut(), ptr) else {
			return Ok(None);
		};
		if !TypeInfo::read(session.target_mut(), type_info)?.is_array_like() {
			return Ok(None);
		}
		Self::new(session, ptr).map(Some)
	}

	/// Array object base address.
	pub fn base(&self) -> u64 {
		self.base
	}

	/// True element count, uncapped.
	pub fn len(&self) -> usize {
		self.count
	}

	/// Whether the array holds no elements.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Element kind shared by every element.
	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	/// Materialized child count, capped at [`MAX_CHILDREN`].
	pub fn num_children(&self) -> usize {
		self.count.min(MAX_CHILDREN)
	}

	/// Whether any elements exist, capped or not.
	pub fn has_children(&self) -> bool {
		self.count > 0
	}

	/// Parse `"7"` or `"[7]"` into an in-range element index.
	pub fn child_index(&self, name: &str) -> Option<usize> {
		let trimmed = name.trim_start_matches('[').trim_end_matches(']');
		let index = trimmed.parse::<usize>().ok()?;
		(index < self.num_children()).then_some(index)
	}

	/// Decode the element at `index`.
	pub fn child_at<T: Target>(&self, session: &mut Session<T>, index: usize) -> Result<Option<DecodedValue>> {
		if index >= self.num_children() {
			return Ok(None);
		}

		let addr = self
			.base
			.saturating_add(self.first_offset)
			.saturating_add(self.stride.saturating_mul(index as u64));
		decode_field(session, self.kind, addr).map(Some)
	}

	/// Reports the true element count, even past the child cap.
	pub fn summary(&self) -> String {
		if self.count == 1 {
			"1 value".to_owned()
		} else {
			format!("{} values", self.count)
		}
	}
}
