use crate::heap::array::ArrayDecoder;
use crate::heap::session::Session;
use crate::heap::target::Target;
use crate::heap::value::DecodedValue;
use crate::heap::{HeapError, Result};

/// Backing-field names tried in order; the name has drifted across
/// runtime revisions.
const BACKING_FIELDS: [&str; 3] = ["backing", "$this_asList", "backingArray"];

/// List decoder delegating every navigation call to the backing array.
#[derive(Debug, Clone)]
pub struct ListDecoder {
	backing: ArrayDecoder,
}

impl ListDecoder {
	/// Locate the backing array for the list object at `base`.
	///
	/// A candidate field only matches when it holds a non-null object
	/// classifying as array-shaped; otherwise the next name is tried.
	pub fn new<T: Target>(session: &mut Session<T>, base: u64, type_info: u64) -> Result<Self> {
		let fields = session.field_layout(base, type_info)?;

		for candidate in BACKING_FIELDS {
			let Some(field) = fields.iter().find(|field| field.name.as_ref() == candidate) else {
				continue;
			};
			let slot = base.saturating_add(field.offset);
			if let Some(backing) = ArrayDecoder::through_field(session, slot)? {
				return Ok(Self { backing });
			}
		}

		Err(HeapError::ListBackingNotFound { addr: base })
	}

	/// Materialized element count of the backing array.
	pub fn num_children(&self) -> usize {
		self.backing.num_children()
	}

	/// Whether the backing array holds elements.
	pub fn has_children(&self) -> bool {
		self.backing.has_children()
	}

	/// Element index parsed the way the backing array parses it.
	pub fn child_index(&self, name: &str) -> Option<usize> {
		self.backing.child_index(name)
	}

	/// Decode the backing element at `index`.
	pub fn child_at<T: Target>(&self, session: &mut Session<T>, index: usize) -> Result<Option<DecodedValue>> {
		self.backing.child_at(session, index)
	}

	/// The backing array's element count summary.
	pub fn summary(&self) -> String {
		self.backing.summary()
	}
}

#[cfg(test)]
mod tests {
	use super::ListDecoder;
	use crate::heap::fake::FakeTarget;
	use crate::heap::session::Session;
	use crate::heap::value::DecodedValue;
	use crate::heap::{HeapError, TypeFlags};

	const LIST_TI: u64 = 0x4000;
	const ARRAY_TI: u64 = 0x4100;

	fn session_with_list(backing_name: &'static str) -> Session<FakeTarget> {
		let mut target = FakeTarget::new();
		target.add_type_info(LIST_TI, 24, 0, &[], TypeFlags::empty());
		target.add_type_info(ARRAY_TI, -8, 0, &[], TypeFlags::empty());

		// List object with one hidden word before the backing slot.
		target.add_object(0x1000, LIST_TI, &[("modCount", 4, 8), (backing_name, 1, 16)]);
		target.write_bytes(0x1008, &0_i32.to_le_bytes());
		target.write_ptr(0x1010, 0x2000);

		target.add_array(0x2000, ARRAY_TI, 1, 16, 8, 3);
		for index in 0..3_u64 {
			target.write_ptr(0x2000 + 16 + 8 * index, 0x9000 + index);
		}

		Session::new(target)
	}

	#[test]
	fn every_known_backing_name_is_accepted() {
		for name in ["backing", "$this_asList", "backingArray"] {
			let mut session = session_with_list(name);
			let decoder = ListDecoder::new(&mut session, 0x1000, LIST_TI).expect("backing found");

			assert_eq!(decoder.num_children(), 3);
			assert_eq!(decoder.summary(), "3 values");
			assert_eq!(
				decoder.child_at(&mut session, 1).expect("element decodes"),
				Some(DecodedValue::Object(crate::heap::ObjectRef(0x9001)))
			);
		}
	}

	#[test]
	fn non_array_candidates_are_skipped() {
		let mut target = FakeTarget::new();
		target.add_type_info(LIST_TI, 24, 0, &[], TypeFlags::empty());
		target.add_type_info(ARRAY_TI, -8, 0, &[], TypeFlags::empty());
		target.add_type_info(0x4200, 16, 0, &[], TypeFlags::empty());

		// `backing` holds a plain object; `backingArray` holds the array.
		target.add_object(0x1000, LIST_TI, &[("backing", 1, 8), ("backingArray", 1, 16)]);
		target.add_object(0x3000, 0x4200, &[]);
		target.write_ptr(0x1008, 0x3000);
		target.write_ptr(0x1010, 0x2000);
		target.add_array(0x2000, ARRAY_TI, 4, 16, 4, 2);

		let mut session = Session::new(target);
		let decoder = ListDecoder::new(&mut session, 0x1000, LIST_TI).expect("second candidate matches");
		assert_eq!(decoder.num_children(), 2);
	}

	#[test]
	fn missing_backing_is_a_structural_error() {
		let mut target = FakeTarget::new();
		target.add_type_info(LIST_TI, 24, 0, &[], TypeFlags::empty());
		target.add_object(0x1000, LIST_TI, &[("elements", 1, 8)]);
		target.write_ptr(0x1008, 0);

		let mut session = Session::new(target);
		let err = ListDecoder::new(&mut session, 0x1000, LIST_TI).expect_err("no candidate matches");
		assert!(matches!(err, HeapError::ListBackingNotFound { addr: 0x1000 }));
		assert!(err.is_structural());
	}
}
