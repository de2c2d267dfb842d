use bitflags::bitflags;

use crate::heap::Result;
use crate::heap::target::{POINTER_SIZE, Target, read_exact};

const INSTANCE_SIZE_OFFSET: usize = 20;
const SUPER_TYPE_OFFSET: usize = 24;
const INTERFACES_OFFSET: usize = 48;
const INTERFACES_COUNT_OFFSET: usize = 56;
const FLAGS_OFFSET: usize = 88;

/// Bytes covering every record field the decoder reads.
const RECORD_PREFIX: usize = 96;

/// Ceiling on implemented-interface reads from one record.
const MAX_INTERFACES: usize = 1024;

bitflags! {
	/// Per-type flag bits carried by a runtime type record.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct TypeFlags: u32 {
		/// Instances are deeply immutable.
		const IMMUTABLE = 1 << 0;
		/// Instances can never participate in reference cycles.
		const ACYCLIC = 1 << 1;
		/// Record describes an interface rather than a class.
		const INTERFACE = 1 << 2;
		/// Obj-C dynamic dispatch type.
		const OBJC_DYNAMIC = 1 << 3;
		/// Candidate for leak detector bookkeeping.
		const LEAK_DETECTOR_CANDIDATE = 1 << 4;
		/// Suspend function wrapper type.
		const SUSPEND_FUNCTION = 1 << 5;
		/// Instances run a finalizer.
		const HAS_FINALIZER = 1 << 6;
		/// Instances run a freeze hook.
		const HAS_FREEZE_HOOK = 1 << 7;
		/// Package name is visible to reflection.
		const REFLECTION_SHOW_PKG_NAME = 1 << 8;
		/// Relative name is visible to reflection.
		const REFLECTION_SHOW_REL_NAME = 1 << 9;
	}
}

/// Decoded prefix of one runtime type metadata record.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
	/// Address of the record itself.
	pub addr: u64,
	/// Declared instance size; negative magnitude is the element size of
	/// an array-shaped type.
	pub instance_size: i32,
	/// Super-class record address, 0 at the hierarchy root.
	pub super_type: u64,
	/// Address of the implemented-interface pointer array.
	pub interfaces_ptr: u64,
	/// Number of implemented interfaces.
	pub interfaces_count: i32,
	/// Per-type flag bits.
	pub flags: TypeFlags,
}

impl TypeInfo {
	/// Read the record prefix at `addr` from target memory.
	pub fn read<T: Target + ?Sized>(target: &mut T, addr: u64) -> Result<Self> {
		let bytes = read_exact(target, addr, RECORD_PREFIX)?;
		Ok(Self {
			addr,
			instance_size: i32_at(&bytes, INSTANCE_SIZE_OFFSET),
			super_type: u64_at(&bytes, SUPER_TYPE_OFFSET),
			interfaces_ptr: u64_at(&bytes, INTERFACES_OFFSET),
			interfaces_count: i32_at(&bytes, INTERFACES_COUNT_OFFSET),
			flags: TypeFlags::from_bits_retain(i32_at(&bytes, FLAGS_OFFSET) as u32),
		})
	}

	/// Whether this record describes an interface.
	pub fn is_interface(&self) -> bool {
		self.flags.contains(TypeFlags::INTERFACE)
	}

	/// Whether instances are array-shaped.
	pub fn is_array_like(&self) -> bool {
		self.instance_size < 0
	}

	/// Element byte width for array-shaped records.
	pub fn element_size(&self) -> u32 {
		self.instance_size.unsigned_abs()
	}

	/// Read the implemented-interface record addresses.
	pub fn implemented_interfaces<T: Target + ?Sized>(&self, target: &mut T) -> Result<Vec<u64>> {
		let count = usize::try_from(self.interfaces_count).unwrap_or(0).min(MAX_INTERFACES);
		if count == 0 || self.interfaces_ptr == 0 {
			return Ok(Vec::new());
		}

		let bytes = read_exact(target, self.interfaces_ptr, count * POINTER_SIZE)?;
		Ok(bytes.chunks_exact(POINTER_SIZE).map(|chunk| u64_at(chunk, 0)).collect())
	}
}

fn u64_at(bytes: &[u8], offset: usize) -> u64 {
	let mut buf = [0_u8; 8];
	buf.copy_from_slice(&bytes[offset..offset + 8]);
	u64::from_le_bytes(buf)
}

fn i32_at(bytes: &[u8], offset: usize) -> i32 {
	let mut buf = [0_u8; 4];
	buf.copy_from_slice(&bytes[offset..offset + 4]);
	i32::from_le_bytes(buf)
}
