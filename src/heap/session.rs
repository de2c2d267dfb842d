use rustc_hash::FxHashMap;

use crate::heap::fields::{FieldDescriptor, read_field_layout};
use crate::heap::target::{Expr, Target};
use crate::heap::typeinfo::TypeInfo;
use crate::heap::{HeapError, Result};

const STRING_SYMBOL: &str = "kclass:kotlin.String";
const LIST_SYMBOL: &str = "kclass:kotlin.collections.List";
const MAP_SYMBOL: &str = "kclass:kotlin.collections.Map";

/// One well-known runtime type resolved from its exported class symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownType {
	/// Type record address.
	pub addr: u64,
	/// Whether the record describes an interface.
	pub interface: bool,
}

/// Well-known container types used to pick specialized decoders.
///
/// A `None` entry means the symbol is not exported by this target and the
/// matching specialized decode is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnownTypes {
	/// `kotlin.String`.
	pub string: Option<KnownType>,
	/// `kotlin.collections.List`.
	pub list: Option<KnownType>,
	/// `kotlin.collections.Map`.
	pub map: Option<KnownType>,
}

/// Shared transfer buffer owned by the target process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferBuffer {
	/// Buffer base address.
	pub addr: u64,
	/// Buffer capacity in bytes.
	pub capacity: i32,
}

/// Session-scoped decoding context for one inspected process.
///
/// Owns the target handle plus every cache whose contents are only valid
/// for one process launch: field layouts per type record, resolved
/// well-known type addresses, and the transfer buffer location. All of it
/// is dropped by [`Session::reset`] when the process is replaced.
pub struct Session<T: Target> {
	target: T,
	layouts: FxHashMap<u64, Vec<FieldDescriptor>>,
	known: Option<KnownTypes>,
	buffer_resolved: bool,
	buffer: Option<TransferBuffer>,
}

impl<T: Target> Session<T> {
	/// Create a context around a host target handle.
	pub fn new(target: T) -> Self {
		Self {
			target,
			layouts: FxHashMap::default(),
			known: None,
			buffer_resolved: false,
			buffer: None,
		}
	}

	/// Borrow the underlying target.
	pub fn target_mut(&mut self) -> &mut T {
		&mut self.target
	}

	/// Drop every cached address.
	///
	/// Must run when the inspected process is replaced; none of the cached
	/// addresses are stable across launches.
	pub fn reset(&mut self) {
		self.layouts.clear();
		self.known = None;
		self.buffer_resolved = false;
		self.buffer = None;
	}

	/// Field layout for the object at `obj`, built at most once per type
	/// record and served from cache afterwards.
	pub fn field_layout(&mut self, obj: u64, type_info: u64) -> Result<Vec<FieldDescriptor>> {
		if let Some(found) = self.layouts.get(&type_info) {
			return Ok(found.clone());
		}

		let built = read_field_layout(&mut self.target, obj)?;
		self.layouts.insert(type_info, built.clone());
		Ok(built)
	}

	/// Well-known container types, resolved from symbols on first use.
	pub fn known_types(&mut self) -> Result<KnownTypes> {
		if let Some(known) = self.known {
			return Ok(known);
		}

		let known = KnownTypes {
			string: resolve_known(&mut self.target, STRING_SYMBOL)?,
			list: resolve_known(&mut self.target, LIST_SYMBOL)?,
			map: resolve_known(&mut self.target, MAP_SYMBOL)?,
		};
		self.known = Some(known);
		Ok(known)
	}

	/// Shared transfer buffer, resolved once per session.
	pub fn transfer_buffer(&mut self) -> Result<TransferBuffer> {
		if !self.buffer_resolved {
			let addr = self.target.evaluate(&Expr::DebugBuffer)?;
			let capacity = self.target.evaluate(&Expr::DebugBufferSize)? as i32;
			self.buffer = (addr != 0 && capacity > 0).then_some(TransferBuffer { addr, capacity });
			self.buffer_resolved = true;
		}

		self.buffer.ok_or(HeapError::StringBufferUnavailable)
	}
}

fn resolve_known<T: Target>(target: &mut T, name: &str) -> Result<Option<KnownType>> {
	let addr = target.resolve_symbol(name)?;
	if addr == 0 {
		log::debug!("well-known symbol {name} not exported");
		return Ok(None);
	}

	let info = TypeInfo::read(target, addr)?;
	Ok(Some(KnownType {
		addr,
		interface: info.is_interface(),
	}))
}
