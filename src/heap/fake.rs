//! In-memory scripted target for unit tests.
//!
//! Lays out real byte images of headers, type records, and field storage
//! so the decoders exercise the same reads they issue against a live
//! process, and answers introspection expressions from scripted tables.

use rustc_hash::FxHashMap;

use crate::heap::target::{Expr, Target};
use crate::heap::typeinfo::TypeFlags;
use crate::heap::{HeapError, Result};

/// Where the fake transfer buffer lives.
pub(crate) const BUFFER_ADDR: u64 = 0xb000_0000;
/// Fake transfer buffer capacity.
pub(crate) const BUFFER_CAPACITY: i32 = 4096;

/// Start of the side arena holding name strings and interface arrays.
const AUX_BASE: u64 = 0xa000_0000;

struct FakeField {
	name_addr: u64,
	kind: u64,
	addr: u64,
}

struct FakeArray {
	kind: u64,
	first_offset: u64,
	stride: u64,
	count: usize,
}

/// Scripted in-memory stand-in for a live inspected process.
pub(crate) struct FakeTarget {
	memory: FxHashMap<u64, u8>,
	objects: FxHashMap<u64, Vec<FakeField>>,
	arrays: FxHashMap<u64, FakeArray>,
	strings: FxHashMap<u64, &'static str>,
	symbols: FxHashMap<&'static str, u64>,
	buffer_disabled: bool,
	aux: u64,
	/// Every evaluated expression, in order.
	pub eval_log: Vec<Expr>,
	/// Every symbol lookup, in order.
	pub symbol_log: Vec<String>,
}

impl FakeTarget {
	pub fn new() -> Self {
		Self {
			memory: FxHashMap::default(),
			objects: FxHashMap::default(),
			arrays: FxHashMap::default(),
			strings: FxHashMap::default(),
			symbols: FxHashMap::default(),
			buffer_disabled: false,
			aux: AUX_BASE,
			eval_log: Vec::new(),
			symbol_log: Vec::new(),
		}
	}

	pub fn write_bytes(&mut self, addr: u64, bytes: &[u8]) {
		for (index, byte) in bytes.iter().enumerate() {
			self.memory.insert(addr + index as u64, *byte);
		}
	}

	pub fn write_ptr(&mut self, addr: u64, value: u64) {
		self.write_bytes(addr, &value.to_le_bytes());
	}

	fn alloc_aux(&mut self, bytes: &[u8]) -> u64 {
		let addr = self.aux;
		self.write_bytes(addr, bytes);
		self.aux += (bytes.len() as u64 + 15) & !7;
		addr
	}

	/// Write a type record byte image at `addr`, self-reference included.
	pub fn add_type_info(&mut self, addr: u64, instance_size: i32, super_type: u64, interfaces: &[u64], flags: TypeFlags) {
		let interfaces_ptr = if interfaces.is_empty() {
			0
		} else {
			let bytes: Vec<u8> = interfaces.iter().flat_map(|item| item.to_le_bytes()).collect();
			self.alloc_aux(&bytes)
		};

		let mut record = [0_u8; 96];
		record[0..8].copy_from_slice(&addr.to_le_bytes());
		record[20..24].copy_from_slice(&instance_size.to_le_bytes());
		record[24..32].copy_from_slice(&super_type.to_le_bytes());
		record[48..56].copy_from_slice(&interfaces_ptr.to_le_bytes());
		record[56..60].copy_from_slice(&(interfaces.len() as i32).to_le_bytes());
		record[88..92].copy_from_slice(&(flags.bits() as i32).to_le_bytes());
		self.write_bytes(addr, &record);
	}

	/// Register an object at `addr` with `(name, kind tag, offset)` fields.
	pub fn add_object(&mut self, addr: u64, type_info: u64, fields: &[(&'static str, u64, u64)]) {
		self.write_ptr(addr, type_info);

		let mut scripted = Vec::with_capacity(fields.len());
		for (name, kind, offset) in fields {
			let mut name_bytes = name.as_bytes().to_vec();
			name_bytes.push(0);
			let name_addr = self.alloc_aux(&name_bytes);
			scripted.push(FakeField {
				name_addr,
				kind: *kind,
				addr: addr + offset,
			});
		}
		self.objects.insert(addr, scripted);
	}

	/// Register an array object at `addr` with uniform element geometry.
	pub fn add_array(&mut self, addr: u64, type_info: u64, kind: u64, first_offset: u64, stride: u64, count: usize) {
		self.write_ptr(addr, type_info);
		self.arrays.insert(
			addr,
			FakeArray {
				kind,
				first_offset,
				stride,
				count,
			},
		);
	}

	/// Register a string object at `addr` holding `text`.
	pub fn add_string(&mut self, addr: u64, type_info: u64, text: &'static str) {
		self.write_ptr(addr, type_info);
		self.strings.insert(addr, text);
		// Character storage shows through the array surface as well.
		self.arrays.insert(
			addr,
			FakeArray {
				kind: 3,
				first_offset: 16,
				stride: 2,
				count: text.chars().count(),
			},
		);
	}

	pub fn add_symbol(&mut self, name: &'static str, addr: u64) {
		self.symbols.insert(name, addr);
	}

	/// Make the transfer buffer unavailable in this target.
	pub fn disable_buffer(&mut self) {
		self.buffer_disabled = true;
	}

	fn unscripted(&self, expr: &Expr) -> HeapError {
		HeapError::Evaluation {
			expr: expr.to_string(),
			reason: "not scripted".to_owned(),
		}
	}
}

impl Target for FakeTarget {
	fn evaluate(&mut self, expr: &Expr) -> Result<u64> {
		self.eval_log.push(expr.clone());

		match *expr {
			Expr::FieldCount(obj) => {
				if let Some(fields) = self.objects.get(&obj) {
					Ok(fields.len() as u64)
				} else if let Some(array) = self.arrays.get(&obj) {
					Ok(array.count as u64)
				} else {
					Err(self.unscripted(expr))
				}
			}
			Expr::FieldType(obj, index) => {
				if let Some(fields) = self.objects.get(&obj) {
					fields.get(index as usize).map(|field| field.kind).ok_or_else(|| self.unscripted(expr))
				} else if let Some(array) = self.arrays.get(&obj) {
					if (index as usize) < array.count {
						Ok(array.kind)
					} else {
						Err(self.unscripted(expr))
					}
				} else {
					Err(self.unscripted(expr))
				}
			}
			Expr::FieldAddress(obj, index) => {
				if let Some(fields) = self.objects.get(&obj) {
					fields.get(index as usize).map(|field| field.addr).ok_or_else(|| self.unscripted(expr))
				} else if let Some(array) = self.arrays.get(&obj) {
					if (index as usize) < array.count {
						Ok(obj + array.first_offset + array.stride * index as u64)
					} else {
						Err(self.unscripted(expr))
					}
				} else {
					Err(self.unscripted(expr))
				}
			}
			Expr::FieldName(obj, index) => self
				.objects
				.get(&obj)
				.and_then(|fields| fields.get(index as usize))
				.map(|field| field.name_addr)
				.ok_or_else(|| self.unscripted(expr)),
			Expr::StringToBuffer { obj, buffer, capacity } => {
				let Some(text) = self.strings.get(&obj).copied() else {
					return Err(self.unscripted(expr));
				};
				let bytes = text.as_bytes();
				let len = bytes.len().min(capacity as usize);
				let chunk = bytes[..len].to_vec();
				self.write_bytes(buffer, &chunk);
				Ok(len as u64)
			}
			Expr::DebugBuffer => Ok(if self.buffer_disabled { 0 } else { BUFFER_ADDR }),
			Expr::DebugBufferSize => Ok(BUFFER_CAPACITY as u64),
		}
	}

	fn read_bytes(&mut self, addr: u64, len: usize) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(len);
		for index in 0..len as u64 {
			match self.memory.get(&(addr + index)) {
				Some(byte) => out.push(*byte),
				None => break,
			}
		}

		if out.is_empty() {
			return Err(HeapError::Read {
				addr,
				len,
				reason: "unmapped".to_owned(),
			});
		}
		Ok(out)
	}

	fn resolve_symbol(&mut self, name: &str) -> Result<u64> {
		self.symbol_log.push(name.to_owned());
		Ok(self.symbols.get(name).copied().unwrap_or(0))
	}
}
