//! Name tables in the CSV format, like the `fields.csv` and `methods.csv` files of MCP.
//!
//! The first row is a header. Every other row maps a short identifier (like `field_70170_p`) to a display name (like
//! `world`), in the first two columns. Any further columns are ignored.
//!
//! Apply a table to a mapping set with [`MappingSet::apply_name_table`][crate::set::MappingSet::apply_name_table].

use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;

/// A table from short identifiers to display names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
	names: IndexMap<String, String>,
}

impl NameTable {
	pub fn new() -> NameTable {
		NameTable::default()
	}

	/// Reads a CSV file by opening the file given by the path.
	pub fn read_file(path: impl AsRef<Path>) -> Result<NameTable> {
		let file = File::open(&path)
			.with_context(|| anyhow!("failed to open name table {:?}", path.as_ref()))?;
		NameTable::read(file)
			.with_context(|| anyhow!("failed to read name table {:?}", path.as_ref()))
	}

	/// Reads a CSV name table.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use quill::names_csv::NameTable;
	///
	/// let csv = "searge,name,side,desc\nfield_1_a,world,2,The world\n\nfunc_2_b,tick,0,\n";
	/// let table = NameTable::read(csv.as_bytes()).unwrap();
	///
	/// assert_eq!(table.len(), 2);
	/// assert_eq!(table.lookup("field_1_a"), Some("world"));
	/// assert_eq!(table.lookup("func_3_c"), None);
	/// ```
	pub fn read(reader: impl Read) -> Result<NameTable> {
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(true)
			.flexible(true)
			.from_reader(reader);

		let mut table = NameTable::new();
		for (index, record) in reader.records().enumerate() {
			let record = record.with_context(|| anyhow!("failed to read row {}", index + 1))?;

			// the csv crate already skips fully empty lines
			if record.iter().all(|field| field.trim().is_empty()) {
				continue;
			}

			let (Some(id), Some(name)) = (record.get(0), record.get(1)) else {
				bail!("row {} has less than two columns: {record:?}", index + 1);
			};
			table.insert(id.trim().to_owned(), name.trim().to_owned());
		}
		Ok(table)
	}

	/// Adds an entry, replacing the name of an existing one.
	pub fn insert(&mut self, id: String, name: String) {
		self.names.insert(id, name);
	}

	/// Adds all entries of another table, replacing the names of existing ones.
	pub fn extend(&mut self, other: NameTable) {
		self.names.extend(other.names);
	}

	pub fn lookup(&self, id: &str) -> Option<&str> {
		self.names.get(id).map(|name| name.as_str())
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::names_csv::NameTable;

	#[test]
	fn only_header() -> Result<()> {
		let table = NameTable::read("searge,name\n".as_bytes())?;
		assert!(table.is_empty());
		Ok(())
	}

	#[test]
	fn short_row() {
		assert!(NameTable::read("searge,name\nfield_1_a\n".as_bytes()).is_err());
	}

	#[test]
	fn later_tables_win() -> Result<()> {
		let mut table = NameTable::read("searge,name\nfield_1_a,world\nfield_2_b,level\n".as_bytes())?;
		table.extend(NameTable::read("searge,name\nfield_1_a,level\n".as_bytes())?);

		assert_eq!(table.lookup("field_1_a"), Some("level"));
		assert_eq!(table.lookup("field_2_b"), Some("level"));
		Ok(())
	}
}
