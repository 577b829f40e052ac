//! Reading and writing mapping files given on the command line, with the format chosen by the file extension.

use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use anyhow::{anyhow, bail, Context, Error, Result};
use log::info;
use quill::set::MappingSet;
use quill::tree::mappings::Mappings;

/// A mapping file, optionally with the two namespaces to read from it, given as `path@from,to`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Input {
	pub(crate) path: PathBuf,
	pub(crate) namespaces: Option<[String; 2]>,
}

impl FromStr for Input {
	type Err = Error;

	fn from_str(s: &str) -> Result<Input> {
		if let Some((path, namespaces)) = s.rsplit_once('@') {
			if let Some((from, to)) = namespaces.split_once(',') {
				if from.is_empty() || to.is_empty() || to.contains(',') {
					bail!("expected two namespaces like `official,named` after the `@` in {s:?}");
				}
				return Ok(Input {
					path: PathBuf::from(path),
					namespaces: Some([from.to_owned(), to.to_owned()]),
				});
			}
		}
		Ok(Input { path: PathBuf::from(s), namespaces: None })
	}
}

fn extension(path: &Path) -> Option<&str> {
	path.extension().and_then(OsStr::to_str)
}

impl Input {
	fn namespaces_or<'a>(&'a self, from: &'a str, to: &'a str) -> [&'a str; 2] {
		match &self.namespaces {
			Some([from, to]) => [from.as_str(), to.as_str()],
			None => [from, to],
		}
	}

	/// Reads the mappings.
	///
	/// Tiny v2 files default to their first and last namespace, TSRG and SRG files to `official` and `srg`.
	pub(crate) fn read(&self) -> Result<MappingSet> {
		let set = match extension(&self.path) {
			Some("tiny") => self.read_tiny(),
			Some("tsrg") => quill::tsrg::read_file(&self.path, self.namespaces_or("official", "srg")),
			Some("srg") => quill::srg::read_file(&self.path, self.namespaces_or("official", "srg")),
			_ => Err(anyhow!("unknown mappings format, expected a `.tiny`, `.tsrg` or `.srg` file")),
		}.with_context(|| anyhow!("failed to read mappings from {:?}", self.path))?;

		info!("read {} classes from {:?} ({} -> {})",
			set.class_count(), self.path, set.namespaces.from_name(), set.namespaces.to_name());
		Ok(set)
	}

	fn read_tiny(&self) -> Result<MappingSet> {
		let content = std::fs::read_to_string(&self.path)?;

		let namespace_count = content.lines().next()
			.map_or(0, |header| header.split('\t').count().saturating_sub(3));
		match namespace_count {
			2 => self.tree_to_set(quill::tiny_v2::read::<2>(content.as_bytes())?),
			3 => self.tree_to_set(quill::tiny_v2::read::<3>(content.as_bytes())?),
			4 => self.tree_to_set(quill::tiny_v2::read::<4>(content.as_bytes())?),
			n => bail!("cannot read tiny v2 file with {n} namespaces"),
		}
	}

	fn tree_to_set<const N: usize>(&self, tree: Mappings<N>) -> Result<MappingSet> {
		let names = tree.info.namespaces.names();
		let [from, to] = self.namespaces_or(&names[0], &names[N - 1]);
		MappingSet::from_tree(&tree, from, to)
	}
}

/// Writes the mappings, as TSRG for `.tsrg` files, and as tiny v2 for `.tiny` files.
pub(crate) fn write(set: &MappingSet, path: &Path) -> Result<()> {
	let tsrg = match extension(path) {
		Some("tsrg") => true,
		Some("tiny") => false,
		_ => bail!("unknown output format for {path:?}, expected a `.tiny` or `.tsrg` file"),
	};

	let mut file = File::create(path)
		.with_context(|| anyhow!("failed to create output file {path:?}"))?;
	let result = if tsrg {
		quill::tsrg::write(set, &mut file)
	} else {
		quill::tiny_v2::write_set(set, &mut file)
	};
	result.with_context(|| anyhow!("failed to write mappings to {path:?}"))?;

	info!("wrote {} classes to {path:?}", set.class_count());
	Ok(())
}

#[cfg(test)]
mod testing {
	use std::path::PathBuf;
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::input::Input;

	#[test]
	fn parse_input() -> Result<()> {
		assert_eq!("a/b.tiny".parse::<Input>()?, Input { path: PathBuf::from("a/b.tiny"), namespaces: None });
		assert_eq!(
			"a@b/c.tiny@intermediary,named".parse::<Input>()?,
			Input { path: PathBuf::from("a@b/c.tiny"), namespaces: Some(["intermediary".to_owned(), "named".to_owned()]) },
		);
		assert!("c.tiny@a,".parse::<Input>().is_err());
		assert!("c.tiny@a,b,c".parse::<Input>().is_err());
		Ok(())
	}
}
