//! The namespace tree: mappings with any number of namespaces, as stored in tiny v2 files.
//!
//! Each node of the tree stores one name per namespace. Nodes are keyed by their name in the first namespace (together
//! with the descriptor for fields and methods, and the local variable index for parameters). Descriptors are always
//! given in the first namespace.
//!
//! For composing mappings, convert the tree into a [`MappingSet`][crate::set::MappingSet] between two of its namespaces
//! with [`MappingSet::from_tree`][crate::set::MappingSet::from_tree].

pub mod mappings;

pub mod names {
	use std::fmt::{Debug, Formatter};
	use std::ops::{Index, IndexMut};
	use anyhow::{bail, Error, Result};

	/// Describes a given namespace of a mapping tree.
	///
	/// This object exists to remove out of bounds checks. If this object exists from a given mapping (obtained via
	/// [`Namespaces::get_namespace`]), no range checking is necessary.
	#[derive(Debug, Copy, Clone, PartialEq)]
	pub struct Namespace<const N: usize>(usize);

	impl<const N: usize> Namespace<N> {
		pub fn new(id: usize) -> Result<Namespace<N>> {
			if id >= N {
				bail!("cannot create namespace with id larger or equal to number of namespaces: {id} >= {N}");
			}
			Ok(Namespace(id))
		}
	}

	/// A struct storing the names of the namespaces.
	///
	/// Implements the [Index] and [IndexMut] traits for [Namespace].
	#[derive(Clone, PartialEq)]
	pub struct Namespaces<const N: usize> {
		names: [String; N]
	}

	impl<const N: usize> Index<Namespace<N>> for Namespaces<N> {
		type Output = String;

		fn index(&self, index: Namespace<N>) -> &Self::Output {
			&self.names[index.0]
		}
	}

	impl<const N: usize> IndexMut<Namespace<N>> for Namespaces<N> {
		fn index_mut(&mut self, index: Namespace<N>) -> &mut Self::Output {
			&mut self.names[index.0]
		}
	}

	impl<const N: usize> Namespaces<N> {
		pub fn names(&self) -> &[String; N] {
			&self.names
		}

		pub fn get_namespace(&self, name: &str) -> Result<Namespace<N>> {
			for (id, namespace) in self.names.iter().enumerate() {
				if namespace == name {
					return Ok(Namespace(id))
				}
			}
			bail!("cannot find namespace with name {name:?}, only got {self:?}");
		}

		/// Returns an error if the names of `self` aren't the names given in the argument.
		/// This can be used to check that after reading mappings, you have the correct namespaces in them.
		pub fn check_that(&self, names: [&str; N]) -> Result<()> {
			if self.names != names {
				bail!("expected namespaces {names:?}, got {self:?}");
			}
			Ok(())
		}
	}

	impl Namespaces<2> {
		pub fn from_name(&self) -> &str {
			&self.names[0]
		}

		pub fn to_name(&self) -> &str {
			&self.names[1]
		}
	}

	impl<const N: usize> Debug for Namespaces<N> {
		fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
			f.debug_list()
				.entries(&self.names)
				.finish()
		}
	}

	impl<const N: usize> TryFrom<[String; N]> for Namespaces<N> {
		type Error = Error;

		fn try_from(value: [String; N]) -> Result<Self> {
			if value.iter().any(|i| i.is_empty()) {
				bail!("found empty namespace name in {value:?}, every namespace name must be non-empty");
			}

			Ok(Namespaces { names: value })
		}
	}

	impl<const N: usize> TryFrom<[&str; N]> for Namespaces<N> {
		type Error = Error;

		fn try_from(value: [&str; N]) -> Result<Self> {
			Namespaces::try_from(value.map(String::from))
		}
	}

	impl<const N: usize> From<Namespaces<N>> for [String; N] {
		fn from(value: Namespaces<N>) -> Self {
			value.names
		}
	}

	/// A struct storing names for namespaces.
	///
	/// Implements the [Index] and [IndexMut] traits for [Namespace].
	#[derive(Clone, PartialEq, PartialOrd, Eq, Ord)]
	pub struct Names<const N: usize, T> {
		names: [Option<T>; N],
	}

	impl<const N: usize, T> Index<Namespace<N>> for Names<N, T> {
		type Output = Option<T>;

		fn index(&self, index: Namespace<N>) -> &Self::Output {
			&self.names[index.0]
		}
	}

	impl<const N: usize, T> IndexMut<Namespace<N>> for Names<N, T> {
		fn index_mut(&mut self, index: Namespace<N>) -> &mut Self::Output {
			&mut self.names[index.0]
		}
	}

	impl<const N: usize, T> Names<N, T> {
		pub(crate) fn first_name(&self) -> Result<&T> where T: Debug {
			match self.names.first() {
				Some(Some(name)) => Ok(name),
				_ => bail!("no name for the first namespace: {self:?}"),
			}
		}

		pub fn names(&self) -> &[Option<T>; N] {
			&self.names
		}
	}

	impl<const N: usize, T: Debug> Debug for Names<N, T> {
		fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
			f.debug_list()
				.entries(&self.names)
				.finish()
		}
	}

	impl<const N: usize, T> From<[Option<T>; N]> for Names<N, T> {
		fn from(value: [Option<T>; N]) -> Self {
			Names { names: value }
		}
	}

	/// Note that empty strings are converted into `None`.
	impl<const N: usize, T> TryFrom<[String; N]> for Names<N, T>
	where
		T: TryFrom<String, Error=Error>,
	{
		type Error = Error;

		fn try_from(value: [String; N]) -> Result<Self> {
			let mut names = Vec::with_capacity(N);
			for string in value {
				names.push(if string.is_empty() { None } else { Some(T::try_from(string)?) });
			}
			let names: [Option<T>; N] = names.try_into()
				.map_err(|_| anyhow::anyhow!("length doesn't match the number of namespaces, {N}"))?;
			Ok(Names { names })
		}
	}

	impl<const N: usize, T> From<Names<N, T>> for [Option<T>; N] {
		fn from(value: Names<N, T>) -> Self {
			value.names
		}
	}
}
