use std::cmp::Ordering;
use std::fmt::Debug;
use std::iter::Peekable;
use anyhow::{anyhow, Context, Result};

pub(crate) trait Line: Debug {
	fn get_idents(&self) -> usize;
	fn get_line_number(&self) -> usize;
}

pub(crate) struct WithMoreIdentIter<'a, I: Iterator> {
	depth: usize,
	iter: &'a mut Peekable<I>,
}

impl<'a, I, L> WithMoreIdentIter<'a, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	pub(crate) fn new(iter: &'a mut Peekable<I>) -> WithMoreIdentIter<'a, I> {
		WithMoreIdentIter { depth: 0, iter }
	}

	pub(crate) fn next_level(&mut self) -> WithMoreIdentIter<'_, I> {
		WithMoreIdentIter {
			depth: self.depth + 1,
			iter: self.iter,
		}
	}

	pub(crate) fn on_every_line(mut self, mut f: impl FnMut(&mut Self, L) -> Result<()>) -> Result<()> {
		while let Some(line) = self.next() {
			let line = line?;
			let line_number = line.get_line_number();

			f(&mut self, line)
				.with_context(|| anyhow!("in line {line_number}"))?;
		}
		Ok(())
	}
}

impl<I, L> Iterator for WithMoreIdentIter<'_, I>
where
	I: Iterator<Item=Result<L>>,
	L: Line,
{
	type Item = Result<L>;

	fn next(&mut self) -> Option<Self::Item> {
		match self.iter.peek()? {
			Ok(line) => {
				match line.get_idents().cmp(&self.depth) {
					Ordering::Less => None, // cancel an inner loop
					Ordering::Equal => self.iter.next(), // actually give back the value
					Ordering::Greater => Some(Err(anyhow!("expected an indentation of {} for line {}: {:#?}", self.depth, line.get_line_number(), line))),
				}
			},
			Err(_) => self.iter.next(),
		}
	}
}

/// Splits a line into its leading tabs and the rest, separated by `separator`.
fn split_line(line: &str, separator: char) -> (usize, impl Iterator<Item=String> + '_) {
	let rest = line.trim_start_matches('\t');
	// `\t` is a single byte, so this is the number of tabs
	let idents = line.len() - rest.len();
	(idents, rest.split(separator).map(|x| x.to_owned()))
}

pub(crate) mod tiny_line {
	use anyhow::{anyhow, bail, Context, Result};
	use crate::lines::{Line, split_line};

	#[derive(Debug)]
	pub(crate) struct TinyLine {
		line_number: usize,
		idents: usize,
		pub(crate) first_field: String,
		fields: std::vec::IntoIter<String>,
	}

	impl TinyLine {
		pub(crate) fn new(line_number: usize, line: &str) -> Result<TinyLine> {
			let (idents, mut fields) = split_line(line, '\t');

			let first_field = fields.next()
				.with_context(|| anyhow!("no first field in line {line_number}"))?;

			let vec: Vec<String> = fields.collect();

			Ok(TinyLine {
				line_number,
				idents,
				first_field,
				fields: vec.into_iter(),
			})
		}

		pub(crate) fn next(&mut self) -> Result<String> {
			self.fields.next()
				.with_context(|| anyhow!("expected another field in line {}: {self:?}", self.line_number))
		}

		pub(crate) fn end(mut self) -> Result<String> {
			let next = self.next()?;

			if !self.fields.as_slice().is_empty() {
				bail!("line {} contained more fields than expected: {self:?}", self.line_number);
			}

			Ok(next)
		}

		pub(crate) fn list<const N: usize>(self) -> Result<[String; N]> {
			let vec: Vec<String> = self.fields.collect();

			<[String; N]>::try_from(vec)
				.map_err(|vec| anyhow!("line {} contained more or less fields ({}) than the expected {N}: {:?}", self.line_number, vec.len(), vec))
		}
	}

	impl Line for TinyLine {
		fn get_idents(&self) -> usize {
			self.idents
		}
		fn get_line_number(&self) -> usize {
			self.line_number
		}
	}
}

pub(crate) mod srg_line {
	use anyhow::{anyhow, Result};
	use crate::lines::{Line, split_line};

	/// A line of a TSRG file: tab indented, with the fields separated by spaces.
	#[derive(Debug)]
	pub(crate) struct SpaceLine {
		line_number: usize,
		idents: usize,
		pub(crate) fields: Vec<String>,
	}

	impl SpaceLine {
		pub(crate) fn new(line_number: usize, line: &str) -> SpaceLine {
			let (idents, fields) = split_line(line, ' ');
			SpaceLine {
				line_number,
				idents,
				fields: fields.filter(|x| !x.is_empty()).collect(),
			}
		}

		pub(crate) fn list<const N: usize>(self) -> Result<[String; N]> {
			let line_number = self.line_number;
			<[String; N]>::try_from(self.fields)
				.map_err(|vec| anyhow!("line {line_number} contained more or less fields ({}) than the expected {N}: {:?}", vec.len(), vec))
		}
	}

	impl Line for SpaceLine {
		fn get_idents(&self) -> usize {
			self.idents
		}
		fn get_line_number(&self) -> usize {
			self.line_number
		}
	}
}
