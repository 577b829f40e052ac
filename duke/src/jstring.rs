//! Methods for converting the string format used in the Java Virtual Machine Specification to and from
//! rust strings.
//!
//! The Java Virtual Machine Specification's string format is using a 2x3-format and storing `\0`
//! using two bytes.
//!
//! See <https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.4.7> for the complete specification of
//! the string format used in the Java Virtual Machine Specification.

use std::borrow::Cow;
use anyhow::{anyhow, Context, Result};
use java_string::{JavaStr, JavaString};

/// Takes in a vec of data, tries to read it into a [`String`].
///
/// Strings containing unpaired surrogates are valid in class files, but can't be names of anything we map, so
/// they're rejected here.
pub(crate) fn from_vec_to_string(vec: Vec<u8>) -> Result<String> {
	let string = JavaString::from_modified_utf8(vec)
		.with_context(|| anyhow!("invalid java utf8 contents"))?;
	string.as_str()
		.map(ToOwned::to_owned)
		.map_err(|_| anyhow!("java string {string:?} contains unpaired surrogates"))
}

/// Takes in a string and writes it out into a vec.
pub(crate) fn from_string_to_vec(string: &str) -> Cow<[u8]> {
	JavaStr::from_str(string).to_modified_utf8()
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use crate::jstring::{from_string_to_vec, from_vec_to_string};

	fn round_trip(raw: &[u8], string: &str) -> Result<()> {
		assert_eq!(from_string_to_vec(string), raw);
		assert_eq!(from_vec_to_string(raw.to_owned())?, string);
		Ok(())
	}

	#[test]
	fn zero() -> Result<()> {
		round_trip(&[0b1100_0000, 0b1000_0000, 0b1100_0000, 0b1000_0000], "\0\0")
	}

	#[test]
	fn ascii() -> Result<()> {
		round_trip(b"java/lang/Object", "java/lang/Object")
	}

	#[test]
	fn supplementary_characters_use_surrogate_pairs() -> Result<()> {
		// U+1F600 is written as two three byte sequences
		round_trip(&[0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80], "\u{1F600}")
	}
}
