use std::iter::Peekable;
use std::str::Chars;
use anyhow::{anyhow, bail, Context, Result};
use crate::tree::class::ClassName;
use crate::tree::field::FieldDescriptor;
use crate::tree::method::MethodDescriptor;

/// Represents a type.
///
/// In case of an array, use the [`Type::Array`] variant.
///
/// ```
/// use duke::tree::descriptor::{ArrayType, Type};
///
/// // the type of a java `int`
/// let int_type = Type::I;
///
/// // the type of a java `int[][]`
/// let int_array_type = Type::Array(2, ArrayType::I);
///
/// assert_ne!(int_type, int_array_type);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Type {
	/// A `byte`. In rust, this is a `i8`.
	B,
	/// A `char`.
	C,
	/// A `double`. In rust, this is a `f64`.
	D,
	/// A `float`. In rust, this is a `f32`.
	F,
	/// An `int`. In rust, this is a `i32`.
	I,
	/// A `long`. In rust, this is a `i64`.
	J,
	/// A `short`. In rust, this is a `i16`.
	S,
	/// A `boolean`. In rust, this is a `bool`.
	Z,
	/// An instance of the class specified by [`ClassName`].
	Object(ClassName),
	/// An array type, represented by the dimension and the inner [`ArrayType`].
	Array(u8, ArrayType),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ArrayType {
	B,
	C,
	D,
	F,
	I,
	J,
	S,
	Z,
	Object(ClassName),
}

impl Type {
	/// The number of local variable slots a value of this type takes up.
	///
	/// This is `2` for `long` and `double`, and `1` for everything else, including arrays of `long` and `double`.
	pub fn slot_size(&self) -> usize {
		match self {
			Type::J | Type::D => 2,
			_ => 1,
		}
	}
}

// The grammar for descriptors is:
//   FieldDescriptor:
//     FieldType
//
//   MethodDescriptor:
//     "(" FieldType* ")" ReturnDescriptor
//
//   ReturnDescriptor:
//     FieldType | "V"
//
//   FieldType:
//     "B" | "C" | "D" | "F" | "I" | "J" | "S" | "Z" |
//     "L" ClassName ";" |
//     "[" FieldType
fn read_field_type(chars: &mut Peekable<Chars>) -> Result<Type> {
	let mut array_dimension: usize = 0;
	while chars.next_if_eq(&'[').is_some() {
		array_dimension += 1;
	}
	let array_dimension: u8 = array_dimension.try_into()
		.with_context(|| anyhow!("array dimension {array_dimension} is larger than 255"))?;

	let char = chars.next().context("unexpected abrupt ending of descriptor")?;
	let array_type = match char {
		'B' => ArrayType::B,
		'C' => ArrayType::C,
		'D' => ArrayType::D,
		'F' => ArrayType::F,
		'I' => ArrayType::I,
		'J' => ArrayType::J,
		'S' => ArrayType::S,
		'Z' => ArrayType::Z,
		'L' => {
			let mut s = String::new();
			loop {
				match chars.next() {
					Some(';') => break,
					Some(char) => s.push(char),
					None => bail!("unexpected abrupt ending of descriptor, missing `;` after class name {s:?}"),
				}
			}
			if s.starts_with('[') {
				bail!("class name {s:?} in descriptor must not be an array class name");
			}
			ArrayType::Object(ClassName::try_from(s)?)
		},
		x => bail!("unexpected char {x:?} in descriptor"),
	};

	Ok(if array_dimension == 0 {
		match array_type {
			ArrayType::B => Type::B,
			ArrayType::C => Type::C,
			ArrayType::D => Type::D,
			ArrayType::F => Type::F,
			ArrayType::I => Type::I,
			ArrayType::J => Type::J,
			ArrayType::S => Type::S,
			ArrayType::Z => Type::Z,
			ArrayType::Object(class_name) => Type::Object(class_name),
		}
	} else {
		Type::Array(array_dimension, array_type)
	})
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedFieldDescriptor(pub Type);

pub(crate) fn parse_field_descriptor(desc: &str) -> Result<ParsedFieldDescriptor> {
	let mut chars = desc.chars().peekable();

	let descriptor = read_field_type(&mut chars)
		.with_context(|| anyhow!("failed to read field descriptor {desc:?}"))?;

	if chars.peek().is_some() {
		bail!("expected end of field descriptor {desc:?}, got {:?} remaining", String::from_iter(chars));
	}

	Ok(ParsedFieldDescriptor(descriptor))
}

impl FieldDescriptor {
	/// Parses a field descriptor.
	///
	/// A field descriptor is defined by the [grammar](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.3.2) in the
	/// Java Virtual Machine Specification.
	///
	/// # Examples
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use duke::tree::descriptor::{ArrayType, ParsedFieldDescriptor, Type};
	/// use duke::tree::field::FieldDescriptor;
	///
	/// assert_eq!(
	///     FieldDescriptor::try_from("I").unwrap().parse().unwrap(),
	///     ParsedFieldDescriptor(Type::I)
	/// );
	/// assert_eq!(
	///     FieldDescriptor::try_from("Ljava/lang/Object;").unwrap().parse().unwrap(),
	///     ParsedFieldDescriptor(Type::Object(ClassName::java_lang_object()))
	/// );
	/// assert_eq!(
	///     FieldDescriptor::try_from("[[[D").unwrap().parse().unwrap(),
	///     ParsedFieldDescriptor(Type::Array(3, ArrayType::D))
	/// );
	/// ```
	pub fn parse(&self) -> Result<ParsedFieldDescriptor> {
		parse_field_descriptor(self.as_str())
	}
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParsedMethodDescriptor {
	pub parameter_descriptors: Vec<Type>,
	/// `None` represents the `void` return type.
	pub return_descriptor: Option<Type>,
}

pub(crate) fn parse_method_descriptor(desc: &str) -> Result<ParsedMethodDescriptor> {
	let mut chars = desc.chars().peekable();

	if chars.next_if_eq(&'(').is_none() {
		bail!("method descriptor {desc:?} doesn't start with '('");
	}

	let mut parameter_descriptors = Vec::new();
	while chars.next_if_eq(&')').is_none() {
		let parameter = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read parameter {} of method descriptor {desc:?}", parameter_descriptors.len()))?;
		parameter_descriptors.push(parameter);
	}

	let return_descriptor = if chars.next_if_eq(&'V').is_some() {
		None
	} else {
		let return_descriptor = read_field_type(&mut chars)
			.with_context(|| anyhow!("failed to read return type of method descriptor {desc:?}"))?;
		Some(return_descriptor)
	};

	if chars.peek().is_some() {
		bail!("expected end of method descriptor {desc:?}, got {:?} remaining", String::from_iter(chars));
	}

	Ok(ParsedMethodDescriptor { parameter_descriptors, return_descriptor })
}

impl MethodDescriptor {
	/// Parses a method descriptor.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::descriptor::Type;
	/// use duke::tree::method::MethodDescriptor;
	///
	/// let desc = MethodDescriptor::try_from("(IJ)Z").unwrap().parse().unwrap();
	/// assert_eq!(desc.parameter_descriptors, vec![Type::I, Type::J]);
	/// assert_eq!(desc.return_descriptor, Some(Type::Z));
	/// ```
	pub fn parse(&self) -> Result<ParsedMethodDescriptor> {
		parse_method_descriptor(self.as_str())
	}
}

impl ParsedMethodDescriptor {
	/// Returns the number of local variable slots the parameters take up.
	pub fn arguments_size(&self) -> usize {
		self.parameter_descriptors.iter().map(Type::slot_size).sum()
	}

	/// Converts a local variable slot into the ordinal of the parameter, that is, its position in the list of
	/// parameters.
	///
	/// The slot is counted from the first parameter, so `0` always refers to the parameter with ordinal `0`. Slots
	/// past the last parameter continue with a width of one slot per ordinal.
	///
	/// Fails if the slot points to the second half of a `long` or `double` parameter.
	///
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::method::MethodDescriptor;
	///
	/// // (int, long, String)
	/// let desc = MethodDescriptor::try_from("(IJLjava/lang/String;)V").unwrap().parse().unwrap();
	/// assert_eq!(desc.slot_to_ordinal(0).unwrap(), 0);
	/// assert_eq!(desc.slot_to_ordinal(1).unwrap(), 1);
	/// assert_eq!(desc.slot_to_ordinal(3).unwrap(), 2);
	/// assert!(desc.slot_to_ordinal(2).is_err());
	/// ```
	pub fn slot_to_ordinal(&self, slot: usize) -> Result<usize> {
		let mut remaining = slot;
		for (ordinal, parameter) in self.parameter_descriptors.iter().enumerate() {
			if remaining == 0 {
				return Ok(ordinal);
			}
			remaining = remaining.checked_sub(parameter.slot_size())
				.with_context(|| anyhow!("slot {slot} points into the middle of parameter {ordinal} of type {parameter:?}"))?;
		}
		Ok(self.parameter_descriptors.len() + remaining)
	}
}
