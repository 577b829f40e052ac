/// Creates a [String] backed newtype with checked construction.
///
/// You need to have a function
/// ```no_run
/// # struct Owned;
/// impl Owned {
///     fn check_valid(inner: &str) -> anyhow::Result<()> {
///         // ...
/// # Ok(())
///     }
/// }
/// ```
/// that checks if the contents are valid.
///
/// The `Hash` implementation agrees with the one of [`str`], so maps keyed by the newtype can be queried with a `&str`.
macro_rules! make_name_like {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident ;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
		$vis struct $name(String);

		impl $name {
			pub fn as_str(&self) -> &str {
				&self.0
			}

			pub fn into_inner(self) -> String {
				self.0
			}

			/// Checks if a given value is valid for being represented by this type.
			///
			/// See [`Self::check_valid`] for the specification on what's valid.
			pub fn is_valid(inner: &str) -> bool {
				Self::check_valid(inner).is_ok()
			}
		}

		impl TryFrom<String> for $name {
			type Error = anyhow::Error;

			fn try_from(value: String) -> anyhow::Result<$name> {
				match $name::check_valid(&value) {
					Ok(()) => Ok($name(value)),
					Err(e) => {
						use anyhow::Context;
						Err(e).with_context(|| anyhow::anyhow!("on value {value:?}"))
					},
				}
			}
		}

		impl<'a> TryFrom<&'a str> for $name {
			type Error = anyhow::Error;

			fn try_from(value: &'a str) -> anyhow::Result<$name> {
				$name::try_from(value.to_owned())
			}
		}

		impl std::str::FromStr for $name {
			type Err = anyhow::Error;

			fn from_str(s: &str) -> anyhow::Result<$name> {
				$name::try_from(s)
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}

		impl std::borrow::Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				self.0 == other
			}
		}

		impl<'a> PartialEq<&'a str> for $name {
			fn eq(&self, other: &&'a str) -> bool {
				self.0 == *other
			}
		}
	}
}

pub(crate) use make_name_like;
