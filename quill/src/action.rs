//! Operations composing mapping sets. These are all methods on [`MappingSet`][crate::set::MappingSet].

mod complete;
mod field_descriptors;
mod merge;
mod name_table;
mod reverse;
