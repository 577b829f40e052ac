//! Crate for reading, writing and composing mappings between the names of a compiled Java program.
//!
//! Mappings are read from tiny v2 (`.tiny`, see [`tiny_v2`]), TSRG (see [`tsrg`]) and SRG (see [`srg`]) files, and
//! from CSV name tables (see [`names_csv`]). Tiny v2 files are read into a namespace [tree], which can be turned into
//! a [`MappingSet`][set::MappingSet] between two of its namespaces.
//!
//! A [`MappingSet`][set::MappingSet] can be
//! - [reversed][set::MappingSet::reverse],
//! - [merged][set::MappingSet::merge] with another set that starts where this one ends,
//! - [renamed][set::MappingSet::apply_name_table] with a name table,
//! - [completed][set::MappingSet::complete] along the class hierarchy,
//! - given [field descriptors][set::MappingSet::fill_field_descriptors] from another set,
//! - and [moved to a newer version][matches::Match::update_mappings] with matches.
//!
//! The result is written back as tiny v2 with [`tiny_v2::write_set`], or as TSRG with [`tsrg::write`].

mod lines;

pub mod tree;
pub mod set;
pub mod remapper;
pub mod inheritance;

pub mod tiny_v2;
pub mod tsrg;
pub mod srg;
pub mod names_csv;
pub mod matches;

mod action;
