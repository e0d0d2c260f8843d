//! Procedural macros for entity mapping
//!
//! This crate provides the `Entity` derive, which generates the field registry
//! and accessors the `active_record` crate persists entities through.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::generate_entity_impl;
use parsing::parse_entity;

/// Derive macro for the `Entity` trait
///
/// ```rust,ignore
/// use rowhaus::prelude::*;
///
/// #[derive(Debug, Clone, Entity)]
/// pub struct Orders {
///     id: Option<i64>,
///     item_id: Option<i64>,
///     item_price: Option<i64>,
///     quantity: Option<u32>,
///     record: RecordCore,
/// }
/// ```
///
/// - The table is the lower-cased struct name unless `#[table(name = "...")]`
///   overrides it.
/// - The identity is the field named `id`, or the one marked `#[identity]`. It
///   must be an `Option<T>`.
/// - The `RecordCore` field (or the one marked `#[record]`) is not persisted.
/// - Every other field is a column named after the field, in declaration
///   order. `#[field(skip)]` excludes a field, `#[field(nullable)]` writes NULL
///   while it is unset.
///
/// Persisted and skipped fields must implement `Default`; persisted fields
/// must also convert to and from column values.
#[proc_macro_derive(Entity, attributes(table, identity, record, field))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let info = match parse_entity(&input) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_entity_impl(&info))
}
