#![recursion_limit = "128"]

extern crate proc_macro;

mod attrs;
mod model;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `Model` and `Record` for a destination struct, compiling its
/// layout into the static type-shape metadata the materializer walks.
///
/// # Field attributes
///
/// - `#[model(column = "Alias")]` — overrides the column name this field
///   binds to; on a nested field the first dot-segment renames the nested
///   type's owner prefix; a dotted pair on a scalar field (`"Owner.Field"`)
///   overrides both owner and field.
/// - `#[model(id)]` — marks the field as part of the type's identity.
/// - `#[model(identity = "FieldA,FieldB")]` — on a nested struct field,
///   replaces the nested type's intrinsic identity markers.
/// - `#[model(custom)]` — decodes the raw cell through the field type's
///   `FromCell` impl instead of the default coercion.
/// - `#[model(skip)]` — the field is never read from rows.
///
/// # Example
///
/// ```rust
/// use trellis_macros::Model;
///
/// #[derive(Debug, Default, Model)]
/// struct Author {
///     #[model(id)]
///     id: i64,
///     name: String,
///     posts: Vec<Post>,
/// }
///
/// #[derive(Debug, Default, Model)]
/// struct Post {
///     #[model(id)]
///     id: i64,
///     title: String,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match model::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
