//! Code generation for `#[derive(Model)]`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result, Type};

use crate::attrs::field_attrs;

/// How one declared field participates in materialization, resolved
/// syntactically from its type and attributes.
enum Shape {
    Scalar(TokenStream),
    Custom,
    One(Type),
    MaybeOne(Type),
    Many(Type),
    ManyScalars(TokenStream),
    Skip,
}

pub(crate) fn expand(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "#[derive(Model)] does not support generic destination types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    ident,
                    format!(
                        "#[derive(Model)] requires named fields, found {}",
                        match other {
                            Fields::Unit => "a unit struct",
                            _ => "a tuple struct",
                        }
                    ),
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "#[derive(Model)] only supports structs",
            ));
        }
    };

    let type_name = ident.to_string();
    let mut specs = Vec::new();
    let mut assign_arms = Vec::new();
    let mut nested_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let attrs = field_attrs(field)?;
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
        let field_name = field_ident.to_string();
        let ty_name = type_string(&field.ty);

        let shape = if attrs.skip {
            Shape::Skip
        } else if attrs.custom {
            Shape::Custom
        } else {
            classify(&field.ty)?
        };

        let column = option_str(attrs.column.as_deref());
        let identity = attrs.id;
        let identity_override = option_str(attrs.identity.as_deref());

        let kind = match &shape {
            Shape::Scalar(kind) => quote!(::trellis_core::model::FieldKind::Scalar(#kind)),
            Shape::Custom => quote!(::trellis_core::model::FieldKind::Custom),
            Shape::One(child) => quote!(::trellis_core::model::FieldKind::One(
                <#child as ::trellis_core::model::Model>::SHAPE
            )),
            Shape::MaybeOne(child) => quote!(::trellis_core::model::FieldKind::MaybeOne(
                <#child as ::trellis_core::model::Model>::SHAPE
            )),
            Shape::Many(child) => quote!(::trellis_core::model::FieldKind::Many(
                <#child as ::trellis_core::model::Model>::SHAPE
            )),
            Shape::ManyScalars(kind) => {
                quote!(::trellis_core::model::FieldKind::ManyScalars(#kind))
            }
            Shape::Skip => quote!(::trellis_core::model::FieldKind::Skip),
        };

        specs.push(quote! {
            ::trellis_core::model::FieldSpec {
                name: #field_name,
                ty: #ty_name,
                column: #column,
                identity: #identity,
                identity_override: #identity_override,
                kind: #kind,
            }
        });

        match &shape {
            Shape::Scalar(_) => assign_arms.push(quote! {
                #index => {
                    self.#field_ident = ::trellis_core::map::FromValue::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            }),
            Shape::Custom => assign_arms.push(quote! {
                #index => {
                    self.#field_ident = ::trellis_core::model::FromCell::from_cell(value)?;
                    ::core::result::Result::Ok(())
                }
            }),
            Shape::One(_) => nested_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    ::trellis_core::model::NestedMut::One(&mut self.#field_ident)
                ),
            }),
            Shape::MaybeOne(_) => nested_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    ::trellis_core::model::NestedMut::MaybeOne(&mut self.#field_ident)
                ),
            }),
            Shape::Many(_) => nested_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    ::trellis_core::model::NestedMut::Many(&mut self.#field_ident)
                ),
            }),
            Shape::ManyScalars(_) => nested_arms.push(quote! {
                #index => ::core::option::Option::Some(
                    ::trellis_core::model::NestedMut::ManyScalars(&mut self.#field_ident)
                ),
            }),
            Shape::Skip => {}
        }
    }

    Ok(quote! {
        #[automatically_derived]
        impl ::trellis_core::model::Model for #ident {
            const SHAPE: &'static ::trellis_core::model::TypeShape =
                &::trellis_core::model::TypeShape {
                    name: #type_name,
                    fields: &[#(#specs),*],
                };
        }

        #[automatically_derived]
        impl ::trellis_core::model::Record for #ident {
            fn shape(&self) -> &'static ::trellis_core::model::TypeShape {
                <Self as ::trellis_core::model::Model>::SHAPE
            }

            fn assign(
                &mut self,
                field: usize,
                value: &::trellis_core::value::Value<'_>,
            ) -> ::core::result::Result<(), ::trellis_core::map::CoerceError> {
                match field {
                    #(#assign_arms)*
                    _ => ::core::result::Result::Err(
                        ::trellis_core::map::CoerceError::custom(::std::format!(
                            "field {} of `{}` is not assignable",
                            field,
                            #type_name,
                        )),
                    ),
                }
            }

            fn nested_mut(
                &mut self,
                field: usize,
            ) -> ::core::option::Option<::trellis_core::model::NestedMut<'_>> {
                match field {
                    #(#nested_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

/// Maps a field type to its materialization shape, syntactically.
///
/// Types whose last path segment is not a known primitive are assumed to
/// be nested `Model` structs; a missing impl surfaces as a compile error
/// at the generated `<T as Model>::SHAPE` reference.
fn classify(ty: &Type) -> Result<Shape> {
    if let Some(kind) = scalar_kind(ty) {
        return Ok(Shape::Scalar(kind));
    }

    if let Some(inner) = generic_inner(ty, "Option") {
        if let Some(kind) = scalar_kind(inner) {
            return Ok(Shape::Scalar(kind));
        }
        if generic_inner(inner, "Vec").is_some() || generic_inner(inner, "Option").is_some() {
            return Err(Error::new_spanned(
                ty,
                "#[derive(Model)] does not support Option<Vec<_>> or Option<Option<_>> fields",
            ));
        }
        return Ok(Shape::MaybeOne(inner.clone()));
    }

    if let Some(inner) = generic_inner(ty, "Vec") {
        if let Some(kind) = scalar_kind(inner) {
            return Ok(Shape::ManyScalars(kind));
        }
        if generic_inner(inner, "Vec").is_some() || generic_inner(inner, "Option").is_some() {
            return Err(Error::new_spanned(
                ty,
                "#[derive(Model)] does not support nested Vec/Option collection elements",
            ));
        }
        return Ok(Shape::Many(inner.clone()));
    }

    match ty {
        Type::Path(_) => Ok(Shape::One(ty.clone())),
        _ => Err(Error::new_spanned(
            ty,
            "#[derive(Model)] does not support this field type",
        )),
    }
}

/// The `ScalarKind` for a primitive destination type, if it is one.
///
/// `Vec<u8>` is a byte-sequence scalar, not a collection.
fn scalar_kind(ty: &Type) -> Option<TokenStream> {
    if let Some(inner) = generic_inner(ty, "Vec") {
        return match last_segment_name(inner)?.as_str() {
            "u8" => Some(quote!(::trellis_core::value::ScalarKind::Bytes)),
            _ => None,
        };
    }

    let name = last_segment_name(ty)?;
    let kind = match name.as_str() {
        "bool" => quote!(::trellis_core::value::ScalarKind::Bool),
        "i8" => quote!(::trellis_core::value::ScalarKind::I8),
        "i16" => quote!(::trellis_core::value::ScalarKind::I16),
        "i32" => quote!(::trellis_core::value::ScalarKind::I32),
        "i64" => quote!(::trellis_core::value::ScalarKind::I64),
        "u8" => quote!(::trellis_core::value::ScalarKind::U8),
        "u16" => quote!(::trellis_core::value::ScalarKind::U16),
        "u32" => quote!(::trellis_core::value::ScalarKind::U32),
        "u64" => quote!(::trellis_core::value::ScalarKind::U64),
        "f32" => quote!(::trellis_core::value::ScalarKind::F32),
        "f64" => quote!(::trellis_core::value::ScalarKind::F64),
        "String" => quote!(::trellis_core::value::ScalarKind::Text),
        "NaiveDateTime" | "DateTime" => quote!(::trellis_core::value::ScalarKind::Timestamp),
        _ => return None,
    };
    Some(kind)
}

/// The inner type of `wrapper<T>` when `ty`'s last path segment is
/// `wrapper` with exactly one type argument.
fn generic_inner<'t>(ty: &'t Type, wrapper: &str) -> Option<&'t Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    });
    let inner = types.next()?;
    if types.next().is_some() {
        return None;
    }
    Some(inner)
}

fn last_segment_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else { return None };
    path.path
        .segments
        .last()
        .map(|segment| segment.ident.to_string())
}

fn type_string(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

fn option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(v) => quote!(::core::option::Option::Some(#v)),
        None => quote!(::core::option::Option::None),
    }
}
