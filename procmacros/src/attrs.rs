//! `#[model(...)]` field attribute parsing.

use syn::{Field, LitStr, Result};

#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
    pub column: Option<String>,
    pub id: bool,
    pub identity: Option<String>,
    pub custom: bool,
    pub skip: bool,
}

pub(crate) fn field_attrs(field: &Field) -> Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                out.column = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("id") {
                out.id = true;
                Ok(())
            } else if meta.path.is_ident("identity") {
                let lit: LitStr = meta.value()?.parse()?;
                out.identity = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("custom") {
                out.custom = true;
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown `model` attribute"))
            }
        })?;
    }
    Ok(out)
}
