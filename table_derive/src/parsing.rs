//! Parsing utilities for entity declarations
//!
//! Reads the struct, its `#[table]` attribute and the `#[identity]`,
//! `#[record]` and `#[field]` markers on its fields, and validates every name
//! that will end up in SQL.

use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Error, Fields, GenericArgument, Ident, LitStr, PathArguments,
    Result, Type,
};
use type_mapping::validate_identifier;

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name).map_err(|e| {
        Error::new(
            span,
            format!(
                "Invalid table name '{}': {}. Use #[table(name = \"...\")] to choose another",
                name, e
            ),
        )
    })
}

/// Validate field name and return syn::Error for better proc macro error handling
pub fn validate_field_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid field name '{}': {}", name, e)))
}

#[derive(Debug)]
pub struct EntityInfo {
    pub ident: Ident,
    pub table_name: String,
    pub identity: IdentityField,
    pub record: Ident,
    /// Persisted fields in declaration order
    pub fields: Vec<PersistedField>,
    /// `#[field(skip)]` fields, rebuilt with `Default`
    pub skipped: Vec<Ident>,
}

#[derive(Debug)]
pub struct IdentityField {
    pub ident: Ident,
    pub column: String,
    pub ty: Type,
    /// `T` of the `Option<T>` field type
    pub inner_ty: Type,
}

#[derive(Debug)]
pub struct PersistedField {
    pub ident: Ident,
    pub column: String,
    pub ty: Type,
    pub nullable: bool,
}

#[derive(Debug, Default)]
struct FieldOptions {
    skip: bool,
    nullable: bool,
}

pub fn parse_entity(input: &DeriveInput) -> Result<EntityInfo> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic types: the table name must be fixed",
        ));
    }

    let Data::Struct(data_struct) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Entity can only be derived for structs",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new_spanned(
            &input.ident,
            "Entity can only be derived for structs with named fields",
        ));
    };

    let table_name = match parse_table_name(&input.attrs)? {
        Some((name, span)) => {
            validate_table_name_syn(&name, span)?;
            name
        }
        None => {
            let name = input.ident.unraw().to_string().to_lowercase();
            validate_table_name_syn(&name, input.ident.span())?;
            name
        }
    };

    let has_explicit_identity = fields_named
        .named
        .iter()
        .any(|field| has_attribute(&field.attrs, "identity"));
    let has_explicit_record = fields_named
        .named
        .iter()
        .any(|field| has_attribute(&field.attrs, "record"));

    let mut identity = None;
    let mut record = None;
    let mut fields = Vec::new();
    let mut skipped = Vec::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let column = ident.unraw().to_string();

        let is_identity = if has_explicit_identity {
            has_attribute(&field.attrs, "identity")
        } else {
            column == "id"
        };
        let is_record = if has_explicit_record {
            has_attribute(&field.attrs, "record")
        } else {
            is_record_core(&field.ty)
        };

        if is_identity {
            if identity.is_some() {
                return Err(Error::new_spanned(field, "Only one field can be the identity"));
            }
            validate_field_name_syn(&column, ident.span())?;
            let inner_ty = option_inner(&field.ty).ok_or_else(|| {
                Error::new_spanned(
                    &field.ty,
                    "The identity field must be an Option<T>: it is None until the entity is created",
                )
            })?;
            identity = Some(IdentityField {
                ident,
                column,
                ty: field.ty.clone(),
                inner_ty: inner_ty.clone(),
            });
            continue;
        }

        if is_record {
            if record.is_some() {
                return Err(Error::new_spanned(field, "Only one field can hold the RecordCore"));
            }
            record = Some(ident);
            continue;
        }

        let options = parse_field_options(&field.attrs)?;
        if options.skip {
            skipped.push(ident);
            continue;
        }

        validate_field_name_syn(&column, ident.span())?;
        fields.push(PersistedField {
            ident,
            column,
            ty: field.ty.clone(),
            nullable: options.nullable,
        });
    }

    let identity = identity.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "No identity field: add an `id: Option<T>` field or mark one with #[identity]",
        )
    })?;
    let record = record.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "No RecordCore field: add a `RecordCore` field or mark one with #[record]",
        )
    })?;

    if fields.iter().any(|field| field.column == identity.column) {
        return Err(Error::new_spanned(
            &identity.ident,
            format!("Column '{}' is declared twice", identity.column),
        ));
    }

    Ok(EntityInfo {
        ident: input.ident.clone(),
        table_name,
        identity,
        record,
        fields,
        skipped,
    })
}

fn parse_table_name(attrs: &[Attribute]) -> Result<Option<(String, proc_macro2::Span)>> {
    let mut table_name = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("table")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                table_name = Some((value.value(), value.span()));
                Ok(())
            } else {
                Err(meta.error("unsupported table option, expected `name`"))
            }
        })?;
    }

    Ok(table_name)
}

fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("field")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("nullable") {
                options.nullable = true;
                Ok(())
            } else {
                Err(meta.error("unsupported field option, expected `skip` or `nullable`"))
            }
        })?;
    }

    if options.skip && options.nullable {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "A skipped field is never written, `nullable` has no effect on it",
        ));
    }

    Ok(options)
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path.path.segments.last(),
        _ => None,
    }
}

fn is_record_core(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "RecordCore")
}

/// `T` for a type spelled `Option<T>`
fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;
    use syn::parse_quote;

    fn validate_table_name(name: &str) {
        if let Err(e) = validate_table_name_syn(name, proc_macro2::Span::call_site()) {
            panic!("Invalid table name: {}", e);
        }
    }

    #[test]
    fn test_valid_table_names() {
        validate_table_name("orders");
        validate_table_name("order_lines");
        validate_table_name("_private");
        validate_table_name("table123");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_reserved_keyword() {
        validate_table_name("order");
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious_names = [
            "orders; DROP TABLE orders; --",
            "orders' OR '1'='1",
            "orders/**/UNION/**/SELECT",
        ];

        for name in malicious_names {
            assert!(
                validate_table_name_syn(name, proc_macro2::Span::call_site()).is_err(),
                "Should reject malicious name: {}",
                name
            );
        }
    }

    #[test]
    fn test_conventions_find_identity_and_record() {
        let input: DeriveInput = parse_quote! {
            struct Orders {
                id: Option<i64>,
                item_id: Option<i64>,
                item_price: Option<i64>,
                quantity: Option<u32>,
                record: RecordCore,
            }
        };

        let info = parse_entity(&input).unwrap();
        assert_eq!(info.table_name, "orders");
        assert_eq!(info.identity.column, "id");
        assert_eq!(info.record, "record");
        let columns: Vec<_> = info.fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["item_id", "item_price", "quantity"]);
    }

    #[test]
    fn test_explicit_markers_and_options() {
        let input: DeriveInput = parse_quote! {
            #[table(name = "customer_orders")]
            struct Order {
                #[identity]
                order_no: Option<uuid::Uuid>,
                id: Option<i64>,
                #[field(nullable)]
                note: Option<String>,
                #[field(skip)]
                cached_total: Option<i64>,
                #[record]
                core: active_record::RecordCore,
            }
        };

        let info = parse_entity(&input).unwrap();
        assert_eq!(info.table_name, "customer_orders");
        assert_eq!(info.identity.column, "order_no");
        assert_eq!(info.record, "core");
        assert_eq!(info.skipped.len(), 1);
        let fields: Vec<_> = info
            .fields
            .iter()
            .map(|f| (f.column.as_str(), f.nullable))
            .collect();
        assert_eq!(fields, vec![("id", false), ("note", true)]);
    }

    #[test]
    fn test_reserved_type_name_needs_override() {
        let input: DeriveInput = parse_quote! {
            struct Order {
                id: Option<i64>,
                record: RecordCore,
            }
        };

        let err = parse_entity(&input).unwrap_err();
        assert!(err.to_string().contains("#[table(name"));
    }

    #[test]
    fn test_identity_must_be_option() {
        let input: DeriveInput = parse_quote! {
            struct Orders {
                id: i64,
                record: RecordCore,
            }
        };

        let err = parse_entity(&input).unwrap_err();
        assert!(err.to_string().contains("Option<T>"));
    }

    #[test]
    fn test_missing_record_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Orders {
                id: Option<i64>,
                quantity: Option<u32>,
            }
        };

        assert!(parse_entity(&input).is_err());
    }

    #[test]
    fn test_generic_types_are_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> {
                id: Option<i64>,
                value: T,
                record: RecordCore,
            }
        };

        assert!(parse_entity(&input).is_err());
    }

    #[test]
    fn test_unknown_field_option_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Orders {
                id: Option<i64>,
                #[field(create)]
                quantity: Option<u32>,
                record: RecordCore,
            }
        };

        let err = parse_entity(&input).unwrap_err();
        assert!(err.to_string().contains("unsupported field option"));
    }
}
