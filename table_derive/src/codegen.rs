//! Code generation for the `Entity` implementation

use crate::parsing::EntityInfo;
use proc_macro2::TokenStream;
use quote::quote;

pub fn generate_entity_impl(info: &EntityInfo) -> TokenStream {
    let name = &info.ident;
    let entity_name = name.to_string();
    let table_name = &info.table_name;

    let identity_ident = &info.identity.ident;
    let identity_column = &info.identity.column;
    let identity_ty = &info.identity.ty;
    let id_ty = &info.identity.inner_ty;
    let record_ident = &info.record;

    let descriptors = info.fields.iter().map(|field| {
        let column = &field.column;
        let nullable = field.nullable;
        quote! { active_record::FieldDescriptor::new(#column, #nullable) }
    });

    let extractions = info.fields.iter().map(|field| {
        let ident = &field.ident;
        let column = &field.column;
        quote! {
            active_record::ToColumnValue::to_column_value(&self.#ident)
                .map_err(|e| e.for_column(#column))?
        }
    });

    let field_idents: Vec<_> = info.fields.iter().map(|field| &field.ident).collect();
    let skipped = &info.skipped;

    // Decode everything into locals first so a failing column leaves `self` untouched
    let decoded_locals: Vec<_> = info
        .fields
        .iter()
        .map(|field| quote::format_ident!("__{}", field.ident.to_string().trim_start_matches("r#")))
        .collect();
    let decodes = info.fields.iter().zip(&decoded_locals).map(|(field, local)| {
        let ty = &field.ty;
        let column = &field.column;
        quote! {
            let #local = <#ty as active_record::FromColumnValue>::from_column_value(row.require(#column)?)
                .map_err(|e| e.for_column(#column))?;
        }
    });

    quote! {
        impl active_record::Entity for #name {
            type Id = #id_ty;

            fn entity_name() -> &'static str {
                #entity_name
            }

            fn table_name() -> &'static str {
                #table_name
            }

            fn identity_column() -> &'static str {
                #identity_column
            }

            fn fields() -> &'static [active_record::FieldDescriptor] {
                const FIELDS: &[active_record::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }

            fn field_values(
                &self,
            ) -> ::std::result::Result<::std::vec::Vec<active_record::ColumnValue>, active_record::MappingError> {
                ::std::result::Result::Ok(::std::vec![#(#extractions),*])
            }

            fn identity(&self) -> ::std::option::Option<&Self::Id> {
                self.#identity_ident.as_ref()
            }

            fn set_identity(&mut self, id: Self::Id) {
                self.#identity_ident = ::std::option::Option::Some(id);
            }

            fn record(&self) -> &active_record::RecordCore {
                &self.#record_ident
            }

            fn record_mut(&mut self) -> &mut active_record::RecordCore {
                &mut self.#record_ident
            }

            fn from_record(record: active_record::RecordCore) -> Self {
                Self {
                    #identity_ident: ::std::option::Option::None,
                    #(#field_idents: ::std::default::Default::default(),)*
                    #(#skipped: ::std::default::Default::default(),)*
                    #record_ident: record,
                }
            }

            fn load_row(&mut self, row: &active_record::Row) -> ::std::result::Result<(), active_record::MappingError> {
                let __identity = <#identity_ty as active_record::FromColumnValue>::from_column_value(
                    row.require(#identity_column)?,
                )
                .map_err(|e| e.for_column(#identity_column))?;
                #(#decodes)*

                self.#identity_ident = __identity;
                #(self.#field_idents = #decoded_locals;)*
                ::std::result::Result::Ok(())
            }
        }
    }
}
