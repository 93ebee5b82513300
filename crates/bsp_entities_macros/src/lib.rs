//! Procedural macros for `bsp_entities`.
//!
//! This crate provides the `EntityClass` derive macro for automatic entity
//! variant registration and raw-property binding.

use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Fields, Lit, Meta, MetaNameValue, Type, parse_macro_input,
    punctuated::Punctuated, token::Comma,
};

/// Crate paths for code generation
struct CratePaths {
    core: proc_macro2::TokenStream,
    inventory: proc_macro2::TokenStream,
}

/// Get the path tokens for the bsp_entities crate (either umbrella or core).
fn get_crate_paths() -> CratePaths {
    // Try to find the umbrella crate first
    if let Ok(found) = crate_name("bsp_entities") {
        let base = match found {
            // For FoundCrate::Itself we still use the crate name because the
            // macro expands in user code (including the umbrella's examples),
            // not inside the library itself.
            FoundCrate::Itself | FoundCrate::Name(_) => quote!(::bsp_entities),
        };
        CratePaths {
            core: quote!(#base::core),
            inventory: quote!(#base::core::inventory),
        }
    } else if let Ok(found) = crate_name("bsp_entities_core") {
        // Fall back to the core crate directly. FoundCrate::Itself covers the
        // built-in variants inside core, which aliases itself by name.
        let base = match found {
            FoundCrate::Itself | FoundCrate::Name(_) => quote!(::bsp_entities_core),
        };
        CratePaths {
            core: base.clone(),
            inventory: quote!(#base::inventory),
        }
    } else {
        // Fallback - assume the umbrella crate
        CratePaths {
            core: quote!(::bsp_entities::core),
            inventory: quote!(::bsp_entities::core::inventory),
        }
    }
}

/// Derive macro for registering a type as an entity variant.
///
/// This macro generates:
/// - A static field-spec table mapping property keys to typed setters
/// - An inventory submission registering the class name and factory
/// - `EntityClass` and `Display` implementations reporting the registered
///   classname, with property access delegating through the
///   `#[entity(base)]` field down to the common [`Entity`] record
///
/// The deriving type must also implement `Debug` and `Default` (the factory
/// constructs instances via `Default::default()`).
///
/// # Example
///
/// ```ignore
/// use bsp_entities_core::prelude::*;
///
/// #[derive(Debug, Default, EntityClass)]
/// #[entity(class_name = "light")]
/// pub struct Light {
///     #[entity(base)]
///     pub base: Entity,
///     pub origin: Vec3,
///     #[entity(key = "_light")]
///     pub light: Color32,
///     pub style: i32,
/// }
/// ```
///
/// # Attributes
///
/// - `#[entity(class_name = "...")]` - The classname this variant answers to (required)
/// - `#[entity(base)]` - Marks the embedded base variant (required, exactly one;
///   root variants embed `Entity`)
/// - `#[entity(key = "...")]` - External property key when it differs from the
///   field name (field-level)
/// - `#[entity(skip)]` - Leave this field out of the binding table (field-level)
#[proc_macro_derive(EntityClass, attributes(entity))]
pub fn derive_entity_class(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_entity_class_impl(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_entity_class_impl(input: DeriveInput) -> syn::Result<TokenStream> {
    let type_name = &input.ident;
    let paths = get_crate_paths();

    // Parse #[entity(class_name = "...")] attribute
    let class_name = parse_class_name_attr(&input.attrs)?;

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => handle_struct(type_name, &class_name, &fields.named, &paths),
            _ => Err(syn::Error::new_spanned(
                type_name,
                "EntityClass requires named fields (the base variant is an #[entity(base)] field)",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            type_name,
            "EntityClass can only be derived for structs",
        )),
    }
}

fn handle_struct(
    struct_name: &syn::Ident,
    class_name: &str,
    fields: &Punctuated<syn::Field, Comma>,
    paths: &CratePaths,
) -> syn::Result<TokenStream> {
    let core = &paths.core;
    let inventory = &paths.inventory;
    let struct_name_str = struct_name.to_string();
    let setter_prefix = struct_name_str.to_lowercase();

    let mut base_field: Option<(&syn::Ident, &Type)> = None;
    let mut field_specs = Vec::new();
    let mut setter_fns = Vec::new();

    for field in fields {
        let field_name = field.ident.as_ref().unwrap();
        let field_type = &field.ty;

        // Check for #[entity(base)]
        if has_flag_attr(&field.attrs, "base") {
            if base_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "EntityClass allows exactly one #[entity(base)] field",
                ));
            }
            base_field = Some((field_name, field_type));
            continue;
        }

        // Check for #[entity(skip)]
        if has_flag_attr(&field.attrs, "skip") {
            // Skipped fields keep their Default value and never bind
            continue;
        }

        // External key defaults to the field name
        let key = parse_key_attr(&field.attrs)?.unwrap_or_else(|| field_name.to_string());

        let (kind, convertible) = map_field_kind(field_type, paths);
        let setter_name = format_ident!("__entity_set_{}_{}", setter_prefix, field_name);

        // A field whose type has no converter still gets a spec so the
        // registry can reject the class at build time with a clear error.
        if convertible {
            setter_fns.push(quote! {
                #[doc(hidden)]
                fn #setter_name(
                    __target: &mut dyn ::std::any::Any,
                    __raw: &str,
                ) -> ::std::result::Result<(), #core::properties::ConversionError> {
                    let __instance = __target
                        .downcast_mut::<#struct_name>()
                        .expect("binding table routed a property to the wrong entity variant");
                    __instance.#field_name = <#field_type as #core::properties::FromRawValue>::from_raw(
                        ::std::option::Option::Some(__raw),
                    )?;
                    ::std::result::Result::Ok(())
                }
            });
        } else {
            setter_fns.push(quote! {
                #[doc(hidden)]
                fn #setter_name(
                    _target: &mut dyn ::std::any::Any,
                    _raw: &str,
                ) -> ::std::result::Result<(), #core::properties::ConversionError> {
                    ::core::unreachable!("field has no registered converter")
                }
            });
        }

        field_specs.push(quote! {
            #core::registry::FieldSpec {
                key: #key,
                kind: #kind,
                owner: ::std::any::TypeId::of::<#struct_name>,
                set: #setter_name,
            }
        });
    }

    let Some((base_name, base_type)) = base_field else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "EntityClass requires an #[entity(base)] field; root variants embed Entity",
        ));
    };
    let base_type_str = quote!(#base_type).to_string();

    // Static array of field specs (uppercase for lint compliance)
    let fields_array_name =
        format_ident!("__ENTITY_FIELDS_{}", struct_name_str.to_uppercase());

    let expanded = quote! {
        // Static array of field specs shared by every merged binding table
        #[doc(hidden)]
        static #fields_array_name: &[#core::registry::FieldSpec] = &[
            #(#field_specs),*
        ];

        #(#setter_fns)*

        // Submit to inventory for compile-time registration
        #inventory::submit! {
            #core::registry::EntityClassInfo {
                class_name: #class_name,
                type_id: ::std::any::TypeId::of::<#struct_name>(),
                type_name: #struct_name_str,
                base: ::std::option::Option::Some(::std::any::TypeId::of::<#base_type>()),
                base_type_name: ::std::option::Option::Some(#base_type_str),
                fields: #fields_array_name,
                factory: || ::std::boxed::Box::new(<#struct_name as ::std::default::Default>::default()),
            }
        }

        impl #core::entity::EntityClass for #struct_name {
            fn class_name(&self) -> &str {
                #class_name
            }

            fn entity(&self) -> &#core::entity::Entity {
                #core::entity::EntityClass::entity(&self.#base_name)
            }

            fn entity_mut(&mut self) -> &mut #core::entity::Entity {
                #core::entity::EntityClass::entity_mut(&mut self.#base_name)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn ancestor(
                &self,
                __type_id: ::std::any::TypeId,
            ) -> ::std::option::Option<&dyn ::std::any::Any> {
                if __type_id == ::std::any::TypeId::of::<#struct_name>() {
                    ::std::option::Option::Some(self)
                } else {
                    #core::entity::EntityClass::ancestor(&self.#base_name, __type_id)
                }
            }

            fn ancestor_mut(
                &mut self,
                __type_id: ::std::any::TypeId,
            ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                if __type_id == ::std::any::TypeId::of::<#struct_name>() {
                    ::std::option::Option::Some(self)
                } else {
                    #core::entity::EntityClass::ancestor_mut(&mut self.#base_name, __type_id)
                }
            }
        }

        // Entities display as their resolved classname
        impl ::std::fmt::Display for #struct_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(#core::entity::EntityClass::class_name(self))
            }
        }
    };

    Ok(expanded.into())
}

/// Parse #[entity(class_name = "...")] attribute from the struct
fn parse_class_name_attr(attrs: &[syn::Attribute]) -> syn::Result<String> {
    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        let meta = &attr.meta;
        if let Meta::List(list) = meta {
            let nested: MetaNameValue = syn::parse2(list.tokens.clone())?;
            if nested.path.is_ident("class_name")
                && let syn::Expr::Lit(expr_lit) = &nested.value
                && let Lit::Str(lit_str) = &expr_lit.lit
            {
                return Ok(lit_str.value());
            }
        }
    }

    Err(syn::Error::new(
        proc_macro2::Span::call_site(),
        "EntityClass requires #[entity(class_name = \"...\")] attribute",
    ))
}

/// Check if a field carries a bare #[entity(<flag>)] attribute
fn has_flag_attr(attrs: &[syn::Attribute], flag: &str) -> bool {
    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        if let Meta::List(list) = &attr.meta
            && let Ok(path) = syn::parse2::<syn::Path>(list.tokens.clone())
            && path.is_ident(flag)
        {
            return true;
        }
    }
    false
}

/// Parse #[entity(key = "...")] attribute from a field
fn parse_key_attr(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        if let Meta::List(list) = &attr.meta
            && let Ok(nested) = syn::parse2::<MetaNameValue>(list.tokens.clone())
            && nested.path.is_ident("key")
        {
            if let syn::Expr::Lit(expr_lit) = &nested.value
                && let Lit::Str(lit_str) = &expr_lit.lit
            {
                return Ok(Some(lit_str.value()));
            }
            return Err(syn::Error::new_spanned(
                &nested.value,
                "#[entity(key = ...)] expects a string literal",
            ));
        }
    }
    Ok(None)
}

/// Extract just the type name (last path segment).
fn extract_type_name(ty: &Type) -> Option<String> {
    if let Type::Path(type_path) = ty {
        return type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string());
    }
    None
}

/// Map a declared field type to its `FieldKind` tag.
///
/// Returns the kind tokens plus whether a converter exists for the type.
/// Unknown types become `FieldKind::Unsupported` and are rejected when the
/// registry builds its binding tables.
fn map_field_kind(ty: &Type, paths: &CratePaths) -> (proc_macro2::TokenStream, bool) {
    let core = &paths.core;

    let Some(type_name) = extract_type_name(ty) else {
        let rendered = quote!(#ty).to_string();
        return (
            quote! { #core::properties::FieldKind::Unsupported { type_name: #rendered } },
            false,
        );
    };

    match type_name.as_str() {
        "String" => (quote! { #core::properties::FieldKind::Text }, true),
        "bool" => (quote! { #core::properties::FieldKind::Bool }, true),
        "i32" => (quote! { #core::properties::FieldKind::Int }, true),
        "f32" => (quote! { #core::properties::FieldKind::Float }, true),
        "Vec3" => (quote! { #core::properties::FieldKind::Vector }, true),
        "Color32" => (quote! { #core::properties::FieldKind::Color }, true),
        other => (
            quote! { #core::properties::FieldKind::Unsupported { type_name: #other } },
            false,
        ),
    }
}
