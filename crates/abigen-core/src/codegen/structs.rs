//! Struct declarations for every registry entry.

use super::decl::{FieldItem, FnItem, ImplBlock, Item, SourceFile, StructItem};
use super::RenderContext;
use crate::ident::rust_ident;
use crate::registry::StructDef;

/// Generates the shared structs file, one declaration per registry entry in name order.
pub fn generate_structs(ctx: &RenderContext) -> SourceFile {
    let mut file = SourceFile {
        docs: ctx.header(&format!("ABI structs shared by the `{}` contracts.", ctx.config.name)),
        attributes: vec!["allow(unused_imports)".to_string()],
        imports: vec![ctx.runtime(&[
            "Address",
            "Detokenize",
            "Error",
            "Hash",
            "I256",
            "Token",
            "Tokenize",
            "TupleReader",
            "U256",
        ])],
        items: Vec::new(),
    };

    for def in ctx.registry.iter() {
        file.items.push(Item::Struct(struct_item(def)));
        file.items.push(Item::Impl(tokenize_impl(def)));
        file.items.push(Item::Impl(detokenize_impl(def)));
    }

    file
}

fn struct_item(def: &StructDef) -> StructItem {
    let mut docs = vec![format!("The `{}` ABI tuple.", def.name)];
    if def.is_event {
        docs.push(String::new());
        docs.push("Appears in event data.".to_string());
    }

    let fields = def
        .fields
        .iter()
        .map(|field| {
            let ident = rust_ident(&field.name);
            let docs = if ident != field.name {
                vec![format!("ABI field `{}`.", field.name)]
            } else {
                Vec::new()
            };
            FieldItem {
                docs,
                public: true,
                name: ident,
                ty: field.ty.clone(),
            }
        })
        .collect();

    StructItem {
        docs,
        derives: vec!["Debug".to_string(), "Clone".to_string(), "PartialEq".to_string()],
        name: def.name.clone(),
        fields,
    }
}

fn tokenize_impl(def: &StructDef) -> ImplBlock {
    let mut f = FnItem::new("into_token").receiver("self").returns("Token");
    if def.fields.is_empty() {
        f = f.line("Token::Tuple(Vec::new())");
    } else {
        f = f.line("Token::Tuple(vec![");
        for field in &def.fields {
            f = f.line(format!("    self.{}.into_token(),", rust_ident(&field.name)));
        }
        f = f.line("])");
    }

    let mut block = ImplBlock::for_trait("Tokenize", def.name.clone());
    block.fns.push(f);
    block
}

fn detokenize_impl(def: &StructDef) -> ImplBlock {
    let mut f = FnItem::new("from_token")
        .param("token", "Token")
        .returns("Result<Self, Error>");

    if def.fields.is_empty() {
        f = f.line("TupleReader::new(token, 0)?;").line("Ok(Self {})");
    } else {
        f = f
            .line(format!("let mut fields = TupleReader::new(token, {})?;", def.fields.len()))
            .line("Ok(Self {");
        for field in &def.fields {
            f = f.line(format!("    {}: fields.read()?,", rust_ident(&field.name)));
        }
        f = f.line("})");
    }

    let mut block = ImplBlock::for_trait("Detokenize", def.name.clone());
    block.fns.push(f);
    block
}
