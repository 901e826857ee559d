//! Rust pretty-printer for [`SourceFile`].

use super::decl::{ConstItem, FieldItem, FnItem, ImplBlock, Item, SourceFile, StructItem};

const INDENT: &str = "    ";

/// Renders a source file to text.
pub fn print(file: &SourceFile) -> String {
    let mut out = String::new();

    for line in &file.docs {
        push_doc(&mut out, "//!", line, "");
    }
    for attribute in &file.attributes {
        out.push_str(&format!("#![{}]\n", attribute));
    }
    if !file.docs.is_empty() || !file.attributes.is_empty() {
        out.push('\n');
    }

    for import in &file.imports {
        out.push_str(&format!("use {};\n", import));
    }
    if !file.imports.is_empty() {
        out.push('\n');
    }

    let mut previous_was_decl = false;
    for item in &file.items {
        // Consecutive `mod`/`use` lines stay together, everything else is spaced.
        let is_decl = matches!(item, Item::Mod(_) | Item::Use(_));
        if !out.is_empty() && !out.ends_with("\n\n") && !(is_decl && previous_was_decl) {
            out.push('\n');
        }
        previous_was_decl = is_decl;

        match item {
            Item::Mod(m) => out.push_str(&format!("pub mod {};\n", m.name)),
            Item::Use(path) => out.push_str(&format!("pub use {};\n", path)),
            Item::Const(c) => print_const(&mut out, c),
            Item::Struct(s) => print_struct(&mut out, s),
            Item::Impl(block) => print_impl(&mut out, block),
            Item::Fn(f) => print_fn(&mut out, f, ""),
        }
    }

    out
}

fn push_doc(out: &mut String, marker: &str, line: &str, indent: &str) {
    if line.is_empty() {
        out.push_str(&format!("{}{}\n", indent, marker));
    } else {
        out.push_str(&format!("{}{} {}\n", indent, marker, line));
    }
}

fn visibility(public: bool) -> &'static str {
    if public {
        "pub "
    } else {
        ""
    }
}

fn print_const(out: &mut String, c: &ConstItem) {
    for line in &c.docs {
        push_doc(out, "///", line, "");
    }
    out.push_str(&format!(
        "{}const {}: {} = {};\n",
        visibility(c.public),
        c.name,
        c.ty,
        c.value
    ));
}

fn print_struct(out: &mut String, s: &StructItem) {
    for line in &s.docs {
        push_doc(out, "///", line, "");
    }
    if !s.derives.is_empty() {
        out.push_str(&format!("#[derive({})]\n", s.derives.join(", ")));
    }
    if s.fields.is_empty() {
        out.push_str(&format!("pub struct {};\n", s.name));
        return;
    }
    out.push_str(&format!("pub struct {} {{\n", s.name));
    for field in &s.fields {
        print_field(out, field);
    }
    out.push_str("}\n");
}

fn print_field(out: &mut String, field: &FieldItem) {
    for line in &field.docs {
        push_doc(out, "///", line, INDENT);
    }
    out.push_str(&format!(
        "{}{}{}: {},\n",
        INDENT,
        visibility(field.public),
        field.name,
        field.ty
    ));
}

fn print_impl(out: &mut String, block: &ImplBlock) {
    match &block.trait_name {
        Some(trait_name) => out.push_str(&format!("impl {} for {} {{\n", trait_name, block.target)),
        None => out.push_str(&format!("impl {} {{\n", block.target)),
    }
    for (i, f) in block.fns.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Trait methods inherit the trait's visibility.
        let mut f = f.clone();
        if block.trait_name.is_some() {
            f.public = false;
        }
        print_fn(out, &f, INDENT);
    }
    out.push_str("}\n");
}

fn print_fn(out: &mut String, f: &FnItem, indent: &str) {
    for line in &f.docs {
        push_doc(out, "///", line, indent);
    }

    let mut params: Vec<String> = Vec::with_capacity(f.params.len() + 1);
    if let Some(receiver) = &f.receiver {
        params.push(receiver.clone());
    }
    params.extend(f.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));

    let ret = f
        .ret
        .as_ref()
        .map(|r| format!(" -> {}", r))
        .unwrap_or_default();

    out.push_str(&format!(
        "{}{}fn {}({}){} {{\n",
        indent,
        visibility(f.public),
        f.name,
        params.join(", "),
        ret
    ));
    for line in &f.body {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{}{}{}\n", indent, INDENT, line));
        }
    }
    out.push_str(&format!("{}}}\n", indent));
}
