//! Event records with topic-filter and log-decoding helpers.

use super::decl::{FieldItem, FnItem, ImplBlock, Item, SourceFile, StructItem};
use super::{free_name, signature, RenderContext};
use crate::diagnostic::GeneratorError;
use crate::ident::{field_names, rust_ident, to_identifier, to_snake_case, type_name};
use crate::ir::{ContractArtifact, EventIR};

/// Generates the events file of one contract.
///
/// Every event gets a record struct and three methods on the contract
/// handle: `<event>_topic_filter`, `filter_<event>_logs` and `decode_<event>`.
pub fn generate_events(
    artifact: &ContractArtifact,
    ctx: &RenderContext,
) -> Result<SourceFile, GeneratorError> {
    let handle = type_name(&artifact.name);

    let mut file = SourceFile {
        docs: ctx.header(&format!("Events of the `{}` contract.", artifact.name)),
        attributes: vec!["allow(unused_imports)".to_string()],
        imports: vec![
            ctx.runtime(&[
                "Address",
                "BlockNumber",
                "Error",
                "Hash",
                "I256",
                "Log",
                "TopicFilter",
                "Tokenize",
                "U256",
            ]),
            format!("super::{}::*", ctx.structs_module()),
            format!("super::{}::{}", ctx.contract_module(&artifact.name), handle),
        ],
        items: Vec::new(),
    };

    if artifact.abi.events.is_empty() {
        return Ok(file);
    }

    let mut block = ImplBlock::inherent(handle.clone());
    for event in &artifact.abi.events {
        let record = record_name(&handle, event, ctx);
        file.items.push(Item::Struct(record_struct(&record, event, ctx)?));
        block.fns.push(topic_filter_fn(event, ctx)?);
        block.fns.push(filter_logs_fn(event, &record));
        block.fns.push(decode_fn(event, &record));
    }
    file.items.push(Item::Impl(block));

    Ok(file)
}

/// `{Contract}{Event}`, suffixed with `Event` if a struct already has that name.
fn record_name(handle: &str, event: &EventIR, ctx: &RenderContext) -> String {
    let name = format!("{}{}", handle, type_name(&event.binding_name));
    if ctx.registry.contains(&name) {
        format!("{}Event", name)
    } else {
        name
    }
}

/// Snake-case stem used in the helper names, e.g. `ownership_transferred`.
fn helper_stem(event: &EventIR) -> String {
    to_snake_case(&to_identifier(&event.binding_name))
}

/// Rust identifiers of the event inputs, clear of the record's `raw` field.
fn input_idents(event: &EventIR) -> Vec<String> {
    let mut taken = vec!["raw".to_string()];
    for name in field_names(&event.inputs) {
        let ident = free_name(&rust_ident(&name), &taken);
        taken.push(ident);
    }
    taken.split_off(1)
}

fn record_struct(
    record: &str,
    event: &EventIR,
    ctx: &RenderContext,
) -> Result<StructItem, GeneratorError> {
    let mut fields = Vec::with_capacity(event.inputs.len() + 1);
    for (input, ident) in event.inputs.iter().zip(input_idents(event)) {
        let mut docs = Vec::new();
        if input.indexed && input.ty.is_hashed_topic() {
            docs.push(format!("Topic hash of the indexed `{}` value.", input.ty));
        }
        fields.push(FieldItem {
            docs,
            public: true,
            name: ident,
            ty: ctx.topic_ty(&input.ty, input.indexed)?,
        });
    }
    fields.push(FieldItem {
        docs: vec!["The log this event was decoded from.".to_string()],
        public: true,
        name: "raw".to_string(),
        ty: "Log".to_string(),
    });

    Ok(StructItem {
        docs: vec![format!(
            "Decoded `{}` event.",
            signature(&event.name, &event.inputs)
        )],
        derives: vec!["Debug".to_string(), "Clone".to_string()],
        name: record.to_string(),
        fields,
    })
}

fn topic_filter_fn(event: &EventIR, ctx: &RenderContext) -> Result<FnItem, GeneratorError> {
    let sig = signature(&event.name, &event.inputs);
    let mut f = FnItem::new(format!("{}_topic_filter", helper_stem(event)))
        .doc(format!("Builds a topic filter for `{}` logs.", sig))
        .doc("")
        .doc("`None` matches any value of that field.")
        .receiver("&self");

    let idents = input_idents(event);
    let var = free_name("filter", &idents);
    let open = if event.anonymous {
        format!("let mut {} = self.contract.anonymous_event_filter();", var)
    } else {
        format!("let mut {} = self.contract.event_filter(\"{}\")?;", var, sig)
    };

    // topic 0 carries the signature hash unless the event is anonymous
    let mut topic = if event.anonymous { 0 } else { 1 };
    let mut body = vec![open];
    for (input, ident) in event.inputs.iter().zip(idents.iter()) {
        if !input.indexed {
            continue;
        }
        f = f.param(
            ident.clone(),
            format!("Option<{}>", ctx.topic_ty(&input.ty, true)?),
        );
        body.push(format!(
            "{}.topic({}, {}.map(Tokenize::into_token));",
            var, topic, ident
        ));
        topic += 1;
    }
    body.push(format!("Ok({})", var));

    f = f.returns("Result<TopicFilter, Error>");
    f.body = body;
    Ok(f)
}

fn filter_logs_fn(event: &EventIR, record: &str) -> FnItem {
    let stem = helper_stem(event);
    FnItem::new(format!("filter_{}_logs", stem))
        .doc(format!(
            "Fetches the `{}` logs matching `filter` in the block range and decodes them.",
            event.name
        ))
        .receiver("&self")
        .param("filter", "TopicFilter")
        .param("from_block", "BlockNumber")
        .param("to_block", "BlockNumber")
        .returns(format!("Result<Vec<{}>, Error>", record))
        .line("let logs = self.contract.get_logs(filter, from_block, to_block)?;")
        .line(format!(
            "logs.into_iter().map(|log| self.decode_{}(log)).collect()",
            stem
        ))
}

fn decode_fn(event: &EventIR, record: &str) -> FnItem {
    let sig = signature(&event.name, &event.inputs);
    let mut f = FnItem::new(format!("decode_{}", helper_stem(event)))
        .doc(format!("Decodes a raw `{}` log.", event.name))
        .receiver("&self")
        .param("log", "Log")
        .returns(format!("Result<{}, Error>", record))
        .line(format!(
            "let mut fields = self.contract.decode_event(\"{}\", &log)?;",
            sig
        ))
        .line(format!("Ok({} {{", record));
    for ident in input_idents(event) {
        f = f.line(format!("    {}: fields.read()?,", ident));
    }
    f.line("    raw: log,").line("})")
}
