//! Schema-agnostic presentation of a structured summary record.
//!
//! Top-level fields follow [`PREFERRED_FIELDS`], then any remaining fields in
//! insertion order. Nested objects keep their own insertion order.

use serde::Serialize;
use serde_json::{Map, Value};

/// Display priority for top-level fields.
pub const PREFERRED_FIELDS: [&str; 24] = [
    "posicionamento",
    "principais_concorrentes",
    "diferenciais",
    "preco_medio",
    "dores_clientes",
    "pitch_rapido",
    "objections_comuns",
    "entregaveis",
    "processo_basico",
    "garantias",
    "tamanho_estimado",
    "principais_players",
    "tendencias",
    "oportunidades",
    "barreiras_entrada",
    "pitch_oportunidade",
    "historia",
    "valores",
    "market_share",
    "reputacao",
    "pitch_marca",
    "resumo",
    "tipo",
    "aviso",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    /// Field name as it appears in the record.
    pub key: String,
    /// Field name with underscores shown as spaces.
    pub label: String,
    pub body: RenderedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RenderedValue {
    /// A string field, shown as a paragraph.
    Text(String),
    /// A number, boolean or null, shown in its JSON spelling.
    Scalar(String),
    List(Vec<String>),
    Nested(Vec<RenderedSection>),
}

pub fn label_for(key: &str) -> String {
    key.replace('_', " ")
}

/// Top-level field order: preferred fields that are present, in preferred
/// order, then the rest in insertion order.
pub fn ordered_fields(record: &Map<String, Value>) -> Vec<(&str, &Value)> {
    let preferred = PREFERRED_FIELDS
        .iter()
        .filter_map(|&key| record.get(key).map(|value| (key, value)));
    let rest = record
        .iter()
        .filter(|(key, _)| !PREFERRED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), value));
    preferred.chain(rest).collect()
}

pub fn render(record: &Map<String, Value>) -> Vec<RenderedSection> {
    ordered_fields(record)
        .into_iter()
        .map(|(key, value)| section(key, value))
        .collect()
}

fn section(key: &str, value: &Value) -> RenderedSection {
    RenderedSection {
        key: key.to_string(),
        label: label_for(key),
        body: render_value(value),
    }
}

fn render_value(value: &Value) -> RenderedValue {
    match value {
        Value::String(text) => RenderedValue::Text(text.clone()),
        Value::Array(items) => RenderedValue::List(items.iter().map(list_item).collect()),
        Value::Object(fields) => RenderedValue::Nested(
            fields.iter().map(|(key, value)| section(key, value)).collect(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => RenderedValue::Scalar(value.to_string()),
    }
}

/// List items are flat: anything that is not a string is shown as raw JSON.
fn list_item(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Plain-text rendering for terminals.
pub fn render_text(sections: &[RenderedSection]) -> String {
    let mut out = String::new();
    write_sections(&mut out, sections, 0);
    out
}

fn write_sections(out: &mut String, sections: &[RenderedSection], depth: usize) {
    let indent = "  ".repeat(depth);
    for section in sections {
        out.push_str(&format!("{indent}{}\n", section.label.to_uppercase()));
        match &section.body {
            RenderedValue::Text(text) | RenderedValue::Scalar(text) => {
                for line in text.lines() {
                    out.push_str(&format!("{indent}  {line}\n"));
                }
            }
            RenderedValue::List(items) => {
                for item in items {
                    out.push_str(&format!("{indent}  - {item}\n"));
                }
            }
            RenderedValue::Nested(children) => write_sections(out, children, depth + 1),
        }
    }
}
