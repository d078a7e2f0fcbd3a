//! Plain-text usage rendering for `--help`.

use argv_schema_parser::{FieldSpec, HelpRenderer, OptionSpec, Schema};

/// Renders a usage line followed by option and operand tables.
#[derive(Debug, Clone)]
pub struct UsageRenderer {
    program: String,
}

impl UsageRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl HelpRenderer for UsageRenderer {
    fn render(&self, schema: &Schema) -> String {
        let mut out = format!("Usage: {}", self.program);
        if !schema.options().is_empty() {
            out.push_str(" [OPTIONS]");
        }
        for operand in schema.operands() {
            out.push(' ');
            out.push_str(&operand_usage(operand));
        }
        out.push('\n');

        let options: Vec<(String, String)> = schema
            .options()
            .iter()
            .map(|option| (option_label(option), describe(&option.field)))
            .collect();
        push_section(&mut out, "Options", &options);

        let operands: Vec<(String, String)> = schema
            .operands()
            .iter()
            .map(|operand| (operand.id.clone(), describe(operand)))
            .collect();
        push_section(&mut out, "Operands", &operands);

        out
    }
}

fn option_label(option: &OptionSpec) -> String {
    let mut label = format!("-{}, --{}", option.short_id, option.long_id);
    if option.takes_value() {
        label.push_str(&format!(" <{}>", option.field.display_hint()));
    }
    label
}

fn operand_usage(operand: &FieldSpec) -> String {
    let name = if operand.many {
        format!("{}...", operand.id)
    } else {
        operand.id.clone()
    };
    if operand.required {
        format!("<{name}>")
    } else {
        format!("[{name}]")
    }
}

fn describe(field: &FieldSpec) -> String {
    let mut text = field.description.clone().unwrap_or_default();
    if let Some(default) = &field.default {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&format!("[default: {default}]"));
    }
    text
}

fn push_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    out.push_str(&format!("\n{title}:\n"));
    for (label, text) in rows {
        let line = format!("  {label:<width$}  {text}");
        out.push_str(line.trim_end());
        out.push('\n');
    }
}
