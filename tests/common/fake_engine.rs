//! A minimal scripted engine for exercising the harness end to end.
//!
//! This is a test double, not a Mustache implementation: it covers only the
//! tag forms the committed fixtures use (interpolation, comments, partials,
//! sections, inverted sections, lambdas) with no escaping, dotted names, or
//! delimiter changes. Lookups resolve against the root data map only.

use std::collections::HashMap;

use mustache_conformance::{EngineFault, RenderableTemplate, TemplateEngine, Value};

#[derive(Default)]
pub struct FakeEngine {
    partials: HashMap<String, String>,
}

pub struct FakeTemplate {
    source: String,
    partials: HashMap<String, String>,
}

impl TemplateEngine for FakeEngine {
    type Template = FakeTemplate;

    fn set_partials(&mut self, partials: HashMap<String, String>) {
        self.partials = partials;
    }

    fn load_template(&mut self, source: &str) -> Result<FakeTemplate, EngineFault> {
        // Partials are bound at load time, as the harness contract requires.
        Ok(FakeTemplate {
            source: source.to_string(),
            partials: self.partials.clone(),
        })
    }
}

impl RenderableTemplate for FakeTemplate {
    fn render(&self, data: &Value) -> Result<String, EngineFault> {
        render_str(&self.source, data, &self.partials)
    }
}

fn render_str(
    template: &str,
    data: &Value,
    partials: &HashMap<String, String>,
) -> Result<String, EngineFault> {
    let mut out = String::new();
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find("}}")
            .ok_or_else(|| EngineFault::new("unclosed tag"))?;
        let tag = &after[..close];
        rest = &after[close + 2..];

        match tag.chars().next() {
            Some('!') => {}
            Some('>') => {
                if let Some(partial) = partials.get(tag[1..].trim()) {
                    out.push_str(&render_str(partial, data, partials)?);
                }
            }
            Some(sigil @ ('#' | '^')) => {
                let name = tag[1..].trim();
                let end_tag = format!("{{{{/{name}}}}}");
                let end = rest.find(&end_tag).ok_or_else(|| {
                    EngineFault::new(format!("unclosed section '{name}'"))
                })?;
                let inner = &rest[..end];
                rest = &rest[end + end_tag.len()..];

                let value = data.get(name).cloned().unwrap_or(Value::Nil);
                if sigil == '^' {
                    if !is_truthy(&value) {
                        out.push_str(&render_str(inner, data, partials)?);
                    }
                } else {
                    match value {
                        Value::Lambda(lambda) => {
                            let produced = scalar_text(&lambda.call(Some(inner)))?;
                            out.push_str(&render_str(&produced, data, partials)?);
                        }
                        value if is_truthy(&value) => {
                            out.push_str(&render_str(inner, data, partials)?);
                        }
                        _ => {}
                    }
                }
            }
            _ => match data.get(tag.trim()) {
                Some(Value::Lambda(lambda)) => {
                    let produced = scalar_text(&lambda.call(None))?;
                    out.push_str(&render_str(&produced, data, partials)?);
                }
                Some(value) => out.push_str(&scalar_text(value)?),
                None => {}
            },
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        Value::List(items) => !items.is_empty(),
        // Lambdas are truthy as values; their return matters only when a
        // normal section invokes them.
        Value::Lambda(_) => true,
        _ => true,
    }
}

fn scalar_text(value: &Value) -> Result<String, EngineFault> {
    match value {
        Value::Nil => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(EngineFault::new(format!(
            "cannot interpolate a {}",
            other.type_name()
        ))),
    }
}
