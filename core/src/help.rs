//! Plain-text help pages generated from schema rules.

use crate::schema::{CONTENT_SLOT, POSITION_SLOT, SchemaRule};

/// Turns a snake_case element name into CamelCase.
///
/// # Examples
///
/// ```
/// assert_eq!(lilyflower_core::display_name("with_color"), "WithColor");
/// assert_eq!(lilyflower_core::display_name("score"), "Score");
/// ```
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Renders the help page of a rule.
///
/// The page has a title line, a usage line listing every slot in binding
/// order, one line per slot and the errors construction can raise.
pub fn describe(rule: &SchemaRule) -> String {
    let mut kind = if rule.is_container() { "container" } else { "command" }.to_string();
    if rule.inline {
        kind.push_str(", inline");
    }
    let mut lines = vec![format!("{} (`{}`) {kind}.", display_name(&rule.name), rule.tag)];

    let usage: Vec<String> = rule
        .parameters
        .iter()
        .map(|p| if p.optional { format!("[{}]", p.name) } else { p.name.clone() })
        .chain(rule.is_attachment().then(|| format!("[{POSITION_SLOT}]")))
        .chain(rule.is_container().then(|| format!("[{CONTENT_SLOT}]")))
        .collect();
    lines.push(String::new());
    lines.push(format!("Usage: {}({})", rule.name, usage.join(", ")));

    let mut slots: Vec<(&str, String)> = rule
        .parameters
        .iter()
        .map(|p| {
            let suffix = if p.optional { " (optional)" } else { "" };
            (p.name.as_str(), format!("{}{suffix}", p.kind))
        })
        .collect();
    if rule.is_attachment() {
        slots.push((POSITION_SLOT, "none, up, down or neutral (optional)".to_string()));
    }
    if let Some(content) = rule.content {
        slots.push((CONTENT_SLOT, format!("sequence of {content}")));
    }

    lines.push(String::new());
    if slots.is_empty() {
        lines.push("Takes no arguments.".to_string());
    } else {
        lines.push("Parameters:".to_string());
        let width = slots.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, text) in &slots {
            lines.push(format!("  {name:<width$}  {text}"));
        }
    }

    let mut errors = vec![("TooManyArguments", "more positional values than slots")];
    if rule.parameters.iter().any(|p| !p.optional) {
        errors.push(("MissingArgument", "a required parameter is not supplied"));
    }
    errors.push(("InvalidArgument", "a value does not match its slot"));
    if rule.is_container() {
        errors.push(("InvalidContent", "a child carries none of the accepted categories"));
    } else {
        errors.push(("NotAContainer", "list operations on this command"));
    }
    lines.push(String::new());
    lines.push("Errors:".to_string());
    for (name, text) in errors {
        lines.push(format!("  {name:<16}  {text}"));
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, CategorySet, LeafKind, ParamKind, Parameter};

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("fermata_articulation"), "FermataArticulation");
        assert_eq!(display_name("_hidden"), "Hidden");
    }

    #[test]
    fn test_describe_attachment_container() {
        let markup = CategorySet::from_slice(&[Category::Markup, Category::Attachment]);
        let rule = SchemaRule::container("with_color", "\\with-color", markup, markup)
            .with_parameter(Parameter::required("color", ParamKind::Leaf(LeafKind::Color)))
            .with_inline(true);
        let expected = "\
WithColor (`\\with-color`) container, inline.

Usage: with_color(color, [position], [content])

Parameters:
  color     color
  position  none, up, down or neutral (optional)
  content   sequence of markup, attachment

Errors:
  TooManyArguments  more positional values than slots
  MissingArgument   a required parameter is not supplied
  InvalidArgument   a value does not match its slot
  InvalidContent    a child carries none of the accepted categories
";
        assert_eq!(describe(&rule), expected);
    }

    #[test]
    fn test_describe_bare_command() {
        let rule =
            SchemaRule::command("bar_break", "\\break", CategorySet::single(Category::Music));
        let page = describe(&rule);
        assert!(page.starts_with("BarBreak (`\\break`) command.\n"));
        assert!(page.contains("Usage: bar_break()\n"));
        assert!(page.contains("Takes no arguments."));
        assert!(page.contains("NotAContainer"));
        assert!(!page.contains("MissingArgument"));
    }
}
