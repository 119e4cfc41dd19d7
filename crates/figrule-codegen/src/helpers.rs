//! Naming, indentation and escaping shared by the generators.

/// `"primary-button"`, `"Button Label"` → `"PrimaryButton"`, `"ButtonLabel"`.
pub fn to_pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Component identifier for a node name. Falls back to `Component` when the
/// name has no usable characters, and prefixes it when it starts with a digit.
pub fn component_name(name: &str) -> String {
    let pascal = to_pascal_case(name);
    match pascal.chars().next() {
        None => "Component".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Component{pascal}"),
        Some(_) => pascal,
    }
}

/// Wrap rendered markup in an exported function component.
pub fn wrap_component(name: &str, markup: &str) -> String {
    format!(
        "export function {}() {{\n  return (\n{}\n  );\n}}\n",
        component_name(name),
        indent(markup, 2)
    )
}

/// `"PrimaryButton"`, `"my_component"` → `"primary-button"`, `"my-component"`.
pub fn to_kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    let mut in_separator = false;
    for c in name.chars() {
        if c.is_whitespace() || c == '_' {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
            prev = Some(c);
            continue;
        }
        in_separator = false;
        if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    out
}

/// Indent every non-blank line by `levels` × two spaces.
pub fn indent(code: &str, levels: usize) -> String {
    let indentation = "  ".repeat(levels);
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{indentation}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape for a double-quoted string literal.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML void elements: never closed, never given children.
pub fn is_void_element(tag: &str) -> bool {
    matches!(tag, "img" | "br" | "hr" | "input" | "meta" | "link")
}
