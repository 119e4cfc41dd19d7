//! Stylesheet rendering for the markup dialect.

use figrule_source::tokens::css_variable_name;
use figrule_source::TokenMap;

/// One selector and its declarations, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

/// `:root` block defining one custom property per token.
pub fn token_rule(tokens: &TokenMap) -> Option<StyleRule> {
    if tokens.is_empty() {
        return None;
    }
    Some(StyleRule {
        selector: ":root".to_string(),
        declarations: tokens
            .iter()
            .map(|token| (format!("--{}", css_variable_name(&token.name)), token.value.clone()))
            .collect(),
    })
}

/// Render rules, one declaration per line, blocks separated by a blank line.
pub fn generate(rules: &[StyleRule], tokens: Option<&TokenMap>) -> String {
    let root = tokens.and_then(token_rule);
    root.iter()
        .chain(rules)
        .map(render_rule)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_rule(rule: &StyleRule) -> String {
    let mut css = format!("{} {{\n", rule.selector);
    for (property, value) in &rule.declarations {
        css.push_str(&format!("  {property}: {value};\n"));
    }
    css.push_str("}\n");
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use figrule_source::DesignToken;
    use pretty_assertions::assert_eq;

    fn rule(selector: &str, declarations: &[(&str, &str)]) -> StyleRule {
        StyleRule {
            selector: selector.into(),
            declarations: declarations
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_empty_stylesheet() {
        assert_eq!(generate(&[], None), "");
    }

    #[test]
    fn test_blocks() {
        let rules = vec![
            rule(".card-1-1", &[("display", "flex"), ("flex-direction", "column")]),
            rule(".title-1-2", &[("font-size", "18px")]),
        ];
        let expected = "\
.card-1-1 {
  display: flex;
  flex-direction: column;
}

.title-1-2 {
  font-size: 18px;
}
";
        assert_eq!(generate(&rules, None), expected);
    }

    #[test]
    fn test_token_root_block_comes_first() {
        let mut tokens = TokenMap::new();
        tokens.insert(
            "1:1",
            DesignToken {
                name: "Colors/Brand Primary".into(),
                value: "#1E40AF".into(),
            },
        );
        let rules = vec![rule(".a-1", &[("color", "var(--Colors-Brand-Primary, #1E40AF)")])];
        let expected = "\
:root {
  --Colors-Brand-Primary: #1E40AF;
}

.a-1 {
  color: var(--Colors-Brand-Primary, #1E40AF);
}
";
        assert_eq!(generate(&rules, Some(&tokens)), expected);
        assert_eq!(generate(&[], Some(&TokenMap::new())), "");
    }
}
