//! Style property → utility class table.
//!
//! Matches on every [`Property`] so a new property cannot be added without
//! deciding its class mapping. Values off the table fall back to arbitrary
//! value classes (`w-[120px]`), and extension properties become arbitrary
//! property classes (`[text-transform:uppercase]`), so no property is lost.

use crate::helpers::to_kebab_case;
use figrule_ir::{parse_px, Property, PropertyMap, StyleValue};

/// Utility classes for a style map: known properties in declaration order,
/// then extensions in name order.
pub fn utility_classes(styles: &PropertyMap) -> Vec<String> {
    let known = styles
        .known()
        .flat_map(|(property, value)| property_classes(property, value));
    let extensions = styles
        .extensions()
        .map(|(name, value)| arbitrary_property(&to_kebab_case(name), &value.to_string()));
    known.chain(extensions).collect()
}

/// Classes for one property. Never empty.
pub fn property_classes(property: Property, value: &StyleValue) -> Vec<String> {
    let text = value.to_string();
    let text = text.as_str();
    match property {
        Property::Display => one(match text {
            "flex" | "block" | "inline" | "inline-block" | "grid" => text.to_string(),
            "none" => "hidden".to_string(),
            _ => arbitrary_property("display", text),
        }),
        Property::FlexDirection => one(match text {
            "row" => "flex-row".to_string(),
            "column" => "flex-col".to_string(),
            "row-reverse" => "flex-row-reverse".to_string(),
            "column-reverse" => "flex-col-reverse".to_string(),
            _ => arbitrary_property("flex-direction", text),
        }),
        Property::Gap => one(spacing("gap", text)),
        Property::Padding => box_spacing("p", text),
        Property::PaddingTop => one(spacing("pt", text)),
        Property::PaddingRight => one(spacing("pr", text)),
        Property::PaddingBottom => one(spacing("pb", text)),
        Property::PaddingLeft => one(spacing("pl", text)),
        Property::Margin => box_spacing("m", text),
        Property::AlignItems => one(match text {
            "flex-start" => "items-start".to_string(),
            "flex-end" => "items-end".to_string(),
            "center" => "items-center".to_string(),
            "baseline" => "items-baseline".to_string(),
            "stretch" => "items-stretch".to_string(),
            _ => arbitrary_property("align-items", text),
        }),
        Property::JustifyContent => one(match text {
            "flex-start" => "justify-start".to_string(),
            "flex-end" => "justify-end".to_string(),
            "center" => "justify-center".to_string(),
            "space-between" => "justify-between".to_string(),
            "space-around" => "justify-around".to_string(),
            "space-evenly" => "justify-evenly".to_string(),
            _ => arbitrary_property("justify-content", text),
        }),
        Property::Position => one(match text {
            "static" | "relative" | "absolute" | "fixed" | "sticky" => text.to_string(),
            _ => arbitrary_property("position", text),
        }),
        Property::Top => one(inset("top", text)),
        Property::Right => one(inset("right", text)),
        Property::Bottom => one(inset("bottom", text)),
        Property::Left => one(inset("left", text)),
        Property::Transform => transform_terms(text).into_iter().map(transform_class).collect(),
        Property::ZIndex => one(match text {
            "0" | "10" | "20" | "30" | "40" | "50" | "auto" => format!("z-{text}"),
            _ => arbitrary("z", text),
        }),
        Property::Width => one(size("w", text)),
        Property::Height => one(size("h", text)),
        Property::Background | Property::BackgroundColor => one(match named_color(text) {
            Some(name) => format!("bg-{name}"),
            None => arbitrary("bg", text),
        }),
        Property::Color => one(match named_color(text) {
            Some(name) => format!("text-{name}"),
            None => format!("text-[color:{}]", underscore(text)),
        }),
        Property::Border => border(text),
        Property::BorderRadius => one(match parse_px(text) {
            Some(n) if n == 0.0 => "rounded-none".to_string(),
            Some(n) if n == 2.0 => "rounded-sm".to_string(),
            Some(n) if n == 4.0 => "rounded".to_string(),
            Some(n) if n == 8.0 => "rounded-lg".to_string(),
            Some(n) if n == 12.0 => "rounded-xl".to_string(),
            Some(n) if n == 16.0 => "rounded-2xl".to_string(),
            Some(n) if n == 9999.0 => "rounded-full".to_string(),
            _ => arbitrary("rounded", text),
        }),
        Property::BoxShadow => one(arbitrary("shadow", text)),
        Property::Filter => one(match blur_radius(text) {
            Some(radius) => arbitrary("blur", radius),
            None => arbitrary_property("filter", text),
        }),
        Property::BackdropFilter => one(match blur_radius(text) {
            Some(radius) => arbitrary("backdrop-blur", radius),
            None => arbitrary_property("backdrop-filter", text),
        }),
        Property::Opacity => one(opacity(text)),
        Property::FontSize => one(
            match parse_px(text) {
                Some(n) if n == 12.0 => "text-xs",
                Some(n) if n == 14.0 => "text-sm",
                Some(n) if n == 18.0 => "text-lg",
                Some(n) if n == 20.0 => "text-xl",
                Some(n) if n == 24.0 => "text-2xl",
                Some(n) if n == 30.0 => "text-3xl",
                Some(n) if n == 36.0 => "text-4xl",
                Some(n) if n == 48.0 => "text-5xl",
                _ => "text-base",
            }
            .to_string(),
        ),
        Property::FontFamily => one(font_family(text)),
        Property::FontWeight => one(match font_weight(value) {
            Some(100) => "font-thin".to_string(),
            Some(200) => "font-extralight".to_string(),
            Some(300) => "font-light".to_string(),
            Some(400) => "font-normal".to_string(),
            Some(500) => "font-medium".to_string(),
            Some(600) => "font-semibold".to_string(),
            Some(700) => "font-bold".to_string(),
            Some(800) => "font-extrabold".to_string(),
            Some(900) => "font-black".to_string(),
            _ => arbitrary("font", text),
        }),
        Property::LineHeight => one(arbitrary("leading", text)),
        Property::LetterSpacing => one(arbitrary("tracking", text)),
        Property::TextAlign => one(match text {
            "left" | "center" | "right" | "justify" => format!("text-{text}"),
            _ => arbitrary_property("text-align", text),
        }),
    }
}

fn one(class: String) -> Vec<String> {
    vec![class]
}

/// Spaces inside an arbitrary value are written as underscores.
fn underscore(value: &str) -> String {
    value.trim().replace(' ', "_")
}

/// `prefix-[value]`.
fn arbitrary(prefix: &str, value: &str) -> String {
    format!("{prefix}-[{}]", underscore(value))
}

/// `[name:value]`.
fn arbitrary_property(name: &str, value: &str) -> String {
    format!("[{name}:{}]", underscore(value))
}

/// `16px` → `{prefix}-4`: pixels over four, rounded to the nearest step.
/// Other units keep their value.
fn spacing(prefix: &str, value: &str) -> String {
    match parse_px(value) {
        Some(pixels) => format!("{prefix}-{}", (pixels / 4.0).round() as i64),
        None if value == "auto" => format!("{prefix}-auto"),
        None => arbitrary(prefix, value),
    }
}

/// Padding or margin shorthand, split per axis or per edge.
fn box_spacing(prefix: &str, value: &str) -> Vec<String> {
    let edge = |suffix: &str, value: &str| spacing(&format!("{prefix}{suffix}"), value);
    match value.split_whitespace().collect::<Vec<_>>().as_slice() {
        [all] => vec![spacing(prefix, all)],
        [y, x] => vec![edge("y", y), edge("x", x)],
        [top, x, bottom] => vec![edge("t", top), edge("x", x), edge("b", bottom)],
        [top, right, bottom, left] => vec![
            edge("t", top),
            edge("r", right),
            edge("b", bottom),
            edge("l", left),
        ],
        _ => vec![arbitrary(prefix, value)],
    }
}

fn inset(prefix: &str, value: &str) -> String {
    match value {
        "0" | "0px" => format!("{prefix}-0"),
        "auto" => format!("{prefix}-auto"),
        _ => arbitrary(prefix, value),
    }
}

fn size(prefix: &str, value: &str) -> String {
    match value {
        "100%" => format!("{prefix}-full"),
        "auto" => format!("{prefix}-auto"),
        _ => arbitrary(prefix, value),
    }
}

/// Split a transform list on whitespace outside parentheses.
fn transform_terms(value: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    terms.push(&value[s..i]);
                }
                continue;
            }
            _ => {}
        }
        start.get_or_insert(i);
    }
    if let Some(s) = start {
        terms.push(&value[s..]);
    }
    terms
}

fn function_arg<'a>(term: &'a str, name: &str) -> Option<&'a str> {
    term.strip_prefix(name)?.strip_prefix('(')?.strip_suffix(')')
}

fn transform_class(term: &str) -> String {
    if let Some(arg) = function_arg(term, "translateX") {
        return arbitrary("translate-x", arg);
    }
    if let Some(arg) = function_arg(term, "translateY") {
        return arbitrary("translate-y", arg);
    }
    if let Some(arg) = function_arg(term, "rotate") {
        let degrees = arg.strip_suffix("deg").and_then(|d| d.parse::<f64>().ok());
        return match degrees {
            Some(d) if [45.0, 90.0, 180.0].contains(&d) => format!("rotate-{d}"),
            Some(d) if [-45.0, -90.0, -180.0].contains(&d) => format!("-rotate-{}", -d),
            _ => arbitrary("rotate", arg),
        };
    }
    arbitrary_property("transform", term)
}

/// `1px solid C` → `border` plus a color class.
fn border(value: &str) -> Vec<String> {
    let parsed = value
        .split_once(' ')
        .and_then(|(width, rest)| Some((width, rest.strip_prefix("solid ")?)));
    let Some((width, color)) = parsed else {
        return one(arbitrary_property("border", value));
    };
    let width = match parse_px(width) {
        Some(n) if n == 1.0 => "border".to_string(),
        _ => arbitrary("border", width),
    };
    let color = match named_color(color) {
        Some(name) => format!("border-{name}"),
        None => arbitrary("border", color),
    };
    vec![width, color]
}

fn blur_radius(value: &str) -> Option<&str> {
    function_arg(value.trim(), "blur")
}

/// Multiples of five percent use the scale; anything else is arbitrary.
fn opacity(value: &str) -> String {
    let percent = value.parse::<f64>().ok().map(|n| n * 100.0);
    match percent {
        Some(p) if (0.0..=100.0).contains(&p) && (p - (p / 5.0).round() * 5.0).abs() < 1e-9 => {
            format!("opacity-{}", p.round() as i64)
        }
        _ => arbitrary("opacity", value),
    }
}

/// First family of the stack, unquoted: `'Open Sans', sans-serif` →
/// `font-['Open_Sans']`.
fn font_family(value: &str) -> String {
    let first = value.split(',').next().unwrap_or(value);
    let family = first.trim().trim_matches(|c: char| c == '\'' || c == '"');
    format!("font-['{}']", underscore(family))
}

fn named_color(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "#ffffff" | "#fff" | "white" => Some("white"),
        "#000000" | "#000" | "black" => Some("black"),
        "transparent" => Some("transparent"),
        _ => None,
    }
}

fn font_weight(value: &StyleValue) -> Option<i64> {
    match value {
        StyleValue::Number(n) => Some(*n as i64),
        StyleValue::Text(s) => s.trim().parse().ok(),
    }
}
