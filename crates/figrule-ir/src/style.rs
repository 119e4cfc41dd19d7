//! Closed style record.
//!
//! Every property the pipeline knows about is a `Property` variant, so the
//! translators downstream (utility classes, declarations) match on it
//! exhaustively. Anything else a rule contributes lands in the extension bag
//! under its authored name.

use crate::css::format_number;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Known style properties. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Display,
    FlexDirection,
    Gap,
    AlignItems,
    JustifyContent,
    Position,
    Top,
    Right,
    Bottom,
    Left,
    Transform,
    ZIndex,
    Width,
    Height,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    Margin,
    Background,
    BackgroundColor,
    Color,
    Border,
    BorderRadius,
    BoxShadow,
    Filter,
    BackdropFilter,
    Opacity,
    FontSize,
    FontFamily,
    FontWeight,
    LineHeight,
    LetterSpacing,
    TextAlign,
}

impl Property {
    pub const ALL: [Property; 35] = [
        Property::Display,
        Property::FlexDirection,
        Property::Gap,
        Property::AlignItems,
        Property::JustifyContent,
        Property::Position,
        Property::Top,
        Property::Right,
        Property::Bottom,
        Property::Left,
        Property::Transform,
        Property::ZIndex,
        Property::Width,
        Property::Height,
        Property::Padding,
        Property::PaddingTop,
        Property::PaddingRight,
        Property::PaddingBottom,
        Property::PaddingLeft,
        Property::Margin,
        Property::Background,
        Property::BackgroundColor,
        Property::Color,
        Property::Border,
        Property::BorderRadius,
        Property::BoxShadow,
        Property::Filter,
        Property::BackdropFilter,
        Property::Opacity,
        Property::FontSize,
        Property::FontFamily,
        Property::FontWeight,
        Property::LineHeight,
        Property::LetterSpacing,
        Property::TextAlign,
    ];

    /// camelCase name, as used in rules and inline style objects.
    pub fn name(self) -> &'static str {
        match self {
            Property::Display => "display",
            Property::FlexDirection => "flexDirection",
            Property::Gap => "gap",
            Property::AlignItems => "alignItems",
            Property::JustifyContent => "justifyContent",
            Property::Position => "position",
            Property::Top => "top",
            Property::Right => "right",
            Property::Bottom => "bottom",
            Property::Left => "left",
            Property::Transform => "transform",
            Property::ZIndex => "zIndex",
            Property::Width => "width",
            Property::Height => "height",
            Property::Padding => "padding",
            Property::PaddingTop => "paddingTop",
            Property::PaddingRight => "paddingRight",
            Property::PaddingBottom => "paddingBottom",
            Property::PaddingLeft => "paddingLeft",
            Property::Margin => "margin",
            Property::Background => "background",
            Property::BackgroundColor => "backgroundColor",
            Property::Color => "color",
            Property::Border => "border",
            Property::BorderRadius => "borderRadius",
            Property::BoxShadow => "boxShadow",
            Property::Filter => "filter",
            Property::BackdropFilter => "backdropFilter",
            Property::Opacity => "opacity",
            Property::FontSize => "fontSize",
            Property::FontFamily => "fontFamily",
            Property::FontWeight => "fontWeight",
            Property::LineHeight => "lineHeight",
            Property::LetterSpacing => "letterSpacing",
            Property::TextAlign => "textAlign",
        }
    }

    pub fn from_name(name: &str) -> Option<Property> {
        Property::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A style value: a number (unitless, e.g. `zIndex`) or a CSS string.
///
/// Whole numbers serialize as JSON integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }
}

impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            StyleValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => f.write_str(&format_number(*n)),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<usize> for StyleValue {
    fn from(value: usize) -> Self {
        StyleValue::Number(value as f64)
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $css:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $css),+
                }
            }

            pub fn from_css(value: &str) -> Option<Self> {
                match value {
                    $($css => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for StyleValue {
            fn from(value: $name) -> Self {
                StyleValue::Text(value.as_str().to_string())
            }
        }
    };
}

keyword_enum!(
    /// `display` keywords.
    Display {
        Flex => "flex",
        Block => "block",
        Inline => "inline",
        InlineBlock => "inline-block",
        Grid => "grid",
        None => "none",
    }
);

keyword_enum!(
    /// `flexDirection` keywords.
    FlexDirection {
        Row => "row",
        Column => "column",
    }
);

keyword_enum!(
    /// `position` keywords.
    Position {
        Static => "static",
        Relative => "relative",
        Absolute => "absolute",
        Fixed => "fixed",
        Sticky => "sticky",
    }
);

/// Style properties of one IR node.
///
/// Absent key means the property does not apply; there is no "unset" value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap {
    known: BTreeMap<Property, StyleValue>,
    extensions: BTreeMap<String, StyleValue>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, property: Property) -> Option<&StyleValue> {
        self.known.get(&property)
    }

    pub fn contains(&self, property: Property) -> bool {
        self.known.contains_key(&property)
    }

    pub fn set(&mut self, property: Property, value: impl Into<StyleValue>) {
        self.known.insert(property, value.into());
    }

    /// Set unless already present. Returns whether the value was written.
    pub fn set_if_absent(&mut self, property: Property, value: impl Into<StyleValue>) -> bool {
        if self.known.contains_key(&property) {
            return false;
        }
        self.known.insert(property, value.into());
        true
    }

    /// Look a property up by camelCase name, known or extension.
    pub fn get_by_name(&self, name: &str) -> Option<&StyleValue> {
        match Property::from_name(name) {
            Some(property) => self.known.get(&property),
            None => self.extensions.get(name),
        }
    }

    /// First-writer-wins insert by camelCase name.
    pub fn set_by_name_if_absent(&mut self, name: &str, value: impl Into<StyleValue>) -> bool {
        match Property::from_name(name) {
            Some(property) => self.set_if_absent(property, value),
            None => {
                if self.extensions.contains_key(name) {
                    return false;
                }
                self.extensions.insert(name.to_string(), value.into());
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.extensions.is_empty()
    }

    /// Known properties in declaration order.
    pub fn known(&self) -> impl Iterator<Item = (Property, &StyleValue)> {
        self.known.iter().map(|(p, v)| (*p, v))
    }

    /// Extension properties in name order.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.extensions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All properties by camelCase name: known first, then extensions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.known
            .iter()
            .map(|(p, v)| (p.name(), v))
            .chain(self.extensions())
    }

    fn keyword<T>(&self, property: Property, parse: fn(&str) -> Option<T>) -> Option<T> {
        self.get(property).and_then(StyleValue::as_str).and_then(parse)
    }

    pub fn display(&self) -> Option<Display> {
        self.keyword(Property::Display, Display::from_css)
    }

    pub fn flex_direction(&self) -> Option<FlexDirection> {
        self.keyword(Property::FlexDirection, FlexDirection::from_css)
    }

    pub fn position(&self) -> Option<Position> {
        self.keyword(Property::Position, Position::from_css)
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
