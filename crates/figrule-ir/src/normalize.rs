//! Source tree → IR normalizer.
//!
//! Each `apply_*` pass writes its own subset of properties. Positioning runs
//! after the style passes because it reads whatever they left in `position`
//! and `transform`; rotation appends to the positioning transform.
//!
//! ```text
//! SourceNode ─┬─ invisible ──────────────→ None
//!             └─ visible → IrNode { styles, children (groups spliced) }
//! ```

use crate::context::TransformContext;
use crate::css::{color_to_css, format_number, px, DEFAULT_SHADOW_COLOR};
use crate::node::{IrNode, NodeKind};
use crate::style::{Display, FlexDirection, Position, Property, PropertyMap};
use figrule_source::tokens::resolve_token;
use figrule_source::{
    AxisAlign, Constraint, EffectType, LayoutMode, Paint, PaintType, SourceNode, SourceNodeType,
    TextAlignHorizontal,
};

/// Normalize a source tree. Returns `None` iff the root is invisible.
///
/// Z-index is not assigned here; run [`crate::assign_stacking_order`]
/// afterwards.
pub fn normalize<'a>(node: &'a SourceNode, ctx: &mut TransformContext<'_>) -> Option<IrNode<'a>> {
    normalize_in_scope(node, None, ctx)
}

fn normalize_in_scope<'a>(
    node: &'a SourceNode,
    scope: Option<&str>,
    ctx: &mut TransformContext<'_>,
) -> Option<IrNode<'a>> {
    if !node.is_visible() {
        tracing::debug!(id = %node.id, name = %node.name, "pruning invisible subtree");
        return None;
    }

    let name = ctx.names.unique_name(scope, &node.name);
    let kind = node_kind(node.node_type);

    let mut styles = PropertyMap::new();
    apply_layout(node, &mut styles);
    apply_alignment(node, &mut styles);
    apply_fills(node, ctx, &mut styles);
    apply_strokes(node, ctx, &mut styles);
    apply_corner_radius(node, &mut styles);
    apply_effects(node, &mut styles);
    apply_text(node, &mut styles);
    apply_padding(node, &mut styles);
    apply_dimensions(node, &mut styles);

    let children = normalize_children(node, &node.id, ctx);
    apply_positioning(node, kind, !children.is_empty(), &mut styles);
    apply_rotation(node, &mut styles);

    Some(IrNode {
        id: node.id.clone(),
        name,
        kind,
        styles,
        children,
        source: node,
    })
}

/// Normalize the visible children of `parent`. Group children are never
/// materialized: their own children are spliced in their place, named in
/// the scope of the node that actually receives them.
fn normalize_children<'a>(
    parent: &'a SourceNode,
    scope: &str,
    ctx: &mut TransformContext<'_>,
) -> Vec<IrNode<'a>> {
    let mut children = Vec::with_capacity(parent.children.len());
    for child in &parent.children {
        if child.node_type == SourceNodeType::Group {
            if !child.is_visible() {
                tracing::debug!(id = %child.id, "pruning invisible group");
                continue;
            }
            children.extend(normalize_children(child, scope, ctx));
        } else if let Some(ir) = normalize_in_scope(child, Some(scope), ctx) {
            children.push(ir);
        }
    }
    children
}

/// Map the design tool's node type onto an IR kind. Unknown types fall back
/// to `container`.
pub fn node_kind(node_type: SourceNodeType) -> NodeKind {
    match node_type {
        SourceNodeType::Text => NodeKind::Text,
        SourceNodeType::Rectangle | SourceNodeType::Ellipse | SourceNodeType::Vector => {
            NodeKind::Image
        }
        SourceNodeType::Group => NodeKind::Group,
        SourceNodeType::Frame
        | SourceNodeType::Component
        | SourceNodeType::Instance
        | SourceNodeType::Other => NodeKind::Container,
    }
}

/// Auto-layout → `display:flex`, direction and `gap`.
pub fn apply_layout(node: &SourceNode, styles: &mut PropertyMap) {
    let direction = match node.auto_layout() {
        Some(LayoutMode::Horizontal) => FlexDirection::Row,
        Some(LayoutMode::Vertical) => FlexDirection::Column,
        Some(LayoutMode::None) | None => return,
    };
    styles.set(Property::Display, Display::Flex);
    styles.set(Property::FlexDirection, direction);
    if let Some(spacing) = node.item_spacing {
        styles.set(Property::Gap, px(spacing));
    }
}

fn flex_alignment(align: AxisAlign) -> Option<&'static str> {
    match align {
        AxisAlign::Min => Some("flex-start"),
        AxisAlign::Center => Some("center"),
        AxisAlign::Max => Some("flex-end"),
        AxisAlign::SpaceBetween => Some("space-between"),
        AxisAlign::Baseline => Some("baseline"),
        AxisAlign::Other => None,
    }
}

/// Auto-layout axis alignment → `justifyContent` (primary) and `alignItems`
/// (counter). Ignored without auto-layout.
pub fn apply_alignment(node: &SourceNode, styles: &mut PropertyMap) {
    if node.auto_layout().is_none() {
        return;
    }
    if let Some(value) = node.primary_axis_align_items.and_then(flex_alignment) {
        styles.set(Property::JustifyContent, value);
    }
    if let Some(value) = node.counter_axis_align_items.and_then(flex_alignment) {
        styles.set(Property::AlignItems, value);
    }
}

fn first_solid(paints: &[Paint]) -> Option<&Paint> {
    paints
        .iter()
        .find(|p| p.paint_type == PaintType::Solid && p.is_visible())
}

fn paint_to_css(paint: &Paint, ctx: &TransformContext<'_>) -> Option<String> {
    let color = paint.color.as_ref()?;
    let literal = color_to_css(color, paint.opacity.unwrap_or(1.0));
    Some(match paint.color_token() {
        Some(token) => resolve_token(ctx.tokens, token, &literal),
        None => literal,
    })
}

/// First solid fill → `background`, or `color` on text nodes.
pub fn apply_fills(node: &SourceNode, ctx: &TransformContext<'_>, styles: &mut PropertyMap) {
    if let Some(color) = first_solid(&node.fills).and_then(|p| paint_to_css(p, ctx)) {
        let property = if node.node_type == SourceNodeType::Text {
            Property::Color
        } else {
            Property::Background
        };
        styles.set(property, color);
    }
}

/// First solid stroke → `border`. Width is always 1px; stroke weight is not
/// read from the source.
pub fn apply_strokes(node: &SourceNode, ctx: &TransformContext<'_>, styles: &mut PropertyMap) {
    if let Some(color) = first_solid(&node.strokes).and_then(|p| paint_to_css(p, ctx)) {
        styles.set(Property::Border, format!("1px solid {color}"));
    }
}

/// Uniform `cornerRadius`, or per-corner radii collapsed to one value when
/// all four agree.
pub fn apply_corner_radius(node: &SourceNode, styles: &mut PropertyMap) {
    if let Some([tl, tr, br, bl]) = node.rectangle_corner_radii {
        if tl == tr && tr == br && br == bl {
            if tl > 0.0 {
                styles.set(Property::BorderRadius, px(tl));
            }
        } else {
            styles.set(
                Property::BorderRadius,
                format!("{} {} {} {}", px(tl), px(tr), px(br), px(bl)),
            );
        }
        return;
    }
    if let Some(radius) = node.corner_radius.filter(|r| *r > 0.0) {
        styles.set(Property::BorderRadius, px(radius));
    }
}

/// Drop shadows → `boxShadow`, layer blur → `filter`, background blur →
/// `backdropFilter`. Hidden effects are skipped.
pub fn apply_effects(node: &SourceNode, styles: &mut PropertyMap) {
    let visible = || node.effects.iter().filter(|effect| effect.is_visible());

    let blur = |effect_type: EffectType| {
        visible()
            .find(|effect| effect.effect_type == effect_type)
            .and_then(|effect| effect.radius)
            .filter(|radius| *radius > 0.0)
            .map(|radius| format!("blur({})", px(radius)))
    };
    if let Some(filter) = blur(EffectType::LayerBlur) {
        styles.set(Property::Filter, filter);
    }
    if let Some(filter) = blur(EffectType::BackgroundBlur) {
        styles.set(Property::BackdropFilter, filter);
    }

    let shadows: Vec<String> = visible()
        .filter(|effect| effect.effect_type == EffectType::DropShadow)
        .map(|shadow| {
            let (x, y) = shadow.offset.map_or((0.0, 0.0), |o| (o.x, o.y));
            let blur = shadow.radius.unwrap_or(0.0);
            let color = shadow
                .color
                .as_ref()
                .map_or_else(|| DEFAULT_SHADOW_COLOR.to_string(), |c| color_to_css(c, 1.0));
            format!(
                "{}px {}px {}px {color}",
                format_number(x),
                format_number(y),
                format_number(blur)
            )
        })
        .collect();

    if !shadows.is_empty() {
        styles.set(Property::BoxShadow, shadows.join(", "));
    }
}

/// Typography, for text nodes only.
pub fn apply_text(node: &SourceNode, styles: &mut PropertyMap) {
    if node.node_type != SourceNodeType::Text {
        return;
    }
    if let Some(size) = node.font_size() {
        styles.set(Property::FontSize, px(size));
    }
    if let Some(family) = node.font_family() {
        styles.set(Property::FontFamily, format!("'{family}', sans-serif"));
    }
    if let Some(weight) = node.font_weight() {
        styles.set(Property::FontWeight, weight);
    }

    let Some(style) = node.style.as_ref() else {
        return;
    };
    // Percent line height is emitted unitless so it scales with the font.
    if let Some(percent) = style.line_height_percent_font_size.filter(|p| *p > 0.0) {
        styles.set(Property::LineHeight, format!("{:.2}", percent / 100.0));
    } else if let Some(height) = style.line_height_px.filter(|h| *h > 0.0) {
        styles.set(Property::LineHeight, px(height));
    }
    if let Some(spacing) = style.letter_spacing.filter(|s| *s != 0.0) {
        styles.set(Property::LetterSpacing, px(spacing));
    }
    if let Some(align) = style.text_align_horizontal {
        let align = match align {
            TextAlignHorizontal::Center => "center",
            TextAlignHorizontal::Right => "right",
            TextAlignHorizontal::Justified => "justify",
            TextAlignHorizontal::Left | TextAlignHorizontal::Other => "left",
        };
        styles.set(Property::TextAlign, align);
    }
}

/// Collapse the four edges into CSS shorthand (top right bottom left).
pub fn apply_padding(node: &SourceNode, styles: &mut PropertyMap) {
    let edges = [
        node.padding_top,
        node.padding_right,
        node.padding_bottom,
        node.padding_left,
    ];
    if edges.iter().all(Option::is_none) {
        return;
    }
    let [top, right, bottom, left] = edges.map(|edge| edge.unwrap_or(0.0));

    let shorthand = if top == right && right == bottom && bottom == left {
        px(top)
    } else if top == bottom && right == left {
        format!("{} {}", px(top), px(right))
    } else {
        format!("{} {} {} {}", px(top), px(right), px(bottom), px(left))
    };
    styles.set(Property::Padding, shorthand);
}

/// Bounding box → `width`/`height`.
pub fn apply_dimensions(node: &SourceNode, styles: &mut PropertyMap) {
    if let Some(bbox) = node.absolute_bounding_box {
        styles.set(Property::Width, px(bbox.width));
        styles.set(Property::Height, px(bbox.height));
    }
}

fn push_transform(styles: &mut PropertyMap, term: &str) {
    let transform = match styles.get(Property::Transform) {
        Some(existing) => format!("{existing} {term}"),
        None => term.to_string(),
    };
    styles.set(Property::Transform, transform);
}

/// Center constraints → absolute centering; groups and freeform containers
/// become positioning contexts. `has_children` counts the normalized
/// children, so a frame whose children were all pruned stays static.
pub fn apply_positioning(
    node: &SourceNode,
    kind: NodeKind,
    has_children: bool,
    styles: &mut PropertyMap,
) {
    if let Some(constraints) = node.constraints {
        let center_x = constraints.horizontal == Constraint::Center;
        let center_y = constraints.vertical == Constraint::Center;
        if center_x || center_y {
            styles.set(Property::Position, Position::Absolute);
        }
        if center_x {
            styles.set(Property::Left, "50%");
            push_transform(styles, "translateX(-50%)");
        }
        if center_y {
            styles.set(Property::Top, "50%");
            push_transform(styles, "translateY(-50%)");
        }
    }

    let freeform_container =
        kind == NodeKind::Container && node.auto_layout().is_none() && has_children;
    if kind == NodeKind::Group || freeform_container {
        styles.set_if_absent(Property::Position, Position::Relative);
    }
}

/// Rotation in radians → `rotate(Ndeg)`, rounded to two decimals and
/// appended to any positioning transform.
pub fn apply_rotation(node: &SourceNode, styles: &mut PropertyMap) {
    let Some(radians) = node.rotation else {
        return;
    };
    let degrees = (radians.to_degrees() * 100.0).round() / 100.0;
    if degrees != 0.0 {
        push_transform(styles, &format!("rotate({}deg)", format_number(degrees)));
    }
}
