//! Layer persistence documents.
//!
//! Layers serialize to a persistence-neutral document shape; the storage
//! backend is someone else's problem. Image and Spline children are excluded
//! from persistence: a layer carrying either does not serialize at all.

use crate::entities::{
    DrawOptions, Entity, EntityKind, FontStyle, RectEntity, RectSubtype, Rgba, Shadow, TextAlign,
    TextDecoration, TextEntity,
};
use crate::layer::{Layer, LayerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted form of one layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDocument {
    pub id: Option<LayerId>,
    pub kind: String,
    pub subtype: Option<String>,
    pub options: DrawOptions,
    pub children: Vec<ChildDocument>,
}

/// Persisted form of one child entity. `options` carries the kind-specific
/// payload as an embedded JSON value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDocument {
    pub kind: String,
    pub subtype: Option<String>,
    pub options: Value,
    pub min_dimension: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RectPayload {
    options: DrawOptions,
    fill: Rgba,
    shadow: Option<Shadow>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CirclePayload {
    options: DrawOptions,
    fill: Rgba,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextPayload {
    options: DrawOptions,
    color: Rgba,
    text: String,
    align: TextAlign,
    decoration: TextDecoration,
    font: String,
    font_size: f64,
    font_style: FontStyle,
}

/// Serialize a layer, or `None` when it contains an Image or Spline child.
///
/// Selection children are not persisted; deserialization regenerates one.
pub fn serialize_layer(layer: &Layer) -> Option<LayerDocument> {
    if layer
        .children()
        .iter()
        .any(|c| matches!(c.kind(), EntityKind::Image | EntityKind::Spline))
    {
        log::debug!("layer {:?} holds unpersistable children, skipping", layer.id);
        return None;
    }

    let mut children = Vec::new();
    for child in layer.children() {
        let document = match child {
            Entity::Rect(rect) => ChildDocument {
                kind: EntityKind::Rect.name().to_string(),
                subtype: match rect.subtype {
                    RectSubtype::Rect => None,
                    RectSubtype::TextArea => Some("TextArea".to_string()),
                },
                options: serde_json::to_value(RectPayload {
                    options: rect.options,
                    fill: rect.fill,
                    shadow: rect.shadow,
                })
                .ok()?,
                min_dimension: rect.min_dimension,
            },
            Entity::Circle(circle) => ChildDocument {
                kind: EntityKind::Circle.name().to_string(),
                subtype: None,
                options: serde_json::to_value(CirclePayload {
                    options: circle.options,
                    fill: circle.fill,
                })
                .ok()?,
                min_dimension: circle.min_dimension,
            },
            Entity::Text(text) => ChildDocument {
                kind: EntityKind::Text.name().to_string(),
                subtype: None,
                options: serde_json::to_value(TextPayload {
                    options: text.options,
                    color: text.color,
                    text: text.text().to_string(),
                    align: text.align(),
                    decoration: text.decoration(),
                    font: text.font().to_string(),
                    font_size: text.font_size(),
                    font_style: text.font_style(),
                })
                .ok()?,
                min_dimension: text.min_dimension,
            },
            // Selection frames are decoration; regenerated on load.
            Entity::Selection(_) => continue,
            Entity::Image(_) | Entity::Spline(_) => unreachable!("filtered above"),
        };
        children.push(document);
    }

    Some(LayerDocument {
        id: layer.id,
        kind: EntityKind::Layer.name().to_string(),
        subtype: None,
        options: layer.options,
        children,
    })
}

/// Rebuild a layer from a document. Only Rect and Text children are
/// reconstructed; unknown kinds or malformed payloads are skipped with a
/// warning rather than aborting the whole layer.
pub fn deserialize_layer(document: &LayerDocument) -> Layer {
    let mut layer = Layer::new(document.options, true);
    layer.id = document.id;

    for child in &document.children {
        match child.kind.as_str() {
            "Rect" => match serde_json::from_value::<RectPayload>(child.options.clone()) {
                Ok(payload) => {
                    layer.add_child(Entity::Rect(RectEntity {
                        options: payload.options,
                        min_dimension: child.min_dimension,
                        fill: payload.fill,
                        shadow: payload.shadow,
                        subtype: match child.subtype.as_deref() {
                            Some("TextArea") => RectSubtype::TextArea,
                            _ => RectSubtype::Rect,
                        },
                    }));
                }
                Err(err) => log::warn!("skipping malformed Rect child: {err}"),
            },
            "Text" => match serde_json::from_value::<TextPayload>(child.options.clone()) {
                Ok(payload) => {
                    layer.add_child(Entity::Text(TextEntity::from_parts(
                        payload.options,
                        child.min_dimension,
                        payload.color,
                        payload.text,
                        payload.align,
                        payload.decoration,
                        payload.font,
                        payload.font_size,
                        payload.font_style,
                    )));
                }
                Err(err) => log::warn!("skipping malformed Text child: {err}"),
            },
            other => log::warn!("skipping child of unknown kind {other:?}"),
        }
    }
    layer
}
