use super::Catalog;
use crate::value::ValueType;
use serde::{Deserialize, Serialize};

/// Editor-facing description of a catalog.
///
/// Serializes as `{"nodeTypes": [{"type", "description", "inputs", "outputs"}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub node_types: Vec<PaletteNodeType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteNodeType {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub inputs: Vec<PaletteInput>,
    pub outputs: Vec<PaletteOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteInput {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteOutput {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl Palette {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let node_types = catalog
            .iter()
            .map(|node_type| PaletteNodeType {
                type_name: node_type.name().to_string(),
                description: node_type.description().to_string(),
                inputs: node_type
                    .parameters()
                    .iter()
                    .map(|p| PaletteInput {
                        name: p.name.clone(),
                        value_type: p.value_type,
                        default: p.default.as_ref().map(|v| v.to_json()),
                    })
                    .collect(),
                outputs: vec![PaletteOutput {
                    name: node_type.output_name().to_string(),
                    value_type: node_type.output_type(),
                }],
            })
            .collect();
        Self { node_types }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Every field is plain data; serialization into a `Value` cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
