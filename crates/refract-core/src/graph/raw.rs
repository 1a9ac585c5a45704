//! Serde model of the introspection engine's JSON output
//!
//! These structs mirror the wire shape exactly; the builder converts
//! them into the arena model. Every field is optional because the engine
//! emits a different subset per node kind.

use serde::Deserialize;
use serde::Deserializer;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub kind: Option<u32>,
    #[serde(rename = "type")]
    pub ty: Option<RawType>,
    #[serde(default)]
    pub children: Vec<RawNode>,
    #[serde(default)]
    pub groups: Vec<RawGroup>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
    pub comment: Option<RawComment>,
    pub flags: Option<RawFlags>,
    #[serde(default)]
    pub signatures: Vec<RawNode>,
    // Older engine versions emit a single object, newer ones an array.
    #[serde(default, deserialize_with = "one_or_many")]
    pub get_signature: Vec<RawNode>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub set_signature: Vec<RawNode>,
    pub index_signature: Option<Box<RawNode>>,
    #[serde(default)]
    pub parameters: Vec<RawNode>,
    #[serde(default)]
    pub type_parameter: Vec<RawNode>,
    pub default_value: Option<String>,
    #[serde(default)]
    pub extended_types: Vec<RawType>,
    #[serde(default)]
    pub implemented_types: Vec<RawType>,
    #[serde(default)]
    pub extended_by: Vec<RawType>,
    #[serde(default)]
    pub implemented_by: Vec<RawType>,
    pub inherited_from: Option<RawType>,
    /// Target id of a reference-kind node
    pub target: Option<u64>,
    #[serde(default)]
    pub sources: Vec<RawSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawType {
    #[serde(rename = "type")]
    pub tag: Option<String>,
    pub id: Option<u64>,
    pub name: Option<String>,
    pub element_type: Option<Box<RawType>>,
    pub element: Option<Box<RawType>>,
    pub object_type: Option<Box<RawType>>,
    pub index_type: Option<Box<RawType>>,
    #[serde(default)]
    pub type_arguments: Vec<RawType>,
    #[serde(default)]
    pub types: Vec<RawType>,
    pub declaration: Option<Box<RawNode>>,
    pub operator: Option<String>,
    pub target: Option<Box<RawType>>,
    pub target_type: Option<Box<RawType>>,
    pub query_type: Option<Box<RawType>>,
    pub constraint: Option<Box<RawType>>,
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub elements: Vec<RawType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    #[serde(default)]
    pub kind: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<u64>,
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub children: Vec<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    pub short_text: Option<String>,
    pub text: Option<String>,
    pub returns: Option<String>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTag {
    #[serde(default)]
    pub tag: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlags {
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_protected: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_external: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default)]
    pub is_rest: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSource {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub character: u32,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<RawNode>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Box<RawNode>),
        Many(Vec<RawNode>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(node) => vec![*node],
        OneOrMany::Many(nodes) => nodes,
    })
}
