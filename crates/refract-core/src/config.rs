//! Run configuration for a rendering pass

use std::collections::HashMap;

use serde::Deserialize;

/// Options controlling one rendering run
///
/// Deserializable from a JSON configuration file; every field has a
/// neutral default so a missing config file means "render plainly".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Display name of the documented SDK, available to the document
    /// template
    pub sdk_name: String,
    /// Base URL prepended to `{@tutorial}` paths
    pub tutorial_path: String,
    /// Overrides consulted before the built-in external-symbol table
    pub external_references: HashMap<String, String>,
    /// Extra searchable keywords per word (`word -> synonyms`)
    pub keyword_synonyms: HashMap<String, Vec<String>>,
    /// Document template with `{{placeholder}}` substitution slots
    pub document_template: Option<String>,
    /// Restrict rendering to these modules; empty means all
    pub modules: Vec<String>,
}

impl RenderOptions {
    /// Prefix a tutorial path with the configured base URL
    pub fn tutorial_url(&self, path: &str) -> String {
        if self.tutorial_path.is_empty() {
            path.to_string()
        } else if self.tutorial_path.ends_with('/') {
            format!("{}{path}", self.tutorial_path)
        } else {
            format!("{}/{path}", self.tutorial_path)
        }
    }

    /// Expand a keyword through the synonym table
    pub fn synonyms_of(&self, word: &str) -> Vec<String> {
        let mut result = vec![word.to_string()];
        if let Some(extra) = self.keyword_synonyms.get(word) {
            result.extend(extra.iter().cloned());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_url_joins_with_slash() {
        let mut options = RenderOptions::default();
        assert_eq!(options.tutorial_url("intro"), "intro");
        options.tutorial_path = "https://example.com/tutorials".to_string();
        assert_eq!(options.tutorial_url("intro"), "https://example.com/tutorials/intro");
        options.tutorial_path = "https://example.com/tutorials/".to_string();
        assert_eq!(options.tutorial_url("intro"), "https://example.com/tutorials/intro");
    }

    #[test]
    fn parses_camel_case_config() {
        let options: RenderOptions = serde_json::from_str(
            r#"{
                "sdkName": "Widgets",
                "tutorialPath": "/guides",
                "externalReferences": { "Vec3": "https://example.com/vec3" },
                "keywordSynonyms": { "color": ["colour"] }
            }"#,
        )
        .unwrap();
        assert_eq!(options.sdk_name, "Widgets");
        assert_eq!(options.synonyms_of("color"), vec!["color", "colour"]);
        assert!(options.modules.is_empty());
    }
}
