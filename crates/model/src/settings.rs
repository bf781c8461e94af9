use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Options that tune how a model produces a response.
///
/// Every field is independently optional. An unset field means "no
/// preference", and the provider is expected to apply its own default.
///
/// Settings come from two places: the agent definition carries a fixed
/// bundle, and each run may supply another one to override it. Use
/// [`ModelSettings::resolve`] to get the effective bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus-sampling threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Penalizes tokens by how often they already appeared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    /// Penalizes tokens that already appeared at least once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    /// How the model should pick tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Whether the model may request several tool calls in one turn,
    /// and whether they are executed concurrently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    /// The truncation strategy for long inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,
    /// Maximum number of output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Whether the provider should store the generated response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    /// Whether the provider should report token usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_usage: Option<bool>,
    /// Arbitrary tags attached to the request.
    ///
    /// The map is treated as a single value: an override replaces it
    /// entirely instead of merging keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl ModelSettings {
    /// Merges `overrides` on top of `self`, returning a new bundle.
    ///
    /// For every field, the value from `overrides` wins if it is set,
    /// otherwise the value from `self` is kept. Fields unset in both
    /// stay unset.
    pub fn resolve(&self, overrides: &ModelSettings) -> ModelSettings {
        // Destructure so that a new field can't be forgotten here.
        let ModelSettings {
            temperature,
            top_p,
            frequency_penalty,
            presence_penalty,
            tool_choice,
            parallel_tool_calls,
            truncation,
            max_tokens,
            store,
            include_usage,
            metadata,
        } = overrides.clone();

        ModelSettings {
            temperature: temperature.or(self.temperature),
            top_p: top_p.or(self.top_p),
            frequency_penalty: frequency_penalty.or(self.frequency_penalty),
            presence_penalty: presence_penalty.or(self.presence_penalty),
            tool_choice: tool_choice.or_else(|| self.tool_choice.clone()),
            parallel_tool_calls: parallel_tool_calls
                .or(self.parallel_tool_calls),
            truncation: truncation.or(self.truncation),
            max_tokens: max_tokens.or(self.max_tokens),
            store: store.or(self.store),
            include_usage: include_usage.or(self.include_usage),
            metadata: metadata.or_else(|| self.metadata.clone()),
        }
    }

    /// Returns `true` if no field is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == ModelSettings::default()
    }
}

/// Controls whether and which tools the model calls.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolChoice {
    /// The model decides.
    Auto,
    /// The model must call at least one tool.
    Required,
    /// The model must not call any tool. Tool definitions are still sent.
    None,
    /// The model must call the tool with this name.
    Named(String),
}

impl ToolChoice {
    /// Returns `true` if this choice forces the model to call a tool.
    #[inline]
    pub fn is_forced(&self) -> bool {
        matches!(self, ToolChoice::Required | ToolChoice::Named(_))
    }
}

impl From<String> for ToolChoice {
    fn from(value: String) -> Self {
        match value.as_str() {
            "auto" => ToolChoice::Auto,
            "required" => ToolChoice::Required,
            "none" => ToolChoice::None,
            _ => ToolChoice::Named(value),
        }
    }
}

impl From<&str> for ToolChoice {
    #[inline]
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<ToolChoice> for String {
    fn from(value: ToolChoice) -> Self {
        match value {
            ToolChoice::Auto => "auto".to_owned(),
            ToolChoice::Required => "required".to_owned(),
            ToolChoice::None => "none".to_owned(),
            ToolChoice::Named(name) => name,
        }
    }
}

impl Display for ToolChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ToolChoice::Auto => f.write_str("auto"),
            ToolChoice::Required => f.write_str("required"),
            ToolChoice::None => f.write_str("none"),
            ToolChoice::Named(name) => f.write_str(name),
        }
    }
}

/// How the provider handles inputs exceeding the context window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Truncation {
    /// Drop items from the middle of the conversation.
    Auto,
    /// Fail the request instead.
    Disabled,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_settings() -> ModelSettings {
        ModelSettings {
            temperature: Some(0.7),
            top_p: Some(0.9),
            frequency_penalty: Some(0.8),
            presence_penalty: Some(0.3),
            tool_choice: Some(ToolChoice::Auto),
            parallel_tool_calls: Some(true),
            truncation: Some(Truncation::Auto),
            max_tokens: Some(1000),
            store: Some(false),
            include_usage: Some(true),
            metadata: Some(BTreeMap::from([(
                "team".to_owned(),
                "marketing".to_owned(),
            )])),
        }
    }

    #[test]
    fn test_override_takes_precedence() {
        let base = ModelSettings {
            temperature: Some(0.2),
            ..Default::default()
        };
        let overrides = ModelSettings {
            temperature: Some(1.5),
            top_p: Some(0.5),
            ..Default::default()
        };
        let resolved = base.resolve(&overrides);
        assert_eq!(
            resolved,
            ModelSettings {
                temperature: Some(1.5),
                top_p: Some(0.5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_base_kept_when_override_unset() {
        let base = ModelSettings {
            tool_choice: Some(ToolChoice::None),
            ..Default::default()
        };
        let resolved = base.resolve(&ModelSettings::default());
        assert_eq!(resolved, base);
    }

    #[test]
    fn test_both_empty() {
        let resolved =
            ModelSettings::default().resolve(&ModelSettings::default());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_every_field_overridden() {
        let base = full_settings();
        let overrides = ModelSettings {
            temperature: Some(1.1),
            top_p: Some(0.1),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(1.0),
            tool_choice: Some(ToolChoice::Named("simple_tool".to_owned())),
            parallel_tool_calls: Some(false),
            truncation: Some(Truncation::Disabled),
            max_tokens: Some(10),
            store: Some(true),
            include_usage: Some(false),
            metadata: Some(BTreeMap::new()),
        };
        assert_eq!(base.resolve(&overrides), overrides);
        assert_eq!(ModelSettings::default().resolve(&base), base);
        assert_eq!(base.resolve(&ModelSettings::default()), base);
    }

    #[test]
    fn test_metadata_is_replaced_whole() {
        let base = full_settings();
        let overrides = ModelSettings {
            metadata: Some(BTreeMap::from([(
                "run".to_owned(),
                "42".to_owned(),
            )])),
            ..Default::default()
        };
        let metadata = base.resolve(&overrides).metadata.unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["run"], "42");
    }

    #[test]
    fn test_idempotent() {
        let base = ModelSettings {
            temperature: Some(0.2),
            max_tokens: Some(1000),
            tool_choice: Some(ToolChoice::None),
            ..Default::default()
        };
        let overrides = ModelSettings {
            tool_choice: Some(ToolChoice::Required),
            temperature: Some(1.5),
            top_p: Some(0.5),
            ..Default::default()
        };
        let once = base.resolve(&overrides);
        assert_eq!(once.resolve(&overrides), once);
        assert_eq!(
            once,
            ModelSettings {
                tool_choice: Some(ToolChoice::Required),
                temperature: Some(1.5),
                top_p: Some(0.5),
                max_tokens: Some(1000),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_tool_choice_strings() {
        for (s, choice) in [
            ("auto", ToolChoice::Auto),
            ("required", ToolChoice::Required),
            ("none", ToolChoice::None),
            ("get_weather", ToolChoice::Named("get_weather".to_owned())),
        ] {
            assert_eq!(ToolChoice::from(s), choice);
            assert_eq!(choice.to_string(), s);
        }
        assert!(ToolChoice::Required.is_forced());
        assert!(ToolChoice::from("get_weather").is_forced());
        assert!(!ToolChoice::Auto.is_forced());
        assert!(!ToolChoice::None.is_forced());
    }

    #[test]
    fn test_serialize_skips_unset() {
        let settings = ModelSettings {
            tool_choice: Some(ToolChoice::Required),
            truncation: Some(Truncation::Disabled),
            max_tokens: Some(1000),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "tool_choice": "required",
                "truncation": "disabled",
                "max_tokens": 1000
            })
        );
        assert_eq!(
            serde_json::to_value(ModelSettings::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_deserialize() {
        let settings: ModelSettings = serde_json::from_value(json!({
            "temperature": 1.5,
            "tool_choice": "simple_tool"
        }))
        .unwrap();
        assert_eq!(settings.temperature, Some(1.5));
        assert_eq!(
            settings.tool_choice,
            Some(ToolChoice::Named("simple_tool".to_owned()))
        );
        assert_eq!(settings.top_p, None);

        let settings: ModelSettings = toml::from_str(
            r#"
top_p = 0.5
parallel_tool_calls = false

[metadata]
owner = "docs"
"#,
        )
        .unwrap();
        assert_eq!(settings.top_p, Some(0.5));
        assert_eq!(settings.parallel_tool_calls, Some(false));
        assert_eq!(settings.metadata.unwrap()["owner"], "docs");

        let err = serde_json::from_value::<ModelSettings>(json!({
            "temprature": 0.2
        }));
        assert!(err.is_err());
    }
}
