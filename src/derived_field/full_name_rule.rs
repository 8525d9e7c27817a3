use crate::derived_field::config::{validate_rule_fields, RuleConfig};
use crate::derived_field::error::CreateUpdaterError;
use crate::derived_field::metrics::RuleMetrics;
use crate::derived_field::{CompiledRule, DerivedValue};
use crate::observability::labels::Labels;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;
use std::sync::Arc;

const TYPE: &str = "type";

fn default_separator() -> String {
    " ".to_string()
}

/// Keeps `target` equal to the non-blank `sources` joined by `separator`, in order.
///
/// A part holding only whitespace counts as blank and is left out, so `" "` never
/// produces a doubled separator. The DIAN form only drops empty parts.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FullNameRuleConfig {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub sources: Vec<String>,

    pub target: String,

    #[serde(default = "default_separator")]
    pub separator: String,
}

impl FullNameRuleConfig {
    pub fn new<S: AsRef<str>>(sources: &[S], target: &str) -> Self {
        Self {
            sources: sources.iter().map(|s| s.as_ref().to_owned()).collect(),
            target: target.to_owned(),
            separator: default_separator(),
        }
    }

    pub fn sources<S: AsRef<str>>(&self, sources: &[S]) -> Self {
        let sources = sources.iter().map(|s| s.as_ref().to_owned()).collect();
        self.mutate_clone(|x| x.sources = sources)
    }

    pub fn target(&self, target: &str) -> Self {
        self.mutate_clone(|x| x.target = target.to_owned())
    }

    pub fn separator(&self, separator: &str) -> Self {
        self.mutate_clone(|x| x.separator = separator.to_owned())
    }

    pub fn build(&self) -> Arc<dyn RuleConfig> {
        Arc::new(self.clone())
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}

impl RuleConfig for FullNameRuleConfig {
    fn convert_to_compiled_rule(
        &self,
        rule_index: usize,
        labels: Labels,
    ) -> Result<Box<dyn CompiledRule>, CreateUpdaterError> {
        validate_rule_fields(rule_index, &self.sources, &self.target)?;

        Ok(Box::new(FullNameCompiledRule {
            sources: self.sources.clone(),
            target: self.target.clone(),
            separator: self.separator.clone(),
            metrics: RuleMetrics::new(&labels.clone_with_labels(&[(TYPE, "full_name")])),
        }))
    }
}

pub struct FullNameCompiledRule {
    sources: Vec<String>,
    target: String,
    separator: String,
    metrics: RuleMetrics,
}

impl CompiledRule for FullNameCompiledRule {
    fn source_fields(&self) -> &[String] {
        &self.sources
    }

    fn target_field(&self) -> &str {
        &self.target
    }

    fn derive_value(&self, record: &dyn Record) -> DerivedValue {
        self.metrics.recomputations.increment(1);

        let parts: Vec<_> = self
            .sources
            .iter()
            .filter_map(|source| record.field(source))
            // whitespace-only parts count as blank
            .filter(|part| !part.trim().is_empty())
            .collect();

        DerivedValue::Value(parts.join(self.separator.as_str()))
    }
}
