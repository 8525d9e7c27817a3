use crate::observability::labels::Labels;
use metrics::{counter, Counter};

pub struct UpdaterMetrics {
    pub num_events: Counter,
    pub field_updates: Counter,
}

impl UpdaterMetrics {
    pub fn new(labels: &Labels) -> Self {
        UpdaterMetrics {
            num_events: counter!("derived_field.events", labels.clone()),
            field_updates: counter!("derived_field.field_updates", labels.clone()),
        }
    }
}

pub struct RuleMetrics {
    pub recomputations: Counter,
    pub invalid_identifiers: Counter,
}

impl RuleMetrics {
    pub fn new(labels: &Labels) -> Self {
        RuleMetrics {
            recomputations: counter!("derived_field.recomputations", labels.clone()),
            invalid_identifiers: counter!("derived_field.invalid_identifier", labels.clone()),
        }
    }
}
