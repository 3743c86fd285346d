use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One source's contribution to one attribute under one transformer type.
///
/// Within a bucket a transformer is identified by `source_id`; the
/// mechanics layer never stores two entries with the same source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    /// Who contributes: an owned item's ID, a status key, or a synthetic key.
    pub source_id: String,
    /// Signed contribution.
    pub magnitude: i32,
    /// Whether `source_id` names an owned item (used to resolve display names).
    pub source_is_entity: bool,
}

impl Transformer {
    /// Create a new transformer entry.
    pub fn new(source_id: impl Into<String>, magnitude: i32, source_is_entity: bool) -> Self {
        Self {
            source_id: source_id.into(),
            magnitude,
            source_is_entity,
        }
    }
}

/// The persisted form of an actor's transformers: type key → attribute key → entries.
///
/// Keys stay plain strings (`"poolMods"`, `"athletics"`, `"all"`, ...) so the
/// document format is independent of the typed keys used by the rules layer.
pub type PersistedTransformers = BTreeMap<String, BTreeMap<String, Vec<Transformer>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        let t = Transformer::new("status:bleeding", -1, false);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(
            json,
            r#"{"sourceId":"status:bleeding","magnitude":-1,"sourceIsEntity":false}"#
        );
    }

    #[test]
    fn persisted_layout_round_trips() {
        let mut doc = PersistedTransformers::new();
        doc.entry("poolMods".to_string())
            .or_default()
            .entry("athletics".to_string())
            .or_default()
            .push(Transformer::new("item-1", 2, true));

        let json = serde_json::to_string(&doc).unwrap();
        let back: PersistedTransformers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back["poolMods"]["athletics"][0].magnitude, 2);
    }
}
