//! Invalid-reference policy dispatch

use crate::error::{GatherError, GatherResult};
use fg_core::InvalidReferencePolicy;
use serde_json::Value;

/// A foreign-key value whose referenced row is not in the collection.
#[derive(Debug)]
pub(crate) struct MissingReference<'a> {
    pub table: &'a str,
    pub id: i64,
    pub edge: &'a str,
    pub referenced_table: &'a str,
    /// Raw foreign-key value, as stored in the row
    pub referenced_value: &'a Value,
}

/// What the reconstructor does with a missing reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Abandon the model being rebuilt and every ancestor of it
    DropModel,
    /// Put null in the edge's slot and carry on
    FillNull,
}

pub(crate) fn resolve(
    policy: InvalidReferencePolicy,
    missing: &MissingReference<'_>,
) -> GatherResult<Resolution> {
    match policy {
        InvalidReferencePolicy::Omit | InvalidReferencePolicy::Null => {
            log::warn!(
                "Dropping '{}' id {}: edge '{}' references missing '{}' key {}",
                missing.table,
                missing.id,
                missing.edge,
                missing.referenced_table,
                missing.referenced_value
            );
            Ok(Resolution::DropModel)
        }
        InvalidReferencePolicy::Keep => {
            log::warn!(
                "Keeping '{}' id {} with null '{}': referenced '{}' key {} is missing",
                missing.table,
                missing.id,
                missing.edge,
                missing.referenced_table,
                missing.referenced_value
            );
            Ok(Resolution::FillNull)
        }
        InvalidReferencePolicy::Throw => Err(GatherError::MissingReferencedRow {
            table: missing.table.to_string(),
            id: missing.id,
            edge: missing.edge.to_string(),
            referenced_table: missing.referenced_table.to_string(),
            referenced_value: missing.referenced_value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing(referenced_value: &Value) -> MissingReference<'_> {
        MissingReference {
            table: "user",
            id: 7,
            edge: "avatar_img",
            referenced_table: "media_item",
            referenced_value,
        }
    }

    #[test]
    fn test_omit_and_null_drop() {
        assert_eq!(
            resolve(InvalidReferencePolicy::Omit, &missing(&json!(999))).unwrap(),
            Resolution::DropModel
        );
        assert_eq!(
            resolve(InvalidReferencePolicy::Null, &missing(&json!(999))).unwrap(),
            Resolution::DropModel
        );
    }

    #[test]
    fn test_keep_fills_null() {
        assert_eq!(
            resolve(InvalidReferencePolicy::Keep, &missing(&json!(999))).unwrap(),
            Resolution::FillNull
        );
    }

    #[test]
    fn test_throw_names_the_reference() {
        let err = resolve(InvalidReferencePolicy::Throw, &missing(&json!(999))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("G002"));
        assert!(message.contains("'user'"));
        assert!(message.contains("id 7"));
        assert!(message.contains("'avatar_img'"));
        assert!(message.contains("999"));
    }

    #[test]
    fn test_throw_carries_fractional_value() {
        let err = resolve(InvalidReferencePolicy::Throw, &missing(&json!(1.5))).unwrap_err();
        assert!(matches!(
            err,
            GatherError::MissingReferencedRow { ref referenced_value, .. } if referenced_value == "1.5"
        ));
    }
}
