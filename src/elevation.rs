use serde_json::{Value, json};

use crate::context::{FieldSets, last_segment};

/// Wrap `condition` on `field` in an "any element matches" quantifier when
/// the field is an array of sub-documents; return it unchanged otherwise.
///
/// The condition must already address the field through its per-element
/// alias (`$$<last segment>`). This only wraps, it never rewrites references.
/// Both `$isArray` guards make a missing or scalar field evaluate to false
/// instead of raising a type error in `$map`.
pub fn elevate(field: &str, condition: Value, fields: &FieldSets) -> Value {
    if !fields.is_array_of_documents(field) {
        return condition;
    }

    tracing::debug!(field, "elevating condition over array of documents");

    let root_ref = format!("${}", field);
    json!({
        "$and": [
            { "$isArray": root_ref },
            {
                "$anyElementTrue": {
                    "$map": {
                        "input": {
                            "$cond": {
                                "if": { "$isArray": root_ref },
                                "then": root_ref,
                                "else": []
                            }
                        },
                        "as": last_segment(field),
                        "in": {
                            "$cond": {
                                "if": condition,
                                "then": true,
                                "else": false
                            }
                        }
                    }
                }
            }
        ]
    })
}
