use std::collections::BTreeSet;

/// Field paths the caller knows to be array-valued and/or object-valued.
///
/// A path that is in both sets is an array of sub-documents. Conditions on it
/// are elevated into an "any element matches" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSets {
    pub array_fields: BTreeSet<String>,
    pub complex_fields: BTreeSet<String>,
}

impl FieldSets {
    pub fn new<A, C, S>(array_fields: A, complex_fields: C) -> Self
    where
        A: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSets {
            array_fields: array_fields.into_iter().map(Into::into).collect(),
            complex_fields: complex_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_array(&self, field: &str) -> bool {
        self.array_fields.contains(field)
    }

    pub fn is_complex(&self, field: &str) -> bool {
        self.complex_fields.contains(field)
    }

    /// Array of sub-documents: needs elevation.
    pub fn is_array_of_documents(&self, field: &str) -> bool {
        self.is_array(field) && self.is_complex(field)
    }
}

/// Translation state threaded through every recursive step.
///
/// The context is `Copy`. Extending it for a subtree produces a new value, so
/// nothing a call site adds can be seen by its siblings.
#[derive(Debug, Clone, Copy)]
pub struct TranslationContext<'a> {
    compared_field: Option<&'a str>,
    fields: &'a FieldSets,
}

impl<'a> TranslationContext<'a> {
    pub fn new(fields: &'a FieldSets) -> Self {
        TranslationContext {
            compared_field: None,
            fields,
        }
    }

    pub fn compared_field(&self) -> Option<&'a str> {
        self.compared_field
    }

    pub fn fields(&self) -> &'a FieldSets {
        self.fields
    }

    pub fn with_compared_field<'b>(&self, field: &'b str) -> TranslationContext<'b>
    where
        'a: 'b,
    {
        TranslationContext {
            compared_field: Some(field),
            fields: self.fields,
        }
    }

    /// Context for values that render raw (function arguments, list items,
    /// dict keys) rather than as conditions on the compared field.
    pub fn without_compared_field(&self) -> Self {
        TranslationContext {
            compared_field: None,
            fields: self.fields,
        }
    }

    /// Reference to `field` in the form valid at this point of the fragment.
    ///
    /// Array fields are iterated by the surrounding `$map`, so they are
    /// addressed through the per-element alias `$$<last segment>`. Everything
    /// else is addressed from the document root as `$<path>`.
    pub fn field_ref(&self, field: &str) -> String {
        if self.fields.is_array(field) {
            format!("$${}", last_segment(field))
        } else {
            format!("${}", field)
        }
    }
}

/// Last dotted segment of a field path (`"a.b.c"` -> `"c"`).
pub fn last_segment(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}
