/// A single extracted value. `None` is the missing marker: the field's
/// pattern never matched.
pub type FieldValue = Option<String>;

/// Named field values for one element, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRecord {
    entries: Vec<(String, FieldValue)>,
}

impl ExtractedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field`, replacing any earlier value while keeping its position.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// The value recorded for `field`. Returns `None` both for unknown
    /// fields and for fields recorded as missing.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Merge the fields of `other` into this record column-wise.
    ///
    /// Returns the names that were already present; those keep their
    /// existing value.
    pub fn merge(&mut self, other: ExtractedRecord) -> Vec<String> {
        let mut collisions = Vec::new();
        for (name, value) in other.entries {
            if self.contains(&name) {
                collisions.push(name);
            } else {
                self.entries.push((name, value));
            }
        }
        collisions
    }
}
