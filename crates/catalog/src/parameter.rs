//! Physical parameter definitions.

/// A verified physical quantity and the dataset that is its ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    id: String,
    name: String,
    units: String,
    description: Option<String>,
    reference: String,
}

impl Parameter {
    /// Creates a parameter whose ground truth is the source `reference`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        units: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            units: units.into(),
            description: None,
            reference: reference.into(),
        }
    }

    /// Attach a free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the reference source.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Identifier used in paths and variable-name tables, e.g. `Temp`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name, e.g. `Temperature`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical units, e.g. `K`.
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Identifier of the reference source scored against.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}
