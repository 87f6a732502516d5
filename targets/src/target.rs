//! Target model facade
//!
//! A target is always a (morphology, SED) pair. [`TargetModel`] parses both
//! halves up front and synthesizes them together; a failure in either half
//! fails the whole call.

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::TemplateSource;
use crate::error::TargetError;
use crate::morphology::{FieldRequest, MorphologyDescriptor, SpatialProduct};
use crate::sed::{SedDescriptor, SedProduct};

/// The raw descriptor as received, before either half is parsed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub morphology: Value,
    pub sed: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { target: TargetDescriptor },
    Bare(TargetDescriptor),
}

impl TargetDescriptor {
    /// Read `{"morphology": {...}, "sed": {...}}`, optionally wrapped in
    /// `{"target": {...}}`
    pub fn from_json(value: &Value) -> Result<Self, TargetError> {
        let descriptor = match Envelope::deserialize(value)? {
            Envelope::Wrapped { target } => target,
            Envelope::Bare(descriptor) => descriptor,
        };
        Ok(descriptor)
    }

    pub fn from_json_str(text: &str) -> Result<Self, TargetError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}

/// A parsed target ready for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct TargetModel {
    pub morphology: MorphologyDescriptor,
    pub sed: SedDescriptor,
}

/// Spatial and spectral products of one target
#[derive(Debug, Clone, PartialEq)]
pub struct SourceModel {
    pub spatial: SpatialProduct,
    pub sed: SedProduct,
}

impl TargetModel {
    pub fn new(morphology: MorphologyDescriptor, sed: SedDescriptor) -> Self {
        Self { morphology, sed }
    }

    pub fn from_descriptor(descriptor: &TargetDescriptor) -> Result<Self, TargetError> {
        let morphology = MorphologyDescriptor::from_json(&descriptor.morphology)?;
        let sed = SedDescriptor::from_json(&descriptor.sed)?;
        Ok(Self { morphology, sed })
    }

    pub fn from_json(value: &Value) -> Result<Self, TargetError> {
        Self::from_descriptor(&TargetDescriptor::from_json(value)?)
    }

    /// Synthesize the spatial and spectral products
    ///
    /// # Arguments
    ///
    /// * `request` - Sampling and call-time overrides for the morphology
    /// * `templates` - Source of catalog templates for the SED
    pub fn synthesize<S>(&self, request: &FieldRequest, templates: &S) -> Result<SourceModel, TargetError>
    where
        S: TemplateSource + ?Sized,
    {
        let spatial = self.morphology.synthesize(request)?;
        let sed = self.sed.synthesize(templates)?;
        info!(
            "Synthesized {} source with {} spectrum ({} samples)",
            self.morphology.kind(),
            self.sed.model.kind(),
            sed.spectrum.len()
        );
        Ok(SourceModel { spatial, sed })
    }
}
