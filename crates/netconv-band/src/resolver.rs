//! Effective desired parameter sets per object

use crate::band::{BandClassifier, BandKey};
use crate::error::BandError;
use crate::source::SourceAttributes;
use crate::template::Template;
use netconv_model::{ObjectId, ParamValue, ParameterSet};

/// Resolves the desired parameter set of an object from the template
///
/// Owns the template, the classifier and the radio attributes the band keys
/// are derived from. Resolution never mutates the template.
#[derive(Debug, Clone)]
pub struct DefaultTemplateResolver {
    template: Template,
    classifier: BandClassifier,
    sources: SourceAttributes,
}

impl DefaultTemplateResolver {
    /// Create resolver with the LTE classifier
    #[must_use]
    pub fn new(template: Template, sources: SourceAttributes) -> Self {
        Self {
            template,
            classifier: BandClassifier::lte(),
            sources,
        }
    }

    /// Template in use
    #[inline]
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Radio attributes in use
    #[inline]
    #[must_use]
    pub fn sources(&self) -> &SourceAttributes {
        &self.sources
    }

    /// Band key of an object
    ///
    /// # Errors
    /// See [`SourceAttributes::band_key`]
    pub fn band_key(&self, id: &ObjectId) -> Result<BandKey, BandError> {
        self.sources.band_key(id, &self.classifier)
    }

    /// Band-resolved value of one band-keyed parameter
    ///
    /// Returns `Ok(None)` if `param` is not band-keyed.
    ///
    /// # Errors
    /// [`BandError::MissingSourceAttributes`] if the band key of `id` cannot
    /// be computed
    pub fn band_value(&self, id: &ObjectId, param: &str) -> Result<Option<ParamValue>, BandError> {
        match self.template.band_table(param) {
            Some(table) => {
                let key = self.band_key(id)?;
                Ok(Some(table.lookup(&key).clone()))
            }
            None => Ok(None),
        }
    }

    /// Global default of a parameter
    #[inline]
    #[must_use]
    pub fn default_value(&self, param: &str) -> Option<&ParamValue> {
        self.template.defaults().get(param)
    }

    /// Defaults with band-keyed parameters resolved for `id`, merged with
    /// `dynamic` (dynamic values win)
    ///
    /// # Errors
    /// [`BandError::MissingSourceAttributes`] if the template has band-keyed
    /// parameters and the band key of `id` cannot be computed
    pub fn resolve_effective_desired(
        &self,
        id: &ObjectId,
        dynamic: &ParameterSet,
    ) -> Result<ParameterSet, BandError> {
        let mut resolved = self.template.defaults().clone();
        let mut band_parameters = self.template.band_parameters().peekable();
        if band_parameters.peek().is_some() {
            let key = self.band_key(id)?;
            for param in band_parameters {
                if let Some(table) = self.template.band_table(param) {
                    resolved.insert(param, table.lookup(&key).clone());
                }
            }
            tracing::trace!(id = %id, band = %key, "band parameters resolved");
        }
        Ok(resolved.merged(dynamic))
    }
}
