//! Explanatory text per parameter, cached on success only.

use std::collections::HashMap;

use labtrend_core::LabError;

pub const DISABLED_MESSAGE: &str =
    "La generación de descripciones está deshabilitada (API Key no configurada).";
pub const LOAD_ERROR_MESSAGE: &str = "Error al cargar la descripción.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "No se pudo obtener la descripción del parámetro.";

/// Instruction sent to the text-generation service for one parameter.
pub fn description_prompt(parameter: &str) -> String {
    format!(
        "Explica brevemente en español y en un solo párrafo conciso (máximo 4-5 frases) \
         por qué se mide el parámetro de análisis de sangre '{parameter}', qué indica \
         principalmente, y qué implicaciones generales para la salud pueden tener sus \
         valores si están alterados (altos o bajos). No incluyas rangos de referencia en \
         esta explicación, solo la descripción médica general."
    )
}

/// Trimmed service response, or [`EMPTY_RESPONSE_MESSAGE`] when it carries no text.
pub fn normalize_response(response: Option<&str>) -> String {
    match response.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => text.to_string(),
        None => EMPTY_RESPONSE_MESSAGE.to_string(),
    }
}

/// Raw text-generation backend. `Ok(None)` means the call succeeded without text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<Option<String>, LabError>;
}

impl<G: TextGenerator + ?Sized> TextGenerator for &G {
    fn generate(&self, prompt: &str) -> Result<Option<String>, LabError> {
        (**self).generate(prompt)
    }
}

/// Produces a human-readable explanation of a blood-test parameter.
pub trait DescriptionProvider {
    fn describe(&self, parameter: &str) -> Result<String, LabError>;
}

/// Provider used when no text-generation service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDescriptions;

impl DescriptionProvider for DisabledDescriptions {
    fn describe(&self, _parameter: &str) -> Result<String, LabError> {
        Ok(DISABLED_MESSAGE.to_string())
    }
}

/// Provider backed by a text-generation service.
#[derive(Debug, Clone, Default)]
pub struct GeneratedDescriptions<G> {
    generator: G,
}

impl<G: TextGenerator> GeneratedDescriptions<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

impl<G: TextGenerator> DescriptionProvider for GeneratedDescriptions<G> {
    fn describe(&self, parameter: &str) -> Result<String, LabError> {
        let response = self.generator.generate(&description_prompt(parameter))?;
        Ok(normalize_response(response.as_deref()))
    }
}

pub struct DescriptionCache<P> {
    provider: P,
    entries: HashMap<String, String>,
}

impl<P: DescriptionProvider> DescriptionCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: HashMap::new(),
        }
    }

    /// Seed the cache with descriptions that never need fetching.
    pub fn with_predefined(
        provider: P,
        predefined: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            provider,
            entries: predefined.into_iter().collect(),
        }
    }

    pub fn cached(&self, parameter: &str) -> Option<&str> {
        self.entries.get(parameter).map(String::as_str)
    }

    /// Parameters among `parameters` that still need a fetch.
    pub fn missing<'a>(&self, parameters: &'a [String]) -> Vec<&'a str> {
        parameters
            .iter()
            .map(String::as_str)
            .filter(|p| !self.entries.contains_key(*p))
            .collect()
    }

    /// Cached text, or ask the provider. Failures are returned, not cached,
    /// so the next call retries.
    pub fn describe(&mut self, parameter: &str) -> Result<&str, LabError> {
        if !self.entries.contains_key(parameter) {
            let text = self.provider.describe(parameter).inspect_err(|err| {
                tracing::warn!(parameter, error = %err, "description fetch failed");
            })?;
            self.entries.insert(parameter.to_string(), text);
        }

        self.cached(parameter)
            .ok_or_else(|| LabError::Description(parameter.to_string()))
    }

    /// Text for display: the description, or a generic error line on failure.
    pub fn describe_or_error(&mut self, parameter: &str) -> String {
        match self.describe(parameter) {
            Ok(text) => text.to_string(),
            Err(_) => LOAD_ERROR_MESSAGE.to_string(),
        }
    }
}
