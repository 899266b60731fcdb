use serde::{Deserialize, Serialize};

/// Label reported in `sources` for every identification.
pub const PLANT_ID_SOURCE: &str = "Plant.id";

/// Flattened identification result returned by `/api/identify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub name: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub probability: Option<f64>,
    pub common_names: Vec<String>,
    pub wikipedia_url: Option<String>,
    pub sources: Vec<String>,
}

impl Default for IdentificationResult {
    fn default() -> Self {
        Self {
            name: None,
            scientific_name: None,
            family: None,
            probability: None,
            common_names: Vec::new(),
            wikipedia_url: None,
            sources: vec![PLANT_ID_SOURCE.to_string()],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdentificationRequest<'a> {
    pub images: Vec<String>,
    pub similar_images: bool,
    pub modifiers: &'a [&'a str],
    pub plant_details: &'a [&'a str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyResponse {
    pub ok: bool,
    pub challenge: Option<String>,
}
