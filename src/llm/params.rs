use serde::Serialize;

/// Sampling parameters sent with every request as `generationConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 1.0,
            top_k: 1,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyRule {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// One rule per harm category, in `HarmCategory::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafetySettings {
    rules: [SafetyRule; 4],
}

impl SafetySettings {
    pub fn uniform(threshold: HarmBlockThreshold) -> Self {
        Self::from_fn(|_| threshold)
    }

    pub fn from_fn(mut threshold_for: impl FnMut(HarmCategory) -> HarmBlockThreshold) -> Self {
        Self {
            rules: HarmCategory::ALL.map(|category| SafetyRule {
                category,
                threshold: threshold_for(category),
            }),
        }
    }

    pub fn rules(&self) -> &[SafetyRule] {
        &self.rules
    }
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self::uniform(HarmBlockThreshold::BlockNone)
    }
}
