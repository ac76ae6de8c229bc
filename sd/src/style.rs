//! The PromptStyle record

/// A named pair of prompt fragments plus a description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptStyle {
    /// Unique key within a database
    pub name: String,
    /// Positive prompt fragment, may contain `{prompt}`
    pub prompt: String,
    /// Negative prompt fragment
    pub negative_prompt: String,
    /// Free-text description
    pub long_description: String,
}

impl PromptStyle {
    /// Column order used when writing styles
    pub const COLUMNS: [&'static str; 4] = ["name", "prompt", "negative_prompt", "long_description"];

    /// Name of the fallback style returned for unknown names
    pub const NONE_NAME: &'static str = "None";

    pub fn new(
        name: impl Into<String>,
        prompt: impl Into<String>,
        negative_prompt: impl Into<String>,
        long_description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            negative_prompt: negative_prompt.into(),
            long_description: long_description.into(),
        }
    }

    /// The empty fallback style: named "None", every fragment empty
    pub fn none() -> Self {
        Self::new(Self::NONE_NAME, "", "", "")
    }

    /// Fields in `COLUMNS` order
    pub fn fields(&self) -> [&str; 4] {
        [&self.name, &self.prompt, &self.negative_prompt, &self.long_description]
    }
}
