//! Provider enumeration for determining which adapter to use.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Azure,
    OpenAi,
    Mock,
}

impl ProviderType {
    /// Parse a provider name from configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use sk_core::llm::ProviderType;
    ///
    /// assert_eq!(ProviderType::from_name("azure"), Some(ProviderType::Azure));
    /// assert_eq!(ProviderType::from_name("Azure-OpenAI"), Some(ProviderType::Azure));
    /// assert_eq!(ProviderType::from_name("openai"), Some(ProviderType::OpenAi));
    /// assert_eq!(ProviderType::from_name("bedrock"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "azure" | "azure-openai" | "azure_openai" => Some(Self::Azure),
            "openai" | "openai-compatible" => Some(Self::OpenAi),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Azure => "azure",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for provider in [ProviderType::Azure, ProviderType::OpenAi, ProviderType::Mock] {
            assert_eq!(ProviderType::from_name(provider.name()), Some(provider));
        }
    }

    #[test]
    fn test_unknown_provider() {
        assert_eq!(ProviderType::from_name(""), None);
        assert_eq!(ProviderType::from_name("anthropic"), None);
    }
}
