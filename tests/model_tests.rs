//! Tests for model selection.

use concierge::models::LanguageModel;

#[test]
fn language_model_display() {
    let model = LanguageModel::Ollama("llama3.2".into());
    assert_eq!(model.to_string(), "ollama:llama3.2");
}

#[test]
fn bare_model_id_defaults_to_ollama() {
    let model: LanguageModel = "qwen2.5".parse().unwrap();
    assert_eq!(model.provider_name(), "ollama");
    assert_eq!(model.model_id(), "qwen2.5");
}

#[test]
fn openai_compatible_accepts_both_spellings() {
    for selector in ["openai-compatible:local", "openai_compatible:local"] {
        let model: LanguageModel = selector.parse().unwrap();
        assert_eq!(model, LanguageModel::OpenAiCompatible("local".into()));
    }
}

#[test]
fn model_id_may_contain_colons() {
    let model: LanguageModel = "ollama:llama3.2:3b".parse().unwrap();
    assert_eq!(model.model_id(), "llama3.2:3b");
}

#[test]
fn unknown_provider_is_rejected() {
    assert!("anthropic:claude".parse::<LanguageModel>().is_err());
    assert!("ollama:".parse::<LanguageModel>().is_err());
}
