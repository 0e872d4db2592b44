//! Per-model token pricing

/// Input and output price in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// USD per million prompt tokens
    pub input_per_million: f64,

    /// USD per million completion tokens
    pub output_per_million: f64,
}

const SONNET: Pricing = Pricing {
    input_per_million: 3.0,
    output_per_million: 15.0,
};

const HAIKU: Pricing = Pricing {
    input_per_million: 0.25,
    output_per_million: 1.25,
};

const GPT4: Pricing = Pricing {
    input_per_million: 10.0,
    output_per_million: 30.0,
};

/// Pricing for a backend model id, detected by family substring
pub fn pricing_for(model: &str) -> Option<Pricing> {
    let model = model.to_lowercase();
    if model.contains("sonnet") {
        Some(SONNET)
    } else if model.contains("haiku") {
        Some(HAIKU)
    } else if model.contains("gpt-4") || model.contains("gpt4") {
        Some(GPT4)
    } else {
        None
    }
}

/// Cost in USD of one call, rounded to 6 decimals; 0.0 for unknown models
pub fn calculate_cost(model: &str, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    match pricing_for(model) {
        Some(pricing) => round6(
            prompt_tokens as f64 / 1_000_000.0 * pricing.input_per_million
                + completion_tokens as f64 / 1_000_000.0 * pricing.output_per_million,
        ),
        None => 0.0,
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
