//! Basic Gemini client usage, plain and search-grounded

use gemini_client::{Content, GeminiClient, GenerateContentRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = GeminiClient::from_env()?;

    // Full request surface, no grounding
    println!("=== generate_content ===");
    let response = client
        .generate_content(
            "gemini-2.5-flash",
            GenerateContentRequest {
                contents: vec![Content::user("What is Rust in one sentence?")],
                ..Default::default()
            },
        )
        .await?;

    println!("Response: {}", response.text().unwrap_or_default());
    if let Some(version) = response.model_version {
        println!("Served by: {}", version);
    }

    // Grounded convenience wrapper
    println!("\n=== generate_grounded ===");
    let text = client
        .generate_grounded(
            "gemini-2.5-flash",
            "You are a concise neighborhood-news researcher.",
            "What opened in the Longfellow neighborhood of Minneapolis this week?",
        )
        .await?;

    println!("Response: {}", text);

    Ok(())
}
