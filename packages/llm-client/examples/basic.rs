//! Classify one piece of feedback and embed it.
//!
//! LLM_API_KEY=... cargo run -p llm-client --example basic

use llm_client::{strip_code_blocks, ChatRequest, LlmClient, Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = LlmClient::from_env()?;

    println!("=== Chat Completion ===");
    let response = client
        .chat_completion(
            ChatRequest::new("llama-3.3-70b-versatile")
                .message(Message::system(
                    "Reply with a JSON object {\"sentiment\": \"positive|neutral|negative\"}.",
                ))
                .message(Message::user("The new export button saves me an hour a week."))
                .temperature(0.1),
        )
        .await?;

    println!("Response: {}", strip_code_blocks(&response.content));

    println!("\n=== Embeddings ===");
    let embedding = client
        .create_embedding("Export is slow on large projects", "nomic-embed-text-v1.5")
        .await?;

    println!("Embedding dimensions: {}", embedding.len());

    Ok(())
}
