//! Model constants for the Groq provider
//!
//! Model IDs are sourced from the Groq model catalog.

/// Groq model constants
pub mod groq {
    /// Llama 3.3 70B - default model for SQL generation
    pub const LLAMA_3_3_70B_ID: &str = "llama-3.3-70b-versatile";
    pub const LLAMA_3_3_70B_NAME: &str = "Llama 3.3 70B Versatile";

    /// Llama 4 Maverick 17B
    pub const LLAMA_4_MAVERICK_ID: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";
    pub const LLAMA_4_MAVERICK_NAME: &str = "Llama 4 Maverick 17B";

    /// Llama 4 Scout 17B
    pub const LLAMA_4_SCOUT_ID: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
    pub const LLAMA_4_SCOUT_NAME: &str = "Llama 4 Scout 17B";

    /// Default model used when none is configured
    pub const DEFAULT_MODEL: &str = LLAMA_3_3_70B_ID;
}
