pub mod gemini;
pub mod params;
pub mod provider;
