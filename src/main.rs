use anyhow::Result;
use clap::Parser;
use gemini_chat::cli::CliArgs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    gemini_chat::run(args).await
}
