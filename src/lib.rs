pub mod chat;
pub mod cli;
pub mod config;
pub mod http;
pub mod llm;

use anyhow::{Context, Result};
use chat::{ChatConfig, ChatSession};
use cli::{CliArgs, run_repl, send_and_print};
use config::AppConfig;
use http::client::HttpClient;
use http::debug::HttpDebugConfig;
use llm::gemini::GeminiProvider;
use llm::provider::LlmProvider;
use std::io::{self, Write};
use tokio::io::BufReader;

pub const FAREWELL: &str = "\n Bye... ";

pub async fn run(args: CliArgs) -> Result<()> {
    let config = match args.config.as_deref() {
        Some(path) => AppConfig::load_with_path(Some(path))?,
        None => AppConfig::load()?,
    };
    let mut session = open_session(&config, &args)?;
    let prompt = args.prompt_message();

    tokio::select! {
        biased;

        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for interrupt signal")?;
            say_goodbye_and_exit()
        }
        result = dispatch(&mut session, prompt.as_deref()) => result,
    }
}

fn open_session(config: &AppConfig, args: &CliArgs) -> Result<ChatSession<GeminiProvider>> {
    let http = HttpClient::new(
        reqwest::Client::new(),
        HttpDebugConfig::from_verbose(args.verbose),
    );
    let provider = GeminiProvider::new(
        http,
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
    )
    .with_context(|| format!("Failed to start chat session with model {}", config.model))?;

    let chat_config = ChatConfig::from_system_prompt(args.system_prompt.as_deref());
    Ok(ChatSession::new(provider, chat_config))
}

async fn dispatch<P: LlmProvider>(
    session: &mut ChatSession<P>,
    prompt: Option<&str>,
) -> Result<()> {
    let mut stdout = io::stdout();
    match prompt {
        Some(message) => send_and_print(session, message, &mut stdout).await,
        None => run_repl(session, BufReader::new(tokio::io::stdin()), &mut stdout).await,
    }
}

// A pending stdin read would keep the runtime alive, so leave the process directly.
fn say_goodbye_and_exit() -> ! {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{FAREWELL}");
    let _ = stdout.flush();
    std::process::exit(0)
}
