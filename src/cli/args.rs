use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "gemini-chat")]
#[command(
    about = "Use Google's Gemini through the API",
    long_about = "Use Google's Gemini through the API\n\nWithout --prompt an interactive session starts. Inside it:\n  /file <path>   Send the contents of a file as one message\n  /exit          Leave the session\n\nEnvironment:\n  GOOGLE_API_KEY   API key (GEMINI_API_KEY is accepted too)\n  GEMINI_MODEL     Model name override\n  GEMINI_BASE_URL  API base URL override\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/gemini-chat/config.toml\n    2. ~/.config/gemini-chat/config.toml"
)]
pub struct CliArgs {
    /// The prompt to send to the model. Skips the interactive session.
    #[arg(short, long, num_args = 1.., value_name = "TOKENS")]
    pub prompt: Option<Vec<String>>,

    /// Add a custom system prompt.
    #[arg(short, long, num_args = 1.., value_name = "TOKENS")]
    pub system_prompt: Option<Vec<String>>,

    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dump redacted HTTP requests and responses to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    pub fn prompt_message(&self) -> Option<String> {
        self.prompt
            .as_ref()
            .filter(|tokens| !tokens.is_empty())
            .map(|tokens| tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;
    use clap::error::ErrorKind;

    #[test]
    fn parse_defaults() {
        let args = CliArgs::try_parse_from(["gemini-chat"]).expect("should parse");
        assert_eq!(args.prompt, None);
        assert_eq!(args.system_prompt, None);
        assert_eq!(args.config, None);
        assert!(!args.verbose);
        assert_eq!(args.prompt_message(), None);
    }

    #[test]
    fn prompt_tokens_join_with_single_spaces() {
        let args = CliArgs::try_parse_from(["gemini-chat", "-p", "what", "is", "rust"])
            .expect("parse");
        assert_eq!(args.prompt_message().as_deref(), Some("what is rust"));
    }

    #[test]
    fn parse_long_flags_together() {
        let args = CliArgs::try_parse_from([
            "gemini-chat",
            "--system-prompt",
            "one",
            "two",
            "--prompt",
            "hi",
            "--config",
            "/tmp/custom.toml",
            "--verbose",
        ])
        .expect("parse");

        assert_eq!(
            args.system_prompt,
            Some(vec!["one".to_string(), "two".to_string()])
        );
        assert_eq!(args.prompt_message().as_deref(), Some("hi"));
        assert_eq!(
            args.config.as_deref(),
            Some(std::path::Path::new("/tmp/custom.toml"))
        );
        assert!(args.verbose);
    }

    #[test]
    fn short_system_prompt_flag() {
        let args = CliArgs::try_parse_from(["gemini-chat", "-s", "be", "brief"]).expect("parse");
        assert_eq!(
            args.system_prompt,
            Some(vec!["be".to_string(), "brief".to_string()])
        );
        assert_eq!(args.prompt, None);
    }

    #[test]
    fn prompt_flag_requires_at_least_one_token() {
        let err = CliArgs::try_parse_from(["gemini-chat", "--prompt"]).expect_err("should fail");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        let err = CliArgs::try_parse_from(["gemini-chat", "--temperature", "1"])
            .expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
