mod echo;
mod telegram;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use corrector_core::{Analyzer, BotConfig, HttpArticleFetcher, LanguageToolChecker};
use teloxide::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::telegram::{TelegramSink, inbound_from};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Telegram bot that finds grammar and style issues in articles
#[derive(Parser, Debug)]
#[command(name = "corrector")]
#[command(version)]
#[command(about = "Proofreads the articles behind the links it receives", long_about = None)]
struct Args {
    /// Telegram Bot API token
    #[arg(long, env = "TELOXIDE_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Language articles are checked in
    #[arg(short, long, env = "CORRECTOR_LANGUAGE", default_value = "uk-UA", value_name = "LANG")]
    language: String,

    /// LanguageTool API root
    #[arg(long, env = "LANGUAGETOOL_URL", default_value = "http://localhost:8081/v2", value_name = "URL")]
    languagetool_url: String,

    /// HTTP timeout for article downloads in seconds
    #[arg(long, env = "CORRECTOR_FETCH_TIMEOUT", default_value = "30", value_name = "SECS")]
    fetch_timeout: u64,

    /// Overall timeout for downloading and checking one article in seconds
    #[arg(long, env = "CORRECTOR_REQUEST_TIMEOUT", default_value = "120", value_name = "SECS")]
    request_timeout: u64,

    /// Custom User-Agent for article downloads
    #[arg(long, env = "CORRECTOR_USER_AGENT", value_name = "UA")]
    user_agent: Option<String>,

    /// Retries for messages Telegram did not accept
    #[arg(long, env = "CORRECTOR_MAX_RETRIES", default_value = "3", value_name = "NUM")]
    max_retries: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn to_config(&self) -> BotConfig {
        let mut builder = BotConfig::builder()
            .token(self.token.clone())
            .language(&self.language)
            .languagetool_url(&self.languagetool_url)
            .fetch_timeout(self.fetch_timeout)
            .request_timeout(self.request_timeout)
            .max_retries(self.max_retries);

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder.build()
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=info,reqwest=info", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
    }

    let config = args.to_config();

    if args.verbose {
        echo::print_step(1, 3, "Validating configuration");
    }

    let token = config
        .validate()
        .inspect_err(|e| {
            tracing::error!(error = %e, "refusing to start");
            echo::print_error(&e.to_string());
        })
        .context("Invalid configuration")?
        .to_string();

    if args.verbose {
        eprintln!("  Token: {}", echo::mask_token(&token));
        echo::print_step(
            2,
            3,
            &format!("Connecting to LanguageTool at {} ({})", config.languagetool.base_url, config.languagetool.language),
        );
    }

    tracing::info!(language = %config.languagetool.language, "loading grammar checker");
    let checker = LanguageToolChecker::initialize(config.languagetool.clone())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "cannot start LanguageTool checker; is the server running?");
            echo::print_error(&e.to_string());
        })
        .context("Failed to initialize grammar checker")?;

    let fetcher = HttpArticleFetcher::new(config.fetch.clone()).context("Failed to build HTTP client")?;
    let analyzer = Arc::new(Analyzer::new(Arc::new(fetcher), Arc::new(checker), config.analyzer.clone()));

    if args.verbose {
        echo::print_step(3, 3, "Starting Telegram long polling");
        echo::print_success("Bot is running, press Ctrl+C to stop");
    }

    tracing::info!("starting bot");
    let bot = Bot::new(token);

    let handler_analyzer = Arc::clone(&analyzer);
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let analyzer = Arc::clone(&handler_analyzer);
        async move {
            let Some(inbound) = inbound_from(&msg) else {
                return respond(());
            };

            let sink = TelegramSink::new(bot, msg.chat.id);
            if let Err(e) = analyzer.handle(&inbound, &sink).await {
                tracing::error!(chat_id = %msg.chat.id, error = %e, "failed to reply");
            }

            respond(())
        }
    })
    .await;

    tracing::info!("bot stopped");
    analyzer.shutdown().await;

    Ok(())
}
