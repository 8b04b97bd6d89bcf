//! Terminal front end: fetch a batch of cat facts and print them

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use cat_facts::render::{Line, LineKind, render};
use cat_facts::{Config, OverlapPolicy, Theme, Widget};
use clap::Parser;
use colored::{ColoredString, Colorize};

#[derive(Parser, Debug)]
#[command(name = "catfacts")]
#[command(about = "Fetch random cat facts (1-10 at a time).", version)]
struct CommandLine {
    /// How many facts to fetch (1-10)
    #[arg(default_value = "1")]
    count: String,

    /// Use the dark colour scheme
    #[arg(long)]
    dark: bool,

    /// JSON configuration file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the fact endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Ignore results of batches superseded by a newer one
    #[arg(long)]
    supersede_stale: bool,
}

impl CommandLine {
    fn load_config(&self) -> cat_facts::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.http.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.http.timeout = Some(Duration::from_secs(secs));
        }
        if self.supersede_stale {
            config.overlap = OverlapPolicy::LatestIssued;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn style(line: &Line, theme: Theme) -> ColoredString {
    let text = line.text.as_str();
    match (line.kind, theme) {
        (LineKind::Title, Theme::Light) => text.blue().bold(),
        (LineKind::Title, Theme::Dark) => text.magenta().bold(),
        (LineKind::ThemeToggle, _) => text.dimmed(),
        (LineKind::Busy, _) => text.italic(),
        (LineKind::Error, Theme::Light) => text.red().bold(),
        (LineKind::Error, Theme::Dark) => text.bright_red().bold(),
        (LineKind::Retry, _) => text.yellow(),
        (LineKind::Fact, Theme::Light) => text.normal(),
        (LineKind::Fact, Theme::Dark) => text.bright_white(),
        (LineKind::Meta, _) => text.dimmed(),
    }
}

fn print_session(lines: &[Line], theme: Theme) {
    for line in lines {
        if line.kind == LineKind::Fact {
            println!();
        }
        println!("{}", style(line, theme));
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse();
    init_logging();

    let config = match commands.load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("{}", e.user_message().red());
            return ExitCode::FAILURE;
        }
    };

    let widget = match Widget::from_config(&config) {
        Ok(widget) => widget,
        Err(e) => {
            tracing::error!(error = %e, "could not create HTTP client");
            eprintln!("{}", e.user_message().red());
            return ExitCode::FAILURE;
        }
    };

    if commands.dark {
        widget.toggle_theme().await;
    }
    widget.set_input(commands.count.as_str()).await;

    let succeeded = match widget.trigger().await {
        Ok(outcome) => !matches!(outcome.state, cat_facts::FetchState::Failed(_)),
        Err(e) => {
            tracing::debug!(error = %e, "fetch not started");
            false
        }
    };

    let session = widget.snapshot().await;
    print_session(&render(&session), session.theme());

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
