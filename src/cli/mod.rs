//! Command-line argument parsing and startup.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::core::config::Config;
use crate::core::session::random_nickname;
use crate::ui::chat_loop::{run_chat, ChatSettings};
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "termchat")]
#[command(about = "A full-screen terminal chat client for a shared public MQTT topic")]
#[command(
    long_about = "TermChat joins a single shared public MQTT topic and renders the traffic \
into a terminal-styled log. Everyone running the client with the same broker \
and topic is in the same room.\n\n\
Controls:\n\
  Type              Compose a message in the input field\n\
  Enter             Send the message\n\
  Tab               Cycle menu panels\n\
  Up/Down/PgUp/PgDn Scroll the transcript\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /help             Show available commands\n\
  /nick <name>      Change your codename\n\
  /clear            Clear the terminal buffer\n\
  /ai <instruction> Send an instruction to the terminal AI\n\
  /levelup          Force a level up\n\
  /exit             Terminate the session"
)]
pub struct Args {
    /// Codename to use instead of a random Anon#### identity
    #[arg(short, long)]
    pub nick: Option<String>,

    /// MQTT broker hostname
    #[arg(long, value_name = "HOST")]
    pub broker: Option<String>,

    /// MQTT broker port
    #[arg(long)]
    pub port: Option<u16>,

    /// Shared topic to join
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Write debug tracing to this file (also: TERMCHAT_LOG env var)
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

pub async fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load()?;

    if let Some(broker) = args.broker {
        config.broker_host = broker;
    }
    if let Some(port) = args.port {
        config.broker_port = port;
    }
    if let Some(topic) = args.topic {
        config.topic = topic;
    }

    let debug_log = args
        .log
        .or_else(|| std::env::var_os("TERMCHAT_LOG").map(PathBuf::from));
    logging::init(debug_log.as_deref())?;

    let nickname = args
        .nick
        .or_else(|| config.nickname.clone())
        .unwrap_or_else(random_nickname);

    run_chat(ChatSettings { config, nickname }).await
}
