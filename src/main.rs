//! `dexy` command-line shell.
//!
//! Drives the storefront core interactively: each input line is mapped to an
//! event, actions run against the configured API and wallet bridge, and the
//! view is printed as text whenever it changes.
//!
//! # Commands
//!
//! Marketplace:
//! - `search <text>`: Set the search text (debounced); no text clears it
//! - `min <price>` / `max <price>`: Price bounds; `-` clears a bound
//! - `sort <newest|oldest|asc|desc>`: Sort order
//! - `category <name>`: Category filter (`All` for every category)
//! - `page <n>`: Listing page
//!
//! Navigation:
//! - `home`, `item <id>`, `account [address]`, `create`, `refresh`
//!
//! Cart:
//! - `cart`, `close`, `add <id>`, `remove <id>`, `clear`, `checkout`
//!
//! Wallet and forms:
//! - `connect`, `logout`
//! - `offers <page>`, `offer <price> --accept`
//! - `profile <username> <email>`
//! - `create <name> <start-price> <fix-price> [description] --accept`
//! - `dismiss <id>`, `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};

use dexy::api::HttpApi;
use dexy::app::{AppState, Route};
use dexy::domain::{Address, ItemId, NewItem, ProfileUpdate, SortKey};
use dexy::runtime::{Incoming, Runtime, Step};
use dexy::storage::JsonCredentialStore;
use dexy::ui::{render, Style};
use dexy::wallet::HttpWalletBridge;
use dexy::worker::DexyWorker;
use dexy::{Config, DexyError, Event};

const HELP: &str = "\
search <text> | min <price> | max <price> | sort <newest|oldest|asc|desc> | category <name> | page <n>
home | item <id> | account [address] | create | refresh
cart | close | add <id> | remove <id> | clear | checkout
connect | logout | offers <page> | offer <price> --accept | profile <username> <email>
create <name> <start-price> <fix-price> [description] --accept | dismiss <id> | quit";

#[derive(Debug, Parser)]
#[command(name = "dexy", about = "DeXy marketplace storefront shell", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, env = "DEXY_CONFIG")]
    config: Option<PathBuf>,

    /// Marketplace REST API base URL
    #[arg(long, env = "DEXY_API_URL")]
    api_url: Option<String>,

    /// Wallet bridge base URL
    #[arg(long, env = "DEXY_BRIDGE_URL")]
    bridge_url: Option<String>,

    /// Items per listing page
    #[arg(long, env = "DEXY_PAGE_SIZE")]
    page_size: Option<u32>,

    /// Search debounce in milliseconds
    #[arg(long, env = "DEXY_SEARCH_DEBOUNCE_MS")]
    search_debounce_ms: Option<u64>,

    /// Message signed on wallet login
    #[arg(long, env = "DEXY_LOGIN_MESSAGE")]
    login_message: Option<String>,

    /// Directory for logs and credentials
    #[arg(long, env = "DEXY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level filter
    #[arg(long, env = "DEXY_LOG")]
    log_level: Option<String>,

    /// Render width in columns
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Disable ANSI styling
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    fn load_config(&self) -> dexy::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(api_url) = &self.api_url {
            config.api_url.clone_from(api_url);
        }
        if let Some(bridge_url) = &self.bridge_url {
            config.bridge_url.clone_from(bridge_url);
        }
        if let Some(page_size) = self.page_size {
            if page_size == 0 {
                return Err(DexyError::Config("page size must be at least 1".to_string()));
            }
            config.page_size = page_size;
        }
        if let Some(debounce) = self.search_debounce_ms {
            config.search_debounce_ms = debounce;
        }
        if let Some(message) = &self.login_message {
            config.login_message.clone_from(message);
        }
        if self.data_dir.is_some() {
            config.data_dir.clone_from(&self.data_dir);
        }
        if self.log_level.is_some() {
            config.log_level.clone_from(&self.log_level);
        }
        Ok(config)
    }
}

/// What an input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Event(Event),
    Help,
    Quit,
    Invalid(String),
    Nothing,
}

fn invalid(message: impl Into<String>) -> Command {
    Command::Invalid(message.into())
}

fn parse_price(text: &str) -> Result<Decimal, String> {
    text.parse::<Decimal>()
        .map_err(|_| format!("not a price: {text}"))
}

/// `-` or nothing clears a bound.
fn parse_bound(text: &str) -> Result<Option<Decimal>, String> {
    match text {
        "" | "-" => Ok(None),
        value => parse_price(value).map(Some),
    }
}

fn parse_id(text: &str) -> Result<ItemId, String> {
    text.parse::<ItemId>().map_err(|_| format!("not an item id: {text}"))
}

/// Maps an input line to a command. `state` resolves defaults such as the
/// signed-in account.
fn parse_command(line: &str, state: &AppState) -> Command {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let accepted = rest.split_whitespace().any(|word| word == "--accept");
    let args: Vec<&str> = rest.split_whitespace().filter(|word| *word != "--accept").collect();

    let event = match verb {
        "" => return Command::Nothing,
        "help" | "?" => return Command::Help,
        "quit" | "exit" | "q" => return Command::Quit,

        "search" => Ok(Event::SetSearch(rest.to_string())),
        "min" => parse_bound(rest).map(Event::SetMinPrice),
        "max" => parse_bound(rest).map(Event::SetMaxPrice),
        "sort" => rest
            .parse::<SortKey>()
            .map(Event::SetSortKey)
            .map_err(|_| format!("unknown sort order: {rest}")),
        "category" => Ok(Event::SetCategory(if rest.is_empty() {
            dexy::domain::ALL_CATEGORIES.to_string()
        } else {
            rest.to_string()
        })),
        "page" => rest
            .parse::<u32>()
            .map(Event::SetPage)
            .map_err(|_| format!("not a page: {rest}")),

        "home" | "back" | "market" => Ok(Event::Navigate(Route::Marketplace)),
        "item" => parse_id(rest).map(|id| Event::Navigate(Route::Item(id))),
        "account" => match (rest, &state.session.address) {
            ("", Some(address)) => Ok(Event::Navigate(Route::Account(address.clone()))),
            ("", None) => Err("connect your wallet or give an address".to_string()),
            (text, _) => Address::parse(text)
                .map(|address| Event::Navigate(Route::Account(address)))
                .map_err(|e| e.to_string()),
        },
        "refresh" => Ok(Event::Refresh),

        "cart" => Ok(Event::OpenCart),
        "close" => Ok(Event::CloseCart),
        "add" => parse_id(rest).map(Event::AddToCart),
        "remove" | "rm" => parse_id(rest).map(Event::RemoveFromCart),
        "clear" => Ok(Event::ClearCart),
        "checkout" => Ok(Event::Checkout),

        "connect" | "login" => Ok(Event::ConnectWallet),
        "logout" => Ok(Event::Logout),
        "dismiss" => rest
            .parse::<u64>()
            .map(Event::DismissNotification)
            .map_err(|_| format!("not a notification id: {rest}")),

        "offers" => rest
            .parse::<u32>()
            .map(Event::SetOfferPage)
            .map_err(|_| format!("not a page: {rest}")),
        "offer" => match args.as_slice() {
            [price] => parse_price(price).map(|price| Event::PlaceOffer {
                price,
                accept_terms: accepted,
            }),
            _ => Err("usage: offer <price> --accept".to_string()),
        },
        "profile" => match args.as_slice() {
            [username, email] => Ok(Event::UpdateProfile(ProfileUpdate {
                username: (*username).to_string(),
                email: (*email).to_string(),
                avatar: None,
            })),
            _ => Err("usage: profile <username> <email>".to_string()),
        },
        "create" => match args.as_slice() {
            [] => Ok(Event::Navigate(Route::Create)),
            [name, start, fix, description @ ..] => {
                parse_create(name, start, fix, &description.join(" "), accepted)
            }
            _ => Err("usage: create <name> <start-price> <fix-price> [description] --accept".to_string()),
        },

        other => Err(format!("unknown command: {other} (try help)")),
    };

    event.map_or_else(invalid, Command::Event)
}

fn parse_create(name: &str, start: &str, fix: &str, description: &str, accepted: bool) -> Result<Event, String> {
    Ok(Event::CreateItem(NewItem {
        name: name.to_string(),
        description: description.to_string(),
        start_price: parse_price(start)?,
        fix_price: parse_price(fix)?,
        accept_rights: accepted,
        accept_terms: accepted,
    }))
}

#[tokio::main]
async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> dexy::Result<()> {
    let config = cli.load_config()?;
    dexy::observability::init_tracing(&config);
    tracing::info!(api_url = %config.api_url, bridge_url = %config.bridge_url, "starting storefront shell");

    let credentials = JsonCredentialStore::new(dexy::infrastructure::credentials_path(&config))?;
    let api = Arc::new(HttpApi::new(config.api_url.as_str()));
    let bridge = Arc::new(HttpWalletBridge::new(config.bridge_url.as_str()));
    let worker = DexyWorker::new(
        api,
        Arc::clone(&bridge) as Arc<dyn dexy::wallet::AuthSession>,
        bridge,
        Box::new(credentials),
        config.login_message.as_str(),
    );

    let mut runtime = Runtime::new(dexy::initialize(&config), Arc::new(worker));
    spawn_stdin_reader(runtime.sender());

    let style = if cli.no_color || !std::io::stdout().is_terminal() {
        Style::plain()
    } else {
        Style::ansi()
    };
    let draw = |state: &AppState| print!("{}", render(state, style, cli.width));

    runtime.dispatch(&Event::Init);
    draw(runtime.state());

    while let Some(step) = runtime.step().await {
        match step {
            Step::Line(line) => match parse_command(&line, runtime.state()) {
                Command::Event(event) => {
                    if runtime.dispatch(&event) {
                        draw(runtime.state());
                    }
                }
                Command::Help => println!("{HELP}"),
                Command::Invalid(message) => eprintln!("{message}"),
                Command::Quit => break,
                Command::Nothing => {}
            },
            Step::Handled { render: true } => draw(runtime.state()),
            Step::Handled { render: false } => {}
        }
    }

    tracing::info!("storefront shell stopped");
    Ok(())
}

/// Forwards stdin lines to the loop; end of input quits.
fn spawn_stdin_reader(tx: tokio::sync::mpsc::UnboundedSender<Incoming>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(Incoming::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Incoming::Line("quit".to_string()));
    });
}
