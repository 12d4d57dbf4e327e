//! Line-oriented browsing session on stdin

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use dc_core::navigation::RouteSubscriber;
use dc_core::{Browser, Command, FilterAttribute, MemoryHistory, NavigationTarget, Route, SearchDebouncer, SortDirection, SortKey};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::render;

const HELP: &str = "\
search <text>           search (applied after typing pauses)
filter <attr> [value]   set or clear a filter; attrs: license artifact granularity stage task domain language year
sort <key> [asc|desc]   sort by name, size, domain or year
toggle                  flip the sort direction
clear                   reset search, filters and sort
open <code>             show a dataset
ref <code>              follow a reference from the current dataset
home                    back to the listing
back | forward          move through history
list                    print the current view
history                 print the history entries
quit";

/// One parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Search text, subject to debouncing
    Type(String),
    Apply(Command),
    Back,
    Forward,
    List,
    History,
    Help,
    Quit,
}

pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let input = match verb {
        "search" | "s" => Input::Type(rest.to_string()),
        "filter" | "f" => {
            let (name, value) = match rest.split_once(char::is_whitespace) {
                Some((name, value)) => (name, Some(value.trim().to_string())),
                None => (rest, None),
            };
            let attr = FilterAttribute::from_param_name(name).ok_or_else(|| format!("unknown filter '{}'", name))?;
            Input::Apply(Command::SetFilter(attr, value))
        }
        "sort" => {
            let mut parts = rest.split_whitespace();
            let key: SortKey = parts.next().unwrap_or_default().parse()?;
            let direction = match parts.next() {
                Some(dir) => dir.parse::<SortDirection>()?,
                None => SortDirection::default(),
            };
            Input::Apply(Command::SetSort(key, direction))
        }
        "toggle" => Input::Apply(Command::ToggleDirection),
        "clear" => Input::Apply(Command::Clear),
        "open" | "ref" if rest.is_empty() => return Err(format!("{} needs a code", verb)),
        "open" => Input::Apply(Command::Navigate(NavigationTarget::Record(rest.to_string()))),
        "ref" => Input::Apply(Command::Navigate(NavigationTarget::Reference(rest.to_string()))),
        "home" => Input::Apply(Command::Navigate(NavigationTarget::Listing)),
        "back" | "b" => Input::Back,
        "forward" => Input::Forward,
        "list" | "ls" | "" => Input::List,
        "history" => Input::History,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(input)
}

/// Logs every route the router settles on
struct RouteLog;

impl RouteSubscriber for RouteLog {
    fn on_route_change(&self, route: &Route) {
        info!(?route, "route changed");
    }
}

/// Read commands until `quit` or end of input
pub async fn run(mut browser: Browser<MemoryHistory>, debounce: Duration) -> Result<()> {
    let route_log: Arc<dyn RouteSubscriber> = Arc::new(RouteLog);
    browser.session_mut().router_mut().add_subscriber(route_log.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut search = SearchDebouncer::new(debounce, tx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show(&browser)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(input) => handle(&mut browser, &mut search, input)?,
                    Err(message) => eprintln!("{}", message),
                }
            }
            Some(command) = rx.recv() => {
                browser.dispatch(command);
                show(&browser)?;
            }
        }
    }

    // Input ended while a search was still settling
    let settled = settle(&mut search, &mut rx);
    if !settled.is_empty() {
        for command in settled {
            browser.dispatch(command);
        }
        show(&browser)?;
    }

    debug!(entries = browser.history().len(), "interactive session ended");
    Ok(())
}

/// Searches that fired but were not applied yet, followed by the one still waiting
fn settle(search: &mut SearchDebouncer, rx: &mut mpsc::UnboundedReceiver<Command>) -> Vec<Command> {
    let pending = search.flush();
    let mut commands = Vec::new();
    while let Ok(command) = rx.try_recv() {
        commands.push(command);
    }
    commands.extend(pending);
    commands
}

fn handle(browser: &mut Browser<MemoryHistory>, search: &mut SearchDebouncer, input: Input) -> Result<()> {
    match input {
        Input::Type(text) => {
            search.input(text);
            return Ok(());
        }
        Input::Apply(command) => {
            if command == Command::Clear {
                search.cancel();
            }
            browser.dispatch(command);
        }
        Input::Back => {
            if browser.back().is_none() {
                eprintln!("already at the oldest entry");
            }
        }
        Input::Forward => {
            if browser.forward().is_none() {
                eprintln!("already at the newest entry");
            }
        }
        Input::History => {
            let mut out = std::io::stdout().lock();
            for entry in browser.history().entries() {
                writeln!(out, "{}", entry)?;
            }
            return Ok(());
        }
        Input::Help => {
            println!("{}", HELP);
            return Ok(());
        }
        Input::List | Input::Quit => {}
    }
    show(browser)
}

fn show(browser: &Browser<MemoryHistory>) -> Result<()> {
    let mut out = std::io::stdout().lock();
    render::write_view(&mut out, browser.session())?;
    out.flush()?;
    Ok(())
}
