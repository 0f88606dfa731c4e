//! Interactive property map on the terminal.
//!
//! Reads commands from stdin, feeds viewport changes into the
//! [`MapViewController`] and executes its fetch and search tickets on
//! the blocking thread pool. Responses come back through a channel and
//! are applied in the order they arrive; the controller drops stale ones.

use std::{sync::Arc, time::Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
    time::{sleep_until, Instant as TokioInstant},
};

use wealthmap_application::prelude as flows;
use wealthmap_core::{
    authorization::Actor,
    entities::*,
    map::{FetchTicket, MapViewConfig, MapViewController, SearchTicket},
    usecases::{self, SearchRequest},
};
use wealthmap_gateways::BackendClient;

use crate::{cli::FilterArgs, terminal_map::TerminalMap};

const HELP: &str = "\
Commands:
  pan <dlat> <dlng>          move the map by degrees
  zoom <level>               set the zoom level
  search [text] [--min-value N] [--max-value N] [--min-size N] [--max-size N] [--zip Z]
  click <marker-id>          click a marker
  select <property-id>       show the details of a listed property
  show                       redraw the map
  quit";

#[derive(Parser, Debug, PartialEq)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    Pan {
        #[arg(allow_hyphen_values = true, value_parser = finite)]
        dlat: f64,
        #[arg(allow_hyphen_values = true, value_parser = finite)]
        dlng: f64,
    },
    Zoom {
        #[arg(value_parser = finite)]
        level: f64,
    },
    Search {
        text: Vec<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    Click {
        marker_id: u64,
    },
    Select {
        property_id: String,
    },
    Show,
    #[command(alias = "exit")]
    Quit,
}

fn finite(arg: &str) -> Result<f64, String> {
    let value: f64 = arg.parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{arg} is not a finite number"))
    }
}

fn parse_line(line: &str) -> Option<Result<Command, clap::Error>> {
    let words: Vec<_> = line.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    Some(Line::try_parse_from(words).map(|line| line.command))
}

enum Response {
    Fetch(FetchTicket, Result<Vec<Property>, String>),
    Search(SearchTicket, Result<Vec<Property>, String>),
}

struct Explorer {
    client: Arc<BackendClient>,
    actor: Actor,
    controller: MapViewController<TerminalMap>,
    responses: mpsc::UnboundedSender<Response>,
}

impl Explorer {
    fn spawn_fetch(&self, ticket: FetchTicket) {
        let client = Arc::clone(&self.client);
        let tx = self.responses.clone();
        tokio::task::spawn_blocking(move || {
            let result =
                usecases::properties_in_bbox(&*client, &ticket.bbox).map_err(|err| err.to_string());
            // The receiver is gone after quitting.
            let _ = tx.send(Response::Fetch(ticket, result));
        });
    }

    fn spawn_search(&self, ticket: SearchTicket) {
        let client = Arc::clone(&self.client);
        let actor = self.actor.clone();
        let tx = self.responses.clone();
        tokio::task::spawn_blocking(move || {
            let result = flows::search_properties(&*client, &actor, &ticket.request)
                .map_err(|err| err.to_string());
            let _ = tx.send(Response::Search(ticket, result));
        });
    }

    /// Programmatic moves of the map restart the debounce like user moves.
    fn notice_moves(&mut self) {
        if self.controller.surface_mut().take_moved() {
            self.controller.on_move_end(Instant::now());
        }
    }

    fn status(&self) -> String {
        let mut out = self.controller.surface().render();
        if self.controller.is_loading() {
            out.push_str("loading ...\n");
        }
        if let Some(err) = self.controller.error() {
            out.push_str(&format!("error: {err}\n"));
        }
        out.push_str(&format!(
            "{} properties, {} markers\n",
            self.controller.properties().len(),
            self.controller.live_markers()
        ));
        if let Some(p) = self.controller.selected() {
            out.push_str(&crate::commands::describe_property(p));
        }
        out
    }

    /// Returns `false` to quit.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Pan { dlat, dlng } => self.controller.surface_mut().pan(dlat, dlng),
            Command::Zoom { level } => self.controller.surface_mut().set_zoom(level),
            Command::Search { text, filters } => {
                let request = SearchRequest {
                    text: text.join(" "),
                    filters: filters.into(),
                };
                let ticket = self.controller.begin_search(request);
                self.spawn_search(ticket);
            }
            Command::Click { marker_id } => {
                if !self.controller.on_marker_click(marker_id) {
                    println!("No marker {marker_id}");
                }
            }
            Command::Select { property_id } => {
                let property = self
                    .controller
                    .properties()
                    .iter()
                    .find(|p| p.id.as_str() == property_id)
                    .cloned();
                match property {
                    Some(p) => self.controller.select(p),
                    None => println!("Property {property_id} is not on the map"),
                }
            }
            Command::Show => {}
            Command::Quit => return false,
        }
        self.notice_moves();
        print!("{}", self.status());
        true
    }

    fn apply(&mut self, response: Response) {
        let applied = match response {
            Response::Fetch(ticket, result) => self.controller.complete_fetch(ticket, result),
            Response::Search(ticket, result) => self.controller.complete_search(ticket, result),
        };
        if applied {
            self.notice_moves();
            print!("{}", self.status());
        }
    }
}

pub async fn run(
    client: Arc<BackendClient>,
    actor: Actor,
    config: MapViewConfig,
    width_px: u32,
    height_px: u32,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut explorer = Explorer {
        client,
        actor,
        controller: MapViewController::new(TerminalMap::new(width_px, height_px), &config),
        responses: tx,
    };
    println!("{HELP}");
    if let Some(ticket) = explorer.controller.on_load() {
        explorer.spawn_fetch(ticket);
    }
    explorer
        .session(BufReader::new(tokio::io::stdin()), &mut rx)
        .await
}

impl Explorer {
    /// Processes input lines and backend responses until the input ends or
    /// a quit command arrives. The map is torn down on every exit path.
    async fn session<R>(
        &mut self,
        input: R,
        responses: &mut mpsc::UnboundedReceiver<Response>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let outcome = loop {
            let deadline = self.controller.next_deadline();
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break Ok(()),
                        Err(err) => break Err(anyhow::Error::from(err)),
                    };
                    match parse_line(&line) {
                        None => continue,
                        Some(Err(err)) => println!("{err}\n{HELP}"),
                        Some(Ok(command)) => {
                            if !self.handle(command) {
                                break Ok(());
                            }
                        }
                    }
                }
                Some(response) = responses.recv() => self.apply(response),
                _ = sleep_until(deadline.map(TokioInstant::from_std).unwrap_or_else(TokioInstant::now)), if deadline.is_some() => {
                    if let Some(ticket) = self.controller.poll(Instant::now()) {
                        self.spawn_fetch(ticket);
                    }
                }
            }
        };
        self.controller.teardown();
        log::debug!("Map explorer closed");
        outcome
    }
}
