// Runs one parsed command against the player and the catalog

use crate::cli::{Command, VolumeDirection};
use crate::config::{Config, SearchConfig, VolumeConfig};
use crate::control::{self, PlaybackControl};
use crate::error::SpoError;
use crate::results::{ResultKind, ResultModel};
use crate::spotify::CatalogSearch;
use crate::ui::{Picker, RawInputSource};
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

pub struct Controller<'a, P, S> {
    player: &'a P,
    catalog: &'a S,
    config: &'a Config,
    terminal_width: usize,
    terminal_height: Option<usize>,
}

impl<'a, P: PlaybackControl, S: CatalogSearch> Controller<'a, P, S> {
    pub fn new(player: &'a P, catalog: &'a S, config: &'a Config) -> Self {
        Self {
            player,
            catalog,
            config,
            terminal_width: 80,
            terminal_height: None,
        }
    }

    pub fn with_terminal_size(mut self, width: usize, height: usize) -> Self {
        self.terminal_width = width;
        self.terminal_height = Some(height);
        self
    }

    /// `open_input` is only called when the picker actually needs the keyboard
    pub async fn run<I, F, W>(&self, command: Option<&Command>, open_input: F, out: &mut W) -> Result<()>
    where
        I: RawInputSource,
        F: FnOnce() -> Result<I, SpoError>,
        W: Write,
    {
        let show_now_playing = match command {
            None => true,
            Some(Command::Play) => {
                self.player.play_pause().await?;
                false
            }
            Some(Command::Pause) => {
                self.player.pause().await?;
                false
            }
            Some(Command::Prev) => {
                self.player.previous().await?;
                true
            }
            Some(Command::Next) => {
                self.player.next().await?;
                true
            }
            Some(Command::Song { terms }) => self.quickplay(terms, ResultKind::Track, out).await?,
            Some(Command::Artist { terms }) => self.quickplay(terms, ResultKind::Artist, out).await?,
            Some(Command::Album { terms }) => self.quickplay(terms, ResultKind::Album, out).await?,
            Some(Command::Search { terms, num }) => {
                let limit = num.unwrap_or(self.config.search.default_limit);
                self.search(terms, limit, open_input, out).await?
            }
            Some(Command::Vol { direction }) => {
                change_volume(*direction, &self.config.volume)?;
                false
            }
        };

        if show_now_playing {
            self.print_now_playing(command.is_some(), out).await?;
        }
        Ok(())
    }

    /// Play the top hit. Returns whether anything was played
    async fn quickplay<W: Write>(&self, terms: &[String], kind: ResultKind, out: &mut W) -> Result<bool> {
        let items = self.catalog.search(terms, kind, 1).await?;
        match items.first() {
            Some(item) => {
                info!("Quickplay {} {}", kind.api_type(), item.uri);
                self.player.open_uri(&item.uri).await?;
                Ok(true)
            }
            None => {
                no_results(terms, out)?;
                Ok(false)
            }
        }
    }

    async fn search<I, F, W>(&self, terms: &[String], limit: u32, open_input: F, out: &mut W) -> Result<bool>
    where
        I: RawInputSource,
        F: FnOnce() -> Result<I, SpoError>,
        W: Write,
    {
        let limit = SearchConfig::clamp_limit(limit);
        let items = self.catalog.search(terms, ResultKind::Track, limit).await?;

        let model = ResultModel::build(&items, ResultKind::Track);
        if model.is_empty() {
            no_results(terms, out)?;
            return Ok(false);
        }

        let mut picker = Picker::new(model, open_input()?, &mut *out)
            .with_width(self.terminal_width)
            .with_max_rows(self.config.ui.max_visible_rows);
        if let Some(height) = self.terminal_height {
            picker = picker.with_height(height);
        }
        let picked = picker.pick()?;

        match picked {
            Some(uri) => {
                info!("Picked {}", uri);
                self.player.open_uri(&uri).await?;
                Ok(true)
            }
            None => {
                debug!("Picker cancelled");
                Ok(false)
            }
        }
    }

    async fn print_now_playing<W: Write>(&self, after_change: bool, out: &mut W) -> Result<()> {
        // The client needs a moment before it reports the new track
        if after_change && self.config.player.settle_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.player.settle_delay_ms)).await;
        }

        let track = self.player.current_track().await?;
        writeln!(out, "{track}")?;
        Ok(())
    }
}

fn no_results<W: Write>(terms: &[String], out: &mut W) -> Result<()> {
    writeln!(out, "No results found for query: {}", terms.join(" "))?;
    Ok(())
}

pub fn change_volume(direction: VolumeDirection, config: &VolumeConfig) -> Result<()> {
    let command = match direction {
        VolumeDirection::Up => &config.up_command,
        VolumeDirection::Down => &config.down_command,
    };
    control::adjust_volume(command)
}

/// Player isn't on the bus: offer to start it. Returns whether it was launched
pub fn offer_launch<I, F, W>(open_input: F, out: &mut W, launch_command: &[String]) -> Result<bool>
where
    I: RawInputSource,
    F: FnOnce() -> Result<I, SpoError>,
    W: Write,
{
    writeln!(out, "Error: cannot connect to spotify")?;
    writeln!(out, "Would you like to launch spotify client? (y/n)")?;
    out.flush()?;

    // Raw mode only for the single keypress
    let answer = {
        let mut input = open_input()?;
        input.read_char()?
    };

    if answer != 'y' {
        writeln!(out, "aborting...")?;
        return Ok(false);
    }

    writeln!(out, "launching spotify...")?;
    control::launch_player(launch_command)?;
    writeln!(out, "spotify launched successfully")?;
    Ok(true)
}
