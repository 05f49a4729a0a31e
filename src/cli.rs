use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// With no command, shows the song that is playing right now
#[derive(Parser, Debug)]
#[command(name = "spo", version)]
#[command(about = "A simple command line controller for Spotify")]
pub struct Args {
    /// Enable developer logging (debug output to stderr instead of the log file)
    #[arg(long, global = true)]
    pub dev: bool,

    /// Use this config file instead of the one in the user config dir
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play/pause current song
    Play,
    /// Pause current song
    Pause,
    /// Previous song
    Prev,
    /// Next song
    Next,
    /// Quickplay the best matching song
    Song {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Quickplay the best matching artist
    Artist {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Quickplay the best matching album
    Album {
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Keyword search, then pick one of the best matches to play
    Search {
        #[arg(required = true)]
        terms: Vec<String>,
        /// Number of search results to display [default: from config, 10]
        #[arg(short = 'n', long = "num")]
        num: Option<u32>,
    },
    /// Tweak volume up/down by 5%
    Vol {
        #[arg(value_enum)]
        direction: VolumeDirection,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeDirection {
    Up,
    Down,
}
