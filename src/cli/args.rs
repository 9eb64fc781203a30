use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "iftar", version, author, about = "A terminal companion for the Ramadan prayer schedule and Quran khatam tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's prayer schedule with the Hijri date
    Times,
    /// Show the hero card for the current moment
    Hero {
        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,
        /// Refresh interval in seconds (with --watch)
        #[arg(long, default_value = "1")]
        interval: u64,
    },
    /// Schedule cache management
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommands,
    },
    /// Khatam (complete-reading) plan
    Khatam {
        #[command(subcommand)]
        action: KhatamCommands,
    },
    /// Log Quran reading time for today
    Read {
        /// Minutes read
        minutes: u32,
    },
    /// Show reading statistics
    Stats {
        /// Show a heatmap for the last 7 days
        #[arg(long)]
        week: bool,
    },
    /// Bookmark management
    Bookmark {
        #[command(subcommand)]
        action: BookmarkCommands,
    },
    /// Show or change configuration
    Config {
        /// City used when requesting schedule exports
        #[arg(long)]
        city: Option<String>,
        /// Minute offset applied to imported timings
        #[arg(long)]
        offset: Option<i32>,
        /// Hijri day offset for local moon sighting
        #[arg(long)]
        hijri_offset: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Import an exported schedule JSON file into the cache
    Import {
        /// Path to the JSON document
        file: String,
    },
    /// Drop every cached day (reimport after changing the offset)
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum KhatamCommands {
    /// Start a new plan
    Start {
        /// Days to finish the whole Quran in
        days: Option<u32>,
    },
    /// Show progress, pace, and recommendation
    Status,
    /// Jump to a reading position (overwrites progress)
    Mark {
        /// Surah number (1-114)
        surah: u32,
        /// Ayah number within the surah
        ayah: u32,
    },
    /// Add sequentially-read ayat to the progress counter
    Add {
        /// Number of ayat read
        ayat: u32,
    },
    /// Clear the current plan
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommands {
    /// Bookmark an ayah
    Add {
        /// Surah number (1-114)
        surah: u32,
        /// Ayah number within the surah
        ayah: u32,
        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },
    /// List bookmarks
    List,
    /// Remove a bookmark by id
    Remove {
        /// Bookmark id (from `bookmark list`)
        id: i64,
    },
}
