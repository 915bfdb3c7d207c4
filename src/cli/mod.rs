use crate::calendar::{parse_date, parse_month};
use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use crate::journal::Mood;
use crate::ops::{CalendarRequest, EntryEdit, ImageChange};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Track your moods and memories on a calendar
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, global = true, default_value = LOG_FORMAT_TEXT,
           value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[clap(long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with a username; the password is prompted for
    Login {
        username: String,
    },

    /// Create a local account and log in
    Register {
        username: String,
        email: String,
    },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Change the password of the current user
    Passwd,

    /// Show a month grid and the selected day's entries
    Calendar(CalendarArgs),

    /// List the entries of one day
    List {
        /// Day to list (format: YYYY-MM-DD or YYYYMMDD); defaults to today
        #[clap(short = 'd', long, value_parser = date_arg)]
        date: Option<NaiveDate>,
    },

    /// Add an entry
    Add(AddArgs),

    /// Change fields of an existing entry
    Edit(EditArgs),

    /// Delete an entry by id
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Month to show (format: YYYY-MM); defaults to the current month
    #[clap(short = 'm', long, value_parser = month_arg)]
    pub month: Option<NaiveDate>,

    /// Months to move forward, or back when negative
    #[clap(short = 'o', long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i32,

    /// Day to select (format: YYYY-MM-DD or YYYYMMDD); defaults to today
    #[clap(short = 's', long, value_parser = date_arg)]
    pub select: Option<NaiveDate>,
}

impl From<CalendarArgs> for CalendarRequest {
    fn from(args: CalendarArgs) -> Self {
        CalendarRequest {
            month: args.month,
            offset: args.offset,
            select: args.select,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Entry title
    #[clap(short = 't', long)]
    pub title: String,

    /// Day of the entry (format: YYYY-MM-DD or YYYYMMDD); defaults to today
    #[clap(short = 'd', long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// One of: happy, sad, angry, excited, confused
    #[clap(short = 'm', long, value_parser = mood_arg, default_value = "happy")]
    pub mood: Mood,

    /// Free text
    #[clap(short = 'D', long, default_value = "")]
    pub description: String,

    /// Image file to attach
    #[clap(short = 'i', long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Id of the entry to change
    pub id: String,

    #[clap(short = 't', long)]
    pub title: Option<String>,

    #[clap(short = 'd', long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    #[clap(short = 'm', long, value_parser = mood_arg)]
    pub mood: Option<Mood>,

    #[clap(short = 'D', long)]
    pub description: Option<String>,

    /// Replace the attached image
    #[clap(short = 'i', long, conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,

    /// Drop the attached image
    #[clap(long)]
    pub remove_image: bool,
}

impl From<EditArgs> for EntryEdit {
    fn from(args: EditArgs) -> Self {
        let image = match (args.image, args.remove_image) {
            (Some(path), _) => ImageChange::Replace(path),
            (None, true) => ImageChange::Remove,
            (None, false) => ImageChange::Keep,
        };
        EntryEdit {
            title: args.title,
            date: args.date,
            mood: args.mood,
            description: args.description,
            image,
        }
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn month_arg(value: &str) -> Result<NaiveDate, String> {
    parse_month(value).map_err(|e| e.to_string())
}

fn mood_arg(value: &str) -> Result<Mood, String> {
    value.parse::<Mood>().map_err(|e| e.to_string())
}
