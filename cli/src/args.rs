use clap::{Parser, Subcommand, ValueEnum};
use social_network::{DbOptions, Rating, SocialDbError};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Members, books and recommendations over SQLite")]
pub(crate) struct Args {
    /// Database file; falls back to `SOCIAL_NETWORK_DB`.
    #[arg(long)]
    pub(crate) db: Option<PathBuf>,
    #[arg(long)]
    pub(crate) busy_timeout_ms: Option<u64>,
    /// Also append log output to this file.
    #[arg(long)]
    pub(crate) log: Option<PathBuf>,
    #[arg(long, short)]
    pub(crate) verbose: bool,
    /// Print entities as JSON.
    #[arg(long)]
    pub(crate) json: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Register a member.
    CreateMember { name: String },
    /// Create a work with its authors.
    CreateWork {
        title: String,
        /// Comma separated, e.g. "Terry Pratchett, Neil Gaiman".
        #[arg(long, short)]
        authors: String,
    },
    /// Record that REQUESTER is a friend of ADDRESSED.
    AddFriendship { requester: i64, addressed: i64 },
    /// Mark a work as read by a member, with a rating.
    Read {
        member: i64,
        work: i64,
        #[arg(value_enum)]
        rating: RatingArg,
    },
    Members,
    Works,
    /// Recommend works to a member.
    Recommend { member: i64 },
    /// Works a member has read.
    ReadBy { member: i64 },
    /// Works a member rated, optionally only with the given ratings.
    RatedBy {
        member: i64,
        #[arg(long, value_enum, value_delimiter = ',')]
        ratings: Vec<RatingArg>,
    },
    /// Works whose author list contains NAME (case-sensitive).
    ByAuthor { name: String },
    /// Members who read a work.
    Readers { work: i64 },
    /// Friends of a member.
    Friends { member: i64 },
    /// Friends of a member who also read a work.
    FriendsWhoRead { member: i64, work: i64 },
    /// Interactive numbered menu.
    Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RatingArg {
    Nothing,
    Little,
    Alot,
}

impl From<RatingArg> for Rating {
    fn from(arg: RatingArg) -> Self {
        match arg {
            RatingArg::Nothing => Rating::Nothing,
            RatingArg::Little => Rating::Little,
            RatingArg::Alot => Rating::ALot,
        }
    }
}

impl Args {
    pub(crate) fn db_options(&self) -> Result<DbOptions, SocialDbError> {
        let mut options = match &self.db {
            Some(path) => DbOptions::new(path.to_string_lossy().into_owned()),
            None => DbOptions::from_env()?,
        };
        if let Some(ms) = self.busy_timeout_ms {
            options.busy_timeout = Duration::from_millis(ms);
        }
        Ok(options)
    }
}
