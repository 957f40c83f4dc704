use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use scrobbler_api::auth::authorize_url;
use scrobbler_api::types::{Period, Track};
use scrobbler_api::{Credentials, ScrobblerClient};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "scrobbler",
    version,
    about = "Command line client for the Last.fm / Audioscrobbler web service"
)]
struct Cli {
    /// Log requests and parsing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store API key and secret
    Config {
        /// API key from the Last.fm API account page
        #[arg(long, required_unless_present = "show")]
        api_key: Option<String>,
        /// Shared secret (needed for signed calls)
        #[arg(long)]
        secret: Option<String>,
        /// Print the stored configuration
        #[arg(long)]
        show: bool,
    },
    /// Authorize this client and store a session key
    Login {
        /// Check the stored session instead
        #[arg(long)]
        check: bool,
    },
    /// Forget the session key
    Logout {
        /// Delete the whole credentials file
        #[arg(long)]
        all: bool,
    },
    /// Search for tracks, artists, or albums
    Search {
        /// Search keyword
        keyword: String,
        /// Search type
        #[arg(short = 't', long, default_value = "track")]
        r#type: SearchKind,
        /// Max results
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
    /// Most played tracks of an artist
    TopTracks {
        artist: String,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Artists similar to an artist
    Similar {
        artist: String,
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Top tags of an artist
    Tags { artist: String },
    /// Show track details
    Info { artist: String, track: String },
    /// Love a track (requires login)
    Love { artist: String, track: String },
    /// Recently scrobbled tracks of a user
    Recent {
        user: String,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Most listened artists of a user
    TopArtists {
        user: String,
        /// Chart period
        #[arg(short, long, default_value = "overall")]
        period: PeriodArg,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Show a user profile
    User { user: String },
}

#[derive(Clone, ValueEnum)]
enum SearchKind {
    Track,
    Artist,
    Album,
}

#[derive(Clone, ValueEnum)]
enum PeriodArg {
    Overall,
    #[value(name = "7day")]
    Week,
    #[value(name = "1month")]
    Month,
    #[value(name = "3month")]
    Quarter,
    #[value(name = "6month")]
    HalfYear,
    #[value(name = "12month")]
    Year,
}

impl From<PeriodArg> for Period {
    fn from(p: PeriodArg) -> Self {
        match p {
            PeriodArg::Overall => Self::Overall,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
            PeriodArg::Quarter => Self::Quarter,
            PeriodArg::HalfYear => Self::HalfYear,
            PeriodArg::Year => Self::Year,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Config {
            api_key,
            secret,
            show,
        } => cmd_config(api_key, secret, show),
        Command::Login { check } => cmd_login(check),
        Command::Logout { all } => cmd_logout(all),
        Command::Search {
            keyword,
            r#type,
            limit,
        } => cmd_search(&keyword, &r#type, limit),
        Command::TopTracks { artist, limit } => cmd_top_tracks(&artist, limit),
        Command::Similar { artist, limit } => cmd_similar(&artist, limit),
        Command::Tags { artist } => cmd_tags(&artist),
        Command::Info { artist, track } => cmd_info(&artist, &track),
        Command::Love { artist, track } => cmd_love(&artist, &track),
        Command::Recent { user, limit } => cmd_recent(&user, limit),
        Command::TopArtists {
            user,
            period,
            limit,
        } => cmd_top_artists(&user, period.into(), limit),
        Command::User { user } => cmd_user(&user),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn client() -> Result<ScrobblerClient> {
    let credentials = Credentials::load().context("failed to load credentials")?;
    if credentials.api_key().is_none() {
        bail!("no API key configured; run `scrobbler config --api-key <KEY> --secret <SECRET>`");
    }
    Ok(ScrobblerClient::with_credentials(credentials)?)
}

fn mask(value: Option<&str>) -> String {
    match value {
        Some(v) if v.len() > 4 => format!("{}...", v.chars().take(4).collect::<String>()),
        Some(_) => "****".into(),
        None => "(unset)".into(),
    }
}

fn track_line(t: &Track) -> String {
    if t.album.is_empty() {
        format!("{} - {}", t.artist, t.name)
    } else {
        format!("{} - {} [{}]", t.artist, t.name, t.album)
    }
}

// ── config / login / logout ──

fn cmd_config(api_key: Option<String>, secret: Option<String>, show: bool) -> Result<()> {
    let current = Credentials::load()?;
    if show {
        println!("File:        {}", Credentials::path()?.display());
        println!("API key:     {}", current.api_key().unwrap_or("(unset)"));
        println!("Secret:      {}", mask(current.secret()));
        println!("Session key: {}", mask(current.session_key()));
        return Ok(());
    }

    let mut updated = current;
    if let Some(key) = api_key {
        updated = updated.with_api_key(key);
    }
    if let Some(secret) = secret {
        updated = updated.with_secret(secret);
    }
    updated.save()?;
    info!(path = %Credentials::path()?.display(), "credentials saved");
    println!("Configuration saved.");
    Ok(())
}

fn cmd_login(check: bool) -> Result<()> {
    if check {
        let credentials = Credentials::load()?;
        if credentials.session_key().is_some() {
            let client = ScrobblerClient::with_credentials(credentials)?;
            match client.session_user() {
                Ok(user) => println!("Logged in as: {}", user.name),
                Err(e) => println!("Session exists but validation failed: {e}"),
            }
        } else {
            println!("Not logged in.");
        }
        return Ok(());
    }

    let client = client()?;
    let api_key = client
        .credentials()
        .api_key()
        .context("no API key configured")?
        .to_owned();
    let token = client
        .auth_get_token()
        .context("failed to get request token")?;
    debug!(%token, "got request token");

    println!("Open this URL in a browser and allow access:\n\n  {}\n", authorize_url(&api_key, &token));
    print!("Press Enter when done...");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let session = client
        .auth_get_session(&token)
        .context("failed to get session (was access granted?)")?;
    client
        .credentials()
        .clone()
        .with_session_key(&session.key)
        .save()?;
    println!("Logged in as: {}", session.name);
    Ok(())
}

fn cmd_logout(all: bool) -> Result<()> {
    if all {
        Credentials::clear()?;
        println!("Credentials removed.");
    } else {
        Credentials::load()?.without_session_key().save()?;
        println!("Session cleared.");
    }
    Ok(())
}

// ── search ──

fn cmd_search(keyword: &str, kind: &SearchKind, limit: u32) -> Result<()> {
    let client = client()?;
    match kind {
        SearchKind::Track => {
            let page = client.track_search(keyword, None, limit, 1)?;
            println!("Total: {}\n", page.total);
            for t in &page.items {
                println!("  {}", track_line(t));
            }
        }
        SearchKind::Artist => {
            let page = client.artist_search(keyword, limit, 1)?;
            println!("Total: {}\n", page.total);
            for a in &page.items {
                println!("  {} ({} listeners)", a.name, a.listeners.unwrap_or_default());
            }
        }
        SearchKind::Album => {
            let page = client.album_search(keyword, limit, 1)?;
            println!("Total: {}\n", page.total);
            for a in &page.items {
                println!("  {} - {}", a.artist, a.name);
            }
        }
    }
    Ok(())
}

// ── artist ──

fn cmd_top_tracks(artist: &str, limit: u32) -> Result<()> {
    let client = client()?;
    for t in client.artist_top_tracks(artist, limit)? {
        println!(
            "  {:>3}. {} ({} plays)",
            t.rank.unwrap_or_default(),
            t.name,
            t.playcount.unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_similar(artist: &str, limit: Option<u32>) -> Result<()> {
    let client = client()?;
    for a in client.artist_similar(artist, limit)? {
        match a.similarity {
            Some(m) => println!("  {:5.1}%  {}", m * 100.0, a.name),
            None => println!("          {}", a.name),
        }
    }
    Ok(())
}

fn cmd_tags(artist: &str) -> Result<()> {
    let client = client()?;
    let tags = client.artist_top_tags(artist)?;
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    println!("{}", names.join(", "));
    Ok(())
}

// ── track ──

fn cmd_info(artist: &str, track: &str) -> Result<()> {
    let client = client()?;
    let t = client.track_info(artist, track)?;
    println!("Track:     {}", t.name);
    println!("Artist:    {}", t.artist);
    if !t.album.is_empty() {
        println!("Album:     {}", t.album);
    }
    if let Some(ms) = t.duration.filter(|d| *d > 0) {
        println!("Duration:  {}:{:02}", ms / 60000, (ms / 1000) % 60);
    }
    println!("Listeners: {}", t.listeners.unwrap_or_default());
    println!("Plays:     {}", t.playcount.unwrap_or_default());
    if !t.url.is_empty() {
        println!("URL:       {}", t.url);
    }
    Ok(())
}

fn cmd_love(artist: &str, track: &str) -> Result<()> {
    let client = client()?;
    client
        .track_love(artist, track)
        .context("failed to love track (try `scrobbler login`)")?;
    println!("Loved: {artist} - {track}");
    Ok(())
}

// ── user ──

fn cmd_recent(user: &str, limit: u32) -> Result<()> {
    let client = client()?;
    let page = client.user_recent_tracks(user, limit, 1)?;
    for t in &page.items {
        let when = if t.now_playing {
            "now playing"
        } else {
            t.date.as_str()
        };
        println!("  {}  ({when})", track_line(t));
    }
    Ok(())
}

fn cmd_top_artists(user: &str, period: Period, limit: u32) -> Result<()> {
    let client = client()?;
    let page = client.user_top_artists(user, period, limit, 1)?;
    println!("Period: {} (page {}/{})\n", period.as_str(), page.page, page.total_pages);
    for a in &page.items {
        println!(
            "  {:>3}. {} ({} plays)",
            a.rank.unwrap_or_default(),
            a.name,
            a.playcount.unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_user(user: &str) -> Result<()> {
    let client = client()?;
    let u = client.user_info(user)?;
    println!("User:    {}", u.name);
    if !u.realname.is_empty() {
        println!("Name:    {}", u.realname);
    }
    if !u.country.is_empty() {
        println!("Country: {}", u.country);
    }
    println!("Plays:   {}", u.playcount.unwrap_or_default());
    if let Some(url) = scrobbler_api::HasImages::largest_image(&u) {
        println!("Avatar:  {url}");
    }
    Ok(())
}
