mod room;
mod view;
mod widget;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, Timelike};
use clap::Parser;
use crossterm::event::{
    self,
    Event,
    KeyCode,
    KeyEvent,
    KeyEventKind,
};
use ratatui::{backend::Backend, DefaultTerminal, Terminal};
use simplelog::{Config, LevelFilter, WriteLogger};

use signage::{
    refresh_once,
    select,
    spawn_refresher,
    Clock,
    DisplayTracker,
    FeedSource,
    Fetcher,
    HttpFetcher,
    PhotoCache,
    ScheduleFetcher,
    ScheduleRepository,
    SignageConfig,
};

use view::schedule::Screen;

const EXIT_FETCH_FAILED: u8 = 1;
const EXIT_BAD_CONFIG: u8 = 2;
const EXIT_BAD_ROOM: u8 = 4;

/// Conference room schedule display
#[derive(Parser, Debug)]
#[command(name = "signage-cli", version)]
struct Args {
    /// Room to show, e.g. room5 or bof2
    room: String,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "signage.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match SignageConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_BAD_CONFIG);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Cannot start logging: {}", e);
        return ExitCode::from(EXIT_BAD_CONFIG);
    }

    let Some(room_label) = room::room_label(&args.room) else {
        log::error!("Unknown room {}", args.room);
        eprintln!("Unknown room '{}': expected roomN or bofN", args.room);
        return ExitCode::from(EXIT_BAD_ROOM);
    };

    let (fetcher, clock) = match build(&config, &args.room) {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            return ExitCode::from(EXIT_BAD_CONFIG);
        }
    };

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &config, fetcher, room_label, clock);
    ratatui::restore();

    match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("Display failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &SignageConfig) -> io::Result<()> {
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Info);
    let file = File::create(&config.log_file)?;
    WriteLogger::init(level, Config::default(), file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn build(config: &SignageConfig, room: &str) -> signage::Result<(ScheduleFetcher, Clock)> {
    let http: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.request_timeout())?);
    let source = FeedSource::new(config.feed_url.clone(), room, config.start_date()?);
    let photos = PhotoCache::new(config.image_cache.clone(), http.clone());

    log::info!(
        "Showing {} from {} (speakers at {})",
        room,
        config.feed_url,
        source.speakers_url()
    );
    Ok((ScheduleFetcher::new(source, http, photos), config.clock()?))
}

fn run(
    terminal: &mut DefaultTerminal,
    config: &SignageConfig,
    fetcher: ScheduleFetcher,
    room_label: String,
    clock: Clock,
) -> io::Result<ExitCode> {
    terminal.draw(|frame| view::startup::draw(frame, &room_label, "Retrieving schedule..."))?;

    let repository = ScheduleRepository::new();
    if !refresh_once(&fetcher, &repository) {
        return Ok(ExitCode::from(EXIT_FETCH_FAILED));
    }

    let photos = fetcher.photo_cache().clone();
    let refresher = spawn_refresher(fetcher, repository.clone(), config.data_refresh_period())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let mut app = App {
        exit: false,
        room_label,
        clock,
        tracker: DisplayTracker::new(),
        shown: None,
        repository,
        photos,
        screen_refresh: config.screen_refresh_period(),
    };
    let result = app.run(terminal);

    refresher.stop();
    result.map(|_| ExitCode::SUCCESS)
}

pub struct App {
    exit: bool,
    room_label: String,
    clock: Clock,
    tracker: DisplayTracker,
    shown: Option<Face>,
    repository: ScheduleRepository,
    photos: PhotoCache,
    screen_refresh: Duration,
}

/// Time-dependent parts of the last drawn frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Face {
    minute: NaiveDateTime,
    started: bool,
}

impl Face {
    fn at(now: NaiveDateTime, first_start: Option<NaiveDateTime>) -> Self {
        Self {
            minute: now
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(now),
            started: first_start.is_some_and(|start| start <= now),
        }
    }
}

impl App {
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        self.update(terminal, true)?;
        let mut last_tick = Instant::now();

        while !self.exit {
            let timeout = self.screen_refresh.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                let redraw = self.handle_event(event::read()?);
                if redraw {
                    self.update(terminal, true)?;
                }
            }

            if last_tick.elapsed() >= self.screen_refresh {
                self.update(terminal, false)?;
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    /// Re-select the rotation and draw it if anything on screen would change;
    /// returns whether it drew
    fn update<B: Backend>(&mut self, terminal: &mut Terminal<B>, force: bool) -> io::Result<bool> {
        let schedule = self.repository.current();
        let now = self.clock.now();
        let rotation = select(&schedule, now);

        let changed = self.tracker.observe(&rotation);
        let face = Face::at(now, rotation.first.map(|first| first.start));
        if !changed && !force && self.shown == Some(face) {
            return Ok(false);
        }
        self.shown = Some(face);

        let screen = Screen {
            room_label: &self.room_label,
            now,
            simulated: self.clock.is_simulated(),
            schedule: &schedule,
            rotation,
            photos: &self.photos,
        };
        terminal.draw(|frame| view::schedule::draw(frame, &screen))?;
        Ok(true)
    }

    /// Returns true when the screen should be redrawn immediately
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key(key_event)
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Char('q') => {
                self.exit();
                false
            },
            KeyCode::Char('+') if self.clock.is_simulated() => {
                self.clock.advance_hour();
                true
            },
            KeyCode::Char('-') if self.clock.is_simulated() => {
                self.clock.rewind_hour();
                true
            },
            _ => false,
        }
    }

    fn exit(&mut self) {
        self.exit = true;
    }
}
