// Teacher Toolbox CLI - classroom utilities from the terminal
// Name picker, exam clock slices and an interval timer sharing one settings store

use anyhow::{bail, Context, Result};
use chrono::Weekday;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use teacher_toolbox::clock::{ClickOutcome, Ring};
use teacher_toolbox::config_file::Config;
use teacher_toolbox::constants::{
    MINUTES_PER_DIAL, MINUTES_PER_STEP, PICK_MAX_COUNT, TIMER_TICK_MS,
};
use teacher_toolbox::roster::StudentClassSelector;
use teacher_toolbox::timer::{self, IntervalPlan, IntervalTimer, TimerEvent};
use teacher_toolbox::{config, parse_weekday, ToolboxCore};

/// Classroom utilities: random name picker, exam clock and interval timer
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Classroom utilities: random name picker, exam clock and interval timer",
    long_about = "Classroom utilities for the front of the room.

Rosters are plain text files, one student per line. A number at the end of
a line weights that student, so 'Sam3' is three times as likely as 'Alex'.

Classes are listed per weekday; commands default to today.

Configuration is read from:
  <config dir>/teacher-toolbox/config.toml

State (class lists, pick history, exam clock) is kept in settings.json next
to it, or wherever TEACHER_TOOLBOX_SETTINGS points."
)]
struct Cli {
    /// Settings store to use (overrides config file and environment)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick random students from a class
    Pick {
        /// Class name (the roster file name without extension)
        class: String,
        #[command(flatten)]
        day: DayArg,
        /// How many names to draw
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Manage the per-weekday class lists
    #[command(subcommand)]
    Class(ClassCommand),
    /// Edit the exam clock time slices
    #[command(subcommand)]
    Clock(ClockCommand),
    /// Run a countdown or interval timer
    Timer {
        /// Work phase length in minutes
        #[arg(short, long)]
        minutes: Option<u64>,
        /// Rest between rounds in minutes (0 for none)
        #[arg(short, long)]
        rest: Option<u64>,
        /// Number of work rounds
        #[arg(long)]
        rounds: Option<u32>,
    },
    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug)]
struct DayArg {
    /// Weekday (mon, tue, ...); defaults to today
    #[arg(short, long)]
    day: Option<String>,
}

impl DayArg {
    fn resolve(&self) -> Result<Weekday> {
        match &self.day {
            Some(d) => parse_weekday(d),
            None => Ok(StudentClassSelector::today()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum ClassCommand {
    /// Add a roster file as a class
    Add {
        file: PathBuf,
        #[command(flatten)]
        day: DayArg,
        /// Add to every day of the week
        #[arg(long, conflicts_with = "day")]
        all_days: bool,
    },
    /// Remove a class from a day
    Remove {
        name: String,
        #[command(flatten)]
        day: DayArg,
    },
    /// List the classes for a day
    List {
        #[command(flatten)]
        day: DayArg,
    },
}

#[derive(Subcommand, Debug)]
enum ClockCommand {
    /// List the time slices
    Show,
    /// Click a cell: creates a five minute slice when the cell is empty
    Click {
        minute: u32,
        ring: Ring,
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Drag from a slice's cell toward another minute, one step at a time
    Extend {
        minute: u32,
        ring: Ring,
        to: u32,
        /// Drag counter-clockwise instead of clockwise
        #[arg(long)]
        backward: bool,
    },
    /// Rename the slice under a cell
    Rename { minute: u32, ring: Ring, name: String },
    /// Remove the slice under a cell
    Remove { minute: u32, ring: Ring },
    /// Remove every slice
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut cfg = Config::load_or_default().context("Failed to load configuration")?;

    // Settings location precedence: CLI arg > env var > config file
    if let Some(path) = cli.settings.clone().or_else(config::parse_settings_path) {
        cfg.settings_file = Some(path);
    }

    let mut core = ToolboxCore::open(cfg);

    match cli.command {
        Command::Pick { class, day, count } => run_pick(&mut core, &class, &day, count),
        Command::Class(cmd) => run_class(&mut core, cmd),
        Command::Clock(cmd) => run_clock(&mut core, cmd),
        Command::Timer {
            minutes,
            rest,
            rounds,
        } => run_timer(&core, minutes, rest, rounds),
        Command::Config { init } => {
            if init {
                init_config()?;
            }
            show_config(&core);
            Ok(())
        }
    }
}

fn run_pick(core: &mut ToolboxCore, class: &str, day: &DayArg, count: usize) -> Result<()> {
    let day = day.resolve()?;
    let count = if count > PICK_MAX_COUNT {
        warn!("Limiting pick to {} names", PICK_MAX_COUNT);
        PICK_MAX_COUNT
    } else {
        count
    };

    let names = core.pick(day, class, count)?;
    // Only an empty roster yields no names
    if names.is_empty() {
        println!("Class '{}' has no students.", class);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn run_class(core: &mut ToolboxCore, cmd: ClassCommand) -> Result<()> {
    match cmd {
        ClassCommand::Add {
            file,
            day,
            all_days,
        } => {
            let path = core.config.resolve_roster(&file);
            if all_days {
                let added = core.classes.add_class_all_days(&path)?;
                println!("Added {} to {} day(s).", path.display(), added);
            } else {
                let day = day.resolve()?;
                let class = core.classes.add_class(day, &path)?;
                println!(
                    "Added '{}' ({} students) to {}.",
                    class.name(),
                    class.len(),
                    day
                );
            }
            core.save_classes()
        }
        ClassCommand::Remove { name, day } => {
            let day = day.resolve()?;
            if core.classes.remove_class(day, &name).is_none() {
                bail!("No class named '{}' on {}", name, day);
            }
            println!("Removed '{}' from {}.", name, day);
            core.save_classes()
        }
        ClassCommand::List { day } => {
            let day = day.resolve()?;
            let classes = core.classes.classes(day);
            if classes.is_empty() {
                println!("No classes on {}.", day);
            }
            for class in classes {
                let source = class
                    .source_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<20} {:>4} students  {}", class.name(), class.len(), source);
            }
            Ok(())
        }
    }
}

fn run_clock(core: &mut ToolboxCore, cmd: ClockCommand) -> Result<()> {
    match cmd {
        ClockCommand::Show => {
            if core.clock.is_empty() {
                println!("No time slices.");
            }
            for slice in core.clock.to_vec() {
                println!("{}", slice);
            }
            return Ok(());
        }
        ClockCommand::Click { minute, ring, name } => {
            check_minute(minute)?;
            match core.clock.click(minute, ring, name) {
                ClickOutcome::Created(id) => println!("Created slice {}.", id),
                ClickOutcome::Existing(id) => println!("Cell belongs to slice {}.", id),
            }
        }
        ClockCommand::Extend {
            minute,
            ring,
            to,
            backward,
        } => {
            check_minute(minute)?;
            check_minute(to)?;
            let Some(id) = core.clock.cell(minute, ring) else {
                bail!("No slice at minute {} on the {} ring", minute, ring);
            };

            // Walk the pointer toward the target the way a drag would
            let step = if backward {
                MINUTES_PER_DIAL - MINUTES_PER_STEP
            } else {
                MINUTES_PER_STEP
            };
            let target = to - to % MINUTES_PER_STEP;
            let mut pointer = minute - minute % MINUTES_PER_STEP;
            let mut grown = 0;
            while pointer != target {
                pointer = (pointer + step) % MINUTES_PER_DIAL;
                if core.clock.extend_time_slice(id, pointer, ring) {
                    grown += 1;
                }
            }

            if let Some(slice) = core.clock.get(id) {
                println!("Grew slice {} by {} step(s): {}", id, grown, slice);
            }
        }
        ClockCommand::Rename { minute, ring, name } => {
            check_minute(minute)?;
            let Some(id) = core.clock.cell(minute, ring) else {
                bail!("No slice at minute {} on the {} ring", minute, ring);
            };
            core.clock.rename(id, name);
        }
        ClockCommand::Remove { minute, ring } => {
            check_minute(minute)?;
            match core.clock.remove_at(minute, ring) {
                Some(slice) => println!("Removed {}", slice),
                None => println!("Nothing at minute {} on the {} ring.", minute, ring),
            }
        }
        ClockCommand::Clear => core.clock.clear(),
    }
    core.save_clock()
}

fn check_minute(minute: u32) -> Result<()> {
    if minute >= MINUTES_PER_DIAL {
        bail!("Minute must be 0-{}, got {}", MINUTES_PER_DIAL - 1, minute);
    }
    Ok(())
}

fn run_timer(
    core: &ToolboxCore,
    minutes: Option<u64>,
    rest: Option<u64>,
    rounds: Option<u32>,
) -> Result<()> {
    let defaults = core.interval_plan();
    let plan = IntervalPlan::from_minutes(
        minutes.unwrap_or(defaults.work.as_secs() / 60),
        rest.unwrap_or(defaults.rest.as_secs() / 60),
        rounds.unwrap_or(defaults.rounds),
    )
    .context("Invalid timer settings")?;

    info!(
        "Starting timer: {} round(s), total {}",
        plan.rounds,
        timer::format_remaining(plan.total())
    );

    let mut t = IntervalTimer::new(plan);
    t.start();
    let tick = Duration::from_millis(TIMER_TICK_MS);
    println!("work 1/{}  {}", plan.rounds, timer::format_remaining(t.remaining()));

    while !t.is_finished() {
        thread::sleep(tick);
        for event in t.advance(tick) {
            match event {
                TimerEvent::PhaseStarted { phase, round } => {
                    println!("\x07{} {}/{}", phase, round, plan.rounds)
                }
                TimerEvent::Finished => println!("\x07Time's up!"),
            }
        }
        if t.is_running() {
            print!("\r{}  ", timer::format_remaining(t.remaining()));
            io::stdout().flush()?;
        }
    }
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Config::config_path();
    if path.exists() {
        println!("Config file already exists, leaving it unchanged.");
        return Ok(());
    }
    Config::default().save()?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn show_config(core: &ToolboxCore) {
    let plan = core.interval_plan();
    println!("Config file:    {}", Config::config_path().display());
    println!("Settings store: {}", core.store.path().display());
    match &core.config.roster_dir {
        Some(dir) => println!("Roster dir:     {}", dir.display()),
        None => println!("Roster dir:     (current directory)"),
    }
    println!(
        "Timer:          {} x {} work, {} rest",
        plan.rounds,
        timer::format_remaining(plan.work),
        timer::format_remaining(plan.rest)
    );
}
