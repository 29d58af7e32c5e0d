mod events;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use clap::{Parser as ClapParser, Subcommand};
use color_eyre::eyre::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use callhue::app::App;
use callhue::config::Config;
use callhue::settings::ringtone::FixedRingtone;
use callhue::settings::sound::SoundSettings;
use callhue::settings::{
    open_screen, Effect, JsonFileStore, PreferenceScreen, PreferenceValue, ScreenContext,
    SCREEN_NAMES,
};
use callhue::theme::{AccountHandle, ColorSet, ForegroundCall, ThemeColorManager};
use events::AppEvent;

#[derive(ClapParser, Debug)]
#[command(name = "callhue", about = "In-call theme colors and call settings")]
struct Cli {
    /// JSON config with theme constants, accounts and device profile.
    #[arg(short, long, default_value = "callhue.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the in-call color set for a call.
    Colors {
        /// Treat the call as spam.
        #[arg(long)]
        spam: bool,

        /// Phone account id of the call.
        #[arg(short, long)]
        account: Option<String>,

        /// No active call: use the account as the pending handle.
        #[arg(long)]
        no_call: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List the preferences of a settings screen.
    Settings {
        #[arg(value_parser = SCREEN_NAMES)]
        screen: String,

        /// Settings store file.
        #[arg(long, default_value = "callhue-settings.json")]
        store: PathBuf,
    },

    /// Change one preference on a settings screen.
    Set {
        #[arg(value_parser = SCREEN_NAMES)]
        screen: String,
        key: String,
        value: String,

        /// Settings store file.
        #[arg(long, default_value = "callhue-settings.json")]
        store: PathBuf,
    },

    /// Interactive preview of the in-call background.
    Preview,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_level = if matches!(cli.command, Command::Preview) { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Colors {
            spam,
            account,
            no_call,
            json,
        } => print_colors(&config, spam, account.map(AccountHandle::new), no_call, json),
        Command::Settings { screen, store } => list_settings(&config, &screen, &store),
        Command::Set {
            screen,
            key,
            value,
            store,
        } => set_preference(&config, &screen, &key, &value, &store),
        Command::Preview => run_preview(&config),
    }
}

fn print_colors(
    config: &Config,
    spam: bool,
    account: Option<AccountHandle>,
    no_call: bool,
    json: bool,
) -> Result<()> {
    let mut manager = ThemeColorManager::new(config.calculator());
    let colors = if no_call {
        manager.set_pending_account_handle(account);
        *manager.on_foreground_call_changed(None)
    } else {
        let call = ForegroundCall {
            account,
            is_spam: spam,
        };
        *manager.on_foreground_call_changed(Some(&call))
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&colors)?);
    } else {
        dump_colors(&colors);
    }
    Ok(())
}

fn dump_colors(colors: &ColorSet) {
    println!("primary            {}", colors.primary);
    println!("secondary          {}", colors.secondary);
    println!("background_top     {}", colors.background_top);
    println!("background_middle  {}", colors.background_middle);
    println!("background_bottom  {}", colors.background_bottom);
    println!("background_solid   {}", colors.background_solid);
}

fn screen_context(config: &Config, store: &Path) -> Result<ScreenContext> {
    let store = JsonFileStore::open(store)?;
    Ok(ScreenContext::new(Arc::new(store), config.device.clone()))
}

fn list_settings(config: &Config, name: &str, store: &Path) -> Result<()> {
    let ctx = screen_context(config, store)?;
    let ringtones = Arc::new(FixedRingtone(config.ringtone.clone()));

    let prefs = if name == "sound" {
        // Activation starts the ringtone lookup; wait for it so the summary is filled in.
        let mut screen = SoundSettings::initialize(ctx, ringtones);
        if let Some(effect) = screen.on_activate() {
            report_effect(&effect);
            return Ok(());
        }
        screen.wait_for_ringtone_summary(Duration::from_secs(2));
        screen.preferences().clone()
    } else {
        let mut screen = open_screen(name, ctx, ringtones)?;
        if let Some(effect) = screen.on_activate() {
            report_effect(&effect);
            return Ok(());
        }
        screen.preferences().clone()
    };

    println!("Settings: {name} ({} preferences)", prefs.len());
    println!();
    for pref in prefs.iter() {
        println!("  {pref}");
    }
    Ok(())
}

fn set_preference(config: &Config, name: &str, key: &str, value: &str, store: &Path) -> Result<()> {
    let ctx = screen_context(config, store)?;
    let ringtones = Arc::new(FixedRingtone(config.ringtone.clone()));
    let mut screen = open_screen(name, ctx, ringtones)?;

    let outcome = screen.on_preference_change(key, &PreferenceValue::parse(value))?;
    println!(
        "{key}: {}",
        if outcome.accepted { "accepted" } else { "not accepted" }
    );
    if let Some(effect) = &outcome.effect {
        report_effect(effect);
    }
    Ok(())
}

fn report_effect(effect: &Effect) {
    match effect {
        Effect::ShowToast(msg) => println!("  ! {msg}"),
        Effect::ShowDndDialog => {
            println!("  ! Do Not Disturb needs notification policy access; grant it first")
        }
        Effect::OpenNotificationPolicySettings => {
            println!("  ! open notification policy access settings")
        }
        Effect::Close => println!("  ! screen closed: system settings are not writable"),
    }
}

fn run_preview(config: &Config) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = run_tui(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_tui(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();

    events::spawn_key_reader(tx);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Nothing changes between events, so block until the next one.
        match rx.recv() {
            Ok(AppEvent::Key(key)) => app.handle_key(key),
            // Redraw at the new size.
            Ok(AppEvent::Resize) => {}
            Err(mpsc::RecvError) => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
