use std::error::Error;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

mod api;
mod app;
mod case;
mod clock;
mod form;
mod locales;
mod models;
mod storage;
mod store;
mod ui;

use app::App;
use locales::Locale;
use storage::ThemePreference;

#[derive(Parser)]
#[command(name = "punchclock", version, about = "Terminal timer form for self-hosted time trackers")]
struct Cli {
    /// Tracker base URL, e.g. https://tracker.example.com
    #[arg(long)]
    server: Option<String>,

    /// Language for server messages and error text
    #[arg(long, value_enum)]
    locale: Option<Locale>,

    #[arg(long, value_enum)]
    theme: Option<ThemePreference>,

    /// Discard the stored token and prompt for a new one
    #[arg(long)]
    login: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(cli.server, cli.locale, cli.theme, cli.login);

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.needs_refresh {
            app.refresh_data();
        }

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(120))? {
            let event = event::read()?;
            if let Event::Key(key) = event {
                app.handle_key_event(key);
            }
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
