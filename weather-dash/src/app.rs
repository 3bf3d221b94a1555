use std::io;
use std::path::Path;

use anyhow::Context;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Runtime;
use weather_core::{CityStore, DailyTemps, OpenWeatherClient, Units, WeatherApp, chart};

const NO_API: &str = "API not available. Using placeholder data.";

/// What the dashboard is currently charting.
pub struct ChartData {
    pub title: String,
    pub days: Vec<DailyTemps>,
}

/// Dashboard state driven by the event loop. When no API key resolves the
/// controller is absent and the dashboard runs in demo mode.
pub struct Dashboard {
    controller: Option<WeatherApp>,
    runtime: Runtime,
    pub units: Units,
    pub input: String,
    pub summary: Vec<String>,
    pub status: String,
    pub chart: ChartData,
    pub favorites: Option<Vec<String>>,
    quit: bool,
}

/// Build the dashboard and run it on the alternate screen. Every user
/// action blocks the UI thread for its full duration.
pub fn run(api_key: Option<String>, data_dir: &Path, units: Units) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let controller = match api_key {
        Some(key) => {
            let client = OpenWeatherClient::new(key)?.with_units(units);
            let store = CityStore::open(data_dir)?;
            Some(WeatherApp::new(Box::new(client), store))
        }
        None => None,
    };

    tracing::info!(data_dir = %data_dir.display(), demo = controller.is_none(), "starting dashboard");

    let mut dashboard = Dashboard::new(controller, runtime, units);

    enable_raw_mode().context("failed to enter raw mode")?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = dashboard.event_loop(&mut terminal);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

impl Dashboard {
    fn new(controller: Option<WeatherApp>, runtime: Runtime, units: Units) -> Self {
        let mut dashboard = Self {
            controller,
            runtime,
            units,
            input: String::new(),
            summary: Vec::new(),
            status: String::new(),
            chart: ChartData { title: String::new(), days: Vec::new() },
            favorites: None,
            quit: false,
        };

        dashboard.show_placeholder();
        if dashboard.controller.is_none() {
            dashboard.status =
                "OPENWEATHER_API_KEY not set! Using placeholder data.".to_string();
        }
        dashboard
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        while !self.quit {
            terminal.draw(|frame| crate::ui::draw(frame, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.favorites.is_some() {
            // Any key dismisses the favorites popup.
            self.favorites = None;
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.quit = true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.quit = true,
            (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.add_favorite(),
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => self.list_favorites(),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.remove_favorite(),
            (KeyCode::Enter, _) => self.search(),
            (KeyCode::Backspace, _) => {
                self.input.pop();
            }
            (KeyCode::Char(ch), modifiers)
                if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
            {
                self.input.push(ch);
            }
            _ => {}
        }
    }

    /// Reset summary and chart to the fixed demo dataset.
    fn show_placeholder(&mut self) {
        self.summary = vec![
            "Welcome to Weather Dashboard!".to_string(),
            "Search a city to see real weather data.".to_string(),
        ];
        self.chart = ChartData {
            title: chart::PLACEHOLDER_CITY.to_string(),
            days: chart::daily_min_max(&chart::placeholder_forecast().list),
        };
    }

    fn search(&mut self) {
        let Some(controller) = &self.controller else {
            self.status = NO_API.to_string();
            self.show_placeholder();
            return;
        };

        let city = self.input.trim().to_string();
        if city.is_empty() {
            self.status = "Please enter a city name.".to_string();
            return;
        }

        match self.runtime.block_on(controller.search_city(&city)) {
            Ok(outcome) => {
                let symbol = self.units.symbol();
                self.summary = vec![
                    format!("Weather for {}", outcome.display_name),
                    format!(
                        "Temp: {:.1}{symbol}, Feels: {:.1}{symbol}, {}",
                        outcome.current.main.temp,
                        outcome.current.main.feels_like,
                        outcome.current.description(),
                    ),
                ];
                self.chart = ChartData {
                    title: outcome.display_name,
                    days: chart::daily_min_max(&outcome.forecast.list),
                };
                self.status.clear();
            }
            Err(err) => {
                // Fall back to the placeholder rather than leaving a stale
                // chart next to the error.
                self.status = err.to_string();
                self.show_placeholder();
            }
        }
    }

    fn add_favorite(&mut self) {
        let Some(controller) = &self.controller else {
            self.status = NO_API.to_string();
            return;
        };

        let city = self.input.trim().to_string();
        if city.is_empty() {
            self.status = "Enter city to add to favorites.".to_string();
            return;
        }

        match self.runtime.block_on(controller.add_favorite_by_search(&city)) {
            Ok(true) => self.status = "Added to favorites.".to_string(),
            Ok(false) => self.status = "Already in favorites.".to_string(),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn list_favorites(&mut self) {
        let Some(controller) = &self.controller else {
            self.status = NO_API.to_string();
            return;
        };

        match controller.favorites() {
            Ok(favorites) if favorites.is_empty() => {
                self.status = "No favorites yet.".to_string();
            }
            Ok(favorites) => {
                self.favorites =
                    Some(favorites.into_iter().map(|favorite| favorite.name).collect());
            }
            Err(err) => self.status = err.to_string(),
        }
    }

    fn remove_favorite(&mut self) {
        let Some(controller) = &self.controller else {
            self.status = NO_API.to_string();
            return;
        };

        let city = self.input.trim().to_string();
        if city.is_empty() {
            self.status = "Enter city to remove from favorites.".to_string();
            return;
        }

        match controller.remove_favorite(&city) {
            Ok(true) => self.status = "Removed.".to_string(),
            Ok(false) => self.status = "Not found.".to_string(),
            Err(err) => self.status = err.to_string(),
        }
    }
}
