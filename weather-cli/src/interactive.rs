use std::{cell::Cell, rc::Rc};

use inquire::{InquireError, Select, Text};
use weather_core::{CityList, Forecast, ForecastOutcome, Session, StateChange};

use crate::{
    cli::{App, Service, print_forecast, print_not_found, print_unavailable, search},
    suggest::CitySuggester,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    Hourly,
    ToggleFavourite,
    SwitchUnits,
    OpenHistory,
    RemoveFromHistory,
    OpenFavourite,
    RemoveFavourite,
    Quit,
}

impl Action {
    fn label(&self, session: &Session) -> String {
        let state = session.state();
        match self {
            Action::Search => "Search for a city".to_string(),
            Action::Hourly => format!("Hourly forecast for {}", state.current_city),
            Action::ToggleFavourite if state.is_current_city_favourite() => {
                format!("Remove {} from favourites", state.current_city)
            }
            Action::ToggleFavourite => format!("Add {} to favourites", state.current_city),
            Action::SwitchUnits => format!("Switch to {} units", state.units.toggled()),
            Action::OpenHistory => "Open from search history".to_string(),
            Action::RemoveFromHistory => "Remove from search history".to_string(),
            Action::OpenFavourite => "Open a favourite".to_string(),
            Action::RemoveFavourite => "Remove a favourite".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }

    fn available(session: &Session) -> Vec<Action> {
        let state = session.state();
        let mut actions = vec![
            Action::Search,
            Action::Hourly,
            Action::ToggleFavourite,
            Action::SwitchUnits,
        ];
        if !state.history.is_empty() {
            actions.push(Action::OpenHistory);
            actions.push(Action::RemoveFromHistory);
        }
        if !state.favourites.is_empty() {
            actions.push(Action::OpenFavourite);
            actions.push(Action::RemoveFavourite);
        }
        actions.push(Action::Quit);
        actions
    }
}

/// Interactive viewer. The forecast is re-rendered whenever the current
/// city or the unit system changes.
pub async fn run(app: &App, session: &mut Session) -> anyhow::Result<()> {
    let service = app.service()?;

    let stale = Rc::new(Cell::new(true));
    let flag = Rc::clone(&stale);
    session.subscribe(move |change| {
        if matches!(change, StateChange::CurrentCity(_) | StateChange::Units(_)) {
            flag.set(true);
        }
    });

    let mut shown: Option<Forecast> = None;
    loop {
        if stale.replace(false) {
            shown = refresh(app, &service, session).await;
        }

        let actions = Action::available(session);
        let labels: Vec<String> = actions.iter().map(|a| a.label(session)).collect();
        let Some(choice) = cancellable(Select::new("What next?", labels.clone()).prompt())? else {
            break;
        };
        let Some(action) = labels
            .iter()
            .position(|l| *l == choice)
            .map(|idx| actions[idx])
        else {
            continue;
        };

        match action {
            Action::Search => {
                let suggester = CitySuggester::new(&session.state().history);
                let prompt = Text::new("City:").with_autocomplete(suggester).prompt();
                let Some(query) = cancellable(prompt)? else {
                    continue;
                };
                // The search already fetched the forecast for the new current city.
                if let Some(forecast) = search(&service, session, &query).await {
                    print_forecast(app, session, &forecast, false);
                    shown = Some(forecast);
                    stale.set(false);
                }
            }
            Action::Hourly => match &shown {
                Some(forecast) => print_forecast(app, session, forecast, true),
                None => println!("No weather data available."),
            },
            Action::ToggleFavourite => {
                let city = session.state().current_city.clone();
                if session.toggle_favourite() {
                    println!("Added {city} to favourites.");
                } else {
                    println!("Removed {city} from favourites.");
                }
            }
            Action::SwitchUnits => {
                let units = session.state().units.toggled();
                session.set_units(units);
            }
            Action::OpenHistory => {
                let cities = newest_first(&session.state().history);
                if let Some(city) = cancellable(Select::new("Recent searches:", cities).prompt())? {
                    session.open_city(&city);
                }
            }
            Action::RemoveFromHistory => {
                let cities = newest_first(&session.state().history);
                let prompt = Select::new("Forget which search?", cities).prompt();
                if let Some(city) = cancellable(prompt)? {
                    session.remove_from_history(&city);
                    println!("Removed {city} from history.");
                }
            }
            Action::OpenFavourite => {
                let cities = newest_first(&session.state().favourites);
                if let Some(city) = cancellable(Select::new("Favourites:", cities).prompt())? {
                    session.open_city(&city);
                }
            }
            Action::RemoveFavourite => {
                let cities = newest_first(&session.state().favourites);
                let prompt = Select::new("Remove which favourite?", cities).prompt();
                if let Some(city) = cancellable(prompt)? {
                    session.remove_favourite(&city);
                    println!("Removed {city} from favourites.");
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn refresh(app: &App, service: &Service, session: &Session) -> Option<Forecast> {
    let state = session.state();
    match service.forecast(&state.current_city, state.units).await {
        ForecastOutcome::Ready(forecast) => {
            print_forecast(app, session, &forecast, false);
            Some(forecast)
        }
        ForecastOutcome::NotFound => {
            print_not_found(&state.current_city);
            None
        }
        ForecastOutcome::Unavailable => {
            print_unavailable();
            None
        }
    }
}

fn newest_first(list: &CityList) -> Vec<String> {
    list.iter().rev().map(String::from).collect()
}

/// Esc and Ctrl-C end the prompt without being an error.
fn cancellable<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
