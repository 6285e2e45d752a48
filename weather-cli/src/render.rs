use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use weather_core::{
    AppState, DailyForecast, Forecast, HourlyForecast, HourlyWeather, UnitSystem,
    icons::wind_direction_label,
};

const HOURS_SHOWN: usize = 24;

/// Display options shared by every forecast view.
#[derive(Debug, Clone, Copy)]
pub struct View {
    pub hourly: bool,
    pub glyphs: bool,
    pub favourite: bool,
}

pub fn forecast<Tz>(forecast: &Forecast, view: View, tz: &Tz, now: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let star = if view.favourite { " ★" } else { "" };
    let mut out = format!(
        "{}{star}  ({})\n",
        forecast.location.display_name(),
        forecast.units
    );

    match forecast.current(now) {
        Some(current) => out.push_str(&format!("Now: {}\n", hour_line(current, view.glyphs))),
        None => out.push_str("Now: no data available\n"),
    }

    out.push('\n');
    match &forecast.daily {
        Some(daily) => out.push_str(&daily_table(daily, forecast.units, view.glyphs, tz)),
        None => out.push_str("Daily forecast: no data available\n"),
    }

    if view.hourly {
        out.push('\n');
        match &forecast.hourly {
            Some(hourly) => out.push_str(&hourly_table(hourly, view.glyphs, tz, now)),
            None => out.push_str("Hourly forecast: no data available\n"),
        }
    }

    out
}

fn daily_table<Tz>(daily: &DailyForecast, units: UnitSystem, glyphs: bool, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let t = units.temperature_unit();
    let mut out = String::from("Daily forecast:\n");
    for day in daily.values() {
        let date = day.date.with_timezone(tz).format("%a %d %b");
        let glyph = glyph_prefix(day.glyph, glyphs);
        out.push_str(&format!(
            "  {date}  {glyph}{:>6.1}{t} (min {:.1}{t}, max {:.1}{t}, feels like {:.1}{t})  {}  wind {:.1} {}  rain {:.1} {}\n",
            day.day_temp,
            day.min_temp,
            day.max_temp,
            day.day_feels_like,
            day.description,
            day.wind_speed,
            day.units.wind_unit(),
            day.rain_volume,
            day.units.rain_unit(),
        ));
    }
    out
}

fn hourly_table<Tz>(hourly: &HourlyForecast, glyphs: bool, tz: &Tz, now: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::from("Hourly forecast:\n");
    let upcoming = hourly
        .range(now - chrono::Duration::minutes(59)..)
        .map(|(_, hour)| hour)
        .take(HOURS_SHOWN);

    for hour in upcoming {
        let time = hour.date.with_timezone(tz).format("%a %H:%M");
        out.push_str(&format!("  {time}  {}\n", hour_line(hour, glyphs)));
    }
    out
}

fn hour_line(hour: &HourlyWeather, glyphs: bool) -> String {
    let units = hour.units;
    let t = units.temperature_unit();
    format!(
        "{}{:.1}{t} (feels like {:.1}{t})  {}  wind {:.1} {} {}  humidity {}%  {} hPa  rain {:.1} {}",
        glyph_prefix(hour.glyph, glyphs),
        hour.temperature,
        hour.feels_like,
        hour.description,
        hour.wind_speed,
        units.wind_unit(),
        wind_direction_label(hour.wind_direction),
        hour.humidity,
        hour.pressure,
        hour.rain_1h,
        units.rain_unit(),
    )
}

fn glyph_prefix(glyph: char, enabled: bool) -> String {
    if enabled { format!("{glyph} ") } else { String::new() }
}

/// Most recent first.
pub fn history(state: &AppState) -> String {
    city_lines("Search history", state.history.iter().rev(), &state.current_city)
}

pub fn favourites(state: &AppState) -> String {
    city_lines("Favourite cities", state.favourites.iter().rev(), &state.current_city)
}

fn city_lines<'a>(title: &str, cities: impl Iterator<Item = &'a str>, current: &str) -> String {
    let mut out = format!("{title}:\n");
    let mut any = false;
    for city in cities {
        any = true;
        let marker = if city == current { "*" } else { " " };
        out.push_str(&format!(" {marker} {city}\n"));
    }
    if !any {
        out.push_str("   (empty)\n");
    }
    out
}
