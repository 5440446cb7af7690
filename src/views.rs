//! HTML pages for the home, weather and stats views

use std::fmt::Write;

use crate::models::WeatherDisplay;

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif; margin: 2rem auto; max-width: 40rem; color: #222; }
    h1 { font-size: 1.6rem; }
    table { border-collapse: collapse; width: 100%; }
    th, td { text-align: left; padding: 0.3rem 0.6rem; border-bottom: 1px solid #ddd; }
    form input[type=text] { padding: 0.4rem; width: 60%; }
    a { color: #0366d6; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn home() -> String {
    page(
        "Weather forecast",
        r#"<h1>Weather forecast</h1>
<form action="/weather" method="get">
  <input type="text" name="city" placeholder="City name" required autofocus>
  <button type="submit">Get forecast</button>
</form>"#,
    )
}

pub fn weather(display: &WeatherDisplay) -> String {
    let city = escape(&display.city);
    let mut rows = String::new();
    for forecast in &display.forecasts {
        // Writing to a String cannot fail
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&forecast.date),
            escape(&forecast.temperature)
        );
    }

    page(
        &format!("Forecast for {}", display.city),
        &format!(
            r#"<h1>Forecast for {city}</h1>
<table>
<thead><tr><th>Date</th><th>Temperature</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<p><a href="/">Search another city</a></p>"#
        ),
    )
}

pub fn stats(cities: &[String]) -> String {
    let items: String = if cities.is_empty() {
        "<li>No cities queried yet</li>\n".to_string()
    } else {
        cities
            .iter()
            .map(|city| format!("<li>{}</li>\n", escape(city)))
            .collect()
    };

    page(
        "Recently queried cities",
        &format!(
            r#"<h1>Recently queried cities</h1>
<ol>
{items}</ol>
<p><a href="/">Back</a></p>"#
        ),
    )
}
