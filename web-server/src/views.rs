// web-server/src/views.rs
//! Server-rendered HTML fragments for the vehicle and trip listings.

use std::fmt::Write;

use common::models::trip::Trip;
use common::models::vehicle::Vehicle;

/// Renders listings into HTML. Swappable for a real template engine.
pub trait Renderer: Send + Sync {
    fn vehicles(&self, title: &str, vehicles: &[Vehicle]) -> String;
    fn trips(&self, token_id: i64, trips: &[Trip]) -> String;
}

/// Minimal fragment renderer, no templates
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFragments;

impl Renderer for HtmlFragments {
    fn vehicles(&self, title: &str, vehicles: &[Vehicle]) -> String {
        let mut html = String::new();
        let _ = write!(html, "<section class=\"vehicles\"><h2>{}</h2>", escape(title));

        if vehicles.is_empty() {
            html.push_str("<p>No vehicles found</p></section>");
            return html;
        }

        html.push_str("<ul>");
        for vehicle in vehicles {
            let _ = write!(
                html,
                "<li data-token-id=\"{}\"><h3>{}</h3>",
                vehicle.token_id,
                escape(&vehicle.display_name())
            );

            if let Some(tokens) = vehicle.earnings.as_ref().and_then(|e| e.total_tokens.as_deref()) {
                let _ = write!(html, "<p class=\"earnings\">{}</p>", escape(tokens));
            }

            if let Some(device) = &vehicle.aftermarket_device {
                let manufacturer = device.manufacturer.as_ref().map(|m| m.name.as_str()).unwrap_or("");
                let _ = write!(
                    html,
                    "<p class=\"device\">{} {} {}</p>",
                    escape(manufacturer),
                    escape(device.serial.as_deref().unwrap_or("")),
                    escape(device.address.as_deref().unwrap_or(""))
                );
            }

            if !vehicle.device_status_entries.is_empty() {
                html.push_str("<table class=\"status\">");
                for entry in &vehicle.device_status_entries {
                    let _ = write!(
                        html,
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        escape(&entry.signal_name),
                        escape(&entry.value),
                        escape(&entry.timestamp),
                        escape(&entry.source)
                    );
                }
                html.push_str("</table>");
            }

            if !vehicle.trips.is_empty() {
                html.push_str("<ol class=\"trips\">");
                for trip in &vehicle.trips {
                    trip_item(&mut html, trip);
                }
                html.push_str("</ol>");
            }

            let _ = write!(
                html,
                "<a href=\"/api/vehicle/{}/trips\">Trips</a></li>",
                vehicle.token_id
            );
        }
        html.push_str("</ul></section>");
        html
    }

    fn trips(&self, token_id: i64, trips: &[Trip]) -> String {
        let mut html = String::new();
        let _ = write!(html, "<section class=\"trips\" data-token-id=\"{}\">", token_id);

        if trips.is_empty() {
            html.push_str("<p>No trips found</p></section>");
            return html;
        }

        html.push_str("<ul>");
        for trip in trips {
            trip_item(&mut html, trip);
        }
        html.push_str("</ul></section>");
        html
    }
}

fn trip_item(html: &mut String, trip: &Trip) {
    let _ = write!(
        html,
        "<li><a href=\"{}\">{}</a> {} &ndash; {}</li>",
        escape(&trip_href(trip)),
        escape(&trip.id),
        escape(&trip.start.time),
        escape(&trip.end.time)
    );
}

/// Trace link carrying the trip's window, so the lookup needs no re-listing
pub fn trip_href(trip: &Trip) -> String {
    format!(
        "/api/trip/{}?start={}&end={}",
        urlencoding::encode(&trip.id),
        urlencoding::encode(&trip.start.time),
        urlencoding::encode(&trip.end.time)
    )
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::vehicle::{Definition, DeviceDataEntry};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_vehicle_list_renders_names_and_status() {
        let vehicle = Vehicle {
            token_id: 17,
            definition: Some(Definition {
                make: "Ford".to_string(),
                model: "F-150".to_string(),
                year: 2021,
            }),
            device_status_entries: vec![DeviceDataEntry {
                signal_name: "speed".to_string(),
                value: "42".to_string(),
                timestamp: "t".to_string(),
                source: "autopi".to_string(),
            }],
            ..Default::default()
        };

        let html = HtmlFragments.vehicles("My <vehicles>", &[vehicle]);
        assert!(html.contains("My &lt;vehicles&gt;"));
        assert!(html.contains("2021 Ford F-150"));
        assert!(html.contains("<td>speed</td><td>42</td>"));
        assert!(html.contains("/api/vehicle/17/trips"));
    }

    #[test]
    fn test_empty_listings() {
        assert!(HtmlFragments.vehicles("Mine", &[]).contains("No vehicles found"));
        assert!(HtmlFragments.trips(3, &[]).contains("No trips found"));
    }

    #[test]
    fn test_trip_list_links_to_trace() {
        let html = HtmlFragments.trips(3, &[Trip::new("t-1", "s", "e")]);
        assert!(html.contains("href=\"/api/trip/t-1?start=s&amp;end=e\""));
    }

    #[test]
    fn test_trip_link_encodes_id_and_window() {
        let trip = Trip::new("a/b?c#d%e", "2024-01-01T00:00:00+01:00", "2024-01-01 01:00");
        assert_eq!(
            trip_href(&trip),
            "/api/trip/a%2Fb%3Fc%23d%25e?start=2024-01-01T00%3A00%3A00%2B01%3A00&end=2024-01-01%2001%3A00"
        );

        let html = HtmlFragments.trips(3, &[trip]);
        assert!(html.contains("href=\"/api/trip/a%2Fb%3Fc%23d%25e?start="));
        // the visible label is the raw id, HTML-escaped only
        assert!(html.contains(">a/b?c#d%e</a>"));
    }

    #[test]
    fn test_vehicle_list_renders_trips() {
        let vehicle = Vehicle {
            token_id: 17,
            trips: vec![Trip::new("trip-a", "s", "e")],
            ..Default::default()
        };

        let html = HtmlFragments.vehicles("Mine", &[vehicle]);
        assert!(html.contains("<ol class=\"trips\">"));
        assert!(html.contains("href=\"/api/trip/trip-a?start=s&amp;end=e\""));
    }
}
