//! Server-rendered pages for the location management screen.

use std::fmt::Write;

use crate::config::Config;
use crate::models::Location;

const PLACEHOLDER_LOCATION: &str = "/static/placeholder-location.jpg";
const PLACEHOLDER_STAMP: &str = "/static/placeholder-stamp.jpg";

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#f9fafb;color:#111827}\
nav{background:#111827;color:#fff;padding:12px 24px}\
main{max-width:72rem;margin:0 auto;padding:32px 16px}\
ul.locations{list-style:none;padding:0;background:#fff;border-radius:8px;box-shadow:0 10px 30px rgba(0,0,0,.15)}\
ul.locations li a{display:flex;justify-content:space-between;gap:24px;padding:20px 24px;color:inherit;text-decoration:none;border-bottom:1px solid #f3f4f6}\
ul.locations li a:hover{background:#f9fafb}\
.hero{width:80px;height:48px;object-fit:cover;border-radius:8px;background:#f3f4f6}\
.stamp{width:48px;height:48px;object-fit:cover;border:1px solid #e5e7eb}\
.muted{color:#6b7280}.error{color:#dc2626;text-align:center}\
.panel{background:#fff;border-radius:8px;padding:24px;max-width:32rem;margin:0 auto;box-shadow:0 10px 30px rgba(0,0,0,.15)}\
.danger{background:#dc2626;color:#fff;border:0;padding:8px 32px;border-radius:8px;font-weight:600;cursor:pointer}\
.divider{border-top:1px dashed #d4d4d4;margin-top:16px;padding-top:8px}";

/// Escapes text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Name as it may appear inside a single-quoted JS string in an HTML attribute.
/// Drops the characters that would end or break that literal.
fn js_label(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|&c| !matches!(c, '\\' | '\'' | '\u{2028}' | '\u{2029}') && !c.is_control())
        .collect();
    escape(&kept)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
        <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
        <nav><strong>Location Management</strong></nav>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn image(src: &str, alt: &str, class: &str, fallback: &str) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" class=\"{}\" onerror=\"this.onerror=null;this.src='{}'\">",
        escape(src),
        escape(alt),
        class,
        fallback
    )
}

fn stamp_url(config: &Config, location: &Location) -> String {
    location
        .stamp_image()
        .map(|file| config.stamp_image_url(file))
        .unwrap_or_else(|| PLACEHOLDER_STAMP.to_string())
}

pub fn location_list(config: &Config, locations: &[Location]) -> String {
    let mut body = String::from(
        "<div class=\"header\"><h1>Location Management</h1>\
        <p class=\"muted\">Manage all active locations</p></div>\n",
    );

    if locations.is_empty() {
        body.push_str(
            "<div class=\"empty\"><p class=\"muted\">No active locations found</p>\
            <a href=\"/admin/locations?refresh=true\">Refresh</a></div>",
        );
        return layout("Location Management", &body);
    }

    body.push_str("<ul class=\"locations\">\n");
    for location in locations {
        let hero = config.hero_image_url(&location.hero_image_or_derived());
        let _ = write!(
            body,
            "<li><a href=\"/admin/locations/{id}\">\
            <div class=\"summary\">{hero}<div><p><strong>{name}</strong></p>\
            <p class=\"muted\">{place}</p></div></div>\
            <div>{stamp}</div></a></li>\n",
            id = location.id,
            hero = image(&hero, &format!("{} hero image", location.name), "hero", PLACEHOLDER_LOCATION),
            name = escape(&location.name),
            place = escape(&location.place_label()),
            stamp = image(
                &stamp_url(config, location),
                &format!("{} stamp", location.name),
                "stamp",
                PLACEHOLDER_STAMP,
            ),
        );
    }
    body.push_str("</ul>");

    layout("Location Management", &body)
}

pub fn location_detail(config: &Config, location: &Location) -> String {
    let hero = config.hero_image_url(&location.hero_image_or_derived());
    let stamp = stamp_url(config, location);
    let stamp_name = location
        .stamp_image()
        .map(|file| file.rsplit_once('.').map_or(file, |(stem, _)| stem))
        .unwrap_or("No stamp");

    let coordinates = match (location.latitude, location.longitude) {
        (Some(lat), Some(lng)) => format!("{lat:.4}, {lng:.4}"),
        _ => "Not set".to_string(),
    };
    let geofence = location
        .geofence_radius
        .map(|r| format!("{r} m"))
        .unwrap_or_else(|| "Not set".to_string());

    let body = format!(
        "<div class=\"panel\">\
        <div class=\"title\"><h3>{name}</h3><a href=\"/admin/locations\">Close</a></div>\
        {hero}\
        <div class=\"row\"><div><p class=\"muted\">Location</p><p>{place}</p></div>\
        <div><p class=\"muted\">Stamp</p><a href=\"{stamp_href}\" target=\"_blank\">{stamp_img}</a></div></div>\
        <div class=\"divider\"><p class=\"muted\">Stamp Image Name</p><p>{stamp_name}</p></div>\
        <div class=\"divider\"><p class=\"muted\">Geofence Radius</p><p>{geofence}</p>\
        <p class=\"muted\">Coordinates</p><p>{coordinates}</p></div>\
        <div class=\"divider\">\
        <form method=\"post\" action=\"/admin/locations/{id}/deactivate\" \
        onsubmit=\"return confirm('Set {js_name} to inactive?')\">\
        <button type=\"submit\" class=\"danger\">Set to Inactive</button></form></div>\
        <p><a href=\"/admin/locations\">Close</a></p>\
        </div>",
        id = location.id,
        name = escape(&location.name),
        js_name = js_label(&location.name),
        hero = image(&hero, &format!("{} hero image", location.name), "hero-large", PLACEHOLDER_LOCATION),
        place = escape(&location.place_label()),
        stamp_href = escape(&stamp),
        stamp_img = image(&stamp, &format!("{} stamp", location.name), "stamp", PLACEHOLDER_STAMP),
        stamp_name = escape(stamp_name),
    );

    layout(&location.name, &body)
}

pub fn error_page(message: &str) -> String {
    layout(
        "Location Management",
        &format!(
            "<p class=\"error\">Error loading locations: {}</p>",
            escape(message)
        ),
    )
}

pub fn not_found_page(what: &str) -> String {
    layout(
        "Not found",
        &format!(
            "<p class=\"error\">{} was not found.</p><p><a href=\"/admin/locations\">Back to locations</a></p>",
            escape(what)
        ),
    )
}
