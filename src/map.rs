//! Assembles the embedded Leaflet map blocks. The generated markup is
//! plain string interpolation: a container div, the Leaflet CDN link and
//! script tags, a tile layer, and one marker statement per visit. The
//! only escaping required is popup text: popups are interpolated into a
//! double-quoted `bindPopup` argument, so double quotes inside the text
//! are substituted with single quotes before interpolation.
//!
//! Coordinates pass through untouched: out-of-range values produce a
//! broken map at render time, not an error here.

use crate::sidecar::Visit;

pub const LEAFLET_CSS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// The id of the combined map container on the index page.
pub const TRIP_MAP_ID: &str = "map_full_trip";

/// Marker colors assigned to distinct dates on the combined map, in
/// assignment order. More dates than colors wrap around and share.
pub const DAY_PALETTE: [&str; 15] = [
    "red",
    "blue",
    "green",
    "orange",
    "purple",
    "darkred",
    "cadetblue",
    "darkgreen",
    "darkblue",
    "magenta",
    "lime",
    "orangered",
    "lightgray",
    "beige",
    "black",
];

/// A visit tagged with the color and date of the entry it came from, for
/// the combined map.
pub struct TaggedVisit {
    pub visit: Visit,
    pub color: &'static str,
    pub date: String,
}

/// Popup text for a visit. Double quotes would close the surrounding
/// `bindPopup("...")` argument early, so they become single quotes.
fn popup_text(visit: &Visit) -> String {
    format!("<b>{}</b><br><i>{}</i>", visit.place_name, visit.city).replace('"', "'")
}

/// The `[lat,lon],...` list handed to `L.latLngBounds`.
fn bounds_list(coordinates: impl Iterator<Item = (f64, f64)>) -> String {
    coordinates
        .map(|(lat, lon)| format!("[{},{}]", lat, lon))
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the per-entry map block: one pin marker per visit and a bounds
/// fit spanning all of them. `map_id` must be unique within the page.
pub fn entry_map(map_id: &str, visits: &[Visit]) -> String {
    let mut markers = String::new();
    for visit in visits {
        markers.push_str(&format!(
            "L.marker([{lat},{lon}]).addTo(map).bindPopup(\"{popup}\");\n",
            lat = visit.latitude,
            lon = visit.longitude,
            popup = popup_text(visit),
        ));
    }
    format!(
        r#"
<div id="{map_id}" style="height: 400px; margin: 2em 0;"></div>
<link href="{css}" rel="stylesheet"/>
<script src="{js}"></script>
<script>
var map = L.map('{map_id}');
L.tileLayer('{tiles}', {{
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);

var bounds = L.latLngBounds([{bounds}]);
map.fitBounds(bounds);

{markers}</script>
"#,
        map_id = map_id,
        css = LEAFLET_CSS_URL,
        js = LEAFLET_JS_URL,
        tiles = TILE_URL,
        bounds = bounds_list(visits.iter().map(|v| (v.latitude, v.longitude))),
        markers = markers,
    )
}

/// Builds the combined trip map block for the index page: one circle
/// marker per tagged visit, a clickable per-day legend, and the
/// day-filter script. Clicking a day shows only that day's markers and
/// refits the view to them; clicking it again restores all markers.
pub fn trip_map(visits: &[TaggedVisit], days: &[(String, &'static str)]) -> String {
    let mut markers = String::new();
    for tagged in visits {
        markers.push_str(&format!(
            "var marker = L.circleMarker([{lat},{lon}], {{color:'{color}', radius:8}});\n\
             marker.addTo(map).bindPopup(\"{popup}\");\n\
             marker._day_color = \"{color}\";\n\
             markers.push(marker);\n",
            lat = tagged.visit.latitude,
            lon = tagged.visit.longitude,
            color = tagged.color,
            popup = popup_text(&tagged.visit),
        ));
    }
    format!(
        r#"
<div id="{map_id}" style="height: 500px; margin-top: 2em;"></div>
{legend}
<link href="{css}" rel="stylesheet"/>
<script src="{js}"></script>
<script>
var map = L.map('{map_id}');
L.tileLayer('{tiles}', {{
    maxZoom: 19,
    attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);

var markers = [];
var bounds_all = L.latLngBounds([{bounds}]);
map.fitBounds(bounds_all);

{markers}
var activeColor = null;
function toggleMarkers(color) {{
    var visibleMarkers = [];
    if (activeColor === color) {{
        markers.forEach(m => {{
            map.addLayer(m);
            visibleMarkers.push(m);
        }});
        activeColor = null;
    }} else {{
        markers.forEach(m => {{
            if (m._day_color === color) {{
                map.addLayer(m);
                visibleMarkers.push(m);
            }} else {{
                map.removeLayer(m);
            }}
        }});
        activeColor = color;
    }}
    if (visibleMarkers.length > 0) {{
        var group = L.featureGroup(visibleMarkers);
        map.fitBounds(group.getBounds().pad(0.1));
    }}
}}
</script>
"#,
        map_id = TRIP_MAP_ID,
        legend = legend_html(days),
        css = LEAFLET_CSS_URL,
        js = LEAFLET_JS_URL,
        tiles = TILE_URL,
        bounds = bounds_list(visits.iter().map(|t| (t.visit.latitude, t.visit.longitude))),
        markers = markers,
    )
}

/// One swatch plus an underlined date label per distinct day, both wired
/// to the same `toggleMarkers` call.
fn legend_html(days: &[(String, &'static str)]) -> String {
    let mut html = String::from(
        "<div class='legend' style='margin-bottom:10px;'><b>Click a day to filter markers:</b><br>",
    );
    for (date, color) in days {
        html.push_str(&format!(
            "<span style='background:{color};width:16px;height:16px;display:inline-block;\
             margin-right:6px;border-radius:50%;vertical-align:middle;' \
             onclick='toggleMarkers(\"{color}\")'></span>\
             <span onclick='toggleMarkers(\"{color}\")' \
             style='text-decoration: underline; margin-right: 15px;'>{date}</span>",
            color = color,
            date = date,
        ));
    }
    html.push_str("</div>");
    html
}
