//! The fixed styling fragments injected into pages: stylesheet blocks for
//! entry pages and the index, the responsive polish stylesheet, the
//! wrapper containers, and the mobile viewport meta tag. These are plain
//! string templates; every styling pass appends its block, so re-running
//! a pass duplicates it rather than replacing it.

/// Mobile viewport meta tag, inserted as the first head child when a page
/// has none.
pub const VIEWPORT_META: &str = r#"<meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no">"#;

/// The wrapper every entry page's body content is moved into.
pub const ENTRY_CONTAINER: &str = r#"<div class="entry-container"></div>"#;

/// The wrapper the index page's paragraph and div children are moved into.
pub const INDEX_CONTAINER: &str = r#"<div class="entry-links"></div>"#;

/// Wraps a stylesheet in a `<style>` element ready for fragment parsing.
pub fn style_block(css: &str) -> String {
    format!("<style>{}</style>", css)
}

/// Shared styling for entry pages.
pub const ENTRY_STYLE: &str = "
body {
    font-family: Arial, sans-serif;
    background-color: #f8f9fa;
    margin: 20px;
    line-height: 1.5em;
}
h1, .pageHeader, .title {
    color: #2c3e50;
    font-weight: bold;
}
.entry-container {
    max-width: 900px;
    margin: auto;
    padding: 1.5em;
    background-color: #ffffff;
    border-radius: 12px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.1);
}
.assetGrid {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(120px, 1fr));
    gap: 8px;
    margin: 1em 0;
}
.gridItem {
    border-radius: 8px;
    overflow: hidden;
    box-shadow: 0 1px 5px rgba(0,0,0,0.1);
}
.gridItem img {
    width: 100%;
    height: 100%;
    object-fit: cover;
}
.bodyText, p {
    margin: 0.5em 0;
    font-size: 14px;
}
.p3 {
    display: none;
}
.entry-links .p2 {
    display: none;
}
div[id^=\"map_\"] {
    border-radius: 12px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.2);
}
";

/// Styling for the index page, including the combined map and legend.
pub const INDEX_STYLE: &str = "
body {
    font-family: Arial, sans-serif;
    background-color: #f8f9fa;
    margin: 10px;
    font-size: 16px;
}
h1 {
    text-align: center;
    color: #2c3e50;
    margin-bottom: 1em;
}
.entry-links {
    width: 95%;
    max-width: 1000px;
    margin: auto;
    padding: 1em;
    background-color: #ffffff;
    border-radius: 12px;
    box-shadow: 0 2px 8px rgba(0,0,0,0.1);
}
.entry-links p {
    margin: 0.5em 0;
    font-size: 16px;
}
#map_full_trip {
    width: 100%;
    max-height: 600px;
    height: 400px;
    margin: 2em auto;
    border-radius: 12px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.2);
}
.leaflet-popup-content {
    font-size: 14px;
}
.legend {
    background: white;
    padding: 10px;
    border-radius: 8px;
    box-shadow: 0 1px 5px rgba(0,0,0,0.3);
    line-height: 1.5em;
    cursor: pointer;
}
.legend span {
    display: inline-block;
    width: 12px;
    height: 12px;
    margin-right: 6px;
    border-radius: 50%;
}

@media (max-width: 600px) {
    .entry-links {
        padding: 0.5em;
    }
    #map_full_trip {
        height: 300px;
    }
    .entry-links p {
        font-size: 14px;
    }
}
";

/// The responsive polish stylesheet appended to every entry page at the
/// end of the run.
pub const ENTRY_RESPONSIVE_STYLE: &str = "
body {
    font-family: Arial, sans-serif;
    font-size: 16px;
    background-color: #f8f9fa;
    margin: 10px;
    line-height: 1.5em;
}
.container, .entry-container {
    width: 95%;
    max-width: 1000px;
    margin: auto;
    padding: 10px;
    background-color: #ffffff;
    border-radius: 12px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.1);
}
.gridItem {
    margin-bottom: 16px;
}
.gridItem img, img.asset_image {
    width: 100%;
    height: auto;
    object-fit: contain;
    display: block;
    border-radius: 8px;
}
.bodyText, p {
    margin: 0.5em 0;
    font-size: 14px;
}
#map_full_trip, .entryMap {
    width: 100%;
    max-height: 600px;
    height: 400px;
    margin: 1em auto;
    border-radius: 12px;
    box-shadow: 0 2px 12px rgba(0,0,0,0.2);
}

@media (max-width: 600px) {
    .assetGrid {
        display: flex !important;
    }
    .gridItem img, img.asset_image {
        width: 100%;
        height: auto;
    }
    #map_full_trip, .entryMap {
        height: 300px;
    }
    .asset_image {
        object-fit: contain !important;
    }
}
";
