//! Store-location map on the contact page.
//!
//! The third-party maps script is loaded with `callback=initMap`; once it is
//! ready it calls the `initMap` global this crate installs at startup. Map
//! and marker options are plain serde structs turned into JS objects, and the
//! `google.maps` constructors are reached through `js_sys::Reflect` so the
//! crate needs no bindings for the vendor library.
//!
//! The `#map` element may override the defaults with `data-lat`, `data-lng`,
//! `data-zoom` and `data-title`.

#[cfg(test)]
#[path = "map_test.rs"]
mod map_test;

use serde::Serialize;

pub const MAP_ELEMENT_ID: &str = "map";

pub const DEFAULT_LAT: f64 = 5.9339;
pub const DEFAULT_LNG: f64 = -73.7174;
pub const DEFAULT_ZOOM: u8 = 15;
pub const MAX_ZOOM: u8 = 22;
pub const DEFAULT_MARKER_TITLE: &str = "Casa Bella - Calle 5 4, Guavatá, Colombia";

const PALETTE_TEXT: &str = "#1e40af";
const PALETTE_GEOMETRY: &str = "#f5f5f5";
const PALETTE_WHITE: &str = "#ffffff";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Styler {
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<String>,
    pub element_type: String,
    pub stylers: Vec<Styler>,
}

impl MapStyle {
    fn new(feature_type: Option<&str>, element_type: &str, color: &str) -> Self {
        Self {
            feature_type: feature_type.map(str::to_owned),
            element_type: element_type.to_owned(),
            stylers: vec![Styler { color: color.to_owned() }],
        }
    }
}

/// `google.maps.MapOptions` subset used by the shop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub styles: Vec<MapStyle>,
}

/// `google.maps.MarkerOptions` minus `map`, which is attached after construction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoreMap {
    pub options: MapOptions,
    pub marker: MarkerOptions,
}

/// Blue palette matching the site theme.
pub fn palette_styles() -> Vec<MapStyle> {
    vec![
        MapStyle::new(None, "geometry", PALETTE_GEOMETRY),
        MapStyle::new(None, "labels.text.stroke", PALETTE_WHITE),
        MapStyle::new(None, "labels.text.fill", PALETTE_TEXT),
        MapStyle::new(Some("administrative.locality"), "labels.text.fill", PALETTE_TEXT),
        MapStyle::new(Some("poi"), "labels.text.fill", PALETTE_TEXT),
        MapStyle::new(Some("road"), "geometry", PALETTE_WHITE),
        MapStyle::new(Some("road"), "labels.text.fill", PALETTE_TEXT),
    ]
}

impl Default for StoreMap {
    fn default() -> Self {
        Self::at(LatLng { lat: DEFAULT_LAT, lng: DEFAULT_LNG }, DEFAULT_ZOOM, DEFAULT_MARKER_TITLE)
    }
}

impl StoreMap {
    pub fn at(center: LatLng, zoom: u8, title: &str) -> Self {
        Self {
            options: MapOptions { center, zoom, styles: palette_styles() },
            marker: MarkerOptions { position: center, title: title.to_owned() },
        }
    }

    /// Defaults overridden by `lat`/`lng`/`zoom`/`title` lookups.
    ///
    /// Coordinates outside their valid ranges and unparsable values keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lat = parse_coordinate(lookup("lat").as_deref(), 90.0).unwrap_or(DEFAULT_LAT);
        let lng = parse_coordinate(lookup("lng").as_deref(), 180.0).unwrap_or(DEFAULT_LNG);
        let zoom = match lookup("zoom").map(|raw| raw.trim().parse::<u8>()) {
            Some(Ok(zoom)) if zoom <= MAX_ZOOM => zoom,
            _ => DEFAULT_ZOOM,
        };
        let title = lookup("title")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MARKER_TITLE.to_owned());
        Self::at(LatLng { lat, lng }, zoom, &title)
    }
}

fn parse_coordinate(raw: Option<&str>, limit: f64) -> Option<f64> {
    let Ok(value) = raw?.trim().parse::<f64>() else {
        return None;
    };
    (value.is_finite() && value.abs() <= limit).then_some(value)
}

#[cfg(feature = "hydrate")]
pub use dom::init_map;

#[cfg(feature = "hydrate")]
mod dom {
    use js_sys::{Array, Function, Reflect};
    use serde::Serialize;
    use wasm_bindgen::{JsCast, JsValue};

    use super::{MAP_ELEMENT_ID, StoreMap};

    #[derive(Debug, thiserror::Error)]
    enum MapError {
        #[error("global {0} is not available")]
        MissingGlobal(&'static str),
        #[error("element #{0} not found")]
        MissingElement(&'static str),
        #[error("could not encode options: {0}")]
        Encode(String),
        #[error("javascript error: {0}")]
        Js(String),
    }

    fn js_err(e: JsValue) -> MapError {
        MapError::Js(format!("{e:?}"))
    }

    /// Callback for the maps script; renders the store map into `#map`.
    pub fn init_map() {
        match mount() {
            Ok(()) => log::info!("store map initialized"),
            Err(e) => log::warn!("store map not initialized: {e}"),
        }
    }

    fn mount() -> Result<(), MapError> {
        let window = web_sys::window().ok_or(MapError::MissingGlobal("window"))?;
        let element = window
            .document()
            .and_then(|d| d.get_element_by_id(MAP_ELEMENT_ID))
            .ok_or(MapError::MissingElement(MAP_ELEMENT_ID))?;
        let store = StoreMap::from_lookup(|key| element.get_attribute(&format!("data-{key}")));

        let google = property(window.as_ref(), "google", "google")?;
        let maps = property(&google, "maps", "google.maps")?;
        let map_ctor = constructor(&maps, "Map", "google.maps.Map")?;
        let marker_ctor = constructor(&maps, "Marker", "google.maps.Marker")?;

        let options = to_js(&store.options)?;
        let map = Reflect::construct(&map_ctor, &Array::of2(element.as_ref(), &options)).map_err(js_err)?;

        let marker = to_js(&store.marker)?;
        Reflect::set(&marker, &JsValue::from_str("map"), &map).map_err(js_err)?;
        Reflect::construct(&marker_ctor, &Array::of1(&marker)).map_err(js_err)?;
        Ok(())
    }

    fn property(target: &JsValue, key: &str, path: &'static str) -> Result<JsValue, MapError> {
        let value = Reflect::get(target, &JsValue::from_str(key)).map_err(js_err)?;
        if value.is_undefined() || value.is_null() {
            return Err(MapError::MissingGlobal(path));
        }
        Ok(value)
    }

    fn constructor(target: &JsValue, key: &str, path: &'static str) -> Result<Function, MapError> {
        property(target, key, path)?
            .dyn_into::<Function>()
            .map_err(|_| MapError::MissingGlobal(path))
    }

    fn to_js<T: Serialize>(value: &T) -> Result<JsValue, MapError> {
        let json = serde_json::to_string(value).map_err(|e| MapError::Encode(e.to_string()))?;
        js_sys::JSON::parse(&json).map_err(js_err)
    }
}
