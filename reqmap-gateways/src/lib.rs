pub mod csv_source;
pub mod html_map;
pub mod nominatim;
pub mod opencage;

use reqmap_core::gateways::geocode;

fn transport_error(err: reqwest::Error) -> geocode::Error {
    geocode::Error::Transport(err.to_string())
}

fn response_error(err: impl ToString) -> geocode::Error {
    geocode::Error::Response(err.to_string())
}
