//! Rail departure board extraction
//!
//! Reads the live departure board document served by the national rail
//! data API, so the display can talk to it directly instead of through a
//! pre-processing feed server.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::Deserialize;

use super::{ExtractError, Extractor, Titles};
use crate::model::{Board, Departure, Section};

/// Station name used when the board does not carry one
const UNKNOWN_STATION: &str = "Unknown Station";

/// Destination used when a service lists none
const UNKNOWN_DESTINATION: &str = "Unknown";

/// Estimate meaning "running to schedule"
const ON_TIME: &str = "On time";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DepartureBoard {
    location_name: Option<String>,
    // Empty lists arrive as `null`, not as `[]`
    train_services: Option<Vec<Service>>,
    bus_services: Option<Vec<Service>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Service {
    std: Option<String>,
    etd: Option<String>,
    service_type: Option<String>,
    destination: Option<Vec<Location>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Location {
    location_name: Option<String>,
}

impl Service {
    fn into_departure(self) -> Departure {
        let code = service_code(self.service_type.as_deref());
        let eta = eta_text(self.std.as_deref().unwrap_or(""), self.etd.as_deref());
        let destination = self
            .destination
            .unwrap_or_default()
            .into_iter()
            .last()
            .and_then(|location| location.location_name)
            .unwrap_or_else(|| String::from(UNKNOWN_DESTINATION));
        Departure::new(code, destination, eta)
    }
}

/// Extractor for rail departure board documents
///
/// Fills the `trains` slot; `buses` stays absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RailBoardExtractor;

impl Extractor for RailBoardExtractor {
    fn extract(&self, body: &[u8], titles: &Titles<'_>) -> Result<Board, ExtractError> {
        let board: DepartureBoard =
            serde_json::from_slice(body).map_err(|_| ExtractError::Malformed)?;

        let station = board.location_name.as_deref().unwrap_or(UNKNOWN_STATION);
        let mut section = Section::new(format!("{} - {}", titles.trains, station));

        let mut services: Vec<Service> = board
            .train_services
            .unwrap_or_default()
            .into_iter()
            .chain(board.bus_services.unwrap_or_default())
            .collect();
        // Zero-padded HH:MM sorts textually; stable, so ties keep feed order
        services.sort_by(|a, b| a.std.cmp(&b.std));

        for service in services {
            if section.push(service.into_departure()).is_err() {
                break;
            }
        }

        Ok(Board {
            buses: None,
            trains: Some(section),
        })
    }
}

/// Short code shown in the service column
fn service_code(service_type: Option<&str>) -> &'static str {
    match service_type {
        Some("bus") => "BUS",
        Some("ferry") => "FRY",
        Some("train") => "TRN",
        _ => "UNK",
    }
}

/// Scheduled time, with the estimate appended when it differs
fn eta_text(std: &str, etd: Option<&str>) -> String {
    match etd {
        None | Some(ON_TIME) => String::from(std),
        Some(estimate) => format!("{std} ({estimate})"),
    }
}
