use geocoding::{Forward, Opencage, Point};
use itertools::Itertools;
use psdb_core::{entities::Address, gateways::geocode::GeoCodingGateway};

/// Forward geocoding with the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCage {
    api_key: Option<String>,
}

impl OpenCage {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            log::warn!("No OpenCage API key configured");
        }
        Self { api_key }
    }
}

fn address_to_forward_query_string(addr: &Address) -> String {
    let street = [addr.street.trim(), addr.number.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join(" ");
    let query = [street.as_str(), addr.city.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .join(",");
    query
}

impl GeoCodingGateway for OpenCage {
    fn resolve_address_lat_lng(&self, addr: &Address) -> Option<(f64, f64)> {
        if addr.is_empty() {
            return None;
        }
        let api_key = self.api_key.as_ref()?;
        let query = address_to_forward_query_string(addr);
        let res: Result<Vec<Point<f64>>, _> = Opencage::new(api_key.clone()).forward(&query);
        match res {
            Ok(points) => {
                let point = points.first()?;
                log::debug!("Resolved address location '{query}': {point:?}");
                Some((point.y(), point.x()))
            }
            Err(err) => {
                log::warn!("Failed to resolve address location '{query}': {err}");
                None
            }
        }
    }
}
