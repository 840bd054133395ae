//! Länkar till extern kart- och navigationstjänst

use crate::models::{Coordinates, Customer};

/// Visa en punkt på kartan
pub fn map_view_url(coords: &Coordinates) -> String {
    format!("https://maps.google.com/?q={}", coords.as_query())
}

/// Starta vägbeskrivning till ett färdigt destinationsvärde
pub fn navigation_url(destination: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={}&travelmode=driving",
        destination
    )
}

/// Navigationsmål: koordinater om de finns, annars kundens URL-kodade adress.
/// None när varken koordinater eller adress finns.
pub fn destination_param(coords: Option<&Coordinates>, customer: Option<&Customer>) -> Option<String> {
    if let Some(c) = coords {
        return Some(c.as_query());
    }

    let address = customer.map(Customer::address_line).unwrap_or_default();
    if address.is_empty() {
        return None;
    }

    Some(urlencoding::encode(&address).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_view_url() {
        let c = Coordinates::new(40.123456, 29.654321);
        assert_eq!(map_view_url(&c), "https://maps.google.com/?q=40.123456,29.654321");
    }

    #[test]
    fn test_destination_prefers_coordinates() {
        let c = Coordinates::new(38.5, 27.25);
        let customer = Customer::new("Esin Ofset").with_location("Balıkesir", "Merkez", "Balıkesir");
        assert_eq!(
            destination_param(Some(&c), Some(&customer)).as_deref(),
            Some("38.5,27.25")
        );
    }

    #[test]
    fn test_destination_falls_back_to_encoded_address() {
        let customer = Customer::new("Kutuyum").with_location("Manisa", "Akhisar", "Akhisar/Manisa");
        let dest = destination_param(None, Some(&customer)).unwrap();
        assert_eq!(dest, "Akhisar%2FManisa%20Akhisar%20Manisa");
        assert_eq!(
            navigation_url(&dest),
            "https://www.google.com/maps/dir/?api=1&destination=Akhisar%2FManisa%20Akhisar%20Manisa&travelmode=driving"
        );
    }

    #[test]
    fn test_no_destination_without_address() {
        assert_eq!(destination_param(None, None), None);
        assert_eq!(destination_param(None, Some(&Customer::new("X"))), None);
    }
}
