use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
    pub mail: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub created_at: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_contact(mut self, phone: impl Into<String>, mail: impl Into<String>) -> Self {
        self.phone = phone.into();
        self.mail = mail.into();
        self
    }

    pub fn with_location(
        mut self,
        city: impl Into<String>,
        district: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        self.city = city.into();
        self.district = district.into();
        self.address = address.into();
        self
    }

    /// Alla sökbara fält sammanfogade med mellanslag
    pub fn search_text(&self) -> String {
        [
            self.name.as_str(),
            self.phone.as_str(),
            self.mail.as_str(),
            self.city.as_str(),
            self.district.as_str(),
            self.address.as_str(),
        ]
        .join(" ")
    }

    /// Skiftlägesokänslig delsträngsmatchning mot alla fält.
    /// Tom fråga matchar alla.
    pub fn matches_query(&self, query: &str) -> bool {
        self.search_text()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    /// "adress distrikt stad", används som navigationsmål
    pub fn address_line(&self) -> String {
        format!("{} {} {}", self.address, self.district, self.city)
            .trim()
            .to_string()
    }

    /// "stad / distrikt" för kortvisning
    pub fn region_display(&self) -> String {
        format!("{} / {}", self.city, self.district)
    }

    pub fn validate(&self) -> Result<(), CustomerValidationError> {
        if self.name.trim().is_empty() {
            return Err(CustomerValidationError::MissingName);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CustomerValidationError {
    #[error("Müşteri adı boş olamaz")]
    MissingName,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kutuyum() -> Customer {
        Customer::new("Kutuyum Ambalaj")
            .with_contact("+90 555 000 00 00", "info@kutuyum.com")
            .with_location("Manisa", "Akhisar", "Akhisar/Manisa")
    }

    #[test]
    fn test_matches_query_any_field() {
        let c = kutuyum();
        assert!(c.matches_query("kutuyum"));
        assert!(c.matches_query("MANISA"));
        assert!(c.matches_query("555 000"));
        assert!(c.matches_query(""));
        assert!(!c.matches_query("Balıkesir"));
    }

    #[test]
    fn test_address_line_trims_missing_parts() {
        assert_eq!(kutuyum().address_line(), "Akhisar/Manisa Akhisar Manisa");

        let only_city = Customer::new("X").with_location("İzmir", "", "");
        assert_eq!(only_city.address_line(), "İzmir");

        assert_eq!(Customer::new("Y").address_line(), "");
    }

    #[test]
    fn test_validation() {
        assert!(kutuyum().validate().is_ok());
        assert!(matches!(
            Customer::new("   ").validate(),
            Err(CustomerValidationError::MissingName)
        ));
    }
}
