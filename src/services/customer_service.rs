use tracing::info;

use crate::db::Database;
use crate::models::Customer;
use crate::utils::{AppError, AppResult};

/// Fritextfilter för kundlistan. Körs i minnet över hela listan.
#[derive(Debug, Default, Clone)]
pub struct CustomerFilter {
    pub query: String,
}

impl CustomerFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn apply<'c>(&self, customers: &'c [Customer]) -> Vec<&'c Customer> {
        customers
            .iter()
            .filter(|c| c.matches_query(&self.query))
            .collect()
    }
}

/// Kundflöde: validering framför kund-repositoryt
pub struct CustomerService<'a> {
    db: &'a Database,
}

impl<'a> CustomerService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<Customer>> {
        self.db.customers().find_all()
    }

    /// Skapa kund; namnet får inte vara tomt
    pub fn create(&self, mut customer: Customer) -> AppResult<Customer> {
        customer
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        self.db.customers().create(&mut customer)?;
        info!("Ny kund: {}", customer.name);
        Ok(customer)
    }

    /// Ersätt alla fält på en befintlig kund
    pub fn update(&self, customer: &Customer) -> AppResult<()> {
        customer
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        self.db.customers().update(customer)
    }

    /// Radera kund; besök som pekar på kunden lämnas kvar
    pub fn delete(&self, id: i64) -> AppResult<()> {
        self.db.customers().delete(id)?;
        info!("Kund {} raderad", id);
        Ok(())
    }
}
