//! CSV-export av besökslistan

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::models::{Customer, Visit};
use crate::utils::date::format_date;

/// MIME-typ för exporterad fil
pub const CSV_MIME: &str = "text/csv";

/// Fasta kolumner i exporten
pub const CSV_HEADERS: [&str; 7] = ["id", "tarih", "musteri", "notlar", "sonuc", "lat", "lng"];

/// En exportrad; saknade värden är tomma strängar
#[derive(Debug, Clone, PartialEq)]
pub struct VisitExport {
    pub id: String,
    pub tarih: String,
    pub musteri: String,
    pub notlar: String,
    pub sonuc: String,
    pub lat: String,
    pub lng: String,
}

impl VisitExport {
    pub fn from_visit(visit: &Visit, customers: &[Customer]) -> Self {
        Self {
            id: visit.id.map(|id| id.to_string()).unwrap_or_default(),
            tarih: format_date(visit.date),
            musteri: visit.customer_name(customers).unwrap_or_default().to_string(),
            notlar: visit.notes.clone(),
            sonuc: visit.outcome.clone(),
            lat: visit.location.map(|c| c.lat.to_string()).unwrap_or_default(),
            lng: visit.location.map(|c| c.lng.to_string()).unwrap_or_default(),
        }
    }

    fn cells(&self) -> [&str; 7] {
        [
            self.id.as_str(),
            self.tarih.as_str(),
            self.musteri.as_str(),
            self.notlar.as_str(),
            self.sonuc.as_str(),
            self.lat.as_str(),
            self.lng.as_str(),
        ]
    }
}

/// Export-tjänst över den aktuella besökslistan i minnet
pub struct ExportService<'a> {
    visits: &'a [Visit],
    customers: &'a [Customer],
}

impl<'a> ExportService<'a> {
    pub fn new(visits: &'a [Visit], customers: &'a [Customer]) -> Self {
        Self { visits, customers }
    }

    /// Filnamn för export, t.ex. visits_2024-05-01.csv
    pub fn generate_filename(date: NaiveDate) -> String {
        format!("visits_{}.csv", format_date(date))
    }

    pub fn rows(&self) -> Vec<VisitExport> {
        self.visits
            .iter()
            .map(|v| VisitExport::from_visit(v, self.customers))
            .collect()
    }

    /// Rubrikrad plus en citerad rad per besök, radbrytning \n.
    /// Tom lista ger tomt dokument.
    pub fn to_csv(&self) -> String {
        let rows = self.rows();
        if rows.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(CSV_HEADERS.join(","));

        for row in &rows {
            let cells: Vec<String> = row.cells().iter().map(|c| Self::csv_escape(c)).collect();
            lines.push(cells.join(","));
        }

        lines.join("\n")
    }

    /// Skriv CSV till fil
    pub fn export_to_file(&self, path: &Path) -> Result<ExportResult> {
        let content = self.to_csv();

        std::fs::write(path, &content)
            .with_context(|| format!("Kunde inte skriva {}", path.display()))?;

        tracing::info!(
            "Exporterade {} besök till {} ({}, {} bytes)",
            self.visits.len(),
            path.display(),
            CSV_MIME,
            content.len()
        );

        Ok(ExportResult {
            row_count: self.visits.len(),
            file_size: content.len(),
        })
    }

    /// Alla värden citeras, inre citattecken dubbleras
    fn csv_escape(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

/// Resultat av export
#[derive(Debug)]
pub struct ExportResult {
    pub row_count: usize,
    pub file_size: usize,
}

impl ExportResult {
    pub fn summary(&self) -> String {
        format!("{} ziyaret dışa aktarıldı ({} bayt)", self.row_count, self.file_size)
    }
}
