//! Positionering för besöksformuläret
//!
//! En förfrågan är alltid en enskild mätning med hög noggrannhet och en
//! tidsgräns. Den körs i en egen tråd; UI:t pollar resultatet varje frame
//! och räknar själv tiden, så att en hängande källa ändå blir ett fel.
//!
//! Tillstånd: `Idle → Requesting → {Resolved | Failed | Unsupported}`.

use serde::Deserialize;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::models::{Coordinates, LocationSettings, LocationSourceKind};

/// Tidsgräns för en positionsförfrågan
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Cihaz konumu desteklemiyor")]
    Unsupported,
    #[error("zaman aşımı")]
    Timeout,
    #[error("konum servisi kullanılamıyor ({0})")]
    Unavailable(String),
    #[error("geçersiz konum verisi")]
    InvalidData,
}

impl From<std::io::Error> for LocationError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            // Ingen gpsd igång: enheten saknar positionering
            ErrorKind::ConnectionRefused => Self::Unsupported,
            ErrorKind::TimedOut => Self::Timeout,
            ErrorKind::InvalidData => Self::InvalidData,
            _ => Self::Unavailable(e.to_string()),
        }
    }
}

/// Källa för en enskild positionsmätning
pub trait PositionSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Blockerar högst `timeout`. Tidigare mätningar återanvänds aldrig.
    fn current_position(&self, timeout: Duration) -> Result<Coordinates, LocationError>;
}

/// Enhet utan positionering
pub struct NoSource;

impl PositionSource for NoSource {
    fn name(&self) -> &'static str {
        "none"
    }

    fn current_position(&self, _timeout: Duration) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Fast position, för surfplattor som står på ett och samma ställe
pub struct FixedSource {
    coords: Option<Coordinates>,
}

impl FixedSource {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

impl PositionSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn current_position(&self, _timeout: Duration) -> Result<Coordinates, LocationError> {
        match self.coords {
            Some(c) if c.is_valid() => Ok(c),
            Some(_) => Err(LocationError::InvalidData),
            None => Err(LocationError::Unavailable("sabit konum ayarlanmamış".into())),
        }
    }
}

/// gpsd via dess JSON-protokoll över TCP
pub struct GpsdSource {
    address: String,
}

/// De fält ur en gpsd-rapport som behövs
#[derive(Debug, Deserialize)]
struct GpsdReport {
    class: String,
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
}

const GPSD_WATCH: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Längsta rad som läses från gpsd. SKY-rapporter är några kB.
const MAX_REPORT_LEN: u64 = 16 * 1024;

impl GpsdSource {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into() }
    }

    /// Tolka en rad från gpsd. Endast TPV med 2D/3D-fix ger en position.
    fn parse_report(line: &str) -> Option<Coordinates> {
        let report: GpsdReport = serde_json::from_str(line).ok()?;
        if report.class != "TPV" || report.mode < 2 {
            return None;
        }
        let coords = Coordinates::new(report.lat?, report.lon?);
        coords.is_valid().then_some(coords)
    }

    /// Ny anslutning per förfrågan, så bara rapporter efter `?WATCH` läses
    async fn read_fix(&self) -> Result<Coordinates, LocationError> {
        let mut stream = TcpStream::connect(self.address.as_str()).await?;
        stream.write_all(GPSD_WATCH).await?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();

        loop {
            line.clear();
            let read = (&mut reader)
                .take(MAX_REPORT_LEN)
                .read_line(&mut line)
                .await?;

            if read == 0 {
                return Err(LocationError::Unavailable("bağlantı kapandı".into()));
            }
            if read as u64 >= MAX_REPORT_LEN && !line.ends_with('\n') {
                warn!("gpsd-rad längre än {} byte, avbryter", MAX_REPORT_LEN);
                return Err(LocationError::InvalidData);
            }
            if let Some(coords) = Self::parse_report(line.trim()) {
                return Ok(coords);
            }
        }
    }
}

impl PositionSource for GpsdSource {
    fn name(&self) -> &'static str {
        "gpsd"
    }

    fn current_position(&self, timeout: Duration) -> Result<Coordinates, LocationError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(async {
            match tokio::time::timeout(timeout, self.read_fix()).await {
                Ok(result) => result,
                Err(_) => Err(LocationError::Timeout),
            }
        })
    }
}

/// Bygg källa enligt inställningarna
pub fn source_from_settings(settings: &LocationSettings) -> Arc<dyn PositionSource> {
    match settings.source {
        LocationSourceKind::Gpsd => Arc::new(GpsdSource::new(settings.gpsd_address.clone())),
        LocationSourceKind::Fixed => {
            let coords = settings
                .fixed_lat
                .zip(settings.fixed_lng)
                .map(|(lat, lng)| Coordinates::new(lat, lng));
            Arc::new(FixedSource::new(coords))
        }
        LocationSourceKind::Disabled => Arc::new(NoSource),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Idle,
    Requesting,
    Resolved(Coordinates),
    Failed(String),
    Unsupported,
}

struct PendingRequest {
    rx: oneshot::Receiver<Result<Coordinates, LocationError>>,
    started: Instant,
    timeout: Duration,
}

/// Positionsfältet i besöksformuläret
pub struct LocationCapture {
    state: LocationState,
    pending: Option<PendingRequest>,
}

impl Default for LocationCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationCapture {
    pub fn new() -> Self {
        Self {
            state: LocationState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == LocationState::Idle
    }

    pub fn is_requesting(&self) -> bool {
        self.state == LocationState::Requesting
    }

    /// Koordinater, bara när mätningen lyckades
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.state {
            LocationState::Resolved(c) => Some(c),
            _ => None,
        }
    }

    /// Statusrad under knappen "Konumu Al"
    pub fn status_text(&self) -> Option<String> {
        match &self.state {
            LocationState::Idle => None,
            LocationState::Requesting => Some("Konum alınıyor…".into()),
            LocationState::Resolved(_) => Some("Konum alındı".into()),
            LocationState::Failed(reason) => Some(format!("Konum alınamadı: {}", reason)),
            LocationState::Unsupported => Some(LocationError::Unsupported.to_string()),
        }
    }

    /// Starta en mätning. Ignoreras om en redan pågår.
    pub fn request(&mut self, source: Arc<dyn PositionSource>, timeout: Duration) {
        if self.is_requesting() {
            return;
        }

        let (tx, rx) = oneshot::channel();
        let source_name = source.name();
        let spawned = std::thread::Builder::new()
            .name("konum".into())
            .spawn(move || {
                let result = source.current_position(timeout);
                // Mottagaren kan redan ha gett upp efter tidsgränsen
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => {
                debug!("Positionsförfrågan startad ({})", source_name);
                self.state = LocationState::Requesting;
                self.pending = Some(PendingRequest {
                    rx,
                    started: Instant::now(),
                    timeout,
                });
            }
            Err(e) => {
                warn!("Kunde inte starta positionstråd: {}", e);
                self.state = LocationState::Failed(e.to_string());
            }
        }
    }

    /// Hämta resultat om det finns. Returnerar true när tillståndet ändrades.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = &mut self.pending else {
            return false;
        };

        let result = match pending.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                if pending.started.elapsed() < pending.timeout {
                    return false;
                }
                Err(LocationError::Timeout)
            }
            Err(TryRecvError::Closed) => {
                Err(LocationError::Unavailable("konum iş parçacığı sonlandı".into()))
            }
        };

        self.pending = None;
        self.apply(result);
        true
    }

    /// Tillbaka till Idle, t.ex. när formuläret töms
    pub fn reset(&mut self) {
        self.state = LocationState::Idle;
        self.pending = None;
    }

    fn apply(&mut self, result: Result<Coordinates, LocationError>) {
        self.state = match result {
            Ok(c) => {
                info!("Position mottagen: {}", c.display_short());
                LocationState::Resolved(c)
            }
            Err(LocationError::Unsupported) => {
                info!("Positionering stöds inte");
                LocationState::Unsupported
            }
            Err(e) => {
                warn!("Positionering misslyckades: {}", e);
                LocationState::Failed(e.to_string())
            }
        };
    }
}
