use thiserror::Error;

/// Shown when an error carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Fehler beim Laden";

/// Everything that can end a lookup.
///
/// The UI distinguishes failures only by their message; none of them are retried.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The geocoder returned zero matches.
    #[error("Ort nicht gefunden")]
    NotFound,

    #[error("Netzwerkfehler: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{service} antwortete mit Status {status}: {body}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Ungültige Antwort von {service}: {source}")]
    Parse {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Ungültiges Datum in der Vorhersage: {0}")]
    InvalidDate(String),

    /// The parallel daily arrays of a forecast response differ in length.
    #[error("Unvollständige Vorhersage: {field} hat {actual} statt {expected} Einträge")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Other(String),
}

impl LookupError {
    /// Text for the single red error line.
    pub fn display_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            msg
        }
    }
}
