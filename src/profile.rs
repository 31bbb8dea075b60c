use serde::Serialize;

/// One row of output. A record exists only for IDs whose page came back with
/// a 200 and a recognizable profile tree; everything else is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Email text, or "NA" when the page lists no email section at all.
    #[serde(rename = "Email")]
    pub email: String,
    /// Free text exactly as rendered by the page, no normalization.
    #[serde(rename = "LastAccess")]
    pub last_access: String,
    /// Newline-joined course names, empty string if none.
    #[serde(rename = "Courses")]
    pub courses: String,
}
