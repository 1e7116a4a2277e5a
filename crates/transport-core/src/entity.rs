use serde::{Deserialize, Serialize};
use std::fmt;

/// Protocol family a message, route or router belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Sip,
    Msrp,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Sip => "SIP",
            EntityType::Msrp => "MSRP",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
