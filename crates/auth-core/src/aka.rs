//! AKA challenge result
//!
//! An [`AkaResponse`] is produced once per authentication challenge by the
//! (external) AKA algorithm and then only read. It either carries a RES with
//! the derived cipher/integrity keys, or an AUTS re-synchronization token when
//! the network sequence number was out of range.

use bytes::Bytes;
use std::fmt;
use tracing::debug;

use crate::error::{AuthError, Result};

/// Cipher and integrity keys are 128 bits (3GPP TS 33.102)
const KEY_LEN: usize = 16;
/// AUTS is SQN_MS xor AK (48 bits) followed by MAC-S (64 bits)
const AUTS_LEN: usize = 14;
const RES_MIN_LEN: usize = 4;
const RES_MAX_LEN: usize = 16;

/// Immutable AKA response material `{ck, ik, auts, res}`
///
/// Every component is independently optional. Formatting renders each one
/// as a comma-separated list of byte values, or `null` when absent, which
/// keeps diagnostic logs deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AkaResponse {
    ck: Option<Bytes>,
    ik: Option<Bytes>,
    auts: Option<Bytes>,
    res: Option<Bytes>,
}

impl AkaResponse {
    /// Wrap externally computed authentication material as-is
    pub fn new(
        ck: Option<Bytes>,
        ik: Option<Bytes>,
        auts: Option<Bytes>,
        res: Option<Bytes>,
    ) -> Self {
        Self { ck, ik, auts, res }
    }

    /// Successful challenge: RES plus the derived session keys
    pub fn success(res: impl Into<Bytes>, ck: impl Into<Bytes>, ik: impl Into<Bytes>) -> Self {
        Self {
            ck: Some(ck.into()),
            ik: Some(ik.into()),
            auts: None,
            res: Some(res.into()),
        }
    }

    /// Sequence number mismatch: only the AUTS token is available
    pub fn synchronization_failure(auts: impl Into<Bytes>) -> Self {
        Self {
            auts: Some(auts.into()),
            ..Default::default()
        }
    }

    pub fn ck(&self) -> Option<&[u8]> {
        self.ck.as_deref()
    }

    pub fn ik(&self) -> Option<&[u8]> {
        self.ik.as_deref()
    }

    pub fn auts(&self) -> Option<&[u8]> {
        self.auts.as_deref()
    }

    pub fn res(&self) -> Option<&[u8]> {
        self.res.as_deref()
    }

    /// True when the challenge must be answered with AUTS instead of RES
    pub fn is_synchronization_failure(&self) -> bool {
        self.auts.is_some() && self.res.is_none()
    }

    /// Check component lengths against 3GPP TS 33.102
    pub fn validate(&self) -> Result<()> {
        match (&self.res, &self.auts) {
            (None, None) => return Err(AuthError::Empty),
            (Some(_), Some(_)) => return Err(AuthError::Ambiguous),
            _ => {}
        }

        if let Some(res) = &self.res {
            if !(RES_MIN_LEN..=RES_MAX_LEN).contains(&res.len()) {
                return Err(AuthError::InvalidLength {
                    field: "RES",
                    actual: res.len(),
                    expected: "4..=16",
                });
            }
        }
        check_exact("CK", self.ck.as_ref(), KEY_LEN, "16")?;
        check_exact("IK", self.ik.as_ref(), KEY_LEN, "16")?;
        check_exact("AUTS", self.auts.as_ref(), AUTS_LEN, "14")?;

        debug!("AKA response validated: {}", self);
        Ok(())
    }
}

fn check_exact(
    field: &'static str,
    value: Option<&Bytes>,
    len: usize,
    expected: &'static str,
) -> Result<()> {
    match value {
        Some(v) if v.len() != len => Err(AuthError::InvalidLength {
            field,
            actual: v.len(),
            expected,
        }),
        _ => Ok(()),
    }
}

fn write_bytes(f: &mut fmt::Formatter<'_>, value: Option<&Bytes>) -> fmt::Result {
    match value {
        None => f.write_str("null"),
        Some(bytes) => {
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", b)?;
            }
            Ok(())
        }
    }
}

/// Renders `AkaResponse{ck=.., ik=.., auts=.., res=..}` with each byte as an
/// unsigned decimal (`0..=255`), so `0xFF` prints as `255` rather than a
/// signed `-1`. Absent components print as `null`.
impl fmt::Display for AkaResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AkaResponse{ck=")?;
        write_bytes(f, self.ck.as_ref())?;
        f.write_str(", ik=")?;
        write_bytes(f, self.ik.as_ref())?;
        f.write_str(", auts=")?;
        write_bytes(f, self.auts.as_ref())?;
        f.write_str(", res=")?;
        write_bytes(f, self.res.as_ref())?;
        f.write_str("}")
    }
}
