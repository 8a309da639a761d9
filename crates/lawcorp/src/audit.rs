//! Append-only audit log with a SHA-256 hash chain.
//!
//! Every mutation commits exactly one audit entry. The store seals the entry
//! at commit time: it assigns the id and timestamp and links the record to
//! its predecessor through `previous_hash`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::{FirmRole, PersonId};

/// Unique identifier for an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(pub u64);

impl std::fmt::Display for AuditId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Surface a mutation arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Mcp,
    Cli,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mcp => "mcp",
            Self::Cli => "cli",
        }
    }
}

/// An audit entry before it is sealed into the log.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    /// `None` for administrative actions with no firm identity behind them.
    pub actor_id: Option<PersonId>,
    pub actor_role: Option<FirmRole>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub detail: String,
    pub channel: Channel,
}

impl AuditEntry {
    pub fn new(
        action: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: impl ToString,
        channel: Channel,
    ) -> Self {
        Self {
            actor_id: None,
            actor_role: None,
            action: action.into(),
            entity_type: entity_type.into(),
            entity_id: entity_id.to_string(),
            detail: String::new(),
            channel,
        }
    }

    pub fn actor(mut self, person_id: PersonId, role: FirmRole) -> Self {
        self.actor_id = Some(person_id);
        self.actor_role = Some(role);
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Seal into a permanent record chained to `previous_hash`.
    pub fn seal(
        self,
        id: AuditId,
        timestamp: DateTime<Utc>,
        previous_hash: Option<String>,
    ) -> AuditRecord {
        let mut record = AuditRecord {
            id,
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            timestamp,
            detail: self.detail,
            channel: self.channel,
            previous_hash,
            record_hash: String::new(),
        };
        record.record_hash = record.compute_hash();
        record
    }
}

/// A sealed, immutable audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,
    pub actor_id: Option<PersonId>,
    pub actor_role: Option<FirmRole>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub timestamp: DateTime<Utc>,
    pub detail: String,
    pub channel: Channel,
    pub previous_hash: Option<String>,
    pub record_hash: String,
}

impl AuditRecord {
    /// Hash over every field except `record_hash`, hex-encoded.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        let role = self.actor_role.map(FirmRole::as_str).unwrap_or("");
        let actor = self.actor_id.map(|p| p.to_string()).unwrap_or_default();
        let id = self.id.to_string();
        let timestamp = self.timestamp.to_rfc3339();
        let fields: [&str; 10] = [
            &id,
            &actor,
            role,
            &self.action,
            &self.entity_type,
            &self.entity_id,
            &timestamp,
            &self.detail,
            self.channel.as_str(),
            self.previous_hash.as_deref().unwrap_or(""),
        ];
        for field in fields {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

// ── Chain verification ───────────────────────────────────────────────────────

/// First point where the audit chain does not hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("audit chain broken at record {id} (position {position}): {reason}")]
pub struct ChainBreak {
    pub position: usize,
    pub id: AuditId,
    pub reason: &'static str,
}

/// Verify a log ordered oldest to newest. Returns the number of records
/// checked.
pub fn verify_chain(records: &[AuditRecord]) -> std::result::Result<usize, ChainBreak> {
    let mut previous: Option<&AuditRecord> = None;
    for (position, record) in records.iter().enumerate() {
        let broken = |reason| ChainBreak {
            position,
            id: record.id,
            reason,
        };
        if record.compute_hash() != record.record_hash {
            return Err(broken("record hash does not match contents"));
        }
        match previous {
            None if record.previous_hash.is_some() => {
                return Err(broken("first record links to a predecessor"))
            }
            Some(prev) if record.previous_hash.as_deref() != Some(prev.record_hash.as_str()) => {
                return Err(broken("previous hash does not match predecessor"))
            }
            Some(prev) if record.id <= prev.id => {
                return Err(broken("ids are not increasing"))
            }
            _ => {}
        }
        previous = Some(record);
    }
    Ok(records.len())
}
