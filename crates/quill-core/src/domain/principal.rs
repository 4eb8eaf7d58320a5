use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller's identity, as resolved by the external
/// identity provider. Absent for anonymous calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}
