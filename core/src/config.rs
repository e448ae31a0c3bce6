//! Configuration document for building a client.
//!
//! Loading the document (file, environment, CLI) is left to the caller; this
//! type only fixes its shape so it can be deserialized with serde.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{ "key": ..., "blog": ..., "params": { "user_ip": ..., ... } }`
///
/// Every member is optional. `params` uses the snake_case wire names and is
/// applied with the same merge rules as `AkismetClient::set_params`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key: Option<String>,
    pub blog: Option<String>,
    pub params: Map<String, Value>,
}
