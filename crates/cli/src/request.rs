//! Packing request parsing.
//!
//! Requests arrive as JSON in one of two item dialects:
//!
//! - `{"id": 1, "length": 2, "width": 3, "height": 4}`
//! - `{"id": "A", "L": 2, "W": 3, "H": 4, "quantity": 3}`
//!
//! The bin size accepts the same two spellings. Everything is normalised into
//! engine types before it reaches the packer.

use cubestack_core::{Boundary, Config, RotationMode, ScoreWeights, SelectionPolicy};
use cubestack_d3::{Bin, ItemSpec};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Most items a single request may expand to, quantities included.
pub const MAX_ITEMS: u32 = 100_000;

/// Errors that can occur when reading a request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid request format: {0}")]
    InvalidFormat(String),
}

/// An identifier given either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Bin size in either spelling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBinSize {
    pub length: Option<Value>,
    pub width: Option<Value>,
    pub height: Option<Value>,
    #[serde(rename = "L")]
    pub l: Option<Value>,
    #[serde(rename = "W")]
    pub w: Option<Value>,
    #[serde(rename = "H")]
    pub h: Option<Value>,
}

/// A request item in either dialect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    pub id: Option<RawId>,
    pub request_id: Option<RawId>,
    pub length: Option<Value>,
    pub width: Option<Value>,
    pub height: Option<Value>,
    #[serde(rename = "L")]
    pub l: Option<Value>,
    #[serde(rename = "W")]
    pub w: Option<Value>,
    #[serde(rename = "H")]
    pub h: Option<Value>,
    pub quantity: Option<Value>,
    pub stackable: Option<bool>,
}

/// Which field names a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `length` / `width` / `height`.
    Named,
    /// `L` / `W` / `H`, optionally with `quantity`.
    Short,
}

/// Picks the dialect of a record from the fields it carries.
///
/// The short dialect wins only when all of `L`, `W` and `H` are present.
fn detect_dialect(
    named: [&Option<Value>; 3],
    short: [&Option<Value>; 3],
) -> Option<Dialect> {
    if short.iter().all(|v| v.is_some()) {
        Some(Dialect::Short)
    } else if named.iter().any(|v| v.is_some()) {
        Some(Dialect::Named)
    } else {
        None
    }
}

/// Reads a strictly positive integer that fits a `u32`.
fn positive_integer(value: Option<&Value>, context: &str, field: &str) -> Result<u32, RequestError> {
    let value = value.ok_or_else(|| {
        RequestError::InvalidFormat(format!("{} missing required field: {}", context, field))
    })?;

    let number = value.as_f64().ok_or_else(|| {
        RequestError::InvalidFormat(format!("{} field {} must be a number", context, field))
    })?;

    if number.fract() != 0.0 || number < 1.0 || number > f64::from(u32::MAX) {
        return Err(RequestError::InvalidFormat(format!(
            "{} field {} must be a positive integer, got {}",
            context, field, value
        )));
    }

    Ok(number as u32)
}

impl RawBinSize {
    /// Converts to a [`Bin`].
    pub fn to_bin(&self) -> Result<Bin, RequestError> {
        let named = [&self.length, &self.width, &self.height];
        let short = [&self.l, &self.w, &self.h];
        let (fields, values) = match detect_dialect(named, short) {
            Some(Dialect::Short) => (["L", "W", "H"], short),
            Some(Dialect::Named) => (["length", "width", "height"], named),
            None => {
                return Err(RequestError::InvalidFormat(
                    "bin_size must contain either (L, W, H) or (length, width, height)".into(),
                ))
            }
        };

        let mut dims = [0u32; 3];
        for ((dim, field), value) in dims.iter_mut().zip(fields).zip(values) {
            *dim = positive_integer(value.as_ref(), "bin_size", field)?;
        }
        Ok(Bin::new(dims[0], dims[1], dims[2]))
    }
}

impl RawItem {
    /// Returns the dialect of this record.
    pub fn dialect(&self) -> Option<Dialect> {
        detect_dialect(
            [&self.length, &self.width, &self.height],
            [&self.l, &self.w, &self.h],
        )
    }

    /// Expands the record into engine items.
    ///
    /// `quantity > 1` yields ids `"{id}_0"`, `"{id}_1"`, ...; the request
    /// group always stays the original id unless given explicitly.
    pub fn expand(&self, index: usize) -> Result<Vec<ItemSpec>, RequestError> {
        let context = format!("Item {}", index);

        let id = self.id.as_ref().ok_or_else(|| {
            RequestError::InvalidFormat(format!("{} missing required field: id", context))
        })?;

        let (fields, values) = match self.dialect() {
            Some(Dialect::Short) => (["L", "W", "H"], [&self.l, &self.w, &self.h]),
            Some(Dialect::Named) => (
                ["length", "width", "height"],
                [&self.length, &self.width, &self.height],
            ),
            None => {
                return Err(RequestError::InvalidFormat(format!(
                    "{} must contain either (L, W, H) or (length, width, height)",
                    context
                )))
            }
        };

        let mut dims = [0u32; 3];
        for ((dim, field), value) in dims.iter_mut().zip(fields).zip(values) {
            *dim = positive_integer(value.as_ref(), &context, field)?;
        }

        let quantity = match &self.quantity {
            Some(value) => positive_integer(Some(value), &context, "quantity")?,
            None => 1,
        };
        if quantity > MAX_ITEMS {
            return Err(RequestError::InvalidFormat(format!(
                "{} quantity {} exceeds the limit of {}",
                context, quantity, MAX_ITEMS
            )));
        }

        let id = id.to_string();
        let request_id = self
            .request_id
            .as_ref()
            .map_or_else(|| id.clone(), ToString::to_string);
        let stackable = self.stackable.unwrap_or(true);

        let make = |item_id: String| {
            ItemSpec::new(item_id, dims[0], dims[1], dims[2])
                .with_request_id(request_id.clone())
                .with_stackable(stackable)
        };

        if quantity == 1 {
            return Ok(vec![make(id)]);
        }
        Ok((0..quantity).map(|q| make(format!("{}_{}", id, q))).collect())
    }
}

fn default_lock_axis() -> bool {
    true
}

/// A packing request as read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct PackRequest {
    pub bin_size: Option<RawBinSize>,
    pub items: Option<Vec<RawItem>>,
    #[serde(default = "default_lock_axis")]
    pub lock_axis: bool,
    pub policy: Option<SelectionPolicy>,
    pub weights: Option<ScoreWeights>,
    pub time_limit_ms: Option<u64>,
    #[serde(default)]
    pub algorithm_steps: bool,
}

/// A request reduced to engine inputs.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    /// The bin.
    pub bin: Bin,
    /// Expanded items in request order.
    pub items: Vec<ItemSpec>,
    /// Engine configuration derived from the request.
    pub config: Config,
}

impl PackRequest {
    /// Builds the engine configuration carried by the request.
    pub fn to_config(&self) -> Config {
        let mut config = Config::default()
            .with_rotation_mode(RotationMode::from_lock_axis(self.lock_axis))
            .with_step_recording(self.algorithm_steps);
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if let Some(weights) = self.weights {
            config = config.with_weights(weights);
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(ms);
        }
        config
    }

    /// Validates the request and converts it to engine inputs.
    pub fn normalize(&self) -> Result<NormalizedRequest, RequestError> {
        let bin = self
            .bin_size
            .as_ref()
            .ok_or_else(|| RequestError::InvalidFormat("Missing bin_size".into()))?
            .to_bin()?;
        bin.validate()
            .map_err(|e| RequestError::InvalidFormat(format!("bin_size: {}", e)))?;

        let raw_items = self
            .items
            .as_ref()
            .ok_or_else(|| RequestError::InvalidFormat("Missing items".into()))?;
        if raw_items.is_empty() {
            return Err(RequestError::InvalidFormat("No items to pack".into()));
        }

        let mut items = Vec::with_capacity(raw_items.len());
        for (index, raw) in raw_items.iter().enumerate() {
            items.extend(raw.expand(index)?);
            if items.len() > MAX_ITEMS as usize {
                return Err(RequestError::InvalidFormat(format!(
                    "Request expands to more than {} items",
                    MAX_ITEMS
                )));
            }
        }

        Ok(NormalizedRequest {
            bin,
            items,
            config: self.to_config(),
        })
    }
}

/// Reads packing requests from files or strings.
#[derive(Debug, Default)]
pub struct RequestParser;

impl RequestParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a request from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PackRequest, RequestError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses a request from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<PackRequest, RequestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and normalises a request file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<NormalizedRequest, RequestError> {
        let request = self.parse_file(path)?;
        request.normalize().map_err(|e| {
            log::warn!("Rejected request: {}", e);
            e
        })
    }
}
