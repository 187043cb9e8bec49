//! Record serialization for export.
//!
//! [`RecordCodec`] turns composite records into bytes and back. The crate ships
//! [`JsonCodec`], which writes MARC-in-JSON:
//!
//! ```json
//! {
//!   "leader": "00000nam a2200000 a 4500",
//!   "fields": [
//!     {"001": "123"},
//!     {"245": {"ind1": "1", "ind2": "0", "subfields": [{"a": "Title"}]}}
//!   ]
//! }
//! ```
//!
//! Subfields are a list of single-key objects so repeated codes and their order
//! survive a round trip.
//!
//! # Examples
//!
//! ```
//! use marc_liberator::codec::{JsonCodec, RecordCodec};
//! use marc_liberator::{Field, Record};
//!
//! let record = Record::builder()
//!     .control_field("001", "123")
//!     .field(Field::builder("852", '0', '0').subfield('0', "9").subfield('b', "f").build())
//!     .build();
//!
//! let bytes = JsonCodec::default().encode(&record)?;
//! assert_eq!(JsonCodec::default().decode(&bytes)?, record);
//! # Ok::<(), marc_liberator::LiberatorError>(())
//! ```

use crate::error::{LiberatorError, Result};
use crate::record::{Field, Record};
use serde_json::{json, Map, Value};

/// Encodes and decodes records.
pub trait RecordCodec: std::fmt::Debug {
    /// Decode one record
    ///
    /// # Errors
    ///
    /// Returns [`LiberatorError::Upstream`] if the bytes are not a valid record.
    fn decode(&self, bytes: &[u8]) -> Result<Record>;

    /// Encode one record
    ///
    /// # Errors
    ///
    /// Returns [`LiberatorError::Upstream`] if the record cannot be encoded.
    fn encode(&self, record: &Record) -> Result<Vec<u8>>;
}

/// MARC-in-JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    /// Emit indented JSON
    pub pretty: bool,
}

impl JsonCodec {
    /// A codec that emits indented JSON
    #[must_use]
    pub fn pretty() -> Self {
        JsonCodec { pretty: true }
    }
}

impl RecordCodec for JsonCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Record> {
        let value: Value = serde_json::from_slice(bytes)?;
        json_to_record(&value)
    }

    fn encode(&self, record: &Record) -> Result<Vec<u8>> {
        let value = record_to_json(record);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&value)?
        } else {
            serde_json::to_vec(&value)?
        };
        Ok(bytes)
    }
}

/// Convert a record to a MARC-in-JSON value.
#[must_use]
pub fn record_to_json(record: &Record) -> Value {
    let mut fields = Vec::with_capacity(record.control_fields.len() + record.fields.len());

    for (tag, value) in &record.control_fields {
        fields.push(json!({ tag: value }));
    }

    for field in &record.fields {
        let subfields: Vec<Value> = field
            .subfields
            .iter()
            .map(|sf| json!({ sf.code.to_string(): sf.value }))
            .collect();
        fields.push(json!({
            field.tag.clone(): {
                "ind1": field.indicator1.to_string(),
                "ind2": field.indicator2.to_string(),
                "subfields": subfields,
            }
        }));
    }

    json!({ "leader": record.leader, "fields": fields })
}

/// Convert a MARC-in-JSON value back to a record.
///
/// # Errors
///
/// Returns [`LiberatorError::Upstream`] if the value does not have the
/// expected shape.
pub fn json_to_record(value: &Value) -> Result<Record> {
    let obj = value
        .as_object()
        .ok_or_else(|| invalid("expected a JSON object"))?;
    let leader = obj
        .get("leader")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing leader"))?;
    let fields = obj
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("missing fields array"))?;

    let mut record = Record::new(leader);
    for entry in fields {
        let (tag, body) = single_entry(entry).ok_or_else(|| invalid("field must be a one-key object"))?;
        match body {
            Value::String(text) => record.add_control_field(tag.clone(), text.clone()),
            Value::Object(data) => record.add_field(data_field(tag, data)?),
            _ => return Err(invalid(&format!("field {tag} has an unexpected value"))),
        }
    }
    Ok(record)
}

fn data_field(tag: &str, data: &Map<String, Value>) -> Result<Field> {
    let indicator = |key: &str| -> Result<char> {
        data.get(key)
            .and_then(Value::as_str)
            .map(|s| s.chars().next().unwrap_or(' '))
            .ok_or_else(|| invalid(&format!("field {tag} is missing {key}")))
    };
    let mut field = Field::new(tag, indicator("ind1")?, indicator("ind2")?);

    let subfields = data
        .get("subfields")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid(&format!("field {tag} is missing subfields")))?;
    for subfield in subfields {
        let (code, text) = single_entry(subfield)
            .and_then(|(code, text)| Some((code.chars().next()?, text.as_str()?)))
            .ok_or_else(|| invalid(&format!("field {tag} has a malformed subfield")))?;
        field.add_subfield(code, text);
    }
    Ok(field)
}

fn single_entry(value: &Value) -> Option<(&String, &Value)> {
    let obj = value.as_object()?;
    if obj.len() == 1 {
        obj.iter().next()
    } else {
        None
    }
}

fn invalid(message: &str) -> LiberatorError {
    LiberatorError::Upstream(format!("MARC-in-JSON: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::builder()
            .control_field("001", "123")
            .control_field("005", "20240101120000.0")
            .field(Field::builder("245", '1', '0').subfield('a', "Title").build())
            .field(
                Field::builder("852", '0', '0')
                    .subfield('0', "9001")
                    .subfield('b', "f")
                    .subfield('z', "first note")
                    .subfield('z', "second note")
                    .build(),
            )
            .field(Field::builder("650", ' ', '0').subfield('a', "Subject").build())
            .build()
    }

    #[test]
    fn test_encode_layout() {
        let value = record_to_json(&sample());
        assert_eq!(value["leader"], "00000nam a2200000 a 4500");
        assert_eq!(value["fields"][0]["001"], "123");
        assert_eq!(value["fields"][2]["245"]["ind1"], "1");
        assert_eq!(value["fields"][2]["245"]["subfields"][0]["a"], "Title");
    }

    #[test]
    fn test_repeated_subfields_survive() {
        let codec = JsonCodec::default();
        let decoded = codec.decode(&codec.encode(&sample()).unwrap()).unwrap();
        assert_eq!(decoded, sample());
        let f852 = decoded.get_field("852").unwrap();
        assert_eq!(f852.subfield_codes(), "0bzz");
    }

    #[test]
    fn test_pretty_output_decodes() {
        let bytes = JsonCodec::pretty().encode(&sample()).unwrap();
        assert!(bytes.contains(&b'\n'));
        assert_eq!(JsonCodec::default().decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let codec = JsonCodec::default();
        assert!(matches!(codec.decode(b"not json"), Err(LiberatorError::Upstream(_))));
        assert!(matches!(codec.decode(b"[]"), Err(LiberatorError::Upstream(_))));
        assert!(matches!(
            codec.decode(br#"{"leader": "x", "fields": [{"245": 3}]}"#),
            Err(LiberatorError::Upstream(_))
        ));
        assert!(matches!(
            codec.decode(br#"{"leader": "x", "fields": [{"245": {"ind1": "1", "subfields": []}}]}"#),
            Err(LiberatorError::Upstream(_))
        ));
    }
}
