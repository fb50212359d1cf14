use crate::models::{Image, Record, RecordChanges};
use crate::utils::data_uri;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Inbound record fields after payload negotiation.
///
/// Every field is optional: a key that is missing or `null` is `None`.
/// Text values given as numbers or booleans are kept in their textual form.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordInput {
    #[serde(deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub age: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub occupation: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub contact: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub id_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub document_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub notary_sr_no: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub document_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub executing_parties: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub property_address: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub property_value: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub photo_data: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub thumb_data: Option<String>,
}

impl RecordInput {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        // The lenient deserializers accept any JSON value, so this only
        // falls back for a non-object payload.
        serde_json::from_value(Value::Object(fields)).unwrap_or_default()
    }

    pub fn photo(&self) -> Option<Image> {
        self.photo_data.as_deref().and_then(data_uri::decode)
    }

    pub fn thumb(&self) -> Option<Image> {
        self.thumb_data.as_deref().and_then(data_uri::decode)
    }

    /// Build a complete record, filling absent text with `""` and an absent
    /// id with `fallback_id`.
    pub fn into_record(self, fallback_id: i64) -> Record {
        let photo = self.photo();
        let thumb_img = self.thumb();
        Record {
            object_id: None,
            id: self.id.unwrap_or(fallback_id),
            name: self.name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            occupation: self.occupation.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            contact: self.contact.unwrap_or_default(),
            id_number: self.id_number.unwrap_or_default(),
            document_number: self.document_number.unwrap_or_default(),
            notary_sr_no: self.notary_sr_no.unwrap_or_default(),
            document_type: self.document_type.unwrap_or_default(),
            executing_parties: self.executing_parties.unwrap_or_default(),
            property_address: self.property_address.unwrap_or_default(),
            property_value: self.property_value.unwrap_or_default(),
            photo,
            thumb_img,
        }
    }

    /// Build a partial update from the fields that were supplied. Images are
    /// included only when they decode.
    pub fn into_changes(self) -> RecordChanges {
        let photo = self.photo();
        let thumb_img = self.thumb();
        RecordChanges {
            name: self.name,
            age: self.age,
            occupation: self.occupation,
            address: self.address,
            contact: self.contact,
            id_number: self.id_number,
            document_number: self.document_number,
            notary_sr_no: self.notary_sr_no,
            document_type: self.document_type,
            executing_parties: self.executing_parties,
            property_address: self.property_address,
            property_value: self.property_value,
            photo,
            thumb_img,
        }
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Outbound record: images are re-encoded as data URIs and the binary
/// fields and the store's `_id` are left out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: i64,
    pub name: String,
    pub age: String,
    pub occupation: String,
    pub address: String,
    pub contact: String,
    pub id_number: String,
    pub document_number: String,
    pub notary_sr_no: String,
    pub document_type: String,
    pub executing_parties: String,
    pub property_address: String,
    pub property_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_data: Option<String>,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            age: record.age,
            occupation: record.occupation,
            address: record.address,
            contact: record.contact,
            id_number: record.id_number,
            document_number: record.document_number,
            notary_sr_no: record.notary_sr_no,
            document_type: record.document_type,
            executing_parties: record.executing_parties,
            property_address: record.property_address,
            property_value: record.property_value,
            photo_data: outbound_image(record.photo.as_ref()),
            thumb_data: outbound_image(record.thumb_img.as_ref()),
        }
    }
}

// An image without bytes is reported as absent.
fn outbound_image(image: Option<&Image>) -> Option<String> {
    image
        .filter(|image| !image.data.is_empty())
        .map(data_uri::encode)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
