use crate::utils::data_uri;
use mongodb::bson::{self, oid::ObjectId, Bson};
use serde::{Deserialize, Deserializer, Serialize};

/// Binary image content embedded in a record.
///
/// Stored as `{ contentType, data: BinData }`. A record either carries a
/// complete image or no image field at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub content_type: String,
    #[serde(with = "binary")]
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
        }
    }
}

mod binary {
    use mongodb::bson::{spec::BinarySubtype, Binary};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.to_vec(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(Binary::deserialize(deserializer)?.bytes)
    }
}

/// A person/document record as stored in the `users` collection.
///
/// `id` is the application-assigned lookup key; `_id` belongs to MongoDB and
/// is never exposed over HTTP.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(deserialize_with = "stored_text")]
    pub name: String,
    #[serde(deserialize_with = "stored_text")]
    pub age: String,
    #[serde(deserialize_with = "stored_text")]
    pub occupation: String,
    #[serde(deserialize_with = "stored_text")]
    pub address: String,
    #[serde(deserialize_with = "stored_text")]
    pub contact: String,
    #[serde(deserialize_with = "stored_text")]
    pub id_number: String,
    #[serde(deserialize_with = "stored_text")]
    pub document_number: String,
    #[serde(deserialize_with = "stored_text")]
    pub notary_sr_no: String,
    #[serde(deserialize_with = "stored_text")]
    pub document_type: String,
    #[serde(deserialize_with = "stored_text")]
    pub executing_parties: String,
    #[serde(deserialize_with = "stored_text")]
    pub property_address: String,
    #[serde(deserialize_with = "stored_text")]
    pub property_value: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stored_image"
    )]
    pub photo: Option<Image>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "stored_image"
    )]
    pub thumb_img: Option<Image>,
}

/// Partial update for a record. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notary_sr_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executing_parties: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_img: Option<Image>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Body of the `$set` operator for this change set.
    pub fn to_set_document(&self) -> Result<bson::Document, bson::ser::Error> {
        bson::to_document(self)
    }
}

impl Record {
    /// Apply a partial update in place.
    pub fn apply(&mut self, changes: RecordChanges) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut self.name, changes.name);
        set(&mut self.age, changes.age);
        set(&mut self.occupation, changes.occupation);
        set(&mut self.address, changes.address);
        set(&mut self.contact, changes.contact);
        set(&mut self.id_number, changes.id_number);
        set(&mut self.document_number, changes.document_number);
        set(&mut self.notary_sr_no, changes.notary_sr_no);
        set(&mut self.document_type, changes.document_type);
        set(&mut self.executing_parties, changes.executing_parties);
        set(&mut self.property_address, changes.property_address);
        set(&mut self.property_value, changes.property_value);
        if changes.photo.is_some() {
            self.photo = changes.photo;
        }
        if changes.thumb_img.is_some() {
            self.thumb_img = changes.thumb_img;
        }
    }
}

// Older documents may hold the id as an int32 or a double.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Bson::deserialize(deserializer)? {
        Bson::Int32(v) => v as i64,
        Bson::Int64(v) => v,
        Bson::Double(v) => v as i64,
        Bson::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

// Older documents may hold `null` or a bare number where text is expected.
fn stored_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Bson::deserialize(deserializer)? {
        Bson::String(s) => s,
        Bson::Int32(v) => v.to_string(),
        Bson::Int64(v) => v.to_string(),
        Bson::Double(v) => v.to_string(),
        Bson::Boolean(v) => v.to_string(),
        _ => String::new(),
    })
}

// Older documents may hold images as data-URI strings, or as an empty string
// when no image was supplied.
fn stored_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Image>, D::Error> {
    Ok(match Bson::deserialize(deserializer)? {
        Bson::Document(doc) => bson::from_document::<Image>(doc).ok(),
        Bson::String(s) => data_uri::decode(&s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn serializes_with_camel_case_keys_and_binary_image() {
        let record = Record {
            id: 42,
            id_number: "ID-1".to_string(),
            thumb_img: Some(Image::new("image/png", vec![1, 2, 3])),
            ..Default::default()
        };

        let doc = bson::to_document(&record).unwrap();
        assert!(!doc.contains_key("_id"));
        assert!(!doc.contains_key("photo"));
        assert_eq!(doc.get_i64("id").unwrap(), 42);
        assert_eq!(doc.get_str("idNumber").unwrap(), "ID-1");

        let thumb = doc.get_document("thumbImg").unwrap();
        assert_eq!(thumb.get_str("contentType").unwrap(), "image/png");
        assert_eq!(thumb.get_binary_generic("data").unwrap(), &vec![1, 2, 3]);
    }

    #[test]
    fn reads_legacy_documents() {
        let doc = doc! {
            "id": 1_700_000_000_000.0_f64,
            "name": "Asha",
            "photo": "",
            "thumbImg": "data:image/gif;base64,R0lG",
        };

        let record: Record = bson::from_document(doc).unwrap();
        assert_eq!(record.id, 1_700_000_000_000);
        assert_eq!(record.name, "Asha");
        assert_eq!(record.age, "");
        assert_eq!(record.photo, None);
        assert_eq!(
            record.thumb_img,
            Some(Image::new("image/gif", b"GIF".to_vec()))
        );
    }

    #[test]
    fn reads_null_and_numeric_text_fields() {
        let doc = doc! {
            "id": 1_i64,
            "name": Bson::Null,
            "age": 30,
            "contact": "555-0100",
        };

        let record: Record = bson::from_document(doc).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.age, "30");
        assert_eq!(record.contact, "555-0100");
        assert_eq!(record.occupation, "");
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut record = Record {
            id: 7,
            name: "X".to_string(),
            age: "30".to_string(),
            photo: Some(Image::new("image/png", vec![9])),
            ..Default::default()
        };

        record.apply(RecordChanges {
            name: Some("Y".to_string()),
            ..Default::default()
        });

        assert_eq!(record.id, 7);
        assert_eq!(record.name, "Y");
        assert_eq!(record.age, "30");
        assert_eq!(record.photo, Some(Image::new("image/png", vec![9])));
    }

    #[test]
    fn set_document_contains_only_changes() {
        let changes = RecordChanges {
            property_value: Some("1000".to_string()),
            ..Default::default()
        };
        let set = changes.to_set_document().unwrap();
        assert_eq!(set, doc! { "propertyValue": "1000" });
        assert!(RecordChanges::default().is_empty());
        assert!(!changes.is_empty());
    }
}
