use crate::core::mapper::json_kind;
use crate::utils::error::{CodecError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 從線上 JSON 物件讀取必要欄位，任何不符都轉成 `MalformedPayload`
pub(crate) struct Fields<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn of(entity: &'static str, value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self { entity, map }),
            other => Err(CodecError::malformed(
                entity,
                format!("expected a JSON object, found {}", json_kind(other)),
            )),
        }
    }

    fn required(&self, name: &str) -> Result<&'a Value> {
        match self.map.get(name) {
            Some(Value::Null) | None => Err(self.malformed(format!("missing field `{}`", name))),
            Some(value) => Ok(value),
        }
    }

    fn malformed(&self, reason: String) -> CodecError {
        CodecError::malformed(self.entity, reason)
    }

    pub fn optional(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|value| !value.is_null())
    }

    pub fn has_only(&self, names: &[&str]) -> bool {
        self.map.keys().all(|key| names.contains(&key.as_str()))
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        self.required(name)?
            .as_i64()
            .ok_or_else(|| self.malformed(format!("field `{}` must be an integer", name)))
    }

    pub fn f64(&self, name: &str) -> Result<f64> {
        self.required(name)?
            .as_f64()
            .ok_or_else(|| self.malformed(format!("field `{}` must be a number", name)))
    }

    pub fn string(&self, name: &str) -> Result<String> {
        self.required(name)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.malformed(format!("field `{}` must be a string", name)))
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate> {
        let text = self.string(name)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| {
            self.malformed(format!(
                "field `{}` is not a date ({}): {}",
                name, DATE_FORMAT, e
            ))
        })
    }

    pub fn object(&self, name: &str) -> Result<Fields<'a>> {
        Fields::of(self.entity, self.required(name)?)
            .map_err(|_| self.malformed(format!("field `{}` must be an object", name)))
    }

    pub fn array(&self, name: &str) -> Result<&'a Vec<Value>> {
        self.required(name)?
            .as_array()
            .ok_or_else(|| self.malformed(format!("field `{}` must be an array", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_fields() {
        let value = json!({
            "id": 3,
            "name": "Savings",
            "rate": 1.5,
            "opened": "2020-02-29",
            "gone": null
        });
        let fields = Fields::of("Account", &value).unwrap();

        assert_eq!(fields.i64("id").unwrap(), 3);
        assert_eq!(fields.string("name").unwrap(), "Savings");
        assert_eq!(fields.f64("rate").unwrap(), 1.5);
        assert_eq!(fields.f64("id").unwrap(), 3.0);
        assert_eq!(
            fields.date("opened").unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()
        );
        assert!(fields.optional("gone").is_none());
        assert!(fields.i64("gone").is_err());
        assert!(fields.i64("name").is_err());
        assert!(fields.date("name").is_err());
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = Fields::of("Customer", &json!([1, 2])).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Malformed Customer payload: expected a JSON object, found an array"
        );

        let err = Fields::of("Customer", &json!("secret-token")).err().unwrap();
        assert!(!err.to_string().contains("secret-token"));
    }

    #[test]
    fn test_has_only() {
        let value = json!({"accountId": 1});
        let fields = Fields::of("Account", &value).unwrap();
        assert!(fields.has_only(&["accountId"]));
        assert!(!Fields::of("Account", &json!({"accountId": 1, "x": 2}))
            .unwrap()
            .has_only(&["accountId"]));
    }
}
