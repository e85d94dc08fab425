pub mod header_map {
    use std::collections::BTreeMap;

    use http::{HeaderMap, HeaderName, HeaderValue};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use serde_json::Value;

    /// Writes each header as `name: value`, joining repeated names with `, `.
    pub fn serialize<S: Serializer>(headers: &HeaderMap, s: S) -> Result<S::Ok, S::Error> {
        let mut flat = BTreeMap::<&str, String>::new();
        for (name, value) in headers {
            let value = String::from_utf8_lossy(value.as_bytes());
            flat.entry(name.as_str())
                .and_modify(|v| {
                    v.push_str(", ");
                    v.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }
        s.collect_map(flat)
    }

    /// Reads a map of header names to strings, numbers or booleans.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<HeaderMap, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(d)?;
        let mut headers = HeaderMap::with_capacity(raw.len());
        for (name, value) in raw {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "header `{name}` must be a string, number or boolean, found {other}"
                    )));
                }
            };
            let name = HeaderName::try_from(name.as_str()).map_err(D::Error::custom)?;
            let value = HeaderValue::try_from(value).map_err(D::Error::custom)?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
